//! JSON chart configuration.
//!
//! Every field has a default, so a config file only names what it changes.
//! Edge names are kept as strings here and parsed on validation, so a typo
//! surfaces as [`ChartError::UnknownEdge`] rather than a generic JSON error.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::chart::Chart;
use crate::error::{ChartError, ChartResult};
use crate::geom::{RectangleEdge, RectangleInsets};
use crate::legend::SortOrder;
use crate::paint::{Paint, parse_hex_color};
use crate::plot::PlotOrientation;
use crate::title::TextTitle;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChartConfig {
    pub width: u32,
    pub height: u32,
    pub title: Option<String>,
    pub subtitles: Vec<String>,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub legend: bool,
    /// `top`, `bottom`, `left` or `right`.
    pub legend_position: String,
    pub legend_sort: SortOrder,
    pub padding: f64,
    /// `#RRGGBB` or `#RRGGBBAA`.
    pub background: Option<String>,
    /// Tick label locale, e.g. `en`, `de`, `fr`.
    pub locale: String,
    pub orientation: PlotOrientation,
    /// Draw markers on line charts.
    pub shapes: bool,
    /// Prefix for item URLs in image maps.
    pub url_prefix: Option<String>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: None,
            subtitles: Vec::new(),
            x_label: None,
            y_label: None,
            legend: true,
            legend_position: "bottom".to_string(),
            legend_sort: SortOrder::Ascending,
            padding: 5.0,
            background: None,
            locale: "en".to_string(),
            orientation: PlotOrientation::Vertical,
            shapes: false,
            url_prefix: None,
        }
    }
}

impl ChartConfig {
    pub fn from_json(json: &str) -> ChartResult<Self> {
        let cfg: ChartConfig = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: impl AsRef<Path>) -> ChartResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&text)
    }

    pub fn to_json(&self) -> ChartResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> ChartResult<()> {
        std::fs::write(path.as_ref(), self.to_json()?)?;
        Ok(())
    }

    pub fn legend_edge(&self) -> ChartResult<RectangleEdge> {
        self.legend_position.parse()
    }

    pub fn background_paint(&self) -> ChartResult<Option<Paint>> {
        self.background
            .as_deref()
            .map(|s| parse_hex_color(s).ok_or_else(|| ChartError::invalid(format!("bad color: {s}"))))
            .transpose()
    }

    /// Check sizes, the legend edge and the background color.
    pub fn validate(&self) -> ChartResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ChartError::invalid(format!(
                "chart size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if !(self.padding >= 0.0 && self.padding.is_finite()) {
            return Err(ChartError::invalid(format!("bad padding: {}", self.padding)));
        }
        self.legend_edge()?;
        self.background_paint()?;
        Ok(())
    }

    /// Apply subtitles, legend placement, padding and background to `chart`,
    /// firing a single change.
    pub fn apply(&self, chart: &mut Chart) -> ChartResult<()> {
        let edge = self.legend_edge()?;
        let background = self.background_paint()?;
        let was = chart.notifier().is_notify();
        chart.set_notify(false);
        for text in &self.subtitles {
            let mut sub = TextTitle::with_font(text.as_str(), crate::paint::FontSpec::sans(12.0));
            sub.title_mut().set_position(RectangleEdge::Top);
            chart.add_subtitle(sub);
        }
        if let Some(legend) = chart.legend_mut() {
            legend.title_mut().set_position(edge);
            legend.set_sort_order(self.legend_sort);
        }
        chart.set_padding(RectangleInsets::uniform(self.padding));
        if background.is_some() {
            chart.set_background(background);
        }
        if was {
            chart.set_notify(true);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_fields() {
        let cfg = ChartConfig::from_json(r#"{ "title": "GDP", "width": 640 }"#).unwrap();
        assert_eq!(cfg.width, 640);
        assert_eq!(cfg.height, 600);
        assert_eq!(cfg.legend_edge().unwrap(), RectangleEdge::Bottom);
    }

    #[test]
    fn unknown_edge_is_rejected() {
        let err = ChartConfig::from_json(r#"{ "legend_position": "middle" }"#).unwrap_err();
        assert!(matches!(err, ChartError::UnknownEdge(ref s) if s == "middle"));
    }

    #[test]
    fn unknown_field_and_bad_color_are_rejected() {
        assert!(matches!(
            ChartConfig::from_json(r#"{ "colour": "red" }"#),
            Err(ChartError::Json(_))
        ));
        assert!(matches!(
            ChartConfig::from_json(r##"{ "background": "#12" }"##),
            Err(ChartError::InvalidArgument(_))
        ));
    }
}
