//! Ready-made charts: one call from a dataset to a chart with sensible axes,
//! renderer and legend.

use std::cell::RefCell;
use std::fmt;
use std::path::Path;
use std::rc::Rc;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::axis::{CategoryAxis, NumberAxis};
use crate::chart::Chart;
use crate::config::ChartConfig;
use crate::data::{
    SharedCategoryDataset, SharedPieDataset, SharedXyDataset, load_category_csv, load_pie_csv,
    load_xy_csv,
};
use crate::error::{ChartError, ChartResult};
use crate::plot::{BarRenderer, CategoryPlot, PiePlot, PlotOrientation, XyLineAndShapeRenderer, XyPlot};

/// The chart types the factory builds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    #[default]
    Line,
    Bar,
    Pie,
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ChartKind::Line => "line",
            ChartKind::Bar => "bar",
            ChartKind::Pie => "pie",
        })
    }
}

impl FromStr for ChartKind {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "line" | "xy" => Ok(ChartKind::Line),
            "bar" => Ok(ChartKind::Bar),
            "pie" => Ok(ChartKind::Pie),
            other => Err(ChartError::invalid(format!("unknown chart kind: {other}"))),
        }
    }
}

/// A dataset handle of the shape a chart kind needs.
#[derive(Clone)]
pub enum ChartData {
    Xy(SharedXyDataset),
    Category(SharedCategoryDataset),
    Pie(SharedPieDataset),
}

impl fmt::Debug for ChartData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChartData::{}", self.kind())
    }
}

impl ChartData {
    pub fn kind(&self) -> ChartKind {
        match self {
            ChartData::Xy(_) => ChartKind::Line,
            ChartData::Category(_) => ChartKind::Bar,
            ChartData::Pie(_) => ChartKind::Pie,
        }
    }

    /// Load the CSV layout that `kind` expects: `series,x,y` rows for line
    /// charts, a wide table for bar charts, `key,value` rows for pies.
    pub fn load_csv(kind: ChartKind, path: impl AsRef<Path>) -> ChartResult<Self> {
        let path = path.as_ref();
        log::debug!("loading {kind} data from {}", path.display());
        Ok(match kind {
            ChartKind::Line => ChartData::Xy(Rc::new(RefCell::new(load_xy_csv(path)?))),
            ChartKind::Bar => ChartData::Category(Rc::new(RefCell::new(load_category_csv(path)?))),
            ChartKind::Pie => ChartData::Pie(Rc::new(RefCell::new(load_pie_csv(path)?))),
        })
    }
}

fn line_plot(
    x_label: Option<&str>,
    y_label: Option<&str>,
    dataset: SharedXyDataset,
    orientation: PlotOrientation,
) -> XyPlot {
    let mut domain = NumberAxis::new(x_label.map(str::to_string));
    domain.set_auto_range_includes_zero(false);
    let range = NumberAxis::new(y_label.map(str::to_string));
    let mut plot = XyPlot::new(
        Some(dataset),
        domain,
        range,
        XyLineAndShapeRenderer::new(true, false),
    );
    plot.set_orientation(orientation);
    plot
}

fn bar_plot(
    category_label: Option<&str>,
    value_label: Option<&str>,
    dataset: SharedCategoryDataset,
    orientation: PlotOrientation,
) -> CategoryPlot {
    let mut plot = CategoryPlot::new(
        Some(dataset),
        CategoryAxis::new(category_label.map(str::to_string)),
        NumberAxis::new(value_label.map(str::to_string)),
        BarRenderer::default(),
    );
    plot.set_orientation(orientation);
    plot
}

/// Lines through each XY series; the x axis does not force zero into view.
pub fn create_line_chart(
    title: Option<&str>,
    x_label: Option<&str>,
    y_label: Option<&str>,
    dataset: SharedXyDataset,
    orientation: PlotOrientation,
    legend: bool,
) -> Chart {
    Chart::from_plot(title, line_plot(x_label, y_label, dataset, orientation), legend)
}

/// One bar per (series, category) value.
pub fn create_bar_chart(
    title: Option<&str>,
    category_label: Option<&str>,
    value_label: Option<&str>,
    dataset: SharedCategoryDataset,
    orientation: PlotOrientation,
    legend: bool,
) -> Chart {
    Chart::from_plot(
        title,
        bar_plot(category_label, value_label, dataset, orientation),
        legend,
    )
}

pub fn create_pie_chart(title: Option<&str>, dataset: SharedPieDataset, legend: bool) -> Chart {
    Chart::from_plot(title, PiePlot::new(Some(dataset)), legend)
}

/// Build the chart `config` describes around `data`.
pub fn build_chart(config: &ChartConfig, data: ChartData) -> ChartResult<Chart> {
    config.validate()?;
    let title = config.title.as_deref();
    let x = config.x_label.as_deref();
    let y = config.y_label.as_deref();
    let mut chart = match data {
        ChartData::Xy(ds) => {
            let mut plot = line_plot(x, y, ds, config.orientation);
            plot.domain_axis_mut().set_locale(config.locale.as_str());
            plot.range_axis_mut().set_locale(config.locale.as_str());
            plot.renderer_mut().set_shapes_visible(config.shapes);
            plot.renderer_mut()
                .base_mut()
                .set_url_prefix(config.url_prefix.clone());
            Chart::from_plot(title, plot, config.legend)
        }
        ChartData::Category(ds) => {
            let mut plot = bar_plot(x, y, ds, config.orientation);
            plot.range_axis_mut().set_locale(config.locale.as_str());
            plot.renderer_mut()
                .base_mut()
                .set_url_prefix(config.url_prefix.clone());
            Chart::from_plot(title, plot, config.legend)
        }
        ChartData::Pie(ds) => {
            let mut plot = PiePlot::new(Some(ds));
            plot.set_url_prefix(config.url_prefix.clone());
            Chart::from_plot(title, plot, config.legend)
        }
    };
    config.apply(&mut chart)?;
    Ok(chart)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DefaultPieDataset;
    use crate::plot::{Plot, PlotType};

    #[test]
    fn kinds_parse() {
        assert_eq!("XY".parse::<ChartKind>().unwrap(), ChartKind::Line);
        assert!("radar".parse::<ChartKind>().is_err());
    }

    #[test]
    fn pie_chart_has_legend_and_title() {
        let ds: SharedPieDataset = Rc::new(RefCell::new(DefaultPieDataset::new()));
        let chart = create_pie_chart(Some("Share"), ds, true);
        assert_eq!(chart.title().map(|t| t.text()), Some("Share"));
        assert!(chart.legend().is_some());
        assert_eq!(chart.plot().borrow().plot_type(), PlotType::Pie);
    }
}
