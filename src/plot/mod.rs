//! Plots: the body of a chart, drawn into whatever area the titles leave.

mod category;
mod pie;
mod renderer;
mod xy;

pub use category::CategoryPlot;
pub use pie::{PieDirection, PiePlot};
pub use renderer::{BarRenderer, RendererBase, XyLineAndShapeRenderer};
pub use xy::XyPlot;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::entity::{EntityCollection, PlotRenderingInfo};
use crate::canvas::Canvas;
use crate::error::{ChartError, ChartResult};
use crate::event::{ChangeSource, Notifier};
use crate::geom::{Rect, RectangleAnchor, RectangleInsets, Shape};
use crate::legend::LegendItemSource;
use crate::paint::{FontSpec, GRAY, Paint, Stroke, WHITE};

/// Direction the domain axis runs in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlotOrientation {
    /// Domain along x, values along y.
    #[default]
    Vertical,
    /// Domain along y, values along x.
    Horizontal,
}

impl fmt::Display for PlotOrientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PlotOrientation::Vertical => "vertical",
            PlotOrientation::Horizontal => "horizontal",
        })
    }
}

impl FromStr for PlotOrientation {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vertical" => Ok(PlotOrientation::Vertical),
            "horizontal" => Ok(PlotOrientation::Horizontal),
            _ => Err(ChartError::invalid(format!("unknown orientation: {s}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlotType {
    Xy,
    Category,
    Pie,
}

impl fmt::Display for PlotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PlotType::Xy => "XY Plot",
            PlotType::Category => "Category Plot",
            PlotType::Pie => "Pie Plot",
        })
    }
}

/// Appearance shared by all plots.
#[derive(Debug)]
pub struct PlotBase {
    insets: RectangleInsets,
    background: Option<Paint>,
    outline_paint: Option<Paint>,
    outline_stroke: Stroke,
    no_data_message: Option<String>,
    no_data_font: FontSpec,
    notifier: Notifier,
}

impl Default for PlotBase {
    fn default() -> Self {
        Self::new()
    }
}

impl PlotBase {
    pub const DEFAULT_INSETS: RectangleInsets = RectangleInsets::new(4.0, 8.0, 4.0, 8.0);

    pub fn new() -> Self {
        Self {
            insets: Self::DEFAULT_INSETS,
            background: Some(WHITE),
            outline_paint: Some(GRAY),
            outline_stroke: Stroke::new(0.5),
            no_data_message: Some("No data to display".to_string()),
            no_data_font: FontSpec::sans(12.0),
            notifier: Notifier::new(ChangeSource::Plot),
        }
    }

    pub fn insets(&self) -> RectangleInsets {
        self.insets
    }

    pub fn set_insets(&mut self, insets: RectangleInsets) {
        self.insets = insets;
        self.notifier.fire_change();
    }

    pub fn background(&self) -> Option<Paint> {
        self.background
    }

    pub fn set_background(&mut self, paint: Option<Paint>) {
        self.background = paint;
        self.notifier.fire_change();
    }

    pub fn set_outline_paint(&mut self, paint: Option<Paint>) {
        self.outline_paint = paint;
        self.notifier.fire_change();
    }

    pub fn no_data_message(&self) -> Option<&str> {
        self.no_data_message.as_deref()
    }

    pub fn set_no_data_message(&mut self, message: Option<String>) {
        self.no_data_message = message;
        self.notifier.fire_change();
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub(crate) fn fire_change(&self) {
        self.notifier.fire_change();
    }

    pub(crate) fn draw_background(&self, canvas: &mut dyn Canvas, area: &Rect) -> ChartResult<()> {
        match self.background {
            Some(bg) if !area.is_empty() => canvas.fill_shape(&Shape::Rect(*area), &bg),
            _ => Ok(()),
        }
    }

    pub(crate) fn draw_outline(&self, canvas: &mut dyn Canvas, area: &Rect) -> ChartResult<()> {
        match self.outline_paint {
            Some(p) if !area.is_empty() => {
                canvas.stroke_shape(&Shape::Rect(*area), &p, &self.outline_stroke)
            }
            _ => Ok(()),
        }
    }

    pub(crate) fn draw_no_data_message(&self, canvas: &mut dyn Canvas, area: &Rect) -> ChartResult<()> {
        let Some(msg) = self.no_data_message.as_deref() else {
            return Ok(());
        };
        canvas.draw_text(
            msg,
            area.center_x(),
            area.center_y(),
            &self.no_data_font,
            &crate::paint::BLACK,
            RectangleAnchor::Center,
            0.0,
        )
    }
}

/// The body of a chart.
pub trait Plot: LegendItemSource {
    fn plot_type(&self) -> PlotType;

    fn base(&self) -> &PlotBase;

    fn base_mut(&mut self) -> &mut PlotBase;

    fn notifier(&self) -> &Notifier {
        self.base().notifier()
    }

    /// Draw into `area`, recording plot/data areas in `info` and item entities
    /// in `entities` when given.
    fn draw(
        &mut self,
        canvas: &mut dyn Canvas,
        area: Rect,
        info: Option<&mut PlotRenderingInfo>,
        entities: Option<&mut EntityCollection>,
    ) -> ChartResult<()>;

    fn as_zoomable(&mut self) -> Option<&mut dyn Zoomable> {
        None
    }
}

/// Plots whose axes can be zoomed and panned.
///
/// Bounds and anchors are fractions of the current axis length, measured
/// from the axis minimum.
pub trait Zoomable {
    fn orientation(&self) -> PlotOrientation;

    fn is_domain_zoomable(&self) -> bool;

    fn is_range_zoomable(&self) -> bool;

    fn zoom_domain(&mut self, lower: f64, upper: f64);

    fn zoom_range(&mut self, lower: f64, upper: f64);

    fn pan_domain(&mut self, percent: f64);

    fn pan_range(&mut self, percent: f64);

    /// Scale about a point at `anchor` of the axis length; `factor < 1` zooms in.
    fn scale_domain(&mut self, factor: f64, anchor: f64);

    fn scale_range(&mut self, factor: f64, anchor: f64);

    fn restore_auto_bounds(&mut self);
}
