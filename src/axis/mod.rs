//! Axes: value-to-screen mapping, tick generation, and axis drawing.

mod category;
mod format;
mod number;

pub use category::CategoryAxis;
pub use format::{decimals_for, format_number, map_locale};
pub use number::{NumberAxis, NumberTick, nice_tick_unit};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::canvas::Canvas;
use crate::entity::{ChartEntity, EntityCollection, EntityKind};
use crate::error::{ChartError, ChartResult};
use crate::event::{ChangeSource, Notifier};
use crate::geom::{Point, Rect, RectangleAnchor, RectangleEdge, Shape};
use crate::paint::{BLACK, FontSpec, GRAY, Paint, Stroke};
use crate::plot::PlotOrientation;
use crate::text::TextMeasurer;

/// Gap between the data area and tick labels, after the tick mark.
pub(crate) const TICK_LABEL_GAP: f64 = 4.0;
/// Gap around the axis label.
pub(crate) const LABEL_GAP: f64 = 3.0;

/// Where an axis sits, independent of plot orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisLocation {
    TopOrLeft,
    TopOrRight,
    BottomOrLeft,
    BottomOrRight,
}

impl AxisLocation {
    /// Edge for a domain axis: along x in a vertical plot, along y otherwise.
    pub fn resolve_domain(self, orientation: PlotOrientation) -> RectangleEdge {
        match orientation {
            PlotOrientation::Vertical => self.top_or_bottom(),
            PlotOrientation::Horizontal => self.left_or_right(),
        }
    }

    pub fn resolve_range(self, orientation: PlotOrientation) -> RectangleEdge {
        match orientation {
            PlotOrientation::Vertical => self.left_or_right(),
            PlotOrientation::Horizontal => self.top_or_bottom(),
        }
    }

    fn top_or_bottom(self) -> RectangleEdge {
        match self {
            AxisLocation::TopOrLeft | AxisLocation::TopOrRight => RectangleEdge::Top,
            AxisLocation::BottomOrLeft | AxisLocation::BottomOrRight => RectangleEdge::Bottom,
        }
    }

    fn left_or_right(self) -> RectangleEdge {
        match self {
            AxisLocation::TopOrLeft | AxisLocation::BottomOrLeft => RectangleEdge::Left,
            AxisLocation::TopOrRight | AxisLocation::BottomOrRight => RectangleEdge::Right,
        }
    }

    pub fn opposite(self) -> AxisLocation {
        match self {
            AxisLocation::TopOrLeft => AxisLocation::BottomOrRight,
            AxisLocation::TopOrRight => AxisLocation::BottomOrLeft,
            AxisLocation::BottomOrLeft => AxisLocation::TopOrRight,
            AxisLocation::BottomOrRight => AxisLocation::TopOrLeft,
        }
    }
}

impl fmt::Display for AxisLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AxisLocation::TopOrLeft => "top_or_left",
            AxisLocation::TopOrRight => "top_or_right",
            AxisLocation::BottomOrLeft => "bottom_or_left",
            AxisLocation::BottomOrRight => "bottom_or_right",
        };
        f.write_str(s)
    }
}

impl FromStr for AxisLocation {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "top_or_left" => Ok(AxisLocation::TopOrLeft),
            "top_or_right" => Ok(AxisLocation::TopOrRight),
            "bottom_or_left" => Ok(AxisLocation::BottomOrLeft),
            "bottom_or_right" => Ok(AxisLocation::BottomOrRight),
            _ => Err(ChartError::UnknownEdge(s.to_string())),
        }
    }
}

/// Space reserved around a data area for axes.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AxisSpace {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl AxisSpace {
    pub fn add(&mut self, space: f64, edge: RectangleEdge) {
        match edge {
            RectangleEdge::Top => self.top += space,
            RectangleEdge::Bottom => self.bottom += space,
            RectangleEdge::Left => self.left += space,
            RectangleEdge::Right => self.right += space,
        }
    }

    pub fn ensure_at_least(&mut self, space: f64, edge: RectangleEdge) {
        let slot = match edge {
            RectangleEdge::Top => &mut self.top,
            RectangleEdge::Bottom => &mut self.bottom,
            RectangleEdge::Left => &mut self.left,
            RectangleEdge::Right => &mut self.right,
        };
        *slot = slot.max(space);
    }

    /// `area` minus the reserved space, clamped at zero size.
    pub fn shrink(&self, area: &Rect) -> Rect {
        Rect::new(
            area.x + self.left,
            area.y + self.top,
            (area.width - self.left - self.right).max(0.0),
            (area.height - self.top - self.bottom).max(0.0),
        )
    }
}

/// Appearance and label shared by all axes.
#[derive(Debug, Clone)]
pub struct AxisBase {
    label: Option<String>,
    pub(crate) label_font: FontSpec,
    pub(crate) label_paint: Paint,
    pub(crate) tick_label_font: FontSpec,
    pub(crate) tick_label_paint: Paint,
    pub(crate) tick_labels_visible: bool,
    pub(crate) tick_marks_visible: bool,
    pub(crate) tick_mark_length: f64,
    pub(crate) axis_line_visible: bool,
    pub(crate) axis_line_paint: Paint,
    visible: bool,
    notifier: Notifier,
}

impl AxisBase {
    pub fn new(label: Option<String>) -> Self {
        Self {
            label,
            label_font: FontSpec::sans(12.0),
            label_paint: BLACK,
            tick_label_font: FontSpec::sans(10.0),
            tick_label_paint: BLACK,
            tick_labels_visible: true,
            tick_marks_visible: true,
            tick_mark_length: 2.0,
            axis_line_visible: true,
            axis_line_paint: GRAY,
            visible: true,
            notifier: Notifier::new(ChangeSource::Axis),
        }
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn set_label(&mut self, label: Option<String>) {
        self.label = label;
        self.notifier.fire_change();
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        self.notifier.fire_change();
    }

    pub fn set_label_font(&mut self, font: FontSpec) {
        self.label_font = font;
        self.notifier.fire_change();
    }

    pub fn set_tick_label_font(&mut self, font: FontSpec) {
        self.tick_label_font = font;
        self.notifier.fire_change();
    }

    pub fn set_tick_labels_visible(&mut self, visible: bool) {
        self.tick_labels_visible = visible;
        self.notifier.fire_change();
    }

    pub fn set_tick_marks_visible(&mut self, visible: bool) {
        self.tick_marks_visible = visible;
        self.notifier.fire_change();
    }

    pub fn set_axis_line_visible(&mut self, visible: bool) {
        self.axis_line_visible = visible;
        self.notifier.fire_change();
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub(crate) fn fire_change(&self) {
        self.notifier.fire_change();
    }

    /// Thickness taken by the axis label, zero without one.
    pub(crate) fn label_thickness(&self, m: &dyn TextMeasurer) -> f64 {
        match self.label.as_deref() {
            Some(l) if !l.is_empty() => m.line_height(&self.label_font) + 2.0 * LABEL_GAP,
            _ => 0.0,
        }
    }

    pub(crate) fn tick_mark_outset(&self) -> f64 {
        if self.tick_marks_visible {
            self.tick_mark_length
        } else {
            0.0
        }
    }

    pub(crate) fn draw_axis_line(
        &self,
        canvas: &mut dyn Canvas,
        data_area: &Rect,
        edge: RectangleEdge,
    ) -> ChartResult<()> {
        if !self.axis_line_visible {
            return Ok(());
        }
        let (a, b) = match edge {
            RectangleEdge::Top => (
                Point::new(data_area.min_x(), data_area.min_y()),
                Point::new(data_area.max_x(), data_area.min_y()),
            ),
            RectangleEdge::Bottom => (
                Point::new(data_area.min_x(), data_area.max_y()),
                Point::new(data_area.max_x(), data_area.max_y()),
            ),
            RectangleEdge::Left => (
                Point::new(data_area.min_x(), data_area.min_y()),
                Point::new(data_area.min_x(), data_area.max_y()),
            ),
            RectangleEdge::Right => (
                Point::new(data_area.max_x(), data_area.min_y()),
                Point::new(data_area.max_x(), data_area.max_y()),
            ),
        };
        canvas.draw_line(a, b, &self.axis_line_paint, &Stroke::new(1.0))
    }

    /// Tick mark and tick label at `pos` along `edge`.
    pub(crate) fn draw_tick(
        &self,
        canvas: &mut dyn Canvas,
        data_area: &Rect,
        edge: RectangleEdge,
        pos: f64,
        label: &str,
    ) -> ChartResult<()> {
        let out = self.tick_mark_outset();
        let base = edge.coordinate(data_area);
        let (mark_from, mark_to, label_at, anchor) = match edge {
            RectangleEdge::Top => (
                Point::new(pos, base),
                Point::new(pos, base - out),
                Point::new(pos, base - out - TICK_LABEL_GAP / 2.0),
                RectangleAnchor::Bottom,
            ),
            RectangleEdge::Bottom => (
                Point::new(pos, base),
                Point::new(pos, base + out),
                Point::new(pos, base + out + TICK_LABEL_GAP / 2.0),
                RectangleAnchor::Top,
            ),
            RectangleEdge::Left => (
                Point::new(base, pos),
                Point::new(base - out, pos),
                Point::new(base - out - TICK_LABEL_GAP, pos),
                RectangleAnchor::Right,
            ),
            RectangleEdge::Right => (
                Point::new(base, pos),
                Point::new(base + out, pos),
                Point::new(base + out + TICK_LABEL_GAP, pos),
                RectangleAnchor::Left,
            ),
        };
        if self.tick_marks_visible {
            canvas.draw_line(mark_from, mark_to, &self.axis_line_paint, &Stroke::new(1.0))?;
        }
        if self.tick_labels_visible && !label.is_empty() {
            canvas.draw_text(
                label,
                label_at.x,
                label_at.y,
                &self.tick_label_font,
                &self.tick_label_paint,
                anchor,
                0.0,
            )?;
        }
        Ok(())
    }

    /// Axis label centred along `edge`, `offset` away from the data area.
    pub(crate) fn draw_label(
        &self,
        canvas: &mut dyn Canvas,
        data_area: &Rect,
        edge: RectangleEdge,
        offset: f64,
    ) -> ChartResult<()> {
        let Some(label) = self.label.as_deref().filter(|l| !l.is_empty()) else {
            return Ok(());
        };
        let base = edge.coordinate(data_area);
        let d = offset + LABEL_GAP;
        let (x, y, anchor, angle) = match edge {
            RectangleEdge::Top => (data_area.center_x(), base - d, RectangleAnchor::Bottom, 0.0),
            RectangleEdge::Bottom => (data_area.center_x(), base + d, RectangleAnchor::Top, 0.0),
            RectangleEdge::Left => (
                base - d,
                data_area.center_y(),
                RectangleAnchor::Bottom,
                -std::f64::consts::FRAC_PI_2,
            ),
            RectangleEdge::Right => (
                base + d,
                data_area.center_y(),
                RectangleAnchor::Bottom,
                std::f64::consts::FRAC_PI_2,
            ),
        };
        canvas.draw_text(label, x, y, &self.label_font, &self.label_paint, anchor, angle)
    }

    /// Entity over the strip of `thickness` beside `data_area` on `edge`.
    pub(crate) fn add_entity(
        &self,
        entities: Option<&mut EntityCollection>,
        data_area: &Rect,
        edge: RectangleEdge,
        thickness: f64,
    ) {
        let Some(entities) = entities else {
            return;
        };
        let strip = match edge {
            RectangleEdge::Top => Rect::new(data_area.x, data_area.y - thickness, data_area.width, thickness),
            RectangleEdge::Bottom => Rect::new(data_area.x, data_area.max_y(), data_area.width, thickness),
            RectangleEdge::Left => Rect::new(data_area.x - thickness, data_area.y, thickness, data_area.height),
            RectangleEdge::Right => Rect::new(data_area.max_x(), data_area.y, thickness, data_area.height),
        };
        if strip.is_empty() {
            return;
        }
        entities.add(ChartEntity::new(
            Shape::Rect(strip),
            EntityKind::Axis { edge },
            self.label.clone(),
            None,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locations_resolve_by_orientation() {
        let loc = AxisLocation::BottomOrLeft;
        assert_eq!(loc.resolve_domain(PlotOrientation::Vertical), RectangleEdge::Bottom);
        assert_eq!(loc.resolve_domain(PlotOrientation::Horizontal), RectangleEdge::Left);
        let loc = AxisLocation::TopOrLeft;
        assert_eq!(loc.resolve_range(PlotOrientation::Vertical), RectangleEdge::Left);
        assert_eq!(loc.resolve_range(PlotOrientation::Horizontal), RectangleEdge::Top);
    }

    #[test]
    fn unknown_location_is_rejected() {
        assert!(matches!(
            "middle".parse::<AxisLocation>(),
            Err(ChartError::UnknownEdge(_))
        ));
        assert_eq!("Top-Or-Right".parse::<AxisLocation>().unwrap(), AxisLocation::TopOrRight);
    }

    #[test]
    fn shrink_clamps() {
        let mut s = AxisSpace::default();
        s.add(30.0, RectangleEdge::Left);
        s.add(80.0, RectangleEdge::Right);
        let r = s.shrink(&Rect::new(0.0, 0.0, 100.0, 50.0));
        assert_eq!(r.width, 0.0);
        assert_eq!(r.x, 30.0);
    }
}
