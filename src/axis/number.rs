use super::{AxisBase, TICK_LABEL_GAP, decimals_for, format_number};
use crate::block::Range;
use crate::canvas::Canvas;
use crate::entity::EntityCollection;
use crate::error::ChartResult;
use crate::geom::{Rect, RectangleEdge};
use crate::text::TextMeasurer;

/// Multipliers for "nice" tick sizes within each power of ten.
const NICE_STEPS: [f64; 4] = [1.0, 2.0, 2.5, 5.0];

/// Smallest value of the form `{1, 2, 2.5, 5} × 10^k` that is at least `raw`.
pub fn nice_tick_unit(raw: f64) -> f64 {
    if !raw.is_finite() || raw <= 0.0 {
        return 1.0;
    }
    let magnitude = 10f64.powf(raw.log10().floor());
    NICE_STEPS
        .iter()
        .map(|m| m * magnitude)
        .find(|u| *u >= raw * (1.0 - 1e-9))
        .unwrap_or(10.0 * magnitude)
}

#[derive(Debug, Clone, PartialEq)]
pub struct NumberTick {
    pub value: f64,
    pub label: String,
}

/// A linear numeric axis.
#[derive(Debug, Clone)]
pub struct NumberAxis {
    base: AxisBase,
    range: Range,
    auto_range: bool,
    auto_range_includes_zero: bool,
    lower_margin: f64,
    upper_margin: f64,
    tick_unit: Option<f64>,
    inverted: bool,
    locale: String,
    data_bounds: Option<Range>,
}

impl NumberAxis {
    pub const DEFAULT_MARGIN: f64 = 0.05;

    pub fn new(label: Option<String>) -> Self {
        Self {
            base: AxisBase::new(label),
            range: Range::up_to(1.0),
            auto_range: true,
            auto_range_includes_zero: true,
            lower_margin: Self::DEFAULT_MARGIN,
            upper_margin: Self::DEFAULT_MARGIN,
            tick_unit: None,
            inverted: false,
            locale: "en".to_string(),
            data_bounds: None,
        }
    }

    pub fn base(&self) -> &AxisBase {
        &self.base
    }

    pub fn base_mut(&mut self) -> &mut AxisBase {
        &mut self.base
    }

    pub fn range(&self) -> Range {
        self.range
    }

    /// Fix the visible range; turns auto-range off.
    pub fn set_range(&mut self, range: Range) {
        self.auto_range = false;
        self.range = range;
        self.base.fire_change();
    }

    pub fn is_auto_range(&self) -> bool {
        self.auto_range
    }

    pub fn set_auto_range(&mut self, auto: bool) {
        self.auto_range = auto;
        if auto {
            self.auto_adjust_range();
        }
        self.base.fire_change();
    }

    pub fn auto_range_includes_zero(&self) -> bool {
        self.auto_range_includes_zero
    }

    pub fn set_auto_range_includes_zero(&mut self, include: bool) {
        self.auto_range_includes_zero = include;
        if self.auto_range {
            self.auto_adjust_range();
        }
        self.base.fire_change();
    }

    pub fn set_margins(&mut self, lower: f64, upper: f64) {
        self.lower_margin = lower;
        self.upper_margin = upper;
        if self.auto_range {
            self.auto_adjust_range();
        }
        self.base.fire_change();
    }

    pub fn tick_unit(&self) -> Option<f64> {
        self.tick_unit
    }

    /// Fixed tick spacing; `None` selects one from the available length.
    pub fn set_tick_unit(&mut self, unit: Option<f64>) {
        self.tick_unit = unit.filter(|u| u.is_finite() && *u > 0.0);
        self.base.fire_change();
    }

    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    pub fn set_inverted(&mut self, inverted: bool) {
        self.inverted = inverted;
        self.base.fire_change();
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn set_locale(&mut self, tag: impl Into<String>) {
        self.locale = tag.into();
        self.base.fire_change();
    }

    /// Feed the current data bounds. Recomputes the range when auto-ranging;
    /// fires nothing, since it runs as part of a draw.
    pub fn configure(&mut self, data_bounds: Option<Range>) {
        self.data_bounds = data_bounds;
        if self.auto_range {
            self.auto_adjust_range();
        }
    }

    fn auto_adjust_range(&mut self) {
        let Some(data) = self.data_bounds else {
            self.range = Range::up_to(1.0);
            return;
        };
        let (mut lower, mut upper) = (data.lower(), data.upper());
        if upper - lower <= 0.0 && !self.auto_range_includes_zero {
            lower -= 1.0;
            upper += 1.0;
        }
        let len = upper - lower;
        if self.auto_range_includes_zero {
            upper = if upper <= 0.0 {
                0.0
            } else {
                upper + self.upper_margin * len
            };
            lower = if lower >= 0.0 {
                0.0
            } else {
                lower - self.lower_margin * len
            };
            if upper - lower <= 0.0 {
                upper = lower + 1.0;
            }
        } else {
            upper += self.upper_margin * len;
            lower -= self.lower_margin * len;
        }
        self.range = Range::new(lower, upper).unwrap_or_else(|_| Range::up_to(1.0));
    }

    fn length_along(area: &Rect, edge: RectangleEdge) -> f64 {
        if edge.is_top_or_bottom() {
            area.width
        } else {
            area.height
        }
    }

    /// Screen coordinate of `value` inside `area` for an axis on `edge`.
    pub fn value_to_screen(&self, value: f64, area: &Rect, edge: RectangleEdge) -> f64 {
        let len = self.range.length();
        let frac = if len > 0.0 {
            (value - self.range.lower()) / len
        } else {
            0.5
        };
        if edge.is_top_or_bottom() {
            if self.inverted {
                area.max_x() - frac * area.width
            } else {
                area.min_x() + frac * area.width
            }
        } else if self.inverted {
            area.min_y() + frac * area.height
        } else {
            area.max_y() - frac * area.height
        }
    }

    /// Inverse of [`value_to_screen`](Self::value_to_screen).
    pub fn screen_to_value(&self, coord: f64, area: &Rect, edge: RectangleEdge) -> f64 {
        let extent = Self::length_along(area, edge);
        if extent <= 0.0 {
            return self.range.central_value();
        }
        let frac = if edge.is_top_or_bottom() {
            if self.inverted {
                (area.max_x() - coord) / extent
            } else {
                (coord - area.min_x()) / extent
            }
        } else if self.inverted {
            (coord - area.min_y()) / extent
        } else {
            (area.max_y() - coord) / extent
        };
        self.range.lower() + frac * self.range.length()
    }

    /// Zoom to the part of the current range between two fractions of its length.
    pub fn zoom_range(&mut self, lower_pct: f64, upper_pct: f64) {
        let start = self.range.lower();
        let len = self.range.length();
        let (r0, r1) = if self.inverted {
            (start + len * (1.0 - upper_pct), start + len * (1.0 - lower_pct))
        } else {
            (start + len * lower_pct, start + len * upper_pct)
        };
        if r1 > r0 && r0.is_finite() && r1.is_finite() {
            if let Ok(r) = Range::new(r0, r1) {
                self.set_range(r);
            }
        }
    }

    /// Shift the range by a fraction of its length.
    pub fn pan(&mut self, percent: f64) {
        let r = self.range.shift(self.range.length() * percent);
        self.set_range(r);
    }

    /// Scale the range about `anchor`; a non-positive factor restores auto-range.
    pub fn resize_range(&mut self, factor: f64, anchor: f64) {
        if factor <= 0.0 || !factor.is_finite() {
            self.set_auto_range(true);
            return;
        }
        let left = anchor - self.range.lower();
        let right = self.range.upper() - anchor;
        if let Ok(r) = Range::new(anchor - left * factor, anchor + right * factor) {
            self.set_range(r);
        }
    }

    fn select_tick_unit(&self, m: &dyn TextMeasurer, extent: f64, edge: RectangleEdge) -> f64 {
        if let Some(unit) = self.tick_unit {
            return unit;
        }
        let len = self.range.length();
        if len <= 0.0 || extent <= 0.0 {
            return nice_tick_unit(len);
        }
        let font = &self.base.tick_label_font;
        let spacing = if edge.is_top_or_bottom() {
            let provisional = nice_tick_unit(len / 10.0);
            let d = decimals_for(provisional);
            let widest = [self.range.lower(), self.range.upper()]
                .iter()
                .map(|v| m.text_width(&format_number(*v, d, &self.locale), font))
                .fold(0.0, f64::max);
            widest + m.line_height(font)
        } else {
            m.line_height(font) * 2.0
        };
        let max_ticks = (extent / spacing).floor().max(1.0);
        nice_tick_unit(len / max_ticks)
    }

    /// Ticks that fit along `area` on `edge`, labelled for the axis locale.
    pub fn refresh_ticks(&self, m: &dyn TextMeasurer, area: &Rect, edge: RectangleEdge) -> Vec<NumberTick> {
        let unit = self.select_tick_unit(m, Self::length_along(area, edge), edge);
        let decimals = decimals_for(unit);
        let (lower, upper) = (self.range.lower(), self.range.upper());
        let eps = unit * 1e-9;
        let mut ticks = Vec::new();
        let mut v = (lower / unit).ceil() * unit;
        while v <= upper + eps && ticks.len() < 1000 {
            let value = if v.abs() < eps { 0.0 } else { v };
            ticks.push(NumberTick {
                value,
                label: format_number(value, decimals, &self.locale),
            });
            v += unit;
        }
        ticks
    }

    /// Thickness this axis needs beside a data area on `edge`.
    pub fn reserve_space(&self, m: &dyn TextMeasurer, plot_area: &Rect, edge: RectangleEdge) -> f64 {
        if !self.base.is_visible() {
            return 0.0;
        }
        let labels = if self.base.tick_labels_visible {
            let font = &self.base.tick_label_font;
            if edge.is_top_or_bottom() {
                m.line_height(font) + TICK_LABEL_GAP
            } else {
                self.refresh_ticks(m, plot_area, edge)
                    .iter()
                    .map(|t| m.text_width(&t.label, font))
                    .fold(0.0, f64::max)
                    + TICK_LABEL_GAP * 2.0
            }
        } else {
            0.0
        };
        self.base.tick_mark_outset() + labels + self.base.label_thickness(m)
    }

    /// Draw beside `data_area` and return the ticks used (for gridlines).
    pub fn draw(
        &self,
        canvas: &mut dyn Canvas,
        data_area: &Rect,
        edge: RectangleEdge,
        entities: Option<&mut EntityCollection>,
    ) -> ChartResult<Vec<NumberTick>> {
        let ticks = self.refresh_ticks(canvas.as_measurer(), data_area, edge);
        if !self.base.is_visible() {
            return Ok(ticks);
        }
        self.base.draw_axis_line(canvas, data_area, edge)?;
        for t in &ticks {
            let pos = self.value_to_screen(t.value, data_area, edge);
            self.base.draw_tick(canvas, data_area, edge, pos, &t.label)?;
        }
        let thickness = self.reserve_space(canvas.as_measurer(), data_area, edge);
        let label_offset = thickness - self.base.label_thickness(canvas.as_measurer());
        self.base.draw_label(canvas, data_area, edge, label_offset)?;
        self.base.add_entity(entities, data_area, edge, thickness);
        Ok(ticks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::HeuristicTextMeasurer;

    #[test]
    fn nice_units() {
        let cases = [(0.7, 1.0), (1.2, 2.0), (2.2, 2.5), (3.0, 5.0), (6.0, 10.0), (0.03, 0.05)];
        for (raw, want) in cases {
            assert!((nice_tick_unit(raw) - want).abs() < 1e-12, "{raw}");
        }
    }

    #[test]
    fn auto_range_includes_zero_and_margin() {
        let mut axis = NumberAxis::new(None);
        axis.configure(Range::new(10.0, 20.0).ok());
        assert_eq!(axis.range().lower(), 0.0);
        assert!((axis.range().upper() - 20.5).abs() < 1e-9);
    }

    #[test]
    fn screen_round_trip() {
        let mut axis = NumberAxis::new(None);
        axis.set_range(Range::new(-5.0, 15.0).unwrap());
        let area = Rect::new(40.0, 10.0, 300.0, 200.0);
        for edge in [RectangleEdge::Bottom, RectangleEdge::Left] {
            let s = axis.value_to_screen(7.5, &area, edge);
            assert!((axis.screen_to_value(s, &area, edge) - 7.5).abs() < 1e-9);
        }
        assert_eq!(axis.value_to_screen(-5.0, &area, RectangleEdge::Left), area.max_y());
    }

    #[test]
    fn zoom_then_pan() {
        let mut axis = NumberAxis::new(None);
        axis.set_range(Range::new(0.0, 100.0).unwrap());
        axis.zoom_range(0.25, 0.75);
        assert_eq!(axis.range(), Range::new(25.0, 75.0).unwrap());
        axis.pan(0.1);
        assert_eq!(axis.range(), Range::new(30.0, 80.0).unwrap());
        axis.resize_range(0.0, 0.0);
        assert!(axis.is_auto_range());
    }

    #[test]
    fn ticks_cover_range() {
        let mut axis = NumberAxis::new(None);
        axis.set_range(Range::new(0.0, 1000.0).unwrap());
        let ticks = axis.refresh_ticks(
            &HeuristicTextMeasurer,
            &Rect::new(0.0, 0.0, 100.0, 240.0),
            RectangleEdge::Left,
        );
        assert_eq!(ticks.first().map(|t| t.value), Some(0.0));
        assert_eq!(ticks.last().map(|t| t.label.as_str()), Some("1,000"));
    }
}
