use super::{AxisBase, TICK_LABEL_GAP};
use crate::canvas::Canvas;
use crate::entity::EntityCollection;
use crate::error::ChartResult;
use crate::geom::{Rect, RectangleEdge};
use crate::text::{TextMeasurer, truncate_to_width};

/// An axis of evenly spaced categories.
///
/// The length is split into a lower margin, an upper margin, the gaps between
/// categories (`category_margin` of the length, shared out evenly) and the
/// categories themselves.
#[derive(Debug, Clone)]
pub struct CategoryAxis {
    base: AxisBase,
    lower_margin: f64,
    upper_margin: f64,
    category_margin: f64,
}

impl CategoryAxis {
    pub fn new(label: Option<String>) -> Self {
        Self {
            base: AxisBase::new(label),
            lower_margin: 0.05,
            upper_margin: 0.05,
            category_margin: 0.2,
        }
    }

    pub fn base(&self) -> &AxisBase {
        &self.base
    }

    pub fn base_mut(&mut self) -> &mut AxisBase {
        &mut self.base
    }

    pub fn set_margins(&mut self, lower: f64, upper: f64) {
        self.lower_margin = lower;
        self.upper_margin = upper;
        self.base.fire_change();
    }

    pub fn set_category_margin(&mut self, margin: f64) {
        self.category_margin = margin;
        self.base.fire_change();
    }

    fn extent(area: &Rect, edge: RectangleEdge) -> (f64, f64) {
        if edge.is_top_or_bottom() {
            (area.min_x(), area.width)
        } else {
            (area.min_y(), area.height)
        }
    }

    pub fn category_size(&self, count: usize, area: &Rect, edge: RectangleEdge) -> f64 {
        if count == 0 {
            return 0.0;
        }
        let (_, len) = Self::extent(area, edge);
        let gaps = if count > 1 { self.category_margin } else { 0.0 };
        (len * (1.0 - self.lower_margin - self.upper_margin - gaps)).max(0.0) / count as f64
    }

    fn gap(&self, count: usize, area: &Rect, edge: RectangleEdge) -> f64 {
        if count > 1 {
            Self::extent(area, edge).1 * self.category_margin / (count - 1) as f64
        } else {
            0.0
        }
    }

    pub fn category_start(&self, index: usize, count: usize, area: &Rect, edge: RectangleEdge) -> f64 {
        let (start, len) = Self::extent(area, edge);
        start
            + len * self.lower_margin
            + index as f64 * (self.category_size(count, area, edge) + self.gap(count, area, edge))
    }

    pub fn category_middle(&self, index: usize, count: usize, area: &Rect, edge: RectangleEdge) -> f64 {
        self.category_start(index, count, area, edge) + self.category_size(count, area, edge) / 2.0
    }

    pub fn category_end(&self, index: usize, count: usize, area: &Rect, edge: RectangleEdge) -> f64 {
        self.category_start(index, count, area, edge) + self.category_size(count, area, edge)
    }

    /// Index of the category slot (gap included) containing `coord`.
    pub fn category_at(&self, coord: f64, count: usize, area: &Rect, edge: RectangleEdge) -> Option<usize> {
        (0..count).find(|i| {
            let half_gap = self.gap(count, area, edge) / 2.0;
            let s = self.category_start(*i, count, area, edge) - half_gap;
            let e = self.category_end(*i, count, area, edge) + half_gap;
            coord >= s && coord < e
        })
    }

    pub fn reserve_space(&self, m: &dyn TextMeasurer, keys: &[String], edge: RectangleEdge) -> f64 {
        if !self.base.is_visible() {
            return 0.0;
        }
        let font = &self.base.tick_label_font;
        let labels = if !self.base.tick_labels_visible || keys.is_empty() {
            0.0
        } else if edge.is_top_or_bottom() {
            m.line_height(font) + TICK_LABEL_GAP
        } else {
            keys.iter()
                .map(|k| m.text_width(k, font))
                .fold(0.0, f64::max)
                + TICK_LABEL_GAP * 2.0
        };
        self.base.tick_mark_outset() + labels + self.base.label_thickness(m)
    }

    /// Draw category labels at each category middle; horizontal labels are
    /// truncated to the category width.
    pub fn draw(
        &self,
        canvas: &mut dyn Canvas,
        data_area: &Rect,
        edge: RectangleEdge,
        keys: &[String],
        entities: Option<&mut EntityCollection>,
    ) -> ChartResult<()> {
        if !self.base.is_visible() {
            return Ok(());
        }
        self.base.draw_axis_line(canvas, data_area, edge)?;
        let count = keys.len();
        let width = self.category_size(count, data_area, edge) + self.gap(count, data_area, edge);
        for (i, key) in keys.iter().enumerate() {
            let pos = self.category_middle(i, count, data_area, edge);
            let label = if edge.is_top_or_bottom() {
                truncate_to_width(key, &self.base.tick_label_font, width, canvas.as_measurer())
            } else {
                key.clone()
            };
            self.base.draw_tick(canvas, data_area, edge, pos, &label)?;
        }
        let thickness = self.reserve_space(canvas.as_measurer(), keys, edge);
        let label_offset = thickness - self.base.label_thickness(canvas.as_measurer());
        self.base.draw_label(canvas, data_area, edge, label_offset)?;
        self.base.add_entity(entities, data_area, edge, thickness);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_split_the_length() {
        let axis = CategoryAxis::new(None);
        let area = Rect::new(0.0, 0.0, 1000.0, 100.0);
        let edge = RectangleEdge::Bottom;
        // 1000 * (1 - 0.05 - 0.05 - 0.2) / 4
        assert!((axis.category_size(4, &area, edge) - 175.0).abs() < 1e-9);
        assert!((axis.category_start(0, 4, &area, edge) - 50.0).abs() < 1e-9);
        assert!((axis.category_end(3, 4, &area, edge) - 950.0).abs() < 1e-9);
        assert_eq!(axis.category_at(520.0, 4, &area, edge), Some(2));
    }
}
