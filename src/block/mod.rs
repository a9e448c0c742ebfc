//! Block layout.
//!
//! A block is one rectangular visual unit with three nested inset layers
//! (margin, frame, padding) around its content. Layout is two-phase:
//! [`Block::arrange`] negotiates a size against a [`RectangleConstraint`], then
//! [`Block::draw`] renders into a rectangle chosen by the parent.

mod arrangement;
mod basic;
mod constraint;
mod container;

pub use arrangement::{
    Arrangement, BorderArrangement, CenterArrangement, ColumnArrangement, FlowArrangement,
    GridArrangement,
};
pub use basic::{BlockNode, ColorBlock, EmptyBlock, LabelBlock, LegendGraphic};
pub use constraint::{LengthConstraintType, Range, RectangleConstraint};
pub use container::{BlockContainer, ContainedBlock, ItemEntity};

use crate::canvas::Canvas;
use crate::entity::EntityCollection;
use crate::error::ChartResult;
use crate::geom::{Rect, RectangleInsets, Shape, Size2D};
use crate::paint::{Paint, Stroke};
use crate::text::TextMeasurer;

/// The border layer of a block. Without a paint the insets still reserve space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockFrame {
    pub insets: RectangleInsets,
    pub paint: Option<Paint>,
}

impl BlockFrame {
    pub const NONE: BlockFrame = BlockFrame {
        insets: RectangleInsets::ZERO,
        paint: None,
    };

    /// A solid line border of uniform `width`.
    pub fn line(width: f64, paint: Paint) -> Self {
        Self {
            insets: RectangleInsets::uniform(width),
            paint: Some(paint),
        }
    }

    /// Paint the four inset strips inside `area`.
    pub fn draw(&self, canvas: &mut dyn Canvas, area: &Rect) -> ChartResult<()> {
        let Some(paint) = self.paint else {
            return Ok(());
        };
        if area.is_empty() {
            return Ok(());
        }
        let t = self.insets.calculate_top_inset(area.height);
        let b = self.insets.calculate_bottom_inset(area.height);
        let l = self.insets.calculate_left_inset(area.width);
        let r = self.insets.calculate_right_inset(area.width);
        let strips = [
            Rect::new(area.x, area.y, area.width, t),
            Rect::new(area.x, area.max_y() - b, area.width, b),
            Rect::new(area.x, area.y + t, l, area.height - t - b),
            Rect::new(area.max_x() - r, area.y + t, r, area.height - t - b),
        ];
        for s in strips.iter().filter(|s| !s.is_empty()) {
            canvas.fill_shape(&Shape::Rect(*s), &paint)?;
        }
        Ok(())
    }
}

impl Default for BlockFrame {
    fn default() -> Self {
        Self::NONE
    }
}

/// Margin, frame and padding, outermost first.
///
/// Trimming removes margin, then frame, then padding; extending adds them back
/// in reverse, so `calculate_total_width(trim_to_content_width(w)) == w`
/// whenever the trim did not clamp at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BlockInsets {
    pub margin: RectangleInsets,
    pub frame: BlockFrame,
    pub padding: RectangleInsets,
}

impl BlockInsets {
    pub fn trim_to_content_width(&self, total: f64) -> f64 {
        let w = self.margin.trim_width(total);
        let w = self.frame.insets.trim_width(w);
        self.padding.trim_width(w).max(0.0)
    }

    pub fn trim_to_content_height(&self, total: f64) -> f64 {
        let h = self.margin.trim_height(total);
        let h = self.frame.insets.trim_height(h);
        self.padding.trim_height(h).max(0.0)
    }

    pub fn calculate_total_width(&self, content: f64) -> f64 {
        let w = self.padding.extend_width(content);
        let w = self.frame.insets.extend_width(w);
        self.margin.extend_width(w)
    }

    pub fn calculate_total_height(&self, content: f64) -> f64 {
        let h = self.padding.extend_height(content);
        let h = self.frame.insets.extend_height(h);
        self.margin.extend_height(h)
    }

    pub fn calculate_total(&self, content: Size2D) -> Size2D {
        Size2D::new(
            self.calculate_total_width(content.width),
            self.calculate_total_height(content.height),
        )
    }

    pub fn trim_margin(&self, area: &Rect) -> Rect {
        self.margin.trim(area)
    }

    pub fn trim_border(&self, area: &Rect) -> Rect {
        self.frame.insets.trim(area)
    }

    pub fn trim_padding(&self, area: &Rect) -> Rect {
        self.padding.trim(area)
    }

    /// Content area: all three layers removed.
    pub fn trim_all(&self, area: &Rect) -> Rect {
        self.trim_padding(&self.trim_border(&self.trim_margin(area)))
    }

    /// The constraint the content sees, same types with every length trimmed.
    pub fn to_content_constraint(&self, c: &RectangleConstraint) -> RectangleConstraint {
        c.map_lengths(
            |w| self.trim_to_content_width(w),
            |h| self.trim_to_content_height(h),
        )
    }
}

/// State every block carries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockBase {
    pub id: Option<String>,
    pub insets: BlockInsets,
    /// Natural content width hint.
    pub width: f64,
    /// Natural content height hint.
    pub height: f64,
    /// Last resolved rectangle; stale until the next arrange/draw.
    pub bounds: Rect,
}

impl BlockBase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_size(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Natural size plus insets, resolved under `constraint`.
    pub fn arrange_natural(&self, constraint: &RectangleConstraint) -> Size2D {
        let base = Size2D::new(
            self.insets.calculate_total_width(self.width),
            self.insets.calculate_total_height(self.height),
        );
        constraint.calculate_constrained_size(base)
    }
}

/// Options passed to every draw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlockParams {
    pub generate_entities: bool,
}

impl BlockParams {
    pub fn with_entities(generate_entities: bool) -> Self {
        Self { generate_entities }
    }
}

/// What a draw hands back: entities when they were requested, otherwise `None`.
#[derive(Debug, Default)]
pub struct BlockResult {
    pub entities: Option<EntityCollection>,
}

impl BlockResult {
    pub fn none() -> Self {
        Self { entities: None }
    }

    pub fn with(entities: EntityCollection) -> Self {
        Self {
            entities: Some(entities),
        }
    }

    /// An empty collection when `params` ask for entities, else `None`.
    pub fn for_params(params: &BlockParams) -> Self {
        if params.generate_entities {
            Self::with(EntityCollection::new())
        } else {
            Self::none()
        }
    }
}

/// A rectangular unit that can size itself and draw.
pub trait Block {
    fn base(&self) -> &BlockBase;

    fn base_mut(&mut self) -> &mut BlockBase;

    /// Resolve a size under `constraint`. Children get bounds as a side effect.
    fn arrange(&mut self, m: &dyn TextMeasurer, constraint: &RectangleConstraint) -> Size2D;

    /// Draw into `area` (chart space). Draws nothing when `area` is empty.
    fn draw(
        &mut self,
        canvas: &mut dyn Canvas,
        area: Rect,
        params: &BlockParams,
    ) -> ChartResult<BlockResult>;

    fn id(&self) -> Option<&str> {
        self.base().id.as_deref()
    }

    fn bounds(&self) -> Rect {
        self.base().bounds
    }

    fn set_bounds(&mut self, bounds: Rect) {
        self.base_mut().bounds = bounds;
    }

    fn insets(&self) -> &BlockInsets {
        &self.base().insets
    }

    fn set_margin(&mut self, margin: RectangleInsets) {
        self.base_mut().insets.margin = margin;
    }

    fn set_frame(&mut self, frame: BlockFrame) {
        self.base_mut().insets.frame = frame;
    }

    fn set_padding(&mut self, padding: RectangleInsets) {
        self.base_mut().insets.padding = padding;
    }

    /// Draw the frame (if painted) inside the margin of `area`.
    fn draw_border(&self, canvas: &mut dyn Canvas, area: &Rect) -> ChartResult<()> {
        let insets = self.insets();
        insets.frame.draw(canvas, &insets.trim_margin(area))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn insets() -> BlockInsets {
        BlockInsets {
            margin: RectangleInsets::new(1.0, 2.0, 3.0, 4.0),
            frame: BlockFrame::line(1.5, crate::paint::BLACK),
            padding: RectangleInsets::new(5.0, 6.0, 7.0, 8.0),
        }
    }

    #[test]
    fn trim_extend_round_trip() {
        let ins = insets();
        for c in [0.0, 1.0, 57.5, 300.0] {
            let total = ins.calculate_total_width(c);
            assert!((ins.trim_to_content_width(total) - c).abs() < 1e-9);
            let total = ins.calculate_total_height(c);
            assert!((ins.trim_to_content_height(total) - c).abs() < 1e-9);
        }
    }

    #[test]
    fn trim_clamps_at_zero() {
        assert_eq!(insets().trim_to_content_width(3.0), 0.0);
    }

    #[test]
    fn content_constraint_keeps_types() {
        let ins = insets();
        let c = RectangleConstraint::NONE
            .to_range_width(Range::new(0.0, 100.0).unwrap())
            .to_fixed_height(50.0);
        let cc = ins.to_content_constraint(&c);
        assert_eq!(cc.width_type(), LengthConstraintType::Range);
        assert_eq!(cc.height_type(), LengthConstraintType::Fixed);
        assert_eq!(cc.width_range().map(|r| r.upper()), Some(100.0 - 6.0 - 3.0 - 14.0));
        assert_eq!(cc.height(), 50.0 - 4.0 - 3.0 - 12.0);
    }
}
