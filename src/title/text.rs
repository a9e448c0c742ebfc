use std::f64::consts::FRAC_PI_2;

use super::TitleBase;
use crate::block::{Block, BlockBase, BlockFrame, BlockParams, BlockResult, RectangleConstraint};
use crate::canvas::Canvas;
use crate::entity::{ChartEntity, EntityKind};
use crate::error::ChartResult;
use crate::event::ChangeSource;
use crate::geom::{
    HorizontalAlignment, Rect, RectangleAnchor, RectangleEdge, RectangleInsets, Shape, Size2D,
    VerticalAlignment,
};
use crate::paint::{BLACK, FontSpec, Paint};
use crate::text::{TextBlock, TextMeasurer};

/// A chart title or subtitle made of (possibly wrapped) text.
#[derive(Debug, Clone)]
pub struct TextTitle {
    title: TitleBase,
    text: String,
    font: FontSpec,
    paint: Paint,
    background: Option<Paint>,
    text_alignment: HorizontalAlignment,
    max_lines: Option<usize>,
    expand_to_fit_space: bool,
    tooltip: Option<String>,
    url: Option<String>,
    content: TextBlock,
}

impl TextTitle {
    pub fn default_font() -> FontSpec {
        FontSpec::sans(18.0).bold()
    }

    pub fn new(text: impl Into<String>) -> Self {
        Self::with_font(text, Self::default_font())
    }

    pub fn with_font(text: impl Into<String>, font: FontSpec) -> Self {
        Self {
            title: TitleBase::new(RectangleEdge::Top, ChangeSource::Title),
            text: text.into(),
            font,
            paint: BLACK,
            background: None,
            text_alignment: HorizontalAlignment::Center,
            max_lines: None,
            expand_to_fit_space: false,
            tooltip: None,
            url: None,
            content: TextBlock::new(),
        }
    }

    pub fn title(&self) -> &TitleBase {
        &self.title
    }

    pub fn title_mut(&mut self) -> &mut TitleBase {
        &mut self.title
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        if self.text != text {
            self.text = text;
            self.title.fire_change();
        }
    }

    pub fn font(&self) -> &FontSpec {
        &self.font
    }

    pub fn set_font(&mut self, font: FontSpec) {
        self.font = font;
        self.title.fire_change();
    }

    pub fn paint(&self) -> Paint {
        self.paint
    }

    pub fn set_paint(&mut self, paint: Paint) {
        self.paint = paint;
        self.title.fire_change();
    }

    pub fn background(&self) -> Option<Paint> {
        self.background
    }

    pub fn set_background(&mut self, paint: Option<Paint>) {
        self.background = paint;
        self.title.fire_change();
    }

    pub fn text_alignment(&self) -> HorizontalAlignment {
        self.text_alignment
    }

    /// Alignment of the lines relative to each other.
    pub fn set_text_alignment(&mut self, alignment: HorizontalAlignment) {
        self.text_alignment = alignment;
        self.title.fire_change();
    }

    pub fn max_lines(&self) -> Option<usize> {
        self.max_lines
    }

    pub fn set_max_lines(&mut self, max_lines: Option<usize>) {
        self.max_lines = max_lines;
        self.title.fire_change();
    }

    pub fn expand_to_fit_space(&self) -> bool {
        self.expand_to_fit_space
    }

    /// Take the full available length along the title's edge instead of the text width.
    pub fn set_expand_to_fit_space(&mut self, expand: bool) {
        self.expand_to_fit_space = expand;
        self.title.fire_change();
    }

    pub fn tooltip(&self) -> Option<&str> {
        self.tooltip.as_deref()
    }

    pub fn set_tooltip(&mut self, tooltip: Option<String>) {
        self.tooltip = tooltip;
        self.title.fire_change();
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn set_url(&mut self, url: Option<String>) {
        self.url = url;
        self.title.fire_change();
    }

    fn layout(&mut self, m: &dyn TextMeasurer, max_length: f64) {
        let mut content = TextBlock::create(
            &self.text,
            &self.font,
            self.paint,
            max_length,
            self.max_lines,
            m,
        );
        content.set_alignment(self.text_alignment);
        self.content = content;
    }

    fn draw_horizontal(&self, canvas: &mut dyn Canvas, area: &Rect) -> ChartResult<()> {
        let bottom = self.title.position() == RectangleEdge::Bottom;
        let (x, anchor) = match (self.title.horizontal_alignment(), bottom) {
            (HorizontalAlignment::Left, false) => (area.min_x(), RectangleAnchor::TopLeft),
            (HorizontalAlignment::Left, true) => (area.min_x(), RectangleAnchor::BottomLeft),
            (HorizontalAlignment::Center, false) => (area.center_x(), RectangleAnchor::Top),
            (HorizontalAlignment::Center, true) => (area.center_x(), RectangleAnchor::Bottom),
            (HorizontalAlignment::Right, false) => (area.max_x(), RectangleAnchor::TopRight),
            (HorizontalAlignment::Right, true) => (area.max_x(), RectangleAnchor::BottomRight),
        };
        let y = if bottom { area.max_y() } else { area.min_y() };
        self.content.draw(canvas, x, y, anchor, 0.0)
    }

    /// Text runs bottom-to-top on the left edge and top-to-bottom on the right.
    fn draw_vertical(&self, canvas: &mut dyn Canvas, area: &Rect) -> ChartResult<()> {
        let left = self.title.position() == RectangleEdge::Left;
        let angle = if left { -FRAC_PI_2 } else { FRAC_PI_2 };
        let (y, anchor) = match (self.title.vertical_alignment(), left) {
            (VerticalAlignment::Top, true) => (area.min_y(), RectangleAnchor::Right),
            (VerticalAlignment::Top, false) => (area.min_y(), RectangleAnchor::Left),
            (VerticalAlignment::Bottom, true) => (area.max_y(), RectangleAnchor::Left),
            (VerticalAlignment::Bottom, false) => (area.max_y(), RectangleAnchor::Right),
            (VerticalAlignment::Center, _) => (area.center_y(), RectangleAnchor::Center),
        };
        self.content.draw(canvas, area.center_x(), y, anchor, angle)
    }
}

impl Block for TextTitle {
    fn base(&self) -> &BlockBase {
        &self.title.block
    }

    fn base_mut(&mut self) -> &mut BlockBase {
        &mut self.title.block
    }

    fn arrange(&mut self, m: &dyn TextMeasurer, constraint: &RectangleConstraint) -> Size2D {
        let cc = self.title.block.insets.to_content_constraint(constraint);
        let vertical = self.title.position().is_left_or_right();
        let max_length = if vertical {
            cc.max_height()
        } else {
            cc.max_width()
        };
        self.layout(m, max_length);
        let dims = self.content.calculate_dimensions(m);
        let mut content = if vertical {
            Size2D::new(dims.height, dims.width)
        } else {
            dims
        };
        if self.expand_to_fit_space && max_length.is_finite() {
            if vertical {
                content.height = max_length;
            } else {
                content.width = max_length;
            }
        }
        if content.width <= 0.0 || content.height <= 0.0 {
            return Size2D::ZERO;
        }
        let total = self.title.block.insets.calculate_total(content);
        constraint.calculate_constrained_size(total)
    }

    fn draw(
        &mut self,
        canvas: &mut dyn Canvas,
        area: Rect,
        params: &BlockParams,
    ) -> ChartResult<BlockResult> {
        self.title.block.bounds = area;
        if area.is_empty() || self.text.is_empty() {
            return Ok(BlockResult::none());
        }
        let insets = self.title.block.insets;
        let outer = insets.trim_margin(&area);
        let mut result = BlockResult::for_params(params);
        if let Some(entities) = result.entities.as_mut() {
            entities.add(ChartEntity::new(
                Shape::Rect(outer),
                EntityKind::Title {
                    text: Some(self.text.clone()),
                },
                self.tooltip.clone(),
                self.url.clone(),
            ));
        }
        insets.frame.draw(canvas, &outer)?;
        let inner = insets.trim_border(&outer);
        if let Some(bg) = self.background
            && !inner.is_empty()
        {
            canvas.fill_shape(&Shape::Rect(inner), &bg)?;
        }
        let content = insets.trim_padding(&inner);
        if self.content.lines().is_empty() {
            let along = if self.title.position().is_left_or_right() {
                content.height
            } else {
                content.width
            };
            self.layout(canvas.as_measurer(), along);
        }
        if self.title.position().is_top_or_bottom() {
            self.draw_horizontal(canvas, &content)?;
        } else {
            self.draw_vertical(canvas, &content)?;
        }
        Ok(result)
    }

    fn set_margin(&mut self, margin: RectangleInsets) {
        self.title.set_margin(margin);
    }

    fn set_frame(&mut self, frame: BlockFrame) {
        self.title.set_frame(frame);
    }

    fn set_padding(&mut self, padding: RectangleInsets) {
        self.title.set_padding(padding);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Range;
    use crate::canvas::{DrawOp, RecordingCanvas};
    use crate::text::HeuristicTextMeasurer;

    #[test]
    fn empty_text_arranges_to_zero() {
        let mut t = TextTitle::new("");
        let size = t.arrange(&HeuristicTextMeasurer, &RectangleConstraint::NONE);
        assert_eq!(size, Size2D::ZERO);
    }

    #[test]
    fn vertical_title_swaps_dimensions() {
        let m = HeuristicTextMeasurer;
        let mut t = TextTitle::with_font("Revenue", FontSpec::sans(10.0));
        t.set_padding(RectangleInsets::ZERO);
        let horizontal = t.arrange(&m, &RectangleConstraint::NONE);
        t.title_mut().set_position(RectangleEdge::Left);
        let vertical = t.arrange(&m, &RectangleConstraint::NONE);
        assert_eq!(horizontal.width, vertical.height);
        assert_eq!(horizontal.height, vertical.width);
    }

    #[test]
    fn expand_fills_available_width() {
        let m = HeuristicTextMeasurer;
        let mut t = TextTitle::with_font("x", FontSpec::sans(10.0));
        t.set_expand_to_fit_space(true);
        let c = RectangleConstraint::ranged(
            Range::new(0.0, 300.0).unwrap(),
            Range::new(0.0, 100.0).unwrap(),
        );
        assert_eq!(t.arrange(&m, &c).width, 300.0);
    }

    #[test]
    fn left_title_rotates_text() {
        let mut t = TextTitle::with_font("Side", FontSpec::sans(10.0));
        t.title_mut().set_position(RectangleEdge::Left);
        let mut canvas = RecordingCanvas::new();
        t.draw(
            &mut canvas,
            Rect::new(0.0, 0.0, 14.0, 100.0),
            &BlockParams::with_entities(true),
        )
        .unwrap();
        let angle = canvas.ops().iter().find_map(|op| match op {
            DrawOp::Text { angle, .. } => Some(*angle),
            _ => None,
        });
        assert_eq!(angle, Some(-FRAC_PI_2));
    }
}
