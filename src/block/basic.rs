//! Leaf blocks and the tagged [`BlockNode`] that containers hold.

use super::{Block, BlockBase, BlockContainer, BlockParams, BlockResult, RectangleConstraint};
use crate::canvas::Canvas;
use crate::entity::{ChartEntity, EntityKind};
use crate::error::ChartResult;
use crate::geom::{Point, Rect, RectangleAnchor, Shape, Size2D};
use crate::paint::{BLACK, FontSpec, GRAY, MarkerShape, Paint, Stroke};
use crate::text::{TextBlock, TextMeasurer};

/// Occupies space, draws nothing.
#[derive(Debug, Clone, Default)]
pub struct EmptyBlock {
    base: BlockBase,
}

impl EmptyBlock {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            base: BlockBase::with_size(width, height),
        }
    }
}

impl Block for EmptyBlock {
    fn base(&self) -> &BlockBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BlockBase {
        &mut self.base
    }

    fn arrange(&mut self, _m: &dyn TextMeasurer, constraint: &RectangleConstraint) -> Size2D {
        self.base.arrange_natural(constraint)
    }

    fn draw(
        &mut self,
        canvas: &mut dyn Canvas,
        area: Rect,
        params: &BlockParams,
    ) -> ChartResult<BlockResult> {
        self.base.bounds = area;
        if area.is_empty() {
            return Ok(BlockResult::none());
        }
        self.draw_border(canvas, &area)?;
        Ok(BlockResult::for_params(params))
    }
}

/// A solid fill.
#[derive(Debug, Clone)]
pub struct ColorBlock {
    base: BlockBase,
    pub paint: Paint,
}

impl ColorBlock {
    pub fn new(paint: Paint, width: f64, height: f64) -> Self {
        Self {
            base: BlockBase::with_size(width, height),
            paint,
        }
    }
}

impl Block for ColorBlock {
    fn base(&self) -> &BlockBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BlockBase {
        &mut self.base
    }

    fn arrange(&mut self, _m: &dyn TextMeasurer, constraint: &RectangleConstraint) -> Size2D {
        self.base.arrange_natural(constraint)
    }

    fn draw(
        &mut self,
        canvas: &mut dyn Canvas,
        area: Rect,
        params: &BlockParams,
    ) -> ChartResult<BlockResult> {
        self.base.bounds = area;
        if area.is_empty() {
            return Ok(BlockResult::none());
        }
        self.draw_border(canvas, &area)?;
        let content = self.base.insets.trim_all(&area);
        if !content.is_empty() {
            canvas.fill_shape(&Shape::Rect(content), &self.paint)?;
        }
        Ok(BlockResult::for_params(params))
    }
}

/// A text label, wrapped to the width it is given.
#[derive(Debug, Clone)]
pub struct LabelBlock {
    base: BlockBase,
    text: String,
    font: FontSpec,
    paint: Paint,
    pub tooltip: Option<String>,
    pub url: Option<String>,
    /// Point of the content area the text is pinned to.
    pub content_anchor: RectangleAnchor,
    /// Point of the text block placed on `content_anchor`.
    pub text_anchor: RectangleAnchor,
    label: TextBlock,
}

impl LabelBlock {
    pub fn new(text: impl Into<String>, font: FontSpec, paint: Paint) -> Self {
        Self {
            base: BlockBase::new(),
            text: text.into(),
            font,
            paint,
            tooltip: None,
            url: None,
            content_anchor: RectangleAnchor::Center,
            text_anchor: RectangleAnchor::Center,
            label: TextBlock::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn font(&self) -> &FontSpec {
        &self.font
    }

    pub fn set_font(&mut self, font: FontSpec) {
        self.font = font;
    }

    pub fn set_paint(&mut self, paint: Paint) {
        self.paint = paint;
    }

    fn layout(&mut self, m: &dyn TextMeasurer, max_width: f64) {
        self.label = TextBlock::create(&self.text, &self.font, self.paint, max_width, None, m);
    }
}

impl Block for LabelBlock {
    fn base(&self) -> &BlockBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BlockBase {
        &mut self.base
    }

    fn arrange(&mut self, m: &dyn TextMeasurer, constraint: &RectangleConstraint) -> Size2D {
        let cc = self.base.insets.to_content_constraint(constraint);
        self.layout(m, cc.max_width());
        let content = self.label.calculate_dimensions(m);
        constraint.calculate_constrained_size(self.base.insets.calculate_total(content))
    }

    fn draw(
        &mut self,
        canvas: &mut dyn Canvas,
        area: Rect,
        params: &BlockParams,
    ) -> ChartResult<BlockResult> {
        self.base.bounds = area;
        if area.is_empty() {
            return Ok(BlockResult::none());
        }
        let outer = self.base.insets.trim_margin(&area);
        self.draw_border(canvas, &area)?;
        let content = self
            .base
            .insets
            .trim_padding(&self.base.insets.trim_border(&outer));
        if self.label.lines().is_empty() {
            self.layout(canvas.as_measurer(), f64::INFINITY);
        }
        let pt = self.content_anchor.coordinates(&content);
        self.label
            .draw(canvas, pt.x, pt.y, self.text_anchor, 0.0)?;

        let mut result = BlockResult::for_params(params);
        if let Some(entities) = result.entities.as_mut()
            && (self.tooltip.is_some() || self.url.is_some())
        {
            entities.add(ChartEntity::new(
                Shape::Rect(outer),
                EntityKind::Block {
                    id: self.base.id.clone(),
                },
                self.tooltip.clone(),
                self.url.clone(),
            ));
        }
        Ok(result)
    }
}

/// The swatch next to a legend label: optional line plus optional marker.
#[derive(Debug, Clone)]
pub struct LegendGraphic {
    base: BlockBase,
    pub shape: MarkerShape,
    /// Marker width and height.
    pub shape_size: f64,
    pub shape_visible: bool,
    pub shape_filled: bool,
    pub fill_paint: Paint,
    pub shape_outline_visible: bool,
    pub outline_paint: Paint,
    pub outline_stroke: Stroke,
    pub line_visible: bool,
    pub line_paint: Paint,
    pub line_stroke: Stroke,
    pub line_length: f64,
}

impl LegendGraphic {
    pub fn new(shape: MarkerShape, fill_paint: Paint) -> Self {
        Self {
            base: BlockBase::new(),
            shape,
            shape_size: 8.0,
            shape_visible: true,
            shape_filled: true,
            fill_paint,
            shape_outline_visible: false,
            outline_paint: GRAY,
            outline_stroke: Stroke::new(0.5),
            line_visible: false,
            line_paint: BLACK,
            line_stroke: Stroke::new(1.0),
            line_length: 16.0,
        }
    }

    fn natural_size(&self) -> Size2D {
        let mut w: f64 = 0.0;
        let mut h: f64 = 0.0;
        if self.shape_visible {
            w = w.max(self.shape_size);
            h = h.max(self.shape_size);
        }
        if self.line_visible {
            w = w.max(self.line_length);
            h = h.max(self.line_stroke.width);
        }
        Size2D::new(w, h)
    }
}

impl Block for LegendGraphic {
    fn base(&self) -> &BlockBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BlockBase {
        &mut self.base
    }

    fn arrange(&mut self, _m: &dyn TextMeasurer, constraint: &RectangleConstraint) -> Size2D {
        let total = self.base.insets.calculate_total(self.natural_size());
        constraint.calculate_constrained_size(total)
    }

    fn draw(
        &mut self,
        canvas: &mut dyn Canvas,
        area: Rect,
        params: &BlockParams,
    ) -> ChartResult<BlockResult> {
        self.base.bounds = area;
        if area.is_empty() {
            return Ok(BlockResult::none());
        }
        self.draw_border(canvas, &area)?;
        let content = self.base.insets.trim_all(&area);
        let c = Point::new(content.center_x(), content.center_y());
        if self.line_visible {
            let half = self.line_length.min(content.width) / 2.0;
            canvas.draw_line(
                Point::new(c.x - half, c.y),
                Point::new(c.x + half, c.y),
                &self.line_paint,
                &self.line_stroke,
            )?;
        }
        if self.shape_visible {
            let s = self.shape_size.min(content.width).min(content.height) / 2.0;
            let shape = self.shape.to_shape(c, s);
            if self.shape_filled {
                canvas.fill_shape(&shape, &self.fill_paint)?;
            }
            if self.shape_outline_visible {
                canvas.stroke_shape(&shape, &self.outline_paint, &self.outline_stroke)?;
            }
        }
        Ok(BlockResult::for_params(params))
    }
}

/// Any block a container can hold.
#[derive(Debug, Clone)]
pub enum BlockNode {
    Empty(EmptyBlock),
    Color(ColorBlock),
    Label(LabelBlock),
    Graphic(LegendGraphic),
    Container(BlockContainer),
}

impl BlockNode {
    fn inner(&self) -> &dyn Block {
        match self {
            BlockNode::Empty(b) => b,
            BlockNode::Color(b) => b,
            BlockNode::Label(b) => b,
            BlockNode::Graphic(b) => b,
            BlockNode::Container(b) => b,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Block {
        match self {
            BlockNode::Empty(b) => b,
            BlockNode::Color(b) => b,
            BlockNode::Label(b) => b,
            BlockNode::Graphic(b) => b,
            BlockNode::Container(b) => b,
        }
    }
}

impl Block for BlockNode {
    fn base(&self) -> &BlockBase {
        self.inner().base()
    }

    fn base_mut(&mut self) -> &mut BlockBase {
        self.inner_mut().base_mut()
    }

    fn arrange(&mut self, m: &dyn TextMeasurer, constraint: &RectangleConstraint) -> Size2D {
        self.inner_mut().arrange(m, constraint)
    }

    fn draw(
        &mut self,
        canvas: &mut dyn Canvas,
        area: Rect,
        params: &BlockParams,
    ) -> ChartResult<BlockResult> {
        self.inner_mut().draw(canvas, area, params)
    }
}

impl From<EmptyBlock> for BlockNode {
    fn from(b: EmptyBlock) -> Self {
        BlockNode::Empty(b)
    }
}

impl From<ColorBlock> for BlockNode {
    fn from(b: ColorBlock) -> Self {
        BlockNode::Color(b)
    }
}

impl From<LabelBlock> for BlockNode {
    fn from(b: LabelBlock) -> Self {
        BlockNode::Label(b)
    }
}

impl From<LegendGraphic> for BlockNode {
    fn from(b: LegendGraphic) -> Self {
        BlockNode::Graphic(b)
    }
}

impl From<BlockContainer> for BlockNode {
    fn from(b: BlockContainer) -> Self {
        BlockNode::Container(b)
    }
}
