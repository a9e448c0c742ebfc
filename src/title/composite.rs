use super::TitleBase;
use crate::block::{
    Block, BlockBase, BlockContainer, BlockFrame, BlockParams, BlockResult, RectangleConstraint,
};
use crate::canvas::Canvas;
use crate::error::ChartResult;
use crate::event::ChangeSource;
use crate::geom::{Rect, RectangleEdge, RectangleInsets, Shape, Size2D};
use crate::paint::Paint;
use crate::text::TextMeasurer;

/// Any block arrangement placed as a title.
#[derive(Debug, Clone)]
pub struct CompositeTitle {
    title: TitleBase,
    container: BlockContainer,
    background: Option<Paint>,
}

impl CompositeTitle {
    pub fn new(container: BlockContainer) -> Self {
        Self {
            title: TitleBase::new(RectangleEdge::Top, ChangeSource::Title),
            container,
            background: None,
        }
    }

    pub fn title(&self) -> &TitleBase {
        &self.title
    }

    pub fn title_mut(&mut self) -> &mut TitleBase {
        &mut self.title
    }

    pub fn container(&self) -> &BlockContainer {
        &self.container
    }

    pub fn container_mut(&mut self) -> &mut BlockContainer {
        &mut self.container
    }

    pub fn set_background(&mut self, paint: Option<Paint>) {
        self.background = paint;
        self.title.fire_change();
    }
}

impl Block for CompositeTitle {
    fn base(&self) -> &BlockBase {
        &self.title.block
    }

    fn base_mut(&mut self) -> &mut BlockBase {
        &mut self.title.block
    }

    fn arrange(&mut self, m: &dyn TextMeasurer, constraint: &RectangleConstraint) -> Size2D {
        let cc = self.title.block.insets.to_content_constraint(constraint);
        let content = self.container.arrange(m, &cc);
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
        if area.is_empty() {
            return Ok(BlockResult::none());
        }
        let insets = self.title.block.insets;
        let outer = insets.trim_margin(&area);
        insets.frame.draw(canvas, &outer)?;
        let inner = insets.trim_border(&outer);
        if let Some(bg) = self.background
            && !inner.is_empty()
        {
            canvas.fill_shape(&Shape::Rect(inner), &bg)?;
        }
        self.container
            .draw(canvas, insets.trim_padding(&inner), params)
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
