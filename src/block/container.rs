use std::rc::Rc;

use super::{
    Arrangement, Block, BlockBase, BlockNode, BlockParams, BlockResult, RectangleConstraint,
};
use crate::canvas::Canvas;
use crate::entity::{ChartEntity, EntityKind};
use crate::error::ChartResult;
use crate::geom::{Rect, RectangleEdge, Shape, Size2D};
use crate::paint::Paint;
use crate::text::TextMeasurer;

/// A child plus the slot key the arrangement may use (border layouts read it;
/// `None` is the center slot).
#[derive(Debug, Clone)]
pub struct ContainedBlock {
    pub key: Option<RectangleEdge>,
    pub block: BlockNode,
}

/// Entity a container reports for its own area, ahead of its children's.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemEntity {
    pub kind: EntityKind,
    pub tooltip: Option<String>,
    pub url: Option<String>,
}

/// A block made of child blocks placed by a shared [`Arrangement`].
///
/// Child bounds are relative to this container's content origin, both after
/// `arrange` and after `draw`.
#[derive(Debug, Clone)]
pub struct BlockContainer {
    base: BlockBase,
    arrangement: Rc<dyn Arrangement>,
    children: Vec<ContainedBlock>,
    pub background: Option<Paint>,
    entity: Option<ItemEntity>,
}

impl BlockContainer {
    pub fn new(arrangement: Rc<dyn Arrangement>) -> Self {
        Self {
            base: BlockBase::new(),
            arrangement,
            children: Vec::new(),
            background: None,
            entity: None,
        }
    }

    pub fn with_arrangement<A: Arrangement + 'static>(arrangement: A) -> Self {
        Self::new(Rc::new(arrangement))
    }

    pub fn arrangement(&self) -> &Rc<dyn Arrangement> {
        &self.arrangement
    }

    /// Swap the layout algorithm; children are untouched.
    pub fn set_arrangement(&mut self, arrangement: Rc<dyn Arrangement>) {
        self.arrangement = arrangement;
    }

    pub fn add(&mut self, block: impl Into<BlockNode>) {
        self.children.push(ContainedBlock {
            key: None,
            block: block.into(),
        });
    }

    pub fn add_with_key(&mut self, block: impl Into<BlockNode>, key: RectangleEdge) {
        self.children.push(ContainedBlock {
            key: Some(key),
            block: block.into(),
        });
    }

    pub fn children(&self) -> &[ContainedBlock] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut [ContainedBlock] {
        &mut self.children
    }

    pub(crate) fn take_last(&mut self) -> Option<ContainedBlock> {
        self.children.pop()
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn clear(&mut self) {
        self.children.clear();
    }

    pub fn entity(&self) -> Option<&ItemEntity> {
        self.entity.as_ref()
    }

    pub fn set_entity(&mut self, entity: Option<ItemEntity>) {
        self.entity = entity;
    }
}

impl Block for BlockContainer {
    fn base(&self) -> &BlockBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BlockBase {
        &mut self.base
    }

    fn arrange(&mut self, m: &dyn TextMeasurer, constraint: &RectangleConstraint) -> Size2D {
        let content = self.base.insets.to_content_constraint(constraint);
        let size = self.arrangement.arrange(&mut self.children, m, &content);
        constraint.calculate_constrained_size(self.base.insets.calculate_total(size))
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
        let id = self.entity.as_ref().map(|e| e.kind.element_id());
        if let Some(id) = id {
            canvas.begin_element(id);
        }
        let drawn = self.draw_content(canvas, area, params);
        if id.is_some() {
            canvas.end_element();
        }
        drawn
    }
}

impl BlockContainer {
    fn draw_content(
        &mut self,
        canvas: &mut dyn Canvas,
        area: Rect,
        params: &BlockParams,
    ) -> ChartResult<BlockResult> {
        let outer = self.base.insets.trim_margin(&area);
        self.draw_border(canvas, &area)?;
        let inner = self.base.insets.trim_border(&outer);
        if let Some(bg) = self.background
            && !inner.is_empty()
        {
            canvas.fill_shape(&Shape::Rect(inner), &bg)?;
        }
        let content = self.base.insets.trim_padding(&inner);

        let mut result = BlockResult::for_params(params);
        if let (Some(entities), Some(e)) = (result.entities.as_mut(), &self.entity) {
            entities.add(ChartEntity::new(
                Shape::Rect(outer),
                e.kind.clone(),
                e.tooltip.clone(),
                e.url.clone(),
            ));
        }
        for child in self.children.iter_mut() {
            let rel = child.block.bounds();
            let target = rel.translate(content.x, content.y);
            if target.is_empty() {
                continue;
            }
            let drawn = child.block.draw(canvas, target, params)?;
            child.block.set_bounds(rel);
            if let (Some(all), Some(found)) = (result.entities.as_mut(), drawn.entities) {
                all.add_all(found);
            }
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{ColumnArrangement, EmptyBlock, FlowArrangement};
    use crate::text::HeuristicTextMeasurer;

    #[test]
    fn swapping_arrangement_keeps_children() {
        let mut c = BlockContainer::with_arrangement(ColumnArrangement::default());
        c.add(EmptyBlock::new(10.0, 5.0));
        c.add(EmptyBlock::new(20.0, 5.0));
        let m = HeuristicTextMeasurer;
        assert_eq!(
            c.arrange(&m, &RectangleConstraint::NONE),
            Size2D::new(20.0, 10.0)
        );
        c.set_arrangement(Rc::new(FlowArrangement::default()));
        assert_eq!(c.len(), 2);
        assert_eq!(
            c.arrange(&m, &RectangleConstraint::NONE),
            Size2D::new(32.0, 5.0)
        );
    }
}
