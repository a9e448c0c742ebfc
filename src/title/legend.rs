use std::rc::Rc;

use super::TitleBase;
use crate::block::{
    Arrangement, Block, BlockBase, BlockContainer, BlockFrame, BlockNode, BlockParams,
    BlockResult, BorderArrangement, ColumnArrangement, ContainedBlock, FlowArrangement,
    ItemEntity, LabelBlock, LegendGraphic, RectangleConstraint,
};
use crate::canvas::Canvas;
use crate::entity::{ChartEntity, EntityKind};
use crate::error::ChartResult;
use crate::event::ChangeSource;
use crate::geom::{
    HorizontalAlignment, Rect, RectangleAnchor, RectangleEdge, RectangleInsets, Shape, Size2D,
    VerticalAlignment,
};
use crate::legend::{LegendItem, LegendItemSource, SortOrder};
use crate::paint::{BLACK, FontSpec, Paint};
use crate::text::TextMeasurer;

/// A title that lists the items reported by one or more [`LegendItemSource`]s.
///
/// Items are fetched again on every `arrange`, so the legend always reflects
/// the current state of its sources.
#[derive(Clone)]
pub struct LegendTitle {
    title: TitleBase,
    sources: Vec<Rc<dyn LegendItemSource>>,
    background: Option<Paint>,
    item_font: FontSpec,
    item_paint: Paint,
    item_label_padding: RectangleInsets,
    graphic_padding: RectangleInsets,
    graphic_edge: RectangleEdge,
    sort_order: SortOrder,
    h_layout: Rc<dyn Arrangement>,
    v_layout: Rc<dyn Arrangement>,
    item_layout: Rc<dyn Arrangement>,
    fetched: Vec<LegendItem>,
    items: BlockContainer,
    wrapper: Option<(BlockContainer, Option<RectangleEdge>)>,
}

impl std::fmt::Debug for LegendTitle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LegendTitle")
            .field("position", &self.title.position())
            .field("sources", &self.sources.len())
            .field("sort_order", &self.sort_order)
            .field("items", &self.fetched.len())
            .finish()
    }
}

impl LegendTitle {
    pub fn new(source: Rc<dyn LegendItemSource>) -> Self {
        let item_layout: Rc<dyn Arrangement> = Rc::new(BorderArrangement::new());
        Self {
            title: TitleBase::new(RectangleEdge::Bottom, ChangeSource::Legend),
            sources: vec![source],
            background: None,
            item_font: FontSpec::sans(12.0),
            item_paint: BLACK,
            item_label_padding: RectangleInsets::uniform(2.0),
            graphic_padding: RectangleInsets::uniform(2.0),
            graphic_edge: RectangleEdge::Left,
            sort_order: SortOrder::Ascending,
            h_layout: Rc::new(FlowArrangement::new(
                HorizontalAlignment::Center,
                VerticalAlignment::Center,
                10.0,
                2.0,
            )),
            v_layout: Rc::new(ColumnArrangement::default()),
            item_layout: item_layout.clone(),
            fetched: Vec::new(),
            items: BlockContainer::new(item_layout),
            wrapper: None,
        }
    }

    pub fn title(&self) -> &TitleBase {
        &self.title
    }

    pub fn title_mut(&mut self) -> &mut TitleBase {
        &mut self.title
    }

    pub fn sources(&self) -> &[Rc<dyn LegendItemSource>] {
        &self.sources
    }

    pub fn set_sources(&mut self, sources: Vec<Rc<dyn LegendItemSource>>) {
        self.sources = sources;
        self.title.fire_change();
    }

    pub fn add_source(&mut self, source: Rc<dyn LegendItemSource>) {
        self.sources.push(source);
        self.title.fire_change();
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    pub fn set_sort_order(&mut self, order: SortOrder) {
        if self.sort_order != order {
            self.sort_order = order;
            self.title.fire_change();
        }
    }

    pub fn background(&self) -> Option<Paint> {
        self.background
    }

    pub fn set_background(&mut self, paint: Option<Paint>) {
        self.background = paint;
        self.title.fire_change();
    }

    pub fn item_font(&self) -> &FontSpec {
        &self.item_font
    }

    pub fn set_item_font(&mut self, font: FontSpec) {
        self.item_font = font;
        self.title.fire_change();
    }

    pub fn set_item_paint(&mut self, paint: Paint) {
        self.item_paint = paint;
        self.title.fire_change();
    }

    pub fn set_item_label_padding(&mut self, padding: RectangleInsets) {
        self.item_label_padding = padding;
        self.title.fire_change();
    }

    pub fn graphic_edge(&self) -> RectangleEdge {
        self.graphic_edge
    }

    /// Side of each item's label on which its graphic sits.
    pub fn set_graphic_edge(&mut self, edge: RectangleEdge) {
        self.graphic_edge = edge;
        self.title.fire_change();
    }

    /// Layout used when the legend sits at the top or bottom.
    pub fn set_horizontal_layout(&mut self, layout: Rc<dyn Arrangement>) {
        self.h_layout = layout;
        self.title.fire_change();
    }

    /// Layout used when the legend sits at the left or right.
    pub fn set_vertical_layout(&mut self, layout: Rc<dyn Arrangement>) {
        self.v_layout = layout;
        self.title.fire_change();
    }

    /// Nest the items container inside `wrapper` (under `key`) for layout and drawing.
    pub fn set_wrapper(&mut self, wrapper: Option<BlockContainer>, key: Option<RectangleEdge>) {
        self.wrapper = wrapper.map(|w| (w, key));
        self.title.fire_change();
    }

    /// Items found by the last `arrange`, in display order.
    pub fn items(&self) -> &[LegendItem] {
        &self.fetched
    }

    pub fn item_container(&self) -> &BlockContainer {
        &self.items
    }

    /// Re-query every source. Returns false, leaving the container alone, when
    /// there is nothing to show.
    fn fetch_legend_items(&mut self) -> bool {
        self.fetched.clear();
        let descending = self.sort_order == SortOrder::Descending;
        let ordered: Box<dyn Iterator<Item = &Rc<dyn LegendItemSource>>> = if descending {
            Box::new(self.sources.iter().rev())
        } else {
            Box::new(self.sources.iter())
        };
        for source in ordered {
            let mut found: Vec<LegendItem> = source.legend_items().into_iter().collect();
            if descending {
                found.reverse();
            }
            self.fetched.extend(found);
        }
        if self.fetched.is_empty() {
            return false;
        }

        self.items.clear();
        let layout = if self.title.position().is_top_or_bottom() {
            self.h_layout.clone()
        } else {
            self.v_layout.clone()
        };
        self.items.set_arrangement(layout);
        for item in &self.fetched {
            let block = self.create_item_block(item);
            self.items.add(block);
        }
        log::debug!("legend fetched {} items", self.fetched.len());
        true
    }

    fn create_item_block(&self, item: &LegendItem) -> BlockContainer {
        let mut graphic = LegendGraphic::new(item.shape, item.fill_paint);
        graphic.shape_visible = item.shape_visible;
        graphic.shape_filled = item.shape_filled;
        graphic.shape_outline_visible = item.shape_outline_visible;
        graphic.outline_paint = item.outline_paint;
        graphic.outline_stroke = item.outline_stroke;
        graphic.line_visible = item.line_visible;
        graphic.line_paint = item.line_paint;
        graphic.line_stroke = item.line_stroke;
        graphic.set_padding(self.graphic_padding);

        let mut label = LabelBlock::new(item.label.clone(), self.item_font.clone(), self.item_paint);
        label.set_padding(self.item_label_padding);
        label.content_anchor = RectangleAnchor::Left;
        label.text_anchor = RectangleAnchor::Left;

        let mut block = BlockContainer::new(self.item_layout.clone());
        block.add_with_key(graphic, self.graphic_edge);
        block.add(label);
        block.set_entity(Some(ItemEntity {
            kind: EntityKind::LegendItem {
                series_key: item.series_key.clone(),
                series_index: item.series_index,
                dataset_index: item.dataset_index,
            },
            tooltip: item.tooltip.clone(),
            url: item.url.clone(),
        }));
        block
    }

    /// Run `f` on the outermost container: the wrapper holding the items when
    /// one is set, otherwise the items themselves.
    fn with_outer_container<R>(&mut self, f: impl FnOnce(&mut BlockContainer) -> R) -> R {
        match self.wrapper.as_mut() {
            None => f(&mut self.items),
            Some((wrapper, key)) => {
                let items =
                    std::mem::replace(&mut self.items, BlockContainer::new(self.item_layout.clone()));
                match key {
                    Some(k) => wrapper.add_with_key(items, *k),
                    None => wrapper.add(items),
                }
                let out = f(wrapper);
                if let Some(ContainedBlock {
                    block: BlockNode::Container(items),
                    ..
                }) = wrapper.take_last()
                {
                    self.items = items;
                }
                out
            }
        }
    }
}

impl Block for LegendTitle {
    fn base(&self) -> &BlockBase {
        &self.title.block
    }

    fn base_mut(&mut self) -> &mut BlockBase {
        &mut self.title.block
    }

    fn arrange(&mut self, m: &dyn TextMeasurer, constraint: &RectangleConstraint) -> Size2D {
        if !self.fetch_legend_items() {
            return Size2D::ZERO;
        }
        let cc = self.title.block.insets.to_content_constraint(constraint);
        let content = self.with_outer_container(|c| c.arrange(m, &cc));
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
        if area.is_empty() || self.fetched.is_empty() {
            return Ok(BlockResult::none());
        }
        let mut result = BlockResult::for_params(params);
        if let Some(entities) = result.entities.as_mut() {
            entities.add(ChartEntity::rect(area, EntityKind::Title { text: None }));
        }
        let insets = self.title.block.insets;
        let target = insets.trim_margin(&area);
        if let Some(bg) = self.background
            && !target.is_empty()
        {
            canvas.fill_shape(&Shape::Rect(target), &bg)?;
        }
        insets.frame.draw(canvas, &target)?;
        let target = insets.trim_padding(&insets.trim_border(&target));
        let drawn = self.with_outer_container(|c| c.draw(canvas, target, params))?;
        if let (Some(all), Some(found)) = (result.entities.as_mut(), drawn.entities) {
            all.add_all(found);
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
    use crate::canvas::RecordingCanvas;
    use crate::legend::LegendItemCollection;
    use crate::paint::office_color;
    use crate::text::HeuristicTextMeasurer;

    fn source(labels: &[&str]) -> Rc<dyn LegendItemSource> {
        Rc::new(
            labels
                .iter()
                .enumerate()
                .map(|(i, l)| LegendItem::new(*l, office_color(i)).with_series(*l, i))
                .collect::<LegendItemCollection>(),
        )
    }

    #[test]
    fn wrapper_keeps_items_after_arrange() {
        let mut legend = LegendTitle::new(source(&["A", "B"]));
        legend.set_wrapper(
            Some(BlockContainer::with_arrangement(BorderArrangement::new())),
            None,
        );
        let size = legend.arrange(&HeuristicTextMeasurer, &RectangleConstraint::NONE);
        assert!(size.width > 0.0 && size.height > 0.0);
        assert_eq!(legend.item_container().len(), 2);
    }

    #[test]
    fn draw_reports_one_entity_per_item() {
        let mut legend = LegendTitle::new(source(&["A", "B", "C"]));
        let m = HeuristicTextMeasurer;
        let size = legend.arrange(&m, &RectangleConstraint::NONE);
        let mut canvas = RecordingCanvas::new();
        let result = legend
            .draw(
                &mut canvas,
                Rect::new(0.0, 0.0, size.width, size.height),
                &BlockParams::with_entities(true),
            )
            .unwrap();
        let entities = result.entities.unwrap();
        let items = entities
            .filter(|k| matches!(k, EntityKind::LegendItem { .. }))
            .count();
        assert_eq!(items, 3);
    }
}
