//! Titles: blocks that the chart places along an edge of its area.

mod composite;
mod legend;
mod text;

pub use composite::CompositeTitle;
pub use legend::LegendTitle;
pub use text::TextTitle;

use crate::block::{Block, BlockBase, BlockFrame, BlockParams, BlockResult, RectangleConstraint};
use crate::canvas::Canvas;
use crate::error::ChartResult;
use crate::event::{ChangeSource, Notifier};
use crate::geom::{
    HorizontalAlignment, Rect, RectangleEdge, RectangleInsets, Size2D, VerticalAlignment,
};
use crate::text::TextMeasurer;

/// State shared by every title kind.
#[derive(Debug, Clone)]
pub struct TitleBase {
    pub(crate) block: BlockBase,
    position: RectangleEdge,
    h_align: HorizontalAlignment,
    v_align: VerticalAlignment,
    visible: bool,
    notifier: Notifier,
}

impl TitleBase {
    pub const DEFAULT_PADDING: RectangleInsets = RectangleInsets::uniform(1.0);

    pub fn new(position: RectangleEdge, source: ChangeSource) -> Self {
        let mut block = BlockBase::new();
        block.insets.padding = Self::DEFAULT_PADDING;
        Self {
            block,
            position,
            h_align: HorizontalAlignment::Center,
            v_align: VerticalAlignment::Center,
            visible: true,
            notifier: Notifier::new(source),
        }
    }

    pub fn position(&self) -> RectangleEdge {
        self.position
    }

    pub fn set_position(&mut self, position: RectangleEdge) {
        if self.position != position {
            self.position = position;
            self.notifier.fire_change();
        }
    }

    pub fn horizontal_alignment(&self) -> HorizontalAlignment {
        self.h_align
    }

    pub fn set_horizontal_alignment(&mut self, align: HorizontalAlignment) {
        if self.h_align != align {
            self.h_align = align;
            self.notifier.fire_change();
        }
    }

    pub fn vertical_alignment(&self) -> VerticalAlignment {
        self.v_align
    }

    pub fn set_vertical_alignment(&mut self, align: VerticalAlignment) {
        if self.v_align != align {
            self.v_align = align;
            self.notifier.fire_change();
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        self.notifier.fire_change();
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn set_margin(&mut self, margin: RectangleInsets) {
        self.block.insets.margin = margin;
        self.notifier.fire_change();
    }

    pub fn set_frame(&mut self, frame: BlockFrame) {
        self.block.insets.frame = frame;
        self.notifier.fire_change();
    }

    pub fn set_padding(&mut self, padding: RectangleInsets) {
        self.block.insets.padding = padding;
        self.notifier.fire_change();
    }

    pub(crate) fn fire_change(&self) {
        self.notifier.fire_change();
    }
}

/// The title kinds a chart can hold.
#[derive(Debug, Clone)]
pub enum Title {
    Text(TextTitle),
    Legend(LegendTitle),
    Composite(CompositeTitle),
}

impl Title {
    pub fn title_base(&self) -> &TitleBase {
        match self {
            Title::Text(t) => t.title(),
            Title::Legend(t) => t.title(),
            Title::Composite(t) => t.title(),
        }
    }

    pub fn title_base_mut(&mut self) -> &mut TitleBase {
        match self {
            Title::Text(t) => t.title_mut(),
            Title::Legend(t) => t.title_mut(),
            Title::Composite(t) => t.title_mut(),
        }
    }

    pub fn position(&self) -> RectangleEdge {
        self.title_base().position()
    }

    pub fn horizontal_alignment(&self) -> HorizontalAlignment {
        self.title_base().horizontal_alignment()
    }

    pub fn vertical_alignment(&self) -> VerticalAlignment {
        self.title_base().vertical_alignment()
    }

    pub fn is_visible(&self) -> bool {
        self.title_base().is_visible()
    }

    pub fn notifier(&self) -> &Notifier {
        self.title_base().notifier()
    }

    /// Element name the chart groups this title's drawing under.
    pub fn element_id(&self) -> &'static str {
        match self {
            Title::Text(_) => "title",
            Title::Legend(_) => "legend",
            Title::Composite(_) => "composite_title",
        }
    }

    pub fn as_text(&self) -> Option<&TextTitle> {
        match self {
            Title::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut TextTitle> {
        match self {
            Title::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_legend(&self) -> Option<&LegendTitle> {
        match self {
            Title::Legend(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_legend_mut(&mut self) -> Option<&mut LegendTitle> {
        match self {
            Title::Legend(t) => Some(t),
            _ => None,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Block {
        match self {
            Title::Text(t) => t,
            Title::Legend(t) => t,
            Title::Composite(t) => t,
        }
    }
}

impl Block for Title {
    fn base(&self) -> &BlockBase {
        &self.title_base().block
    }

    fn base_mut(&mut self) -> &mut BlockBase {
        &mut self.title_base_mut().block
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

    fn set_margin(&mut self, margin: RectangleInsets) {
        self.title_base_mut().set_margin(margin);
    }

    fn set_frame(&mut self, frame: BlockFrame) {
        self.title_base_mut().set_frame(frame);
    }

    fn set_padding(&mut self, padding: RectangleInsets) {
        self.title_base_mut().set_padding(padding);
    }
}

impl From<TextTitle> for Title {
    fn from(t: TextTitle) -> Self {
        Title::Text(t)
    }
}

impl From<LegendTitle> for Title {
    fn from(t: LegendTitle) -> Self {
        Title::Legend(t)
    }
}

impl From<CompositeTitle> for Title {
    fn from(t: CompositeTitle) -> Self {
        Title::Composite(t)
    }
}
