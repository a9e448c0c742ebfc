//! The chart: a main title, subtitles (the legend among them) and a plot,
//! laid out top-down inside one area on every draw.

use std::cell::RefCell;
use std::rc::Rc;

use crate::block::{Block, BlockFrame, BlockParams, BlockResult, Range, RectangleConstraint};
use crate::canvas::Canvas;
use crate::entity::{ChartEntity, ChartRenderingInfo, EntityKind};
use crate::error::{ChartError, ChartResult};
use crate::event::{
    ChangeEvent, ChangeSource, ChartProgressEvent, ListenerId, ListenerList, Notifier,
};
use crate::geom::{
    HorizontalAlignment, Rect, RectangleEdge, RectangleInsets, Shape, VerticalAlignment,
    create_aligned_rectangle,
};
use crate::legend::{LegendItemSource, SharedSource};
use crate::paint::{Paint, WHITE};
use crate::plot::Plot;
use crate::title::{LegendTitle, TextTitle, Title};

pub type SharedPlot = Rc<RefCell<dyn Plot>>;

/// A complete chart.
///
/// Every change to the title, a subtitle, the plot (and through it the axes,
/// renderer and dataset) is forwarded to the chart's own [`Notifier`], so one
/// listener on the chart hears about anything that needs a redraw.
///
/// Charts are not `Clone`: the plot is shared by handle and its listeners are
/// wired to this chart.
pub struct Chart {
    notifier: Notifier,
    progress: ListenerList<ChartProgressEvent>,
    title: Option<TextTitle>,
    subtitles: Vec<(Title, ListenerId)>,
    plot: SharedPlot,
    plot_listener: ListenerId,
    background: Option<Paint>,
    border: BlockFrame,
    padding: RectangleInsets,
}

impl std::fmt::Debug for Chart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chart")
            .field("title", &self.title.as_ref().map(TextTitle::text))
            .field("subtitles", &self.subtitles.len())
            .field("padding", &self.padding)
            .finish_non_exhaustive()
    }
}

impl Chart {
    pub const DEFAULT_PADDING: RectangleInsets = RectangleInsets::uniform(5.0);

    /// A chart around `plot`, with an optional main title and, if asked, a
    /// legend listing the plot's series at the bottom.
    pub fn new(title: Option<&str>, plot: SharedPlot, create_legend: bool) -> Self {
        let notifier = Notifier::new(ChangeSource::Chart);
        let plot_listener = notifier.forward_from(plot.borrow().notifier());
        let mut chart = Self {
            notifier,
            progress: ListenerList::default(),
            title: None,
            subtitles: Vec::new(),
            plot,
            plot_listener,
            background: Some(WHITE),
            border: BlockFrame::NONE,
            padding: Self::DEFAULT_PADDING,
        };
        if let Some(text) = title {
            let t = TextTitle::new(text);
            chart.notifier.forward_from(t.title().notifier());
            chart.title = Some(t);
        }
        if create_legend {
            let source: Rc<dyn LegendItemSource> = Rc::new(SharedSource(chart.plot.clone()));
            chart.push_subtitle(LegendTitle::new(source).into());
        }
        chart
    }

    /// Wrap a concrete plot.
    pub fn from_plot<P: Plot + 'static>(title: Option<&str>, plot: P, create_legend: bool) -> Self {
        let shared: SharedPlot = Rc::new(RefCell::new(plot));
        Self::new(title, shared, create_legend)
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn add_change_listener(&self, f: impl Fn(&ChangeEvent) + 'static) -> ListenerId {
        self.notifier.add_listener(f)
    }

    pub fn remove_change_listener(&self, id: ListenerId) -> bool {
        self.notifier.remove_listener(id)
    }

    pub fn add_progress_listener(&self, f: impl Fn(&ChartProgressEvent) + 'static) -> ListenerId {
        self.progress.add(f)
    }

    pub fn remove_progress_listener(&self, id: ListenerId) -> bool {
        self.progress.remove(id)
    }

    /// Suppress change events; re-enabling fires a single one.
    pub fn set_notify(&self, notify: bool) {
        self.notifier.set_notify(notify);
    }

    pub fn fire_change(&self) {
        self.notifier.fire_change();
    }

    pub fn title(&self) -> Option<&TextTitle> {
        self.title.as_ref()
    }

    pub fn title_mut(&mut self) -> Option<&mut TextTitle> {
        self.title.as_mut()
    }

    pub fn set_title(&mut self, title: Option<TextTitle>) {
        if let Some(t) = title.as_ref() {
            self.notifier.forward_from(t.title().notifier());
        }
        self.title = title;
        self.notifier.fire_change();
    }

    pub fn subtitle_count(&self) -> usize {
        self.subtitles.len()
    }

    pub fn subtitles(&self) -> impl Iterator<Item = &Title> {
        self.subtitles.iter().map(|(t, _)| t)
    }

    pub fn subtitle(&self, index: usize) -> ChartResult<&Title> {
        let len = self.subtitles.len();
        self.subtitles
            .get(index)
            .map(|(t, _)| t)
            .ok_or(ChartError::IndexOutOfBounds { index, len })
    }

    pub fn subtitle_mut(&mut self, index: usize) -> ChartResult<&mut Title> {
        let len = self.subtitles.len();
        self.subtitles
            .get_mut(index)
            .map(|(t, _)| t)
            .ok_or(ChartError::IndexOutOfBounds { index, len })
    }

    fn push_subtitle(&mut self, title: Title) {
        let id = self.notifier.forward_from(title.notifier());
        self.subtitles.push((title, id));
    }

    pub fn add_subtitle(&mut self, title: impl Into<Title>) {
        self.push_subtitle(title.into());
        self.notifier.fire_change();
    }

    pub fn insert_subtitle(&mut self, index: usize, title: impl Into<Title>) -> ChartResult<()> {
        let len = self.subtitles.len();
        if index > len {
            return Err(ChartError::IndexOutOfBounds { index, len });
        }
        let title = title.into();
        let id = self.notifier.forward_from(title.notifier());
        self.subtitles.insert(index, (title, id));
        self.notifier.fire_change();
        Ok(())
    }

    /// Detach a subtitle; it stops forwarding changes to this chart.
    pub fn remove_subtitle(&mut self, index: usize) -> ChartResult<Title> {
        let len = self.subtitles.len();
        if index >= len {
            return Err(ChartError::IndexOutOfBounds { index, len });
        }
        let (title, id) = self.subtitles.remove(index);
        title.notifier().remove_listener(id);
        self.notifier.fire_change();
        Ok(title)
    }

    pub fn clear_subtitles(&mut self) {
        for (title, id) in self.subtitles.drain(..) {
            title.notifier().remove_listener(id);
        }
        self.notifier.fire_change();
    }

    /// Replace all subtitles, firing one change for the whole batch.
    pub fn set_subtitles(&mut self, titles: Vec<Title>) {
        let was = self.notifier.is_notify();
        self.notifier.set_notify(false);
        self.clear_subtitles();
        for t in titles {
            self.add_subtitle(t);
        }
        if was {
            self.notifier.set_notify(true);
        }
    }

    /// The first legend among the subtitles.
    pub fn legend(&self) -> Option<&LegendTitle> {
        self.subtitles.iter().find_map(|(t, _)| t.as_legend())
    }

    pub fn legend_mut(&mut self) -> Option<&mut LegendTitle> {
        self.subtitles.iter_mut().find_map(|(t, _)| t.as_legend_mut())
    }

    pub fn plot(&self) -> &SharedPlot {
        &self.plot
    }

    pub fn background(&self) -> Option<Paint> {
        self.background
    }

    pub fn set_background(&mut self, paint: Option<Paint>) {
        self.background = paint;
        self.notifier.fire_change();
    }

    pub fn border(&self) -> BlockFrame {
        self.border
    }

    pub fn set_border(&mut self, border: BlockFrame) {
        self.border = border;
        self.notifier.fire_change();
    }

    pub fn padding(&self) -> RectangleInsets {
        self.padding
    }

    pub fn set_padding(&mut self, padding: RectangleInsets) {
        self.padding = padding;
        self.notifier.fire_change();
    }

    /// Arrange and draw `title` against one edge of `area`, then shrink `area`
    /// by the space it took. Returns `None` without drawing when `area` has no
    /// room left.
    pub fn draw_title(
        title: &mut Title,
        canvas: &mut dyn Canvas,
        area: &mut Rect,
        generate_entities: bool,
    ) -> ChartResult<Option<BlockResult>> {
        let position = title.position();
        let h = title.horizontal_alignment();
        let v = title.vertical_alignment();
        let id = title.element_id();
        place_title(title, id, position, h, v, canvas, area, generate_entities)
    }

    /// Draw the whole chart into `area`.
    ///
    /// When `info` is given it is cleared first and then filled with the chart
    /// area, the plot's areas and (if it collects them) every entity, the
    /// chart entity first.
    pub fn draw(
        &mut self,
        canvas: &mut dyn Canvas,
        area: Rect,
        mut info: Option<&mut ChartRenderingInfo>,
    ) -> ChartResult<()> {
        self.progress.dispatch(&ChartProgressEvent::DrawingStarted);
        log::debug!("drawing chart into {area:?}");
        let generate = info.as_ref().is_some_and(|i| i.generates_entities());
        if let Some(info) = info.as_deref_mut() {
            info.clear();
            info.chart_area = area;
            if let Some(entities) = info.entities_mut() {
                entities.add(ChartEntity::rect(area, EntityKind::Chart));
            }
        }

        let saved = canvas.clip();
        canvas.set_clip(Some(saved.map_or(area, |c| c.intersection(&area))));
        let drawn = self.draw_body(canvas, area, info, generate);
        canvas.set_clip(saved);
        drawn?;
        self.progress.dispatch(&ChartProgressEvent::DrawingFinished);
        Ok(())
    }

    fn draw_body(
        &mut self,
        canvas: &mut dyn Canvas,
        area: Rect,
        mut info: Option<&mut ChartRenderingInfo>,
        generate: bool,
    ) -> ChartResult<()> {
        if let Some(bg) = self.background
            && !area.is_empty()
        {
            canvas.fill_shape(&Shape::Rect(area), &bg)?;
        }
        self.border.draw(canvas, &area)?;
        let mut remaining = self.padding.trim(&self.border_trim(&area));

        if let Some(title) = self.title.as_mut()
            && title.title().is_visible()
        {
            let (position, h, v) = {
                let base = title.title();
                (base.position(), base.horizontal_alignment(), base.vertical_alignment())
            };
            let result =
                place_title(title, "title", position, h, v, canvas, &mut remaining, generate)?;
            absorb(&mut info, result);
        }
        for (subtitle, _) in self.subtitles.iter_mut() {
            if !subtitle.is_visible() {
                continue;
            }
            let result = Self::draw_title(subtitle, canvas, &mut remaining, generate)?;
            absorb(&mut info, result);
        }

        log::debug!("plot area {remaining:?}");
        let (plot_info, entities) = match info {
            Some(info) => {
                let (p, e) = info.plot_parts();
                (Some(p), e)
            }
            None => (None, None),
        };
        match self.plot.try_borrow_mut() {
            Ok(mut plot) => {
                canvas.begin_element("plot");
                let drawn = plot.draw(canvas, remaining, plot_info, entities);
                canvas.end_element();
                drawn
            }
            Err(_) => {
                log::warn!("plot is borrowed elsewhere; skipping plot draw");
                Ok(())
            }
        }
    }

    fn border_trim(&self, area: &Rect) -> Rect {
        self.border.insets.trim(area)
    }
}

impl Drop for Chart {
    fn drop(&mut self) {
        if let Ok(plot) = self.plot.try_borrow() {
            plot.notifier().remove_listener(self.plot_listener);
        }
    }
}

fn absorb(info: &mut Option<&mut ChartRenderingInfo>, result: Option<BlockResult>) {
    if let Some(BlockResult {
        entities: Some(found),
    }) = result
        && let Some(all) = info.as_deref_mut().and_then(|i| i.entities_mut())
    {
        all.add_all(found);
    }
}

#[allow(clippy::too_many_arguments)]
fn place_title<B: Block + ?Sized>(
    title: &mut B,
    id: &str,
    position: RectangleEdge,
    h_align: HorizontalAlignment,
    v_align: VerticalAlignment,
    canvas: &mut dyn Canvas,
    area: &mut Rect,
    generate_entities: bool,
) -> ChartResult<Option<BlockResult>> {
    if area.width <= 0.0 || area.height <= 0.0 {
        return Ok(None);
    }
    let constraint =
        RectangleConstraint::ranged(Range::up_to(area.width), Range::up_to(area.height));
    let size = title.arrange(canvas.as_measurer(), &constraint);
    let frame = *area;
    let target = match position {
        RectangleEdge::Top => {
            area.y = (area.y + size.height).min(frame.max_y());
            area.height = (area.height - size.height).max(0.0);
            create_aligned_rectangle(size, &frame, h_align, VerticalAlignment::Top)
        }
        RectangleEdge::Bottom => {
            area.height = (area.height - size.height).max(0.0);
            create_aligned_rectangle(size, &frame, h_align, VerticalAlignment::Bottom)
        }
        RectangleEdge::Left => {
            area.x = (area.x + size.width).min(frame.max_x());
            area.width = (area.width - size.width).max(0.0);
            create_aligned_rectangle(size, &frame, HorizontalAlignment::Left, v_align)
        }
        RectangleEdge::Right => {
            area.width = (area.width - size.width).max(0.0);
            create_aligned_rectangle(size, &frame, HorizontalAlignment::Right, v_align)
        }
    };
    log::debug!("title at {position} takes {target:?}");
    canvas.begin_element(id);
    let drawn = title.draw(canvas, target, &BlockParams::with_entities(generate_entities));
    canvas.end_element();
    drawn.map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::RecordingCanvas;
    use crate::data::DefaultPieDataset;
    use crate::event::ChartChangeType;
    use crate::plot::PiePlot;

    fn pie_chart() -> (Rc<RefCell<DefaultPieDataset>>, Chart) {
        let mut ds = DefaultPieDataset::new();
        ds.set_value("A", Some(1.0));
        let ds = Rc::new(RefCell::new(ds));
        let shared: crate::data::SharedPieDataset = ds.clone();
        (ds, Chart::from_plot(Some("Pie"), PiePlot::new(Some(shared)), true))
    }

    #[test]
    fn dataset_change_reaches_chart_listeners() {
        let (ds, chart) = pie_chart();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        chart.add_change_listener(move |e| sink.borrow_mut().push(e.kind));
        ds.borrow_mut().set_value("B", Some(2.0));
        assert_eq!(seen.borrow().as_slice(), &[ChartChangeType::DatasetUpdated]);
    }

    #[test]
    fn progress_events_bracket_the_draw() {
        let (_ds, mut chart) = pie_chart();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        chart.add_progress_listener(move |e| sink.borrow_mut().push(*e));
        chart
            .draw(&mut RecordingCanvas::new(), Rect::new(0.0, 0.0, 300.0, 200.0), None)
            .unwrap();
        assert_eq!(
            seen.borrow().as_slice(),
            &[ChartProgressEvent::DrawingStarted, ChartProgressEvent::DrawingFinished]
        );
    }

    #[test]
    fn subtitle_index_is_checked() {
        let (_ds, mut chart) = pie_chart();
        assert!(chart.subtitle(0).is_ok());
        assert!(matches!(
            chart.remove_subtitle(3),
            Err(ChartError::IndexOutOfBounds { index: 3, len: 1 })
        ));
        assert!(chart.insert_subtitle(2, TextTitle::new("x")).is_err());
    }

    #[test]
    fn removed_subtitle_stops_forwarding() {
        let (_ds, mut chart) = pie_chart();
        let legend = chart.remove_subtitle(0).unwrap();
        let count = Rc::new(RefCell::new(0));
        let sink = count.clone();
        chart.add_change_listener(move |_| *sink.borrow_mut() += 1);
        legend.notifier().fire_change();
        assert_eq!(*count.borrow(), 0);
    }
}
