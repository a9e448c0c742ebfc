use crate::axis::{AxisLocation, AxisSpace, NumberAxis, NumberTick};
use crate::canvas::Canvas;
use crate::data::{SharedXyDataset, xy_domain_bounds, xy_range_bounds};
use crate::entity::{EntityCollection, PlotRenderingInfo};
use crate::error::ChartResult;
use crate::event::{ChangeEvent, ChartChangeType, ListenerId};
use crate::geom::{Point, Rect, RectangleEdge};
use crate::legend::{LegendItemCollection, LegendItemSource};
use crate::paint::{LIGHT_GRAY, Paint, Stroke};

use super::{PlotBase, PlotOrientation, PlotType, Plot, XyLineAndShapeRenderer, Zoomable};

/// A plot of numeric `(x, y)` series against two number axes.
pub struct XyPlot {
    base: PlotBase,
    dataset: Option<SharedXyDataset>,
    dataset_listener: Option<ListenerId>,
    domain_axis: NumberAxis,
    range_axis: NumberAxis,
    renderer: XyLineAndShapeRenderer,
    orientation: PlotOrientation,
    domain_location: AxisLocation,
    range_location: AxisLocation,
    domain_gridlines: bool,
    range_gridlines: bool,
    gridline_paint: Paint,
    gridline_stroke: Stroke,
    domain_zoomable: bool,
    range_zoomable: bool,
}

impl std::fmt::Debug for XyPlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XyPlot")
            .field("has_dataset", &self.dataset.is_some())
            .field("domain_axis", &self.domain_axis)
            .field("range_axis", &self.range_axis)
            .field("orientation", &self.orientation)
            .finish_non_exhaustive()
    }
}

impl XyPlot {
    pub fn new(
        dataset: Option<SharedXyDataset>,
        domain_axis: NumberAxis,
        range_axis: NumberAxis,
        renderer: XyLineAndShapeRenderer,
    ) -> Self {
        let base = PlotBase::new();
        base.notifier().forward_from(domain_axis.base().notifier());
        base.notifier().forward_from(range_axis.base().notifier());
        base.notifier().forward_from(renderer.base().notifier());
        let mut plot = Self {
            base,
            dataset: None,
            dataset_listener: None,
            domain_axis,
            range_axis,
            renderer,
            orientation: PlotOrientation::Vertical,
            domain_location: AxisLocation::BottomOrLeft,
            range_location: AxisLocation::TopOrLeft,
            domain_gridlines: true,
            range_gridlines: true,
            gridline_paint: LIGHT_GRAY,
            gridline_stroke: Stroke::new(0.5),
            domain_zoomable: true,
            range_zoomable: true,
        };
        plot.attach_dataset(dataset);
        plot
    }

    fn attach_dataset(&mut self, dataset: Option<SharedXyDataset>) {
        if let (Some(old), Some(id)) = (self.dataset.take(), self.dataset_listener.take()) {
            old.borrow().notifier().remove_listener(id);
        }
        self.dataset_listener = dataset
            .as_ref()
            .map(|ds| self.base.notifier().forward_from(ds.borrow().notifier()));
        self.dataset = dataset;
    }

    pub fn dataset(&self) -> Option<&SharedXyDataset> {
        self.dataset.as_ref()
    }

    /// Replace the dataset; fires a `NewDataset` change.
    pub fn set_dataset(&mut self, dataset: Option<SharedXyDataset>) {
        self.attach_dataset(dataset);
        self.base.notifier().fire(&ChangeEvent::new(
            self.base.notifier().source(),
            ChartChangeType::NewDataset,
        ));
    }

    pub fn domain_axis(&self) -> &NumberAxis {
        &self.domain_axis
    }

    pub fn domain_axis_mut(&mut self) -> &mut NumberAxis {
        &mut self.domain_axis
    }

    pub fn set_domain_axis(&mut self, axis: NumberAxis) {
        self.base.notifier().forward_from(axis.base().notifier());
        self.domain_axis = axis;
        self.base.fire_change();
    }

    pub fn range_axis(&self) -> &NumberAxis {
        &self.range_axis
    }

    pub fn range_axis_mut(&mut self) -> &mut NumberAxis {
        &mut self.range_axis
    }

    pub fn set_range_axis(&mut self, axis: NumberAxis) {
        self.base.notifier().forward_from(axis.base().notifier());
        self.range_axis = axis;
        self.base.fire_change();
    }

    pub fn renderer(&self) -> &XyLineAndShapeRenderer {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut XyLineAndShapeRenderer {
        &mut self.renderer
    }

    pub fn set_renderer(&mut self, renderer: XyLineAndShapeRenderer) {
        self.base.notifier().forward_from(renderer.base().notifier());
        self.renderer = renderer;
        self.base.fire_change();
    }

    pub fn set_orientation(&mut self, orientation: PlotOrientation) {
        if self.orientation != orientation {
            self.orientation = orientation;
            self.base.fire_change();
        }
    }

    pub fn set_domain_axis_location(&mut self, location: AxisLocation) {
        self.domain_location = location;
        self.base.fire_change();
    }

    pub fn set_range_axis_location(&mut self, location: AxisLocation) {
        self.range_location = location;
        self.base.fire_change();
    }

    pub fn domain_axis_edge(&self) -> RectangleEdge {
        self.domain_location.resolve_domain(self.orientation)
    }

    pub fn range_axis_edge(&self) -> RectangleEdge {
        self.range_location.resolve_range(self.orientation)
    }

    pub fn set_domain_gridlines_visible(&mut self, on: bool) {
        self.domain_gridlines = on;
        self.base.fire_change();
    }

    pub fn set_range_gridlines_visible(&mut self, on: bool) {
        self.range_gridlines = on;
        self.base.fire_change();
    }

    pub fn set_domain_zoomable(&mut self, on: bool) {
        self.domain_zoomable = on;
    }

    pub fn set_range_zoomable(&mut self, on: bool) {
        self.range_zoomable = on;
    }

    fn has_data(&self) -> bool {
        self.dataset.as_ref().is_some_and(|ds| {
            let ds = ds.borrow();
            (0..ds.series_count()).any(|s| ds.item_count(s) > 0)
        })
    }

    fn draw_gridlines(
        &self,
        canvas: &mut dyn Canvas,
        data_area: &Rect,
        axis: &NumberAxis,
        edge: RectangleEdge,
        ticks: &[NumberTick],
    ) -> ChartResult<()> {
        for t in ticks {
            let pos = axis.value_to_screen(t.value, data_area, edge);
            let (a, b) = if edge.is_top_or_bottom() {
                (Point::new(pos, data_area.min_y()), Point::new(pos, data_area.max_y()))
            } else {
                (Point::new(data_area.min_x(), pos), Point::new(data_area.max_x(), pos))
            };
            canvas.draw_line(a, b, &self.gridline_paint, &self.gridline_stroke)?;
        }
        Ok(())
    }
}

impl Drop for XyPlot {
    fn drop(&mut self) {
        if let (Some(ds), Some(id)) = (self.dataset.as_ref(), self.dataset_listener)
            && let Ok(ds) = ds.try_borrow()
        {
            ds.notifier().remove_listener(id);
        }
    }
}

impl LegendItemSource for XyPlot {
    fn legend_items(&self) -> LegendItemCollection {
        let Some(ds) = self.dataset.as_ref() else {
            return LegendItemCollection::new();
        };
        let ds = ds.borrow();
        (0..ds.series_count())
            .filter_map(|s| self.renderer.legend_item(&*ds, 0, s))
            .collect()
    }
}

impl Plot for XyPlot {
    fn plot_type(&self) -> PlotType {
        PlotType::Xy
    }

    fn base(&self) -> &PlotBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut PlotBase {
        &mut self.base
    }

    fn draw(
        &mut self,
        canvas: &mut dyn Canvas,
        area: Rect,
        info: Option<&mut PlotRenderingInfo>,
        mut entities: Option<&mut EntityCollection>,
    ) -> ChartResult<()> {
        let inner = self.base.insets().trim(&area);
        let (domain_bounds, range_bounds) = match self.dataset.as_ref() {
            Some(ds) => {
                let ds = ds.borrow();
                (xy_domain_bounds(&*ds), xy_range_bounds(&*ds))
            }
            None => (None, None),
        };
        self.domain_axis.configure(domain_bounds);
        self.range_axis.configure(range_bounds);

        let domain_edge = self.domain_axis_edge();
        let range_edge = self.range_axis_edge();
        let mut space = AxisSpace::default();
        space.add(
            self.domain_axis.reserve_space(canvas.as_measurer(), &inner, domain_edge),
            domain_edge,
        );
        space.add(
            self.range_axis.reserve_space(canvas.as_measurer(), &inner, range_edge),
            range_edge,
        );
        let data_area = space.shrink(&inner);
        log::debug!("xy plot area {area:?}, data area {data_area:?}");
        if let Some(info) = info {
            info.plot_area = area;
            info.data_area = data_area;
        }

        self.base.draw_background(canvas, &data_area)?;
        let domain_ticks =
            self.domain_axis.draw(canvas, &data_area, domain_edge, entities.as_deref_mut())?;
        let range_ticks =
            self.range_axis.draw(canvas, &data_area, range_edge, entities.as_deref_mut())?;
        if self.domain_gridlines {
            self.draw_gridlines(canvas, &data_area, &self.domain_axis, domain_edge, &domain_ticks)?;
        }
        if self.range_gridlines {
            self.draw_gridlines(canvas, &data_area, &self.range_axis, range_edge, &range_ticks)?;
        }

        if self.has_data() {
            let saved = canvas.clip();
            canvas.set_clip(Some(saved.map_or(data_area, |c| c.intersection(&data_area))));
            if let Some(ds) = self.dataset.as_ref() {
                let ds = ds.borrow();
                for series in 0..ds.series_count() {
                    self.renderer.draw_series(
                        canvas,
                        &data_area,
                        &*ds,
                        0,
                        series,
                        self.orientation,
                        (&self.domain_axis, domain_edge),
                        (&self.range_axis, range_edge),
                        entities.as_deref_mut(),
                    )?;
                }
            }
            canvas.set_clip(saved);
        } else {
            self.base.draw_no_data_message(canvas, &data_area)?;
        }
        self.base.draw_outline(canvas, &data_area)
    }

    fn as_zoomable(&mut self) -> Option<&mut dyn Zoomable> {
        Some(self)
    }
}

impl Zoomable for XyPlot {
    fn orientation(&self) -> PlotOrientation {
        self.orientation
    }

    fn is_domain_zoomable(&self) -> bool {
        self.domain_zoomable
    }

    fn is_range_zoomable(&self) -> bool {
        self.range_zoomable
    }

    fn zoom_domain(&mut self, lower: f64, upper: f64) {
        if self.domain_zoomable {
            self.domain_axis.zoom_range(lower, upper);
        }
    }

    fn zoom_range(&mut self, lower: f64, upper: f64) {
        if self.range_zoomable {
            self.range_axis.zoom_range(lower, upper);
        }
    }

    fn pan_domain(&mut self, percent: f64) {
        if self.domain_zoomable {
            self.domain_axis.pan(percent);
        }
    }

    fn pan_range(&mut self, percent: f64) {
        if self.range_zoomable {
            self.range_axis.pan(percent);
        }
    }

    fn scale_domain(&mut self, factor: f64, anchor: f64) {
        if self.domain_zoomable {
            let r = self.domain_axis.range();
            self.domain_axis
                .resize_range(factor, r.lower() + anchor * r.length());
        }
    }

    fn scale_range(&mut self, factor: f64, anchor: f64) {
        if self.range_zoomable {
            let r = self.range_axis.range();
            self.range_axis
                .resize_range(factor, r.lower() + anchor * r.length());
        }
    }

    fn restore_auto_bounds(&mut self) {
        self.domain_axis.set_auto_range(true);
        self.range_axis.set_auto_range(true);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::canvas::RecordingCanvas;
    use crate::data::{XySeries, XySeriesCollection};
    use crate::entity::EntityKind;

    fn plot() -> (Rc<RefCell<XySeriesCollection>>, XyPlot) {
        let mut s = XySeries::new("S1");
        s.add(1.0, Some(2.0)).unwrap();
        s.add(2.0, Some(4.0)).unwrap();
        s.add(3.0, None).unwrap();
        let mut c = XySeriesCollection::new();
        c.add_series(s);
        let data = Rc::new(RefCell::new(c));
        let shared: SharedXyDataset = data.clone();
        let mut domain = NumberAxis::new(Some("X".into()));
        domain.set_auto_range_includes_zero(false);
        let plot = XyPlot::new(
            Some(shared),
            domain,
            NumberAxis::new(Some("Y".into())),
            XyLineAndShapeRenderer::default(),
        );
        (data, plot)
    }

    #[test]
    fn draw_records_areas_and_items() {
        let (_data, mut plot) = plot();
        let mut canvas = RecordingCanvas::new();
        let mut info = PlotRenderingInfo::new();
        let mut entities = EntityCollection::new();
        let area = Rect::new(0.0, 0.0, 400.0, 300.0);
        plot.draw(&mut canvas, area, Some(&mut info), Some(&mut entities))
            .unwrap();
        assert_eq!(info.plot_area, area);
        assert!(info.data_area.width > 0.0 && info.data_area.width < 400.0);
        let items: Vec<_> = entities
            .iter()
            .filter(|e| matches!(e.kind, EntityKind::XyItem { .. }))
            .collect();
        // the item with a missing y draws nothing
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].tooltip.as_deref(), Some("S1: (1, 2)"));
    }

    #[test]
    fn dataset_changes_reach_the_plot() {
        let (data, plot) = plot();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        plot.notifier().add_listener(move |e| sink.borrow_mut().push(e.kind));
        data.borrow_mut()
            .update_series(0, |s| s.add(4.0, Some(1.0)))
            .unwrap()
            .unwrap();
        assert_eq!(seen.borrow().as_slice(), &[ChartChangeType::DatasetUpdated]);
    }

    #[test]
    fn zoom_and_restore() {
        let (_data, mut plot) = plot();
        let mut canvas = RecordingCanvas::new();
        plot.draw(&mut canvas, Rect::new(0.0, 0.0, 400.0, 300.0), None, None)
            .unwrap();
        let before = plot.domain_axis().range();
        plot.zoom_domain(0.25, 0.75);
        let after = plot.domain_axis().range();
        assert!((after.length() - before.length() / 2.0).abs() < 1e-9);
        assert!(!plot.domain_axis().is_auto_range());
        plot.restore_auto_bounds();
        assert!(plot.domain_axis().is_auto_range());
    }
}
