use crate::axis::{AxisLocation, AxisSpace, CategoryAxis, NumberAxis};
use crate::canvas::Canvas;
use crate::data::{SharedCategoryDataset, category_range_bounds};
use crate::entity::{EntityCollection, PlotRenderingInfo};
use crate::error::ChartResult;
use crate::event::{ChangeEvent, ChartChangeType, ListenerId};
use crate::geom::{Point, Rect, RectangleEdge};
use crate::legend::{LegendItemCollection, LegendItemSource};
use crate::paint::{LIGHT_GRAY, Paint, Stroke};

use super::{BarRenderer, Plot, PlotBase, PlotOrientation, PlotType, Zoomable};

/// A plot of category values: categories along the domain axis, values along a
/// number axis.
pub struct CategoryPlot {
    base: PlotBase,
    dataset: Option<SharedCategoryDataset>,
    dataset_listener: Option<ListenerId>,
    domain_axis: CategoryAxis,
    range_axis: NumberAxis,
    renderer: BarRenderer,
    orientation: PlotOrientation,
    domain_location: AxisLocation,
    range_location: AxisLocation,
    range_gridlines: bool,
    gridline_paint: Paint,
    gridline_stroke: Stroke,
    range_zoomable: bool,
}

impl std::fmt::Debug for CategoryPlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CategoryPlot")
            .field("has_dataset", &self.dataset.is_some())
            .field("range_axis", &self.range_axis)
            .field("orientation", &self.orientation)
            .finish_non_exhaustive()
    }
}

impl CategoryPlot {
    pub fn new(
        dataset: Option<SharedCategoryDataset>,
        domain_axis: CategoryAxis,
        range_axis: NumberAxis,
        renderer: BarRenderer,
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
            range_gridlines: true,
            gridline_paint: LIGHT_GRAY,
            gridline_stroke: Stroke::new(0.5),
            range_zoomable: true,
        };
        plot.attach_dataset(dataset);
        plot
    }

    fn attach_dataset(&mut self, dataset: Option<SharedCategoryDataset>) {
        if let (Some(old), Some(id)) = (self.dataset.take(), self.dataset_listener.take()) {
            old.borrow().notifier().remove_listener(id);
        }
        self.dataset_listener = dataset
            .as_ref()
            .map(|ds| self.base.notifier().forward_from(ds.borrow().notifier()));
        self.dataset = dataset;
    }

    pub fn dataset(&self) -> Option<&SharedCategoryDataset> {
        self.dataset.as_ref()
    }

    pub fn set_dataset(&mut self, dataset: Option<SharedCategoryDataset>) {
        self.attach_dataset(dataset);
        self.base.notifier().fire(&ChangeEvent::new(
            self.base.notifier().source(),
            ChartChangeType::NewDataset,
        ));
    }

    pub fn domain_axis(&self) -> &CategoryAxis {
        &self.domain_axis
    }

    pub fn domain_axis_mut(&mut self) -> &mut CategoryAxis {
        &mut self.domain_axis
    }

    pub fn range_axis(&self) -> &NumberAxis {
        &self.range_axis
    }

    pub fn range_axis_mut(&mut self) -> &mut NumberAxis {
        &mut self.range_axis
    }

    pub fn renderer(&self) -> &BarRenderer {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut BarRenderer {
        &mut self.renderer
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

    pub fn set_range_gridlines_visible(&mut self, on: bool) {
        self.range_gridlines = on;
        self.base.fire_change();
    }

    pub fn set_range_zoomable(&mut self, on: bool) {
        self.range_zoomable = on;
    }

    fn column_keys(&self) -> Vec<String> {
        self.dataset
            .as_ref()
            .map(|ds| {
                let ds = ds.borrow();
                (0..ds.column_count())
                    .filter_map(|c| ds.column_key(c).map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl Drop for CategoryPlot {
    fn drop(&mut self) {
        if let (Some(ds), Some(id)) = (self.dataset.as_ref(), self.dataset_listener)
            && let Ok(ds) = ds.try_borrow()
        {
            ds.notifier().remove_listener(id);
        }
    }
}

impl LegendItemSource for CategoryPlot {
    fn legend_items(&self) -> LegendItemCollection {
        let Some(ds) = self.dataset.as_ref() else {
            return LegendItemCollection::new();
        };
        let ds = ds.borrow();
        (0..ds.row_count())
            .filter_map(|r| self.renderer.legend_item(&*ds, 0, r))
            .collect()
    }
}

impl Plot for CategoryPlot {
    fn plot_type(&self) -> PlotType {
        PlotType::Category
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
        let keys = self.column_keys();
        let bounds = self
            .dataset
            .as_ref()
            .and_then(|ds| category_range_bounds(&*ds.borrow()));
        self.range_axis.configure(bounds);

        let domain_edge = self.domain_axis_edge();
        let range_edge = self.range_axis_edge();
        let mut space = AxisSpace::default();
        space.add(
            self.domain_axis.reserve_space(canvas.as_measurer(), &keys, domain_edge),
            domain_edge,
        );
        space.add(
            self.range_axis.reserve_space(canvas.as_measurer(), &inner, range_edge),
            range_edge,
        );
        let data_area = space.shrink(&inner);
        log::debug!("category plot area {area:?}, data area {data_area:?}");
        if let Some(info) = info {
            info.plot_area = area;
            info.data_area = data_area;
        }

        self.base.draw_background(canvas, &data_area)?;
        self.domain_axis
            .draw(canvas, &data_area, domain_edge, &keys, entities.as_deref_mut())?;
        let ticks = self
            .range_axis
            .draw(canvas, &data_area, range_edge, entities.as_deref_mut())?;
        if self.range_gridlines {
            for t in &ticks {
                let pos = self.range_axis.value_to_screen(t.value, &data_area, range_edge);
                let (a, b) = if range_edge.is_left_or_right() {
                    (Point::new(data_area.min_x(), pos), Point::new(data_area.max_x(), pos))
                } else {
                    (Point::new(pos, data_area.min_y()), Point::new(pos, data_area.max_y()))
                };
                canvas.draw_line(a, b, &self.gridline_paint, &self.gridline_stroke)?;
            }
        }

        let has_data = bounds.is_some();
        if has_data {
            if let Some(ds) = self.dataset.as_ref() {
                let ds = ds.borrow();
                for row in 0..ds.row_count() {
                    for column in 0..ds.column_count() {
                        self.renderer.draw_item(
                            canvas,
                            &data_area,
                            &*ds,
                            0,
                            row,
                            column,
                            self.orientation,
                            (&self.domain_axis, domain_edge),
                            (&self.range_axis, range_edge),
                            entities.as_deref_mut(),
                        )?;
                    }
                }
            }
        } else {
            self.base.draw_no_data_message(canvas, &data_area)?;
        }
        self.base.draw_outline(canvas, &data_area)
    }

    fn as_zoomable(&mut self) -> Option<&mut dyn Zoomable> {
        Some(self)
    }
}

/// Categories are not zoomable; only the value axis moves.
impl Zoomable for CategoryPlot {
    fn orientation(&self) -> PlotOrientation {
        self.orientation
    }

    fn is_domain_zoomable(&self) -> bool {
        false
    }

    fn is_range_zoomable(&self) -> bool {
        self.range_zoomable
    }

    fn zoom_domain(&mut self, _lower: f64, _upper: f64) {}

    fn zoom_range(&mut self, lower: f64, upper: f64) {
        if self.range_zoomable {
            self.range_axis.zoom_range(lower, upper);
        }
    }

    fn pan_domain(&mut self, _percent: f64) {}

    fn pan_range(&mut self, percent: f64) {
        if self.range_zoomable {
            self.range_axis.pan(percent);
        }
    }

    fn scale_domain(&mut self, _factor: f64, _anchor: f64) {}

    fn scale_range(&mut self, factor: f64, anchor: f64) {
        if self.range_zoomable {
            let r = self.range_axis.range();
            self.range_axis
                .resize_range(factor, r.lower() + anchor * r.length());
        }
    }

    fn restore_auto_bounds(&mut self) {
        self.range_axis.set_auto_range(true);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::canvas::RecordingCanvas;
    use crate::data::DefaultCategoryDataset;
    use crate::entity::EntityKind;

    fn plot(orientation: PlotOrientation) -> CategoryPlot {
        let mut ds = DefaultCategoryDataset::new();
        ds.add_value(1.0, "S1", "C1");
        ds.add_value(4.0, "S1", "C2");
        ds.add_value(3.0, "S2", "C1");
        let shared: SharedCategoryDataset = Rc::new(RefCell::new(ds));
        let mut plot = CategoryPlot::new(
            Some(shared),
            CategoryAxis::new(Some("Category".into())),
            NumberAxis::new(Some("Value".into())),
            BarRenderer::default(),
        );
        plot.set_orientation(orientation);
        plot
    }

    fn bars(orientation: PlotOrientation) -> EntityCollection {
        let mut plot = plot(orientation);
        let mut canvas = RecordingCanvas::new();
        let mut entities = EntityCollection::new();
        plot.draw(
            &mut canvas,
            Rect::new(0.0, 0.0, 500.0, 400.0),
            None,
            Some(&mut entities),
        )
        .unwrap();
        entities
    }

    #[test]
    fn one_entity_per_present_value() {
        let entities = bars(PlotOrientation::Vertical);
        let bars: Vec<_> = entities
            .iter()
            .filter(|e| matches!(e.kind, EntityKind::CategoryItem { .. }))
            .collect();
        // (S2, C2) is missing
        assert_eq!(bars.len(), 3);
        assert_eq!(bars[1].tooltip.as_deref(), Some("(S1, C2) = 4"));
        // the taller bar reaches higher on screen
        assert!(bars[1].area.bounds().min_y() < bars[0].area.bounds().min_y());
    }

    #[test]
    fn horizontal_bars_grow_rightwards() {
        let entities = bars(PlotOrientation::Horizontal);
        let bars: Vec<_> = entities
            .iter()
            .filter(|e| matches!(e.kind, EntityKind::CategoryItem { .. }))
            .collect();
        assert!(bars[1].area.bounds().width > bars[0].area.bounds().width);
    }

    #[test]
    fn domain_is_not_zoomable() {
        let mut plot = plot(PlotOrientation::Vertical);
        let z = plot.as_zoomable().unwrap();
        assert!(!z.is_domain_zoomable());
        assert!(z.is_range_zoomable());
    }
}
