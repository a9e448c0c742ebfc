use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::canvas::Canvas;
use crate::data::{SharedPieDataset, pie_total};
use crate::entity::{ChartEntity, EntityCollection, EntityKind, PlotRenderingInfo};
use crate::error::ChartResult;
use crate::event::{ChangeEvent, ChartChangeType, ListenerId};
use crate::geom::{Point, Rect, RectangleAnchor, Shape};
use crate::legend::{LegendItem, LegendItemCollection, LegendItemSource};
use crate::paint::{BLACK, DrawingSupplier, FontSpec, Paint, Stroke, WHITE};

use super::{Plot, PlotBase, PlotType};

/// Which way sections follow one another from the start angle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieDirection {
    #[default]
    Clockwise,
    Anticlockwise,
}

/// Degrees of arc per polygon segment when approximating a section.
const ARC_STEP: f64 = 2.0;

/// A pie of keyed values.
pub struct PiePlot {
    base: PlotBase,
    dataset: Option<SharedPieDataset>,
    dataset_listener: Option<ListenerId>,
    /// Degrees, anticlockwise from three o'clock.
    start_angle: f64,
    direction: PieDirection,
    interior_gap: f64,
    circular: bool,
    section_paints: Vec<Option<Paint>>,
    section_outline: Option<(Paint, Stroke)>,
    labels_visible: bool,
    label_font: FontSpec,
    label_paint: Paint,
    url_prefix: Option<String>,
}

impl std::fmt::Debug for PiePlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PiePlot")
            .field("has_dataset", &self.dataset.is_some())
            .field("start_angle", &self.start_angle)
            .field("direction", &self.direction)
            .finish_non_exhaustive()
    }
}

impl PiePlot {
    pub const DEFAULT_START_ANGLE: f64 = 90.0;
    pub const DEFAULT_INTERIOR_GAP: f64 = 0.08;

    pub fn new(dataset: Option<SharedPieDataset>) -> Self {
        let mut plot = Self {
            base: PlotBase::new(),
            dataset: None,
            dataset_listener: None,
            start_angle: Self::DEFAULT_START_ANGLE,
            direction: PieDirection::Clockwise,
            interior_gap: Self::DEFAULT_INTERIOR_GAP,
            circular: true,
            section_paints: Vec::new(),
            section_outline: Some((WHITE, Stroke::new(1.0))),
            labels_visible: true,
            label_font: FontSpec::sans(10.0),
            label_paint: BLACK,
            url_prefix: None,
        };
        plot.attach_dataset(dataset);
        plot
    }

    fn attach_dataset(&mut self, dataset: Option<SharedPieDataset>) {
        if let (Some(old), Some(id)) = (self.dataset.take(), self.dataset_listener.take()) {
            old.borrow().notifier().remove_listener(id);
        }
        self.dataset_listener = dataset
            .as_ref()
            .map(|ds| self.base.notifier().forward_from(ds.borrow().notifier()));
        self.dataset = dataset;
    }

    pub fn dataset(&self) -> Option<&SharedPieDataset> {
        self.dataset.as_ref()
    }

    pub fn set_dataset(&mut self, dataset: Option<SharedPieDataset>) {
        self.attach_dataset(dataset);
        self.base.notifier().fire(&ChangeEvent::new(
            self.base.notifier().source(),
            ChartChangeType::NewDataset,
        ));
    }

    pub fn start_angle(&self) -> f64 {
        self.start_angle
    }

    pub fn set_start_angle(&mut self, degrees: f64) {
        self.start_angle = degrees;
        self.base.fire_change();
    }

    pub fn direction(&self) -> PieDirection {
        self.direction
    }

    pub fn set_direction(&mut self, direction: PieDirection) {
        self.direction = direction;
        self.base.fire_change();
    }

    /// Share of the plot width and height left empty around the pie, in `[0, 0.4]`.
    pub fn set_interior_gap(&mut self, gap: f64) {
        self.interior_gap = gap.clamp(0.0, 0.4);
        self.base.fire_change();
    }

    pub fn set_circular(&mut self, circular: bool) {
        self.circular = circular;
        self.base.fire_change();
    }

    pub fn section_paint(&self, index: usize) -> Paint {
        self.section_paints
            .get(index)
            .copied()
            .flatten()
            .unwrap_or_else(|| DrawingSupplier::series_paint(index))
    }

    pub fn set_section_paint(&mut self, index: usize, paint: Option<Paint>) {
        if self.section_paints.len() <= index {
            self.section_paints.resize(index + 1, None);
        }
        self.section_paints[index] = paint;
        self.base.fire_change();
    }

    pub fn set_labels_visible(&mut self, on: bool) {
        self.labels_visible = on;
        self.base.fire_change();
    }

    pub fn set_url_prefix(&mut self, prefix: Option<String>) {
        self.url_prefix = prefix;
        self.base.fire_change();
    }

    /// The rectangle the pie itself occupies inside `area`.
    pub fn pie_area(&self, area: &Rect) -> Rect {
        let gap_w = area.width * self.interior_gap;
        let gap_h = area.height * self.interior_gap;
        let mut r = Rect::new(
            area.x + gap_w / 2.0,
            area.y + gap_h / 2.0,
            area.width - gap_w,
            area.height - gap_h,
        );
        if self.circular {
            let side = r.width.min(r.height);
            r = Rect::new(
                r.center_x() - side / 2.0,
                r.center_y() - side / 2.0,
                side,
                side,
            );
        }
        r
    }

    fn point_at(pie: &Rect, degrees: f64, scale: f64) -> Point {
        let rad = degrees * PI / 180.0;
        Point::new(
            pie.center_x() + scale * pie.width / 2.0 * rad.cos(),
            pie.center_y() - scale * pie.height / 2.0 * rad.sin(),
        )
    }

    fn section_shape(pie: &Rect, start: f64, extent: f64) -> Shape {
        let centre = Point::new(pie.center_x(), pie.center_y());
        let steps = (extent.abs() / ARC_STEP).ceil().max(1.0) as usize;
        let mut points = Vec::with_capacity(steps + 2);
        points.push(centre);
        for i in 0..=steps {
            points.push(Self::point_at(pie, start + extent * i as f64 / steps as f64, 1.0));
        }
        Shape::Polygon(points)
    }

    fn section_url(&self, key: &str) -> Option<String> {
        use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
        self.url_prefix
            .as_deref()
            .map(|p| format!("{p}?category={}", utf8_percent_encode(key, NON_ALPHANUMERIC)))
    }
}

impl Drop for PiePlot {
    fn drop(&mut self) {
        if let (Some(ds), Some(id)) = (self.dataset.as_ref(), self.dataset_listener)
            && let Ok(ds) = ds.try_borrow()
        {
            ds.notifier().remove_listener(id);
        }
    }
}

impl LegendItemSource for PiePlot {
    fn legend_items(&self) -> LegendItemCollection {
        let Some(ds) = self.dataset.as_ref() else {
            return LegendItemCollection::new();
        };
        let ds = ds.borrow();
        (0..ds.item_count())
            .filter(|i| ds.value(*i).is_some_and(|v| v > 0.0))
            .filter_map(|i| {
                let key = ds.key(i)?;
                Some(LegendItem::new(key, self.section_paint(i)).with_series(key, i))
            })
            .collect()
    }
}

impl Plot for PiePlot {
    fn plot_type(&self) -> PlotType {
        PlotType::Pie
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
        let pie = self.pie_area(&inner);
        if let Some(info) = info {
            info.plot_area = area;
            info.data_area = pie;
        }
        self.base.draw_background(canvas, &inner)?;

        let total = self
            .dataset
            .as_ref()
            .map_or(0.0, |ds| pie_total(&*ds.borrow()));
        if total <= 0.0 || pie.is_empty() {
            self.base.draw_no_data_message(canvas, &inner)?;
            return self.base.draw_outline(canvas, &inner);
        }

        let sign = match self.direction {
            PieDirection::Clockwise => -1.0,
            PieDirection::Anticlockwise => 1.0,
        };
        if let Some(ds) = self.dataset.as_ref() {
            let ds = ds.borrow();
            let mut angle = self.start_angle;
            for index in 0..ds.item_count() {
                let Some(value) = ds.value(index).filter(|v| *v > 0.0) else {
                    continue;
                };
                let key = ds.key(index).unwrap_or_default().to_string();
                let extent = sign * 360.0 * value / total;
                let shape = Self::section_shape(&pie, angle, extent);
                canvas.fill_shape(&shape, &self.section_paint(index))?;
                if let Some((paint, stroke)) = &self.section_outline {
                    canvas.stroke_shape(&shape, paint, stroke)?;
                }
                let mid = angle + extent / 2.0;
                if self.labels_visible {
                    let at = Self::point_at(&pie, mid, 1.1);
                    let anchor = if (mid * PI / 180.0).cos() >= 0.0 {
                        RectangleAnchor::Left
                    } else {
                        RectangleAnchor::Right
                    };
                    canvas.draw_text(&key, at.x, at.y, &self.label_font, &self.label_paint, anchor, 0.0)?;
                }
                if let Some(entities) = entities.as_deref_mut() {
                    let percent = value / total * 100.0;
                    let tooltip = format!("{key}: ({value}, {percent:.0}%)");
                    let url = self.section_url(&key);
                    entities.add(ChartEntity::new(
                        shape,
                        EntityKind::PieSection {
                            dataset_index: 0,
                            key,
                            index,
                            value,
                        },
                        Some(tooltip),
                        url,
                    ));
                }
                angle += extent;
            }
        }
        self.base.draw_outline(canvas, &inner)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::canvas::RecordingCanvas;
    use crate::data::DefaultPieDataset;

    fn pie(values: &[(&str, f64)]) -> PiePlot {
        let mut ds = DefaultPieDataset::new();
        for (k, v) in values {
            ds.set_value(k, Some(*v));
        }
        let shared: SharedPieDataset = Rc::new(RefCell::new(ds));
        PiePlot::new(Some(shared))
    }

    #[test]
    fn sections_carry_percentages() {
        let mut plot = pie(&[("A", 1.0), ("B", 3.0)]);
        let mut canvas = RecordingCanvas::new();
        let mut entities = EntityCollection::new();
        plot.draw(&mut canvas, Rect::new(0.0, 0.0, 300.0, 300.0), None, Some(&mut entities))
            .unwrap();
        let tips: Vec<_> = entities.iter().filter_map(|e| e.tooltip.as_deref()).collect();
        assert_eq!(tips, ["A: (1, 25%)", "B: (3, 75%)"]);
        assert!(canvas.texts().contains(&"A"));
    }

    #[test]
    fn clockwise_first_section_starts_at_twelve() {
        let mut plot = pie(&[("A", 1.0), ("B", 3.0)]);
        let mut canvas = RecordingCanvas::new();
        let mut entities = EntityCollection::new();
        let area = Rect::new(0.0, 0.0, 300.0, 300.0);
        plot.draw(&mut canvas, area, None, Some(&mut entities)).unwrap();
        let pie = plot.pie_area(&plot.base().insets().trim(&area));
        // a quarter clockwise from twelve o'clock is the upper-right quadrant
        let point = (pie.center_x() + pie.width * 0.2, pie.center_y() - pie.height * 0.2);
        let hit = entities.entity_at(point.0, point.1).unwrap();
        assert!(matches!(&hit.kind, EntityKind::PieSection { key, .. } if key == "A"));
    }

    #[test]
    fn empty_pie_shows_message() {
        let mut plot = pie(&[("A", 0.0)]);
        let mut canvas = RecordingCanvas::new();
        plot.draw(&mut canvas, Rect::new(0.0, 0.0, 200.0, 200.0), None, None)
            .unwrap();
        assert!(canvas.texts().contains(&"No data to display"));
        assert!(plot.legend_items().is_empty());
    }
}
