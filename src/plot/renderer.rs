//! Renderers: per-item drawing for XY and category plots.

use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};

use crate::axis::{CategoryAxis, NumberAxis};
use crate::canvas::{Canvas, dash_runs};
use crate::data::{CategoryDataset, XyDataset};
use crate::entity::{ChartEntity, EntityCollection, EntityKind};
use crate::error::ChartResult;
use crate::event::{ChangeSource, Notifier};
use crate::geom::{Point, Rect, RectangleEdge, Shape};
use crate::legend::LegendItem;
use crate::paint::{DrawingSupplier, GRAY, MarkerShape, Paint, Stroke};
use crate::plot::PlotOrientation;

/// Series styling and item label settings shared by renderers.
#[derive(Debug)]
pub struct RendererBase {
    series_paints: Vec<Option<Paint>>,
    series_strokes: Vec<Option<Stroke>>,
    base_stroke: Stroke,
    generate_tooltips: bool,
    url_prefix: Option<String>,
    notifier: Notifier,
}

impl Default for RendererBase {
    fn default() -> Self {
        Self {
            series_paints: Vec::new(),
            series_strokes: Vec::new(),
            base_stroke: Stroke::new(1.5),
            generate_tooltips: true,
            url_prefix: None,
            notifier: Notifier::new(ChangeSource::Renderer),
        }
    }
}

impl RendererBase {
    /// Override paint for one series, or fall back to the default palette.
    pub fn series_paint(&self, series: usize) -> Paint {
        self.series_paints
            .get(series)
            .copied()
            .flatten()
            .unwrap_or_else(|| DrawingSupplier::series_paint(series))
    }

    pub fn set_series_paint(&mut self, series: usize, paint: Option<Paint>) {
        if self.series_paints.len() <= series {
            self.series_paints.resize(series + 1, None);
        }
        self.series_paints[series] = paint;
        self.notifier.fire_change();
    }

    pub fn series_stroke(&self, series: usize) -> Stroke {
        self.series_strokes
            .get(series)
            .copied()
            .flatten()
            .unwrap_or(self.base_stroke)
    }

    pub fn set_series_stroke(&mut self, series: usize, stroke: Option<Stroke>) {
        if self.series_strokes.len() <= series {
            self.series_strokes.resize(series + 1, None);
        }
        self.series_strokes[series] = stroke;
        self.notifier.fire_change();
    }

    pub fn set_generate_tooltips(&mut self, on: bool) {
        self.generate_tooltips = on;
        self.notifier.fire_change();
    }

    /// Item URLs are `{prefix}?series=…&…`; `None` turns URLs off.
    pub fn set_url_prefix(&mut self, prefix: Option<String>) {
        self.url_prefix = prefix;
        self.notifier.fire_change();
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    fn url(&self, params: &[(&str, &str)]) -> Option<String> {
        let prefix = self.url_prefix.as_deref()?;
        let query = params
            .iter()
            .map(|(k, v)| format!("{k}={}", utf8_percent_encode(v, NON_ALPHANUMERIC)))
            .collect::<Vec<_>>()
            .join("&");
        Some(format!("{prefix}?{query}"))
    }
}

/// Screen point for `(domain, value)` under a plot orientation.
fn to_screen(
    orientation: PlotOrientation,
    domain: f64,
    value: f64,
    domain_axis: &NumberAxis,
    range_axis: &NumberAxis,
    area: &Rect,
    domain_edge: RectangleEdge,
    range_edge: RectangleEdge,
) -> Point {
    let d = domain_axis.value_to_screen(domain, area, domain_edge);
    let v = range_axis.value_to_screen(value, area, range_edge);
    match orientation {
        PlotOrientation::Vertical => Point::new(d, v),
        PlotOrientation::Horizontal => Point::new(v, d),
    }
}

fn inside(area: &Rect, p: Point) -> bool {
    p.x >= area.min_x() && p.x <= area.max_x() && p.y >= area.min_y() && p.y <= area.max_y()
}

/// Lines between consecutive items and/or a marker at each item.
#[derive(Debug)]
pub struct XyLineAndShapeRenderer {
    base: RendererBase,
    lines_visible: bool,
    shapes_visible: bool,
    shapes_filled: bool,
    shape_size: f64,
}

impl Default for XyLineAndShapeRenderer {
    fn default() -> Self {
        Self::new(true, true)
    }
}

impl XyLineAndShapeRenderer {
    pub fn new(lines: bool, shapes: bool) -> Self {
        Self {
            base: RendererBase::default(),
            lines_visible: lines,
            shapes_visible: shapes,
            shapes_filled: true,
            shape_size: 6.0,
        }
    }

    pub fn base(&self) -> &RendererBase {
        &self.base
    }

    pub fn base_mut(&mut self) -> &mut RendererBase {
        &mut self.base
    }

    pub fn lines_visible(&self) -> bool {
        self.lines_visible
    }

    pub fn set_lines_visible(&mut self, on: bool) {
        self.lines_visible = on;
        self.base.notifier.fire_change();
    }

    pub fn shapes_visible(&self) -> bool {
        self.shapes_visible
    }

    pub fn set_shapes_visible(&mut self, on: bool) {
        self.shapes_visible = on;
        self.base.notifier.fire_change();
    }

    pub fn set_shapes_filled(&mut self, on: bool) {
        self.shapes_filled = on;
        self.base.notifier.fire_change();
    }

    pub fn series_shape(&self, series: usize) -> MarkerShape {
        DrawingSupplier::series_shape(series)
    }

    pub fn legend_item(&self, ds: &dyn XyDataset, dataset_index: usize, series: usize) -> Option<LegendItem> {
        let key = ds.series_key(series)?;
        let paint = self.base.series_paint(series);
        let mut item = LegendItem::new(key, paint)
            .with_series(key, series)
            .with_dataset_index(dataset_index)
            .with_shape(self.series_shape(series));
        item.shape_visible = self.shapes_visible;
        item.shape_filled = self.shapes_filled;
        if self.lines_visible {
            item = item.with_line(paint, self.base.series_stroke(series));
        }
        Some(item)
    }

    /// Draw one series; item entities cover each marker (or a small circle
    /// around the point when markers are hidden).
    #[allow(clippy::too_many_arguments)]
    pub fn draw_series(
        &self,
        canvas: &mut dyn Canvas,
        data_area: &Rect,
        ds: &dyn XyDataset,
        dataset_index: usize,
        series: usize,
        orientation: PlotOrientation,
        domain_axis: (&NumberAxis, RectangleEdge),
        range_axis: (&NumberAxis, RectangleEdge),
        mut entities: Option<&mut EntityCollection>,
    ) -> ChartResult<()> {
        let paint = self.base.series_paint(series);
        let stroke = self.base.series_stroke(series);
        let key = ds.series_key(series).unwrap_or_default().to_string();
        let mut segment: Vec<Point> = Vec::new();
        let mut points: Vec<(usize, f64, f64, Point)> = Vec::new();
        for item in 0..ds.item_count(series) {
            let (Some(x), Some(y)) = (ds.x(series, item), ds.y(series, item)) else {
                self.flush_line(canvas, &mut segment, &paint, &stroke)?;
                continue;
            };
            let p = to_screen(
                orientation,
                x,
                y,
                domain_axis.0,
                range_axis.0,
                data_area,
                domain_axis.1,
                range_axis.1,
            );
            segment.push(p);
            points.push((item, x, y, p));
        }
        self.flush_line(canvas, &mut segment, &paint, &stroke)?;

        let half = self.shape_size / 2.0;
        let marker = self.series_shape(series);
        for (item, x, y, p) in points {
            let shape = marker.to_shape(p, half);
            if self.shapes_visible {
                if self.shapes_filled {
                    canvas.fill_shape(&shape, &paint)?;
                } else {
                    canvas.stroke_shape(&shape, &paint, &Stroke::new(1.0))?;
                }
            }
            if let Some(entities) = entities.as_deref_mut() {
                if !inside(data_area, p) {
                    continue;
                }
                let area = if self.shapes_visible {
                    shape
                } else {
                    Shape::Ellipse(Rect::new(p.x - 4.0, p.y - 4.0, 8.0, 8.0))
                };
                let tooltip = self
                    .base
                    .generate_tooltips
                    .then(|| format!("{key}: ({x}, {y})"));
                let url = self
                    .base
                    .url(&[("series", key.as_str()), ("item", &item.to_string())]);
                entities.add(ChartEntity::new(
                    area,
                    EntityKind::XyItem {
                        dataset_index,
                        series_key: key.clone(),
                        series,
                        item,
                        x,
                        y,
                    },
                    tooltip,
                    url,
                ));
            }
        }
        Ok(())
    }

    fn flush_line(
        &self,
        canvas: &mut dyn Canvas,
        segment: &mut Vec<Point>,
        paint: &Paint,
        stroke: &Stroke,
    ) -> ChartResult<()> {
        if self.lines_visible && segment.len() > 1 {
            for run in dash_runs(segment, stroke) {
                canvas.draw_polyline(&run, paint, stroke)?;
            }
        }
        segment.clear();
        Ok(())
    }
}

/// Bars from zero to each value, one bar per series within each category.
#[derive(Debug)]
pub struct BarRenderer {
    base: RendererBase,
    item_margin: f64,
    outline_visible: bool,
}

impl Default for BarRenderer {
    fn default() -> Self {
        Self {
            base: RendererBase::default(),
            item_margin: 0.2,
            outline_visible: false,
        }
    }
}

impl BarRenderer {
    pub fn base(&self) -> &RendererBase {
        &self.base
    }

    pub fn base_mut(&mut self) -> &mut RendererBase {
        &mut self.base
    }

    /// Share of each category given to the gaps between its bars.
    pub fn set_item_margin(&mut self, margin: f64) {
        self.item_margin = margin.clamp(0.0, 0.99);
        self.base.notifier.fire_change();
    }

    pub fn set_outline_visible(&mut self, on: bool) {
        self.outline_visible = on;
        self.base.notifier.fire_change();
    }

    pub fn legend_item(&self, ds: &dyn CategoryDataset, dataset_index: usize, row: usize) -> Option<LegendItem> {
        let key = ds.row_key(row)?;
        Some(
            LegendItem::new(key, self.base.series_paint(row))
                .with_series(key, row)
                .with_dataset_index(dataset_index),
        )
    }

    /// Extent `(start, width)` of the bar for `row` within category `column`.
    pub fn bar_span(
        &self,
        axis: &CategoryAxis,
        rows: usize,
        columns: usize,
        row: usize,
        column: usize,
        area: &Rect,
        edge: RectangleEdge,
    ) -> (f64, f64) {
        let size = axis.category_size(columns, area, edge);
        let start = axis.category_start(column, columns, area, edge);
        if rows > 1 {
            let bar = size * (1.0 - self.item_margin) / rows as f64;
            let gap = size * self.item_margin / (rows - 1) as f64;
            (start + row as f64 * (bar + gap), bar)
        } else {
            (start, size)
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn draw_item(
        &self,
        canvas: &mut dyn Canvas,
        data_area: &Rect,
        ds: &dyn CategoryDataset,
        dataset_index: usize,
        row: usize,
        column: usize,
        orientation: PlotOrientation,
        domain_axis: (&CategoryAxis, RectangleEdge),
        range_axis: (&NumberAxis, RectangleEdge),
        entities: Option<&mut EntityCollection>,
    ) -> ChartResult<()> {
        let Some(value) = ds.value(row, column) else {
            return Ok(());
        };
        let (start, width) = self.bar_span(
            domain_axis.0,
            ds.row_count(),
            ds.column_count(),
            row,
            column,
            data_area,
            domain_axis.1,
        );
        let (axis, edge) = range_axis;
        let base_value = axis.range().constrain(0.0);
        let v0 = axis.value_to_screen(base_value, data_area, edge);
        let v1 = axis.value_to_screen(axis.range().constrain(value), data_area, edge);
        let (lo, hi) = (v0.min(v1), v0.max(v1));
        let bar = match orientation {
            PlotOrientation::Vertical => Rect::new(start, lo, width, hi - lo),
            PlotOrientation::Horizontal => Rect::new(lo, start, hi - lo, width),
        };
        if bar.width <= 0.0 && bar.height <= 0.0 {
            return Ok(());
        }
        let shape = Shape::Rect(bar);
        canvas.fill_shape(&shape, &self.base.series_paint(row))?;
        if self.outline_visible {
            canvas.stroke_shape(&shape, &GRAY, &Stroke::new(0.5))?;
        }
        if let Some(entities) = entities {
            let row_key = ds.row_key(row).unwrap_or_default().to_string();
            let column_key = ds.column_key(column).unwrap_or_default().to_string();
            let tooltip = self
                .base
                .generate_tooltips
                .then(|| format!("({row_key}, {column_key}) = {value}"));
            let url = self
                .base
                .url(&[("series", row_key.as_str()), ("category", column_key.as_str())]);
            entities.add(ChartEntity::new(
                shape,
                EntityKind::CategoryItem {
                    dataset_index,
                    row_key,
                    column_key,
                    row,
                    column,
                    value,
                },
                tooltip,
                url,
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_are_percent_encoded() {
        let mut base = RendererBase::default();
        assert!(base.url(&[("series", "a b")]).is_none());
        base.set_url_prefix(Some("index.html".into()));
        assert_eq!(
            base.url(&[("series", "Q1 & Q2"), ("item", "3")]).as_deref(),
            Some("index.html?series=Q1%20%26%20Q2&item=3")
        );
    }

    #[test]
    fn series_paint_falls_back_to_palette() {
        let mut base = RendererBase::default();
        base.set_series_paint(2, Some(crate::paint::BLACK));
        assert_eq!(base.series_paint(2), crate::paint::BLACK);
        assert_eq!(base.series_paint(0), DrawingSupplier::series_paint(0));
    }
}
