//! An interactive, buffered view of a chart: hit testing, tooltips, zoom and
//! pan in screen coordinates.
//!
//! The viewport keeps the last rendered [`RasterImage`] and only draws again
//! when the chart reported a change or the viewport was resized. A chart is
//! drawn at a size clamped between the minimum and maximum draw sizes and then
//! scaled to the screen, so screen points are divided by the scale before they
//! meet entity shapes.

use std::cell::Cell;
use std::rc::Rc;

use crate::chart::Chart;
use crate::entity::{ChartEntity, ChartRenderingInfo};
use crate::error::{ChartError, ChartResult};
use crate::event::{ListenerId, ListenerList};
use crate::export::{RasterImage, render_raster};
use crate::geom::{Point, Rect, Size2D};
use crate::plot::PlotOrientation;

/// A click resolved against the last draw.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartMouseEvent {
    pub screen: Point,
    pub chart: Point,
    pub entity: Option<ChartEntity>,
}

pub struct ChartViewport {
    chart: Chart,
    size: (u32, u32),
    min_draw: Size2D,
    max_draw: Size2D,
    buffer: Option<RasterImage>,
    info: ChartRenderingInfo,
    dirty: Rc<Cell<bool>>,
    listener: ListenerId,
    renders: usize,
    mouse: ListenerList<ChartMouseEvent>,
}

impl std::fmt::Debug for ChartViewport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChartViewport")
            .field("size", &self.size)
            .field("dirty", &self.dirty.get())
            .field("renders", &self.renders)
            .finish_non_exhaustive()
    }
}

impl ChartViewport {
    pub const DEFAULT_MIN_DRAW: Size2D = Size2D::new(300.0, 200.0);
    pub const DEFAULT_MAX_DRAW: Size2D = Size2D::new(1920.0, 1080.0);

    pub fn new(chart: Chart, width: u32, height: u32) -> Self {
        let dirty = Rc::new(Cell::new(true));
        let flag = dirty.clone();
        let listener = chart.add_change_listener(move |_| flag.set(true));
        Self {
            chart,
            size: (width, height),
            min_draw: Self::DEFAULT_MIN_DRAW,
            max_draw: Self::DEFAULT_MAX_DRAW,
            buffer: None,
            info: ChartRenderingInfo::new(),
            dirty,
            listener,
            renders: 0,
            mouse: ListenerList::default(),
        }
    }

    pub fn chart(&self) -> &Chart {
        &self.chart
    }

    /// Mutable access; changes made through it mark the buffer stale by way
    /// of the chart's change events.
    pub fn chart_mut(&mut self) -> &mut Chart {
        &mut self.chart
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if self.size != (width, height) {
            self.size = (width, height);
            self.dirty.set(true);
        }
    }

    pub fn set_draw_limits(&mut self, min: Size2D, max: Size2D) {
        self.min_draw = min;
        self.max_draw = max;
        self.dirty.set(true);
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    /// How many times the chart has actually been drawn.
    pub fn render_count(&self) -> usize {
        self.renders
    }

    /// The chart-space size the chart is drawn at for the current screen size.
    pub fn draw_size(&self) -> Size2D {
        let (w, h) = (self.size.0 as f64, self.size.1 as f64);
        Size2D::new(
            w.clamp(self.min_draw.width, self.max_draw.width.max(self.min_draw.width)),
            h.clamp(self.min_draw.height, self.max_draw.height.max(self.min_draw.height)),
        )
    }

    fn scale(&self) -> (f64, f64) {
        let d = self.draw_size();
        (self.size.0 as f64 / d.width, self.size.1 as f64 / d.height)
    }

    /// The buffered image, drawn again first if the chart changed or the
    /// viewport was resized.
    pub fn image(&mut self) -> ChartResult<&RasterImage> {
        let stale = self.dirty.get()
            || self
                .buffer
                .as_ref()
                .is_none_or(|b| (b.width(), b.height()) != self.size);
        if stale {
            let draw = self.draw_size();
            let img = render_raster(&mut self.chart, draw, self.size, Some(&mut self.info))?;
            self.renders += 1;
            self.dirty.set(false);
            log::debug!("viewport redrawn at {:?} ({} renders)", self.size, self.renders);
            self.buffer = Some(img);
        }
        self.buffer
            .as_ref()
            .ok_or_else(|| ChartError::Render("viewport has no image".into()))
    }

    /// Areas and entities from the last draw.
    pub fn info(&self) -> &ChartRenderingInfo {
        &self.info
    }

    pub fn screen_to_chart(&self, x: f64, y: f64) -> Point {
        let (sx, sy) = self.scale();
        Point::new(x / sx, y / sy)
    }

    pub fn chart_to_screen(&self, p: Point) -> Point {
        let (sx, sy) = self.scale();
        Point::new(p.x * sx, p.y * sy)
    }

    pub fn entity_at(&self, x: f64, y: f64) -> Option<&ChartEntity> {
        let p = self.screen_to_chart(x, y);
        self.info.entities()?.entity_at(p.x, p.y)
    }

    pub fn tooltip_at(&self, x: f64, y: f64) -> Option<&str> {
        self.entity_at(x, y)?.tooltip.as_deref()
    }

    pub fn add_mouse_listener(&self, f: impl Fn(&ChartMouseEvent) + 'static) -> ListenerId {
        self.mouse.add(f)
    }

    pub fn remove_mouse_listener(&self, id: ListenerId) -> bool {
        self.mouse.remove(id)
    }

    /// Resolve a click and tell the mouse listeners.
    pub fn handle_click(&self, x: f64, y: f64) -> ChartMouseEvent {
        let event = ChartMouseEvent {
            screen: Point::new(x, y),
            chart: self.screen_to_chart(x, y),
            entity: self.entity_at(x, y).cloned(),
        };
        self.mouse.dispatch(&event);
        event
    }

    fn data_area(&self) -> Option<Rect> {
        let area = self.info.plot_info.data_area;
        (!area.is_empty()).then_some(area)
    }

    /// Zoom the plot to a rectangle dragged on screen. Rectangles smaller
    /// than a few pixels are ignored.
    pub fn zoom_to_rect(&mut self, screen: Rect) {
        if screen.width < 3.0 || screen.height < 3.0 {
            return;
        }
        let Some(data) = self.data_area() else {
            return;
        };
        let a = self.screen_to_chart(screen.min_x(), screen.min_y());
        let b = self.screen_to_chart(screen.max_x(), screen.max_y());
        let r = Rect::from_points(a, b).intersection(&data);
        if r.is_empty() {
            return;
        }
        let x0 = (r.min_x() - data.min_x()) / data.width;
        let x1 = (r.max_x() - data.min_x()) / data.width;
        let y0 = (data.max_y() - r.max_y()) / data.height;
        let y1 = (data.max_y() - r.min_y()) / data.height;
        self.batched(|z| {
            let (domain, range) = match z.orientation() {
                PlotOrientation::Vertical => ((x0, x1), (y0, y1)),
                PlotOrientation::Horizontal => ((y0, y1), (x0, x1)),
            };
            z.zoom_domain(domain.0, domain.1);
            z.zoom_range(range.0, range.1);
        });
    }

    /// Drag the plot contents by `(dx, dy)` screen pixels.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        let Some(data) = self.data_area() else {
            return;
        };
        let (sx, sy) = self.scale();
        let fx = -(dx / sx) / data.width;
        let fy = (dy / sy) / data.height;
        self.batched(|z| {
            let (domain, range) = match z.orientation() {
                PlotOrientation::Vertical => (fx, fy),
                PlotOrientation::Horizontal => (fy, fx),
            };
            if domain != 0.0 {
                z.pan_domain(domain);
            }
            if range != 0.0 {
                z.pan_range(range);
            }
        });
    }

    /// Scale both axes about a screen point; `factor < 1` zooms in.
    pub fn zoom_about(&mut self, x: f64, y: f64, factor: f64) {
        let Some(data) = self.data_area() else {
            return;
        };
        let p = self.screen_to_chart(x, y);
        let fx = ((p.x - data.min_x()) / data.width).clamp(0.0, 1.0);
        let fy = ((data.max_y() - p.y) / data.height).clamp(0.0, 1.0);
        self.batched(|z| {
            let (domain, range) = match z.orientation() {
                PlotOrientation::Vertical => (fx, fy),
                PlotOrientation::Horizontal => (fy, fx),
            };
            z.scale_domain(factor, domain);
            z.scale_range(factor, range);
        });
    }

    pub fn restore_auto_bounds(&mut self) {
        self.batched(|z| z.restore_auto_bounds());
    }

    /// Run `f` on the zoomable plot with chart events held back, so the
    /// whole gesture produces one change. Nothing fires when the plot cannot
    /// zoom or is borrowed elsewhere.
    fn batched(&mut self, f: impl FnOnce(&mut dyn crate::plot::Zoomable)) {
        let shared = self.chart.plot().clone();
        let Ok(mut plot) = shared.try_borrow_mut() else {
            log::warn!("plot is borrowed elsewhere; ignoring zoom");
            return;
        };
        let Some(z) = plot.as_zoomable() else {
            log::debug!("plot is not zoomable");
            return;
        };
        let was = self.chart.notifier().is_notify();
        self.chart.set_notify(false);
        f(z);
        drop(plot);
        if was {
            self.chart.set_notify(true);
        }
    }
}

impl Drop for ChartViewport {
    fn drop(&mut self) {
        self.chart.remove_change_listener(self.listener);
    }
}
