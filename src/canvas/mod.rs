//! Rendering sink.
//!
//! Everything in the chart draws through [`Canvas`]. Coordinates are chart space;
//! an implementation may scale them to device pixels.

mod backend;
mod recording;

pub use self::backend::{PlottersCanvas, ensure_fonts_registered};
pub use self::recording::{DrawOp, RecordingCanvas};

use crate::error::ChartResult;
use crate::export::RasterImage;
use crate::geom::{Point, Rect, RectangleAnchor, Shape};
use crate::paint::{FontSpec, Paint, Stroke};
use crate::text::TextMeasurer;

pub trait Canvas: TextMeasurer {
    fn as_measurer(&self) -> &dyn TextMeasurer;

    fn fill_shape(&mut self, shape: &Shape, paint: &Paint) -> ChartResult<()>;

    fn stroke_shape(&mut self, shape: &Shape, paint: &Paint, stroke: &Stroke) -> ChartResult<()>;

    fn draw_line(&mut self, from: Point, to: Point, paint: &Paint, stroke: &Stroke)
    -> ChartResult<()>;

    fn draw_polyline(&mut self, points: &[Point], paint: &Paint, stroke: &Stroke) -> ChartResult<()> {
        for w in points.windows(2) {
            self.draw_line(w[0], w[1], paint, stroke)?;
        }
        Ok(())
    }

    /// Draw one line of text so that `anchor` of its bounding box lands on
    /// `(x, y)`, rotated by `angle` radians (clockwise, y down) about that point.
    #[allow(clippy::too_many_arguments)]
    fn draw_text(
        &mut self,
        text: &str,
        x: f64,
        y: f64,
        font: &FontSpec,
        paint: &Paint,
        anchor: RectangleAnchor,
        angle: f64,
    ) -> ChartResult<()>;

    /// Alpha-composite `image` into `dest`, scaling nearest-neighbour.
    fn draw_image(&mut self, image: &RasterImage, dest: Rect) -> ChartResult<()>;

    fn clip(&self) -> Option<Rect>;

    fn set_clip(&mut self, clip: Option<Rect>);

    /// Structural hint for vector outputs; raster canvases ignore it.
    fn begin_element(&mut self, _id: &str) {}

    fn end_element(&mut self) {}
}

/// Split a polyline into the "on" runs of a dash pattern. Solid strokes come
/// back as a single run.
pub fn dash_runs(points: &[Point], stroke: &Stroke) -> Vec<Vec<Point>> {
    let pattern = stroke.dash.pattern();
    if pattern.is_empty() || points.len() < 2 {
        return vec![points.to_vec()];
    }
    let unit = stroke.width.max(1.0);
    let mut runs = Vec::new();
    let mut current: Vec<Point> = vec![points[0]];
    let mut idx = 0usize;
    let mut left = pattern[0] * unit;
    let mut on = true;
    for w in points.windows(2) {
        let (a, b) = (w[0], w[1]);
        let len = ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt();
        let mut t = 0.0;
        while len - t > left {
            t += left;
            let p = Point::new(a.x + (b.x - a.x) * t / len, a.y + (b.y - a.y) * t / len);
            if on {
                current.push(p);
                runs.push(std::mem::take(&mut current));
            } else {
                current = vec![p];
            }
            on = !on;
            idx = (idx + 1) % pattern.len();
            left = pattern[idx] * unit;
        }
        left -= len - t;
        if on {
            current.push(b);
        }
    }
    if on && current.len() > 1 {
        runs.push(current);
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::LineDash;

    #[test]
    fn dashes_split_a_line() {
        let pts = [Point::new(0.0, 0.0), Point::new(20.0, 0.0)];
        let runs = dash_runs(&pts, &Stroke::dashed(1.0, LineDash::Dash));
        // 6 on, 4 off, 6 on, 4 off
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].last().map(|p| p.x), Some(6.0));
        assert_eq!(runs[1].first().map(|p| p.x), Some(10.0));
    }

    #[test]
    fn solid_is_one_run() {
        let pts = [Point::new(0.0, 0.0), Point::new(5.0, 5.0)];
        assert_eq!(dash_runs(&pts, &Stroke::new(2.0)).len(), 1);
    }
}
