use super::Canvas;
use crate::error::ChartResult;
use crate::export::RasterImage;
use crate::geom::{Point, Rect, RectangleAnchor, Shape};
use crate::paint::{FontSpec, Paint, Stroke};
use crate::text::{HeuristicTextMeasurer, TextMeasurer};

/// One recorded canvas call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Fill {
        shape: Shape,
        paint: Paint,
    },
    Stroke {
        shape: Shape,
        paint: Paint,
        width: f64,
    },
    Line {
        from: Point,
        to: Point,
        paint: Paint,
        width: f64,
    },
    Text {
        text: String,
        x: f64,
        y: f64,
        anchor: RectangleAnchor,
        angle: f64,
    },
    Image {
        dest: Rect,
        width: u32,
        height: u32,
    },
    Clip(Option<Rect>),
    BeginElement(String),
    EndElement,
}

/// Headless canvas that records every call; text is measured heuristically.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    ops: Vec<DrawOp>,
    clip: Option<Rect>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }

    /// Text strings in draw order.
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn fill_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Fill { .. }))
            .count()
    }
}

impl TextMeasurer for RecordingCanvas {
    fn text_width(&self, text: &str, font: &FontSpec) -> f64 {
        HeuristicTextMeasurer.text_width(text, font)
    }
}

impl Canvas for RecordingCanvas {
    fn as_measurer(&self) -> &dyn TextMeasurer {
        self
    }

    fn fill_shape(&mut self, shape: &Shape, paint: &Paint) -> ChartResult<()> {
        self.ops.push(DrawOp::Fill {
            shape: shape.clone(),
            paint: *paint,
        });
        Ok(())
    }

    fn stroke_shape(&mut self, shape: &Shape, paint: &Paint, stroke: &Stroke) -> ChartResult<()> {
        self.ops.push(DrawOp::Stroke {
            shape: shape.clone(),
            paint: *paint,
            width: stroke.width,
        });
        Ok(())
    }

    fn draw_line(
        &mut self,
        from: Point,
        to: Point,
        paint: &Paint,
        stroke: &Stroke,
    ) -> ChartResult<()> {
        self.ops.push(DrawOp::Line {
            from,
            to,
            paint: *paint,
            width: stroke.width,
        });
        Ok(())
    }

    fn draw_text(
        &mut self,
        text: &str,
        x: f64,
        y: f64,
        _font: &FontSpec,
        _paint: &Paint,
        anchor: RectangleAnchor,
        angle: f64,
    ) -> ChartResult<()> {
        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            x,
            y,
            anchor,
            angle,
        });
        Ok(())
    }

    fn draw_image(&mut self, image: &RasterImage, dest: Rect) -> ChartResult<()> {
        self.ops.push(DrawOp::Image {
            dest,
            width: image.width(),
            height: image.height(),
        });
        Ok(())
    }

    fn clip(&self) -> Option<Rect> {
        self.clip
    }

    fn set_clip(&mut self, clip: Option<Rect>) {
        self.clip = clip;
        self.ops.push(DrawOp::Clip(clip));
    }

    fn begin_element(&mut self, id: &str) {
        self.ops.push(DrawOp::BeginElement(id.to_string()));
    }

    fn end_element(&mut self) {
        self.ops.push(DrawOp::EndElement);
    }
}
