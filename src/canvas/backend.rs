//! [`Canvas`] over any plotters `DrawingBackend` (bitmap, SVG).

use std::path::PathBuf;
use std::sync::OnceLock;

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontStyle, FontTransform};

use super::{Canvas, dash_runs};
use crate::error::{ChartError, ChartResult};
use crate::export::RasterImage;
use crate::geom::{Point, Rect, RectangleAnchor, Shape};
use crate::paint::{FontSpec, Paint, Stroke};
use crate::text::{TextMeasurer, estimate_text_width};

/// Env var naming a TrueType font to register as "sans-serif".
pub const FONT_ENV: &str = "BLOCKCHART_FONT";

const FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

static FONTS: OnceLock<bool> = OnceLock::new();

/// One-time registration for a "sans-serif" font on the `ab_glyph` text path,
/// which does not discover OS fonts. Returns whether text can be drawn.
pub fn ensure_fonts_registered() -> bool {
    *FONTS.get_or_init(|| {
        let candidates = std::env::var_os(FONT_ENV)
            .map(PathBuf::from)
            .into_iter()
            .chain(FONT_PATHS.iter().map(PathBuf::from));
        for path in candidates {
            let Ok(bytes) = std::fs::read(&path) else {
                continue;
            };
            // plotters keeps a reference for the life of the process
            let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
            if plotters::style::register_font("sans-serif", FontStyle::Normal, bytes).is_ok() {
                let _ = plotters::style::register_font("sans-serif", FontStyle::Bold, bytes);
                log::debug!("registered font {}", path.display());
                return true;
            }
        }
        log::warn!("no usable font found (set {FONT_ENV}); text will not be drawn");
        false
    })
}

fn text_pos(anchor: RectangleAnchor) -> Pos {
    let (h, v) = match anchor {
        RectangleAnchor::TopLeft => (HPos::Left, VPos::Top),
        RectangleAnchor::Top => (HPos::Center, VPos::Top),
        RectangleAnchor::TopRight => (HPos::Right, VPos::Top),
        RectangleAnchor::Left => (HPos::Left, VPos::Center),
        RectangleAnchor::Center => (HPos::Center, VPos::Center),
        RectangleAnchor::Right => (HPos::Right, VPos::Center),
        RectangleAnchor::BottomLeft => (HPos::Left, VPos::Bottom),
        RectangleAnchor::Bottom => (HPos::Center, VPos::Bottom),
        RectangleAnchor::BottomRight => (HPos::Right, VPos::Bottom),
    };
    Pos::new(h, v)
}

// plotters only rotates in quarter turns
fn text_transform(angle: f64) -> FontTransform {
    let quarter = (angle / std::f64::consts::FRAC_PI_2).round() as i64;
    match quarter.rem_euclid(4) {
        1 => FontTransform::Rotate90,
        2 => FontTransform::Rotate180,
        3 => FontTransform::Rotate270,
        _ => FontTransform::None,
    }
}

fn font_desc(font: &FontSpec, scale: f64) -> FontDesc<'static> {
    let style = if font.bold {
        FontStyle::Bold
    } else {
        FontStyle::Normal
    };
    (FontFamily::SansSerif, font.size * scale)
        .into_font()
        .style(style)
}

pub struct PlottersCanvas<DB: DrawingBackend> {
    root: DrawingArea<DB, Shift>,
    scale_x: f64,
    scale_y: f64,
    clip: Option<Rect>,
    fonts: bool,
}

impl<DB: DrawingBackend> PlottersCanvas<DB> {
    pub fn new(root: DrawingArea<DB, Shift>) -> Self {
        Self::with_scale(root, 1.0, 1.0)
    }

    /// Chart coordinates are multiplied by `(scale_x, scale_y)` to reach pixels.
    pub fn with_scale(root: DrawingArea<DB, Shift>, scale_x: f64, scale_y: f64) -> Self {
        Self {
            root,
            scale_x,
            scale_y,
            clip: None,
            fonts: ensure_fonts_registered(),
        }
    }

    pub fn present(&self) -> ChartResult<()> {
        self.root.present().map_err(ChartError::render)
    }

    /// The area to draw into and its pixel offset; `None` when clipped away.
    fn target(&self) -> Option<(DrawingArea<DB, Shift>, f64, f64)> {
        let Some(clip) = self.clip else {
            return Some((self.root.clone(), 0.0, 0.0));
        };
        let (w, h) = self.root.dim_in_pixel();
        let px = clip
            .scale(self.scale_x, self.scale_y)
            .intersection(&Rect::new(0.0, 0.0, w as f64, h as f64));
        if px.is_empty() {
            return None;
        }
        let (x0, y0) = (px.x.floor(), px.y.floor());
        let (x1, y1) = (px.max_x().ceil(), px.max_y().ceil());
        let area = self
            .root
            .clone()
            .shrink((x0 as i32, y0 as i32), ((x1 - x0) as u32, (y1 - y0) as u32));
        Some((area, x0, y0))
    }

    fn px(&self, p: Point, ox: f64, oy: f64) -> (i32, i32) {
        (
            (p.x * self.scale_x - ox).round() as i32,
            (p.y * self.scale_y - oy).round() as i32,
        )
    }

    fn stroke_px(&self, stroke: &Stroke) -> u32 {
        (stroke.width * self.scale_x.min(self.scale_y)).round().max(1.0) as u32
    }

    fn draw_runs(&self, points: &[Point], paint: &Paint, stroke: &Stroke) -> ChartResult<()> {
        if paint.3 <= 0.0 || stroke.width <= 0.0 {
            return Ok(());
        }
        let Some((area, ox, oy)) = self.target() else {
            return Ok(());
        };
        let style = paint.stroke_width(self.stroke_px(stroke));
        for run in dash_runs(points, stroke) {
            let pts: Vec<(i32, i32)> = run.iter().map(|p| self.px(*p, ox, oy)).collect();
            area.draw(&PathElement::new(pts, style))
                .map_err(ChartError::render)?;
        }
        Ok(())
    }
}

impl<DB: DrawingBackend> TextMeasurer for PlottersCanvas<DB> {
    fn text_width(&self, text: &str, font: &FontSpec) -> f64 {
        if !self.fonts {
            return estimate_text_width(text, font);
        }
        let style = TextStyle::from(font_desc(font, 1.0));
        match self.root.estimate_text_size(text, &style) {
            Ok((w, _)) => w as f64,
            Err(_) => estimate_text_width(text, font),
        }
    }
}

impl<DB: DrawingBackend> Canvas for PlottersCanvas<DB> {
    fn as_measurer(&self) -> &dyn TextMeasurer {
        self
    }

    fn fill_shape(&mut self, shape: &Shape, paint: &Paint) -> ChartResult<()> {
        if paint.3 <= 0.0 {
            return Ok(());
        }
        let Some((area, ox, oy)) = self.target() else {
            return Ok(());
        };
        let style = paint.filled();
        match shape {
            Shape::Rect(r) => {
                let a = self.px(Point::new(r.min_x(), r.min_y()), ox, oy);
                let b = self.px(Point::new(r.max_x(), r.max_y()), ox, oy);
                area.draw(&Rectangle::new([a, b], style))
                    .map_err(ChartError::render)?;
            }
            _ => {
                let pts: Vec<(i32, i32)> = shape
                    .to_polygon(48)
                    .iter()
                    .map(|p| self.px(*p, ox, oy))
                    .collect();
                area.draw(&Polygon::new(pts, style))
                    .map_err(ChartError::render)?;
            }
        }
        Ok(())
    }

    fn stroke_shape(&mut self, shape: &Shape, paint: &Paint, stroke: &Stroke) -> ChartResult<()> {
        let mut pts = shape.to_polygon(48);
        if let Some(first) = pts.first().copied() {
            pts.push(first);
        }
        self.draw_runs(&pts, paint, stroke)
    }

    fn draw_line(
        &mut self,
        from: Point,
        to: Point,
        paint: &Paint,
        stroke: &Stroke,
    ) -> ChartResult<()> {
        self.draw_runs(&[from, to], paint, stroke)
    }

    fn draw_polyline(&mut self, points: &[Point], paint: &Paint, stroke: &Stroke) -> ChartResult<()> {
        self.draw_runs(points, paint, stroke)
    }

    fn draw_text(
        &mut self,
        text: &str,
        x: f64,
        y: f64,
        font: &FontSpec,
        paint: &Paint,
        anchor: RectangleAnchor,
        angle: f64,
    ) -> ChartResult<()> {
        if !self.fonts || text.is_empty() {
            return Ok(());
        }
        let Some((area, ox, oy)) = self.target() else {
            return Ok(());
        };
        let scale = self.scale_x.min(self.scale_y);
        let style = TextStyle::from(font_desc(font, scale))
            .color(paint)
            .pos(text_pos(anchor))
            .transform(text_transform(angle));
        area.draw_text(text, &style, self.px(Point::new(x, y), ox, oy))
            .map_err(ChartError::render)
    }

    fn draw_image(&mut self, image: &RasterImage, dest: Rect) -> ChartResult<()> {
        if dest.is_empty() || image.width() == 0 || image.height() == 0 {
            return Ok(());
        }
        let Some((area, ox, oy)) = self.target() else {
            return Ok(());
        };
        let d = dest.scale(self.scale_x, self.scale_y);
        let (iw, ih) = (image.width() as f64, image.height() as f64);
        for py in d.min_y().floor() as i64..d.max_y().ceil() as i64 {
            let v = (((py as f64 + 0.5 - d.y) / d.height * ih) as u32).min(image.height() - 1);
            for px in d.min_x().floor() as i64..d.max_x().ceil() as i64 {
                let u = (((px as f64 + 0.5 - d.x) / d.width * iw) as u32).min(image.width() - 1);
                let argb = image.pixel(u, v);
                let a = (argb >> 24) as u8;
                if a == 0 {
                    continue;
                }
                let c = RGBAColor(
                    (argb >> 16) as u8,
                    (argb >> 8) as u8,
                    argb as u8,
                    a as f64 / 255.0,
                );
                area.draw_pixel(
                    ((px as f64 - ox) as i32, (py as f64 - oy) as i32),
                    &c,
                )
                .map_err(ChartError::render)?;
            }
        }
        Ok(())
    }

    fn clip(&self) -> Option<Rect> {
        self.clip
    }

    fn set_clip(&mut self, clip: Option<Rect>) {
        self.clip = clip;
    }
}
