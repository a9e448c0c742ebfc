//! Rendering a chart to pixels or to a vector file.
//!
//! Raster output goes through plotters' bitmap backend into an in-memory
//! buffer and is encoded with the `image` crate. Vector formats are pluggable
//! via [`VectorExporter`]; SVG is built in, PDF only exists when the host
//! registers an exporter for it.

use std::fmt;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::str::FromStr;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, RgbImage, RgbaImage};
use plotters::prelude::*;
use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;

use crate::canvas::PlottersCanvas;
use crate::chart::Chart;
use crate::entity::ChartRenderingInfo;
use crate::error::{ChartError, ChartResult};
use crate::geom::{Rect, Size2D};

/// A 32-bit ARGB image, row-major, top row first.
#[derive(Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl fmt::Debug for RasterImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RasterImage({}x{})", self.width, self.height)
    }
}

impl RasterImage {
    /// A fully transparent image.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize],
        }
    }

    /// Opaque image from packed 8-bit RGB triples.
    pub fn from_rgb(width: u32, height: u32, rgb: &[u8]) -> ChartResult<Self> {
        let expected = width as usize * height as usize * 3;
        if rgb.len() != expected {
            return Err(ChartError::invalid(format!(
                "expected {expected} RGB bytes, got {}",
                rgb.len()
            )));
        }
        let pixels = rgb
            .chunks_exact(3)
            .map(|p| 0xFF00_0000 | (p[0] as u32) << 16 | (p[1] as u32) << 8 | p[2] as u32)
            .collect();
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// ARGB value at `(x, y)`; out-of-range coordinates read as transparent.
    pub fn pixel(&self, x: u32, y: u32) -> u32 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, argb: u32) {
        if x < self.width && y < self.height {
            self.pixels[y as usize * self.width as usize + x as usize] = argb;
        }
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn to_rgba(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width, self.height, |x, y| {
            let p = self.pixel(x, y);
            image::Rgba([(p >> 16) as u8, (p >> 8) as u8, p as u8, (p >> 24) as u8])
        })
    }

    pub fn to_rgb(&self) -> RgbImage {
        RgbImage::from_fn(self.width, self.height, |x, y| {
            let p = self.pixel(x, y);
            image::Rgb([(p >> 16) as u8, (p >> 8) as u8, p as u8])
        })
    }
}

/// Draw `chart` at `draw_size` (chart units) and scale the result to
/// `image_size` pixels. Entity shapes in `info` stay in chart units.
pub fn render_raster(
    chart: &mut Chart,
    draw_size: Size2D,
    image_size: (u32, u32),
    info: Option<&mut ChartRenderingInfo>,
) -> ChartResult<RasterImage> {
    let (w, h) = image_size;
    if w == 0 || h == 0 || draw_size.width <= 0.0 || draw_size.height <= 0.0 {
        return Err(ChartError::invalid(format!(
            "cannot render {}x{} chart into {w}x{h} pixels",
            draw_size.width, draw_size.height
        )));
    }
    let mut buffer = vec![255u8; w as usize * h as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (w, h)).into_drawing_area();
        let mut canvas = PlottersCanvas::with_scale(
            root,
            w as f64 / draw_size.width,
            h as f64 / draw_size.height,
        );
        chart.draw(
            &mut canvas,
            Rect::new(0.0, 0.0, draw_size.width, draw_size.height),
            info,
        )?;
        canvas.present()?;
    }
    RasterImage::from_rgb(w, h, &buffer)
}

fn render_at_size(
    chart: &mut Chart,
    width: u32,
    height: u32,
    info: Option<&mut ChartRenderingInfo>,
) -> ChartResult<RasterImage> {
    render_raster(
        chart,
        Size2D::new(width as f64, height as f64),
        (width, height),
        info,
    )
}

/// Render and write a PNG.
pub fn save_png(
    chart: &mut Chart,
    path: impl AsRef<Path>,
    width: u32,
    height: u32,
    info: Option<&mut ChartRenderingInfo>,
) -> ChartResult<()> {
    let img = render_at_size(chart, width, height, info)?;
    let out = BufWriter::new(File::create(path.as_ref())?);
    DynamicImage::ImageRgba8(img.to_rgba()).write_with_encoder(PngEncoder::new(out))?;
    log::info!("wrote {}", path.as_ref().display());
    Ok(())
}

/// Render and write a JPEG at `quality` (1-100).
pub fn save_jpeg(
    chart: &mut Chart,
    path: impl AsRef<Path>,
    width: u32,
    height: u32,
    quality: u8,
    info: Option<&mut ChartRenderingInfo>,
) -> ChartResult<()> {
    let img = render_at_size(chart, width, height, info)?;
    let out = BufWriter::new(File::create(path.as_ref())?);
    let encoder = JpegEncoder::new_with_quality(out, quality.clamp(1, 100));
    DynamicImage::ImageRgb8(img.to_rgb()).write_with_encoder(encoder)?;
    log::info!("wrote {}", path.as_ref().display());
    Ok(())
}

/// Output formats known by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Svg,
    Pdf,
}

impl ImageFormat {
    pub fn is_raster(self) -> bool {
        matches!(self, ImageFormat::Png | ImageFormat::Jpeg)
    }

    /// Guess from a file extension.
    pub fn from_path(path: &Path) -> ChartResult<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| ChartError::invalid(format!("no extension on {}", path.display())))?
            .parse()
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpeg",
            ImageFormat::Svg => "svg",
            ImageFormat::Pdf => "pdf",
        })
    }
}

impl FromStr for ImageFormat {
    type Err = ChartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(ImageFormat::Png),
            "jpg" | "jpeg" => Ok(ImageFormat::Jpeg),
            "svg" => Ok(ImageFormat::Svg),
            "pdf" => Ok(ImageFormat::Pdf),
            other => Err(ChartError::invalid(format!("unsupported image format: {other}"))),
        }
    }
}

/// Writes a chart in a vector format.
pub trait VectorExporter {
    fn format(&self) -> ImageFormat;

    fn export(&self, chart: &mut Chart, width: f64, height: f64, path: &Path) -> ChartResult<()>;
}

/// SVG through plotters' SVG backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct SvgExporter;

impl SvgExporter {
    pub fn render_string(
        &self,
        chart: &mut Chart,
        width: f64,
        height: f64,
        info: Option<&mut ChartRenderingInfo>,
    ) -> ChartResult<String> {
        let mut svg = String::new();
        {
            let size = (width.ceil().max(1.0) as u32, height.ceil().max(1.0) as u32);
            let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
            let mut canvas = PlottersCanvas::new(root);
            chart.draw(&mut canvas, Rect::new(0.0, 0.0, width, height), info)?;
            canvas.present()?;
        }
        Ok(svg)
    }
}

impl VectorExporter for SvgExporter {
    fn format(&self) -> ImageFormat {
        ImageFormat::Svg
    }

    fn export(&self, chart: &mut Chart, width: f64, height: f64, path: &Path) -> ChartResult<()> {
        let svg = self.render_string(chart, width, height, None)?;
        std::fs::write(path, svg)?;
        log::info!("wrote {}", path.display());
        Ok(())
    }
}

/// Vector exporters by format. Starts with SVG only.
pub struct ExporterRegistry {
    exporters: Vec<Box<dyn VectorExporter>>,
}

impl Default for ExporterRegistry {
    fn default() -> Self {
        Self {
            exporters: vec![Box::new(SvgExporter)],
        }
    }
}

impl fmt::Debug for ExporterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.exporters.iter().map(|e| e.format()))
            .finish()
    }
}

impl ExporterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the exporter for its format.
    pub fn register(&mut self, exporter: Box<dyn VectorExporter>) {
        let format = exporter.format();
        self.exporters.retain(|e| e.format() != format);
        self.exporters.push(exporter);
    }

    pub fn is_available(&self, format: ImageFormat) -> bool {
        self.exporters.iter().any(|e| e.format() == format)
    }

    pub fn get(&self, format: ImageFormat) -> ChartResult<&dyn VectorExporter> {
        self.exporters
            .iter()
            .find(|e| e.format() == format)
            .map(|e| e.as_ref())
            .ok_or_else(|| ChartError::Unavailable(format!("no {format} exporter registered")))
    }

    /// Write `chart` to `path`, choosing raster or vector output by extension.
    pub fn save(&self, chart: &mut Chart, path: &Path, width: u32, height: u32) -> ChartResult<()> {
        match ImageFormat::from_path(path)? {
            ImageFormat::Png => save_png(chart, path, width, height, None),
            ImageFormat::Jpeg => save_jpeg(chart, path, width, height, 90, None),
            vector => self
                .get(vector)?
                .export(chart, width as f64, height as f64, path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_packs_into_argb() {
        let img = RasterImage::from_rgb(2, 1, &[255, 0, 0, 0, 0, 255]).unwrap();
        assert_eq!(img.pixel(0, 0), 0xFFFF_0000);
        assert_eq!(img.pixel(1, 0), 0xFF00_00FF);
        assert_eq!(img.pixel(2, 0), 0);
        assert!(RasterImage::from_rgb(2, 2, &[0; 3]).is_err());
    }

    #[test]
    fn formats_parse_by_name_and_extension() {
        assert_eq!("JPG".parse::<ImageFormat>().unwrap(), ImageFormat::Jpeg);
        assert_eq!(
            ImageFormat::from_path(Path::new("out/chart.svg")).unwrap(),
            ImageFormat::Svg
        );
        assert!("gif".parse::<ImageFormat>().is_err());
    }

    #[test]
    fn pdf_needs_a_registered_exporter() {
        let registry = ExporterRegistry::new();
        assert!(registry.is_available(ImageFormat::Svg));
        assert!(matches!(
            registry.get(ImageFormat::Pdf),
            Err(ChartError::Unavailable(_))
        ));
    }
}
