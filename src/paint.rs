//! Paints, strokes, fonts, and the default series styling sequence.
//!
//! Colors are plotters' [`RGBAColor`] so they flow straight into the backend.
//! Series colors follow the Microsoft Office (2013+) chart palette; series shapes
//! cycle through [`MarkerShape`] so that adjacent series stay distinguishable
//! without color.

use crate::geom::{Point, Rect, Shape};
use plotters::style::{Color, RGBAColor, RGBColor};
use serde::{Deserialize, Serialize};

pub use plotters::style::RGBAColor as Paint;

pub const WHITE: Paint = RGBAColor(255, 255, 255, 1.0);
pub const BLACK: Paint = RGBAColor(0, 0, 0, 1.0);
pub const GRAY: Paint = RGBAColor(128, 128, 128, 1.0);
pub const LIGHT_GRAY: Paint = RGBAColor(192, 192, 192, 1.0);
pub const TRANSPARENT: Paint = RGBAColor(0, 0, 0, 0.0);

/// Microsoft Office (2013+) chart series palette.
/// Order: Blue, Orange, Gray, Gold, Light Blue, Green, Dark Blue, Dark Orange, Dark Gray, Brownish Gold.
const OFFICE10: [RGBColor; 10] = [
    RGBColor(68, 114, 196),  // blue      (#4472C4)
    RGBColor(237, 125, 49),  // orange    (#ED7D31)
    RGBColor(165, 165, 165), // gray      (#A5A5A5)
    RGBColor(255, 192, 0),   // gold      (#FFC000)
    RGBColor(91, 155, 213),  // light blue(#5B9BD5)
    RGBColor(112, 173, 71),  // green     (#70AD47)
    RGBColor(38, 68, 120),   // dark blue (#264478)
    RGBColor(158, 72, 14),   // dark org. (#9E480E)
    RGBColor(99, 99, 99),    // dark gray (#636363)
    RGBColor(153, 115, 0),   // brownish  (#997300)
];

/// Get a color from the Office palette.
#[inline]
pub fn office_color(idx: usize) -> Paint {
    OFFICE10[idx % OFFICE10.len()].to_rgba()
}

/// Parse `#RRGGBB` or `#RRGGBBAA`.
pub fn parse_hex_color(s: &str) -> Option<Paint> {
    let hex = s.trim().strip_prefix('#')?;
    let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    match hex.len() {
        6 => Some(RGBAColor(byte(0)?, byte(2)?, byte(4)?, 1.0)),
        8 => Some(RGBAColor(
            byte(0)?,
            byte(2)?,
            byte(4)?,
            byte(6)? as f64 / 255.0,
        )),
        _ => None,
    }
}

/// `#RRGGBB` for a paint (alpha dropped).
pub fn to_hex(p: &Paint) -> String {
    format!("#{:02X}{:02X}{:02X}", p.0, p.1, p.2)
}

/// Marker shape for data points and legend graphics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerShape {
    Square,
    #[default]
    Circle,
    Triangle,
    Diamond,
    Cross,
    X,
}

impl MarkerShape {
    pub const ALL: [MarkerShape; 6] = [
        MarkerShape::Square,
        MarkerShape::Circle,
        MarkerShape::Triangle,
        MarkerShape::Diamond,
        MarkerShape::Cross,
        MarkerShape::X,
    ];

    /// The marker as a fillable shape of half-size `s` centred on `c`.
    /// Cross and X become thin polygons so they still hit-test.
    pub fn to_shape(self, c: Point, s: f64) -> Shape {
        let p = |dx: f64, dy: f64| Point::new(c.x + dx, c.y + dy);
        match self {
            MarkerShape::Square => Shape::Rect(Rect::new(c.x - s, c.y - s, 2.0 * s, 2.0 * s)),
            MarkerShape::Circle => Shape::Ellipse(Rect::new(c.x - s, c.y - s, 2.0 * s, 2.0 * s)),
            MarkerShape::Triangle => Shape::Polygon(vec![p(0.0, -s), p(s, s), p(-s, s)]),
            MarkerShape::Diamond => Shape::Polygon(vec![p(0.0, -s), p(s, 0.0), p(0.0, s), p(-s, 0.0)]),
            MarkerShape::Cross => {
                let t = s / 3.0;
                Shape::Polygon(vec![
                    p(-t, -s),
                    p(t, -s),
                    p(t, -t),
                    p(s, -t),
                    p(s, t),
                    p(t, t),
                    p(t, s),
                    p(-t, s),
                    p(-t, t),
                    p(-s, t),
                    p(-s, -t),
                    p(-t, -t),
                ])
            }
            MarkerShape::X => {
                let t = s / 3.0;
                Shape::Polygon(vec![
                    p(-s, -s + t),
                    p(-s + t, -s),
                    p(0.0, -t),
                    p(s - t, -s),
                    p(s, -s + t),
                    p(t, 0.0),
                    p(s, s - t),
                    p(s - t, s),
                    p(0.0, t),
                    p(-s + t, s),
                    p(-s, s - t),
                    p(-t, 0.0),
                ])
            }
        }
    }
}

/// Line dash pattern.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineDash {
    #[default]
    Solid,
    Dash,
    Dot,
    DashDot,
}

impl LineDash {
    /// On/off segment lengths in units of the stroke width; empty for solid.
    pub fn pattern(self) -> &'static [f64] {
        match self {
            LineDash::Solid => &[],
            LineDash::Dash => &[6.0, 4.0],
            LineDash::Dot => &[1.5, 3.0],
            LineDash::DashDot => &[6.0, 3.0, 1.5, 3.0],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub width: f64,
    #[serde(default)]
    pub dash: LineDash,
}

impl Stroke {
    pub const fn new(width: f64) -> Self {
        Self {
            width,
            dash: LineDash::Solid,
        }
    }

    pub const fn dashed(width: f64, dash: LineDash) -> Self {
        Self { width, dash }
    }
}

impl Default for Stroke {
    fn default() -> Self {
        Stroke::new(1.0)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    pub family: String,
    pub size: f64,
    #[serde(default)]
    pub bold: bool,
}

impl FontSpec {
    pub fn new(family: impl Into<String>, size: f64) -> Self {
        Self {
            family: family.into(),
            size,
            bold: false,
        }
    }

    pub fn sans(size: f64) -> Self {
        Self::new("sans-serif", size)
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

impl Default for FontSpec {
    fn default() -> Self {
        FontSpec::sans(12.0)
    }
}

/// Hands out series paints and shapes in a fixed cycle.
#[derive(Clone, Debug, Default)]
pub struct DrawingSupplier {
    next_paint: usize,
    next_shape: usize,
}

impl DrawingSupplier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_paint(&mut self) -> Paint {
        let p = office_color(self.next_paint);
        self.next_paint += 1;
        p
    }

    pub fn next_shape(&mut self) -> MarkerShape {
        let s = MarkerShape::ALL[self.next_shape % MarkerShape::ALL.len()];
        self.next_shape += 1;
        s
    }

    /// The paint that the n-th series gets, without advancing the cycle.
    pub fn series_paint(series: usize) -> Paint {
        office_color(series)
    }

    pub fn series_shape(series: usize) -> MarkerShape {
        MarkerShape::ALL[series % MarkerShape::ALL.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors() {
        let c = parse_hex_color("#4472C4").unwrap();
        assert_eq!((c.0, c.1, c.2), (68, 114, 196));
        assert_eq!(to_hex(&c), "#4472C4");
        assert!(parse_hex_color("4472C4").is_none());
        assert!(parse_hex_color("#12345").is_none());
    }

    #[test]
    fn supplier_cycles() {
        let mut s = DrawingSupplier::new();
        let first = s.next_paint();
        for _ in 0..9 {
            s.next_paint();
        }
        assert_eq!(s.next_paint(), first);
    }
}
