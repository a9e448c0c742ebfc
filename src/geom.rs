//! Geometry primitives shared by layout, rendering, and hit testing.
//!
//! All coordinates are `f64` in chart drawing space (y grows downwards).

use crate::error::{ChartError, ChartResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A point in chart drawing space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size2D {
    pub width: f64,
    pub height: f64,
}

impl Size2D {
    pub const ZERO: Size2D = Size2D {
        width: 0.0,
        height: 0.0,
    };

    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// An axis-aligned rectangle given by its top-left corner and size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build from two corners; the corners may be given in any order.
    pub fn from_points(a: Point, b: Point) -> Self {
        let x0 = a.x.min(b.x);
        let y0 = a.y.min(b.y);
        Self::new(x0, y0, (a.x - b.x).abs(), (a.y - b.y).abs())
    }

    pub fn min_x(&self) -> f64 {
        self.x
    }

    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    pub fn min_y(&self) -> f64 {
        self.y
    }

    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    pub fn size(&self) -> Size2D {
        Size2D::new(self.width, self.height)
    }

    /// A rectangle with no area (zero or negative extent on either axis).
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Half-open containment: the right and bottom edges are outside.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && y >= self.y && x < self.max_x() && y < self.max_y()
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    pub fn scale(&self, sx: f64, sy: f64) -> Rect {
        Rect::new(self.x * sx, self.y * sy, self.width * sx, self.height * sy)
    }

    /// Overlap of two rectangles; empty (zero-sized) when they do not meet.
    pub fn intersection(&self, other: &Rect) -> Rect {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = self.max_x().min(other.max_x());
        let y1 = self.max_y().min(other.max_y());
        Rect::new(x0, y0, (x1 - x0).max(0.0), (y1 - y0).max(0.0))
    }

    pub fn union(&self, other: &Rect) -> Rect {
        let x0 = self.x.min(other.x);
        let y0 = self.y.min(other.y);
        let x1 = self.max_x().max(other.max_x());
        let y1 = self.max_y().max(other.max_y());
        Rect::new(x0, y0, x1 - x0, y1 - y0)
    }
}

/// A hit-testable region. Entities store one of these in chart space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Rect(Rect),
    Ellipse(Rect),
    Polygon(Vec<Point>),
}

impl Shape {
    pub fn bounds(&self) -> Rect {
        match self {
            Shape::Rect(r) | Shape::Ellipse(r) => *r,
            Shape::Polygon(pts) => {
                let Some(first) = pts.first() else {
                    return Rect::default();
                };
                let (mut x0, mut y0, mut x1, mut y1) = (first.x, first.y, first.x, first.y);
                for p in pts.iter().skip(1) {
                    x0 = x0.min(p.x);
                    y0 = y0.min(p.y);
                    x1 = x1.max(p.x);
                    y1 = y1.max(p.y);
                }
                Rect::new(x0, y0, x1 - x0, y1 - y0)
            }
        }
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        match self {
            Shape::Rect(r) => r.contains(x, y),
            Shape::Ellipse(r) => {
                if r.is_empty() {
                    return false;
                }
                let rx = r.width / 2.0;
                let ry = r.height / 2.0;
                let dx = (x - r.center_x()) / rx;
                let dy = (y - r.center_y()) / ry;
                dx * dx + dy * dy <= 1.0
            }
            Shape::Polygon(pts) => polygon_contains(pts, x, y),
        }
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Shape {
        match self {
            Shape::Rect(r) => Shape::Rect(r.translate(dx, dy)),
            Shape::Ellipse(r) => Shape::Ellipse(r.translate(dx, dy)),
            Shape::Polygon(pts) => Shape::Polygon(
                pts.iter()
                    .map(|p| Point::new(p.x + dx, p.y + dy))
                    .collect(),
            ),
        }
    }

    pub fn scale(&self, sx: f64, sy: f64) -> Shape {
        match self {
            Shape::Rect(r) => Shape::Rect(r.scale(sx, sy)),
            Shape::Ellipse(r) => Shape::Ellipse(r.scale(sx, sy)),
            Shape::Polygon(pts) => Shape::Polygon(
                pts.iter()
                    .map(|p| Point::new(p.x * sx, p.y * sy))
                    .collect(),
            ),
        }
    }

    /// Approximate the outline as a closed polygon (ellipses use `segments` points).
    pub fn to_polygon(&self, segments: usize) -> Vec<Point> {
        match self {
            Shape::Rect(r) => vec![
                Point::new(r.min_x(), r.min_y()),
                Point::new(r.max_x(), r.min_y()),
                Point::new(r.max_x(), r.max_y()),
                Point::new(r.min_x(), r.max_y()),
            ],
            Shape::Ellipse(r) => {
                let n = segments.max(8);
                (0..n)
                    .map(|i| {
                        let t = i as f64 / n as f64 * std::f64::consts::TAU;
                        Point::new(
                            r.center_x() + r.width / 2.0 * t.cos(),
                            r.center_y() + r.height / 2.0 * t.sin(),
                        )
                    })
                    .collect()
            }
            Shape::Polygon(pts) => pts.clone(),
        }
    }
}

// Even-odd ray casting.
fn polygon_contains(pts: &[Point], x: f64, y: f64) -> bool {
    if pts.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = pts.len() - 1;
    for i in 0..pts.len() {
        let (pi, pj) = (pts[i], pts[j]);
        if (pi.y > y) != (pj.y > y) && x < (pj.x - pi.x) * (y - pi.y) / (pj.y - pi.y) + pi.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Horizontal alignment of a block within a wider area.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalAlignment {
    Left,
    #[default]
    Center,
    Right,
}

/// Vertical alignment of a block within a taller area.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlignment {
    Top,
    #[default]
    Center,
    Bottom,
}

/// One of the four edges of a rectangle; used for title and axis positions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RectangleEdge {
    #[default]
    Top,
    Bottom,
    Left,
    Right,
}

impl RectangleEdge {
    pub fn is_top_or_bottom(self) -> bool {
        matches!(self, RectangleEdge::Top | RectangleEdge::Bottom)
    }

    pub fn is_left_or_right(self) -> bool {
        matches!(self, RectangleEdge::Left | RectangleEdge::Right)
    }

    pub fn opposite(self) -> RectangleEdge {
        match self {
            RectangleEdge::Top => RectangleEdge::Bottom,
            RectangleEdge::Bottom => RectangleEdge::Top,
            RectangleEdge::Left => RectangleEdge::Right,
            RectangleEdge::Right => RectangleEdge::Left,
        }
    }

    /// The coordinate of this edge of `r`.
    pub fn coordinate(self, r: &Rect) -> f64 {
        match self {
            RectangleEdge::Top => r.min_y(),
            RectangleEdge::Bottom => r.max_y(),
            RectangleEdge::Left => r.min_x(),
            RectangleEdge::Right => r.max_x(),
        }
    }
}

impl fmt::Display for RectangleEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RectangleEdge::Top => "top",
            RectangleEdge::Bottom => "bottom",
            RectangleEdge::Left => "left",
            RectangleEdge::Right => "right",
        };
        f.write_str(s)
    }
}

impl FromStr for RectangleEdge {
    type Err = ChartError;

    /// Accepts `top`, `bottom`, `left`, `right` (case-insensitive); anything else is fatal.
    fn from_str(s: &str) -> ChartResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "top" => Ok(RectangleEdge::Top),
            "bottom" => Ok(RectangleEdge::Bottom),
            "left" => Ok(RectangleEdge::Left),
            "right" => Ok(RectangleEdge::Right),
            _ => Err(ChartError::UnknownEdge(s.to_string())),
        }
    }
}

/// Anchor points on a rectangle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RectangleAnchor {
    #[default]
    Center,
    Top,
    TopLeft,
    TopRight,
    Bottom,
    BottomLeft,
    BottomRight,
    Left,
    Right,
}

impl RectangleAnchor {
    /// The anchor's location on `r`.
    pub fn coordinates(self, r: &Rect) -> Point {
        let (x, y) = match self {
            RectangleAnchor::Center => (r.center_x(), r.center_y()),
            RectangleAnchor::Top => (r.center_x(), r.min_y()),
            RectangleAnchor::TopLeft => (r.min_x(), r.min_y()),
            RectangleAnchor::TopRight => (r.max_x(), r.min_y()),
            RectangleAnchor::Bottom => (r.center_x(), r.max_y()),
            RectangleAnchor::BottomLeft => (r.min_x(), r.max_y()),
            RectangleAnchor::BottomRight => (r.max_x(), r.max_y()),
            RectangleAnchor::Left => (r.min_x(), r.center_y()),
            RectangleAnchor::Right => (r.max_x(), r.center_y()),
        };
        Point::new(x, y)
    }

    /// A rectangle of `size` positioned so that this anchor lands on `(x, y)`.
    pub fn create_rectangle(self, size: Size2D, x: f64, y: f64) -> Rect {
        let (w, h) = (size.width, size.height);
        let (x0, y0) = match self {
            RectangleAnchor::Center => (x - w / 2.0, y - h / 2.0),
            RectangleAnchor::Top => (x - w / 2.0, y),
            RectangleAnchor::TopLeft => (x, y),
            RectangleAnchor::TopRight => (x - w, y),
            RectangleAnchor::Bottom => (x - w / 2.0, y - h),
            RectangleAnchor::BottomLeft => (x, y - h),
            RectangleAnchor::BottomRight => (x - w, y - h),
            RectangleAnchor::Left => (x, y - h / 2.0),
            RectangleAnchor::Right => (x - w, y - h / 2.0),
        };
        Rect::new(x0, y0, w, h)
    }
}

/// Whether inset values are absolute lengths or fractions of the base length.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitType {
    #[default]
    Absolute,
    Relative,
}

/// Space reserved on each side of a rectangle.
///
/// `trim_*` removes the insets from a total length, `extend_*` adds them to a
/// content length; for any length where trimming did not clamp, the two are
/// exact inverses, including for [`UnitType::Relative`] insets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectangleInsets {
    #[serde(default)]
    pub unit: UnitType,
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
}

impl Default for RectangleInsets {
    fn default() -> Self {
        Self::ZERO
    }
}

impl RectangleInsets {
    pub const ZERO: RectangleInsets = RectangleInsets {
        unit: UnitType::Absolute,
        top: 0.0,
        left: 0.0,
        bottom: 0.0,
        right: 0.0,
    };

    /// Absolute insets, in `top, left, bottom, right` order.
    pub const fn new(top: f64, left: f64, bottom: f64, right: f64) -> Self {
        Self {
            unit: UnitType::Absolute,
            top,
            left,
            bottom,
            right,
        }
    }

    pub const fn uniform(v: f64) -> Self {
        Self::new(v, v, v, v)
    }

    pub const fn relative(top: f64, left: f64, bottom: f64, right: f64) -> Self {
        Self {
            unit: UnitType::Relative,
            top,
            left,
            bottom,
            right,
        }
    }

    fn inset(&self, v: f64, base: f64) -> f64 {
        match self.unit {
            UnitType::Absolute => v,
            UnitType::Relative => v * base,
        }
    }

    // For relative insets the outset is computed against the (unknown) total,
    // which is content / (1 - a - b).
    fn outset(&self, v: f64, a: f64, b: f64, content: f64) -> f64 {
        match self.unit {
            UnitType::Absolute => v,
            UnitType::Relative => {
                let denom = 1.0 - a - b;
                if denom <= 0.0 { 0.0 } else { content / denom * v }
            }
        }
    }

    pub fn calculate_top_inset(&self, height: f64) -> f64 {
        self.inset(self.top, height)
    }

    pub fn calculate_bottom_inset(&self, height: f64) -> f64 {
        self.inset(self.bottom, height)
    }

    pub fn calculate_left_inset(&self, width: f64) -> f64 {
        self.inset(self.left, width)
    }

    pub fn calculate_right_inset(&self, width: f64) -> f64 {
        self.inset(self.right, width)
    }

    pub fn trim_width(&self, width: f64) -> f64 {
        width - self.calculate_left_inset(width) - self.calculate_right_inset(width)
    }

    pub fn trim_height(&self, height: f64) -> f64 {
        height - self.calculate_top_inset(height) - self.calculate_bottom_inset(height)
    }

    pub fn extend_width(&self, width: f64) -> f64 {
        width
            + self.outset(self.left, self.left, self.right, width)
            + self.outset(self.right, self.left, self.right, width)
    }

    pub fn extend_height(&self, height: f64) -> f64 {
        height
            + self.outset(self.top, self.top, self.bottom, height)
            + self.outset(self.bottom, self.top, self.bottom, height)
    }

    /// Shrink `r` by the insets; width and height never go negative.
    pub fn trim(&self, r: &Rect) -> Rect {
        let top = self.calculate_top_inset(r.height);
        let bottom = self.calculate_bottom_inset(r.height);
        let left = self.calculate_left_inset(r.width);
        let right = self.calculate_right_inset(r.width);
        Rect::new(
            r.x + left,
            r.y + top,
            (r.width - left - right).max(0.0),
            (r.height - top - bottom).max(0.0),
        )
    }

    /// Grow `r` outwards by the insets (inverse of [`RectangleInsets::trim`]).
    pub fn extend(&self, r: &Rect) -> Rect {
        let left = self.outset(self.left, self.left, self.right, r.width);
        let right = self.outset(self.right, self.left, self.right, r.width);
        let top = self.outset(self.top, self.top, self.bottom, r.height);
        let bottom = self.outset(self.bottom, self.top, self.bottom, r.height);
        Rect::new(
            r.x - left,
            r.y - top,
            r.width + left + right,
            r.height + top + bottom,
        )
    }
}

/// Rectangle of `size` aligned inside `frame`.
pub fn create_aligned_rectangle(
    size: Size2D,
    frame: &Rect,
    h_align: HorizontalAlignment,
    v_align: VerticalAlignment,
) -> Rect {
    let x = match h_align {
        HorizontalAlignment::Left => frame.min_x(),
        HorizontalAlignment::Center => frame.center_x() - size.width / 2.0,
        HorizontalAlignment::Right => frame.max_x() - size.width,
    };
    let y = match v_align {
        VerticalAlignment::Top => frame.min_y(),
        VerticalAlignment::Center => frame.center_y() - size.height / 2.0,
        VerticalAlignment::Bottom => frame.max_y() - size.height,
    };
    Rect::new(x, y, size.width, size.height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_insets_round_trip() {
        let ins = RectangleInsets::relative(0.1, 0.05, 0.1, 0.15);
        let w = 420.0;
        let trimmed = ins.trim_width(w);
        assert!((ins.extend_width(trimmed) - w).abs() < 1e-9);
        let h = 300.0;
        assert!((ins.extend_height(ins.trim_height(h)) - h).abs() < 1e-9);
    }

    #[test]
    fn polygon_hit_test() {
        let tri = Shape::Polygon(vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(0.0, 10.0),
        ]);
        assert!(tri.contains(2.0, 2.0));
        assert!(!tri.contains(8.0, 8.0));
    }

    #[test]
    fn unknown_edge_is_rejected() {
        assert!(matches!(
            "middle".parse::<RectangleEdge>(),
            Err(ChartError::UnknownEdge(_))
        ));
        assert_eq!("Left".parse::<RectangleEdge>().unwrap(), RectangleEdge::Left);
    }
}
