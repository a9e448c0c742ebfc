//! Sizing rules passed into `arrange`.

use crate::error::{ChartError, ChartResult};
use crate::geom::Size2D;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A closed interval `[lower, upper]` with `lower <= upper`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    lower: f64,
    upper: f64,
}

impl Range {
    pub fn new(lower: f64, upper: f64) -> ChartResult<Self> {
        if lower.is_nan() || upper.is_nan() || lower > upper {
            return Err(ChartError::invalid(format!(
                "range lower bound ({lower}) must be <= upper bound ({upper})"
            )));
        }
        Ok(Self { lower, upper })
    }

    /// `[0, upper]` with `upper` clamped at zero; used for "up to the space left".
    pub(crate) fn up_to(upper: f64) -> Self {
        Self {
            lower: 0.0,
            upper: upper.max(0.0),
        }
    }

    pub(crate) fn unbounded() -> Self {
        Self {
            lower: 0.0,
            upper: f64::INFINITY,
        }
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    pub fn length(&self) -> f64 {
        self.upper - self.lower
    }

    pub fn central_value(&self) -> f64 {
        self.lower / 2.0 + self.upper / 2.0
    }

    pub fn contains(&self, v: f64) -> bool {
        v >= self.lower && v <= self.upper
    }

    pub fn constrain(&self, v: f64) -> f64 {
        if v.is_nan() {
            return self.lower;
        }
        v.clamp(self.lower, self.upper)
    }

    /// Shift both bounds by `delta`; bounds that start non-negative stay non-negative.
    pub fn shift_non_negative(&self, delta: f64) -> Range {
        let shift = |v: f64| {
            if v >= 0.0 {
                (v + delta).max(0.0)
            } else {
                v + delta
            }
        };
        let (lo, hi) = (shift(self.lower), shift(self.upper));
        Range {
            lower: lo.min(hi),
            upper: hi,
        }
    }

    pub fn shift(&self, delta: f64) -> Range {
        Range {
            lower: self.lower + delta,
            upper: self.upper + delta,
        }
    }

    /// Grow by fractions of the length on each side.
    pub fn expand(&self, lower_margin: f64, upper_margin: f64) -> Range {
        let len = self.length();
        Range {
            lower: self.lower - len * lower_margin,
            upper: self.upper + len * upper_margin,
        }
    }

    pub fn include(&self, v: f64) -> Range {
        Range {
            lower: self.lower.min(v),
            upper: self.upper.max(v),
        }
    }

    pub fn combine(a: Option<Range>, b: Option<Range>) -> Option<Range> {
        match (a, b) {
            (Some(a), Some(b)) => Some(Range {
                lower: a.lower.min(b.lower),
                upper: a.upper.max(b.upper),
            }),
            (a, None) => a,
            (None, b) => b,
        }
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lower, self.upper)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthConstraintType {
    #[default]
    None,
    Fixed,
    Range,
}

/// Width and height rules for one `arrange` call. Each dimension is NONE
/// (natural size passes), FIXED (value used as-is) or RANGE (natural size clamped).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectangleConstraint {
    width: f64,
    width_range: Option<Range>,
    width_type: LengthConstraintType,
    height: f64,
    height_range: Option<Range>,
    height_type: LengthConstraintType,
}

impl RectangleConstraint {
    pub const NONE: RectangleConstraint = RectangleConstraint {
        width: 0.0,
        width_range: None,
        width_type: LengthConstraintType::None,
        height: 0.0,
        height_range: None,
        height_type: LengthConstraintType::None,
    };

    /// Fixed width and height.
    pub fn new(width: f64, height: f64) -> ChartResult<Self> {
        Self::full(
            width,
            None,
            LengthConstraintType::Fixed,
            height,
            None,
            LengthConstraintType::Fixed,
        )
    }

    /// Ranged width and height.
    pub fn ranged(width: Range, height: Range) -> Self {
        Self {
            width: 0.0,
            width_range: Some(width),
            width_type: LengthConstraintType::Range,
            height: 0.0,
            height_range: Some(height),
            height_type: LengthConstraintType::Range,
        }
    }

    /// Every field explicit. Negative fixed sizes and RANGE types without a
    /// range are rejected.
    pub fn full(
        width: f64,
        width_range: Option<Range>,
        width_type: LengthConstraintType,
        height: f64,
        height_range: Option<Range>,
        height_type: LengthConstraintType,
    ) -> ChartResult<Self> {
        for (name, v, r, t) in [
            ("width", width, width_range, width_type),
            ("height", height, height_range, height_type),
        ] {
            if t == LengthConstraintType::Fixed && !(v >= 0.0) {
                return Err(ChartError::invalid(format!(
                    "fixed {name} must be >= 0, got {v}"
                )));
            }
            if t == LengthConstraintType::Range && r.is_none() {
                return Err(ChartError::invalid(format!("ranged {name} needs a range")));
            }
        }
        Ok(Self {
            width,
            width_range,
            width_type,
            height,
            height_range,
            height_type,
        })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn width_range(&self) -> Option<Range> {
        self.width_range
    }

    pub fn height_range(&self) -> Option<Range> {
        self.height_range
    }

    pub fn width_type(&self) -> LengthConstraintType {
        self.width_type
    }

    pub fn height_type(&self) -> LengthConstraintType {
        self.height_type
    }

    /// Widest the width can be: the fixed value, the range's upper bound, or infinity.
    pub fn max_width(&self) -> f64 {
        max_length(self.width_type, self.width, self.width_range)
    }

    pub fn max_height(&self) -> f64 {
        max_length(self.height_type, self.height, self.height_range)
    }

    pub fn calculate_constrained_size(&self, base: Size2D) -> Size2D {
        Size2D::new(
            resolve(self.width_type, self.width, self.width_range, base.width),
            resolve(self.height_type, self.height, self.height_range, base.height),
        )
    }

    pub fn to_unconstrained_width(&self) -> Self {
        Self {
            width: 0.0,
            width_range: None,
            width_type: LengthConstraintType::None,
            ..*self
        }
    }

    pub fn to_unconstrained_height(&self) -> Self {
        Self {
            height: 0.0,
            height_range: None,
            height_type: LengthConstraintType::None,
            ..*self
        }
    }

    /// Fix the width; negative values become zero.
    pub fn to_fixed_width(&self, width: f64) -> Self {
        Self {
            width: width.max(0.0),
            width_range: None,
            width_type: LengthConstraintType::Fixed,
            ..*self
        }
    }

    pub fn to_fixed_height(&self, height: f64) -> Self {
        Self {
            height: height.max(0.0),
            height_range: None,
            height_type: LengthConstraintType::Fixed,
            ..*self
        }
    }

    pub fn to_range_width(&self, range: Range) -> Self {
        Self {
            width: 0.0,
            width_range: Some(range),
            width_type: LengthConstraintType::Range,
            ..*self
        }
    }

    pub fn to_range_height(&self, range: Range) -> Self {
        Self {
            height: 0.0,
            height_range: Some(range),
            height_type: LengthConstraintType::Range,
            ..*self
        }
    }

    /// Apply `f` to every length (fixed values and both range bounds),
    /// keeping the constraint types. Results are clamped at zero.
    pub(crate) fn map_lengths(&self, fw: impl Fn(f64) -> f64, fh: impl Fn(f64) -> f64) -> Self {
        let map_range = |r: Option<Range>, f: &dyn Fn(f64) -> f64| {
            r.map(|r| {
                let lo = f(r.lower).max(0.0);
                let hi = f(r.upper).max(0.0);
                Range {
                    lower: lo.min(hi),
                    upper: hi,
                }
            })
        };
        Self {
            width: fw(self.width).max(0.0),
            width_range: map_range(self.width_range, &fw),
            width_type: self.width_type,
            height: fh(self.height).max(0.0),
            height_range: map_range(self.height_range, &fh),
            height_type: self.height_type,
        }
    }

    /// Express the width as a range (NONE becomes `[0, inf)`, FIXED a point range).
    pub(crate) fn width_as_range(&self) -> Range {
        as_range(self.width_type, self.width, self.width_range)
    }

    pub(crate) fn height_as_range(&self) -> Range {
        as_range(self.height_type, self.height, self.height_range)
    }
}

impl Default for RectangleConstraint {
    fn default() -> Self {
        Self::NONE
    }
}

impl fmt::Display for RectangleConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let part = |t: LengthConstraintType, v: f64, r: Option<Range>| match (t, r) {
            (LengthConstraintType::None, _) => "NONE".to_string(),
            (LengthConstraintType::Fixed, _) => format!("FIXED {v}"),
            (LengthConstraintType::Range, Some(r)) => format!("RANGE {r}"),
            (LengthConstraintType::Range, None) => "RANGE ?".to_string(),
        };
        write!(
            f,
            "w: {}, h: {}",
            part(self.width_type, self.width, self.width_range),
            part(self.height_type, self.height, self.height_range)
        )
    }
}

fn resolve(t: LengthConstraintType, fixed: f64, range: Option<Range>, natural: f64) -> f64 {
    match (t, range) {
        (LengthConstraintType::None, _) => natural,
        (LengthConstraintType::Fixed, _) => fixed,
        (LengthConstraintType::Range, Some(r)) => r.constrain(natural),
        (LengthConstraintType::Range, None) => natural,
    }
}

fn max_length(t: LengthConstraintType, fixed: f64, range: Option<Range>) -> f64 {
    match (t, range) {
        (LengthConstraintType::Fixed, _) => fixed,
        (LengthConstraintType::Range, Some(r)) => r.upper,
        _ => f64::INFINITY,
    }
}

fn as_range(t: LengthConstraintType, fixed: f64, range: Option<Range>) -> Range {
    match (t, range) {
        (LengthConstraintType::Fixed, _) => Range {
            lower: fixed,
            upper: fixed,
        },
        (LengthConstraintType::Range, Some(r)) => r,
        _ => Range::unbounded(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inverted_range_is_rejected() {
        assert!(matches!(
            Range::new(5.0, 1.0),
            Err(ChartError::InvalidArgument(_))
        ));
    }

    #[test]
    fn negative_fixed_size_is_rejected() {
        assert!(RectangleConstraint::new(-1.0, 10.0).is_err());
    }

    #[test]
    fn each_dimension_resolves_independently() {
        let c = RectangleConstraint::NONE
            .to_range_width(Range::new(0.0, 200.0).unwrap())
            .to_fixed_height(40.0);
        let s = c.calculate_constrained_size(Size2D::new(500.0, 500.0));
        assert_eq!(s, Size2D::new(200.0, 40.0));
    }
}
