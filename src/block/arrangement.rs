//! Layout strategies for [`BlockContainer`](super::BlockContainer) children.
//!
//! Every strategy works in the container's content space: the constraint has
//! already had the container's insets removed, and the bounds it assigns are
//! relative to the content origin.

use std::fmt;

use super::{Block, ContainedBlock, LengthConstraintType, Range, RectangleConstraint};
use crate::error::{ChartError, ChartResult};
use crate::geom::{HorizontalAlignment, Rect, RectangleEdge, Size2D, VerticalAlignment};
use crate::text::TextMeasurer;

pub trait Arrangement: fmt::Debug {
    /// Size the children under `constraint` and set their bounds.
    fn arrange(
        &self,
        children: &mut [ContainedBlock],
        m: &dyn TextMeasurer,
        constraint: &RectangleConstraint,
    ) -> Size2D;
}

fn fixed(width: f64, height: f64) -> RectangleConstraint {
    RectangleConstraint::NONE
        .to_fixed_width(width)
        .to_fixed_height(height)
}

/// The space `c` allows, with fixed lengths relaxed to upper limits so a
/// child can come out smaller than its container.
fn within(c: &RectangleConstraint) -> RectangleConstraint {
    use LengthConstraintType as T;
    let out = match c.width_type() {
        T::None => RectangleConstraint::NONE,
        T::Fixed => RectangleConstraint::NONE.to_range_width(Range::up_to(c.width())),
        T::Range => RectangleConstraint::NONE.to_range_width(c.width_as_range()),
    };
    match c.height_type() {
        T::None => out,
        T::Fixed => out.to_range_height(Range::up_to(c.height())),
        T::Range => out.to_range_height(c.height_as_range()),
    }
}

fn h_offset(align: HorizontalAlignment, space: f64) -> f64 {
    match align {
        HorizontalAlignment::Left => 0.0,
        HorizontalAlignment::Center => (space / 2.0).max(0.0),
        HorizontalAlignment::Right => space.max(0.0),
    }
}

fn v_offset(align: VerticalAlignment, space: f64) -> f64 {
    match align {
        VerticalAlignment::Top => 0.0,
        VerticalAlignment::Center => (space / 2.0).max(0.0),
        VerticalAlignment::Bottom => space.max(0.0),
    }
}

fn shift(child: &mut ContainedBlock, dx: f64, dy: f64) {
    let b = child.block.bounds();
    child.block.set_bounds(b.translate(dx, dy));
}

/// Left-to-right rows, wrapping when a width limit is exceeded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowArrangement {
    pub h_align: HorizontalAlignment,
    pub v_align: VerticalAlignment,
    pub h_gap: f64,
    pub v_gap: f64,
}

impl Default for FlowArrangement {
    fn default() -> Self {
        Self::new(HorizontalAlignment::Center, VerticalAlignment::Center, 2.0, 2.0)
    }
}

impl FlowArrangement {
    pub fn new(
        h_align: HorizontalAlignment,
        v_align: VerticalAlignment,
        h_gap: f64,
        v_gap: f64,
    ) -> Self {
        Self {
            h_align,
            v_align,
            h_gap,
            v_gap,
        }
    }

    /// Shift one finished row into place inside `width`.
    fn align_row(&self, children: &mut [ContainedBlock], row: &[usize], width: f64, row_h: f64) {
        let (Some(&first), Some(&last)) = (row.first(), row.last()) else {
            return;
        };
        let used = children[last].block.bounds().max_x() - children[first].block.bounds().min_x();
        let dx = if width.is_finite() {
            h_offset(self.h_align, width - used)
        } else {
            0.0
        };
        for &i in row {
            let h = children[i].block.bounds().height;
            shift(&mut children[i], dx, v_offset(self.v_align, row_h - h));
        }
    }

    fn arrange_nn(&self, children: &mut [ContainedBlock], m: &dyn TextMeasurer) -> Size2D {
        let mut x = 0.0;
        let mut width = 0.0;
        let mut max_h: f64 = 0.0;
        for child in children.iter_mut() {
            let s = child.block.arrange(m, &RectangleConstraint::NONE);
            child.block.set_bounds(Rect::new(x, 0.0, s.width, s.height));
            width += s.width;
            max_h = max_h.max(s.height);
            x += s.width + self.h_gap;
        }
        if children.len() > 1 {
            width += self.h_gap * (children.len() - 1) as f64;
        }
        let row: Vec<usize> = (0..children.len()).collect();
        self.align_row(children, &row, width, max_h);
        Size2D::new(width, max_h)
    }

    fn arrange_fn(&self, children: &mut [ContainedBlock], m: &dyn TextMeasurer, width: f64) -> f64 {
        let mut x = 0.0;
        let mut y = 0.0;
        let mut row_h: f64 = 0.0;
        let mut bottom: f64 = 0.0;
        let mut row: Vec<usize> = Vec::new();
        for i in 0..children.len() {
            let s = children[i].block.arrange(m, &RectangleConstraint::NONE);
            if x + s.width <= width {
                children[i].block.set_bounds(Rect::new(x, y, s.width, s.height));
                row.push(i);
                x += s.width + self.h_gap;
                row_h = row_h.max(s.height);
            } else if row.is_empty() {
                // wider than a whole row: truncate and give it its own row
                children[i]
                    .block
                    .set_bounds(Rect::new(0.0, y, s.width.min(width), s.height));
                bottom = y + s.height;
                y = bottom + self.v_gap;
                x = 0.0;
            } else {
                self.align_row(children, &row, width, row_h);
                bottom = y + row_h;
                y = bottom + self.v_gap;
                row.clear();
                children[i]
                    .block
                    .set_bounds(Rect::new(0.0, y, s.width.min(width), s.height));
                row.push(i);
                x = s.width + self.h_gap;
                row_h = s.height;
            }
        }
        if !row.is_empty() {
            self.align_row(children, &row, width, row_h);
            bottom = y + row_h;
        }
        bottom
    }
}

impl Arrangement for FlowArrangement {
    fn arrange(
        &self,
        children: &mut [ContainedBlock],
        m: &dyn TextMeasurer,
        constraint: &RectangleConstraint,
    ) -> Size2D {
        let size = match constraint.width_type() {
            LengthConstraintType::None => self.arrange_nn(children, m),
            LengthConstraintType::Fixed => {
                let w = constraint.width();
                Size2D::new(w, self.arrange_fn(children, m, w))
            }
            LengthConstraintType::Range => {
                let natural = self.arrange_nn(children, m);
                let wr = constraint.width_as_range();
                if wr.contains(natural.width) {
                    natural
                } else {
                    let w = wr.constrain(natural.width);
                    Size2D::new(w, self.arrange_fn(children, m, w))
                }
            }
        };
        // placement never depends on the height rule; only the reported size does
        constraint
            .to_unconstrained_width()
            .calculate_constrained_size(size)
    }
}

/// Top-to-bottom columns, continuing in a new column when a height limit is exceeded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnArrangement {
    pub h_align: HorizontalAlignment,
    pub v_align: VerticalAlignment,
    pub h_gap: f64,
    pub v_gap: f64,
}

impl Default for ColumnArrangement {
    fn default() -> Self {
        Self::new(HorizontalAlignment::Left, VerticalAlignment::Top, 0.0, 0.0)
    }
}

impl ColumnArrangement {
    pub fn new(
        h_align: HorizontalAlignment,
        v_align: VerticalAlignment,
        h_gap: f64,
        v_gap: f64,
    ) -> Self {
        Self {
            h_align,
            v_align,
            h_gap,
            v_gap,
        }
    }

    fn align_column(
        &self,
        children: &mut [ContainedBlock],
        col: &[usize],
        col_w: f64,
        height: f64,
    ) {
        let (Some(&first), Some(&last)) = (col.first(), col.last()) else {
            return;
        };
        let used = children[last].block.bounds().max_y() - children[first].block.bounds().min_y();
        let dy = if height.is_finite() {
            v_offset(self.v_align, height - used)
        } else {
            0.0
        };
        for &i in col {
            let w = children[i].block.bounds().width;
            shift(&mut children[i], h_offset(self.h_align, col_w - w), dy);
        }
    }

    fn arrange_nn(&self, children: &mut [ContainedBlock], m: &dyn TextMeasurer) -> Size2D {
        let mut y = 0.0;
        let mut height = 0.0;
        let mut max_w: f64 = 0.0;
        for child in children.iter_mut() {
            let s = child.block.arrange(m, &RectangleConstraint::NONE);
            child.block.set_bounds(Rect::new(0.0, y, s.width, s.height));
            height += s.height;
            max_w = max_w.max(s.width);
            y += s.height + self.v_gap;
        }
        if children.len() > 1 {
            height += self.v_gap * (children.len() - 1) as f64;
        }
        let col: Vec<usize> = (0..children.len()).collect();
        self.align_column(children, &col, max_w, height);
        Size2D::new(max_w, height)
    }

    /// Lay out under a fixed height; returns the total width used.
    fn arrange_nf(&self, children: &mut [ContainedBlock], m: &dyn TextMeasurer, height: f64) -> f64 {
        let mut x = 0.0;
        let mut y = 0.0;
        let mut col_w: f64 = 0.0;
        let mut col: Vec<usize> = Vec::new();
        for i in 0..children.len() {
            let s = children[i].block.arrange(m, &RectangleConstraint::NONE);
            if y + s.height <= height {
                children[i].block.set_bounds(Rect::new(x, y, s.width, s.height));
                col.push(i);
                y += s.height + self.v_gap;
                col_w = col_w.max(s.width);
            } else if col.is_empty() {
                children[i]
                    .block
                    .set_bounds(Rect::new(x, 0.0, s.width, s.height.min(height)));
                x += s.width + self.h_gap;
                y = 0.0;
            } else {
                self.align_column(children, &col, col_w, height);
                x += col_w + self.h_gap;
                col.clear();
                children[i]
                    .block
                    .set_bounds(Rect::new(x, 0.0, s.width, s.height.min(height)));
                col.push(i);
                y = s.height + self.v_gap;
                col_w = s.width;
            }
        }
        if col.is_empty() {
            (x - self.h_gap).max(0.0)
        } else {
            self.align_column(children, &col, col_w, height);
            x + col_w
        }
    }
}

impl Arrangement for ColumnArrangement {
    fn arrange(
        &self,
        children: &mut [ContainedBlock],
        m: &dyn TextMeasurer,
        constraint: &RectangleConstraint,
    ) -> Size2D {
        let size = match constraint.height_type() {
            LengthConstraintType::None => self.arrange_nn(children, m),
            LengthConstraintType::Fixed => {
                let h = constraint.height();
                Size2D::new(self.arrange_nf(children, m, h), h)
            }
            LengthConstraintType::Range => {
                let natural = self.arrange_nn(children, m);
                let hr = constraint.height_as_range();
                if hr.contains(natural.height) {
                    natural
                } else {
                    let h = hr.constrain(natural.height);
                    Size2D::new(self.arrange_nf(children, m, h), h)
                }
            }
        };
        constraint
            .to_unconstrained_height()
            .calculate_constrained_size(size)
    }
}

/// Five slots: top, bottom, left, right and center (children without a key).
///
/// Handled directly: NONE/NONE, FIXED/NONE, FIXED/FIXED, FIXED/RANGE and
/// RANGE/RANGE. The remaining mixes are solved as RANGE/RANGE, with NONE read
/// as `[0, inf)` and FIXED as a one-point range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BorderArrangement;

const TOP: usize = 0;
const BOTTOM: usize = 1;
const LEFT: usize = 2;
const RIGHT: usize = 3;
const CENTER: usize = 4;

impl BorderArrangement {
    pub fn new() -> Self {
        Self
    }

    /// Child index for each slot; a later child replaces an earlier one.
    fn slots(children: &mut [ContainedBlock]) -> [Option<usize>; 5] {
        let mut slots = [None; 5];
        for (i, child) in children.iter().enumerate() {
            let slot = match child.key {
                Some(RectangleEdge::Top) => TOP,
                Some(RectangleEdge::Bottom) => BOTTOM,
                Some(RectangleEdge::Left) => LEFT,
                Some(RectangleEdge::Right) => RIGHT,
                None => CENTER,
            };
            slots[slot] = Some(i);
        }
        for (i, child) in children.iter_mut().enumerate() {
            if !slots.contains(&Some(i)) {
                child.block.set_bounds(Rect::default());
            }
        }
        slots
    }

    fn arrange_slot(
        children: &mut [ContainedBlock],
        slot: Option<usize>,
        m: &dyn TextMeasurer,
        c: &RectangleConstraint,
    ) -> Size2D {
        match slot {
            Some(i) => children[i].block.arrange(m, c),
            None => Size2D::ZERO,
        }
    }

    fn place(children: &mut [ContainedBlock], slot: Option<usize>, r: Rect) {
        if let Some(i) = slot {
            children[i].block.set_bounds(r);
        }
    }

    fn arrange_nn(&self, children: &mut [ContainedBlock], m: &dyn TextMeasurer) -> Size2D {
        let slots = Self::slots(children);
        let mut w = [0.0f64; 5];
        let mut h = [0.0f64; 5];
        for k in 0..5 {
            let s = Self::arrange_slot(children, slots[k], m, &RectangleConstraint::NONE);
            w[k] = s.width;
            h[k] = s.height;
        }
        let width = w[TOP].max(w[BOTTOM]).max(w[LEFT] + w[CENTER] + w[RIGHT]);
        let center_h = h[LEFT].max(h[RIGHT]).max(h[CENTER]);
        let height = h[TOP] + h[BOTTOM] + center_h;
        Self::place(children, slots[TOP], Rect::new(0.0, 0.0, width, h[TOP]));
        Self::place(
            children,
            slots[BOTTOM],
            Rect::new(0.0, height - h[BOTTOM], width, h[BOTTOM]),
        );
        Self::place(
            children,
            slots[LEFT],
            Rect::new(0.0, h[TOP], w[LEFT], center_h),
        );
        Self::place(
            children,
            slots[RIGHT],
            Rect::new(width - w[RIGHT], h[TOP], w[RIGHT], center_h),
        );
        Self::place(
            children,
            slots[CENTER],
            Rect::new(w[LEFT], h[TOP], (width - w[LEFT] - w[RIGHT]).max(0.0), center_h),
        );
        Size2D::new(width, height)
    }

    fn arrange_fn(&self, children: &mut [ContainedBlock], m: &dyn TextMeasurer, width: f64) -> Size2D {
        let slots = Self::slots(children);
        let mut w = [0.0f64; 5];
        let mut h = [0.0f64; 5];
        let c1 = RectangleConstraint::NONE.to_fixed_width(width);
        for k in [TOP, BOTTOM] {
            let s = Self::arrange_slot(children, slots[k], m, &c1);
            w[k] = s.width;
            h[k] = s.height;
        }
        let c2 = RectangleConstraint::NONE.to_range_width(Range::up_to(width));
        let s = Self::arrange_slot(children, slots[LEFT], m, &c2);
        (w[LEFT], h[LEFT]) = (s.width, s.height);
        let c3 = RectangleConstraint::NONE.to_range_width(Range::up_to(width - w[LEFT]));
        let s = Self::arrange_slot(children, slots[RIGHT], m, &c3);
        (w[RIGHT], h[RIGHT]) = (s.width, s.height);
        let c4 = RectangleConstraint::NONE
            .to_range_width(Range::up_to(width - w[LEFT] - w[RIGHT]));
        let s = Self::arrange_slot(children, slots[CENTER], m, &c4);
        (w[CENTER], h[CENTER]) = (s.width, s.height);
        let height = h[TOP] + h[BOTTOM] + h[LEFT].max(h[RIGHT]).max(h[CENTER]);
        self.arrange_ff(children, m, width, height)
    }

    fn arrange_fr(
        &self,
        children: &mut [ContainedBlock],
        m: &dyn TextMeasurer,
        width: f64,
        height_range: Range,
    ) -> Size2D {
        let s = self.arrange_fn(children, m, width);
        if height_range.contains(s.height) {
            s
        } else {
            self.arrange_ff(children, m, width, height_range.constrain(s.height))
        }
    }

    fn arrange_ff(
        &self,
        children: &mut [ContainedBlock],
        m: &dyn TextMeasurer,
        width: f64,
        height: f64,
    ) -> Size2D {
        let slots = Self::slots(children);
        let mut w = [0.0f64; 5];
        let mut h = [0.0f64; 5];
        let c1 = RectangleConstraint::NONE
            .to_fixed_width(width)
            .to_range_height(Range::up_to(height));
        let s = Self::arrange_slot(children, slots[TOP], m, &c1);
        (w[TOP], h[TOP]) = (s.width, s.height);
        let c2 = c1.to_range_height(Range::up_to(height - h[TOP]));
        let s = Self::arrange_slot(children, slots[BOTTOM], m, &c2);
        (w[BOTTOM], h[BOTTOM]) = (s.width, s.height);
        h[LEFT] = (height - h[TOP] - h[BOTTOM]).max(0.0);
        let c3 = RectangleConstraint::NONE
            .to_range_width(Range::up_to(width))
            .to_fixed_height(h[LEFT]);
        w[LEFT] = Self::arrange_slot(children, slots[LEFT], m, &c3).width;
        h[RIGHT] = h[LEFT];
        let c4 = c3.to_range_width(Range::up_to(width - w[LEFT]));
        w[RIGHT] = Self::arrange_slot(children, slots[RIGHT], m, &c4).width;
        h[CENTER] = h[LEFT];
        w[CENTER] = (width - w[LEFT] - w[RIGHT]).max(0.0);
        Self::arrange_slot(children, slots[CENTER], m, &fixed(w[CENTER], h[CENTER]));

        Self::place(children, slots[TOP], Rect::new(0.0, 0.0, w[TOP], h[TOP]));
        Self::place(
            children,
            slots[BOTTOM],
            Rect::new(0.0, h[TOP] + h[LEFT], w[BOTTOM], h[BOTTOM]),
        );
        Self::place(
            children,
            slots[LEFT],
            Rect::new(0.0, h[TOP], w[LEFT], h[LEFT]),
        );
        Self::place(
            children,
            slots[RIGHT],
            Rect::new(w[LEFT] + w[CENTER], h[TOP], w[RIGHT], h[RIGHT]),
        );
        Self::place(
            children,
            slots[CENTER],
            Rect::new(w[LEFT], h[TOP], w[CENTER], h[CENTER]),
        );
        Size2D::new(width, height)
    }

    fn arrange_rr(
        &self,
        children: &mut [ContainedBlock],
        m: &dyn TextMeasurer,
        wr: Range,
        hr: Range,
    ) -> Size2D {
        let slots = Self::slots(children);
        let mut w = [0.0f64; 5];
        let mut h = [0.0f64; 5];
        let s = Self::arrange_slot(children, slots[TOP], m, &RectangleConstraint::ranged(wr, hr));
        (w[TOP], h[TOP]) = (s.width, s.height);
        let hr2 = hr.shift_non_negative(-h[TOP]);
        let s = Self::arrange_slot(children, slots[BOTTOM], m, &RectangleConstraint::ranged(wr, hr2));
        (w[BOTTOM], h[BOTTOM]) = (s.width, s.height);
        let hr3 = hr.shift_non_negative(-(h[TOP] + h[BOTTOM]));
        let s = Self::arrange_slot(children, slots[LEFT], m, &RectangleConstraint::ranged(wr, hr3));
        (w[LEFT], h[LEFT]) = (s.width, s.height);
        let wr3 = wr.shift_non_negative(-w[LEFT]);
        let s = Self::arrange_slot(children, slots[RIGHT], m, &RectangleConstraint::ranged(wr3, hr3));
        (w[RIGHT], h[RIGHT]) = (s.width, s.height);
        let wr4 = wr.shift_non_negative(-(w[LEFT] + w[RIGHT]));
        let s = Self::arrange_slot(children, slots[CENTER], m, &RectangleConstraint::ranged(wr4, hr3));
        (w[CENTER], h[CENTER]) = (s.width, s.height);
        let width = w[TOP].max(w[BOTTOM]).max(w[LEFT] + w[CENTER] + w[RIGHT]);
        let height = h[TOP] + h[BOTTOM] + h[LEFT].max(h[RIGHT]).max(h[CENTER]);
        self.arrange_ff(children, m, wr.constrain(width), hr.constrain(height))
    }
}

impl Arrangement for BorderArrangement {
    fn arrange(
        &self,
        children: &mut [ContainedBlock],
        m: &dyn TextMeasurer,
        constraint: &RectangleConstraint,
    ) -> Size2D {
        use LengthConstraintType as T;
        match (constraint.width_type(), constraint.height_type()) {
            (T::None, T::None) => self.arrange_nn(children, m),
            (T::Fixed, T::None) => self.arrange_fn(children, m, constraint.width()),
            (T::Fixed, T::Fixed) => {
                self.arrange_ff(children, m, constraint.width(), constraint.height())
            }
            (T::Fixed, T::Range) => self.arrange_fr(
                children,
                m,
                constraint.width(),
                constraint.height_as_range(),
            ),
            _ => self.arrange_rr(
                children,
                m,
                constraint.width_as_range(),
                constraint.height_as_range(),
            ),
        }
    }
}

/// One child at its natural size (within the limits) centred in the space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CenterArrangement;

impl CenterArrangement {
    pub fn new() -> Self {
        Self
    }
}

impl Arrangement for CenterArrangement {
    fn arrange(
        &self,
        children: &mut [ContainedBlock],
        m: &dyn TextMeasurer,
        constraint: &RectangleConstraint,
    ) -> Size2D {
        let Some((first, rest)) = children.split_first_mut() else {
            return constraint.calculate_constrained_size(Size2D::ZERO);
        };
        for other in rest {
            other.block.set_bounds(Rect::default());
        }
        let s = first.block.arrange(m, &within(constraint));
        let size = constraint.calculate_constrained_size(s);
        let w = s.width.min(size.width);
        let h = s.height.min(size.height);
        first.block.set_bounds(Rect::new(
            (size.width - w) / 2.0,
            (size.height - h) / 2.0,
            w,
            h,
        ));
        size
    }
}

/// Equal cells, filled row by row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridArrangement {
    rows: usize,
    columns: usize,
}

impl GridArrangement {
    pub fn new(rows: usize, columns: usize) -> ChartResult<Self> {
        if rows == 0 || columns == 0 {
            return Err(ChartError::invalid(format!(
                "grid needs at least one row and column, got {rows}x{columns}"
            )));
        }
        Ok(Self { rows, columns })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }
}

impl Arrangement for GridArrangement {
    fn arrange(
        &self,
        children: &mut [ContainedBlock],
        m: &dyn TextMeasurer,
        constraint: &RectangleConstraint,
    ) -> Size2D {
        let mut cell = Size2D::ZERO;
        for child in children.iter_mut() {
            let s = child.block.arrange(m, &RectangleConstraint::NONE);
            cell.width = cell.width.max(s.width);
            cell.height = cell.height.max(s.height);
        }
        let natural = Size2D::new(
            cell.width * self.columns as f64,
            cell.height * self.rows as f64,
        );
        let size = constraint.calculate_constrained_size(natural);
        let cw = size.width / self.columns as f64;
        let ch = size.height / self.rows as f64;
        let cells = self.rows * self.columns;
        for (i, child) in children.iter_mut().enumerate() {
            if i >= cells {
                child.block.set_bounds(Rect::default());
                continue;
            }
            let (r, c) = (i / self.columns, i % self.columns);
            child.block.arrange(m, &fixed(cw, ch));
            child
                .block
                .set_bounds(Rect::new(c as f64 * cw, r as f64 * ch, cw, ch));
        }
        size
    }
}
