//! Read-only dataset views and the default mutable datasets behind them.
//!
//! Plots hold datasets as `Rc<RefCell<dyn …Dataset>>`; callers keep a typed
//! handle to the same cell for updates. Every mutation fires a
//! `DatasetUpdated` change on the dataset's notifier.

mod category;
mod csv_io;
mod keyed;
mod pie;
mod xy;

pub use category::DefaultCategoryDataset;
pub use csv_io::{
    load_category_csv, load_pie_csv, load_xy_csv, read_category_csv, read_pie_csv, read_xy_csv,
    write_category_csv,
};
pub use keyed::{KeyedValues, KeyedValues2D};
pub use pie::DefaultPieDataset;
pub use xy::{XySeries, XySeriesCollection};

use std::cell::RefCell;
use std::rc::Rc;

use crate::block::Range;
use crate::event::{ChangeEvent, ChartChangeType, Notifier};

/// A table of values keyed by row (series) and column (category).
pub trait CategoryDataset {
    fn row_count(&self) -> usize;
    fn column_count(&self) -> usize;
    fn row_key(&self, row: usize) -> Option<&str>;
    fn column_key(&self, column: usize) -> Option<&str>;
    fn row_index(&self, key: &str) -> Option<usize>;
    fn column_index(&self, key: &str) -> Option<usize>;
    fn value(&self, row: usize, column: usize) -> Option<f64>;
    fn notifier(&self) -> &Notifier;
}

/// Series of `(x, y)` pairs; `y` may be missing.
pub trait XyDataset {
    fn series_count(&self) -> usize;
    fn series_key(&self, series: usize) -> Option<&str>;
    fn item_count(&self, series: usize) -> usize;
    fn x(&self, series: usize, item: usize) -> Option<f64>;
    fn y(&self, series: usize, item: usize) -> Option<f64>;
    fn notifier(&self) -> &Notifier;
}

/// Keyed values drawn as sections of a whole.
pub trait PieDataset {
    fn item_count(&self) -> usize;
    fn key(&self, index: usize) -> Option<&str>;
    fn index_of(&self, key: &str) -> Option<usize>;
    fn value(&self, index: usize) -> Option<f64>;
    fn notifier(&self) -> &Notifier;
}

pub type SharedCategoryDataset = Rc<RefCell<dyn CategoryDataset>>;
pub type SharedXyDataset = Rc<RefCell<dyn XyDataset>>;
pub type SharedPieDataset = Rc<RefCell<dyn PieDataset>>;

pub(crate) fn fire_updated(notifier: &Notifier) {
    notifier.fire(&ChangeEvent::new(
        notifier.source(),
        ChartChangeType::DatasetUpdated,
    ));
}

fn bounds(values: impl Iterator<Item = f64>) -> Option<Range> {
    values
        .filter(|v| v.is_finite())
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
        .and_then(|(lo, hi)| Range::new(lo, hi).ok())
}

/// Smallest range holding every x value.
pub fn xy_domain_bounds(ds: &dyn XyDataset) -> Option<Range> {
    bounds((0..ds.series_count()).flat_map(|s| (0..ds.item_count(s)).filter_map(move |i| ds.x(s, i))))
}

/// Smallest range holding every present y value.
pub fn xy_range_bounds(ds: &dyn XyDataset) -> Option<Range> {
    bounds((0..ds.series_count()).flat_map(|s| (0..ds.item_count(s)).filter_map(move |i| ds.y(s, i))))
}

/// Smallest range holding every present category value.
pub fn category_range_bounds(ds: &dyn CategoryDataset) -> Option<Range> {
    bounds(
        (0..ds.row_count())
            .flat_map(|r| (0..ds.column_count()).filter_map(move |c| ds.value(r, c))),
    )
}

/// Sum of the positive values; non-positive and missing values are ignored.
pub fn pie_total(ds: &dyn PieDataset) -> f64 {
    (0..ds.item_count())
        .filter_map(|i| ds.value(i))
        .filter(|v| *v > 0.0)
        .sum()
}
