use super::{XyDataset, fire_updated};
use crate::error::{ChartError, ChartResult};
use crate::event::{ChangeSource, Notifier};

/// One named series of `(x, y)` items.
#[derive(Debug, Clone, PartialEq)]
pub struct XySeries {
    key: String,
    items: Vec<(f64, Option<f64>)>,
    auto_sort: bool,
    allow_duplicate_x: bool,
}

impl XySeries {
    /// A series that keeps its items sorted by x and accepts repeated x values.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            items: Vec::new(),
            auto_sort: true,
            allow_duplicate_x: true,
        }
    }

    /// Keep items in insertion order.
    pub fn unsorted(mut self) -> Self {
        self.auto_sort = false;
        self
    }

    pub fn without_duplicate_x(mut self) -> Self {
        self.allow_duplicate_x = false;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn x(&self, item: usize) -> Option<f64> {
        self.items.get(item).map(|(x, _)| *x)
    }

    pub fn y(&self, item: usize) -> Option<f64> {
        self.items.get(item).and_then(|(_, y)| *y)
    }

    pub fn items(&self) -> &[(f64, Option<f64>)] {
        &self.items
    }

    /// Add an item. With auto-sort it goes after any items with the same x.
    pub fn add(&mut self, x: f64, y: Option<f64>) -> ChartResult<()> {
        if !x.is_finite() {
            return Err(ChartError::invalid(format!("x must be finite, got {x}")));
        }
        if !self.allow_duplicate_x && self.items.iter().any(|(ix, _)| *ix == x) {
            return Err(ChartError::invalid(format!(
                "series '{}' already has an item at x = {x}",
                self.key
            )));
        }
        if self.auto_sort {
            let at = self.items.partition_point(|(ix, _)| *ix <= x);
            self.items.insert(at, (x, y));
        } else {
            self.items.push((x, y));
        }
        Ok(())
    }

    pub fn remove(&mut self, item: usize) -> ChartResult<(f64, Option<f64>)> {
        if item >= self.items.len() {
            return Err(ChartError::IndexOutOfBounds {
                index: item,
                len: self.items.len(),
            });
        }
        Ok(self.items.remove(item))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

/// The standard mutable [`XyDataset`]: an ordered list of series.
#[derive(Debug, Clone)]
pub struct XySeriesCollection {
    series: Vec<XySeries>,
    notifier: Notifier,
}

impl Default for XySeriesCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl XySeriesCollection {
    pub fn new() -> Self {
        Self {
            series: Vec::new(),
            notifier: Notifier::new(ChangeSource::Dataset),
        }
    }

    pub fn add_series(&mut self, series: XySeries) {
        self.series.push(series);
        fire_updated(&self.notifier);
    }

    pub fn remove_series(&mut self, index: usize) -> ChartResult<XySeries> {
        if index >= self.series.len() {
            return Err(ChartError::IndexOutOfBounds {
                index,
                len: self.series.len(),
            });
        }
        let removed = self.series.remove(index);
        fire_updated(&self.notifier);
        Ok(removed)
    }

    pub fn series(&self, index: usize) -> Option<&XySeries> {
        self.series.get(index)
    }

    pub fn series_index(&self, key: &str) -> Option<usize> {
        self.series.iter().position(|s| s.key == key)
    }

    /// Mutate one series; listeners hear about it once `f` returns.
    pub fn update_series<R>(
        &mut self,
        index: usize,
        f: impl FnOnce(&mut XySeries) -> R,
    ) -> ChartResult<R> {
        let len = self.series.len();
        let series = self
            .series
            .get_mut(index)
            .ok_or(ChartError::IndexOutOfBounds { index, len })?;
        let out = f(series);
        fire_updated(&self.notifier);
        Ok(out)
    }

    pub fn clear(&mut self) {
        self.series.clear();
        fire_updated(&self.notifier);
    }
}

impl XyDataset for XySeriesCollection {
    fn series_count(&self) -> usize {
        self.series.len()
    }

    fn series_key(&self, series: usize) -> Option<&str> {
        self.series.get(series).map(XySeries::key)
    }

    fn item_count(&self, series: usize) -> usize {
        self.series.get(series).map_or(0, XySeries::len)
    }

    fn x(&self, series: usize, item: usize) -> Option<f64> {
        self.series.get(series)?.x(item)
    }

    fn y(&self, series: usize, item: usize) -> Option<f64> {
        self.series.get(series)?.y(item)
    }

    fn notifier(&self) -> &Notifier {
        &self.notifier
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_sort_inserts_after_equal_x() {
        let mut s = XySeries::new("s");
        s.add(2.0, Some(1.0)).unwrap();
        s.add(1.0, Some(2.0)).unwrap();
        s.add(2.0, Some(3.0)).unwrap();
        assert_eq!(s.items(), &[(1.0, Some(2.0)), (2.0, Some(1.0)), (2.0, Some(3.0))]);
    }

    #[test]
    fn duplicate_x_rejected_when_disallowed() {
        let mut s = XySeries::new("s").without_duplicate_x();
        s.add(1.0, None).unwrap();
        assert!(s.add(1.0, Some(1.0)).is_err());
    }

    #[test]
    fn update_out_of_range_is_an_error() {
        let mut c = XySeriesCollection::new();
        let err = c.update_series(0, |s| s.clear()).unwrap_err();
        assert!(matches!(err, ChartError::IndexOutOfBounds { index: 0, len: 0 }));
    }
}
