use super::{CategoryDataset, KeyedValues2D, fire_updated};
use crate::error::ChartResult;
use crate::event::{ChangeSource, Notifier};

/// The standard mutable [`CategoryDataset`].
#[derive(Debug, Clone)]
pub struct DefaultCategoryDataset {
    data: KeyedValues2D,
    notifier: Notifier,
}

impl Default for DefaultCategoryDataset {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultCategoryDataset {
    pub fn new() -> Self {
        Self {
            data: KeyedValues2D::new(),
            notifier: Notifier::new(ChangeSource::Dataset),
        }
    }

    pub fn add_value(&mut self, value: f64, row_key: &str, column_key: &str) {
        self.set_value(Some(value), row_key, column_key);
    }

    pub fn set_value(&mut self, value: Option<f64>, row_key: &str, column_key: &str) {
        self.data.set_value(value, row_key, column_key);
        fire_updated(&self.notifier);
    }

    /// Add `delta` to the current value (missing counts as zero).
    pub fn increment_value(&mut self, delta: f64, row_key: &str, column_key: &str) {
        let current = self
            .data
            .value_by_keys(row_key, column_key)
            .ok()
            .flatten()
            .unwrap_or(0.0);
        self.set_value(Some(current + delta), row_key, column_key);
    }

    pub fn value_by_keys(&self, row_key: &str, column_key: &str) -> ChartResult<Option<f64>> {
        self.data.value_by_keys(row_key, column_key)
    }

    /// Remove one value; rows and columns left without values are dropped.
    pub fn remove_value(&mut self, row_key: &str, column_key: &str) -> ChartResult<()> {
        self.data.remove_value(row_key, column_key)?;
        fire_updated(&self.notifier);
        Ok(())
    }

    pub fn remove_row(&mut self, row_key: &str) -> ChartResult<()> {
        self.data.remove_row(row_key)?;
        fire_updated(&self.notifier);
        Ok(())
    }

    pub fn remove_column(&mut self, column_key: &str) -> ChartResult<()> {
        self.data.remove_column(column_key)?;
        fire_updated(&self.notifier);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.data.clear();
        fire_updated(&self.notifier);
    }

    pub fn row_keys(&self) -> &[String] {
        self.data.row_keys()
    }

    pub fn column_keys(&self) -> &[String] {
        self.data.column_keys()
    }
}

impl CategoryDataset for DefaultCategoryDataset {
    fn row_count(&self) -> usize {
        self.data.row_count()
    }

    fn column_count(&self) -> usize {
        self.data.column_count()
    }

    fn row_key(&self, row: usize) -> Option<&str> {
        self.data.row_key(row)
    }

    fn column_key(&self, column: usize) -> Option<&str> {
        self.data.column_key(column)
    }

    fn row_index(&self, key: &str) -> Option<usize> {
        self.data.row_index(key)
    }

    fn column_index(&self, key: &str) -> Option<usize> {
        self.data.column_index(key)
    }

    fn value(&self, row: usize, column: usize) -> Option<f64> {
        self.data.value(row, column)
    }

    fn notifier(&self) -> &Notifier {
        &self.notifier
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn mutations_fire_dataset_updates() {
        let mut ds = DefaultCategoryDataset::new();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        ds.notifier().add_listener(move |e| {
            assert_eq!(e.kind, crate::event::ChartChangeType::DatasetUpdated);
            h.set(h.get() + 1);
        });
        ds.add_value(1.0, "S1", "Q1");
        ds.increment_value(2.0, "S1", "Q1");
        assert_eq!(ds.value_by_keys("S1", "Q1").unwrap(), Some(3.0));
        assert_eq!(hits.get(), 2);
    }
}
