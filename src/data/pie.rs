use super::{KeyedValues, PieDataset, fire_updated};
use crate::error::ChartResult;
use crate::event::{ChangeSource, Notifier};
use crate::legend::SortOrder;

/// The standard mutable [`PieDataset`].
#[derive(Debug, Clone)]
pub struct DefaultPieDataset {
    data: KeyedValues,
    notifier: Notifier,
}

impl Default for DefaultPieDataset {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultPieDataset {
    pub fn new() -> Self {
        Self {
            data: KeyedValues::new(),
            notifier: Notifier::new(ChangeSource::Dataset),
        }
    }

    pub fn set_value(&mut self, key: &str, value: Option<f64>) {
        self.data.set_value(key, value);
        fire_updated(&self.notifier);
    }

    pub fn insert_value(&mut self, position: usize, key: &str, value: Option<f64>) -> ChartResult<()> {
        self.data.insert_value(position, key, value)?;
        fire_updated(&self.notifier);
        Ok(())
    }

    pub fn remove(&mut self, key: &str) -> ChartResult<()> {
        self.data.remove_value(key)?;
        fire_updated(&self.notifier);
        Ok(())
    }

    pub fn value_by_key(&self, key: &str) -> ChartResult<Option<f64>> {
        self.data.value_by_key(key)
    }

    pub fn sort_by_keys(&mut self, order: SortOrder) {
        self.data.sort_by_keys(order);
        fire_updated(&self.notifier);
    }

    pub fn sort_by_values(&mut self, order: SortOrder) {
        self.data.sort_by_values(order);
        fire_updated(&self.notifier);
    }

    pub fn clear(&mut self) {
        self.data.clear();
        fire_updated(&self.notifier);
    }

    pub fn keys(&self) -> &[String] {
        self.data.keys()
    }
}

impl PieDataset for DefaultPieDataset {
    fn item_count(&self) -> usize {
        self.data.len()
    }

    fn key(&self, index: usize) -> Option<&str> {
        self.data.key(index)
    }

    fn index_of(&self, key: &str) -> Option<usize> {
        self.data.index_of(key)
    }

    fn value(&self, index: usize) -> Option<f64> {
        self.data.value(index)
    }

    fn notifier(&self) -> &Notifier {
        &self.notifier
    }
}
