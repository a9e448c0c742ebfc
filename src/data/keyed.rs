//! Ordered keyed tables shared by the category and pie datasets.

use ahash::AHashMap;

use crate::error::{ChartError, ChartResult};
use crate::legend::SortOrder;

/// Ordered `key -> optional value` list with an index for key lookups.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyedValues {
    keys: Vec<String>,
    values: Vec<Option<f64>>,
    index: AHashMap<String, usize>,
}

impl KeyedValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn key(&self, index: usize) -> Option<&str> {
        self.keys.get(index).map(String::as_str)
    }

    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.index.get(key).copied()
    }

    pub fn value(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().flatten()
    }

    pub fn value_by_key(&self, key: &str) -> ChartResult<Option<f64>> {
        let i = self
            .index_of(key)
            .ok_or_else(|| ChartError::UnknownKey(key.to_string()))?;
        Ok(self.values[i])
    }

    /// Replace the value for `key`, appending the key if it is new.
    pub fn set_value(&mut self, key: &str, value: Option<f64>) {
        match self.index_of(key) {
            Some(i) => self.values[i] = value,
            None => {
                self.index.insert(key.to_string(), self.keys.len());
                self.keys.push(key.to_string());
                self.values.push(value);
            }
        }
    }

    /// Insert at `position`, or move an existing key there with its new value.
    pub fn insert_value(&mut self, position: usize, key: &str, value: Option<f64>) -> ChartResult<()> {
        if position > self.len() {
            return Err(ChartError::IndexOutOfBounds {
                index: position,
                len: self.len(),
            });
        }
        if let Some(existing) = self.index_of(key) {
            self.keys.remove(existing);
            self.values.remove(existing);
        }
        let at = position.min(self.keys.len());
        self.keys.insert(at, key.to_string());
        self.values.insert(at, value);
        self.rebuild_index();
        Ok(())
    }

    pub fn remove_value(&mut self, key: &str) -> ChartResult<()> {
        let i = self
            .index_of(key)
            .ok_or_else(|| ChartError::UnknownKey(key.to_string()))?;
        self.keys.remove(i);
        self.values.remove(i);
        self.rebuild_index();
        Ok(())
    }

    pub fn clear(&mut self) {
        self.keys.clear();
        self.values.clear();
        self.index.clear();
    }

    pub fn sort_by_keys(&mut self, order: SortOrder) {
        self.sort_with(|a, b| match order {
            SortOrder::Ascending => a.0.cmp(b.0),
            SortOrder::Descending => b.0.cmp(a.0),
        });
    }

    /// Missing values sort last in either order.
    pub fn sort_by_values(&mut self, order: SortOrder) {
        self.sort_with(|a, b| match (a.1, b.1) {
            (Some(x), Some(y)) => match order {
                SortOrder::Ascending => x.total_cmp(&y),
                SortOrder::Descending => y.total_cmp(&x),
            },
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
    }

    fn sort_with(
        &mut self,
        cmp: impl Fn(&(&String, Option<f64>), &(&String, Option<f64>)) -> std::cmp::Ordering,
    ) {
        let mut pairs: Vec<(String, Option<f64>)> = self
            .keys
            .drain(..)
            .zip(self.values.drain(..))
            .collect();
        pairs.sort_by(|a, b| cmp(&(&a.0, a.1), &(&b.0, b.1)));
        let (keys, values): (Vec<String>, Vec<Option<f64>>) = pairs.into_iter().unzip();
        self.keys = keys;
        self.values = values;
        self.rebuild_index();
    }

    fn rebuild_index(&mut self) {
        self.index = self
            .keys
            .iter()
            .enumerate()
            .map(|(i, k)| (k.clone(), i))
            .collect();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<f64>)> {
        self.keys
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }
}

/// Row/column keyed table of optional values.
///
/// Keys are added on demand. Removing a value prunes its row when every value
/// left in that row is missing, then its column when every value left in that
/// column is missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyedValues2D {
    row_keys: Vec<String>,
    column_keys: Vec<String>,
    row_index: AHashMap<String, usize>,
    column_index: AHashMap<String, usize>,
    rows: Vec<Vec<Option<f64>>>,
}

impl KeyedValues2D {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row_count(&self) -> usize {
        self.row_keys.len()
    }

    pub fn column_count(&self) -> usize {
        self.column_keys.len()
    }

    pub fn row_keys(&self) -> &[String] {
        &self.row_keys
    }

    pub fn column_keys(&self) -> &[String] {
        &self.column_keys
    }

    pub fn row_key(&self, row: usize) -> Option<&str> {
        self.row_keys.get(row).map(String::as_str)
    }

    pub fn column_key(&self, column: usize) -> Option<&str> {
        self.column_keys.get(column).map(String::as_str)
    }

    pub fn row_index(&self, key: &str) -> Option<usize> {
        self.row_index.get(key).copied()
    }

    pub fn column_index(&self, key: &str) -> Option<usize> {
        self.column_index.get(key).copied()
    }

    pub fn value(&self, row: usize, column: usize) -> Option<f64> {
        self.rows.get(row)?.get(column).copied().flatten()
    }

    pub fn value_by_keys(&self, row_key: &str, column_key: &str) -> ChartResult<Option<f64>> {
        let r = self
            .row_index(row_key)
            .ok_or_else(|| ChartError::UnknownKey(row_key.to_string()))?;
        let c = self
            .column_index(column_key)
            .ok_or_else(|| ChartError::UnknownKey(column_key.to_string()))?;
        Ok(self.rows[r][c])
    }

    /// Set a value, creating the row and column keys when they are new.
    pub fn set_value(&mut self, value: Option<f64>, row_key: &str, column_key: &str) {
        let c = match self.column_index(column_key) {
            Some(c) => c,
            None => {
                let c = self.column_keys.len();
                self.column_keys.push(column_key.to_string());
                self.column_index.insert(column_key.to_string(), c);
                for row in &mut self.rows {
                    row.push(None);
                }
                c
            }
        };
        let r = match self.row_index(row_key) {
            Some(r) => r,
            None => {
                let r = self.row_keys.len();
                self.row_keys.push(row_key.to_string());
                self.row_index.insert(row_key.to_string(), r);
                self.rows.push(vec![None; self.column_keys.len()]);
                r
            }
        };
        self.rows[r][c] = value;
    }

    pub fn add_value(&mut self, value: Option<f64>, row_key: &str, column_key: &str) {
        self.set_value(value, row_key, column_key);
    }

    /// Clear one value and prune the row and column if they became all-missing.
    pub fn remove_value(&mut self, row_key: &str, column_key: &str) -> ChartResult<()> {
        let r = self
            .row_index(row_key)
            .ok_or_else(|| ChartError::UnknownKey(row_key.to_string()))?;
        let c = self
            .column_index(column_key)
            .ok_or_else(|| ChartError::UnknownKey(column_key.to_string()))?;
        self.rows[r][c] = None;

        if self.rows[r].iter().all(Option::is_none) {
            self.remove_row_at(r);
        }
        if self.rows.iter().all(|row| row[c].is_none()) {
            self.remove_column_at(c);
        }
        Ok(())
    }

    pub fn remove_row(&mut self, row_key: &str) -> ChartResult<()> {
        let r = self
            .row_index(row_key)
            .ok_or_else(|| ChartError::UnknownKey(row_key.to_string()))?;
        self.remove_row_at(r);
        Ok(())
    }

    pub fn remove_column(&mut self, column_key: &str) -> ChartResult<()> {
        let c = self
            .column_index(column_key)
            .ok_or_else(|| ChartError::UnknownKey(column_key.to_string()))?;
        self.remove_column_at(c);
        Ok(())
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn remove_row_at(&mut self, r: usize) {
        self.row_keys.remove(r);
        self.rows.remove(r);
        self.row_index = index_of_keys(&self.row_keys);
    }

    fn remove_column_at(&mut self, c: usize) {
        self.column_keys.remove(c);
        for row in &mut self.rows {
            row.remove(c);
        }
        self.column_index = index_of_keys(&self.column_keys);
    }
}

fn index_of_keys(keys: &[String]) -> AHashMap<String, usize> {
    keys.iter().enumerate().map(|(i, k)| (k.clone(), i)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_value_appends_and_replaces() {
        let mut kv = KeyedValues::new();
        kv.set_value("a", Some(1.0));
        kv.set_value("b", None);
        kv.set_value("a", Some(3.0));
        assert_eq!(kv.len(), 2);
        assert_eq!(kv.value_by_key("a").unwrap(), Some(3.0));
        assert!(matches!(kv.value_by_key("z"), Err(ChartError::UnknownKey(_))));
    }

    #[test]
    fn sort_by_values_puts_missing_last() {
        let mut kv = KeyedValues::new();
        kv.set_value("x", None);
        kv.set_value("y", Some(2.0));
        kv.set_value("z", Some(5.0));
        kv.sort_by_values(SortOrder::Descending);
        assert_eq!(kv.keys(), ["z", "y", "x"]);
        assert_eq!(kv.index_of("x"), Some(2));
    }

    #[test]
    fn insert_moves_existing_key() {
        let mut kv = KeyedValues::new();
        kv.set_value("a", Some(1.0));
        kv.set_value("b", Some(2.0));
        kv.insert_value(0, "b", Some(9.0)).unwrap();
        assert_eq!(kv.keys(), ["b", "a"]);
        assert!(kv.insert_value(5, "c", None).is_err());
    }

    #[test]
    fn new_column_grows_existing_rows() {
        let mut t = KeyedValues2D::new();
        t.add_value(Some(1.0), "r1", "c1");
        t.add_value(Some(2.0), "r2", "c2");
        assert_eq!(t.value(0, 1), None);
        assert_eq!(t.value(1, 1), Some(2.0));
    }
}
