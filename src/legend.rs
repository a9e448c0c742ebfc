//! Legend items and the sources that produce them.

use std::cell::RefCell;
use std::rc::Rc;

use crate::paint::{BLACK, GRAY, MarkerShape, Paint, Stroke};

/// Read-only description of one series (or pie section) for a legend.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendItem {
    pub label: String,
    pub description: Option<String>,
    pub tooltip: Option<String>,
    pub url: Option<String>,
    pub shape: MarkerShape,
    pub shape_visible: bool,
    pub shape_filled: bool,
    pub fill_paint: Paint,
    pub shape_outline_visible: bool,
    pub outline_paint: Paint,
    pub outline_stroke: Stroke,
    pub line_visible: bool,
    pub line_paint: Paint,
    pub line_stroke: Stroke,
    pub series_key: String,
    pub series_index: usize,
    pub dataset_index: usize,
}

impl LegendItem {
    /// A filled square swatch in `paint`; the series key defaults to the label.
    pub fn new(label: impl Into<String>, paint: Paint) -> Self {
        let label = label.into();
        Self {
            series_key: label.clone(),
            label,
            description: None,
            tooltip: None,
            url: None,
            shape: MarkerShape::Square,
            shape_visible: true,
            shape_filled: true,
            fill_paint: paint,
            shape_outline_visible: false,
            outline_paint: GRAY,
            outline_stroke: Stroke::new(0.5),
            line_visible: false,
            line_paint: BLACK,
            line_stroke: Stroke::new(1.0),
            series_index: 0,
            dataset_index: 0,
        }
    }

    pub fn with_series(mut self, key: impl Into<String>, index: usize) -> Self {
        self.series_key = key.into();
        self.series_index = index;
        self
    }

    pub fn with_dataset_index(mut self, index: usize) -> Self {
        self.dataset_index = index;
        self
    }

    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_shape(mut self, shape: MarkerShape) -> Self {
        self.shape = shape;
        self
    }

    /// Show a line segment through the marker, as line renderers do.
    pub fn with_line(mut self, paint: Paint, stroke: Stroke) -> Self {
        self.line_visible = true;
        self.line_paint = paint;
        self.line_stroke = stroke;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LegendItemCollection {
    items: Vec<LegendItem>,
}

impl LegendItemCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, item: LegendItem) {
        self.items.push(item);
    }

    pub fn add_all(&mut self, other: LegendItemCollection) {
        self.items.extend(other.items);
    }

    pub fn get(&self, index: usize) -> Option<&LegendItem> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LegendItem> {
        self.items.iter()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.items.iter().map(|i| i.label.as_str()).collect()
    }
}

impl FromIterator<LegendItem> for LegendItemCollection {
    fn from_iter<T: IntoIterator<Item = LegendItem>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for LegendItemCollection {
    type Item = LegendItem;
    type IntoIter = std::vec::IntoIter<LegendItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

/// Anything that can describe its series for a legend, from current state.
pub trait LegendItemSource {
    fn legend_items(&self) -> LegendItemCollection;
}

/// A fixed list is its own source.
impl LegendItemSource for LegendItemCollection {
    fn legend_items(&self) -> LegendItemCollection {
        self.clone()
    }
}

/// Lets a `Rc<RefCell<T>>` (a plot held by a chart) serve as `Rc<dyn LegendItemSource>`.
pub struct SharedSource<T: ?Sized>(pub Rc<RefCell<T>>);

impl<T: LegendItemSource + ?Sized> LegendItemSource for SharedSource<T> {
    fn legend_items(&self) -> LegendItemCollection {
        match self.0.try_borrow() {
            Ok(inner) => inner.legend_items(),
            Err(_) => {
                log::warn!("legend source is mutably borrowed; reporting no items");
                LegendItemCollection::new()
            }
        }
    }
}

/// Order in which a legend lists its items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}
