//! Hit-testable regions recorded while drawing.
//!
//! Shapes are in chart drawing space, before any viewport scaling. A collection
//! is rebuilt from scratch on every draw and only ever appended to in between.

use serde::Serialize;

use crate::geom::{Rect, RectangleEdge, Shape};

/// What produced an entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntityKind {
    /// The whole chart area.
    Chart,
    Plot,
    Title {
        text: Option<String>,
    },
    /// A plain block that carries a tooltip or URL.
    Block {
        id: Option<String>,
    },
    LegendItem {
        series_key: String,
        series_index: usize,
        dataset_index: usize,
    },
    XyItem {
        dataset_index: usize,
        series_key: String,
        series: usize,
        item: usize,
        x: f64,
        y: f64,
    },
    CategoryItem {
        dataset_index: usize,
        row_key: String,
        column_key: String,
        row: usize,
        column: usize,
        value: f64,
    },
    PieSection {
        dataset_index: usize,
        key: String,
        index: usize,
        value: f64,
    },
    Axis {
        edge: RectangleEdge,
    },
}

impl EntityKind {
    /// Name used for element grouping in vector output; matches the `kind`
    /// tag of the JSON dump.
    pub fn element_id(&self) -> &'static str {
        match self {
            EntityKind::Chart => "chart",
            EntityKind::Plot => "plot",
            EntityKind::Title { .. } => "title",
            EntityKind::Block { .. } => "block",
            EntityKind::LegendItem { .. } => "legend_item",
            EntityKind::XyItem { .. } => "xy_item",
            EntityKind::CategoryItem { .. } => "category_item",
            EntityKind::PieSection { .. } => "pie_section",
            EntityKind::Axis { .. } => "axis",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartEntity {
    pub area: Shape,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(flatten)]
    pub kind: EntityKind,
}

impl ChartEntity {
    pub fn new(area: Shape, kind: EntityKind, tooltip: Option<String>, url: Option<String>) -> Self {
        Self {
            area,
            tooltip,
            url,
            kind,
        }
    }

    pub fn rect(area: Rect, kind: EntityKind) -> Self {
        Self::new(Shape::Rect(area), kind, None, None)
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.area.contains(x, y)
    }
}

/// Entities in draw order. Lookups favour the most recently added entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct EntityCollection {
    entities: Vec<ChartEntity>,
}

impl EntityCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, entity: ChartEntity) {
        self.entities.push(entity);
    }

    pub fn add_all(&mut self, other: EntityCollection) {
        self.entities.extend(other.entities);
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ChartEntity> {
        self.entities.get(index)
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &ChartEntity> {
        self.entities.iter()
    }

    pub fn clear(&mut self) {
        self.entities.clear();
    }

    /// The last-inserted entity whose area contains `(x, y)`.
    pub fn entity_at(&self, x: f64, y: f64) -> Option<&ChartEntity> {
        self.entities.iter().rev().find(|e| e.contains(x, y))
    }

    /// Entities matching `pred`, in draw order.
    pub fn filter<'a>(
        &'a self,
        pred: impl Fn(&EntityKind) -> bool + 'a,
    ) -> impl Iterator<Item = &'a ChartEntity> + 'a {
        self.entities.iter().filter(move |e| pred(&e.kind))
    }
}

impl<'a> IntoIterator for &'a EntityCollection {
    type Item = &'a ChartEntity;
    type IntoIter = std::slice::Iter<'a, ChartEntity>;

    fn into_iter(self) -> Self::IntoIter {
        self.entities.iter()
    }
}

/// Areas a plot resolved during one draw. Combined plots nest one per subplot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlotRenderingInfo {
    pub plot_area: Rect,
    pub data_area: Rect,
    pub subplots: Vec<PlotRenderingInfo>,
}

impl PlotRenderingInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Index of the subplot whose data area contains the point.
    pub fn subplot_index(&self, x: f64, y: f64) -> Option<usize> {
        self.subplots
            .iter()
            .position(|s| s.data_area.contains(x, y))
    }
}

/// Everything one chart draw resolved: areas plus (optionally) entities.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartRenderingInfo {
    pub chart_area: Rect,
    pub plot_info: PlotRenderingInfo,
    entities: Option<EntityCollection>,
}

impl Default for ChartRenderingInfo {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartRenderingInfo {
    /// Collect entities during the draw.
    pub fn new() -> Self {
        Self {
            chart_area: Rect::default(),
            plot_info: PlotRenderingInfo::new(),
            entities: Some(EntityCollection::new()),
        }
    }

    /// Record areas only; the draw skips all entity work.
    pub fn without_entities() -> Self {
        Self {
            entities: None,
            ..Self::new()
        }
    }

    pub fn entities(&self) -> Option<&EntityCollection> {
        self.entities.as_ref()
    }

    pub fn entities_mut(&mut self) -> Option<&mut EntityCollection> {
        self.entities.as_mut()
    }

    pub fn generates_entities(&self) -> bool {
        self.entities.is_some()
    }

    /// Reset for a new draw, keeping the entity on/off choice.
    pub fn clear(&mut self) {
        self.chart_area = Rect::default();
        self.plot_info.clear();
        if let Some(e) = self.entities.as_mut() {
            e.clear();
        }
    }

    /// Split into the plot info and entity collection for a plot draw.
    pub fn plot_parts(&mut self) -> (&mut PlotRenderingInfo, Option<&mut EntityCollection>) {
        (&mut self.plot_info, self.entities.as_mut())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_inserted_wins() {
        let mut ec = EntityCollection::new();
        ec.add(ChartEntity::rect(Rect::new(0.0, 0.0, 100.0, 100.0), EntityKind::Chart));
        ec.add(ChartEntity::rect(Rect::new(10.0, 10.0, 10.0, 10.0), EntityKind::Plot));
        assert_eq!(ec.entity_at(15.0, 15.0).map(|e| &e.kind), Some(&EntityKind::Plot));
        assert_eq!(ec.entity_at(50.0, 50.0).map(|e| &e.kind), Some(&EntityKind::Chart));
        assert!(ec.entity_at(150.0, 5.0).is_none());
    }
}
