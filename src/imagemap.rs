//! HTML image maps and JSON dumps of the entities from a draw.

use std::fmt::Write as _;

use crate::entity::{ChartEntity, ChartRenderingInfo, EntityCollection};
use crate::error::ChartResult;
use crate::geom::Shape;

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// `shape` and `coords` attribute values, rounded to whole pixels.
fn shape_coords(shape: &Shape) -> (&'static str, String) {
    match shape {
        Shape::Rect(r) => (
            "rect",
            format!(
                "{},{},{},{}",
                r.min_x().round(),
                r.min_y().round(),
                r.max_x().round(),
                r.max_y().round()
            ),
        ),
        other => {
            let coords = other
                .to_polygon(24)
                .iter()
                .map(|p| format!("{},{}", p.x.round(), p.y.round()))
                .collect::<Vec<_>>()
                .join(",");
            ("poly", coords)
        }
    }
}

fn area_tag(entity: &ChartEntity) -> String {
    let (shape, coords) = shape_coords(&entity.area);
    let mut tag = format!("<area shape=\"{shape}\" coords=\"{coords}\"");
    if let Some(tip) = entity.tooltip.as_deref() {
        let tip = escape(tip);
        let _ = write!(tag, " title=\"{tip}\" alt=\"{tip}\"");
    }
    match entity.url.as_deref() {
        Some(url) => {
            let _ = write!(tag, " href=\"{}\"", escape(url));
        }
        None => tag.push_str(" nohref=\"nohref\""),
    }
    tag.push_str("/>");
    tag
}

/// An HTML `<map>` named `name` with one `<area>` per entity that has a
/// tooltip or URL. Areas are listed newest first, so browsers (which take the
/// first match) agree with [`EntityCollection::entity_at`](crate::entity::EntityCollection::entity_at).
pub fn write_image_map(name: &str, info: &ChartRenderingInfo) -> String {
    let mut html = format!("<map id=\"{0}\" name=\"{0}\">\n", escape(name));
    if let Some(entities) = info.entities() {
        for e in entities
            .iter()
            .rev()
            .filter(|e| e.tooltip.is_some() || e.url.is_some())
        {
            html.push_str(&area_tag(e));
            html.push('\n');
        }
    }
    html.push_str("</map>\n");
    html
}

/// All entities as a pretty-printed JSON array, in draw order.
pub fn entities_json(info: &ChartRenderingInfo) -> ChartResult<String> {
    let none = EntityCollection::new();
    Ok(serde_json::to_string_pretty(info.entities().unwrap_or(&none))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityKind;
    use crate::geom::Rect;

    #[test]
    fn escapes_attributes() {
        let mut info = ChartRenderingInfo::new();
        let entities = info.entities_mut().unwrap();
        entities.add(ChartEntity::new(
            Shape::Rect(Rect::new(1.2, 2.0, 10.0, 5.0)),
            EntityKind::Plot,
            Some("a < \"b\"".into()),
            None,
        ));
        let html = write_image_map("m", &info);
        assert!(html.contains("coords=\"1,2,11,7\""));
        assert!(html.contains("title=\"a &lt; &quot;b&quot;\""));
        assert!(html.contains("nohref"));
    }
}
