//! Producer side of the marker map: turns located records into the
//! FeatureCollection the initializer consumes, and embeds it into a page.

use crate::geo::LatLng;
use crate::MapResult;

use geojson::{Feature, FeatureCollection, Geometry, Value};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub location: Option<LatLng>,
}

pub fn read_markers<P: AsRef<std::path::Path>>(path: P) -> MapResult<Vec<Marker>> {
    let file = std::fs::File::open(path)?;
    let file = std::io::BufReader::new(file);
    Ok(serde_json::from_reader(file)?)
}

/// One point feature per located marker, each with a popup linking to it.
pub fn marker_collection(markers: &[Marker]) -> FeatureCollection {
    let features = markers
        .iter()
        .filter_map(|m| m.location.map(|location| make_marker_feature(m, location)))
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

fn make_marker_feature(marker: &Marker, location: LatLng) -> Feature {
    let content = format!(
        "<a href=\"{}\">{}</a>",
        escape_html(&marker.url),
        escape_html(&marker.name)
    );

    let mut properties = serde_json::Map::new();
    properties.insert("name".to_owned(), json!(marker.name));
    properties.insert("popupContent".to_owned(), json!({ "content": content }));

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Point(vec![location.lng, location.lat]))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Renders `<script id=".." type="application/json">` holding the collection.
/// `<`, `>` and `&` are written as json unicode escapes, so the payload can't
/// end the element early.
pub fn json_script(collection: &FeatureCollection, element_id: &str) -> MapResult<String> {
    let payload = serde_json::to_string(collection)?
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026");

    Ok(format!(
        "<script id=\"{}\" type=\"application/json\">{}</script>",
        escape_html(element_id),
        payload
    ))
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            c => escaped.push(c),
        }
    }
    escaped
}
