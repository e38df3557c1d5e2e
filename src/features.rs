use crate::geo::{LatLng, LatLngBounds};
use crate::{MapError, MapResult};

use geojson::{Feature, FeatureCollection, GeoJson, Geometry, Value};

pub fn read_feature_collection<P: AsRef<std::path::Path>>(path: P) -> MapResult<FeatureCollection> {
    let text = std::fs::read_to_string(path)?;
    parse_feature_collection(&text)
}

/// Parses a GeoJSON document that must be a FeatureCollection.
pub fn parse_feature_collection(text: &str) -> MapResult<FeatureCollection> {
    // plain json errors surface as InvalidJson, shape errors as InvalidGeoJson
    let value: serde_json::Value = serde_json::from_str(text)?;

    let geojson: GeoJson =
        serde_json::from_value(value).map_err(|e| MapError::InvalidGeoJson(e.to_string()))?;

    match geojson {
        GeoJson::FeatureCollection(collection) => Ok(collection),
        GeoJson::Feature(_) => Err(MapError::NotAFeatureCollection("Feature".to_owned())),
        GeoJson::Geometry(_) => Err(MapError::NotAFeatureCollection("Geometry".to_owned())),
    }
}

/// `properties.popupContent.content`, if it is a string.
pub fn popup_content(feature: &Feature) -> Option<&str> {
    feature
        .properties
        .as_ref()?
        .get("popupContent")?
        .get("content")?
        .as_str()
}

pub fn geometry_bounds(geometry: &Geometry) -> Option<LatLngBounds> {
    let mut bounds: Option<LatLngBounds> = None;
    visit_positions(&geometry.value, &mut |position: &[f64]| {
        if let Some(p) = LatLng::from_position(position) {
            match bounds.as_mut() {
                Some(b) => b.extend(p),
                None => bounds = Some(LatLngBounds::from_point(p)),
            }
        }
    });
    bounds
}

pub fn feature_bounds(feature: &Feature) -> Option<LatLngBounds> {
    feature.geometry.as_ref().and_then(geometry_bounds)
}

pub fn collection_bounds(collection: &FeatureCollection) -> Option<LatLngBounds> {
    union_bounds(collection.features.iter().filter_map(feature_bounds))
}

pub fn union_bounds<I: IntoIterator<Item = LatLngBounds>>(bounds: I) -> Option<LatLngBounds> {
    bounds.into_iter().fold(None, |acc, b| match acc {
        Some(mut acc) => {
            acc.union(&b);
            Some(acc)
        }
        None => Some(b),
    })
}

fn visit_positions(value: &Value, f: &mut dyn FnMut(&[f64])) {
    match value {
        Value::Point(p) => f(p.as_slice()),
        Value::MultiPoint(ps) | Value::LineString(ps) => ps.iter().for_each(|p| f(p.as_slice())),
        Value::MultiLineString(lines) | Value::Polygon(lines) => lines
            .iter()
            .flat_map(|line| line.iter())
            .for_each(|p| f(p.as_slice())),
        Value::MultiPolygon(polygons) => polygons
            .iter()
            .flat_map(|polygon| polygon.iter())
            .flat_map(|ring| ring.iter())
            .for_each(|p| f(p.as_slice())),
        Value::GeometryCollection(geometries) => geometries
            .iter()
            .for_each(|g| visit_positions(&g.value, f)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATIONS: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [9.19, 45.46]},
                "properties": {"popupContent": {"content": "Station A"}}
            },
            {
                "type": "Feature",
                "geometry": {"type": "LineString", "coordinates": [[7.68, 45.07], [8.0, 44.5]]},
                "properties": null
            }
        ]
    }"#;

    #[test]
    fn test_parse_collection() {
        let collection = parse_feature_collection(STATIONS).unwrap();
        assert_eq!(collection.features.len(), 2);
        assert_eq!(popup_content(&collection.features[0]), Some("Station A"));
        assert_eq!(popup_content(&collection.features[1]), None);
    }

    #[test]
    fn test_malformed_json() {
        match parse_feature_collection("{\"type\": \"FeatureCollection\", ") {
            Err(MapError::InvalidJson(_)) => (),
            other => panic!("unexpected result {:?}", other.map(|c| c.features.len())),
        }
    }

    #[test]
    fn test_not_geojson() {
        match parse_feature_collection(r#"{"features": []}"#) {
            Err(MapError::InvalidGeoJson(_)) => (),
            other => panic!("unexpected result {:?}", other.map(|c| c.features.len())),
        }
    }

    #[test]
    fn test_single_feature_is_rejected() {
        let feature = r#"{"type": "Feature", "geometry": null, "properties": null}"#;
        match parse_feature_collection(feature) {
            Err(MapError::NotAFeatureCollection(kind)) => assert_eq!(kind, "Feature"),
            other => panic!("unexpected result {:?}", other.map(|c| c.features.len())),
        }
    }

    #[test]
    fn test_non_string_popup_content() {
        let collection = parse_feature_collection(
            r#"{"type": "FeatureCollection", "features": [{
                "type": "Feature",
                "geometry": null,
                "properties": {"popupContent": {"content": 42}}
            }]}"#,
        )
        .unwrap();
        assert_eq!(popup_content(&collection.features[0]), None);
    }

    #[test]
    fn test_collection_bounds() {
        let collection = parse_feature_collection(STATIONS).unwrap();
        let bounds = collection_bounds(&collection).unwrap();
        assert_eq!(bounds.south_west, LatLng::new(44.5, 7.68));
        assert_eq!(bounds.north_east, LatLng::new(45.46, 9.19));
    }

    #[test]
    fn test_nested_geometry_bounds() {
        let geometry: Geometry = serde_json::from_str(
            r#"{"type": "GeometryCollection", "geometries": [
                {"type": "Point", "coordinates": [1.0, 2.0]},
                {"type": "MultiPolygon", "coordinates": [[[[-3.0, -4.0], [5.0, -4.0], [5.0, 6.0], [-3.0, -4.0]]]]}
            ]}"#,
        )
        .unwrap();
        let bounds = geometry_bounds(&geometry).unwrap();
        assert_eq!(bounds.south_west, LatLng::new(-4.0, -3.0));
        assert_eq!(bounds.north_east, LatLng::new(6.0, 5.0));
    }

    #[test]
    fn test_empty_collection_has_no_bounds() {
        let collection =
            parse_feature_collection(r#"{"type": "FeatureCollection", "features": []}"#).unwrap();
        assert!(collection_bounds(&collection).is_none());
    }
}
