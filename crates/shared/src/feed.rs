//! Decoding of the earthquake and plate-boundary GeoJSON feeds.
//!
//! A feed body must be valid JSON shaped as a FeatureCollection, a bare array
//! of features or a single Feature; anything else is an error. Individual
//! features are decoded independently so one bad feature never hides the rest.

use chrono::DateTime;
use serde::Deserialize;
use serde_json::Value;

use crate::geo::{GeoPath, Geometry, LatLng};

const UNKNOWN: &str = "unknown";

/// One earthquake event.
#[derive(Debug, Clone, PartialEq)]
pub struct Earthquake {
    pub location: LatLng,
    pub depth_km: Option<f64>,
    pub magnitude: Option<f64>,
    pub place: Option<String>,
    pub time_ms: Option<i64>,
}

/// Outline geometry of one tectonic plate (or boundary segment).
#[derive(Debug, Clone, PartialEq)]
pub struct PlateBoundary {
    pub paths: Vec<GeoPath>,
}

/// Decoded feed plus how many features had to be skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded<T> {
    pub items: Vec<T>,
    pub skipped: usize,
}

#[derive(Deserialize)]
struct RawFeature {
    #[serde(default)]
    geometry: Option<Geometry>,
    #[serde(default)]
    properties: Option<Value>,
}

/// Split a parsed feed document into its feature values.
pub fn feature_values(doc: Value) -> Result<Vec<Value>, String> {
    match doc {
        Value::Array(features) => Ok(features),
        Value::Object(mut obj) => match obj.get("type").and_then(Value::as_str) {
            Some("FeatureCollection") => match obj.remove("features") {
                Some(Value::Array(features)) => Ok(features),
                Some(_) => Err("FeatureCollection 'features' is not an array".to_string()),
                None => Err("FeatureCollection has no 'features' member".to_string()),
            },
            Some("Feature") => Ok(vec![Value::Object(obj)]),
            Some(other) => Err(format!("Unsupported GeoJSON type: {}", other)),
            None => Err("GeoJSON object has no 'type' member".to_string()),
        },
        _ => Err("Feed body is not a GeoJSON object or array".to_string()),
    }
}

fn parse_document(body: &str) -> Result<Vec<Value>, String> {
    let doc: Value =
        serde_json::from_str(body).map_err(|e| format!("Failed to parse feed JSON: {}", e))?;
    feature_values(doc)
}

/// Epoch milliseconds, accepting integral and floating-point encodings.
fn epoch_ms(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().filter(|t| t.is_finite()).map(|t| t as i64))
}

/// Decode a single earthquake feature: one event per point in its geometry
/// (a `MultiPoint` yields several). Empty when it has no point location.
pub fn decode_earthquakes(feature: Value) -> Vec<Earthquake> {
    let Ok(raw) = serde_json::from_value::<RawFeature>(feature) else {
        return Vec::new();
    };
    let Some(geometry) = raw.geometry else {
        return Vec::new();
    };
    let props = raw.properties.unwrap_or(Value::Null);
    let magnitude = props.get("mag").and_then(Value::as_f64);
    let place = props.get("place").and_then(Value::as_str).map(str::to_string);
    let time_ms = props.get("time").and_then(epoch_ms);

    geometry
        .points()
        .into_iter()
        .map(|(location, depth_km)| Earthquake {
            location,
            depth_km,
            magnitude,
            place: place.clone(),
            time_ms,
        })
        .collect()
}

/// Decode a single plate feature. `None` when it has nothing drawable.
pub fn decode_plate_boundary(feature: Value) -> Option<PlateBoundary> {
    let raw: RawFeature = serde_json::from_value(feature).ok()?;
    let paths = raw.geometry?.paths();
    if paths.is_empty() {
        return None;
    }
    Some(PlateBoundary { paths })
}

/// Decode every feature; `skipped` counts features that produced nothing.
fn decode_all<T, I, F>(features: Vec<Value>, decode: F) -> Decoded<T>
where
    I: IntoIterator<Item = T>,
    F: Fn(Value) -> I,
{
    let mut items = Vec::with_capacity(features.len());
    let mut skipped = 0;
    for feature in features {
        let before = items.len();
        items.extend(decode(feature));
        if items.len() == before {
            skipped += 1;
        }
    }
    Decoded { items, skipped }
}

/// Decode an earthquake feed body.
pub fn parse_earthquakes(body: &str) -> Result<Decoded<Earthquake>, String> {
    Ok(decode_all(parse_document(body)?, decode_earthquakes))
}

/// Decode a plate-boundary feed body.
pub fn parse_plate_boundaries(body: &str) -> Result<Decoded<PlateBoundary>, String> {
    Ok(decode_all(parse_document(body)?, decode_plate_boundary))
}

// ---------------------------------------------------------------------------
// Popup text
// ---------------------------------------------------------------------------

/// Text shown in an earthquake's popup.
#[derive(Debug, Clone, PartialEq)]
pub struct QuakeDetails {
    pub place: String,
    pub time: String,
    pub magnitude: String,
    pub depth: String,
}

/// Render an epoch-millisecond timestamp as e.g. `Thu Oct 16 2026 14:03:12 UTC`.
pub fn format_timestamp(time_ms: i64) -> Option<String> {
    DateTime::from_timestamp_millis(time_ms)
        .map(|t| t.format("%a %b %d %Y %H:%M:%S UTC").to_string())
}

impl Earthquake {
    pub fn details(&self) -> QuakeDetails {
        QuakeDetails {
            place: self
                .place
                .clone()
                .unwrap_or_else(|| "Unknown location".to_string()),
            time: self
                .time_ms
                .and_then(format_timestamp)
                .unwrap_or_else(|| UNKNOWN.to_string()),
            magnitude: self
                .magnitude
                .map(|m| m.to_string())
                .unwrap_or_else(|| UNKNOWN.to_string()),
            depth: self
                .depth_km
                .map(|d| format!("{} km", d))
                .unwrap_or_else(|| UNKNOWN.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::{depth_color_for, marker_radius_for};

    const QUAKES: &str = r#"{
        "type": "FeatureCollection",
        "metadata": {"title": "USGS All Earthquakes, Past Week", "count": 3},
        "features": [
            {"type":"Feature","properties":{"mag":5.2,"place":"10 km SW of Ridgecrest, CA","time":1700000000000},
             "geometry":{"type":"Point","coordinates":[-117.7,35.6,25.0]},"id":"ci1"},
            {"type":"Feature","properties":{"mag":null,"place":"Offshore","time":1700000100000},
             "geometry":{"type":"Point","coordinates":[-125.1,40.3,95.0]},"id":"nc2"},
            {"type":"Feature","properties":{"mag":1.1,"place":"Alaska","time":1700000200000},
             "geometry":{"type":"Point","coordinates":[-150.0,61.0,-5.0]},"id":"ak3"}
        ]
    }"#;

    #[test]
    fn test_parse_feature_collection() {
        let decoded = parse_earthquakes(QUAKES).unwrap();
        assert_eq!(decoded.items.len(), 3);
        assert_eq!(decoded.skipped, 0);
        let first = &decoded.items[0];
        assert_eq!(first.location, LatLng::new(35.6, -117.7));
        assert_eq!(first.depth_km, Some(25.0));
        assert_eq!(first.magnitude, Some(5.2));
        assert_eq!(first.place.as_deref(), Some("10 km SW of Ridgecrest, CA"));
        assert_eq!(first.time_ms, Some(1_700_000_000_000));
    }

    #[test]
    fn test_missing_magnitude_still_renders_with_fallback() {
        let decoded = parse_earthquakes(QUAKES).unwrap();
        let offshore = &decoded.items[1];
        assert!(offshore.magnitude.is_none());
        assert_eq!(marker_radius_for(offshore.magnitude), 1.0);
        assert_eq!(depth_color_for(offshore.depth_km), "#ea2c2c");
        // Neighbours are unaffected
        assert!((marker_radius_for(decoded.items[0].magnitude) - 20.8).abs() < 1e-9);
        assert_eq!(depth_color_for(decoded.items[2].depth_km), "#98ee00");
    }

    #[test]
    fn test_zero_features() {
        let decoded = parse_earthquakes(r#"{"type":"FeatureCollection","features":[]}"#).unwrap();
        assert!(decoded.items.is_empty());
        assert_eq!(decoded.skipped, 0);
    }

    #[test]
    fn test_malformed_feature_is_skipped_not_fatal() {
        let body = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{"mag":2.0},"geometry":null},
            {"type":"Feature","properties":{"mag":2.0},"geometry":{"type":"Point","coordinates":[1]}},
            {"type":"Feature","properties":{"mag":2.0},"geometry":{"type":"Blob"}},
            "not a feature",
            {"type":"Feature","properties":{"mag":3.0},"geometry":{"type":"Point","coordinates":[1.0,2.0,3.0]}}
        ]}"#;
        let decoded = parse_earthquakes(body).unwrap();
        assert_eq!(decoded.items.len(), 1);
        assert_eq!(decoded.skipped, 4);
        assert_eq!(decoded.items[0].magnitude, Some(3.0));
    }

    #[test]
    fn test_wrongly_typed_properties_are_treated_as_missing() {
        let body = r#"[{"type":"Feature","properties":{"mag":"big","place":7,"time":"noon"},
            "geometry":{"type":"Point","coordinates":[1.0,2.0]}}]"#;
        let decoded = parse_earthquakes(body).unwrap();
        let quake = &decoded.items[0];
        assert!(quake.magnitude.is_none());
        assert!(quake.place.is_none());
        assert!(quake.time_ms.is_none());
        assert!(quake.depth_km.is_none());
    }

    #[test]
    fn test_null_depth_still_renders() {
        let body = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{"mag":2.5,"place":"Hawaii"},
             "geometry":{"type":"Point","coordinates":[-155.3,19.4,null]}}
        ]}"#;
        let decoded = parse_earthquakes(body).unwrap();
        assert_eq!(decoded.items.len(), 1);
        assert_eq!(decoded.skipped, 0);
        let quake = &decoded.items[0];
        assert_eq!(quake.location, LatLng::new(19.4, -155.3));
        assert!(quake.depth_km.is_none());
        assert_eq!(depth_color_for(quake.depth_km), "#ea2c2c");
        assert_eq!(quake.details().depth, "unknown");
    }

    #[test]
    fn test_float_epoch_time_is_formatted() {
        let body = r#"[{"type":"Feature","properties":{"time":1.7e12},
            "geometry":{"type":"Point","coordinates":[1.0,2.0]}}]"#;
        let decoded = parse_earthquakes(body).unwrap();
        assert_eq!(decoded.items[0].time_ms, Some(1_700_000_000_000));
        assert_eq!(decoded.items[0].details().time, "Tue Nov 14 2023 22:13:20 UTC");
    }

    #[test]
    fn test_multipoint_feature_yields_one_quake_per_point() {
        let body = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{"mag":4.0,"place":"Swarm"},
             "geometry":{"type":"MultiPoint","coordinates":[[10.0,20.0,5.0],[11.0,21.0,15.0]]}},
            {"type":"Feature","properties":{"mag":1.0},
             "geometry":{"type":"MultiPoint","coordinates":[]}}
        ]}"#;
        let decoded = parse_earthquakes(body).unwrap();
        assert_eq!(decoded.items.len(), 2);
        assert_eq!(decoded.skipped, 1);
        assert_eq!(decoded.items[1].location, LatLng::new(21.0, 11.0));
        assert_eq!(decoded.items[1].depth_km, Some(15.0));
        assert!(decoded.items.iter().all(|q| q.magnitude == Some(4.0)));
        assert!(decoded.items.iter().all(|q| q.place.as_deref() == Some("Swarm")));
    }

    #[test]
    fn test_missing_properties_object() {
        let body = r#"{"type":"Feature","geometry":{"type":"Point","coordinates":[1.0,2.0,4.0]}}"#;
        let decoded = parse_earthquakes(body).unwrap();
        assert_eq!(decoded.items.len(), 1);
        assert!(decoded.items[0].magnitude.is_none());
    }

    #[test]
    fn test_malformed_body_is_an_error() {
        assert!(parse_earthquakes("<html>502 Bad Gateway</html>").is_err());
        assert!(parse_earthquakes("42").is_err());
        assert!(parse_earthquakes(r#"{"type":"FeatureCollection"}"#).is_err());
        assert!(parse_earthquakes(r#"{"type":"FeatureCollection","features":{}}"#).is_err());
        assert!(parse_earthquakes(r#"{"features":[]}"#).is_err());
        assert!(parse_earthquakes(r#"{"type":"Topology"}"#).is_err());
    }

    #[test]
    fn test_parse_plate_boundaries() {
        let body = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{"Code":"AF","PlateName":"Africa"},
             "geometry":{"type":"Polygon","coordinates":[[[-0.4,-54.8],[0.0,-54.6],[1.2,-54.1],[-0.4,-54.8]]]}},
            {"type":"Feature","properties":{},
             "geometry":{"type":"LineString","coordinates":[[170.0,-40.0],[175.0,-42.0]]}},
            {"type":"Feature","properties":{},"geometry":{"type":"Point","coordinates":[0,0]}}
        ]}"#;
        let decoded = parse_plate_boundaries(body).unwrap();
        assert_eq!(decoded.items.len(), 2);
        assert_eq!(decoded.skipped, 1);
        assert!(decoded.items[0].paths[0].closed);
        assert!(!decoded.items[1].paths[0].closed);
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(
            format_timestamp(1_700_000_000_000).as_deref(),
            Some("Tue Nov 14 2023 22:13:20 UTC")
        );
        assert_eq!(format_timestamp(0).as_deref(), Some("Thu Jan 01 1970 00:00:00 UTC"));
    }

    #[test]
    fn test_details_full() {
        let decoded = parse_earthquakes(QUAKES).unwrap();
        let details = decoded.items[0].details();
        assert_eq!(details.place, "10 km SW of Ridgecrest, CA");
        assert_eq!(details.time, "Tue Nov 14 2023 22:13:20 UTC");
        assert_eq!(details.magnitude, "5.2");
        assert_eq!(details.depth, "25 km");
    }

    #[test]
    fn test_details_missing_values() {
        let quake = Earthquake {
            location: LatLng::new(0.0, 0.0),
            depth_km: None,
            magnitude: None,
            place: None,
            time_ms: None,
        };
        let details = quake.details();
        assert_eq!(details.place, "Unknown location");
        assert_eq!(details.time, "unknown");
        assert_eq!(details.magnitude, "unknown");
        assert_eq!(details.depth, "unknown");
    }
}
