//! Tolerant decoding of live feed documents into marker snapshots.
//!
//! Feed schemas belong to third parties; fields are read leniently and
//! entries that cannot be read are dropped rather than failing the batch.

use crate::geometry::limits;
use crate::model::{EventMarker, TrackedMarker};
use serde_json::Value;

fn number(v: Option<&Value>) -> Option<f64> {
    let x = match v? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    x.filter(|x| x.is_finite())
}

/// USGS GeoJSON summary feed: `features[].geometry.coordinates = [lon, lat, depth]`
/// and `features[].properties.mag`. A missing magnitude reads as 0.
pub fn events_from_geojson(doc: &Value) -> Vec<EventMarker> {
    let Some(features) = doc.get("features").and_then(|f| f.as_array()) else {
        return Vec::new();
    };
    features
        .iter()
        .take(limits::MAX_FEED_EVENTS)
        .filter_map(|f| {
            let coords = f.get("geometry")?.get("coordinates")?.as_array()?;
            let longitude = number(coords.first())?;
            let latitude = number(coords.get(1))?;
            let magnitude = number(f.get("properties").and_then(|p| p.get("mag"))).unwrap_or(0.0);
            Some(EventMarker { longitude, latitude, magnitude })
        })
        .collect()
}

pub fn parse_usgs_geojson(text: &str) -> Result<Vec<EventMarker>, serde_json::Error> {
    let v: Value = serde_json::from_str(text)?;
    Ok(events_from_geojson(&v))
}

/// Read a position from `{latitude, longitude}`, `{lat, lon|lng}` or
/// `{iss_position: {...}}`; numbers may arrive as strings.
pub fn position_from_value(doc: &Value) -> Option<TrackedMarker> {
    let src = doc.get("iss_position").unwrap_or(doc);
    let latitude = number(src.get("latitude")).or_else(|| number(src.get("lat")))?;
    let longitude = number(src.get("longitude"))
        .or_else(|| number(src.get("lon")))
        .or_else(|| number(src.get("lng")))?;
    Some(TrackedMarker { longitude, latitude })
}

pub fn parse_position(text: &str) -> Result<Option<TrackedMarker>, serde_json::Error> {
    let v: Value = serde_json::from_str(text)?;
    Ok(position_from_value(&v))
}
