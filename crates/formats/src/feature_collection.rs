//! GeoJSON-style feature collections as delivered by the data-fetch layer.
//!
//! A malformed feature never fails the whole collection: it is logged and
//! skipped. Only a payload that is not a `FeatureCollection` at all is an error.

use foundation::math::LonLat;
use scene::{GeoFeature, Geometry, Properties};
use serde_json::Value;
use tracing::warn;

use crate::error::FormatError;

pub fn parse_feature_collection(payload: &str) -> Result<Vec<GeoFeature>, FormatError> {
    let value: Value = serde_json::from_str(payload)?;
    features_from_value(&value)
}

pub fn features_from_value(value: &Value) -> Result<Vec<GeoFeature>, FormatError> {
    let obj = value.as_object().ok_or(FormatError::NotAFeatureCollection)?;
    let ty = obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or(FormatError::NotAFeatureCollection)?;
    if ty != "FeatureCollection" {
        return Err(FormatError::NotAFeatureCollection);
    }
    let features_val = obj
        .get("features")
        .and_then(|v| v.as_array())
        .ok_or(FormatError::NotAFeatureCollection)?;

    let mut features = Vec::with_capacity(features_val.len());
    for (index, feat_val) in features_val.iter().enumerate() {
        match parse_feature(feat_val) {
            Ok(feature) => features.push(feature),
            Err(reason) => warn!(index, %reason, "skipping malformed feature"),
        }
    }
    Ok(features)
}

/// Geometries of a bare geometry object, a `Feature` or a `FeatureCollection`.
///
/// Unparseable members are skipped; an unrecognized shape yields an empty list.
pub fn geometries_from_value(value: &Value) -> Vec<Geometry> {
    match value.get("type").and_then(|v| v.as_str()) {
        Some("FeatureCollection") => features_from_value(value)
            .map(|fs| fs.into_iter().map(|f| f.geometry).collect())
            .unwrap_or_default(),
        Some("Feature") => parse_feature(value).map(|f| vec![f.geometry]).unwrap_or_else(|reason| {
            warn!(%reason, "skipping malformed feature");
            Vec::new()
        }),
        Some(_) => parse_geometry(value).map(|g| vec![g]).unwrap_or_else(|reason| {
            warn!(%reason, "skipping malformed geometry");
            Vec::new()
        }),
        None => Vec::new(),
    }
}

pub fn parse_feature(value: &Value) -> Result<GeoFeature, String> {
    let obj = value.as_object().ok_or("feature must be an object".to_string())?;
    let feat_type = obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or("feature missing type".to_string())?;
    if feat_type != "Feature" {
        return Err(format!("unexpected feature type: {feat_type}"));
    }

    let id = match obj.get("id") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    };
    let properties: Properties = obj
        .get("properties")
        .and_then(|v| v.as_object())
        .cloned()
        .unwrap_or_default();
    let geometry_val = obj
        .get("geometry")
        .filter(|v| !v.is_null())
        .ok_or("feature missing geometry".to_string())?;
    let geometry = parse_geometry(geometry_val)?;
    if !geometry.is_valid() {
        return Err("geometry has out-of-range or empty coordinates".to_string());
    }

    Ok(GeoFeature {
        id,
        geometry,
        properties,
    })
}

pub fn parse_geometry(value: &Value) -> Result<Geometry, String> {
    let obj = value.as_object().ok_or("geometry must be an object".to_string())?;
    let ty = obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or("geometry missing type".to_string())?;
    let coords = obj
        .get("coordinates")
        .ok_or("geometry missing coordinates".to_string())?;

    match ty {
        "Point" => Ok(Geometry::Point(parse_point(coords)?)),
        "MultiPoint" => Ok(Geometry::MultiPoint(parse_points(coords)?)),
        "LineString" => Ok(Geometry::LineString(parse_points(coords)?)),
        "MultiLineString" => Ok(Geometry::MultiLineString(parse_nested(coords, parse_points)?)),
        "Polygon" => Ok(Geometry::Polygon(parse_nested(coords, parse_points)?)),
        "MultiPolygon" => Ok(Geometry::MultiPolygon(parse_nested(coords, |p| {
            parse_nested(p, parse_points)
        })?)),
        other => Err(format!("unsupported geometry type: {other}")),
    }
}

fn parse_point(coords: &Value) -> Result<LonLat, String> {
    let arr = coords
        .as_array()
        .ok_or("Point coordinates must be an array".to_string())?;
    if arr.len() < 2 {
        return Err("Point coordinates must have [lon, lat]".to_string());
    }
    let lon = arr[0].as_f64().ok_or("Point lon must be a number".to_string())?;
    let lat = arr[1].as_f64().ok_or("Point lat must be a number".to_string())?;
    Ok(LonLat::new(lon, lat))
}

fn parse_points(coords: &Value) -> Result<Vec<LonLat>, String> {
    let arr = coords
        .as_array()
        .ok_or("coordinates must be an array".to_string())?;
    arr.iter().map(parse_point).collect()
}

fn parse_nested<T>(
    coords: &Value,
    parse: impl Fn(&Value) -> Result<T, String>,
) -> Result<Vec<T>, String> {
    let arr = coords
        .as_array()
        .ok_or("coordinates must be a nested array".to_string())?;
    arr.iter().map(parse).collect()
}
