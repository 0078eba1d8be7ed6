use foundation::math::LonLat;
use scene::{FieldId, Instrument, InstrumentField};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::FormatError;
use crate::feature_collection::geometries_from_value;

/// JSON shape of an instrument as delivered by the data-fetch layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentDescriptor {
    pub name: String,
    #[serde(default)]
    pub filters: Vec<String>,
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub id: FieldId,
    pub ra: f64,
    pub dec: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub airmass: Option<f64>,
    /// Polygon as a geometry, a `Feature` or a `FeatureCollection`.
    #[serde(default)]
    pub contour_summary: Value,
}

pub fn parse_instrument(payload: &str) -> Result<Instrument, FormatError> {
    let descriptor: InstrumentDescriptor = serde_json::from_str(payload)?;
    instrument_from_descriptor(descriptor)
}

/// Fields with invalid centers or without a polygon are skipped.
pub fn instrument_from_descriptor(descriptor: InstrumentDescriptor) -> Result<Instrument, FormatError> {
    if descriptor.name.trim().is_empty() {
        return Err(FormatError::InvalidDescriptor("instrument name is empty".to_string()));
    }

    let mut fields = Vec::with_capacity(descriptor.fields.len());
    for field in descriptor.fields {
        let center = LonLat::new(field.ra, field.dec);
        if !center.is_valid() {
            warn!(instrument = %descriptor.name, field_id = field.id, "skipping field with invalid center");
            continue;
        }
        let contour: Vec<Vec<LonLat>> = geometries_from_value(&field.contour_summary)
            .iter()
            .flat_map(|g| g.rings().into_iter().map(<[LonLat]>::to_vec))
            .collect();
        if contour.is_empty() {
            warn!(instrument = %descriptor.name, field_id = field.id, "skipping field without a summary polygon");
            continue;
        }
        let mut parsed = InstrumentField::new(field.id, center, contour);
        parsed.airmass = field.airmass.filter(|a| a.is_finite());
        fields.push(parsed);
    }

    Ok(Instrument::new(descriptor.name, descriptor.filters, fields))
}

#[cfg(test)]
mod tests {
    use super::parse_instrument;
    use crate::error::FormatError;

    #[test]
    fn parses_fields_and_skips_unusable_ones() {
        let payload = r#"{
            "name": "ZTF",
            "filters": ["ztfg", "ztfr", "ztfi"],
            "fields": [
                {"id": 1, "ra": 10.0, "dec": 20.0, "airmass": 1.8,
                 "contour_summary": {"type": "Polygon", "coordinates": [[[9,19],[11,19],[11,21],[9,21],[9,19]]]}},
                {"id": 2, "ra": 30.0, "dec": 20.0,
                 "contour_summary": {"type": "Feature", "properties": {},
                    "geometry": {"type": "Polygon", "coordinates": [[[29,19],[31,19],[31,21],[29,19]]]}}},
                {"id": 3, "ra": 0.0, "dec": 120.0,
                 "contour_summary": {"type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,0]]]}},
                {"id": 4, "ra": 0.0, "dec": 0.0, "contour_summary": null}
            ]
        }"#;
        let instrument = parse_instrument(payload).unwrap();
        assert_eq!(instrument.name(), "ZTF");
        let ids: Vec<u64> = instrument.fields().iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(instrument.field(1).unwrap().airmass, Some(1.8));
        assert_eq!(instrument.field(2).unwrap().airmass, None);
        assert_eq!(instrument.color().to_hex(), "#7ec245");
    }

    #[test]
    fn empty_name_is_rejected() {
        let err = parse_instrument(r#"{"name": " ", "fields": []}"#).unwrap_err();
        assert!(matches!(err, FormatError::InvalidDescriptor(_)));
    }
}
