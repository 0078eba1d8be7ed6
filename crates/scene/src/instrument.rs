use std::collections::BTreeSet;

use foundation::color::{Color, filter_color};
use foundation::math::LonLat;
use tracing::warn;

pub type FieldId = u64;

/// One pointing of an instrument.
#[derive(Debug, Clone, PartialEq)]
pub struct InstrumentField {
    pub id: FieldId,
    pub center: LonLat,
    /// Summary polygon rings used for drawing and hit-testing.
    pub contour: Vec<Vec<LonLat>>,
    pub airmass: Option<f64>,
}

impl InstrumentField {
    pub fn new(id: FieldId, center: LonLat, contour: Vec<Vec<LonLat>>) -> Self {
        Self {
            id,
            center,
            contour,
            airmass: None,
        }
    }

    pub fn with_airmass(mut self, airmass: f64) -> Self {
        self.airmass = Some(airmass);
        self
    }

    /// Airmass strictly below `threshold`. Fields without an airmass are not observable.
    pub fn is_observable(&self, threshold: f64) -> bool {
        self.airmass.is_some_and(|a| a.is_finite() && a < threshold)
    }

    /// Valid center and at least one ring, every vertex valid.
    pub fn is_valid(&self) -> bool {
        self.center.is_valid()
            && !self.contour.is_empty()
            && self.contour.iter().flatten().all(|p| p.is_valid())
    }
}

/// Instrument descriptor: filters shared by every field, plus the field grid.
///
/// Field identifiers are unique; later duplicates are dropped on construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Instrument {
    name: String,
    filters: Vec<String>,
    fields: Vec<InstrumentField>,
    color: Color,
}

impl Instrument {
    pub fn new(name: impl Into<String>, filters: Vec<String>, fields: Vec<InstrumentField>) -> Self {
        let name = name.into();
        let mut seen = BTreeSet::new();
        let mut unique = Vec::with_capacity(fields.len());
        for field in fields {
            if seen.insert(field.id) {
                unique.push(field);
            } else {
                warn!(instrument = %name, field_id = field.id, "dropping duplicate field id");
            }
        }
        let color = filter_color(&filters);
        Self {
            name,
            filters,
            fields: unique,
            color,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn filters(&self) -> &[String] {
        &self.filters
    }

    pub fn fields(&self) -> &[InstrumentField] {
        &self.fields
    }

    pub fn field(&self, id: FieldId) -> Option<&InstrumentField> {
        self.fields.iter().find(|f| f.id == id)
    }

    /// Colour of selected fields, derived from the filter list.
    pub fn color(&self) -> Color {
        self.color
    }
}
