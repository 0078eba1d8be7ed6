use std::fmt;

use foundation::math::{LonLat, spherical_centroid};
use serde::{Deserialize, Serialize};

use crate::feature::GeoFeature;

/// Identity of a localization as requested by the host.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ContourKey {
    pub dateobs: String,
    pub localization_name: String,
}

impl ContourKey {
    pub fn new(dateobs: impl Into<String>, localization_name: impl Into<String>) -> Self {
        Self {
            dateobs: dateobs.into(),
            localization_name: localization_name.into(),
        }
    }
}

impl fmt::Display for ContourKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.dateobs, self.localization_name)
    }
}

/// Probability contour bands of one sky event.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalizationContour {
    pub id: u64,
    pub key: ContourKey,
    pub features: Vec<GeoFeature>,
}

impl LocalizationContour {
    pub fn new(id: u64, key: ContourKey, features: Vec<GeoFeature>) -> Self {
        Self { id, key, features }
    }

    /// Position of the "Center" label.
    ///
    /// The first point feature when present, otherwise the centroid of every
    /// feature's representative point.
    pub fn center(&self) -> Option<LonLat> {
        let explicit = self
            .features
            .iter()
            .find(|f| f.geometry.is_point())
            .and_then(GeoFeature::representative_point);
        if explicit.is_some() {
            return explicit;
        }
        let reps: Vec<LonLat> = self
            .features
            .iter()
            .filter_map(GeoFeature::representative_point)
            .collect();
        spherical_centroid(&reps)
    }

    /// Non-point features, drawn as stroked polygons or lines.
    pub fn bands(&self) -> impl Iterator<Item = &GeoFeature> + '_ {
        self.features.iter().filter(|f| !f.geometry.is_point())
    }
}
