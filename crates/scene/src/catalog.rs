use foundation::math::LonLat;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::feature::{GeoFeature, Geometry};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogKind {
    Sources,
    Galaxies,
}

impl CatalogKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CatalogKind::Sources => "sources",
            CatalogKind::Galaxies => "galaxies",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub position: LonLat,
    pub name: String,
    pub url: Option<String>,
}

/// Point catalog (sources or galaxies) with display names and link targets.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogFeatureSet {
    pub kind: CatalogKind,
    pub entries: Vec<CatalogEntry>,
}

impl CatalogFeatureSet {
    pub fn new(kind: CatalogKind, entries: Vec<CatalogEntry>) -> Self {
        Self { kind, entries }
    }

    /// Keeps point features with valid coordinates.
    ///
    /// The label comes from the `name` property, falling back to the feature id;
    /// the link target comes from `url`.
    pub fn from_features(kind: CatalogKind, features: &[GeoFeature]) -> Self {
        let mut entries = Vec::with_capacity(features.len());
        for (index, feature) in features.iter().enumerate() {
            let Geometry::Point(position) = feature.geometry else {
                warn!(catalog = kind.as_str(), index, "skipping non-point catalog feature");
                continue;
            };
            if !position.is_valid() {
                warn!(catalog = kind.as_str(), index, "skipping catalog feature with invalid coordinates");
                continue;
            }
            let name = feature
                .property_str("name")
                .map(str::to_string)
                .or_else(|| feature.id.clone())
                .unwrap_or_default();
            let url = feature.property_str("url").map(str::to_string);
            entries.push(CatalogEntry {
                position,
                name,
                url,
            });
        }
        Self { kind, entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
