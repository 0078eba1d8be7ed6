use foundation::math::LonLat;
use tracing::warn;

use crate::feature::GeoFeature;

pub type FootprintId = u64;

/// Polygon group of one executed observation.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationFootprint {
    pub id: FootprintId,
    pub rings: Vec<Vec<LonLat>>,
}

impl ObservationFootprint {
    pub fn is_valid(&self) -> bool {
        !self.rings.is_empty() && self.rings.iter().flatten().all(|p| p.is_valid())
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObservationFootprintSet {
    pub footprints: Vec<ObservationFootprint>,
}

impl ObservationFootprintSet {
    pub fn new(footprints: Vec<ObservationFootprint>) -> Self {
        Self { footprints }
    }

    /// Groups polygon features by observation id.
    ///
    /// The id is the `id` property, else the numeric feature id, else the
    /// feature's index. Features sharing an id form one group, in first-seen order.
    pub fn from_features(features: &[GeoFeature]) -> Self {
        let mut footprints: Vec<ObservationFootprint> = Vec::new();
        for (index, feature) in features.iter().enumerate() {
            let rings: Vec<Vec<LonLat>> = feature
                .geometry
                .rings()
                .into_iter()
                .filter(|r| r.iter().all(|p| p.is_valid()))
                .map(<[LonLat]>::to_vec)
                .collect();
            if rings.is_empty() {
                warn!(index, "skipping observation feature without a valid polygon");
                continue;
            }
            let id = feature
                .property_u64("id")
                .or_else(|| feature.id.as_deref().and_then(|s| s.parse().ok()))
                .unwrap_or(index as u64);
            match footprints.iter_mut().find(|f| f.id == id) {
                Some(existing) => existing.rings.extend(rings),
                None => footprints.push(ObservationFootprint { id, rings }),
            }
        }
        Self { footprints }
    }

    pub fn len(&self) -> usize {
        self.footprints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.footprints.is_empty()
    }
}
