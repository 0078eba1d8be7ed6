use foundation::math::{LonLat, spherical_centroid};
use serde_json::Value;

/// Arbitrary property bag attached to a feature.
pub type Properties = serde_json::Map<String, Value>;

/// Geometry in longitude/latitude degrees.
///
/// Polygons are lists of rings; the first ring is the exterior.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(LonLat),
    MultiPoint(Vec<LonLat>),
    LineString(Vec<LonLat>),
    MultiLineString(Vec<Vec<LonLat>>),
    Polygon(Vec<Vec<LonLat>>),
    MultiPolygon(Vec<Vec<Vec<LonLat>>>),
}

impl Geometry {
    pub fn is_point(&self) -> bool {
        matches!(self, Geometry::Point(_) | Geometry::MultiPoint(_))
    }

    pub fn points(&self) -> Vec<LonLat> {
        match self {
            Geometry::Point(p) => vec![*p],
            Geometry::MultiPoint(ps) => ps.clone(),
            _ => Vec::new(),
        }
    }

    pub fn lines(&self) -> Vec<&[LonLat]> {
        match self {
            Geometry::LineString(l) => vec![l.as_slice()],
            Geometry::MultiLineString(ls) => ls.iter().map(Vec::as_slice).collect(),
            _ => Vec::new(),
        }
    }

    /// Every ring of every polygon, exteriors and holes alike.
    pub fn rings(&self) -> Vec<&[LonLat]> {
        match self {
            Geometry::Polygon(rings) => rings.iter().map(Vec::as_slice).collect(),
            Geometry::MultiPolygon(polys) => polys
                .iter()
                .flat_map(|rings| rings.iter().map(Vec::as_slice))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// All coordinates, in storage order.
    pub fn vertices(&self) -> Vec<LonLat> {
        match self {
            Geometry::Point(p) => vec![*p],
            Geometry::MultiPoint(ps) | Geometry::LineString(ps) => ps.clone(),
            Geometry::MultiLineString(ls) | Geometry::Polygon(ls) => ls.concat(),
            Geometry::MultiPolygon(polys) => polys.iter().flat_map(|p| p.concat()).collect(),
        }
    }

    /// The point itself for points, otherwise the spherical centroid of the
    /// exterior ring (polygons) or of all vertices. `None` when any vertex is
    /// invalid.
    pub fn representative_point(&self) -> Option<LonLat> {
        if !self.is_valid() {
            return None;
        }
        match self {
            Geometry::Point(p) => Some(*p),
            Geometry::Polygon(rings) => rings.first().and_then(|r| spherical_centroid(open_ring(r))),
            Geometry::MultiPolygon(polys) => {
                let exteriors: Vec<LonLat> = polys
                    .iter()
                    .filter_map(|p| p.first())
                    .flat_map(|r| open_ring(r).iter().copied())
                    .collect();
                spherical_centroid(&exteriors)
            }
            other => spherical_centroid(&other.vertices()),
        }
    }

    pub fn is_valid(&self) -> bool {
        let vertices = self.vertices();
        !vertices.is_empty() && vertices.iter().all(|p| p.is_valid())
    }
}

/// Drops the closing vertex of a closed ring.
fn open_ring(ring: &[LonLat]) -> &[LonLat] {
    match ring {
        [first, rest @ .., last] if !rest.is_empty() && first == last => &ring[..ring.len() - 1],
        _ => ring,
    }
}

/// A geometry plus its property bag, as produced by the data-fetch layer.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoFeature {
    pub id: Option<String>,
    pub geometry: Geometry,
    pub properties: Properties,
}

impl GeoFeature {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            id: None,
            geometry,
            properties: Properties::new(),
        }
    }

    pub fn point(lon_deg: f64, lat_deg: f64) -> Self {
        Self::new(Geometry::Point(LonLat::new(lon_deg, lat_deg)))
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    pub fn property_str(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(Value::as_str)
    }

    /// Numbers, or strings that parse as numbers.
    pub fn property_f64(&self, key: &str) -> Option<f64> {
        let value = match self.properties.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        value.filter(|v| v.is_finite())
    }

    pub fn property_u64(&self, key: &str) -> Option<u64> {
        match self.properties.get(key)? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn representative_point(&self) -> Option<LonLat> {
        self.geometry.representative_point()
    }
}
