use serde::{Deserialize, Serialize};

use super::Vec3;

/// Celestial coordinate in degrees: longitude (right ascension) and latitude (declination).
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LonLat {
    pub lon_deg: f64,
    pub lat_deg: f64,
}

impl LonLat {
    pub fn new(lon_deg: f64, lat_deg: f64) -> Self {
        Self { lon_deg, lat_deg }
    }

    /// Finite longitude and a latitude within `[-90, 90]`.
    pub fn is_valid(self) -> bool {
        self.lon_deg.is_finite() && self.lat_deg.is_finite() && self.lat_deg.abs() <= 90.0
    }

    pub fn to_unit_vector(self) -> Vec3 {
        let lon = self.lon_deg.to_radians();
        let lat = self.lat_deg.to_radians();
        let cos_lat = lat.cos();
        Vec3::new(cos_lat * lon.cos(), cos_lat * lon.sin(), lat.sin())
    }

    /// Inverse of [`LonLat::to_unit_vector`]; the input does not need to be normalized.
    pub fn from_unit_vector(v: Vec3) -> Self {
        let lon = v.y.atan2(v.x);
        let lat = v.z.atan2(v.x.hypot(v.y));
        Self::new(lon.to_degrees(), lat.to_degrees())
    }
}

/// Angle between two direction vectors in radians, stable for near-parallel inputs.
pub fn angular_distance(a: Vec3, b: Vec3) -> f64 {
    a.cross(b).length().atan2(a.dot(b))
}

/// Great-circle distance between two coordinates in radians, in `[0, π]`.
pub fn great_circle_distance(a: LonLat, b: LonLat) -> f64 {
    angular_distance(a.to_unit_vector(), b.to_unit_vector())
}

/// Spherical linear interpolation between two unit vectors.
///
/// Falls back to a normalized linear blend when the inputs are (anti)parallel.
pub fn slerp(a: Vec3, b: Vec3, t: f64) -> Vec3 {
    let omega = angular_distance(a, b);
    let sin_omega = omega.sin();
    if sin_omega.abs() < 1e-12 {
        let blend = a.scale(1.0 - t) + b.scale(t);
        return blend.normalized().unwrap_or(a);
    }
    let wa = ((1.0 - t) * omega).sin() / sin_omega;
    let wb = (t * omega).sin() / sin_omega;
    a.scale(wa) + b.scale(wb)
}

/// Mean direction of the given coordinates.
///
/// Returns `None` for an empty input or when the directions cancel out.
pub fn spherical_centroid(points: &[LonLat]) -> Option<LonLat> {
    let sum = points
        .iter()
        .filter(|p| p.is_valid())
        .fold(Vec3::default(), |acc, p| acc + p.to_unit_vector());
    sum.normalized().map(LonLat::from_unit_vector)
}

#[cfg(test)]
mod tests {
    use super::{LonLat, great_circle_distance, slerp, spherical_centroid};
    use approx::assert_abs_diff_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn unit_vector_axes() {
        let v = LonLat::new(90.0, 0.0).to_unit_vector();
        assert_abs_diff_eq!(v.x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(v.y, 1.0, epsilon = 1e-12);
        let pole = LonLat::new(33.0, 90.0).to_unit_vector();
        assert_abs_diff_eq!(pole.z, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn unit_vector_round_trip() {
        let p = LonLat::new(-123.5, 41.25);
        let back = LonLat::from_unit_vector(p.to_unit_vector());
        assert_abs_diff_eq!(back.lon_deg, p.lon_deg, epsilon = 1e-9);
        assert_abs_diff_eq!(back.lat_deg, p.lat_deg, epsilon = 1e-9);
    }

    #[test]
    fn distance_quarter_and_half_turn() {
        let a = LonLat::new(0.0, 0.0);
        assert_abs_diff_eq!(great_circle_distance(a, LonLat::new(90.0, 0.0)), FRAC_PI_2, epsilon = 1e-12);
        assert_abs_diff_eq!(great_circle_distance(a, LonLat::new(0.0, 90.0)), FRAC_PI_2, epsilon = 1e-12);
        assert_abs_diff_eq!(great_circle_distance(a, LonLat::new(180.0, 0.0)), PI, epsilon = 1e-12);
        assert_abs_diff_eq!(great_circle_distance(a, a), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn invalid_latitude_is_rejected() {
        assert!(!LonLat::new(0.0, 91.0).is_valid());
        assert!(!LonLat::new(f64::NAN, 0.0).is_valid());
        assert!(LonLat::new(359.0, -90.0).is_valid());
    }

    #[test]
    fn slerp_midpoint_lies_on_great_circle() {
        let a = LonLat::new(0.0, 0.0).to_unit_vector();
        let b = LonLat::new(90.0, 0.0).to_unit_vector();
        let mid = LonLat::from_unit_vector(slerp(a, b, 0.5));
        assert_abs_diff_eq!(mid.lon_deg, 45.0, epsilon = 1e-9);
        assert_abs_diff_eq!(mid.lat_deg, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn centroid_of_symmetric_points() {
        let c = spherical_centroid(&[LonLat::new(-10.0, 0.0), LonLat::new(10.0, 0.0)]).unwrap();
        assert_abs_diff_eq!(c.lon_deg, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(c.lat_deg, 0.0, epsilon = 1e-9);
        assert_eq!(spherical_centroid(&[]), None);
    }
}
