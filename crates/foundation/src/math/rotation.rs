use serde::{Deserialize, Serialize};

use super::{LonLat, Vec3, canonical_f64, wrap_degrees};

/// View rotation `(λ, φ, γ)` in degrees.
///
/// Ordering contract: a coordinate is first rotated about the polar axis by λ,
/// then tilted by φ, then rolled about the view axis by γ. `[λ, φ, 0]` brings
/// the coordinate `(-λ, -φ)` to the center of the view.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Rotation {
    pub lambda_deg: f64,
    pub phi_deg: f64,
    pub gamma_deg: f64,
}

impl Rotation {
    pub fn new(lambda_deg: f64, phi_deg: f64, gamma_deg: f64) -> Self {
        Self {
            lambda_deg,
            phi_deg,
            gamma_deg,
        }
    }

    pub fn identity() -> Self {
        Self::default()
    }

    /// Rotation that places `center` in the middle of the view.
    pub fn centering(center: LonLat) -> Self {
        Self::new(-center.lon_deg, -center.lat_deg, 0.0).normalized()
    }

    /// λ wrapped to `(-180, 180]`, φ clamped to `[-90, 90]`, γ wrapped; `-0.0` canonicalized.
    pub fn normalized(self) -> Self {
        Self::new(
            wrap_degrees(self.lambda_deg),
            canonical_f64(self.phi_deg.clamp(-90.0, 90.0)),
            wrap_degrees(self.gamma_deg),
        )
    }

    pub fn is_finite(self) -> bool {
        self.lambda_deg.is_finite() && self.phi_deg.is_finite() && self.gamma_deg.is_finite()
    }

    pub fn matrix(self) -> RotationMatrix {
        RotationMatrix::about_z(self.lambda_deg.to_radians())
            .then(RotationMatrix::about_y(self.phi_deg.to_radians()))
            .then(RotationMatrix::about_x(self.gamma_deg.to_radians()))
    }

    pub fn apply(self, p: LonLat) -> LonLat {
        LonLat::from_unit_vector(self.matrix().apply(p.to_unit_vector()))
    }

    pub fn invert(self, p: LonLat) -> LonLat {
        LonLat::from_unit_vector(self.matrix().transpose().apply(p.to_unit_vector()))
    }

    /// `self` followed by `next`.
    pub fn compose(self, next: Rotation) -> RotationMatrix {
        self.matrix().then(next.matrix())
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.lambda_deg, self.phi_deg, self.gamma_deg]
    }
}

impl From<[f64; 3]> for Rotation {
    fn from(v: [f64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

impl From<Rotation> for [f64; 3] {
    fn from(r: Rotation) -> Self {
        r.to_array()
    }
}

/// Row-major 3x3 rotation matrix.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RotationMatrix {
    rows: [[f64; 3]; 3],
}

impl RotationMatrix {
    pub fn identity() -> Self {
        Self {
            rows: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
        }
    }

    /// Increases longitude by `angle`.
    pub fn about_z(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self {
            rows: [[c, -s, 0.0], [s, c, 0.0], [0.0, 0.0, 1.0]],
        }
    }

    /// Tilt toward the pole; positive angles move the north pole away from the viewer.
    pub fn about_y(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self {
            rows: [[c, 0.0, -s], [0.0, 1.0, 0.0], [s, 0.0, c]],
        }
    }

    pub fn about_x(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self {
            rows: [[1.0, 0.0, 0.0], [0.0, c, -s], [0.0, s, c]],
        }
    }

    /// Applies `self` first, then `next`.
    pub fn then(self, next: Self) -> Self {
        let a = next.rows;
        let b = self.rows;
        let mut rows = [[0.0; 3]; 3];
        for (i, row) in rows.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = a[i][0] * b[0][j] + a[i][1] * b[1][j] + a[i][2] * b[2][j];
            }
        }
        Self { rows }
    }

    pub fn transpose(self) -> Self {
        let r = self.rows;
        Self {
            rows: [
                [r[0][0], r[1][0], r[2][0]],
                [r[0][1], r[1][1], r[2][1]],
                [r[0][2], r[1][2], r[2][2]],
            ],
        }
    }

    pub fn apply(self, v: Vec3) -> Vec3 {
        let r = self.rows;
        Vec3::new(
            r[0][0] * v.x + r[0][1] * v.y + r[0][2] * v.z,
            r[1][0] * v.x + r[1][1] * v.y + r[1][2] * v.z,
            r[2][0] * v.x + r[2][1] * v.y + r[2][2] * v.z,
        )
    }
}

impl Default for RotationMatrix {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::{LonLat, Rotation, RotationMatrix};
    use approx::assert_abs_diff_eq;

    fn assert_lonlat_close(a: LonLat, b: LonLat) {
        let d = crate::math::great_circle_distance(a, b);
        assert!(d < 1e-9, "expected {a:?} ~= {b:?} (distance {d})");
    }

    #[test]
    fn identity_keeps_coordinates() {
        let p = LonLat::new(12.0, -34.0);
        assert_lonlat_close(Rotation::identity().apply(p), p);
    }

    #[test]
    fn lambda_shifts_longitude() {
        let p = LonLat::new(10.0, 20.0);
        let r = Rotation::new(30.0, 0.0, 0.0).apply(p);
        assert_abs_diff_eq!(r.lon_deg, 40.0, epsilon = 1e-9);
        assert_abs_diff_eq!(r.lat_deg, 20.0, epsilon = 1e-9);
    }

    #[test]
    fn centering_moves_point_to_origin() {
        let target = LonLat::new(-150.0, 47.5);
        let rotation = Rotation::centering(target);
        assert_lonlat_close(rotation.apply(target), LonLat::new(0.0, 0.0));
        assert_lonlat_close(rotation.invert(LonLat::new(0.0, 0.0)), target);
    }

    #[test]
    fn invert_undoes_apply_with_roll() {
        let rotation = Rotation::new(-73.0, 28.0, 15.0);
        let p = LonLat::new(101.0, -12.5);
        assert_lonlat_close(rotation.invert(rotation.apply(p)), p);
    }

    #[test]
    fn compose_matches_sequential_application() {
        let a = Rotation::new(40.0, 10.0, 0.0);
        let b = Rotation::new(-15.0, 5.0, 20.0);
        let p = LonLat::new(3.0, 4.0);
        let composed = LonLat::from_unit_vector(a.compose(b).apply(p.to_unit_vector()));
        assert_lonlat_close(composed, b.apply(a.apply(p)));
    }

    #[test]
    fn matrix_times_transpose_is_identity() {
        let m = Rotation::new(33.0, -61.0, 7.0).matrix();
        let id = m.then(m.transpose());
        let v = crate::math::Vec3::new(0.3, -0.4, 0.5);
        let back = id.apply(v);
        assert_abs_diff_eq!(back.x, v.x, epsilon = 1e-12);
        assert_abs_diff_eq!(back.y, v.y, epsilon = 1e-12);
        assert_abs_diff_eq!(back.z, v.z, epsilon = 1e-12);
        assert_eq!(RotationMatrix::default(), RotationMatrix::identity());
    }

    #[test]
    fn normalized_wraps_and_clamps() {
        let r = Rotation::new(270.0, 120.0, -190.0).normalized();
        assert_eq!(r, Rotation::new(-90.0, 90.0, 170.0));
    }

    #[test]
    fn serializes_as_triple() {
        let r = Rotation::new(1.5, -2.0, 0.0);
        let json = serde_json::to_string(&r).unwrap();
        assert_eq!(json, "[1.5,-2.0,0.0]");
        let back: Rotation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
    }
}
