//! Orthographic (hemispherical) projection of the celestial sphere.
//!
//! Screen coordinates follow the canvas convention: `x` grows to the right,
//! `y` grows downward, and `translate` is the pixel position of the view center.

use std::f64::consts::FRAC_PI_2;

use super::{LonLat, Rotation, RotationMatrix, Vec2, Vec3, angular_distance, slerp};

const CROSSING_ITERATIONS: usize = 40;
const LIMB_ARC_STEP_RAD: f64 = 5.0 * std::f64::consts::PI / 180.0;
const VIEW_AXIS: Vec3 = Vec3 {
    x: 1.0,
    y: 0.0,
    z: 0.0,
};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Orthographic {
    rotation: Rotation,
    matrix: RotationMatrix,
    scale: f64,
    translate: Vec2,
    limb_slack_rad: f64,
}

impl Orthographic {
    pub fn new(rotation: Rotation, scale: f64, translate: Vec2) -> Self {
        Self {
            rotation,
            matrix: rotation.matrix(),
            scale,
            translate,
            limb_slack_rad: 0.0,
        }
    }

    /// Widens (positive) or narrows (negative) the front-facing threshold around π/2.
    pub fn with_limb_slack(mut self, slack_rad: f64) -> Self {
        self.limb_slack_rad = slack_rad;
        self
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn translate(&self) -> Vec2 {
        self.translate
    }

    pub fn threshold_rad(&self) -> f64 {
        FRAC_PI_2 + self.limb_slack_rad
    }

    /// Screen position of `p` regardless of hemisphere. `None` for malformed coordinates.
    pub fn project(&self, p: LonLat) -> Option<Vec2> {
        if !p.is_valid() {
            return None;
        }
        Some(self.to_screen(self.matrix.apply(p.to_unit_vector())))
    }

    /// Screen position of `p` only when it is front-facing.
    pub fn project_visible(&self, p: LonLat) -> Option<Vec2> {
        if !self.is_front_facing(p) {
            return None;
        }
        self.project(p)
    }

    /// Coordinate under a screen position, or `None` outside the projected disk.
    pub fn invert(&self, screen: Vec2) -> Option<LonLat> {
        if !screen.is_finite() || self.scale <= 0.0 {
            return None;
        }
        let u = (screen.x - self.translate.x) / self.scale;
        let w = (self.translate.y - screen.y) / self.scale;
        let r2 = u * u + w * w;
        if r2 > 1.0 {
            return None;
        }
        let rotated = Vec3::new((1.0 - r2).sqrt(), u, w);
        Some(LonLat::from_unit_vector(
            self.matrix.transpose().apply(rotated),
        ))
    }

    /// Coordinate at the center of the view.
    pub fn center(&self) -> LonLat {
        LonLat::from_unit_vector(self.matrix.transpose().apply(VIEW_AXIS))
    }

    /// Great-circle distance from the view center is below [`Self::threshold_rad`].
    pub fn is_front_facing(&self, p: LonLat) -> bool {
        p.is_valid() && self.is_visible_rotated(self.matrix.apply(p.to_unit_vector()))
    }

    /// Splits a polyline into front-facing runs, cutting each run at the limb.
    ///
    /// Malformed vertices break the line. Runs with fewer than two points are dropped.
    pub fn clip_line(&self, points: &[LonLat]) -> Vec<Vec<Vec2>> {
        let mut runs = Vec::new();
        let mut run: Vec<Vec2> = Vec::new();
        let mut prev: Option<Vec3> = None;

        for p in points {
            if !p.is_valid() {
                flush_run(&mut runs, &mut run);
                prev = None;
                continue;
            }
            let v = self.matrix.apply(p.to_unit_vector());
            let visible = self.is_visible_rotated(v);
            match (prev, visible) {
                (Some(a), true) if !self.is_visible_rotated(a) => {
                    run.push(self.to_screen(self.crossing(v, a)));
                    run.push(self.to_screen(v));
                }
                (Some(a), false) if self.is_visible_rotated(a) => {
                    run.push(self.to_screen(self.crossing(a, v)));
                    flush_run(&mut runs, &mut run);
                }
                (_, true) => run.push(self.to_screen(v)),
                (_, false) => {}
            }
            prev = Some(v);
        }
        flush_run(&mut runs, &mut run);
        runs
    }

    /// Clips a closed ring to the visible hemisphere.
    ///
    /// Edges that leave the hemisphere are cut at the limb crossing and the
    /// outline follows the limb until the ring re-enters. Returns `None` when no
    /// vertex is visible or fewer than three valid vertices remain.
    pub fn clip_ring(&self, ring: &[LonLat]) -> Option<Vec<Vec2>> {
        let mut vertices: Vec<Vec3> = ring
            .iter()
            .filter(|p| p.is_valid())
            .map(|p| self.matrix.apply(p.to_unit_vector()))
            .collect();
        if vertices.len() > 1 && vertices.first() == vertices.last() {
            vertices.pop();
        }
        let n = vertices.len();
        if n < 3 {
            return None;
        }
        let start = vertices.iter().position(|v| self.is_visible_rotated(*v))?;

        let mut out = vec![self.to_screen(vertices[start])];
        let mut exit: Option<Vec3> = None;
        for i in 0..n {
            let a = vertices[(start + i) % n];
            let b = vertices[(start + i + 1) % n];
            let closing = i + 1 == n;
            match (self.is_visible_rotated(a), self.is_visible_rotated(b)) {
                (true, true) => {
                    if !closing {
                        out.push(self.to_screen(b));
                    }
                }
                (true, false) => {
                    let c = self.crossing(a, b);
                    out.push(self.to_screen(c));
                    exit = Some(c);
                }
                (false, true) => {
                    let c = self.crossing(b, a);
                    if let Some(e) = exit.take() {
                        self.push_limb_arc(&mut out, e, c);
                    }
                    out.push(self.to_screen(c));
                    if !closing {
                        out.push(self.to_screen(b));
                    }
                }
                (false, false) => {}
            }
        }
        Some(out)
    }

    fn is_visible_rotated(&self, v: Vec3) -> bool {
        angular_distance(v, VIEW_AXIS) < self.threshold_rad()
    }

    fn to_screen(&self, v: Vec3) -> Vec2 {
        Vec2::new(
            self.translate.x + self.scale * v.y,
            self.translate.y - self.scale * v.z,
        )
    }

    /// Last visible point on the great-circle arc from `visible` to `hidden`.
    fn crossing(&self, visible: Vec3, hidden: Vec3) -> Vec3 {
        let (mut lo, mut hi) = (0.0, 1.0);
        for _ in 0..CROSSING_ITERATIONS {
            let mid = 0.5 * (lo + hi);
            if self.is_visible_rotated(slerp(visible, hidden, mid)) {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        slerp(visible, hidden, lo)
    }

    /// Appends the limb outline between two crossings, excluding both endpoints.
    fn push_limb_arc(&self, out: &mut Vec<Vec2>, from: Vec3, to: Vec3) {
        let a = self.to_screen(from) - self.translate;
        let b = self.to_screen(to) - self.translate;
        let (angle_a, angle_b) = (a.y.atan2(a.x), b.y.atan2(b.x));
        let mut sweep = angle_b - angle_a;
        if sweep > std::f64::consts::PI {
            sweep -= std::f64::consts::TAU;
        } else if sweep < -std::f64::consts::PI {
            sweep += std::f64::consts::TAU;
        }
        let steps = (sweep.abs() / LIMB_ARC_STEP_RAD).ceil() as usize;
        let (ra, rb) = (a.length(), b.length());
        for k in 1..steps {
            let t = k as f64 / steps as f64;
            let angle = angle_a + sweep * t;
            let radius = ra + (rb - ra) * t;
            out.push(self.translate + Vec2::new(radius * angle.cos(), radius * angle.sin()));
        }
    }
}

fn flush_run(runs: &mut Vec<Vec<Vec2>>, run: &mut Vec<Vec2>) {
    let taken = std::mem::take(run);
    if taken.len() >= 2 {
        runs.push(taken);
    }
}

#[cfg(test)]
mod tests {
    use super::Orthographic;
    use crate::math::{LonLat, Rotation, Vec2, great_circle_distance};
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;
    use std::f64::consts::FRAC_PI_2;

    fn projection(rotation: Rotation) -> Orthographic {
        Orthographic::new(rotation, 100.0, Vec2::new(200.0, 150.0))
    }

    #[test]
    fn center_projects_to_translate() {
        let rotation = Rotation::new(-120.0, -30.0, 10.0);
        let proj = projection(rotation);
        let center = proj.center();
        assert_abs_diff_eq!(center.lon_deg, 120.0, epsilon = 1e-9);
        assert_abs_diff_eq!(center.lat_deg, 30.0, epsilon = 1e-9);
        let screen = proj.project(center).unwrap();
        assert_abs_diff_eq!(screen.x, 200.0, epsilon = 1e-9);
        assert_abs_diff_eq!(screen.y, 150.0, epsilon = 1e-9);
    }

    #[test]
    fn north_is_up_and_east_is_right_at_identity() {
        let proj = projection(Rotation::identity());
        let north = proj.project(LonLat::new(0.0, 90.0)).unwrap();
        assert_abs_diff_eq!(north.x, 200.0, epsilon = 1e-9);
        assert_abs_diff_eq!(north.y, 50.0, epsilon = 1e-9);
        let east = proj.project(LonLat::new(90.0, 0.0)).unwrap();
        assert_abs_diff_eq!(east.x, 300.0, epsilon = 1e-9);
    }

    #[test]
    fn malformed_coordinates_are_skipped() {
        let proj = projection(Rotation::identity());
        assert_eq!(proj.project(LonLat::new(f64::NAN, 0.0)), None);
        assert_eq!(proj.project(LonLat::new(0.0, 100.0)), None);
        assert!(!proj.is_front_facing(LonLat::new(f64::INFINITY, 0.0)));
    }

    #[test]
    fn invert_outside_disk_is_none() {
        let proj = projection(Rotation::identity());
        assert_eq!(proj.invert(Vec2::new(400.0, 150.0)), None);
    }

    #[test]
    fn front_facing_uses_half_pi_by_default() {
        let proj = projection(Rotation::identity());
        assert!(proj.is_front_facing(LonLat::new(89.0, 0.0)));
        assert!(!proj.is_front_facing(LonLat::new(91.0, 0.0)));
        assert!(!proj.is_front_facing(LonLat::new(180.0, 0.0)));
        let wide = proj.with_limb_slack(0.05);
        assert!(wide.is_front_facing(LonLat::new(91.0, 0.0)));
        assert_abs_diff_eq!(wide.threshold_rad(), FRAC_PI_2 + 0.05, epsilon = 1e-15);
    }

    #[test]
    fn clip_line_splits_at_limb() {
        let proj = projection(Rotation::identity());
        let line: Vec<LonLat> = (-6..=6).map(|i| LonLat::new(i as f64 * 30.0, 0.0)).collect();
        let runs = proj.clip_line(&line);
        assert_eq!(runs.len(), 1);
        let run = &runs[0];
        let first = run.first().unwrap();
        let last = run.last().unwrap();
        assert_abs_diff_eq!(first.x, 100.0, epsilon = 1e-6);
        assert_abs_diff_eq!(last.x, 300.0, epsilon = 1e-6);
    }

    #[test]
    fn clip_line_breaks_on_malformed_vertex() {
        let proj = projection(Rotation::identity());
        let line = [
            LonLat::new(-10.0, 0.0),
            LonLat::new(0.0, 0.0),
            LonLat::new(f64::NAN, 0.0),
            LonLat::new(10.0, 0.0),
            LonLat::new(20.0, 0.0),
        ];
        assert_eq!(proj.clip_line(&line).len(), 2);
    }

    #[test]
    fn clip_ring_fully_visible_keeps_vertices() {
        let proj = projection(Rotation::identity());
        let ring = [
            LonLat::new(-10.0, -10.0),
            LonLat::new(10.0, -10.0),
            LonLat::new(10.0, 10.0),
            LonLat::new(-10.0, 10.0),
            LonLat::new(-10.0, -10.0),
        ];
        let clipped = proj.clip_ring(&ring).unwrap();
        assert_eq!(clipped.len(), 4);
    }

    #[test]
    fn clip_ring_hidden_is_none() {
        let proj = projection(Rotation::identity());
        let ring = [
            LonLat::new(170.0, -10.0),
            LonLat::new(190.0, -10.0),
            LonLat::new(190.0, 10.0),
            LonLat::new(170.0, 10.0),
        ];
        assert_eq!(proj.clip_ring(&ring), None);
    }

    #[test]
    fn clip_ring_across_limb_stays_inside_disk() {
        let proj = projection(Rotation::identity());
        let ring = [
            LonLat::new(60.0, -20.0),
            LonLat::new(120.0, -20.0),
            LonLat::new(120.0, 20.0),
            LonLat::new(60.0, 20.0),
        ];
        let clipped = proj.clip_ring(&ring).unwrap();
        assert!(clipped.len() > 4);
        for p in clipped {
            assert!(p.distance(proj.translate()) <= 100.0 + 1e-6);
        }
    }

    proptest! {
        #[test]
        fn project_then_invert_recovers_front_facing_points(
            lambda in -180.0f64..180.0,
            phi in -90.0f64..90.0,
            gamma in -180.0f64..180.0,
            lon in -180.0f64..180.0,
            lat in -89.0f64..89.0,
        ) {
            let proj = projection(Rotation::new(lambda, phi, gamma));
            let p = LonLat::new(lon, lat);
            // Inversion is ill-conditioned right at the limb.
            prop_assume!(great_circle_distance(p, proj.center()) < FRAC_PI_2 - 0.05);
            let screen = proj.project(p).unwrap();
            let back = proj.invert(screen).unwrap();
            prop_assert!(great_circle_distance(p, back) < 1e-7);
        }

        #[test]
        fn back_hemisphere_points_are_never_visible(
            lambda in -180.0f64..180.0,
            phi in -90.0f64..90.0,
            lon in -180.0f64..180.0,
            lat in -90.0f64..90.0,
        ) {
            let proj = projection(Rotation::new(lambda, phi, 0.0));
            let p = LonLat::new(lon, lat);
            prop_assume!(great_circle_distance(p, proj.center()) > proj.threshold_rad());
            prop_assert!(!proj.is_front_facing(p));
            prop_assert_eq!(proj.project_visible(p), None);
        }
    }
}
