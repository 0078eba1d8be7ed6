use foundation::math::LonLat;
use render::{LayerKind, Primitive, Shape, Style};

use crate::layer::{Layer, RenderContext};

/// Meridians and parallels, clipped to the visible hemisphere.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GraticuleLayer {
    pub step_deg: f64,
    pub sample_deg: f64,
}

impl GraticuleLayer {
    pub fn new(step_deg: f64, sample_deg: f64) -> Self {
        Self {
            step_deg,
            sample_deg,
        }
    }

    /// Meridians run pole to pole; parallels stop one step short of each pole.
    pub fn lines(&self) -> Vec<Vec<LonLat>> {
        if !(self.step_deg > 0.0 && self.sample_deg > 0.0) {
            return Vec::new();
        }
        let meridians = (360.0 / self.step_deg).floor() as i64;
        let parallels = (90.0 / self.step_deg).ceil() as i64 - 1;
        let lat_samples = (180.0 / self.sample_deg).ceil() as i64;
        let lon_samples = (360.0 / self.sample_deg).ceil() as i64;

        let mut lines = Vec::new();
        for m in 0..meridians {
            let lon = -180.0 + m as f64 * self.step_deg;
            lines.push(
                (0..=lat_samples)
                    .map(|i| LonLat::new(lon, (-90.0 + i as f64 * self.sample_deg).min(90.0)))
                    .collect(),
            );
        }
        for p in -parallels..=parallels {
            let lat = p as f64 * self.step_deg;
            lines.push(
                (0..=lon_samples)
                    .map(|i| LonLat::new((-180.0 + i as f64 * self.sample_deg).min(180.0), lat))
                    .collect(),
            );
        }
        lines
    }
}

impl Default for GraticuleLayer {
    fn default() -> Self {
        Self::new(10.0, 2.5)
    }
}

impl Layer for GraticuleLayer {
    fn kind(&self) -> LayerKind {
        LayerKind::Graticule
    }

    fn render(&self, ctx: &RenderContext<'_>) -> Vec<Primitive> {
        let style = Style::stroke(ctx.style.graticule, ctx.style.graticule_width);
        self.lines()
            .iter()
            .flat_map(|line| ctx.projection.clip_line(line))
            .map(|points| Primitive::new(self.kind(), Shape::Polyline { points }, style))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::GraticuleLayer;
    use crate::layer::Layer;
    use crate::layer::testing::context;
    use render::Shape;
    use scene::{FieldSelection, FootprintSelection};

    #[test]
    fn line_counts_for_ten_degree_grid() {
        let lines = GraticuleLayer::new(10.0, 2.5).lines();
        // 36 meridians and 17 parallels (-80..=80).
        assert_eq!(lines.len(), 36 + 17);
        assert_eq!(lines[0].len(), 73);
        assert_eq!(lines[0].last().unwrap().lat_deg, 90.0);
    }

    #[test]
    fn rendered_lines_stay_inside_the_disk() {
        let (fields, footprints) = (FieldSelection::new(), FootprintSelection::new());
        let ctx = context(&fields, &footprints);
        let prims = GraticuleLayer::default().render(&ctx);
        assert!(!prims.is_empty());
        for prim in &prims {
            let Shape::Polyline { points } = &prim.shape else {
                panic!("graticule emits polylines only");
            };
            for p in points {
                assert!(p.distance(ctx.projection.translate()) <= 100.0 + 1e-6);
            }
        }
    }

    #[test]
    fn non_positive_step_draws_nothing() {
        assert!(GraticuleLayer::new(0.0, 2.5).lines().is_empty());
    }
}
