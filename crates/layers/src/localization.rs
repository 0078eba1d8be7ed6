use foundation::math::Vec2;
use render::{LayerKind, Primitive, Shape, Style};
use scene::LocalizationContour;
use tracing::warn;

use crate::layer::{Layer, RenderContext};

pub const CENTER_LABEL: &str = "Center";

/// Probability contour bands, one marker per feature, and the "Center" label.
///
/// Markers and the label on the far hemisphere are emitted hidden rather than
/// dropped, so the frame always holds one marker per feature.
#[derive(Debug, Copy, Clone)]
pub struct LocalizationLayer<'a> {
    pub contour: Option<&'a LocalizationContour>,
}

impl<'a> LocalizationLayer<'a> {
    pub fn new(contour: Option<&'a LocalizationContour>) -> Self {
        Self { contour }
    }
}

impl Layer for LocalizationLayer<'_> {
    fn kind(&self) -> LayerKind {
        LayerKind::Localization
    }

    fn render(&self, ctx: &RenderContext<'_>) -> Vec<Primitive> {
        let Some(contour) = self.contour else {
            return Vec::new();
        };
        let proj = &ctx.projection;
        let band_style = Style::stroke(ctx.style.contour, ctx.style.contour_width);
        let mut out = Vec::new();

        for (index, band) in contour.bands().enumerate() {
            if !band.geometry.is_valid() {
                warn!(contour_id = contour.id, index, "skipping contour band with invalid coordinates");
                continue;
            }
            let rings: Vec<_> = band
                .geometry
                .rings()
                .into_iter()
                .filter_map(|ring| proj.clip_ring(ring))
                .collect();
            if !rings.is_empty() {
                out.push(Primitive::new(self.kind(), Shape::Polygon { rings }, band_style));
            }
            for line in band.geometry.lines() {
                for points in proj.clip_line(line) {
                    out.push(Primitive::new(self.kind(), Shape::Polyline { points }, band_style));
                }
            }
        }

        let marker_style = Style::fill(ctx.style.localization_marker);
        for (index, feature) in contour.features.iter().enumerate() {
            let Some(position) = feature.representative_point() else {
                warn!(contour_id = contour.id, index, "skipping contour feature without a position");
                continue;
            };
            let Some(center) = proj.project(position) else {
                continue;
            };
            let shape = Shape::Disk {
                center,
                radius: ctx.marker_radius_px,
            };
            out.push(
                Primitive::new(self.kind(), shape, marker_style)
                    .with_visible(proj.is_front_facing(position)),
            );
        }

        if let Some(position) = contour.center()
            && let Some(anchor) = proj.project(position)
        {
            let shape = Shape::Text {
                anchor: anchor + Vec2::new(ctx.marker_radius_px + 2.0, 0.0),
                text: CENTER_LABEL.to_string(),
                font_size_px: ctx.style.label_font_px,
            };
            out.push(
                Primitive::new(self.kind(), shape, Style::fill(ctx.style.label))
                    .with_visible(proj.is_front_facing(position)),
            );
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::{CENTER_LABEL, LocalizationLayer};
    use crate::layer::Layer;
    use crate::layer::testing::context;
    use approx::assert_abs_diff_eq;
    use foundation::math::LonLat;
    use render::Shape;
    use scene::{ContourKey, FieldSelection, FootprintSelection, GeoFeature, Geometry, LocalizationContour};

    fn band(lon: f64) -> GeoFeature {
        GeoFeature::new(Geometry::Polygon(vec![vec![
            LonLat::new(lon - 5.0, -5.0),
            LonLat::new(lon + 5.0, -5.0),
            LonLat::new(lon + 5.0, 5.0),
            LonLat::new(lon - 5.0, 5.0),
            LonLat::new(lon - 5.0, -5.0),
        ]]))
    }

    #[test]
    fn missing_contour_draws_nothing() {
        let (fields, footprints) = (FieldSelection::new(), FootprintSelection::new());
        assert!(LocalizationLayer::new(None).render(&context(&fields, &footprints)).is_empty());
    }

    #[test]
    fn front_contour_has_band_marker_and_label() {
        let (fields, footprints) = (FieldSelection::new(), FootprintSelection::new());
        let contour = LocalizationContour::new(1, ContourKey::new("d", "n"), vec![band(10.0), GeoFeature::point(10.0, 0.0)]);
        let prims = LocalizationLayer::new(Some(&contour)).render(&context(&fields, &footprints));

        let polygons = prims.iter().filter(|p| matches!(p.shape, Shape::Polygon { .. })).count();
        let markers = prims.iter().filter(|p| matches!(p.shape, Shape::Disk { .. })).count();
        assert_eq!(polygons, 1);
        assert_eq!(markers, 2);
        let label = prims
            .iter()
            .find(|p| matches!(&p.shape, Shape::Text { text, .. } if text == CENTER_LABEL))
            .unwrap();
        assert!(label.visible);
        let Shape::Text { anchor, .. } = &label.shape else {
            unreachable!();
        };
        // Marker radius 3 plus a 2px gap to the right of the projected center.
        assert_abs_diff_eq!(anchor.x, 100.0 + 100.0 * 10f64.to_radians().sin() + 5.0, epsilon = 1e-9);
        assert_abs_diff_eq!(anchor.y, 100.0, epsilon = 1e-9);
    }

    #[test]
    fn malformed_band_draws_nothing() {
        let (fields, footprints) = (FieldSelection::new(), FootprintSelection::new());
        let mut broken = band(0.0);
        if let Geometry::Polygon(rings) = &mut broken.geometry {
            rings[0][2] = LonLat::new(f64::NAN, 0.0);
        }
        let contour = LocalizationContour::new(1, ContourKey::new("d", "n"), vec![broken]);
        let prims = LocalizationLayer::new(Some(&contour)).render(&context(&fields, &footprints));
        assert!(prims.is_empty());
    }

    #[test]
    fn far_side_markers_are_hidden_not_removed() {
        let (fields, footprints) = (FieldSelection::new(), FootprintSelection::new());
        let contour = LocalizationContour::new(1, ContourKey::new("d", "n"), vec![band(180.0), GeoFeature::point(180.0, 0.0)]);
        let prims = LocalizationLayer::new(Some(&contour)).render(&context(&fields, &footprints));

        assert!(prims.iter().all(|p| !matches!(p.shape, Shape::Polygon { .. })));
        let markers: Vec<_> = prims.iter().filter(|p| matches!(p.shape, Shape::Disk { .. })).collect();
        assert_eq!(markers.len(), 2);
        assert!(markers.iter().all(|m| !m.visible));
        assert!(prims.iter().all(|p| !p.visible));
    }
}
