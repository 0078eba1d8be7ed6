use render::{HitTarget, LayerKind, Primitive, Shape, Style};
use scene::ObservationFootprintSet;
use tracing::warn;

use crate::layer::{Layer, RenderContext};

/// Executed observations; selected footprints fill with the selected colour.
#[derive(Debug, Copy, Clone)]
pub struct FootprintLayer<'a> {
    pub footprints: &'a ObservationFootprintSet,
}

impl<'a> FootprintLayer<'a> {
    pub fn new(footprints: &'a ObservationFootprintSet) -> Self {
        Self { footprints }
    }
}

impl Layer for FootprintLayer<'_> {
    fn kind(&self) -> LayerKind {
        LayerKind::Observations
    }

    fn render(&self, ctx: &RenderContext<'_>) -> Vec<Primitive> {
        let proj = &ctx.projection;
        let mut out = Vec::new();
        for footprint in &self.footprints.footprints {
            if !footprint.is_valid() {
                warn!(footprint_id = footprint.id, "skipping footprint with invalid coordinates");
                continue;
            }
            let rings: Vec<_> = footprint
                .rings
                .iter()
                .filter_map(|ring| proj.clip_ring(ring))
                .collect();
            if rings.is_empty() {
                continue;
            }
            let fill = if ctx.footprint_selection.contains(footprint.id) {
                ctx.style.footprint_selected
            } else {
                ctx.style.footprint_unselected
            };
            let style = Style::fill(fill)
                .with_fill_opacity(ctx.style.footprint_opacity)
                .with_stroke(ctx.style.footprint_accent, 1.0);
            out.push(
                Primitive::new(self.kind(), Shape::Polygon { rings }, style)
                    .with_title(format!("Observation {}", footprint.id))
                    .with_hit(HitTarget::Footprint(footprint.id)),
            );
        }
        out
    }
}
