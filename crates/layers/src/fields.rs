use foundation::color::Color;
use render::{HitTarget, LayerKind, Primitive, Shape, Style};
use scene::{Instrument, InstrumentField};
use tracing::warn;

use crate::layer::{Layer, RenderContext};

/// Instrument field grid.
///
/// Fill: the instrument's filter colour when selected, otherwise the
/// observable or unobservable colour by airmass. Fields whose center faces
/// away from the viewer are culled.
#[derive(Debug, Copy, Clone)]
pub struct FieldLayer<'a> {
    pub instrument: &'a Instrument,
}

impl<'a> FieldLayer<'a> {
    pub fn new(instrument: &'a Instrument) -> Self {
        Self { instrument }
    }

    pub fn fill_for(&self, field: &InstrumentField, ctx: &RenderContext<'_>) -> Color {
        if ctx.field_selection.contains(field.id) {
            self.instrument.color()
        } else if field.is_observable(ctx.airmass_threshold) {
            ctx.style.field_observable
        } else {
            ctx.style.field_unobservable
        }
    }

    pub fn title_for(&self, field: &InstrumentField) -> String {
        format!(
            "Field ID: {}\nRA: {:.4}, Dec: {:.4}\nFilters: {}",
            field.id,
            field.center.lon_deg,
            field.center.lat_deg,
            self.instrument.filters().join(", ")
        )
    }
}

impl Layer for FieldLayer<'_> {
    fn kind(&self) -> LayerKind {
        LayerKind::Instrument
    }

    fn render(&self, ctx: &RenderContext<'_>) -> Vec<Primitive> {
        let proj = &ctx.projection;
        let mut out = Vec::new();
        for field in self.instrument.fields() {
            if !field.is_valid() {
                warn!(field_id = field.id, "skipping field with invalid coordinates");
                continue;
            }
            if !proj.is_front_facing(field.center) {
                continue;
            }
            let rings: Vec<_> = field
                .contour
                .iter()
                .filter_map(|ring| proj.clip_ring(ring))
                .collect();
            if rings.is_empty() {
                continue;
            }
            let style = Style::fill(self.fill_for(field, ctx))
                .with_fill_opacity(ctx.style.field_opacity)
                .with_stroke(ctx.style.field_stroke, 0.5);
            out.push(
                Primitive::new(self.kind(), Shape::Polygon { rings }, style)
                    .with_title(self.title_for(field))
                    .with_hit(HitTarget::Field(field.id)),
            );
        }
        out
    }
}
