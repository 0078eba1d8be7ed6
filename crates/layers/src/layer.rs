use foundation::math::Orthographic;
use render::{LayerKind, Primitive};
use scene::{FieldSelection, FootprintSelection};

use crate::symbology::SkyStyle;

/// Shared inputs of one composition pass.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub projection: Orthographic,
    pub style: &'a SkyStyle,
    pub marker_radius_px: f64,
    pub airmass_threshold: f64,
    pub field_selection: &'a FieldSelection,
    pub footprint_selection: &'a FootprintSelection,
}

/// One overlay kind: a pure mapping from its data and the context to primitives.
pub trait Layer {
    fn kind(&self) -> LayerKind;

    fn render(&self, ctx: &RenderContext<'_>) -> Vec<Primitive>;
}
