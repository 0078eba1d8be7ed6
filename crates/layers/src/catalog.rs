use foundation::math::Vec2;
use render::{HitTarget, LayerKind, Primitive, Shape, Style};
use scene::{CatalogFeatureSet, CatalogKind};

use crate::layer::{Layer, RenderContext};

/// Source or galaxy catalog: a marker and a hyperlinked name per entry.
#[derive(Debug, Copy, Clone)]
pub struct CatalogLayer<'a> {
    pub catalog: &'a CatalogFeatureSet,
}

impl<'a> CatalogLayer<'a> {
    pub fn new(catalog: &'a CatalogFeatureSet) -> Self {
        Self { catalog }
    }
}

impl Layer for CatalogLayer<'_> {
    fn kind(&self) -> LayerKind {
        match self.catalog.kind {
            CatalogKind::Sources => LayerKind::Sources,
            CatalogKind::Galaxies => LayerKind::Galaxies,
        }
    }

    fn render(&self, ctx: &RenderContext<'_>) -> Vec<Primitive> {
        let proj = &ctx.projection;
        let marker_color = match self.catalog.kind {
            CatalogKind::Sources => ctx.style.source_marker,
            CatalogKind::Galaxies => ctx.style.galaxy_marker,
        };
        let mut out = Vec::with_capacity(self.catalog.len() * 2);
        for entry in &self.catalog.entries {
            let Some(center) = proj.project(entry.position) else {
                continue;
            };
            let visible = proj.is_front_facing(entry.position);
            let marker = Shape::Disk {
                center,
                radius: ctx.marker_radius_px,
            };
            out.push(
                Primitive::new(self.kind(), marker, Style::fill(marker_color))
                    .with_title(entry.name.clone())
                    .with_visible(visible),
            );

            let label = Shape::Text {
                anchor: center + Vec2::new(ctx.marker_radius_px + 2.0, 0.0),
                text: entry.name.clone(),
                font_size_px: ctx.style.label_font_px,
            };
            let mut label = Primitive::new(self.kind(), label, Style::fill(ctx.style.label))
                .with_visible(visible);
            if let Some(url) = &entry.url {
                label = label.with_hit(HitTarget::Link(url.clone()));
            }
            out.push(label);
        }
        out
    }
}
