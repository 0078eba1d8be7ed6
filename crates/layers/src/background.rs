use render::{LayerKind, Primitive, Shape, Style};

use crate::layer::{Layer, RenderContext};

/// The sphere itself: a filled disk outlined at the limb.
#[derive(Debug, Default, Copy, Clone)]
pub struct BackgroundLayer;

impl Layer for BackgroundLayer {
    fn kind(&self) -> LayerKind {
        LayerKind::Background
    }

    fn render(&self, ctx: &RenderContext<'_>) -> Vec<Primitive> {
        let shape = Shape::Disk {
            center: ctx.projection.translate(),
            radius: ctx.projection.scale(),
        };
        let style = Style::fill(ctx.style.background).with_stroke(ctx.style.limb, 1.0);
        vec![Primitive::new(self.kind(), shape, style)]
    }
}

#[cfg(test)]
mod tests {
    use super::BackgroundLayer;
    use crate::layer::Layer;
    use crate::layer::testing::context;
    use foundation::math::Vec2;
    use render::Shape;
    use scene::{FieldSelection, FootprintSelection};

    #[test]
    fn draws_one_disk_matching_the_globe() {
        let (fields, footprints) = (FieldSelection::new(), FootprintSelection::new());
        let prims = BackgroundLayer.render(&context(&fields, &footprints));
        assert_eq!(prims.len(), 1);
        assert_eq!(
            prims[0].shape,
            Shape::Disk {
                center: Vec2::new(100.0, 100.0),
                radius: 100.0
            }
        );
    }
}
