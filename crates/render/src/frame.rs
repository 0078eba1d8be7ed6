use foundation::math::Vec2;

use crate::picking::shape_contains;
use crate::primitive::{HitTarget, LayerKind, Primitive};

/// The retained drawable scene: one frame's primitives in paint order.
///
/// Ordering contract:
/// - Primitives are painted in insertion order.
/// - `hit_test` returns the topmost (last inserted) visible primitive that
///   carries a hit target and contains the point.
/// - `clear` drops every primitive of the previous frame, click targets
///   included, and starts a new generation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    generation: u64,
    primitives: Vec<Primitive>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Incremented by every `clear`.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn clear(&mut self) {
        self.primitives.clear();
        self.generation += 1;
    }

    pub fn push(&mut self, primitive: Primitive) {
        self.primitives.push(primitive);
    }

    pub fn extend(&mut self, primitives: impl IntoIterator<Item = Primitive>) {
        self.primitives.extend(primitives);
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    /// All primitives, hidden ones included.
    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    /// Primitives that are actually painted.
    pub fn drawn(&self) -> impl Iterator<Item = &Primitive> + '_ {
        self.primitives.iter().filter(|p| p.visible)
    }

    pub fn layer(&self, kind: LayerKind) -> impl Iterator<Item = &Primitive> + '_ {
        self.primitives.iter().filter(move |p| p.layer == kind)
    }

    pub fn hit_test(&self, point: Vec2) -> Option<&HitTarget> {
        self.primitives
            .iter()
            .rev()
            .filter(|p| p.visible)
            .find_map(|p| match &p.hit {
                Some(hit) if shape_contains(&p.shape, point) => Some(hit),
                _ => None,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::Scene;
    use crate::primitive::{HitTarget, LayerKind, Primitive, Shape, Style};
    use foundation::color::Color;
    use foundation::math::Vec2;
    use pretty_assertions::assert_eq;

    fn disk(layer: LayerKind, x: f64, radius: f64) -> Primitive {
        Primitive::new(
            layer,
            Shape::Disk {
                center: Vec2::new(x, 0.0),
                radius,
            },
            Style::fill(Color::WHITE),
        )
    }

    #[test]
    fn topmost_visible_target_wins() {
        let mut scene = Scene::new();
        scene.push(disk(LayerKind::Instrument, 0.0, 10.0).with_hit(HitTarget::Field(1)));
        scene.push(disk(LayerKind::Observations, 0.0, 5.0).with_hit(HitTarget::Footprint(9)));
        scene.push(
            disk(LayerKind::Sources, 0.0, 5.0)
                .with_hit(HitTarget::Link("/s".into()))
                .hidden(),
        );
        scene.push(disk(LayerKind::Graticule, 0.0, 50.0));

        assert_eq!(scene.hit_test(Vec2::new(1.0, 0.0)), Some(&HitTarget::Footprint(9)));
        assert_eq!(scene.hit_test(Vec2::new(8.0, 0.0)), Some(&HitTarget::Field(1)));
        assert_eq!(scene.hit_test(Vec2::new(20.0, 0.0)), None);
        assert_eq!(scene.drawn().count(), 3);
    }

    #[test]
    fn clear_drops_targets_and_bumps_generation() {
        let mut scene = Scene::new();
        scene.push(disk(LayerKind::Instrument, 0.0, 10.0).with_hit(HitTarget::Field(1)));
        let before = scene.generation();
        scene.clear();
        assert!(scene.is_empty());
        assert_eq!(scene.generation(), before + 1);
        assert_eq!(scene.hit_test(Vec2::new(0.0, 0.0)), None);
    }

    #[test]
    fn layer_filter_keeps_paint_order() {
        let mut scene = Scene::new();
        scene.extend([
            disk(LayerKind::Instrument, 0.0, 1.0).with_hit(HitTarget::Field(1)),
            disk(LayerKind::Sources, 0.0, 1.0),
            disk(LayerKind::Instrument, 5.0, 1.0).with_hit(HitTarget::Field(2)),
        ]);
        let hits: Vec<_> = scene.layer(LayerKind::Instrument).map(|p| p.hit.clone()).collect();
        assert_eq!(hits, vec![Some(HitTarget::Field(1)), Some(HitTarget::Field(2))]);
    }
}
