use foundation::math::Vec2;

use crate::primitive::Shape;

/// Approximate rendered size of a single-line label in pixels.
pub fn estimate_text_size(text: &str, font_size_px: f64) -> Vec2 {
    let count = text.chars().count().max(1) as f64;
    Vec2::new(font_size_px * 0.6 * count, font_size_px)
}

/// Screen-space containment test used for click targets.
///
/// Polylines are never hit.
pub fn shape_contains(shape: &Shape, p: Vec2) -> bool {
    match shape {
        Shape::Disk { center, radius } => center.distance(p) <= *radius,
        Shape::Polyline { .. } => false,
        Shape::Polygon { rings } => rings.iter().filter(|r| ring_crosses(r, p)).count() % 2 == 1,
        Shape::Text {
            anchor,
            text,
            font_size_px,
        } => {
            let size = estimate_text_size(text, *font_size_px);
            p.x >= anchor.x
                && p.x <= anchor.x + size.x
                && p.y >= anchor.y - 0.5 * size.y
                && p.y <= anchor.y + 0.5 * size.y
        }
    }
}

/// Even-odd crossing test of a ray cast from `p` toward +x.
fn ring_crosses(ring: &[Vec2], p: Vec2) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (a, b) = (ring[i], ring[j]);
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = a.x + (p.y - a.y) / (b.y - a.y) * (b.x - a.x);
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}
