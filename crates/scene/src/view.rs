use foundation::math::{Orthographic, Rotation, Vec2};

/// Rotation and canvas geometry of one widget instance.
///
/// The globe is centered on the canvas; its radius is `scale_fraction` of half
/// the smaller canvas side.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewState {
    rotation: Rotation,
    width: f64,
    height: f64,
    scale_fraction: f64,
}

impl ViewState {
    pub fn new(width: f64, height: f64, rotation: Rotation, scale_fraction: f64) -> Self {
        Self {
            rotation: rotation.normalized(),
            width: sanitize_extent(width),
            height: sanitize_extent(height),
            scale_fraction,
        }
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation = rotation.normalized();
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = sanitize_extent(width);
        self.height = sanitize_extent(height);
    }

    /// Globe radius in pixels.
    pub fn scale(&self) -> f64 {
        self.scale_fraction * 0.5 * self.width.min(self.height)
    }

    pub fn translate(&self) -> Vec2 {
        Vec2::new(0.5 * self.width, 0.5 * self.height)
    }

    pub fn projection(&self, limb_slack_rad: f64) -> Orthographic {
        Orthographic::new(self.rotation, self.scale(), self.translate()).with_limb_slack(limb_slack_rad)
    }
}

fn sanitize_extent(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 { v } else { 0.0 }
}
