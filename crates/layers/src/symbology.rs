use foundation::color::Color;
use serde::{Deserialize, Serialize};

/// Colours and line weights of every sky layer.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkyStyle {
    pub background: Color,
    pub limb: Color,
    pub graticule: Color,
    pub graticule_width: f64,
    pub contour: Color,
    pub contour_width: f64,
    pub localization_marker: Color,
    pub source_marker: Color,
    pub galaxy_marker: Color,
    pub label: Color,
    pub label_font_px: f64,
    /// Unselected field with airmass below the threshold.
    pub field_observable: Color,
    /// Unselected field that is not usefully observable.
    pub field_unobservable: Color,
    pub field_stroke: Color,
    pub field_opacity: f64,
    pub footprint_selected: Color,
    pub footprint_unselected: Color,
    pub footprint_accent: Color,
    pub footprint_opacity: f64,
}

impl Default for SkyStyle {
    fn default() -> Self {
        Self {
            background: Color::rgb(0x10, 0x1a, 0x2e),
            limb: Color::rgb(0x5a, 0x6b, 0x8c),
            graticule: Color::rgb(0x33, 0x40, 0x5a),
            graticule_width: 0.5,
            contour: Color::rgb(0x4a, 0xc9, 0xe3),
            contour_width: 1.5,
            localization_marker: Color::rgb(0x4a, 0xc9, 0xe3),
            source_marker: Color::rgb(0xf2, 0xc1, 0x4e),
            galaxy_marker: Color::rgb(0xb4, 0x8e, 0xde),
            label: Color::WHITE,
            label_font_px: 11.0,
            field_observable: Color::WHITE,
            field_unobservable: Color::GRAY,
            field_stroke: Color::BLACK,
            field_opacity: 0.6,
            footprint_selected: Color::RED,
            footprint_unselected: Color::WHITE,
            footprint_accent: Color::rgb(0xff, 0x8c, 0x00),
            footprint_opacity: 0.5,
        }
    }
}
