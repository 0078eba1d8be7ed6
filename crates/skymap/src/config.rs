use std::fs;
use std::path::{Path, PathBuf};

use layers::SkyStyle;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Tunables of one sky-map widget. Every field has a default.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkyMapConfig {
    /// Fields with airmass below this are drawn as observable.
    pub airmass_threshold: f64,
    /// Added to π/2 to get the front-facing threshold.
    pub limb_slack_rad: f64,
    /// Degrees of rotation per `scale` pixels of drag.
    pub drag_sensitivity: f64,
    /// A press turns into a drag once the pointer moves farther than this.
    pub click_tolerance_px: f64,
    pub graticule_step_deg: f64,
    pub graticule_sample_deg: f64,
    pub marker_radius_px: f64,
    /// Globe radius as a fraction of half the smaller canvas side.
    pub scale_fraction: f64,
    /// Resolved contours kept for quick switching.
    pub contour_capacity: usize,
    pub style: SkyStyle,
}

impl Default for SkyMapConfig {
    fn default() -> Self {
        Self {
            airmass_threshold: 2.5,
            limb_slack_rad: 0.0,
            drag_sensitivity: 75.0,
            click_tolerance_px: 0.0,
            graticule_step_deg: 10.0,
            graticule_sample_deg: 2.5,
            marker_radius_px: 3.0,
            scale_fraction: 0.95,
            contour_capacity: 4,
            style: SkyStyle::default(),
        }
    }
}

impl SkyMapConfig {
    pub fn from_json_str(payload: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(payload)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let payload = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&payload)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("airmass_threshold", self.airmass_threshold)?;
        positive("drag_sensitivity", self.drag_sensitivity)?;
        positive("graticule_step_deg", self.graticule_step_deg)?;
        positive("graticule_sample_deg", self.graticule_sample_deg)?;
        positive("scale_fraction", self.scale_fraction)?;
        positive("style.label_font_px", self.style.label_font_px)?;
        non_negative("click_tolerance_px", self.click_tolerance_px)?;
        non_negative("marker_radius_px", self.marker_radius_px)?;
        if !(self.limb_slack_rad.is_finite() && self.limb_slack_rad.abs() < std::f64::consts::FRAC_PI_2) {
            return Err(invalid("limb_slack_rad", "must be finite and within ±π/2"));
        }
        if self.graticule_step_deg > 90.0 {
            return Err(invalid("graticule_step_deg", "must not exceed 90"));
        }
        for (field, v) in [
            ("style.field_opacity", self.style.field_opacity),
            ("style.footprint_opacity", self.style.footprint_opacity),
        ] {
            if !(0.0..=1.0).contains(&v) {
                return Err(invalid(field, "must be within [0, 1]"));
            }
        }
        if self.contour_capacity == 0 {
            return Err(invalid("contour_capacity", "must be at least 1"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_string(),
    }
}

fn positive(field: &'static str, v: f64) -> Result<(), ConfigError> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, &format!("must be finite and positive, got {v}")))
    }
}

fn non_negative(field: &'static str, v: f64) -> Result<(), ConfigError> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, &format!("must be finite and non-negative, got {v}")))
    }
}
