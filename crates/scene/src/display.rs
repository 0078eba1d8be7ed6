use serde::{Deserialize, Serialize};

/// Per-layer visibility flags. Background and graticule are always drawn.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayOptions {
    pub localization: bool,
    pub sources: bool,
    pub galaxies: bool,
    pub instrument: bool,
    pub observations: bool,
}

impl DisplayOptions {
    pub fn all() -> Self {
        Self {
            localization: true,
            sources: true,
            galaxies: true,
            instrument: true,
            observations: true,
        }
    }

    pub fn none() -> Self {
        Self {
            localization: false,
            sources: false,
            galaxies: false,
            instrument: false,
            observations: false,
        }
    }
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            localization: true,
            sources: true,
            galaxies: true,
            instrument: true,
            observations: false,
        }
    }
}
