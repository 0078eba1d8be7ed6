use foundation::math::Rotation;
use scene::{ContourKey, DisplayOptions, FieldId};
use serde::{Deserialize, Serialize};

pub const MANIFEST_VERSION: &str = "1.0";

/// `skymap.json`: the files and view state of one sky map.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SkyManifest {
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub localization: Option<LocalizationEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sources: Option<FileEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub galaxies: Option<FileEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observations: Option<FileEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instrument: Option<FileEntry>,
    #[serde(default)]
    pub display: DisplayOptions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<Rotation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub selected_fields: Vec<FieldId>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FileEntry {
    pub path: String,
    /// blake3 hex digest of the file contents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_hash: Option<String>,
}

impl FileEntry {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content_hash: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocalizationEntry {
    pub id: u64,
    pub dateobs: String,
    pub localization_name: String,
    #[serde(flatten)]
    pub file: FileEntry,
}

impl LocalizationEntry {
    pub fn key(&self) -> ContourKey {
        ContourKey::new(self.dateobs.clone(), self.localization_name.clone())
    }
}

impl SkyManifest {
    pub fn new() -> Self {
        Self {
            version: MANIFEST_VERSION.to_string(),
            name: None,
            localization: None,
            sources: None,
            galaxies: None,
            observations: None,
            instrument: None,
            display: DisplayOptions::default(),
            rotation: None,
            selected_fields: Vec::new(),
        }
    }
}

impl Default for SkyManifest {
    fn default() -> Self {
        Self::new()
    }
}
