use std::fs;
use std::path::{Path, PathBuf};

use formats::{
    FileEntry, LocalizationEntry, MANIFEST_FILE_NAME, PackageError, SkyManifest, SkyPackage,
};
use foundation::math::Rotation;
use scene::FieldSelection;
use skymap::{CallbackHost, ConfigError, SkyMap, SkyMapConfig};
use svg::Document;
use thiserror::Error;
use tracing::info;

use crate::export::scene_to_svg;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error(transparent)]
    Package(#[from] PackageError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("manifest encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub width: f64,
    pub height: f64,
    /// Overrides the manifest's rotation.
    pub rotation: Option<Rotation>,
    pub config: SkyMapConfig,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            rotation: None,
            config: SkyMapConfig::default(),
        }
    }
}

/// Loads a package and composes its sky map once, the way the widget would
/// on first paint.
pub fn render_package(root: impl AsRef<Path>, options: &RenderOptions) -> Result<Document, ToolError> {
    let package = SkyPackage::load(root)?;
    let manifest = package.manifest();
    let data = package.load_data()?;

    let host = CallbackHost::new(FieldSelection::from_ids(manifest.selected_fields.iter().copied()));
    let rotation = options.rotation.or(manifest.rotation);
    let mut map = SkyMap::new(host, options.config, options.width, options.height, rotation)?;
    map.set_display(manifest.display);
    map.set_sources(data.sources);
    map.set_galaxies(data.galaxies);
    map.set_instrument(data.instrument);
    map.set_observations(data.observations);
    if let Some(contour) = data.localization {
        let req = map.request_localization(contour.key.clone());
        map.resolve_localization(req, contour);
    }

    info!(
        root = %package.root().display(),
        primitives = map.scene().len(),
        drawn = map.scene().drawn().count(),
        "rendered package"
    );
    Ok(scene_to_svg(map.scene(), options.width, options.height))
}

/// Files to list in a new manifest, relative to the package directory.
#[derive(Debug, Clone, Default)]
pub struct ManifestInputs {
    pub name: Option<String>,
    pub localization: Option<LocalizationInput>,
    pub sources: Option<String>,
    pub galaxies: Option<String>,
    pub observations: Option<String>,
    pub instrument: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LocalizationInput {
    pub id: u64,
    pub dateobs: String,
    pub localization_name: String,
    pub path: String,
}

/// Hashes each listed file and writes `skymap.json` into `root`.
pub fn write_manifest(root: impl AsRef<Path>, inputs: &ManifestInputs) -> Result<SkyManifest, ToolError> {
    let root = root.as_ref();
    let hashed = |path: &str| -> Result<FileEntry, ToolError> {
        let full = root.join(path);
        let bytes = fs::read(&full).map_err(|source| ToolError::Io { path: full, source })?;
        Ok(FileEntry {
            path: path.to_string(),
            content_hash: Some(blake3::hash(&bytes).to_hex().to_string()),
        })
    };

    let mut manifest = SkyManifest::new();
    manifest.name = inputs.name.clone();
    if let Some(loc) = &inputs.localization {
        manifest.localization = Some(LocalizationEntry {
            id: loc.id,
            dateobs: loc.dateobs.clone(),
            localization_name: loc.localization_name.clone(),
            file: hashed(loc.path.as_str())?,
        });
    }
    manifest.sources = inputs.sources.as_deref().map(hashed).transpose()?;
    manifest.galaxies = inputs.galaxies.as_deref().map(hashed).transpose()?;
    manifest.observations = inputs.observations.as_deref().map(hashed).transpose()?;
    manifest.instrument = inputs.instrument.as_deref().map(hashed).transpose()?;

    let out = root.join(MANIFEST_FILE_NAME);
    let json = serde_json::to_string_pretty(&manifest)?;
    fs::write(&out, json).map_err(|source| ToolError::Io {
        path: out.clone(),
        source,
    })?;
    info!(path = %out.display(), "wrote manifest");
    Ok(manifest)
}
