use std::fs;
use std::path::{Component, Path, PathBuf};

use scene::{
    CatalogFeatureSet, CatalogKind, Instrument, LocalizationContour, ObservationFootprintSet,
};
use tracing::debug;

use crate::error::{FormatError, PackageError};
use crate::feature_collection::parse_feature_collection;
use crate::instrument::parse_instrument;
use crate::manifest::{FileEntry, MANIFEST_VERSION, SkyManifest};

pub const MANIFEST_FILE_NAME: &str = "skymap.json";

/// A directory holding `skymap.json` and the files it references.
#[derive(Debug, Clone)]
pub struct SkyPackage {
    root: PathBuf,
    manifest: SkyManifest,
}

/// Everything a package references, parsed.
#[derive(Debug, Clone, Default)]
pub struct SkyData {
    pub localization: Option<LocalizationContour>,
    pub sources: Option<CatalogFeatureSet>,
    pub galaxies: Option<CatalogFeatureSet>,
    pub observations: Option<ObservationFootprintSet>,
    pub instrument: Option<Instrument>,
}

impl SkyPackage {
    pub fn load(root: impl AsRef<Path>) -> Result<Self, PackageError> {
        let root = root.as_ref().to_path_buf();
        let manifest_path = root.join(MANIFEST_FILE_NAME);
        let payload = fs::read_to_string(&manifest_path).map_err(|source| PackageError::Io {
            path: manifest_path.clone(),
            source,
        })?;
        let manifest: SkyManifest = serde_json::from_str(&payload).map_err(PackageError::Manifest)?;

        if manifest.version != MANIFEST_VERSION {
            return Err(PackageError::UnsupportedVersion {
                found: manifest.version,
            });
        }

        Ok(Self { root, manifest })
    }

    pub fn manifest(&self) -> &SkyManifest {
        &self.manifest
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Reads a referenced file, verifying its content hash when one is recorded.
    pub fn read(&self, entry: &FileEntry) -> Result<String, PackageError> {
        let relative = Path::new(&entry.path);
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(PackageError::UnsafePath(entry.path.clone()));
        }
        let path = self.root.join(relative);
        let bytes = fs::read(&path).map_err(|source| PackageError::Io {
            path: path.clone(),
            source,
        })?;
        if let Some(expected) = &entry.content_hash {
            let actual = blake3::hash(&bytes).to_hex().to_string();
            if !actual.eq_ignore_ascii_case(expected) {
                return Err(PackageError::HashMismatch {
                    path: entry.path.clone(),
                    expected: expected.clone(),
                    actual,
                });
            }
        }
        String::from_utf8(bytes).map_err(|e| PackageError::Io {
            path,
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
        })
    }

    pub fn load_data(&self) -> Result<SkyData, PackageError> {
        let m = &self.manifest;
        let mut data = SkyData::default();

        if let Some(entry) = &m.localization {
            let features = self.parse(&entry.file, parse_feature_collection)?;
            data.localization = Some(LocalizationContour::new(entry.id, entry.key(), features));
        }
        if let Some(entry) = &m.sources {
            let features = self.parse(entry, parse_feature_collection)?;
            data.sources = Some(CatalogFeatureSet::from_features(CatalogKind::Sources, &features));
        }
        if let Some(entry) = &m.galaxies {
            let features = self.parse(entry, parse_feature_collection)?;
            data.galaxies = Some(CatalogFeatureSet::from_features(CatalogKind::Galaxies, &features));
        }
        if let Some(entry) = &m.observations {
            let features = self.parse(entry, parse_feature_collection)?;
            data.observations = Some(ObservationFootprintSet::from_features(&features));
        }
        if let Some(entry) = &m.instrument {
            data.instrument = Some(self.parse(entry, parse_instrument)?);
        }

        debug!(
            root = %self.root.display(),
            localization = data.localization.is_some(),
            sources = data.sources.as_ref().map_or(0, CatalogFeatureSet::len),
            galaxies = data.galaxies.as_ref().map_or(0, CatalogFeatureSet::len),
            observations = data.observations.as_ref().map_or(0, ObservationFootprintSet::len),
            fields = data.instrument.as_ref().map_or(0, |i| i.fields().len()),
            "loaded sky package"
        );
        Ok(data)
    }

    fn parse<T>(
        &self,
        entry: &FileEntry,
        parse: impl Fn(&str) -> Result<T, FormatError>,
    ) -> Result<T, PackageError> {
        let payload = self.read(entry)?;
        parse(&payload).map_err(|source| PackageError::Format {
            path: entry.path.clone(),
            source,
        })
    }
}
