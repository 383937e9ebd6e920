// Asset loading functionality

use super::AssetError;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Supported asset kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Texture,
    Metadata,
}

impl AssetKind {
    /// Get supported file extensions for this asset kind
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            AssetKind::Texture => &["png", "jpg", "jpeg"],
            AssetKind::Metadata => &["json"],
        }
    }

    /// Guess the kind of an asset from its file name
    pub fn from_name(name: &str) -> Option<Self> {
        let ext = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
        [AssetKind::Texture, AssetKind::Metadata]
            .into_iter()
            .find(|kind| kind.extensions().contains(&ext.as_str()))
    }
}

/// Asset loader responsible for finding and loading asset files
#[derive(Debug, Clone)]
pub struct AssetLoader {
    base_path: PathBuf,
}

impl AssetLoader {
    /// Create a new asset loader with the given base path
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Get the full path for an asset
    pub fn resolve_path(&self, name: &str) -> PathBuf {
        self.base_path.join(name)
    }

    /// Load asset bytes from disk
    pub fn load_bytes(&self, name: &str) -> Result<Vec<u8>, AssetError> {
        let path = self.resolve_path(name);

        if !path.exists() {
            return Err(AssetError::NotFound(path.to_string_lossy().to_string()));
        }

        Ok(std::fs::read(&path)?)
    }

    /// Load and decode an image
    pub fn load_image(&self, name: &str) -> Result<image::DynamicImage, AssetError> {
        if AssetKind::from_name(name) != Some(AssetKind::Texture) {
            return Err(AssetError::LoadError(format!(
                "{} is not a supported image type",
                name
            )));
        }
        let bytes = self.load_bytes(name)?;
        image::load_from_memory(&bytes).map_err(|source| AssetError::Decode {
            path: name.to_string(),
            source,
        })
    }

    /// Load and parse a JSON document
    pub fn load_json<T: DeserializeOwned>(&self, name: &str) -> Result<T, AssetError> {
        let bytes = self.load_bytes(name)?;
        serde_json::from_slice(&bytes).map_err(|source| AssetError::Metadata {
            path: name.to_string(),
            source,
        })
    }

    /// Check if an asset exists
    pub fn exists(&self, name: &str) -> bool {
        self.resolve_path(name).exists()
    }

    /// Loader rooted at a subdirectory of this one
    pub fn scoped(&self, dir: &str) -> Self {
        Self::new(self.base_path.join(dir))
    }

    /// Get the base path
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}
