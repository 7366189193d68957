// Module manifest parser - module.json

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::framework::{FrameworkError, FrameworkRef};

/// Manifest file name expected at a module's root directory.
pub const MANIFEST_FILE: &str = "module.json";

/// Manifest load/validation error
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse module manifest: {0}")]
    Json(#[from] serde_json::Error),

    #[error("module name cannot be empty")]
    EmptyName,

    #[error(transparent)]
    Framework(#[from] FrameworkError),

    #[error("duplicate framework declaration: {0}")]
    DuplicateFramework(FrameworkRef),
}

/// Main manifest structure (module.json)
///
/// Every section is optional. A module with no `bin` anywhere has no static
/// build output and is always satisfied through the dynamic library manager.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleManifest {
    /// Module name; defaults to the containing directory's name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Project-level build output, used by frameworks without their own.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bin: Option<BinSection>,

    /// Declared target frameworks, keyed by moniker (e.g. "net451").
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub frameworks: HashMap<String, FrameworkSection>,
}

/// One declared framework variant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrameworkSection {
    /// Framework-specific build output; overrides the project-level `bin`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bin: Option<BinSection>,
}

/// Templated build-output paths, relative to the module root. Both accept
/// the `{configuration}` token and either platform's separators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BinSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assembly: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbols: Option<String>,
}

impl ModuleManifest {
    /// Parse module.json from file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ManifestError> {
        let content = fs::read_to_string(&path).map_err(|source| ManifestError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        })?;

        Self::from_str(&content)
    }

    /// Parse module.json from string
    pub fn from_str(content: &str) -> Result<Self, ManifestError> {
        let manifest: ModuleManifest = serde_json::from_str(content)?;

        manifest.validate()?;
        Ok(manifest)
    }

    /// Validate manifest
    fn validate(&self) -> Result<(), ManifestError> {
        if let Some(name) = &self.name {
            if name.is_empty() {
                return Err(ManifestError::EmptyName);
            }
        }

        for moniker in self.frameworks.keys() {
            moniker.parse::<FrameworkRef>()?;
        }

        Ok(())
    }
}
