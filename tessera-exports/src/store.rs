// Project store: name -> project definition lookup across module roots

use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;
use thiserror::Error;

use crate::manifest::{ManifestError, ModuleManifest, MANIFEST_FILE};
use crate::project::ProjectDefinition;

/// Environment variable listing module source roots, `:`-separated.
pub const MODULE_PATH_ENV: &str = "TESSERA_MODULE_PATH";

/// Store configuration error
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("cannot determine a home directory for the default module path")]
    NoModulePath,
}

/// Resolves module names to project definitions.
///
/// Not-found is an outcome, not an error: the provider chain treats an
/// absent project as "nothing static here" and moves on.
pub trait ProjectStore: Send + Sync {
    fn try_resolve_project(&self, name: &str) -> Option<Arc<ProjectDefinition>>;
}

/// Disk-backed store: probes an ordered list of module roots for
/// `<root>/<name>/module.json` and caches what it loads. The first root
/// containing a manifest for the name wins.
pub struct DiskProjectStore {
    roots: Vec<PathBuf>,
    definitions: DashMap<String, Arc<ProjectDefinition>>,
}

impl DiskProjectStore {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self {
            roots,
            definitions: DashMap::new(),
        }
    }

    /// Builds a store from the ambient environment: `TESSERA_MODULE_PATH`
    /// when set, otherwise `~/.tessera/modules`.
    pub fn from_env() -> Result<Self, StoreError> {
        if let Ok(module_path) = std::env::var(MODULE_PATH_ENV) {
            let roots = module_path
                .split(':')
                .filter(|entry| !entry.is_empty())
                .map(PathBuf::from)
                .collect();
            return Ok(Self::new(roots));
        }

        if let Some(home) = dirs::home_dir() {
            return Ok(Self::new(vec![home.join(".tessera").join("modules")]));
        }

        Err(StoreError::NoModulePath)
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Loads a project definition straight from a module directory,
    /// surfacing the typed error. Lookup through the store trait folds
    /// these errors into not-found instead.
    pub fn load_project_dir(dir: &Path) -> Result<ProjectDefinition, ManifestError> {
        let manifest = ModuleManifest::from_file(dir.join(MANIFEST_FILE))?;
        ProjectDefinition::from_manifest(manifest, dir)
    }

    fn locate(&self, name: &str) -> Option<PathBuf> {
        self.roots
            .iter()
            .map(|root| root.join(name))
            .find(|dir| dir.join(MANIFEST_FILE).is_file())
    }
}

impl ProjectStore for DiskProjectStore {
    fn try_resolve_project(&self, name: &str) -> Option<Arc<ProjectDefinition>> {
        if let Some(cached) = self.definitions.get(name) {
            return Some(Arc::clone(cached.value()));
        }

        let dir = self.locate(name)?;
        match Self::load_project_dir(&dir) {
            Ok(project) => {
                let project = Arc::new(project);
                self.definitions
                    .insert(name.to_string(), Arc::clone(&project));
                Some(project)
            }
            Err(err) => {
                log::warn!("skipping module '{}' at {}: {}", name, dir.display(), err);
                None
            }
        }
    }
}
