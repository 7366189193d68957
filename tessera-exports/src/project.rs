// Project definitions: what the store knows about a module on disk

use std::path::{Path, PathBuf};

use crate::framework::{nearest_match, FrameworkRef};
use crate::manifest::{BinSection, ManifestError, ModuleManifest};

/// One framework variant's static build output, as negotiated for a
/// request.
///
/// `framework_name` absent means the project declares no explicit
/// frameworks (the requester's framework stands) or nothing declared was
/// compatible. `assembly_path` absent means there is no static artifact
/// and the export must come from the dynamic library manager.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetFrameworkInfo {
    pub framework_name: Option<FrameworkRef>,
    pub assembly_path: Option<String>,
    pub symbols_path: Option<String>,
}

#[derive(Debug, Clone)]
struct DeclaredFramework {
    framework: FrameworkRef,
    bin: Option<BinSection>,
}

/// A module project loaded from disk: root directory, declared frameworks,
/// and templated build-output paths. Read-only once built; the store owns
/// and caches these.
#[derive(Debug, Clone)]
pub struct ProjectDefinition {
    name: String,
    root: PathBuf,
    default_bin: Option<BinSection>,
    frameworks: Vec<DeclaredFramework>,
}

impl ProjectDefinition {
    /// Builds a definition from a parsed manifest and the directory it was
    /// loaded from. The directory name stands in for a missing `name`.
    pub fn from_manifest(
        manifest: ModuleManifest,
        root: impl Into<PathBuf>,
    ) -> Result<Self, ManifestError> {
        let root = root.into();

        let name = match manifest.name {
            Some(name) if !name.is_empty() => name,
            Some(_) => return Err(ManifestError::EmptyName),
            None => root
                .file_name()
                .map(|dir| dir.to_string_lossy().into_owned())
                .ok_or(ManifestError::EmptyName)?,
        };

        let mut frameworks: Vec<DeclaredFramework> = Vec::with_capacity(manifest.frameworks.len());
        for (moniker, section) in manifest.frameworks {
            let framework: FrameworkRef = moniker.parse()?;
            if frameworks.iter().any(|d| d.framework == framework) {
                return Err(ManifestError::DuplicateFramework(framework));
            }
            frameworks.push(DeclaredFramework {
                framework,
                bin: section.bin,
            });
        }

        Ok(Self {
            name,
            root,
            default_bin: manifest.bin,
            frameworks,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Root directory templated output paths are resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Frameworks this project explicitly declares.
    pub fn declared_frameworks(&self) -> impl Iterator<Item = &FrameworkRef> {
        self.frameworks.iter().map(|d| &d.framework)
    }

    /// Negotiates the build info for a requested framework.
    ///
    /// Never fails: with no declared frameworks the project-level output
    /// applies and `framework_name` stays absent; with declarations, the
    /// nearest compatible one is authoritative and is echoed back; with no
    /// compatible declaration every field is absent.
    pub fn target_framework_info(&self, requested: &FrameworkRef) -> TargetFrameworkInfo {
        if self.frameworks.is_empty() {
            return TargetFrameworkInfo {
                framework_name: None,
                assembly_path: self.default_bin.as_ref().and_then(|b| b.assembly.clone()),
                symbols_path: self.default_bin.as_ref().and_then(|b| b.symbols.clone()),
            };
        }

        let matched = match nearest_match(requested, self.declared_frameworks()) {
            Some(framework) => framework.clone(),
            None => {
                log::debug!(
                    "project '{}' declares no framework compatible with {}",
                    self.name,
                    requested
                );
                return TargetFrameworkInfo::default();
            }
        };

        let bin = self
            .frameworks
            .iter()
            .find(|d| d.framework == matched)
            .and_then(|d| d.bin.as_ref())
            .or(self.default_bin.as_ref());

        TargetFrameworkInfo {
            framework_name: Some(matched),
            assembly_path: bin.and_then(|b| b.assembly.clone()),
            symbols_path: bin.and_then(|b| b.symbols.clone()),
        }
    }
}
