// tessera-exports - library export resolution for the Tessera module host
// Locates prebuilt module artifacts on disk or defers to the dynamic library manager

pub mod export;
pub mod framework;
pub mod key;
pub mod manifest;
pub mod paths;
pub mod project;
pub mod provider;
pub mod store;

pub use export::{CompiledLibraryReference, LibraryExport, MetadataReference, SourceReference};
pub use framework::{is_compatible, nearest_match, FrameworkError, FrameworkRef, FrameworkVersion};
pub use key::LibraryKey;
pub use manifest::{BinSection, FrameworkSection, ManifestError, ModuleManifest, MANIFEST_FILE};
pub use paths::{resolve_output_path, SeparatorStyle, CONFIGURATION_TOKEN};
pub use project::{ProjectDefinition, TargetFrameworkInfo};
pub use provider::{ExportProvider, ExportProviderChain, LibraryManager, ProjectExportProvider};
pub use store::{DiskProjectStore, ProjectStore, StoreError, MODULE_PATH_ENV};

/// Crate version
pub const VERSION: &str = "0.1.0";
