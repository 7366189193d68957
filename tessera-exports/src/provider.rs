// Export providers: static project resolution with dynamic fallback

use std::sync::Arc;

use crate::export::{CompiledLibraryReference, LibraryExport};
use crate::key::LibraryKey;
use crate::paths::{resolve_output_path, SeparatorStyle};
use crate::store::ProjectStore;

/// The dynamic library manager: produces exports for modules with no
/// static artifact (compiled on demand or managed elsewhere). Framework
/// and configuration handling are its own business, so it is keyed by
/// name and aspect only.
pub trait LibraryManager: Send + Sync {
    fn get_library_export(&self, name: &str, aspect: &str) -> Option<LibraryExport>;
}

/// One provider in the export chain. `Some` satisfies the key; `None`
/// means "nothing here, try the next provider" and is never an error.
pub trait ExportProvider: Send + Sync {
    fn get_library_export(&self, key: &LibraryKey) -> Option<LibraryExport>;
}

/// Resolves exports for modules backed by a project on disk.
///
/// Looks the module up in the project store, negotiates the target
/// framework against what the project declares, and either points at the
/// project's prebuilt assembly or hands the request to the dynamic
/// library manager. Both collaborators are injected at construction.
pub struct ProjectExportProvider {
    projects: Arc<dyn ProjectStore>,
    library_manager: Arc<dyn LibraryManager>,
    separators: SeparatorStyle,
}

impl ProjectExportProvider {
    pub fn new(projects: Arc<dyn ProjectStore>, library_manager: Arc<dyn LibraryManager>) -> Self {
        Self {
            projects,
            library_manager,
            separators: SeparatorStyle::host(),
        }
    }

    /// Overrides the separator convention used for templated output paths.
    pub fn with_separator_style(mut self, separators: SeparatorStyle) -> Self {
        self.separators = separators;
        self
    }
}

impl ExportProvider for ProjectExportProvider {
    fn get_library_export(&self, key: &LibraryKey) -> Option<LibraryExport> {
        // No project with that name: nothing to statically export.
        let project = self.projects.try_resolve_project(&key.name)?;

        let info = project.target_framework_info(&key.target_framework);

        // A framework declared by the project is authoritative; the
        // request is re-keyed to it so any delegated call sees the
        // concrete framework rather than a loose specifier. Without
        // declarations the requested framework stands.
        let key = match info.framework_name {
            Some(framework) => {
                log::debug!("{}: negotiated framework {}", key.name, framework);
                key.with_target_framework(framework)
            }
            None => key.clone(),
        };

        match info.assembly_path.as_deref().filter(|path| !path.is_empty()) {
            Some(assembly) => {
                let assembly_path = resolve_output_path(
                    project.root(),
                    &key.configuration,
                    Some(assembly),
                    self.separators,
                )?;
                let symbols_path = resolve_output_path(
                    project.root(),
                    &key.configuration,
                    info.symbols_path.as_deref(),
                    self.separators,
                );

                log::debug!("{}: static export at {}", key, assembly_path.display());
                Some(LibraryExport::compiled(CompiledLibraryReference::new(
                    &project,
                    assembly_path,
                    symbols_path,
                )))
            }
            None => {
                log::debug!("{}: no static output, delegating", key);
                self.library_manager.get_library_export(&key.name, &key.aspect)
            }
        }
    }
}

/// An ordered chain of export providers; the first satisfied result wins.
#[derive(Default)]
pub struct ExportProviderChain {
    providers: Vec<Box<dyn ExportProvider>>,
}

impl ExportProviderChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_provider(mut self, provider: Box<dyn ExportProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    pub fn push(&mut self, provider: Box<dyn ExportProvider>) {
        self.providers.push(provider);
    }
}

impl ExportProvider for ExportProviderChain {
    fn get_library_export(&self, key: &LibraryKey) -> Option<LibraryExport> {
        self.providers
            .iter()
            .find_map(|provider| provider.get_library_export(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::sync::Mutex;

    use crate::export::{MetadataReference, SourceReference};
    use crate::framework::FrameworkRef;
    use crate::manifest::ModuleManifest;
    use crate::project::ProjectDefinition;

    struct FixedStore {
        projects: HashMap<String, Arc<ProjectDefinition>>,
    }

    impl FixedStore {
        fn empty() -> Self {
            Self {
                projects: HashMap::new(),
            }
        }

        fn with_project(manifest_json: &str, root: &str) -> Self {
            let manifest = ModuleManifest::from_str(manifest_json).unwrap();
            let project = ProjectDefinition::from_manifest(manifest, root).unwrap();
            let mut projects = HashMap::new();
            projects.insert(project.name().to_string(), Arc::new(project));
            Self { projects }
        }
    }

    impl ProjectStore for FixedStore {
        fn try_resolve_project(&self, name: &str) -> Option<Arc<ProjectDefinition>> {
            self.projects.get(name).cloned()
        }
    }

    #[derive(Default)]
    struct RecordingManager {
        calls: Mutex<Vec<(String, String)>>,
        response: Option<LibraryExport>,
    }

    impl RecordingManager {
        fn answering(response: Option<LibraryExport>) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                response,
            }
        }

        fn calls(&self) -> Vec<(String, String)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl LibraryManager for RecordingManager {
        fn get_library_export(&self, name: &str, aspect: &str) -> Option<LibraryExport> {
            self.calls
                .lock()
                .unwrap()
                .push((name.to_string(), aspect.to_string()));
            self.response.clone()
        }
    }

    fn key(name: &str, moniker: &str, configuration: &str, aspect: &str) -> LibraryKey {
        let framework: FrameworkRef = moniker.parse().unwrap();
        LibraryKey::new(name, framework, configuration, aspect)
    }

    fn provider(
        store: FixedStore,
        manager: Arc<RecordingManager>,
    ) -> ProjectExportProvider {
        ProjectExportProvider::new(Arc::new(store), manager)
            .with_separator_style(SeparatorStyle::ForwardSlash)
    }

    fn canned_export() -> LibraryExport {
        LibraryExport::new(
            vec![
                MetadataReference::Assembly(PathBuf::from("/managed/one.dll")),
                MetadataReference::Assembly(PathBuf::from("/managed/two.dll")),
            ],
            vec![SourceReference {
                path: PathBuf::from("/managed/shared.cs"),
            }],
        )
    }

    #[test]
    fn test_unknown_project_is_unsatisfied() {
        let manager = Arc::new(RecordingManager::answering(Some(canned_export())));
        let provider = provider(FixedStore::empty(), Arc::clone(&manager));

        let result = provider.get_library_export(&key("missing", "net451", "Debug", ""));

        assert_eq!(result, None);
        // The manager is never consulted for an unknown project.
        assert!(manager.calls().is_empty());
    }

    #[test]
    fn test_static_output_yields_single_compiled_reference() {
        let store = FixedStore::with_project(
            r#"{
                "name": "widgets",
                "bin": {
                    "assembly": "bin/{configuration}/Widgets.dll",
                    "symbols": "bin/{configuration}/Widgets.pdb"
                }
            }"#,
            "/mods/widgets",
        );
        let manager = Arc::new(RecordingManager::answering(Some(canned_export())));
        let provider = provider(store, Arc::clone(&manager));

        let export = provider
            .get_library_export(&key("widgets", "net451", "Debug", ""))
            .unwrap();

        assert_eq!(export.metadata_references.len(), 1);
        assert!(export.source_references.is_empty());
        assert!(manager.calls().is_empty());

        match &export.metadata_references[0] {
            MetadataReference::Compiled(reference) => {
                assert_eq!(reference.module, "widgets");
                assert_eq!(
                    reference.assembly_path,
                    PathBuf::from("/mods/widgets/bin/Debug/Widgets.dll")
                );
                assert_eq!(
                    reference.symbols_path,
                    Some(PathBuf::from("/mods/widgets/bin/Debug/Widgets.pdb"))
                );
            }
            other => panic!("expected a compiled reference, got {:?}", other),
        }
    }

    #[test]
    fn test_static_output_without_symbols() {
        let store = FixedStore::with_project(
            r#"{ "name": "widgets", "bin": { "assembly": "bin/{configuration}/Widgets.dll" } }"#,
            "/mods/widgets",
        );
        let manager = Arc::new(RecordingManager::default());
        let provider = provider(store, Arc::clone(&manager));

        let export = provider
            .get_library_export(&key("widgets", "net451", "Release", ""))
            .unwrap();

        match &export.metadata_references[0] {
            MetadataReference::Compiled(reference) => {
                assert_eq!(
                    reference.assembly_path,
                    PathBuf::from("/mods/widgets/bin/Release/Widgets.dll")
                );
                assert_eq!(reference.symbols_path, None);
            }
            other => panic!("expected a compiled reference, got {:?}", other),
        }
    }

    #[test]
    fn test_delegation_passes_name_and_aspect() {
        let store = FixedStore::with_project(
            r#"{ "name": "widgets", "frameworks": { "net451": {} } }"#,
            "/mods/widgets",
        );
        let manager = Arc::new(RecordingManager::answering(Some(canned_export())));
        let provider = provider(store, Arc::clone(&manager));

        let result = provider.get_library_export(&key("widgets", "net452", "Debug", "design"));

        assert_eq!(result, Some(canned_export()));
        assert_eq!(
            manager.calls(),
            vec![("widgets".to_string(), "design".to_string())]
        );
    }

    #[test]
    fn test_delegated_absence_propagates() {
        let store = FixedStore::with_project(
            r#"{ "name": "widgets", "frameworks": { "net451": {} } }"#,
            "/mods/widgets",
        );
        let manager = Arc::new(RecordingManager::answering(None));
        let provider = provider(store, Arc::clone(&manager));

        let result = provider.get_library_export(&key("widgets", "net451", "Debug", ""));

        assert_eq!(result, None);
        assert_eq!(manager.calls().len(), 1);
    }

    #[test]
    fn test_empty_assembly_path_delegates() {
        let store = FixedStore::with_project(
            r#"{ "name": "widgets", "bin": { "assembly": "" } }"#,
            "/mods/widgets",
        );
        let manager = Arc::new(RecordingManager::answering(Some(canned_export())));
        let provider = provider(store, Arc::clone(&manager));

        let result = provider.get_library_export(&key("widgets", "net451", "Debug", ""));

        assert_eq!(result, Some(canned_export()));
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let store = FixedStore::with_project(
            r#"{ "name": "widgets", "bin": { "assembly": "bin/{configuration}/W.dll" } }"#,
            "/mods/widgets",
        );
        let manager = Arc::new(RecordingManager::default());
        let provider = provider(store, manager);

        let key = key("widgets", "net451", "Debug", "");
        assert_eq!(
            provider.get_library_export(&key),
            provider.get_library_export(&key)
        );
    }

    struct StubProvider(Option<LibraryExport>);

    impl ExportProvider for StubProvider {
        fn get_library_export(&self, _key: &LibraryKey) -> Option<LibraryExport> {
            self.0.clone()
        }
    }

    #[test]
    fn test_chain_returns_first_satisfied() {
        let chain = ExportProviderChain::new()
            .with_provider(Box::new(StubProvider(None)))
            .with_provider(Box::new(StubProvider(Some(canned_export()))))
            .with_provider(Box::new(StubProvider(Some(LibraryExport::default()))));

        let result = chain.get_library_export(&key("widgets", "net451", "Debug", ""));
        assert_eq!(result, Some(canned_export()));
    }

    #[test]
    fn test_chain_with_no_satisfied_provider() {
        let chain = ExportProviderChain::new()
            .with_provider(Box::new(StubProvider(None)))
            .with_provider(Box::new(StubProvider(None)));

        assert_eq!(
            chain.get_library_export(&key("widgets", "net451", "Debug", "")),
            None
        );
    }
}
