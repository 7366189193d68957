// Library keys: the identity of a requested export

use std::fmt;

use crate::framework::FrameworkRef;

/// Identity of a requested library export.
///
/// A key is a plain immutable value; re-keying a lookup goes through the
/// `with_*` methods, which copy the key with exactly one field replaced.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LibraryKey {
    /// Module name, as known to the project store.
    pub name: String,
    /// Requested target framework (may be a loose, version-less specifier).
    pub target_framework: FrameworkRef,
    /// Build configuration, substituted into templated output paths.
    pub configuration: String,
    /// Export flavor tag; empty selects the default flavor.
    pub aspect: String,
}

impl LibraryKey {
    pub fn new(
        name: impl Into<String>,
        target_framework: FrameworkRef,
        configuration: impl Into<String>,
        aspect: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            target_framework,
            configuration: configuration.into(),
            aspect: aspect.into(),
        }
    }

    /// Copy of this key addressing a different module name.
    pub fn with_name(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target_framework: self.target_framework.clone(),
            configuration: self.configuration.clone(),
            aspect: self.aspect.clone(),
        }
    }

    /// Copy of this key pinned to a different target framework.
    pub fn with_target_framework(&self, target_framework: FrameworkRef) -> Self {
        Self {
            name: self.name.clone(),
            target_framework,
            configuration: self.configuration.clone(),
            aspect: self.aspect.clone(),
        }
    }

    /// Copy of this key requesting a different export flavor.
    pub fn with_aspect(&self, aspect: impl Into<String>) -> Self {
        Self {
            name: self.name.clone(),
            target_framework: self.target_framework.clone(),
            configuration: self.configuration.clone(),
            aspect: aspect.into(),
        }
    }
}

impl fmt::Display for LibraryKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} ({}, {})",
            self.name, self.target_framework, self.configuration
        )?;
        if !self.aspect.is_empty() {
            write!(f, " [{}]", self.aspect)?;
        }
        Ok(())
    }
}
