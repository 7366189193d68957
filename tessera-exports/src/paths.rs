// Output path templating: separator normalization and {configuration} substitution

use std::path::{Path, PathBuf};

/// The literal token substituted with the build configuration.
pub const CONFIGURATION_TOKEN: &str = "{configuration}";

/// Separator convention for stored relative paths.
///
/// Manifests written on one platform routinely carry the other platform's
/// separators; templating is parameterized by the convention instead of
/// branching on the host, so it resolves the same way everywhere and is
/// testable on any platform. `host()` picks the running platform's style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeparatorStyle {
    ForwardSlash,
    Backslash,
}

impl SeparatorStyle {
    /// The running platform's convention.
    pub fn host() -> Self {
        if std::path::MAIN_SEPARATOR == '/' {
            SeparatorStyle::ForwardSlash
        } else {
            SeparatorStyle::Backslash
        }
    }

    fn separator(self) -> char {
        match self {
            SeparatorStyle::ForwardSlash => '/',
            SeparatorStyle::Backslash => '\\',
        }
    }

    /// Rewrites foreign separators to this convention's. Exactly one
    /// direction of substitution per call, never both.
    fn normalize(self, path: &str) -> String {
        match self {
            SeparatorStyle::ForwardSlash => path.replace('\\', "/"),
            SeparatorStyle::Backslash => path.replace('/', "\\"),
        }
    }

    /// Whether a normalized path is already rooted under this convention.
    fn is_rooted(self, path: &str) -> bool {
        if path.starts_with(self.separator()) {
            return true;
        }
        // Drive-letter prefix, e.g. "C:\..."
        self == SeparatorStyle::Backslash && path.as_bytes().get(1) == Some(&b':')
    }
}

/// Resolves a project's templated relative output path against its root.
///
/// Returns `None` for an absent or empty relative path (the symbol file is
/// optional). Separators are normalized to `style`, every occurrence of
/// `{configuration}` is substituted, and the result is joined onto `root`
/// without doubling separators. A relative path that is already rooted is
/// returned as-is. No filesystem check happens here: the resolved file may
/// not exist yet.
pub fn resolve_output_path(
    root: &Path,
    configuration: &str,
    relative: Option<&str>,
    style: SeparatorStyle,
) -> Option<PathBuf> {
    let relative = relative?;
    if relative.is_empty() {
        return None;
    }

    let templated = style
        .normalize(relative)
        .replace(CONFIGURATION_TOKEN, configuration);

    Some(join(root, &templated, style))
}

fn join(root: &Path, relative: &str, style: SeparatorStyle) -> PathBuf {
    if style.is_rooted(relative) {
        return PathBuf::from(relative);
    }

    let separator = style.separator();
    let mut joined = root.to_string_lossy().into_owned();
    if !joined.is_empty() && !joined.ends_with(separator) {
        joined.push(separator);
    }
    joined.push_str(relative);
    PathBuf::from(joined)
}
