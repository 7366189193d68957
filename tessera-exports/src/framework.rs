// Target framework references and nearest-match negotiation

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

/// Framework parse error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FrameworkError {
    #[error("invalid framework moniker: {0}")]
    InvalidMoniker(String),
}

/// Framework version: up to a handful of numeric components, ordered
/// lexicographically. Trailing zero components are insignificant, so
/// `4.5` and `4.5.0` compare equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameworkVersion(Vec<u32>);

impl FrameworkVersion {
    pub fn new(parts: impl Into<Vec<u32>>) -> Self {
        let mut parts = parts.into();
        while parts.last() == Some(&0) {
            parts.pop();
        }
        Self(parts)
    }

    pub fn parts(&self) -> &[u32] {
        &self.0
    }
}

impl fmt::Display for FrameworkVersion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "0");
        }
        let mut first = true;
        for part in &self.0 {
            if !first {
                write!(f, ".")?;
            }
            write!(f, "{}", part)?;
            first = false;
        }
        Ok(())
    }
}

/// A target framework reference: an identifier plus an optional version.
///
/// A reference without a version is a *loose* specifier: it matches any
/// declared version of the same identifier during negotiation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FrameworkRef {
    pub identifier: String,
    pub version: Option<FrameworkVersion>,
}

impl FrameworkRef {
    pub fn new(identifier: impl Into<String>, version: FrameworkVersion) -> Self {
        Self {
            identifier: identifier.into(),
            version: Some(version),
        }
    }

    /// A version-less specifier that matches any declared version.
    pub fn loose(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            version: None,
        }
    }

    pub fn is_loose(&self) -> bool {
        self.version.is_none()
    }
}

fn moniker_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^([A-Za-z]+)(\d+(?:\.\d+)*)?$").expect("moniker pattern compiles")
    })
}

impl FromStr for FrameworkRef {
    type Err = FrameworkError;

    /// Parses a framework moniker.
    ///
    /// Undotted version digits are one component each (`net451` is net
    /// 4.5.1), dotted versions are positional (`net10.0` is net 10.0).
    /// A bare identifier (`net`) parses as a loose specifier.
    fn from_str(moniker: &str) -> Result<Self, FrameworkError> {
        let invalid = || FrameworkError::InvalidMoniker(moniker.to_string());
        let captures = moniker_pattern().captures(moniker).ok_or_else(invalid)?;

        let identifier = captures
            .get(1)
            .map(|m| m.as_str().to_string())
            .ok_or_else(invalid)?;

        let version = match captures.get(2) {
            Some(digits) => {
                let digits = digits.as_str();
                let parts: Vec<u32> = if digits.contains('.') {
                    digits
                        .split('.')
                        .map(|part| part.parse::<u32>())
                        .collect::<Result<_, _>>()
                        .map_err(|_| invalid())?
                } else {
                    digits.chars().filter_map(|c| c.to_digit(10)).collect()
                };
                Some(FrameworkVersion::new(parts))
            }
            None => None,
        };

        Ok(Self {
            identifier,
            version,
        })
    }
}

impl fmt::Display for FrameworkRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.identifier)?;
        if let Some(version) = &self.version {
            write!(f, "{}", version)?;
        }
        Ok(())
    }
}

/// Whether a declared framework can satisfy a requested one.
///
/// Identifiers must match exactly; there is no cross-identifier
/// compatibility at this layer. A loose request accepts any declared
/// version, and a version-less declaration satisfies any request.
pub fn is_compatible(requested: &FrameworkRef, declared: &FrameworkRef) -> bool {
    if requested.identifier != declared.identifier {
        return false;
    }
    match (&requested.version, &declared.version) {
        (None, _) | (_, None) => true,
        (Some(requested), Some(declared)) => declared <= requested,
    }
}

/// Picks the nearest declared framework for a request: the highest
/// compatible version. An exact match therefore always wins. Returns
/// `None` when nothing declared is compatible.
pub fn nearest_match<'a, I>(requested: &FrameworkRef, declared: I) -> Option<&'a FrameworkRef>
where
    I: IntoIterator<Item = &'a FrameworkRef>,
{
    declared
        .into_iter()
        .filter(|candidate| is_compatible(requested, candidate))
        .max_by(|a, b| a.version.cmp(&b.version))
}
