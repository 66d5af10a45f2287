//! Model reference grammar: `owner/name` or `owner/name:version`.

use std::fmt;
use std::str::FromStr;

use skiff_types::ProviderError;

/// A parsed Replicate model reference.
///
/// The version, when present, is everything after the first `:` in the
/// reference string. Routing depends on it: versioned references go to the
/// generic predictions endpoint with the version in the body, unversioned
/// ones to the model-scoped endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRef {
    /// Account that owns the model.
    pub owner: String,
    /// Model name.
    pub name: String,
    /// Pinned model version, if any.
    pub version: Option<String>,
}

impl FromStr for ModelRef {
    type Err = ProviderError;

    /// Parse a reference string. Pure; no side effects.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::InvalidModelRef`] when the string does not
    /// match `owner/name` or `owner/name:version` — owner and name must be
    /// non-empty and contain no `/`, and a `:` must be followed by a
    /// non-empty version.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ProviderError::InvalidModelRef {
            reference: s.to_string(),
        };

        let (head, version) = match s.split_once(':') {
            Some((head, version)) => (head, Some(version)),
            None => (s, None),
        };

        let (owner, name) = head.split_once('/').ok_or_else(invalid)?;
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return Err(invalid());
        }
        if version.is_some_and(str::is_empty) {
            return Err(invalid());
        }

        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
            version: version.map(str::to_string),
        })
    }
}

impl fmt::Display for ModelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)?;
        if let Some(version) = &self.version {
            write!(f, ":{version}")?;
        }
        Ok(())
    }
}
