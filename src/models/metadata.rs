//! Asset metadata: caller-supplied descriptive fields and their validation.
//!
//! `AssetMetadata` mirrors the upload form verbatim (raw strings, tags as a
//! comma-separated line); `validate()` produces the typed record the finalize
//! call submits. Validation is all-or-nothing: finalize either submits the
//! full record or is rejected locally.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Maximum title length in characters, after trimming.
pub const MAX_TITLE_CHARS: usize = 100;
/// Maximum description length in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 1000;

/// Descriptive metadata as entered by the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetMetadata {
    pub title: String,
    pub description: String,
    /// Comma-separated tag line, e.g. `"tutorial, react ,go"`.
    pub tags: String,
    /// One of `public`, `unlisted`, `private`.
    pub visibility: String,
}

/// Fully validated metadata, ready for the finalize call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedMetadata {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub visibility: Visibility,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Visibility {
    Public,
    Unlisted,
    Private,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Unlisted => "unlisted",
            Visibility::Private => "private",
        }
    }
}

impl std::str::FromStr for Visibility {
    type Err = ValidationError;

    /// Strict parse: an unrecognized value is rejected rather than silently
    /// defaulted, since defaulting would hide caller bugs.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(Visibility::Public),
            "unlisted" => Ok(Visibility::Unlisted),
            "private" => Ok(Visibility::Private),
            _ => Err(ValidationError::Visibility),
        }
    }
}

/// Split a comma-separated tag line into an ordered tag list.
/// Entries are trimmed; empty entries are dropped.
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

impl AssetMetadata {
    /// Validate the full record. No partial application: the first failing
    /// field rejects the whole record and nothing is submitted.
    pub fn validate(&self) -> Result<ValidatedMetadata, ValidationError> {
        let title = self.title.trim();
        if title.is_empty() || title.chars().count() > MAX_TITLE_CHARS {
            return Err(ValidationError::Title);
        }
        if self.description.chars().count() > MAX_DESCRIPTION_CHARS {
            return Err(ValidationError::Description);
        }
        let visibility: Visibility = self.visibility.parse()?;

        Ok(ValidatedMetadata {
            title: title.to_string(),
            description: self.description.clone(),
            tags: parse_tags(&self.tags),
            visibility,
        })
    }
}
