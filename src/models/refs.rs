//! Ref models: tags and stashes

use serde::{Deserialize, Serialize};

/// Git signature (tagger)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signature {
    pub name: String,
    pub email: String,
    pub timestamp: i64,
}

impl From<git2::Signature<'_>> for Signature {
    fn from(sig: git2::Signature) -> Self {
        Signature {
            name: sig.name().unwrap_or("Unknown").to_string(),
            email: sig.email().unwrap_or("").to_string(),
            timestamp: sig.when().seconds(),
        }
    }
}

/// Tag information
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    /// Name without the `refs/tags/` prefix
    pub name: String,
    pub target_oid: String,
    /// `None` for lightweight tags
    pub message: Option<String>,
    pub tagger: Option<Signature>,
    pub is_annotated: bool,
}

/// Stash entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stash {
    pub index: usize,
    pub message: String,
    pub oid: String,
}
