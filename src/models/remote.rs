//! Remote and submodule models

use serde::{Deserialize, Serialize};

/// Remote repository information
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Remote {
    pub name: String,
    pub url: String,
    pub push_url: Option<String>,
}

/// Submodule information
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submodule {
    pub name: String,
    /// Path relative to the repo root
    pub path: String,
    pub url: Option<String>,
    /// Commit recorded in the superproject's HEAD
    pub head_oid: Option<String>,
    /// Commit checked out in the submodule's working directory
    pub workdir_oid: Option<String>,
}
