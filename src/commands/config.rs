//! Repository configuration and application settings
//!
//! `RepoConfig` reads the git configuration visible to the repository.
//! `AppSettings` is a private key/value store kept inside the git directory.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::services::Repository;

const SETTINGS_FILE: &str = "tideline-config.json";

/// Read accessors over the repository's git configuration
pub struct RepoConfig {
    config: git2::Config,
}

impl RepoConfig {
    pub fn open(repo: &Repository) -> Result<Self> {
        let git = repo.git()?;
        Ok(Self {
            config: git.config()?,
        })
    }

    pub fn user_name(&self) -> Option<String> {
        self.string("user.name")
    }

    pub fn user_email(&self) -> Option<String> {
        self.string("user.email")
    }

    /// `fetch.prune`, false when unset
    pub fn fetch_prune(&self) -> bool {
        self.bool("fetch.prune").unwrap_or(false)
    }

    /// `remote.<remote>.prune` when set, otherwise `fetch.prune`
    pub fn fetch_prune_for(&self, remote: &str) -> bool {
        self.bool(&format!("remote.{}.prune", remote))
            .unwrap_or_else(|| self.fetch_prune())
    }

    /// Whether fetching from `remote` should download tags.
    ///
    /// A `--no-tags` tag option on the remote disables it, otherwise the
    /// application's own default applies.
    pub fn fetch_tags(&self, remote: &str, default: bool) -> bool {
        match self.string(&format!("remote.{}.tagOpt", remote)).as_deref() {
            Some("--no-tags") => false,
            _ => default,
        }
    }

    pub fn commit_template(&self) -> Option<String> {
        self.string("commit.template")
    }

    pub fn remote_url(&self, remote: &str) -> Option<String> {
        self.string(&format!("remote.{}.url", remote))
    }

    fn string(&self, key: &str) -> Option<String> {
        self.config.get_string(key).ok()
    }

    fn bool(&self, key: &str) -> Option<bool> {
        self.config.get_bool(key).ok()
    }
}

/// Application settings stored as JSON in the git directory
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppSettings {
    values: BTreeMap<String, String>,
}

impl AppSettings {
    /// Load the settings of `repo`.
    ///
    /// A missing file yields empty settings. So does an unreadable or corrupt
    /// one, after logging the problem.
    pub fn load(repo: &Repository) -> Result<Self> {
        let path = settings_path(repo)?;

        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                tracing::warn!("Can't read {}: {}", path.display(), e);
                return Ok(Self::default());
            }
        };

        match serde_json::from_str(&contents) {
            Ok(settings) => Ok(settings),
            Err(e) => {
                tracing::warn!("Ignoring corrupt settings in {}: {}", path.display(), e);
                Ok(Self::default())
            }
        }
    }

    /// Write the settings back, replacing the file atomically
    pub fn save(&self, repo: &Repository) -> Result<()> {
        let path = settings_path(repo)?;
        let payload = serde_json::to_string_pretty(self)?;

        repo.write_lock().perform_writing(|| write_atomic(&path, &payload))?;
        tracing::info!("Saved settings to {}", path.display());
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.values.remove(key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn settings_path(repo: &Repository) -> Result<PathBuf> {
    Ok(repo.git()?.path().join(SETTINGS_FILE))
}

fn write_atomic(path: &Path, payload: &str) -> Result<()> {
    let tmp_path = path.with_extension(format!("json.tmp.{}", std::process::id()));

    let mut file = fs::File::create(&tmp_path)?;
    file.write_all(payload.as_bytes())?;
    file.write_all(b"\n")?;
    file.sync_all()?;
    drop(file);

    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }
    Ok(())
}
