//! Repository handle shared by every operation

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TidelineError};
use crate::services::{DiffCache, NameExtensionClassifier, TextClassifier, WriteLock};

/// Tunables for a [`Repository`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RepositoryOptions {
    /// Maximum number of commit tree diffs kept in memory
    pub diff_cache_capacity: usize,
    /// Context lines around each generated hunk
    pub context_lines: u32,
    /// Program used for operations delegated to the git executable
    pub git_executable: String,
}

impl Default for RepositoryOptions {
    fn default() -> Self {
        Self {
            diff_cache_capacity: DiffCache::DEFAULT_CAPACITY,
            context_lines: 3,
            git_executable: "git".to_string(),
        }
    }
}

/// An open repository together with the state its operations share: the
/// tree diff cache, the write lock and the text classification policy.
///
/// Cloning is cheap and clones share that state. Each operation opens its
/// own `git2::Repository` handle, so the index and refs are always read
/// fresh from disk.
#[derive(Clone)]
pub struct Repository {
    path: PathBuf,
    options: RepositoryOptions,
    diff_cache: Arc<DiffCache>,
    write_lock: Arc<WriteLock>,
    classifier: Arc<dyn TextClassifier>,
}

impl Repository {
    /// Open the repository containing `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_options(path, RepositoryOptions::default())
    }

    pub fn open_with_options(path: impl AsRef<Path>, options: RepositoryOptions) -> Result<Self> {
        let path = path.as_ref();
        let repo = git2::Repository::open(path)
            .map_err(|_| TidelineError::RepositoryNotFound(path.display().to_string()))?;
        let root = repo.workdir().unwrap_or_else(|| repo.path()).to_path_buf();

        tracing::debug!("Opened repository at {}", root.display());

        Ok(Self {
            path: root,
            diff_cache: Arc::new(DiffCache::new(options.diff_cache_capacity)),
            write_lock: Arc::new(WriteLock::new()),
            classifier: Arc::new(NameExtensionClassifier),
            options,
        })
    }

    /// Replace the text/binary classification policy
    pub fn with_classifier(mut self, classifier: impl TextClassifier + 'static) -> Self {
        self.classifier = Arc::new(classifier);
        self
    }

    /// Working directory, or the git directory for a bare repository
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn options(&self) -> &RepositoryOptions {
        &self.options
    }

    pub fn diff_cache(&self) -> &DiffCache {
        &self.diff_cache
    }

    pub fn write_lock(&self) -> &WriteLock {
        &self.write_lock
    }

    pub fn is_text_file(&self, path: &str) -> bool {
        self.classifier.is_text(path)
    }

    /// Open a fresh engine handle
    pub fn git(&self) -> Result<git2::Repository> {
        Ok(git2::Repository::open(&self.path)?)
    }

    /// Run a mutating operation inside the write lock with a fresh handle
    pub fn perform_writing<T>(
        &self,
        operation: impl FnOnce(&mut git2::Repository) -> Result<T>,
    ) -> Result<T> {
        self.write_lock.perform_writing(|| {
            let mut repo = self.git()?;
            operation(&mut repo)
        })
    }
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("path", &self.path)
            .field("options", &self.options)
            .field("cached_diffs", &self.diff_cache.len())
            .finish()
    }
}

/// Working directory of an engine handle
pub(crate) fn workdir(repo: &git2::Repository) -> Result<&Path> {
    repo.workdir()
        .ok_or_else(|| TidelineError::Unexpected("repository has no working directory".into()))
}

/// Parse a hex object id supplied by a caller
pub(crate) fn parse_oid(id: &str) -> Result<git2::Oid> {
    git2::Oid::from_str(id).map_err(|_| TidelineError::ObjectNotFound(id.to_string()))
}
