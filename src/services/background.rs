//! Async facade that moves blocking repository work off the caller's task

use std::sync::Arc;

use crate::commands::{diff, staging};
use crate::error::{Result, TidelineError};
use crate::models::{DiffResult, Hunk, TreeDiff};
use crate::services::Repository;

/// Runs repository operations on tokio's blocking pool.
///
/// Every method resolves once the operation has finished. Dropping the
/// returned future does not stop work that has already started.
#[derive(Debug, Clone)]
pub struct BackgroundRunner {
    repo: Repository,
}

impl BackgroundRunner {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &Repository {
        &self.repo
    }

    pub async fn tree_diff(&self, target: String, parent: Option<String>) -> Result<Arc<TreeDiff>> {
        self.run(move |repo| diff::tree_diff(repo, &target, parent.as_deref()))
            .await
    }

    pub async fn diff(&self, path: String, target: String, parent: Option<String>) -> Result<DiffResult> {
        self.run(move |repo| diff::diff(repo, &path, &target, parent.as_deref()))
            .await
    }

    pub async fn staged_diff(&self, path: String) -> Result<DiffResult> {
        self.run(move |repo| diff::staged_diff(repo, &path)).await
    }

    pub async fn unstaged_diff(&self, path: String) -> Result<DiffResult> {
        self.run(move |repo| diff::unstaged_diff(repo, &path)).await
    }

    pub async fn hunks(&self, diff: DiffResult) -> Result<Vec<Hunk>> {
        self.run(move |repo| match diff.as_text() {
            Some(text) => text.hunks(repo),
            None => Ok(Vec::new()),
        })
        .await
    }

    pub async fn patch_file(&self, path: String, hunk: Hunk, stage: bool) -> Result<()> {
        self.run(move |repo| staging::patch_file(repo, &path, &hunk, stage))
            .await
    }

    async fn run<T, F>(&self, operation: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Repository) -> Result<T> + Send + 'static,
    {
        let repo = self.repo.clone();
        tokio::task::spawn_blocking(move || operation(&repo))
            .await
            .map_err(|e| TidelineError::OperationFailed(format!("Background task failed: {}", e)))?
    }
}
