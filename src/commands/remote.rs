//! Remote configuration

use crate::error::{Result, TidelineError};
use crate::models::Remote;
use crate::services::Repository;

/// All configured remotes
pub fn get_remotes(repo: &Repository) -> Result<Vec<Remote>> {
    let git = repo.git()?;
    let remotes = git.remotes()?;

    let mut result = Vec::new();
    for name in remotes.iter().flatten() {
        if let Ok(remote) = git.find_remote(name) {
            result.push(Remote {
                name: name.to_string(),
                url: remote.url().unwrap_or("").to_string(),
                push_url: remote.pushurl().map(|s| s.to_string()),
            });
        }
    }

    Ok(result)
}

pub fn add_remote(repo: &Repository, name: &str, url: &str) -> Result<Remote> {
    repo.perform_writing(|git| {
        let remote = git.remote(name, url)?;
        tracing::info!("Added remote {} ({})", name, url);
        Ok(Remote {
            name: name.to_string(),
            url: remote.url().unwrap_or(url).to_string(),
            push_url: remote.pushurl().map(|s| s.to_string()),
        })
    })
}

pub fn delete_remote(repo: &Repository, name: &str) -> Result<()> {
    repo.perform_writing(|git| {
        git.remote_delete(name)
            .map_err(|e| TidelineError::from_lookup(e, name.to_string()))?;
        tracing::info!("Deleted remote {}", name);
        Ok(())
    })
}

/// Rename a remote; refspecs that could not be rewritten are logged
pub fn rename_remote(repo: &Repository, old_name: &str, new_name: &str) -> Result<()> {
    repo.perform_writing(|git| {
        let problems = git
            .remote_rename(old_name, new_name)
            .map_err(|e| TidelineError::from_lookup(e, old_name.to_string()))?;
        for refspec in problems.iter().flatten() {
            tracing::warn!("Refspec {} was not renamed", refspec);
        }
        tracing::info!("Renamed remote {} to {}", old_name, new_name);
        Ok(())
    })
}

/// Fetch URL of `name`, or `None` when there is no such remote
pub fn remote_url(repo: &Repository, name: &str) -> Result<Option<String>> {
    let git = repo.git()?;
    let url = match git.find_remote(name) {
        Ok(remote) => Ok(remote.url().map(|s| s.to_string())),
        Err(e) if matches!(e.code(), git2::ErrorCode::NotFound | git2::ErrorCode::InvalidSpec) => {
            Ok(None)
        }
        Err(e) => Err(e.into()),
    };
    url
}
