//! Working tree and index status

use std::path::Path;

use crate::error::{Result, TidelineError};
use crate::models::{FileStatus, StatusEntry};
use crate::services::Repository;

/// Two-part status of `path`, read fresh from the engine
pub fn file_status(repo: &Repository, path: &str) -> Result<FileStatus> {
    let git = repo.git()?;
    read_status(&git, path)?.ok_or_else(|| TidelineError::NotFound {
        path: path.to_string(),
        origin: "working copy, index or HEAD".to_string(),
    })
}

/// Every path with a change on either side, untracked files included
pub fn get_status(repo: &Repository) -> Result<Vec<StatusEntry>> {
    let git = repo.git()?;

    let mut opts = git2::StatusOptions::new();
    opts.include_untracked(true)
        .recurse_untracked_dirs(true)
        .include_ignored(false)
        .include_unmodified(false);

    let statuses = git.statuses(Some(&mut opts))?;
    let entries = statuses
        .iter()
        .filter_map(|entry| {
            let path = entry.path()?.to_string();
            Some(StatusEntry {
                path,
                status: FileStatus::from(entry.status()),
            })
        })
        .collect();

    Ok(entries)
}

/// Status of `path`; `None` when the path exists in none of HEAD, index or disk
pub(crate) fn read_status(repo: &git2::Repository, path: &str) -> Result<Option<FileStatus>> {
    match repo.status_file(Path::new(path)) {
        Ok(status) => Ok(Some(FileStatus::from(status))),
        Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}
