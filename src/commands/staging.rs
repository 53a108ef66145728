//! Staging coordinator: moving hunks and whole files between the working
//! tree and the index

use std::path::Path;

use crate::commands::diff::head_commit;
use crate::commands::patch::apply_hunk_bytes;
use crate::commands::status::read_status;
use crate::error::{Result, TidelineError};
use crate::models::{FileStatus, Hunk, StatusCode};
use crate::services::repository::workdir;
use crate::services::Repository;
use crate::utils::run_git;

/// Stage (`stage == true`) or unstage a single hunk of `path`.
///
/// Hunks that begin at line 1 of a file that is new or deleted on the side
/// being moved are handled as whole-file operations. Everything else is
/// applied line by line to the bytes of the staged blob and written back to
/// the index.
pub fn patch_file(repo: &Repository, path: &str, hunk: &Hunk, stage: bool) -> Result<()> {
    repo.perform_writing(|git| {
        let mut index = git.index()?;
        index.read(true)?;
        let entry = index.get_path(Path::new(path), 0);
        let status = read_status(git, path)?;

        let whole_file = match (&entry, status) {
            (Some(_), Some(status)) if hunk.old_start == 1 || hunk.new_start == 1 => {
                if stage {
                    status.workspace == StatusCode::Deleted
                } else {
                    matches!(status.index, StatusCode::Added | StatusCode::Deleted)
                }
            }
            (Some(_), _) => false,
            (None, Some(status)) => {
                if stage && status.is_untracked() && hunk.new_start == 1 {
                    true
                } else if !stage && status.index == StatusCode::Deleted && hunk.old_start == 1 {
                    true
                } else {
                    return Err(incoherent(path, status, stage));
                }
            }
            (None, None) => {
                return Err(TidelineError::Mismatch(format!(
                    "{} is not present in the index or working copy",
                    path
                )))
            }
        };

        if whole_file {
            tracing::debug!("Hunk covers all of {}, moving whole file", path);
            if stage {
                stage_path(git, path)?;
            } else {
                unstage_path(git, path)?;
            }
        } else if let Some(mut entry) = entry {
            tracing::debug!("Patching staged blob of {}", path);
            let blob = git.find_blob(entry.id)?;
            let bytes = apply_hunk_bytes(hunk, blob.content(), !stage)?;

            // Force the next status to re-hash the working copy
            entry.mtime = git2::IndexTime::new(0, 0);
            entry.ctime = git2::IndexTime::new(0, 0);
            index.add_frombuffer(&entry, &bytes)?;
            index.write()?;
        }

        tracing::info!(
            "{} hunk {} of {}",
            if stage { "Staged" } else { "Unstaged" },
            hunk.header(),
            path
        );
        Ok(())
    })
}

/// Copy the working copy of `path` into the index, or remove it from the
/// index when the file is gone from disk
pub fn stage_file(repo: &Repository, path: &str) -> Result<()> {
    repo.perform_writing(|git| {
        stage_path(git, path)?;
        tracing::info!("Staged {}", path);
        Ok(())
    })
}

/// Reset the index entry of `path` to HEAD
pub fn unstage_file(repo: &Repository, path: &str) -> Result<()> {
    repo.perform_writing(|git| {
        unstage_path(git, path)?;
        tracing::info!("Unstaged {}", path);
        Ok(())
    })
}

/// Reset the whole index to HEAD's tree
pub fn unstage_all(repo: &Repository) -> Result<()> {
    repo.perform_writing(|git| {
        let mut index = git.index()?;
        match head_commit(git)? {
            Some(head) => index.read_tree(&head.tree()?)?,
            None => index.clear()?,
        }
        index.write()?;
        tracing::info!("Unstaged all changes");
        Ok(())
    })
}

/// Apply unified diff text to the index
pub fn stage_patch(repo: &Repository, patch: &str) -> Result<()> {
    apply_patch_text(repo, patch, &["apply", "--cached"], "Staged patch")
}

/// Reverse-apply unified diff text to the index
pub fn unstage_patch(repo: &Repository, patch: &str) -> Result<()> {
    apply_patch_text(repo, patch, &["apply", "--cached", "--reverse"], "Unstaged patch")
}

/// Reverse-apply unified diff text to the working copy
pub fn discard_patch(repo: &Repository, patch: &str) -> Result<()> {
    apply_patch_text(repo, patch, &["apply", "--reverse"], "Discarded patch")
}

fn apply_patch_text(repo: &Repository, patch: &str, args: &[&str], done: &str) -> Result<()> {
    repo.perform_writing(|git| {
        run_git(
            &repo.options().git_executable,
            workdir(git)?,
            args,
            Some(patch),
        )?;
        tracing::info!("{}", done);
        Ok(())
    })
}

fn stage_path(repo: &git2::Repository, path: &str) -> Result<()> {
    let mut index = repo.index()?;
    index.read(true)?;
    if workdir(repo)?.join(path).exists() {
        index.add_path(Path::new(path))?;
    } else {
        index.remove_path(Path::new(path))?;
    }
    index.write()?;
    Ok(())
}

fn unstage_path(repo: &git2::Repository, path: &str) -> Result<()> {
    if let Some(head) = head_commit(repo)? {
        if head.tree()?.get_path(Path::new(path)).is_ok() {
            repo.reset_default(Some(head.as_object()), [Path::new(path)])?;
            return Ok(());
        }
    }

    let mut index = repo.index()?;
    index.read(true)?;
    index.remove_path(Path::new(path))?;
    index.write()?;
    Ok(())
}

fn incoherent(path: &str, status: FileStatus, stage: bool) -> TidelineError {
    TidelineError::Mismatch(format!(
        "cannot {} a partial hunk of {} ({:?} in index, {:?} in working copy)",
        if stage { "stage" } else { "unstage" },
        path,
        status.index,
        status.workspace
    ))
}
