//! Stash operations

use crate::error::Result;
use crate::models::Stash;
use crate::services::Repository;

const DEFAULT_MESSAGE: &str = "WIP";

/// All stashes, most recent first
pub fn get_stashes(repo: &Repository) -> Result<Vec<Stash>> {
    let mut git = repo.git()?;
    let mut stashes = Vec::new();

    git.stash_foreach(|index, message, oid| {
        stashes.push(Stash {
            index,
            message: message.to_string(),
            oid: oid.to_string(),
        });
        true
    })?;

    Ok(stashes)
}

/// Stash working tree and index changes
pub fn save_stash(repo: &Repository, message: Option<&str>, include_untracked: bool) -> Result<Stash> {
    repo.perform_writing(|git| {
        let signature = git.signature()?;

        let mut flags = git2::StashFlags::DEFAULT;
        if include_untracked {
            flags |= git2::StashFlags::INCLUDE_UNTRACKED;
        }

        let message = message.unwrap_or(DEFAULT_MESSAGE);
        let oid = git.stash_save(&signature, message, Some(flags))?;
        tracing::info!("Saved stash {}", oid);

        Ok(Stash {
            index: 0,
            message: message.to_string(),
            oid: oid.to_string(),
        })
    })
}

/// Apply a stash, restoring its staged changes to the index as well
pub fn apply_stash(repo: &Repository, index: usize) -> Result<()> {
    repo.perform_writing(|git| {
        let mut opts = git2::StashApplyOptions::new();
        opts.reinstantiate_index();
        git.stash_apply(index, Some(&mut opts))?;
        tracing::info!("Applied stash@{{{}}}", index);
        Ok(())
    })
}

/// Apply a stash like [`apply_stash`] and drop it on success
pub fn pop_stash(repo: &Repository, index: usize) -> Result<()> {
    repo.perform_writing(|git| {
        let mut opts = git2::StashApplyOptions::new();
        opts.reinstantiate_index();
        git.stash_pop(index, Some(&mut opts))?;
        tracing::info!("Popped stash@{{{}}}", index);
        Ok(())
    })
}

pub fn drop_stash(repo: &Repository, index: usize) -> Result<()> {
    repo.perform_writing(|git| {
        git.stash_drop(index)?;
        tracing::info!("Dropped stash@{{{}}}", index);
        Ok(())
    })
}

/// Commit recorded for `stash@{index}`, read from the stash reflog
pub fn commit_for_stash(repo: &Repository, index: usize) -> Result<Option<String>> {
    let git = repo.git()?;
    let reflog = git.reflog("refs/stash")?;
    Ok(reflog.get(index).map(|entry| entry.id_new().to_string()))
}
