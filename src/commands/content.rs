//! Resolving file content from commits, the index and the working tree

use std::fmt;
use std::path::Path;

use crate::error::{Result, TidelineError};
use crate::models::ContentSource;
use crate::services::repository::{parse_oid, workdir};
use crate::services::Repository;

/// Where to read a file's bytes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentOrigin {
    /// The tree of the given commit
    Commit(git2::Oid),
    /// The index
    Staged,
    /// The file on disk
    WorkingCopy,
    /// An explicit empty buffer
    Empty,
}

impl fmt::Display for ContentOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentOrigin::Commit(oid) => write!(f, "commit {}", oid),
            ContentOrigin::Staged => write!(f, "index"),
            ContentOrigin::WorkingCopy => write!(f, "working copy"),
            ContentOrigin::Empty => write!(f, "empty buffer"),
        }
    }
}

/// Resolve `path` in `origin`, failing with `NotFound` when it is absent there
pub fn resolve_content(repo: &Repository, path: &str, origin: &ContentOrigin) -> Result<ContentSource> {
    let git = repo.git()?;
    locate_content(&git, path, origin)?.ok_or_else(|| TidelineError::NotFound {
        path: path.to_string(),
        origin: origin.to_string(),
    })
}

/// Resolve the bytes of `path` at the commit named by `commit_oid`
pub fn file_contents_at(repo: &Repository, path: &str, commit_oid: &str) -> Result<Vec<u8>> {
    let origin = ContentOrigin::Commit(parse_oid(commit_oid)?);
    let git = repo.git()?;
    resolve_content(repo, path, &origin)?.load(&git)
}

/// Resolve `path` in `origin`; `None` means the file does not exist there
pub(crate) fn locate_content(
    repo: &git2::Repository,
    path: &str,
    origin: &ContentOrigin,
) -> Result<Option<ContentSource>> {
    match origin {
        ContentOrigin::Commit(oid) => {
            let commit = find_commit(repo, *oid)?;
            Ok(committed_blob(&commit, path)?.map(ContentSource::CommittedBlob))
        }
        ContentOrigin::Staged => Ok(staged_blob(repo, path)?.map(ContentSource::CommittedBlob)),
        ContentOrigin::WorkingCopy => Ok(workspace_bytes(repo, path)?.map(ContentSource::Literal)),
        ContentOrigin::Empty => Ok(Some(ContentSource::empty())),
    }
}

pub(crate) fn find_commit(repo: &git2::Repository, oid: git2::Oid) -> Result<git2::Commit<'_>> {
    repo.find_commit(oid)
        .map_err(|e| TidelineError::from_lookup(e, oid.to_string()))
}

/// Blob id of `path` in the commit's tree, walking one tree level per path component
pub(crate) fn committed_blob(commit: &git2::Commit, path: &str) -> Result<Option<git2::Oid>> {
    let tree = commit
        .tree()
        .map_err(|e| TidelineError::Unexpected(format!("commit {} has no tree: {}", commit.id(), e)))?;

    match tree.get_path(Path::new(path)) {
        Ok(entry) if entry.kind() == Some(git2::ObjectType::Blob) => Ok(Some(entry.id())),
        Ok(_) => Ok(None),
        Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Blob id of the stage-0 index entry for `path`, read from a refreshed index
pub(crate) fn staged_blob(repo: &git2::Repository, path: &str) -> Result<Option<git2::Oid>> {
    let mut index = repo.index()?;
    index.read(true)?;
    Ok(index.get_path(Path::new(path), 0).map(|entry| entry.id))
}

/// Bytes of the working copy of `path`; a missing file is `None`, any other
/// read failure is an I/O error
pub(crate) fn workspace_bytes(repo: &git2::Repository, path: &str) -> Result<Option<Vec<u8>>> {
    let full_path = workdir(repo)?.join(path);
    match std::fs::read(&full_path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}
