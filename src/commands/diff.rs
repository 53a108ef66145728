//! Diff resolution: commit tree diffs, per-file content diffs and hunk generation

use std::sync::Arc;

use crate::commands::content::{
    committed_blob, find_commit, staged_blob, workspace_bytes,
};
use crate::error::{Result, TidelineError};
use crate::models::{
    ContentSource, DiffResult, Hunk, HunkLine, HunkLineKind, StatusCode, TextDiff, TreeDelta,
    TreeDiff,
};
use crate::services::repository::parse_oid;
use crate::services::{DiffKey, Repository};
use crate::utils::{detect_encoding, TextEncoding};

/// Diff of a commit's tree against one of its parents.
///
/// Without `parent` the first listed parent is used, or the empty tree for a
/// root commit. Results are served from the repository's diff cache.
pub fn tree_diff(repo: &Repository, target: &str, parent: Option<&str>) -> Result<Arc<TreeDiff>> {
    let target_oid = parse_oid(target)?;
    let parent_oid = parent.map(parse_oid).transpose()?;
    let key = DiffKey::new(target_oid, parent_oid);

    if let Some(cached) = repo.diff_cache().get(&key) {
        tracing::debug!("Tree diff cache hit for {}", target_oid);
        return Ok(cached);
    }
    tracing::debug!("Tree diff cache miss for {}", target_oid);

    let git = repo.git()?;
    let commit = find_commit(&git, target_oid)?;
    let parent_commit = resolve_parent(&git, &commit, parent_oid)?;

    let new_tree = commit
        .tree()
        .map_err(|e| TidelineError::Unexpected(format!("commit {} has no tree: {}", target_oid, e)))?;
    let old_tree = parent_commit.as_ref().map(|p| p.tree()).transpose()?;

    let mut diff = git.diff_tree_to_tree(old_tree.as_ref(), Some(&new_tree), None)?;
    diff.find_similar(None)?;

    let deltas = diff.deltas().map(tree_delta).collect();
    let result = Arc::new(TreeDiff {
        target: target_oid.to_string(),
        parent: parent_commit.map(|p| p.id().to_string()),
        deltas,
    });

    repo.diff_cache().put(key, result.clone());
    Ok(result)
}

/// The change recorded for `path` in the commit's tree diff, if any
pub fn commit_file_delta(
    repo: &Repository,
    path: &str,
    target: &str,
    parent: Option<&str>,
) -> Result<Option<TreeDelta>> {
    Ok(tree_diff(repo, target, parent)?.delta(path).cloned())
}

/// Diff `path` at commit `target` against its parent.
///
/// A side where the file does not exist is an empty buffer, so additions
/// and deletions come out as whole-file hunks.
pub fn diff(repo: &Repository, path: &str, target: &str, parent: Option<&str>) -> Result<DiffResult> {
    if !repo.is_text_file(path) {
        return Ok(DiffResult::Binary);
    }

    let git = repo.git()?;
    let commit = find_commit(&git, parse_oid(target)?)?;
    let parent_oid = parent.map(parse_oid).transpose()?;
    let parent_commit = resolve_parent(&git, &commit, parent_oid)?;

    let to = committed_blob(&commit, path)?
        .map(ContentSource::CommittedBlob)
        .unwrap_or_else(ContentSource::empty);
    let from = match parent_commit {
        Some(parent) => committed_blob(&parent, path)?
            .map(ContentSource::CommittedBlob)
            .unwrap_or_else(ContentSource::empty),
        None => ContentSource::empty(),
    };

    Ok(text_diff(from, to, path))
}

/// Diff of `path` between HEAD and the index
pub fn staged_diff(repo: &Repository, path: &str) -> Result<DiffResult> {
    if !repo.is_text_file(path) {
        return Ok(DiffResult::Binary);
    }

    let git = repo.git()?;
    let head_blob = match head_commit(&git)? {
        Some(head) => committed_blob(&head, path)?,
        None => None,
    };

    let from = head_blob
        .map(ContentSource::CommittedBlob)
        .unwrap_or_else(ContentSource::empty);
    let to = staged_blob(&git, path)?
        .map(ContentSource::CommittedBlob)
        .unwrap_or_else(ContentSource::empty);

    Ok(text_diff(from, to, path))
}

/// Diff of `path` between the index and the working copy
pub fn unstaged_diff(repo: &Repository, path: &str) -> Result<DiffResult> {
    if !repo.is_text_file(path) {
        return Ok(DiffResult::Binary);
    }

    let git = repo.git()?;
    let to = ContentSource::Literal(workspace_bytes(&git, path)?.unwrap_or_default());
    let from = staged_blob(&git, path)?
        .map(ContentSource::CommittedBlob)
        .unwrap_or_else(ContentSource::empty);

    Ok(text_diff(from, to, path))
}

impl TextDiff {
    /// Resolve both sides and split the difference into hunks.
    ///
    /// The diff runs over the raw bytes and never second-guesses the text
    /// classification, so NUL bytes or a change of encoding still produce
    /// hunks. Line text is decoded with the encoding of the side it comes from.
    pub fn hunks(&self, repo: &Repository) -> Result<Vec<Hunk>> {
        let git = repo.git()?;
        let old = self.from.load(&git)?;
        let new = self.to.load(&git)?;
        let old_encoding = detect_encoding(&old);
        let new_encoding = detect_encoding(&new);

        let mut opts = git2::DiffOptions::new();
        opts.context_lines(repo.options().context_lines);
        opts.force_text(true);

        let patch = git2::Patch::from_buffers(
            &old,
            Some(std::path::Path::new(&self.path)),
            &new,
            Some(std::path::Path::new(&self.path)),
            Some(&mut opts),
        )?;

        let mut hunks = Vec::with_capacity(patch.num_hunks());
        for hunk_idx in 0..patch.num_hunks() {
            let (header, line_count) = patch.hunk(hunk_idx)?;
            let (old_start, old_lines) = (header.old_start(), header.old_lines());
            let (new_start, new_lines) = (header.new_start(), header.new_lines());

            let mut lines = Vec::with_capacity(line_count);
            for line_idx in 0..line_count {
                let line = patch.line_in_hunk(hunk_idx, line_idx)?;
                // EOF newline markers carry no content of their own
                let Some(kind) = HunkLineKind::from_origin(line.origin()) else {
                    continue;
                };
                let encoding = if kind == HunkLineKind::Addition {
                    new_encoding
                } else {
                    old_encoding
                };
                lines.push(hunk_line(kind, line.content(), encoding));
            }

            hunks.push(Hunk {
                path: self.path.clone(),
                old_start,
                old_lines,
                new_start,
                new_lines,
                lines,
            });
        }

        Ok(hunks)
    }
}

/// Build a hunk line from the raw bytes git reported, terminator included
fn hunk_line(kind: HunkLineKind, bytes: &[u8], encoding: TextEncoding) -> HunkLine {
    let missing_newline = !bytes.ends_with(b"\n");
    let bytes = match bytes.strip_suffix(b"\n") {
        Some(line) => line.strip_suffix(b"\r").unwrap_or(line),
        None => bytes,
    };

    let content = encoding.decode_line(bytes);
    let raw = (content.as_bytes() != bytes).then(|| bytes.to_vec());
    HunkLine {
        kind,
        content,
        raw,
        missing_newline,
    }
}

fn text_diff(from: ContentSource, to: ContentSource, path: &str) -> DiffResult {
    DiffResult::Text(TextDiff {
        from,
        to,
        path: path.to_string(),
    })
}

/// Explicit parents are looked up directly; otherwise the first listed parent
fn resolve_parent<'r>(
    repo: &'r git2::Repository,
    commit: &git2::Commit<'r>,
    parent: Option<git2::Oid>,
) -> Result<Option<git2::Commit<'r>>> {
    match parent {
        Some(oid) => find_commit(repo, oid).map(Some),
        None => Ok(commit.parents().next()),
    }
}

pub(crate) fn head_commit(repo: &git2::Repository) -> Result<Option<git2::Commit<'_>>> {
    match repo.head() {
        Ok(head) => Ok(Some(head.peel_to_commit()?)),
        Err(e) if matches!(e.code(), git2::ErrorCode::UnbornBranch | git2::ErrorCode::NotFound) => {
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

fn tree_delta(delta: git2::DiffDelta<'_>) -> TreeDelta {
    let new_path = file_path(&delta.new_file());
    let old_path = file_path(&delta.old_file());

    let status = match delta.status() {
        git2::Delta::Added => StatusCode::Added,
        git2::Delta::Deleted => StatusCode::Deleted,
        git2::Delta::Renamed => StatusCode::Renamed,
        git2::Delta::Copied => StatusCode::Copied,
        git2::Delta::Untracked => StatusCode::Untracked,
        git2::Delta::Ignored => StatusCode::Ignored,
        git2::Delta::Conflicted => StatusCode::Conflicted,
        git2::Delta::Unmodified => StatusCode::Unmodified,
        _ => StatusCode::Modified,
    };

    TreeDelta {
        path: new_path.clone().or_else(|| old_path.clone()).unwrap_or_default(),
        old_path: if old_path != new_path { old_path } else { None },
        status,
        old_oid: file_oid(&delta.old_file()),
        new_oid: file_oid(&delta.new_file()),
    }
}

fn file_path(file: &git2::DiffFile<'_>) -> Option<String> {
    file.path().map(|p| p.to_string_lossy().to_string())
}

/// Object id of one side of a delta; the zero id marks a missing side
fn file_oid(file: &git2::DiffFile<'_>) -> Option<String> {
    let id = file.id();
    (!id.is_zero()).then(|| id.to_string())
}
