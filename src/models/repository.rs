//! Repository status models

use serde::{Deserialize, Serialize};

/// Change state of one side of a file's status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatusCode {
    Unmodified,
    Added,
    Deleted,
    Modified,
    Renamed,
    Copied,
    Untracked,
    Ignored,
    Conflicted,
}

/// Two-part status of a file.
///
/// `index` describes the index relative to HEAD, `workspace` describes the
/// working tree relative to the index. Both halves are computed fresh for
/// every query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileStatus {
    pub index: StatusCode,
    pub workspace: StatusCode,
}

impl FileStatus {
    pub const UNMODIFIED: FileStatus = FileStatus {
        index: StatusCode::Unmodified,
        workspace: StatusCode::Unmodified,
    };

    pub fn is_untracked(&self) -> bool {
        self.workspace == StatusCode::Untracked
    }
}

impl From<git2::Status> for FileStatus {
    fn from(status: git2::Status) -> Self {
        if status.is_conflicted() {
            return FileStatus {
                index: StatusCode::Conflicted,
                workspace: StatusCode::Conflicted,
            };
        }
        if status.is_ignored() {
            return FileStatus {
                index: StatusCode::Ignored,
                workspace: StatusCode::Ignored,
            };
        }
        // A workspace file that the index has never seen is untracked on both sides
        if status.is_wt_new() && !status.intersects(index_flags()) {
            return FileStatus {
                index: StatusCode::Untracked,
                workspace: StatusCode::Untracked,
            };
        }

        let index = if status.is_index_new() {
            StatusCode::Added
        } else if status.is_index_deleted() {
            StatusCode::Deleted
        } else if status.is_index_renamed() {
            StatusCode::Renamed
        } else if status.is_index_modified() || status.is_index_typechange() {
            StatusCode::Modified
        } else {
            StatusCode::Unmodified
        };

        let workspace = if status.is_wt_new() {
            StatusCode::Untracked
        } else if status.is_wt_deleted() {
            StatusCode::Deleted
        } else if status.is_wt_renamed() {
            StatusCode::Renamed
        } else if status.is_wt_modified() || status.is_wt_typechange() {
            StatusCode::Modified
        } else {
            StatusCode::Unmodified
        };

        FileStatus { index, workspace }
    }
}

fn index_flags() -> git2::Status {
    git2::Status::INDEX_NEW
        | git2::Status::INDEX_MODIFIED
        | git2::Status::INDEX_DELETED
        | git2::Status::INDEX_RENAMED
        | git2::Status::INDEX_TYPECHANGE
}

/// Status entry for a file in the working directory
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusEntry {
    pub path: String,
    pub status: FileStatus,
}
