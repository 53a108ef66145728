//! Diff models

use serde::{Deserialize, Serialize};

use super::StatusCode;

/// Where the bytes of one side of a file diff come from.
///
/// A locator only; it is resolved into bytes against a repository on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentSource {
    Literal(Vec<u8>),
    CommittedBlob(git2::Oid),
}

impl ContentSource {
    pub fn empty() -> Self {
        ContentSource::Literal(Vec::new())
    }

    /// Resolve the locator into the file bytes it names
    pub fn load(&self, repo: &git2::Repository) -> crate::error::Result<Vec<u8>> {
        match self {
            ContentSource::Literal(bytes) => Ok(bytes.clone()),
            ContentSource::CommittedBlob(oid) => {
                let blob = repo
                    .find_blob(*oid)
                    .map_err(|e| crate::error::TidelineError::from_lookup(e, oid.to_string()))?;
                Ok(blob.content().to_vec())
            }
        }
    }
}

/// Result of diffing one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffResult {
    Binary,
    Text(TextDiff),
}

impl DiffResult {
    pub fn is_binary(&self) -> bool {
        matches!(self, DiffResult::Binary)
    }

    pub fn as_text(&self) -> Option<&TextDiff> {
        match self {
            DiffResult::Text(diff) => Some(diff),
            DiffResult::Binary => None,
        }
    }
}

/// A pending text diff between two content sources
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextDiff {
    pub from: ContentSource,
    pub to: ContentSource,
    pub path: String,
}

/// Per-path changes between two tree snapshots
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeDiff {
    pub target: String,
    /// Parent the diff was computed against; `None` for a root commit
    pub parent: Option<String>,
    pub deltas: Vec<TreeDelta>,
}

impl TreeDiff {
    pub fn delta(&self, path: &str) -> Option<&TreeDelta> {
        self.deltas
            .iter()
            .find(|d| d.path == path || d.old_path.as_deref() == Some(path))
    }
}

/// One changed path inside a [`TreeDiff`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeDelta {
    pub path: String,
    pub old_path: Option<String>,
    pub status: StatusCode,
    pub old_oid: Option<String>,
    pub new_oid: Option<String>,
}

/// A single diff fragment for one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hunk {
    pub path: String,
    pub old_start: u32,
    pub old_lines: u32,
    pub new_start: u32,
    pub new_lines: u32,
    pub lines: Vec<HunkLine>,
}

impl Hunk {
    /// Unified diff header, e.g. `@@ -3,2 +3,3 @@`
    pub fn header(&self) -> String {
        format!(
            "@@ -{},{} +{},{} @@",
            self.old_start, self.old_lines, self.new_start, self.new_lines
        )
    }

    /// Lines as they appear before the edit (context and deletions)
    pub fn old_side(&self) -> impl Iterator<Item = &HunkLine> {
        self.lines.iter().filter(|l| l.kind != HunkLineKind::Addition)
    }

    /// Lines as they appear after the edit (context and additions)
    pub fn new_side(&self) -> impl Iterator<Item = &HunkLine> {
        self.lines.iter().filter(|l| l.kind != HunkLineKind::Deletion)
    }

    pub fn additions(&self) -> usize {
        self.lines
            .iter()
            .filter(|l| l.kind == HunkLineKind::Addition)
            .count()
    }

    pub fn deletions(&self) -> usize {
        self.lines
            .iter()
            .filter(|l| l.kind == HunkLineKind::Deletion)
            .count()
    }
}

/// A line inside a hunk, stored without its line terminator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HunkLine {
    pub kind: HunkLineKind,
    /// Display text, decoded with the encoding of the side the line comes from
    pub content: String,
    /// Exact file bytes, kept only when they are not the UTF-8 form of `content`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<Vec<u8>>,
    /// Last line of its side with no trailing newline
    #[serde(default)]
    pub missing_newline: bool,
}

impl HunkLine {
    pub fn context(content: impl Into<String>) -> Self {
        Self::new(HunkLineKind::Context, content)
    }

    pub fn addition(content: impl Into<String>) -> Self {
        Self::new(HunkLineKind::Addition, content)
    }

    pub fn deletion(content: impl Into<String>) -> Self {
        Self::new(HunkLineKind::Deletion, content)
    }

    fn new(kind: HunkLineKind, content: impl Into<String>) -> Self {
        HunkLine {
            kind,
            content: content.into(),
            raw: None,
            missing_newline: false,
        }
    }

    /// The line exactly as stored in the file
    pub fn bytes(&self) -> &[u8] {
        self.raw.as_deref().unwrap_or(self.content.as_bytes())
    }
}

/// Origin type for a hunk line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HunkLineKind {
    Context,
    Addition,
    Deletion,
}

impl HunkLineKind {
    /// Map a git2 line origin; header and EOF marker origins yield `None`
    pub fn from_origin(origin: char) -> Option<Self> {
        match origin {
            ' ' => Some(HunkLineKind::Context),
            '+' => Some(HunkLineKind::Addition),
            '-' => Some(HunkLineKind::Deletion),
            _ => None,
        }
    }
}
