//! Applying a single hunk to a text buffer
//!
//! Matching is strictly positional: the lines the hunk expects must sit at the
//! position its header declares, otherwise the result is a mismatch. Lines are
//! compared by their exact bytes, so the buffer keeps whatever encoding it is
//! in. Line endings of untouched lines are kept as they are; inserted lines
//! take the buffer's prevailing line ending.

use crate::error::{Result, TidelineError};
use crate::models::{Hunk, HunkLine, HunkLineKind};

/// Apply `hunk` to `text`, or undo it when `reversed` is set
pub fn apply_hunk(hunk: &Hunk, text: &str, reversed: bool) -> Result<String> {
    let patched = apply_hunk_bytes(hunk, text.as_bytes(), reversed)?;
    String::from_utf8(patched).map_err(|_| {
        TidelineError::Unexpected(format!("patched {} is not valid UTF-8", hunk.path))
    })
}

/// Apply `hunk` to the raw contents of a file, or undo it when `reversed` is set
pub fn apply_hunk_bytes(hunk: &Hunk, buffer: &[u8], reversed: bool) -> Result<Vec<u8>> {
    let lines = split_lines(buffer);
    let default_eol: &[u8] = lines
        .iter()
        .map(|(_, eol)| *eol)
        .find(|eol| !eol.is_empty())
        .unwrap_or(&b"\n"[..]);

    let (start, count, expected): (u32, u32, Vec<&HunkLine>) = if reversed {
        (hunk.new_start, hunk.new_lines, hunk.new_side().collect())
    } else {
        (hunk.old_start, hunk.old_lines, hunk.old_side().collect())
    };

    if expected.len() != count as usize {
        return Err(mismatch(hunk, format!(
            "header declares {} lines but the hunk carries {}",
            count,
            expected.len()
        )));
    }

    // An empty range names the line after which the edit sits
    let begin = match (start, count) {
        (start, 0) => start as usize,
        (0, _) => return Err(mismatch(hunk, "range starts at line 0".to_string())),
        (start, _) => start as usize - 1,
    };
    let end = begin + count as usize;
    if end > lines.len() {
        return Err(mismatch(hunk, format!(
            "range ends at line {} but the text has {} lines",
            end,
            lines.len()
        )));
    }

    for (offset, line) in expected.iter().enumerate() {
        let (actual, _) = lines[begin + offset];
        if actual != line.bytes() {
            return Err(mismatch(hunk, format!(
                "line {} is {:?}, expected {:?}",
                begin + offset + 1,
                String::from_utf8_lossy(actual),
                line.content
            )));
        }
    }

    let (removed, inserted) = if reversed {
        (HunkLineKind::Addition, HunkLineKind::Deletion)
    } else {
        (HunkLineKind::Deletion, HunkLineKind::Addition)
    };

    let mut output = Vec::with_capacity(buffer.len());
    for (content, eol) in &lines[..begin] {
        output.extend_from_slice(content);
        output.extend_from_slice(eol);
    }

    let mut cursor = begin;
    for line in &hunk.lines {
        if line.kind == inserted {
            output.extend_from_slice(line.bytes());
            if !line.missing_newline {
                output.extend_from_slice(default_eol);
            }
        } else {
            if line.kind != removed {
                let (content, eol) = lines[cursor];
                output.extend_from_slice(content);
                output.extend_from_slice(eol);
            }
            cursor += 1;
        }
    }

    for (content, eol) in &lines[end..] {
        output.extend_from_slice(content);
        output.extend_from_slice(eol);
    }

    Ok(output)
}

/// Split into (content, terminator) pairs; the last line may have no terminator
fn split_lines(buffer: &[u8]) -> Vec<(&[u8], &[u8])> {
    buffer
        .split_inclusive(|byte| *byte == b'\n')
        .map(|line| {
            if let Some(content) = line.strip_suffix(b"\r\n") {
                (content, &b"\r\n"[..])
            } else if let Some(content) = line.strip_suffix(b"\n") {
                (content, &b"\n"[..])
            } else {
                (line, &b""[..])
            }
        })
        .collect()
}

fn mismatch(hunk: &Hunk, detail: String) -> TidelineError {
    TidelineError::Mismatch(format!("{} {} in {}", hunk.header(), detail, hunk.path))
}
