//! Name-based text/binary classification for diffing

use std::collections::HashSet;
use std::path::Path;

use once_cell::sync::Lazy;

/// Decides whether a file should get a textual diff.
///
/// Classification looks at the path only, never at file content, so the
/// diff engine can short-circuit binary files without reading any bytes.
pub trait TextClassifier: Send + Sync {
    fn is_text(&self, path: &str) -> bool;
}

impl<F> TextClassifier for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn is_text(&self, path: &str) -> bool {
        self(path)
    }
}

/// Extension-less file names that are always text
const TEXT_NAMES: &[&str] = &[
    "AUTHORS",
    "CONTRIBUTING",
    "COPYING",
    "LICENSE",
    "Makefile",
    "README",
];

static TEXT_EXTENSIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "txt", "text", "md", "markdown", "rst", "adoc", "json", "xml", "plist", "yaml", "yml",
        "toml", "html", "htm", "xhtml", "css", "scss", "sass", "less", "js", "jsx", "ts", "tsx",
        "mjs", "cjs", "rs", "py", "rb", "pl", "pm", "php", "java", "kt", "scala", "go", "c",
        "cc", "cpp", "cxx", "h", "hh", "hpp", "cs", "fs", "vb", "swift", "m", "mm", "sh",
        "bash", "zsh", "fish", "ps1", "bat", "cmd", "sql", "graphql", "gql", "env", "ini",
        "cfg", "conf", "config", "gitignore", "gitattributes", "gitmodules", "editorconfig",
        "dockerfile", "tf", "tfvars", "hcl", "vue", "svelte", "astro", "csv", "tsv", "log",
        "patch", "diff", "tex", "lua", "el", "clj", "ex", "exs", "erl", "hs", "ml", "mli",
        "r", "jl", "dart", "zig", "nim", "proto", "cmake", "mk", "gradle", "properties", "svg",
        "strings", "rtf", "vtt", "srt", "lock",
    ]
    .into_iter()
    .collect()
});

/// Default policy: a fixed list of known text file names plus a lookup of
/// extensions that denote text types.
#[derive(Debug, Clone, Copy, Default)]
pub struct NameExtensionClassifier;

impl TextClassifier for NameExtensionClassifier {
    fn is_text(&self, path: &str) -> bool {
        let name = match Path::new(path).file_name().and_then(|n| n.to_str()) {
            Some(name) if !name.is_empty() => name,
            _ => return false,
        };

        if TEXT_NAMES.contains(&name) {
            return true;
        }

        // Dotfiles such as `.gitignore` are classified by the part after the dot
        let extension = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .or_else(|| name.strip_prefix('.'));

        match extension {
            Some(ext) if !ext.is_empty() => {
                TEXT_EXTENSIONS.contains(ext.to_ascii_lowercase().as_str())
            }
            _ => false,
        }
    }
}
