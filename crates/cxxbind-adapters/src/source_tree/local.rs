//! Walkdir-based source tree search.

use std::path::{Path, PathBuf};

use tracing::{debug, trace};
use walkdir::WalkDir;

use cxxbind_core::application::ports::SourceTree;

const HEADER_EXTENSIONS: &[&str] = &["h", "hpp", "hh", "hxx"];

/// Read-only view over the vendored library sources.
#[derive(Debug, Clone)]
pub struct LocalSourceTree {
    root: PathBuf,
}

impl LocalSourceTree {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl SourceTree for LocalSourceTree {
    /// Headers containing `word` as a whole word and the literal substring
    /// `enum`, ordered shortest-path-first (path length, then lexically,
    /// so candidate order is deterministic).
    fn candidate_headers(&self, word: &str) -> Vec<PathBuf> {
        let mut hits = Vec::new();
        for entry in WalkDir::new(&self.root)
            .follow_links(false)
            .into_iter()
            .filter_map(Result::ok)
        {
            let path = entry.path();
            if !entry.file_type().is_file() || !is_header(path) {
                continue;
            }
            let Ok(content) = std::fs::read_to_string(path) else {
                trace!(path = %path.display(), "unreadable header skipped");
                continue;
            };
            if content.contains("enum") && contains_whole_word(&content, word) {
                hits.push(path.to_path_buf());
            }
        }
        hits.sort_by(|a, b| {
            let len = |p: &PathBuf| p.as_os_str().len();
            len(a).cmp(&len(b)).then_with(|| a.cmp(b))
        });
        debug!(word, candidates = hits.len(), "source tree search");
        hits
    }

    fn root(&self) -> PathBuf {
        self.root.clone()
    }
}

fn is_header(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| HEADER_EXTENSIONS.contains(&e))
}

/// Whole-word containment: `word` bounded by non-identifier characters.
fn contains_whole_word(content: &str, word: &str) -> bool {
    if word.is_empty() {
        return false;
    }
    let ident = |c: char| c.is_alphanumeric() || c == '_';
    let mut rest = content;
    let mut offset = 0;
    while let Some(pos) = rest.find(word) {
        let start = offset + pos;
        let end = start + word.len();
        let before_ok = content[..start].chars().next_back().is_none_or(|c| !ident(c));
        let after_ok = content[end..].chars().next().is_none_or(|c| !ident(c));
        if before_ok && after_ok {
            return true;
        }
        let advance = pos + word.len();
        rest = &rest[advance..];
        offset += advance;
    }
    false
}
