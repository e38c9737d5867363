//! Settings extractor
//!
//! Scans settings files for uppercase top-level assignments, capturing the
//! immediately preceding `# ` comment block as documentation.

use crate::fs::FileSystem;
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// One documented setting parsed from configuration source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingDoc {
    pub name: String,
    pub doc: String,
}

/// Scan one settings file.
///
/// `seen` spans all files of a run; a name already seen is dropped, so the
/// first file to define a setting keeps its documentation. An unreadable
/// file contributes nothing.
pub fn scan_file<F: FileSystem>(
    fs: &F,
    path: &Path,
    seen: &mut HashSet<String>,
) -> Vec<SettingDoc> {
    let content = match fs.read_to_string(path) {
        Ok(content) => content,
        Err(_) => {
            debug!(file = %path.display(), "settings file not readable, skipping");
            return Vec::new();
        }
    };
    scan_source(&content, seen)
}

/// Scan settings source text for assignments.
pub fn scan_source(source: &str, seen: &mut HashSet<String>) -> Vec<SettingDoc> {
    let re = Regex::new(r"(?m)^((?:[ \t]*# .+\n)*)([0-9A-Z_]+) =").expect("valid regex");

    let mut settings = Vec::new();
    for caps in re.captures_iter(source) {
        let name = caps[2].to_string();
        if !seen.insert(name.clone()) {
            continue;
        }
        let doc = caps
            .get(1)
            .map(|block| normalize_comment_block(block.as_str()))
            .unwrap_or_default();
        settings.push(SettingDoc { name, doc });
    }
    settings
}

/// Strip `# ` framing from each comment line and join with real newlines.
/// The emitter escapes the newlines later.
fn normalize_comment_block(block: &str) -> String {
    block
        .lines()
        .map(|line| line.trim_matches(|c: char| c == '#' || c == ' '))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
