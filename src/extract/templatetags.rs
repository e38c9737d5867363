//! Template library scanner
//!
//! Reads a template tag/filter module as text and collects its registered
//! tags and filters in registration order. A module without a `register`
//! library object is not a template library and yields `None`, mirroring
//! how the framework rejects such modules at import time.

use crate::extract::pysrc;
use crate::fs::FileSystem;
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// One registered tag or filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSymbol {
    pub name: String,
    pub doc: String,
}

/// All registrations of one library module
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateLibrary {
    /// Module identifier, used for logging only
    pub module: String,
    pub tags: Vec<TemplateSymbol>,
    pub filters: Vec<TemplateSymbol>,
}

impl TemplateLibrary {
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty() && self.filters.is_empty()
    }

    fn push(&mut self, kind: RegistrationKind, symbol: TemplateSymbol) {
        match kind {
            RegistrationKind::Tag => self.tags.push(symbol),
            RegistrationKind::Filter => self.filters.push(symbol),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RegistrationKind {
    Tag,
    Filter,
}

/// Scan a library module file. Unreadable files yield `None` and are
/// skipped by the caller.
pub fn scan_file<F: FileSystem>(fs: &F, module: &str, path: &Path) -> Option<TemplateLibrary> {
    let source = match fs.read_to_string(path) {
        Ok(source) => source,
        Err(_) => {
            debug!(module, file = %path.display(), "library module not readable, skipping");
            return None;
        }
    };
    scan_source(module, &source)
}

/// Scan library module source text for tag and filter registrations.
pub fn scan_source(module: &str, source: &str) -> Option<TemplateLibrary> {
    let register_re = Regex::new(r"(?m)^register\s*=").expect("valid regex");
    if !register_re.is_match(source) {
        debug!(module, "module has no register object, not a template library");
        return None;
    }

    let decorator_re = Regex::new(
        r"^@register\.(tag|simple_tag|inclusion_tag|simple_block_tag|filter)\b(?:\((.*)\))?\s*$",
    )
    .expect("valid regex");
    let call_re = Regex::new(r#"^register\.(tag|filter)\(\s*["']([^"']+)["']\s*,\s*(\w+)"#)
        .expect("valid regex");

    let lines: Vec<&str> = source.lines().collect();
    let docs = toplevel_docstrings(&lines);

    let mut library = TemplateLibrary {
        module: module.to_string(),
        ..Default::default()
    };
    let mut pending: Vec<(RegistrationKind, Option<String>)> = Vec::new();
    let mut idx = 0;
    while idx < lines.len() {
        let line = lines[idx];
        let trimmed = line.trim_start();

        if trimmed.is_empty() || trimmed.starts_with('#') {
            idx += 1;
            continue;
        }

        if trimmed.starts_with('@') {
            if let Some(caps) = decorator_re.captures(trimmed) {
                let kind = registration_kind(&caps[1]);
                let explicit = caps.get(2).and_then(|args| {
                    // The positional argument of inclusion_tag is a template
                    // path, never the tag name
                    explicit_name(args.as_str(), &caps[1] != "inclusion_tag")
                });
                pending.push((kind, explicit));
            }
            idx += 1;
            continue;
        }

        if trimmed.starts_with("def ") || trimmed.starts_with("async def ") {
            if let Some(sig) = pysrc::parse_def(&lines, idx) {
                if !pending.is_empty() {
                    let doc = pysrc::docstring_after(&lines, sig.end_line);
                    for (kind, explicit) in pending.drain(..) {
                        let name = explicit.unwrap_or_else(|| sig.name.clone());
                        library.push(kind, TemplateSymbol { name, doc: doc.clone() });
                    }
                }
                idx = sig.end_line + 1;
                continue;
            }
        }

        if let Some(caps) = call_re.captures(trimmed) {
            let kind = registration_kind(&caps[1]);
            let doc = docs.get(&caps[3]).cloned().unwrap_or_default();
            library.push(
                kind,
                TemplateSymbol {
                    name: caps[2].to_string(),
                    doc,
                },
            );
        }

        pending.clear();
        idx += 1;
    }

    Some(library)
}

fn registration_kind(method: &str) -> RegistrationKind {
    if method == "filter" {
        RegistrationKind::Filter
    } else {
        RegistrationKind::Tag
    }
}

/// Extract an explicit registration name from decorator arguments:
/// a `name="…"` keyword, or a leading positional string literal.
fn explicit_name(args: &str, positional_is_name: bool) -> Option<String> {
    let kwarg_re = Regex::new(r#"\bname\s*=\s*["']([^"']+)["']"#).expect("valid regex");
    if let Some(caps) = kwarg_re.captures(args) {
        return Some(caps[1].to_string());
    }
    if positional_is_name {
        let positional_re = Regex::new(r#"^\s*["']([^"']+)["']"#).expect("valid regex");
        if let Some(caps) = positional_re.captures(args) {
            return Some(caps[1].to_string());
        }
    }
    None
}

/// Docstrings of all top-level functions, for resolving direct-call
/// registrations like `register.tag("name", func)`.
fn toplevel_docstrings(lines: &[&str]) -> HashMap<String, String> {
    let mut docs = HashMap::new();
    let mut idx = 0;
    while idx < lines.len() {
        let line = lines[idx];
        if line.starts_with("def ") || line.starts_with("async def ") {
            if let Some(sig) = pysrc::parse_def(lines, idx) {
                docs.entry(sig.name.clone())
                    .or_insert_with(|| pysrc::docstring_after(lines, sig.end_line));
                idx = sig.end_line + 1;
                continue;
            }
        }
        idx += 1;
    }
    docs
}
