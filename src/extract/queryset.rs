//! Query-method extractor
//!
//! Enumerates the members of the `QuerySet` class body in
//! `django/db/models/query.py`. Methods carry a call signature and their
//! docstring; properties and class-level assignments are plain attributes.
//! Members are sorted by name, matching the order the completion consumer
//! has always received.

use crate::extract::pysrc;
use crate::fs::FileSystem;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// One introspected member of the queryset base type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuerySetMember {
    /// Callable member, completed with its signature
    Method { signature: String, doc: String },
    /// Non-callable member, completed as a bare name
    Attribute { name: String },
}

impl QuerySetMember {
    pub fn name(&self) -> &str {
        match self {
            QuerySetMember::Method { signature, .. } => {
                signature.split('(').next().unwrap_or(signature)
            }
            QuerySetMember::Attribute { name } => name,
        }
    }
}

/// Scan the queryset source file. Unreadable source yields no members.
pub fn scan_file<F: FileSystem>(fs: &F, path: &Path) -> Vec<QuerySetMember> {
    let source = match fs.read_to_string(path) {
        Ok(source) => source,
        Err(_) => {
            debug!(file = %path.display(), "queryset source not readable, skipping");
            return Vec::new();
        }
    };
    scan_source(&source, "QuerySet")
}

/// Scan `source` for the body of `class <class_name>` and collect its
/// members, sorted by name with the first definition winning.
pub fn scan_source(source: &str, class_name: &str) -> Vec<QuerySetMember> {
    let lines: Vec<&str> = source.lines().collect();
    let Some(body) = class_body(&lines, class_name) else {
        debug!(class = class_name, "class not found in queryset source");
        return Vec::new();
    };

    let mut members: BTreeMap<String, QuerySetMember> = BTreeMap::new();
    let mut property_pending = false;
    let mut idx = body.start;
    while idx < body.end {
        let line = lines[idx];
        let trimmed = line.trim_start();
        if trimmed.is_empty() {
            idx += 1;
            continue;
        }
        let indent = line.len() - trimmed.len();
        if indent != 4 {
            // Inside a method body or a nested suite
            idx += 1;
            continue;
        }

        if trimmed.starts_with('@') {
            property_pending |= trimmed.contains("property");
            idx += 1;
            continue;
        }

        if trimmed.starts_with("def ") || trimmed.starts_with("async def ") {
            if let Some(sig) = pysrc::parse_def(&lines, idx) {
                if !sig.name.starts_with("__") {
                    let member = if property_pending {
                        QuerySetMember::Attribute {
                            name: sig.name.clone(),
                        }
                    } else {
                        QuerySetMember::Method {
                            signature: format!("{}({})", sig.name, sig.params),
                            doc: pysrc::docstring_after(&lines, sig.end_line),
                        }
                    };
                    insert_first(&mut members, sig.name, member);
                }
                idx = sig.end_line + 1;
            } else {
                idx += 1;
            }
            property_pending = false;
            continue;
        }

        property_pending = false;
        if let Some(name) = assignment_target(trimmed) {
            if !name.starts_with("__") {
                insert_first(
                    &mut members,
                    name.to_string(),
                    QuerySetMember::Attribute {
                        name: name.to_string(),
                    },
                );
            }
        }
        idx += 1;
    }

    members.into_values().collect()
}

fn insert_first(members: &mut BTreeMap<String, QuerySetMember>, name: String, member: QuerySetMember) {
    if let Entry::Vacant(slot) = members.entry(name) {
        slot.insert(member);
    }
}

struct BodyRange {
    start: usize,
    end: usize,
}

/// Locate the body of a top-level `class <name>` declaration.
fn class_body(lines: &[&str], class_name: &str) -> Option<BodyRange> {
    let header = lines.iter().position(|line| {
        line.strip_prefix("class ")
            .and_then(|rest| rest.strip_prefix(class_name))
            .is_some_and(|after| after.starts_with('(') || after.starts_with(':'))
    })?;

    let start = header + 1;
    let mut end = start;
    while end < lines.len() {
        let line = lines[end];
        let trimmed = line.trim_start();
        // Comments and blank lines never terminate the suite
        if !trimmed.is_empty() && !trimmed.starts_with('#') && line.len() == trimmed.len() {
            break;
        }
        end += 1;
    }
    Some(BodyRange { start, end })
}

/// The left-hand identifier of a class-level assignment, if the line is one.
fn assignment_target(trimmed: &str) -> Option<&str> {
    let split = trimmed.find('=')?;
    let (lhs, rhs) = trimmed.split_at(split);
    if rhs.starts_with("==") {
        return None;
    }
    // Allow `name = value` and annotated `name: Type = value`
    let lhs = lhs.split(':').next()?.trim();
    let valid = !lhs.is_empty()
        && lhs
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !lhs.chars().next().is_some_and(|c| c.is_ascii_digit());
    valid.then_some(lhs)
}
