// SPDX-License-Identifier: MIT

//! Hierarchical path helpers
//!
//! Paths are `/` separated. Comparisons between segments ignore case, the
//! same way path matching does.

pub const SEPARATOR: char = '/';

/// Normalize a path operand
///
/// Each segment is trimmed and leading or trailing separators dropped, so
/// normalizing twice gives the same result. Empty inner segments are
/// rejected.
pub fn normalize(path: &str) -> Result<String, &'static str> {
    let mut parts: Vec<&str> = path.split(SEPARATOR).map(str::trim).collect();
    while parts.first() == Some(&"") {
        parts.remove(0);
    }
    while parts.last() == Some(&"") {
        parts.pop();
    }
    if parts.is_empty() {
        return Err("path is empty");
    }
    if parts.contains(&"") {
        return Err("path contains an empty segment");
    }
    Ok(parts.join("/"))
}

fn segments(path: &str) -> Vec<&str> {
    path.split(SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Whether two paths have the same segments, case included
pub fn same_path(a: &str, b: &str) -> bool {
    segments(a) == segments(b)
}

fn same_segment(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Number of leading segments of `path` matched literally by `prefix`
fn prefix_len(path: &str, prefix: &str) -> Option<usize> {
    let path = segments(path);
    let prefix = segments(prefix);
    if prefix.is_empty() || prefix.len() > path.len() {
        return None;
    }
    prefix
        .iter()
        .zip(&path)
        .all(|(a, b)| same_segment(a, b))
        .then_some(prefix.len())
}

/// Whether `path` equals `ancestor` or sits below it
pub fn contains_path(path: &str, ancestor: &str) -> bool {
    prefix_len(path, ancestor).is_some()
}

/// Rewrite the leading `old` segments of `path` to `new`
///
/// Returns `None` when `path` is not `old` or a descendant of it, or when
/// `new` has no segments.
pub fn substitute_path(path: &str, old: &str, new: &str) -> Option<String> {
    let matched = prefix_len(path, old)?;
    let mut rewritten: Vec<&str> = segments(new);
    if rewritten.is_empty() {
        return None;
    }
    rewritten.extend(segments(path).into_iter().skip(matched));
    Some(rewritten.join("/"))
}
