// SPDX-License-Identifier: MIT

//! Glob matching for criteria operands
//!
//! `*` matches any run of characters, every other character is literal.
//! Path matching splits on `/`: `*` stays inside one segment while a `**`
//! segment spans any number of whole segments, including none.
//!
//! The matchers are case-sensitive. Callers lower-case both sides first.

use super::path::SEPARATOR;

/// The user-facing wildcard
pub const WILDCARD: char = '*';

/// Segment that spans any number of path segments
pub const DEEP_WILDCARD: &str = "**";

const LIKE_ESCAPE: char = '\\';

/// Match a glob pattern against a whole string
pub fn matches(pattern: &str, candidate: &str) -> bool {
    let p: Vec<char> = pattern.chars().collect();
    let c: Vec<char> = candidate.chars().collect();

    let (mut pi, mut ci) = (0, 0);
    // Last star seen: (pattern index, candidate index it is currently absorbing up to)
    let mut backtrack: Option<(usize, usize)> = None;

    while ci < c.len() {
        if pi < p.len() && p[pi] == WILDCARD {
            backtrack = Some((pi, ci));
            pi += 1;
        } else if pi < p.len() && p[pi] == c[ci] {
            pi += 1;
            ci += 1;
        } else if let Some((star, absorbed)) = backtrack {
            pi = star + 1;
            ci = absorbed + 1;
            backtrack = Some((star, absorbed + 1));
        } else {
            return false;
        }
    }

    p[pi..].iter().all(|&ch| ch == WILDCARD)
}

/// Match a glob pattern against a slash separated path
pub fn matches_path(pattern: &str, path: &str) -> bool {
    let pattern: Vec<&str> = pattern.split(SEPARATOR).collect();
    let path: Vec<&str> = path.split(SEPARATOR).collect();
    match_segments(&pattern, &path)
}

fn match_segments(pattern: &[&str], path: &[&str]) -> bool {
    match pattern.split_first() {
        None => path.is_empty(),
        Some((&DEEP_WILDCARD, rest)) => {
            (0..=path.len()).any(|skip| match_segments(rest, &path[skip..]))
        }
        Some((segment, rest)) => match path.split_first() {
            Some((head, tail)) => matches(segment, head) && match_segments(rest, tail),
            None => false,
        },
    }
}

/// Translate a glob into a SQL `LIKE` pattern using `\` as the escape character
pub fn to_like_pattern(glob: &str) -> String {
    let mut out = String::with_capacity(glob.len() + 2);
    for ch in glob.chars() {
        match ch {
            WILDCARD => out.push('%'),
            '%' | '_' | LIKE_ESCAPE => {
                out.push(LIKE_ESCAPE);
                out.push(ch);
            }
            other => out.push(other),
        }
    }
    out
}
