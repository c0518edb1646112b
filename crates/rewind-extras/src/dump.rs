#![forbid(unsafe_code)]

//! Text dumps of a whole history, for debugging and test failure output.
//!
//! ```text
//!   #0 (root)
//!     0
//! > #1 add one
//!     1
//!   #2 double
//!     2
//! ```
//!
//! `>` marks the current position. Values are printed with `{:#?}`.

use std::fmt::{Debug, Write as _};

use rewind::History;

/// How each position's value is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DumpStyle {
    /// The full value at every position.
    #[default]
    Full,
    /// The full root value, then only the lines that changed at each later
    /// position.
    Diff,
}

/// Dump every position with [`DumpStyle::Full`].
///
/// The history visits every position and returns to where it started.
pub fn dump<T: Debug + 'static>(history: &mut History<T>) -> String {
    dump_with(history, DumpStyle::Full)
}

/// Dump every position in the given style.
pub fn dump_with<T: Debug + 'static>(history: &mut History<T>, style: DumpStyle) -> String {
    let mut out = String::new();
    let mut previous: Option<String> = None;

    history.walk(|position, value| {
        let marker = if position.is_current { '>' } else { ' ' };
        let label = match (position.index, position.label) {
            (0, _) => "(root)",
            (_, Some(label)) => label,
            (_, None) => "(unlabeled)",
        };
        let _ = writeln!(out, "{marker} #{} {label}", position.index);

        let pretty = format!("{value:#?}");
        match (style, previous.as_deref()) {
            (DumpStyle::Diff, Some(before)) => write_diff(&mut out, before, &pretty),
            _ => {
                for line in pretty.lines() {
                    let _ = writeln!(out, "    {line}");
                }
            }
        }
        previous = Some(pretty);
    });

    out
}

fn write_diff(out: &mut String, before: &str, after: &str) {
    let old: Vec<&str> = before.lines().collect();
    let new: Vec<&str> = after.lines().collect();
    let mut changed = false;
    for line in line_diff(&old, &new) {
        match line {
            DiffLine::Keep(_) => {}
            DiffLine::Remove(text) => {
                changed = true;
                let _ = writeln!(out, "    - {text}");
            }
            DiffLine::Add(text) => {
                changed = true;
                let _ = writeln!(out, "    + {text}");
            }
        }
    }
    if !changed {
        let _ = writeln!(out, "    (unchanged)");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DiffLine<'a> {
    Keep(&'a str),
    Remove(&'a str),
    Add(&'a str),
}

/// Longest-common-subsequence diff over lines.
///
/// Removals come before additions within each changed run.
fn line_diff<'a>(old: &[&'a str], new: &[&'a str]) -> Vec<DiffLine<'a>> {
    let (n, m) = (old.len(), new.len());
    // lcs[i][j] = LCS length of old[i..] and new[j..].
    let mut lcs = vec![vec![0u32; m + 1]; n + 1];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            lcs[i][j] = if old[i] == new[j] {
                lcs[i + 1][j + 1] + 1
            } else {
                lcs[i + 1][j].max(lcs[i][j + 1])
            };
        }
    }

    let mut out = Vec::with_capacity(n.max(m));
    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if old[i] == new[j] {
            out.push(DiffLine::Keep(old[i]));
            i += 1;
            j += 1;
        } else if lcs[i + 1][j] >= lcs[i][j + 1] {
            out.push(DiffLine::Remove(old[i]));
            i += 1;
        } else {
            out.push(DiffLine::Add(new[j]));
            j += 1;
        }
    }
    out.extend(old[i..].iter().map(|&l| DiffLine::Remove(l)));
    out.extend(new[j..].iter().map(|&l| DiffLine::Add(l)));
    out
}
