//! Reading changed lines out of unified diff hunks.

use std::fmt;

/// A line added or removed by a patch, without its diff prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeLine<'a> {
    /// Line introduced by the patch.
    Added(&'a str),
    /// Line deleted by the patch.
    Removed(&'a str),
}

impl fmt::Display for ChangeLine<'_> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Added(line) => write!(formatter, "Added: {line}"),
            Self::Removed(line) => write!(formatter, "Removed: {line}"),
        }
    }
}

/// Added and removed lines in patch order, trimmed.
///
/// File headers (`+++`, `---`) and context lines are skipped.
#[must_use]
pub fn change_lines(patch: &str) -> Vec<ChangeLine<'_>> {
    patch
        .lines()
        .filter_map(|line| {
            if line.starts_with("+++") || line.starts_with("---") {
                return None;
            }
            line.strip_prefix('+')
                .map(|added| ChangeLine::Added(added.trim()))
                .or_else(|| {
                    line.strip_prefix('-')
                        .map(|removed| ChangeLine::Removed(removed.trim()))
                })
        })
        .collect()
}

/// Lines introduced by `patch`, verbatim apart from the `+` prefix.
#[must_use]
pub fn added_lines(patch: &str) -> Vec<&str> {
    patch
        .lines()
        .filter(|line| !line.starts_with("+++"))
        .filter_map(|line| line.strip_prefix('+'))
        .collect()
}
