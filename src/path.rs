//! Path manipulation utilities for maven-compose

use std::path::{Path, MAIN_SEPARATOR, MAIN_SEPARATOR_STR};

/// Compute the path of `target` relative to the directory `anchor`
///
/// Both arguments are absolute paths. The computation is purely textual:
/// both are split into segments, the common leading segments are dropped,
/// one `..` step is emitted per remaining anchor segment and the remaining
/// target segments are appended. The filesystem is never consulted.
///
/// # Examples
///
/// ```
/// use maven_compose::path::relativize;
///
/// assert_eq!(relativize("/foo/bar/qux", "/foo/bar/baz"), "../qux");
/// ```
pub fn relativize(target: &str, anchor: &str) -> String {
    let target_segments = segments(target);
    let anchor_segments = segments(anchor);

    let common = target_segments
        .iter()
        .zip(&anchor_segments)
        .take_while(|(t, a)| t == a)
        .count();

    let mut relative = String::new();
    for _ in common..anchor_segments.len() {
        relative.push_str("..");
        relative.push(MAIN_SEPARATOR);
    }
    relative.push_str(&target_segments[common..].join(MAIN_SEPARATOR_STR));
    relative
}

/// [`relativize`] over `Path`s
pub fn relativize_path(target: &Path, anchor: &Path) -> String {
    relativize(&target.to_string_lossy(), &anchor.to_string_lossy())
}

/// Split on the separator, ignoring trailing separators
fn segments(path: &str) -> Vec<&str> {
    let mut segments: Vec<&str> = path.split(MAIN_SEPARATOR).collect();
    while segments.len() > 1 && segments.last() == Some(&"") {
        segments.pop();
    }
    segments
}
