//! Indexed filename derivation.
//!
//! A template such as `/var/log/capture.log` expands into a numbered family:
//!
//! ```text
//! /var/log/capture_0.log
//! /var/log/capture_1.log
//! /var/log/capture_2.log
//! ```
//!
//! The next index is derived from what is already on disk, never from a
//! persisted counter, so a restarted process continues the sequence instead of
//! overwriting earlier output.
//!
//! ## Ordering
//!
//! Matches are ordered by [`compare_indexed`]: names that agree up to their
//! final `_` compare by numeric index, anything else compares byte-wise. The
//! two rules can disagree (`out_7.log` sorts before `outer_1.log`), so the
//! relation is not a total order for every directory listing. [`latest`]
//! picks the greatest element with a single linear scan and never sorts.

use crate::error::ResolveError;
use std::cmp::Ordering;
use std::path::{is_separator, Path, PathBuf};

/// Splits `name` at the last `.` of its final path segment.
///
/// The extension keeps its leading dot. A name without a dot in its final
/// segment has an empty extension.
///
/// ```rust
/// use rollsink::naming::split_extension;
///
/// assert_eq!(split_extension("/tmp/out.log"), ("/tmp/out", ".log"));
/// assert_eq!(split_extension("/tmp.d/out"), ("/tmp.d/out", ""));
/// ```
#[must_use]
pub fn split_extension(name: &str) -> (&str, &str) {
    for (i, c) in name.char_indices().rev() {
        if is_separator(c) {
            break;
        }
        if c == '.' {
            return name.split_at(i);
        }
    }
    (name, "")
}

/// Returns `name` truncated at its final `_`, or `name` itself if it has none.
///
/// Two names with equal results belong to the same numbered family.
#[must_use]
pub fn without_index(name: &str) -> &str {
    name.rsplit_once('_').map_or(name, |(head, _)| head)
}

fn is_index(digits: &str) -> bool {
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Extracts the numeric index between the final `_` and the extension.
///
/// ```rust
/// use rollsink::naming::file_index;
///
/// assert_eq!(file_index("capture_12.pcap"), Some(12));
/// assert_eq!(file_index("capture.pcap"), None);
/// assert_eq!(file_index("capture_x.pcap"), None);
/// ```
#[must_use]
pub fn file_index(name: &str) -> Option<u64> {
    let (stem, _) = split_extension(name);
    let (_, digits) = stem.rsplit_once('_')?;
    if is_index(digits) {
        digits.parse().ok()
    } else {
        None
    }
}

/// Replaces the `_<index>` segment of `name` with `idx`, or appends one.
///
/// ```rust
/// use rollsink::naming::set_file_index;
///
/// assert_eq!(set_file_index("out.log", 0), "out_0.log");
/// assert_eq!(set_file_index("out_7.log", 8), "out_8.log");
/// assert_eq!(set_file_index("my_out.log", 1), "my_out_1.log");
/// ```
#[must_use]
pub fn set_file_index(name: &str, idx: u64) -> String {
    let (stem, ext) = split_extension(name);
    let stem = match stem.rsplit_once('_') {
        Some((head, digits)) if is_index(digits) => head,
        _ => stem,
    };
    format!("{stem}_{idx}{ext}")
}

/// Orders two names of a template's match set.
///
/// Same family (see [`without_index`]): by numeric index, with a missing index
/// below any present one. Different families: lexicographically.
#[must_use]
pub fn compare_indexed(a: &str, b: &str) -> Ordering {
    if without_index(a) == without_index(b) {
        file_index(a).cmp(&file_index(b))
    } else {
        a.cmp(b)
    }
}

/// Returns the greatest name under [`compare_indexed`].
///
/// Among equal maxima the last one wins.
pub fn latest<S: AsRef<str>>(names: &[S]) -> Option<&S> {
    names
        .iter()
        .max_by(|a, b| compare_indexed(a.as_ref(), b.as_ref()))
}

/// Lists paths matching `<base>*<ext>` for the given template.
///
/// Glob metacharacters inside the template itself match literally. The
/// listing covers a single directory.
///
/// # Errors
///
/// Returns an error if the pattern cannot be built, a directory entry cannot
/// be read, or a matched path is not valid UTF-8.
pub fn list_matching(template: &str) -> Result<Vec<String>, ResolveError> {
    let (base, ext) = split_extension(template);
    let pattern = format!(
        "{}*{}",
        glob::Pattern::escape(base),
        glob::Pattern::escape(ext)
    );

    let paths = glob::glob(&pattern).map_err(|e| ResolveError::Pattern {
        pattern: pattern.clone(),
        message: e.msg.to_string(),
    })?;

    let mut names = Vec::new();
    for entry in paths {
        let path = entry?;
        let name = path
            .into_os_string()
            .into_string()
            .map_err(|os| ResolveError::NonUtf8Path(PathBuf::from(os)))?;
        names.push(name);
    }
    Ok(names)
}

/// Lists the template's matches in display order.
///
/// Sorted by family, then index, then name. Unlike [`compare_indexed`] this
/// key is total, so it is safe to sort with; the last element is not
/// necessarily [`latest`] when several families are present.
///
/// # Errors
///
/// Same as [`list_matching`].
pub fn indexed_files(template: &Path) -> Result<Vec<PathBuf>, ResolveError> {
    let template = template
        .to_str()
        .ok_or_else(|| ResolveError::NonUtf8Path(template.to_path_buf()))?;

    let mut names = list_matching(template)?;
    names.sort_by(|a, b| {
        without_index(a)
            .cmp(without_index(b))
            .then_with(|| file_index(a).cmp(&file_index(b)))
            .then_with(|| a.cmp(b))
    });
    Ok(names.into_iter().map(PathBuf::from).collect())
}

/// Resolves the path the next write should go to.
///
/// With no matches on disk the result is index 0 of the template. Otherwise
/// the latest match is taken; its index is bumped by one when `rotate` is
/// set. A latest match without an index restarts the family at 0.
///
/// # Errors
///
/// Returns an error if the directory scan fails. Callers that want the
/// degraded behaviour fall back to the template path themselves.
pub fn resolve(template: &Path, rotate: bool) -> Result<PathBuf, ResolveError> {
    let template = template
        .to_str()
        .ok_or_else(|| ResolveError::NonUtf8Path(template.to_path_buf()))?;

    let matches = list_matching(template)?;
    let Some(current) = latest(&matches) else {
        return Ok(PathBuf::from(set_file_index(template, 0)));
    };

    let target = match file_index(current) {
        // u64::MAX stays put rather than wrapping back to 0.
        Some(idx) if rotate => idx.saturating_add(1),
        Some(idx) => idx,
        None => 0,
    };
    Ok(PathBuf::from(set_file_index(current, target)))
}
