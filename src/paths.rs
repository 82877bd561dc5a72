//! Relative path construction for the generated artifact.

use std::path::Path;

use crate::error::{Error, Result};

/// Returns `path` relative to `base`, joined with `/` regardless of host
/// platform.
///
/// Both inputs are canonicalized first (symlinks followed, `.`/`..`
/// collapsed), so both must exist on disk at call time. Identical inputs
/// yield the empty string.
pub fn relativize(path: &Path, base: &Path) -> Result<String> {
    let path = canonical_segments(path)?;
    let base = canonical_segments(base)?;

    let common = path
        .iter()
        .zip(base.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut segments: Vec<&str> = Vec::with_capacity(base.len() - common + path.len() - common);
    for _ in common..base.len() {
        segments.push("..");
    }
    for segment in &path[common..] {
        segments.push(segment);
    }

    Ok(segments.join("/"))
}

fn canonical_segments(path: &Path) -> Result<Vec<String>> {
    let canonical = path.canonicalize().map_err(|source| Error::Path {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(canonical
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .filter(|s| s != "/")
        .collect())
}
