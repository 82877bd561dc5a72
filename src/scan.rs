use ignore::WalkBuilder;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Extensions picked up when a directory is expanded. A file named
/// explicitly on the command line is scanned regardless of its extension.
const SOURCE_EXTENSIONS: [&str; 2] = ["php", "hh"];

pub fn is_source_file(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| SOURCE_EXTENSIONS.iter().any(|s| ext == *s))
}

/// Expands each input to a flat file list: directories are walked
/// recursively and filtered by extension, plain paths are kept as-is. The
/// result is sorted and deduplicated so the presentation order (which
/// decides last-writer-wins collisions downstream) is stable across runs.
pub fn expand_inputs(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            let walker = WalkBuilder::new(path)
                .hidden(false)
                .git_ignore(false)
                .git_global(false)
                .git_exclude(false)
                .build();
            for entry in walker.flatten() {
                let entry_path = entry.path();
                if entry.file_type().is_some_and(|t| t.is_file()) && is_source_file(entry_path) {
                    files.push(entry_path.to_path_buf());
                }
            }
        } else {
            files.push(path.clone());
        }
    }

    files.sort();
    files.dedup();
    files
}

/// Removes every file whose canonical path matches an expanded exclude
/// entry. Excludes that do not exist on disk are silently ignored.
pub fn apply_excludes(files: Vec<PathBuf>, excludes: &[PathBuf]) -> Vec<PathBuf> {
    if excludes.is_empty() {
        return files;
    }

    let excluded: HashSet<PathBuf> = expand_inputs(excludes)
        .iter()
        .filter_map(|p| p.canonicalize().ok())
        .collect();

    files
        .into_iter()
        .filter(|f| {
            f.canonicalize()
                .map(|c| !excluded.contains(&c))
                .unwrap_or(true)
        })
        .collect()
}
