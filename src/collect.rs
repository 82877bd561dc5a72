//! Aggregation of per-file scan results into the whole-run model.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use crate::extract::ParsedFile;

/// Class-name-to-file mapping plus the set of files that must always load.
///
/// The class map keeps the order in which names were first seen, matching the
/// presentation order of the input files; on a duplicate class name the last
/// file scanned silently wins. Final sorting happens in the generator, not
/// here.
#[derive(Debug, Default)]
pub struct AutoloadIndex {
    classes: HashMap<String, PathBuf>,
    class_order: Vec<String>,
    eager_files: BTreeSet<PathBuf>,
}

impl AutoloadIndex {
    /// Folds one file's declarations into the model.
    pub fn add_file(&mut self, path: &Path, parsed: &ParsedFile) {
        for class in &parsed.classes {
            if !self.classes.contains_key(class) {
                self.class_order.push(class.clone());
            }
            self.classes.insert(class.clone(), path.to_path_buf());
        }
        if parsed.loads_eagerly() {
            self.eager_files.insert(path.to_path_buf());
        }
    }

    /// Class map entries in first-seen order.
    pub fn classes(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.class_order
            .iter()
            .filter_map(|name| self.classes.get(name).map(|p| (name.as_str(), p.as_path())))
    }

    pub fn eager_files(&self) -> impl Iterator<Item = &Path> {
        self.eager_files.iter().map(|p| p.as_path())
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty() && self.eager_files.is_empty()
    }
}
