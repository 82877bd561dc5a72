//! File scanning: reads one source file and extracts its declarations.
//!
//! `SourceScanner` is the seam between the direct scanner and the caching
//! wrapper in `cache`; both expose the same `scan` contract.

use std::path::Path;

use crate::error::{Error, Result};
use crate::extract::{ParsedFile, extract_declarations};
use crate::hack::{HACK_MARKER, HackCompiler, Transpile};

pub trait SourceScanner {
    fn scan(&mut self, path: &Path) -> Result<ParsedFile>;
}

/// Scans files directly, with no caching. Pure function of file content.
pub struct FileScanner {
    transpiler: Box<dyn Transpile>,
}

impl FileScanner {
    pub fn new() -> Self {
        Self::with_transpiler(Box::new(HackCompiler::from_env()))
    }

    pub fn with_transpiler(transpiler: Box<dyn Transpile>) -> Self {
        Self { transpiler }
    }
}

impl Default for FileScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceScanner for FileScanner {
    fn scan(&mut self, path: &Path) -> Result<ParsedFile> {
        let contents = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;

        // The parser does not understand interpreter directives; drop a
        // leading hash-bang line before handing the text over.
        let contents = match contents.strip_prefix("#!") {
            Some(rest) => rest.split_once('\n').map(|(_, tail)| tail).unwrap_or(""),
            None => contents.as_str(),
        };

        let transpiled;
        let source = if contents.starts_with(HACK_MARKER) {
            transpiled = self.transpiler.transpile(path, contents)?;
            transpiled.as_str()
        } else {
            contents
        };

        extract_declarations(source).ok_or_else(|| Error::Parse {
            path: path.to_path_buf(),
        })
    }
}
