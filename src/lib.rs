//! # autoload-gen
//!
//! Generates a PHP autoloader from a directory tree. Classes are resolved
//! lazily through an `spl_autoload_register` map; files declaring free
//! functions or constants are loaded unconditionally. An incremental scan
//! cache keyed on (size, mtime) fingerprints avoids re-parsing unchanged
//! files across runs.
//!
//! ## Architecture
//!
//! - **extract**: top-level declaration extraction using tree-sitter AST parsing
//! - **scanner**: per-file scanning, hash-bang stripping, Hack dialect routing
//! - **hack**: external Hack-to-PHP transpiler subprocess
//! - **cache**: incremental scan cache with size+mtime staleness detection
//! - **collect**: aggregation into the class map and eager-file set
//! - **generate**: deterministic rendering of the autoload artifact
//! - **paths**: relative path construction for the generated code
//! - **scan**: input expansion and exclude filtering
//! - **cli**: command-line surface

pub mod cache;
pub mod cli;
pub mod collect;
pub mod error;
pub mod extract;
pub mod generate;
pub mod hack;
pub mod paths;
pub mod scan;
pub mod scanner;
