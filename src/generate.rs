//! Deterministic generation of the autoload artifact.
//!
//! Identical inputs always produce byte-identical output: paths are
//! relativized against the artifact's own directory and normalized to `/`
//! separators, the class map and the eager file list are byte-wise sorted,
//! and every embedded string is quoted var_export-style.

use clap::ValueEnum;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::collect::AutoloadIndex;
use crate::error::Result;
use crate::paths::relativize;

/// PHP inclusion statement used both by the autoload closure and the eager
/// file section.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum RequireMethod {
    #[value(name = "include")]
    Include,
    #[value(name = "include_once")]
    IncludeOnce,
    #[value(name = "require")]
    Require,
    #[value(name = "require_once")]
    RequireOnce,
}

impl RequireMethod {
    pub fn as_php(self) -> &'static str {
        match self {
            RequireMethod::Include => "include",
            RequireMethod::IncludeOnce => "include_once",
            RequireMethod::Require => "require",
            RequireMethod::RequireOnce => "require_once",
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeneratorOptions {
    pub require_method: RequireMethod,
    pub prepend_autoload: bool,
    pub case_insensitive: bool,
    /// Free-text provenance line embedded in the artifact header.
    pub generated_by: String,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            require_method: RequireMethod::RequireOnce,
            prepend_autoload: false,
            case_insensitive: false,
            generated_by: String::new(),
        }
    }
}

/// Renders the autoload artifact for `index`, with all paths expressed
/// relative to `base` (the directory the artifact will live in).
pub fn generate(index: &AutoloadIndex, base: &Path, options: &GeneratorOptions) -> Result<String> {
    // Class-map folding walks first-seen order, so with case_insensitive set
    // a later name differing only in case overwrites the earlier mapping.
    let mut map: BTreeMap<String, String> = BTreeMap::new();
    for (name, file) in index.classes() {
        let key = if options.case_insensitive {
            name.to_ascii_lowercase()
        } else {
            name.to_string()
        };
        map.insert(key, relativize(file, base)?);
    }

    let mut eager: BTreeSet<String> = BTreeSet::new();
    for file in index.eager_files() {
        eager.insert(relativize(file, base)?);
    }

    let method = options.require_method.as_php();
    let prepend = if options.prepend_autoload { "true" } else { "false" };

    let mut out = String::new();
    out.push_str("<?php\n\n");
    out.push_str(&format!("// !! Generated by: {}\n\n", options.generated_by));

    out.push_str("spl_autoload_register(function ($class) {\n");
    out.push_str("    static $map = ");
    out.push_str(&php_export_map(&map));
    out.push_str(";\n\n");
    if options.case_insensitive {
        out.push_str("    $class = strtolower($class);\n\n");
    }
    out.push_str("    if (isset($map[$class])) {\n");
    out.push_str(&format!("        {method} __DIR__ . \"/{{$map[$class]}}\";\n"));
    out.push_str("    }\n");
    out.push_str(&format!("}}, true, {prepend});\n"));

    if !eager.is_empty() {
        out.push('\n');
    }
    for file in &eager {
        out.push_str(&format!(
            "{method} __DIR__ . {};\n",
            php_string(&format!("/{file}"))
        ));
    }

    Ok(out)
}

fn php_export_map(map: &BTreeMap<String, String>) -> String {
    let mut out = String::from("array (\n");
    for (class, file) in map {
        out.push_str(&format!("  {} => {},\n", php_string(class), php_string(file)));
    }
    out.push(')');
    out
}

/// Single-quoted PHP string literal, var_export-style: backslashes and
/// single quotes escaped, everything else verbatim.
fn php_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        if c == '\\' || c == '\'' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('\'');
    out
}
