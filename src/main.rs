use anyhow::{Context, Result};
use autoload_gen::cache::ScanCache;
use autoload_gen::cli::Cli;
use autoload_gen::collect::AutoloadIndex;
use autoload_gen::generate::{GeneratorOptions, generate};
use autoload_gen::scan::{apply_excludes, expand_inputs};
use autoload_gen::scanner::{FileScanner, SourceScanner};
use clap::Parser;
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    let generated_by = std::env::args().collect::<Vec<_>>().join(" ");
    let cli = Cli::parse();
    run(&cli, generated_by)
}

fn run(cli: &Cli, generated_by: String) -> Result<()> {
    let inputs = if cli.files.is_empty() {
        vec![output_dir(&cli.outfile).to_path_buf()]
    } else {
        cli.files.clone()
    };
    let files = apply_excludes(expand_inputs(&inputs), &cli.exclude);

    let mut index = AutoloadIndex::default();
    if cli.no_cache {
        let mut scanner = FileScanner::new();
        scan_all(&mut scanner, &files, &mut index)?;
    } else {
        let mut cache = ScanCache::load(FileScanner::new(), resolve_cache_path(cli));
        scan_all(&mut cache, &files, &mut index)?;
        cache.persist()?;
    }

    let options = GeneratorOptions {
        require_method: cli.require_method,
        prepend_autoload: cli.prepend,
        case_insensitive: cli.case_insensitive,
        generated_by,
    };
    let artifact = generate(&index, output_dir(&cli.outfile), &options)?;

    // The artifact is only written after the entire input set succeeded.
    std::fs::write(&cli.outfile, artifact)
        .with_context(|| format!("Failed to write output file: {}", cli.outfile.display()))?;
    println!("Output written to {}", cli.outfile.display());

    Ok(())
}

fn scan_all<S: SourceScanner>(
    scanner: &mut S,
    files: &[PathBuf],
    index: &mut AutoloadIndex,
) -> Result<()> {
    for file in files {
        println!("Scanning {}", file.display());
        let parsed = scanner.scan(file)?;
        index.add_file(file, &parsed);
    }
    Ok(())
}

fn output_dir(outfile: &Path) -> &Path {
    match outfile.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

fn resolve_cache_path(cli: &Cli) -> PathBuf {
    match cli.cache_path.clone() {
        Some(path) => path,
        None => output_dir(&cli.outfile).join(".autoload-gen.cache"),
    }
}
