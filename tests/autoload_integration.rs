use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_dir(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!(
        "autoload_gen_it_{}_{}_{}",
        std::process::id(),
        nanos,
        name
    ))
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}

fn run(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_autoload-gen"))
        .args(args)
        .output()
        .expect("failed to run autoload-gen")
}

#[test]
fn generates_lazy_map_and_eager_requires() {
    let base = temp_dir("end_to_end");
    let src = base.join("src");
    write_file(&src.join("A.php"), "<?php\nclass Foo {}\n");
    write_file(&src.join("B.php"), "<?php\nfunction bar() {}\n");

    let outfile = src.join("autoload.php");
    let out = run(&[outfile.to_str().unwrap()]);
    assert!(
        out.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Scanning"));
    assert!(stdout.contains("Output written to"));

    let artifact = std::fs::read_to_string(&outfile).unwrap();
    assert!(artifact.starts_with("<?php\n"));
    assert!(artifact.contains("// !! Generated by: "));
    assert!(artifact.contains("'Foo' => 'A.php',"));
    assert_eq!(
        artifact.matches("require_once __DIR__ . '/B.php';").count(),
        1
    );
    assert!(!artifact.contains("'/A.php'"));

    // The scan cache appears as a dotfile next to the output.
    assert!(src.join(".autoload-gen.cache").exists());

    let _ = std::fs::remove_dir_all(base);
}

#[test]
fn regeneration_is_byte_identical() {
    let base = temp_dir("idempotent");
    let src = base.join("src");
    write_file(&src.join("A.php"), "<?php\nclass Foo {}\n");
    write_file(&src.join("util.php"), "<?php\nconst LIMIT = 10;\n");

    let outfile = src.join("autoload.php");
    let args = [outfile.to_str().unwrap().to_string()];
    let args: Vec<&str> = args.iter().map(|s| s.as_str()).collect();

    assert!(run(&args).status.success());
    let first = std::fs::read(&outfile).unwrap();

    // Second run resolves from the cache and re-scans the artifact itself,
    // which declares nothing; bytes must not change.
    assert!(run(&args).status.success());
    let second = std::fs::read(&outfile).unwrap();
    assert_eq!(first, second);

    let _ = std::fs::remove_dir_all(base);
}

#[test]
fn cache_entries_survive_a_second_run() {
    let base = temp_dir("cache_reuse");
    let src = base.join("src");
    let a = src.join("A.php");
    write_file(&a, "<?php\nclass Foo {}\n");

    let outfile = src.join("autoload.php");
    assert!(run(&[outfile.to_str().unwrap()]).status.success());

    let cache_path = src.join(".autoload-gen.cache");
    let table: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&cache_path).unwrap()).unwrap();
    let canonical = a.canonicalize().unwrap();
    let entry = table
        .get(a.to_str().unwrap())
        .or_else(|| table.get(canonical.to_str().unwrap()))
        .expect("cache entry for A.php");
    assert_eq!(entry["classes"][0], "Foo");

    assert!(run(&[outfile.to_str().unwrap()]).status.success());
    let again: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&cache_path).unwrap()).unwrap();
    let entry_again = again
        .get(a.to_str().unwrap())
        .or_else(|| again.get(canonical.to_str().unwrap()))
        .expect("cache entry for A.php after rerun");
    assert_eq!(entry, entry_again);

    let _ = std::fs::remove_dir_all(base);
}

#[test]
fn no_cache_skips_the_cache_file_entirely() {
    let base = temp_dir("no_cache");
    let src = base.join("src");
    write_file(&src.join("A.php"), "<?php\nclass Foo {}\n");

    let outfile = src.join("autoload.php");
    assert!(
        run(&[outfile.to_str().unwrap(), "--no-cache"])
            .status
            .success()
    );
    assert!(!src.join(".autoload-gen.cache").exists());

    let _ = std::fs::remove_dir_all(base);
}

#[test]
fn excluded_directories_do_not_reach_the_artifact() {
    let base = temp_dir("exclude");
    let src = base.join("src");
    write_file(&src.join("A.php"), "<?php\nclass Foo {}\n");
    write_file(&src.join("vendor/V.php"), "<?php\nclass Vendor {}\n");

    let outfile = src.join("autoload.php");
    let vendor = src.join("vendor");
    let out = run(&[
        outfile.to_str().unwrap(),
        src.to_str().unwrap(),
        "--exclude",
        vendor.to_str().unwrap(),
    ]);
    assert!(out.status.success());

    let artifact = std::fs::read_to_string(&outfile).unwrap();
    assert!(artifact.contains("'Foo'"));
    assert!(!artifact.contains("Vendor"));

    let _ = std::fs::remove_dir_all(base);
}

#[test]
fn require_method_flag_changes_the_emitted_statements() {
    let base = temp_dir("method");
    let src = base.join("src");
    write_file(&src.join("f.php"), "<?php\nfunction f() {}\n");

    let outfile = src.join("autoload.php");
    let out = run(&[
        outfile.to_str().unwrap(),
        "--require-method",
        "include_once",
        "--prepend",
    ]);
    assert!(out.status.success());

    let artifact = std::fs::read_to_string(&outfile).unwrap();
    assert!(artifact.contains("include_once __DIR__ . '/f.php';"));
    assert!(artifact.contains("}, true, true);"));

    let _ = std::fs::remove_dir_all(base);
}

#[test]
fn broken_source_aborts_without_writing_the_artifact() {
    let base = temp_dir("broken");
    let src = base.join("src");
    write_file(&src.join("bad.php"), "<?php function ((( {\n");

    let outfile = src.join("autoload.php");
    let out = run(&[outfile.to_str().unwrap()]);
    assert!(!out.status.success());
    assert!(
        String::from_utf8_lossy(&out.stderr).contains("failed to parse"),
        "stderr: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    assert!(!outfile.exists());

    let _ = std::fs::remove_dir_all(base);
}
