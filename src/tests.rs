/*!
 * Tests for codedump functionality
 */

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use indicatif::ProgressBar;
use tempfile::tempdir;

use crate::config::Config;
use crate::scanner::Scanner;
use crate::types::{Dump, SkipReason};
use crate::writer::MarkdownWriter;

fn write_file(dir: &Path, rel: &str, content: &[u8]) -> io::Result<()> {
    let path = dir.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(content)
}

// Helper function to create a test project
fn setup_test_project() -> io::Result<tempfile::TempDir> {
    let temp_dir = tempdir()?;
    let root = temp_dir.path();

    write_file(
        root,
        "src/main.rs",
        b"// entry point\nfn main() {\n    let url = \"http://example.com\"; // link\n}\n",
    )?;
    write_file(root, "src/util.py", b"#!/usr/bin/env python3\n# helper\nx = '#not a comment'\n")?;
    write_file(root, "README.md", b"# Project\n\n<!-- hidden -->\nText\n")?;
    write_file(root, "generated/output.txt", b"generated\n")?;
    write_file(root, "generated/keep.txt", b"kept\n")?;
    write_file(root, "node_modules/pkg/index.js", b"module.exports = 1;\n")?;
    write_file(root, "assets/logo.png", &[0x89, b'P', b'N', b'G', 0, 0, 0, 13])?;
    write_file(root, "data.bin", &[0u8, 1, 2, 3])?;
    write_file(root, ".gitignore", b"generated/\n!generated/keep.txt\n*.tmp\n")?;
    write_file(root, "scratch.tmp", b"temporary\n")?;

    Ok(temp_dir)
}

fn scan(config: Config) -> io::Result<Dump> {
    let scanner = Scanner::new(config, Arc::new(ProgressBar::hidden()))?;
    Ok(scanner.scan()?)
}

fn paths(dump: &Dump) -> Vec<&str> {
    dump.files.iter().map(|f| f.path.as_str()).collect()
}

#[test]
fn test_basic_scan_respects_rules() -> io::Result<()> {
    let temp_dir = setup_test_project()?;
    let dump = scan(Config::new(temp_dir.path()))?;

    // Sorted by file name, depth first
    assert_eq!(
        paths(&dump),
        vec![
            ".gitignore",
            "README.md",
            "generated/keep.txt",
            "src/main.rs",
            "src/util.py",
        ]
    );

    assert_eq!(dump.skipped.len(), 1);
    assert_eq!(dump.skipped[0].path, "data.bin");
    assert_eq!(dump.skipped[0].reason, SkipReason::Binary);

    Ok(())
}

#[test]
fn test_scan_without_stripping_keeps_content() -> io::Result<()> {
    let temp_dir = setup_test_project()?;
    let dump = scan(Config::new(temp_dir.path()))?;

    let main = dump.files.iter().find(|f| f.path == "src/main.rs").unwrap();
    assert!(!main.stripped);
    assert!(main.content.starts_with("// entry point"));
    assert_eq!(main.label(), "rust");

    Ok(())
}

#[test]
fn test_strip_comments() -> io::Result<()> {
    let temp_dir = setup_test_project()?;
    let mut config = Config::new(temp_dir.path());
    config.strip_comments = true;
    let dump = scan(config)?;

    let content = |path: &str| {
        dump.files
            .iter()
            .find(|f| f.path == path)
            .map(|f| f.content.clone())
            .unwrap_or_default()
    };

    assert_eq!(
        content("src/main.rs"),
        "fn main() {\n    let url = \"http://example.com\";\n}"
    );
    assert_eq!(
        content("src/util.py"),
        "#!/usr/bin/env python3\n\nx = '#not a comment'"
    );
    assert_eq!(content("README.md"), "# Project\n\nText");
    // No dialect for plain text
    assert_eq!(content("generated/keep.txt"), "kept\n");

    Ok(())
}

#[test]
fn test_keep_comments_glob() -> io::Result<()> {
    let temp_dir = setup_test_project()?;
    let mut config = Config::new(temp_dir.path());
    config.strip_comments = true;
    config.keep_comments = vec!["*.py".to_string()];
    let dump = scan(config)?;

    let util = dump.files.iter().find(|f| f.path == "src/util.py").unwrap();
    assert!(!util.stripped);
    assert!(util.content.contains("# helper"));

    let main = dump.files.iter().find(|f| f.path == "src/main.rs").unwrap();
    assert!(main.stripped);

    Ok(())
}

#[test]
fn test_no_ignore_file_and_no_defaults() -> io::Result<()> {
    let temp_dir = setup_test_project()?;
    let mut config = Config::new(temp_dir.path());
    config.use_ignore_file = false;
    config.default_excludes = false;
    let dump = scan(config)?;

    let found = paths(&dump);
    assert!(found.contains(&"generated/output.txt"));
    assert!(found.contains(&"node_modules/pkg/index.js"));
    assert!(found.contains(&"scratch.tmp"));

    // Binary detection still applies
    assert!(dump.skipped.iter().any(|s| s.path == "assets/logo.png"));

    Ok(())
}

#[test]
fn test_cli_exclusions() -> io::Result<()> {
    let temp_dir = setup_test_project()?;
    let mut config = Config::new(temp_dir.path());
    config.exclude_dirs = vec!["src".to_string()];
    config.exclude_exts = vec!["MD".to_string()];
    config.exclude_globs = vec![".git*".to_string()];
    let dump = scan(config)?;

    assert_eq!(paths(&dump), vec!["generated/keep.txt"]);

    Ok(())
}

#[test]
fn test_include_patterns() -> io::Result<()> {
    let temp_dir = setup_test_project()?;
    let mut config = Config::new(temp_dir.path());
    config.include_patterns = vec!["*.rs".to_string(), "*.py".to_string()];
    let dump = scan(config)?;

    assert_eq!(paths(&dump), vec!["src/main.rs", "src/util.py"]);

    Ok(())
}

#[test]
fn test_large_file_is_skipped() -> io::Result<()> {
    let temp_dir = setup_test_project()?;
    let line = "This is a line of text that will be repeated many times.\n";
    write_file(temp_dir.path(), "large.txt", line.repeat(100).as_bytes())?;

    let mut config = Config::new(temp_dir.path());
    config.max_file_size = 1024;
    let dump = scan(config)?;

    let skipped = dump.skipped.iter().find(|s| s.path == "large.txt").unwrap();
    assert!(matches!(skipped.reason, SkipReason::TooLarge(size) if size > 1024));

    Ok(())
}

#[test]
fn test_non_utf8_is_skipped() -> io::Result<()> {
    let temp_dir = setup_test_project()?;
    write_file(temp_dir.path(), "latin1.txt", b"caf\xe9 au lait\n")?;

    let dump = scan(Config::new(temp_dir.path()))?;
    let skipped = dump.skipped.iter().find(|s| s.path == "latin1.txt").unwrap();
    assert_eq!(skipped.reason, SkipReason::NotUtf8);

    Ok(())
}

#[test]
fn test_output_file_is_not_dumped() -> io::Result<()> {
    let temp_dir = setup_test_project()?;
    let output = temp_dir.path().join("codedump.md");
    write_file(temp_dir.path(), "codedump.md", b"# previous run\n")?;

    let mut config = Config::new(temp_dir.path());
    config.output_file = Some(output.clone());
    let dump = scan(config.clone())?;
    assert!(!paths(&dump).contains(&"codedump.md"));

    MarkdownWriter::new(config).write(&dump)?;
    let document = fs::read_to_string(&output)?;
    let root_name = temp_dir
        .path()
        .file_name()
        .unwrap()
        .to_string_lossy()
        .to_string();
    assert!(document.starts_with(&format!("# {}\n", root_name)));
    assert!(document.contains("## src/main.rs\n\n```rust\n"));
    assert!(document.contains("- `data.bin`: binary"));

    Ok(())
}

#[test]
fn test_custom_ignore_file() -> io::Result<()> {
    let temp_dir = setup_test_project()?;
    let rules = temp_dir.path().join("custom.ignore");
    write_file(temp_dir.path(), "custom.ignore", b"*.md\n/src/\ncustom.ignore\n")?;

    let mut config = Config::new(temp_dir.path());
    config.ignore_file = Some(rules);
    let dump = scan(config)?;

    // The custom file replaces .gitignore
    assert_eq!(
        paths(&dump),
        vec![
            ".gitignore",
            "generated/keep.txt",
            "generated/output.txt",
            "scratch.tmp",
        ]
    );

    Ok(())
}

#[test]
fn test_statistics() -> io::Result<()> {
    let temp_dir = setup_test_project()?;
    let mut config = Config::new(temp_dir.path());
    config.strip_comments = true;

    let scanner = Scanner::new(config, Arc::new(ProgressBar::hidden()))?;
    let dump = scanner.scan()?;
    let stats = scanner.get_statistics();

    assert_eq!(stats.files_processed, dump.files.len());
    assert_eq!(stats.files_skipped, dump.skipped.len());
    assert_eq!(stats.total_lines, dump.total_lines());
    assert!(stats.bytes_saved > 0);
    assert_eq!(
        stats.file_details["src/main.rs"].dialect.as_deref(),
        Some("c-family")
    );

    Ok(())
}
