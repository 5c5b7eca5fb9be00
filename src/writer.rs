/*!
 * Markdown writer implementation for codedump
 */

use std::fmt::Write as _;
use std::fs::File;
use std::io::{self, BufWriter, Write};

use chrono::Local;

use crate::config::Config;
use crate::error::Result;
use crate::types::{Dump, DumpedFile};

/// Markdown writer for collected files
pub struct MarkdownWriter {
    /// Writer configuration
    config: Config,
}

impl MarkdownWriter {
    /// Create a new markdown writer
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Write the document to the configured output file, or stdout
    pub fn write(&self, dump: &Dump) -> Result<()> {
        let document = self.render(dump);
        match &self.config.output_file {
            Some(path) => {
                let mut writer = BufWriter::new(File::create(path)?);
                writer.write_all(document.as_bytes())?;
                writer.flush()?;
                tracing::info!(path = %path.display(), bytes = document.len(), "wrote document");
            }
            None => {
                let stdout = io::stdout();
                let mut lock = stdout.lock();
                lock.write_all(document.as_bytes())?;
                lock.flush()?;
            }
        }
        Ok(())
    }

    /// Render the whole document
    pub fn render(&self, dump: &Dump) -> String {
        let timestamp = Local::now().to_rfc3339();
        self.render_with_timestamp(dump, &timestamp)
    }

    fn render_with_timestamp(&self, dump: &Dump, timestamp: &str) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# {}\n", dump.root_name());
        let _ = writeln!(out, "Generated: {}\n", timestamp);

        if self.config.show_tree {
            out.push_str("## Structure\n\n```text\n");
            out.push_str(&render_tree(
                &dump.root_name(),
                dump.files.iter().map(|f| f.path.as_str()),
            ));
            out.push_str("```\n\n");
        }

        for file in &dump.files {
            write_file(&mut out, file);
        }

        if !dump.skipped.is_empty() {
            out.push_str("## Skipped\n\n");
            for skipped in &dump.skipped {
                let _ = writeln!(out, "- `{}`: {}", skipped.path, skipped.reason);
            }
            out.push('\n');
        }

        out
    }
}

/// Write one file section with a fence longer than any backtick run inside
fn write_file(out: &mut String, file: &DumpedFile) {
    let fence = "`".repeat(fence_len(&file.content));
    let _ = writeln!(out, "## {}\n", file.path);
    let _ = writeln!(out, "{}{}", fence, file.label());
    out.push_str(&file.content);
    if !file.content.is_empty() && !file.content.ends_with('\n') {
        out.push('\n');
    }
    let _ = writeln!(out, "{}\n", fence);
}

fn fence_len(content: &str) -> usize {
    let mut longest = 0;
    let mut run = 0;
    for c in content.chars() {
        if c == '`' {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }
    (longest + 1).max(3)
}

/// Indented tree of file paths given in traversal order.
///
/// Traversal is depth-first, so every directory's files are contiguous and
/// a directory line is printed once, before its first entry.
fn render_tree<'a>(root: &str, paths: impl Iterator<Item = &'a str>) -> String {
    let mut out = format!("{}/\n", root);
    let mut open: Vec<&str> = Vec::new();

    for path in paths {
        let mut parts: Vec<&str> = path.split('/').collect();
        let name = parts.pop().unwrap_or(path);

        let common = open
            .iter()
            .zip(&parts)
            .take_while(|(a, b)| a == b)
            .count();
        for (depth, dir) in parts.iter().enumerate().skip(common) {
            let _ = writeln!(out, "{}{}/", "  ".repeat(depth + 1), dir);
        }
        let _ = writeln!(out, "{}{}", "  ".repeat(parts.len() + 1), name);
        open = parts;
    }

    out
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::language;
    use crate::types::{SkipReason, SkippedFile};

    fn file(path: &str, content: &str) -> DumpedFile {
        DumpedFile {
            path: path.to_string(),
            language: language::detect(path),
            content: content.to_string(),
            original_size: content.len() as u64,
            stripped: false,
        }
    }

    #[test]
    fn test_fence_len() {
        assert_eq!(fence_len("plain"), 3);
        assert_eq!(fence_len("```rust\n```"), 4);
        assert_eq!(fence_len("a ````` b"), 6);
    }

    #[test]
    fn test_tree() {
        let tree = render_tree(
            "project",
            [
                "Cargo.toml",
                "src/lib.rs",
                "src/strip/mod.rs",
                "src/utils.rs",
                "tests/it.rs",
            ]
            .into_iter(),
        );
        let expected = "\
project/
  Cargo.toml
  src/
    lib.rs
    strip/
      mod.rs
    utils.rs
  tests/
    it.rs
";
        assert_eq!(tree, expected);
    }

    #[test]
    fn test_render_document() {
        let dump = Dump {
            root: PathBuf::from("/tmp/project"),
            files: vec![
                file("README.md", "# Title\n\n```sh\nrun\n```\n"),
                file("src/main.rs", "fn main() {}"),
            ],
            skipped: vec![SkippedFile {
                path: "logo.bin".to_string(),
                reason: SkipReason::Binary,
            }],
        };

        let writer = MarkdownWriter::new(Config::new("/tmp/project"));
        let doc = writer.render_with_timestamp(&dump, "2024-01-01T00:00:00+00:00");

        assert!(doc.starts_with("# project\n\nGenerated: 2024-01-01T00:00:00+00:00\n\n"));
        assert!(doc.contains("## Structure\n\n```text\nproject/\n  README.md\n  src/\n    main.rs\n```\n"));
        assert!(doc.contains("## README.md\n\n````markdown\n# Title\n\n```sh\nrun\n```\n````\n"));
        assert!(doc.contains("## src/main.rs\n\n```rust\nfn main() {}\n```\n"));
        assert!(doc.ends_with("## Skipped\n\n- `logo.bin`: binary\n\n"));
    }

    #[test]
    fn test_render_without_tree() {
        let mut config = Config::new("/tmp/project");
        config.show_tree = false;
        let dump = Dump {
            root: PathBuf::from("/tmp/project"),
            files: vec![file("notes.txt", "hello\n")],
            skipped: Vec::new(),
        };

        let doc = MarkdownWriter::new(config).render(&dump);
        assert!(!doc.contains("## Structure"));
        assert!(doc.contains("## notes.txt\n\n```text\nhello\n```\n"));
    }
}
