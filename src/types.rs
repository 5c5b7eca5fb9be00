/*!
 * Core types produced by a dump run
 */

use std::fmt;
use std::path::PathBuf;

use crate::language::Language;

/// A file whose content made it into the document
#[derive(Debug, Clone)]
pub struct DumpedFile {
    /// Forward-slash path relative to the dump root
    pub path: String,
    /// Detected language, if any
    pub language: Option<&'static Language>,
    /// Content as it will be written
    pub content: String,
    /// Size on disk in bytes
    pub original_size: u64,
    /// Whether comments were removed from `content`
    pub stripped: bool,
}

impl DumpedFile {
    /// Fence info string
    pub fn label(&self) -> &'static str {
        self.language.map(|l| l.label).unwrap_or("")
    }

    /// Number of lines in the written content
    pub fn lines(&self) -> usize {
        self.content.lines().count()
    }

    /// Bytes removed by stripping
    pub fn bytes_saved(&self) -> u64 {
        self.original_size.saturating_sub(self.content.len() as u64)
    }
}

/// Why a file was left out of the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    Binary,
    /// Size on disk in bytes
    TooLarge(u64),
    NotUtf8,
    ReadError(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Binary => write!(f, "binary"),
            Self::TooLarge(size) => write!(f, "too large ({} bytes)", size),
            Self::NotUtf8 => write!(f, "not UTF-8"),
            Self::ReadError(e) => write!(f, "read error: {}", e),
        }
    }
}

/// A file met during traversal whose content was not dumped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub path: String,
    pub reason: SkipReason,
}

/// Outcome of materializing one file
#[derive(Debug, Clone)]
pub enum Entry {
    Dumped(DumpedFile),
    Skipped(SkippedFile),
}

/// Everything collected in one run, in traversal order
#[derive(Debug, Clone, Default)]
pub struct Dump {
    /// Absolute path of the dump root
    pub root: PathBuf,
    pub files: Vec<DumpedFile>,
    pub skipped: Vec<SkippedFile>,
}

impl Dump {
    /// Display name of the root directory
    pub fn root_name(&self) -> String {
        self.root
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.root.display().to_string())
    }

    pub fn total_lines(&self) -> usize {
        self.files.iter().map(DumpedFile::lines).sum()
    }

    pub fn total_chars(&self) -> usize {
        self.files.iter().map(|f| f.content.chars().count()).sum()
    }

    pub fn bytes_saved(&self) -> u64 {
        self.files.iter().map(DumpedFile::bytes_saved).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_reason_display() {
        assert_eq!(SkipReason::Binary.to_string(), "binary");
        assert_eq!(SkipReason::TooLarge(2048).to_string(), "too large (2048 bytes)");
        assert_eq!(
            SkipReason::ReadError("denied".to_string()).to_string(),
            "read error: denied"
        );
    }

    #[test]
    fn test_dump_totals() {
        let dump = Dump {
            root: PathBuf::from("/tmp/project"),
            files: vec![DumpedFile {
                path: "src/lib.rs".to_string(),
                language: crate::language::detect("src/lib.rs"),
                content: "fn a() {}\nfn b() {}".to_string(),
                original_size: 40,
                stripped: true,
            }],
            skipped: Vec::new(),
        };

        assert_eq!(dump.root_name(), "project");
        assert_eq!(dump.total_lines(), 2);
        assert_eq!(dump.bytes_saved(), 21);
        assert_eq!(dump.files[0].label(), "rust");
    }
}
