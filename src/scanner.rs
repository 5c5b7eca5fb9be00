/*!
 * Directory traversal and file materialization
 *
 * Traversal is sequential and sorted by file name so that the document is
 * deterministic; excluded directories are pruned before descent. Reading,
 * comment stripping and statistics happen in parallel afterwards.
 */

use std::borrow::Cow;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use glob_match::glob_match;
use indicatif::ProgressBar;
use rayon::prelude::*;
use walkdir::{DirEntry, WalkDir};

use crate::config::Config;
use crate::error::Result;
use crate::filter::FilterRuleSet;
use crate::language;
use crate::report::FileReportInfo;
use crate::strip::CommentStripper;
use crate::types::{Dump, DumpedFile, Entry, SkipReason, SkippedFile};
use crate::utils::{looks_binary, relative_slash_path};

/// Bytes inspected when deciding whether a file is binary
const SAMPLE_SIZE: usize = 8192;

/// Scanner statistics
#[derive(Debug, Clone, Default)]
pub struct ScannerStatistics {
    /// Number of files dumped
    pub files_processed: usize,
    /// Number of files left out after filtering
    pub files_skipped: usize,
    /// Number of dumped files whose comments were removed
    pub files_stripped: usize,
    /// Total number of lines
    pub total_lines: usize,
    /// Total number of characters
    pub total_chars: usize,
    /// Bytes removed by comment stripping
    pub bytes_saved: u64,
    /// Details for each dumped file
    pub file_details: HashMap<String, FileReportInfo>,
}

/// A file that passed filtering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Absolute path on disk
    pub path: PathBuf,
    /// Forward-slash path relative to the root
    pub relative: String,
}

/// Scanner for directory contents
pub struct Scanner {
    /// Scanner configuration
    config: Config,
    rules: FilterRuleSet,
    stripper: CommentStripper,
    /// Progress bar
    pub progress: Arc<ProgressBar>,
    /// Scanner statistics
    statistics: Arc<Mutex<ScannerStatistics>>,
}

impl Scanner {
    /// Create a new scanner, reading ignore rules as configured
    pub fn new(config: Config, progress: Arc<ProgressBar>) -> Result<Self> {
        let rules = config.filter_rules()?;
        Ok(Self::with_rules(config, rules, progress))
    }

    /// Create a scanner with an already built rule set
    pub fn with_rules(config: Config, rules: FilterRuleSet, progress: Arc<ProgressBar>) -> Self {
        let stripper = config.stripper();
        Self {
            config,
            rules,
            stripper,
            progress,
            statistics: Arc::new(Mutex::new(ScannerStatistics::default())),
        }
    }

    /// Get scanner statistics
    pub fn get_statistics(&self) -> ScannerStatistics {
        self.statistics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Walk the target directory and return every file that passes filtering,
    /// in traversal order
    pub fn collect_candidates(&self) -> Result<Vec<Candidate>> {
        let root = fs::canonicalize(&self.config.target_dir)?;
        let output = self.output_path();

        let walker = WalkDir::new(&root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| self.keep_entry(&root, entry));

        let mut candidates = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                if entry.path_is_symlink() {
                    tracing::debug!(path = %entry.path().display(), "not following symlink");
                }
                continue;
            }
            if output.as_deref() == Some(entry.path()) {
                continue;
            }

            let relative = relative_slash_path(entry.path(), &root);
            if !self.should_include(&relative) {
                tracing::trace!(path = %relative, "not matched by include patterns");
                continue;
            }
            candidates.push(Candidate {
                path: entry.into_path(),
                relative,
            });
        }

        Ok(candidates)
    }

    /// Scan the target directory and materialize every included file
    pub fn scan(&self) -> Result<Dump> {
        let root = fs::canonicalize(&self.config.target_dir)?;
        let candidates = self.collect_candidates()?;
        tracing::info!(files = candidates.len(), "collected files");
        self.progress.set_length(candidates.len() as u64);

        // Indexed collect keeps traversal order
        let entries: Vec<Entry> = candidates
            .par_iter()
            .map(|candidate| self.process_file(&candidate.path, &candidate.relative))
            .collect();

        let mut dump = Dump {
            root,
            ..Dump::default()
        };
        for entry in entries {
            match entry {
                Entry::Dumped(file) => dump.files.push(file),
                Entry::Skipped(skipped) => dump.skipped.push(skipped),
            }
        }
        Ok(dump)
    }

    /// Check if a file should be included based on patterns
    pub fn should_include(&self, relative: &str) -> bool {
        // If no include patterns, include everything
        if self.config.include_patterns.is_empty() {
            return true;
        }
        let file_name = relative.rsplit('/').next().unwrap_or(relative);
        self.config
            .include_patterns
            .iter()
            .any(|p| glob_match(p, file_name) || glob_match(p, relative))
    }

    /// Whether comments of this file are kept even when stripping
    pub fn preserve_comments(&self, relative: &str) -> bool {
        let file_name = relative.rsplit('/').next().unwrap_or(relative);
        self.config
            .keep_comments
            .iter()
            .any(|p| glob_match(p, file_name) || glob_match(p, relative))
    }

    fn keep_entry(&self, root: &Path, entry: &DirEntry) -> bool {
        if entry.depth() == 0 {
            return true;
        }
        let relative = relative_slash_path(entry.path(), root);
        let excluded = self
            .rules
            .should_exclude(&relative, entry.file_type().is_dir());
        if excluded {
            tracing::debug!(path = %relative, "excluded");
        }
        !excluded
    }

    /// Absolute path of the output file, so that it is never dumped into itself
    fn output_path(&self) -> Option<PathBuf> {
        let output = self.config.output_file.as_deref()?;
        let parent = output
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let parent = fs::canonicalize(parent).ok()?;
        Some(parent.join(output.file_name()?))
    }

    /// Read, classify and transform one file
    fn process_file(&self, abs_path: &Path, relative: &str) -> Entry {
        self.progress.inc(1);

        // Truncate if too long to avoid display issues
        let display_name = if relative.len() > 40 {
            let cut = relative
                .char_indices()
                .map(|(i, _)| i)
                .find(|&i| relative.len() - i <= 37)
                .unwrap_or(0);
            format!("...{}", &relative[cut..])
        } else {
            relative.to_string()
        };
        self.progress
            .set_message(format!("Current file: {}", display_name));

        match self.read_file(abs_path, relative) {
            Ok(file) => {
                self.record(&file);
                Entry::Dumped(file)
            }
            Err(reason) => {
                tracing::debug!(path = %relative, %reason, "skipped");
                self.statistics
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .files_skipped += 1;
                Entry::Skipped(SkippedFile {
                    path: relative.to_string(),
                    reason,
                })
            }
        }
    }

    fn read_file(
        &self,
        abs_path: &Path,
        relative: &str,
    ) -> std::result::Result<DumpedFile, SkipReason> {
        let size = fs::metadata(abs_path)
            .map_err(|e| SkipReason::ReadError(e.to_string()))?
            .len();
        if size > self.config.max_file_size {
            return Err(SkipReason::TooLarge(size));
        }

        let bytes = fs::read(abs_path).map_err(|e| SkipReason::ReadError(e.to_string()))?;
        if looks_binary(&bytes[..bytes.len().min(SAMPLE_SIZE)]) {
            return Err(SkipReason::Binary);
        }
        let text = String::from_utf8(bytes).map_err(|_| SkipReason::NotUtf8)?;

        let language = language::detect(relative);
        let stripped = if self.config.strip_comments {
            let preserve = self.preserve_comments(relative);
            match self.stripper.process(&text, language, preserve) {
                Cow::Owned(content) => Some(content),
                Cow::Borrowed(_) => None,
            }
        } else {
            None
        };
        let (content, stripped) = match stripped {
            Some(content) => (content, true),
            None => (text, false),
        };

        Ok(DumpedFile {
            path: relative.to_string(),
            language,
            content,
            original_size: size,
            stripped,
        })
    }

    fn record(&self, file: &DumpedFile) {
        let lines = file.lines();
        let chars = file.content.chars().count();

        let mut stats = self
            .statistics
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        stats.files_processed += 1;
        stats.total_lines += lines;
        stats.total_chars += chars;
        if file.stripped {
            stats.files_stripped += 1;
            stats.bytes_saved += file.bytes_saved();
        }
        stats.file_details.insert(
            file.path.clone(),
            FileReportInfo {
                lines,
                chars,
                dialect: file
                    .language
                    .and_then(|l| l.dialect)
                    .filter(|_| file.stripped)
                    .map(|d| d.to_string()),
            },
        );
    }
}
