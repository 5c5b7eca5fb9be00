/*!
 * codedump - Collect a project's text files into one markdown document
 *
 * Entries are filtered with gitignore-style rules and exclusion lists, and
 * comments can be stripped with a literal-aware lexical scanner before the
 * files are written as fenced blocks.
 */

pub mod config;
pub mod error;
pub mod filter;
pub mod language;
pub mod report;
pub mod scanner;
pub mod strip;
pub mod types;
pub mod utils;
pub mod writer;

#[cfg(test)]
mod tests;

// Re-export main components for easier access
pub use config::Config;
pub use error::{CodeDumpError, Result};
pub use filter::{FilterRuleSet, PatternKind};
pub use language::Language;
pub use report::{FileReportInfo, ReportFormat, Reporter, ScanReport};
pub use scanner::Scanner;
pub use strip::{CommentDialect, CommentStripper, StripOptions};
pub use types::{Dump, DumpedFile, SkipReason, SkippedFile};
pub use writer::MarkdownWriter;

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
