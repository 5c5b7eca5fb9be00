/*!
 * Reporting functionality for codedump
 *
 * Renders the end-of-run summary with the tabled library.
 */

use std::collections::HashMap;
use std::time::Duration;

use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::types::Dump;
use crate::utils::format_file_size;

/// Files listed individually before the table switches to the largest ones
const FULL_LISTING_LIMIT: usize = 15;
const TOP_FILES: usize = 10;

/// Information about a file in the report
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileReportInfo {
    /// Number of lines in the written content
    pub lines: usize,
    /// Number of characters in the written content
    pub chars: usize,
    /// Comment dialect, when comments were stripped
    pub dialect: Option<String>,
}

/// Statistics for a dump run
#[derive(Debug, Clone)]
pub struct ScanReport {
    /// Output file path
    pub output_file: String,
    /// Time taken to scan and write
    pub duration: Duration,
    /// Number of files dumped
    pub files_processed: usize,
    /// Number of files skipped
    pub files_skipped: usize,
    /// Number of files whose comments were removed
    pub files_stripped: usize,
    /// Total number of lines
    pub total_lines: usize,
    /// Total number of characters
    pub total_chars: usize,
    /// Bytes removed by comment stripping
    pub bytes_saved: u64,
    /// Details for each file
    pub file_details: HashMap<String, FileReportInfo>,
}

impl ScanReport {
    /// Build a report from the totals of a finished dump
    pub fn from_dump(
        dump: &Dump,
        output_file: String,
        duration: Duration,
        file_details: HashMap<String, FileReportInfo>,
    ) -> Self {
        Self {
            output_file,
            duration,
            files_processed: dump.files.len(),
            files_skipped: dump.skipped.len(),
            files_stripped: dump.files.iter().filter(|f| f.stripped).count(),
            total_lines: dump.total_lines(),
            total_chars: dump.total_chars(),
            bytes_saved: dump.bytes_saved(),
            file_details,
        }
    }
}

/// Format of the report output
pub enum ReportFormat {
    /// Console table output
    ConsoleTable,
}

/// Report generator for scan results
pub struct Reporter {
    format: ReportFormat,
}

impl Reporter {
    /// Create a new reporter
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    /// Format a number with human-readable units
    fn format_number(&self, num: usize) -> String {
        if num >= 1_000_000 {
            format!("{:.1}M", num as f64 / 1_000_000.0)
        } else if num >= 1_000 {
            format!("{:.1}K", num as f64 / 1_000.0)
        } else {
            num.to_string()
        }
    }

    /// Generate a report string based on scan statistics
    pub fn generate_report(&self, report: &ScanReport) -> String {
        match self.format {
            ReportFormat::ConsoleTable => self.generate_console_report(report),
        }
    }

    /// Print the report to stderr, keeping stdout free for the document
    pub fn print_report(&self, report: &ScanReport) {
        eprintln!("\n{}", self.generate_report(report));
    }

    /// Keep the last path segments that fit in `max_len`
    fn format_path(&self, path: &str, max_len: usize) -> String {
        if path.len() <= max_len {
            return path.to_string();
        }

        let mut current_len = 3; // "..."
        let mut segments = Vec::new();
        for part in path.split('/').rev() {
            let part_len = part.len() + 1;
            if current_len + part_len > max_len {
                break;
            }
            segments.push(part);
            current_len += part_len;
        }

        if segments.is_empty() {
            let name = path.rsplit('/').next().unwrap_or(path);
            return format!("...{}", name);
        }

        let mut result = String::from("...");
        for part in segments.iter().rev() {
            result.push('/');
            result.push_str(part);
        }
        result
    }

    fn create_summary_table(&self, report: &ScanReport) -> String {
        #[derive(Tabled)]
        struct SummaryRow {
            #[tabled(rename = "Metric")]
            key: String,

            #[tabled(rename = "Value")]
            value: String,
        }

        let mut rows = vec![
            SummaryRow {
                key: "📂 Output File".to_string(),
                value: report.output_file.clone(),
            },
            SummaryRow {
                key: "⏱️ Process Time".to_string(),
                value: format!("{:.4?}", report.duration),
            },
            SummaryRow {
                key: "📄 Files Dumped".to_string(),
                value: self.format_number(report.files_processed),
            },
            SummaryRow {
                key: "🚫 Files Skipped".to_string(),
                value: self.format_number(report.files_skipped),
            },
            SummaryRow {
                key: "📝 Total Lines".to_string(),
                value: self.format_number(report.total_lines),
            },
            SummaryRow {
                key: "📦 LLM Tokens".to_string(),
                value: format!(
                    "{} tokens (estimated)",
                    self.format_number(report.total_chars / 4)
                ),
            },
        ];

        if report.files_stripped > 0 {
            rows.push(SummaryRow {
                key: "✂️ Comments Stripped".to_string(),
                value: format!(
                    "{} files, {} saved",
                    self.format_number(report.files_stripped),
                    format_file_size(report.bytes_saved)
                ),
            });
        }

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        table.to_string()
    }

    fn create_files_table(&self, report: &ScanReport) -> String {
        #[derive(Tabled)]
        struct FileRow {
            #[tabled(rename = "File Path")]
            path: String,

            #[tabled(rename = "Stripped")]
            dialect: String,

            #[tabled(rename = "Lines")]
            lines: String,

            #[tabled(rename = "Est. Tokens")]
            tokens: String,
        }

        // Largest first, path as tie-breaker so the table is stable
        let mut files: Vec<_> = report.file_details.iter().collect();
        files.sort_by(|(pa, a), (pb, b)| b.chars.cmp(&a.chars).then_with(|| pa.cmp(pb)));
        if files.len() > FULL_LISTING_LIMIT {
            files.truncate(TOP_FILES);
        }

        let rows: Vec<FileRow> = files
            .iter()
            .map(|(path, info)| FileRow {
                path: self.format_path(path, 60),
                dialect: info.dialect.clone().unwrap_or_else(|| "-".to_string()),
                lines: self.format_number(info.lines),
                tokens: self.format_number(info.chars / 4),
            })
            .collect();

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        table.to_string()
    }

    fn generate_console_report(&self, report: &ScanReport) -> String {
        let summary_table = self.create_summary_table(report);
        let files_table = self.create_files_table(report);

        let summary_title = "✅  DUMP COMPLETE";
        let files_title = if report.file_details.len() > FULL_LISTING_LIMIT {
            "📋  TOP 10 LARGEST FILES BY CHARACTER COUNT  📋"
        } else {
            "📋  DUMPED FILES"
        };

        format!(
            "{}\n{}\n\n{}\n{}",
            files_title, files_table, summary_title, summary_table
        )
    }
}
