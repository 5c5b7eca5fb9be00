/*!
 * Utility functions for codedump
 */

use std::path::Path;

/// Path of `path` relative to `root`, with forward slashes
pub fn relative_slash_path(path: &Path, root: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Whether a sample of file content looks binary.
///
/// A NUL byte, or more than 10% control characters other than common
/// whitespace, marks the sample as binary.
pub fn looks_binary(sample: &[u8]) -> bool {
    if sample.is_empty() {
        return false;
    }
    if sample.contains(&0) {
        return true;
    }
    // Count binary characters (0x00-0x08, 0x0E-0x1F)
    let binary_count = sample
        .iter()
        .filter(|&&b| (b < 9) || (b > 13 && b < 32))
        .count();
    binary_count as f32 / sample.len() as f32 >= 0.1
}

/// Format a human-readable file size
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}
