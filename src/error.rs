//! Global error handling for codedump
//!
//! Pattern and scanner failures are recovered where they happen; this type
//! covers everything that can stop a run.

use std::io;
use thiserror::Error;

/// Global error type for codedump operations
#[derive(Error, Debug)]
pub enum CodeDumpError {
    /// File system errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Path not found
    #[error("Path not found: {0}")]
    PathNotFound(String),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Specialized Result type for codedump operations
pub type Result<T> = std::result::Result<T, CodeDumpError>;

/// Creates a CodeDumpError with a formatted message
#[macro_export]
macro_rules! error {
    ($error_type:ident, $($arg:tt)*) => {
        $crate::error::CodeDumpError::$error_type(format!($($arg)*))
    };
}

/// Returns an error result with a formatted message
#[macro_export]
macro_rules! bail {
    ($error_type:ident, $($arg:tt)*) => {
        return Err($crate::error!($error_type, $($arg)*))
    };
}

/// Ensures a condition is true, otherwise returns an error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $error_type:ident, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($error_type, $($arg)*)
        }
    };
}

// Allow converting CodeDumpError to io::Error for tests returning io::Result
impl From<CodeDumpError> for io::Error {
    fn from(err: CodeDumpError) -> Self {
        match err {
            CodeDumpError::Io(e) => e,
            other => io::Error::new(io::ErrorKind::Other, other.to_string()),
        }
    }
}
