/*!
 * Literal-aware comment stripping
 *
 * The scanner classifies every span of a file as literal, comment or code
 * and keeps only literals, code and preserved directive comments. A line
 * cleanup pass follows. Any scanner inconsistency leaves the file untouched.
 */

mod cleanup;
pub mod dialect;
mod lexer;

use std::borrow::Cow;

pub use dialect::{CommentDialect, Escape, LineComment, Position, Quote, Syntax};
pub use lexer::ScanInconsistency;

use crate::language::Language;

/// Formatter toggles kept verbatim when they form a whole line comment
pub const DEFAULT_PRESERVED_DIRECTIVES: &[&str] = &[
    "fmt: off",
    "fmt: on",
    "fmt: skip",
    "@formatter:off",
    "@formatter:on",
    "clang-format off",
    "clang-format on",
    "yapf: disable",
    "yapf: enable",
    "autopep8: off",
    "autopep8: on",
];

/// Options shared by every file of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StripOptions {
    /// Comment bodies (text after the opener, trimmed) that survive stripping
    pub preserved_directives: Vec<String>,
}

impl Default for StripOptions {
    fn default() -> Self {
        Self {
            preserved_directives: DEFAULT_PRESERVED_DIRECTIVES
                .iter()
                .map(|d| d.to_string())
                .collect(),
        }
    }
}

impl StripOptions {
    /// Add extra preserved directives
    pub fn with_directives<I, S>(mut self, directives: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for directive in directives {
            let directive = directive.into();
            let directive = directive.trim();
            if !directive.is_empty()
                && !self.preserved_directives.iter().any(|d| d == directive)
            {
                self.preserved_directives.push(directive.to_string());
            }
        }
        self
    }
}

/// Comment stripper configured for one run
#[derive(Debug, Clone, Default)]
pub struct CommentStripper {
    options: StripOptions,
}

impl CommentStripper {
    pub fn new(options: StripOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &StripOptions {
        &self.options
    }

    /// Strip comments using a dialect's default syntax
    pub fn strip(&self, text: &str, dialect: CommentDialect) -> String {
        self.strip_syntax(text, &dialect.syntax())
    }

    /// Strip comments using an explicit syntax.
    ///
    /// Returns `text` unchanged if the scanner reports an inconsistency.
    pub fn strip_syntax(&self, text: &str, syntax: &Syntax) -> String {
        match lexer::scan(text, syntax, &self.options.preserved_directives) {
            Ok(output) => cleanup::tidy(&output.text, &output.literals),
            Err(e) => {
                tracing::debug!(error = %e, "keeping original text");
                text.to_string()
            }
        }
    }

    /// Transform one file's content.
    ///
    /// Files without a known dialect, and files whose comments must be
    /// preserved, come back borrowed and unchanged.
    pub fn process<'t>(
        &self,
        text: &'t str,
        language: Option<&Language>,
        preserve_comments: bool,
    ) -> Cow<'t, str> {
        if preserve_comments {
            return Cow::Borrowed(text);
        }
        match language.and_then(Language::syntax) {
            Some(syntax) => Cow::Owned(self.strip_syntax(text, &syntax)),
            None => Cow::Borrowed(text),
        }
    }
}

/// Strip comments with the default preserved directives
pub fn strip(text: &str, dialect: CommentDialect) -> String {
    CommentStripper::default().strip(text, dialect)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language;
    use strum::IntoEnumIterator;

    #[test]
    fn test_url_comment_line_is_removed() {
        assert_eq!(strip("// http://example.com", CommentDialect::CFamily), "");
        assert_eq!(
            strip("a = \"http://example.com\"", CommentDialect::CFamily),
            "a = \"http://example.com\""
        );
    }

    #[test]
    fn test_directive_pair_survives() {
        let src = "\
// regular comment
fn table() {
    // fmt: off
    let m = [1,0,
             0,1];
    // fmt: on
    let x = 1; // trailing
}";
        let expected = "\
fn table() {
    // fmt: off
    let m = [1,0,
             0,1];
    // fmt: on
    let x = 1;
}";
        assert_eq!(strip(src, CommentDialect::CFamily), expected);
    }

    #[test]
    fn test_extra_directive() {
        let stripper = CommentStripper::new(StripOptions::default().with_directives(["keep-me"]));
        assert_eq!(
            stripper.strip("# keep-me\n# drop-me\nx", CommentDialect::Hash),
            "# keep-me\n\nx"
        );
    }

    #[test]
    fn test_blank_lines_after_stripping() {
        let src = "a\n// one\n\n\n\n// two\nb\n";
        let out = strip(src, CommentDialect::CFamily);
        assert_eq!(out, "a\n\nb");
        assert!(!out.contains("\n\n\n"));
    }

    #[test]
    fn test_idempotent_for_every_dialect() {
        let samples = [
            "x = \"# // -- <!-- kept -->\"  // c\n\n\n\n# h\n-- s\nREM r\n<!-- m -->\n/* b */ y\n",
            "SELECT 'a''b' -- c\nFROM t;\n",
            "  \n\n<div>\n<!-- gone -->\n</div>\n\n",
            "a /*x*///\nb /*y*/--\nc/*z*///",
        ];
        for dialect in CommentDialect::iter() {
            for sample in samples {
                let once = strip(sample, dialect);
                assert_eq!(strip(&once, dialect), once, "dialect {}", dialect);
            }
        }
    }

    #[test]
    fn test_process_dispatch() {
        let stripper = CommentStripper::default();
        let rust = language::detect("src/lib.rs");
        let text = "fn main() {} // done";

        assert_eq!(stripper.process(text, rust, false), "fn main() {}");
        assert!(matches!(stripper.process(text, rust, true), Cow::Borrowed(_)));
        assert!(matches!(
            stripper.process(text, language::detect("notes.unknown"), false),
            Cow::Borrowed(_)
        ));
    }

    #[test]
    fn test_dialect_names() {
        assert_eq!(CommentDialect::CFamily.to_string(), "c-family");
        assert_eq!(CommentDialect::Hybrid.to_string(), "hybrid");
    }
}
