/*!
 * Comment dialects and the lexical syntax each one implies
 */

use strum::{Display, EnumIter};

/// Family of comment delimiters used by a language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum CommentDialect {
    /// `//` line comments and `/* */` blocks
    CFamily,
    /// `<!-- -->` blocks
    Markup,
    /// `#` line comments
    Hash,
    /// `--` line comments and `/* */` blocks
    Sql,
    /// `REM` and `::` at line start
    Batch,
    /// Markup and C-family together (single-file components)
    Hybrid,
}

/// How a quoted literal escapes its own delimiter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Escape {
    /// `\"` and `\\`
    Backslash,
    /// `''` inside a `'...'` literal
    Doubled,
    /// No escapes at all
    None,
}

/// A protected literal delimiter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    /// Opening and closing delimiter
    pub delimiter: &'static str,
    pub escape: Escape,
    /// Whether the literal may span lines. A single-line literal that does
    /// not close on its own line is not treated as a literal.
    pub multiline: bool,
}

/// Where a line-comment opener is recognized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Anywhere,
    /// At line start, or after whitespace or a quote character
    AfterSpace,
    /// Only preceded by indentation (and an optional `@`)
    LineStart,
}

/// A line-comment opener
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineComment {
    pub opener: &'static str,
    pub position: Position,
    pub case_insensitive: bool,
    /// Opener must be followed by whitespace or end of line (`REM`, not `REMOVE`)
    pub whole_word: bool,
}

/// Everything the scanner needs to know about one language's lexical form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Syntax {
    /// Tried in order, so longer delimiters come first
    pub quotes: Vec<Quote>,
    pub block_comments: Vec<(&'static str, &'static str)>,
    pub line_comments: Vec<LineComment>,
    /// Keep a `#!` first line
    pub keep_shebang: bool,
    /// `'a` not closed right after the identifier is a lifetime, not a literal
    pub lifetimes: bool,
}

const C_QUOTES: [Quote; 3] = [
    Quote {
        delimiter: "\"",
        escape: Escape::Backslash,
        multiline: true,
    },
    Quote {
        delimiter: "'",
        escape: Escape::Backslash,
        multiline: false,
    },
    Quote {
        delimiter: "`",
        escape: Escape::Backslash,
        multiline: true,
    },
];

const SLASH_SLASH: LineComment = LineComment {
    opener: "//",
    position: Position::Anywhere,
    case_insensitive: false,
    whole_word: false,
};

const C_BLOCK: (&str, &str) = ("/*", "*/");
const MARKUP_BLOCK: (&str, &str) = ("<!--", "-->");

impl CommentDialect {
    /// Lexical syntax of this dialect
    pub fn syntax(self) -> Syntax {
        match self {
            Self::CFamily => Syntax {
                quotes: C_QUOTES.to_vec(),
                block_comments: vec![C_BLOCK],
                line_comments: vec![SLASH_SLASH],
                keep_shebang: false,
                lifetimes: false,
            },
            Self::Markup => Syntax {
                quotes: vec![Quote {
                    delimiter: "\"",
                    escape: Escape::None,
                    multiline: false,
                }],
                block_comments: vec![MARKUP_BLOCK],
                line_comments: Vec::new(),
                keep_shebang: false,
                lifetimes: false,
            },
            Self::Hash => Syntax {
                quotes: vec![
                    Quote {
                        delimiter: "\"\"\"",
                        escape: Escape::Backslash,
                        multiline: true,
                    },
                    Quote {
                        delimiter: "'''",
                        escape: Escape::Backslash,
                        multiline: true,
                    },
                    Quote {
                        delimiter: "\"",
                        escape: Escape::Backslash,
                        multiline: false,
                    },
                    Quote {
                        delimiter: "'",
                        escape: Escape::Backslash,
                        multiline: false,
                    },
                ],
                block_comments: Vec::new(),
                line_comments: vec![LineComment {
                    opener: "#",
                    position: Position::AfterSpace,
                    case_insensitive: false,
                    whole_word: false,
                }],
                keep_shebang: true,
                lifetimes: false,
            },
            Self::Sql => Syntax {
                quotes: vec![
                    Quote {
                        delimiter: "'",
                        escape: Escape::Doubled,
                        multiline: true,
                    },
                    Quote {
                        delimiter: "\"",
                        escape: Escape::Doubled,
                        multiline: false,
                    },
                ],
                block_comments: vec![C_BLOCK],
                line_comments: vec![LineComment {
                    opener: "--",
                    position: Position::Anywhere,
                    case_insensitive: false,
                    whole_word: false,
                }],
                keep_shebang: false,
                lifetimes: false,
            },
            Self::Batch => Syntax {
                quotes: vec![Quote {
                    delimiter: "\"",
                    escape: Escape::None,
                    multiline: false,
                }],
                block_comments: Vec::new(),
                line_comments: vec![
                    LineComment {
                        opener: "REM",
                        position: Position::LineStart,
                        case_insensitive: true,
                        whole_word: true,
                    },
                    LineComment {
                        opener: "::",
                        position: Position::LineStart,
                        case_insensitive: false,
                        whole_word: false,
                    },
                ],
                keep_shebang: false,
                lifetimes: false,
            },
            Self::Hybrid => Syntax {
                quotes: C_QUOTES.to_vec(),
                block_comments: vec![MARKUP_BLOCK, C_BLOCK],
                line_comments: vec![SLASH_SLASH],
                keep_shebang: false,
                lifetimes: false,
            },
        }
    }
}
