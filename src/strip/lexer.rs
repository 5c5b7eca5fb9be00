/*!
 * Single-pass lexical scanner
 *
 * Walks the text once with a byte cursor. At every position it tries, in
 * order: a quoted literal, a block comment, a line comment, and finally a
 * plain code character. Literal and code spans are copied to the output,
 * comment spans are dropped.
 *
 * All delimiters are ASCII, so every slice boundary the scanner produces
 * falls on a UTF-8 character boundary.
 */

use std::ops::Range;

use thiserror::Error;

use super::dialect::{Escape, LineComment, Position, Quote, Syntax};

/// An internal scanner invariant was about to be broken
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanInconsistency {
    /// The cursor did not move forward
    #[error("scanner cursor stalled at byte {offset}")]
    Stalled { offset: usize },

    /// More bytes were emitted than read
    #[error("scanner emitted {emitted} bytes from {consumed} input bytes")]
    Overrun {
        emitted: usize,
        consumed: usize,
    },
}

/// Scanner output before line cleanup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOutput {
    /// Literal and code spans, in input order
    pub text: String,
    /// Byte ranges of `text` that hold quoted literals
    pub literals: Vec<Range<usize>>,
    /// Number of comments dropped
    pub comments_removed: usize,
}

/// What a line-comment opener turned out to be
enum LineMatch {
    /// Drop bytes up to the given offset
    Comment(usize),
    /// Keep bytes up to the given offset as code
    Keep(usize),
}

/// Cursor state for one scan
struct Scanner<'a> {
    text: &'a str,
    bytes: &'a [u8],
    syntax: &'a Syntax,
    directives: &'a [String],
    pos: usize,
    /// Start of the pending code span
    code_start: usize,
    out: String,
    literals: Vec<Range<usize>>,
    comments_removed: usize,
}

/// Scan `text`, dropping comments according to `syntax`.
///
/// Line comments whose trimmed body equals one of `directives` are kept.
pub fn scan(
    text: &str,
    syntax: &Syntax,
    directives: &[String],
) -> Result<ScanOutput, ScanInconsistency> {
    let mut scanner = Scanner {
        text,
        bytes: text.as_bytes(),
        syntax,
        directives,
        pos: 0,
        code_start: 0,
        out: String::with_capacity(text.len()),
        literals: Vec::new(),
        comments_removed: 0,
    };
    scanner.run()?;

    if scanner.out.len() > text.len() {
        return Err(ScanInconsistency::Overrun {
            emitted: scanner.out.len(),
            consumed: text.len(),
        });
    }

    Ok(ScanOutput {
        text: scanner.out,
        literals: scanner.literals,
        comments_removed: scanner.comments_removed,
    })
}

impl<'a> Scanner<'a> {
    fn run(&mut self) -> Result<(), ScanInconsistency> {
        if self.syntax.keep_shebang && self.text.starts_with("#!") {
            self.pos = self.line_end(0);
        }

        while self.pos < self.bytes.len() {
            let before = self.pos;

            if let Some(end) = self.quoted_literal() {
                self.flush_code();
                let start = self.out.len();
                self.out.push_str(&self.text[self.pos..end]);
                self.literals.push(start..self.out.len());
                self.pos = end;
                self.code_start = end;
            } else if let Some(end) = self.block_comment() {
                self.drop_comment(end);
            } else if let Some(found) = self.line_comment() {
                match found {
                    LineMatch::Comment(end) => self.drop_comment(end),
                    LineMatch::Keep(end) => self.pos = end,
                }
            } else {
                self.pos += 1;
            }

            if self.pos <= before {
                return Err(ScanInconsistency::Stalled { offset: before });
            }
        }

        self.flush_code();
        Ok(())
    }

    fn flush_code(&mut self) {
        if self.code_start < self.pos {
            self.out.push_str(&self.text[self.code_start..self.pos]);
        }
    }

    fn drop_comment(&mut self, end: usize) {
        self.flush_code();
        self.comments_removed += 1;
        self.pos = end;
        self.code_start = end;
    }

    /// End offset of a literal starting at the cursor
    fn quoted_literal(&self) -> Option<usize> {
        let rest = &self.bytes[self.pos..];
        let quote = self
            .syntax
            .quotes
            .iter()
            .find(|q| rest.starts_with(q.delimiter.as_bytes()))?;

        if self.syntax.lifetimes && quote.delimiter == "'" && self.is_lifetime() {
            return None;
        }

        self.literal_end(quote)
    }

    fn literal_end(&self, quote: &Quote) -> Option<usize> {
        let delim = quote.delimiter.as_bytes();
        let len = self.bytes.len();
        let mut i = self.pos + delim.len();

        while i < len {
            let b = self.bytes[i];
            if b == b'\n' && !quote.multiline {
                return None;
            }
            if b == b'\\' && quote.escape == Escape::Backslash {
                i = (i + 2).min(len);
                continue;
            }
            if self.bytes[i..].starts_with(delim) {
                let after = i + delim.len();
                if quote.escape == Escape::Doubled && self.bytes[after..].starts_with(delim) {
                    i = after + delim.len();
                    continue;
                }
                return Some(after);
            }
            i += 1;
        }

        // Unterminated: a multi-line literal runs to the end of input
        quote.multiline.then_some(len)
    }

    /// `'ident` not followed by a closing quote
    fn is_lifetime(&self) -> bool {
        let after_quote = &self.text[self.pos + 1..];
        let ident_len: usize = after_quote
            .chars()
            .take_while(|c| c.is_alphanumeric() || *c == '_')
            .map(char::len_utf8)
            .sum();
        if ident_len == 0 || after_quote.starts_with(|c: char| c.is_ascii_digit()) {
            return false;
        }
        !after_quote[ident_len..].starts_with('\'')
    }

    /// End offset of a block comment starting at the cursor
    fn block_comment(&self) -> Option<usize> {
        // The cursor may sit inside a multi-byte character, so match on bytes
        let rest = &self.bytes[self.pos..];
        let (open, close) = self
            .syntax
            .block_comments
            .iter()
            .find(|(open, _)| rest.starts_with(open.as_bytes()))?;

        let body_start = self.pos + open.len();
        let close = close.as_bytes();
        Some(
            self.bytes[body_start..]
                .windows(close.len())
                .position(|w| w == close)
                .map_or(self.bytes.len(), |idx| body_start + idx + close.len()),
        )
    }

    fn line_comment(&self) -> Option<LineMatch> {
        let comment = self
            .syntax
            .line_comments
            .iter()
            .find(|lc| self.opens_line_comment(lc))?;

        let body_start = self.pos + comment.opener.len();
        let end = self.line_end(self.pos);
        let body = self.text[body_start..end].trim();

        if self.directives.iter().any(|d| d == body) {
            return Some(LineMatch::Keep(end));
        }

        // `x//` with nothing after it is data, not a comment
        let glued = self
            .last_emitted()
            .is_some_and(|prev| !prev.is_ascii_whitespace());
        if comment.opener.len() == 2 && glued && body.is_empty() {
            return Some(LineMatch::Keep(end.max(body_start)));
        }

        Some(LineMatch::Comment(end))
    }

    fn opens_line_comment(&self, comment: &LineComment) -> bool {
        let opener = comment.opener.as_bytes();
        let Some(candidate) = self.bytes.get(self.pos..self.pos + opener.len()) else {
            return false;
        };

        let same = if comment.case_insensitive {
            candidate.eq_ignore_ascii_case(opener)
        } else {
            candidate == opener
        };
        if !same {
            return false;
        }

        if comment.whole_word {
            if let Some(next) = self.bytes.get(self.pos + opener.len()) {
                if !next.is_ascii_whitespace() {
                    return false;
                }
            }
        }

        match comment.position {
            Position::Anywhere => true,
            Position::AfterSpace => match self.last_emitted() {
                None => true,
                Some(prev) => prev.is_ascii_whitespace() || matches!(prev, b'"' | b'\'' | b'`'),
            },
            Position::LineStart => self.bytes[..self.pos]
                .iter()
                .rev()
                .take_while(|b| **b != b'\n')
                .all(|b| b.is_ascii_whitespace() || *b == b'@'),
        }
    }

    /// Byte that will precede the cursor in the output, which differs from
    /// the input byte when a comment was just dropped
    fn last_emitted(&self) -> Option<u8> {
        if self.code_start < self.pos {
            Some(self.bytes[self.pos - 1])
        } else {
            self.out.as_bytes().last().copied()
        }
    }

    /// Offset of the newline ending the line that contains `from`
    fn line_end(&self, from: usize) -> usize {
        self.text[from..]
            .find('\n')
            .map_or(self.bytes.len(), |idx| from + idx)
    }
}
