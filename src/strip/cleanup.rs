/*!
 * Line-level cleanup applied after comments are removed
 */

use std::ops::Range;

/// Trim trailing whitespace per line, collapse runs of blank lines to one,
/// and drop leading and trailing blank lines.
///
/// Bytes inside `literals` (sorted, non-overlapping ranges of `text`) are
/// never trimmed, and a line that starts inside a literal is never blank.
pub fn tidy(text: &str, literals: &[Range<usize>]) -> String {
    let bytes = text.as_bytes();
    let in_literal = |idx: usize| {
        let i = literals.partition_point(|r| r.end <= idx);
        literals.get(i).is_some_and(|r| r.start <= idx)
    };

    let mut out = String::with_capacity(text.len());
    let mut started = false;
    let mut pending_blank = false;
    let mut start = 0;

    while start <= bytes.len() {
        let newline = text[start..].find('\n').map(|i| start + i);
        let line_end = newline.unwrap_or(bytes.len());

        let mut end = line_end;
        while end > start
            && matches!(bytes[end - 1], b' ' | b'\t' | b'\r')
            && !in_literal(end - 1)
        {
            end -= 1;
        }
        let line = &text[start..end];
        let continues_literal = start > 0 && in_literal(start - 1);

        if line.is_empty() && !continues_literal {
            pending_blank |= started;
        } else {
            if started {
                out.push('\n');
                if pending_blank {
                    out.push('\n');
                }
            }
            out.push_str(line);
            started = true;
            pending_blank = false;
        }

        match newline {
            Some(idx) => start = idx + 1,
            None => break,
        }
    }

    out
}
