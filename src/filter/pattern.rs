/*!
 * Pattern compiler
 *
 * Translates one ignore-file line (or one filename wildcard given on the
 * command line) into an immutable, regex-backed path predicate.
 */

use regex::Regex;
use thiserror::Error;

/// Errors raised while translating a pattern
#[derive(Error, Debug, Clone)]
pub enum PatternError {
    /// Nothing is left once negation, anchors and slashes are removed
    #[error("empty pattern: {0:?}")]
    Empty(String),

    /// A backslash with nothing to escape
    #[error("pattern ends with an unescaped backslash: {0}")]
    TrailingBackslash(String),

    /// A directory name with a separator can never equal one path segment
    #[error("directory name contains a path separator: {0}")]
    NestedDirName(String),

    /// The translated expression was rejected by the regex engine
    #[error("failed to compile pattern {pattern}: {source}")]
    Regex {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// How a pattern string is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    /// A gitignore-style line with negation, anchors and `**`
    IgnoreRule,
    /// A bare filename wildcard, `*` and `?` only
    SimpleWildcard,
}

/// Where an ignore rule may start matching
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// No separator: matches the entry name at any depth
    Basename,
    /// Leading `/`: matches from the traversal root only
    Root,
    /// Internal separator: may match starting at any directory boundary
    AnyDepth,
}

/// One parsed line of an ignore source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoreRule {
    /// The line as written (trailing whitespace removed)
    pub raw: String,
    /// Glob text left after removing `!`, the leading `/` and trailing `/`
    pub glob: String,
    /// Line started with `!`
    pub negated: bool,
    /// Line ended with `/`
    pub directory_only: bool,
    /// Matching start positions
    pub anchor: Anchor,
}

impl IgnoreRule {
    /// Parse one line of an ignore file.
    ///
    /// Blank lines and `#` comments yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, PatternError> {
        let raw = trim_trailing_whitespace(line);
        if raw.is_empty() || raw.starts_with('#') {
            return Ok(None);
        }

        let mut glob = raw;
        let negated = glob.starts_with('!');
        if negated {
            glob = &glob[1..];
        } else if glob.starts_with("\\!") || glob.starts_with("\\#") {
            glob = &glob[1..];
        }

        let directory_only = glob.ends_with('/') && !glob.ends_with("\\/");
        if directory_only {
            glob = glob.trim_end_matches('/');
        }

        let anchor = if let Some(stripped) = glob.strip_prefix('/') {
            glob = stripped;
            Anchor::Root
        } else if glob.contains('/') {
            Anchor::AnyDepth
        } else {
            Anchor::Basename
        };

        if glob.is_empty() {
            return Err(PatternError::Empty(raw.to_string()));
        }

        Ok(Some(Self {
            raw: raw.to_string(),
            glob: glob.to_string(),
            negated,
            directory_only,
            anchor,
        }))
    }

    /// Compile this rule into a predicate
    pub fn compile(&self) -> Result<CompiledPattern, PatternError> {
        let body = translate_glob(&self.glob, &self.raw)?;
        let expr = match self.anchor {
            Anchor::Basename | Anchor::Root => format!("^{}$", body),
            Anchor::AnyDepth => format!("^(?:.*/)?{}$", body),
        };
        let matcher = Regex::new(&expr).map_err(|source| PatternError::Regex {
            pattern: self.raw.clone(),
            source,
        })?;

        Ok(CompiledPattern {
            source: self.raw.clone(),
            kind: PatternKind::IgnoreRule,
            matcher: Some(matcher),
            negated: self.negated,
            directory_only: self.directory_only,
            anchor: self.anchor,
            literal_prefix: literal_prefix(&self.glob),
        })
    }
}

/// A compiled path predicate.
///
/// A pattern whose translation failed holds no matcher and never matches.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    source: String,
    kind: PatternKind,
    matcher: Option<Regex>,
    negated: bool,
    directory_only: bool,
    anchor: Anchor,
    literal_prefix: String,
}

impl CompiledPattern {
    fn never(source: &str, kind: PatternKind) -> Self {
        Self {
            source: source.to_string(),
            kind,
            matcher: None,
            negated: false,
            directory_only: false,
            anchor: Anchor::Basename,
            literal_prefix: String::new(),
        }
    }

    /// Pattern text this predicate was built from
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn kind(&self) -> PatternKind {
        self.kind
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }

    pub fn is_directory_only(&self) -> bool {
        self.directory_only
    }

    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    /// True when the predicate is the "matches nothing" fallback
    pub fn is_never(&self) -> bool {
        self.matcher.is_none()
    }

    /// Test a normalized, forward-slash relative path.
    ///
    /// Ignore rules also match every path below a directory they match:
    /// each ancestor prefix of `path` is tested as a directory.
    pub fn matches(&self, path: &str, is_dir: bool) -> bool {
        let Some(matcher) = &self.matcher else {
            return false;
        };

        if self.kind == PatternKind::SimpleWildcard {
            return matcher.is_match(basename(path));
        }

        if (!self.directory_only || is_dir) && self.matches_candidate(matcher, path) {
            return true;
        }

        path.match_indices('/')
            .any(|(idx, _)| self.matches_candidate(matcher, &path[..idx]))
    }

    fn matches_candidate(&self, matcher: &Regex, candidate: &str) -> bool {
        match self.anchor {
            Anchor::Basename => matcher.is_match(basename(candidate)),
            Anchor::Root | Anchor::AnyDepth => matcher.is_match(candidate),
        }
    }

    /// Whether this rule could match something strictly inside `dir`.
    ///
    /// Only rules with a separator and a literal leading part qualify;
    /// basename rules and rules starting with a wildcard never do.
    pub fn may_match_beneath(&self, dir: &str) -> bool {
        if self.matcher.is_none() || self.literal_prefix.is_empty() {
            return false;
        }

        let reaches = |start: &str| {
            self.literal_prefix
                .strip_prefix(start)
                .is_some_and(|rest| rest.starts_with('/'))
        };

        match self.anchor {
            Anchor::Basename => false,
            Anchor::Root => reaches(dir),
            Anchor::AnyDepth => {
                reaches(dir)
                    || dir
                        .match_indices('/')
                        .any(|(idx, _)| reaches(&dir[idx + 1..]))
            }
        }
    }
}

/// Compile a pattern, never failing.
///
/// Untranslatable input is reported through `tracing` and replaced by a
/// predicate that matches nothing.
pub fn compile(pattern: &str, kind: PatternKind) -> CompiledPattern {
    match try_compile(pattern, kind) {
        Ok(compiled) => compiled,
        Err(e) => {
            tracing::warn!(pattern, error = %e, "pattern will match nothing");
            CompiledPattern::never(pattern, kind)
        }
    }
}

/// Compile a pattern, reporting translation failures
pub fn try_compile(pattern: &str, kind: PatternKind) -> Result<CompiledPattern, PatternError> {
    match kind {
        PatternKind::IgnoreRule => IgnoreRule::parse(pattern)?
            .ok_or_else(|| PatternError::Empty(pattern.to_string()))?
            .compile(),
        PatternKind::SimpleWildcard => compile_wildcard(pattern),
    }
}

fn compile_wildcard(pattern: &str) -> Result<CompiledPattern, PatternError> {
    if pattern.is_empty() {
        return Err(PatternError::Empty(pattern.to_string()));
    }

    let mut expr = String::from("^");
    for c in pattern.chars() {
        match c {
            '*' => expr.push_str("[^/]*"),
            '?' => expr.push_str("[^/]"),
            _ => expr.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
        }
    }
    expr.push('$');

    let matcher = Regex::new(&expr).map_err(|source| PatternError::Regex {
        pattern: pattern.to_string(),
        source,
    })?;

    Ok(CompiledPattern {
        source: pattern.to_string(),
        kind: PatternKind::SimpleWildcard,
        matcher: Some(matcher),
        negated: false,
        directory_only: false,
        anchor: Anchor::Basename,
        literal_prefix: String::new(),
    })
}

/// Translate glob syntax into a regex body (without anchors)
fn translate_glob(glob: &str, raw: &str) -> Result<String, PatternError> {
    let mut out = String::with_capacity(glob.len() * 2);
    let mut i = 0;

    while i < glob.len() {
        let rest = &glob[i..];

        if rest.starts_with("/**/") {
            out.push_str("(?:/|/.*/)");
            i += 4;
        } else if i == 0 && rest.starts_with("**/") {
            out.push_str("(?:.*/)?");
            i += 3;
        } else if rest == "/**" {
            out.push_str("(?:/.*)?");
            i += 3;
        } else if rest.starts_with("**") {
            out.push_str(".*");
            i += 2;
        } else if rest.starts_with('*') {
            out.push_str("[^/]*");
            i += 1;
        } else if rest.starts_with('?') {
            out.push_str("[^/]");
            i += 1;
        } else if rest.starts_with('\\') {
            let Some(escaped) = rest[1..].chars().next() else {
                return Err(PatternError::TrailingBackslash(raw.to_string()));
            };
            out.push_str(&regex::escape(escaped.encode_utf8(&mut [0; 4])));
            i += 1 + escaped.len_utf8();
        } else {
            let c = rest.chars().next().unwrap_or_default();
            out.push_str(&regex::escape(c.encode_utf8(&mut [0; 4])));
            i += c.len_utf8().max(1);
        }
    }

    Ok(out)
}

/// Leading part of a glob that contains no wildcard or escape
fn literal_prefix(glob: &str) -> String {
    let end = glob.find(['*', '?', '\\']).unwrap_or(glob.len());
    glob[..end].to_string()
}

/// Drop trailing whitespace unless the last space is backslash-escaped
fn trim_trailing_whitespace(line: &str) -> &str {
    let trimmed = line.trim_end();
    if trimmed.ends_with('\\') && trimmed.len() < line.len() {
        &line[..trimmed.len() + 1]
    } else {
        trimmed
    }
}

/// Last path segment
pub(crate) fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
