/*!
 * Path filter engine
 *
 * Combines ignore-file rules with the explicit exclusion categories and
 * turns a relative path into an include/exclude decision.
 */

use std::collections::HashSet;

use super::pattern::{self, basename, CompiledPattern, IgnoreRule, PatternError, PatternKind};

/// A rule that was dropped while building a rule set
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// 1-based line in the ignore source, `None` for command-line globs
    pub line: Option<usize>,
    /// Why the rule was dropped
    pub error: PatternError,
}

/// Read-only set of exclusion rules for one run
#[derive(Debug, Clone, Default)]
pub struct FilterRuleSet {
    /// Ignore-file predicates in declaration order
    ignore_patterns: Vec<CompiledPattern>,
    /// Directory names excluded at any depth
    excluded_dir_names: HashSet<String>,
    /// Lowercased suffixes including the leading dot
    excluded_extensions: Vec<String>,
    /// Basename wildcards for files
    excluded_file_globs: Vec<CompiledPattern>,
    diagnostics: Vec<Diagnostic>,
}

impl FilterRuleSet {
    /// Create an empty rule set that keeps everything
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the rules of one ignore source (the text of a `.gitignore`-style file).
    ///
    /// Lines that cannot be parsed or compiled are skipped and recorded as
    /// diagnostics.
    pub fn ignore_source(mut self, content: &str) -> Self {
        for (idx, line) in content.lines().enumerate() {
            let compiled =
                IgnoreRule::parse(line).and_then(|rule| rule.map(|r| r.compile()).transpose());
            match compiled {
                Ok(Some(compiled)) => self.ignore_patterns.push(compiled),
                Ok(None) => {}
                Err(error) => {
                    tracing::warn!(line = idx + 1, %error, "skipping ignore rule");
                    self.diagnostics.push(Diagnostic {
                        line: Some(idx + 1),
                        error,
                    });
                }
            }
        }
        self
    }

    /// Exclude directories with any of these names, at any depth
    pub fn exclude_dir_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            let name = name.as_ref().trim_matches('/');
            if name.is_empty() {
                continue;
            }
            if name.contains('/') {
                let error = PatternError::NestedDirName(name.to_string());
                tracing::warn!(%error, "skipping excluded directory name");
                self.diagnostics.push(Diagnostic { line: None, error });
                continue;
            }
            self.excluded_dir_names.insert(name.to_string());
        }
        self
    }

    /// Exclude files by extension, case-insensitively (`"png"`, `".PNG"` and
    /// `"tar.gz"` are all accepted)
    pub fn exclude_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for ext in extensions {
            let ext = ext.as_ref().trim().trim_start_matches('.').to_lowercase();
            if ext.is_empty() {
                continue;
            }
            let dotted = format!(".{}", ext);
            if !self.excluded_extensions.contains(&dotted) {
                self.excluded_extensions.push(dotted);
            }
        }
        self
    }

    /// Exclude files whose name matches one of these `*`/`?` wildcards
    pub fn exclude_file_globs<I, S>(mut self, globs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for glob in globs {
            let glob = glob.as_ref();
            match pattern::try_compile(glob, PatternKind::SimpleWildcard) {
                Ok(compiled) => self.excluded_file_globs.push(compiled),
                Err(error) => {
                    self.diagnostics.push(Diagnostic { line: None, error });
                    // Falls back to a predicate that never matches
                    self.excluded_file_globs
                        .push(pattern::compile(glob, PatternKind::SimpleWildcard));
                }
            }
        }
        self
    }

    /// Rules dropped while building the set
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Number of compiled ignore-file rules
    pub fn ignore_rule_count(&self) -> usize {
        self.ignore_patterns.len()
    }

    /// Decide whether an entry must be left out.
    ///
    /// A `true` result for a directory means traversal must not descend
    /// into it. The root (empty path) is always kept.
    pub fn should_exclude(&self, relative_path: &str, is_directory: bool) -> bool {
        let path = normalize_path(relative_path);
        if path.is_empty() {
            return false;
        }

        if self.ignored_by_patterns(&path, is_directory) {
            return true;
        }

        let dirs = if is_directory {
            Some(path.as_str())
        } else {
            path.rsplit_once('/').map(|(parent, _)| parent)
        };
        if let Some(dirs) = dirs {
            if dirs.split('/').any(|s| self.excluded_dir_names.contains(s)) {
                return true;
            }
        }

        if !is_directory {
            let name = basename(&path).to_lowercase();
            if self.excluded_extensions.iter().any(|ext| name.ends_with(ext)) {
                return true;
            }
            if self.excluded_file_globs.iter().any(|g| g.matches(&path, false)) {
                return true;
            }
        }

        false
    }

    /// Last matching ignore rule wins, honoring negation
    fn ignored_by_patterns(&self, path: &str, is_directory: bool) -> bool {
        let Some(last) = self
            .ignore_patterns
            .iter()
            .rposition(|p| p.matches(path, is_directory))
        else {
            return false;
        };

        if self.ignore_patterns[last].is_negated() {
            return false;
        }

        // A later negation may still re-include something inside this directory
        if is_directory
            && self.ignore_patterns[last + 1..]
                .iter()
                .any(|p| p.is_negated() && p.may_match_beneath(path))
        {
            tracing::trace!(path, "keeping directory for re-included descendants");
            return false;
        }

        true
    }
}

/// Normalize to forward slashes with no leading `./`, `/` or trailing `/`
pub fn normalize_path(path: &str) -> String {
    let path = path.replace('\\', "/");
    let mut rest = path.as_str();
    loop {
        if let Some(stripped) = rest.strip_prefix("./") {
            rest = stripped;
        } else if let Some(stripped) = rest.strip_prefix('/') {
            rest = stripped;
        } else {
            break;
        }
    }
    let rest = rest.trim_end_matches('/');
    if rest == "." {
        String::new()
    } else {
        rest.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_match_wins_with_negation() {
        let rules = FilterRuleSet::new().ignore_source("build/\n!build/keep.txt\n");

        assert!(!rules.should_exclude("build/keep.txt", false));
        assert!(rules.should_exclude("build/other.txt", false));
        // The directory stays reachable so that keep.txt can be visited
        assert!(!rules.should_exclude("build", true));
    }

    #[test]
    fn test_negation_before_exclusion_is_overridden() {
        let rules = FilterRuleSet::new().ignore_source("!build/keep.txt\nbuild/\n");

        assert!(rules.should_exclude("build/keep.txt", false));
        assert!(rules.should_exclude("build", true));
    }

    #[test]
    fn test_later_rule_overrides_earlier_negation() {
        let rules = FilterRuleSet::new().ignore_source("*.log\n!important.log\nlogs/\n");

        assert!(rules.should_exclude("debug.log", false));
        assert!(!rules.should_exclude("important.log", false));
        assert!(rules.should_exclude("logs/important.log", false));
    }

    #[test]
    fn test_excluded_dir_names_at_any_depth() {
        let rules = FilterRuleSet::new().exclude_dir_names(["build"]);

        assert!(rules.should_exclude("a/build/x", true));
        assert!(rules.should_exclude("build", true));
        assert!(rules.should_exclude("a/build/x/file.rs", false));
        assert!(!rules.should_exclude("a/builder", true));
        // A file called like the directory is not a directory
        assert!(!rules.should_exclude("a/build", false));
    }

    #[test]
    fn test_nested_dir_name_is_rejected() {
        let rules = FilterRuleSet::new().exclude_dir_names(["a/b", "/target/", ""]);

        assert_eq!(rules.diagnostics().len(), 1);
        assert_eq!(rules.diagnostics()[0].line, None);
        assert!(matches!(
            &rules.diagnostics()[0].error,
            PatternError::NestedDirName(name) if name == "a/b"
        ));
        assert!(!rules.should_exclude("a/b", true));
        assert!(rules.should_exclude("x/target", true));
    }

    #[test]
    fn test_dir_names_ignore_negation() {
        let rules = FilterRuleSet::new()
            .ignore_source("!node_modules/\n")
            .exclude_dir_names(["node_modules"]);

        assert!(rules.should_exclude("web/node_modules", true));
    }

    #[test]
    fn test_extension_and_glob_without_ignore_source() {
        let rules = FilterRuleSet::new()
            .exclude_extensions(["PNG", ".lock"])
            .exclude_file_globs(["*.min.js", "secret?.txt"]);

        assert!(rules.should_exclude("assets/logo.png", false));
        assert!(rules.should_exclude("assets/LOGO.Png", false));
        assert!(rules.should_exclude("Cargo.lock", false));
        assert!(rules.should_exclude("static/app.min.js", false));
        assert!(rules.should_exclude("secret1.txt", false));
        assert!(!rules.should_exclude("secret12.txt", false));
        assert!(!rules.should_exclude("src/main.rs", false));
        // File-only categories never prune directories
        assert!(!rules.should_exclude("images.png", true));
    }

    #[test]
    fn test_multi_part_extension() {
        let rules = FilterRuleSet::new().exclude_extensions(["tar.gz"]);

        assert!(rules.should_exclude("dist/release.TAR.GZ", false));
        assert!(!rules.should_exclude("dist/release.gz", false));
    }

    #[test]
    fn test_root_is_never_excluded() {
        let rules = FilterRuleSet::new()
            .ignore_source("*\n")
            .exclude_dir_names(["."]);

        assert!(!rules.should_exclude("", true));
        assert!(!rules.should_exclude(".", true));
        assert!(!rules.should_exclude("./", true));
        assert!(rules.should_exclude("anything", false));
    }

    #[test]
    fn test_path_normalization() {
        let rules = FilterRuleSet::new().ignore_source("/dist\n");

        assert!(rules.should_exclude("./dist", true));
        assert!(rules.should_exclude("/dist/", true));
        assert!(rules.should_exclude("dist\\bundle.js", false));
        assert_eq!(normalize_path(".\\src\\main.rs"), "src/main.rs");
    }

    #[test]
    fn test_unparsable_lines_are_skipped_with_diagnostic() {
        let rules = FilterRuleSet::new().ignore_source("# header\n/\n*.tmp\nbad\\\n");

        assert_eq!(rules.ignore_rule_count(), 1);
        assert_eq!(rules.diagnostics().len(), 2);
        assert_eq!(rules.diagnostics()[0].line, Some(2));
        assert_eq!(rules.diagnostics()[1].line, Some(4));
        assert!(rules.should_exclude("x.tmp", false));
        assert!(!rules.should_exclude("bad", false));
    }

    #[test]
    fn test_directory_only_rule_does_not_hit_files() {
        let rules = FilterRuleSet::new().ignore_source("cache/\n");

        assert!(rules.should_exclude("cache", true));
        assert!(!rules.should_exclude("cache", false));
        assert!(rules.should_exclude("src/cache/data.bin", false));
    }
}
