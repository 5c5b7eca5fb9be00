/*!
 * Configuration handling for codedump
 */

use std::fs;
use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser};
use clap_complete::Shell;

use crate::error::Result;
use crate::filter::{
    FilterRuleSet, DEFAULT_EXCLUDED_DIRS, DEFAULT_EXCLUDED_EXTENSIONS, DEFAULT_EXCLUDED_FILES,
};
use crate::strip::{CommentStripper, StripOptions};
use crate::{bail, ensure, error};

/// Output name that selects standard output
pub const STDOUT: &str = "-";

/// Command-line arguments for codedump
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "codedump",
    version = env!("CARGO_PKG_VERSION"),
    about = "Collect a project's source files into one markdown document",
    long_about = "Walks a directory, filters entries with ignore rules and exclusion lists, optionally strips comments, and writes every remaining text file as a fenced block of a single markdown document."
)]
pub struct Args {
    /// Directory to collect
    #[clap(default_value = ".")]
    pub directory: String,

    /// Output markdown file, `-` for stdout
    #[clap(short, long, default_value = "codedump.md")]
    pub output: String,

    /// Ignore-rule file (defaults to <DIRECTORY>/.gitignore when present)
    #[clap(long)]
    pub ignore_file: Option<String>,

    /// Do not read any ignore-rule file
    #[clap(long, conflicts_with = "ignore_file")]
    pub no_ignore_file: bool,

    /// Comma-separated directory names to exclude at any depth
    #[clap(long, value_delimiter = ',')]
    pub exclude_dir: Vec<String>,

    /// Comma-separated file extensions to exclude
    #[clap(long, value_delimiter = ',')]
    pub exclude_ext: Vec<String>,

    /// Comma-separated filename wildcards to exclude (`*` and `?`)
    #[clap(long, value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Disable the built-in exclusion lists
    #[clap(long)]
    pub no_default_excludes: bool,

    /// Comma-separated filename globs; when given, only matching files are dumped
    #[clap(long, value_delimiter = ',')]
    pub include: Vec<String>,

    /// Remove comments from files with a known comment dialect
    #[clap(long)]
    pub strip_comments: bool,

    /// Comma-separated globs of paths whose comments are kept
    #[clap(long, value_delimiter = ',')]
    pub keep_comments: Vec<String>,

    /// Extra comment text kept verbatim when stripping
    #[clap(long, value_delimiter = ',')]
    pub preserve_directive: Vec<String>,

    /// Largest file (in bytes) whose content is included
    #[clap(long, default_value = "1048576")]
    pub max_file_size: u64,

    /// Leave out the structure tree
    #[clap(long)]
    pub no_tree: bool,

    /// Number of threads to use for processing
    #[clap(long, default_value = "4")]
    pub threads: usize,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[clap(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Do not print the summary report
    #[clap(short, long)]
    pub quiet: bool,

    /// Generate shell completions
    #[clap(long = "generate", value_enum)]
    pub generate: Option<Shell>,
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Directory to collect
    pub target_dir: PathBuf,

    /// Output markdown file, `None` for stdout
    pub output_file: Option<PathBuf>,

    /// Explicit ignore-rule file
    pub ignore_file: Option<PathBuf>,

    /// Whether any ignore-rule file is read
    pub use_ignore_file: bool,

    /// Directory names excluded at any depth
    pub exclude_dirs: Vec<String>,

    /// Extensions excluded from the dump
    pub exclude_exts: Vec<String>,

    /// Filename wildcards excluded from the dump
    pub exclude_globs: Vec<String>,

    /// Whether the built-in exclusion lists apply
    pub default_excludes: bool,

    /// Patterns to include (if empty, include all)
    pub include_patterns: Vec<String>,

    /// Whether comments are stripped
    pub strip_comments: bool,

    /// Paths whose comments survive stripping
    pub keep_comments: Vec<String>,

    /// Directives added to the preserved defaults
    pub preserve_directives: Vec<String>,

    /// Largest file whose content is included
    pub max_file_size: u64,

    /// Whether the structure tree is written
    pub show_tree: bool,

    /// Number of threads to use for processing
    pub num_threads: usize,

    /// Verbosity level from `-v`
    pub verbose: u8,

    /// Suppress the summary report
    pub quiet: bool,
}

impl Config {
    /// Configuration with default settings for a directory
    pub fn new(target_dir: impl Into<PathBuf>) -> Self {
        Self {
            target_dir: target_dir.into(),
            output_file: None,
            ignore_file: None,
            use_ignore_file: true,
            exclude_dirs: Vec::new(),
            exclude_exts: Vec::new(),
            exclude_globs: Vec::new(),
            default_excludes: true,
            include_patterns: Vec::new(),
            strip_comments: false,
            keep_comments: Vec::new(),
            preserve_directives: Vec::new(),
            max_file_size: 1_048_576,
            show_tree: true,
            num_threads: 4,
            verbose: 0,
            quiet: false,
        }
    }

    /// Create configuration from command-line arguments
    pub fn from_args(args: Args) -> Self {
        Self {
            target_dir: PathBuf::from(args.directory),
            output_file: (args.output != STDOUT).then(|| PathBuf::from(args.output)),
            ignore_file: args.ignore_file.map(PathBuf::from),
            use_ignore_file: !args.no_ignore_file,
            exclude_dirs: args.exclude_dir,
            exclude_exts: args.exclude_ext,
            exclude_globs: args.exclude,
            default_excludes: !args.no_default_excludes,
            include_patterns: args.include,
            strip_comments: args.strip_comments,
            keep_comments: args.keep_comments,
            preserve_directives: args.preserve_directive,
            max_file_size: args.max_file_size,
            show_tree: !args.no_tree,
            num_threads: args.threads,
            verbose: args.verbose,
            quiet: args.quiet,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !self.target_dir.is_dir() {
            bail!(
                PathNotFound,
                "Target directory not found: {}",
                self.target_dir.display()
            );
        }

        // Check if output file directory exists
        if let Some(parent) = self.output_file.as_deref().and_then(Path::parent) {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                bail!(PathNotFound, "Output directory not found: {}", parent.display());
            }
        }

        if let Some(path) = &self.ignore_file {
            ensure!(
                path.is_file(),
                PathNotFound,
                "Ignore file not found: {}",
                path.display()
            );
        }

        ensure!(self.num_threads > 0, InvalidArgument, "--threads must be at least 1");
        ensure!(
            self.max_file_size > 0,
            InvalidArgument,
            "--max-file-size must be at least 1 byte"
        );

        Ok(())
    }

    /// Ignore-rule file that applies to this run, if any
    pub fn ignore_file_path(&self) -> Option<PathBuf> {
        if !self.use_ignore_file {
            return None;
        }
        match &self.ignore_file {
            Some(path) => Some(path.clone()),
            None => {
                let default = self.target_dir.join(".gitignore");
                default.is_file().then_some(default)
            }
        }
    }

    /// Build the rule set used during traversal
    pub fn filter_rules(&self) -> Result<FilterRuleSet> {
        let mut rules = FilterRuleSet::new();

        if let Some(path) = self.ignore_file_path() {
            let content = fs::read_to_string(&path).map_err(|e| {
                error!(Config, "Cannot read ignore file {}: {}", path.display(), e)
            })?;
            tracing::debug!(path = %path.display(), "reading ignore rules");
            rules = rules.ignore_source(&content);
        }

        if self.default_excludes {
            rules = rules
                .exclude_dir_names(DEFAULT_EXCLUDED_DIRS.iter().copied())
                .exclude_extensions(DEFAULT_EXCLUDED_EXTENSIONS.iter().copied())
                .exclude_file_globs(DEFAULT_EXCLUDED_FILES.iter().copied());
        }

        rules = rules
            .exclude_dir_names(&self.exclude_dirs)
            .exclude_extensions(&self.exclude_exts)
            .exclude_file_globs(&self.exclude_globs);

        tracing::debug!(
            ignore_rules = rules.ignore_rule_count(),
            dropped = rules.diagnostics().len(),
            "filter rules ready"
        );

        Ok(rules)
    }

    /// Comment stripper carrying the preserved directives
    pub fn stripper(&self) -> CommentStripper {
        CommentStripper::new(
            StripOptions::default().with_directives(self.preserve_directives.iter().cloned()),
        )
    }
}
