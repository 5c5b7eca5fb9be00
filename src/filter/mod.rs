/*!
 * Path filtering
 *
 * Ignore-rule compilation and the include/exclude decision made for every
 * entry met during traversal.
 */

mod defaults;
pub mod pattern;
mod rules;

pub use defaults::{DEFAULT_EXCLUDED_DIRS, DEFAULT_EXCLUDED_EXTENSIONS, DEFAULT_EXCLUDED_FILES};
pub use pattern::{
    compile, try_compile, Anchor, CompiledPattern, IgnoreRule, PatternError, PatternKind,
};
pub use rules::{normalize_path, Diagnostic, FilterRuleSet};
