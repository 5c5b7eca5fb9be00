/*!
 * Language table
 *
 * Maps file names and extensions to a display label for fenced blocks and
 * to the comment dialect used when stripping.
 */

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::strip::{CommentDialect, Syntax};

/// Per-language adjustment of a dialect's default syntax
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxTweak {
    None,
    /// `'a` lifetimes and labels are code, not char literals
    RustLifetimes,
    /// Only block comments exist (`//` is data, e.g. in `url(http://...)`)
    BlockCommentsOnly,
}

/// A known language
#[derive(Debug, PartialEq, Eq)]
pub struct Language {
    pub name: &'static str,
    /// Info string of the markdown fence
    pub label: &'static str,
    /// Lowercase extensions without the dot
    pub extensions: &'static [&'static str],
    /// Exact file names
    pub filenames: &'static [&'static str],
    /// `None` means the file is never stripped
    pub dialect: Option<CommentDialect>,
    pub tweak: SyntaxTweak,
}

impl Language {
    /// Scanner syntax for this language, if it has comments at all
    pub fn syntax(&self) -> Option<Syntax> {
        let mut syntax = self.dialect?.syntax();
        match self.tweak {
            SyntaxTweak::None => {}
            SyntaxTweak::RustLifetimes => syntax.lifetimes = true,
            SyntaxTweak::BlockCommentsOnly => syntax.line_comments.clear(),
        }
        Some(syntax)
    }
}

const fn lang(
    name: &'static str,
    label: &'static str,
    extensions: &'static [&'static str],
    dialect: Option<CommentDialect>,
) -> Language {
    Language {
        name,
        label,
        extensions,
        filenames: &[],
        dialect,
        tweak: SyntaxTweak::None,
    }
}

use CommentDialect::{Batch, CFamily, Hash, Hybrid, Markup, Sql};

/// Every language the dumper recognizes
pub static LANGUAGES: &[Language] = &[
    Language {
        tweak: SyntaxTweak::RustLifetimes,
        ..lang("Rust", "rust", &["rs"], Some(CFamily))
    },
    lang("C", "c", &["c", "h"], Some(CFamily)),
    lang("C++", "cpp", &["cpp", "cc", "cxx", "hpp", "hh", "hxx"], Some(CFamily)),
    lang("C#", "csharp", &["cs"], Some(CFamily)),
    lang("Java", "java", &["java"], Some(CFamily)),
    lang("Kotlin", "kotlin", &["kt", "kts"], Some(CFamily)),
    lang("Scala", "scala", &["scala", "sc"], Some(CFamily)),
    lang("Swift", "swift", &["swift"], Some(CFamily)),
    lang("Go", "go", &["go"], Some(CFamily)),
    lang("JavaScript", "javascript", &["js", "mjs", "cjs", "jsx"], Some(CFamily)),
    lang("TypeScript", "typescript", &["ts", "mts", "cts", "tsx"], Some(CFamily)),
    lang("Dart", "dart", &["dart"], Some(CFamily)),
    lang("PHP", "php", &["php"], Some(CFamily)),
    lang("Groovy", "groovy", &["groovy", "gradle"], Some(CFamily)),
    lang("Zig", "zig", &["zig"], Some(CFamily)),
    lang("Protocol Buffers", "protobuf", &["proto"], Some(CFamily)),
    lang("JSON with Comments", "jsonc", &["jsonc", "json5"], Some(CFamily)),
    Language {
        tweak: SyntaxTweak::BlockCommentsOnly,
        ..lang("CSS", "css", &["css"], Some(CFamily))
    },
    lang("SCSS", "scss", &["scss"], Some(CFamily)),
    lang("Less", "less", &["less"], Some(CFamily)),
    lang("HTML", "html", &["html", "htm", "xhtml"], Some(Markup)),
    lang("XML", "xml", &["xml", "xsd", "xsl", "xslt", "svg", "plist", "csproj"], Some(Markup)),
    lang("Markdown", "markdown", &["md", "markdown"], Some(Markup)),
    lang("Vue", "vue", &["vue"], Some(Hybrid)),
    lang("Svelte", "svelte", &["svelte"], Some(Hybrid)),
    lang("Astro", "astro", &["astro"], Some(Hybrid)),
    lang("Python", "python", &["py", "pyi", "pyw"], Some(Hash)),
    Language {
        filenames: &["Gemfile", "Rakefile", "Podfile"],
        ..lang("Ruby", "ruby", &["rb", "gemspec", "rake"], Some(Hash))
    },
    lang("Shell", "bash", &["sh", "bash", "zsh", "fish"], Some(Hash)),
    lang("Perl", "perl", &["pl", "pm"], Some(Hash)),
    lang("R", "r", &["r"], Some(Hash)),
    lang("YAML", "yaml", &["yml", "yaml"], Some(Hash)),
    lang("TOML", "toml", &["toml"], Some(Hash)),
    lang("Elixir", "elixir", &["ex", "exs"], Some(Hash)),
    lang("PowerShell", "powershell", &["ps1", "psm1"], Some(Hash)),
    Language {
        filenames: &["Dockerfile", "Containerfile"],
        ..lang("Dockerfile", "dockerfile", &["dockerfile"], Some(Hash))
    },
    Language {
        filenames: &["Makefile", "makefile", "GNUmakefile"],
        ..lang("Makefile", "makefile", &["mk"], Some(Hash))
    },
    Language {
        filenames: &["CMakeLists.txt"],
        ..lang("CMake", "cmake", &["cmake"], Some(Hash))
    },
    lang("SQL", "sql", &["sql"], Some(Sql)),
    lang("Batch", "batch", &["bat", "cmd"], Some(Batch)),
    lang("JSON", "json", &["json"], None),
    lang("Lua", "lua", &["lua"], None),
    lang("Haskell", "haskell", &["hs"], None),
    lang("HCL", "hcl", &["tf", "hcl"], None),
    lang("INI", "ini", &["ini", "cfg"], None),
    lang("Text", "text", &["txt"], None),
];

static BY_EXTENSION: Lazy<HashMap<&'static str, &'static Language>> = Lazy::new(|| {
    LANGUAGES
        .iter()
        .flat_map(|l| l.extensions.iter().map(move |ext| (*ext, l)))
        .collect()
});

static BY_FILENAME: Lazy<HashMap<&'static str, &'static Language>> = Lazy::new(|| {
    LANGUAGES
        .iter()
        .flat_map(|l| l.filenames.iter().map(move |name| (*name, l)))
        .collect()
});

/// Find the language of a path by exact file name, then by extension
pub fn detect(path: &str) -> Option<&'static Language> {
    let name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    if let Some(language) = BY_FILENAME.get(name).copied() {
        return Some(language);
    }

    let (_, ext) = name.rsplit_once('.')?;
    BY_EXTENSION.get(ext.to_lowercase().as_str()).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_by_extension() {
        assert_eq!(detect("src/main.rs").map(|l| l.label), Some("rust"));
        assert_eq!(detect("web/App.TSX").map(|l| l.label), Some("typescript"));
        assert_eq!(detect("db/schema.sql").and_then(|l| l.dialect), Some(Sql));
        assert!(detect("README").is_none());
        assert!(detect("archive.unknownext").is_none());
    }

    #[test]
    fn test_detect_by_filename() {
        assert_eq!(detect("Dockerfile").map(|l| l.name), Some("Dockerfile"));
        assert_eq!(detect("tools/Makefile").and_then(|l| l.dialect), Some(Hash));
        assert_eq!(detect("CMakeLists.txt").map(|l| l.label), Some("cmake"));
        assert_eq!(detect("notes.txt").map(|l| l.label), Some("text"));
    }

    #[test]
    fn test_tweaks_apply() {
        let rust = detect("lib.rs").and_then(Language::syntax).unwrap();
        assert!(rust.lifetimes);

        let css = detect("site.css").and_then(Language::syntax).unwrap();
        assert!(css.line_comments.is_empty());
        assert!(!css.block_comments.is_empty());

        assert!(detect("data.json").and_then(Language::syntax).is_none());
    }

    #[test]
    fn test_extensions_are_unique() {
        let total: usize = LANGUAGES.iter().map(|l| l.extensions.len()).sum();
        assert_eq!(BY_EXTENSION.len(), total);
    }
}
