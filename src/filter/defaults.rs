/*!
 * Default exclusion tables
 */

use once_cell::sync::Lazy;

/// Directory names skipped at any depth unless defaults are disabled
pub static DEFAULT_EXCLUDED_DIRS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        // Version Control
        ".git",
        ".svn",
        ".hg",
        ".bzr",
        // Dependencies
        "node_modules",
        "bower_components",
        ".npm",
        ".yarn",
        ".pnpm-store",
        "vendor",
        // Build & Dist
        "dist",
        "build",
        "out",
        "target",
        // Python
        "__pycache__",
        ".pytest_cache",
        ".mypy_cache",
        ".tox",
        "venv",
        ".venv",
        // IDEs & Editors
        ".idea",
        ".vscode",
        ".vs",
        // Caches
        ".cache",
        ".sass-cache",
        ".gradle",
        ".next",
        ".nuxt",
        "coverage",
        ".nyc_output",
        // Infrastructure
        ".terraform",
    ]
});

/// Extensions of files that are never useful as text context
pub static DEFAULT_EXCLUDED_EXTENSIONS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        // Images
        "png", "jpg", "jpeg", "gif", "bmp", "ico", "webp", "tiff", "psd",
        // Fonts
        "woff", "woff2", "ttf", "otf", "eot",
        // Archives
        "zip", "tar", "gz", "tgz", "bz2", "xz", "7z", "rar", "jar", "war", "ear",
        // Compiled objects
        "exe", "dll", "so", "dylib", "a", "o", "obj", "class", "pyc", "pyo", "pyd", "wasm",
        // Media
        "mp3", "mp4", "wav", "ogg", "avi", "mov", "mkv", "flac",
        // Documents and databases
        "pdf", "sqlite", "sqlite3", "db",
        // Lockfiles and logs
        "lock", "log",
    ]
});

/// Filename wildcards skipped unless defaults are disabled
pub static DEFAULT_EXCLUDED_FILES: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        ".DS_Store",
        "Thumbs.db",
        "desktop.ini",
        "package-lock.json",
        "pnpm-lock.yaml",
        "*.min.js",
        "*.min.css",
        "*.map",
        "*.swp",
        "*~",
    ]
});
