//! Reads source modules and strips their module-boundary statements.
//!
//! Each Lua module is written to be `require`d on its own; once bundled, the
//! require imports and trailing `return X` line would shadow or leak the
//! shared locals, so they are removed before concatenation. All substitutions
//! are idempotent: cleaning already-cleaned source is a no-op.

use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;
use tracing::debug;

use crate::config::ModuleEntry;
use crate::error::{BundleError, Result};

/// Require imports resolved by bundling: the modules they name are
/// concatenated into the same scope ahead of every consumer.
fn require_patterns() -> &'static [Regex; 3] {
    static PATTERNS: OnceLock<[Regex; 3]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            Regex::new(r"local\s+Theme\s*=\s*require\([^)]+\)\s*").expect("Invalid regex"),
            Regex::new(r"local\s+Utilities\s*=\s*require\([^)]+\)\s*").expect("Invalid regex"),
            Regex::new(r"local\s+Icons\s*=\s*require\([^)]+\)\s*").expect("Invalid regex"),
        ]
    })
}

/// Trailing `return ModuleName` on the last line of a module file
fn trailing_return_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\nreturn\s+\w+\s*$").expect("Invalid regex"))
}

/// `GetFramework()` helper boilerplate, meaningless outside the module tree
fn get_framework_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"local\s+function\s+GetFramework\(\)\s*\n\s*return\s+script\.Parent\.Parent\s*\n\s*end\s*",
        )
        .expect("Invalid regex")
    })
}

/// Apply the fixed substitution set to one module's source.
pub fn clean_module_source(content: &str) -> String {
    let mut content = content.to_string();

    // Remove require statements (they'll be resolved by bundling)
    for pattern in require_patterns() {
        content = pattern.replace_all(&content, "").into_owned();
    }

    // Remove the final return statement at the end of file (last line only)
    content = trailing_return_pattern()
        .replace(&content, "")
        .into_owned();

    // Remove GetFramework function if present
    content = get_framework_pattern()
        .replace_all(&content, "")
        .into_owned();

    content.trim().to_string()
}

/// Read a module file relative to `root` and clean it for bundling.
///
/// Fails fast: a missing or unreadable module aborts the whole build.
pub fn read_module(root: &Path, entry: &ModuleEntry) -> Result<String> {
    let full_path = root.join(&entry.path);

    if !full_path.exists() {
        return Err(BundleError::ModuleMissing {
            path: full_path.display().to_string(),
        });
    }

    let content =
        std::fs::read_to_string(&full_path).map_err(|source| BundleError::ModuleRead {
            name: entry.name.clone(),
            path: full_path.display().to_string(),
            source,
        })?;

    let cleaned = clean_module_source(&content);
    debug!(
        module = %entry.name,
        raw_bytes = content.len(),
        cleaned_bytes = cleaned.len(),
        "Cleaned module"
    );

    Ok(cleaned)
}
