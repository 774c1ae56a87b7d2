//! Best-effort regex minification of the assembled bundle.
//!
//! This is lossy formatting compression, not a Lua parser: comments and
//! redundant whitespace are stripped with plain substitutions, then spaces
//! are re-inserted after keywords that would otherwise merge with an
//! adjacent identifier. It is not lexically aware, so pathological inputs
//! (comment markers inside strings) can be mangled.

use regex::Regex;
use std::sync::OnceLock;

/// Lua keywords that need a trailing space restored after operator tightening
const KEYWORDS: [&str; 11] = [
    "local", "return", "function", "end", "then", "else", "do", "and", "or", "not", "in",
];

fn block_comment_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?s)--\[\[.*?\]\]").expect("Invalid regex"))
}

// Matches `--` line comments but leaves `--[[` block openers alone
// (regex crate has no lookahead, so the exclusion is spelled out).
fn line_comment_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"(?m)--(?:\[?[^\[\n][^\n]*|\[?)$").expect("Invalid regex"))
}

fn empty_line_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?m)^\s*\n").expect("Invalid regex"))
}

fn spaces_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[ \t]+").expect("Invalid regex"))
}

fn operator_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\s*([=+\-*/<>~,{}()])\s*").expect("Invalid regex"))
}

fn keyword_patterns() -> &'static Vec<(Regex, String)> {
    static PATTERNS: OnceLock<Vec<(Regex, String)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        KEYWORDS
            .iter()
            .map(|kw| {
                let pattern = Regex::new(&format!(r"{}(\w)", kw)).expect("Invalid regex");
                (pattern, format!("{} $1", kw))
            })
            .collect()
    })
}

/// Simple minification (removes comments and extra whitespace)
pub fn minify(content: &str) -> String {
    // Remove multi-line comments
    let mut content = block_comment_pattern().replace_all(content, "").into_owned();

    // Remove single-line comments (but keep string content)
    content = line_comment_pattern().replace_all(&content, "").into_owned();

    // Remove empty lines
    content = empty_line_pattern().replace_all(&content, "").into_owned();

    // Reduce multiple spaces to single space (careful with strings)
    content = spaces_pattern().replace_all(&content, " ").into_owned();

    // Remove spaces around operators (basic)
    content = operator_pattern().replace_all(&content, "$1").into_owned();

    // Restore necessary spaces
    for (pattern, replacement) in keyword_patterns() {
        content = pattern
            .replace_all(&content, replacement.as_str())
            .into_owned();
    }

    content.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Strip comments and all whitespace, leaving the raw character stream
    fn char_stream(source: &str) -> String {
        let stripped = block_comment_pattern().replace_all(source, "");
        let stripped = line_comment_pattern().replace_all(&stripped, "");
        stripped.chars().filter(|c| !c.is_whitespace()).collect()
    }

    #[test]
    fn test_removes_block_comments() {
        let source = "--[[\nbig banner\n]]\nlocal x = 1";
        let out = minify(source);
        assert!(!out.contains("banner"));
        assert!(out.contains("local x"));
    }

    #[test]
    fn test_removes_line_comments() {
        let source = "local x = 1 -- set x\nlocal y = 2";
        let out = minify(source);
        assert!(!out.contains("set x"));
        assert!(out.contains("local y=2"));
    }

    #[test]
    fn test_collapses_whitespace_and_operators() {
        let source = "local x   =   1  +  2\n\n\nlocal y = x * 3";
        let out = minify(source);
        assert_eq!(out, "local x=1+2\nlocal y=x*3");
    }

    #[test]
    fn test_restores_keyword_spacing() {
        // Operator tightening glues ")end" style sequences; keyword spacing
        // must keep `then`/`do`/`end` separated from identifiers.
        let source = "if x > 1 then y = 2 end";
        let out = minify(source);
        assert!(out.contains("then y"));
        assert!(!out.contains("theny"));
    }

    #[test]
    fn test_preserves_non_comment_tokens() {
        let source = r#"
-- Build a frame
local Frame = {}

function Frame.new(config)
    -- defaults
    local self = config or {}
    return self
end

return Frame
"#;
        let out = minify(source);
        assert_eq!(char_stream(source), char_stream(&out));
    }

    #[test]
    fn test_minify_shrinks_assembled_style_input() {
        let source = "--[[\n    banner\n]]\n\n-- Services\nlocal Players = game:GetService(\"Players\")\n\nlocal UIFramework = {}\n";
        let out = minify(source);
        assert!(out.len() < source.len());
        assert!(out.contains("local UIFramework={}"));
    }

    #[test]
    fn test_minify_is_idempotent_on_minified_output() {
        let source = "local x = 1 -- comment\nif x then x = x + 1 end\n";
        let once = minify(source);
        let twice = minify(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_keeps_unterminated_block_opener() {
        // `--[[` with no closing `]]` is not a line comment; the regex pass
        // leaves it for the runtime to reject, same as the lookahead did.
        let source = "local a = 1\n--[[";
        let out = minify(source);
        assert!(out.contains("--[["));
    }
}
