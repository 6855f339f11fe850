//! Unicode-aware text folding.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Fold one codepoint into its canonical indexed form.
///
/// Letters and digits are lowercased, canonically decomposed, stripped of
/// combining marks, and the first surviving codepoint is kept. Everything
/// else becomes U+0020.
fn fold(c: char) -> char {
    if !c.is_alphanumeric() {
        return ' ';
    }
    c.to_lowercase()
        .flat_map(|lowered| lowered.nfd())
        .find(|decomposed| !is_combining_mark(*decomposed))
        .unwrap_or(' ')
}

/// Normalize a string for indexing or querying.
///
/// Non-alphanumeric codepoints are replaced by a single space, runs of
/// spaces are collapsed, and leading spaces are suppressed. The output is
/// idempotent: `normalize(normalize(s)) == normalize(s)`.
pub fn normalize(src: &str) -> String {
    let mut out = String::with_capacity(src.len());
    let mut prev_was_space = true;
    for c in src.chars() {
        let folded = fold(c);
        if folded == ' ' {
            if prev_was_space {
                continue;
            }
            prev_was_space = true;
        } else {
            prev_was_space = false;
        }
        out.push(folded);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_ascii() {
        assert_eq!(normalize("hello world"), "hello world");
        assert_eq!(normalize("Hello World"), "hello world");
    }

    #[test]
    fn test_accent_folding() {
        assert_eq!(normalize("This ìs ä fÄncy,  string"), "this is a fancy string");
        assert_eq!(normalize("café"), "cafe");
        assert_eq!(normalize("Ñandú"), "nandu");
    }

    #[test]
    fn test_punctuation_becomes_space() {
        assert_eq!(normalize("test/to-TEXT!"), "test to text ");
        assert_eq!(normalize("a,b.c"), "a b c");
    }

    #[test]
    fn test_space_runs_collapse() {
        assert_eq!(normalize("a     b"), "a b");
        assert_eq!(normalize("  leading"), "leading");
        assert_eq!(normalize("trailing   "), "trailing ");
    }

    #[test]
    fn test_degenerate_inputs() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("-? "), "");
        assert_eq!(normalize("   "), "");
        assert_eq!(normalize("!!!"), "");
    }

    #[test]
    fn test_digits_survive() {
        assert_eq!(normalize("route 66!"), "route 66 ");
    }

    #[test]
    fn test_idempotent() {
        for s in [
            "This ìs ä fÄncy,  string",
            "test/to-TEXT!",
            "  ",
            "ROUTE-66",
            "ỐỒỔ múltiple âccents",
        ] {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "not idempotent for {s:?}");
        }
    }
}
