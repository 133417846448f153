//! Name to CSS identifier normalization.

use std::sync::LazyLock;

use regex::Regex;

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static NON_IDENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9_\-]+").unwrap());
static HYPHEN_RUNS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-{2,}").unwrap());

/// Normalize a display name into a CSS identifier fragment.
///
/// Lowercases, turns whitespace runs into `-`, strips everything outside
/// `[a-z0-9_-]` and collapses repeated hyphens. The result never starts or
/// ends with `-` and may be empty for all-punctuation input.
///
/// ```
/// use swatchkit_tokens::slug;
///
/// assert_eq!(slug("Primary Blue"), "primary-blue");
/// assert_eq!(slug(&slug("Primary Blue")), "primary-blue");
/// ```
pub fn slug(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    let hyphenated = WHITESPACE.replace_all(&lowered, "-");
    let stripped = NON_IDENT.replace_all(&hyphenated, "");
    let collapsed = HYPHEN_RUNS.replace_all(&stripped, "-");

    collapsed.trim_matches('-').to_string()
}

/// Title-case a directory name for use as a section heading.
///
/// Hyphens become spaces and every word character that starts a word is
/// upper-cased: `form-controls` becomes `Form Controls`.
pub fn title_case(name: &str) -> String {
    let spaced = name.replace('-', " ");
    let mut out = String::with_capacity(spaced.len());
    let mut at_boundary = true;

    for c in spaced.chars() {
        let is_word = c.is_alphanumeric() || c == '_';
        if is_word && at_boundary {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_boundary = !is_word;
    }

    out
}
