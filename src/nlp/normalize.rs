//! Canonical key form shared by dictionary keywords and OCR fragments.
//!
//! `normalize` is pure and idempotent. The rules, in order:
//!
//! 1. drop `(...)`, `[...]` and `{...}` asides, innermost first, until none remain;
//! 2. Turkish-aware lowercase (`İ` → `i`, `I` → `ı`);
//! 3. newlines become spaces, `.` `,` `:` are removed;
//! 4. whitespace runs collapse to one space and the ends are trimmed.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

static ASIDE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\([^()]*\)|\[[^\[\]]*\]|\{[^{}]*\}").expect("valid regex"));

/// Lowercase a single character, keeping the Turkish dotted/dotless I pair apart.
///
/// Always maps one character to one character, so byte offsets of a folded
/// string can be traced back to the source text char by char.
pub fn fold_char(c: char) -> char {
    match c {
        'İ' => 'i',
        'I' => 'ı',
        _ => {
            let mut lower = c.to_lowercase();
            match (lower.next(), lower.next()) {
                (Some(single), None) => single,
                _ => c,
            }
        }
    }
}

/// Turkish-aware lowercase of a whole string.
pub fn fold_case(s: &str) -> String {
    s.chars().map(fold_char).collect()
}

/// Map dotless `ı` onto `i`.
///
/// Upper-case Latin text folds `I` to `ı`, so `MILK` normalizes to `mılk`.
/// Comparisons against keys that came from mixed-case names go through this.
pub fn merge_dotless_char(c: char) -> char {
    match c {
        'ı' => 'i',
        other => other,
    }
}

/// String form of [`merge_dotless_char`]; borrows when there is nothing to merge.
pub fn merge_dotless_i(s: &str) -> Cow<'_, str> {
    if s.contains('ı') {
        Cow::Owned(s.chars().map(merge_dotless_char).collect())
    } else {
        Cow::Borrowed(s)
    }
}

/// Produce the normalized key for `s`.
pub fn normalize(s: &str) -> String {
    let mut text = s.to_string();
    loop {
        let stripped = ASIDE.replace_all(&text, " ");
        if stripped == text {
            break;
        }
        text = stripped.into_owned();
    }

    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;
    for c in text.chars().map(fold_char) {
        match c {
            '.' | ',' | ':' => {}
            c if c.is_whitespace() => pending_space = true,
            c => {
                if pending_space && !out.is_empty() {
                    out.push(' ');
                }
                pending_space = false;
                out.push(c);
            }
        }
    }
    out
}

/// Character count of a key; the length floor is measured in characters.
pub fn key_len(key: &str) -> usize {
    key.chars().count()
}
