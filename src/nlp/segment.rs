//! Character-level heuristics that cut an OCR blob down to its ingredient
//! declaration and split it into candidate fragments.

use std::ops::Range;

use tracing::debug;

use crate::config::MatchConfig;
use crate::nlp::normalize::{fold_char, key_len, merge_dotless_char};

const FRAGMENT_DELIMITER: char = ',';
const TERMINATOR: char = '.';
const BULLETS: &[char] = &['•', '·', '●', '▪', '◦', '‣', '∙', '*'];

/// Case fold used for header detection only: dotted and dotless i compare
/// equal so "INGREDIENTS" still finds "ingredients".
fn header_fold(c: char) -> char {
    merge_dotless_char(fold_char(c))
}

fn is_delimiter(c: char) -> bool {
    matches!(c, '\n' | '\r' | ':' | ';' | '(' | ')' | '[' | ']' | '{' | '}') || BULLETS.contains(&c)
}

/// Byte range of the earliest header token in `text`, if any.
///
/// When two tokens start at the same position the longer one wins.
pub fn find_header(text: &str, header_tokens: &[String]) -> Option<Range<usize>> {
    let chars: Vec<(usize, char)> = text
        .char_indices()
        .map(|(offset, c)| (offset, header_fold(c)))
        .collect();
    let tokens: Vec<Vec<char>> = header_tokens
        .iter()
        .map(|token| token.chars().map(header_fold).collect::<Vec<_>>())
        .filter(|token| !token.is_empty())
        .collect();

    for start in 0..chars.len() {
        let longest = tokens
            .iter()
            .filter(|token| {
                chars.len() - start >= token.len()
                    && token
                        .iter()
                        .zip(&chars[start..])
                        .all(|(expected, (_, actual))| expected == actual)
            })
            .map(Vec::len)
            .max();
        if let Some(len) = longest {
            let end = chars
                .get(start + len)
                .map(|(offset, _)| *offset)
                .unwrap_or(text.len());
            return Some(chars[start].0..end);
        }
    }
    None
}

/// Byte offset at which the declaration starting at `start` ends: the
/// position of the `bound`-th terminator, or the end of the text.
pub fn bound_end(text: &str, start: usize, bound: usize) -> usize {
    text[start..]
        .char_indices()
        .filter(|(_, c)| *c == TERMINATOR)
        .nth(bound.saturating_sub(1))
        .map(|(offset, _)| start + offset)
        .unwrap_or(text.len())
}

/// The slice of `raw_text` believed to hold the ingredient declaration.
///
/// Starts at the header token and stops before the configured terminator.
/// Without a header the whole input is returned untouched.
pub fn locate_declaration<'a>(raw_text: &'a str, config: &MatchConfig) -> &'a str {
    match find_header(raw_text, &config.header_tokens) {
        Some(header) => {
            let end = bound_end(raw_text, header.start, config.terminator_bound);
            &raw_text[header.start..end]
        }
        None => raw_text,
    }
}

/// Split a declaration body into trimmed fragments within the length window.
pub fn tokenize(body: &str, config: &MatchConfig) -> Vec<String> {
    let delimited: String = body
        .chars()
        .map(|c| if is_delimiter(c) { FRAGMENT_DELIMITER } else { c })
        .collect();
    delimited
        .split(FRAGMENT_DELIMITER)
        .map(str::trim)
        .filter(|fragment| {
            let len = key_len(fragment);
            len >= config.min_key_length && len <= config.max_fragment_length
        })
        .map(str::to_string)
        .collect()
}

/// Turn raw OCR text into ordered candidate fragments.
///
/// The header token itself is not emitted as a fragment.
pub fn segment(raw_text: &str, config: &MatchConfig) -> Vec<String> {
    let body = match find_header(raw_text, &config.header_tokens) {
        Some(header) => {
            let end = bound_end(raw_text, header.start, config.terminator_bound);
            &raw_text[header.end.min(end)..end]
        }
        None => raw_text,
    };
    let fragments = tokenize(body, config);
    debug!(fragments = fragments.len(), "segmented declaration");
    fragments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> MatchConfig {
        MatchConfig::default()
    }

    #[test]
    fn header_match_ignores_turkish_case() {
        let text = "Üretici: X. İÇİNDEKİLER: su, şeker";
        let range = find_header(text, &config().header_tokens).unwrap();
        assert_eq!(&text[range], "İÇİNDEKİLER");
    }

    #[test]
    fn uppercase_english_header_is_found() {
        let text = "INGREDIENTS: water";
        let range = find_header(text, &config().header_tokens).unwrap();
        assert_eq!(&text[range], "INGREDIENTS");
    }

    #[test]
    fn brackets_become_delimiters() {
        let fragments = tokenize("Renklendirici (E150d), su", &config());
        assert_eq!(fragments, vec!["Renklendirici", "E150d", "su"]);
    }

    #[test]
    fn short_and_long_fragments_are_dropped() {
        let long = "x".repeat(51);
        let fragments = tokenize(&format!("a, tuz, {long}"), &config());
        assert_eq!(fragments, vec!["tuz"]);
    }

    #[test]
    fn header_word_is_not_a_fragment() {
        let fragments = segment("Ingredients: water; sugar.", &config());
        assert_eq!(fragments, vec!["water", "sugar."]);
    }
}
