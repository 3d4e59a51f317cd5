//! Lexical similarity capability used by the matcher's fuzzy tiers.

use std::collections::HashSet;

use strsim::levenshtein;

use crate::nlp::normalize::{key_len, merge_dotless_i};

/// Word-order-insensitive similarity between a fragment `a` and a dictionary
/// key `b`, on a 0-100 scale.
pub trait StringSimilarity: Send + Sync {
    fn score(&self, a: &str, b: &str) -> f64;

    /// Upper bound on `score` for strings of the given character lengths.
    /// The matcher skips keys whose bound cannot reach its lowest threshold.
    fn upper_bound(&self, _a_len: usize, _b_len: usize) -> f64 {
        100.0
    }
}

/// Levenshtein ratio over alphabetically sorted tokens, raised to 100 when
/// every token of the key appears verbatim in a fragment at least as long.
/// Dotted and dotless i are the same letter here.
///
/// `"sorbat potasyum"` vs `"potasyum sorbat"` and `"e-102 tartrazin"` vs
/// `"tartrazin"` both score 100; one substitution in a ten character key
/// scores exactly 90.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokenSetRatio;

impl TokenSetRatio {
    fn sorted_tokens(s: &str) -> String {
        let mut tokens: Vec<&str> = s.split_whitespace().collect();
        tokens.sort_unstable();
        tokens.join(" ")
    }

    /// Edit-distance ratio of the token-sorted forms.
    pub fn sort_ratio(a: &str, b: &str) -> f64 {
        let a = Self::sorted_tokens(a);
        let b = Self::sorted_tokens(b);
        let longest = key_len(&a).max(key_len(&b));
        if longest == 0 {
            return 100.0;
        }
        let distance = levenshtein(&a, &b);
        (longest - distance.min(longest)) as f64 * 100.0 / longest as f64
    }

    fn contains_key(fragment: &str, key: &str) -> bool {
        if key_len(key) > key_len(fragment) {
            return false;
        }
        let tokens: HashSet<&str> = fragment.split_whitespace().collect();
        let mut key_tokens = key.split_whitespace().peekable();
        key_tokens.peek().is_some() && key_tokens.all(|token| tokens.contains(token))
    }
}

impl StringSimilarity for TokenSetRatio {
    fn score(&self, a: &str, b: &str) -> f64 {
        let (a, b) = (merge_dotless_i(a), merge_dotless_i(b));
        if Self::contains_key(&a, &b) {
            100.0
        } else {
            Self::sort_ratio(&a, &b)
        }
    }

    // A key longer than the fragment cannot be contained in it, and every
    // unit of length difference costs at least one edit.
    fn upper_bound(&self, a_len: usize, b_len: usize) -> f64 {
        if b_len <= a_len {
            return 100.0;
        }
        a_len as f64 * 100.0 / b_len as f64
    }
}
