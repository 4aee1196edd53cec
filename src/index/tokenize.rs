//! Text tokenization for the inverted index.

use crate::config::TranslitTable;
use std::collections::HashSet;

/// Produce the ordered token list for one text value.
///
/// Steps, in order: lowercase; fold the translit table; replace every
/// character outside `[a-z0-9]` with a single space; split on spaces; drop
/// empty strings and stop words. Duplicates are preserved.
///
/// The function is idempotent on its own output: tokenizing a token yields
/// that token back (unless it is a stop word).
pub fn tokenize(text: &str, translit: &TranslitTable, stop_words: &HashSet<String>) -> Vec<String> {
    let mut folded = String::with_capacity(text.len());
    for c in text.to_lowercase().chars() {
        let c = translit.fold(c);
        if matches!(c, 'a'..='z' | '0'..='9') {
            folded.push(c);
        } else {
            folded.push(' ');
        }
    }

    folded
        .split(' ')
        .filter(|tok| !tok.is_empty() && !stop_words.contains(*tok))
        .map(str::to_owned)
        .collect()
}
