//! Wildcard typo patterns.

use std::collections::BTreeSet;

/// All glob patterns within `max_typos` single-character substitutions or
/// insertions of `word`; `?` is the single-character wildcard. Deletions are
/// not modeled. `typo_patterns(w, 0)` is `{w}`.
///
/// The k-edit set is the closure of `{word}` under k rounds of one-edit
/// expansion, so the result is independent of expansion order and monotonic
/// in `max_typos`. Size grows roughly as O(len^k); callers are expected to
/// cap `max_typos` at 2.
pub fn typo_patterns(word: &str, max_typos: usize) -> BTreeSet<String> {
    let mut patterns = BTreeSet::from([word.to_owned()]);
    for _ in 0..max_typos {
        let extended: Vec<String> = patterns.iter().flat_map(|pat| one_typo(pat)).collect();
        patterns.extend(extended);
    }
    patterns
}

/// Patterns reachable from `pat` with exactly one more edit.
fn one_typo(pat: &str) -> Vec<String> {
    let chars: Vec<char> = pat.chars().collect();
    let mut out = Vec::with_capacity(2 * chars.len() + 1);
    for pos in 0..=chars.len() {
        let mut inserted: String = chars[..pos].iter().collect();
        inserted.push('?');
        inserted.extend(&chars[pos..]);
        out.push(inserted);

        if pos < chars.len() {
            let mut substituted: String = chars[..pos].iter().collect();
            substituted.push('?');
            substituted.extend(&chars[pos + 1..]);
            out.push(substituted);
        }
    }
    out
}
