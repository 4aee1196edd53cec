//! Anchored n-gram shards over the vocabulary.
//!
//! Every indexed token is inserted into a fixed, length-gated set of shard
//! sets whose names encode two or three literal characters anchored at the
//! token's start or end. `?` in a shard name is a literal character, chosen
//! to coincide with the store's single-character scan wildcard: the shard
//! holding tokens with a given first and third character is named
//! `{c0}?{c2}`. Approximate search picks one shard per wildcard pattern and
//! scans only that set instead of the whole vocabulary.

/// Which end of the token a shard name is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShardKind {
    Start,
    End,
}

/// Enumerate the shards a token belongs to.
///
/// Tokens shorter than 2 characters produce no shards and therefore cannot
/// be found by approximate search.
pub fn shards(token: &str) -> Vec<(ShardKind, String)> {
    use ShardKind::{End, Start};

    let c: Vec<char> = token.chars().collect();
    let n = c.len();
    let mut out = Vec::with_capacity(10);

    if n >= 2 {
        out.push((Start, format!("{}{}", c[0], c[1])));
        out.push((End, format!("{}{}", c[n - 2], c[n - 1])));
    }
    if n >= 3 {
        out.push((Start, format!("{}?{}", c[0], c[2])));
        out.push((Start, format!("?{}{}", c[1], c[2])));
        out.push((End, format!("{}?{}", c[n - 2], c[n - 1])));
        out.push((End, format!("{}{}?", c[n - 3], c[n - 2])));
    }
    if n >= 4 {
        out.push((Start, format!("{}??{}", c[0], c[3])));
        out.push((Start, format!("?{}?{}", c[1], c[3])));
        out.push((End, format!("{}??{}", c[n - 4], c[n - 1])));
        out.push((End, format!("{}?{}?", c[n - 4], c[n - 2])));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use rstest::rstest;

    fn names(token: &str, kind: ShardKind) -> Vec<String> {
        shards(token)
            .into_iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, s)| s)
            .collect()
    }

    #[rstest]
    #[case("")]
    #[case("a")]
    fn short_tokens_have_no_shards(#[case] token: &str) {
        check!(shards(token).is_empty());
    }

    #[test]
    fn length_two() {
        check!(names("ab", ShardKind::Start) == vec!["ab".to_string()]);
        check!(names("ab", ShardKind::End) == vec!["ab".to_string()]);
    }

    #[test]
    fn length_three() {
        check!(names("abc", ShardKind::Start) == vec!["ab".to_string(), "a?c".into(), "?bc".into()]);
        check!(names("abc", ShardKind::End) == vec!["bc".to_string(), "b?c".into(), "ab?".into()]);
    }

    #[test]
    fn length_five() {
        check!(
            names("cobre", ShardKind::Start)
                == vec![
                    "co".to_string(),
                    "c?b".into(),
                    "?ob".into(),
                    "c??r".into(),
                    "?o?r".into(),
                ]
        );
        check!(
            names("cobre", ShardKind::End)
                == vec![
                    "re".to_string(),
                    "r?e".into(),
                    "br?".into(),
                    "o??e".into(),
                    "o?r?".into(),
                ]
        );
    }
}
