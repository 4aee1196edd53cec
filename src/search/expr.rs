//! The search expression algebra.
//!
//! A sealed tree: leaves resolve to posting-set keys, connectives reduce via
//! stored set union/intersection into scratch keys. Evaluation stages its
//! set operations on the context's batch; callers flush the batch before
//! reading the returned key, so one query costs one pipelined round trip
//! plus any shard scans approximate matching performs along the way.

use super::context::SearchContext;
use crate::error::{QueryError, Result};
use crate::index::shards::ShardKind;
use crate::keys;
use crate::search::typos::typo_patterns;
use crate::store::{SCAN_COUNT, Store};
use crate::types::Scalar;
use async_recursion::async_recursion;
use std::fmt;

/// A search expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// `doc[field] == value` for a facet field.
    FacetEq { field: String, value: Scalar },
    /// Some text field of the document contains this token. The token must
    /// already be normalized; no tokenization happens here.
    ContainsToken(String),
    /// The document contains all of these tokens.
    ContainsTokens(Vec<String>),
    /// The document contains `word` among its tokens, allowing up to
    /// `max_typos` single-character typos.
    ContainsApprox { word: String, max_typos: usize },
    /// Conjunction over one or more children.
    And(Vec<Expr>),
    /// Disjunction over one or more children.
    Or(Vec<Expr>),
}

/// What an expression evaluates to: a key whose set membership is the
/// result, or — for approximate match — the vocabulary tokens that matched.
#[derive(Debug, Clone, PartialEq)]
pub enum Eval {
    Key(String),
    Tokens(Vec<String>),
}

enum SetOp {
    Union,
    Intersect,
}

impl Expr {
    pub fn facet_eq(field: impl Into<String>, value: impl Into<Scalar>) -> Self {
        Self::FacetEq {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn contains_token(tok: impl Into<String>) -> Self {
        Self::ContainsToken(tok.into())
    }

    pub fn contains_approx(word: impl Into<String>, max_typos: usize) -> Self {
        Self::ContainsApprox {
            word: word.into(),
            max_typos,
        }
    }

    pub fn and(children: Vec<Expr>) -> Self {
        Self::And(children)
    }

    pub fn or(children: Vec<Expr>) -> Self {
        Self::Or(children)
    }

    /// Evaluate this expression within a search context.
    ///
    /// Set reductions are staged on the context's batch; the caller must
    /// flush the batch before reading the returned key. Approximate-match
    /// leaves scan the store directly while evaluating.
    #[async_recursion(?Send)]
    pub async fn eval<'c, S: Store>(&self, ctx: &mut SearchContext<'c, S>) -> Result<Eval> {
        match self {
            Self::FacetEq { field, value } => {
                if !ctx.cfg.is_facet_field(field) {
                    return Err(QueryError::NotFacetField {
                        field: field.clone(),
                    }
                    .into());
                }
                let key = keys::facet(&ctx.cfg.name, field, value);
                tracing::debug!(expr = %self, %key, "facet leaf");
                Ok(Eval::Key(key))
            }

            Self::ContainsToken(tok) => Ok(Eval::Key(keys::token(&ctx.cfg.name, tok))),

            Self::ContainsTokens(tokens) => {
                if tokens.is_empty() {
                    return Err(QueryError::EmptyConnective { connective: "AND" }.into());
                }
                let children: Vec<Expr> =
                    tokens.iter().cloned().map(Expr::ContainsToken).collect();
                fold_children(&children, &SetOp::Intersect, ctx).await
            }

            Self::ContainsApprox { word, max_typos } => {
                let mut tokens = Vec::new();
                for pattern in typo_patterns(word, *max_typos) {
                    let (kind, shard) = select_shard(&pattern)?;
                    let key = match kind {
                        ShardKind::Start => keys::start_shard(&ctx.cfg.name, &shard),
                        ShardKind::End => keys::end_shard(&ctx.cfg.name, &shard),
                    };
                    let found = ctx.store.set_scan(&key, &pattern, SCAN_COUNT).await?;
                    tracing::debug!(expr = %self, %pattern, %key, hits = found.len(), "shard scan");
                    tokens.extend(found);
                }
                Ok(Eval::Tokens(tokens))
            }

            Self::And(children) => fold_children(children, &SetOp::Intersect, ctx).await,
            Self::Or(children) => fold_children(children, &SetOp::Union, ctx).await,
        }
    }
}

/// Left-fold children into scratch keys. A single child's key is returned
/// unchanged; every further child costs one staged store operation.
async fn fold_children<'c, S: Store>(
    children: &[Expr],
    op: &SetOp,
    ctx: &mut SearchContext<'c, S>,
) -> Result<Eval> {
    let (first, rest) = children.split_first().ok_or(QueryError::EmptyConnective {
        connective: match op {
            SetOp::Union => "OR",
            SetOp::Intersect => "AND",
        },
    })?;

    let evaluated = first.eval(ctx).await?;
    let mut acc = lift_to_key(evaluated, ctx);
    for child in rest {
        let evaluated = child.eval(ctx).await?;
        let key = lift_to_key(evaluated, ctx);
        let dest = ctx.gen_key();
        match op {
            SetOp::Union => {
                tracing::debug!(%dest, left = %acc, right = %key, "staged union");
                ctx.batch().set_union_store(dest.clone(), vec![acc, key]);
            }
            SetOp::Intersect => {
                tracing::debug!(%dest, left = %acc, right = %key, "staged intersection");
                ctx.batch().set_inter_store(dest.clone(), vec![acc, key]);
            }
        }
        acc = dest;
    }
    Ok(Eval::Key(acc))
}

/// Lift an evaluation result to a key. A token list becomes the union of the
/// tokens' posting sets in a fresh scratch key; an empty token list lifts to
/// a fresh key that is never written, i.e. the empty set.
pub(crate) fn lift_to_key<S>(eval: Eval, ctx: &mut SearchContext<'_, S>) -> String {
    match eval {
        Eval::Key(key) => key,
        Eval::Tokens(tokens) => {
            let dest = ctx.gen_key();
            if !tokens.is_empty() {
                let sources = tokens
                    .iter()
                    .map(|tok| keys::token(&ctx.cfg.name, tok))
                    .collect();
                ctx.batch().set_union_store(dest.clone(), sources);
            }
            dest
        }
    }
}

/// Pick the shard to scan for a wildcard pattern: the most selective anchor
/// with no wildcard in its required positions, in canonical priority order
/// (the three start anchors, then the three end anchors).
fn select_shard(pattern: &str) -> std::result::Result<(ShardKind, String), QueryError> {
    let c: Vec<char> = pattern.chars().collect();
    let n = c.len();
    if n < 3 {
        return Err(QueryError::PatternTooShort {
            pattern: pattern.to_owned(),
        });
    }
    let lit = |i: usize| c[i] != '?';

    let selected = if lit(0) && lit(1) {
        (ShardKind::Start, format!("{}{}", c[0], c[1]))
    } else if lit(0) && lit(2) {
        (ShardKind::Start, format!("{}?{}", c[0], c[2]))
    } else if lit(1) && lit(2) {
        (ShardKind::Start, format!("?{}{}", c[1], c[2]))
    } else if lit(n - 1) && lit(n - 2) {
        (ShardKind::End, format!("{}{}", c[n - 2], c[n - 1]))
    } else if lit(n - 1) && lit(n - 3) {
        (ShardKind::End, format!("{}?{}", c[n - 3], c[n - 1]))
    } else if lit(n - 2) && lit(n - 3) {
        (ShardKind::End, format!("{}{}?", c[n - 3], c[n - 2]))
    } else {
        return Err(QueryError::UnshardablePattern {
            pattern: pattern.to_owned(),
        });
    };
    Ok(selected)
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FacetEq { field, value } => write!(f, "{field} == {value}"),
            Self::ContainsToken(tok) => write!(f, "contains('{tok}')"),
            Self::ContainsTokens(tokens) => write!(f, "contains all of {tokens:?}"),
            Self::ContainsApprox { word, max_typos } => {
                write!(f, "contains('{word}' within {max_typos} typos)")
            }
            Self::And(children) => join(f, children, " AND "),
            Self::Or(children) => join(f, children, " OR "),
        }
    }
}

fn join(f: &mut fmt::Formatter<'_>, children: &[Expr], sep: &str) -> fmt::Result {
    write!(f, "(")?;
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            write!(f, "{sep}")?;
        }
        write!(f, "{child}")?;
    }
    write!(f, ")")
}
