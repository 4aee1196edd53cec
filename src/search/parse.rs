//! Query string parsing.
//!
//! The grammar, with its intentionally non-standard precedence (OR binds
//! tighter than AND, so `x AND y OR z` reads as `x AND (y OR z)`):
//!
//! ```text
//! search_expr   = expr EOF
//! expr          = term ("AND" term)*
//! term          = filter_clause ("OR" filter_clause)*
//! filter_clause = "NOT" filter_expr | filter_expr | "(" expr ")"
//! filter_expr   = match_expr | num_filter_expr | tag_expr
//! match_expr    = fld_name ":" ( range | lit_val )
//! range         = lit_number "TO" lit_number
//! num_filter_expr = fld_name cmp_operator lit_number
//! cmp_operator  = "=" | "<=" | ">=" | "<" | ">"
//! tag_expr      = lit_str
//! ```
//!
//! `fld:val` becomes a facet-equality leaf; a bare or quoted string becomes
//! token containment, normalized through the collection's tokenizer. `NOT`,
//! ranges and numeric comparisons are recognized but have no evaluator, so
//! they surface a typed unsupported-construct error rather than a syntax
//! error.

use crate::config::CollectionConfig;
use crate::error::{QueryError, Result};
use crate::index::tokenize::tokenize;
use crate::search::expr::Expr;
use crate::types::Scalar;

/// Parse a query string into an expression tree for `cfg`'s collection.
pub fn parse(input: &str, cfg: &CollectionConfig) -> Result<Expr> {
    let tokens = lex(input)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        cfg,
    };
    let expr = parser.expr()?;
    parser.expect_eof()?;
    Ok(expr)
}

#[derive(Debug, Clone, PartialEq)]
enum Tok {
    Word(String),
    Quoted(String),
    Colon,
    LParen,
    RParen,
    Cmp(String),
}

#[derive(Debug)]
struct Spanned {
    tok: Tok,
    pos: usize,
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')
}

fn lex(input: &str) -> Result<Vec<Spanned>> {
    let chars: Vec<char> = input.chars().collect();
    let mut out = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            c if c.is_whitespace() => i += 1,
            '(' | ')' | ':' => {
                let tok = match c {
                    '(' => Tok::LParen,
                    ')' => Tok::RParen,
                    _ => Tok::Colon,
                };
                out.push(Spanned { tok, pos: i });
                i += 1;
            }
            '<' | '>' => {
                let pos = i;
                let mut op = c.to_string();
                if chars.get(i + 1) == Some(&'=') {
                    op.push('=');
                    i += 1;
                }
                out.push(Spanned {
                    tok: Tok::Cmp(op),
                    pos,
                });
                i += 1;
            }
            '=' => {
                out.push(Spanned {
                    tok: Tok::Cmp("=".to_owned()),
                    pos: i,
                });
                i += 1;
            }
            '"' => {
                let start = i;
                i += 1;
                let from = i;
                while i < chars.len() && chars[i] != '"' {
                    i += 1;
                }
                if i == chars.len() {
                    return Err(QueryError::Parse {
                        position: start,
                        message: "unterminated string literal".to_owned(),
                    }
                    .into());
                }
                out.push(Spanned {
                    tok: Tok::Quoted(chars[from..i].iter().collect()),
                    pos: start,
                });
                i += 1;
            }
            c if is_word_char(c) => {
                let from = i;
                while i < chars.len() && is_word_char(chars[i]) {
                    i += 1;
                }
                out.push(Spanned {
                    tok: Tok::Word(chars[from..i].iter().collect()),
                    pos: from,
                });
            }
            other => {
                return Err(QueryError::Parse {
                    position: i,
                    message: format!("unexpected character '{other}'"),
                }
                .into());
            }
        }
    }
    Ok(out)
}

struct Parser<'a> {
    tokens: Vec<Spanned>,
    pos: usize,
    cfg: &'a CollectionConfig,
}

impl Parser<'_> {
    fn peek(&self, offset: usize) -> Option<&Tok> {
        self.tokens.get(self.pos + offset).map(|s| &s.tok)
    }

    fn here(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map_or_else(|| self.tokens.last().map_or(0, |s| s.pos + 1), |s| s.pos)
    }

    fn eat_word(&mut self, keyword: &str) -> bool {
        if let Some(Tok::Word(w)) = self.peek(0)
            && w == keyword
        {
            self.pos += 1;
            return true;
        }
        false
    }

    fn eat(&mut self, tok: &Tok) -> bool {
        if self.peek(0) == Some(tok) {
            self.pos += 1;
            return true;
        }
        false
    }

    fn parse_error(&self, message: impl Into<String>) -> anyhow::Error {
        QueryError::Parse {
            position: self.here(),
            message: message.into(),
        }
        .into()
    }

    fn expect_eof(&self) -> Result<()> {
        if self.pos < self.tokens.len() {
            return Err(self.parse_error("unexpected trailing input"));
        }
        Ok(())
    }

    // expr = term ("AND" term)*
    fn expr(&mut self) -> Result<Expr> {
        let mut children = vec![self.term()?];
        while self.eat_word("AND") {
            children.push(self.term()?);
        }
        Ok(connect(children, Expr::And))
    }

    // term = filter_clause ("OR" filter_clause)*
    fn term(&mut self) -> Result<Expr> {
        let mut children = vec![self.filter_clause()?];
        while self.eat_word("OR") {
            children.push(self.filter_clause()?);
        }
        Ok(connect(children, Expr::Or))
    }

    fn filter_clause(&mut self) -> Result<Expr> {
        if self.eat_word("NOT") {
            return Err(QueryError::Unsupported {
                construct: "NOT".to_owned(),
            }
            .into());
        }
        if self.eat(&Tok::LParen) {
            let expr = self.expr()?;
            if !self.eat(&Tok::RParen) {
                return Err(self.parse_error("expected ')'"));
            }
            return Ok(expr);
        }
        self.filter_expr()
    }

    fn filter_expr(&mut self) -> Result<Expr> {
        let first = self.peek(0).cloned();
        let second = self.peek(1).cloned();
        match (first, second) {
            (Some(Tok::Word(field)), Some(Tok::Colon)) => {
                self.pos += 2;
                self.match_value(field)
            }
            (Some(Tok::Word(_)), Some(Tok::Cmp(op))) => Err(QueryError::Unsupported {
                construct: format!("numeric comparison '{op}'"),
            }
            .into()),
            (Some(Tok::Word(word)), _) => {
                self.pos += 1;
                self.tag(&word)
            }
            (Some(Tok::Quoted(text)), _) => {
                self.pos += 1;
                self.tag(&text)
            }
            _ => Err(self.parse_error("expected a filter expression")),
        }
    }

    // The value side of `fld:...` — a range or a literal.
    fn match_value(&mut self, field: String) -> Result<Expr> {
        let pos = self.here();
        let Some(tok) = self.peek(0).cloned() else {
            return Err(self.parse_error(format!("expected a value after '{field}:'")));
        };
        self.pos += 1;
        match tok {
            Tok::Word(w) if is_number(&w) => {
                let value = number_scalar(&w, pos)?;
                if self.eat_word("TO") {
                    match self.peek(0).cloned() {
                        Some(Tok::Word(hi)) if is_number(&hi) => {
                            self.pos += 1;
                            Err(QueryError::Unsupported {
                                construct: "numeric range".to_owned(),
                            }
                            .into())
                        }
                        _ => Err(self.parse_error("expected a number after 'TO'")),
                    }
                } else {
                    Ok(Expr::FacetEq { field, value })
                }
            }
            Tok::Word(w) if w == "true" || w == "false" => Ok(Expr::FacetEq {
                field,
                value: Scalar::Bool(w == "true"),
            }),
            Tok::Word(w) => Ok(Expr::FacetEq {
                field,
                value: Scalar::Str(w),
            }),
            Tok::Quoted(q) => Ok(Expr::FacetEq {
                field,
                value: Scalar::Str(q),
            }),
            _ => Err(QueryError::Parse {
                position: pos,
                message: format!("expected a value after '{field}:'"),
            }
            .into()),
        }
    }

    // A bare or quoted string, normalized through the collection tokenizer.
    fn tag(&self, text: &str) -> Result<Expr> {
        let mut tokens = tokenize(text, &self.cfg.translit, &self.cfg.stop_words);
        match tokens.len() {
            0 => Err(QueryError::EmptyQuery.into()),
            1 => Ok(Expr::ContainsToken(tokens.remove(0))),
            _ => Ok(Expr::ContainsTokens(tokens)),
        }
    }
}

fn connect(mut children: Vec<Expr>, connective: fn(Vec<Expr>) -> Expr) -> Expr {
    if children.len() == 1 {
        children.remove(0)
    } else {
        connective(children)
    }
}

fn is_number(word: &str) -> bool {
    let mut chars = word.chars().peekable();
    let mut digits = 0;
    while chars.peek().is_some_and(char::is_ascii_digit) {
        chars.next();
        digits += 1;
    }
    if digits == 0 {
        return false;
    }
    if chars.peek() == Some(&'.') {
        chars.next();
        while chars.peek().is_some_and(char::is_ascii_digit) {
            chars.next();
        }
    }
    chars.next().is_none()
}

fn number_scalar(word: &str, position: usize) -> Result<Scalar> {
    let invalid = || QueryError::Parse {
        position,
        message: format!("invalid number literal '{word}'"),
    };
    if word.contains('.') {
        word.parse::<f64>()
            .map(Scalar::Float)
            .map_err(|_| invalid().into())
    } else {
        word.parse::<i64>()
            .map(Scalar::Int)
            .map_err(|_| invalid().into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{check, let_assert};

    fn cfg() -> CollectionConfig {
        CollectionConfig::new("c", "id")
            .with_facet_fields(["country", "category", "num", "ok"])
            .with_text_fields(["desc"])
            .with_stop_words(["el"])
    }

    #[test]
    fn facet_disjunction() {
        let expr = parse("country:Colombia OR country:USA", &cfg()).unwrap();
        check!(
            expr == Expr::Or(vec![
                Expr::facet_eq("country", "Colombia"),
                Expr::facet_eq("country", "USA"),
            ])
        );
    }

    #[test]
    fn or_binds_tighter_than_and() {
        let expr = parse("x AND y OR z AND a OR b", &cfg()).unwrap();
        check!(
            expr == Expr::And(vec![
                Expr::contains_token("x"),
                Expr::Or(vec![Expr::contains_token("y"), Expr::contains_token("z")]),
                Expr::Or(vec![Expr::contains_token("a"), Expr::contains_token("b")]),
            ])
        );
    }

    #[test]
    fn parens_override_precedence() {
        let expr = parse("(x OR y) AND z", &cfg()).unwrap();
        check!(
            expr == Expr::And(vec![
                Expr::Or(vec![Expr::contains_token("x"), Expr::contains_token("y")]),
                Expr::contains_token("z"),
            ])
        );
    }

    #[test]
    fn literal_values() {
        check!(parse("num:4", &cfg()).unwrap() == Expr::facet_eq("num", 4i64));
        check!(parse("num:4.5", &cfg()).unwrap() == Expr::facet_eq("num", 4.5));
        check!(parse("ok:true", &cfg()).unwrap() == Expr::facet_eq("ok", true));
        check!(
            parse("category:\"JK Rowling\"", &cfg()).unwrap()
                == Expr::facet_eq("category", "JK Rowling")
        );
    }

    #[test]
    fn quoted_tag_normalizes_to_token_containment() {
        check!(
            parse("\"Dry Gin\"", &cfg()).unwrap()
                == Expr::ContainsTokens(vec!["dry".into(), "gin".into()])
        );
        check!(parse("Vodka", &cfg()).unwrap() == Expr::contains_token("vodka"));
    }

    #[test]
    fn stop_word_only_tag_is_empty_query() {
        let err = parse("el", &cfg()).unwrap_err();
        check!(matches!(err.downcast_ref(), Some(QueryError::EmptyQuery)));
    }

    #[test]
    fn not_is_unsupported_but_recognized() {
        let err = parse("NOT country:venezuela", &cfg()).unwrap_err();
        let_assert!(Some(QueryError::Unsupported { construct }) = err.downcast_ref());
        check!(construct == "NOT");
    }

    #[test]
    fn range_and_comparison_are_unsupported() {
        let err = parse("num:1 TO 2", &cfg()).unwrap_err();
        let_assert!(Some(QueryError::Unsupported { construct }) = err.downcast_ref());
        check!(construct == "numeric range");

        let err = parse("price < 10", &cfg()).unwrap_err();
        let_assert!(Some(QueryError::Unsupported { construct }) = err.downcast_ref());
        check!(construct == "numeric comparison '<'");
    }

    #[test]
    fn syntax_errors_carry_positions() {
        let err = parse("country:", &cfg()).unwrap_err();
        check!(matches!(err.downcast_ref(), Some(QueryError::Parse { .. })));

        let err = parse("\"unterminated", &cfg()).unwrap_err();
        let_assert!(Some(QueryError::Parse { position, .. }) = err.downcast_ref());
        check!(*position == 0);

        let err = parse("(x OR y", &cfg()).unwrap_err();
        check!(matches!(err.downcast_ref(), Some(QueryError::Parse { .. })));
    }

    #[test]
    fn empty_input_is_a_parse_error() {
        check!(parse("", &cfg()).is_err());
    }
}
