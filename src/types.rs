//! Scalar and document types shared by indexing and search.
//!
//! Documents arrive as untyped JSON maps; the engine extracts [`Scalar`]s at
//! the schema seams (facet and numeric fields) so validation is an exhaustive
//! match instead of ad-hoc type sniffing.

use crate::error::IndexError;
use serde_json::Value as Json;
use std::fmt;

/// A document: an unordered mapping from field name to JSON value.
pub type Document = serde_json::Map<String, Json>;

/// A simple value: the only shape allowed inside facet and numeric fields.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Scalar {
    /// Extract a scalar from a JSON value, if it is one.
    pub fn from_json(value: &Json) -> Option<Self> {
        match value {
            Json::String(s) => Some(Self::Str(s.clone())),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Some(Self::Int(i)),
                None => n.as_f64().map(Self::Float),
            },
            Json::Bool(b) => Some(Self::Bool(*b)),
            Json::Null | Json::Array(_) | Json::Object(_) => None,
        }
    }

    /// Numeric view of this scalar, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(x) => Some(*x),
            Self::Str(_) | Self::Bool(_) => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Self::Str(s.to_owned())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<i64> for Scalar {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for Scalar {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// Coerce a field value to a list of elements: a list stays as is, `null`
/// becomes the empty list, any other value becomes a singleton.
pub(crate) fn as_list(value: &Json) -> Vec<&Json> {
    match value {
        Json::Array(items) => items.iter().collect(),
        Json::Null => Vec::new(),
        other => vec![other],
    }
}

/// Extract the canonical string identifier from a document.
///
/// Strings are taken verbatim; any other JSON value is rendered in its JSON
/// form (`4`, `4.5`, `true`).
pub(crate) fn doc_id(doc: &Document, id_fld: &str) -> Result<String, IndexError> {
    let value = doc.get(id_fld).ok_or_else(|| IndexError::MissingId {
        field: id_fld.to_owned(),
    })?;
    Ok(match value {
        Json::String(s) => s.clone(),
        other => other.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{check, let_assert};
    use serde_json::json;

    #[test]
    fn scalar_extraction() {
        check!(Scalar::from_json(&json!("red")) == Some(Scalar::Str("red".into())));
        check!(Scalar::from_json(&json!(4)) == Some(Scalar::Int(4)));
        check!(Scalar::from_json(&json!(4.5)) == Some(Scalar::Float(4.5)));
        check!(Scalar::from_json(&json!(true)) == Some(Scalar::Bool(true)));
        check!(Scalar::from_json(&json!(null)).is_none());
        check!(Scalar::from_json(&json!([1, 2])).is_none());
        check!(Scalar::from_json(&json!({"a": 1})).is_none());
    }

    #[test]
    fn scalar_display_is_key_friendly() {
        check!(Scalar::Str("red".into()).to_string() == "red");
        check!(Scalar::Int(4).to_string() == "4");
        check!(Scalar::Float(4.5).to_string() == "4.5");
        check!(Scalar::Bool(true).to_string() == "true");
    }

    #[test]
    fn as_list_coercion() {
        check!(as_list(&json!(null)).is_empty());
        check!(as_list(&json!("x")).len() == 1);
        check!(as_list(&json!(["a", "b"])).len() == 2);
    }

    #[test]
    fn doc_id_stringifies() {
        let doc = json!({"id": 1}).as_object().cloned().unwrap();
        check!(doc_id(&doc, "id").unwrap() == "1");

        let doc = json!({"id": "abc"}).as_object().cloned().unwrap();
        check!(doc_id(&doc, "id").unwrap() == "abc");
    }

    #[test]
    fn doc_id_missing_field() {
        let doc = json!({"name": "x"}).as_object().cloned().unwrap();
        let_assert!(Err(IndexError::MissingId { field }) = doc_id(&doc, "id"));
        check!(field == "id");
    }
}
