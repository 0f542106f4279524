//! Lenient id deserialization
//!
//! Clients receive user ids as strings from the auth endpoints (`"id": "3"`)
//! and send them back either as strings or as numbers. Request bodies accept
//! both forms.

use serde::{de, Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum IdRepr {
    Int(i64),
    Str(String),
}

fn parse_repr<E: de::Error>(repr: IdRepr) -> Result<Option<i64>, E> {
    match repr {
        IdRepr::Int(id) => Ok(Some(id)),
        IdRepr::Str(s) if s.trim().is_empty() => Ok(None),
        IdRepr::Str(s) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| E::custom(format!("invalid id: '{}'", s))),
    }
}

/// Deserialize an optional id given as a number, a numeric string, `null`,
/// or an empty string. Use together with `#[serde(default)]`.
pub fn optional_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<IdRepr>::deserialize(deserializer)? {
        Some(repr) => parse_repr(repr),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Body {
        #[serde(default, deserialize_with = "optional_id")]
        id: Option<i64>,
    }

    fn parse(json: &str) -> Result<Option<i64>, serde_json::Error> {
        serde_json::from_str::<Body>(json).map(|b| b.id)
    }

    #[test]
    fn test_accepts_number_and_string() {
        assert_eq!(parse(r#"{"id": 4}"#).unwrap(), Some(4));
        assert_eq!(parse(r#"{"id": "12"}"#).unwrap(), Some(12));
    }

    #[test]
    fn test_missing_null_and_empty_are_none() {
        assert_eq!(parse(r#"{}"#).unwrap(), None);
        assert_eq!(parse(r#"{"id": null}"#).unwrap(), None);
        assert_eq!(parse(r#"{"id": ""}"#).unwrap(), None);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(parse(r#"{"id": "abc"}"#).is_err());
    }
}
