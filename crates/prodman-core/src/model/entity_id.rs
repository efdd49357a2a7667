// ── Core identity type ──
//
// The backend keys products and documents by integer primary keys, but the
// id stays opaque here: anything that is not an integer is carried as a
// string and passed back verbatim.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Canonical identifier for a product or document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Int(i64),
    Str(String),
}

impl EntityId {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            Self::Str(_) => None,
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Str(s) => write!(f, "{s}"),
        }
    }
}

impl FromStr for EntityId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl From<i64> for EntityId {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        match s.trim().parse::<i64>() {
            Ok(n) => Self::Int(n),
            Err(_) => Self::Str(s),
        }
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self::from(s.to_owned())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn numeric_string_becomes_int() {
        let id: EntityId = "501".parse().unwrap();
        assert_eq!(id, EntityId::Int(501));
        assert_eq!(id.as_int(), Some(501));
    }

    #[test]
    fn other_strings_stay_opaque() {
        let id = EntityId::from("sku-9");
        assert_eq!(id, EntityId::Str("sku-9".into()));
        assert_eq!(id.to_string(), "sku-9");
    }

    #[test]
    fn deserializes_either_form() {
        let a: EntityId = serde_json::from_str("7").unwrap();
        let b: EntityId = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(a, EntityId::Int(7));
        assert_eq!(b, EntityId::Str("abc".into()));
    }
}
