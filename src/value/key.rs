//! Attribute keys - named or ordinal

use serde::{Deserialize, Serialize};
use std::fmt;

/// A key into the attribute table.
///
/// Keys are either ordinal positions (`Index`) or names (`Name`), and both
/// kinds coexist in the same table. Ordinal keys are handed out by the
/// list-append operations; named keys come from the caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Key {
    Index(u64),
    Name(String),
}

impl Key {
    /// Get as ordinal index
    pub fn as_index(&self) -> Option<u64> {
        match self {
            Key::Index(i) => Some(*i),
            _ => None,
        }
    }

    /// Get as name
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Key::Name(n) => Some(n),
            _ => None,
        }
    }
}

// Conversions
impl From<u64> for Key {
    fn from(i: u64) -> Self {
        Key::Index(i)
    }
}

impl From<usize> for Key {
    fn from(i: usize) -> Self {
        Key::Index(i as u64)
    }
}

impl From<String> for Key {
    fn from(n: String) -> Self {
        Key::Name(n)
    }
}

impl From<&str> for Key {
    fn from(n: &str) -> Self {
        Key::Name(n.to_string())
    }
}

impl From<&Key> for Key {
    fn from(k: &Key) -> Self {
        k.clone()
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Index(i) => write!(f, "{}", i),
            Key::Name(n) => write!(f, "{}", n),
        }
    }
}
