//! Value - the attribute container's JSON-like data type.
//!
//! A `Value` represents anything that can be stored in an attribute table.
//! It's similar to JSON but adds a callback variant so registered handlers
//! can live in the same table as plain data.
//!
//! # Supported Types
//!
//! - **Null**: Absence of a value
//! - **Bool**: true or false
//! - **Int**: i64 signed integers
//! - **Float**: f64 floating point numbers
//! - **Str**: UTF-8 encoded text
//! - **List**: Ordered sequence of values
//! - **Map**: Ordered key-value mapping (keys may be names or ordinals)
//! - **Callback**: A registered handler
//!
//! # Example
//!
//! ```rust,ignore
//! use attrbag::{Key, Value};
//! use indexmap::IndexMap;
//!
//! let list = Value::List(vec![Value::Int(1), Value::from("two")]);
//!
//! let mut map = IndexMap::new();
//! map.insert(Key::from("name"), Value::from("Alice"));
//! map.insert(Key::from("age"), Value::Int(30));
//! let obj = Value::Map(map);
//! ```

pub mod callback;
pub mod key;

pub use callback::{Handler, HandlerFn};
pub use key::Key;

use indexmap::IndexMap;
use std::fmt;

/// A value stored in the attribute table.
///
/// `List` and `Map` are the collection variants; everything else is a
/// scalar for the purposes of the append/count/first/last operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Map(IndexMap<Key, Value>),
    Callback(Handler),
}

impl Value {
    /// Check if value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Check if value is a collection (list or map)
    pub fn is_collection(&self) -> bool {
        matches!(self, Value::List(_) | Value::Map(_))
    }

    /// Get as boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as integer
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Get as float
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Get as string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Get as list
    pub fn as_list(&self) -> Option<&Vec<Value>> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Get as mutable list
    pub fn as_list_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Get as map
    pub fn as_map(&self) -> Option<&IndexMap<Key, Value>> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Get as mutable map
    pub fn as_map_mut(&mut self) -> Option<&mut IndexMap<Key, Value>> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Get as callback
    pub fn as_callback(&self) -> Option<&Handler> {
        match self {
            Value::Callback(h) => Some(h),
            _ => None,
        }
    }

    /// Number of elements in a collection, `None` for scalars
    pub fn collection_len(&self) -> Option<usize> {
        match self {
            Value::List(items) => Some(items.len()),
            Value::Map(map) => Some(map.len()),
            _ => None,
        }
    }

    /// Look up an element of a collection by key.
    ///
    /// Lists resolve ordinal keys as positions; maps resolve any key kind.
    /// Scalars have no elements.
    pub fn element(&self, key: &Key) -> Option<&Value> {
        match self {
            Value::List(items) => items.get(key.as_index()? as usize),
            Value::Map(map) => map.get(key),
            _ => None,
        }
    }

    /// Human-readable name of the variant, for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Callback(_) => "callback",
        }
    }
}

// Conversions
impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n as i64)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<IndexMap<Key, Value>> for Value {
    fn from(map: IndexMap<Key, Value>) -> Self {
        Value::Map(map)
    }
}

impl From<Handler> for Value {
    fn from(h: Handler) -> Self {
        Value::Callback(h)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(0.0)),
            },
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(arr) => {
                Value::List(arr.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(obj) => Value::Map(
                obj.into_iter()
                    .map(|(k, v)| (Key::Name(k), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Int(n) => serde_json::Value::Number(n.into()),
            Value::Float(n) => serde_json::Value::Number(
                serde_json::Number::from_f64(n).unwrap_or_else(|| serde_json::Number::from(0)),
            ),
            Value::Str(s) => serde_json::Value::String(s),
            Value::List(items) => {
                serde_json::Value::Array(items.into_iter().map(serde_json::Value::from).collect())
            }
            Value::Map(map) => serde_json::Value::Object(
                map.into_iter()
                    .map(|(k, v)| (k.to_string(), serde_json::Value::from(v)))
                    .collect(),
            ),
            Value::Callback(_) => {
                // Callables have no JSON form.
                tracing::warn!("dropping callback during JSON conversion");
                serde_json::Value::Null
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::Str(s) => write!(f, "\"{}\"", s),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Map(map) => {
                write!(f, "{{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "\"{}\": {}", key, value)?;
                }
                write!(f, "}}")
            }
            Value::Callback(_) => write!(f, "<handler>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        assert!(Value::Null.is_null());
        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert_eq!(Value::Int(5).as_int(), Some(5));
        assert_eq!(Value::from("hi").as_str(), Some("hi"));
        assert_eq!(Value::Int(5).as_str(), None);
    }

    #[test]
    fn test_collection_len() {
        let list = Value::List(vec![Value::Int(1), Value::Int(2)]);
        assert_eq!(list.collection_len(), Some(2));
        assert!(list.is_collection());

        assert_eq!(Value::Int(1).collection_len(), None);
        assert!(!Value::Int(1).is_collection());
    }

    #[test]
    fn test_element_lookup() {
        let list = Value::List(vec![Value::Int(10), Value::Int(20)]);
        assert_eq!(list.element(&Key::Index(1)), Some(&Value::Int(20)));
        assert_eq!(list.element(&Key::from("name")), None);

        let mut inner = IndexMap::new();
        inner.insert(Key::from("a"), Value::Int(1));
        let map = Value::Map(inner);
        assert_eq!(map.element(&Key::from("a")), Some(&Value::Int(1)));
        assert_eq!(map.element(&Key::from("b")), None);

        assert_eq!(Value::Int(3).element(&Key::Index(0)), None);
    }

    #[test]
    fn test_json_round_trip() {
        let json = serde_json::json!({
            "name": "svc",
            "count": 3,
            "ratio": 0.5,
            "tags": ["a", "b"],
        });

        let value = Value::from(json.clone());
        assert_eq!(
            value.as_map().unwrap().get(&Key::from("count")),
            Some(&Value::Int(3))
        );

        let back = serde_json::Value::from(value);
        assert_eq!(back, json);
    }

    #[test]
    fn test_callback_converts_to_json_null() {
        let value = Value::Callback(Handler::new(|_| Ok(Value::Null)));
        assert_eq!(serde_json::Value::from(value), serde_json::Value::Null);
    }

    #[test]
    fn test_display() {
        let list = Value::List(vec![Value::Int(1), Value::from("x")]);
        assert_eq!(list.to_string(), "[1, \"x\"]");
        assert_eq!(Value::Callback(Handler::new(|_| Ok(Value::Null))).to_string(), "<handler>");
    }
}
