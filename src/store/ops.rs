//! Search, functional transforms, merge, and bulk offset operations
//!
//! Predicates and transforms supplied by the caller are never caught:
//! a panic inside one propagates unchanged.

use crate::error::{Error, Result};
use crate::store::container::{policy_violation, AttributeBag};
use crate::value::{Key, Value};
use indexmap::IndexMap;

/// Capability required of a [`merge`] source: anything that can export
/// itself as an ordered attribute table.
///
/// Making this a trait bound pushes the "source must be exportable" check
/// to compile time; there is no runtime rejection path left.
///
/// [`merge`]: AttributeBag::merge
pub trait IntoAttributes {
    fn into_attributes(self) -> IndexMap<Key, Value>;
}

impl IntoAttributes for IndexMap<Key, Value> {
    fn into_attributes(self) -> IndexMap<Key, Value> {
        self
    }
}

impl IntoAttributes for Vec<(Key, Value)> {
    fn into_attributes(self) -> IndexMap<Key, Value> {
        self.into_iter().collect()
    }
}

impl IntoAttributes for AttributeBag {
    fn into_attributes(self) -> IndexMap<Key, Value> {
        self.attributes
    }
}

impl IntoAttributes for &AttributeBag {
    fn into_attributes(self) -> IndexMap<Key, Value> {
        self.attributes.clone()
    }
}

impl AttributeBag {
    /// First element of the collection at `key` satisfying the predicate,
    /// scanning in insertion order.
    ///
    /// `None` when nothing matches or the target is missing or a scalar.
    pub fn find<F>(&self, key: impl Into<Key>, mut predicate: F) -> Option<&Value>
    where
        F: FnMut(&Value) -> bool,
    {
        match self.attributes.get(&key.into())? {
            Value::List(items) => items.iter().find(|value| predicate(value)),
            Value::Map(map) => map.values().find(|value| predicate(value)),
            _ => None,
        }
    }

    /// Retain only the elements of the collection at `key` satisfying the
    /// predicate, preserving relative order.
    ///
    /// Fails with [`Error::NotFound`] on a missing key and
    /// [`Error::TypeMismatch`] on a scalar. Idempotent when repeated with
    /// the same predicate.
    pub fn filter<F>(&mut self, key: impl Into<Key>, mut predicate: F) -> Result<&mut Self>
    where
        F: FnMut(&Value) -> bool,
    {
        let key = key.into();
        match self.attributes.get_mut(&key) {
            None => return Err(Error::NotFound(format!("key '{}' is not set", key))),
            Some(Value::List(items)) => items.retain(|value| predicate(value)),
            Some(Value::Map(map)) => map.retain(|_, value| predicate(value)),
            Some(other) => {
                return Err(Error::TypeMismatch(format!(
                    "cannot filter '{}': expected a collection, found {}",
                    key,
                    other.type_name()
                )))
            }
        }
        Ok(self)
    }

    /// Replace every element of the collection at `key` with the result of
    /// the transform, keys and positions preserved.
    ///
    /// Same error contract as [`filter`].
    ///
    /// [`filter`]: AttributeBag::filter
    pub fn map_values<F>(&mut self, key: impl Into<Key>, mut transform: F) -> Result<&mut Self>
    where
        F: FnMut(&Value) -> Value,
    {
        let key = key.into();
        match self.attributes.get_mut(&key) {
            None => return Err(Error::NotFound(format!("key '{}' is not set", key))),
            Some(Value::List(items)) => {
                for value in items.iter_mut() {
                    let next = transform(&*value);
                    *value = next;
                }
            }
            Some(Value::Map(map)) => {
                for value in map.values_mut() {
                    let next = transform(&*value);
                    *value = next;
                }
            }
            Some(other) => {
                return Err(Error::TypeMismatch(format!(
                    "cannot map '{}': expected a collection, found {}",
                    key,
                    other.type_name()
                )))
            }
        }
        Ok(self)
    }

    /// Merge an exported attribute table into the store.
    ///
    /// Source values overwrite on key collision. The allow-list is not
    /// consulted: a merge imports a table wholesale rather than writing
    /// named attributes one by one.
    pub fn merge<S: IntoAttributes>(&mut self, source: S) -> &mut Self {
        for (key, value) in source.into_attributes() {
            self.attributes.insert(key, value);
        }
        self
    }

    /// Set the same value at every key, in order.
    ///
    /// Best-effort: fails with [`Error::PolicyViolation`] at the first
    /// non-fillable key, leaving earlier assignments applied (non-atomic).
    pub fn set_many<I, K>(&mut self, keys: I, value: impl Into<Value>) -> Result<&mut Self>
    where
        I: IntoIterator<Item = K>,
        K: Into<Key>,
    {
        let value = value.into();
        for key in keys {
            let key = key.into();
            if !self.fillable().contains(&key) {
                return Err(policy_violation(&key));
            }
            self.attributes.insert(key, value.clone());
        }
        Ok(self)
    }

    /// Remove the entry at `key`; removing an absent key is a no-op
    pub fn remove(&mut self, key: impl Into<Key>) -> &mut Self {
        self.attributes.shift_remove(&key.into());
        self
    }

    /// Remove several entries; absent keys are no-ops
    pub fn remove_many<I, K>(&mut self, keys: I) -> &mut Self
    where
        I: IntoIterator<Item = K>,
        K: Into<Key>,
    {
        for key in keys {
            self.attributes.shift_remove(&key.into());
        }
        self
    }

    /// First sub-key within the collection at `key` whose element
    /// satisfies the predicate.
    ///
    /// `None` when nothing matches or the target is not a collection.
    pub fn find_key<F>(&self, key: impl Into<Key>, mut predicate: F) -> Option<Key>
    where
        F: FnMut(&Value) -> bool,
    {
        match self.attributes.get(&key.into())? {
            Value::List(items) => items
                .iter()
                .position(|value| predicate(value))
                .map(|i| Key::Index(i as u64)),
            Value::Map(map) => map
                .iter()
                .find(|(_, value)| predicate(value))
                .map(|(k, _)| k.clone()),
            _ => None,
        }
    }

    /// Remove every element of the collection at `key` satisfying the
    /// predicate.
    ///
    /// Fails with [`Error::PolicyViolation`] when `key` is not in the
    /// allow-list and [`Error::TypeMismatch`] when the value is a scalar.
    /// A missing key is a no-op; the predicate itself is never stored.
    pub fn remove_matching<F>(&mut self, key: impl Into<Key>, mut predicate: F) -> Result<&mut Self>
    where
        F: FnMut(&Value) -> bool,
    {
        let key = key.into();
        if !self.fillable().contains(&key) {
            return Err(policy_violation(&key));
        }
        match self.attributes.get_mut(&key) {
            None => {}
            Some(Value::List(items)) => items.retain(|value| !predicate(value)),
            Some(Value::Map(map)) => map.retain(|_, value| !predicate(value)),
            Some(other) => {
                return Err(Error::TypeMismatch(format!(
                    "cannot remove from '{}': expected a collection, found {}",
                    key,
                    other.type_name()
                )))
            }
        }
        Ok(self)
    }
}
