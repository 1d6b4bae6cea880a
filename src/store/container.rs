//! The attribute container
//!
//! `AttributeBag` owns the canonical ordered key-value table. Named writes
//! are gated by the fillable allow-list; ordinal appends are not, which is
//! what gives the container its list/map dual mode. The callback registry
//! is an ordinary entry in the same table, reached through the dedicated
//! surface in [`crate::registry`].

use crate::error::{Error, Result};
use crate::store::policy::Fillable;
use crate::value::{Key, Value};
use indexmap::map::Entry;
use indexmap::IndexMap;
use tracing::debug;

/// Ordered attribute container with a write allow-list.
///
/// Keys may be names or ordinals and insertion order is preserved, so the
/// same table supports map-style access (`get`/`set`) and list-style
/// access (`push`/`first`/`last`).
#[derive(Clone, PartialEq)]
pub struct AttributeBag {
    pub(crate) attributes: IndexMap<Key, Value>,
    fillable: Fillable,
}

/// Next free ordinal index in a table: one past the highest in use.
pub(crate) fn next_index(map: &IndexMap<Key, Value>) -> u64 {
    map.keys()
        .filter_map(Key::as_index)
        .max()
        .map_or(0, |i| i + 1)
}

pub(crate) fn policy_violation(key: &Key) -> Error {
    Error::PolicyViolation(format!("key '{}' is not fillable", key))
}

impl AttributeBag {
    /// Create an empty container with the default allow-list
    pub fn new() -> Self {
        Self::with_fillable(Fillable::default())
    }

    /// Create an empty container with an explicit allow-list
    pub fn with_fillable(fillable: Fillable) -> Self {
        AttributeBag {
            attributes: IndexMap::new(),
            fillable,
        }
    }

    /// Create a container seeded with initial attributes.
    ///
    /// The initial pairs pass through the allow-list exactly as [`fill`]
    /// does: non-fillable keys are dropped silently.
    ///
    /// [`fill`]: AttributeBag::fill
    pub fn seeded<I, K, V>(fillable: Fillable, initial: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Key>,
        V: Into<Value>,
    {
        let mut bag = Self::with_fillable(fillable);
        bag.fill(initial);
        bag
    }

    /// The current allow-list
    pub fn fillable(&self) -> &Fillable {
        &self.fillable
    }

    /// Mutable access to the allow-list
    pub fn fillable_mut(&mut self) -> &mut Fillable {
        &mut self.fillable
    }

    // ---- basic CRUD ----

    /// Get the value at `key`, or `None` if not present.
    ///
    /// A miss is never an error. This is also the read alias the offset
    /// surface uses (`offsetGet`).
    pub fn get(&self, key: impl Into<Key>) -> Option<&Value> {
        self.attributes.get(&key.into())
    }

    /// Mutable access to the value at `key`
    pub fn get_mut(&mut self, key: impl Into<Key>) -> Option<&mut Value> {
        self.attributes.get_mut(&key.into())
    }

    /// Set the value at `key`.
    ///
    /// Fails with [`Error::PolicyViolation`] when `key` is not in the
    /// allow-list; the store is left untouched. Also the write alias the
    /// offset surface uses (`offsetSet`).
    pub fn set(&mut self, key: impl Into<Key>, value: impl Into<Value>) -> Result<&mut Self> {
        let key = key.into();
        if !self.fillable.contains(&key) {
            return Err(policy_violation(&key));
        }
        self.attributes.insert(key, value.into());
        Ok(self)
    }

    /// Append a value at the next free ordinal index.
    ///
    /// List-append semantics: ordinal entries are positions, not named
    /// attributes, so the allow-list is not consulted.
    pub fn push(&mut self, value: impl Into<Value>) -> &mut Self {
        let index = next_index(&self.attributes);
        self.attributes.insert(Key::Index(index), value.into());
        self
    }

    /// Append a value into the collection stored at `key`.
    ///
    /// Creates a list when `key` is absent. Appending to a map uses the
    /// map's next free ordinal index. Fails with
    /// [`Error::PolicyViolation`] when `key` is not in the allow-list and
    /// [`Error::TypeMismatch`] when the existing value is a scalar.
    pub fn push_to(&mut self, key: impl Into<Key>, value: impl Into<Value>) -> Result<&mut Self> {
        let key = key.into();
        if !self.fillable.contains(&key) {
            return Err(policy_violation(&key));
        }
        match self.attributes.entry(key.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(Value::List(vec![value.into()]));
            }
            Entry::Occupied(mut slot) => match slot.get_mut() {
                Value::List(items) => items.push(value.into()),
                Value::Map(map) => {
                    let index = next_index(map);
                    map.insert(Key::Index(index), value.into());
                }
                other => {
                    return Err(Error::TypeMismatch(format!(
                        "cannot append to '{}': expected a collection, found {}",
                        key,
                        other.type_name()
                    )))
                }
            },
        }
        Ok(self)
    }

    /// Append several values at top level, in order
    pub fn push_many<I, V>(&mut self, items: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        for item in items {
            self.push(item);
        }
        self
    }

    /// Append several values into the collection at `key`, in order.
    ///
    /// One [`push_to`] per item; if a later item fails, earlier appends
    /// stay applied (non-atomic).
    ///
    /// [`push_to`]: AttributeBag::push_to
    pub fn push_many_to<I, V>(&mut self, key: impl Into<Key>, items: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let key = key.into();
        for item in items {
            self.push_to(key.clone(), item)?;
        }
        Ok(self)
    }

    /// Remove and return the value at `key`, or `None` if absent
    pub fn pull(&mut self, key: impl Into<Key>) -> Option<Value> {
        self.attributes.shift_remove(&key.into())
    }

    /// Remove and return the value at `key`, or `default` if absent
    pub fn pull_or(&mut self, key: impl Into<Key>, default: impl Into<Value>) -> Value {
        self.pull(key).unwrap_or_else(|| default.into())
    }

    /// Bulk set: apply every pair whose key is in the allow-list.
    ///
    /// The lenient counterpart of [`set`]: pairs with non-fillable keys
    /// are skipped without error.
    ///
    /// [`set`]: AttributeBag::set
    pub fn fill<I, K, V>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Key>,
        V: Into<Value>,
    {
        for (key, value) in values {
            let key = key.into();
            if self.fillable.contains(&key) {
                self.attributes.insert(key, value.into());
            } else {
                debug!(key = %key, "fill skipped non-fillable key");
            }
        }
        self
    }

    /// Empty the whole store, callback registry included
    pub fn clear(&mut self) -> &mut Self {
        debug!(dropped = self.attributes.len(), "clearing attribute store");
        self.attributes.clear();
        self
    }

    /// Number of top-level entries
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    // ---- count and positional access ----

    /// Number of elements in the collection stored at `key`.
    ///
    /// An absent key is [`Error::NotFound`] rather than zero; a scalar
    /// value is [`Error::TypeMismatch`].
    pub fn len_of(&self, key: impl Into<Key>) -> Result<usize> {
        let key = key.into();
        match self.attributes.get(&key) {
            None => Err(Error::NotFound(format!("key '{}' is not set", key))),
            Some(value) => value.collection_len().ok_or_else(|| {
                Error::TypeMismatch(format!(
                    "cannot count '{}': expected a collection, found {}",
                    key,
                    value.type_name()
                ))
            }),
        }
    }

    /// First value in the store by insertion order, without removing it
    pub fn first(&self) -> Option<&Value> {
        self.attributes.values().next()
    }

    /// Last value in the store by insertion order, without removing it
    pub fn last(&self) -> Option<&Value> {
        self.attributes.values().last()
    }

    /// First element of the collection at `key`, by insertion order.
    ///
    /// `None` when the key is missing, the collection is empty, or the
    /// value is a scalar.
    pub fn first_of(&self, key: impl Into<Key>) -> Option<&Value> {
        match self.attributes.get(&key.into())? {
            Value::List(items) => items.first(),
            Value::Map(map) => map.values().next(),
            _ => None,
        }
    }

    /// Last element of the collection at `key`, by insertion order
    pub fn last_of(&self, key: impl Into<Key>) -> Option<&Value> {
        match self.attributes.get(&key.into())? {
            Value::List(items) => items.last(),
            Value::Map(map) => map.values().last(),
            _ => None,
        }
    }

    // ---- existence checks ----

    /// Check whether `key` is present in the store.
    ///
    /// Also the read alias the offset surface uses (`offsetExists`).
    pub fn contains(&self, key: impl Into<Key>) -> bool {
        self.attributes.contains_key(&key.into())
    }

    /// Check whether every offset exists within the collection at `key`.
    ///
    /// Offset groups flatten: supply them in one iterator. Returns false
    /// on the first missing offset, or when the target is missing or a
    /// scalar (unless no offsets were supplied at all).
    pub fn has<I, K>(&self, key: impl Into<Key>, offsets: I) -> bool
    where
        I: IntoIterator<Item = K>,
        K: Into<Key>,
    {
        let key = key.into();
        let value = match self.attributes.get(&key) {
            Some(value) => value,
            None => return false,
        };
        offsets
            .into_iter()
            .all(|offset| value.element(&offset.into()).is_some())
    }
}

impl Default for AttributeBag {
    fn default() -> Self {
        Self::new()
    }
}
