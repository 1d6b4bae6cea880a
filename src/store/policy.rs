//! Write allow-list
//!
//! Every named write into the attribute table is gated by a `Fillable`
//! set. Ordinal appends bypass the gate; that asymmetry is what lets the
//! container behave as a list and a map at the same time.

use crate::registry::HANDLERS_KEY;
use crate::value::Key;
use indexmap::IndexSet;

/// The set of keys eligible for named writes.
///
/// The reserved `"handlers"` key is always a member; the callback registry
/// lives inside the attribute table and must stay writable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fillable {
    keys: IndexSet<Key>,
}

impl Fillable {
    /// Build an allow-list from the given keys, plus the reserved key
    pub fn new<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<Key>,
    {
        let mut keys: IndexSet<Key> = keys.into_iter().map(Into::into).collect();
        keys.insert(Key::from(HANDLERS_KEY));
        Fillable { keys }
    }

    /// Add a key to the allow-list
    pub fn allow(&mut self, key: impl Into<Key>) -> &mut Self {
        self.keys.insert(key.into());
        self
    }

    /// Remove a key from the allow-list.
    ///
    /// The reserved `"handlers"` key cannot be removed.
    pub fn disallow(&mut self, key: impl Into<Key>) -> &mut Self {
        let key = key.into();
        if key == Key::from(HANDLERS_KEY) {
            tracing::debug!("refusing to disallow the reserved handlers key");
            return self;
        }
        self.keys.shift_remove(&key);
        self
    }

    /// Check membership
    pub fn contains(&self, key: &Key) -> bool {
        self.keys.contains(key)
    }

    /// Iterate over allowed keys
    pub fn iter(&self) -> impl Iterator<Item = &Key> {
        self.keys.iter()
    }

    /// Number of allowed keys
    pub fn len(&self) -> usize {
        self.keys.len()
    }
}

impl Default for Fillable {
    fn default() -> Self {
        Fillable::new(std::iter::empty::<Key>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_contains_handlers() {
        let fillable = Fillable::default();
        assert!(fillable.contains(&Key::from(HANDLERS_KEY)));
        assert_eq!(fillable.len(), 1);
    }

    #[test]
    fn test_new_always_adds_handlers() {
        let fillable = Fillable::new(["name", "age"]);
        assert!(fillable.contains(&Key::from("name")));
        assert!(fillable.contains(&Key::from("age")));
        assert!(fillable.contains(&Key::from(HANDLERS_KEY)));
    }

    #[test]
    fn test_allow_disallow() {
        let mut fillable = Fillable::default();
        fillable.allow("extra");
        assert!(fillable.contains(&Key::from("extra")));

        fillable.disallow("extra");
        assert!(!fillable.contains(&Key::from("extra")));
    }

    #[test]
    fn test_handlers_key_is_sticky() {
        let mut fillable = Fillable::default();
        fillable.disallow(HANDLERS_KEY);
        assert!(fillable.contains(&Key::from(HANDLERS_KEY)));
    }
}
