//! Read-only views over the attribute store
//!
//! Iteration, snapshot export, and the diagnostic `Debug` rendering.
//! Nothing in this module mutates the store.

use crate::store::container::AttributeBag;
use crate::value::{Key, Value};
use indexmap::IndexMap;
use std::fmt;

impl AttributeBag {
    /// Iterate over `(key, value)` pairs in insertion order.
    ///
    /// Each call reads the current state; the shared borrow statically
    /// rules out mutation while an iterator is live.
    pub fn iter(&self) -> indexmap::map::Iter<'_, Key, Value> {
        self.attributes.iter()
    }

    /// Iterate over top-level keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.attributes.keys()
    }

    /// Snapshot copy of the whole store.
    ///
    /// The clone is deep: mutating the container afterwards never alters
    /// a previously returned snapshot.
    pub fn to_map(&self) -> IndexMap<Key, Value> {
        self.attributes.clone()
    }
}

impl<'a> IntoIterator for &'a AttributeBag {
    type Item = (&'a Key, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, Key, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Diagnostic rendering: top-level keys only.
///
/// Values stay out of the output, so callable identities and large nested
/// payloads never leak into logs.
impl fmt::Debug for AttributeBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeBag")
            .field("keys", &self.attributes.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::policy::Fillable;
    use crate::value::Handler;

    fn sample_bag() -> AttributeBag {
        let mut bag = AttributeBag::with_fillable(Fillable::new(["name", "tags"]));
        bag.set("name", "svc").unwrap();
        bag.push_many_to("tags", ["a", "b"]).unwrap();
        bag
    }

    #[test]
    fn test_iter_in_insertion_order() {
        let bag = sample_bag();
        let keys: Vec<&Key> = bag.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![&Key::from("name"), &Key::from("tags")]);

        // restartable: a second pass sees the same sequence
        let again: Vec<&Key> = (&bag).into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, again);
    }

    #[test]
    fn test_to_map_is_isolated_snapshot() {
        let mut bag = sample_bag();
        let snapshot = bag.to_map();

        bag.set("name", "changed").unwrap();
        bag.push_to("tags", "c").unwrap();
        bag.clear();

        assert_eq!(
            snapshot.get(&Key::from("name")),
            Some(&Value::from("svc"))
        );
        let tags = snapshot.get(&Key::from("tags")).and_then(Value::as_list);
        assert_eq!(tags.map(Vec::len), Some(2));
    }

    #[test]
    fn test_debug_shows_keys_only() {
        let mut bag = sample_bag();
        bag.push_handler(Handler::new(|_| Ok(Value::Null))).unwrap();

        let rendered = format!("{:?}", bag);
        assert!(rendered.contains("name"));
        assert!(rendered.contains("tags"));
        assert!(rendered.contains("handlers"));
        assert!(!rendered.contains("svc"));
        assert!(!rendered.contains("Handler {"));
    }
}
