//! Callback registry
//!
//! The registry is the reserved `"handlers"` entry of the attribute store:
//! an ordered map from offset to callable. It lives inside the store (so
//! `clear` drops it along with everything else) but is reached through
//! this dedicated surface, which never exposes the generic bulk
//! operations under handler names.
//!
//! Every operation here fails loudly with
//! [`Error::InvalidArgument`](crate::error::Error::InvalidArgument) if an
//! external write replaced the `"handlers"` entry with something other
//! than a map, or parked a non-callable under a handler offset.

use crate::error::{Error, Result};
use crate::store::container::{next_index, AttributeBag};
use crate::value::{Handler, Key, Value};
use indexmap::IndexMap;
use tracing::debug;

/// Reserved top-level key holding the callback registry
pub const HANDLERS_KEY: &str = "handlers";

fn corrupt_registry(found: &Value) -> Error {
    Error::InvalidArgument(format!(
        "'{}' entry must be a map, found {}",
        HANDLERS_KEY,
        found.type_name()
    ))
}

impl AttributeBag {
    fn handlers(&self) -> Result<Option<&IndexMap<Key, Value>>> {
        match self.attributes.get(&Key::from(HANDLERS_KEY)) {
            None => Ok(None),
            Some(Value::Map(map)) => Ok(Some(map)),
            Some(other) => Err(corrupt_registry(other)),
        }
    }

    /// Registry map, created empty on first write
    fn handlers_mut(&mut self) -> Result<&mut IndexMap<Key, Value>> {
        let entry = self
            .attributes
            .entry(Key::from(HANDLERS_KEY))
            .or_insert_with(|| Value::Map(IndexMap::new()));
        match entry {
            Value::Map(map) => Ok(map),
            other => Err(corrupt_registry(other)),
        }
    }

    /// Get the handler registered at `offset`, or `None`
    pub fn handler(&self, offset: impl Into<Key>) -> Result<Option<&Handler>> {
        let offset = offset.into();
        let map = match self.handlers()? {
            None => return Ok(None),
            Some(map) => map,
        };
        match map.get(&offset) {
            None => Ok(None),
            Some(Value::Callback(handler)) => Ok(Some(handler)),
            Some(other) => Err(Error::InvalidArgument(format!(
                "handler at '{}' is not callable, found {}",
                offset,
                other.type_name()
            ))),
        }
    }

    /// Register a handler at the registry's next free ordinal offset
    pub fn push_handler(&mut self, handler: Handler) -> Result<&mut Self> {
        let map = self.handlers_mut()?;
        let offset = next_index(map);
        map.insert(Key::Index(offset), Value::Callback(handler));
        Ok(self)
    }

    /// Register a handler at an explicit offset, overwriting any previous
    /// registration there
    pub fn insert_handler(&mut self, offset: impl Into<Key>, handler: Handler) -> Result<&mut Self> {
        let offset = offset.into();
        self.handlers_mut()?
            .insert(offset, Value::Callback(handler));
        Ok(self)
    }

    /// Register several handlers, in order.
    ///
    /// One [`insert_handler`] per pair; if a later pair fails, earlier
    /// registrations stay applied (non-atomic).
    ///
    /// [`insert_handler`]: AttributeBag::insert_handler
    pub fn push_handlers<I, K>(&mut self, handlers: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = (K, Handler)>,
        K: Into<Key>,
    {
        for (offset, handler) in handlers {
            self.insert_handler(offset, handler)?;
        }
        Ok(self)
    }

    /// Remove and return the handler at `offset`, or `None` if absent
    pub fn pull_handler(&mut self, offset: impl Into<Key>) -> Result<Option<Handler>> {
        let offset = offset.into();
        let map = match self.attributes.get_mut(&Key::from(HANDLERS_KEY)) {
            None => return Ok(None),
            Some(Value::Map(map)) => map,
            Some(other) => return Err(corrupt_registry(other)),
        };
        match map.get(&offset) {
            None => Ok(None),
            Some(Value::Callback(_)) => match map.shift_remove(&offset) {
                Some(Value::Callback(handler)) => Ok(Some(handler)),
                _ => Ok(None),
            },
            Some(other) => Err(Error::InvalidArgument(format!(
                "handler at '{}' is not callable, found {}",
                offset,
                other.type_name()
            ))),
        }
    }

    /// Remove and return the handler at `offset`, or `default` if absent
    pub fn pull_handler_or(
        &mut self,
        offset: impl Into<Key>,
        default: Handler,
    ) -> Result<Handler> {
        Ok(self.pull_handler(offset)?.unwrap_or(default))
    }

    /// Replace the whole registry with the given handlers
    pub fn fill_handlers<I, K>(&mut self, handlers: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, Handler)>,
        K: Into<Key>,
    {
        let map: IndexMap<Key, Value> = handlers
            .into_iter()
            .map(|(offset, handler)| (offset.into(), Value::Callback(handler)))
            .collect();
        debug!(count = map.len(), "replacing handler registry");
        self.attributes
            .insert(Key::from(HANDLERS_KEY), Value::Map(map));
        self
    }

    /// Empty the registry; the rest of the store is untouched
    pub fn clear_handlers(&mut self) -> &mut Self {
        self.attributes
            .insert(Key::from(HANDLERS_KEY), Value::Map(IndexMap::new()));
        self
    }

    /// Number of registered handlers; an absent registry counts as empty
    pub fn handlers_len(&self) -> Result<usize> {
        Ok(self.handlers()?.map_or(0, IndexMap::len))
    }

    /// Invoke the handler at `offset`.
    ///
    /// Fails with [`Error::NotFound`](crate::error::Error::NotFound) when
    /// nothing is registered there; errors from the callable propagate
    /// unchanged.
    pub fn call_handler(&self, offset: impl Into<Key>, args: &[Value]) -> Result<Value> {
        let offset = offset.into();
        match self.handler(&offset)? {
            Some(handler) => handler.call(args),
            None => Err(Error::NotFound(format!(
                "no handler registered at '{}'",
                offset
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adder() -> Handler {
        Handler::new(|args| {
            let sum = args.iter().filter_map(Value::as_int).sum::<i64>();
            Ok(Value::Int(sum))
        })
    }

    #[test]
    fn test_handler_round_trip() {
        let mut bag = AttributeBag::new();
        let h = adder();

        bag.insert_handler("x", h.clone()).unwrap();
        assert_eq!(bag.handler("x").unwrap(), Some(&h));

        let pulled = bag.pull_handler("x").unwrap();
        assert_eq!(pulled, Some(h));
        assert_eq!(bag.handler("x").unwrap(), None);
    }

    #[test]
    fn test_push_handler_appends_ordinals() {
        let mut bag = AttributeBag::new();
        bag.push_handler(adder()).unwrap();
        bag.push_handler(adder()).unwrap();

        assert_eq!(bag.handlers_len().unwrap(), 2);
        assert!(bag.handler(0u64).unwrap().is_some());
        assert!(bag.handler(1u64).unwrap().is_some());
    }

    #[test]
    fn test_push_handlers_in_order() {
        let mut bag = AttributeBag::new();
        bag.push_handlers([("a", adder()), ("b", adder())]).unwrap();
        assert_eq!(bag.handlers_len().unwrap(), 2);
        assert!(bag.handler("a").unwrap().is_some());
    }

    #[test]
    fn test_pull_handler_or_default() {
        let mut bag = AttributeBag::new();
        let fallback = adder();
        let got = bag.pull_handler_or("missing", fallback.clone()).unwrap();
        assert_eq!(got, fallback);
    }

    #[test]
    fn test_fill_handlers_replaces_wholesale() {
        let mut bag = AttributeBag::new();
        bag.insert_handler("old", adder()).unwrap();

        bag.fill_handlers([("new", adder())]);
        assert_eq!(bag.handler("old").unwrap(), None);
        assert!(bag.handler("new").unwrap().is_some());
        assert_eq!(bag.handlers_len().unwrap(), 1);
    }

    #[test]
    fn test_clear_handlers_leaves_store_alone() {
        let mut bag = AttributeBag::new();
        bag.push("data");
        bag.insert_handler("x", adder()).unwrap();

        bag.clear_handlers();
        assert_eq!(bag.handlers_len().unwrap(), 0);
        assert_eq!(bag.get(0u64), Some(&Value::from("data")));
        // the registry entry itself survives as an empty map
        assert!(bag.contains(HANDLERS_KEY));
    }

    #[test]
    fn test_call_handler() {
        let mut bag = AttributeBag::new();
        bag.insert_handler("sum", adder()).unwrap();

        let result = bag
            .call_handler("sum", &[Value::Int(2), Value::Int(3)])
            .unwrap();
        assert_eq!(result, Value::Int(5));

        let err = bag.call_handler("missing", &[]).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_corrupt_registry_fails_loudly() {
        let mut bag = AttributeBag::new();
        // the reserved key is always fillable, so an external write can
        // park a scalar there
        bag.set(HANDLERS_KEY, "oops").unwrap();

        assert!(matches!(
            bag.handler("x"),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            bag.push_handler(adder()),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            bag.handlers_len(),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_non_callable_element_fails_loudly() {
        let mut bag = AttributeBag::new();
        let mut map = IndexMap::new();
        map.insert(Key::from("x"), Value::Int(1));
        bag.set(HANDLERS_KEY, Value::Map(map)).unwrap();

        assert!(matches!(
            bag.handler("x"),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            bag.pull_handler("x"),
            Err(Error::InvalidArgument(_))
        ));
    }
}
