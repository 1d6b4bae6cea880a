//! Stored callbacks
//!
//! A `Handler` wraps a callable so it can live inside the attribute table
//! like any other value. Handlers take a slice of argument values and
//! return a result value; errors from the callable propagate unchanged.

use crate::error::Result;
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// Callable signature shared by every registered handler.
pub type HandlerFn = dyn Fn(&[Value]) -> Result<Value> + Send + Sync;

/// A registered callback.
///
/// Cloning is cheap (shared reference); equality is identity, so two
/// handlers compare equal only when they are the same registration.
#[derive(Clone)]
pub struct Handler(Arc<HandlerFn>);

impl Handler {
    /// Wrap a callable
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        Handler(Arc::new(f))
    }

    /// Invoke the callable
    pub fn call(&self, args: &[Value]) -> Result<Value> {
        (self.0)(args)
    }
}

impl PartialEq for Handler {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handler_call() {
        let h = Handler::new(|args| {
            let n = args.first().and_then(Value::as_int).unwrap_or(0);
            Ok(Value::Int(n + 1))
        });

        assert_eq!(h.call(&[Value::Int(41)]).unwrap(), Value::Int(42));
        assert_eq!(h.call(&[]).unwrap(), Value::Int(1));
    }

    #[test]
    fn test_handler_identity_equality() {
        let a = Handler::new(|_| Ok(Value::Null));
        let b = Handler::new(|_| Ok(Value::Null));
        let a2 = a.clone();

        assert_eq!(a, a2);
        assert_ne!(a, b);
    }

    #[test]
    fn test_handler_debug_is_opaque() {
        let h = Handler::new(|_| Ok(Value::Null));
        let rendered = format!("{:?}", h);
        assert!(rendered.starts_with("Handler"));
    }
}
