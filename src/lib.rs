// attrbag - ordered attribute container
// Mixed ordinal/named keys, a write allow-list, and a callback registry

#![warn(rust_2018_idioms)]

pub mod registry;
pub mod store;
pub mod value;

// Re-exports for convenience
pub use registry::HANDLERS_KEY;
pub use store::{AttributeBag, Fillable, IntoAttributes};
pub use value::{Handler, HandlerFn, Key, Value};

/// Container error types
pub mod error {
    use thiserror::Error;

    #[derive(Error, Debug)]
    pub enum Error {
        /// A named write targeted a key outside the fillable allow-list
        #[error("Policy violation: {0}")]
        PolicyViolation(String),

        /// A collection operation targeted a scalar value
        #[error("Type mismatch: {0}")]
        TypeMismatch(String),

        /// A registry entry or operand had the wrong shape
        #[error("Invalid argument: {0}")]
        InvalidArgument(String),

        /// A query referenced a key where absence is not a valid answer
        #[error("Not found: {0}")]
        NotFound(String),
    }

    pub type Result<T> = std::result::Result<T, Error>;
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
