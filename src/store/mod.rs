//! Attribute store
//!
//! # Architecture
//!
//! One data object, four cooperating responsibilities:
//!
//! ```text
//! AttributeBag
//!   ├─→ attributes: IndexMap<Key, Value>   (canonical ordered table)
//!   ├─→ fillable: Fillable                 (write allow-list)
//!   ├─→ "handlers" entry                   (callback registry, see crate::registry)
//!   └─→ views                              (iteration, snapshot, debug)
//! ```
//!
//! Every public operation enters through `AttributeBag`. Named writes
//! (`set`, `set_many`, keyed pushes, `fill`) consult the allow-list
//! first; ordinal appends bypass it, giving the table list semantics
//! alongside map semantics. Views never mutate.

pub mod container;
pub mod ops;
pub mod policy;
pub mod view;

pub use container::AttributeBag;
pub use ops::IntoAttributes;
pub use policy::Fillable;
