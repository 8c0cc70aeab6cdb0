//! Reactive containers holding one store's state.
//!
//! A container owns the state+actions object produced by a store's
//! initializer and exposes the imperative control surface: read, merge or
//! replace, subscribe, destroy, and the reactive read used inside effects.

mod container;
mod subscription;

pub use container::Container;
pub(crate) use container::{replace, Shared};
pub use subscription::Subscription;
