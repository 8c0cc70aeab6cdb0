//! Reactive contexts that re-run when the stores they read change.

mod effect;

pub use effect::{create_effect, Effect};
