//! Store declarations and the contract between a store and its initializer.
//!
//! A store is declared by a key type implementing [`Store`], grouped under a
//! [`Schema`]. Its state+actions shape implements [`StoreState`]; its
//! initializer receives a [`StoreContext`] and returns the initial state.

mod action;
mod declaration;
mod initializer;
mod state;

pub use action::{Action, Derived};
pub use declaration::{Schema, Store};
pub use initializer::{StoreContext, StoreGetter, StoreSetter};
pub use state::{StoreState, Update};
pub(crate) use state::Change;
