//! # Tincan Vault
//!
//! Compose independently built reactive stores into one namespaced vault.
//!
//! ## Declaring stores
//!
//! A vault is declared once with [`declare_vault!`]: a [`Schema`] naming
//! every store, and one [`Store`] key per store tying its name to its
//! [`StoreState`]. Container types and reactive read types are both derived
//! from that declaration.
//!
//! ## Building
//!
//! [`VaultBuilder`] registers stores in dependency order. Each initializer
//! runs immediately, receives its own `set`/`get` pair plus a read-only view
//! of every store registered before it, and returns the initial
//! state+actions. Reading a store that is registered later fails with
//! [`VaultError::PrematureReference`].
//!
//! ## Reading and writing
//!
//! - [`Vault::container`] - the imperative [`Container`]: `get_state`,
//!   `set_state`, `replace_state`, `subscribe`, `destroy`
//! - [`Vault::use_store`] - the current state+actions; inside an [`Effect`]
//!   the effect re-runs whenever that store changes
//!
//! ## Derived fields
//!
//! A [`Derived`] field reads the live state of the store it was built from
//! every time it is called. Plain data fields computed in an initializer are
//! evaluated once, when the store is registered.

mod config;
mod error;
mod macros;
mod vault;

pub mod container;
pub mod effect;
pub mod registry;
pub mod runtime;
pub mod store;

// Re-export main types for convenience
pub use config::VaultConfig;
pub use container::{Container, Subscription};
pub use effect::{create_effect, Effect};
pub use error::VaultError;
pub use registry::{AnyContainer, Registry, VaultBuilder};
pub use store::{
    Action, Derived, Schema, Store, StoreContext, StoreGetter, StoreSetter, StoreState, Update,
};
pub use vault::Vault;
