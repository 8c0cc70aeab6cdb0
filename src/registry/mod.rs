//! Ordered registration of stores.
//!
//! [`VaultBuilder`] instantiates each store's container eagerly and appends
//! it to a [`Registry`], the name-to-container mapping a
//! [`Vault`](crate::Vault) is built from.

mod builder;
mod registry;

pub use builder::VaultBuilder;
pub use registry::{AnyContainer, Registry};
