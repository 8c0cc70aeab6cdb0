use crate::registry::{AnyContainer, Registry};
use crate::{Container, Schema, Store, VaultError};
use std::fmt;
use std::sync::Arc;

/// Read-only facade over a finished [`Registry`].
///
/// Every store is reachable two ways: [`container`](Vault::container)
/// returns its imperative control surface, [`use_store`](Vault::use_store)
/// returns its current state+actions and, inside an
/// [`Effect`](crate::Effect), subscribes the effect to it. Both are views of
/// the same container.
pub struct Vault<V> {
    registry: Arc<Registry<V>>,
}

impl<V: Schema> Vault<V> {
    pub fn new(registry: Registry<V>) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    /// The container registered for `key`.
    pub fn container<K>(&self, key: K) -> Result<&Container<K::State>, VaultError>
    where
        K: Store<Schema = V>,
    {
        self.registry.container(key)
    }

    /// Current state+actions of `key`, tracked when read inside an effect.
    pub fn use_store<K>(&self, key: K) -> Result<K::State, VaultError>
    where
        K: Store<Schema = V>,
    {
        self.container(key).map(Container::use_state)
    }

    /// Look a container up by name.
    pub fn entry(&self, name: &str) -> Result<&dyn AnyContainer, VaultError> {
        self.registry.entry(name)
    }

    pub fn registry(&self) -> &Registry<V> {
        &self.registry
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.registry.names()
    }

    /// Destroy every container, in registration order.
    pub fn destroy(&self) {
        for entry in self.registry.iter() {
            entry.destroy();
        }
        tracing::debug!(vault = self.registry.config().label_str(), "vault destroyed");
    }
}

impl<V> Clone for Vault<V> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<V> fmt::Debug for Vault<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Vault").field(&self.registry).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{declare_vault, StoreState, VaultBuilder};

    #[derive(Clone, Debug, PartialEq)]
    struct Flag(bool);

    impl StoreState for Flag {
        type Patch = bool;

        fn merge(&mut self, patch: bool) {
            self.0 = patch;
        }
    }

    declare_vault! {
        Flags {
            Dark = "dark" => Flag,
            Muted = "muted" => Flag,
        }
    }

    fn vault() -> Vault<Flags> {
        VaultBuilder::new()
            .put(Dark, |_, _| Flag(true))
            .unwrap()
            .put(Muted, |_, _| Flag(false))
            .unwrap()
            .build()
            .unwrap()
    }

    #[test]
    fn both_accessors_see_one_container() {
        let vault = vault();
        vault.container(Dark).unwrap().set_state(false);
        assert_eq!(vault.use_store(Dark).unwrap(), Flag(false));
        assert_eq!(vault.container(Dark).unwrap().get_state(), Flag(false));
    }

    #[test]
    fn clones_share_the_registry() {
        let vault = vault();
        let other = vault.clone();
        assert!(vault
            .container(Muted)
            .unwrap()
            .ptr_eq(other.container(Muted).unwrap()));
    }

    #[test]
    fn entry_by_name() {
        let vault = vault();
        assert_eq!(vault.entry("muted").unwrap().name(), "muted");
        assert_eq!(
            vault.entry("volume").unwrap_err(),
            VaultError::UnknownStore {
                store: "volume".to_string()
            }
        );
        assert_eq!(vault.names().collect::<Vec<_>>(), ["dark", "muted"]);
    }

    #[test]
    fn destroy_detaches_every_listener() {
        let vault = vault();
        vault.container(Dark).unwrap().subscribe(|_| {}).detach();
        vault.container(Muted).unwrap().subscribe(|_| {}).detach();

        vault.destroy();
        for name in ["dark", "muted"] {
            assert_eq!(vault.entry(name).unwrap().subscriber_count(), 0);
        }
    }
}
