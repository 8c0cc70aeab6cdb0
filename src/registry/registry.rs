use crate::{Container, Schema, Store, VaultConfig, VaultError};
use indexmap::IndexMap;
use std::any::Any;
use std::fmt;
use std::marker::PhantomData;

/// Type-erased view of a registered container.
pub trait AnyContainer: Any + Send + Sync + fmt::Debug {
    fn name(&self) -> &'static str;

    fn id(&self) -> usize;

    fn subscriber_count(&self) -> usize;

    fn destroy(&self);

    fn as_any(&self) -> &dyn Any;
}

impl<S: Clone + Send + Sync + 'static> AnyContainer for Container<S> {
    fn name(&self) -> &'static str {
        Container::name(self)
    }

    fn id(&self) -> usize {
        Container::id(self)
    }

    fn subscriber_count(&self) -> usize {
        Container::subscriber_count(self)
    }

    fn destroy(&self) {
        Container::destroy(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Ordered mapping from store name to container.
///
/// Append-only while a [`VaultBuilder`](crate::VaultBuilder) owns it and
/// frozen once finalized: entries are never replaced or removed.
pub struct Registry<V> {
    entries: IndexMap<&'static str, Box<dyn AnyContainer>>,
    config: VaultConfig,
    _schema: PhantomData<fn() -> V>,
}

impl<V: Schema> Registry<V> {
    pub(crate) fn new(config: VaultConfig) -> Self {
        Self {
            entries: IndexMap::with_capacity(V::STORES.len()),
            config,
            _schema: PhantomData,
        }
    }

    /// The container registered for `key`.
    ///
    /// Fails with [`VaultError::PrematureReference`] if the store is
    /// declared but not registered (yet).
    pub fn container<K>(&self, _key: K) -> Result<&Container<K::State>, VaultError>
    where
        K: Store<Schema = V>,
    {
        self.entry(K::NAME)?
            .as_any()
            .downcast_ref::<Container<K::State>>()
            .ok_or(VaultError::TypeMismatch { store: K::NAME })
    }

    /// Snapshot of the state registered for `key`.
    pub fn get_state<K>(&self, key: K) -> Result<K::State, VaultError>
    where
        K: Store<Schema = V>,
    {
        self.container(key).map(Container::get_state)
    }

    /// Look a container up by name.
    pub fn entry(&self, name: &str) -> Result<&dyn AnyContainer, VaultError> {
        if let Some(entry) = self.entries.get(name) {
            return Ok(&**entry);
        }
        match V::STORES.iter().find(|declared| **declared == name) {
            Some(store) => {
                tracing::warn!(
                    vault = self.config.label_str(),
                    store = *store,
                    "store read before registration"
                );
                Err(VaultError::PrematureReference { store: *store })
            }
            None => Err(VaultError::unknown(name)),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn config(&self) -> &VaultConfig {
        &self.config
    }

    /// Declared stores that have no container.
    pub fn missing(&self) -> Vec<&'static str> {
        V::STORES
            .iter()
            .copied()
            .filter(|name| !self.entries.contains_key(name))
            .collect()
    }

    /// Append a container. The caller has checked the name is new.
    pub(crate) fn insert(&mut self, name: &'static str, container: Box<dyn AnyContainer>) -> usize {
        let (position, previous) = self.entries.insert_full(name, container);
        debug_assert!(previous.is_none(), "store `{name}` inserted twice");
        position
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &dyn AnyContainer> + '_ {
        self.entries.values().map(|entry| &**entry)
    }
}

impl<V> fmt::Debug for Registry<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("label", &self.config.label_str())
            .field("stores", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{declare_vault, StoreState, VaultBuilder};

    #[derive(Clone, Debug, PartialEq)]
    struct Volume(u8);

    impl StoreState for Volume {
        type Patch = u8;

        fn merge(&mut self, patch: u8) {
            self.0 = patch;
        }
    }

    #[derive(Clone, Debug)]
    struct Caption(String);

    impl StoreState for Caption {
        type Patch = String;

        fn merge(&mut self, patch: String) {
            self.0 = patch;
        }
    }

    declare_vault! {
        Mixer {
            Level = "level" => Volume,
        }
    }

    /// Shares `Level`'s name but expects a different state type.
    struct Subtitle;

    impl Store for Subtitle {
        type Schema = Mixer;
        type State = Caption;

        const NAME: &'static str = "level";
    }

    fn registry() -> Registry<Mixer> {
        VaultBuilder::<Mixer>::new()
            .put(Level, |_, _| Volume(7))
            .unwrap()
            .finalize()
            .unwrap()
    }

    #[test]
    fn container_downcasts_to_the_key_state() {
        let registry = registry();
        assert_eq!(registry.get_state(Level).unwrap(), Volume(7));
        assert_eq!(registry.entry("level").unwrap().name(), "level");
    }

    #[test]
    fn key_with_mismatched_state_is_rejected() {
        let registry = registry();
        assert_eq!(
            registry.container(Subtitle).unwrap_err(),
            VaultError::TypeMismatch { store: "level" }
        );
        assert_eq!(
            registry.get_state(Subtitle).unwrap_err(),
            VaultError::TypeMismatch { store: "level" }
        );
    }
}
