use super::Registry;
use crate::container::{Container, Shared};
use crate::{
    Schema, Store, StoreContext, StoreGetter, StoreSetter, Vault, VaultConfig, VaultError,
};
use std::fmt;

/// Builds a [`Registry`] one store at a time, in dependency order.
///
/// Each registration runs its initializer immediately and inserts the
/// finished container before returning, so later initializers can read
/// every store registered before them through [`StoreContext::vault`].
///
/// Both `register` and `finalize` consume the builder: a failed
/// registration drops everything built so far, and nothing can be
/// registered after finalizing.
///
/// # Examples
///
/// ```
/// use tincan_vault::{declare_vault, Action, StoreState, VaultBuilder};
///
/// #[derive(Clone)]
/// struct Counter {
///     value: i64,
///     increment: Action,
/// }
///
/// impl StoreState for Counter {
///     type Patch = i64;
///
///     fn merge(&mut self, value: i64) {
///         self.value = value;
///     }
/// }
///
/// #[derive(Clone)]
/// struct Banner {
///     text: String,
/// }
///
/// impl StoreState for Banner {
///     type Patch = String;
///
///     fn merge(&mut self, text: String) {
///         self.text = text;
///     }
/// }
///
/// declare_vault! {
///     App {
///         CounterStore = "counter" => Counter,
///         BannerStore = "banner" => Banner,
///     }
/// }
///
/// # fn main() -> Result<(), tincan_vault::VaultError> {
/// let vault = VaultBuilder::<App>::new()
///     .put(CounterStore, |set, _get| Counter {
///         value: 1,
///         increment: Action::new(move |()| set.merge_with(|s| s.value + 1)),
///     })?
///     .register(BannerStore, |ctx| {
///         let start = ctx.vault.get_state(CounterStore)?.value;
///         Ok(Banner { text: format!("started at {start}") })
///     })?
///     .build()?;
///
/// vault.use_store(CounterStore)?.increment.run()?;
/// assert_eq!(vault.container(CounterStore)?.get_state().value, 2);
/// assert_eq!(vault.use_store(BannerStore)?.text, "started at 1");
/// # Ok(())
/// # }
/// ```
pub struct VaultBuilder<V> {
    registry: Registry<V>,
}

impl<V: Schema> VaultBuilder<V> {
    pub fn new() -> Self {
        Self::with_config(VaultConfig::default())
    }

    pub fn with_config(config: VaultConfig) -> Self {
        Self {
            registry: Registry::new(config),
        }
    }

    /// Register a store whose initializer may read earlier stores.
    ///
    /// The initializer runs exactly once, before this call returns. Errors
    /// it returns (typically a [`VaultError::PrematureReference`] from
    /// reading a store registered later) abort the build.
    pub fn register<K, F>(mut self, _key: K, init: F) -> Result<Self, VaultError>
    where
        K: Store<Schema = V>,
        F: FnOnce(StoreContext<'_, K::State, V>) -> Result<K::State, VaultError>,
    {
        self.check_new(K::NAME)?;

        let shared = Shared::<K::State>::pending(K::NAME);
        let state = init(StoreContext {
            set: StoreSetter::new(&shared),
            get: StoreGetter::new(&shared),
            vault: &self.registry,
        })
        .inspect_err(|err| {
            tracing::warn!(
                vault = self.registry.config().label_str(),
                store = K::NAME,
                %err,
                "store initializer failed"
            );
        })?;
        shared.initialize(state);

        let position = self
            .registry
            .insert(K::NAME, Box::new(Container::from_shared(shared)));
        tracing::debug!(
            vault = self.registry.config().label_str(),
            store = K::NAME,
            position,
            "store registered"
        );
        Ok(self)
    }

    /// Register a store from its `set`/`get` pair alone.
    pub fn put<K, F>(self, key: K, init: F) -> Result<Self, VaultError>
    where
        K: Store<Schema = V>,
        F: FnOnce(StoreSetter<K::State>, StoreGetter<K::State>) -> K::State,
    {
        self.register(key, |ctx| Ok(init(ctx.set, ctx.get)))
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.registry.contains(name)
    }

    /// Hand over the registry exactly as accumulated.
    ///
    /// Fails with [`VaultError::Incomplete`] if a declared store was never
    /// registered, unless the config allows incomplete vaults.
    pub fn finalize(self) -> Result<Registry<V>, VaultError> {
        let config = *self.registry.config();
        if config.requires_complete() {
            let missing = self.registry.missing();
            if !missing.is_empty() {
                tracing::warn!(vault = config.label_str(), ?missing, "vault is incomplete");
                return Err(VaultError::Incomplete { missing });
            }
        }

        tracing::debug!(
            vault = config.label_str(),
            stores = self.registry.len(),
            "vault finalized"
        );
        Ok(self.registry)
    }

    /// Finalize and wrap the registry in a [`Vault`].
    pub fn build(self) -> Result<Vault<V>, VaultError> {
        self.finalize().map(Vault::new)
    }

    fn check_new(&self, name: &'static str) -> Result<(), VaultError> {
        let label = self.registry.config().label_str();
        if !V::declares(name) {
            tracing::warn!(vault = label, store = name, "store is not declared");
            return Err(VaultError::unknown(name));
        }
        if self.registry.contains(name) {
            tracing::warn!(vault = label, store = name, "duplicate registration rejected");
            return Err(VaultError::DuplicateRegistration { store: name });
        }
        Ok(())
    }
}

impl<V: Schema> Default for VaultBuilder<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> fmt::Debug for VaultBuilder<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VaultBuilder")
            .field("registry", &self.registry)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{declare_vault, StoreState};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Clone, Debug, PartialEq)]
    struct Number(i32);

    impl StoreState for Number {
        type Patch = i32;

        fn merge(&mut self, patch: i32) {
            self.0 = patch;
        }
    }

    declare_vault! {
        Numbers {
            First = "first" => Number,
            Second = "second" => Number,
        }
    }

    /// A key whose name is missing from its schema.
    struct Stray;

    impl Store for Stray {
        type Schema = Numbers;
        type State = Number;

        const NAME: &'static str = "stray";
    }

    #[test]
    fn initializer_runs_once_at_registration() {
        let calls = Arc::new(AtomicUsize::new(0));
        let builder = VaultBuilder::<Numbers>::new()
            .put(First, {
                let calls = calls.clone();
                move |_, _| {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Number(1)
                }
            })
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(builder.is_registered("first"));
        assert!(!builder.is_registered("second"));
    }

    #[test]
    fn later_store_reads_earlier_store() {
        let registry = VaultBuilder::<Numbers>::new()
            .put(First, |_, _| Number(20))
            .unwrap()
            .register(Second, |ctx| Ok(Number(ctx.vault.get_state(First)?.0 + 1)))
            .unwrap()
            .finalize()
            .unwrap();

        assert_eq!(registry.get_state(Second).unwrap(), Number(21));
        assert_eq!(registry.names().collect::<Vec<_>>(), ["first", "second"]);
    }

    #[test]
    fn forward_reference_fails() {
        let err = VaultBuilder::<Numbers>::new()
            .register(Second, |ctx| Ok(Number(ctx.vault.get_state(First)?.0)))
            .unwrap_err();
        assert_eq!(err, VaultError::PrematureReference { store: "first" });
    }

    #[test]
    fn self_reference_fails() {
        let err = VaultBuilder::<Numbers>::new()
            .register(First, |ctx| Ok(Number(ctx.vault.get_state(First)?.0)))
            .unwrap_err();
        assert_eq!(err, VaultError::PrematureReference { store: "first" });
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let err = VaultBuilder::<Numbers>::new()
            .put(First, |_, _| Number(1))
            .unwrap()
            .put(First, |_, _| Number(2))
            .unwrap_err();
        assert_eq!(err, VaultError::DuplicateRegistration { store: "first" });
    }

    #[test]
    fn duplicate_initializer_never_runs() {
        let builder = VaultBuilder::<Numbers>::new()
            .put(First, |_, _| Number(1))
            .unwrap();
        let result = builder.register(First, |_| -> Result<Number, VaultError> {
            panic!("second initializer must not run")
        });
        assert!(result.is_err());
    }

    #[test]
    fn undeclared_name_is_rejected() {
        let err = VaultBuilder::<Numbers>::new()
            .put(Stray, |_, _| Number(0))
            .unwrap_err();
        assert_eq!(
            err,
            VaultError::UnknownStore {
                store: "stray".to_string()
            }
        );
    }

    #[test]
    fn finalize_requires_every_store() {
        let err = VaultBuilder::<Numbers>::new()
            .put(First, |_, _| Number(1))
            .unwrap()
            .finalize()
            .unwrap_err();
        assert_eq!(
            err,
            VaultError::Incomplete {
                missing: vec!["second"]
            }
        );
    }

    #[test]
    fn incomplete_vault_allowed_by_config() {
        let config = VaultConfig::new().require_complete(false);
        let registry = VaultBuilder::<Numbers>::with_config(config)
            .put(Second, |_, _| Number(2))
            .unwrap()
            .finalize()
            .unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.missing(), ["first"]);
        assert_eq!(
            registry.container(First).unwrap_err(),
            VaultError::PrematureReference { store: "first" }
        );
    }

    #[test]
    fn get_inside_initializer_is_uninitialized() {
        let err = VaultBuilder::<Numbers>::new()
            .register(First, |ctx| Ok(Number(ctx.get.get()?.0)))
            .unwrap_err();
        assert_eq!(err, VaultError::Uninitialized { store: "first" });
    }
}
