use super::{Change, Schema, StoreState, Update};
use crate::container::{replace, Shared};
use crate::registry::Registry;
use crate::VaultError;
use std::fmt;
use std::sync::{Arc, Weak};

/// Write primitive bound to the container being initialized.
///
/// Clonable and `'static`, so actions can capture it. Writes fail with
/// [`VaultError::Uninitialized`] while the initializer is still running and
/// with [`VaultError::ContainerDropped`] once the container is gone.
pub struct StoreSetter<S> {
    name: &'static str,
    shared: Weak<Shared<S>>,
}

impl<S: Clone + Send + Sync + 'static> StoreSetter<S> {
    pub(crate) fn new(shared: &Arc<Shared<S>>) -> Self {
        Self {
            name: shared.name(),
            shared: Arc::downgrade(shared),
        }
    }

    fn upgrade(&self) -> Result<Arc<Shared<S>>, VaultError> {
        self.shared
            .upgrade()
            .ok_or(VaultError::ContainerDropped { store: self.name })
    }

    /// Replace the whole state.
    pub fn replace(&self, state: S) -> Result<(), VaultError> {
        self.upgrade()?.modify(|_| state, replace)
    }

    /// Replace the whole state with one computed from the current state.
    pub fn replace_with<F>(&self, f: F) -> Result<(), VaultError>
    where
        F: FnOnce(&S) -> S,
    {
        self.upgrade()?.modify(f, replace)
    }
}

impl<S: StoreState> StoreSetter<S> {
    /// Merge a partial update.
    pub fn merge(&self, patch: S::Patch) -> Result<(), VaultError> {
        self.upgrade()?.modify(|_| patch, S::merge)
    }

    /// Merge the partial update computed from the current state.
    pub fn merge_with<F>(&self, f: F) -> Result<(), VaultError>
    where
        F: FnOnce(&S) -> S::Patch,
    {
        self.upgrade()?.modify(f, S::merge)
    }

    /// Apply any [`Update`].
    pub fn apply(&self, update: Update<S>) -> Result<(), VaultError> {
        self.upgrade()?.modify(|state| update.resolve(state), Change::apply_to)
    }
}

impl<S> Clone for StoreSetter<S> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            shared: Weak::clone(&self.shared),
        }
    }
}

impl<S> fmt::Debug for StoreSetter<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreSetter").field("store", &self.name).finish()
    }
}

/// Read primitive bound to the container being initialized.
pub struct StoreGetter<S> {
    name: &'static str,
    shared: Weak<Shared<S>>,
}

impl<S: Clone + Send + Sync + 'static> StoreGetter<S> {
    pub(crate) fn new(shared: &Arc<Shared<S>>) -> Self {
        Self {
            name: shared.name(),
            shared: Arc::downgrade(shared),
        }
    }

    /// The current state, read synchronously and without subscribing.
    pub fn get(&self) -> Result<S, VaultError> {
        self.shared
            .upgrade()
            .ok_or(VaultError::ContainerDropped { store: self.name })?
            .snapshot()
    }
}

impl<S> Clone for StoreGetter<S> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            shared: Weak::clone(&self.shared),
        }
    }
}

impl<S> fmt::Debug for StoreGetter<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreGetter").field("store", &self.name).finish()
    }
}

/// Everything an initializer receives.
///
/// `vault` is a read-only view of the stores registered so far. Reading a
/// store that has not been registered yet fails with
/// [`VaultError::PrematureReference`].
pub struct StoreContext<'a, S, V> {
    pub set: StoreSetter<S>,
    pub get: StoreGetter<S>,
    pub vault: &'a Registry<V>,
}

impl<S, V: Schema> fmt::Debug for StoreContext<'_, S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreContext")
            .field("store", &self.set.name)
            .field("vault", self.vault)
            .finish()
    }
}
