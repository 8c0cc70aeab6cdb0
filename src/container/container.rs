use super::Subscription;
use crate::runtime::ReactiveRuntime;
use crate::store::Change;
use crate::{StoreState, Update, VaultError};
use parking_lot::{Mutex, ReentrantMutex, RwLock};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

type Listener<S> = Arc<dyn Fn(&S) + Send + Sync>;

/// Storage behind a container. Exists before the state does, so the
/// setter and getter handed to an initializer can be bound to it.
pub(crate) struct Shared<S> {
    name: &'static str,
    id: usize,
    runtime: Weak<ReactiveRuntime>,
    state: RwLock<Option<S>>,
    writer: ReentrantMutex<()>,
    listeners: Mutex<Vec<(u64, Listener<S>)>>,
    next_listener: AtomicU64,
}

impl<S: Clone + Send + Sync + 'static> Shared<S> {
    pub(crate) fn pending(name: &'static str) -> Arc<Self> {
        let runtime = ReactiveRuntime::current();
        Arc::new(Self {
            name,
            id: runtime.next_id(),
            runtime: Arc::downgrade(&runtime),
            state: RwLock::new(None),
            writer: ReentrantMutex::new(()),
            listeners: Mutex::new(Vec::new()),
            next_listener: AtomicU64::new(0),
        })
    }

    pub(crate) fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn initialize(&self, state: S) {
        *self.state.write() = Some(state);
    }

    pub(crate) fn snapshot(&self) -> Result<S, VaultError> {
        self.state
            .read()
            .as_ref()
            .cloned()
            .ok_or(VaultError::Uninitialized { store: self.name })
    }

    /// Run `compute` against a snapshot, fold its result into the current
    /// state with `apply`, then notify.
    ///
    /// Writers are serialized per container. The writer lock is reentrant,
    /// so `compute` may write this container again on the same thread and
    /// `apply` sees those writes. No lock is held while listeners run.
    pub(crate) fn modify<C>(
        &self,
        compute: impl FnOnce(&S) -> C,
        apply: impl FnOnce(&mut S, C),
    ) -> Result<(), VaultError> {
        let writer = self.writer.lock();
        let change = compute(&self.snapshot()?);
        let next = {
            let mut state = self.state.write();
            let current = state
                .as_mut()
                .ok_or(VaultError::Uninitialized { store: self.name })?;
            apply(current, change);
            current.clone()
        };
        drop(writer);

        tracing::trace!(store = self.name, id = self.id, "state updated");
        self.notify(&next);
        Ok(())
    }

    fn notify(&self, state: &S) {
        let listeners: Vec<Listener<S>> = self
            .listeners
            .lock()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in listeners {
            listener(state);
        }
        if let Some(runtime) = self.runtime.upgrade() {
            runtime.notify_observers(self.id);
        }
    }

    fn track(&self) {
        if let Some(runtime) = self.runtime.upgrade() {
            runtime.track_read(self.id);
        }
    }

    fn remove_listener(&self, listener_id: u64) {
        self.listeners.lock().retain(|(id, _)| *id != listener_id);
    }
}

/// A reactive container for one store's state+actions.
///
/// Containers are cheap handles: cloning shares the same state, listeners
/// and reactive identity.
///
/// # Examples
///
/// ```
/// use tincan_vault::Container;
///
/// let count = Container::new("count", 0);
/// let _sub = count.subscribe(|value| println!("count is {value}"));
///
/// count.replace_state_with(|n| n + 1);
/// assert_eq!(count.get_state(), 1);
/// ```
pub struct Container<S> {
    shared: Arc<Shared<S>>,
}

impl<S: Clone + Send + Sync + 'static> Container<S> {
    /// Create a standalone container holding `initial`.
    pub fn new(name: &'static str, initial: S) -> Self {
        let shared = Shared::pending(name);
        shared.initialize(initial);
        Self { shared }
    }

    /// Wrap storage whose initial state has been written.
    pub(crate) fn from_shared(shared: Arc<Shared<S>>) -> Self {
        Self { shared }
    }

    pub fn name(&self) -> &'static str {
        self.shared.name
    }

    /// Identity of this container in its reactive runtime.
    pub fn id(&self) -> usize {
        self.shared.id
    }

    /// Get a clone of the current state without subscribing.
    pub fn get_state(&self) -> S {
        self.read(S::clone)
    }

    /// Read the state without cloning and without subscribing.
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&S) -> R,
    {
        match self.shared.state.read().as_ref() {
            Some(state) => f(state),
            None => unreachable!(
                "container `{}` exposed before its initializer returned",
                self.shared.name
            ),
        }
    }

    /// Reactive read: inside an [`Effect`](crate::Effect) the effect re-runs
    /// whenever this container changes. Elsewhere it is a plain snapshot.
    pub fn use_state(&self) -> S {
        self.shared.track();
        self.get_state()
    }

    /// Replace the whole state.
    pub fn replace_state(&self, state: S) {
        self.commit(|_| state, replace);
    }

    /// Replace the whole state with one computed from the current state.
    pub fn replace_state_with<F>(&self, f: F)
    where
        F: FnOnce(&S) -> S,
    {
        self.commit(f, replace);
    }

    /// Subscribe to state changes.
    ///
    /// The listener is called with the new state after every write, until
    /// the returned guard is dropped or the container is destroyed.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&S) + Send + Sync + 'static,
    {
        let listener_id = self.shared.next_listener.fetch_add(1, Ordering::Relaxed);
        self.shared
            .listeners
            .lock()
            .push((listener_id, Arc::new(listener)));

        let shared = Arc::downgrade(&self.shared);
        Subscription::new(move || {
            if let Some(shared) = shared.upgrade() {
                shared.remove_listener(listener_id);
            }
        })
    }

    /// Remove every listener and detach from effects that read this container.
    ///
    /// The state stays readable and writable.
    pub fn destroy(&self) {
        self.shared.listeners.lock().clear();
        if let Some(runtime) = self.shared.runtime.upgrade() {
            runtime.forget_source(self.shared.id);
        }
        tracing::debug!(store = self.shared.name, "container destroyed");
    }

    pub fn subscriber_count(&self) -> usize {
        self.shared.listeners.lock().len()
    }

    /// Number of effects that currently depend on this container.
    pub fn dependent_count(&self) -> usize {
        self.shared
            .runtime
            .upgrade()
            .map_or(0, |runtime| runtime.dependent_count(self.shared.id))
    }

    /// Whether both handles refer to the same container.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }

    fn commit<C>(&self, compute: impl FnOnce(&S) -> C, apply: impl FnOnce(&mut S, C)) {
        if let Err(err) = self.shared.modify(compute, apply) {
            unreachable!("{err}");
        }
    }
}

impl<S: StoreState> Container<S> {
    /// Merge a partial update into the state.
    pub fn set_state(&self, patch: S::Patch) {
        self.commit(|_| patch, S::merge);
    }

    /// Merge the partial update computed from the current state.
    pub fn set_state_with<F>(&self, f: F)
    where
        F: FnOnce(&S) -> S::Patch,
    {
        self.commit(f, S::merge);
    }

    /// Apply any [`Update`], merging or replacing.
    pub fn apply(&self, update: Update<S>) {
        self.commit(|state| update.resolve(state), Change::apply_to);
    }
}

pub(crate) fn replace<S>(state: &mut S, next: S) {
    *state = next;
}

impl<S> Clone for Container<S> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<S> fmt::Debug for Container<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("name", &self.shared.name)
            .field("id", &self.shared.id)
            .finish_non_exhaustive()
    }
}
