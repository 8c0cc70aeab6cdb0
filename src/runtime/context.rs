use parking_lot::Mutex;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

pub(crate) type Observer = Arc<dyn Fn() + Send + Sync>;

/// Dependency graph between observed sources (containers) and observers (effects).
#[derive(Default)]
struct ReactiveContext {
    current_observer: Option<usize>,
    // Map from source ID to the observers that read it
    dependencies: HashMap<usize, HashSet<usize>>,
    // Map from observer ID to the sources it read during its last run
    observer_deps: HashMap<usize, HashSet<usize>>,
    observers: HashMap<usize, Observer>,
}

impl ReactiveContext {
    fn unlink_observer(&mut self, observer_id: usize) {
        if let Some(sources) = self.observer_deps.remove(&observer_id) {
            for source_id in sources {
                if let Some(deps) = self.dependencies.get_mut(&source_id) {
                    deps.remove(&observer_id);
                    if deps.is_empty() {
                        self.dependencies.remove(&source_id);
                    }
                }
            }
        }
    }
}

/// Reactive runtime that connects container reads to the effects performing them.
///
/// Supports both a global runtime (default) and scoped runtimes for isolation.
/// Containers remember the runtime that was current when they were built;
/// effects register with the runtime that is current when they are created.
///
/// # Examples
///
/// ```
/// use tincan_vault::runtime::ReactiveRuntime;
///
/// let id = ReactiveRuntime::scope(|| ReactiveRuntime::current().next_id());
/// assert_eq!(id, 0);
/// ```
pub struct ReactiveRuntime {
    next_id: AtomicUsize,
    context: Mutex<ReactiveContext>,
}

// Thread-local stack for scoped runtimes
thread_local! {
    static RUNTIME_STACK: RefCell<Vec<Arc<ReactiveRuntime>>> = const { RefCell::new(Vec::new()) };
}

/// Pops the scoped runtime even if the scoped closure panics.
struct StackGuard;

impl Drop for StackGuard {
    fn drop(&mut self) {
        RUNTIME_STACK.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

/// Restores the previous observer when an observed run finishes.
struct ObserverGuard<'a> {
    runtime: &'a ReactiveRuntime,
    prev: Option<usize>,
}

impl Drop for ObserverGuard<'_> {
    fn drop(&mut self) {
        self.runtime.context.lock().current_observer = self.prev;
    }
}

impl ReactiveRuntime {
    /// Create a new isolated runtime with its own dependency graph.
    pub fn new() -> Arc<Self> {
        Arc::new(ReactiveRuntime {
            next_id: AtomicUsize::new(0),
            context: Mutex::new(ReactiveContext::default()),
        })
    }

    /// Run a function with a fresh isolated runtime.
    ///
    /// Containers and effects created inside `f` are bound to that runtime,
    /// which is dropped once nothing refers to it any more.
    pub fn scope<F, R>(f: F) -> R
    where
        F: FnOnce() -> R,
    {
        Self::with_runtime(Self::new(), f)
    }

    /// Get or create the global runtime (fallback).
    pub fn global() -> Arc<Self> {
        static RUNTIME: OnceLock<Arc<ReactiveRuntime>> = OnceLock::new();
        Arc::clone(RUNTIME.get_or_init(Self::new))
    }

    /// Get the current reactive runtime (scoped or global fallback).
    pub fn current() -> Arc<Self> {
        RUNTIME_STACK
            .with(|stack| stack.borrow().last().cloned())
            .unwrap_or_else(Self::global)
    }

    /// Run a function with a specific runtime as the current context.
    pub fn with_runtime<F, R>(runtime: Arc<Self>, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        RUNTIME_STACK.with(|stack| stack.borrow_mut().push(runtime));
        let _guard = StackGuard;
        f()
    }

    /// Drop every observer and dependency edge, and reset the ID counter.
    pub fn clear(&self) {
        *self.context.lock() = ReactiveContext::default();
        self.next_id.store(0, Ordering::SeqCst);
    }

    /// Generate the next unique ID for a container or effect.
    pub fn next_id(&self) -> usize {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    /// The observer whose run is in progress, if any.
    pub fn current_observer(&self) -> Option<usize> {
        self.context.lock().current_observer
    }

    /// Record that the current observer (if any) read `source_id`.
    pub fn track_read(&self, source_id: usize) {
        let mut ctx = self.context.lock();
        if let Some(observer_id) = ctx.current_observer {
            ctx.dependencies
                .entry(source_id)
                .or_default()
                .insert(observer_id);
            ctx.observer_deps
                .entry(observer_id)
                .or_default()
                .insert(source_id);
        }
    }

    /// Re-run every observer that read `source_id`.
    ///
    /// Observers are collected first and invoked with no lock held, so an
    /// observer may read or write containers freely.
    pub fn notify_observers(&self, source_id: usize) {
        let observers: Vec<Observer> = {
            let ctx = self.context.lock();
            match ctx.dependencies.get(&source_id) {
                Some(ids) => ids
                    .iter()
                    .filter_map(|id| ctx.observers.get(id).cloned())
                    .collect(),
                None => return,
            }
        };

        tracing::trace!(source_id, observers = observers.len(), "notifying observers");
        for observer in observers {
            observer();
        }
    }

    /// Number of observers currently depending on `source_id`.
    pub fn dependent_count(&self, source_id: usize) -> usize {
        self.context
            .lock()
            .dependencies
            .get(&source_id)
            .map_or(0, HashSet::len)
    }

    pub(crate) fn register_observer(&self, observer_id: usize, observer: Observer) {
        let mut ctx = self.context.lock();
        ctx.unlink_observer(observer_id);
        ctx.observers.insert(observer_id, observer);
    }

    /// Forget what `observer_id` read so its next run can track afresh.
    pub(crate) fn reset_dependencies(&self, observer_id: usize) {
        self.context.lock().unlink_observer(observer_id);
    }

    pub(crate) fn remove_observer(&self, observer_id: usize) {
        let mut ctx = self.context.lock();
        ctx.observers.remove(&observer_id);
        ctx.unlink_observer(observer_id);
    }

    /// Detach a source from every observer that read it.
    pub(crate) fn forget_source(&self, source_id: usize) {
        let mut ctx = self.context.lock();
        if let Some(observers) = ctx.dependencies.remove(&source_id) {
            for observer_id in observers {
                if let Some(sources) = ctx.observer_deps.get_mut(&observer_id) {
                    sources.remove(&source_id);
                }
            }
        }
    }

    /// Run a function with `observer_id` as the current observer.
    pub fn with_observer<F, R>(&self, observer_id: usize, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let prev = self.context.lock().current_observer.replace(observer_id);
        let _guard = ObserverGuard {
            runtime: self,
            prev,
        };
        f()
    }
}
