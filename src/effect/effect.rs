use crate::runtime::{Observer, ReactiveRuntime};
use std::sync::{Arc, Weak};

/// A side effect that re-runs when the containers it read change.
///
/// An effect is the reactive context for [`Vault::use_store`] and
/// [`Container::use_state`]: every container read during a run becomes a
/// dependency, and dependencies are re-tracked on each run. Dropping the
/// effect disposes it.
///
/// # Examples
///
/// ```
/// use tincan_vault::{Effect, Container};
/// use tincan_vault::runtime::ReactiveRuntime;
/// use std::sync::{Arc, atomic::{AtomicI32, Ordering}};
///
/// ReactiveRuntime::scope(|| {
///     let count = Container::new("count", 5);
///     let seen = Arc::new(AtomicI32::new(0));
///
///     let _effect = Effect::new({
///         let count = count.clone();
///         let seen = seen.clone();
///         move || seen.store(count.use_state(), Ordering::SeqCst)
///     });
///     assert_eq!(seen.load(Ordering::SeqCst), 5);
///
///     count.replace_state(10);
///     assert_eq!(seen.load(Ordering::SeqCst), 10);
/// });
/// ```
///
/// [`Vault::use_store`]: crate::Vault::use_store
/// [`Container::use_state`]: crate::Container::use_state
pub struct Effect {
    id: usize,
    run: Observer,
    runtime: Weak<ReactiveRuntime>,
}

impl Effect {
    /// Create an effect in the current runtime and run it once.
    pub fn new<F>(effect: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        let runtime = ReactiveRuntime::current();
        let id = runtime.next_id();
        let weak = Arc::downgrade(&runtime);

        let run: Observer = {
            let weak = weak.clone();
            Arc::new(move || {
                if let Some(runtime) = weak.upgrade() {
                    runtime.reset_dependencies(id);
                    runtime.with_observer(id, &effect);
                }
            })
        };

        runtime.register_observer(id, Arc::clone(&run));
        run();

        Self {
            id,
            run,
            runtime: weak,
        }
    }

    /// Run the effect now, re-tracking its dependencies.
    pub fn run(&self) {
        (self.run)();
    }

    pub fn id(&self) -> usize {
        self.id
    }
}

impl Drop for Effect {
    fn drop(&mut self) {
        if let Some(runtime) = self.runtime.upgrade() {
            runtime.remove_observer(self.id);
        }
    }
}

/// Create a new effect that runs now and whenever a container it read changes.
///
/// Keep the returned [`Effect`] alive for as long as it should react.
pub fn create_effect<F>(effect: F) -> Effect
where
    F: Fn() + Send + Sync + 'static,
{
    Effect::new(effect)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Container;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn effect_runs_immediately() {
        ReactiveRuntime::scope(|| {
            let counter = Arc::new(AtomicUsize::new(0));
            let counter_clone = counter.clone();

            let _effect = create_effect(move || {
                counter_clone.fetch_add(1, Ordering::SeqCst);
            });

            assert_eq!(counter.load(Ordering::SeqCst), 1);
        });
    }

    #[test]
    fn dropped_effect_stops_reacting() {
        ReactiveRuntime::scope(|| {
            let source = Container::new("source", 0u32);
            let runs = Arc::new(AtomicUsize::new(0));

            let effect = create_effect({
                let source = source.clone();
                let runs = runs.clone();
                move || {
                    source.use_state();
                    runs.fetch_add(1, Ordering::SeqCst);
                }
            });

            source.replace_state(1);
            assert_eq!(runs.load(Ordering::SeqCst), 2);

            drop(effect);
            source.replace_state(2);
            assert_eq!(runs.load(Ordering::SeqCst), 2);
            assert_eq!(source.dependent_count(), 0);
        });
    }

    #[test]
    fn dependencies_are_retracked_each_run() {
        ReactiveRuntime::scope(|| {
            let toggle = Container::new("toggle", true);
            let left = Container::new("left", 1u32);
            let right = Container::new("right", 2u32);
            let seen = Arc::new(AtomicUsize::new(0));

            let _effect = create_effect({
                let (toggle, left, right) = (toggle.clone(), left.clone(), right.clone());
                let seen = seen.clone();
                move || {
                    let value = if toggle.use_state() {
                        left.use_state()
                    } else {
                        right.use_state()
                    };
                    seen.store(value as usize, Ordering::SeqCst);
                }
            });
            assert_eq!(left.dependent_count(), 1);
            assert_eq!(right.dependent_count(), 0);

            toggle.replace_state(false);
            assert_eq!(seen.load(Ordering::SeqCst), 2);
            assert_eq!(left.dependent_count(), 0);
            assert_eq!(right.dependent_count(), 1);
        });
    }
}
