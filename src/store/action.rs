use crate::VaultError;
use std::fmt;
use std::sync::Arc;

/// A callable stored inside a state+actions object.
///
/// Actions are created once, inside a store's initializer, and usually
/// capture the store's [`StoreSetter`](crate::StoreSetter). Cloning an
/// action shares the closure.
pub struct Action<A = ()> {
    f: Arc<dyn Fn(A) -> Result<(), VaultError> + Send + Sync>,
}

impl<A> Action<A> {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(A) -> Result<(), VaultError> + Send + Sync + 'static,
    {
        Self { f: Arc::new(f) }
    }

    /// Invoke the action with its argument.
    pub fn call(&self, args: A) -> Result<(), VaultError> {
        (self.f)(args)
    }

    /// Whether both handles share the same closure.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.f, &other.f)
    }
}

impl Action {
    /// Invoke an argument-less action.
    pub fn run(&self) -> Result<(), VaultError> {
        self.call(())
    }
}

impl<A> Clone for Action<A> {
    fn clone(&self) -> Self {
        Self {
            f: Arc::clone(&self.f),
        }
    }
}

impl<A> fmt::Debug for Action<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Action(..)")
    }
}

/// A function-valued field computed on every read.
///
/// A `Derived` built from another store's container reads that store's
/// live state each time [`get`](Derived::get) is called; it never caches.
pub struct Derived<T> {
    f: Arc<dyn Fn() -> T + Send + Sync>,
}

impl<T> Derived<T> {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self { f: Arc::new(f) }
    }

    pub fn get(&self) -> T {
        (self.f)()
    }
}

impl<T> Clone for Derived<T> {
    fn clone(&self) -> Self {
        Self {
            f: Arc::clone(&self.f),
        }
    }
}

impl<T> fmt::Debug for Derived<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Derived(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn clones_share_the_closure() {
        let hits = Arc::new(AtomicUsize::new(0));
        let action = Action::new({
            let hits = hits.clone();
            move |n: usize| {
                hits.fetch_add(n, Ordering::SeqCst);
                Ok(())
            }
        });
        let copy = action.clone();
        assert!(action.ptr_eq(&copy));

        action.call(2).unwrap();
        copy.call(3).unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn derived_recomputes_each_read() {
        let source = Arc::new(AtomicUsize::new(1));
        let doubled = Derived::new({
            let source = source.clone();
            move || source.load(Ordering::SeqCst) * 2
        });
        assert_eq!(doubled.get(), 2);
        source.store(4, Ordering::SeqCst);
        assert_eq!(doubled.get(), 8);
    }
}
