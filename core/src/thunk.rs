//! Evaluate-once deferred values.
//!
//! A [`Thunk`] is the unit of laziness underneath every sequence cell: it holds
//! a pending computation until the first `force`, then caches the result so
//! later forces never run the computation again.

use std::cell::Cell;
use std::fmt;

use once_cell::unsync::OnceCell;

type Pending<V> = Box<dyn FnOnce() -> V>;

/// A deferred value computed at most once.
pub struct Thunk<V> {
    value: OnceCell<V>,
    pending: Cell<Option<Pending<V>>>,
    evaluating: Cell<bool>,
}

// Clears the evaluating flag, also when the computation unwinds.
struct EvaluatingGuard<'a>(&'a Cell<bool>);

impl Drop for EvaluatingGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl<V> Thunk<V> {
    /// Create a thunk that runs `f` on first force.
    pub fn new(f: impl FnOnce() -> V + 'static) -> Self {
        Thunk {
            value: OnceCell::new(),
            pending: Cell::new(Some(Box::new(f))),
            evaluating: Cell::new(false),
        }
    }

    /// Create a thunk that is already forced.
    pub fn ready(value: V) -> Self {
        Thunk {
            value: OnceCell::with_value(value),
            pending: Cell::new(None),
            evaluating: Cell::new(false),
        }
    }

    /// Force the thunk, running the pending computation if needed.
    ///
    /// # Panics
    ///
    /// Panics if the thunk is forced again from inside its own computation.
    /// Such a value is defined in terms of itself and can never be produced.
    /// Also panics if an earlier force panicked inside the computation, which
    /// is consumed by that first attempt.
    pub fn force(&self) -> &V {
        if let Some(value) = self.value.get() {
            return value;
        }
        if self.evaluating.get() {
            tracing::error!("thunk forced while it was being evaluated");
            panic!("cyclic definition: thunk forced while it was being evaluated");
        }
        let Some(compute) = self.pending.take() else {
            tracing::error!("thunk computation panicked on an earlier force");
            panic!("thunk computation panicked on an earlier force");
        };

        self.evaluating.set(true);
        let guard = EvaluatingGuard(&self.evaluating);
        let value = compute();
        drop(guard);
        self.value.get_or_init(|| value)
    }

    /// The value, if it has already been forced.
    pub fn get(&self) -> Option<&V> {
        self.value.get()
    }

    /// Check whether the value has been computed.
    pub fn is_forced(&self) -> bool {
        self.value.get().is_some()
    }

    /// Move the forced value out, leaving the thunk empty.
    pub(crate) fn take(&mut self) -> Option<V> {
        self.value.take()
    }
}

impl<V: fmt::Debug> fmt::Debug for Thunk<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value.get() {
            Some(v) => f.debug_tuple("Thunk").field(v).finish(),
            None => f.write_str("Thunk(<pending>)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn test_force_runs_once() {
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let thunk = Thunk::new(move || {
            counter.set(counter.get() + 1);
            42
        });

        assert!(!thunk.is_forced());
        assert_eq!(*thunk.force(), 42);
        assert_eq!(*thunk.force(), 42);
        assert!(thunk.is_forced());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_ready_is_forced() {
        let thunk = Thunk::ready("done");
        assert!(thunk.is_forced());
        assert_eq!(thunk.get(), Some(&"done"));
    }

    #[test]
    fn test_get_does_not_force() {
        let thunk = Thunk::new(|| 1);
        assert_eq!(thunk.get(), None);
        thunk.force();
        assert_eq!(thunk.get(), Some(&1));
    }

    #[test]
    fn test_debug_output() {
        let thunk = Thunk::new(|| 5);
        assert_eq!(format!("{thunk:?}"), "Thunk(<pending>)");
        thunk.force();
        assert_eq!(format!("{thunk:?}"), "Thunk(5)");
    }

    #[test]
    #[should_panic(expected = "cyclic definition")]
    fn test_reentrant_force_panics() {
        let slot: Rc<OnceCell<Rc<Thunk<i32>>>> = Rc::new(OnceCell::new());
        let inner = slot.clone();
        let thunk = Rc::new(Thunk::new(move || match inner.get() {
            Some(me) => *me.force() + 1,
            None => 0,
        }));
        let _ = slot.set(thunk.clone());
        thunk.force();
    }

    #[test]
    #[should_panic(expected = "panicked on an earlier force")]
    fn test_force_after_panicking_computation() {
        let thunk = Thunk::new(|| -> u8 { panic!("computation failed") });
        let first = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| *thunk.force()));
        assert!(first.is_err());
        assert!(!thunk.is_forced());
        thunk.force();
    }
}
