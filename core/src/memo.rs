//! Memoized function wrappers.
//!
//! [`Memoized`] caches the results of a pure single-argument function keyed by
//! argument. The cache is unbounded and never evicts, so it suits functions
//! over a bounded or heavily reused domain. Results for impure functions are
//! whatever the first call produced.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::hash::Hash;
use std::rc::Rc;

use rustc_hash::FxHashMap;

type Body<A, B> = dyn Fn(&Memoized<A, B>, A) -> B;

// Shared between every clone of the wrapper.
struct MemoState<A, B> {
    cache: RefCell<FxHashMap<A, B>>,
    hits: Cell<usize>,
    misses: Cell<usize>,
    body: Box<Body<A, B>>,
}

/// Statistics about memo cache usage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MemoStats {
    /// Calls answered from the cache
    pub hits: usize,
    /// Calls that ran the underlying function
    pub misses: usize,
}

/// A function wrapper that computes each distinct argument at most once.
///
/// Cloning is cheap and the clones share one cache.
pub struct Memoized<A, B> {
    state: Rc<MemoState<A, B>>,
}

impl<A, B> Clone for Memoized<A, B> {
    fn clone(&self) -> Self {
        Memoized {
            state: Rc::clone(&self.state),
        }
    }
}

impl<A, B> Memoized<A, B>
where
    A: Eq + Hash + Clone + 'static,
    B: Clone + 'static,
{
    /// Wrap `f`.
    pub fn new(f: impl Fn(A) -> B + 'static) -> Self {
        Self::recursive(move |_, arg| f(arg))
    }

    /// Wrap a function that calls back into its own memoized wrapper.
    ///
    /// `f` receives the wrapper on every call, so recursive calls such as
    /// `fib.apply(n - 1)` go through the same cache.
    pub fn recursive(f: impl Fn(&Memoized<A, B>, A) -> B + 'static) -> Self {
        Memoized {
            state: Rc::new(MemoState {
                cache: RefCell::new(FxHashMap::default()),
                hits: Cell::new(0),
                misses: Cell::new(0),
                body: Box::new(f),
            }),
        }
    }

    /// Return the cached result for `arg`, computing it on first use.
    pub fn apply(&self, arg: A) -> B {
        let cached = self.state.cache.borrow().get(&arg).cloned();
        if let Some(value) = cached {
            self.state.hits.set(self.state.hits.get() + 1);
            tracing::trace!(hits = self.state.hits.get(), "memo hit");
            return value;
        }

        self.state.misses.set(self.state.misses.get() + 1);
        tracing::trace!(misses = self.state.misses.get(), "memo miss");

        // The cache is not borrowed here: the body may re-enter `apply`.
        let value = (self.state.body)(self, arg.clone());
        self.state
            .cache
            .borrow_mut()
            .entry(arg)
            .or_insert(value)
            .clone()
    }

    /// A plain closure over this wrapper, e.g. for [`Seq::map`](crate::Seq::map).
    pub fn as_fn(&self) -> impl Fn(A) -> B + use<A, B> {
        let memo = self.clone();
        move |arg| memo.apply(arg)
    }

    /// Check whether a result for `arg` is cached.
    pub fn contains(&self, arg: &A) -> bool {
        self.state.cache.borrow().contains_key(arg)
    }

    /// Number of cached results.
    pub fn len(&self) -> usize {
        self.state.cache.borrow().len()
    }

    /// Check whether nothing has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.state.cache.borrow().is_empty()
    }

    /// Hit and miss counts so far.
    pub fn stats(&self) -> MemoStats {
        MemoStats {
            hits: self.state.hits.get(),
            misses: self.state.misses.get(),
        }
    }
}

impl<A, B> fmt::Debug for Memoized<A, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memoized")
            .field("cached", &self.state.cache.borrow().len())
            .field("hits", &self.state.hits.get())
            .field("misses", &self.state.misses.get())
            .finish()
    }
}

/// Memoize `f`.
pub fn memoize<A, B>(f: impl Fn(A) -> B + 'static) -> Memoized<A, B>
where
    A: Eq + Hash + Clone + 'static,
    B: Clone + 'static,
{
    Memoized::new(f)
}

/// `.memoized()` on any single-argument function.
pub trait MemoizeExt<A, B>: Fn(A) -> B + Sized + 'static {
    fn memoized(self) -> Memoized<A, B>;
}

impl<A, B, F> MemoizeExt<A, B> for F
where
    F: Fn(A) -> B + 'static,
    A: Eq + Hash + Clone + 'static,
    B: Clone + 'static,
{
    fn memoized(self) -> Memoized<A, B> {
        Memoized::new(self)
    }
}
