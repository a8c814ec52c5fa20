//! Persistent lazy sequences.
//!
//! A [`Seq`] is a shared handle to a thunk whose value is a *step*: either the
//! end of the sequence, or a realized head paired with the rest of the
//! sequence (itself a `Seq`, and therefore itself lazy). Transformations build
//! new handles without forcing anything; terminal operations walk the chain
//! and force one step at a time.
//!
//! Every step is forced at most once. Derived sequences share unforced tails
//! with their sources, so a generator that consults the sequence it is
//! producing sees the cells that are already realized and never recomputes
//! them.

use std::fmt;
use std::ops::Add;
use std::rc::Rc;

use num_traits::{CheckedAdd, PrimInt, Zero};
use once_cell::unsync::OnceCell;

use crate::error::{Result, SeqError};
use crate::thunk::Thunk;

// ============================================================================
// Core Type
// ============================================================================

/// A forced sequence cell.
#[derive(Clone)]
enum Step<T> {
    Empty,
    Cons(T, Seq<T>),
}

/// A persistent, lazily evaluated, possibly infinite sequence.
///
/// Cloning a `Seq` is cheap (an `Rc` increment) and shares every realized
/// cell with the original.
pub struct Seq<T> {
    node: Rc<Thunk<Step<T>>>,
}

impl<T> Clone for Seq<T> {
    fn clone(&self) -> Self {
        Seq {
            node: Rc::clone(&self.node),
        }
    }
}

// Long realized chains would otherwise be freed recursively, one stack frame
// per cell.
impl<T> Drop for Seq<T> {
    fn drop(&mut self) {
        let mut next = self.take_unshared_step();
        while let Some(Step::Cons(_, mut tail)) = next {
            next = tail.take_unshared_step();
        }
    }
}

impl<T> Seq<T> {
    fn from_step(step: Step<T>) -> Self {
        Seq {
            node: Rc::new(Thunk::ready(step)),
        }
    }

    fn lazy_step(f: impl FnOnce() -> Step<T> + 'static) -> Self {
        Seq {
            node: Rc::new(Thunk::new(f)),
        }
    }

    fn step(&self) -> &Step<T> {
        self.node.force()
    }

    fn take_unshared_step(&mut self) -> Option<Step<T>> {
        Rc::get_mut(&mut self.node).and_then(Thunk::take)
    }

    // ========================================================================
    // Construction
    // ========================================================================

    /// The empty sequence.
    pub fn empty() -> Self {
        Seq::from_step(Step::Empty)
    }

    /// A sequence with a realized head followed by `tail`.
    pub fn cons(head: T, tail: Seq<T>) -> Self {
        Seq::from_step(Step::Cons(head, tail))
    }

    /// Build a finite sequence from the given values.
    pub fn of(values: Vec<T>) -> Self {
        values.into_iter().collect()
    }

    /// Generalized corecursive builder.
    ///
    /// Each step calls `next` with the current state: `Some((value, state'))`
    /// yields `value` and continues from `state'`, `None` ends the sequence.
    /// Nothing is computed until the sequence is forced.
    pub fn unfold<S: 'static>(seed: S, next: impl Fn(S) -> Option<(T, S)> + 'static) -> Self
    where
        T: 'static,
    {
        Self::unfold_shared(seed, Rc::new(next))
    }

    fn unfold_shared<S: 'static>(state: S, next: Rc<dyn Fn(S) -> Option<(T, S)>>) -> Self
    where
        T: 'static,
    {
        Seq::lazy_step(move || {
            let produced = next(state);
            match produced {
                Some((value, state)) => Step::Cons(value, Self::unfold_shared(state, next)),
                None => Step::Empty,
            }
        })
    }

    // ========================================================================
    // Inspection (never forces)
    // ========================================================================

    /// Check whether this handle's first cell has been forced.
    pub fn is_forced(&self) -> bool {
        self.node.is_forced()
    }

    /// Number of cells already realized from the front, without forcing.
    pub fn realized_len(&self) -> usize {
        let mut count = 0;
        let mut current = self;
        while let Some(Step::Cons(_, tail)) = current.node.get() {
            count += 1;
            current = tail;
        }
        count
    }

    // ========================================================================
    // Forcing
    // ========================================================================

    /// Split into head and tail, forcing the first cell.
    pub fn uncons(&self) -> Option<(&T, &Seq<T>)> {
        match self.step() {
            Step::Cons(head, tail) => Some((head, tail)),
            Step::Empty => None,
        }
    }

    /// Check whether the sequence has no elements (forces the first cell).
    pub fn is_empty(&self) -> bool {
        self.uncons().is_none()
    }

    /// The first element.
    pub fn head(&self) -> Result<&T> {
        self.uncons()
            .map(|(head, _)| head)
            .ok_or(SeqError::empty("head"))
    }

    /// Everything after the first element.
    pub fn tail(&self) -> Result<&Seq<T>> {
        self.uncons()
            .map(|(_, tail)| tail)
            .ok_or(SeqError::empty("tail"))
    }

    /// The element at `index`, forcing cells `0..=index`.
    pub fn get(&self, index: usize) -> Result<&T> {
        let mut current = self;
        let mut position = 0;
        loop {
            match current.uncons() {
                Some((head, _)) if position == index => return Ok(head),
                Some((_, tail)) => {
                    current = tail;
                    position += 1;
                }
                None => {
                    return Err(SeqError::IndexOutOfRange {
                        index,
                        len: position,
                    });
                }
            }
        }
    }

    /// Borrowing iterator that forces one cell per `next()`.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter { current: self }
    }

    /// Number of elements. Forces the whole sequence; never returns on an
    /// infinite one.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Check whether any element satisfies `pred`, stopping at the first one.
    ///
    /// On an infinite sequence with no such element this never returns.
    pub fn exists(&self, pred: impl Fn(&T) -> bool) -> bool {
        self.iter().any(pred)
    }

    /// Check whether every element satisfies `pred`, stopping at the first
    /// counterexample.
    pub fn for_all(&self, pred: impl Fn(&T) -> bool) -> bool {
        self.iter().all(pred)
    }

    /// The first element satisfying `pred`.
    pub fn find(&self, pred: impl Fn(&T) -> bool) -> Option<&T> {
        self.iter().find(|value| pred(value))
    }

    /// Left fold over the whole sequence.
    pub fn fold<A>(&self, init: A, f: impl Fn(A, &T) -> A) -> A {
        self.iter().fold(init, f)
    }
}

impl<T> FromIterator<T> for Seq<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let values: Vec<T> = iter.into_iter().collect();
        values
            .into_iter()
            .rev()
            .fold(Seq::empty(), |tail, head| Seq::cons(head, tail))
    }
}

impl<T> From<Vec<T>> for Seq<T> {
    fn from(values: Vec<T>) -> Self {
        Seq::of(values)
    }
}

// ============================================================================
// Lazy construction and transformation
// ============================================================================

impl<T: Clone + 'static> Seq<T> {
    /// A sequence whose contents are produced by `f` on first force.
    pub fn defer(f: impl FnOnce() -> Seq<T> + 'static) -> Self {
        Seq::lazy_step(move || f().step().clone())
    }

    /// A realized head followed by a tail computed on demand.
    pub fn cons_lazy(head: T, tail: impl FnOnce() -> Seq<T> + 'static) -> Self {
        Seq::cons(head, Seq::defer(tail))
    }

    /// Infinite sequence `seed, step(seed), step(step(seed)), ...`.
    pub fn from_scalar(seed: T, step: impl Fn(&T) -> T + 'static) -> Self {
        Self::iterate_shared(seed, Rc::new(step))
    }

    fn iterate_shared(seed: T, step: Rc<dyn Fn(&T) -> T>) -> Self {
        let previous = seed.clone();
        Seq::cons_lazy(seed, move || {
            let next = step(&previous);
            Self::iterate_shared(next, step)
        })
    }

    /// Define a sequence that refers to itself.
    ///
    /// `f` receives a handle to the sequence being defined and must not force
    /// it while building; the handle resolves once `f` has returned. Cells are
    /// shared between the handle and the result, so a generator consulting
    /// the handle only sees cells that are already realized.
    ///
    /// The result holds a reference to itself and is never deallocated. Use
    /// it for long-lived tables (for example in a `thread_local!`).
    ///
    /// # Panics
    ///
    /// Forcing the handle before `f` returns panics.
    pub fn fix(f: impl FnOnce(Seq<T>) -> Seq<T>) -> Self {
        let slot: Rc<OnceCell<Seq<T>>> = Rc::new(OnceCell::new());
        let resolver = Rc::clone(&slot);
        let this = Seq::defer(move || match resolver.get() {
            Some(seq) => seq.clone(),
            None => panic!("self-referential sequence forced before it was defined"),
        });
        let seq = f(this);
        let _ = slot.set(seq.clone());
        seq
    }

    /// Apply `f` to each element, lazily.
    pub fn map<U: 'static>(&self, f: impl Fn(&T) -> U + 'static) -> Seq<U> {
        Self::map_shared(self.clone(), Rc::new(f))
    }

    fn map_shared<U: 'static>(source: Seq<T>, f: Rc<dyn Fn(&T) -> U>) -> Seq<U> {
        Seq::lazy_step(move || match source.uncons() {
            Some((head, tail)) => Step::Cons(f(head), Self::map_shared(tail.clone(), f)),
            None => Step::Empty,
        })
    }

    /// Keep the elements satisfying `pred`, lazily.
    ///
    /// Forcing a cell scans ahead until the next match. With a predicate that
    /// never holds on an infinite source, that scan never ends.
    pub fn filter(&self, pred: impl Fn(&T) -> bool + 'static) -> Seq<T> {
        Self::filter_shared(self.clone(), Rc::new(pred))
    }

    fn filter_shared(source: Seq<T>, pred: Rc<dyn Fn(&T) -> bool>) -> Seq<T> {
        Seq::lazy_step(move || {
            let mut current = source;
            loop {
                let next = match current.uncons() {
                    None => return Step::Empty,
                    Some((head, tail)) if pred(head) => {
                        return Step::Cons(head.clone(), Self::filter_shared(tail.clone(), pred));
                    }
                    Some((_, tail)) => tail.clone(),
                };
                current = next;
            }
        })
    }

    /// Elements up to (not including) the first one failing `pred`.
    pub fn take_while(&self, pred: impl Fn(&T) -> bool + 'static) -> Seq<T> {
        Self::take_while_shared(self.clone(), Rc::new(pred))
    }

    fn take_while_shared(source: Seq<T>, pred: Rc<dyn Fn(&T) -> bool>) -> Seq<T> {
        Seq::lazy_step(move || match source.uncons() {
            Some((head, tail)) if pred(head) => {
                Step::Cons(head.clone(), Self::take_while_shared(tail.clone(), pred))
            }
            _ => Step::Empty,
        })
    }

    /// At most the first `n` elements. The cell after the `n`-th is never
    /// forced.
    pub fn take(&self, n: usize) -> Seq<T> {
        if n == 0 {
            return Seq::empty();
        }
        let source = self.clone();
        Seq::lazy_step(move || match source.uncons() {
            Some((head, tail)) => Step::Cons(head.clone(), tail.take(n - 1)),
            None => Step::Empty,
        })
    }

    /// Everything after the first `n` elements.
    pub fn skip(&self, n: usize) -> Seq<T> {
        let source = self.clone();
        Seq::lazy_step(move || {
            let mut current = source;
            for _ in 0..n {
                let next = match current.uncons() {
                    Some((_, tail)) => tail.clone(),
                    None => return Step::Empty,
                };
                current = next;
            }
            current.step().clone()
        })
    }

    /// Everything from the first element failing `pred` onwards.
    pub fn skip_while(&self, pred: impl Fn(&T) -> bool + 'static) -> Seq<T> {
        let source = self.clone();
        Seq::lazy_step(move || {
            let mut current = source;
            loop {
                let next = match current.uncons() {
                    Some((head, tail)) if pred(head) => tail.clone(),
                    _ => return current.step().clone(),
                };
                current = next;
            }
        })
    }

    /// Append one element after the last one. Only reached on finite
    /// sequences.
    pub fn append(&self, value: T) -> Seq<T> {
        let source = self.clone();
        Seq::lazy_step(move || match source.uncons() {
            Some((head, tail)) => Step::Cons(head.clone(), tail.append(value)),
            None => Step::Cons(value, Seq::empty()),
        })
    }

    /// All elements of `self` followed by all elements of `other`.
    pub fn concat(&self, other: &Seq<T>) -> Seq<T> {
        let source = self.clone();
        let other = other.clone();
        Seq::lazy_step(move || match source.uncons() {
            Some((head, tail)) => Step::Cons(head.clone(), tail.concat(&other)),
            None => other.step().clone(),
        })
    }

    /// Pair elements positionally; ends with the shorter sequence.
    pub fn zip<U: Clone + 'static>(&self, other: &Seq<U>) -> Seq<(T, U)> {
        let left = self.clone();
        let right = other.clone();
        Seq::lazy_step(move || match (left.uncons(), right.uncons()) {
            (Some((a, left_tail)), Some((b, right_tail))) => {
                Step::Cons((a.clone(), b.clone()), left_tail.zip(right_tail))
            }
            _ => Step::Empty,
        })
    }

    /// Running accumulation: `init, f(init, x0), f(f(init, x0), x1), ...`.
    pub fn scan<A: Clone + 'static>(&self, init: A, f: impl Fn(&A, &T) -> A + 'static) -> Seq<A> {
        Self::scan_shared(init, self.clone(), Rc::new(f))
    }

    fn scan_shared<A: Clone + 'static>(
        acc: A,
        source: Seq<T>,
        f: Rc<dyn Fn(&A, &T) -> A>,
    ) -> Seq<A> {
        let current = acc.clone();
        Seq::cons_lazy(acc, move || match source.uncons() {
            Some((head, tail)) => Self::scan_shared(f(&current, head), tail.clone(), f),
            None => Seq::empty(),
        })
    }

    // ========================================================================
    // Terminal operations needing owned values
    // ========================================================================

    /// Left-fold the elements pairwise, starting from the first one.
    pub fn reduce(&self, combine: impl Fn(T, T) -> T) -> Result<T> {
        let mut values = self.iter();
        let first = values.next().ok_or(SeqError::empty("reduce"))?.clone();
        Ok(values.fold(first, |acc, value| combine(acc, value.clone())))
    }

    /// Sum of all elements.
    pub fn sum(&self) -> T
    where
        T: Zero + Add<Output = T>,
    {
        self.fold(T::zero(), |acc, value| acc + value.clone())
    }

    /// Sum of all elements, failing instead of overflowing.
    pub fn checked_sum(&self) -> Result<T>
    where
        T: Zero + CheckedAdd,
    {
        self.iter().try_fold(T::zero(), |acc, value| {
            acc.checked_add(value).ok_or(SeqError::Overflow)
        })
    }

    /// Collect the whole sequence into a `Vec`.
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }
}

// ============================================================================
// Numeric sources
// ============================================================================

impl<T: PrimInt + 'static> Seq<T> {
    /// `start, start + 1, ..., end - 1`; empty when `start >= end`.
    pub fn from_range(start: T, end: T) -> Self {
        Seq::lazy_step(move || {
            if start >= end {
                Step::Empty
            } else {
                Step::Cons(start, Self::from_range(start + T::one(), end))
            }
        })
    }

    /// `start, start + 1, start + 2, ...` without end.
    pub fn counting_from(start: T) -> Self {
        Seq::from_scalar(start, |n| *n + T::one())
    }
}

// ============================================================================
// Iteration
// ============================================================================

/// Borrowing iterator over a [`Seq`].
pub struct Iter<'a, T> {
    current: &'a Seq<T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let (head, tail) = self.current.uncons()?;
        self.current = tail;
        Some(head)
    }
}

impl<'a, T> IntoIterator for &'a Seq<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ============================================================================
// Equality and Display
// ============================================================================

// Forces both sides; only terminates on finite sequences.
impl<T: PartialEq> PartialEq for Seq<T> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.node, &other.node) || self.iter().eq(other.iter())
    }
}

/// Shows the realized prefix only; `..` marks the unforced remainder.
impl<T: fmt::Debug> fmt::Debug for Seq<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Seq[")?;
        let mut current = self;
        let mut first = true;
        loop {
            match current.node.get() {
                Some(Step::Cons(head, tail)) => {
                    if !first {
                        write!(f, ", ")?;
                    }
                    first = false;
                    write!(f, "{head:?}")?;
                    current = tail;
                }
                Some(Step::Empty) => break,
                None => {
                    if !first {
                        write!(f, ", ")?;
                    }
                    write!(f, "..")?;
                    break;
                }
            }
        }
        write!(f, "]")
    }
}
