//! Bounded forcing.
//!
//! The plain terminal operations on [`Seq`] trust the caller to bound infinite
//! sequences with `take`/`take_while` first. A [`Limited`] view runs the same
//! operations but gives up with [`SeqError::LimitExceeded`] once more than
//! `max_cells` cells of the viewed sequence would have to be examined.
//!
//! The budget counts cells of the viewed sequence only. A `filter` stage
//! upstream that scans forever for its next match is not interrupted.

use std::ops::{Add, ControlFlow};

use num_traits::Zero;

use crate::error::{Result, SeqError};
use crate::seq::Seq;

/// Configuration for bounded forcing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ForceLimit {
    /// Maximum number of cells a terminal operation may visit
    pub max_cells: usize,
}

impl Default for ForceLimit {
    fn default() -> Self {
        ForceLimit {
            max_cells: 1_000_000,
        }
    }
}

impl ForceLimit {
    pub fn new(max_cells: usize) -> Self {
        ForceLimit { max_cells }
    }

    pub fn unbounded() -> Self {
        ForceLimit {
            max_cells: usize::MAX,
        }
    }
}

/// A sequence viewed through a [`ForceLimit`].
#[derive(Debug)]
pub struct Limited<'a, T> {
    seq: &'a Seq<T>,
    limit: ForceLimit,
}

impl<T> Seq<T> {
    /// View this sequence with bounded terminal operations.
    pub fn limited(&self, limit: ForceLimit) -> Limited<'_, T> {
        Limited { seq: self, limit }
    }
}

impl<'a, T> Limited<'a, T> {
    // Fold over at most `max_cells` elements; `Break` stops early.
    fn walk<A>(&self, init: A, mut f: impl FnMut(A, &'a T) -> ControlFlow<A, A>) -> Result<A> {
        let mut acc = init;
        let mut current = self.seq;
        let mut visited = 0;
        while let Some((head, tail)) = current.uncons() {
            if visited == self.limit.max_cells {
                tracing::debug!(limit = self.limit.max_cells, "forcing limit exceeded");
                return Err(SeqError::LimitExceeded {
                    limit: self.limit.max_cells,
                });
            }
            visited += 1;
            match f(acc, head) {
                ControlFlow::Continue(next) => acc = next,
                ControlFlow::Break(done) => return Ok(done),
            }
            current = tail;
        }
        Ok(acc)
    }

    pub fn exists(&self, pred: impl Fn(&T) -> bool) -> Result<bool> {
        self.walk(false, |_, value| {
            if pred(value) {
                ControlFlow::Break(true)
            } else {
                ControlFlow::Continue(false)
            }
        })
    }

    pub fn fold<A>(&self, init: A, f: impl Fn(A, &T) -> A) -> Result<A> {
        self.walk(init, |acc, value| ControlFlow::Continue(f(acc, value)))
    }

    pub fn len(&self) -> Result<usize> {
        self.fold(0, |count, _| count + 1)
    }

    pub fn get(&self, index: usize) -> Result<&'a T> {
        let mut position = 0;
        let found = self.walk(None, |_, value| {
            if position == index {
                ControlFlow::Break(Some(value))
            } else {
                position += 1;
                ControlFlow::Continue(None)
            }
        })?;
        found.ok_or(SeqError::IndexOutOfRange {
            index,
            len: position,
        })
    }
}

impl<T: Clone> Limited<'_, T> {
    pub fn reduce(&self, combine: impl Fn(T, T) -> T) -> Result<T> {
        let reduced = self.walk(None, |acc: Option<T>, value| {
            ControlFlow::Continue(Some(match acc {
                Some(acc) => combine(acc, value.clone()),
                None => value.clone(),
            }))
        })?;
        reduced.ok_or(SeqError::empty("reduce"))
    }

    pub fn sum(&self) -> Result<T>
    where
        T: Zero + Add<Output = T>,
    {
        self.fold(T::zero(), |acc, value| acc + value.clone())
    }

    pub fn to_vec(&self) -> Result<Vec<T>> {
        self.fold(Vec::new(), |mut values, value| {
            values.push(value.clone());
            values
        })
    }
}
