//! Guarded dispatch.
//!
//! A [`Matcher`] is an ordered list of arms, each a guard (a literal compared
//! by equality, or a predicate) paired with a handler, plus one mandatory
//! fallback. Applying it to an input runs exactly one handler: the first arm
//! whose guard accepts the input, or the fallback when none does.
//!
//! Matchers borrow for `'a`, so they can be built inside a function body and
//! capture that function's arguments, including a memoized wrapper of the
//! function itself:
//!
//! ```
//! use strand::{Matcher, Memoized};
//!
//! let fib: Memoized<u32, u64> = Memoized::recursive(|fib, order| {
//!     Matcher::when(0, |_| 0)
//!         .when(1, |_| 1)
//!         .otherwise(|| fib.apply(order - 1) + fib.apply(order - 2))
//!         .apply(order)
//! });
//! assert_eq!(fib.apply(10), 55);
//! ```

use std::fmt;

use crate::error::{Result, SeqError};

type Handler<'a, T, R> = Box<dyn Fn(T) -> R + 'a>;

/// The condition selecting an arm: a literal compared by equality, or a
/// predicate.
pub struct Guard<'a, T> {
    kind: GuardKind<'a, T>,
}

enum GuardKind<'a, T> {
    Literal { value: T, eq: fn(&T, &T) -> bool },
    Predicate(Box<dyn Fn(&T) -> bool + 'a>),
}

impl<'a, T> Guard<'a, T> {
    /// Matches an input equal to `value`.
    pub fn literal(value: T) -> Self
    where
        T: PartialEq,
    {
        Guard {
            kind: GuardKind::Literal {
                value,
                eq: T::eq,
            },
        }
    }

    /// Matches an input `pred` accepts.
    pub fn predicate(pred: impl Fn(&T) -> bool + 'a) -> Self {
        Guard {
            kind: GuardKind::Predicate(Box::new(pred)),
        }
    }

    fn accepts(&self, input: &T) -> bool {
        match &self.kind {
            GuardKind::Literal { value, eq } => eq(value, input),
            GuardKind::Predicate(pred) => pred(input),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Guard<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            GuardKind::Literal { value, .. } => f.debug_tuple("Literal").field(value).finish(),
            GuardKind::Predicate(_) => f.write_str("Predicate(<fn>)"),
        }
    }
}

/// One guarded arm of a matcher.
pub struct Arm<'a, T, R> {
    guard: Guard<'a, T>,
    handler: Handler<'a, T, R>,
}

impl<'a, T, R> Arm<'a, T, R> {
    pub fn new(guard: Guard<'a, T>, handler: impl Fn(T) -> R + 'a) -> Self {
        Arm {
            guard,
            handler: Box::new(handler),
        }
    }
}

/// The handler run when no guard matches.
pub enum Fallback<'a, T, R> {
    /// Ignores the input
    Unit(Box<dyn Fn() -> R + 'a>),
    /// Receives the input
    Input(Handler<'a, T, R>),
}

impl<'a, T, R> Fallback<'a, T, R> {
    pub fn unit(handler: impl Fn() -> R + 'a) -> Self {
        Fallback::Unit(Box::new(handler))
    }

    pub fn input(handler: impl Fn(T) -> R + 'a) -> Self {
        Fallback::Input(Box::new(handler))
    }
}

/// Ordered guarded dispatch with a mandatory fallback.
pub struct Matcher<'a, T, R> {
    arms: Vec<Arm<'a, T, R>>,
    fallback: Fallback<'a, T, R>,
}

/// A matcher under construction; [`otherwise`](MatcherBuilder::otherwise) or
/// [`otherwise_input`](MatcherBuilder::otherwise_input) finishes it.
pub struct MatcherBuilder<'a, T, R> {
    arms: Vec<Arm<'a, T, R>>,
}

impl<'a, T: 'a, R: 'a> Matcher<'a, T, R> {
    /// Start a matcher whose first arm matches `value`.
    pub fn when(value: T, handler: impl Fn(T) -> R + 'a) -> MatcherBuilder<'a, T, R>
    where
        T: PartialEq,
    {
        MatcherBuilder::new().when(value, handler)
    }

    /// Start a matcher whose first arm matches inputs accepted by `pred`.
    pub fn when_if(
        pred: impl Fn(&T) -> bool + 'a,
        handler: impl Fn(T) -> R + 'a,
    ) -> MatcherBuilder<'a, T, R> {
        MatcherBuilder::new().when_if(pred, handler)
    }

    /// Build from explicit arms.
    ///
    /// A matcher always needs a fallback; `None` is rejected here rather than
    /// on some later `apply`.
    pub fn build(
        arms: impl IntoIterator<Item = Arm<'a, T, R>>,
        fallback: Option<Fallback<'a, T, R>>,
    ) -> Result<Self> {
        let fallback = fallback.ok_or(SeqError::MatcherMisconfigured)?;
        Ok(Matcher {
            arms: arms.into_iter().collect(),
            fallback,
        })
    }

    /// Run the handler of the first arm accepting `input`, or the fallback.
    pub fn apply(&self, input: T) -> R {
        if let Some(arm) = self.arms.iter().find(|arm| arm.guard.accepts(&input)) {
            return (arm.handler)(input);
        }
        tracing::trace!(arms = self.arms.len(), "no guard matched; using fallback");
        match &self.fallback {
            Fallback::Unit(handler) => handler(),
            Fallback::Input(handler) => handler(input),
        }
    }

    /// Number of guarded arms, not counting the fallback.
    pub fn arms(&self) -> usize {
        self.arms.len()
    }
}

impl<'a, T: 'a, R: 'a> MatcherBuilder<'a, T, R> {
    pub fn new() -> Self {
        MatcherBuilder { arms: Vec::new() }
    }

    /// Add an arm matching inputs equal to `value`.
    pub fn when(mut self, value: T, handler: impl Fn(T) -> R + 'a) -> Self
    where
        T: PartialEq,
    {
        self.arms.push(Arm::new(Guard::literal(value), handler));
        self
    }

    /// Add an arm matching inputs accepted by `pred`.
    pub fn when_if(
        mut self,
        pred: impl Fn(&T) -> bool + 'a,
        handler: impl Fn(T) -> R + 'a,
    ) -> Self {
        self.arms.push(Arm::new(Guard::predicate(pred), handler));
        self
    }

    /// Finish with a fallback that ignores the input.
    pub fn otherwise(self, handler: impl Fn() -> R + 'a) -> Matcher<'a, T, R> {
        Matcher {
            arms: self.arms,
            fallback: Fallback::unit(handler),
        }
    }

    /// Finish with a fallback that receives the input.
    pub fn otherwise_input(self, handler: impl Fn(T) -> R + 'a) -> Matcher<'a, T, R> {
        Matcher {
            arms: self.arms,
            fallback: Fallback::input(handler),
        }
    }
}

impl<'a, T: 'a, R: 'a> Default for MatcherBuilder<'a, T, R> {
    fn default() -> Self {
        Self::new()
    }
}
