//! Lazy persistent sequences for Strand
//!
//! This crate provides the pieces lazy functional programs are built from:
//! an evaluate-once [`Thunk`], a persistent and possibly infinite [`Seq`]
//! whose cells are forced on demand and shared between every derived
//! sequence, a [`Memoized`] function cache, and a guarded [`Matcher`].
//!
//! Everything here is single-threaded: sequences and memo tables use `Rc`
//! and interior mutability and are neither `Send` nor `Sync`.

pub mod error;
pub mod limit;
pub mod matcher;
pub mod memo;
#[cfg(feature = "persistent")]
mod persistent;
pub mod seq;
pub mod thunk;

// Re-export commonly used items for convenience
pub use error::{Result, SeqError};
pub use limit::{ForceLimit, Limited};
pub use matcher::{Arm, Fallback, Guard, Matcher, MatcherBuilder};
pub use memo::{MemoStats, MemoizeExt, Memoized, memoize};
pub use seq::{Iter, Seq};
pub use thunk::Thunk;
