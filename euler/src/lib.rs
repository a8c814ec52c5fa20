//! Project Euler solutions built on Strand sequences
//!
//! Each solution is a pipeline over the public `strand` API: lazy ranges and
//! infinite sequences, memoized recursion with [`Matcher`] base cases, and a
//! self-referential table of known primes.

use anyhow::{Context, Result, ensure};
use strand::{Matcher, Memoized, Seq};

thread_local! {
    static FIBONACCI: Memoized<u32, Option<u64>> = fibonacci_memo();
    static KNOWN_PRIMES: Seq<u64> = known_primes();
}

// ============================================================================
// Problem 1: Multiples of 3 and 5
// ============================================================================

fn is_multiple_of_3_or_5(n: &u64) -> bool {
    *n != 0 && (n % 3 == 0 || n % 5 == 0)
}

/// Sum of the natural numbers below `limit` that are multiples of 3 or 5.
pub fn sum_of_multiples_of_3_and_5_below(limit: u64) -> u64 {
    Seq::from_range(0, limit).filter(is_multiple_of_3_or_5).sum()
}

// ============================================================================
// Problem 2: Even Fibonacci numbers
// ============================================================================

/// A fresh memoized Fibonacci function with base cases at orders 0, 1 and 2.
///
/// Orders whose value does not fit in a `u64` (above 93) map to `None`.
pub fn fibonacci_memo() -> Memoized<u32, Option<u64>> {
    Memoized::recursive(|fib: &Memoized<u32, Option<u64>>, order: u32| {
        Matcher::when(0, |_| Some(0))
            .when(1, |_| Some(1))
            .when(2, |_| Some(1))
            .otherwise(|| fib.apply(order - 2)?.checked_add(fib.apply(order - 1)?))
            .apply(order)
    })
}

/// The Fibonacci number of the given order, from a per-thread memo table.
pub fn fibonacci(order: u32) -> Result<u64> {
    FIBONACCI
        .with(|fib| fib.apply(order))
        .with_context(|| format!("Fibonacci number of order {order} overflows u64"))
}

/// Sum of the even Fibonacci terms (starting 1, 2, 3, 5, ...) not exceeding `max`.
pub fn sum_of_even_fibonacci_not_exceeding(max: u64) -> u64 {
    let fib = FIBONACCI.with(Memoized::as_fn);
    Seq::counting_from(2u32)
        .map(move |order| fib(*order))
        .take_while(move |value| value.is_some_and(|value| value <= max))
        .map(|value| value.unwrap_or_default())
        .filter(|value| value % 2 == 0)
        .sum()
}

// ============================================================================
// Problem 3: Largest prime factor
// ============================================================================

// (factor, value left after dividing it out), peeled off until 1 remains.
fn factorization(n: u64) -> Seq<(u64, u64)> {
    Seq::unfold(n, |remaining| {
        Matcher::when(1, |_| None)
            .otherwise_input(|remaining| {
                let factor = smallest_prime_factor(remaining);
                let rest = remaining / factor;
                Some(((factor, rest), rest))
            })
            .apply(remaining)
    })
}

fn smallest_prime_factor(n: u64) -> u64 {
    KNOWN_PRIMES.with(|primes| {
        primes
            .take_while(move |p| p * p <= n)
            .find(|p| n % *p == 0)
            .copied()
            .unwrap_or(n)
    })
}

/// Prime factors of `n` in ascending order, with multiplicity.
pub fn prime_factors(n: u64) -> Result<Seq<u64>> {
    ensure!(n > 0, "0 has no prime factorization");
    Ok(factorization(n).map(|(factor, _)| *factor))
}

/// The largest prime factor of `n`.
pub fn largest_prime_factor(n: u64) -> Result<u64> {
    prime_factors(n)?
        .reduce(u64::max)
        .with_context(|| format!("{n} has no prime factors"))
}

// ============================================================================
// Problem 7: 10001st prime
// ============================================================================

// Primes in ascending order. Each new prime is found by trial division with
// the primes already in the table, so the table is defined in terms of itself.
fn known_primes() -> Seq<u64> {
    Seq::fix(|primes| Seq::from_scalar(2, move |previous| next_prime(&primes, *previous)))
}

fn has_known_divisor(primes: &Seq<u64>, candidate: u64) -> bool {
    primes
        .take_while(move |p| p * p <= candidate)
        .exists(|p| candidate % p == 0)
}

fn next_prime(primes: &Seq<u64>, previous: u64) -> u64 {
    let mut candidate = previous + 1;
    while has_known_divisor(primes, candidate) {
        candidate += 1;
    }
    candidate
}

/// The `index`-th prime, counting from 1 (`prime_no(1) == 2`).
pub fn prime_no(index: usize) -> Result<u64> {
    ensure!(index >= 1, "prime index must be at least 1, got {index}");
    tracing::debug!(index, "looking up prime");
    KNOWN_PRIMES
        .with(|primes| primes.get(index - 1).copied())
        .with_context(|| format!("looking up prime number {index}"))
}
