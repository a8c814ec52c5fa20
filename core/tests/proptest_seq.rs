use proptest::prelude::*;
use std::cell::Cell;
use std::rc::Rc;
use strand::{Matcher, Seq, SeqError, memoize};

// ============================================================================
// Strategies
// ============================================================================

/// Strategy for finite sequences of small integers
fn small_values() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(-1_000i64..1_000i64, 0..64)
}

// ============================================================================
// Sequence Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_map_commutes_with_get(values in small_values(), index in 0usize..64) {
        let seq = Seq::of(values.clone());
        let mapped = seq.map(|n| n * 3 - 1);
        match values.get(index) {
            Some(value) => {
                prop_assert_eq!(mapped.get(index), Ok(&(value * 3 - 1)));
            }
            None => {
                prop_assert_eq!(
                    mapped.get(index),
                    Err(SeqError::IndexOutOfRange { index, len: values.len() })
                );
            }
        }
    }

    #[test]
    fn prop_take_is_prefix(start in 0u64..1_000, n in 0usize..200) {
        let taken = Seq::counting_from(start).take(n);
        let expected: Vec<u64> = (start..start + n as u64).collect();
        prop_assert_eq!(taken.to_vec(), expected);
        prop_assert_eq!(
            taken.get(n),
            Err(SeqError::IndexOutOfRange { index: n, len: n })
        );
    }

    #[test]
    fn prop_unfold_nth_element(seed in 0u64..1_000, step in 1u64..50, index in 0usize..300) {
        let seq = Seq::unfold(seed, move |s| Some((s, s + step)));
        prop_assert_eq!(seq.get(index), Ok(&(seed + step * index as u64)));
    }

    #[test]
    fn prop_from_range_length(start in -500i32..500, end in -500i32..500) {
        let expected = if start < end { (end - start) as usize } else { 0 };
        prop_assert_eq!(Seq::from_range(start, end).len(), expected);
    }

    #[test]
    fn prop_filter_matches_iterator(values in small_values()) {
        let seq = Seq::of(values.clone());
        let expected: Vec<i64> = values.iter().copied().filter(|n| n % 2 == 0).collect();
        prop_assert_eq!(seq.filter(|n| n % 2 == 0).to_vec(), expected);
    }

    #[test]
    fn prop_sum_matches_iterator(values in small_values()) {
        let seq = Seq::of(values.clone());
        prop_assert_eq!(seq.sum(), values.iter().sum::<i64>());
        prop_assert_eq!(seq.checked_sum(), Ok(values.iter().sum::<i64>()));
    }

    // ========================================================================
    // Memo and Matcher Properties
    // ========================================================================

    #[test]
    fn prop_memo_calls_once_per_distinct_argument(args in prop::collection::vec(0u8..16, 1..100)) {
        let calls = Rc::new(Cell::new(0usize));
        let counter = calls.clone();
        let memo = memoize(move |n: u8| {
            counter.set(counter.get() + 1);
            u32::from(n) * 7
        });

        for arg in &args {
            prop_assert_eq!(memo.apply(*arg), u32::from(*arg) * 7);
        }

        let mut distinct = args.clone();
        distinct.sort_unstable();
        distinct.dedup();
        prop_assert_eq!(calls.get(), distinct.len());
        prop_assert_eq!(memo.stats().misses + memo.stats().hits, args.len());
    }

    #[test]
    fn prop_matcher_is_deterministic(input in any::<i32>()) {
        let matcher = Matcher::when(0, |_| 0)
            .when_if(|n: &i32| *n < 0, |_| -1)
            .otherwise(|| 1);
        let first = matcher.apply(input);
        prop_assert_eq!(first, matcher.apply(input));
        prop_assert_eq!(first, input.signum());
    }
}
