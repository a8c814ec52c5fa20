use std::cell::Cell;
use std::rc::Rc;
use strand::{Matcher, MemoStats, MemoizeExt, Memoized, Seq, memoize};

#[test]
fn test_memoized_fibonacci_misses_once_per_order() {
    let fib: Memoized<u32, u64> = Memoized::recursive(|fib, order| {
        Matcher::when(0, |_| 0)
            .when(1, |_| 1)
            .otherwise(|| fib.apply(order - 1) + fib.apply(order - 2))
            .apply(order)
    });

    assert_eq!(fib.apply(30), 832_040);
    assert_eq!(fib.stats().misses, 31);
    assert_eq!(fib.len(), 31);
}

#[test]
fn test_underlying_function_runs_once_per_argument() {
    let calls = Rc::new(Cell::new(0));
    let counter = calls.clone();
    let slow_len = memoize(move |word: String| {
        counter.set(counter.get() + 1);
        word.len()
    });

    for _ in 0..5 {
        assert_eq!(slow_len.apply("strand".to_string()), 6);
    }
    assert_eq!(slow_len.apply("seq".to_string()), 3);
    assert_eq!(calls.get(), 2);
    assert_eq!(slow_len.stats(), MemoStats { hits: 4, misses: 2 });
}

#[test]
fn test_memo_as_map_function() {
    let square = (|n: u64| n * n).memoized();
    let squares = Seq::from_range(0u64, 4).map({
        let square = square.clone();
        move |n| square.apply(*n)
    });

    assert_eq!(squares.to_vec(), vec![0, 1, 4, 9]);
    assert_eq!(squares.to_vec(), vec![0, 1, 4, 9]);
    assert_eq!(square.stats().misses, 4);
    assert_eq!(square.stats().hits, 0);
}

#[test]
fn test_debug_reports_counts() {
    let id = memoize(|n: i32| n);
    id.apply(1);
    id.apply(1);
    assert_eq!(format!("{id:?}"), "Memoized { cached: 1, hits: 1, misses: 1 }");
}
