use codspeed_criterion_compat::{Criterion, black_box, criterion_group, criterion_main};
use std::time::Duration;
use strand::{Matcher, Memoized, Seq};

// ============================================================================
// Sequence Benchmarks
// ============================================================================

fn bench_range_filter_sum(c: &mut Criterion) {
    c.bench_function("range filter sum (1000)", |b| {
        b.iter(|| {
            black_box(
                Seq::from_range(0u64, 1_000)
                    .filter(|n| n % 3 == 0 || n % 5 == 0)
                    .sum(),
            )
        })
    });
}

fn bench_map_take_infinite(c: &mut Criterion) {
    c.bench_function("map take on infinite (10000)", |b| {
        b.iter(|| black_box(Seq::counting_from(0u64).map(|n| n * n).take(10_000).len()))
    });
}

fn bench_retraverse_realized(c: &mut Criterion) {
    let seq = Seq::counting_from(0u64).take(10_000);
    seq.len();
    c.bench_function("retraverse realized (10000)", |b| {
        b.iter(|| black_box(seq.fold(0u64, |acc, n| acc + n)))
    });
}

fn bench_long_chain_drop(c: &mut Criterion) {
    c.bench_function("force and drop chain (100000)", |b| {
        b.iter(|| {
            let seq = Seq::counting_from(0u32);
            black_box(seq.get(100_000).is_ok())
        })
    });
}

// ============================================================================
// Memo and Matcher Benchmarks
// ============================================================================

fn bench_memoized_fibonacci(c: &mut Criterion) {
    c.bench_function("memoized fibonacci (90)", |b| {
        b.iter(|| {
            let fib: Memoized<u32, u64> = Memoized::recursive(|fib, order| {
                Matcher::when(0, |_| 0)
                    .when(1, |_| 1)
                    .otherwise(|| fib.apply(order - 1) + fib.apply(order - 2))
                    .apply(order)
            });
            black_box(fib.apply(90))
        })
    });
}

fn bench_memo_cache_hit(c: &mut Criterion) {
    let square: Memoized<u64, u64> = Memoized::new(|n: u64| n * n);
    square.apply(42);
    c.bench_function("memo cache hit", |b| {
        b.iter(|| black_box(square.apply(black_box(42))))
    });
}

fn bench_matcher_dispatch(c: &mut Criterion) {
    let matcher = Matcher::when(0, |_| 0)
        .when_if(|n: &i64| *n < 0, |n| -n)
        .when_if(|n| n % 2 == 0, |n| n / 2)
        .otherwise_input(|n| 3 * n + 1);
    c.bench_function("matcher dispatch", |b| {
        b.iter(|| black_box(matcher.apply(black_box(27))))
    });
}

criterion_group! {
    name = seq_benches;
    config = Criterion::default()
        .sample_size(100)
        .measurement_time(Duration::from_secs(10));
    targets =
        bench_range_filter_sum,
        bench_map_take_infinite,
        bench_retraverse_realized,
        bench_long_chain_drop
}

criterion_group! {
    name = memo_benches;
    config = Criterion::default()
        .sample_size(100)
        .measurement_time(Duration::from_secs(10));
    targets =
        bench_memoized_fibonacci,
        bench_memo_cache_hit,
        bench_matcher_dispatch
}

criterion_main!(seq_benches, memo_benches);
