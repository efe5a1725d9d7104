use core::hint::black_box;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use futures::future::try_join_all;
use ridgen::{
    AtomicGenerator, BackoffPolicy, CancellationToken, CodeOptions, GeneratorConfig, IdGenStatus,
    IdGenerator, IdGeneratorAsyncExt, LockGenerator, Minter, MonotonicClock, ResourceTag, Result,
    Snowflake, SnowflakeId, TimeSource, UNIX_EPOCH, encode,
};
use std::{
    sync::{Arc, Barrier},
    thread::scope,
    time::Instant,
};
use tokio::runtime::Builder;

#[derive(Clone, Copy)]
struct FixedMockTime {
    millis: u64,
}

impl TimeSource for FixedMockTime {
    fn current_millis(&self) -> u64 {
        self.millis
    }
}

// Number of IDs generated per benchmark iteration (per-thread for
// multi-threaded). Matches one full tick of `SnowflakeId` sequence space.
const TOTAL_IDS: usize = 4096;

fn mock_config(machine_id: u64) -> GeneratorConfig<SnowflakeId> {
    GeneratorConfig::new(machine_id)
        .unwrap()
        .with_epoch(UNIX_EPOCH)
}

fn mono_config(machine_id: u64) -> GeneratorConfig<SnowflakeId> {
    GeneratorConfig::new(machine_id).unwrap()
}

/// Benchmarks a hot-path generator where IDs are always `Ready`.
fn bench_generator<ID, G>(c: &mut Criterion, group_name: &str, generator_factory: impl Fn() -> G)
where
    ID: Snowflake,
    G: IdGenerator<ID>,
{
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{}", TOTAL_IDS), |b| {
        b.iter_custom(|iters| {
            let start = Instant::now();

            for _ in 0..iters {
                let generator = generator_factory();
                for _ in 0..TOTAL_IDS {
                    match generator.try_poll_id().unwrap() {
                        IdGenStatus::Ready { id } => {
                            black_box(id);
                        }
                        IdGenStatus::Pending { .. } => unreachable!(),
                    }
                }
            }

            start.elapsed()
        });
    });

    group.finish();
}

/// Benchmarks the blocking retry loop against a real clock.
fn bench_generator_blocking<ID, G>(
    c: &mut Criterion,
    group_name: &str,
    generator_factory: impl Fn() -> G,
) where
    ID: Snowflake,
    G: IdGenerator<ID>,
{
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));
    let policy = BackoffPolicy::unbounded();

    group.bench_function(format!("elems/{}", TOTAL_IDS), |b| {
        b.iter_custom(|iters| {
            let start = Instant::now();

            for _ in 0..iters {
                let generator = generator_factory();
                for _ in 0..TOTAL_IDS {
                    black_box(generator.next_id_blocking(&policy).unwrap());
                }
            }

            start.elapsed()
        });
    });

    group.finish();
}

/// Benchmarks shared generator across threads, with no yielding (fixed clock).
fn bench_generator_contended<ID, G>(
    c: &mut Criterion,
    group_name: &str,
    generator_fn: impl Fn() -> G,
) where
    ID: Snowflake,
    G: IdGenerator<ID> + Send + Sync,
{
    let mut group = c.benchmark_group(group_name);

    for thread_count in [1, 2, 4, 8, 16] {
        let ids_per_thread = TOTAL_IDS / thread_count;

        group.throughput(Throughput::Elements(TOTAL_IDS as u64));
        group.bench_function(
            format!("elems/{}/threads/{}", TOTAL_IDS, thread_count),
            |b| {
                b.iter_custom(|iters| {
                    let start = Instant::now();

                    for _ in 0..iters {
                        let generator = Arc::new(generator_fn());
                        let barrier = Arc::new(Barrier::new(thread_count + 1));
                        scope(|s| {
                            for _ in 0..thread_count {
                                let generator = Arc::clone(&generator);
                                let barrier = Arc::clone(&barrier);
                                s.spawn(move || {
                                    barrier.wait();
                                    for _ in 0..ids_per_thread {
                                        match generator.try_poll_id().unwrap() {
                                            IdGenStatus::Ready { id } => {
                                                black_box(id);
                                            }
                                            IdGenStatus::Pending { .. } => unreachable!(),
                                        }
                                    }
                                });
                            }
                            barrier.wait();
                        });
                    }

                    start.elapsed()
                });
            },
        );
    }

    group.finish();
}

/// Benchmarks many async generators in parallel, each running in a separate
/// task.
fn bench_generator_async_tokio<ID, G, T>(
    c: &mut Criterion,
    group_name: &str,
    generator_fn: impl Fn(GeneratorConfig<ID>, T) -> G + Copy,
    clock_factory: impl Fn() -> T + Copy,
) where
    ID: Snowflake + Send + Sync + 'static,
    G: IdGenerator<ID> + Send + Sync + 'static,
    T: TimeSource + Clone + Send + Sync + 'static,
{
    let mut group = c.benchmark_group(group_name);
    group.sample_size(10);
    group.sampling_mode(criterion::SamplingMode::Flat);

    let total_ids = TOTAL_IDS * 64;

    for num_generators in [1, 2, 4, 8, 16, 32, 64] {
        let ids_per_task = total_ids / num_generators;

        group.throughput(Throughput::Elements(total_ids as u64));
        group.bench_function(
            format!("elems/{}/gens/{}", total_ids, num_generators),
            |b| {
                let rt = Builder::new_multi_thread().enable_all().build().unwrap();

                b.to_async(&rt).iter_custom(move |iters| async move {
                    let clock = clock_factory();
                    let start = Instant::now();

                    for _ in 0..iters {
                        let mut tasks: Vec<tokio::task::JoinHandle<Result<()>>> =
                            Vec::with_capacity(num_generators);

                        for i in 0..num_generators {
                            let config = GeneratorConfig::new(i as u64 + 1).unwrap();
                            let generator = generator_fn(config, clock.clone());
                            tasks.push(tokio::spawn(async move {
                                let policy = BackoffPolicy::unbounded();
                                let cancel = CancellationToken::new();
                                for _ in 0..ids_per_task {
                                    let id = generator.next_id(&policy, &cancel).await?;
                                    black_box(id);
                                }
                                Ok(())
                            }));
                        }

                        for result in try_join_all(tasks).await.unwrap() {
                            result.unwrap();
                        }
                    }

                    start.elapsed()
                });
            },
        );
    }

    group.finish();
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("code/encode");
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    for length in [6, 8, 12] {
        let options = CodeOptions::builder().length(length).build().unwrap();
        group.bench_function(format!("elems/{}/length/{}", TOTAL_IDS, length), |b| {
            b.iter(|| {
                for id in 0..TOTAL_IDS as u64 {
                    black_box(encode(black_box(id), &options));
                }
            });
        });
    }

    group.finish();
}

fn bench_mint(c: &mut Criterion) {
    let mut group = c.benchmark_group("mono/sequential/mint");
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    let minter = Minter::new(
        LockGenerator::new(mono_config(1), MonotonicClock::default()),
        CodeOptions::default(),
        BackoffPolicy::unbounded(),
    );
    group.bench_function(format!("elems/{}", TOTAL_IDS), |b| {
        b.iter(|| {
            for _ in 0..TOTAL_IDS {
                black_box(minter.mint_blocking(&ResourceTag::USER).unwrap());
            }
        });
    });

    group.finish();
}

// --- Mock clock ---

fn benchmark_mock_sequential_lock(c: &mut Criterion) {
    bench_generator::<SnowflakeId, _>(c, "mock/sequential/lock", || {
        LockGenerator::new(mock_config(1), FixedMockTime { millis: 1 })
    });
}

fn benchmark_mock_sequential_atomic(c: &mut Criterion) {
    bench_generator::<SnowflakeId, _>(c, "mock/sequential/atomic", || {
        AtomicGenerator::new(mock_config(1), FixedMockTime { millis: 1 })
    });
}

fn benchmark_mock_contended_lock(c: &mut Criterion) {
    bench_generator_contended::<SnowflakeId, _>(c, "mock/contended/lock", || {
        LockGenerator::new(mock_config(1), FixedMockTime { millis: 1 })
    });
}

fn benchmark_mock_contended_atomic(c: &mut Criterion) {
    bench_generator_contended::<SnowflakeId, _>(c, "mock/contended/atomic", || {
        AtomicGenerator::new(mock_config(1), FixedMockTime { millis: 1 })
    });
}

// --- Monotonic clock ---

fn benchmark_mono_blocking_lock(c: &mut Criterion) {
    let clock = MonotonicClock::default();
    bench_generator_blocking::<SnowflakeId, _>(c, "mono/sequential/blocking/lock", || {
        LockGenerator::new(mono_config(1), clock.clone())
    });
}

fn benchmark_mono_blocking_atomic(c: &mut Criterion) {
    let clock = MonotonicClock::default();
    bench_generator_blocking::<SnowflakeId, _>(c, "mono/sequential/blocking/atomic", || {
        AtomicGenerator::new(mono_config(1), clock.clone())
    });
}

// --- Async (Tokio) ---

fn benchmark_mono_tokio_lock(c: &mut Criterion) {
    bench_generator_async_tokio::<SnowflakeId, _, _>(
        c,
        "mono/multi/async/tokio/lock",
        LockGenerator::new,
        MonotonicClock::default,
    );
}

fn benchmark_mono_tokio_atomic(c: &mut Criterion) {
    bench_generator_async_tokio::<SnowflakeId, _, _>(
        c,
        "mono/multi/async/tokio/atomic",
        AtomicGenerator::new,
        MonotonicClock::default,
    );
}

criterion_group!(
    benches,
    // Mock clock
    benchmark_mock_sequential_lock,
    benchmark_mock_sequential_atomic,
    benchmark_mock_contended_lock,
    benchmark_mock_contended_atomic,
    // Monotonic clock, blocking retries
    benchmark_mono_blocking_lock,
    benchmark_mono_blocking_atomic,
    // Async multi worker, multi generator
    benchmark_mono_tokio_lock,
    benchmark_mono_tokio_atomic,
    // Encoder and facade
    bench_encode,
    bench_mint,
);
criterion_main!(benches);
