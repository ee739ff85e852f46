use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use itertools::Itertools as _;
use match_three_engine::{Catalog, Engine, SwapOutcome};

/// Benchmark seeded map creation across board sizes.
fn bench_create_map(c: &mut Criterion) {
    let mut group = c.benchmark_group("create_map");

    for size in [8, 16, 32] {
        group.throughput(Throughput::Elements((size * size) as u64));

        group.bench_function(format!("{size}x{size}"), |b| {
            let mut seed = 0;
            b.iter(|| {
                seed += 1;
                black_box(Engine::new(Catalog::classic(), size, size, seed).board().len())
            });
        });
    }

    group.finish();
}

/// Benchmark a full autoplay session: move search, swap, cascade, refill.
fn bench_autoplay(c: &mut Criterion) {
    const MOVES: u64 = 64;

    let mut group = c.benchmark_group("autoplay");
    group.throughput(Throughput::Elements(MOVES));

    group.bench_function("swap_cascade_8x8", |b| {
        b.iter(|| {
            let mut engine = Engine::new(Catalog::classic(), 8, 8, 42);
            let mut played = 0;

            while played < MOVES {
                match engine.find_possible_move() {
                    Ok((origin, partner)) => {
                        if let SwapOutcome::Matched(mut record) = engine.swap(origin, partner) {
                            engine.cascade(&mut record);
                            engine.clear_record(&mut record);
                        }
                        played += 1;
                    }
                    Err(_) => engine.reshuffle(),
                }
            }

            black_box(engine.board().len())
        });
    });

    group.finish();
}

/// Benchmark the whole-board move scan on settled boards.
fn bench_move_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("move_scan");

    let engines = (0..8)
        .map(|seed| Engine::new(Catalog::classic(), 16, 16, seed))
        .collect_vec();
    group.throughput(Throughput::Elements(engines.len() as u64));

    group.bench_function("find_possible_move_16x16", |b| {
        b.iter(|| {
            for engine in &engines {
                black_box(engine.find_possible_move().is_ok());
            }
        });
    });

    group.finish();
}

criterion_group!(benches, bench_create_map, bench_autoplay, bench_move_scan);
criterion_main!(benches);
