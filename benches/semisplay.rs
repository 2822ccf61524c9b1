use std::hint::black_box;
use std::time::Duration;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use semisplay::Set;

const SPLAY_SIZES: [usize; 3] = [3, 7, 15];
const KEY_COUNT: usize = 100_000;
const LOOKUPS: usize = 10_000;
const HOT_KEYS: usize = 4;
const RNG_SEED: u64 = 0x5EED_2026;

fn random_keys(rng: &mut StdRng) -> Vec<i32> {
    (0..KEY_COUNT).map(|_| rng.random_range(i32::MIN..i32::MAX)).collect()
}

fn filled(keys: &[i32], splay_size: usize) -> Set<i32> {
    let mut set = Set::with_capacity(keys.len(), splay_size);
    set.extend(keys.iter().copied());
    set
}

// Random keys, then lookups that keep hitting a handful of them
fn bench_hot_keys(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(RNG_SEED);
    let keys = random_keys(&mut rng);
    let hot: Vec<i32> = (0..HOT_KEYS).map(|_| keys[rng.random_range(0..keys.len())]).collect();
    let picks: Vec<usize> = (0..LOOKUPS).map(|_| rng.random_range(0..HOT_KEYS)).collect();

    let mut group = c.benchmark_group("hot_keys");
    group.sample_size(15);
    group.measurement_time(Duration::from_millis(1000));

    for splay_size in SPLAY_SIZES {
        let set = filled(&keys, splay_size);
        group.bench_with_input(BenchmarkId::from_parameter(splay_size), &set, |b, set| {
            b.iter(|| {
                for &pick in &picks {
                    black_box(set.contains(&hot[pick]));
                }
            })
        });
    }
    group.finish();
}

// Random keys, then lookups spread over all of them
fn bench_uniform(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(RNG_SEED);
    let keys = random_keys(&mut rng);
    let picks: Vec<usize> = (0..LOOKUPS).map(|_| rng.random_range(0..keys.len())).collect();

    let mut group = c.benchmark_group("uniform");
    group.sample_size(15);
    group.measurement_time(Duration::from_millis(1000));

    for splay_size in SPLAY_SIZES {
        let set = filled(&keys, splay_size);
        group.bench_with_input(BenchmarkId::from_parameter(splay_size), &set, |b, set| {
            b.iter(|| {
                for &pick in &picks {
                    black_box(set.contains(&keys[pick]));
                }
            })
        });
    }
    group.finish();
}

// Building a set from random keys
fn bench_build(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(RNG_SEED);
    let keys = random_keys(&mut rng);

    let mut group = c.benchmark_group("build");
    group.sample_size(10);

    for splay_size in SPLAY_SIZES {
        group.bench_with_input(BenchmarkId::from_parameter(splay_size), &keys, |b, keys| {
            b.iter(|| black_box(filled(keys, splay_size)).size())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_hot_keys, bench_uniform, bench_build);
criterion_main!(benches);
