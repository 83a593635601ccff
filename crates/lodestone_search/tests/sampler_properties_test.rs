//! # Seed Sampler Property Tests
//!
//! - random draws never leave the configured range
//! - partitioned enumeration covers a prefix of the range exactly once
//!   across workers, each worker ascending

use std::collections::HashSet;

use lodestone_search::{PartitionedSeeds, RandomSeeds, SamplingMode, SeedRange, SeedStream};
use lodestone_shared::Seed;

#[test]
fn test_32_bit_draws_stay_in_range() {
    let seeds = RandomSeeds::new(SeedRange::Bits32, 0).unwrap();
    for seed in seeds.take(10_000) {
        let value = seed.value();
        assert!(
            (-2_147_483_648..=2_147_483_647).contains(&value),
            "{value} escaped the 32-bit range"
        );
    }
}

#[test]
fn test_64_bit_draws_use_the_full_width() {
    let wide = RandomSeeds::with_seed(SeedRange::Bits64, 1234)
        .take(1_000)
        .filter(|seed| i32::try_from(seed.value()).is_err())
        .count();
    assert!(wide > 990, "only {wide} of 1000 draws needed 64 bits");
}

#[test]
fn test_workers_get_independent_generators() {
    let a: Vec<Seed> = RandomSeeds::new(SeedRange::Bits64, 0).unwrap().take(8).collect();
    let b: Vec<Seed> = RandomSeeds::new(SeedRange::Bits64, 1).unwrap().take(8).collect();
    assert_ne!(a, b);
}

#[test]
fn test_partitions_cover_prefix_exactly_once() {
    for workers in [1usize, 2, 3, 7, 16] {
        let prefix = 10_000i64;
        let min = SeedRange::Bits32.min();
        let mut seen = HashSet::new();

        for worker in 0..workers {
            let mut previous = None;
            for seed in PartitionedSeeds::new(SeedRange::Bits32, worker, workers)
                .take_while(|seed| seed.value() < min + prefix)
            {
                if let Some(previous) = previous {
                    assert!(seed.value() > previous, "worker {worker} went backwards");
                }
                previous = Some(seed.value());
                assert!(seen.insert(seed.value()), "{seed} emitted twice");
            }
        }

        assert_eq!(seen.len() as i64, prefix, "{workers} workers left gaps");
    }
}

#[test]
fn test_stream_selects_strategy() {
    let sequential = SeedStream::for_worker(SamplingMode::Sequential, SeedRange::Bits32, 1, 4)
        .unwrap()
        .next()
        .unwrap();
    assert_eq!(sequential.value(), SeedRange::Bits32.min() + 1);

    let mut random = SeedStream::for_worker(SamplingMode::Random, SeedRange::Bits32, 0, 4).unwrap();
    assert!(random.next().is_some());
}
