use junban::permutation::{custom, random_permutation_with_rng, sorted, sorted_by_key};
use junban::{
    permuted_systematic_sample_with_rng, systematic_sample_with_rng, IdentityWeight,
    PersistentFilter, Retain, SampleConfig, Slice,
};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;

proptest! {
    #[test]
    fn prop_random_permutation_is_valid(
        items in prop::collection::vec(0u32..1000, 0..60),
        seed in any::<u64>(),
        frac in 0.0f64..=1.0
    ) {
        let n = items.len();
        let k = ((n as f64) * frac).floor() as usize;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let it = random_permutation_with_rng(&items, Some(k), &mut rng).expect("k <= n");

        prop_assert_eq!(it.len(), k);
        let mut seen = HashSet::new();
        for &i in it.positions().iter() {
            prop_assert!(i < n);
            prop_assert!(seen.insert(i));
        }
    }

    #[test]
    fn prop_oversized_request_fails(
        items in prop::collection::vec(0u32..1000, 0..30),
        extra in 1usize..10
    ) {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let n = items.len();
        prop_assert!(random_permutation_with_rng(&items, Some(n + extra), &mut rng).is_err());
        prop_assert!(sorted(&items, Some(n + extra)).is_err());
        prop_assert!(random_permutation_with_rng(&items, Some(n), &mut rng).is_ok());
    }
}

proptest! {
    #[test]
    fn prop_sorted_is_non_decreasing(items in prop::collection::vec(-500i32..500, 0..60)) {
        let out: Vec<i32> = sorted(&items, None).expect("full sort").copied().collect();
        let mut expected = items.clone();
        expected.sort();
        prop_assert_eq!(out, expected);
    }

    #[test]
    fn prop_partial_sort_is_prefix_of_full_sort(
        items in prop::collection::vec(0u8..20, 0..60),
        frac in 0.0f64..=1.0
    ) {
        let k = ((items.len() as f64) * frac).floor() as usize;
        let full = sorted_by_key(&items, None, |x| *x).expect("full sort");
        let partial = sorted_by_key(&items, Some(k), |x| *x).expect("k <= n");
        prop_assert_eq!(partial.positions().as_slice(), &full.positions().as_slice()[..k]);
    }

    #[test]
    fn prop_source_index_round_trip(
        items in prop::collection::vec(any::<u16>(), 1..60),
        seed in any::<u64>()
    ) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut it = random_permutation_with_rng(&items, None, &mut rng).expect("full size");
        while let Some(item) = it.get() {
            let index = it.source_index().expect("not at end");
            prop_assert!(std::ptr::eq(item, &items[index]));
            it.next();
        }
    }

    #[test]
    fn prop_empty_range_yields_nothing(
        items in prop::collection::vec(any::<u16>(), 0..20),
        at in 0usize..20
    ) {
        let at = at.min(items.len());
        let empty = Slice::with_range(&items, at..at).expect("valid range");
        prop_assert_eq!(custom(empty, Vec::new()).expect("no positions").count(), 0);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        prop_assert_eq!(
            random_permutation_with_rng(empty, None, &mut rng).expect("k == n").count(),
            0
        );
    }
}

proptest! {
    #[test]
    fn prop_systematic_sample_size(
        weights in prop::collection::vec(1u32..50, 1..60),
        sample_size in 0usize..200,
        seed in any::<u64>()
    ) {
        // Integer weights keep the running total exact.
        let weights: Vec<f64> = weights.into_iter().map(f64::from).collect();
        let total: f64 = weights.iter().sum();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);

        let plain =
            systematic_sample_with_rng(&weights, sample_size, total, IdentityWeight, &mut rng);
        prop_assert_eq!(plain.count(), sample_size);

        let permuted = permuted_systematic_sample_with_rng(
            &weights,
            sample_size,
            total,
            IdentityWeight,
            &mut rng,
        );
        prop_assert_eq!(permuted.count(), sample_size);
    }

    #[test]
    fn prop_seeded_samples_are_deterministic(
        items in prop::collection::vec(0u32..1000, 1..80),
        sample_size in 0usize..120,
        seed in any::<u64>()
    ) {
        let config = SampleConfig::<f64>::new(sample_size).with_seed(seed).permuted(true);
        let a: Vec<u32> = config.build_uniform(&items).expect("valid").copied().collect();
        let b: Vec<u32> = config.build_uniform(&items).expect("valid").copied().collect();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_clones_agree_with_a_plain_filter(
        items in prop::collection::vec(0u32..100, 0..60),
        advance in 0usize..60
    ) {
        let keep = |x: &u32| x % 3 != 0;
        let expected: Vec<u32> = items.iter().copied().filter(|x| keep(x)).collect();

        let mut a = PersistentFilter::new(items.iter(), Retain(keep));
        let b = a.clone();
        let head: Vec<u32> = a.by_ref().take(advance).copied().collect();
        let rest: Vec<u32> = a.copied().collect();
        let all: Vec<u32> = b.copied().collect();

        prop_assert_eq!([head, rest].concat(), expected.clone());
        prop_assert_eq!(all, expected);
    }
}
