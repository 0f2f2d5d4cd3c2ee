mod common;

use common::{init_tracing, weights};
use diealgebra::defs::{d4, d6};
use diealgebra::{Die, Error, Outcome, Tie};
use itertools::Itertools;

/// Sums sorted positions `start..stop` over every roll of `n` dice.
fn brute_force(die: &Die, n: usize, start: usize, stop: usize) -> Die {
    let rolls = (0..n)
        .map(|_| die.outcomes().iter().map(|o| o.to_i64().unwrap()))
        .multi_cartesian_product()
        .map(|mut roll| {
            roll.sort_unstable();
            roll[start..stop].iter().sum::<i64>()
        });
    Die::uniform(rolls)
}

#[test]
fn lowest_matches_brute_force() {
    init_tracing();
    let d6 = d6();
    for n in 1..=4 {
        assert_eq!(d6.lowest(n, 1, 0).unwrap(), brute_force(&d6, n as usize, 0, 1), "n = {n}");
    }
}

#[test]
fn highest_matches_brute_force() {
    let d6 = d6();
    for n in 1..=4 {
        let k = n as usize;
        assert_eq!(d6.highest(n, 1, 0).unwrap(), brute_force(&d6, k, k - 1, k), "n = {n}");
    }
}

#[test]
fn multi_keep_goes_through_pool() {
    let d4 = d4();
    assert_eq!(d4.highest(4, 3, 0).unwrap(), brute_force(&d4, 4, 1, 4));
    assert_eq!(d4.lowest(4, 2, 1).unwrap(), brute_force(&d4, 4, 1, 3));
    assert_eq!(d4.highest(3, 1, 1).unwrap(), brute_force(&d4, 3, 1, 2));
}

#[test]
fn middle_of_odd_and_even() {
    let d4 = d4();
    assert_eq!(d4.middle(3, 1, Tie::Error).unwrap(), brute_force(&d4, 3, 1, 2));
    assert_eq!(d4.middle(4, 1, Tie::Low).unwrap(), brute_force(&d4, 4, 1, 2));
    assert_eq!(d4.middle(4, 1, Tie::High).unwrap(), brute_force(&d4, 4, 2, 3));
    assert!(matches!(
        d4.middle(4, 1, Tie::Error),
        Err(Error::MiddleTie { rolls: 4, keep: 1 })
    ));
}

#[test]
fn keep_nothing_is_zero() {
    let d6 = d6();
    assert_eq!(weights(&d6.lowest(0, 1, 0).unwrap()), vec![(0, 1)]);
    assert_eq!(weights(&d6.highest(3, 0, 0).unwrap()), vec![(0, 1)]);
    assert_eq!(weights(&d6.lowest(2, 1, 5).unwrap()), vec![(0, 1)]);
}

#[test]
fn lowest_keeps_zero_weight_outcomes() {
    let die = Die::from_weights([(1, 1u32), (2, 0), (3, 1)]);
    let low = die.lowest(2, 1, 0).unwrap();
    assert_eq!(low.outcomes().len(), 3);
    assert_eq!(low.quantity(&Outcome::int(2)), 0u32.into());
    assert_eq!(weights(&low), vec![(1, 3), (2, 0), (3, 1)]);
}

#[test]
fn mixed_pool_sum() {
    let pool = diealgebra::Pool::new([(Die::numeric(4), 2), (Die::numeric(6), 1)]);
    let all = pool.clone().sum().unwrap();
    let expected = (Die::numeric(4).sum_all(2).unwrap() + Die::numeric(6)).unwrap();
    assert_eq!(all, expected);

    let top_two = pool.keep_range(1..3).sum().unwrap();
    let brute = [Die::numeric(4), Die::numeric(4), Die::numeric(6)]
        .iter()
        .map(|d| d.outcomes().iter().map(|o| o.to_i64().unwrap()).collect::<Vec<_>>())
        .multi_cartesian_product()
        .map(|mut roll| {
            roll.sort_unstable();
            roll[1] + roll[2]
        });
    assert_eq!(top_two, Die::uniform(brute));
}
