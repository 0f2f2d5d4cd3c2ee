mod common;

use common::{init_tracing, w, weights};
use diealgebra::defs::{d2, d6};
use diealgebra::{Die, Error, Item, Outcome, Which};

#[test]
fn nested_dice_share_equal_mass() {
    init_tracing();
    // A coin flip between a d2 and a flat 5.
    let die = Die::new([Item::from(d2()), Item::from(5)]).unwrap();
    assert_eq!(weights(&die), vec![(1, 1), (2, 1), (5, 2)]);
    assert_eq!(die.denominator(), &w(4));
}

#[test]
fn nested_denominators_use_lcm() {
    let d3 = Die::numeric(3);
    let d4 = Die::numeric(4);
    let die = Die::new([d3, d4]).unwrap();
    assert_eq!(die.denominator(), &w(24));
    assert_eq!(weights(&die), vec![(1, 7), (2, 7), (3, 7), (4, 3)]);
}

#[test]
fn multiplicities_scale_items() {
    let die = Die::construct(vec![Item::from(1), Item::from(2)])
        .multiplicities(vec![3, 1])
        .call()
        .unwrap();
    assert_eq!(weights(&die), vec![(1, 3), (2, 1)]);

    let mismatch = Die::construct(vec![Item::from(1)])
        .multiplicities(vec![1, 2])
        .call();
    assert!(matches!(
        mismatch,
        Err(Error::MultiplicityMismatch {
            expected: 1,
            actual: 2
        })
    ));
}

#[test]
fn reroll_item_drops_mass() {
    let die = Die::new([Item::from(1), Item::Reroll, Item::from(3)]).unwrap();
    assert_eq!(weights(&die), vec![(1, 1), (3, 1)]);
}

#[test]
fn single_die_is_returned_as_is() {
    let d6 = d6();
    let same = Die::new([&d6]).unwrap();
    assert_eq!(same, d6);
    // Popping memoizes on the shared instance, so the remainder is reused.
    let (a, _, _) = d6.pop_min().unwrap();
    let (b, _, _) = same.pop_min().unwrap();
    assert!(a.equals(&b));
}

#[test]
fn zero_weights_are_kept() {
    let die = Die::from_weights([(1, 0u32), (2, 3)]);
    assert_eq!(die.len(), 2);
    assert_eq!(die.denominator(), &w(3));
    assert_ne!(die, Die::from_weights([(2, 3u32)]));
    assert_eq!(die.quantity(&Outcome::int(1)), w(0));
}

#[test]
fn simplify_is_idempotent() {
    let die = Die::from_weights([(1, 4u32), (2, 6), (3, 10)]);
    let once = die.simplify();
    assert_eq!(weights(&once), vec![(1, 2), (2, 3), (3, 5)]);
    assert_eq!(once.simplify(), once);
}

#[test]
fn reroll_renormalizes() {
    let die = d6().reroll(Which::outcomes([6]), None);
    assert_eq!(weights(&die), vec![(1, 1), (2, 1), (3, 1), (4, 1), (5, 1)]);
    assert_eq!(die.denominator(), &w(5));
}

#[test]
fn filter_is_complement_of_reroll() {
    let evens = d6().filter(Which::matching(|x| x.to_i64().is_some_and(|v| v % 2 == 0)), None);
    assert_eq!(weights(&evens), vec![(2, 1), (4, 1), (6, 1)]);
}

#[test]
fn truncate_and_clip() {
    let lo = Outcome::int(2);
    let hi = Outcome::int(4);
    let truncated = d6().truncate(Some(&lo), Some(&hi)).unwrap();
    assert_eq!(weights(&truncated), vec![(2, 1), (3, 1), (4, 1)]);

    let clipped = d6().clip(Some(&lo), Some(&hi)).unwrap();
    assert_eq!(weights(&clipped), vec![(2, 2), (3, 1), (4, 3)]);
    assert_eq!(clipped.denominator(), d6().denominator());

    assert!(d6().truncate(Some(&Outcome::int(7)), None).unwrap().is_empty());
}

#[test]
fn one_sided_bounds() {
    let three = Outcome::int(3);
    let above = d6().truncate(Some(&three), None).unwrap();
    assert_eq!(weights(&above), vec![(3, 1), (4, 1), (5, 1), (6, 1)]);
    let below = d6().truncate(None, Some(&three)).unwrap();
    assert_eq!(weights(&below), vec![(1, 1), (2, 1), (3, 1)]);

    let capped = d6().clip(None, Some(&Outcome::int(4))).unwrap();
    assert_eq!(weights(&capped), vec![(1, 1), (2, 1), (3, 1), (4, 3)]);
    let floored = d6().clip(Some(&Outcome::int(5)), None).unwrap();
    assert_eq!(weights(&floored), vec![(5, 5), (6, 1)]);

    assert_eq!(d6().truncate(None, None).unwrap(), d6());
}

#[test]
fn bounds_must_be_comparable() {
    let text = Outcome::from("a");
    assert!(matches!(
        d6().truncate(Some(&text), None),
        Err(Error::IncompatibleOutcomes { op: "truncate", .. })
    ));
    assert!(matches!(
        d6().clip(None, Some(&text)),
        Err(Error::IncompatibleOutcomes { op: "clip", .. })
    ));
    // Booleans bound numbers as 0 and 1.
    let clipped = d6().clip(None, Some(&Outcome::Bool(true))).unwrap();
    assert_eq!(clipped.len(), 1);
    assert_eq!(clipped.quantity(&Outcome::int(1)), w(6));
}

#[test]
fn bounded_reroll_of_selected_outcomes() {
    // Up to two rerolls of a 1 on a d4: the 1 survives only as (1/4)^3.
    let die = Die::numeric(4).reroll(Which::outcomes([1]), Some(2));
    assert_eq!(weights(&die), vec![(1, 1), (2, 21), (3, 21), (4, 21)]);
    assert_eq!(die.denominator(), &w(64));
}

#[test]
fn bounded_filter() {
    // Keep 5 or 6, otherwise reroll once and take what comes.
    let die = d6().filter(Which::outcomes([5, 6]), Some(1));
    assert_eq!(
        weights(&die),
        vec![(1, 4), (2, 4), (3, 4), (4, 4), (5, 10), (6, 10)]
    );
    assert_eq!(die.denominator(), &w(36));
}

#[test]
fn booleans_merge_with_integers() {
    let die = Die::new([Item::from(true), Item::from(1), Item::from(0)]).unwrap();
    assert_eq!(die.len(), 2);
    assert_eq!(die.quantity(&Outcome::int(1)), w(2));
    assert_eq!(die.quantity(&Outcome::Bool(false)), w(1));

    let coin = Die::uniform([false, true]);
    let no_ones = coin.reroll(Which::outcomes([1]), None);
    assert_eq!(no_ones.outcomes(), &[Outcome::Bool(false)]);
}

#[test]
fn statistics() {
    let die = d6();
    assert_eq!(die.mean().unwrap(), num::BigRational::new(7.into(), 2.into()));
    assert_eq!(die.variance().unwrap(), num::BigRational::new(35.into(), 12.into()));
    assert_eq!(
        die.probability(&Outcome::int(3)),
        num::BigRational::new(1.into(), 6.into())
    );
    assert_eq!(die.modes().len(), 6);
    assert!(matches!(Die::empty().mean(), Err(Error::EmptyDie)));
}

#[test]
fn sampling_stays_in_support() {
    let die = Die::from_weights([(1, 0u32), (2, 1), (3, 1)]);
    let mut rng = rand::thread_rng();
    for _ in 0..100 {
        let x = die.sample_rng(&mut rng).unwrap();
        assert_ne!(x, &Outcome::int(1));
    }
    assert!(Die::empty().sample().is_err());
}
