mod common;

use common::{init_tracing, w, weights};
use diealgebra::defs::{d3, d6};
use diealgebra::ops::BinaryOp;
use diealgebra::{Die, Error, Outcome};

fn truth(die: &Die) -> (u64, u64) {
    let count = |b: bool| {
        num::ToPrimitive::to_u64(&die.quantity(&Outcome::Bool(b))).unwrap_or_default()
    };
    (count(false), count(true))
}

#[test]
fn d3_less_than_d3() {
    init_tracing();
    let lt = d3().lt(d3()).unwrap();
    assert_eq!(truth(&lt), (6, 3));
    assert_eq!(lt.denominator(), &w(9));
}

#[test]
fn merge_matches_elementwise_operator() {
    let a = Die::from_weights([(1, 2u32), (2, 1), (4, 3), (6, 1)]);
    let b = Die::from_weights([(0, 1u32), (2, 2), (4, 1), (7, 2)]);
    let cases = [
        (a.lt(&b).unwrap(), BinaryOp::Lt),
        (a.le(&b).unwrap(), BinaryOp::Le),
        (a.gt(&b).unwrap(), BinaryOp::Gt),
        (a.ge(&b).unwrap(), BinaryOp::Ge),
    ];
    for (merged, op) in cases {
        assert_eq!(truth(&merged), truth(&a.binary(op, &b).unwrap()), "{op:?}");
    }
    assert_eq!(truth(&a.eq_to(&b)), truth(&a.binary(BinaryOp::Eq, &b).unwrap()));
    assert_eq!(truth(&a.ne_to(&b)), truth(&a.binary(BinaryOp::Ne, &b).unwrap()));
}

#[test]
fn certain_results_omit_empty_bucket() {
    let low = Die::uniform([1, 2]);
    let high = Die::uniform([3, 4]);
    let lt = low.lt(&high).unwrap();
    assert_eq!(lt.outcomes(), &[Outcome::Bool(true)]);
    let ge = low.ge(&high).unwrap();
    assert_eq!(ge.outcomes(), &[Outcome::Bool(false)]);
    let eq = low.eq_to(&high);
    assert_eq!(eq.outcomes(), &[Outcome::Bool(false)]);
    assert_eq!(eq.denominator(), &w(4));
}

#[test]
fn equality_truth_is_structural() {
    let same = Die::scalar(1).eq_to(Die::scalar(1));
    assert!(same.truth());
    assert_eq!(truth(&same), (0, 1));

    let differ = Die::uniform([1, 2]).eq_to(Die::uniform([1, 3]));
    assert!(!differ.truth());
    assert_eq!(truth(&differ), (3, 1));

    let ne = Die::uniform([1, 2]).ne_to(Die::uniform([1, 3]));
    assert!(ne.truth());
    assert_eq!(truth(&ne), (1, 3));
}

#[test]
fn truth_ignores_probabilities() {
    // Same distribution, different weights: equal in probability, not in structure.
    let a = Die::uniform([1, 2]);
    let b = Die::from_weights([(1, 2u32), (2, 2)]);
    let eq = a.eq_to(&b);
    assert!(!eq.truth());
    assert_eq!(truth(&eq), (4, 4));
    assert!(a.eq_to(&a).truth());
}

#[test]
fn equality_result_composes() {
    let hits = d6().eq_to(6);
    // Booleans add as integers.
    let sixes = (&*hits + &*hits).unwrap();
    assert_eq!(weights(&sixes), vec![(0, 25), (1, 10), (2, 1)]);
    assert_eq!(Die::from(hits).len(), 2);
}

#[test]
fn compare_omits_zero_buckets() {
    let cmp = Die::uniform([1, 2]).compare(Die::uniform([1, 2])).unwrap();
    assert_eq!(
        cmp.outcomes(),
        &[Outcome::int(-1), Outcome::int(0), Outcome::int(1)]
    );
    assert_eq!(cmp.quantities().to_vec(), vec![w(1), w(2), w(1)]);

    let above = Die::scalar(5).compare(d3()).unwrap();
    assert_eq!(above.outcomes(), &[Outcome::int(1)]);
    assert!(Die::empty().compare(d3()).unwrap().is_empty());
}

#[test]
fn booleans_compare_as_zero_and_one() {
    let hits: Die = d6().eq_to(6).into();
    let one = Die::scalar(1);
    let cases = [
        (hits.lt(&one).unwrap(), BinaryOp::Lt),
        (hits.le(&one).unwrap(), BinaryOp::Le),
        (hits.gt(&one).unwrap(), BinaryOp::Gt),
        (hits.ge(&one).unwrap(), BinaryOp::Ge),
    ];
    for (merged, op) in cases {
        assert_eq!(truth(&merged), truth(&hits.binary(op, &one).unwrap()), "{op:?}");
    }
    assert_eq!(truth(&hits.lt(1).unwrap()), (1, 5));
    assert_eq!(truth(&hits.eq_to(1)), (5, 1));
    assert_eq!(truth(&hits.eq_to(1)), truth(&hits.binary(BinaryOp::Eq, 1).unwrap()));
    assert_eq!(
        weights(&hits.compare(1).unwrap()),
        vec![(-1, 5), (0, 1)]
    );
}

#[test]
fn ordering_text_against_numbers_fails() {
    let text = Die::uniform(["a", "b"]);
    assert!(matches!(text.lt(d6()), Err(Error::IncompatibleOutcomes { .. })));
    assert!(matches!(text.ge(d6()), Err(Error::IncompatibleOutcomes { .. })));
    assert!(matches!(text.compare(d6()), Err(Error::IncompatibleOutcomes { .. })));
    assert!(text.binary(BinaryOp::Lt, d6()).is_err());

    // Text orders among itself.
    assert_eq!(truth(&text.lt("b").unwrap()), (1, 1));
    // Equality across kinds is just false, as elementwise.
    let eq = text.eq_to(d6());
    assert_eq!(truth(&eq), (12, 0));
    assert_eq!(truth(&eq), truth(&text.binary(BinaryOp::Eq, d6()).unwrap()));
}
