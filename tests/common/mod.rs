#![allow(dead_code)]

use diealgebra::{Die, Outcome, Weight};
use num::ToPrimitive;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "diealgebra=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}

pub fn weights(die: &Die) -> Vec<(i64, u64)> {
    die.iter()
        .map(|(o, w)| {
            (
                o.to_i64().expect("integer outcome"),
                w.to_u64().expect("small weight"),
            )
        })
        .collect()
}

pub fn w(x: u64) -> Weight {
    Weight::from(x)
}

pub fn int(x: i64) -> Outcome {
    Outcome::int(x)
}
