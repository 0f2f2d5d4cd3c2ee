use crate::Die;

/// A fair die numbered `1..=sides`.
#[must_use]
pub fn d(sides: i64) -> Die {
    Die::numeric(sides)
}

#[must_use]
pub fn d2() -> Die {
    d(2)
}

#[must_use]
pub fn d3() -> Die {
    d(3)
}

#[must_use]
pub fn d4() -> Die {
    d(4)
}

#[must_use]
pub fn d6() -> Die {
    d(6)
}

#[must_use]
pub fn d8() -> Die {
    d(8)
}

#[must_use]
pub fn d10() -> Die {
    d(10)
}

#[must_use]
pub fn d12() -> Die {
    d(12)
}

#[must_use]
pub fn d20() -> Die {
    d(20)
}

#[must_use]
pub fn d100() -> Die {
    d(100)
}

/// A die showing `true` with weight `numer` out of `denom`.
#[must_use]
pub fn coin(numer: u32, denom: u32) -> Die {
    Die::from_weights([(false, denom.saturating_sub(numer)), (true, numer.min(denom))])
}
