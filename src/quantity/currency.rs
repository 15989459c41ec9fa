use std::ops::Mul;

use crate::quantity::{
    distance::Kilometers,
    ratios::{Multiplier, Percentage},
};

quantity!(
    /// Moroccan dirham, the currency every quote is issued in.
    Dirhams, via: f64, suffix: "MAD", precision: 2
);

quantity!(
    /// Dirhams per kilometer travelled.
    KilometerRate, via: f64, suffix: "MAD/km", precision: 2
);

implement_mul!(KilometerRate, Kilometers, Dirhams);

impl Mul<Multiplier> for Dirhams {
    type Output = Self;

    fn mul(self, multiplier: Multiplier) -> Self::Output {
        Self(self.0 * multiplier.0)
    }
}

impl Mul<Percentage> for Dirhams {
    type Output = Self;

    /// Take the percentage of the amount.
    fn mul(self, percentage: Percentage) -> Self::Output {
        Self(self.0 * percentage.to_ratio())
    }
}
