use std::ops::Mul;

quantity!(
    /// Dimensionless factor applied to an amount.
    Multiplier, via: f64, suffix: "×", precision: 2
);

quantity!(Percentage, via: f64, suffix: "%", precision: 0);

impl Multiplier {
    pub const ONE: Self = Self(1.0);
}

impl Mul for Multiplier {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Self(self.0 * rhs.0)
    }
}

impl Percentage {
    /// Convert the percentage into a ratio, so that `100%` becomes `1.0`.
    pub const fn to_ratio(self) -> f64 {
        0.01 * self.0
    }
}
