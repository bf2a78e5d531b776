//! Approximate numeric equality.
//!
//! Binary floating-point results are never compared with plain `==`; every approximate check goes
//! through an explicit [`Tolerance`].

/// Default absolute tolerance for approximate equality.
pub const DEFAULT_EPSILON: f64 = 1e-9;

/// Policy deciding whether two floats are "the same".
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tolerance {
    /// `|a - b| < eps`.
    Absolute(f64),
    /// The difference rounds to zero at `n` decimal places (unittest's `assertAlmostEqual`).
    Places(u32),
}

impl Default for Tolerance {
    fn default() -> Self {
        Tolerance::Absolute(DEFAULT_EPSILON)
    }
}

impl Tolerance {
    /// Check whether `actual` and `expected` are equal under this policy.
    ///
    /// ## Parameters
    /// - `actual`: computed value.
    /// - `expected`: reference value.
    ///
    /// ## Returns
    /// - (`bool`): whether the two values are equal within tolerance.
    ///
    /// ## Notes
    /// - Identical infinities are equal (their difference is NaN, so they are checked first).
    /// - NaN is never approximately equal to anything, including NaN.
    pub fn admits(self, actual: f64, expected: f64) -> bool {
        if actual.is_nan() || expected.is_nan() {
            return false;
        }
        if actual.is_infinite() || expected.is_infinite() {
            return actual.is_infinite()
                && expected.is_infinite()
                && actual.is_sign_positive() == expected.is_sign_positive();
        }
        let diff = (actual - expected).abs();
        match self {
            Tolerance::Absolute(eps) => diff < eps,
            Tolerance::Places(places) => {
                let scale = 10f64.powi(places.min(i32::MAX as u32) as i32);
                (diff * scale).round() == 0.0
            }
        }
    }

    /// Human description used in failure messages (`"within 1e-9"`).
    pub fn describe(self) -> String {
        match self {
            Tolerance::Absolute(eps) => format!("within {eps:e}"),
            Tolerance::Places(places) => format!("within {places} places"),
        }
    }
}
