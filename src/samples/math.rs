use tally_core::TallyError;

/// Add two integers, wrapping on overflow.
pub fn add(a: i64, b: i64) -> i64 {
    a.wrapping_add(b)
}

/// Divide `a` by `b`.
///
/// ## Returns
/// - (`Result<f64, TallyError>`): the quotient, or `ZeroDivisionError: division by zero`.
pub fn divide(a: f64, b: f64) -> Result<f64, TallyError> {
    if b == 0.0 {
        return Err(TallyError::zero_division());
    }
    Ok(a / b)
}
