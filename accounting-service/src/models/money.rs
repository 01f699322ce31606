//! Money helpers. Amounts are stored as plain numeric doubles; arithmetic
//! that can introduce sub-paisa noise (percentage commissions) is rounded
//! back to two decimal places before persisting.

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_to_paise() {
        assert_eq!(round2(100.0 / 3.0), 33.33);
        assert_eq!(round2(2.5 * 150000.0 / 100.0), 3750.0);
        assert_eq!(round2(16.666666), 16.67);
    }
}
