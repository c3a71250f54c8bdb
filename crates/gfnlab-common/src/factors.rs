//! Sieve factor set for the Grain Fineness Number computation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of sieves in one sieve-analysis stack.
pub const SIEVE_COUNT: usize = 6;

/// The sieve mesh numbers, in display order.
/// Always exactly [`SIEVE_COUNT`] positive, finite values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct SieveFactors([f64; SIEVE_COUNT]);

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FactorError {
    #[error("expected {SIEVE_COUNT} sieve factors, got {0}")]
    WrongCount(usize),

    #[error("sieve factor #{position} must be a positive number, got {value}")]
    NotPositive { position: usize, value: f64 },
}

impl Default for SieveFactors {
    /// Standard AFS sieve multipliers.
    fn default() -> Self {
        Self([3.0, 10.0, 20.0, 40.0, 70.0, 140.0])
    }
}

impl SieveFactors {
    pub fn new(factors: [f64; SIEVE_COUNT]) -> Result<Self, FactorError> {
        for (i, &f) in factors.iter().enumerate() {
            if !(f.is_finite() && f > 0.0) {
                return Err(FactorError::NotPositive { position: i + 1, value: f });
            }
        }
        Ok(Self(factors))
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().copied()
    }
}

impl TryFrom<Vec<f64>> for SieveFactors {
    type Error = FactorError;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        let arr: [f64; SIEVE_COUNT] = values
            .as_slice()
            .try_into()
            .map_err(|_| FactorError::WrongCount(values.len()))?;
        Self::new(arr)
    }
}

impl From<SieveFactors> for Vec<f64> {
    fn from(factors: SieveFactors) -> Self {
        factors.0.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_factors_in_display_order() {
        let f = SieveFactors::default();
        assert_eq!(f.iter().collect::<Vec<_>>(), vec![3.0, 10.0, 20.0, 40.0, 70.0, 140.0]);
    }

    #[test]
    fn test_try_from_rejects_wrong_length() {
        let err = SieveFactors::try_from(vec![3.0, 10.0]).unwrap_err();
        assert_eq!(err, FactorError::WrongCount(2));
    }

    #[test]
    fn test_rejects_non_positive() {
        let err = SieveFactors::new([3.0, 0.0, 20.0, 40.0, 70.0, 140.0]).unwrap_err();
        assert_eq!(err, FactorError::NotPositive { position: 2, value: 0.0 });
        assert!(SieveFactors::new([3.0, 10.0, f64::NAN, 40.0, 70.0, 140.0]).is_err());
    }

    #[test]
    fn test_yaml_list_roundtrip() {
        let yaml = serde_yaml::to_string(&SieveFactors::default()).unwrap();
        let parsed: SieveFactors = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, SieveFactors::default());
        assert!(serde_yaml::from_str::<SieveFactors>("[1, 2, 3]").is_err());
    }
}
