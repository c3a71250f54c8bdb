//! Grain Fineness Number computation.
//!
//! P_i  = W_i / ΣW × 100
//! PF_i = round(P_i × F_i, 2)
//! GFN  = round(round(Σ PF_i, 2) / 100, 2)

use serde::Serialize;

use gfnlab_common::error::{GfnError, Result};
use gfnlab_common::factors::{SieveFactors, SIEVE_COUNT};

use crate::rounding::round2;

/// Parsed retained weights, one per sieve, in grams.
/// Negative values are not rejected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeightSample([f64; SIEVE_COUNT]);

impl WeightSample {
    pub fn as_array(&self) -> [f64; SIEVE_COUNT] {
        self.0
    }

    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }
}

/// One row of the observation table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SieveRecord {
    pub factor: f64,
    pub weight: f64,
    /// Percentage retained, rounded to 2 places
    pub percentage: f64,
    /// P × F, computed from the unrounded percentage
    pub weighted_product: f64,
}

/// Sieve numbers against percentage retained, for plotting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDataset {
    pub sieves: Vec<f64>,
    pub percentages: Vec<f64>,
}

impl ChartDataset {
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.sieves.iter().copied().zip(self.percentages.iter().copied())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GfnReport {
    pub total_weight: f64,
    pub records: Vec<SieveRecord>,
    /// Σ(P × F), rounded to 2 places
    pub total_pf: f64,
    pub gfn: f64,
    pub chart: ChartDataset,
}

/// Parse the six raw form fields.
///
/// An empty field counts as 0 g. Anything else must be a finite number
/// once surrounding whitespace is trimmed; a blank-but-not-empty field is
/// rejected.
pub fn parse_weights<S: AsRef<str>>(inputs: &[S; SIEVE_COUNT]) -> Result<WeightSample> {
    let mut weights = [0.0; SIEVE_COUNT];
    for (i, raw) in inputs.iter().enumerate() {
        weights[i] = parse_weight(i + 1, raw.as_ref())?;
    }
    Ok(WeightSample(weights))
}

fn parse_weight(position: usize, raw: &str) -> Result<f64> {
    if raw.is_empty() {
        return Ok(0.0);
    }
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|w| w.is_finite())
        .ok_or_else(|| GfnError::Parse { position, value: raw.to_string() })
}

/// Compute the full report for an already-parsed sample.
pub fn compute_sample(sample: &WeightSample, factors: &SieveFactors) -> Result<GfnReport> {
    let weights = sample.as_array();
    let total_weight = sample.total();

    if total_weight == 0.0 {
        return Err(GfnError::ZeroWeight);
    }

    let records: Vec<SieveRecord> = weights
        .iter()
        .zip(factors.iter())
        .map(|(&weight, factor)| {
            let p = (weight / total_weight) * 100.0;
            SieveRecord {
                factor,
                weight,
                percentage: round2(p),
                weighted_product: round2(p * factor),
            }
        })
        .collect();

    let total_pf = round2(records.iter().map(|r| r.weighted_product).sum());
    let gfn = round2(total_pf / 100.0);

    let chart = ChartDataset {
        sieves: factors.iter().collect(),
        percentages: records.iter().map(|r| r.percentage).collect(),
    };

    tracing::debug!(total_weight, total_pf, gfn, "GFN computed");

    Ok(GfnReport { total_weight, records, total_pf, gfn, chart })
}

/// Parse the raw inputs and compute the report.
pub fn compute<S: AsRef<str>>(inputs: &[S; SIEVE_COUNT], factors: &SieveFactors) -> Result<GfnReport> {
    let sample = parse_weights(inputs)?;
    compute_sample(&sample, factors)
}
