//! gfnlab-sieve — Grain Fineness Number computation for sieve analysis.
//!
//! `calculator` is pure arithmetic over six sieves; `report` and `chart`
//! turn its output into HTML, plain text and a PNG line chart.

pub mod calculator;
pub mod chart;
pub mod report;
pub mod rounding;

pub use calculator::{compute, ChartDataset, GfnReport, SieveRecord, WeightSample};
