//! gfnlab-web — Web front end for GFN Lab.
//! Provides:
//!   - Experiment catalog page
//!   - Sieve analysis form with step-by-step GFN report and chart
//!   - Optional email delivery of the report

pub mod error;
pub mod handlers;
pub mod notify;
pub mod router;
pub mod state;
pub mod templates;
