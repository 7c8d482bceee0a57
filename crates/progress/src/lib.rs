//! Progress tracking
//!
//! Bounded progress counter, remaining-time estimation, and the tracker that
//! ties them to a clock.

#![warn(missing_docs)]

pub mod counter;
pub mod estimator;
pub mod tracker;

pub use counter::{smooth, ProgressCounter, Sample};
pub use estimator::{Eta, EtaEstimator};
pub use tracker::{ProgressSnapshot, ProgressTracker};
