//! Fraudsight: PaySim Fraud Analysis Library
//!
//! A library for profiling simulated mobile money ledgers, engineering
//! balance-consistency features, and training a random forest fraud baseline.

pub mod cli;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod utils;
