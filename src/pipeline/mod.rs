//! Pipeline module - orchestrates the analysis stages

pub mod correlation;
pub mod features;
pub mod loader;
pub mod normalize;
pub mod profile;
pub mod sample;

pub use correlation::*;
pub use features::*;
pub use loader::*;
pub use normalize::*;
pub use profile::*;
pub use sample::*;
