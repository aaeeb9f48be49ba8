//! Reduced-overs market settlement rules
//!
//! This module implements the evaluation pipeline:
//! 1. Resolving a request into a match context
//! 2. Running each catalog rule against the context
//! 3. Applying the goes-on carve-out
//! 4. Rendering verdicts as report lines

pub mod context;
pub mod verdict;
pub mod catalog;
pub mod goes_on;
pub mod evaluator;
pub mod outputs;

pub use context::*;
pub use verdict::*;
pub use catalog::*;
pub use goes_on::*;
pub use evaluator::*;
pub use outputs::*;
