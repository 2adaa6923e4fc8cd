//! Domain layer containing the analysis engines and their vocabulary.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (weights, Saaty intensities, errors)
//! - `analysis` - Pure engines for decision analysis (AHP, ELECTRE, sensitivity)

pub mod analysis;
pub mod foundation;
