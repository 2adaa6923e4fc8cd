//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, enums, and error types that form the vocabulary
//! of the analysis engines.

mod errors;
mod intensity;
mod weights;

pub use errors::{AnalysisError, AnalysisWarning, ErrorCode};
pub use intensity::Intensity;
pub use weights::{WeightVector, WEIGHT_SUM_TOLERANCE};
