//! MCDA Engine - Multi-criteria decision analysis
//!
//! This crate turns a matrix of per-alternative, per-criterion scores and
//! optional stakeholder pairwise judgments into rankings with a quantified
//! robustness estimate: AHP weight elicitation, ELECTRE outranking, and
//! Monte Carlo sensitivity analysis.

pub mod cli;
pub mod config;
pub mod domain;
