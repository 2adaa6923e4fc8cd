//! JSON-in/JSON-out driver for the analysis engines.
//!
//! Reads an [`AnalysisRequest`] document, runs the orchestrator with the
//! supplied configuration, and returns an [`AnalysisResponse`] ready to be
//! serialized.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::{AnalysisConfig, ConfigError, LoggingConfig};
use crate::domain::analysis::{
    CriteriaScoreMatrix, McdaAnalyzer, McdaResult, MethodComparison, PairwiseComparisons,
    ScoreRange, WeightSource,
};
use crate::domain::foundation::{AnalysisError, WeightVector};

/// Errors surfaced by the command-line driver.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("usage: mcda-engine <request.json>")]
    Usage,

    #[error("Failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Request supplies both comparisons and weights; pick one")]
    ConflictingWeightSources,

    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

/// One analysis request.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnalysisRequest {
    pub alternatives: Vec<String>,
    pub criteria: Vec<String>,
    /// One row per alternative, one column per criterion.
    pub scores: Vec<Vec<f64>>,
    #[serde(default)]
    pub ranges: Option<Vec<ScoreRange>>,
    #[serde(default)]
    pub comparisons: Option<PairwiseComparisons>,
    #[serde(default)]
    pub weights: Option<WeightVector>,
    #[serde(default)]
    pub compare_methods: bool,
}

impl AnalysisRequest {
    /// Reads and parses a request file.
    pub fn from_path(path: &Path) -> Result<Self, CliError> {
        let raw = std::fs::read_to_string(path).map_err(|source| CliError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Weight source implied by the request; equal weights when none is given.
    pub fn weight_source(&self) -> Result<WeightSource, CliError> {
        match (&self.comparisons, &self.weights) {
            (Some(_), Some(_)) => Err(CliError::ConflictingWeightSources),
            (Some(comparisons), None) => Ok(WeightSource::Pairwise(comparisons.clone())),
            (None, Some(weights)) => Ok(WeightSource::Direct(weights.clone())),
            (None, None) => Ok(WeightSource::Direct(WeightVector::equal(
                self.criteria.len(),
            )?)),
        }
    }

    /// Validated score matrix.
    pub fn matrix(&self) -> Result<CriteriaScoreMatrix, AnalysisError> {
        CriteriaScoreMatrix::with_ranges(
            self.alternatives.clone(),
            self.criteria.clone(),
            self.scores.clone(),
            self.ranges.clone(),
        )
    }
}

/// Output document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResponse {
    pub analysis: McdaResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<MethodComparison>,
}

/// Runs one request.
pub fn run(request: &AnalysisRequest, config: AnalysisConfig) -> Result<AnalysisResponse, CliError> {
    let matrix = request.matrix()?;
    let source = request.weight_source()?;
    let analyzer = McdaAnalyzer::new(config)?;

    let analysis = analyzer.comprehensive_analysis(&matrix, &source)?;

    let comparison = if request.compare_methods {
        let weights = WeightVector::from_raw(
            matrix
                .criterion_ids()
                .iter()
                .map(|id| analysis.weights.get(id).copied().unwrap_or(0.0))
                .collect(),
        )?;
        Some(analyzer.compare_methods(&matrix, &weights)?)
    } else {
        None
    };

    info!(
        best = analysis.best().unwrap_or(""),
        compared = comparison.is_some(),
        "Request processed"
    );

    Ok(AnalysisResponse {
        analysis,
        comparison,
    })
}

/// Installs the global subscriber. Logs go to stderr so stdout carries only
/// the JSON document. Returns false if a subscriber was already installed.
pub fn init_tracing(logging: &LoggingConfig) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if logging.json {
        builder.json().try_init().is_ok()
    } else {
        builder.try_init().is_ok()
    }
}

/// Reads a request file and runs it.
pub fn run_file(path: &Path, config: AnalysisConfig) -> Result<AnalysisResponse, CliError> {
    let request = AnalysisRequest::from_path(path)?;
    run(&request, config)
}
