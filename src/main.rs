use std::path::PathBuf;
use std::process::ExitCode;

use tracing::error;

use mcda_engine::cli::{self, CliError};
use mcda_engine::config::AnalysisConfig;

fn main() -> ExitCode {
    match try_main() {
        Ok(()) => ExitCode::SUCCESS,
        Err(CliError::Usage) => {
            eprintln!("{}", CliError::Usage);
            ExitCode::from(2)
        }
        Err(e) => {
            error!(error = %e, "Analysis failed");
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn try_main() -> Result<(), CliError> {
    // install logging even when the configuration fails to load
    let loaded = AnalysisConfig::load();
    let logging = loaded
        .as_ref()
        .map(|config| config.logging.clone())
        .unwrap_or_default();
    cli::init_tracing(&logging);
    let config = loaded?;

    let path: PathBuf = std::env::args_os().nth(1).ok_or(CliError::Usage)?.into();
    let response = cli::run_file(&path, config)?;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
