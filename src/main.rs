// SPDX-License-Identifier: MIT OR Apache-2.0

use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use streamgate::core::{ConnectorConfig, SourceValidationGate, StreamDefinition};

/// Validate a Kafka-sourced stream definition against its live cluster
#[derive(Parser, Debug)]
#[command(name = "streamgate", version)]
struct Cli {
    /// Connector configuration file (.toml, .yaml or .yml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Stream definition to validate (JSON)
    #[arg(short, long)]
    definition: PathBuf,

    /// Already registered stream definitions (JSON), may be repeated
    #[arg(long)]
    known: Vec<PathBuf>,
}

fn read_definition(path: &Path) -> Result<StreamDefinition, String> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    serde_json::from_str(&contents).map_err(|e| format!("Invalid definition {}: {}", path.display(), e))
}

fn run(cli: Cli) -> Result<ExitCode, String> {
    let config = match &cli.config {
        Some(path) => ConnectorConfig::from_file(path).map_err(|e| e.to_string())?,
        None => ConnectorConfig::default(),
    };
    let gate = SourceValidationGate::kafka(config).map_err(|e| e.to_string())?;

    let mut definition = read_definition(&cli.definition)?;
    let known = cli
        .known
        .iter()
        .map(|path| read_definition(path))
        .collect::<Result<Vec<_>, _>>()?;

    match gate.validate(&mut definition, &known) {
        Ok(()) => {
            let rendered = serde_json::to_string_pretty(&definition).map_err(|e| e.to_string())?;
            println!("{}", rendered);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("{}: {}", e.kind(), e);
            Ok(ExitCode::from(2))
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();

    match run(Cli::parse()) {
        Ok(code) => code,
        Err(message) => {
            eprintln!("error: {}", message);
            ExitCode::FAILURE
        }
    }
}
