//! OpenAPI schema CLI
//!
//! Command-line interface for checking and canonicalizing schema objects.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use oas_schema::{load_schema, to_json_string, EncodeOptions, SchemaError};

#[derive(Parser)]
#[command(name = "oas-schema")]
#[command(about = "Check and canonicalize OpenAPI schema objects")]
#[command(version)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a schema file and report whether it is valid
    Check {
        /// Schema file
        schema: PathBuf,

        /// Output results as JSON (for automation)
        #[arg(long)]
        json: bool,
    },

    /// Decode a schema file and write it back with canonical member order
    Canonicalize {
        /// Schema file
        schema: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },
}

/// Machine-readable result of `check --json`.
#[derive(Serialize)]
struct CheckReport {
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Check { schema, json } => run_check(&schema, json),
        Commands::Canonicalize {
            schema,
            output,
            pretty,
        } => run_canonicalize(&schema, output, pretty),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

fn run_check(path: &Path, json_output: bool) -> Result<(), u8> {
    match load_schema(path) {
        Ok(schema) => {
            tracing::info!(kind = schema.kind_name(), "schema is valid");
            if json_output {
                print_report(&CheckReport {
                    valid: true,
                    kind: Some(schema.kind_name()),
                    path: None,
                    error: None,
                });
            } else {
                println!("Valid {} schema", schema.kind_name());
            }
            Ok(())
        }
        Err(e) => {
            if json_output {
                print_report(&CheckReport {
                    valid: false,
                    kind: None,
                    path: e.path().map(|p| if p.is_empty() { "/" } else { p }.to_string()),
                    error: Some(e.to_string()),
                });
            } else {
                eprintln!("Error: {}", e);
            }
            Err(e.exit_code() as u8)
        }
    }
}

fn print_report(report: &CheckReport) {
    match serde_json::to_string(report) {
        Ok(line) => println!("{}", line),
        Err(e) => eprintln!("Error serializing report: {}", e),
    }
}

fn run_canonicalize(path: &Path, output: Option<PathBuf>, pretty: bool) -> Result<(), u8> {
    let schema = load_schema(path).map_err(report)?;

    let options = EncodeOptions::new().pretty(pretty);
    let json_output = to_json_string(&schema, &options).map_err(report)?;

    match output {
        Some(path) => {
            std::fs::write(&path, &json_output).map_err(|e| {
                eprintln!("Error writing to {}: {}", path.display(), e);
                3u8
            })?;
            tracing::info!(output = %path.display(), "wrote canonical schema");
        }
        None => {
            println!("{}", json_output);
        }
    }

    Ok(())
}

fn report(e: SchemaError) -> u8 {
    eprintln!("Error: {}", e);
    e.exit_code() as u8
}
