//! procmap CLI - deterministic artifact mapper for integration-platform projects
//!
//! Usage: procmap <command> [arguments]

mod cli;
mod export_cmd;
mod map_cmd;
mod order_cmd;
mod status_cmd;
mod verify_cmd;

use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use cli::{parse_args, print_usage, Command};
use procmap::output::{generate_execution_id, output_json, ErrorResponse, JsonResponse};
use procmap::{MapperError, OutputFormat};

/// Environment variable holding the log filter directive
const LOG_ENV: &str = "PROCMAP_LOG";

/// Install the stderr log subscriber.
///
/// `PROCMAP_LOG` wins when set; otherwise `--verbose` selects debug and the
/// default is warn.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = std::env::var(LOG_ENV)
        .ok()
        .and_then(|directive| EnvFilter::try_new(directive).ok())
        .unwrap_or_else(|| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn output_format_of(command: &Command) -> OutputFormat {
    match command {
        Command::Map { output_format, .. }
        | Command::Status { output_format, .. }
        | Command::Verify { output_format, .. }
        | Command::Order { output_format, .. } => *output_format,
        _ => OutputFormat::Human,
    }
}

/// Report a failed command on stderr, or as a JSON error document.
fn report_error(e: &anyhow::Error, output_format: OutputFormat) {
    if output_format == OutputFormat::Json {
        let code = e
            .downcast_ref::<MapperError>()
            .map(|err| err.code().to_string())
            .unwrap_or_else(|| "PMAP-INTERNAL".to_string());
        let response = JsonResponse::new(
            ErrorResponse {
                error: code,
                message: format!("{:#}", e),
            },
            &generate_execution_id(),
        );
        if output_json(&response).is_ok() {
            return;
        }
    }
    eprintln!("Error: {:#}", e);
}

fn main() -> ExitCode {
    let command = match parse_args() {
        Ok(command) => command,
        Err(e) => {
            eprintln!("Error: {}", e);
            print_usage();
            return ExitCode::from(1);
        }
    };

    init_logging(command.verbose());
    let output_format = output_format_of(&command);

    let result = match command {
        Command::Help => {
            print_usage();
            Ok(0)
        }
        Command::Version => {
            println!("{}", procmap::version::version());
            Ok(0)
        }
        Command::Map {
            args,
            output_format,
            ..
        } => map_cmd::run_map(&args, output_format).map(|_| 0),
        Command::Status {
            map_path,
            output_format,
            ..
        } => status_cmd::run_status(&map_path, output_format).map(|_| 0),
        Command::Verify {
            map_path,
            output_format,
            ..
        } => verify_cmd::run_verify(&map_path, output_format),
        Command::Export {
            map_path, format, ..
        } => export_cmd::run_export(&map_path, format).map(|_| 0),
        Command::Order {
            map_path,
            output_format,
            ..
        } => order_cmd::run_order(&map_path, output_format).map(|_| 0),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            report_error(&e, output_format);
            ExitCode::from(1)
        }
    }
}
