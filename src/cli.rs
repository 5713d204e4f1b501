//! CLI argument parsing for procmap
//!
//! Defines the Command enum and parse_args() for all CLI commands.

use anyhow::{Context, Result};
use procmap::{ExportFormat, ExtractionMode, MapperConfig, OutputFormat};
use std::path::PathBuf;

pub fn print_usage() {
    eprintln!("procmap - Artifact mapper for integration-platform projects");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  procmap <command> [arguments]");
    eprintln!("  procmap --help");
    eprintln!("  procmap --version");
    eprintln!();
    eprintln!("  procmap map [--root <DIR>] [--out <FILE>] [--exclude <GLOB>]... [--fallback]");
    eprintln!("              [--threads <N>] [--config <FILE>] [--diagnostics <FILE>] [--output <FORMAT>] [--verbose]");
    eprintln!("  procmap status --map <FILE> [--output <FORMAT>]");
    eprintln!("  procmap verify --map <FILE> [--output <FORMAT>]");
    eprintln!("  procmap export --map <FILE> [--format json|dot]");
    eprintln!("  procmap order --map <FILE> [--output <FORMAT>]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  map       Scan a project and write its artifact map");
    eprintln!("  status    Show artifact counts and entry points of a map");
    eprintln!("  verify    Check a map for dangling edges and wrong entry points");
    eprintln!("  export    Print a map as canonical JSON or Graphviz DOT");
    eprintln!("  order     Print processes in documentation order");
    eprintln!();
    eprintln!("Global arguments:");
    eprintln!("  --output <FORMAT>   Output format: human (default) or json");
    eprintln!("  --verbose           Debug logging on stderr (PROCMAP_LOG overrides)");
    eprintln!();
    eprintln!("Map arguments:");
    eprintln!("  --root <DIR>        Project directory or its container (default: 1_project_source)");
    eprintln!("  --out <FILE>        Map file (default: 2_intermediate_data/project_map.json)");
    eprintln!("  --exclude <GLOB>    Exclude project-relative paths (repeatable)");
    eprintln!("  --fallback          Regex-only extraction (degraded mode)");
    eprintln!("  --threads <N>       Worker threads for extraction");
    eprintln!("  --config <FILE>     JSON configuration file; flags override it");
    eprintln!("  --diagnostics <FILE> Write run diagnostics as JSON");
    eprintln!();
    eprintln!("Export arguments:");
    eprintln!("  --map <FILE>        Map file to read");
    eprintln!("  --format <FORMAT>   json (default) or dot");
}

/// Flags of the map command, applied on top of the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapArgs {
    pub root: Option<PathBuf>,
    pub out: Option<PathBuf>,
    pub exclude: Vec<String>,
    pub fallback: bool,
    pub threads: Option<usize>,
    pub config: Option<PathBuf>,
    pub diagnostics: Option<PathBuf>,
}

impl MapArgs {
    /// Merge defaults, the configuration file and these flags.
    pub fn to_config(&self) -> Result<MapperConfig> {
        let mut config = match &self.config {
            Some(path) => MapperConfig::from_file(path)
                .with_context(|| format!("loading configuration {}", path.display()))?,
            None => MapperConfig::default(),
        };

        if let Some(root) = &self.root {
            config.source_root = root.clone();
        }
        if let Some(out) = &self.out {
            config.output = out.clone();
        }
        config.exclude.extend(self.exclude.iter().cloned());
        if self.fallback {
            config.extraction_mode = ExtractionMode::Fallback;
        }
        if self.threads.is_some() {
            config.threads = self.threads;
        }
        if let Some(diagnostics) = &self.diagnostics {
            config.diagnostics_output = Some(diagnostics.clone());
        }

        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Map {
        args: MapArgs,
        output_format: OutputFormat,
        verbose: bool,
    },
    Status {
        map_path: PathBuf,
        output_format: OutputFormat,
        verbose: bool,
    },
    Verify {
        map_path: PathBuf,
        output_format: OutputFormat,
        verbose: bool,
    },
    Export {
        map_path: PathBuf,
        format: ExportFormat,
        verbose: bool,
    },
    Order {
        map_path: PathBuf,
        output_format: OutputFormat,
        verbose: bool,
    },
    Help,
    Version,
}

impl Command {
    pub fn verbose(&self) -> bool {
        match self {
            Command::Map { verbose, .. }
            | Command::Status { verbose, .. }
            | Command::Verify { verbose, .. }
            | Command::Export { verbose, .. }
            | Command::Order { verbose, .. } => *verbose,
            Command::Help | Command::Version => false,
        }
    }
}

fn value<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a str> {
    args.get(i + 1)
        .map(String::as_str)
        .ok_or_else(|| anyhow::anyhow!("{} requires an argument", flag))
}

fn parse_output_format(s: &str) -> Result<OutputFormat> {
    OutputFormat::from_str(s).ok_or_else(|| anyhow::anyhow!("Invalid output format: {}", s))
}

/// Options shared by the commands that read an existing map.
fn parse_map_reader(args: &[String]) -> Result<(PathBuf, OutputFormat, bool)> {
    let mut map_path: Option<PathBuf> = None;
    let mut output_format = OutputFormat::Human;
    let mut verbose = false;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--map" => {
                map_path = Some(PathBuf::from(value(args, i, "--map")?));
                i += 2;
            }
            "--output" => {
                output_format = parse_output_format(value(args, i, "--output")?)?;
                i += 2;
            }
            "--verbose" | "-v" => {
                verbose = true;
                i += 1;
            }
            _ => {
                return Err(anyhow::anyhow!("Unknown argument: {}", args[i]));
            }
        }
    }

    let map_path = map_path.ok_or_else(|| anyhow::anyhow!("--map is required"))?;
    Ok((map_path, output_format, verbose))
}

/// Parse arguments (without the program name) into a Command.
pub fn parse_args_from(args: &[String]) -> Result<Command> {
    let command = args.first().ok_or_else(|| anyhow::anyhow!("Missing command"))?;
    let rest = &args[1..];

    match command.as_str() {
        "--version" | "-V" => Ok(Command::Version),
        "--help" | "-h" | "help" => Ok(Command::Help),
        "map" => {
            let mut map_args = MapArgs::default();
            let mut output_format = OutputFormat::Human;
            let mut verbose = false;

            let mut i = 0;
            while i < rest.len() {
                match rest[i].as_str() {
                    "--root" => {
                        map_args.root = Some(PathBuf::from(value(rest, i, "--root")?));
                        i += 2;
                    }
                    "--out" => {
                        map_args.out = Some(PathBuf::from(value(rest, i, "--out")?));
                        i += 2;
                    }
                    "--exclude" => {
                        map_args.exclude.push(value(rest, i, "--exclude")?.to_string());
                        i += 2;
                    }
                    "--fallback" => {
                        map_args.fallback = true;
                        i += 1;
                    }
                    "--threads" => {
                        let raw = value(rest, i, "--threads")?;
                        let threads: usize = raw
                            .parse()
                            .with_context(|| format!("--threads expects a number, got '{}'", raw))?;
                        map_args.threads = Some(threads);
                        i += 2;
                    }
                    "--config" => {
                        map_args.config = Some(PathBuf::from(value(rest, i, "--config")?));
                        i += 2;
                    }
                    "--diagnostics" => {
                        map_args.diagnostics =
                            Some(PathBuf::from(value(rest, i, "--diagnostics")?));
                        i += 2;
                    }
                    "--output" => {
                        output_format = parse_output_format(value(rest, i, "--output")?)?;
                        i += 2;
                    }
                    "--verbose" | "-v" => {
                        verbose = true;
                        i += 1;
                    }
                    _ => {
                        return Err(anyhow::anyhow!("Unknown argument: {}", rest[i]));
                    }
                }
            }

            Ok(Command::Map {
                args: map_args,
                output_format,
                verbose,
            })
        }
        "status" => {
            let (map_path, output_format, verbose) = parse_map_reader(rest)?;
            Ok(Command::Status {
                map_path,
                output_format,
                verbose,
            })
        }
        "verify" => {
            let (map_path, output_format, verbose) = parse_map_reader(rest)?;
            Ok(Command::Verify {
                map_path,
                output_format,
                verbose,
            })
        }
        "order" => {
            let (map_path, output_format, verbose) = parse_map_reader(rest)?;
            Ok(Command::Order {
                map_path,
                output_format,
                verbose,
            })
        }
        "export" => {
            let mut map_path: Option<PathBuf> = None;
            let mut format = ExportFormat::Json;
            let mut verbose = false;

            let mut i = 0;
            while i < rest.len() {
                match rest[i].as_str() {
                    "--map" => {
                        map_path = Some(PathBuf::from(value(rest, i, "--map")?));
                        i += 2;
                    }
                    "--format" => {
                        let raw = value(rest, i, "--format")?;
                        format = ExportFormat::from_str(raw)
                            .ok_or_else(|| anyhow::anyhow!("Invalid export format: {}", raw))?;
                        i += 2;
                    }
                    "--verbose" | "-v" => {
                        verbose = true;
                        i += 1;
                    }
                    _ => {
                        return Err(anyhow::anyhow!("Unknown argument: {}", rest[i]));
                    }
                }
            }

            let map_path = map_path.ok_or_else(|| anyhow::anyhow!("--map is required"))?;
            Ok(Command::Export {
                map_path,
                format,
                verbose,
            })
        }
        _ => Err(anyhow::anyhow!("Unknown command: {}", command)),
    }
}

/// Parse the process arguments
pub fn parse_args() -> Result<Command> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    parse_args_from(&args)
}
