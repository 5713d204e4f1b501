//! JSON output module for CLI commands
//!
//! Provides schema-versioned response types for all commands.

pub mod command;

pub use command::{
    generate_execution_id, output_json, ErrorResponse, JsonResponse, MapResponse, OrderResponse,
    OutputFormat, StatusResponse, VerifyResponse,
};
