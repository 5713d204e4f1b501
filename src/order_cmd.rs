//! Order command implementation

use anyhow::Result;
use std::path::Path;

use procmap::output::{generate_execution_id, output_json, JsonResponse, OrderResponse};
use procmap::{documentation_order, read_map, OutputFormat};

/// Print processes in the order downstream documentation visits them.
pub fn run_order(map_path: &Path, output_format: OutputFormat) -> Result<()> {
    let mut map = read_map(map_path)?;
    map.normalize();
    let order = documentation_order(&map);

    match output_format {
        OutputFormat::Json => {
            let exec_id = generate_execution_id();
            output_json(&JsonResponse::new(OrderResponse { order }, &exec_id))?;
        }
        OutputFormat::Human => {
            for (i, path) in order.iter().enumerate() {
                println!("{:>4}  {}", i + 1, path);
            }
        }
    }

    Ok(())
}
