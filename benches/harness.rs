//! Benchmark harness for performance testing
//!
//! Builds synthetic designer projects of varying sizes on disk so the
//! scan, extraction and full-run benchmarks work on realistic trees.

use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Render a process document calling `calls` and using one JDBC connection
/// plus a global variable group.
pub fn process_document(calls: &[String], jdbc: &str, group: &str) -> String {
    let mut body = String::new();
    for call in calls {
        body.push_str(&format!(
            "  <pd:activity name=\"call\">\n    <config><processName>{}</processName></config>\n  </pd:activity>\n",
            call
        ));
    }
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <pd:ProcessDefinition xmlns:pd=\"http://xmlns.tibco.com/bw/process/2003\">\n\
         {}  <pd:activity name=\"query\">\n    <config><jdbcSharedConfig>{}</jdbcSharedConfig>\
         <timeout>%%{}/Timeout%%</timeout></config>\n  </pd:activity>\n\
         </pd:ProcessDefinition>\n",
        body, jdbc, group
    )
}

/// Setup a synthetic project with `num_processes` processes
///
/// Processes are laid out in folders of 50. Process `i` calls `i+1` and
/// `i+fanout` (when they exist), so the map has a long chain with
/// branching and a handful of shared resources that everything depends on.
///
/// # Returns
/// TempDir owning the project tree (the project root is the temp dir itself)
pub fn setup_project(num_processes: usize, fanout: usize) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    for c in 0..4 {
        write(root, &format!("Shared/conn_{}.sharedjdbc", c), "<jdbc/>");
        write(
            root,
            &format!("defaultVars/Group{}/defaultVars.substvar", c),
            "<repository/>",
        );
    }
    write(
        root,
        "Schemas/Order.xsd",
        "<xsd:schema xmlns:xsd=\"http://www.w3.org/2001/XMLSchema\">\
         <xsd:include schemaLocation=\"Common.xsd\"/></xsd:schema>",
    );
    write(
        root,
        "Schemas/Common.xsd",
        "<xsd:schema xmlns:xsd=\"http://www.w3.org/2001/XMLSchema\"/>",
    );

    for i in 0..num_processes {
        let mut calls = Vec::new();
        for target in [i + 1, i + fanout] {
            if target < num_processes && target != i {
                calls.push(format!("/{}/Proc{}.process", folder(target), target));
            }
        }
        let document = process_document(
            &calls,
            &format!("/Shared/conn_{}.sharedjdbc", i % 4),
            &format!("Group{}", i % 4),
        );
        write(root, &format!("{}/Proc{}.process", folder(i), i), &document);
    }

    temp_dir
}

fn folder(i: usize) -> String {
    format!("Processes/Batch{:03}", i / 50)
}
