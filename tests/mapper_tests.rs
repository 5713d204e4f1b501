//! End-to-end tests for the mapping pipeline
//!
//! Each test lays out a small designer project in a temp directory and runs
//! the library pipeline over it.

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use procmap::{
    fingerprint, map_project, ArtifactKind, DiagnosticStage, ExtractionMode, MapDiagnostic,
    MapperConfig, ProjectMapper,
};

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn process(calls: &[&str], extra: &str) -> String {
    let mut body = String::new();
    for call in calls {
        body.push_str(&format!(
            "  <pd:activity name=\"call\">\n    <config><processName>{}</processName></config>\n  </pd:activity>\n",
            call
        ));
    }
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<pd:ProcessDefinition xmlns:pd=\"http://xmlns.tibco.com/bw/process/2003\">\n{}{}\n</pd:ProcessDefinition>\n",
        body, extra
    )
}

/// Three-file project: Main calls Sub and uses a JDBC connection.
fn three_file_project(root: &Path) {
    write(
        root,
        "Main.process",
        &process(&["/Sub.process"], "<jdbc>/cfg.sharedjdbc</jdbc>"),
    );
    write(root, "Sub.process", &process(&[], ""));
    write(root, "cfg.sharedjdbc", "<jdbc/>");
}

/// Larger project inside a container directory, as exported by the designer.
fn order_project(source_root: &Path) -> std::path::PathBuf {
    let root = source_root.join("OrderProject");
    write(&root, "vcrepo.dat", "binary-ish");
    write(&root, "Processes/.folder", "");
    write(
        &root,
        "Processes/Main.process",
        &process(
            &["/Processes/Sub.process", "/Processes/OrderValidator", "/Processes/NoSuchFile"],
            "<config><jdbcSharedConfig>/Shared/cfg.sharedjdbc</jdbcSharedConfig>\
             <timeout>%%OrderVars/Timeout%%</timeout><id>%%OrderVars/CustomerId%%</id></config>",
        ),
    );
    write(&root, "Processes/Sub.process", &process(&[], ""));
    write(
        &root,
        "Processes/OrderValidator.process",
        &process(&[], "<rule><eventRef>/Schemas/OrderEvent</eventRef></rule>"),
    );
    write(&root, "Shared/cfg.sharedjdbc", "<jdbc/>");
    write(&root, "Schemas/OrderEvent.aeschema", "<schema/>");
    write(
        &root,
        "Schemas/Order.xsd",
        r#"<xsd:schema xmlns:xsd="http://www.w3.org/2001/XMLSchema">
             <xsd:include schemaLocation="Common.xsd"/>
           </xsd:schema>"#,
    );
    write(
        &root,
        "Schemas/Common.xsd",
        "<xsd:schema xmlns:xsd=\"http://www.w3.org/2001/XMLSchema\"/>",
    );
    write(&root, "defaultVars/OrderVars/defaultVars.substvar", "<repository/>");
    write(&root, "notes.txt", "free text");
    root
}

#[test]
fn test_three_file_scenario() {
    let temp_dir = TempDir::new().unwrap();
    three_file_project(temp_dir.path());

    let run = map_project(temp_dir.path()).unwrap();
    let map = &run.map;

    assert_eq!(map.entry_points, vec!["Main.process"]);
    assert_eq!(
        map.artifacts["Main.process"].dependencies,
        vec!["Sub.process", "cfg.sharedjdbc"]
    );
    assert!(map.artifacts["Sub.process"].dependencies.is_empty());
    assert_eq!(map.artifacts["cfg.sharedjdbc"].kind, ArtifactKind::SharedJdbc);
}

#[test]
fn test_container_project_full_map() {
    let temp_dir = TempDir::new().unwrap();
    let project = order_project(temp_dir.path());

    let run = map_project(temp_dir.path()).unwrap();
    assert_eq!(run.project_root, project);
    let map = &run.map;

    // Ignored markers never become nodes; unknown extensions do.
    assert!(!map.artifacts.contains_key("vcrepo.dat"));
    assert!(!map.artifacts.contains_key("Processes/.folder"));
    assert_eq!(map.artifacts["notes.txt"].kind, ArtifactKind::Unknown);

    let main = &map.artifacts["Processes/Main.process"];
    assert_eq!(
        main.dependencies,
        vec![
            "Processes/OrderValidator.process",
            "Processes/Sub.process",
            "Shared/cfg.sharedjdbc",
        ]
    );
    assert_eq!(main.variable_groups, vec!["OrderVars"]);

    assert_eq!(
        map.artifacts["Processes/OrderValidator.process"].dependencies,
        vec!["Schemas/OrderEvent.aeschema"]
    );
    assert_eq!(
        map.artifacts["Schemas/Order.xsd"].dependencies,
        vec!["Schemas/Common.xsd"]
    );
    assert_eq!(
        map.artifacts["defaultVars/OrderVars/defaultVars.substvar"].kind,
        ArtifactKind::GlobalVariables
    );
    assert_eq!(map.entry_points, vec!["Processes/Main.process"]);

    let unresolved: Vec<_> = run
        .diagnostics
        .entries()
        .iter()
        .filter_map(|d| match d {
            MapDiagnostic::Unresolved { path, token } => Some((path.as_str(), token.as_str())),
            _ => None,
        })
        .collect();
    assert_eq!(unresolved, vec![("Processes/Main.process", "NoSuchFile")]);
}

#[test]
fn test_closure_and_entry_point_properties() {
    let temp_dir = TempDir::new().unwrap();
    order_project(temp_dir.path());
    let map = map_project(temp_dir.path()).unwrap().map;

    for entry in map.artifacts.values() {
        for dep in &entry.dependencies {
            assert!(map.artifacts.contains_key(dep), "dangling edge to {}", dep);
        }
    }

    for (path, _) in map.processes() {
        let called = map
            .processes()
            .any(|(_, e)| e.dependencies.iter().any(|d| d == path));
        assert_eq!(map.entry_points.iter().any(|e| e == path), !called, "{}", path);
    }

    assert!(map.verify().is_clean());
}

#[test]
fn test_runs_are_byte_identical() {
    let temp_dir = TempDir::new().unwrap();
    order_project(temp_dir.path());

    let out_a = temp_dir.path().join("a.json");
    let out_b = temp_dir.path().join("b.json");
    for out in [&out_a, &out_b] {
        let config = MapperConfig {
            source_root: temp_dir.path().join("OrderProject"),
            output: out.clone(),
            ..MapperConfig::default()
        };
        ProjectMapper::new(config).unwrap().run_and_write(None).unwrap();
    }

    let a = fs::read(&out_a).unwrap();
    let b = fs::read(&out_b).unwrap();
    assert_eq!(a, b);

    let map_a = procmap::read_map(&out_a).unwrap();
    let map_b = procmap::read_map(&out_b).unwrap();
    assert_eq!(fingerprint(&map_a).unwrap(), fingerprint(&map_b).unwrap());
}

#[test]
fn test_thread_count_does_not_change_output() {
    let temp_dir = TempDir::new().unwrap();
    order_project(temp_dir.path());

    let run_with = |threads: Option<usize>| {
        let config = MapperConfig {
            source_root: temp_dir.path().to_path_buf(),
            threads,
            ..MapperConfig::default()
        };
        ProjectMapper::new(config).unwrap().run(None).unwrap().map
    };

    assert_eq!(run_with(Some(1)), run_with(Some(4)));
    assert_eq!(run_with(None), run_with(Some(1)));
}

#[test]
fn test_malformed_process_retained_with_parse_diagnostic() {
    let temp_dir = TempDir::new().unwrap();
    three_file_project(temp_dir.path());
    write(temp_dir.path(), "Broken.process", "<pd:ProcessDefinition><unclosed>");

    let run = map_project(temp_dir.path()).unwrap();
    let broken = &run.map.artifacts["Broken.process"];
    assert_eq!(broken.kind, ArtifactKind::Process);
    assert!(broken.dependencies.is_empty());
    assert!(run.map.entry_points.contains(&"Broken.process".to_string()));

    let parse_failures: Vec<_> = run
        .diagnostics
        .entries()
        .iter()
        .filter(|d| matches!(d, MapDiagnostic::Error { stage: DiagnosticStage::Parse, .. }))
        .collect();
    assert_eq!(parse_failures.len(), 1);
    assert_eq!(parse_failures[0].path(), "Broken.process");
    assert_eq!(run.diagnostics.summary().parse_failures, 1);
}

#[test]
fn test_name_collision_surfaced_and_deterministic() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "Main.process", &process(&["/Util/Helper.process"], ""));
    write(temp_dir.path(), "A/Helper.process", &process(&[], ""));
    write(temp_dir.path(), "B/Helper.process", &process(&[], ""));

    let run = map_project(temp_dir.path()).unwrap();
    // Sorted walk: A/ before B/, so B/ is indexed last and wins.
    assert_eq!(run.map.artifacts["Main.process"].dependencies, vec!["B/Helper.process"]);

    let collisions: Vec<_> = run
        .diagnostics
        .entries()
        .iter()
        .filter_map(|d| match d {
            MapDiagnostic::NameCollision { name, kept, shadowed } => {
                Some((name.as_str(), kept.as_str(), shadowed.as_str()))
            }
            _ => None,
        })
        .collect();
    assert_eq!(
        collisions,
        vec![("Helper.process", "B/Helper.process", "A/Helper.process")]
    );
}

#[test]
fn test_shared_base_name_resolves_per_reference_kind() {
    let temp_dir = TempDir::new().unwrap();
    write(
        temp_dir.path(),
        "Main.process",
        &process(&["/Processes/Order"], "<rule><eventRef>/Events/Order</eventRef></rule>"),
    );
    write(temp_dir.path(), "Processes/Order.process", &process(&[], ""));
    write(temp_dir.path(), "Events/Order.aeschema", "<schema/>");

    let run = map_project(temp_dir.path()).unwrap();
    assert_eq!(
        run.map.artifacts["Main.process"].dependencies,
        vec!["Events/Order.aeschema", "Processes/Order.process"]
    );
    assert_eq!(run.diagnostics.summary().unresolved, 0);
}

#[test]
fn test_self_call_keeps_process_an_entry_point() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "Loop.process", &process(&["/Loop.process"], ""));

    let map = map_project(temp_dir.path()).unwrap().map;
    assert!(map.artifacts["Loop.process"].dependencies.is_empty());
    assert_eq!(map.entry_points, vec!["Loop.process"]);
}

#[test]
fn test_excludes_and_extra_ignored_extensions() {
    let temp_dir = TempDir::new().unwrap();
    order_project(temp_dir.path());

    let config = MapperConfig {
        source_root: temp_dir.path().to_path_buf(),
        exclude: vec!["Schemas/**".to_string()],
        extra_ignored_extensions: vec![".txt".to_string()],
        ..MapperConfig::default()
    };
    let run = ProjectMapper::new(config).unwrap().run(None).unwrap();

    assert!(!run.map.artifacts.keys().any(|k| k.starts_with("Schemas/")));
    assert!(!run.map.artifacts.contains_key("notes.txt"));
    // The schema is gone, so the validator's event reference no longer resolves.
    assert!(run.map.artifacts["Processes/OrderValidator.process"].dependencies.is_empty());
}

#[test]
fn test_fallback_mode_is_lossier() {
    let temp_dir = TempDir::new().unwrap();
    order_project(temp_dir.path());

    let config = MapperConfig {
        source_root: temp_dir.path().to_path_buf(),
        extraction_mode: ExtractionMode::Fallback,
        ..MapperConfig::default()
    };
    let map = ProjectMapper::new(config).unwrap().run(None).unwrap().map;
    let main = &map.artifacts["Processes/Main.process"];

    // Delimited absolute paths and variable tokens are still found.
    assert!(main.dependencies.contains(&"Processes/Sub.process".to_string()));
    assert!(main.dependencies.contains(&"Shared/cfg.sharedjdbc".to_string()));
    assert_eq!(main.variable_groups, vec!["OrderVars"]);
    // Relative schema includes are invisible to the regex.
    assert!(map.artifacts["Schemas/Order.xsd"].dependencies.is_empty());
}

#[test]
fn test_missing_and_empty_roots_are_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let missing = map_project(&temp_dir.path().join("absent")).unwrap_err();
    assert!(matches!(missing, procmap::MapperError::ProjectNotFound { .. }));

    let empty = temp_dir.path().join("empty");
    fs::create_dir_all(&empty).unwrap();
    let err = map_project(&empty).unwrap_err();
    assert!(matches!(err, procmap::MapperError::ProjectNotFound { .. }));

    // A container whose only project folder holds nothing but markers.
    let hollow = temp_dir.path().join("hollow");
    write(&hollow, "EmptyProject/.folder", "");
    let err = map_project(&hollow).unwrap_err();
    assert!(matches!(err, procmap::MapperError::ProjectNotFound { .. }));
}

#[test]
fn test_failed_run_writes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let out = temp_dir.path().join("out/project_map.json");
    let config = MapperConfig {
        source_root: temp_dir.path().join("absent"),
        output: out.clone(),
        ..MapperConfig::default()
    };
    assert!(ProjectMapper::new(config).unwrap().run_and_write(None).is_err());
    assert!(!out.exists());
}

#[test]
fn test_diagnostics_file_written_when_configured() {
    let temp_dir = TempDir::new().unwrap();
    order_project(temp_dir.path());
    let diag_path = temp_dir.path().join("reports/diagnostics.json");

    let config = MapperConfig {
        source_root: temp_dir.path().to_path_buf(),
        output: temp_dir.path().join("reports/map.json"),
        diagnostics_output: Some(diag_path.clone()),
        ..MapperConfig::default()
    };
    ProjectMapper::new(config).unwrap().run_and_write(None).unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&diag_path).unwrap()).unwrap();
    let entries = value["entries"].as_array().unwrap();
    assert!(entries
        .iter()
        .any(|e| e["type"] == "unresolved" && e["token"] == "NoSuchFile"));
}
