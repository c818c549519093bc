use std::fs;
use std::path::PathBuf;

fn default_variables() -> Vec<String> {
    vec!["owner".to_string(), "_owner".to_string(), "owner_".to_string()]
}

fn stage_input(dir: &tempfile::TempDir, name: &str, json: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, json).expect("fixture written");
    path
}

#[test]
fn test_run_writes_hardened_source() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = stage_input(&dir, "proxy.json", include_str!("fixtures/proxy.json"));
    let output = dir.path().join("out");

    let code = solguard::cli::run(&input, &output, default_variables(), false);
    assert_eq!(code, 0);

    let sol = fs::read_to_string(output.join("contracts/proxy.sol")).expect("output exists");
    assert!(sol.contains("bytes track_owner;"));
    assert!(sol.contains("assert(track_mapping_owner[track_owner] == track_func_owner());"));
    assert!(!output.join("proxy.dot").exists());
}

#[test]
fn test_run_emits_call_graph_on_request() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = stage_input(&dir, "proxy.json", include_str!("fixtures/proxy.json"));
    let output = dir.path().join("out");

    let code = solguard::cli::run(&input, &output, default_variables(), true);
    assert_eq!(code, 0);

    let dot = fs::read_to_string(output.join("proxy.dot")).expect("dot exists");
    assert!(dot.contains("digraph"));
}

#[test]
fn test_run_rejects_missing_input() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("absent.json");
    let output = dir.path().join("out");

    let code = solguard::cli::run(&input, &output, default_variables(), false);
    assert_eq!(code, 1);
    assert!(!output.exists());
}

#[test]
fn test_run_rejects_malformed_export() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = stage_input(&dir, "broken.json", "{\"nodeType\": \"SourceUnit\"}");
    let output = dir.path().join("out");

    let code = solguard::cli::run(&input, &output, default_variables(), false);
    assert_eq!(code, 1);
}
