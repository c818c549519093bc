//! Command body behind the binary's flag parsing.

use std::fs;
use std::path::Path;

use crate::api::{harden_source, HardenOptions};
use crate::diagnostic::render_diagnostics;

/// Read the compiler JSON export at `input`, run the pipeline, and write
/// the regenerated source under `<output>/contracts/`. Returns the
/// process exit code.
pub fn run(input: &Path, output: &Path, variables: Vec<String>, call_graph: bool) -> i32 {
    let filename = input.display().to_string();
    let json = match fs::read_to_string(input) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("error: cannot read '{}': {}", filename, e);
            return 1;
        }
    };

    let options = HardenOptions {
        variables,
        call_graph,
    };
    let outcome = match harden_source(&json, &options) {
        Ok(outcome) => outcome,
        Err(diag) => {
            diag.render(&filename);
            return 1;
        }
    };
    render_diagnostics(&outcome.warnings, &filename);

    let contracts = output.join("contracts");
    if let Err(e) = fs::create_dir_all(&contracts) {
        eprintln!("error: cannot create '{}': {}", contracts.display(), e);
        return 1;
    }
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "contract".to_string());
    let sol_path = contracts.join(format!("{}.sol", stem));
    if let Err(e) = fs::write(&sol_path, &outcome.source) {
        eprintln!("error: cannot write '{}': {}", sol_path.display(), e);
        return 1;
    }

    if let Some(dot) = &outcome.call_graph {
        let dot_path = output.join(format!("{}.dot", stem));
        if let Err(e) = fs::write(&dot_path, dot) {
            eprintln!("error: cannot write '{}': {}", dot_path.display(), e);
            return 1;
        }
        println!("call graph: {}", dot_path.display());
    }

    println!(
        "{}: {} delegatecall finding(s), {} hardened -> {}",
        stem,
        outcome.findings,
        outcome.hardened,
        sol_path.display()
    );
    0
}
