//! The end-to-end run: JSON in, hardened Solidity out.

use std::collections::HashSet;

use rayon::prelude::*;
use serde_json::Value;

use crate::analysis::callgraph::{self, CallPath};
use crate::analysis::taint::{self, FindingSlot};
use crate::ast::build::{build_source_unit, BuildCtx};
use crate::ast::dialect::Dialect;
use crate::ast::registry::Registry;
use crate::ast::render::render;
use crate::ast::NodeId;
use crate::diagnostic::Diagnostic;
use crate::instrument;

/// Knobs the CLI exposes; embedders fill this directly.
#[derive(Clone, Debug)]
pub struct HardenOptions {
    /// Protected-variable names, tried in order.
    pub variables: Vec<String>,
    /// Also produce the call graph as DOT text.
    pub call_graph: bool,
}

impl Default for HardenOptions {
    fn default() -> Self {
        Self {
            variables: vec![
                "owner".to_string(),
                "_owner".to_string(),
                "owner_".to_string(),
            ],
            call_graph: false,
        }
    }
}

/// What one run produced.
#[derive(Debug)]
pub struct HardenOutcome {
    /// Regenerated (possibly instrumented) Solidity source.
    pub source: String,
    /// Call-path tree per function, when requested.
    pub call_paths: Vec<CallPath>,
    /// DOT text of the call graph, when requested.
    pub call_graph: Option<String>,
    /// Delegatecall sites found.
    pub findings: usize,
    /// Findings that actually got instrumented.
    pub hardened: usize,
    /// Non-fatal diagnostics accumulated along the way.
    pub warnings: Vec<Diagnostic>,
}

/// Run the pipeline over one compiler JSON AST export.
pub fn harden_source(json: &str, options: &HardenOptions) -> Result<HardenOutcome, Diagnostic> {
    let value: Value = serde_json::from_str(json)
        .map_err(|e| Diagnostic::error(format!("input is not valid JSON: {}", e), "-"))?;
    let dialect = detect_dialect(&value)?;

    let registry = Registry::new();
    let mut warnings = Vec::new();
    let root = {
        let mut ctx = BuildCtx::new(&registry, dialect, &mut warnings);
        build_source_unit(&value, &mut ctx)?
    };

    // Per-function delegatecall scan; functions are independent, so the
    // walks run data-parallel against the shared read side.
    let function_ids = registry.read().function_ids();
    let slots: Vec<(NodeId, FindingSlot)> = function_ids
        .par_iter()
        .map(|id| {
            let reader = registry.read();
            (*id, taint::scan_function(&reader, *id))
        })
        .collect();

    let (call_paths, call_graph) = if options.call_graph {
        let reader = registry.read();
        let paths = callgraph::build_call_graph(&reader);
        let dot = callgraph::to_dot(&paths);
        (paths, Some(dot))
    } else {
        (Vec::new(), None)
    };

    // Instrumentation mutates contracts one finding at a time; the dedup
    // set spans the whole run so overlapping findings splice once.
    let mut seen = HashSet::new();
    let mut findings = 0;
    let mut hardened = 0;
    for (_, slot) in &slots {
        for finding in [&slot.unknown, &slot.known].into_iter().flatten() {
            findings += 1;
            if instrument::harden(&registry, finding, &options.variables, &mut seen, &mut warnings)
            {
                hardened += 1;
            }
        }
    }

    let source = render(&registry.read(), root, true, false, "", &mut warnings);

    Ok(HardenOutcome {
        source,
        call_paths,
        call_graph,
        findings,
        hardened,
        warnings,
    })
}

/// Pick the dialect from the unit's pragma directive.
fn detect_dialect(value: &Value) -> Result<Dialect, Diagnostic> {
    let nodes = value
        .get("nodes")
        .and_then(Value::as_array)
        .ok_or_else(|| Diagnostic::error("source unit has no `nodes` array".to_string(), "-"))?;
    let literals: Vec<String> = nodes
        .iter()
        .find(|n| n.get("nodeType").and_then(Value::as_str) == Some("PragmaDirective"))
        .and_then(|n| n.get("literals"))
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .ok_or_else(|| {
            Diagnostic::error("source unit carries no pragma directive".to_string(), "-")
        })?;
    Dialect::from_pragma_literals(&literals).ok_or_else(|| {
        Diagnostic::error(
            format!("unsupported solidity version in pragma [{}]", literals.join(" ")),
            "-",
        )
        .with_help("supported compiler lines: 0.4, 0.5, 0.6, 0.8 (0.7 maps to 0.8)".to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROXY: &str = r#"{
        "nodeType": "SourceUnit", "id": 100, "src": "0:0:0",
        "nodes": [
            {"nodeType": "PragmaDirective", "id": 1, "src": "0:0:0",
             "literals": ["solidity", "^", "0.8", ".0"]},
            {"nodeType": "ContractDefinition", "id": 99, "src": "0:0:0",
             "name": "Proxy", "contractKind": "contract",
             "linearizedBaseContracts": [99],
             "nodes": [
                {"nodeType": "VariableDeclaration", "id": 3, "src": "0:0:0",
                 "name": "owner", "stateVariable": true, "visibility": "public",
                 "storageLocation": "default", "scope": 99,
                 "typeDescriptions": {"typeString": "address"},
                 "typeName": {"nodeType": "ElementaryTypeName", "id": 2,
                              "src": "0:0:0", "name": "address"}},
                {"nodeType": "FunctionDefinition", "id": 20, "src": "0:0:0",
                 "name": "forward", "kind": "function", "scope": 99,
                 "visibility": "public", "stateMutability": "nonpayable",
                 "parameters": {"nodeType": "ParameterList", "id": 21,
                     "src": "0:0:0", "parameters": [
                    {"nodeType": "VariableDeclaration", "id": 22, "src": "0:0:0",
                     "name": "target", "stateVariable": false, "visibility": "",
                     "storageLocation": "default", "scope": 20,
                     "typeDescriptions": {"typeString": "address"},
                     "typeName": {"nodeType": "ElementaryTypeName", "id": 23,
                                  "src": "0:0:0", "name": "address"}},
                    {"nodeType": "VariableDeclaration", "id": 24, "src": "0:0:0",
                     "name": "data", "stateVariable": false, "visibility": "",
                     "storageLocation": "memory", "scope": 20,
                     "typeDescriptions": {"typeString": "bytes memory"},
                     "typeName": {"nodeType": "ElementaryTypeName", "id": 25,
                                  "src": "0:0:0", "name": "bytes"}}]},
                 "body": {"nodeType": "Block", "id": 29, "src": "0:0:0",
                          "statements": [
                    {"nodeType": "ExpressionStatement", "id": 28, "src": "0:0:0",
                     "expression": {"nodeType": "FunctionCall", "id": 27,
                        "src": "0:0:0", "kind": "functionCall", "names": [],
                        "expression": {"nodeType": "MemberAccess", "id": 26,
                           "src": "0:0:0", "memberName": "delegatecall",
                           "expression": {"nodeType": "Identifier", "id": 30,
                              "src": "0:0:0", "name": "target",
                              "typeDescriptions": {"typeString": "address"}}},
                        "arguments": [
                           {"nodeType": "Identifier", "id": 31, "src": "0:0:0",
                            "name": "data",
                            "typeDescriptions": {"typeString": "bytes memory"}}]}}
                 ]}},
                {"nodeType": "FunctionDefinition", "id": 40, "src": "0:0:0",
                 "name": "setOwner", "kind": "function", "scope": 99,
                 "visibility": "public", "stateMutability": "nonpayable",
                 "parameters": {"nodeType": "ParameterList", "id": 41,
                     "src": "0:0:0", "parameters": [
                    {"nodeType": "VariableDeclaration", "id": 42, "src": "0:0:0",
                     "name": "next", "stateVariable": false, "visibility": "",
                     "storageLocation": "default", "scope": 40,
                     "typeDescriptions": {"typeString": "address"},
                     "typeName": {"nodeType": "ElementaryTypeName", "id": 43,
                                  "src": "0:0:0", "name": "address"}}]},
                 "body": {"nodeType": "Block", "id": 44, "src": "0:0:0",
                          "statements": [
                    {"nodeType": "ExpressionStatement", "id": 45, "src": "0:0:0",
                     "expression": {"nodeType": "Assignment", "id": 46,
                        "src": "0:0:0", "operator": "=",
                        "leftHandSide": {"nodeType": "Identifier", "id": 47,
                           "src": "0:0:0", "name": "owner",
                           "typeDescriptions": {"typeString": "address"}},
                        "rightHandSide": {"nodeType": "Identifier", "id": 48,
                           "src": "0:0:0", "name": "next",
                           "typeDescriptions": {"typeString": "address"}}}}
                 ]}}
             ]}
        ]}"#;

    #[test]
    fn test_end_to_end_unknown_target() {
        let outcome =
            harden_source(PROXY, &HardenOptions::default()).expect("pipeline succeeds");
        assert_eq!(outcome.findings, 1);
        assert_eq!(outcome.hardened, 1);
        assert!(outcome.source.contains("bytes track_owner;"));
        assert!(outcome
            .source
            .contains("assert(track_mapping_owner[track_owner] == track_func_owner());"));
        assert!(outcome.source.starts_with("// SPDX-License-Identifier:"));
    }

    #[test]
    fn test_call_graph_on_demand() {
        let mut options = HardenOptions::default();
        options.call_graph = true;
        let outcome = harden_source(PROXY, &options).expect("pipeline succeeds");
        let dot = outcome.call_graph.expect("dot text");
        assert!(dot.contains("digraph"));
        assert_eq!(outcome.call_paths.len(), 2);
    }

    #[test]
    fn test_missing_pragma_is_fatal() {
        let err = harden_source(
            r#"{"nodeType": "SourceUnit", "id": 1, "src": "0:0:0", "nodes": []}"#,
            &HardenOptions::default(),
        )
        .expect_err("no pragma");
        assert!(err.message.contains("pragma"));
    }

    #[test]
    fn test_unsupported_version_is_fatal() {
        let err = harden_source(
            r#"{"nodeType": "SourceUnit", "id": 2, "src": "0:0:0",
                "nodes": [{"nodeType": "PragmaDirective", "id": 1, "src": "0:0:0",
                           "literals": ["solidity", "0.3", ".6"]}]}"#,
            &HardenOptions::default(),
        )
        .expect_err("ancient compiler");
        assert!(err.message.contains("unsupported"));
    }

    #[test]
    fn test_round_trip_is_stable() {
        let options = HardenOptions::default();
        let first = harden_source(PROXY, &options).expect("first run");
        let second = harden_source(PROXY, &options).expect("second run");
        assert_eq!(first.source, second.source);
    }
}
