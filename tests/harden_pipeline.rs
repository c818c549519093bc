use solguard::{harden_source, HardenOptions};

/// Helper: run the pipeline over a compiler JSON export and return the
/// regenerated source, failing loudly on a fatal diagnostic.
fn harden(json: &str, options: &HardenOptions) -> String {
    let outcome = harden_source(json, options)
        .unwrap_or_else(|e| panic!("pipeline should succeed, got: {}", e.message));
    outcome.source
}

/// A proxy whose delegatecall receiver is an address parameter: target
/// unknown, everything must be guarded.
const PROXY: &str = include_str!("fixtures/proxy.json");

/// A caller whose delegatecall receiver is typed as a known contract, but
/// whose storage layout disagrees with that contract's.
const LAYOUT_MISMATCH: &str = include_str!("fixtures/layout_mismatch.json");

// ── the Proxy scenario ──

#[test]
fn test_proxy_gets_shadow_state() {
    let source = harden(PROXY, &HardenOptions::default());
    assert!(source.contains("bytes track_owner;"), "missing shadow slot");
    assert!(
        source.contains("mapping(bytes => address) track_mapping_owner;"),
        "missing shadow mapping"
    );
    assert!(
        source.contains("function track_func_owner() internal view returns (address) {"),
        "missing shadow accessor"
    );
}

#[test]
fn test_proxy_assertion_guards_the_call() {
    let source = harden(PROXY, &HardenOptions::default());
    let assertion =
        "assert(track_mapping_owner[track_owner] == track_func_owner());";
    let assert_at = source.find(assertion).expect("assertion missing");
    let call_at = source.find(".delegatecall(").expect("call missing");
    assert!(
        assert_at < call_at,
        "assertion must precede the delegatecall statement"
    );
}

#[test]
fn test_proxy_writes_are_traced() {
    let source = harden(PROXY, &HardenOptions::default());
    assert!(source.contains("track_mapping_owner[\"Proxy.setOwner(address next)\"] = next;"));
    assert!(source.contains("track_owner = \"Proxy.setOwner(address next)\";"));
}

#[test]
fn test_proxy_run_is_idempotent() {
    let options = HardenOptions::default();
    let first = harden(PROXY, &options);
    let second = harden(PROXY, &options);
    assert_eq!(first, second);
}

// ── the layout-mismatch scenario ──

#[test]
fn test_layout_mismatch_is_left_alone() {
    let outcome = harden_source(LAYOUT_MISMATCH, &HardenOptions::default())
        .expect("pipeline succeeds");
    assert_eq!(outcome.findings, 1);
    assert_eq!(outcome.hardened, 0);
    assert!(
        !outcome.source.contains("track_"),
        "no shadow state on a refused layout"
    );
    assert!(outcome
        .warnings
        .iter()
        .any(|w| w.message.contains("storage layout")));
}

// ── candidate configuration ──

#[test]
fn test_custom_candidate_names() {
    // Renaming `owner` to `admin` everywhere defeats the defaults but a
    // custom candidate list picks it up.
    let renamed = PROXY.replace("owner", "admin").replace("setOwner", "setAdmin");
    let defaults = harden_source(&renamed, &HardenOptions::default()).expect("runs");
    assert_eq!(defaults.hardened, 0);

    let options = HardenOptions {
        variables: vec!["admin".to_string()],
        call_graph: false,
    };
    let custom = harden_source(&renamed, &options).expect("runs");
    assert_eq!(custom.hardened, 1);
    assert!(custom.source.contains("bytes track_admin;"));
}

// ── round trip without findings ──

#[test]
fn test_clean_contract_round_trips() {
    let json = r#"{
        "nodeType": "SourceUnit", "id": 10, "src": "0:0:0",
        "absolutePath": "clean.sol",
        "nodes": [
            {"nodeType": "PragmaDirective", "id": 1, "src": "0:0:0",
             "literals": ["solidity", "^", "0.8", ".0"]},
            {"nodeType": "ContractDefinition", "id": 9, "src": "0:0:0",
             "name": "Clean", "contractKind": "contract",
             "linearizedBaseContracts": [9],
             "nodes": [
                {"nodeType": "VariableDeclaration", "id": 3, "src": "0:0:0",
                 "name": "total", "stateVariable": true, "visibility": "public",
                 "storageLocation": "default", "scope": 9,
                 "typeDescriptions": {"typeString": "uint256"},
                 "typeName": {"nodeType": "ElementaryTypeName", "id": 2,
                              "src": "0:0:0", "name": "uint256"}}
             ]}
        ]}"#;
    let outcome = harden_source(json, &HardenOptions::default()).expect("runs");
    assert_eq!(outcome.findings, 0);
    assert_eq!(
        outcome.source,
        "// SPDX-License-Identifier: GPL-3.0\n\
         pragma solidity ^0.8.0;\n\
         contract Clean {\n    uint256 public total;\n}\n"
    );
}
