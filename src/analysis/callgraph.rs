//! Per-function call-path trees and their graph export.
//!
//! The first pass records, for every function, the direct callees whose
//! declaration resolves through the registry. A closure pass then expands
//! each callee in place so a path tree spells out everything transitively
//! reachable from its root. Calls the registry cannot resolve (externals,
//! built-ins, low-level calls) are skipped here; the taint walk looks at
//! those separately.

use std::collections::{HashMap, HashSet};

use petgraph::dot::{Config, Dot};
use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;

use crate::ast::registry::Reader;
use crate::ast::{Node, NodeId};

/// One function's calls, callee subtrees in source order.
#[derive(Clone, Debug, Serialize)]
pub struct CallPath {
    pub signature: String,
    pub function: i64,
    pub calls: Vec<CallPath>,
}

impl CallPath {
    /// Depth-first lookup by function id.
    pub fn find(&self, function: NodeId) -> Option<&CallPath> {
        if self.function == function.0 {
            return Some(self);
        }
        self.calls.iter().find_map(|c| c.find(function))
    }

    /// All signatures in the tree, preorder.
    pub fn flatten(&self) -> Vec<&str> {
        let mut out = vec![self.signature.as_str()];
        for call in &self.calls {
            out.extend(call.flatten());
        }
        out
    }
}

/// Direct callees of one function, unexpanded.
pub fn call_path(reader: &Reader<'_>, function: NodeId) -> Option<CallPath> {
    let def = reader.function(function)?;
    let mut calls = Vec::new();
    if let Some(body) = def.body {
        collect_calls(reader, body, &mut calls);
    }
    Some(CallPath {
        signature: def.signature.clone(),
        function: function.0,
        calls,
    })
}

/// One fully expanded path tree per function in the registry.
pub fn build_call_graph(reader: &Reader<'_>) -> Vec<CallPath> {
    reader
        .function_ids()
        .into_iter()
        .filter_map(|id| {
            let mut path = call_path(reader, id)?;
            let mut visited = HashSet::from([id]);
            expand_all(reader, &mut path, &mut visited);
            Some(path)
        })
        .collect()
}

/// Closure pass: recursively attach each callee's own callees. The
/// visited set cuts recursive cycles; a function already on the current
/// path keeps an empty subtree.
pub fn expand_all(reader: &Reader<'_>, path: &mut CallPath, visited: &mut HashSet<NodeId>) {
    for call in &mut path.calls {
        let callee = NodeId(call.function);
        if !visited.insert(callee) {
            continue;
        }
        if let Some(expanded) = call_path(reader, callee) {
            call.calls = expanded.calls;
        }
        expand_all(reader, call, visited);
        visited.remove(&callee);
    }
}

fn collect_calls(reader: &Reader<'_>, id: NodeId, out: &mut Vec<CallPath>) {
    let node = match reader.node(id) {
        Some(node) => node,
        None => return,
    };
    if let Node::FunctionCall(call) = node {
        if let Some(target) = resolve_callee(reader, call.expression) {
            if let Some(def) = reader.function(target) {
                out.push(CallPath {
                    signature: def.signature.clone(),
                    function: target.0,
                    calls: Vec::new(),
                });
            }
        }
    }
    for child in node.children() {
        collect_calls(reader, child, out);
    }
}

/// The declaration a callee expression points at, when it points at one.
fn resolve_callee(reader: &Reader<'_>, expression: Option<NodeId>) -> Option<NodeId> {
    match reader.node(expression?)? {
        Node::Identifier(ident) => ident.referenced_declaration,
        Node::MemberAccess(access) => access.referenced_declaration,
        _ => None,
    }
}

/// Edge caller→callee; node weights are signatures, deduplicated.
pub fn to_graph(paths: &[CallPath]) -> DiGraph<String, ()> {
    let mut graph = DiGraph::new();
    let mut index: HashMap<i64, NodeIndex> = HashMap::new();
    for path in paths {
        add_edges(path, &mut graph, &mut index);
    }
    graph
}

fn add_edges(
    path: &CallPath,
    graph: &mut DiGraph<String, ()>,
    index: &mut HashMap<i64, NodeIndex>,
) {
    let from = *index
        .entry(path.function)
        .or_insert_with(|| graph.add_node(path.signature.clone()));
    for call in &path.calls {
        let to = *index
            .entry(call.function)
            .or_insert_with(|| graph.add_node(call.signature.clone()));
        if !graph.contains_edge(from, to) {
            graph.add_edge(from, to, ());
        }
        add_edges(call, graph, index);
    }
}

/// DOT text for external rendering.
pub fn to_dot(paths: &[CallPath]) -> String {
    let graph = to_graph(paths);
    format!("{:?}", Dot::with_config(&graph, &[Config::EdgeNoLabel]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::build::{build_source_unit, BuildCtx};
    use crate::ast::dialect::Dialect;
    use crate::ast::registry::Registry;
    use serde_json::Value;

    fn fixture() -> Registry {
        // contract C { function a() { b(); } function b() { c(); } function c() { b(); } }
        let json = r#"{
            "nodeType": "SourceUnit", "id": 100, "src": "0:0:0",
            "nodes": [
                {"nodeType": "PragmaDirective", "id": 1, "src": "0:0:0",
                 "literals": ["solidity", "0.8", ".0"]},
                {"nodeType": "ContractDefinition", "id": 99, "src": "0:0:0",
                 "name": "C", "contractKind": "contract",
                 "linearizedBaseContracts": [99],
                 "nodes": [
                    {"nodeType": "FunctionDefinition", "id": 10, "src": "0:0:0",
                     "name": "a", "kind": "function", "scope": 99,
                     "visibility": "public", "stateMutability": "nonpayable",
                     "parameters": {"nodeType": "ParameterList", "id": 11, "src": "0:0:0",
                                    "parameters": []},
                     "body": {"nodeType": "Block", "id": 12, "src": "0:0:0",
                              "statements": [
                        {"nodeType": "ExpressionStatement", "id": 13, "src": "0:0:0",
                         "expression": {"nodeType": "FunctionCall", "id": 14,
                            "src": "0:0:0", "kind": "functionCall", "names": [],
                            "expression": {"nodeType": "Identifier", "id": 15,
                               "src": "0:0:0", "name": "b",
                               "referencedDeclaration": 20,
                               "typeDescriptions": {"typeString": "function ()"}},
                            "arguments": []}}]}},
                    {"nodeType": "FunctionDefinition", "id": 20, "src": "0:0:0",
                     "name": "b", "kind": "function", "scope": 99,
                     "visibility": "public", "stateMutability": "nonpayable",
                     "parameters": {"nodeType": "ParameterList", "id": 21, "src": "0:0:0",
                                    "parameters": []},
                     "body": {"nodeType": "Block", "id": 22, "src": "0:0:0",
                              "statements": [
                        {"nodeType": "ExpressionStatement", "id": 23, "src": "0:0:0",
                         "expression": {"nodeType": "FunctionCall", "id": 24,
                            "src": "0:0:0", "kind": "functionCall", "names": [],
                            "expression": {"nodeType": "Identifier", "id": 25,
                               "src": "0:0:0", "name": "c",
                               "referencedDeclaration": 30,
                               "typeDescriptions": {"typeString": "function ()"}},
                            "arguments": []}}]}},
                    {"nodeType": "FunctionDefinition", "id": 30, "src": "0:0:0",
                     "name": "c", "kind": "function", "scope": 99,
                     "visibility": "public", "stateMutability": "nonpayable",
                     "parameters": {"nodeType": "ParameterList", "id": 31, "src": "0:0:0",
                                    "parameters": []},
                     "body": {"nodeType": "Block", "id": 32, "src": "0:0:0",
                              "statements": [
                        {"nodeType": "ExpressionStatement", "id": 33, "src": "0:0:0",
                         "expression": {"nodeType": "FunctionCall", "id": 34,
                            "src": "0:0:0", "kind": "functionCall", "names": [],
                            "expression": {"nodeType": "Identifier", "id": 35,
                               "src": "0:0:0", "name": "b",
                               "referencedDeclaration": 20,
                               "typeDescriptions": {"typeString": "function ()"}},
                            "arguments": []}}]}}
                 ]}
            ]}"#;
        let value: Value = serde_json::from_str(json).expect("valid json");
        let registry = Registry::new();
        let mut warnings = Vec::new();
        {
            let mut ctx = BuildCtx::new(&registry, Dialect::V08, &mut warnings);
            build_source_unit(&value, &mut ctx).expect("build succeeds");
        }
        registry
    }

    #[test]
    fn test_direct_callees() {
        let registry = fixture();
        let reader = registry.read();
        let path = call_path(&reader, NodeId(10)).expect("function a");
        assert_eq!(path.signature, "C.a()");
        assert_eq!(path.calls.len(), 1);
        assert_eq!(path.calls[0].signature, "C.b()");
        assert!(path.calls[0].calls.is_empty());
    }

    #[test]
    fn test_expansion_reaches_transitive_callees() {
        let registry = fixture();
        let reader = registry.read();
        let mut path = call_path(&reader, NodeId(10)).expect("function a");
        let mut visited = HashSet::from([NodeId(10)]);
        expand_all(&reader, &mut path, &mut visited);
        assert_eq!(path.flatten(), vec!["C.a()", "C.b()", "C.c()"]);
        assert!(path.find(NodeId(30)).is_some());
    }

    #[test]
    fn test_cycle_does_not_loop() {
        let registry = fixture();
        let reader = registry.read();
        // b -> c -> b closes a cycle; expansion must terminate.
        let mut path = call_path(&reader, NodeId(20)).expect("function b");
        let mut visited = HashSet::from([NodeId(20)]);
        expand_all(&reader, &mut path, &mut visited);
        assert_eq!(path.flatten(), vec!["C.b()", "C.c()"]);
    }

    #[test]
    fn test_graph_export() {
        let registry = fixture();
        let reader = registry.read();
        let paths = build_call_graph(&reader);
        let graph = to_graph(&paths);
        assert_eq!(graph.node_count(), 3);
        // a->b, b->c, c->b
        assert_eq!(graph.edge_count(), 3);
        let dot = to_dot(&paths);
        assert!(dot.contains("C.a()"));
        assert!(dot.contains("digraph"));
    }
}
