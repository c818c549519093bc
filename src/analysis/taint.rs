//! Delegatecall detection and target classification.
//!
//! A call forwarded through `delegatecall` executes foreign code against
//! the caller's storage, so any such site is a finding. When the receiver
//! is an identifier of a specific contract type known to the registry the
//! finding carries that contract's name; everything else (an address
//! parameter, a computed expression, an interface type the registry never
//! saw) is classified unknown. Unknown is the fail-closed default: an
//! unclassifiable target must still be guarded.

use crate::ast::registry::Reader;
use crate::ast::{Node, NodeId};

/// Who the delegatecall hands control to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Target {
    /// Receiver is typed as this registry-known contract.
    Known { contract: String },
    Unknown,
}

/// One delegatecall site inside one function.
#[derive(Clone, Debug)]
pub struct Finding {
    /// Function performing the call.
    pub function: NodeId,
    pub signature: String,
    /// Enclosing contract.
    pub contract: NodeId,
    /// The statement the call happens in; assertions go right before it.
    pub statement: NodeId,
    pub target: Target,
}

/// At most one finding of each kind per function, first site wins.
#[derive(Clone, Debug, Default)]
pub struct FindingSlot {
    pub known: Option<Finding>,
    pub unknown: Option<Finding>,
}

impl FindingSlot {
    pub fn is_empty(&self) -> bool {
        self.known.is_none() && self.unknown.is_none()
    }

    fn record(&mut self, finding: Finding) {
        let slot = match finding.target {
            Target::Known { .. } => &mut self.known,
            Target::Unknown => &mut self.unknown,
        };
        if slot.is_none() {
            *slot = Some(finding);
        }
    }
}

/// Scan one function body for delegatecall sites.
pub fn scan_function(reader: &Reader<'_>, function: NodeId) -> FindingSlot {
    let mut slot = FindingSlot::default();
    let def = match reader.function(function) {
        Some(def) => def,
        None => return slot,
    };
    let body = match def.body {
        Some(body) => body,
        None => return slot,
    };
    if let Some(Node::Block(block)) = reader.node(body) {
        for statement in block.statements.clone() {
            scan_statement(reader, function, def.scope, statement, statement, &mut slot);
        }
    }
    slot
}

/// Descend one statement; `statement` stays fixed while the walk crosses
/// into expressions so the finding points at the splice position. Nested
/// statements (if/for bodies) re-anchor on themselves.
fn scan_statement(
    reader: &Reader<'_>,
    function: NodeId,
    contract: NodeId,
    statement: NodeId,
    current: NodeId,
    slot: &mut FindingSlot,
) {
    let node = match reader.node(current) {
        Some(node) => node,
        None => return,
    };
    if let Node::FunctionCall(call) = node {
        if let Some(target) = delegatecall_target(reader, call.expression) {
            let signature = reader
                .function(function)
                .map(|d| d.signature.clone())
                .unwrap_or_default();
            slot.record(Finding {
                function,
                signature,
                contract,
                statement,
                target,
            });
        }
    }
    let anchor = if is_statement(node) { current } else { statement };
    for child in node.children() {
        scan_statement(reader, function, contract, anchor, child, slot);
    }
}

fn is_statement(node: &Node) -> bool {
    matches!(
        node,
        Node::ExpressionStatement(_)
            | Node::VariableDeclarationStatement(_)
            | Node::Return(_)
            | Node::EmitStatement(_)
            | Node::RevertStatement(_)
            | Node::IfStatement(_)
            | Node::ForStatement(_)
            | Node::WhileStatement(_)
            | Node::DoWhileStatement(_)
            | Node::TryStatement(_)
    )
}

/// `Some(target)` when the callee expression is `<receiver>.delegatecall`.
fn delegatecall_target(reader: &Reader<'_>, expression: Option<NodeId>) -> Option<Target> {
    let access = reader.node(expression?)?.as_member_access()?;
    if access.member_name != "delegatecall" {
        return None;
    }
    Some(classify_receiver(reader, access.expression))
}

fn classify_receiver(reader: &Reader<'_>, receiver: Option<NodeId>) -> Target {
    let ident = match receiver.and_then(|id| reader.node(id)).and_then(Node::as_identifier) {
        Some(ident) => ident,
        None => return Target::Unknown,
    };
    // type strings for contract-typed values read `contract Helper`.
    let name = match ident.type_string.strip_prefix("contract ") {
        Some(rest) => rest.split_whitespace().next().unwrap_or_default(),
        None => return Target::Unknown,
    };
    if reader.contract_by_name(name).is_some() {
        Target::Known {
            contract: name.to_string(),
        }
    } else {
        Target::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::build::{build_source_unit, BuildCtx};
    use crate::ast::dialect::Dialect;
    use crate::ast::registry::Registry;
    use serde_json::Value;

    fn load(json: &str) -> Registry {
        let value: Value = serde_json::from_str(json).expect("valid json");
        let registry = Registry::new();
        let mut warnings = Vec::new();
        {
            let mut ctx = BuildCtx::new(&registry, Dialect::V08, &mut warnings);
            build_source_unit(&value, &mut ctx).expect("build succeeds");
        }
        registry
    }

    fn proxy_fixture(receiver_type: &str, with_helper: bool) -> Registry {
        let helper = if with_helper {
            r#",{"nodeType": "ContractDefinition", "id": 90, "src": "0:0:0",
                "name": "Helper", "contractKind": "contract",
                "linearizedBaseContracts": [90], "nodes": []}"#
        } else {
            ""
        };
        let json = format!(
            r#"{{
            "nodeType": "SourceUnit", "id": 100, "src": "0:0:0",
            "nodes": [
                {{"nodeType": "PragmaDirective", "id": 1, "src": "0:0:0",
                 "literals": ["solidity", "0.8", ".0"]}},
                {{"nodeType": "ContractDefinition", "id": 80, "src": "0:0:0",
                 "name": "Proxy", "contractKind": "contract",
                 "linearizedBaseContracts": [80],
                 "nodes": [
                    {{"nodeType": "FunctionDefinition", "id": 50, "src": "0:0:0",
                     "name": "forward", "kind": "function", "scope": 80,
                     "visibility": "public", "stateMutability": "nonpayable",
                     "parameters": {{"nodeType": "ParameterList", "id": 51,
                                    "src": "0:0:0", "parameters": []}},
                     "body": {{"nodeType": "Block", "id": 52, "src": "0:0:0",
                              "statements": [
                        {{"nodeType": "ExpressionStatement", "id": 53, "src": "0:0:0",
                         "expression": {{"nodeType": "FunctionCall", "id": 54,
                            "src": "0:0:0", "kind": "functionCall", "names": [],
                            "expression": {{"nodeType": "MemberAccess", "id": 55,
                               "src": "0:0:0", "memberName": "delegatecall",
                               "expression": {{"nodeType": "Identifier", "id": 56,
                                  "src": "0:0:0", "name": "callee",
                                  "typeDescriptions": {{"typeString": "{}"}}}}}},
                            "arguments": [
                               {{"nodeType": "Identifier", "id": 57, "src": "0:0:0",
                                 "name": "data",
                                 "typeDescriptions": {{"typeString": "bytes memory"}}}}
                            ]}}}}
                     ]}}}}
                 ]}}{}
            ]}}"#,
            receiver_type, helper
        );
        load(&json)
    }

    #[test]
    fn test_known_target() {
        let registry = proxy_fixture("contract Helper", true);
        let reader = registry.read();
        let slot = scan_function(&reader, NodeId(50));
        let finding = slot.known.expect("known finding");
        assert_eq!(
            finding.target,
            Target::Known {
                contract: "Helper".to_string()
            }
        );
        assert_eq!(finding.signature, "Proxy.forward()");
        assert_eq!(finding.statement, NodeId(53));
        assert!(slot.unknown.is_none());
    }

    #[test]
    fn test_address_receiver_is_unknown() {
        let registry = proxy_fixture("address", false);
        let reader = registry.read();
        let slot = scan_function(&reader, NodeId(50));
        let finding = slot.unknown.expect("unknown finding");
        assert_eq!(finding.target, Target::Unknown);
        assert!(slot.known.is_none());
    }

    #[test]
    fn test_contract_type_outside_registry_fails_closed() {
        // Typed as a contract, but that contract was never built. Guard anyway.
        let registry = proxy_fixture("contract Mystery", false);
        let reader = registry.read();
        let slot = scan_function(&reader, NodeId(50));
        assert!(slot.unknown.is_some());
        assert!(slot.known.is_none());
    }

    #[test]
    fn test_function_without_calls_is_clean() {
        let registry = proxy_fixture("contract Helper", true);
        let reader = registry.read();
        // Helper has no functions; scanning a bogus id yields nothing.
        let slot = scan_function(&reader, NodeId(999));
        assert!(slot.is_empty());
    }
}
