//! Shadow-state synthesis and assertion splicing.
//!
//! For a contract implicated by a delegatecall finding, the engine keeps
//! an off-to-the-side record of who last legitimately wrote the protected
//! variable, then asserts agreement right before the delegatecall runs:
//!
//! ```text
//! bytes track_owner;
//! mapping(bytes => address) track_mapping_owner;
//! function track_func_owner() internal view returns (address) { ... }
//! ...
//! track_mapping_owner["C.transfer(address to)"] = to;
//! track_owner = "C.transfer(address to)";
//! ...
//! assert(track_mapping_owner[track_owner] == track_func_owner());
//! owner_slot.delegatecall(data);
//! ```
//!
//! All splices go through a run-scoped set of rendered statement text, and
//! assertion insertion also checks the statement already in front of the
//! call site, so running the engine twice (or running it over already
//! hardened source) changes nothing.

use std::collections::HashSet;

use crate::analysis::taint::{Finding, Target};
use crate::ast::registry::{Reader, Registry};
use crate::ast::render::render;
use crate::ast::*;
use crate::diagnostic::Diagnostic;

/// Where the protected value lives and how to reach it.
#[derive(Clone, Debug)]
struct OwnerSlot {
    /// Contract declaring the variable (the finding's contract or one of
    /// its bases).
    contract: NodeId,
    contract_name: String,
    variable: String,
    /// Set when the owner sits in a raw `bytes32` slot behind accessors;
    /// writes are then traced through the setter and the assertion reads
    /// through the getter.
    accessors: Option<Accessors>,
}

#[derive(Clone, Debug)]
struct Accessors {
    setter: NodeId,
    getter_name: String,
}

/// Harden the contract implicated by `finding`. Returns whether anything
/// was spliced.
pub fn harden(
    registry: &Registry,
    finding: &Finding,
    candidates: &[String],
    seen: &mut HashSet<String>,
    warnings: &mut Vec<Diagnostic>,
) -> bool {
    let slot = {
        let reader = registry.read();
        match select_target(&reader, finding.contract, candidates) {
            Some(slot) => slot,
            None => {
                let name = reader
                    .contract(finding.contract)
                    .map(|c| c.name.clone())
                    .unwrap_or_default();
                warnings.push(
                    Diagnostic::warning(
                        format!(
                            "instrumentation skipped: no protected variable in contract [{}]",
                            name
                        ),
                        source_of(&reader, finding.contract),
                    )
                    .with_help(format!("candidates tried: {}", candidates.join(", "))),
                );
                return false;
            }
        }
    };

    if let Target::Known { contract } = &finding.target {
        let reader = registry.read();
        let compatible = reader
            .contract_by_name(contract)
            .map(|callee| layout_compatible(&reader, finding.contract, callee.id, candidates))
            .unwrap_or(false);
        if !compatible {
            warnings.push(
                Diagnostic::warning(
                    format!(
                        "instrumentation skipped: storage layout of [{}] does not line up \
                         with delegatecall target [{}]",
                        slot.contract_name, contract
                    ),
                    source_of(&reader, finding.statement),
                )
                .with_note(
                    "the positional comparison of linearized state variables is a \
                     heuristic; a mismatch means the protected slot cannot be trusted"
                        .to_string(),
                ),
            );
            return false;
        }
    }

    synthesize_shadow_state(registry, &slot, seen, warnings);
    instrument_writes(registry, &slot, seen, warnings);
    instrument_call_sites(registry, finding.contract, &slot, warnings);
    true
}

fn source_of(reader: &Reader<'_>, id: NodeId) -> String {
    reader
        .node(id)
        .map(|n| n.src().to_string())
        .unwrap_or_else(|| "-".to_string())
}

// ---------------------------------------------------------------------------
// step 1: target selection

fn select_target(
    reader: &Reader<'_>,
    contract: NodeId,
    candidates: &[String],
) -> Option<OwnerSlot> {
    let def = reader.contract(contract)?;

    // The contract's own candidate variable wins.
    if let Some(slot) = candidate_slot(reader, def, candidates) {
        return Some(slot);
    }

    // Then the inheritance chain: an Ownable base, or any base that
    // declares a candidate itself.
    for base in &def.linearized_base_contracts {
        if *base == contract {
            continue;
        }
        let base_def = match reader.contract(*base) {
            Some(base_def) => base_def,
            None => continue,
        };
        if let Some(slot) = candidate_slot(reader, base_def, candidates) {
            return Some(slot);
        }
        if base_def.name == "Ownable" {
            if let Some(slot) = bytes_slot(reader, base_def, candidates) {
                return Some(slot);
            }
        }
    }

    // Fall back to a bytes32-represented owner on the contract itself.
    bytes_slot(reader, def, candidates)
}

/// An exact-named candidate state variable on `def`.
fn candidate_slot(
    reader: &Reader<'_>,
    def: &ContractDefinition,
    candidates: &[String],
) -> Option<OwnerSlot> {
    own_state_variables(reader, def)
        .into_iter()
        .find(|var| candidates.iter().any(|c| *c == var.name))
        .map(|var| OwnerSlot {
            contract: def.id,
            contract_name: def.name.clone(),
            variable: var.name.clone(),
            accessors: None,
        })
}

/// A `bytes32` slot whose name merely contains a candidate, reachable
/// through set/get accessors.
fn bytes_slot(
    reader: &Reader<'_>,
    def: &ContractDefinition,
    candidates: &[String],
) -> Option<OwnerSlot> {
    let var = own_state_variables(reader, def)
        .into_iter()
        .find(|var| var.type_string == "bytes32" && names_candidate(&var.name, candidates))?;
    let setter = find_setter(reader, def, candidates)?;
    let getter_name = find_getter(reader, def, candidates)?;
    Some(OwnerSlot {
        contract: def.id,
        contract_name: def.name.clone(),
        variable: var.name.clone(),
        accessors: Some(Accessors { setter, getter_name }),
    })
}

fn own_state_variables<'a>(
    reader: &'a Reader<'_>,
    def: &ContractDefinition,
) -> Vec<&'a VariableDeclaration> {
    def.nodes
        .iter()
        .filter_map(|id| reader.node(*id))
        .filter_map(Node::as_variable)
        .filter(|var| var.state_variable)
        .collect()
}

fn contract_functions(reader: &Reader<'_>, contract: NodeId) -> Vec<NodeId> {
    reader
        .contract(contract)
        .map(|def| {
            def.nodes
                .iter()
                .copied()
                .filter(|id| reader.function(*id).is_some())
                .collect()
        })
        .unwrap_or_default()
}

/// A `set…`/`transfer…` function whose name carries a candidate and that
/// takes exactly one address. The name check keeps unrelated setters like
/// `setFee(address)` from being mistaken for the ownership transfer.
fn find_setter(
    reader: &Reader<'_>,
    def: &ContractDefinition,
    candidates: &[String],
) -> Option<NodeId> {
    def.nodes.iter().copied().find(|id| {
        let f = match reader.function(*id) {
            Some(f) => f,
            None => return false,
        };
        if !(f.name.starts_with("set") || f.name.starts_with("transfer")) {
            return false;
        }
        if !names_candidate(&f.name, candidates) {
            return false;
        }
        parameter_types(reader, f.parameters) == vec!["address".to_string()]
    })
}

/// A `get…` function whose name carries a candidate, with no parameters,
/// returning an address.
fn find_getter(
    reader: &Reader<'_>,
    def: &ContractDefinition,
    candidates: &[String],
) -> Option<String> {
    def.nodes.iter().copied().find_map(|id| {
        let f = reader.function(id)?;
        if !f.name.starts_with("get") {
            return None;
        }
        if !names_candidate(&f.name, candidates) {
            return None;
        }
        if !parameter_types(reader, f.parameters).is_empty() {
            return None;
        }
        if parameter_types(reader, f.return_parameters) == vec!["address".to_string()] {
            Some(f.name.clone())
        } else {
            None
        }
    })
}

fn names_candidate(name: &str, candidates: &[String]) -> bool {
    let lower = name.to_lowercase();
    candidates.iter().any(|c| lower.contains(&c.to_lowercase()))
}

fn parameter_types(reader: &Reader<'_>, list: Option<NodeId>) -> Vec<String> {
    list.and_then(|id| reader.node(id))
        .and_then(Node::as_parameter_list)
        .map(|pl| {
            pl.parameters
                .iter()
                .filter_map(|id| reader.node(*id))
                .filter_map(Node::as_variable)
                .map(|var| var.type_string.clone())
                .collect()
        })
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// step 2: layout compatibility

/// Positional heuristic over linearized state-variable lists: the callee
/// must declare a candidate-named variable at some ordinal, and the caller
/// must have a variable of the identical declared type at that ordinal.
fn layout_compatible(
    reader: &Reader<'_>,
    caller: NodeId,
    callee: NodeId,
    candidates: &[String],
) -> bool {
    let caller_vars = linearized_state_variables(reader, caller);
    let callee_vars = linearized_state_variables(reader, callee);
    callee_vars.iter().enumerate().any(|(i, (name, ty))| {
        candidates.iter().any(|c| c == name)
            && caller_vars.get(i).is_some_and(|(_, caller_ty)| caller_ty == ty)
    })
}

/// `(name, type)` pairs in storage order: base-most contract first,
/// the contract's own variables last.
fn linearized_state_variables(reader: &Reader<'_>, contract: NodeId) -> Vec<(String, String)> {
    let def = match reader.contract(contract) {
        Some(def) => def,
        None => return Vec::new(),
    };
    let mut out = Vec::new();
    for id in def.linearized_base_contracts.iter().rev() {
        if let Some(base) = reader.contract(*id) {
            for var in own_state_variables(reader, base) {
                out.push((var.name.clone(), var.type_string.clone()));
            }
        }
    }
    out
}

// ---------------------------------------------------------------------------
// step 3: shadow state

fn synthesize_shadow_state(
    registry: &Registry,
    slot: &OwnerSlot,
    seen: &mut HashSet<String>,
    warnings: &mut Vec<Diagnostic>,
) {
    let track = synth_track_variable(registry, &slot.variable);
    append_member(registry, slot.contract, track, seen, warnings);

    let mapping = synth_track_mapping(registry, &slot.variable);
    append_member(registry, slot.contract, mapping, seen, warnings);

    let func = synth_track_func(registry, slot);
    append_member(registry, slot.contract, func, seen, warnings);
}

/// Splice a synthesized member unless an equally rendered one is already
/// there (from this run, or from already-hardened input).
fn append_member(
    registry: &Registry,
    contract: NodeId,
    member: NodeId,
    seen: &mut HashSet<String>,
    warnings: &mut Vec<Diagnostic>,
) {
    let text = render(&registry.read(), member, true, false, "    ", warnings);
    if !seen.insert(format!("{}@{}", text, contract)) {
        return;
    }
    {
        let reader = registry.read();
        let members = reader
            .contract(contract)
            .map(|def| def.nodes.clone())
            .unwrap_or_default();
        for existing in members {
            if render(&reader, existing, true, false, "    ", warnings) == text {
                return;
            }
        }
    }
    let mut writer = registry.write();
    if let Some(def) = writer.node_mut(contract).and_then(Node::as_contract_mut) {
        def.nodes.push(member);
    }
}

fn synth_elementary(registry: &Registry, name: &str) -> NodeId {
    registry.insert(Node::ElementaryTypeName(ElementaryTypeName {
        id: registry.fresh_id(),
        src: "-".to_string(),
        name: name.to_string(),
        state_mutability: None,
    }))
}

fn synth_identifier(registry: &Registry, name: &str, type_string: &str) -> NodeId {
    registry.insert(Node::Identifier(Identifier {
        id: registry.fresh_id(),
        src: "-".to_string(),
        name: name.to_string(),
        referenced_declaration: None,
        type_string: type_string.to_string(),
    }))
}

fn synth_string_literal(registry: &Registry, text: &str) -> NodeId {
    registry.insert(Node::Literal(Literal {
        id: registry.fresh_id(),
        src: "-".to_string(),
        kind: "string".to_string(),
        value: Some(text.to_string()),
        hex_value: None,
        subdenomination: None,
        type_string: format!("literal_string \"{}\"", text),
    }))
}

/// `bytes track_V;`
fn synth_track_variable(registry: &Registry, variable: &str) -> NodeId {
    let type_name = synth_elementary(registry, "bytes");
    registry.insert(Node::VariableDeclaration(VariableDeclaration {
        id: registry.fresh_id(),
        src: "-".to_string(),
        name: format!("track_{}", variable),
        constant: false,
        state_variable: true,
        storage_location: "default".to_string(),
        visibility: "internal".to_string(),
        indexed: false,
        type_name: Some(type_name),
        value: None,
        type_string: "bytes".to_string(),
        scope: NodeId(0),
    }))
}

/// `mapping(bytes => address) track_mapping_V;`
fn synth_track_mapping(registry: &Registry, variable: &str) -> NodeId {
    let key = synth_elementary(registry, "bytes");
    let value = synth_elementary(registry, "address");
    let mapping = registry.insert(Node::Mapping(Mapping {
        id: registry.fresh_id(),
        src: "-".to_string(),
        key_type: Some(key),
        value_type: Some(value),
    }));
    registry.insert(Node::VariableDeclaration(VariableDeclaration {
        id: registry.fresh_id(),
        src: "-".to_string(),
        name: format!("track_mapping_{}", variable),
        constant: false,
        state_variable: true,
        storage_location: "default".to_string(),
        visibility: "internal".to_string(),
        indexed: false,
        type_name: Some(mapping),
        value: None,
        type_string: "mapping(bytes => address)".to_string(),
        scope: NodeId(0),
    }))
}

/// `function track_func_V() internal view returns (address) { return <live V>; }`
///
/// The live value is the variable itself, or its getter when the owner
/// hides behind accessors.
fn synth_track_func(registry: &Registry, slot: &OwnerSlot) -> NodeId {
    let live = match &slot.accessors {
        Some(acc) => {
            let callee = synth_identifier(
                registry,
                &acc.getter_name,
                "function () view returns (address)",
            );
            registry.insert(Node::FunctionCall(FunctionCall {
                id: registry.fresh_id(),
                src: "-".to_string(),
                kind: "functionCall".to_string(),
                expression: Some(callee),
                arguments: Vec::new(),
                names: Vec::new(),
            }))
        }
        None => synth_identifier(registry, &slot.variable, "address"),
    };
    let ret = registry.insert(Node::Return(Return {
        id: registry.fresh_id(),
        src: "-".to_string(),
        expression: Some(live),
    }));
    let body = registry.insert(Node::Block(Block {
        id: registry.fresh_id(),
        src: "-".to_string(),
        statements: vec![ret],
    }));
    let params = registry.insert(Node::ParameterList(ParameterList {
        id: registry.fresh_id(),
        src: "-".to_string(),
        parameters: Vec::new(),
    }));
    let ret_type = synth_elementary(registry, "address");
    let ret_var = registry.insert(Node::VariableDeclaration(VariableDeclaration {
        id: registry.fresh_id(),
        src: "-".to_string(),
        name: String::new(),
        constant: false,
        state_variable: false,
        storage_location: "default".to_string(),
        visibility: String::new(),
        indexed: false,
        type_name: Some(ret_type),
        value: None,
        type_string: "address".to_string(),
        scope: NodeId(0),
    }));
    let returns = registry.insert(Node::ParameterList(ParameterList {
        id: registry.fresh_id(),
        src: "-".to_string(),
        parameters: vec![ret_var],
    }));
    let name = format!("track_func_{}", slot.variable);
    registry.insert(Node::FunctionDefinition(FunctionDefinition {
        id: registry.fresh_id(),
        src: "-".to_string(),
        name: name.clone(),
        kind: "function".to_string(),
        visibility: "internal".to_string(),
        state_mutability: "view".to_string(),
        is_virtual: false,
        implemented: true,
        scope: slot.contract,
        parameters: Some(params),
        return_parameters: Some(returns),
        modifiers: Vec::new(),
        overrides: None,
        body: Some(body),
        signature: format!("{}.{}()", slot.contract_name, name),
    }))
}

// ---------------------------------------------------------------------------
// step 4: write instrumentation

/// Record every legitimate write of the protected variable: at the end of
/// any function assigning it, remember which signature wrote what.
fn instrument_writes(
    registry: &Registry,
    slot: &OwnerSlot,
    seen: &mut HashSet<String>,
    warnings: &mut Vec<Diagnostic>,
) {
    enum Written {
        /// Copy of an existing right-hand side.
        Expression(NodeId),
        /// Reference to the setter's parameter by name.
        Parameter(String),
    }

    let writes: Vec<(NodeId, String, Written)> = {
        let reader = registry.read();
        match &slot.accessors {
            // Accessor path: the setter's single address parameter is the
            // value being written.
            Some(acc) => reader
                .function(acc.setter)
                .and_then(|f| {
                    let body = f.body?;
                    let param = first_parameter_name(&reader, f.parameters)?;
                    Some(vec![(body, f.signature.clone(), Written::Parameter(param))])
                })
                .unwrap_or_default(),
            None => contract_functions(&reader, slot.contract)
                .into_iter()
                .filter_map(|fid| {
                    let f = reader.function(fid)?;
                    let body = f.body?;
                    let rhs = find_write(&reader, body, &slot.variable)?;
                    Some((body, f.signature.clone(), Written::Expression(rhs)))
                })
                .collect(),
        }
    };

    for (body, signature, value) in writes {
        let value_copy = match value {
            Written::Expression(rhs) => match registry.clone_subtree(rhs) {
                Some(copy) => copy,
                None => continue,
            },
            Written::Parameter(name) => synth_identifier(registry, &name, "address"),
        };
        let mapping_write =
            synth_mapping_write(registry, &slot.variable, &signature, value_copy);
        append_statement(registry, body, mapping_write, seen, warnings);
        let track_write = synth_track_write(registry, &slot.variable, &signature);
        append_statement(registry, body, track_write, seen, warnings);
    }
}

fn first_parameter_name(reader: &Reader<'_>, list: Option<NodeId>) -> Option<String> {
    let first = *reader.node(list?)?.as_parameter_list()?.parameters.first()?;
    reader
        .node(first)
        .and_then(Node::as_variable)
        .map(|var| var.name.clone())
}

/// The right-hand side of the first `V = <expr>` assignment under `id`.
fn find_write(reader: &Reader<'_>, id: NodeId, variable: &str) -> Option<NodeId> {
    let node = reader.node(id)?;
    if let Node::Assignment(assign) = node {
        let lhs_is_var = assign
            .left_hand_side
            .and_then(|lhs| reader.node(lhs))
            .and_then(Node::as_identifier)
            .is_some_and(|ident| ident.name == variable);
        if lhs_is_var && assign.operator == "=" {
            return assign.right_hand_side;
        }
    }
    node.children()
        .into_iter()
        .find_map(|child| find_write(reader, child, variable))
}

/// `track_mapping_V["<signature>"] = <value>;`
fn synth_mapping_write(
    registry: &Registry,
    variable: &str,
    signature: &str,
    value: NodeId,
) -> NodeId {
    let base = synth_identifier(
        registry,
        &format!("track_mapping_{}", variable),
        "mapping(bytes => address)",
    );
    let key = synth_string_literal(registry, signature);
    let index = registry.insert(Node::IndexAccess(IndexAccess {
        id: registry.fresh_id(),
        src: "-".to_string(),
        base_expression: Some(base),
        index_expression: Some(key),
    }));
    let assign = registry.insert(Node::Assignment(Assignment {
        id: registry.fresh_id(),
        src: "-".to_string(),
        operator: "=".to_string(),
        left_hand_side: Some(index),
        right_hand_side: Some(value),
    }));
    synth_statement(registry, assign)
}

/// `track_V = "<signature>";`
fn synth_track_write(registry: &Registry, variable: &str, signature: &str) -> NodeId {
    let lhs = synth_identifier(registry, &format!("track_{}", variable), "bytes");
    let rhs = synth_string_literal(registry, signature);
    let assign = registry.insert(Node::Assignment(Assignment {
        id: registry.fresh_id(),
        src: "-".to_string(),
        operator: "=".to_string(),
        left_hand_side: Some(lhs),
        right_hand_side: Some(rhs),
    }));
    synth_statement(registry, assign)
}

fn synth_statement(registry: &Registry, expression: NodeId) -> NodeId {
    registry.insert(Node::ExpressionStatement(ExpressionStatement {
        id: registry.fresh_id(),
        src: "-".to_string(),
        expression: Some(expression),
    }))
}

/// Append a synthesized statement to a block unless it is already present
/// by rendered text.
fn append_statement(
    registry: &Registry,
    block: NodeId,
    statement: NodeId,
    seen: &mut HashSet<String>,
    warnings: &mut Vec<Diagnostic>,
) {
    let text = render(&registry.read(), statement, true, false, "", warnings);
    let key = format!("{}@{}", text, block);
    if !seen.insert(key) {
        return;
    }
    {
        let reader = registry.read();
        let statements = match reader.node(block).and_then(Node::as_block) {
            Some(b) => b.statements.clone(),
            None => return,
        };
        for existing in statements {
            if render(&reader, existing, true, false, "", warnings) == text {
                return;
            }
        }
    }
    let mut writer = registry.write();
    if let Some(b) = writer.node_mut(block).and_then(Node::as_block_mut) {
        b.statements.push(statement);
    }
}

// ---------------------------------------------------------------------------
// step 5: call-site assertions

/// Guard every delegatecall statement in the contract with an assertion
/// that the live protected value matches the last recorded write.
fn instrument_call_sites(
    registry: &Registry,
    contract: NodeId,
    slot: &OwnerSlot,
    warnings: &mut Vec<Diagnostic>,
) {
    let sites: Vec<(NodeId, NodeId)> = {
        let reader = registry.read();
        contract_functions(&reader, contract)
            .into_iter()
            .filter_map(|fid| reader.function(fid).and_then(|f| f.body))
            .flat_map(|body| {
                let mut out = Vec::new();
                collect_sites(&reader, body, &mut out);
                out
            })
            .collect()
    };

    for (block, statement) in sites {
        let assertion = synth_assert(registry, &slot.variable);
        let text = render(&registry.read(), assertion, true, false, "", warnings);

        let position = {
            let reader = registry.read();
            let statements = match reader.node(block).and_then(Node::as_block) {
                Some(b) => b.statements.clone(),
                None => continue,
            };
            let index = match statements.iter().position(|s| *s == statement) {
                Some(index) => index,
                None => continue,
            };
            // Position-aware dedup: the same assertion may legitimately
            // precede several delegatecall statements, so only the one
            // directly in front of this site counts.
            let already = index > 0
                && render(&reader, statements[index - 1], true, false, "", warnings) == text;
            if already {
                None
            } else {
                Some(index)
            }
        };

        if let Some(index) = position {
            let mut writer = registry.write();
            if let Some(b) = writer.node_mut(block).and_then(Node::as_block_mut) {
                b.statements.insert(index, assertion);
            }
        }
    }
}

/// Block-level statements containing a delegatecall, innermost block wins.
fn collect_sites(reader: &Reader<'_>, block: NodeId, out: &mut Vec<(NodeId, NodeId)>) {
    let statements = match reader.node(block) {
        Some(Node::Block(b)) => b.statements.clone(),
        Some(Node::UncheckedBlock(b)) => b.statements.clone(),
        _ => return,
    };
    for statement in statements {
        if matches!(
            reader.node(statement),
            Some(Node::Block(_)) | Some(Node::UncheckedBlock(_))
        ) {
            collect_sites(reader, statement, out);
            continue;
        }
        if has_delegatecall_outside_blocks(reader, statement) {
            out.push((block, statement));
        }
        for nested in nested_blocks(reader, statement) {
            collect_sites(reader, nested, out);
        }
    }
}

/// Does this subtree perform a delegatecall before crossing into a nested
/// block? Calls inside nested blocks are anchored by the recursion.
fn has_delegatecall_outside_blocks(reader: &Reader<'_>, id: NodeId) -> bool {
    let node = match reader.node(id) {
        Some(node) => node,
        None => return false,
    };
    if matches!(node, Node::Block(_) | Node::UncheckedBlock(_)) {
        return false;
    }
    if let Node::FunctionCall(call) = node {
        let is_delegatecall = call
            .expression
            .and_then(|e| reader.node(e))
            .and_then(Node::as_member_access)
            .is_some_and(|access| access.member_name == "delegatecall");
        if is_delegatecall {
            return true;
        }
    }
    node.children()
        .into_iter()
        .any(|child| has_delegatecall_outside_blocks(reader, child))
}

/// Immediate block descendants, not crossing block boundaries.
fn nested_blocks(reader: &Reader<'_>, id: NodeId) -> Vec<NodeId> {
    let node = match reader.node(id) {
        Some(node) => node,
        None => return Vec::new(),
    };
    let mut out = Vec::new();
    for child in node.children() {
        match reader.node(child) {
            Some(Node::Block(_)) | Some(Node::UncheckedBlock(_)) => out.push(child),
            Some(_) => out.extend(nested_blocks(reader, child)),
            None => {}
        }
    }
    out
}

/// `assert(track_mapping_V[track_V] == track_func_V());`
fn synth_assert(registry: &Registry, variable: &str) -> NodeId {
    let mapping = synth_identifier(
        registry,
        &format!("track_mapping_{}", variable),
        "mapping(bytes => address)",
    );
    let key = synth_identifier(registry, &format!("track_{}", variable), "bytes");
    let recorded = registry.insert(Node::IndexAccess(IndexAccess {
        id: registry.fresh_id(),
        src: "-".to_string(),
        base_expression: Some(mapping),
        index_expression: Some(key),
    }));
    let getter = synth_identifier(
        registry,
        &format!("track_func_{}", variable),
        "function () view returns (address)",
    );
    let live = registry.insert(Node::FunctionCall(FunctionCall {
        id: registry.fresh_id(),
        src: "-".to_string(),
        kind: "functionCall".to_string(),
        expression: Some(getter),
        arguments: Vec::new(),
        names: Vec::new(),
    }));
    let comparison = registry.insert(Node::BinaryOperation(BinaryOperation {
        id: registry.fresh_id(),
        src: "-".to_string(),
        operator: "==".to_string(),
        left_expression: Some(recorded),
        right_expression: Some(live),
    }));
    let assert_fn = synth_identifier(registry, "assert", "function (bool) pure");
    let call = registry.insert(Node::FunctionCall(FunctionCall {
        id: registry.fresh_id(),
        src: "-".to_string(),
        kind: "functionCall".to_string(),
        expression: Some(assert_fn),
        arguments: vec![comparison],
        names: Vec::new(),
    }));
    synth_statement(registry, call)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::taint::scan_function;
    use crate::ast::build::{build_source_unit, BuildCtx};
    use crate::ast::dialect::Dialect;
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

    /// contract Proxy { address owner; function f() { addr.delegatecall(data); }
    /// function setOwner(address n) { owner = n; } }
    fn proxy_json() -> String {
        r#"{
        "nodeType": "SourceUnit", "id": 200, "src": "0:0:0",
        "nodes": [
            {"nodeType": "PragmaDirective", "id": 1, "src": "0:0:0",
             "literals": ["solidity", "0.8", ".0"]},
            {"nodeType": "ContractDefinition", "id": 199, "src": "0:0:0",
             "name": "Proxy", "contractKind": "contract",
             "linearizedBaseContracts": [199],
             "nodes": [
                {"nodeType": "VariableDeclaration", "id": 3, "src": "0:0:0",
                 "name": "owner", "stateVariable": true, "visibility": "internal",
                 "storageLocation": "default", "scope": 199,
                 "typeDescriptions": {"typeString": "address"},
                 "typeName": {"nodeType": "ElementaryTypeName", "id": 2,
                              "src": "0:0:0", "name": "address"}},
                {"nodeType": "FunctionDefinition", "id": 20, "src": "0:0:0",
                 "name": "f", "kind": "function", "scope": 199,
                 "visibility": "public", "stateMutability": "nonpayable",
                 "parameters": {"nodeType": "ParameterList", "id": 21, "src": "0:0:0",
                                "parameters": []},
                 "body": {"nodeType": "Block", "id": 22, "src": "0:0:0",
                          "statements": [
                    {"nodeType": "ExpressionStatement", "id": 23, "src": "0:0:0",
                     "expression": {"nodeType": "FunctionCall", "id": 24,
                        "src": "0:0:0", "kind": "functionCall", "names": [],
                        "expression": {"nodeType": "MemberAccess", "id": 25,
                           "src": "0:0:0", "memberName": "delegatecall",
                           "expression": {"nodeType": "Identifier", "id": 26,
                              "src": "0:0:0", "name": "addr",
                              "typeDescriptions": {"typeString": "address"}}},
                        "arguments": [
                           {"nodeType": "Identifier", "id": 27, "src": "0:0:0",
                            "name": "data",
                            "typeDescriptions": {"typeString": "bytes memory"}}]}}
                 ]}},
                {"nodeType": "FunctionDefinition", "id": 40, "src": "0:0:0",
                 "name": "setOwner", "kind": "function", "scope": 199,
                 "visibility": "public", "stateMutability": "nonpayable",
                 "parameters": {"nodeType": "ParameterList", "id": 41, "src": "0:0:0",
                                "parameters": [
                    {"nodeType": "VariableDeclaration", "id": 42, "src": "0:0:0",
                     "name": "n", "stateVariable": false, "visibility": "",
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
                           "src": "0:0:0", "name": "n",
                           "typeDescriptions": {"typeString": "address"}}}}
                 ]}}
             ]}
        ]}"#
        .to_string()
    }

    fn run_harden(registry: &Registry) -> (bool, Vec<Diagnostic>) {
        let finding = {
            let reader = registry.read();
            scan_function(&reader, NodeId(20))
                .unknown
                .expect("unknown-target finding")
        };
        let mut seen = HashSet::new();
        let mut warnings = Vec::new();
        let candidates = vec![
            "owner".to_string(),
            "_owner".to_string(),
            "owner_".to_string(),
        ];
        let applied = harden(registry, &finding, &candidates, &mut seen, &mut warnings);
        (applied, warnings)
    }

    fn rendered(registry: &Registry, root: NodeId) -> String {
        let mut warnings = Vec::new();
        render(&registry.read(), root, true, false, "", &mut warnings)
    }

    #[test]
    fn test_shadow_state_and_assertion() {
        let registry = load(&proxy_json());
        let (applied, _) = run_harden(&registry);
        assert!(applied);
        let text = rendered(&registry, NodeId(200));
        assert!(text.contains("bytes track_owner;"));
        assert!(text.contains("mapping(bytes => address) track_mapping_owner;"));
        assert!(text.contains("function track_func_owner() internal view returns (address) {"));
        assert!(text.contains("return owner;"));
        assert!(text
            .contains("assert(track_mapping_owner[track_owner] == track_func_owner());"));
        // Shadow writes land at the end of the writing function.
        assert!(text.contains("track_mapping_owner[\"Proxy.setOwner(address n)\"] = n;"));
        assert!(text.contains("track_owner = \"Proxy.setOwner(address n)\";"));
    }

    #[test]
    fn test_assertion_precedes_call_site() {
        let registry = load(&proxy_json());
        run_harden(&registry);
        let text = rendered(&registry, NodeId(200));
        let assert_at = text
            .find("assert(track_mapping_owner")
            .expect("assertion present");
        let call_at = text.find("addr.delegatecall").expect("call present");
        assert!(assert_at < call_at);
    }

    #[test]
    fn test_hardening_twice_is_idempotent() {
        let registry = load(&proxy_json());
        run_harden(&registry);
        let once = rendered(&registry, NodeId(200));
        run_harden(&registry);
        let twice = rendered(&registry, NodeId(200));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_no_candidate_skips_with_warning() {
        // Same contract but the state variable is named `admin`.
        let json = proxy_json().replace("\"owner\"", "\"admin\"");
        let registry = load(&json);
        let (applied, warnings) = run_harden(&registry);
        assert!(!applied);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("no protected variable"));
        // Nothing was spliced.
        assert!(!rendered(&registry, NodeId(200)).contains("track_"));
    }

    #[test]
    fn test_layout_mismatch_skips_known_target() {
        // Proxy's first slot is a uint256; Helper keeps its owner at slot 0
        // as an address. The positional check must refuse.
        let json = r#"{
        "nodeType": "SourceUnit", "id": 300, "src": "0:0:0",
        "nodes": [
            {"nodeType": "PragmaDirective", "id": 1, "src": "0:0:0",
             "literals": ["solidity", "0.8", ".0"]},
            {"nodeType": "ContractDefinition", "id": 280, "src": "0:0:0",
             "name": "Caller", "contractKind": "contract",
             "linearizedBaseContracts": [280],
             "nodes": [
                {"nodeType": "VariableDeclaration", "id": 203, "src": "0:0:0",
                 "name": "count", "stateVariable": true, "visibility": "internal",
                 "storageLocation": "default", "scope": 280,
                 "typeDescriptions": {"typeString": "uint256"},
                 "typeName": {"nodeType": "ElementaryTypeName", "id": 202,
                              "src": "0:0:0", "name": "uint256"}},
                {"nodeType": "VariableDeclaration", "id": 205, "src": "0:0:0",
                 "name": "owner", "stateVariable": true, "visibility": "internal",
                 "storageLocation": "default", "scope": 280,
                 "typeDescriptions": {"typeString": "address"},
                 "typeName": {"nodeType": "ElementaryTypeName", "id": 204,
                              "src": "0:0:0", "name": "address"}},
                {"nodeType": "FunctionDefinition", "id": 220, "src": "0:0:0",
                 "name": "f", "kind": "function", "scope": 280,
                 "visibility": "public", "stateMutability": "nonpayable",
                 "parameters": {"nodeType": "ParameterList", "id": 221, "src": "0:0:0",
                                "parameters": []},
                 "body": {"nodeType": "Block", "id": 222, "src": "0:0:0",
                          "statements": [
                    {"nodeType": "ExpressionStatement", "id": 223, "src": "0:0:0",
                     "expression": {"nodeType": "FunctionCall", "id": 224,
                        "src": "0:0:0", "kind": "functionCall", "names": [],
                        "expression": {"nodeType": "MemberAccess", "id": 225,
                           "src": "0:0:0", "memberName": "delegatecall",
                           "expression": {"nodeType": "Identifier", "id": 226,
                              "src": "0:0:0", "name": "helper",
                              "typeDescriptions": {"typeString": "contract Helper"}}},
                        "arguments": []}}
                 ]}}
             ]},
            {"nodeType": "ContractDefinition", "id": 290, "src": "0:0:0",
             "name": "Helper", "contractKind": "contract",
             "linearizedBaseContracts": [290],
             "nodes": [
                {"nodeType": "VariableDeclaration", "id": 207, "src": "0:0:0",
                 "name": "owner", "stateVariable": true, "visibility": "internal",
                 "storageLocation": "default", "scope": 290,
                 "typeDescriptions": {"typeString": "address"},
                 "typeName": {"nodeType": "ElementaryTypeName", "id": 206,
                              "src": "0:0:0", "name": "address"}}
             ]}
        ]}"#;
        let registry = load(json);
        let finding = {
            let reader = registry.read();
            scan_function(&reader, NodeId(220))
                .known
                .expect("known-target finding")
        };
        let mut seen = HashSet::new();
        let mut warnings = Vec::new();
        let candidates = vec!["owner".to_string()];
        let applied = harden(&registry, &finding, &candidates, &mut seen, &mut warnings);
        assert!(!applied);
        assert!(warnings
            .iter()
            .any(|w| w.message.contains("storage layout")));
    }

    #[test]
    fn test_bytes32_owner_goes_through_accessors() {
        // Owner kept in a bytes32 slot behind setOwner/getOwner.
        let json = r#"{
        "nodeType": "SourceUnit", "id": 400, "src": "0:0:0",
        "nodes": [
            {"nodeType": "PragmaDirective", "id": 1, "src": "0:0:0",
             "literals": ["solidity", "0.8", ".0"]},
            {"nodeType": "ContractDefinition", "id": 399, "src": "0:0:0",
             "name": "Vault", "contractKind": "contract",
             "linearizedBaseContracts": [399],
             "nodes": [
                {"nodeType": "VariableDeclaration", "id": 303, "src": "0:0:0",
                 "name": "ownerSlot", "stateVariable": true,
                 "visibility": "internal", "storageLocation": "default",
                 "scope": 399,
                 "typeDescriptions": {"typeString": "bytes32"},
                 "typeName": {"nodeType": "ElementaryTypeName", "id": 302,
                              "src": "0:0:0", "name": "bytes32"}},
                {"nodeType": "FunctionDefinition", "id": 320, "src": "0:0:0",
                 "name": "setOwner", "kind": "function", "scope": 399,
                 "visibility": "public", "stateMutability": "nonpayable",
                 "parameters": {"nodeType": "ParameterList", "id": 321, "src": "0:0:0",
                                "parameters": [
                    {"nodeType": "VariableDeclaration", "id": 322, "src": "0:0:0",
                     "name": "next", "stateVariable": false, "visibility": "",
                     "storageLocation": "default", "scope": 320,
                     "typeDescriptions": {"typeString": "address"},
                     "typeName": {"nodeType": "ElementaryTypeName", "id": 323,
                                  "src": "0:0:0", "name": "address"}}]},
                 "body": {"nodeType": "Block", "id": 324, "src": "0:0:0",
                          "statements": []}},
                {"nodeType": "FunctionDefinition", "id": 330, "src": "0:0:0",
                 "name": "getOwner", "kind": "function", "scope": 399,
                 "visibility": "public", "stateMutability": "view",
                 "parameters": {"nodeType": "ParameterList", "id": 331, "src": "0:0:0",
                                "parameters": []},
                 "returnParameters": {"nodeType": "ParameterList", "id": 332,
                     "src": "0:0:0", "parameters": [
                    {"nodeType": "VariableDeclaration", "id": 333, "src": "0:0:0",
                     "name": "", "stateVariable": false, "visibility": "",
                     "storageLocation": "default", "scope": 330,
                     "typeDescriptions": {"typeString": "address"},
                     "typeName": {"nodeType": "ElementaryTypeName", "id": 334,
                                  "src": "0:0:0", "name": "address"}}]},
                 "body": {"nodeType": "Block", "id": 335, "src": "0:0:0",
                          "statements": []}},
                {"nodeType": "FunctionDefinition", "id": 340, "src": "0:0:0",
                 "name": "f", "kind": "function", "scope": 399,
                 "visibility": "public", "stateMutability": "nonpayable",
                 "parameters": {"nodeType": "ParameterList", "id": 341, "src": "0:0:0",
                                "parameters": []},
                 "body": {"nodeType": "Block", "id": 342, "src": "0:0:0",
                          "statements": [
                    {"nodeType": "ExpressionStatement", "id": 343, "src": "0:0:0",
                     "expression": {"nodeType": "FunctionCall", "id": 344,
                        "src": "0:0:0", "kind": "functionCall", "names": [],
                        "expression": {"nodeType": "MemberAccess", "id": 345,
                           "src": "0:0:0", "memberName": "delegatecall",
                           "expression": {"nodeType": "Identifier", "id": 346,
                              "src": "0:0:0", "name": "target",
                              "typeDescriptions": {"typeString": "address"}}},
                        "arguments": []}}
                 ]}}
             ]}
        ]}"#;
        let registry = load(json);
        let finding = {
            let reader = registry.read();
            scan_function(&reader, NodeId(340))
                .unknown
                .expect("unknown-target finding")
        };
        let mut seen = HashSet::new();
        let mut warnings = Vec::new();
        let candidates = vec!["owner".to_string()];
        let applied = harden(&registry, &finding, &candidates, &mut seen, &mut warnings);
        assert!(applied);
        let text = rendered(&registry, NodeId(400));
        // Writes go through the setter, reads through the getter.
        assert!(text.contains("track_mapping_ownerSlot[\"Vault.setOwner(address next)\"] = next;"));
        assert!(text.contains("return getOwner();"));
        assert!(text
            .contains("assert(track_mapping_ownerSlot[track_ownerSlot] == track_func_ownerSlot());"));
    }

    #[test]
    fn test_accessor_lookup_skips_unrelated_setters() {
        // setFee/getFee come first in declaration order and have the right
        // shape, but only setOwner/getOwner name the owner.
        let json = r#"{
        "nodeType": "SourceUnit", "id": 500, "src": "0:0:0",
        "nodes": [
            {"nodeType": "PragmaDirective", "id": 1, "src": "0:0:0",
             "literals": ["solidity", "0.8", ".0"]},
            {"nodeType": "ContractDefinition", "id": 499, "src": "0:0:0",
             "name": "Vault", "contractKind": "contract",
             "linearizedBaseContracts": [499],
             "nodes": [
                {"nodeType": "VariableDeclaration", "id": 303, "src": "0:0:0",
                 "name": "ownerSlot", "stateVariable": true,
                 "visibility": "internal", "storageLocation": "default",
                 "scope": 499,
                 "typeDescriptions": {"typeString": "bytes32"},
                 "typeName": {"nodeType": "ElementaryTypeName", "id": 302,
                              "src": "0:0:0", "name": "bytes32"}},
                {"nodeType": "FunctionDefinition", "id": 310, "src": "0:0:0",
                 "name": "setFee", "kind": "function", "scope": 499,
                 "visibility": "public", "stateMutability": "nonpayable",
                 "parameters": {"nodeType": "ParameterList", "id": 311, "src": "0:0:0",
                                "parameters": [
                    {"nodeType": "VariableDeclaration", "id": 312, "src": "0:0:0",
                     "name": "collector", "stateVariable": false, "visibility": "",
                     "storageLocation": "default", "scope": 310,
                     "typeDescriptions": {"typeString": "address"},
                     "typeName": {"nodeType": "ElementaryTypeName", "id": 313,
                                  "src": "0:0:0", "name": "address"}}]},
                 "body": {"nodeType": "Block", "id": 314, "src": "0:0:0",
                          "statements": []}},
                {"nodeType": "FunctionDefinition", "id": 350, "src": "0:0:0",
                 "name": "getFee", "kind": "function", "scope": 499,
                 "visibility": "public", "stateMutability": "view",
                 "parameters": {"nodeType": "ParameterList", "id": 351, "src": "0:0:0",
                                "parameters": []},
                 "returnParameters": {"nodeType": "ParameterList", "id": 352,
                     "src": "0:0:0", "parameters": [
                    {"nodeType": "VariableDeclaration", "id": 353, "src": "0:0:0",
                     "name": "", "stateVariable": false, "visibility": "",
                     "storageLocation": "default", "scope": 350,
                     "typeDescriptions": {"typeString": "address"},
                     "typeName": {"nodeType": "ElementaryTypeName", "id": 354,
                                  "src": "0:0:0", "name": "address"}}]},
                 "body": {"nodeType": "Block", "id": 355, "src": "0:0:0",
                          "statements": []}},
                {"nodeType": "FunctionDefinition", "id": 320, "src": "0:0:0",
                 "name": "setOwner", "kind": "function", "scope": 499,
                 "visibility": "public", "stateMutability": "nonpayable",
                 "parameters": {"nodeType": "ParameterList", "id": 321, "src": "0:0:0",
                                "parameters": [
                    {"nodeType": "VariableDeclaration", "id": 322, "src": "0:0:0",
                     "name": "next", "stateVariable": false, "visibility": "",
                     "storageLocation": "default", "scope": 320,
                     "typeDescriptions": {"typeString": "address"},
                     "typeName": {"nodeType": "ElementaryTypeName", "id": 323,
                                  "src": "0:0:0", "name": "address"}}]},
                 "body": {"nodeType": "Block", "id": 324, "src": "0:0:0",
                          "statements": []}},
                {"nodeType": "FunctionDefinition", "id": 330, "src": "0:0:0",
                 "name": "getOwner", "kind": "function", "scope": 499,
                 "visibility": "public", "stateMutability": "view",
                 "parameters": {"nodeType": "ParameterList", "id": 331, "src": "0:0:0",
                                "parameters": []},
                 "returnParameters": {"nodeType": "ParameterList", "id": 332,
                     "src": "0:0:0", "parameters": [
                    {"nodeType": "VariableDeclaration", "id": 333, "src": "0:0:0",
                     "name": "", "stateVariable": false, "visibility": "",
                     "storageLocation": "default", "scope": 330,
                     "typeDescriptions": {"typeString": "address"},
                     "typeName": {"nodeType": "ElementaryTypeName", "id": 334,
                                  "src": "0:0:0", "name": "address"}}]},
                 "body": {"nodeType": "Block", "id": 335, "src": "0:0:0",
                          "statements": []}},
                {"nodeType": "FunctionDefinition", "id": 340, "src": "0:0:0",
                 "name": "f", "kind": "function", "scope": 499,
                 "visibility": "public", "stateMutability": "nonpayable",
                 "parameters": {"nodeType": "ParameterList", "id": 341, "src": "0:0:0",
                                "parameters": []},
                 "body": {"nodeType": "Block", "id": 342, "src": "0:0:0",
                          "statements": [
                    {"nodeType": "ExpressionStatement", "id": 343, "src": "0:0:0",
                     "expression": {"nodeType": "FunctionCall", "id": 344,
                        "src": "0:0:0", "kind": "functionCall", "names": [],
                        "expression": {"nodeType": "MemberAccess", "id": 345,
                           "src": "0:0:0", "memberName": "delegatecall",
                           "expression": {"nodeType": "Identifier", "id": 346,
                              "src": "0:0:0", "name": "target",
                              "typeDescriptions": {"typeString": "address"}}},
                        "arguments": []}}
                 ]}}
             ]}
        ]}"#;
        let registry = load(json);
        let finding = {
            let reader = registry.read();
            scan_function(&reader, NodeId(340))
                .unknown
                .expect("unknown-target finding")
        };
        let mut seen = HashSet::new();
        let mut warnings = Vec::new();
        let candidates = vec!["owner".to_string()];
        let applied = harden(&registry, &finding, &candidates, &mut seen, &mut warnings);
        assert!(applied);
        let text = rendered(&registry, NodeId(500));
        // The shadow write is wired through the ownership setter, not the
        // fee setter that happens to share its shape.
        assert!(text.contains("track_mapping_ownerSlot[\"Vault.setOwner(address next)\"] = next;"));
        assert!(!text.contains("track_mapping_ownerSlot[\"Vault.setFee(address collector)\"]"));
        // setFee's body stays empty.
        assert!(text.contains("function setFee(address collector) public {\n    }"));
        // The live read goes through getOwner, not getFee.
        assert!(text.contains("return getOwner();"));
        assert!(!text.contains("return getFee();"));
    }
}
