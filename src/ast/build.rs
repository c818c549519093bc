//! JSON → tree constructors, one per syntax kind.
//!
//! Every constructor decodes its scalar fields, dispatches each named
//! child slot on the child's own `nodeType`, registers the built node,
//! and returns its id. A missing or mistyped required field is fatal for
//! the whole run; an unrecognized child kind only costs a warning and an
//! empty slot, because compiler AST shapes evolve and an unfamiliar
//! construct in an irrelevant subtree should not abort the analysis.

use serde_json::Value;

use super::dialect::Dialect;
use super::registry::Registry;
use super::render;
use super::*;
use crate::diagnostic::Diagnostic;

/// State threaded through one build.
pub struct BuildCtx<'a> {
    pub registry: &'a Registry,
    pub dialect: Dialect,
    pub warnings: &'a mut Vec<Diagnostic>,
    /// Innermost contract name, for function signatures.
    contract_name: Option<String>,
}

impl<'a> BuildCtx<'a> {
    pub fn new(
        registry: &'a Registry,
        dialect: Dialect,
        warnings: &'a mut Vec<Diagnostic>,
    ) -> Self {
        Self {
            registry,
            dialect,
            warnings,
            contract_name: None,
        }
    }
}

/// Build the compilation-unit node and everything below it.
pub fn build_source_unit(value: &Value, ctx: &mut BuildCtx) -> Result<NodeId, Diagnostic> {
    let kind = req_str(value, "nodeType", "SourceUnit")?;
    if kind != "SourceUnit" {
        return Err(Diagnostic::error(
            format!("expected SourceUnit, got [{}]", kind),
            src_of(value),
        ));
    }

    let id = node_id(value, ctx);
    let src = src_of(value);
    let absolute_path = opt_str(value, "absolutePath").unwrap_or_default();
    let license = opt_str(value, "license");
    let nodes = child_list(value, "nodes", "SourceUnit", ctx)?;

    Ok(ctx.registry.insert(Node::SourceUnit(SourceUnit {
        id,
        src,
        absolute_path,
        license,
        nodes,
    })))
}

/// Dispatch one JSON subtree on its kind tag.
///
/// `Ok(None)` means the kind was not recognized (or is outside the active
/// dialect); a warning has been recorded and the caller leaves the slot
/// empty.
pub fn build_node(value: &Value, ctx: &mut BuildCtx) -> Result<Option<NodeId>, Diagnostic> {
    let kind = req_str(value, "nodeType", "node")?;
    if !ctx.dialect.emits(&kind) {
        ctx.warnings.push(Diagnostic::warning(
            format!("nodeType [{}] is outside the {:?} dialect", kind, ctx.dialect),
            src_of(value),
        ));
        return Ok(None);
    }

    let id = match kind.as_str() {
        "SourceUnit" => build_source_unit(value, ctx)?,
        "PragmaDirective" => build_pragma(value, ctx)?,
        "ContractDefinition" => build_contract(value, ctx)?,
        "InheritanceSpecifier" => build_inheritance_specifier(value, ctx)?,
        "UsingForDirective" => build_using_for(value, ctx)?,
        "StructDefinition" => build_struct(value, ctx)?,
        "EnumDefinition" => build_enum(value, ctx)?,
        "EnumValue" => build_enum_value(value, ctx)?,
        "ErrorDefinition" => build_error_definition(value, ctx)?,
        "EventDefinition" => build_event_definition(value, ctx)?,
        "FunctionDefinition" => build_function(value, ctx)?,
        "ModifierDefinition" => build_modifier_definition(value, ctx)?,
        "ModifierInvocation" => build_modifier_invocation(value, ctx)?,
        "OverrideSpecifier" => build_override_specifier(value, ctx)?,
        "ParameterList" => build_parameter_list(value, ctx)?,
        "VariableDeclaration" => build_variable_declaration(value, ctx)?,
        "Block" => build_block(value, ctx)?,
        "UncheckedBlock" => build_unchecked_block(value, ctx)?,
        "ExpressionStatement" => build_expression_statement(value, ctx)?,
        "VariableDeclarationStatement" => build_variable_declaration_statement(value, ctx)?,
        "IfStatement" => build_if(value, ctx)?,
        "ForStatement" => build_for(value, ctx)?,
        "WhileStatement" => build_while(value, ctx)?,
        "DoWhileStatement" => build_do_while(value, ctx)?,
        "Return" => build_return(value, ctx)?,
        "Break" => simple(value, ctx, |id, src| Node::Break(Break { id, src }))?,
        "Continue" => simple(value, ctx, |id, src| Node::Continue(Continue { id, src }))?,
        "Throw" => simple(value, ctx, |id, src| Node::Throw(Throw { id, src }))?,
        "EmitStatement" => build_emit(value, ctx)?,
        "RevertStatement" => build_revert(value, ctx)?,
        "PlaceholderStatement" => simple(value, ctx, |id, src| {
            Node::PlaceholderStatement(PlaceholderStatement { id, src })
        })?,
        "TryStatement" => build_try(value, ctx)?,
        "TryCatchClause" => build_try_catch_clause(value, ctx)?,
        "InlineAssembly" => build_inline_assembly(value, ctx)?,
        "Assignment" => build_assignment(value, ctx)?,
        "BinaryOperation" => build_binary_operation(value, ctx)?,
        "UnaryOperation" => build_unary_operation(value, ctx)?,
        "Conditional" => build_conditional(value, ctx)?,
        "FunctionCall" => build_function_call(value, ctx)?,
        "FunctionCallOptions" => build_function_call_options(value, ctx)?,
        "NewExpression" => build_new_expression(value, ctx)?,
        "MemberAccess" => build_member_access(value, ctx)?,
        "IndexAccess" => build_index_access(value, ctx)?,
        "IndexRangeAccess" => build_index_range_access(value, ctx)?,
        "Identifier" => build_identifier(value, ctx)?,
        "IdentifierPath" => build_identifier_path(value, ctx)?,
        "Literal" => build_literal(value, ctx)?,
        "TupleExpression" => build_tuple_expression(value, ctx)?,
        "ElementaryTypeNameExpression" => build_elementary_type_name_expression(value, ctx)?,
        "ElementaryTypeName" => build_elementary_type_name(value, ctx)?,
        "UserDefinedTypeName" => build_user_defined_type_name(value, ctx)?,
        "ArrayTypeName" => build_array_type_name(value, ctx)?,
        "Mapping" => build_mapping(value, ctx)?,
        "FunctionTypeName" => build_function_type_name(value, ctx)?,
        "YulBlock" => build_yul_block(value, ctx)?,
        "YulAssignment" => build_yul_assignment(value, ctx)?,
        "YulVariableDeclaration" => build_yul_variable_declaration(value, ctx)?,
        "YulExpressionStatement" => build_yul_expression_statement(value, ctx)?,
        "YulFunctionCall" => build_yul_function_call(value, ctx)?,
        "YulFunctionDefinition" => build_yul_function_definition(value, ctx)?,
        "YulIdentifier" => build_yul_identifier(value, ctx)?,
        "YulLiteral" => build_yul_literal(value, ctx)?,
        "YulTypedName" => build_yul_typed_name(value, ctx)?,
        "YulIf" => build_yul_if(value, ctx)?,
        "YulSwitch" => build_yul_switch(value, ctx)?,
        "YulCase" => build_yul_case(value, ctx)?,
        "YulForLoop" => build_yul_for_loop(value, ctx)?,
        "YulBreak" => simple(value, ctx, |id, src| Node::YulBreak(YulBreak { id, src }))?,
        "YulContinue" => simple(value, ctx, |id, src| {
            Node::YulContinue(YulContinue { id, src })
        })?,
        "YulLeave" => simple(value, ctx, |id, src| Node::YulLeave(YulLeave { id, src }))?,
        _ => {
            ctx.warnings.push(Diagnostic::warning(
                format!("unknown nodeType [{}]", kind),
                src_of(value),
            ));
            return Ok(None);
        }
    };
    Ok(Some(id))
}

// ---------------------------------------------------------------------------
// field decoding helpers

fn src_of(value: &Value) -> String {
    value
        .get("src")
        .and_then(Value::as_str)
        .unwrap_or("-")
        .to_string()
}

/// The compiler id for this node, or a fresh negative id when the export
/// did not number it (Yul sub-nodes).
fn node_id(value: &Value, ctx: &BuildCtx) -> NodeId {
    value
        .get("id")
        .and_then(Value::as_i64)
        .map(NodeId)
        .unwrap_or_else(|| ctx.registry.fresh_id())
}

fn req_str(value: &Value, field: &str, kind: &str) -> Result<String, Diagnostic> {
    match value.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(Diagnostic::error(
            format!("field `{}` of {} is not a string", field, kind),
            src_of(value),
        )),
        None => Err(Diagnostic::error(
            format!("field `{}` of {} is absent", field, kind),
            src_of(value),
        )),
    }
}

fn opt_str(value: &Value, field: &str) -> Option<String> {
    value
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn opt_bool(value: &Value, field: &str) -> bool {
    value.get(field).and_then(Value::as_bool).unwrap_or(false)
}

fn opt_id(value: &Value, field: &str) -> Option<NodeId> {
    value.get(field).and_then(Value::as_i64).map(NodeId)
}

fn scope_of(value: &Value) -> NodeId {
    opt_id(value, "scope").unwrap_or(NodeId(0))
}

fn type_string_of(value: &Value) -> String {
    value
        .get("typeDescriptions")
        .and_then(|td| td.get("typeString"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn string_list(value: &Value, field: &str) -> Vec<String> {
    value
        .get(field)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Build the named child slot, if present.
fn child(
    value: &Value,
    field: &str,
    parent: &str,
    ctx: &mut BuildCtx,
) -> Result<Option<NodeId>, Diagnostic> {
    match value.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(v @ Value::Object(_)) => build_node(v, ctx),
        Some(v) => {
            ctx.warnings.push(Diagnostic::warning(
                format!("field `{}` of {} is not a node", field, parent),
                src_of(v),
            ));
            Ok(None)
        }
    }
}

/// Build a list-valued child slot, skipping unrecognized entries.
fn child_list(
    value: &Value,
    field: &str,
    parent: &str,
    ctx: &mut BuildCtx,
) -> Result<Vec<NodeId>, Diagnostic> {
    let mut out = Vec::new();
    match value.get(field) {
        None | Some(Value::Null) => {}
        Some(Value::Array(items)) => {
            for item in items {
                if item.is_null() {
                    continue;
                }
                if let Some(id) = build_node(item, ctx)? {
                    out.push(id);
                }
            }
        }
        Some(v) => {
            ctx.warnings.push(Diagnostic::warning(
                format!("field `{}` of {} is not an array", field, parent),
                src_of(v),
            ));
        }
    }
    Ok(out)
}

/// Like [`child_list`] but preserving empty slots (tuple components,
/// destructuring declarations).
fn child_slots(
    value: &Value,
    field: &str,
    ctx: &mut BuildCtx,
) -> Result<Vec<Option<NodeId>>, Diagnostic> {
    let mut out = Vec::new();
    if let Some(items) = value.get(field).and_then(Value::as_array) {
        for item in items {
            if item.is_null() {
                out.push(None);
            } else {
                out.push(build_node(item, ctx)?);
            }
        }
    }
    Ok(out)
}

fn simple(
    value: &Value,
    ctx: &mut BuildCtx,
    make: impl FnOnce(NodeId, String) -> Node,
) -> Result<NodeId, Diagnostic> {
    let id = node_id(value, ctx);
    let src = src_of(value);
    Ok(ctx.registry.insert(make(id, src)))
}

// ---------------------------------------------------------------------------
// declarations

fn build_pragma(value: &Value, ctx: &mut BuildCtx) -> Result<NodeId, Diagnostic> {
    let literals = string_list(value, "literals");
    if literals.is_empty() {
        return Err(Diagnostic::error(
            "field `literals` of PragmaDirective is absent or empty".to_string(),
            src_of(value),
        ));
    }
    let id = node_id(value, ctx);
    let src = src_of(value);
    Ok(ctx
        .registry
        .insert(Node::PragmaDirective(PragmaDirective { id, src, literals })))
}

fn build_contract(value: &Value, ctx: &mut BuildCtx) -> Result<NodeId, Diagnostic> {
    let name = req_str(value, "name", "ContractDefinition")?;
    let id = node_id(value, ctx);
    let src = src_of(value);
    let contract_kind =
        opt_str(value, "contractKind").unwrap_or_else(|| "contract".to_string());
    let is_abstract = opt_bool(value, "abstract");
    let linearized_base_contracts = value
        .get("linearizedBaseContracts")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_i64)
                .map(NodeId)
                .collect()
        })
        .unwrap_or_else(|| vec![id]);

    let previous = ctx.contract_name.replace(name.clone());
    let base_contracts = child_list(value, "baseContracts", "ContractDefinition", ctx)?;
    let nodes = child_list(value, "nodes", "ContractDefinition", ctx)?;
    ctx.contract_name = previous;

    Ok(ctx
        .registry
        .insert(Node::ContractDefinition(ContractDefinition {
            id,
            src,
            name,
            contract_kind,
            is_abstract,
            base_contracts,
            linearized_base_contracts,
            nodes,
            scope: scope_of(value),
        })))
}

fn build_inheritance_specifier(value: &Value, ctx: &mut BuildCtx) -> Result<NodeId, Diagnostic> {
    let id = node_id(value, ctx);
    let src = src_of(value);
    let base_name = child(value, "baseName", "InheritanceSpecifier", ctx)?;
    let arguments = child_list(value, "arguments", "InheritanceSpecifier", ctx)?;
    Ok(ctx
        .registry
        .insert(Node::InheritanceSpecifier(InheritanceSpecifier {
            id,
            src,
            base_name,
            arguments,
        })))
}

fn build_using_for(value: &Value, ctx: &mut BuildCtx) -> Result<NodeId, Diagnostic> {
    let id = node_id(value, ctx);
    let src = src_of(value);
    let library_name = child(value, "libraryName", "UsingForDirective", ctx)?;
    let type_name = child(value, "typeName", "UsingForDirective", ctx)?;
    Ok(ctx.registry.insert(Node::UsingForDirective(UsingForDirective {
        id,
        src,
        library_name,
        type_name,
    })))
}

fn build_struct(value: &Value, ctx: &mut BuildCtx) -> Result<NodeId, Diagnostic> {
    let name = req_str(value, "name", "StructDefinition")?;
    let id = node_id(value, ctx);
    let src = src_of(value);
    let visibility = opt_str(value, "visibility").unwrap_or_default();
    let members = child_list(value, "members", "StructDefinition", ctx)?;
    Ok(ctx.registry.insert(Node::StructDefinition(StructDefinition {
        id,
        src,
        name,
        visibility,
        members,
    })))
}

fn build_enum(value: &Value, ctx: &mut BuildCtx) -> Result<NodeId, Diagnostic> {
    let name = req_str(value, "name", "EnumDefinition")?;
    let id = node_id(value, ctx);
    let src = src_of(value);
    let members = child_list(value, "members", "EnumDefinition", ctx)?;
    Ok(ctx
        .registry
        .insert(Node::EnumDefinition(EnumDefinition { id, src, name, members })))
}

fn build_enum_value(value: &Value, ctx: &mut BuildCtx) -> Result<NodeId, Diagnostic> {
    let name = req_str(value, "name", "EnumValue")?;
    let id = node_id(value, ctx);
    let src = src_of(value);
    Ok(ctx.registry.insert(Node::EnumValue(EnumValue { id, src, name })))
}

fn build_error_definition(value: &Value, ctx: &mut BuildCtx) -> Result<NodeId, Diagnostic> {
    let name = req_str(value, "name", "ErrorDefinition")?;
    let id = node_id(value, ctx);
    let src = src_of(value);
    let parameters = child(value, "parameters", "ErrorDefinition", ctx)?;
    Ok(ctx.registry.insert(Node::ErrorDefinition(ErrorDefinition {
        id,
        src,
        name,
        parameters,
    })))
}

fn build_event_definition(value: &Value, ctx: &mut BuildCtx) -> Result<NodeId, Diagnostic> {
    let name = req_str(value, "name", "EventDefinition")?;
    let id = node_id(value, ctx);
    let src = src_of(value);
    let anonymous = opt_bool(value, "anonymous");
    let parameters = child(value, "parameters", "EventDefinition", ctx)?;
    Ok(ctx.registry.insert(Node::EventDefinition(EventDefinition {
        id,
        src,
        name,
        anonymous,
        parameters,
    })))
}

fn build_function(value: &Value, ctx: &mut BuildCtx) -> Result<NodeId, Diagnostic> {
    let id = node_id(value, ctx);
    let src = src_of(value);
    let name = opt_str(value, "name").unwrap_or_default();
    // 0.4 exports have no `kind`; constructors are flagged separately.
    let kind = opt_str(value, "kind").unwrap_or_else(|| {
        if opt_bool(value, "isConstructor") {
            "constructor".to_string()
        } else {
            "function".to_string()
        }
    });
    let visibility = opt_str(value, "visibility").unwrap_or_default();
    let state_mutability = opt_str(value, "stateMutability").unwrap_or_default();
    let is_virtual = opt_bool(value, "virtual");
    let implemented = opt_bool(value, "implemented");

    let parameters = child(value, "parameters", "FunctionDefinition", ctx)?;
    let return_parameters = child(value, "returnParameters", "FunctionDefinition", ctx)?;
    let modifiers = child_list(value, "modifiers", "FunctionDefinition", ctx)?;
    let overrides = child(value, "overrides", "FunctionDefinition", ctx)?;
    let body = child(value, "body", "FunctionDefinition", ctx)?;

    let signature = make_signature(ctx, &name, &kind, parameters);

    Ok(ctx
        .registry
        .insert(Node::FunctionDefinition(FunctionDefinition {
            id,
            src,
            name,
            kind,
            visibility,
            state_mutability,
            is_virtual,
            implemented,
            scope: scope_of(value),
            parameters,
            return_parameters,
            modifiers,
            overrides,
            body,
            signature,
        })))
}

/// Contract-qualified signature, cached once the parameter list is known.
fn make_signature(ctx: &mut BuildCtx, name: &str, kind: &str, parameters: Option<NodeId>) -> String {
    let contract = ctx.contract_name.as_deref().unwrap_or_default();
    let callable = match kind {
        "constructor" => "constructor",
        "receive" => "receive",
        "fallback" => "fallback",
        _ => name,
    };
    let params = match parameters {
        Some(pl) => render::render(
            &ctx.registry.read(),
            pl,
            false,
            false,
            "",
            ctx.warnings,
        ),
        None => String::new(),
    };
    format!("{}.{}({})", contract, callable, params)
}

fn build_modifier_definition(value: &Value, ctx: &mut BuildCtx) -> Result<NodeId, Diagnostic> {
    let name = req_str(value, "name", "ModifierDefinition")?;
    let id = node_id(value, ctx);
    let src = src_of(value);
    let visibility = opt_str(value, "visibility").unwrap_or_default();
    let is_virtual = opt_bool(value, "virtual");
    let parameters = child(value, "parameters", "ModifierDefinition", ctx)?;
    let overrides = child(value, "overrides", "ModifierDefinition", ctx)?;
    let body = child(value, "body", "ModifierDefinition", ctx)?;
    Ok(ctx
        .registry
        .insert(Node::ModifierDefinition(ModifierDefinition {
            id,
            src,
            name,
            visibility,
            is_virtual,
            parameters,
            overrides,
            body,
        })))
}

fn build_modifier_invocation(value: &Value, ctx: &mut BuildCtx) -> Result<NodeId, Diagnostic> {
    let id = node_id(value, ctx);
    let src = src_of(value);
    let modifier_name = child(value, "modifierName", "ModifierInvocation", ctx)?;
    let arguments = child_list(value, "arguments", "ModifierInvocation", ctx)?;
    Ok(ctx
        .registry
        .insert(Node::ModifierInvocation(ModifierInvocation {
            id,
            src,
            modifier_name,
            arguments,
        })))
}

fn build_override_specifier(value: &Value, ctx: &mut BuildCtx) -> Result<NodeId, Diagnostic> {
    let id = node_id(value, ctx);
    let src = src_of(value);
    let overrides = child_list(value, "overrides", "OverrideSpecifier", ctx)?;
    Ok(ctx
        .registry
        .insert(Node::OverrideSpecifier(OverrideSpecifier { id, src, overrides })))
}

fn build_parameter_list(value: &Value, ctx: &mut BuildCtx) -> Result<NodeId, Diagnostic> {
    let id = node_id(value, ctx);
    let src = src_of(value);
    let parameters = child_list(value, "parameters", "ParameterList", ctx)?;
    Ok(ctx
        .registry
        .insert(Node::ParameterList(ParameterList { id, src, parameters })))
}

fn build_variable_declaration(value: &Value, ctx: &mut BuildCtx) -> Result<NodeId, Diagnostic> {
    let id = node_id(value, ctx);
    let src = src_of(value);
    let name = opt_str(value, "name").unwrap_or_default();
    let constant = opt_bool(value, "constant");
    let state_variable = opt_bool(value, "stateVariable");
    let storage_location =
        opt_str(value, "storageLocation").unwrap_or_else(|| "default".to_string());
    let visibility = opt_str(value, "visibility").unwrap_or_default();
    let indexed = opt_bool(value, "indexed");
    let type_name = child(value, "typeName", "VariableDeclaration", ctx)?;
    let value_node = child(value, "value", "VariableDeclaration", ctx)?;
    Ok(ctx
        .registry
        .insert(Node::VariableDeclaration(VariableDeclaration {
            id,
            src,
            name,
            constant,
            state_variable,
            storage_location,
            visibility,
            indexed,
            type_name,
            value: value_node,
            type_string: type_string_of(value),
            scope: scope_of(value),
        })))
}

// ---------------------------------------------------------------------------
// statements

fn build_block(value: &Value, ctx: &mut BuildCtx) -> Result<NodeId, Diagnostic> {
    let id = node_id(value, ctx);
    let src = src_of(value);
    let statements = child_list(value, "statements", "Block", ctx)?;
    Ok(ctx.registry.insert(Node::Block(Block { id, src, statements })))
}

fn build_unchecked_block(value: &Value, ctx: &mut BuildCtx) -> Result<NodeId, Diagnostic> {
    let id = node_id(value, ctx);
    let src = src_of(value);
    let statements = child_list(value, "statements", "UncheckedBlock", ctx)?;
    Ok(ctx
        .registry
        .insert(Node::UncheckedBlock(UncheckedBlock { id, src, statements })))
}

fn build_expression_statement(value: &Value, ctx: &mut BuildCtx) -> Result<NodeId, Diagnostic> {
    let id = node_id(value, ctx);
    let src = src_of(value);
    let expression = child(value, "expression", "ExpressionStatement", ctx)?;
    Ok(ctx
        .registry
        .insert(Node::ExpressionStatement(ExpressionStatement {
            id,
            src,
            expression,
        })))
}

fn build_variable_declaration_statement(
    value: &Value,
    ctx: &mut BuildCtx,
) -> Result<NodeId, Diagnostic> {
    let id = node_id(value, ctx);
    let src = src_of(value);
    let declarations = child_slots(value, "declarations", ctx)?;
    let initial_value = child(value, "initialValue", "VariableDeclarationStatement", ctx)?;
    Ok(ctx
        .registry
        .insert(Node::VariableDeclarationStatement(
            VariableDeclarationStatement {
                id,
                src,
                declarations,
                initial_value,
            },
        )))
}

fn build_if(value: &Value, ctx: &mut BuildCtx) -> Result<NodeId, Diagnostic> {
    let id = node_id(value, ctx);
    let src = src_of(value);
    let condition = child(value, "condition", "IfStatement", ctx)?;
    let true_body = child(value, "trueBody", "IfStatement", ctx)?;
    let false_body = child(value, "falseBody", "IfStatement", ctx)?;
    Ok(ctx.registry.insert(Node::IfStatement(IfStatement {
        id,
        src,
        condition,
        true_body,
        false_body,
    })))
}

fn build_for(value: &Value, ctx: &mut BuildCtx) -> Result<NodeId, Diagnostic> {
    let id = node_id(value, ctx);
    let src = src_of(value);
    let initialization_expression =
        child(value, "initializationExpression", "ForStatement", ctx)?;
    let condition = child(value, "condition", "ForStatement", ctx)?;
    let loop_expression = child(value, "loopExpression", "ForStatement", ctx)?;
    let body = child(value, "body", "ForStatement", ctx)?;
    Ok(ctx.registry.insert(Node::ForStatement(ForStatement {
        id,
        src,
        initialization_expression,
        condition,
        loop_expression,
        body,
    })))
}

fn build_while(value: &Value, ctx: &mut BuildCtx) -> Result<NodeId, Diagnostic> {
    let id = node_id(value, ctx);
    let src = src_of(value);
    let condition = child(value, "condition", "WhileStatement", ctx)?;
    let body = child(value, "body", "WhileStatement", ctx)?;
    Ok(ctx.registry.insert(Node::WhileStatement(WhileStatement {
        id,
        src,
        condition,
        body,
    })))
}

fn build_do_while(value: &Value, ctx: &mut BuildCtx) -> Result<NodeId, Diagnostic> {
    let id = node_id(value, ctx);
    let src = src_of(value);
    let condition = child(value, "condition", "DoWhileStatement", ctx)?;
    let body = child(value, "body", "DoWhileStatement", ctx)?;
    Ok(ctx
        .registry
        .insert(Node::DoWhileStatement(DoWhileStatement {
            id,
            src,
            condition,
            body,
        })))
}

fn build_return(value: &Value, ctx: &mut BuildCtx) -> Result<NodeId, Diagnostic> {
    let id = node_id(value, ctx);
    let src = src_of(value);
    let expression = child(value, "expression", "Return", ctx)?;
    Ok(ctx.registry.insert(Node::Return(Return { id, src, expression })))
}

fn build_emit(value: &Value, ctx: &mut BuildCtx) -> Result<NodeId, Diagnostic> {
    let id = node_id(value, ctx);
    let src = src_of(value);
    let event_call = child(value, "eventCall", "EmitStatement", ctx)?;
    Ok(ctx
        .registry
        .insert(Node::EmitStatement(EmitStatement { id, src, event_call })))
}

fn build_revert(value: &Value, ctx: &mut BuildCtx) -> Result<NodeId, Diagnostic> {
    let id = node_id(value, ctx);
    let src = src_of(value);
    let error_call = child(value, "errorCall", "RevertStatement", ctx)?;
    Ok(ctx
        .registry
        .insert(Node::RevertStatement(RevertStatement { id, src, error_call })))
}

fn build_try(value: &Value, ctx: &mut BuildCtx) -> Result<NodeId, Diagnostic> {
    let id = node_id(value, ctx);
    let src = src_of(value);
    let external_call = child(value, "externalCall", "TryStatement", ctx)?;
    let clauses = child_list(value, "clauses", "TryStatement", ctx)?;
    Ok(ctx.registry.insert(Node::TryStatement(TryStatement {
        id,
        src,
        external_call,
        clauses,
    })))
}

fn build_try_catch_clause(value: &Value, ctx: &mut BuildCtx) -> Result<NodeId, Diagnostic> {
    let id = node_id(value, ctx);
    let src = src_of(value);
    let error_name = opt_str(value, "errorName").unwrap_or_default();
    let parameters = child(value, "parameters", "TryCatchClause", ctx)?;
    let block = child(value, "block", "TryCatchClause", ctx)?;
    Ok(ctx.registry.insert(Node::TryCatchClause(TryCatchClause {
        id,
        src,
        error_name,
        parameters,
        block,
    })))
}

fn build_inline_assembly(value: &Value, ctx: &mut BuildCtx) -> Result<NodeId, Diagnostic> {
    let id = node_id(value, ctx);
    let src = src_of(value);
    let mut ast = None;
    let mut operations = None;
    if ctx.dialect.structured_assembly() {
        ast = child(value, "AST", "InlineAssembly", ctx)?;
    } else {
        operations = opt_str(value, "operations");
    }
    Ok(ctx.registry.insert(Node::InlineAssembly(InlineAssembly {
        id,
        src,
        ast,
        operations,
    })))
}

// ---------------------------------------------------------------------------
// expressions

fn build_assignment(value: &Value, ctx: &mut BuildCtx) -> Result<NodeId, Diagnostic> {
    let operator = req_str(value, "operator", "Assignment")?;
    let id = node_id(value, ctx);
    let src = src_of(value);
    let left_hand_side = child(value, "leftHandSide", "Assignment", ctx)?;
    let right_hand_side = child(value, "rightHandSide", "Assignment", ctx)?;
    Ok(ctx.registry.insert(Node::Assignment(Assignment {
        id,
        src,
        operator,
        left_hand_side,
        right_hand_side,
    })))
}

fn build_binary_operation(value: &Value, ctx: &mut BuildCtx) -> Result<NodeId, Diagnostic> {
    let operator = req_str(value, "operator", "BinaryOperation")?;
    let id = node_id(value, ctx);
    let src = src_of(value);
    let left_expression = child(value, "leftExpression", "BinaryOperation", ctx)?;
    let right_expression = child(value, "rightExpression", "BinaryOperation", ctx)?;
    Ok(ctx
        .registry
        .insert(Node::BinaryOperation(BinaryOperation {
            id,
            src,
            operator,
            left_expression,
            right_expression,
        })))
}

fn build_unary_operation(value: &Value, ctx: &mut BuildCtx) -> Result<NodeId, Diagnostic> {
    let operator = req_str(value, "operator", "UnaryOperation")?;
    let id = node_id(value, ctx);
    let src = src_of(value);
    let prefix = opt_bool(value, "prefix");
    let sub_expression = child(value, "subExpression", "UnaryOperation", ctx)?;
    Ok(ctx.registry.insert(Node::UnaryOperation(UnaryOperation {
        id,
        src,
        operator,
        prefix,
        sub_expression,
    })))
}

fn build_conditional(value: &Value, ctx: &mut BuildCtx) -> Result<NodeId, Diagnostic> {
    let id = node_id(value, ctx);
    let src = src_of(value);
    let condition = child(value, "condition", "Conditional", ctx)?;
    let true_expression = child(value, "trueExpression", "Conditional", ctx)?;
    let false_expression = child(value, "falseExpression", "Conditional", ctx)?;
    Ok(ctx.registry.insert(Node::Conditional(Conditional {
        id,
        src,
        condition,
        true_expression,
        false_expression,
    })))
}

fn build_function_call(value: &Value, ctx: &mut BuildCtx) -> Result<NodeId, Diagnostic> {
    let id = node_id(value, ctx);
    let src = src_of(value);
    // 0.4 exports flag conversions instead of carrying `kind`.
    let kind = opt_str(value, "kind").unwrap_or_else(|| {
        if opt_bool(value, "isStructConstructorCall") {
            "structConstructorCall".to_string()
        } else {
            "functionCall".to_string()
        }
    });
    let expression = child(value, "expression", "FunctionCall", ctx)?;
    let arguments = child_list(value, "arguments", "FunctionCall", ctx)?;
    let names = string_list(value, "names");
    Ok(ctx.registry.insert(Node::FunctionCall(FunctionCall {
        id,
        src,
        kind,
        expression,
        arguments,
        names,
    })))
}

fn build_function_call_options(value: &Value, ctx: &mut BuildCtx) -> Result<NodeId, Diagnostic> {
    let id = node_id(value, ctx);
    let src = src_of(value);
    let expression = child(value, "expression", "FunctionCallOptions", ctx)?;
    let options = child_list(value, "options", "FunctionCallOptions", ctx)?;
    let names = string_list(value, "names");
    Ok(ctx
        .registry
        .insert(Node::FunctionCallOptions(FunctionCallOptions {
            id,
            src,
            expression,
            options,
            names,
        })))
}

fn build_new_expression(value: &Value, ctx: &mut BuildCtx) -> Result<NodeId, Diagnostic> {
    let id = node_id(value, ctx);
    let src = src_of(value);
    let type_name = child(value, "typeName", "NewExpression", ctx)?;
    Ok(ctx
        .registry
        .insert(Node::NewExpression(NewExpression { id, src, type_name })))
}

fn build_member_access(value: &Value, ctx: &mut BuildCtx) -> Result<NodeId, Diagnostic> {
    let member_name = req_str(value, "memberName", "MemberAccess")?;
    let id = node_id(value, ctx);
    let src = src_of(value);
    let expression = child(value, "expression", "MemberAccess", ctx)?;
    let referenced_declaration = opt_id(value, "referencedDeclaration");
    Ok(ctx.registry.insert(Node::MemberAccess(MemberAccess {
        id,
        src,
        member_name,
        expression,
        referenced_declaration,
    })))
}

fn build_index_access(value: &Value, ctx: &mut BuildCtx) -> Result<NodeId, Diagnostic> {
    let id = node_id(value, ctx);
    let src = src_of(value);
    let base_expression = child(value, "baseExpression", "IndexAccess", ctx)?;
    let index_expression = child(value, "indexExpression", "IndexAccess", ctx)?;
    Ok(ctx.registry.insert(Node::IndexAccess(IndexAccess {
        id,
        src,
        base_expression,
        index_expression,
    })))
}

fn build_index_range_access(value: &Value, ctx: &mut BuildCtx) -> Result<NodeId, Diagnostic> {
    let id = node_id(value, ctx);
    let src = src_of(value);
    let base_expression = child(value, "baseExpression", "IndexRangeAccess", ctx)?;
    let start_expression = child(value, "startExpression", "IndexRangeAccess", ctx)?;
    let end_expression = child(value, "endExpression", "IndexRangeAccess", ctx)?;
    Ok(ctx
        .registry
        .insert(Node::IndexRangeAccess(IndexRangeAccess {
            id,
            src,
            base_expression,
            start_expression,
            end_expression,
        })))
}

fn build_identifier(value: &Value, ctx: &mut BuildCtx) -> Result<NodeId, Diagnostic> {
    let name = req_str(value, "name", "Identifier")?;
    let id = node_id(value, ctx);
    let src = src_of(value);
    let referenced_declaration = opt_id(value, "referencedDeclaration");
    Ok(ctx.registry.insert(Node::Identifier(Identifier {
        id,
        src,
        name,
        referenced_declaration,
        type_string: type_string_of(value),
    })))
}

fn build_identifier_path(value: &Value, ctx: &mut BuildCtx) -> Result<NodeId, Diagnostic> {
    let name = req_str(value, "name", "IdentifierPath")?;
    let id = node_id(value, ctx);
    let src = src_of(value);
    let referenced_declaration = opt_id(value, "referencedDeclaration");
    Ok(ctx.registry.insert(Node::IdentifierPath(IdentifierPath {
        id,
        src,
        name,
        referenced_declaration,
    })))
}

fn build_literal(value: &Value, ctx: &mut BuildCtx) -> Result<NodeId, Diagnostic> {
    let kind = req_str(value, "kind", "Literal")?;
    let id = node_id(value, ctx);
    let src = src_of(value);
    let literal_value = opt_str(value, "value");
    let hex_value = opt_str(value, "hexValue");
    let subdenomination = opt_str(value, "subdenomination");
    Ok(ctx.registry.insert(Node::Literal(Literal {
        id,
        src,
        kind,
        value: literal_value,
        hex_value,
        subdenomination,
        type_string: type_string_of(value),
    })))
}

fn build_tuple_expression(value: &Value, ctx: &mut BuildCtx) -> Result<NodeId, Diagnostic> {
    let id = node_id(value, ctx);
    let src = src_of(value);
    let is_inline_array = opt_bool(value, "isInlineArray");
    let components = child_slots(value, "components", ctx)?;
    Ok(ctx
        .registry
        .insert(Node::TupleExpression(TupleExpression {
            id,
            src,
            is_inline_array,
            components,
        })))
}

fn build_elementary_type_name_expression(
    value: &Value,
    ctx: &mut BuildCtx,
) -> Result<NodeId, Diagnostic> {
    let id = node_id(value, ctx);
    let src = src_of(value);
    // Child node from 0.6 on; a plain string in the older export shape.
    let (type_name, raw_type) = match value.get("typeName") {
        Some(Value::String(s)) => (None, Some(s.clone())),
        _ => (
            child(value, "typeName", "ElementaryTypeNameExpression", ctx)?,
            None,
        ),
    };
    Ok(ctx
        .registry
        .insert(Node::ElementaryTypeNameExpression(
            ElementaryTypeNameExpression {
                id,
                src,
                type_name,
                raw_type,
            },
        )))
}

// ---------------------------------------------------------------------------
// type names

fn build_elementary_type_name(value: &Value, ctx: &mut BuildCtx) -> Result<NodeId, Diagnostic> {
    let name = req_str(value, "name", "ElementaryTypeName")?;
    let id = node_id(value, ctx);
    let src = src_of(value);
    let state_mutability = opt_str(value, "stateMutability");
    Ok(ctx
        .registry
        .insert(Node::ElementaryTypeName(ElementaryTypeName {
            id,
            src,
            name,
            state_mutability,
        })))
}

fn build_user_defined_type_name(value: &Value, ctx: &mut BuildCtx) -> Result<NodeId, Diagnostic> {
    let id = node_id(value, ctx);
    let src = src_of(value);
    let name = opt_str(value, "name");
    let path_node = child(value, "pathNode", "UserDefinedTypeName", ctx)?;
    let referenced_declaration = opt_id(value, "referencedDeclaration");
    Ok(ctx
        .registry
        .insert(Node::UserDefinedTypeName(UserDefinedTypeName {
            id,
            src,
            name,
            path_node,
            referenced_declaration,
        })))
}

fn build_array_type_name(value: &Value, ctx: &mut BuildCtx) -> Result<NodeId, Diagnostic> {
    let id = node_id(value, ctx);
    let src = src_of(value);
    let base_type = child(value, "baseType", "ArrayTypeName", ctx)?;
    let length = child(value, "length", "ArrayTypeName", ctx)?;
    Ok(ctx.registry.insert(Node::ArrayTypeName(ArrayTypeName {
        id,
        src,
        base_type,
        length,
    })))
}

fn build_mapping(value: &Value, ctx: &mut BuildCtx) -> Result<NodeId, Diagnostic> {
    let id = node_id(value, ctx);
    let src = src_of(value);
    let key_type = child(value, "keyType", "Mapping", ctx)?;
    let value_type = child(value, "valueType", "Mapping", ctx)?;
    Ok(ctx.registry.insert(Node::Mapping(Mapping {
        id,
        src,
        key_type,
        value_type,
    })))
}

fn build_function_type_name(value: &Value, ctx: &mut BuildCtx) -> Result<NodeId, Diagnostic> {
    let id = node_id(value, ctx);
    let src = src_of(value);
    let visibility = opt_str(value, "visibility").unwrap_or_default();
    let state_mutability = opt_str(value, "stateMutability").unwrap_or_default();
    let parameter_types = child(value, "parameterTypes", "FunctionTypeName", ctx)?;
    let return_parameter_types =
        child(value, "returnParameterTypes", "FunctionTypeName", ctx)?;
    Ok(ctx
        .registry
        .insert(Node::FunctionTypeName(FunctionTypeName {
            id,
            src,
            visibility,
            state_mutability,
            parameter_types,
            return_parameter_types,
        })))
}

// ---------------------------------------------------------------------------
// Yul

fn build_yul_block(value: &Value, ctx: &mut BuildCtx) -> Result<NodeId, Diagnostic> {
    let id = node_id(value, ctx);
    let src = src_of(value);
    let statements = child_list(value, "statements", "YulBlock", ctx)?;
    Ok(ctx
        .registry
        .insert(Node::YulBlock(YulBlock { id, src, statements })))
}

fn build_yul_assignment(value: &Value, ctx: &mut BuildCtx) -> Result<NodeId, Diagnostic> {
    let id = node_id(value, ctx);
    let src = src_of(value);
    let variable_names = child_list(value, "variableNames", "YulAssignment", ctx)?;
    let yul_value = child(value, "value", "YulAssignment", ctx)?;
    Ok(ctx.registry.insert(Node::YulAssignment(YulAssignment {
        id,
        src,
        variable_names,
        value: yul_value,
    })))
}

fn build_yul_variable_declaration(
    value: &Value,
    ctx: &mut BuildCtx,
) -> Result<NodeId, Diagnostic> {
    let id = node_id(value, ctx);
    let src = src_of(value);
    let variables = child_list(value, "variables", "YulVariableDeclaration", ctx)?;
    let yul_value = child(value, "value", "YulVariableDeclaration", ctx)?;
    Ok(ctx
        .registry
        .insert(Node::YulVariableDeclaration(YulVariableDeclaration {
            id,
            src,
            variables,
            value: yul_value,
        })))
}

fn build_yul_expression_statement(
    value: &Value,
    ctx: &mut BuildCtx,
) -> Result<NodeId, Diagnostic> {
    let id = node_id(value, ctx);
    let src = src_of(value);
    let expression = child(value, "expression", "YulExpressionStatement", ctx)?;
    Ok(ctx
        .registry
        .insert(Node::YulExpressionStatement(YulExpressionStatement {
            id,
            src,
            expression,
        })))
}

fn build_yul_function_call(value: &Value, ctx: &mut BuildCtx) -> Result<NodeId, Diagnostic> {
    let id = node_id(value, ctx);
    let src = src_of(value);
    let function_name = child(value, "functionName", "YulFunctionCall", ctx)?;
    let arguments = child_list(value, "arguments", "YulFunctionCall", ctx)?;
    Ok(ctx
        .registry
        .insert(Node::YulFunctionCall(YulFunctionCall {
            id,
            src,
            function_name,
            arguments,
        })))
}

fn build_yul_function_definition(
    value: &Value,
    ctx: &mut BuildCtx,
) -> Result<NodeId, Diagnostic> {
    let name = req_str(value, "name", "YulFunctionDefinition")?;
    let id = node_id(value, ctx);
    let src = src_of(value);
    let parameters = child_list(value, "parameters", "YulFunctionDefinition", ctx)?;
    let return_variables = child_list(value, "returnVariables", "YulFunctionDefinition", ctx)?;
    let body = child(value, "body", "YulFunctionDefinition", ctx)?;
    Ok(ctx
        .registry
        .insert(Node::YulFunctionDefinition(YulFunctionDefinition {
            id,
            src,
            name,
            parameters,
            return_variables,
            body,
        })))
}

fn build_yul_identifier(value: &Value, ctx: &mut BuildCtx) -> Result<NodeId, Diagnostic> {
    let name = req_str(value, "name", "YulIdentifier")?;
    let id = node_id(value, ctx);
    let src = src_of(value);
    Ok(ctx
        .registry
        .insert(Node::YulIdentifier(YulIdentifier { id, src, name })))
}

fn build_yul_literal(value: &Value, ctx: &mut BuildCtx) -> Result<NodeId, Diagnostic> {
    let kind = req_str(value, "kind", "YulLiteral")?;
    let id = node_id(value, ctx);
    let src = src_of(value);
    let yul_value = opt_str(value, "value");
    let hex_value = opt_str(value, "hexValue");
    Ok(ctx.registry.insert(Node::YulLiteral(YulLiteral {
        id,
        src,
        kind,
        value: yul_value,
        hex_value,
    })))
}

fn build_yul_typed_name(value: &Value, ctx: &mut BuildCtx) -> Result<NodeId, Diagnostic> {
    let name = req_str(value, "name", "YulTypedName")?;
    let id = node_id(value, ctx);
    let src = src_of(value);
    let yul_type = opt_str(value, "type").unwrap_or_default();
    Ok(ctx.registry.insert(Node::YulTypedName(YulTypedName {
        id,
        src,
        name,
        yul_type,
    })))
}

fn build_yul_if(value: &Value, ctx: &mut BuildCtx) -> Result<NodeId, Diagnostic> {
    let id = node_id(value, ctx);
    let src = src_of(value);
    let condition = child(value, "condition", "YulIf", ctx)?;
    let body = child(value, "body", "YulIf", ctx)?;
    Ok(ctx
        .registry
        .insert(Node::YulIf(YulIf { id, src, condition, body })))
}

fn build_yul_switch(value: &Value, ctx: &mut BuildCtx) -> Result<NodeId, Diagnostic> {
    let id = node_id(value, ctx);
    let src = src_of(value);
    let expression = child(value, "expression", "YulSwitch", ctx)?;
    let cases = child_list(value, "cases", "YulSwitch", ctx)?;
    Ok(ctx.registry.insert(Node::YulSwitch(YulSwitch {
        id,
        src,
        expression,
        cases,
    })))
}

fn build_yul_case(value: &Value, ctx: &mut BuildCtx) -> Result<NodeId, Diagnostic> {
    let id = node_id(value, ctx);
    let src = src_of(value);
    // `value` is the string "default" for the default case.
    let case_value = match value.get("value") {
        Some(v @ Value::Object(_)) => build_node(v, ctx)?,
        _ => None,
    };
    let body = child(value, "body", "YulCase", ctx)?;
    Ok(ctx.registry.insert(Node::YulCase(YulCase {
        id,
        src,
        value: case_value,
        body,
    })))
}

fn build_yul_for_loop(value: &Value, ctx: &mut BuildCtx) -> Result<NodeId, Diagnostic> {
    let id = node_id(value, ctx);
    let src = src_of(value);
    let pre = child(value, "pre", "YulForLoop", ctx)?;
    let condition = child(value, "condition", "YulForLoop", ctx)?;
    let post = child(value, "post", "YulForLoop", ctx)?;
    let body = child(value, "body", "YulForLoop", ctx)?;
    Ok(ctx.registry.insert(Node::YulForLoop(YulForLoop {
        id,
        src,
        pre,
        condition,
        post,
        body,
    })))
}
