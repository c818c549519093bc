//! Source regeneration: turn any subtree back into compilable Solidity.
//!
//! The renderer is total over the node set. It never fails; a dangling
//! child id or an empty slot renders as the empty string with a warning,
//! so one damaged subtree cannot take down the rest of the file.
//!
//! `is_stmt` selects statement position (terminating `;` where the
//! grammar wants one), `is_indent` prefixes the current indent, and
//! nested blocks indent their children by four spaces past `indent`.

use super::registry::Reader;
use super::*;
use crate::diagnostic::Diagnostic;

const INDENT_STEP: &str = "    ";

/// Render the subtree rooted at `id`.
pub fn render(
    reader: &Reader<'_>,
    id: NodeId,
    is_stmt: bool,
    is_indent: bool,
    indent: &str,
    warnings: &mut Vec<Diagnostic>,
) -> String {
    let node = match reader.node(id) {
        Some(node) => node,
        None => {
            warnings.push(Diagnostic::warning(
                format!("dangling node id [{}] during rendering", id),
                "-",
            ));
            return String::new();
        }
    };

    let code = match node {
        Node::SourceUnit(n) => render_source_unit(reader, n, warnings),
        Node::PragmaDirective(n) => render_pragma(n, is_stmt),
        Node::ContractDefinition(n) => render_contract(reader, n, indent, warnings),
        Node::InheritanceSpecifier(n) => {
            let base = opt_expr(reader, n.base_name, warnings);
            if n.arguments.is_empty() {
                base
            } else {
                format!("{}({})", base, expr_list(reader, &n.arguments, warnings))
            }
        }
        Node::UsingForDirective(n) => format!(
            "using {} for {};",
            opt_expr(reader, n.library_name, warnings),
            match n.type_name {
                Some(t) => expr(reader, t, warnings),
                None => "*".to_string(),
            }
        ),
        Node::StructDefinition(n) => render_struct(reader, n, indent, warnings),
        Node::EnumDefinition(n) => render_enum(reader, n, indent, warnings),
        Node::EnumValue(n) => n.name.clone(),
        Node::ErrorDefinition(n) => format!(
            "error {}({});",
            n.name,
            opt_expr(reader, n.parameters, warnings)
        ),
        Node::EventDefinition(n) => {
            let mut code = format!(
                "event {}({})",
                n.name,
                opt_expr(reader, n.parameters, warnings)
            );
            if n.anonymous {
                code.push_str(" anonymous");
            }
            code.push(';');
            code
        }
        Node::FunctionDefinition(n) => render_function(reader, n, indent, warnings),
        Node::ModifierDefinition(n) => render_modifier_definition(reader, n, indent, warnings),
        Node::ModifierInvocation(n) => {
            let name = opt_expr(reader, n.modifier_name, warnings);
            if n.arguments.is_empty() {
                name
            } else {
                format!("{}({})", name, expr_list(reader, &n.arguments, warnings))
            }
        }
        Node::OverrideSpecifier(n) => {
            if n.overrides.is_empty() {
                "override".to_string()
            } else {
                format!("override({})", expr_list(reader, &n.overrides, warnings))
            }
        }
        Node::ParameterList(n) => expr_list(reader, &n.parameters, warnings),
        Node::VariableDeclaration(n) => render_variable(reader, n, is_stmt, warnings),
        Node::Block(n) => render_block(reader, &n.statements, indent, warnings),
        Node::UncheckedBlock(n) => format!(
            "unchecked {}",
            render_block(reader, &n.statements, indent, warnings)
        ),
        Node::ExpressionStatement(n) => {
            let mut code = opt_expr(reader, n.expression, warnings);
            if is_stmt {
                code.push(';');
            }
            code
        }
        Node::VariableDeclarationStatement(n) => {
            render_variable_declaration_statement(reader, n, is_stmt, warnings)
        }
        Node::IfStatement(n) => render_if(reader, n, indent, warnings),
        Node::ForStatement(n) => render_for(reader, n, indent, warnings),
        Node::WhileStatement(n) => format!(
            "while ({}) {}",
            opt_expr(reader, n.condition, warnings),
            body(reader, n.body, indent, warnings)
        ),
        Node::DoWhileStatement(n) => format!(
            "do {} while ({});",
            body(reader, n.body, indent, warnings),
            opt_expr(reader, n.condition, warnings)
        ),
        Node::Return(n) => match n.expression {
            Some(e) => format!("return {};", expr(reader, e, warnings)),
            None => "return;".to_string(),
        },
        Node::Break(_) => "break;".to_string(),
        Node::Continue(_) => "continue;".to_string(),
        Node::Throw(_) => "throw;".to_string(),
        Node::EmitStatement(n) => {
            format!("emit {};", opt_expr(reader, n.event_call, warnings))
        }
        Node::RevertStatement(n) => {
            format!("revert {};", opt_expr(reader, n.error_call, warnings))
        }
        Node::PlaceholderStatement(_) => "_;".to_string(),
        Node::TryStatement(n) => render_try(reader, n, indent, warnings),
        Node::TryCatchClause(n) => render_try_catch_clause(reader, n, indent, warnings),
        Node::InlineAssembly(n) => render_inline_assembly(reader, n, indent, warnings),
        Node::Assignment(n) => format!(
            "{} {} {}",
            opt_expr(reader, n.left_hand_side, warnings),
            n.operator,
            opt_expr(reader, n.right_hand_side, warnings)
        ),
        Node::BinaryOperation(n) => format!(
            "{} {} {}",
            opt_expr(reader, n.left_expression, warnings),
            n.operator,
            opt_expr(reader, n.right_expression, warnings)
        ),
        Node::UnaryOperation(n) => {
            let sub = opt_expr(reader, n.sub_expression, warnings);
            if n.prefix {
                // Word operators (`delete`) need the separating space.
                if n.operator.chars().all(|c| c.is_ascii_alphabetic()) {
                    format!("{} {}", n.operator, sub)
                } else {
                    format!("{}{}", n.operator, sub)
                }
            } else {
                format!("{}{}", sub, n.operator)
            }
        }
        Node::Conditional(n) => format!(
            "{} ? {} : {}",
            opt_expr(reader, n.condition, warnings),
            opt_expr(reader, n.true_expression, warnings),
            opt_expr(reader, n.false_expression, warnings)
        ),
        Node::FunctionCall(n) => render_function_call(reader, n, warnings),
        Node::FunctionCallOptions(n) => {
            let mut code = opt_expr(reader, n.expression, warnings);
            code.push('{');
            let parts: Vec<String> = n
                .names
                .iter()
                .zip(&n.options)
                .map(|(name, opt)| format!("{}: {}", name, expr(reader, *opt, warnings)))
                .collect();
            code.push_str(&parts.join(", "));
            code.push('}');
            code
        }
        Node::NewExpression(n) => {
            format!("new {}", opt_expr(reader, n.type_name, warnings))
        }
        Node::MemberAccess(n) => format!(
            "{}.{}",
            opt_expr(reader, n.expression, warnings),
            n.member_name
        ),
        Node::IndexAccess(n) => format!(
            "{}[{}]",
            opt_expr(reader, n.base_expression, warnings),
            opt_expr(reader, n.index_expression, warnings)
        ),
        Node::IndexRangeAccess(n) => format!(
            "{}[{}:{}]",
            opt_expr(reader, n.base_expression, warnings),
            opt_expr(reader, n.start_expression, warnings),
            opt_expr(reader, n.end_expression, warnings)
        ),
        Node::Identifier(n) => n.name.clone(),
        Node::IdentifierPath(n) => n.name.clone(),
        Node::Literal(n) => render_literal(n),
        Node::TupleExpression(n) => render_tuple(reader, n, warnings),
        Node::ElementaryTypeNameExpression(n) => match (&n.type_name, &n.raw_type) {
            (Some(t), _) => expr(reader, *t, warnings),
            (None, Some(raw)) => raw.clone(),
            (None, None) => String::new(),
        },
        Node::ElementaryTypeName(n) => match n.state_mutability.as_deref() {
            Some("payable") => format!("{} payable", n.name),
            _ => n.name.clone(),
        },
        Node::UserDefinedTypeName(n) => match (&n.name, n.path_node) {
            (Some(name), _) => name.clone(),
            (None, Some(path)) => expr(reader, path, warnings),
            (None, None) => String::new(),
        },
        Node::ArrayTypeName(n) => format!(
            "{}[{}]",
            opt_expr(reader, n.base_type, warnings),
            opt_expr(reader, n.length, warnings)
        ),
        Node::Mapping(n) => format!(
            "mapping({} => {})",
            opt_expr(reader, n.key_type, warnings),
            opt_expr(reader, n.value_type, warnings)
        ),
        Node::FunctionTypeName(n) => render_function_type_name(reader, n, warnings),
        Node::YulBlock(n) => render_yul_block(reader, &n.statements, indent, warnings),
        Node::YulAssignment(n) => format!(
            "{} := {}",
            expr_list(reader, &n.variable_names, warnings),
            opt_expr(reader, n.value, warnings)
        ),
        Node::YulVariableDeclaration(n) => {
            let mut code = format!("let {}", expr_list(reader, &n.variables, warnings));
            if let Some(value) = n.value {
                code.push_str(" := ");
                code.push_str(&expr(reader, value, warnings));
            }
            code
        }
        Node::YulExpressionStatement(n) => opt_expr(reader, n.expression, warnings),
        Node::YulFunctionCall(n) => format!(
            "{}({})",
            opt_expr(reader, n.function_name, warnings),
            expr_list(reader, &n.arguments, warnings)
        ),
        Node::YulFunctionDefinition(n) => render_yul_function(reader, n, indent, warnings),
        Node::YulIdentifier(n) => n.name.clone(),
        Node::YulLiteral(n) => match (&n.value, &n.hex_value) {
            (Some(v), _) => v.clone(),
            (None, Some(h)) => format!("0x{}", h),
            (None, None) => String::new(),
        },
        Node::YulTypedName(n) => n.name.clone(),
        Node::YulIf(n) => format!(
            "if {} {}",
            opt_expr(reader, n.condition, warnings),
            body(reader, n.body, indent, warnings)
        ),
        Node::YulSwitch(n) => {
            let mut code = format!("switch {}", opt_expr(reader, n.expression, warnings));
            for case in &n.cases {
                code.push('\n');
                code.push_str(indent);
                code.push_str(&render(reader, *case, false, false, indent, warnings));
            }
            code
        }
        Node::YulCase(n) => match n.value {
            Some(value) => format!(
                "case {} {}",
                expr(reader, value, warnings),
                body(reader, n.body, indent, warnings)
            ),
            None => format!("default {}", body(reader, n.body, indent, warnings)),
        },
        Node::YulForLoop(n) => format!(
            "for {} {} {} {}",
            body(reader, n.pre, indent, warnings),
            opt_expr(reader, n.condition, warnings),
            body(reader, n.post, indent, warnings),
            body(reader, n.body, indent, warnings)
        ),
        Node::YulBreak(_) => "break".to_string(),
        Node::YulContinue(_) => "continue".to_string(),
        Node::YulLeave(_) => "leave".to_string(),
    };

    if is_indent {
        format!("{}{}", indent, code)
    } else {
        code
    }
}

/// Expression-position shorthand.
fn expr(reader: &Reader<'_>, id: NodeId, warnings: &mut Vec<Diagnostic>) -> String {
    render(reader, id, false, false, "", warnings)
}

fn opt_expr(reader: &Reader<'_>, id: Option<NodeId>, warnings: &mut Vec<Diagnostic>) -> String {
    match id {
        Some(id) => expr(reader, id, warnings),
        None => String::new(),
    }
}

fn expr_list(reader: &Reader<'_>, ids: &[NodeId], warnings: &mut Vec<Diagnostic>) -> String {
    ids.iter()
        .map(|id| expr(reader, *id, warnings))
        .collect::<Vec<_>>()
        .join(", ")
}

/// A statement-position body that may or may not be a block.
fn body(
    reader: &Reader<'_>,
    id: Option<NodeId>,
    indent: &str,
    warnings: &mut Vec<Diagnostic>,
) -> String {
    match id {
        Some(id) => render(reader, id, true, false, indent, warnings),
        None => "{ }".to_string(),
    }
}

// ---------------------------------------------------------------------------

fn render_source_unit(
    reader: &Reader<'_>,
    n: &SourceUnit,
    warnings: &mut Vec<Diagnostic>,
) -> String {
    let license = n.license.as_deref().unwrap_or("GPL-3.0");
    let mut code = format!("// SPDX-License-Identifier: {}\n", license);
    for id in &n.nodes {
        code.push_str(&render(reader, *id, true, false, "", warnings));
        code.push('\n');
    }
    code
}

fn render_pragma(n: &PragmaDirective, is_stmt: bool) -> String {
    // literals come pre-tokenized: ["solidity", "^", "0.8", ".0"].
    let head = n.literals.first().map(String::as_str).unwrap_or_default();
    let tail = n.literals.get(1..).unwrap_or_default().concat();
    let mut code = format!("pragma {} {}", head, tail);
    if is_stmt {
        code.push(';');
    }
    code
}

fn render_contract(
    reader: &Reader<'_>,
    n: &ContractDefinition,
    indent: &str,
    warnings: &mut Vec<Diagnostic>,
) -> String {
    let mut code = String::new();
    if n.is_abstract {
        code.push_str("abstract ");
    }
    code.push_str(&n.contract_kind);
    code.push(' ');
    code.push_str(&n.name);
    if !n.base_contracts.is_empty() {
        code.push_str(" is ");
        code.push_str(&expr_list(reader, &n.base_contracts, warnings));
    }
    code.push_str(" {\n");
    let inner = format!("{}{}", indent, INDENT_STEP);
    for id in &n.nodes {
        code.push_str(&render(reader, *id, true, true, &inner, warnings));
        code.push('\n');
    }
    code.push_str(indent);
    code.push('}');
    code
}

fn render_struct(
    reader: &Reader<'_>,
    n: &StructDefinition,
    indent: &str,
    warnings: &mut Vec<Diagnostic>,
) -> String {
    let mut code = format!("struct {} {{\n", n.name);
    let inner = format!("{}{}", indent, INDENT_STEP);
    for id in &n.members {
        code.push_str(&render(reader, *id, true, true, &inner, warnings));
        code.push('\n');
    }
    code.push_str(indent);
    code.push('}');
    code
}

fn render_enum(
    reader: &Reader<'_>,
    n: &EnumDefinition,
    indent: &str,
    warnings: &mut Vec<Diagnostic>,
) -> String {
    let inner = format!("{}{}", indent, INDENT_STEP);
    let members: Vec<String> = n
        .members
        .iter()
        .map(|id| format!("{}{}", inner, expr(reader, *id, warnings)))
        .collect();
    format!(
        "enum {} {{\n{}\n{}}}",
        n.name,
        members.join(",\n"),
        indent
    )
}

fn render_function(
    reader: &Reader<'_>,
    n: &FunctionDefinition,
    indent: &str,
    warnings: &mut Vec<Diagnostic>,
) -> String {
    let mut code = match n.kind.as_str() {
        "constructor" => "constructor".to_string(),
        "receive" => "receive".to_string(),
        "fallback" => "fallback".to_string(),
        _ => format!("function {}", n.name),
    };
    code.push('(');
    code.push_str(&opt_expr(reader, n.parameters, warnings));
    code.push(')');
    if !n.visibility.is_empty() {
        code.push(' ');
        code.push_str(&n.visibility);
    }
    // The default mutability is never spelled out.
    if !n.state_mutability.is_empty() && n.state_mutability != "nonpayable" {
        code.push(' ');
        code.push_str(&n.state_mutability);
    }
    if n.is_virtual {
        code.push_str(" virtual");
    }
    if let Some(overrides) = n.overrides {
        code.push(' ');
        code.push_str(&expr(reader, overrides, warnings));
    }
    for id in &n.modifiers {
        code.push(' ');
        code.push_str(&expr(reader, *id, warnings));
    }
    if let Some(rp) = n.return_parameters {
        let rendered = expr(reader, rp, warnings);
        if !rendered.is_empty() {
            code.push_str(" returns (");
            code.push_str(&rendered);
            code.push(')');
        }
    }
    match n.body {
        Some(body_id) => {
            code.push(' ');
            code.push_str(&render(reader, body_id, true, false, indent, warnings));
        }
        None => code.push(';'),
    }
    code
}

fn render_modifier_definition(
    reader: &Reader<'_>,
    n: &ModifierDefinition,
    indent: &str,
    warnings: &mut Vec<Diagnostic>,
) -> String {
    let mut code = format!("modifier {}", n.name);
    let params = opt_expr(reader, n.parameters, warnings);
    if !params.is_empty() {
        code.push('(');
        code.push_str(&params);
        code.push(')');
    }
    if n.is_virtual {
        code.push_str(" virtual");
    }
    if let Some(overrides) = n.overrides {
        code.push(' ');
        code.push_str(&expr(reader, overrides, warnings));
    }
    match n.body {
        Some(body_id) => {
            code.push(' ');
            code.push_str(&render(reader, body_id, true, false, indent, warnings));
        }
        None => code.push(';'),
    }
    code
}

fn render_variable(
    reader: &Reader<'_>,
    n: &VariableDeclaration,
    is_stmt: bool,
    warnings: &mut Vec<Diagnostic>,
) -> String {
    let mut parts = vec![opt_expr(reader, n.type_name, warnings)];
    if n.indexed {
        parts.push("indexed".to_string());
    }
    if n.storage_location != "default" && !n.storage_location.is_empty() {
        parts.push(n.storage_location.clone());
    }
    // Bare state variables are internal already; spelling it out is noise.
    if n.state_variable && !n.visibility.is_empty() && n.visibility != "internal" {
        parts.push(n.visibility.clone());
    }
    if n.constant {
        parts.push("constant".to_string());
    }
    if !n.name.is_empty() {
        parts.push(n.name.clone());
    }
    let mut code = parts.join(" ");
    if let Some(value) = n.value {
        code.push_str(" = ");
        code.push_str(&expr(reader, value, warnings));
    }
    if is_stmt {
        code.push(';');
    }
    code
}

fn render_block(
    reader: &Reader<'_>,
    statements: &[NodeId],
    indent: &str,
    warnings: &mut Vec<Diagnostic>,
) -> String {
    let mut code = "{\n".to_string();
    let inner = format!("{}{}", indent, INDENT_STEP);
    for id in statements {
        code.push_str(&render(reader, *id, true, true, &inner, warnings));
        code.push('\n');
    }
    code.push_str(indent);
    code.push('}');
    code
}

fn render_variable_declaration_statement(
    reader: &Reader<'_>,
    n: &VariableDeclarationStatement,
    is_stmt: bool,
    warnings: &mut Vec<Diagnostic>,
) -> String {
    let mut code = if n.declarations.len() == 1 {
        match n.declarations[0] {
            Some(id) => expr(reader, id, warnings),
            None => String::new(),
        }
    } else {
        let slots: Vec<String> = n
            .declarations
            .iter()
            .map(|slot| match slot {
                Some(id) => expr(reader, *id, warnings),
                None => String::new(),
            })
            .collect();
        format!("({})", slots.join(", "))
    };
    if let Some(init) = n.initial_value {
        code.push_str(" = ");
        code.push_str(&expr(reader, init, warnings));
    }
    if is_stmt {
        code.push(';');
    }
    code
}

fn render_if(
    reader: &Reader<'_>,
    n: &IfStatement,
    indent: &str,
    warnings: &mut Vec<Diagnostic>,
) -> String {
    let mut code = format!(
        "if ({}) {}",
        opt_expr(reader, n.condition, warnings),
        body(reader, n.true_body, indent, warnings)
    );
    if let Some(false_body) = n.false_body {
        code.push_str(" else ");
        code.push_str(&render(reader, false_body, true, false, indent, warnings));
    }
    code
}

fn render_for(
    reader: &Reader<'_>,
    n: &ForStatement,
    indent: &str,
    warnings: &mut Vec<Diagnostic>,
) -> String {
    // The init clause carries its own `;`; the others are spliced in.
    let init = match n.initialization_expression {
        Some(id) => render(reader, id, true, false, indent, warnings),
        None => ";".to_string(),
    };
    let cond = opt_expr(reader, n.condition, warnings);
    let step = match n.loop_expression {
        Some(id) => render(reader, id, false, false, indent, warnings),
        None => String::new(),
    };
    format!(
        "for ({} {}; {}) {}",
        init,
        cond,
        step,
        body(reader, n.body, indent, warnings)
    )
}

fn render_try(
    reader: &Reader<'_>,
    n: &TryStatement,
    indent: &str,
    warnings: &mut Vec<Diagnostic>,
) -> String {
    let mut code = format!("try {}", opt_expr(reader, n.external_call, warnings));
    for (i, clause) in n.clauses.iter().enumerate() {
        code.push(' ');
        if i > 0 {
            code.push_str("catch ");
        }
        code.push_str(&render(reader, *clause, false, false, indent, warnings));
    }
    code
}

fn render_try_catch_clause(
    reader: &Reader<'_>,
    n: &TryCatchClause,
    indent: &str,
    warnings: &mut Vec<Diagnostic>,
) -> String {
    let mut code = String::new();
    if !n.error_name.is_empty() {
        code.push_str(&n.error_name);
    }
    let params = opt_expr(reader, n.parameters, warnings);
    if !params.is_empty() {
        // The success clause spells `returns`, error clauses just parenthesize.
        if n.error_name.is_empty() && code.is_empty() {
            code.push_str("returns ");
        }
        code.push('(');
        code.push_str(&params);
        code.push_str(") ");
    } else if !code.is_empty() {
        code.push(' ');
    }
    code.push_str(&body(reader, n.block, indent, warnings));
    code
}

fn render_inline_assembly(
    reader: &Reader<'_>,
    n: &InlineAssembly,
    indent: &str,
    warnings: &mut Vec<Diagnostic>,
) -> String {
    match (n.ast, &n.operations) {
        (Some(ast), _) => format!(
            "assembly {}",
            render(reader, ast, true, false, indent, warnings)
        ),
        // Older exports keep the raw text, braces included.
        (None, Some(ops)) => format!("assembly {}", ops),
        (None, None) => "assembly { }".to_string(),
    }
}

fn render_function_call(
    reader: &Reader<'_>,
    n: &FunctionCall,
    warnings: &mut Vec<Diagnostic>,
) -> String {
    let callee = opt_expr(reader, n.expression, warnings);
    let args = if n.names.is_empty() {
        expr_list(reader, &n.arguments, warnings)
    } else {
        let parts: Vec<String> = n
            .names
            .iter()
            .zip(&n.arguments)
            .map(|(name, arg)| format!("{}: {}", name, expr(reader, *arg, warnings)))
            .collect();
        format!("{{{}}}", parts.join(", "))
    };
    let code = format!("{}({})", callee, args);
    // `payable(x)` conversions come back as `address payable(x)`.
    if n.kind == "typeConversion" && code.starts_with("address payable") {
        return code[8..].to_string();
    }
    code
}

fn render_literal(n: &Literal) -> String {
    match n.kind.as_str() {
        "number" | "bool" => {
            let mut code = n.value.clone().unwrap_or_default();
            if let Some(sub) = &n.subdenomination {
                code.push(' ');
                code.push_str(sub);
            }
            code
        }
        "string" => {
            // Strings the compiler could not decode as text only carry a
            // hex payload; re-emit them byte by byte.
            if n.type_string.contains("literal_string hex") || n.value.is_none() {
                format!(
                    "\"{}\"",
                    hex_escape(n.hex_value.as_deref().unwrap_or_default())
                )
            } else {
                format!(
                    "\"{}\"",
                    string_escape(n.value.as_deref().unwrap_or_default())
                )
            }
        }
        "unicodeString" => format!(
            "unicode\"{}\"",
            string_escape(n.value.as_deref().unwrap_or_default())
        ),
        "hexString" => format!("hex\"{}\"", n.hex_value.clone().unwrap_or_default()),
        _ => n.value.clone().unwrap_or_default(),
    }
}

/// Re-emit an undecodable string payload as `\xHH` escapes.
fn hex_escape(hex: &str) -> String {
    let bytes: Vec<char> = hex.chars().collect();
    bytes
        .chunks(2)
        .map(|pair| format!("\\x{}", pair.iter().collect::<String>()))
        .collect()
}

fn string_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}

fn render_tuple(
    reader: &Reader<'_>,
    n: &TupleExpression,
    warnings: &mut Vec<Diagnostic>,
) -> String {
    let slots: Vec<String> = n
        .components
        .iter()
        .map(|slot| match slot {
            Some(id) => expr(reader, *id, warnings),
            None => String::new(),
        })
        .collect();
    if n.is_inline_array {
        format!("[{}]", slots.join(", "))
    } else {
        format!("({})", slots.join(", "))
    }
}

fn render_function_type_name(
    reader: &Reader<'_>,
    n: &FunctionTypeName,
    warnings: &mut Vec<Diagnostic>,
) -> String {
    let mut code = format!("function({})", opt_expr(reader, n.parameter_types, warnings));
    if !n.visibility.is_empty() && n.visibility != "internal" {
        code.push(' ');
        code.push_str(&n.visibility);
    }
    if !n.state_mutability.is_empty() && n.state_mutability != "nonpayable" {
        code.push(' ');
        code.push_str(&n.state_mutability);
    }
    let returns = opt_expr(reader, n.return_parameter_types, warnings);
    if !returns.is_empty() {
        code.push_str(" returns (");
        code.push_str(&returns);
        code.push(')');
    }
    code
}

fn render_yul_block(
    reader: &Reader<'_>,
    statements: &[NodeId],
    indent: &str,
    warnings: &mut Vec<Diagnostic>,
) -> String {
    let mut code = "{\n".to_string();
    let inner = format!("{}{}", indent, INDENT_STEP);
    for id in statements {
        code.push_str(&render(reader, *id, true, true, &inner, warnings));
        code.push('\n');
    }
    code.push_str(indent);
    code.push('}');
    code
}

fn render_yul_function(
    reader: &Reader<'_>,
    n: &YulFunctionDefinition,
    indent: &str,
    warnings: &mut Vec<Diagnostic>,
) -> String {
    let mut code = format!(
        "function {}({})",
        n.name,
        expr_list(reader, &n.parameters, warnings)
    );
    if !n.return_variables.is_empty() {
        code.push_str(" -> ");
        code.push_str(&expr_list(reader, &n.return_variables, warnings));
    }
    code.push(' ');
    code.push_str(&body(reader, n.body, indent, warnings));
    code
}

#[cfg(test)]
mod tests {
    use super::super::build::{build_source_unit, BuildCtx};
    use super::super::dialect::Dialect;
    use super::super::registry::Registry;
    use super::*;
    use serde_json::Value;

    fn render_json(json: &str) -> String {
        let value: Value = serde_json::from_str(json).expect("valid json");
        let registry = Registry::new();
        let mut warnings = Vec::new();
        let root = {
            let mut ctx = BuildCtx::new(&registry, Dialect::V08, &mut warnings);
            build_source_unit(&value, &mut ctx).expect("build succeeds")
        };
        let text = render(&registry.read(), root, true, false, "", &mut warnings);
        assert!(warnings.is_empty(), "unexpected warnings: {:?}", warnings);
        text
    }

    #[test]
    fn test_pragma_and_header() {
        let text = render_json(
            r#"{"nodeType": "SourceUnit", "id": 2, "src": "0:0:0",
                "nodes": [{"nodeType": "PragmaDirective", "id": 1, "src": "0:0:0",
                           "literals": ["solidity", "^", "0.8", ".0"]}]}"#,
        );
        assert_eq!(
            text,
            "// SPDX-License-Identifier: GPL-3.0\npragma solidity ^0.8.0;\n"
        );
    }

    #[test]
    fn test_contract_with_state_variable() {
        let text = render_json(
            r#"{"nodeType": "SourceUnit", "id": 9, "src": "0:0:0",
                "nodes": [
                    {"nodeType": "PragmaDirective", "id": 1, "src": "0:0:0",
                     "literals": ["solidity", "0.8", ".0"]},
                    {"nodeType": "ContractDefinition", "id": 8, "src": "0:0:0",
                     "name": "Vault", "contractKind": "contract",
                     "linearizedBaseContracts": [8],
                     "nodes": [
                        {"nodeType": "VariableDeclaration", "id": 3, "src": "0:0:0",
                         "name": "owner", "stateVariable": true, "constant": false,
                         "visibility": "public", "storageLocation": "default",
                         "scope": 8,
                         "typeDescriptions": {"typeString": "address"},
                         "typeName": {"nodeType": "ElementaryTypeName", "id": 2,
                                      "src": "0:0:0", "name": "address"}}
                     ]}
                ]}"#,
        );
        assert!(text.contains("contract Vault {\n"));
        assert!(text.contains("    address public owner;\n"));
    }

    #[test]
    fn test_internal_visibility_not_spelled() {
        let text = render_json(
            r#"{"nodeType": "SourceUnit", "id": 9, "src": "0:0:0",
                "nodes": [
                    {"nodeType": "PragmaDirective", "id": 1, "src": "0:0:0",
                     "literals": ["solidity", "0.8", ".0"]},
                    {"nodeType": "ContractDefinition", "id": 8, "src": "0:0:0",
                     "name": "C", "contractKind": "contract",
                     "linearizedBaseContracts": [8],
                     "nodes": [
                        {"nodeType": "VariableDeclaration", "id": 3, "src": "0:0:0",
                         "name": "x", "stateVariable": true,
                         "visibility": "internal", "storageLocation": "default",
                         "scope": 8,
                         "typeDescriptions": {"typeString": "uint256"},
                         "typeName": {"nodeType": "ElementaryTypeName", "id": 2,
                                      "src": "0:0:0", "name": "uint256"}}
                     ]}
                ]}"#,
        );
        assert!(text.contains("    uint256 x;\n"));
    }

    #[test]
    fn test_function_with_body_and_call() {
        let text = render_json(
            r#"{"nodeType": "SourceUnit", "id": 30, "src": "0:0:0",
                "nodes": [
                    {"nodeType": "PragmaDirective", "id": 1, "src": "0:0:0",
                     "literals": ["solidity", "0.8", ".0"]},
                    {"nodeType": "ContractDefinition", "id": 29, "src": "0:0:0",
                     "name": "P", "contractKind": "contract",
                     "linearizedBaseContracts": [29],
                     "nodes": [
                        {"nodeType": "FunctionDefinition", "id": 28, "src": "0:0:0",
                         "name": "ping", "kind": "function", "scope": 29,
                         "visibility": "public", "stateMutability": "nonpayable",
                         "parameters": {"nodeType": "ParameterList", "id": 10,
                                        "src": "0:0:0", "parameters": []},
                         "returnParameters": {"nodeType": "ParameterList", "id": 11,
                                              "src": "0:0:0", "parameters": []},
                         "body": {"nodeType": "Block", "id": 27, "src": "0:0:0",
                                  "statements": [
                            {"nodeType": "ExpressionStatement", "id": 26, "src": "0:0:0",
                             "expression": {
                                "nodeType": "FunctionCall", "id": 25, "src": "0:0:0",
                                "kind": "functionCall", "names": [],
                                "expression": {"nodeType": "Identifier", "id": 23,
                                               "src": "0:0:0", "name": "pong",
                                               "typeDescriptions": {"typeString": "function ()"}},
                                "arguments": []}}
                         ]}}
                     ]}
                ]}"#,
        );
        assert!(text.contains("    function ping() public {\n"));
        assert!(text.contains("        pong();\n"));
        // nonpayable is the default and never printed
        assert!(!text.contains("nonpayable"));
    }

    #[test]
    fn test_payable_conversion_collapses() {
        let json = r#"{
            "nodeType": "FunctionCall", "id": 5, "src": "0:0:0",
            "kind": "typeConversion", "names": [],
            "expression": {
                "nodeType": "ElementaryTypeNameExpression", "id": 3, "src": "0:0:0",
                "typeName": {"nodeType": "ElementaryTypeName", "id": 2, "src": "0:0:0",
                             "name": "address", "stateMutability": "payable"}},
            "arguments": [
                {"nodeType": "Identifier", "id": 4, "src": "0:0:0", "name": "who",
                 "typeDescriptions": {"typeString": "address"}}
            ]}"#;
        let value: Value = serde_json::from_str(json).expect("valid json");
        let registry = Registry::new();
        let mut warnings = Vec::new();
        let id = {
            let mut ctx = BuildCtx::new(&registry, Dialect::V08, &mut warnings);
            super::super::build::build_node(&value, &mut ctx)
                .expect("builds")
                .expect("known kind")
        };
        let text = render(&registry.read(), id, false, false, "", &mut warnings);
        assert_eq!(text, "payable(who)");
    }

    #[test]
    fn test_hex_payload_string_re_escapes() {
        let n = Literal {
            id: NodeId(1),
            src: "-".to_string(),
            kind: "string".to_string(),
            value: None,
            hex_value: Some("6080".to_string()),
            subdenomination: None,
            type_string: "literal_string hex\"6080\"".to_string(),
        };
        assert_eq!(render_literal(&n), "\"\\x60\\x80\"");
    }

    #[test]
    fn test_mapping_and_index_access() {
        let json = r#"{
            "nodeType": "Mapping", "id": 4, "src": "0:0:0",
            "keyType": {"nodeType": "ElementaryTypeName", "id": 2, "src": "0:0:0",
                        "name": "bytes"},
            "valueType": {"nodeType": "ElementaryTypeName", "id": 3, "src": "0:0:0",
                          "name": "address"}}"#;
        let value: Value = serde_json::from_str(json).expect("valid json");
        let registry = Registry::new();
        let mut warnings = Vec::new();
        let id = {
            let mut ctx = BuildCtx::new(&registry, Dialect::V08, &mut warnings);
            super::super::build::build_node(&value, &mut ctx)
                .expect("builds")
                .expect("known kind")
        };
        let text = render(&registry.read(), id, false, false, "", &mut warnings);
        assert_eq!(text, "mapping(bytes => address)");
    }
}
