//! Typed Solidity AST reconstructed from the compiler's JSON export.
//!
//! One closed variant per `nodeType` the supported compiler lines emit,
//! covering the union of the 0.4/0.5/0.6/0.8 grammars. Nodes own their
//! children through [`NodeId`] slots resolved against the [`registry`]
//! arena; cross-tree links (call targets, base contracts) are plain ids
//! as well, which is what lets the instrumentation engine graft new
//! subtrees without cycles.

pub mod build;
pub mod dialect;
pub mod registry;
pub mod render;

/// Identity of one node within a run.
///
/// Non-negative ids come from the compiler and are unique within one
/// compilation unit. Nodes the compiler leaves unnumbered (the Yul
/// sub-language) and nodes synthesized by instrumentation receive fresh
/// negative ids from the registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub i64);

impl NodeId {
    pub fn is_synthetic(self) -> bool {
        self.0 < 0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The tagged syntax tree. The discriminant mirrors the compiler's
/// `nodeType` string, available through [`Node::kind`].
#[derive(Clone, Debug)]
pub enum Node {
    // Source-level declarations
    SourceUnit(SourceUnit),
    PragmaDirective(PragmaDirective),
    ContractDefinition(ContractDefinition),
    InheritanceSpecifier(InheritanceSpecifier),
    UsingForDirective(UsingForDirective),
    StructDefinition(StructDefinition),
    EnumDefinition(EnumDefinition),
    EnumValue(EnumValue),
    ErrorDefinition(ErrorDefinition),
    EventDefinition(EventDefinition),
    FunctionDefinition(FunctionDefinition),
    ModifierDefinition(ModifierDefinition),
    ModifierInvocation(ModifierInvocation),
    OverrideSpecifier(OverrideSpecifier),
    ParameterList(ParameterList),
    VariableDeclaration(VariableDeclaration),
    // Statements
    Block(Block),
    UncheckedBlock(UncheckedBlock),
    ExpressionStatement(ExpressionStatement),
    VariableDeclarationStatement(VariableDeclarationStatement),
    IfStatement(IfStatement),
    ForStatement(ForStatement),
    WhileStatement(WhileStatement),
    DoWhileStatement(DoWhileStatement),
    Return(Return),
    Break(Break),
    Continue(Continue),
    Throw(Throw),
    EmitStatement(EmitStatement),
    RevertStatement(RevertStatement),
    PlaceholderStatement(PlaceholderStatement),
    TryStatement(TryStatement),
    TryCatchClause(TryCatchClause),
    InlineAssembly(InlineAssembly),
    // Expressions
    Assignment(Assignment),
    BinaryOperation(BinaryOperation),
    UnaryOperation(UnaryOperation),
    Conditional(Conditional),
    FunctionCall(FunctionCall),
    FunctionCallOptions(FunctionCallOptions),
    NewExpression(NewExpression),
    MemberAccess(MemberAccess),
    IndexAccess(IndexAccess),
    IndexRangeAccess(IndexRangeAccess),
    Identifier(Identifier),
    IdentifierPath(IdentifierPath),
    Literal(Literal),
    TupleExpression(TupleExpression),
    ElementaryTypeNameExpression(ElementaryTypeNameExpression),
    // Type names
    ElementaryTypeName(ElementaryTypeName),
    UserDefinedTypeName(UserDefinedTypeName),
    ArrayTypeName(ArrayTypeName),
    Mapping(Mapping),
    FunctionTypeName(FunctionTypeName),
    // Yul (inline assembly sub-language)
    YulBlock(YulBlock),
    YulAssignment(YulAssignment),
    YulVariableDeclaration(YulVariableDeclaration),
    YulExpressionStatement(YulExpressionStatement),
    YulFunctionCall(YulFunctionCall),
    YulFunctionDefinition(YulFunctionDefinition),
    YulIdentifier(YulIdentifier),
    YulLiteral(YulLiteral),
    YulTypedName(YulTypedName),
    YulIf(YulIf),
    YulSwitch(YulSwitch),
    YulCase(YulCase),
    YulForLoop(YulForLoop),
    YulBreak(YulBreak),
    YulContinue(YulContinue),
    YulLeave(YulLeave),
}

#[derive(Clone, Debug)]
pub struct SourceUnit {
    pub id: NodeId,
    pub src: String,
    pub absolute_path: String,
    pub license: Option<String>,
    pub nodes: Vec<NodeId>,
}

#[derive(Clone, Debug)]
pub struct PragmaDirective {
    pub id: NodeId,
    pub src: String,
    pub literals: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct ContractDefinition {
    pub id: NodeId,
    pub src: String,
    pub name: String,
    /// "contract", "interface" or "library".
    pub contract_kind: String,
    pub is_abstract: bool,
    pub base_contracts: Vec<NodeId>,
    /// Resolved inheritance order as computed by the compiler,
    /// most-derived first; includes the contract's own id.
    pub linearized_base_contracts: Vec<NodeId>,
    pub nodes: Vec<NodeId>,
    pub scope: NodeId,
}

#[derive(Clone, Debug)]
pub struct InheritanceSpecifier {
    pub id: NodeId,
    pub src: String,
    /// `UserDefinedTypeName` before 0.8, `IdentifierPath` from 0.8 on.
    pub base_name: Option<NodeId>,
    pub arguments: Vec<NodeId>,
}

#[derive(Clone, Debug)]
pub struct UsingForDirective {
    pub id: NodeId,
    pub src: String,
    pub library_name: Option<NodeId>,
    pub type_name: Option<NodeId>,
}

#[derive(Clone, Debug)]
pub struct StructDefinition {
    pub id: NodeId,
    pub src: String,
    pub name: String,
    pub visibility: String,
    pub members: Vec<NodeId>,
}

#[derive(Clone, Debug)]
pub struct EnumDefinition {
    pub id: NodeId,
    pub src: String,
    pub name: String,
    pub members: Vec<NodeId>,
}

#[derive(Clone, Debug)]
pub struct EnumValue {
    pub id: NodeId,
    pub src: String,
    pub name: String,
}

#[derive(Clone, Debug)]
pub struct ErrorDefinition {
    pub id: NodeId,
    pub src: String,
    pub name: String,
    pub parameters: Option<NodeId>,
}

#[derive(Clone, Debug)]
pub struct EventDefinition {
    pub id: NodeId,
    pub src: String,
    pub name: String,
    pub anonymous: bool,
    pub parameters: Option<NodeId>,
}

#[derive(Clone, Debug)]
pub struct FunctionDefinition {
    pub id: NodeId,
    pub src: String,
    pub name: String,
    /// "function", "constructor", "receive" or "fallback".
    pub kind: String,
    pub visibility: String,
    pub state_mutability: String,
    pub is_virtual: bool,
    pub implemented: bool,
    /// The enclosing contract's id.
    pub scope: NodeId,
    pub parameters: Option<NodeId>,
    pub return_parameters: Option<NodeId>,
    pub modifiers: Vec<NodeId>,
    pub overrides: Option<NodeId>,
    pub body: Option<NodeId>,
    /// Contract-qualified name plus rendered parameter list, cached at
    /// build time: `Proxy.forward(address target, bytes memory data)`.
    pub signature: String,
}

#[derive(Clone, Debug)]
pub struct ModifierDefinition {
    pub id: NodeId,
    pub src: String,
    pub name: String,
    pub visibility: String,
    pub is_virtual: bool,
    pub parameters: Option<NodeId>,
    pub overrides: Option<NodeId>,
    pub body: Option<NodeId>,
}

#[derive(Clone, Debug)]
pub struct ModifierInvocation {
    pub id: NodeId,
    pub src: String,
    pub modifier_name: Option<NodeId>,
    pub arguments: Vec<NodeId>,
}

#[derive(Clone, Debug)]
pub struct OverrideSpecifier {
    pub id: NodeId,
    pub src: String,
    pub overrides: Vec<NodeId>,
}

#[derive(Clone, Debug)]
pub struct ParameterList {
    pub id: NodeId,
    pub src: String,
    pub parameters: Vec<NodeId>,
}

#[derive(Clone, Debug)]
pub struct VariableDeclaration {
    pub id: NodeId,
    pub src: String,
    pub name: String,
    pub constant: bool,
    pub state_variable: bool,
    pub storage_location: String,
    pub visibility: String,
    pub indexed: bool,
    pub type_name: Option<NodeId>,
    pub value: Option<NodeId>,
    /// `typeDescriptions.typeString` — the declared type as text.
    pub type_string: String,
    pub scope: NodeId,
}

#[derive(Clone, Debug)]
pub struct Block {
    pub id: NodeId,
    pub src: String,
    pub statements: Vec<NodeId>,
}

#[derive(Clone, Debug)]
pub struct UncheckedBlock {
    pub id: NodeId,
    pub src: String,
    pub statements: Vec<NodeId>,
}

#[derive(Clone, Debug)]
pub struct ExpressionStatement {
    pub id: NodeId,
    pub src: String,
    pub expression: Option<NodeId>,
}

#[derive(Clone, Debug)]
pub struct VariableDeclarationStatement {
    pub id: NodeId,
    pub src: String,
    /// Tuple slots may be empty: `(, b) = f();`.
    pub declarations: Vec<Option<NodeId>>,
    pub initial_value: Option<NodeId>,
}

#[derive(Clone, Debug)]
pub struct IfStatement {
    pub id: NodeId,
    pub src: String,
    pub condition: Option<NodeId>,
    pub true_body: Option<NodeId>,
    pub false_body: Option<NodeId>,
}

#[derive(Clone, Debug)]
pub struct ForStatement {
    pub id: NodeId,
    pub src: String,
    pub initialization_expression: Option<NodeId>,
    pub condition: Option<NodeId>,
    pub loop_expression: Option<NodeId>,
    pub body: Option<NodeId>,
}

#[derive(Clone, Debug)]
pub struct WhileStatement {
    pub id: NodeId,
    pub src: String,
    pub condition: Option<NodeId>,
    pub body: Option<NodeId>,
}

#[derive(Clone, Debug)]
pub struct DoWhileStatement {
    pub id: NodeId,
    pub src: String,
    pub condition: Option<NodeId>,
    pub body: Option<NodeId>,
}

#[derive(Clone, Debug)]
pub struct Return {
    pub id: NodeId,
    pub src: String,
    pub expression: Option<NodeId>,
}

#[derive(Clone, Debug)]
pub struct Break {
    pub id: NodeId,
    pub src: String,
}

#[derive(Clone, Debug)]
pub struct Continue {
    pub id: NodeId,
    pub src: String,
}

/// 0.4 only; replaced by `revert()` in later lines.
#[derive(Clone, Debug)]
pub struct Throw {
    pub id: NodeId,
    pub src: String,
}

#[derive(Clone, Debug)]
pub struct EmitStatement {
    pub id: NodeId,
    pub src: String,
    pub event_call: Option<NodeId>,
}

#[derive(Clone, Debug)]
pub struct RevertStatement {
    pub id: NodeId,
    pub src: String,
    pub error_call: Option<NodeId>,
}

#[derive(Clone, Debug)]
pub struct PlaceholderStatement {
    pub id: NodeId,
    pub src: String,
}

#[derive(Clone, Debug)]
pub struct TryStatement {
    pub id: NodeId,
    pub src: String,
    pub external_call: Option<NodeId>,
    pub clauses: Vec<NodeId>,
}

#[derive(Clone, Debug)]
pub struct TryCatchClause {
    pub id: NodeId,
    pub src: String,
    pub error_name: String,
    pub parameters: Option<NodeId>,
    pub block: Option<NodeId>,
}

#[derive(Clone, Debug)]
pub struct InlineAssembly {
    pub id: NodeId,
    pub src: String,
    /// Structured Yul body (0.6 and later).
    pub ast: Option<NodeId>,
    /// Raw assembly text (0.4/0.5 export shape).
    pub operations: Option<String>,
}

#[derive(Clone, Debug)]
pub struct Assignment {
    pub id: NodeId,
    pub src: String,
    pub operator: String,
    pub left_hand_side: Option<NodeId>,
    pub right_hand_side: Option<NodeId>,
}

#[derive(Clone, Debug)]
pub struct BinaryOperation {
    pub id: NodeId,
    pub src: String,
    pub operator: String,
    pub left_expression: Option<NodeId>,
    pub right_expression: Option<NodeId>,
}

#[derive(Clone, Debug)]
pub struct UnaryOperation {
    pub id: NodeId,
    pub src: String,
    pub operator: String,
    pub prefix: bool,
    pub sub_expression: Option<NodeId>,
}

#[derive(Clone, Debug)]
pub struct Conditional {
    pub id: NodeId,
    pub src: String,
    pub condition: Option<NodeId>,
    pub true_expression: Option<NodeId>,
    pub false_expression: Option<NodeId>,
}

#[derive(Clone, Debug)]
pub struct FunctionCall {
    pub id: NodeId,
    pub src: String,
    /// "functionCall", "typeConversion" or "structConstructorCall".
    pub kind: String,
    pub expression: Option<NodeId>,
    pub arguments: Vec<NodeId>,
    pub names: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct FunctionCallOptions {
    pub id: NodeId,
    pub src: String,
    pub expression: Option<NodeId>,
    pub options: Vec<NodeId>,
    pub names: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct NewExpression {
    pub id: NodeId,
    pub src: String,
    pub type_name: Option<NodeId>,
}

#[derive(Clone, Debug)]
pub struct MemberAccess {
    pub id: NodeId,
    pub src: String,
    pub member_name: String,
    pub expression: Option<NodeId>,
    pub referenced_declaration: Option<NodeId>,
}

#[derive(Clone, Debug)]
pub struct IndexAccess {
    pub id: NodeId,
    pub src: String,
    pub base_expression: Option<NodeId>,
    pub index_expression: Option<NodeId>,
}

#[derive(Clone, Debug)]
pub struct IndexRangeAccess {
    pub id: NodeId,
    pub src: String,
    pub base_expression: Option<NodeId>,
    pub start_expression: Option<NodeId>,
    pub end_expression: Option<NodeId>,
}

#[derive(Clone, Debug)]
pub struct Identifier {
    pub id: NodeId,
    pub src: String,
    pub name: String,
    pub referenced_declaration: Option<NodeId>,
    pub type_string: String,
}

/// 0.8 indirection node for dotted names in type positions.
#[derive(Clone, Debug)]
pub struct IdentifierPath {
    pub id: NodeId,
    pub src: String,
    pub name: String,
    pub referenced_declaration: Option<NodeId>,
}

#[derive(Clone, Debug)]
pub struct Literal {
    pub id: NodeId,
    pub src: String,
    /// "number", "bool", "string", "hexString" or "unicodeString".
    pub kind: String,
    pub value: Option<String>,
    pub hex_value: Option<String>,
    pub subdenomination: Option<String>,
    pub type_string: String,
}

#[derive(Clone, Debug)]
pub struct TupleExpression {
    pub id: NodeId,
    pub src: String,
    pub is_inline_array: bool,
    /// Slots may be empty: `(, x)`.
    pub components: Vec<Option<NodeId>>,
}

#[derive(Clone, Debug)]
pub struct ElementaryTypeNameExpression {
    pub id: NodeId,
    pub src: String,
    /// Child node from 0.6 on; plain string in older exports.
    pub type_name: Option<NodeId>,
    pub raw_type: Option<String>,
}

#[derive(Clone, Debug)]
pub struct ElementaryTypeName {
    pub id: NodeId,
    pub src: String,
    pub name: String,
    pub state_mutability: Option<String>,
}

#[derive(Clone, Debug)]
pub struct UserDefinedTypeName {
    pub id: NodeId,
    pub src: String,
    /// Inline name before 0.8.
    pub name: Option<String>,
    /// `IdentifierPath` child from 0.8 on.
    pub path_node: Option<NodeId>,
    pub referenced_declaration: Option<NodeId>,
}

#[derive(Clone, Debug)]
pub struct ArrayTypeName {
    pub id: NodeId,
    pub src: String,
    pub base_type: Option<NodeId>,
    pub length: Option<NodeId>,
}

#[derive(Clone, Debug)]
pub struct Mapping {
    pub id: NodeId,
    pub src: String,
    pub key_type: Option<NodeId>,
    pub value_type: Option<NodeId>,
}

#[derive(Clone, Debug)]
pub struct FunctionTypeName {
    pub id: NodeId,
    pub src: String,
    pub visibility: String,
    pub state_mutability: String,
    pub parameter_types: Option<NodeId>,
    pub return_parameter_types: Option<NodeId>,
}

#[derive(Clone, Debug)]
pub struct YulBlock {
    pub id: NodeId,
    pub src: String,
    pub statements: Vec<NodeId>,
}

#[derive(Clone, Debug)]
pub struct YulAssignment {
    pub id: NodeId,
    pub src: String,
    pub variable_names: Vec<NodeId>,
    pub value: Option<NodeId>,
}

#[derive(Clone, Debug)]
pub struct YulVariableDeclaration {
    pub id: NodeId,
    pub src: String,
    pub variables: Vec<NodeId>,
    pub value: Option<NodeId>,
}

#[derive(Clone, Debug)]
pub struct YulExpressionStatement {
    pub id: NodeId,
    pub src: String,
    pub expression: Option<NodeId>,
}

#[derive(Clone, Debug)]
pub struct YulFunctionCall {
    pub id: NodeId,
    pub src: String,
    pub function_name: Option<NodeId>,
    pub arguments: Vec<NodeId>,
}

#[derive(Clone, Debug)]
pub struct YulFunctionDefinition {
    pub id: NodeId,
    pub src: String,
    pub name: String,
    pub parameters: Vec<NodeId>,
    pub return_variables: Vec<NodeId>,
    pub body: Option<NodeId>,
}

#[derive(Clone, Debug)]
pub struct YulIdentifier {
    pub id: NodeId,
    pub src: String,
    pub name: String,
}

#[derive(Clone, Debug)]
pub struct YulLiteral {
    pub id: NodeId,
    pub src: String,
    pub kind: String,
    pub value: Option<String>,
    pub hex_value: Option<String>,
}

#[derive(Clone, Debug)]
pub struct YulTypedName {
    pub id: NodeId,
    pub src: String,
    pub name: String,
    pub yul_type: String,
}

#[derive(Clone, Debug)]
pub struct YulIf {
    pub id: NodeId,
    pub src: String,
    pub condition: Option<NodeId>,
    pub body: Option<NodeId>,
}

#[derive(Clone, Debug)]
pub struct YulSwitch {
    pub id: NodeId,
    pub src: String,
    pub expression: Option<NodeId>,
    pub cases: Vec<NodeId>,
}

#[derive(Clone, Debug)]
pub struct YulCase {
    pub id: NodeId,
    pub src: String,
    /// `None` for the `default` case.
    pub value: Option<NodeId>,
    pub body: Option<NodeId>,
}

#[derive(Clone, Debug)]
pub struct YulForLoop {
    pub id: NodeId,
    pub src: String,
    pub pre: Option<NodeId>,
    pub condition: Option<NodeId>,
    pub post: Option<NodeId>,
    pub body: Option<NodeId>,
}

#[derive(Clone, Debug)]
pub struct YulBreak {
    pub id: NodeId,
    pub src: String,
}

#[derive(Clone, Debug)]
pub struct YulContinue {
    pub id: NodeId,
    pub src: String,
}

#[derive(Clone, Debug)]
pub struct YulLeave {
    pub id: NodeId,
    pub src: String,
}

impl Node {
    /// The compiler's `nodeType` string for this variant.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::SourceUnit(_) => "SourceUnit",
            Node::PragmaDirective(_) => "PragmaDirective",
            Node::ContractDefinition(_) => "ContractDefinition",
            Node::InheritanceSpecifier(_) => "InheritanceSpecifier",
            Node::UsingForDirective(_) => "UsingForDirective",
            Node::StructDefinition(_) => "StructDefinition",
            Node::EnumDefinition(_) => "EnumDefinition",
            Node::EnumValue(_) => "EnumValue",
            Node::ErrorDefinition(_) => "ErrorDefinition",
            Node::EventDefinition(_) => "EventDefinition",
            Node::FunctionDefinition(_) => "FunctionDefinition",
            Node::ModifierDefinition(_) => "ModifierDefinition",
            Node::ModifierInvocation(_) => "ModifierInvocation",
            Node::OverrideSpecifier(_) => "OverrideSpecifier",
            Node::ParameterList(_) => "ParameterList",
            Node::VariableDeclaration(_) => "VariableDeclaration",
            Node::Block(_) => "Block",
            Node::UncheckedBlock(_) => "UncheckedBlock",
            Node::ExpressionStatement(_) => "ExpressionStatement",
            Node::VariableDeclarationStatement(_) => "VariableDeclarationStatement",
            Node::IfStatement(_) => "IfStatement",
            Node::ForStatement(_) => "ForStatement",
            Node::WhileStatement(_) => "WhileStatement",
            Node::DoWhileStatement(_) => "DoWhileStatement",
            Node::Return(_) => "Return",
            Node::Break(_) => "Break",
            Node::Continue(_) => "Continue",
            Node::Throw(_) => "Throw",
            Node::EmitStatement(_) => "EmitStatement",
            Node::RevertStatement(_) => "RevertStatement",
            Node::PlaceholderStatement(_) => "PlaceholderStatement",
            Node::TryStatement(_) => "TryStatement",
            Node::TryCatchClause(_) => "TryCatchClause",
            Node::InlineAssembly(_) => "InlineAssembly",
            Node::Assignment(_) => "Assignment",
            Node::BinaryOperation(_) => "BinaryOperation",
            Node::UnaryOperation(_) => "UnaryOperation",
            Node::Conditional(_) => "Conditional",
            Node::FunctionCall(_) => "FunctionCall",
            Node::FunctionCallOptions(_) => "FunctionCallOptions",
            Node::NewExpression(_) => "NewExpression",
            Node::MemberAccess(_) => "MemberAccess",
            Node::IndexAccess(_) => "IndexAccess",
            Node::IndexRangeAccess(_) => "IndexRangeAccess",
            Node::Identifier(_) => "Identifier",
            Node::IdentifierPath(_) => "IdentifierPath",
            Node::Literal(_) => "Literal",
            Node::TupleExpression(_) => "TupleExpression",
            Node::ElementaryTypeNameExpression(_) => "ElementaryTypeNameExpression",
            Node::ElementaryTypeName(_) => "ElementaryTypeName",
            Node::UserDefinedTypeName(_) => "UserDefinedTypeName",
            Node::ArrayTypeName(_) => "ArrayTypeName",
            Node::Mapping(_) => "Mapping",
            Node::FunctionTypeName(_) => "FunctionTypeName",
            Node::YulBlock(_) => "YulBlock",
            Node::YulAssignment(_) => "YulAssignment",
            Node::YulVariableDeclaration(_) => "YulVariableDeclaration",
            Node::YulExpressionStatement(_) => "YulExpressionStatement",
            Node::YulFunctionCall(_) => "YulFunctionCall",
            Node::YulFunctionDefinition(_) => "YulFunctionDefinition",
            Node::YulIdentifier(_) => "YulIdentifier",
            Node::YulLiteral(_) => "YulLiteral",
            Node::YulTypedName(_) => "YulTypedName",
            Node::YulIf(_) => "YulIf",
            Node::YulSwitch(_) => "YulSwitch",
            Node::YulCase(_) => "YulCase",
            Node::YulForLoop(_) => "YulForLoop",
            Node::YulBreak(_) => "YulBreak",
            Node::YulContinue(_) => "YulContinue",
            Node::YulLeave(_) => "YulLeave",
        }
    }

    pub fn id(&self) -> NodeId {
        match self {
            Node::SourceUnit(n) => n.id,
            Node::PragmaDirective(n) => n.id,
            Node::ContractDefinition(n) => n.id,
            Node::InheritanceSpecifier(n) => n.id,
            Node::UsingForDirective(n) => n.id,
            Node::StructDefinition(n) => n.id,
            Node::EnumDefinition(n) => n.id,
            Node::EnumValue(n) => n.id,
            Node::ErrorDefinition(n) => n.id,
            Node::EventDefinition(n) => n.id,
            Node::FunctionDefinition(n) => n.id,
            Node::ModifierDefinition(n) => n.id,
            Node::ModifierInvocation(n) => n.id,
            Node::OverrideSpecifier(n) => n.id,
            Node::ParameterList(n) => n.id,
            Node::VariableDeclaration(n) => n.id,
            Node::Block(n) => n.id,
            Node::UncheckedBlock(n) => n.id,
            Node::ExpressionStatement(n) => n.id,
            Node::VariableDeclarationStatement(n) => n.id,
            Node::IfStatement(n) => n.id,
            Node::ForStatement(n) => n.id,
            Node::WhileStatement(n) => n.id,
            Node::DoWhileStatement(n) => n.id,
            Node::Return(n) => n.id,
            Node::Break(n) => n.id,
            Node::Continue(n) => n.id,
            Node::Throw(n) => n.id,
            Node::EmitStatement(n) => n.id,
            Node::RevertStatement(n) => n.id,
            Node::PlaceholderStatement(n) => n.id,
            Node::TryStatement(n) => n.id,
            Node::TryCatchClause(n) => n.id,
            Node::InlineAssembly(n) => n.id,
            Node::Assignment(n) => n.id,
            Node::BinaryOperation(n) => n.id,
            Node::UnaryOperation(n) => n.id,
            Node::Conditional(n) => n.id,
            Node::FunctionCall(n) => n.id,
            Node::FunctionCallOptions(n) => n.id,
            Node::NewExpression(n) => n.id,
            Node::MemberAccess(n) => n.id,
            Node::IndexAccess(n) => n.id,
            Node::IndexRangeAccess(n) => n.id,
            Node::Identifier(n) => n.id,
            Node::IdentifierPath(n) => n.id,
            Node::Literal(n) => n.id,
            Node::TupleExpression(n) => n.id,
            Node::ElementaryTypeNameExpression(n) => n.id,
            Node::ElementaryTypeName(n) => n.id,
            Node::UserDefinedTypeName(n) => n.id,
            Node::ArrayTypeName(n) => n.id,
            Node::Mapping(n) => n.id,
            Node::FunctionTypeName(n) => n.id,
            Node::YulBlock(n) => n.id,
            Node::YulAssignment(n) => n.id,
            Node::YulVariableDeclaration(n) => n.id,
            Node::YulExpressionStatement(n) => n.id,
            Node::YulFunctionCall(n) => n.id,
            Node::YulFunctionDefinition(n) => n.id,
            Node::YulIdentifier(n) => n.id,
            Node::YulLiteral(n) => n.id,
            Node::YulTypedName(n) => n.id,
            Node::YulIf(n) => n.id,
            Node::YulSwitch(n) => n.id,
            Node::YulCase(n) => n.id,
            Node::YulForLoop(n) => n.id,
            Node::YulBreak(n) => n.id,
            Node::YulContinue(n) => n.id,
            Node::YulLeave(n) => n.id,
        }
    }

    pub fn src(&self) -> &str {
        match self {
            Node::SourceUnit(n) => &n.src,
            Node::PragmaDirective(n) => &n.src,
            Node::ContractDefinition(n) => &n.src,
            Node::InheritanceSpecifier(n) => &n.src,
            Node::UsingForDirective(n) => &n.src,
            Node::StructDefinition(n) => &n.src,
            Node::EnumDefinition(n) => &n.src,
            Node::EnumValue(n) => &n.src,
            Node::ErrorDefinition(n) => &n.src,
            Node::EventDefinition(n) => &n.src,
            Node::FunctionDefinition(n) => &n.src,
            Node::ModifierDefinition(n) => &n.src,
            Node::ModifierInvocation(n) => &n.src,
            Node::OverrideSpecifier(n) => &n.src,
            Node::ParameterList(n) => &n.src,
            Node::VariableDeclaration(n) => &n.src,
            Node::Block(n) => &n.src,
            Node::UncheckedBlock(n) => &n.src,
            Node::ExpressionStatement(n) => &n.src,
            Node::VariableDeclarationStatement(n) => &n.src,
            Node::IfStatement(n) => &n.src,
            Node::ForStatement(n) => &n.src,
            Node::WhileStatement(n) => &n.src,
            Node::DoWhileStatement(n) => &n.src,
            Node::Return(n) => &n.src,
            Node::Break(n) => &n.src,
            Node::Continue(n) => &n.src,
            Node::Throw(n) => &n.src,
            Node::EmitStatement(n) => &n.src,
            Node::RevertStatement(n) => &n.src,
            Node::PlaceholderStatement(n) => &n.src,
            Node::TryStatement(n) => &n.src,
            Node::TryCatchClause(n) => &n.src,
            Node::InlineAssembly(n) => &n.src,
            Node::Assignment(n) => &n.src,
            Node::BinaryOperation(n) => &n.src,
            Node::UnaryOperation(n) => &n.src,
            Node::Conditional(n) => &n.src,
            Node::FunctionCall(n) => &n.src,
            Node::FunctionCallOptions(n) => &n.src,
            Node::NewExpression(n) => &n.src,
            Node::MemberAccess(n) => &n.src,
            Node::IndexAccess(n) => &n.src,
            Node::IndexRangeAccess(n) => &n.src,
            Node::Identifier(n) => &n.src,
            Node::IdentifierPath(n) => &n.src,
            Node::Literal(n) => &n.src,
            Node::TupleExpression(n) => &n.src,
            Node::ElementaryTypeNameExpression(n) => &n.src,
            Node::ElementaryTypeName(n) => &n.src,
            Node::UserDefinedTypeName(n) => &n.src,
            Node::ArrayTypeName(n) => &n.src,
            Node::Mapping(n) => &n.src,
            Node::FunctionTypeName(n) => &n.src,
            Node::YulBlock(n) => &n.src,
            Node::YulAssignment(n) => &n.src,
            Node::YulVariableDeclaration(n) => &n.src,
            Node::YulExpressionStatement(n) => &n.src,
            Node::YulFunctionCall(n) => &n.src,
            Node::YulFunctionDefinition(n) => &n.src,
            Node::YulIdentifier(n) => &n.src,
            Node::YulLiteral(n) => &n.src,
            Node::YulTypedName(n) => &n.src,
            Node::YulIf(n) => &n.src,
            Node::YulSwitch(n) => &n.src,
            Node::YulCase(n) => &n.src,
            Node::YulForLoop(n) => &n.src,
            Node::YulBreak(n) => &n.src,
            Node::YulContinue(n) => &n.src,
            Node::YulLeave(n) => &n.src,
        }
    }

    /// Direct child ids in source order.
    ///
    /// A kind-agnostic view for diagnostics and reporting; structural
    /// passes match on the typed slots instead.
    pub fn children(&self) -> Vec<NodeId> {
        fn opt(out: &mut Vec<NodeId>, id: Option<NodeId>) {
            if let Some(id) = id {
                out.push(id);
            }
        }
        let mut out = Vec::new();
        match self {
            Node::SourceUnit(n) => out.extend(&n.nodes),
            Node::PragmaDirective(_) => {}
            Node::ContractDefinition(n) => {
                out.extend(&n.base_contracts);
                out.extend(&n.nodes);
            }
            Node::InheritanceSpecifier(n) => {
                opt(&mut out, n.base_name);
                out.extend(&n.arguments);
            }
            Node::UsingForDirective(n) => {
                opt(&mut out, n.library_name);
                opt(&mut out, n.type_name);
            }
            Node::StructDefinition(n) => out.extend(&n.members),
            Node::EnumDefinition(n) => out.extend(&n.members),
            Node::EnumValue(_) => {}
            Node::ErrorDefinition(n) => opt(&mut out, n.parameters),
            Node::EventDefinition(n) => opt(&mut out, n.parameters),
            Node::FunctionDefinition(n) => {
                opt(&mut out, n.parameters);
                out.extend(&n.modifiers);
                opt(&mut out, n.overrides);
                opt(&mut out, n.return_parameters);
                opt(&mut out, n.body);
            }
            Node::ModifierDefinition(n) => {
                opt(&mut out, n.parameters);
                opt(&mut out, n.overrides);
                opt(&mut out, n.body);
            }
            Node::ModifierInvocation(n) => {
                opt(&mut out, n.modifier_name);
                out.extend(&n.arguments);
            }
            Node::OverrideSpecifier(n) => out.extend(&n.overrides),
            Node::ParameterList(n) => out.extend(&n.parameters),
            Node::VariableDeclaration(n) => {
                opt(&mut out, n.type_name);
                opt(&mut out, n.value);
            }
            Node::Block(n) => out.extend(&n.statements),
            Node::UncheckedBlock(n) => out.extend(&n.statements),
            Node::ExpressionStatement(n) => opt(&mut out, n.expression),
            Node::VariableDeclarationStatement(n) => {
                out.extend(n.declarations.iter().flatten());
                opt(&mut out, n.initial_value);
            }
            Node::IfStatement(n) => {
                opt(&mut out, n.condition);
                opt(&mut out, n.true_body);
                opt(&mut out, n.false_body);
            }
            Node::ForStatement(n) => {
                opt(&mut out, n.initialization_expression);
                opt(&mut out, n.condition);
                opt(&mut out, n.loop_expression);
                opt(&mut out, n.body);
            }
            Node::WhileStatement(n) => {
                opt(&mut out, n.condition);
                opt(&mut out, n.body);
            }
            Node::DoWhileStatement(n) => {
                opt(&mut out, n.body);
                opt(&mut out, n.condition);
            }
            Node::Return(n) => opt(&mut out, n.expression),
            Node::Break(_) | Node::Continue(_) | Node::Throw(_) => {}
            Node::EmitStatement(n) => opt(&mut out, n.event_call),
            Node::RevertStatement(n) => opt(&mut out, n.error_call),
            Node::PlaceholderStatement(_) => {}
            Node::TryStatement(n) => {
                opt(&mut out, n.external_call);
                out.extend(&n.clauses);
            }
            Node::TryCatchClause(n) => {
                opt(&mut out, n.parameters);
                opt(&mut out, n.block);
            }
            Node::InlineAssembly(n) => opt(&mut out, n.ast),
            Node::Assignment(n) => {
                opt(&mut out, n.left_hand_side);
                opt(&mut out, n.right_hand_side);
            }
            Node::BinaryOperation(n) => {
                opt(&mut out, n.left_expression);
                opt(&mut out, n.right_expression);
            }
            Node::UnaryOperation(n) => opt(&mut out, n.sub_expression),
            Node::Conditional(n) => {
                opt(&mut out, n.condition);
                opt(&mut out, n.true_expression);
                opt(&mut out, n.false_expression);
            }
            Node::FunctionCall(n) => {
                opt(&mut out, n.expression);
                out.extend(&n.arguments);
            }
            Node::FunctionCallOptions(n) => {
                opt(&mut out, n.expression);
                out.extend(&n.options);
            }
            Node::NewExpression(n) => opt(&mut out, n.type_name),
            Node::MemberAccess(n) => opt(&mut out, n.expression),
            Node::IndexAccess(n) => {
                opt(&mut out, n.base_expression);
                opt(&mut out, n.index_expression);
            }
            Node::IndexRangeAccess(n) => {
                opt(&mut out, n.base_expression);
                opt(&mut out, n.start_expression);
                opt(&mut out, n.end_expression);
            }
            Node::Identifier(_) | Node::IdentifierPath(_) | Node::Literal(_) => {}
            Node::TupleExpression(n) => out.extend(n.components.iter().flatten()),
            Node::ElementaryTypeNameExpression(n) => opt(&mut out, n.type_name),
            Node::ElementaryTypeName(_) => {}
            Node::UserDefinedTypeName(n) => opt(&mut out, n.path_node),
            Node::ArrayTypeName(n) => {
                opt(&mut out, n.base_type);
                opt(&mut out, n.length);
            }
            Node::Mapping(n) => {
                opt(&mut out, n.key_type);
                opt(&mut out, n.value_type);
            }
            Node::FunctionTypeName(n) => {
                opt(&mut out, n.parameter_types);
                opt(&mut out, n.return_parameter_types);
            }
            Node::YulBlock(n) => out.extend(&n.statements),
            Node::YulAssignment(n) => {
                out.extend(&n.variable_names);
                opt(&mut out, n.value);
            }
            Node::YulVariableDeclaration(n) => {
                out.extend(&n.variables);
                opt(&mut out, n.value);
            }
            Node::YulExpressionStatement(n) => opt(&mut out, n.expression),
            Node::YulFunctionCall(n) => {
                opt(&mut out, n.function_name);
                out.extend(&n.arguments);
            }
            Node::YulFunctionDefinition(n) => {
                out.extend(&n.parameters);
                out.extend(&n.return_variables);
                opt(&mut out, n.body);
            }
            Node::YulIdentifier(_) | Node::YulLiteral(_) | Node::YulTypedName(_) => {}
            Node::YulIf(n) => {
                opt(&mut out, n.condition);
                opt(&mut out, n.body);
            }
            Node::YulSwitch(n) => {
                opt(&mut out, n.expression);
                out.extend(&n.cases);
            }
            Node::YulCase(n) => {
                opt(&mut out, n.value);
                opt(&mut out, n.body);
            }
            Node::YulForLoop(n) => {
                opt(&mut out, n.pre);
                opt(&mut out, n.condition);
                opt(&mut out, n.post);
                opt(&mut out, n.body);
            }
            Node::YulBreak(_) | Node::YulContinue(_) | Node::YulLeave(_) => {}
        }
        out
    }

    pub fn id_mut(&mut self) -> &mut NodeId {
        match self {
            Node::SourceUnit(n) => &mut n.id,
            Node::PragmaDirective(n) => &mut n.id,
            Node::ContractDefinition(n) => &mut n.id,
            Node::InheritanceSpecifier(n) => &mut n.id,
            Node::UsingForDirective(n) => &mut n.id,
            Node::StructDefinition(n) => &mut n.id,
            Node::EnumDefinition(n) => &mut n.id,
            Node::EnumValue(n) => &mut n.id,
            Node::ErrorDefinition(n) => &mut n.id,
            Node::EventDefinition(n) => &mut n.id,
            Node::FunctionDefinition(n) => &mut n.id,
            Node::ModifierDefinition(n) => &mut n.id,
            Node::ModifierInvocation(n) => &mut n.id,
            Node::OverrideSpecifier(n) => &mut n.id,
            Node::ParameterList(n) => &mut n.id,
            Node::VariableDeclaration(n) => &mut n.id,
            Node::Block(n) => &mut n.id,
            Node::UncheckedBlock(n) => &mut n.id,
            Node::ExpressionStatement(n) => &mut n.id,
            Node::VariableDeclarationStatement(n) => &mut n.id,
            Node::IfStatement(n) => &mut n.id,
            Node::ForStatement(n) => &mut n.id,
            Node::WhileStatement(n) => &mut n.id,
            Node::DoWhileStatement(n) => &mut n.id,
            Node::Return(n) => &mut n.id,
            Node::Break(n) => &mut n.id,
            Node::Continue(n) => &mut n.id,
            Node::Throw(n) => &mut n.id,
            Node::EmitStatement(n) => &mut n.id,
            Node::RevertStatement(n) => &mut n.id,
            Node::PlaceholderStatement(n) => &mut n.id,
            Node::TryStatement(n) => &mut n.id,
            Node::TryCatchClause(n) => &mut n.id,
            Node::InlineAssembly(n) => &mut n.id,
            Node::Assignment(n) => &mut n.id,
            Node::BinaryOperation(n) => &mut n.id,
            Node::UnaryOperation(n) => &mut n.id,
            Node::Conditional(n) => &mut n.id,
            Node::FunctionCall(n) => &mut n.id,
            Node::FunctionCallOptions(n) => &mut n.id,
            Node::NewExpression(n) => &mut n.id,
            Node::MemberAccess(n) => &mut n.id,
            Node::IndexAccess(n) => &mut n.id,
            Node::IndexRangeAccess(n) => &mut n.id,
            Node::Identifier(n) => &mut n.id,
            Node::IdentifierPath(n) => &mut n.id,
            Node::Literal(n) => &mut n.id,
            Node::TupleExpression(n) => &mut n.id,
            Node::ElementaryTypeNameExpression(n) => &mut n.id,
            Node::ElementaryTypeName(n) => &mut n.id,
            Node::UserDefinedTypeName(n) => &mut n.id,
            Node::ArrayTypeName(n) => &mut n.id,
            Node::Mapping(n) => &mut n.id,
            Node::FunctionTypeName(n) => &mut n.id,
            Node::YulBlock(n) => &mut n.id,
            Node::YulAssignment(n) => &mut n.id,
            Node::YulVariableDeclaration(n) => &mut n.id,
            Node::YulExpressionStatement(n) => &mut n.id,
            Node::YulFunctionCall(n) => &mut n.id,
            Node::YulFunctionDefinition(n) => &mut n.id,
            Node::YulIdentifier(n) => &mut n.id,
            Node::YulLiteral(n) => &mut n.id,
            Node::YulTypedName(n) => &mut n.id,
            Node::YulIf(n) => &mut n.id,
            Node::YulSwitch(n) => &mut n.id,
            Node::YulCase(n) => &mut n.id,
            Node::YulForLoop(n) => &mut n.id,
            Node::YulBreak(n) => &mut n.id,
            Node::YulContinue(n) => &mut n.id,
            Node::YulLeave(n) => &mut n.id,
        }
    }

    /// Rewrite every direct child id in place. Used by subtree cloning to
    /// retarget slots at the freshly copied children.
    pub fn map_children(&mut self, f: &mut impl FnMut(NodeId) -> NodeId) {
        fn opt(slot: &mut Option<NodeId>, f: &mut impl FnMut(NodeId) -> NodeId) {
            if let Some(id) = slot {
                *id = f(*id);
            }
        }
        fn all(slots: &mut [NodeId], f: &mut impl FnMut(NodeId) -> NodeId) {
            for id in slots {
                *id = f(*id);
            }
        }
        fn holes(slots: &mut [Option<NodeId>], f: &mut impl FnMut(NodeId) -> NodeId) {
            for slot in slots {
                opt(slot, f);
            }
        }
        match self {
            Node::SourceUnit(n) => all(&mut n.nodes, f),
            Node::PragmaDirective(_) => {}
            Node::ContractDefinition(n) => {
                all(&mut n.base_contracts, f);
                all(&mut n.nodes, f);
            }
            Node::InheritanceSpecifier(n) => {
                opt(&mut n.base_name, f);
                all(&mut n.arguments, f);
            }
            Node::UsingForDirective(n) => {
                opt(&mut n.library_name, f);
                opt(&mut n.type_name, f);
            }
            Node::StructDefinition(n) => all(&mut n.members, f),
            Node::EnumDefinition(n) => all(&mut n.members, f),
            Node::EnumValue(_) => {}
            Node::ErrorDefinition(n) => opt(&mut n.parameters, f),
            Node::EventDefinition(n) => opt(&mut n.parameters, f),
            Node::FunctionDefinition(n) => {
                opt(&mut n.parameters, f);
                all(&mut n.modifiers, f);
                opt(&mut n.overrides, f);
                opt(&mut n.return_parameters, f);
                opt(&mut n.body, f);
            }
            Node::ModifierDefinition(n) => {
                opt(&mut n.parameters, f);
                opt(&mut n.overrides, f);
                opt(&mut n.body, f);
            }
            Node::ModifierInvocation(n) => {
                opt(&mut n.modifier_name, f);
                all(&mut n.arguments, f);
            }
            Node::OverrideSpecifier(n) => all(&mut n.overrides, f),
            Node::ParameterList(n) => all(&mut n.parameters, f),
            Node::VariableDeclaration(n) => {
                opt(&mut n.type_name, f);
                opt(&mut n.value, f);
            }
            Node::Block(n) => all(&mut n.statements, f),
            Node::UncheckedBlock(n) => all(&mut n.statements, f),
            Node::ExpressionStatement(n) => opt(&mut n.expression, f),
            Node::VariableDeclarationStatement(n) => {
                holes(&mut n.declarations, f);
                opt(&mut n.initial_value, f);
            }
            Node::IfStatement(n) => {
                opt(&mut n.condition, f);
                opt(&mut n.true_body, f);
                opt(&mut n.false_body, f);
            }
            Node::ForStatement(n) => {
                opt(&mut n.initialization_expression, f);
                opt(&mut n.condition, f);
                opt(&mut n.loop_expression, f);
                opt(&mut n.body, f);
            }
            Node::WhileStatement(n) => {
                opt(&mut n.condition, f);
                opt(&mut n.body, f);
            }
            Node::DoWhileStatement(n) => {
                opt(&mut n.body, f);
                opt(&mut n.condition, f);
            }
            Node::Return(n) => opt(&mut n.expression, f),
            Node::Break(_) | Node::Continue(_) | Node::Throw(_) => {}
            Node::EmitStatement(n) => opt(&mut n.event_call, f),
            Node::RevertStatement(n) => opt(&mut n.error_call, f),
            Node::PlaceholderStatement(_) => {}
            Node::TryStatement(n) => {
                opt(&mut n.external_call, f);
                all(&mut n.clauses, f);
            }
            Node::TryCatchClause(n) => {
                opt(&mut n.parameters, f);
                opt(&mut n.block, f);
            }
            Node::InlineAssembly(n) => opt(&mut n.ast, f),
            Node::Assignment(n) => {
                opt(&mut n.left_hand_side, f);
                opt(&mut n.right_hand_side, f);
            }
            Node::BinaryOperation(n) => {
                opt(&mut n.left_expression, f);
                opt(&mut n.right_expression, f);
            }
            Node::UnaryOperation(n) => opt(&mut n.sub_expression, f),
            Node::Conditional(n) => {
                opt(&mut n.condition, f);
                opt(&mut n.true_expression, f);
                opt(&mut n.false_expression, f);
            }
            Node::FunctionCall(n) => {
                opt(&mut n.expression, f);
                all(&mut n.arguments, f);
            }
            Node::FunctionCallOptions(n) => {
                opt(&mut n.expression, f);
                all(&mut n.options, f);
            }
            Node::NewExpression(n) => opt(&mut n.type_name, f),
            Node::MemberAccess(n) => opt(&mut n.expression, f),
            Node::IndexAccess(n) => {
                opt(&mut n.base_expression, f);
                opt(&mut n.index_expression, f);
            }
            Node::IndexRangeAccess(n) => {
                opt(&mut n.base_expression, f);
                opt(&mut n.start_expression, f);
                opt(&mut n.end_expression, f);
            }
            Node::Identifier(_) | Node::IdentifierPath(_) | Node::Literal(_) => {}
            Node::TupleExpression(n) => holes(&mut n.components, f),
            Node::ElementaryTypeNameExpression(n) => opt(&mut n.type_name, f),
            Node::ElementaryTypeName(_) => {}
            Node::UserDefinedTypeName(n) => opt(&mut n.path_node, f),
            Node::ArrayTypeName(n) => {
                opt(&mut n.base_type, f);
                opt(&mut n.length, f);
            }
            Node::Mapping(n) => {
                opt(&mut n.key_type, f);
                opt(&mut n.value_type, f);
            }
            Node::FunctionTypeName(n) => {
                opt(&mut n.parameter_types, f);
                opt(&mut n.return_parameter_types, f);
            }
            Node::YulBlock(n) => all(&mut n.statements, f),
            Node::YulAssignment(n) => {
                all(&mut n.variable_names, f);
                opt(&mut n.value, f);
            }
            Node::YulVariableDeclaration(n) => {
                all(&mut n.variables, f);
                opt(&mut n.value, f);
            }
            Node::YulExpressionStatement(n) => opt(&mut n.expression, f),
            Node::YulFunctionCall(n) => {
                opt(&mut n.function_name, f);
                all(&mut n.arguments, f);
            }
            Node::YulFunctionDefinition(n) => {
                all(&mut n.parameters, f);
                all(&mut n.return_variables, f);
                opt(&mut n.body, f);
            }
            Node::YulIdentifier(_) | Node::YulLiteral(_) | Node::YulTypedName(_) => {}
            Node::YulIf(n) => {
                opt(&mut n.condition, f);
                opt(&mut n.body, f);
            }
            Node::YulSwitch(n) => {
                opt(&mut n.expression, f);
                all(&mut n.cases, f);
            }
            Node::YulCase(n) => {
                opt(&mut n.value, f);
                opt(&mut n.body, f);
            }
            Node::YulForLoop(n) => {
                opt(&mut n.pre, f);
                opt(&mut n.condition, f);
                opt(&mut n.post, f);
                opt(&mut n.body, f);
            }
            Node::YulBreak(_) | Node::YulContinue(_) | Node::YulLeave(_) => {}
        }
    }

    pub fn as_contract(&self) -> Option<&ContractDefinition> {
        match self {
            Node::ContractDefinition(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_contract_mut(&mut self) -> Option<&mut ContractDefinition> {
        match self {
            Node::ContractDefinition(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionDefinition> {
        match self {
            Node::FunctionDefinition(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_function_mut(&mut self) -> Option<&mut FunctionDefinition> {
        match self {
            Node::FunctionDefinition(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_variable(&self) -> Option<&VariableDeclaration> {
        match self {
            Node::VariableDeclaration(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_parameter_list(&self) -> Option<&ParameterList> {
        match self {
            Node::ParameterList(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_block(&self) -> Option<&Block> {
        match self {
            Node::Block(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_block_mut(&mut self) -> Option<&mut Block> {
        match self {
            Node::Block(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_identifier(&self) -> Option<&Identifier> {
        match self {
            Node::Identifier(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_member_access(&self) -> Option<&MemberAccess> {
        match self {
            Node::MemberAccess(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_function_call(&self) -> Option<&FunctionCall> {
        match self {
            Node::FunctionCall(n) => Some(n),
            _ => None,
        }
    }
}
