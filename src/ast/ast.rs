use std::fmt::Display;

use indexed_vec::{Idx, IndexVec};

use crate::{
    errors::errors::{Error, ErrorImpl},
    scope::scope::{ScopeId, ScopeKind, ScopeTree},
    Position,
};

use super::{
    expressions::Expression,
    statements::Statement,
    types::{BasicDataType, FunctionType, Type},
};

/// Prefix of every function's internal symbol name, so back ends never
/// clash with symbols of the host environment.
pub const FUNCTION_SYMBOL_PREFIX: &str = "__basalt_";

/// Index of a declaration in the program arena. Two references to the same
/// declared entity always hold the same id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclId(usize);

impl Idx for DeclId {
    fn new(index: usize) -> Self {
        Self(index)
    }

    fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExprId(usize);

impl Idx for ExprId {
    fn new(index: usize) -> Self {
        Self(index)
    }

    fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StmtId(usize);

impl Idx for StmtId {
    fn new(index: usize) -> Self {
        Self(index)
    }

    fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclarationKind {
    Variable,
    Type,
    Function,
}

impl Display for DeclarationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeclarationKind::Variable => write!(f, "variable"),
            DeclarationKind::Type => write!(f, "type"),
            DeclarationKind::Function => write!(f, "function"),
        }
    }
}

/// A name that could not be found when it was parsed, together with the
/// scope it has to be searched in once the whole file is known.
#[derive(Debug, Clone, PartialEq)]
pub struct Unresolved {
    pub name: String,
    pub scope: ScopeId,
    pub position: Position,
}

/// Reference from the tree to a declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum DeclarationRef {
    Resolved(DeclId),
    Pending(Unresolved),
}

impl DeclarationRef {
    pub fn is_pending(&self) -> bool {
        matches!(self, DeclarationRef::Pending(_))
    }

    /// Returns the referenced declaration. A reference still pending after
    /// deferred resolution is a compiler bug, not a user error.
    pub fn resolved(&self) -> Result<DeclId, Error> {
        match self {
            DeclarationRef::Resolved(id) => Ok(*id),
            DeclarationRef::Pending(unresolved) => Err(Error::new(
                ErrorImpl::Internal {
                    message: format!("reference to '{}' was never resolved", unresolved.name),
                },
                unresolved.position,
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Declaration {
    Variable(VariableDeclaration),
    Type(TypeDeclaration),
    Function(FunctionDeclaration),
}

impl Declaration {
    pub fn kind(&self) -> DeclarationKind {
        match self {
            Declaration::Variable(_) => DeclarationKind::Variable,
            Declaration::Type(_) => DeclarationKind::Type,
            Declaration::Function(_) => DeclarationKind::Function,
        }
    }

    /// `None` for built-in types and for anonymous return slots.
    pub fn position(&self) -> Option<Position> {
        match self {
            Declaration::Variable(variable) => Some(variable.position),
            Declaration::Type(ty) => ty.position,
            Declaration::Function(function) => Some(function.position),
        }
    }
}

/// A variable, function parameter or return slot. Return slots have no name.
#[derive(Debug, Clone)]
pub struct VariableDeclaration {
    pub name: Option<String>,
    pub position: Position,
    pub type_declaration: DeclarationRef,
}

#[derive(Debug, Clone)]
pub struct TypeDeclaration {
    pub name: String,
    pub position: Option<Position>,
    pub ty: Type,
}

#[derive(Debug, Clone)]
pub struct FunctionDeclaration {
    pub name: String,
    pub symbol_name: String,
    pub position: Position,
    pub definition: FunctionDefinition,
}

#[derive(Debug, Clone)]
pub struct FunctionDefinition {
    pub function_type: FunctionType,
    pub statements: Vec<StmtId>,
    /// The parameter scope the body was parsed in.
    pub scope: ScopeId,
}

/// An optionally named slot holding a variable declaration. Used for both
/// parameters and (unnamed) return values.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: Option<String>,
    pub variable: DeclId,
}

/// Arena owning every node of a parsed compilation unit.
///
/// Declarations, expressions, statements and scopes are created during
/// parsing and addressed by index afterwards. The only mutation after
/// parsing is the deferred resolution of pending references.
#[derive(Debug)]
pub struct Program {
    declarations: IndexVec<DeclId, Declaration>,
    expressions: IndexVec<ExprId, Expression>,
    statements: IndexVec<StmtId, Statement>,
    scopes: ScopeTree,
    top_level: Vec<DeclId>,
    builtin_scope: ScopeId,
    file_scope: ScopeId,
}

impl Program {
    /// Creates an empty program with a built-in scope holding the primitive
    /// types and an empty file scope below it.
    pub fn new() -> Program {
        let mut scopes = ScopeTree::new();
        let builtin_scope = scopes.builtin_scope();
        let mut declarations = IndexVec::new();

        for data_type in BasicDataType::ALL {
            let id = declarations.push(Declaration::Type(TypeDeclaration {
                name: data_type.name().to_string(),
                position: None,
                ty: Type::Basic(data_type),
            }));
            scopes.install_builtin_type(data_type.name(), id);
        }

        let file_scope = scopes.new_scope(ScopeKind::File, builtin_scope);

        Program {
            declarations,
            expressions: IndexVec::new(),
            statements: IndexVec::new(),
            scopes,
            top_level: vec![],
            builtin_scope,
            file_scope,
        }
    }

    pub fn add_declaration(&mut self, declaration: Declaration) -> DeclId {
        self.declarations.push(declaration)
    }

    pub fn add_expression(&mut self, expression: Expression) -> ExprId {
        self.expressions.push(expression)
    }

    pub fn add_statement(&mut self, statement: Statement) -> StmtId {
        self.statements.push(statement)
    }

    pub fn push_top_level(&mut self, declaration: DeclId) {
        self.top_level.push(declaration);
    }

    pub fn declaration(&self, id: DeclId) -> &Declaration {
        &self.declarations[id]
    }

    pub fn declaration_mut(&mut self, id: DeclId) -> &mut Declaration {
        &mut self.declarations[id]
    }

    pub fn expression(&self, id: ExprId) -> &Expression {
        &self.expressions[id]
    }

    pub fn expression_mut(&mut self, id: ExprId) -> &mut Expression {
        &mut self.expressions[id]
    }

    pub fn statement(&self, id: StmtId) -> &Statement {
        &self.statements[id]
    }

    pub fn statement_mut(&mut self, id: StmtId) -> &mut Statement {
        &mut self.statements[id]
    }

    pub fn scopes(&self) -> &ScopeTree {
        &self.scopes
    }

    pub fn scopes_mut(&mut self) -> &mut ScopeTree {
        &mut self.scopes
    }

    /// Top-level declarations in source order.
    pub fn top_level_declarations(&self) -> &[DeclId] {
        &self.top_level
    }

    pub fn file_scope(&self) -> ScopeId {
        self.file_scope
    }

    pub fn builtin_scope(&self) -> ScopeId {
        self.builtin_scope
    }

    /// The declaration of a primitive type in the built-in scope.
    pub fn builtin_type(&self, data_type: BasicDataType) -> Result<DeclId, Error> {
        self.scopes
            .get_type_declaration(self.builtin_scope, data_type.name())
            .map(|entry| entry.declaration)
            .ok_or_else(|| {
                Error::without_position(ErrorImpl::Internal {
                    message: format!("built-in type '{}' is missing", data_type.name()),
                })
            })
    }

    pub fn function(&self, id: DeclId) -> Option<&FunctionDeclaration> {
        match self.declaration(id) {
            Declaration::Function(function) => Some(function),
            _ => None,
        }
    }

    /// The type declaration of a variable declaration.
    pub fn variable_type(&self, id: DeclId) -> Result<DeclId, Error> {
        match self.declaration(id) {
            Declaration::Variable(variable) => variable.type_declaration.resolved(),
            other => Err(Error::without_position(ErrorImpl::Internal {
                message: format!("expected a variable declaration, found a {}", other.kind()),
            })),
        }
    }

    /// The type declarations of a function's return slots, in order.
    pub fn return_types(&self, function: &FunctionDeclaration) -> Result<Vec<DeclId>, Error> {
        function
            .definition
            .function_type
            .return_types
            .iter()
            .map(|field| self.variable_type(field.variable))
            .collect()
    }

    /// The type declarations of a function's parameters, in order.
    pub fn parameter_types(&self, function: &FunctionDeclaration) -> Result<Vec<DeclId>, Error> {
        function
            .definition
            .function_type
            .parameters
            .iter()
            .map(|field| self.variable_type(field.variable))
            .collect()
    }

    /// Name of a type declaration as shown in error messages.
    pub fn type_name(&self, id: DeclId) -> String {
        match self.declaration(id) {
            Declaration::Type(ty) => ty.name.clone(),
            other => format!("<{}>", other.kind()),
        }
    }

    pub fn type_names(&self, ids: &[DeclId]) -> String {
        ids.iter()
            .map(|id| self.type_name(*id))
            .collect::<Vec<String>>()
            .join(", ")
    }
}

impl Default for Program {
    fn default() -> Self {
        Self::new()
    }
}
