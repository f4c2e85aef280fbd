use std::collections::HashMap;

use indexed_vec::{Idx, IndexVec};

use crate::{
    ast::ast::{DeclId, DeclarationKind},
    errors::errors::{Error, ErrorImpl},
    Position,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(usize);

impl Idx for ScopeId {
    fn new(index: usize) -> Self {
        Self(index)
    }

    fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Block,
    Function,
    File,
    BuiltIn,
}

/// A declaration bound to a name, and where it was declared.
/// Built-in declarations have no position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScopeEntry {
    pub declaration: DeclId,
    pub position: Option<Position>,
}

#[derive(Debug, Clone)]
struct Scope {
    kind: ScopeKind,
    parent: Option<ScopeId>,
    variables: HashMap<String, ScopeEntry>,
    types: HashMap<String, ScopeEntry>,
    functions: HashMap<String, ScopeEntry>,
    /// File scopes only: first position of every name declared in a nested scope.
    sub_scope_declarations: HashMap<String, Position>,
}

impl Scope {
    fn new(kind: ScopeKind, parent: Option<ScopeId>) -> Self {
        Scope {
            kind,
            parent,
            variables: HashMap::new(),
            types: HashMap::new(),
            functions: HashMap::new(),
            sub_scope_declarations: HashMap::new(),
        }
    }

    fn entries(&self, kind: DeclarationKind) -> &HashMap<String, ScopeEntry> {
        match kind {
            DeclarationKind::Variable => &self.variables,
            DeclarationKind::Type => &self.types,
            DeclarationKind::Function => &self.functions,
        }
    }

    fn entries_mut(&mut self, kind: DeclarationKind) -> &mut HashMap<String, ScopeEntry> {
        match kind {
            DeclarationKind::Variable => &mut self.variables,
            DeclarationKind::Type => &mut self.types,
            DeclarationKind::Function => &mut self.functions,
        }
    }
}

/// Arena of lexical scopes rooted at the built-in scope.
///
/// Scopes are never removed. Extending a scope with a variable allocates a
/// copy with the same parent, so statements parsed earlier keep seeing the
/// scope as it was.
#[derive(Debug, Clone)]
pub struct ScopeTree {
    scopes: IndexVec<ScopeId, Scope>,
    builtin: ScopeId,
}

impl ScopeTree {
    pub fn new() -> ScopeTree {
        let mut scopes = IndexVec::new();
        let builtin = scopes.push(Scope::new(ScopeKind::BuiltIn, None));

        ScopeTree { scopes, builtin }
    }

    pub fn builtin_scope(&self) -> ScopeId {
        self.builtin
    }

    pub fn new_scope(&mut self, kind: ScopeKind, parent: ScopeId) -> ScopeId {
        self.scopes.push(Scope::new(kind, Some(parent)))
    }

    /// Allocates a copy of the scope's mappings with the same kind and parent.
    pub fn clone_shallow(&mut self, scope: ScopeId) -> ScopeId {
        let copy = self.scopes[scope].clone();
        self.scopes.push(copy)
    }

    pub fn kind(&self, scope: ScopeId) -> ScopeKind {
        self.scopes[scope].kind
    }

    pub fn parent(&self, scope: ScopeId) -> Option<ScopeId> {
        self.scopes[scope].parent
    }

    pub(crate) fn install_builtin_type(&mut self, name: &str, declaration: DeclId) {
        self.scopes[self.builtin].types.insert(
            name.to_string(),
            ScopeEntry {
                declaration,
                position: None,
            },
        );
    }

    /// Returns a new scope holding everything `scope` holds plus the variable.
    pub fn extend_with_variable(
        &mut self,
        scope: ScopeId,
        name: &str,
        declaration: DeclId,
        position: Position,
    ) -> Result<ScopeId, Error> {
        let extended = self.clone_shallow(scope);
        self.declare_variable(extended, name, declaration, position)?;
        Ok(extended)
    }

    pub fn declare_variable(
        &mut self,
        scope: ScopeId,
        name: &str,
        declaration: DeclId,
        position: Position,
    ) -> Result<(), Error> {
        self.declare(scope, DeclarationKind::Variable, name, declaration, position)
    }

    pub fn declare_type(
        &mut self,
        scope: ScopeId,
        name: &str,
        declaration: DeclId,
        position: Position,
    ) -> Result<(), Error> {
        self.declare(scope, DeclarationKind::Type, name, declaration, position)
    }

    pub fn declare_function(
        &mut self,
        scope: ScopeId,
        name: &str,
        declaration: DeclId,
        position: Position,
    ) -> Result<(), Error> {
        self.declare(scope, DeclarationKind::Function, name, declaration, position)
    }

    fn declare(
        &mut self,
        scope: ScopeId,
        kind: DeclarationKind,
        name: &str,
        declaration: DeclId,
        position: Position,
    ) -> Result<(), Error> {
        if self.kind(scope) == ScopeKind::BuiltIn {
            return Err(Error::new(
                ErrorImpl::BuiltInScopeDeclaration {
                    kind: kind.to_string(),
                },
                position,
            ));
        }

        if let Some((previous_kind, previous)) = self.search_declaration(scope, name) {
            return Err(Error::new(
                ErrorImpl::DeclarationClash {
                    identifier: name.to_string(),
                    kind: previous_kind.to_string(),
                    previous: previous
                        .position
                        .map(|position| position.to_string())
                        .unwrap_or_else(|| String::from("built-in")),
                },
                position,
            ));
        }

        if self.kind(scope) == ScopeKind::File {
            if let Some(previous) = self.scopes[scope].sub_scope_declarations.get(name) {
                return Err(Error::new(
                    ErrorImpl::SubScopeDeclarationClash {
                        identifier: name.to_string(),
                        previous: *previous,
                    },
                    position,
                ));
            }
        } else if let Some(file_scope) = self.enclosing_file_scope(scope) {
            self.scopes[file_scope]
                .sub_scope_declarations
                .entry(name.to_string())
                .or_insert(position);
        }

        self.scopes[scope].entries_mut(kind).insert(
            name.to_string(),
            ScopeEntry {
                declaration,
                position: Some(position),
            },
        );

        Ok(())
    }

    fn enclosing_file_scope(&self, scope: ScopeId) -> Option<ScopeId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            if self.kind(id) == ScopeKind::File {
                return Some(id);
            }
            current = self.parent(id);
        }
        None
    }

    pub fn get_variable_declaration(&self, scope: ScopeId, name: &str) -> Option<ScopeEntry> {
        self.scopes[scope].variables.get(name).copied()
    }

    pub fn get_type_declaration(&self, scope: ScopeId, name: &str) -> Option<ScopeEntry> {
        self.scopes[scope].types.get(name).copied()
    }

    pub fn get_function_declaration(&self, scope: ScopeId, name: &str) -> Option<ScopeEntry> {
        self.scopes[scope].functions.get(name).copied()
    }

    pub fn search_variable_declaration(&self, scope: ScopeId, name: &str) -> Option<ScopeEntry> {
        self.search(scope, DeclarationKind::Variable, name)
    }

    pub fn search_type_declaration(&self, scope: ScopeId, name: &str) -> Option<ScopeEntry> {
        self.search(scope, DeclarationKind::Type, name)
    }

    pub fn search_function_declaration(&self, scope: ScopeId, name: &str) -> Option<ScopeEntry> {
        self.search(scope, DeclarationKind::Function, name)
    }

    /// Searches variables, then types, then functions.
    pub fn search_declaration(
        &self,
        scope: ScopeId,
        name: &str,
    ) -> Option<(DeclarationKind, ScopeEntry)> {
        [
            DeclarationKind::Variable,
            DeclarationKind::Type,
            DeclarationKind::Function,
        ]
        .into_iter()
        .find_map(|kind| self.search(scope, kind, name).map(|entry| (kind, entry)))
    }

    /// Walks up the chain. Once a function scope has been inspected only
    /// file and built-in scopes are inspected, so the locals of an enclosing
    /// function are never visible.
    fn search(&self, scope: ScopeId, kind: DeclarationKind, name: &str) -> Option<ScopeEntry> {
        let mut current = Some(scope);
        let mut crossed_function = false;

        while let Some(id) = current {
            let scope = &self.scopes[id];

            if !crossed_function || matches!(scope.kind, ScopeKind::File | ScopeKind::BuiltIn) {
                if let Some(entry) = scope.entries(kind).get(name) {
                    return Some(*entry);
                }
            }

            if scope.kind == ScopeKind::Function {
                crossed_function = true;
            }
            current = scope.parent;
        }

        None
    }
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}
