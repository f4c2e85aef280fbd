use log::{debug, trace};

use crate::{
    ast::ast::{DeclId, Declaration, DeclarationRef, ExprId, Program, StmtId, Unresolved},
    ast::statements::StatementKind,
    errors::errors::{Error, ErrorImpl},
};

/// References left pending by the parser, grouped by where they live.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DeferredWork {
    /// Variable declarations of parameters and return slots whose type is pending.
    pub fields: Vec<DeclId>,
    /// Identifier expressions whose declaration is pending.
    pub identifiers: Vec<ExprId>,
    /// `var` statements with a pending type, and mutations of a pending variable.
    pub statements: Vec<StmtId>,
}

impl DeferredWork {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.identifiers.is_empty() && self.statements.is_empty()
    }
}

/// Resolves every pending reference against its now complete scope.
/// Fails on the first name that still cannot be found.
pub fn resolve_deferred(program: &mut Program, work: DeferredWork) -> Result<(), Error> {
    debug!(
        "resolving {} fields, {} identifiers, {} statements",
        work.fields.len(),
        work.identifiers.len(),
        work.statements.len()
    );

    for variable in work.fields {
        resolve_variable_type(program, variable)?;
    }

    for expression in work.identifiers {
        let Some(DeclarationRef::Pending(unresolved)) = program.expression(expression).declaration()
        else {
            continue;
        };

        let resolved = find_value(program, unresolved)?;
        if let Some(declaration) = program.expression_mut(expression).declaration_mut() {
            *declaration = DeclarationRef::Resolved(resolved);
        }
    }

    for statement in work.statements {
        if let StatementKind::VariableDeclaration { variable } = program.statement(statement).kind {
            resolve_variable_type(program, variable)?;
            continue;
        }

        let Some(DeclarationRef::Pending(unresolved)) = program.statement(statement).target() else {
            continue;
        };

        let resolved = find_variable(program, unresolved)?;
        if let Some(target) = program.statement_mut(statement).target_mut() {
            *target = DeclarationRef::Resolved(resolved);
        }
    }

    Ok(())
}

fn resolve_variable_type(program: &mut Program, variable: DeclId) -> Result<(), Error> {
    let Declaration::Variable(declaration) = program.declaration(variable) else {
        return Err(Error::without_position(ErrorImpl::Internal {
            message: String::from("deferred field is not a variable declaration"),
        }));
    };
    let DeclarationRef::Pending(unresolved) = &declaration.type_declaration else {
        return Ok(());
    };

    let resolved = find_type(program, unresolved)?;
    if let Declaration::Variable(declaration) = program.declaration_mut(variable) {
        declaration.type_declaration = DeclarationRef::Resolved(resolved);
    }

    Ok(())
}

fn find_type(program: &Program, unresolved: &Unresolved) -> Result<DeclId, Error> {
    trace!("resolving type '{}' at {}", unresolved.name, unresolved.position);

    program
        .scopes()
        .search_type_declaration(unresolved.scope, &unresolved.name)
        .map(|entry| entry.declaration)
        .ok_or_else(|| {
            Error::new(
                ErrorImpl::TypeNotFound {
                    name: unresolved.name.clone(),
                },
                unresolved.position,
            )
        })
}

fn find_value(program: &Program, unresolved: &Unresolved) -> Result<DeclId, Error> {
    trace!("resolving identifier '{}' at {}", unresolved.name, unresolved.position);

    let scopes = program.scopes();

    scopes
        .search_variable_declaration(unresolved.scope, &unresolved.name)
        .or_else(|| scopes.search_function_declaration(unresolved.scope, &unresolved.name))
        .map(|entry| entry.declaration)
        .ok_or_else(|| {
            Error::new(
                ErrorImpl::VariableOrFunctionNotFound {
                    name: unresolved.name.clone(),
                },
                unresolved.position,
            )
        })
}

fn find_variable(program: &Program, unresolved: &Unresolved) -> Result<DeclId, Error> {
    trace!("resolving variable '{}' at {}", unresolved.name, unresolved.position);

    program
        .scopes()
        .search_variable_declaration(unresolved.scope, &unresolved.name)
        .map(|entry| entry.declaration)
        .ok_or_else(|| {
            Error::new(
                ErrorImpl::VariableNotFound {
                    name: unresolved.name.clone(),
                },
                unresolved.position,
            )
        })
}
