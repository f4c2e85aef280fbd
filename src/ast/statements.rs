use crate::{scope::scope::ScopeId, Position};

use super::ast::{DeclId, DeclarationRef, ExprId, StmtId};

/// A braced statement list with the scope its first statement was parsed in.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub statements: Vec<StmtId>,
    pub scope: ScopeId,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatementKind {
    /// `var name Type;`
    VariableDeclaration {
        variable: DeclId,
    },
    Assign {
        target: DeclarationRef,
        value: ExprId,
    },
    AddAssign {
        target: DeclarationRef,
        value: ExprId,
    },
    SubtractAssign {
        target: DeclarationRef,
        value: ExprId,
    },
    Increment {
        target: DeclarationRef,
    },
    Decrement {
        target: DeclarationRef,
    },
    Call {
        call: ExprId,
    },
    If {
        condition: ExprId,
        then_block: Block,
        else_block: Option<Block>,
    },
    While {
        condition: ExprId,
        body: Block,
    },
    /// `for [init]; condition; [action] { body }`
    For {
        init: Option<StmtId>,
        condition: ExprId,
        action: Option<StmtId>,
        body: Block,
    },
    Return {
        values: Vec<ExprId>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub kind: StatementKind,
    pub position: Position,
}

impl Statement {
    pub fn new(kind: StatementKind, position: Position) -> Self {
        Statement { kind, position }
    }

    pub fn is_return(&self) -> bool {
        matches!(self.kind, StatementKind::Return { .. })
    }

    /// The variable mutated by an assignment-like statement.
    pub fn target(&self) -> Option<&DeclarationRef> {
        match &self.kind {
            StatementKind::Assign { target, .. }
            | StatementKind::AddAssign { target, .. }
            | StatementKind::SubtractAssign { target, .. }
            | StatementKind::Increment { target }
            | StatementKind::Decrement { target } => Some(target),
            _ => None,
        }
    }

    pub fn target_mut(&mut self) -> Option<&mut DeclarationRef> {
        match &mut self.kind {
            StatementKind::Assign { target, .. }
            | StatementKind::AddAssign { target, .. }
            | StatementKind::SubtractAssign { target, .. }
            | StatementKind::Increment { target }
            | StatementKind::Decrement { target } => Some(target),
            _ => None,
        }
    }
}
