use log::debug;

use crate::{
    ast::{
        ast::{DeclId, DeclarationRef, ExprId, FunctionDeclaration, Program, StmtId},
        statements::{Block, StatementKind},
        types::BasicDataType,
    },
    errors::errors::{Error, ErrorImpl},
    Position,
};

/// Name of the function every program starts in.
pub const ENTRY_POINT_NAME: &str = "main";

/// Checks the statements of one function at a time against that function's
/// return types.
pub struct TypeChecker<'a> {
    program: &'a Program,
    int_type: DeclId,
    bool_type: DeclId,
    return_types: Vec<DeclId>,
}

impl<'a> TypeChecker<'a> {
    pub fn new(program: &'a Program) -> Result<Self, Error> {
        Ok(TypeChecker {
            program,
            int_type: program.builtin_type(BasicDataType::Int)?,
            bool_type: program.builtin_type(BasicDataType::Bool)?,
            return_types: vec![],
        })
    }

    pub fn check_function(&mut self, function: &FunctionDeclaration) -> Result<(), Error> {
        debug!("checking function '{}'", function.name);

        self.return_types = self.program.return_types(function)?;
        let statements = &function.definition.statements;

        self.check_statements(statements)?;

        if !self.return_types.is_empty() {
            let ends_with_return = statements
                .last()
                .is_some_and(|last| self.program.statement(*last).is_return());

            if !ends_with_return {
                return Err(Error::new(ErrorImpl::MissingReturn, function.position));
            }
        }

        Ok(())
    }

    fn check_statements(&self, statements: &[StmtId]) -> Result<(), Error> {
        for statement in statements {
            self.check_statement(*statement)?;
        }
        Ok(())
    }

    fn check_block(&self, block: &Block) -> Result<(), Error> {
        self.check_statements(&block.statements)
    }

    fn check_statement(&self, id: StmtId) -> Result<(), Error> {
        let statement = self.program.statement(id);
        let position = statement.position;

        match &statement.kind {
            StatementKind::VariableDeclaration { variable } => {
                self.program.variable_type(*variable)?;
            }
            StatementKind::Assign { target, value } => {
                let target_type = self.target_type(target)?;
                let value_type = self.single_type(*value)?;

                if target_type != value_type {
                    return Err(self.type_mismatch(target_type, value_type, position));
                }
            }
            StatementKind::AddAssign { target, value } => {
                self.check_integer_target(target, "add to", position)?;
                self.check_integer_value(*value)?;
            }
            StatementKind::SubtractAssign { target, value } => {
                self.check_integer_target(target, "subtract from", position)?;
                self.check_integer_value(*value)?;
            }
            StatementKind::Increment { target } => {
                self.check_integer_target(target, "increment", position)?;
            }
            StatementKind::Decrement { target } => {
                self.check_integer_target(target, "decrement", position)?;
            }
            StatementKind::Call { call } => {
                self.program
                    .expression(*call)
                    .resulting_type_declarations(self.program)?;
            }
            StatementKind::If {
                condition,
                then_block,
                else_block,
            } => {
                self.check_condition(*condition)?;
                self.check_block(then_block)?;
                if let Some(else_block) = else_block {
                    self.check_block(else_block)?;
                }
            }
            StatementKind::While { condition, body } => {
                self.check_condition(*condition)?;
                self.check_block(body)?;
            }
            StatementKind::For {
                init,
                condition,
                action,
                body,
            } => {
                if let Some(init) = init {
                    self.check_statement(*init)?;
                }
                self.check_condition(*condition)?;
                if let Some(action) = action {
                    self.check_statement(*action)?;
                }
                self.check_block(body)?;
            }
            StatementKind::Return { values } => self.check_return(values, position)?,
        }

        Ok(())
    }

    fn check_return(&self, values: &[ExprId], position: Position) -> Result<(), Error> {
        if values.len() != self.return_types.len() {
            return Err(Error::new(
                ErrorImpl::ReturnCountMismatch {
                    expected: self.return_types.len(),
                    received: values.len(),
                },
                position,
            ));
        }

        for (expected, value) in self.return_types.iter().zip(values) {
            let expression = self.program.expression(*value);
            let received = expression.must_single_return_type(self.program)?;

            if received != *expected {
                return Err(Error::new(
                    ErrorImpl::ReturnTypeMismatch {
                        expected: self.program.type_name(*expected),
                        received: self.program.type_name(received),
                    },
                    expression.position,
                ));
            }
        }

        Ok(())
    }

    fn check_condition(&self, condition: ExprId) -> Result<(), Error> {
        let expression = self.program.expression(condition);

        if expression.must_single_return_type(self.program)? != self.bool_type {
            return Err(Error::new(ErrorImpl::ConditionNotBool, expression.position));
        }

        Ok(())
    }

    fn check_integer_target(
        &self,
        target: &DeclarationRef,
        operation: &str,
        position: Position,
    ) -> Result<(), Error> {
        let target_type = self.target_type(target)?;

        if target_type != self.int_type {
            return Err(Error::new(
                ErrorImpl::IntegerOnlyOperation {
                    operation: operation.to_string(),
                    received: self.program.type_name(target_type),
                },
                position,
            ));
        }

        Ok(())
    }

    fn check_integer_value(&self, value: ExprId) -> Result<(), Error> {
        let expression = self.program.expression(value);
        let value_type = expression.must_single_return_type(self.program)?;

        if value_type != self.int_type {
            return Err(self.type_mismatch(self.int_type, value_type, expression.position));
        }

        Ok(())
    }

    fn target_type(&self, target: &DeclarationRef) -> Result<DeclId, Error> {
        self.program.variable_type(target.resolved()?)
    }

    fn single_type(&self, expression: ExprId) -> Result<DeclId, Error> {
        self.program
            .expression(expression)
            .must_single_return_type(self.program)
    }

    fn type_mismatch(&self, expected: DeclId, received: DeclId, position: Position) -> Error {
        Error::new(
            ErrorImpl::TypeMismatch {
                expected: self.program.type_name(expected),
                received: self.program.type_name(received),
            },
            position,
        )
    }
}

/// Checks every top-level function. Stops at the first error.
pub fn type_check(program: &Program) -> Result<(), Error> {
    let mut type_checker = TypeChecker::new(program)?;

    for declaration in program.top_level_declarations() {
        if let Some(function) = program.function(*declaration) {
            type_checker.check_function(function)?;
        }
    }

    Ok(())
}

/// Looks up the entry point in the file scope.
pub fn find_main_function(program: &Program) -> Result<DeclId, Error> {
    program
        .scopes()
        .search_function_declaration(program.file_scope(), ENTRY_POINT_NAME)
        .map(|entry| entry.declaration)
        .ok_or_else(|| Error::without_position(ErrorImpl::MissingMainFunction))
}

/// Type checks the program and returns its entry point.
pub fn analyze(program: &Program) -> Result<DeclId, Error> {
    type_check(program)?;

    let entry_point = find_main_function(program)?;
    debug!("found entry point '{}'", ENTRY_POINT_NAME);

    Ok(entry_point)
}
