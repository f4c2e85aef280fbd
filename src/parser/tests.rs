//! Unit tests for the parser module.
//!
//! This module contains tests for parsing various language constructs including:
//! - Function declarations and signatures
//! - Variable declarations and scoping
//! - Expressions and operator precedence
//! - Control flow statements
//! - Declaration clashes and syntax errors

use crate::{
    ast::{
        ast::{DeclId, Declaration, DeclarationRef, ExprId, FunctionDeclaration, Program, StmtId},
        expressions::{BinaryOperator, ExpressionKind},
        statements::StatementKind,
        types::BasicDataType,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::lexer::tokenize,
    Position,
};

use super::parser::{parse, parse_file};

fn parse_source(source: &str) -> Result<Program, Error> {
    parse(tokenize(source).unwrap())
}

fn function<'a>(program: &'a Program, index: usize) -> &'a FunctionDeclaration {
    program
        .function(program.top_level_declarations()[index])
        .unwrap()
}

fn assignment(program: &Program, statement: StmtId) -> (DeclId, ExprId) {
    match &program.statement(statement).kind {
        StatementKind::Assign { target, value }
        | StatementKind::AddAssign { target, value }
        | StatementKind::SubtractAssign { target, value } => (target.resolved().unwrap(), *value),
        other => panic!("expected an assignment, found {:?}", other),
    }
}

fn binary(program: &Program, expression: ExprId) -> (BinaryOperator, ExprId, ExprId) {
    match program.expression(expression).kind {
        ExpressionKind::Binary {
            operator,
            left,
            right,
        } => (operator, left, right),
        ref other => panic!("expected a binary expression, found {:?}", other),
    }
}

fn integer(program: &Program, expression: ExprId) -> i64 {
    match program.expression(expression).kind {
        ExpressionKind::Integer(value) => value,
        ref other => panic!("expected an integer, found {:?}", other),
    }
}

fn identifier(program: &Program, expression: ExprId) -> DeclId {
    program
        .expression(expression)
        .declaration()
        .unwrap()
        .resolved()
        .unwrap()
}

#[test]
fn test_parse_no_tokens() {
    let program = parse(vec![]).unwrap();

    assert!(program.top_level_declarations().is_empty());
}

#[test]
fn test_parse_function_sample() {
    let source = "func test(asd Int) Int {
\tvar a Int;
\tvar b Byte;
\tvar cc String;
\ta = 123 + 4;
\tb = 'b';
\tcc = \"abc\";
\ta -= 2 + 3 * 4;
\ta++;
\ta = a + asd;
\treturn a;
}";
    let tokens = tokenize(source).unwrap();
    assert_eq!(tokens.len(), 55);

    let program = parse(tokens).unwrap();
    assert_eq!(program.top_level_declarations().len(), 1);

    let test = function(&program, 0);
    assert_eq!(test.name, "test");
    assert_eq!(test.symbol_name, "__basalt_test");
    assert_eq!(test.position, Position::new(0, 5));

    let int = program.builtin_type(BasicDataType::Int).unwrap();
    let signature = &test.definition.function_type;
    assert_eq!(signature.parameters.len(), 1);
    assert_eq!(signature.parameters[0].name.as_deref(), Some("asd"));
    assert_eq!(program.variable_type(signature.parameters[0].variable).unwrap(), int);
    assert_eq!(signature.return_types.len(), 1);
    assert_eq!(signature.return_types[0].name, None);
    assert_eq!(program.return_types(test).unwrap(), vec![int]);

    let statements = &test.definition.statements;
    assert_eq!(statements.len(), 10);

    let StatementKind::VariableDeclaration { variable: a } = program.statement(statements[0]).kind
    else {
        panic!("expected a variable declaration");
    };
    assert_eq!(program.variable_type(a).unwrap(), int);

    // a = 123 + 4;
    let (target, value) = assignment(&program, statements[3]);
    assert_eq!(target, a);
    let (operator, left, right) = binary(&program, value);
    assert_eq!(operator, BinaryOperator::Add);
    assert_eq!(integer(&program, left), 123);
    assert_eq!(integer(&program, right), 4);

    // b = 'b';
    let (_, value) = assignment(&program, statements[4]);
    assert_eq!(program.expression(value).kind, ExpressionKind::Character(b'b'));

    // cc = "abc";
    let (_, value) = assignment(&program, statements[5]);
    assert_eq!(
        program.expression(value).kind,
        ExpressionKind::String("abc".to_string())
    );

    // a -= 2 + 3 * 4;
    assert!(matches!(
        program.statement(statements[6]).kind,
        StatementKind::SubtractAssign { .. }
    ));
    let (target, value) = assignment(&program, statements[6]);
    assert_eq!(target, a);
    let (operator, left, right) = binary(&program, value);
    assert_eq!(operator, BinaryOperator::Add);
    assert_eq!(integer(&program, left), 2);
    let (operator, left, right) = binary(&program, right);
    assert_eq!(operator, BinaryOperator::Multiply);
    assert_eq!(integer(&program, left), 3);
    assert_eq!(integer(&program, right), 4);

    // a++;
    assert_eq!(
        program.statement(statements[7]).kind,
        StatementKind::Increment {
            target: DeclarationRef::Resolved(a)
        }
    );

    // a = a + asd;
    let (_, value) = assignment(&program, statements[8]);
    let (_, left, right) = binary(&program, value);
    assert_eq!(identifier(&program, left), a);
    assert_eq!(identifier(&program, right), signature.parameters[0].variable);

    // return a;
    let StatementKind::Return { values } = &program.statement(statements[9]).kind else {
        panic!("expected a return statement");
    };
    assert_eq!(values.len(), 1);
    assert_eq!(identifier(&program, values[0]), a);
}

#[test]
fn test_binary_operators_are_left_associative() {
    let program = parse_source("func main() {\n\tvar a Int;\n\ta = 10 - 2 - 3;\n}").unwrap();
    let statements = &function(&program, 0).definition.statements;

    let (_, value) = assignment(&program, statements[1]);
    let (operator, left, right) = binary(&program, value);
    assert_eq!(operator, BinaryOperator::Subtract);
    assert_eq!(integer(&program, right), 3);

    let (operator, left, right) = binary(&program, left);
    assert_eq!(operator, BinaryOperator::Subtract);
    assert_eq!(integer(&program, left), 10);
    assert_eq!(integer(&program, right), 2);
}

#[test]
fn test_precedence_levels() {
    let source = "func main() {\n\tvar b Bool;\n\tb = 1 + 2 < 4 || 1 == 1 && !b;\n}";
    let program = parse_source(source).unwrap();
    let statements = &function(&program, 0).definition.statements;

    let (_, value) = assignment(&program, statements[1]);
    let (operator, left, right) = binary(&program, value);
    assert_eq!(operator, BinaryOperator::Or);

    let (operator, sum, _) = binary(&program, left);
    assert_eq!(operator, BinaryOperator::Less);
    assert_eq!(binary(&program, sum).0, BinaryOperator::Add);

    let (operator, equal, not) = binary(&program, right);
    assert_eq!(operator, BinaryOperator::And);
    assert_eq!(binary(&program, equal).0, BinaryOperator::Equal);
    assert!(matches!(
        program.expression(not).kind,
        ExpressionKind::Not(_)
    ));
}

#[test]
fn test_not_binds_tighter_than_comparison() {
    let source = "func main() {\n\tvar b Bool;\n\tb = !b == (1 * (2 + 3) > 4);\n}";
    let program = parse_source(source).unwrap();
    let statements = &function(&program, 0).definition.statements;

    let (_, value) = assignment(&program, statements[1]);
    let (operator, left, right) = binary(&program, value);
    assert_eq!(operator, BinaryOperator::Equal);
    assert!(matches!(program.expression(left).kind, ExpressionKind::Not(_)));

    let (operator, product, _) = binary(&program, right);
    assert_eq!(operator, BinaryOperator::Greater);
    let (operator, _, sum) = binary(&program, product);
    assert_eq!(operator, BinaryOperator::Multiply);
    assert_eq!(binary(&program, sum).0, BinaryOperator::Add);
}

#[test]
fn test_literal_types_are_known_after_parsing() {
    let program = parse_source("func main() {\n\tvar b Bool;\n\tb = true;\n}").unwrap();
    let statements = &function(&program, 0).definition.statements;

    let (_, value) = assignment(&program, statements[1]);
    let bool_type = program.builtin_type(BasicDataType::Bool).unwrap();

    assert_eq!(program.expression(value).kind, ExpressionKind::Bool(true));
    assert_eq!(
        program
            .expression(value)
            .must_single_return_type(&program)
            .unwrap(),
        bool_type
    );
}

#[test]
fn test_block_variable_visible_after_its_declaration() {
    let source = "func main() {\n\tif true {\n\t\tvar a Int;\n\t\ta = 1;\n\t}\n}";
    let program = parse_source(source).unwrap();
    let statements = &function(&program, 0).definition.statements;

    let StatementKind::If {
        then_block,
        else_block,
        ..
    } = &program.statement(statements[0]).kind
    else {
        panic!("expected an if statement");
    };
    assert!(else_block.is_none());

    let StatementKind::VariableDeclaration { variable } =
        program.statement(then_block.statements[0]).kind
    else {
        panic!("expected a variable declaration");
    };
    assert_eq!(assignment(&program, then_block.statements[1]).0, variable);
}

#[test]
fn test_block_variable_not_visible_before_block() {
    let source = "func main() {\n\ta = 1;\n\tif true {\n\t\tvar a Int;\n\t}\n}";
    let error = parse_source(source).unwrap_err();

    assert_eq!(
        error.get_error_impl(),
        &ErrorImpl::VariableNotFound {
            name: "a".to_string()
        }
    );
    assert_eq!(error.get_position(), Some(&Position::new(1, 1)));
}

#[test]
fn test_block_variable_does_not_leak_after_block() {
    let source = "func main() {\n\tif true {\n\t\tvar a Int;\n\t} else {\n\t}\n\ta = 1;\n}";
    let error = parse_source(source).unwrap_err();

    assert_eq!(error.get_error_name(), "VariableNotFound");
    assert_eq!(error.get_position(), Some(&Position::new(5, 1)));
}

#[test]
fn test_parse_while_and_for() {
    let source = "func main() {
\tvar i Int;
\twhile i < 10 {
\t\ti++;
\t}
\tfor i = 0; i < 3; i += 1 {
\t\tmain();
\t}
\tfor ; i > 0; {
\t\ti--;
\t}
}";
    let program = parse_source(source).unwrap();
    let statements = &function(&program, 0).definition.statements;
    assert_eq!(statements.len(), 4);

    let StatementKind::While { body, .. } = &program.statement(statements[1]).kind else {
        panic!("expected a while statement");
    };
    assert_eq!(body.statements.len(), 1);

    let StatementKind::For {
        init, action, body, ..
    } = &program.statement(statements[2]).kind
    else {
        panic!("expected a for statement");
    };
    assert!(matches!(
        program.statement(init.unwrap()).kind,
        StatementKind::Assign { .. }
    ));
    assert!(matches!(
        program.statement(action.unwrap()).kind,
        StatementKind::AddAssign { .. }
    ));
    assert!(matches!(
        program.statement(body.statements[0]).kind,
        StatementKind::Call { .. }
    ));

    let StatementKind::For { init, action, .. } = &program.statement(statements[3]).kind else {
        panic!("expected a for statement");
    };
    assert!(init.is_none());
    assert!(action.is_none());
}

#[test]
fn test_parse_return_type_list() {
    let program = parse_source("func pair(a Int, b Bool) (Int, Bool) {\n\treturn a, b;\n}").unwrap();
    let pair = function(&program, 0);

    let int = program.builtin_type(BasicDataType::Int).unwrap();
    let bool_type = program.builtin_type(BasicDataType::Bool).unwrap();

    assert_eq!(program.parameter_types(pair).unwrap(), vec![int, bool_type]);
    assert_eq!(program.return_types(pair).unwrap(), vec![int, bool_type]);
}

#[test]
fn test_function_declaration_clash() {
    let error = parse_source("func f() {\n}\nfunc f() {\n}").unwrap_err();

    assert_eq!(
        error.get_error_impl(),
        &ErrorImpl::DeclarationClash {
            identifier: "f".to_string(),
            kind: "function".to_string(),
            previous: "line 1 column 6".to_string(),
        }
    );
    assert_eq!(
        error.to_string(),
        "identifier 'f' is already declared as function at line 1 column 6 on line 3 column 6 \
         (could not parse function declaration at line 3 column 1)"
    );
}

#[test]
fn test_variable_shadowing_is_a_clash() {
    let source = "func main(a Int) {\n\tif true {\n\t\tvar a Int;\n\t}\n}";
    let error = parse_source(source).unwrap_err();

    assert_eq!(
        error.get_error_impl(),
        &ErrorImpl::DeclarationClash {
            identifier: "a".to_string(),
            kind: "variable".to_string(),
            previous: "line 1 column 11".to_string(),
        }
    );

    let error = parse_source("func main() {\n\tvar Int Int;\n}").unwrap_err();
    assert_eq!(
        error.get_error_impl(),
        &ErrorImpl::DeclarationClash {
            identifier: "Int".to_string(),
            kind: "type".to_string(),
            previous: "built-in".to_string(),
        }
    );
}

#[test]
fn test_function_named_after_earlier_local_clashes() {
    let source = "func main() {\n\tvar helper Int;\n}\nfunc helper() {\n}";
    let error = parse_source(source).unwrap_err();

    assert_eq!(
        error.get_error_impl(),
        &ErrorImpl::SubScopeDeclarationClash {
            identifier: "helper".to_string(),
            previous: Position::new(1, 5),
        }
    );

    let reversed = "func helper() {\n}\nfunc main() {\n\tvar helper Int;\n}";
    assert_eq!(
        parse_source(reversed).unwrap_err().get_error_name(),
        "DeclarationClash"
    );
}

#[test]
fn test_return_must_be_last() {
    let error = parse_source("func main() {\n\treturn;\n\tmain();\n}").unwrap_err();

    assert_eq!(error.get_error_impl(), &ErrorImpl::ReturnNotLast);
    assert_eq!(error.get_position(), Some(&Position::new(2, 1)));
}

#[test]
fn test_only_identifiers_and_calls_are_callable() {
    let error = parse_source("func main() {\n\tvar a Int;\n\ta = (1 + 2)(3);\n}").unwrap_err();

    assert_eq!(error.get_error_impl(), &ErrorImpl::NotCallable);
    assert_eq!(error.get_position(), Some(&Position::new(2, 12)));
}

#[test]
fn test_expression_statement_must_be_call() {
    let error = parse_source("func main() {\n\tmain() + 1;\n}").unwrap_err();

    assert_eq!(error.get_error_impl(), &ErrorImpl::CallStatementExpected);
}

#[test]
fn test_unexpected_tokens() {
    let error = parse_source("func main() {\n\tvar a Int\n}").unwrap_err();
    assert_eq!(
        error.get_error_impl(),
        &ErrorImpl::UnexpectedToken {
            token: "}".to_string(),
            expected: "';'".to_string(),
        }
    );
    assert_eq!(error.get_context().len(), 1);

    let error = parse_source("var a Int;").unwrap_err();
    assert_eq!(
        error.get_error_impl(),
        &ErrorImpl::UnexpectedToken {
            token: "var".to_string(),
            expected: "'func'".to_string(),
        }
    );

    let error = parse_source("func main() {\n\tif true {\n\t} else if false {\n\t}\n}").unwrap_err();
    assert_eq!(error.get_error_name(), "UnexpectedToken");
}

#[test]
fn test_signature_error_keeps_its_own_position() {
    let error = parse_source("func pair(a Int; b Int) {\n}").unwrap_err();

    assert_eq!(error.get_position(), Some(&Position::new(0, 15)));
    assert_eq!(
        error.to_string(),
        "unexpected token ';', expected: ',' on line 1 column 16 \
         (could not parse function declaration at line 1 column 1)"
    );
}

#[test]
fn test_unexpected_end_of_input() {
    let error = parse_source("func main() {\n\tvar a Int;").unwrap_err();

    assert_eq!(
        error.get_error_impl(),
        &ErrorImpl::UnexpectedEndOfInput {
            expected: "'}'".to_string(),
        }
    );
}

#[test]
fn test_parse_file_leaves_forward_references_pending() {
    let source = "func main() {\n\tlater();\n}\nfunc later() {\n}";
    let (program, deferred) = parse_file(tokenize(source).unwrap()).unwrap();

    assert_eq!(deferred.identifiers.len(), 1);
    let Declaration::Function(main) = program.declaration(program.top_level_declarations()[0])
    else {
        panic!("expected a function declaration");
    };
    assert_eq!(main.definition.statements.len(), 1);

    assert!(parse(tokenize(source).unwrap()).is_ok());
}
