//! Unit tests for the type checker.

use crate::{
    ast::ast::Program,
    errors::errors::{Error, ErrorCategory, ErrorImpl},
    lexer::lexer::tokenize,
    parser::parser::parse,
};

use super::type_checker::{analyze, find_main_function, type_check};

fn parse_source(source: &str) -> Program {
    parse(tokenize(source).unwrap()).unwrap()
}

fn check_source(source: &str) -> Result<(), Error> {
    type_check(&parse_source(source))
}

#[test]
fn test_well_typed_function() {
    let source = "func add(a Int, b Int) Int {\n\tvar c Int;\n\tc = a + b;\n\tc += 1;\n\tc--;\n\treturn c;\n}";
    assert!(check_source(source).is_ok());
}

#[test]
fn test_assignment_type_mismatch() {
    let error = check_source("func main() {\n\tvar a Int;\n\ta = \"abc\";\n}").unwrap_err();

    assert_eq!(
        error.get_error_impl(),
        &ErrorImpl::TypeMismatch {
            expected: "Int".to_string(),
            received: "String".to_string()
        }
    );
    assert_eq!(error.get_category(), ErrorCategory::Type);
    assert_eq!(
        error.to_string(),
        "type mismatch: expected 'Int' but was given 'String' on line 3 column 2"
    );
}

#[test]
fn test_operand_type_mismatch() {
    let error = check_source("func main() {\n\tvar a Int;\n\ta = 1 + 'c';\n}").unwrap_err();

    assert_eq!(
        error.get_error_impl(),
        &ErrorImpl::OperandTypeMismatch {
            left: "Int".to_string(),
            right: "Byte".to_string()
        }
    );
    assert_eq!(error.get_position().unwrap().column, 7);
}

#[test]
fn test_comparison_yields_bool() {
    let source = "func main() {\n\tvar b Bool;\n\tb = 1 < 2 && 'a' == 'b' || !false;\n}";
    assert!(check_source(source).is_ok());

    let error = check_source("func main() {\n\tvar a Int;\n\ta = 1 == 1;\n}").unwrap_err();
    assert_eq!(
        error.get_error_impl(),
        &ErrorImpl::TypeMismatch {
            expected: "Int".to_string(),
            received: "Bool".to_string()
        }
    );
}

#[test]
fn test_logical_operands_must_be_bool() {
    let error = check_source("func main() {\n\tvar b Bool;\n\tb = 1 && true;\n}").unwrap_err();

    assert_eq!(
        error.get_error_impl(),
        &ErrorImpl::LogicalOperandType {
            received: "Int".to_string()
        }
    );
}

#[test]
fn test_not_operand_must_be_bool() {
    let error = check_source("func main() {\n\tvar b Bool;\n\tb = !1;\n}").unwrap_err();

    assert_eq!(
        error.get_error_impl(),
        &ErrorImpl::NotOperandType {
            received: "Int".to_string()
        }
    );
}

#[test]
fn test_compound_assignment_requires_int() {
    let error = check_source("func main() {\n\tvar s String;\n\ts += \"a\";\n}").unwrap_err();
    assert_eq!(
        error.get_error_impl(),
        &ErrorImpl::IntegerOnlyOperation {
            operation: "add to".to_string(),
            received: "String".to_string()
        }
    );

    let error = check_source("func main() {\n\tvar b Byte;\n\tb++;\n}").unwrap_err();
    assert_eq!(
        error.to_string(),
        "cannot increment variable with type 'Byte' on line 3 column 2"
    );

    let error = check_source("func main() {\n\tvar a Int;\n\ta -= 'x';\n}").unwrap_err();
    assert_eq!(error.get_error_name(), "TypeMismatch");
}

#[test]
fn test_condition_must_be_bool() {
    let error = check_source("func main() {\n\tif 1 {\n\t}\n}").unwrap_err();
    assert_eq!(error.get_error_impl(), &ErrorImpl::ConditionNotBool);
    assert_eq!(error.get_position().unwrap().line, 1);

    let error = check_source("func main() {\n\twhile \"yes\" {\n\t}\n}").unwrap_err();
    assert_eq!(error.get_error_impl(), &ErrorImpl::ConditionNotBool);

    let error = check_source("func main() {\n\tvar i Int;\n\tfor i = 0; i; i++ {\n\t}\n}").unwrap_err();
    assert_eq!(error.get_error_impl(), &ErrorImpl::ConditionNotBool);
}

#[test]
fn test_block_bodies_are_checked() {
    let source = "func main() {\n\tif true {\n\t} else {\n\t\tvar a Int;\n\t\ta = true;\n\t}\n}";
    assert_eq!(check_source(source).unwrap_err().get_error_name(), "TypeMismatch");

    let source = "func main() {\n\tvar i Int;\n\tfor i = 0; i < 10; i = 'x' {\n\t}\n}";
    assert_eq!(check_source(source).unwrap_err().get_error_name(), "TypeMismatch");
}

#[test]
fn test_missing_return() {
    let error = check_source("func f() Int {\n\tvar a Int;\n}").unwrap_err();
    assert_eq!(error.get_error_impl(), &ErrorImpl::MissingReturn);
    assert_eq!(error.to_string(), "function should return values on line 1 column 6");

    let error = check_source("func f() Int {\n}").unwrap_err();
    assert_eq!(error.get_error_impl(), &ErrorImpl::MissingReturn);
}

#[test]
fn test_return_inside_block_does_not_count() {
    let source = "func f() Int {\n\tif true {\n\t\treturn 1;\n\t}\n}";
    assert_eq!(check_source(source).unwrap_err().get_error_impl(), &ErrorImpl::MissingReturn);
}

#[test]
fn test_return_count_and_types() {
    let error = check_source("func f() (Int, Bool) {\n\treturn 1;\n}").unwrap_err();
    assert_eq!(
        error.get_error_impl(),
        &ErrorImpl::ReturnCountMismatch {
            expected: 2,
            received: 1
        }
    );

    let error = check_source("func f() (Int, Bool) {\n\treturn 1, 2;\n}").unwrap_err();
    assert_eq!(
        error.get_error_impl(),
        &ErrorImpl::ReturnTypeMismatch {
            expected: "Bool".to_string(),
            received: "Int".to_string()
        }
    );
    assert_eq!(error.get_position().unwrap().column, 11);

    assert!(check_source("func f() (Int, Bool) {\n\treturn 1, true;\n}").is_ok());
    assert!(check_source("func f() {\n\treturn;\n}").is_ok());
}

#[test]
fn test_call_checks() {
    let callee = "func add(a Int, b Int) Int {\n\treturn a + b;\n}\n";

    let error = check_source(&format!("{}func main() {{\n\tadd(1);\n}}", callee)).unwrap_err();
    assert_eq!(
        error.get_error_impl(),
        &ErrorImpl::ParameterCountMismatch {
            expected: 2,
            received: 1
        }
    );

    let error = check_source(&format!("{}func main() {{\n\tadd(1, \"b\");\n}}", callee)).unwrap_err();
    assert_eq!(
        error.get_error_impl(),
        &ErrorImpl::ParameterTypeMismatch {
            expected: "Int".to_string(),
            received: "String".to_string()
        }
    );

    assert!(check_source(&format!("{}func main() {{\n\tadd(1, add(2, 3));\n}}", callee)).is_ok());
}

#[test]
fn test_calling_a_variable_is_not_a_function() {
    let error = check_source("func main() {\n\tvar a Int;\n\ta(1);\n}").unwrap_err();
    assert_eq!(error.get_error_impl(), &ErrorImpl::NotAFunction);
}

#[test]
fn test_multiple_return_values_need_single_type() {
    let source = "func pair() (Int, Int) {\n\treturn 1, 2;\n}\nfunc main() {\n\tvar a Int;\n\ta = pair();\n}";
    let error = check_source(source).unwrap_err();
    assert_eq!(error.get_error_impl(), &ErrorImpl::SingleTypeExpected { count: 2 });
}

#[test]
fn test_expression_types_are_cached() {
    let program = parse_source("func f(a Int) Int {\n\treturn a * 2;\n}");
    type_check(&program).unwrap();

    let function = program.function(program.top_level_declarations()[0]).unwrap();
    let return_statement = program.statement(function.definition.statements[0]);
    let crate::ast::statements::StatementKind::Return { values } = &return_statement.kind else {
        panic!("expected a return statement");
    };
    let expression = program.expression(values[0]);

    let first = expression.resulting_type_declarations(&program).unwrap().as_ptr();
    let second = expression.resulting_type_declarations(&program).unwrap().as_ptr();
    assert_eq!(first, second);
    assert_eq!(program.type_names(expression.resulting_type_declarations(&program).unwrap()), "Int");
}

#[test]
fn test_find_main_function() {
    let program = parse_source("func helper() {\n}\nfunc main() {\n\thelper();\n}");
    let main = find_main_function(&program).unwrap();

    assert_eq!(main, program.top_level_declarations()[1]);
    assert_eq!(analyze(&program).unwrap(), main);
    assert_eq!(program.function(main).unwrap().symbol_name, "__basalt_main");
}

#[test]
fn test_missing_main_function() {
    let error = analyze(&parse_source("")).unwrap_err();
    assert_eq!(error.to_string(), "must have a 'main' function");
    assert!(error.get_position().is_none());

    let error = analyze(&parse_source("func Main() {\n}")).unwrap_err();
    assert_eq!(error.get_error_impl(), &ErrorImpl::MissingMainFunction);
}
