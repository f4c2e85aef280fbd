//! Integration tests for end-to-end compilation.
//!
//! These tests verify that the complete front end works correctly from
//! source code through tokenization, parsing, deferred resolution and
//! type checking.

use basalt::{
    ast::{
        ast::{DeclarationRef, Program},
        expressions::ExpressionKind,
        statements::StatementKind,
    },
    compile,
    errors::errors::{ErrorCategory, ErrorImpl},
    lexer::lexer::tokenize,
    parser::parser::parse,
    render_error,
    type_checker::type_checker::analyze,
};

const FORWARD_CALL_PROGRAM: &str = "func main() {
\tvar a Int;
\ta = 123;
\ta = test(a);
\ta = test(123);
}

func test(asd Int) Int {
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

fn every_expression_is_typed(program: &Program) {
    for declaration in program.top_level_declarations() {
        let function = program.function(*declaration).unwrap();
        for statement in &function.definition.statements {
            match &program.statement(*statement).kind {
                StatementKind::Assign { value, .. }
                | StatementKind::AddAssign { value, .. }
                | StatementKind::SubtractAssign { value, .. } => {
                    let types = program
                        .expression(*value)
                        .resulting_type_declarations(program)
                        .unwrap();
                    assert_eq!(types.len(), 1);
                }
                _ => {}
            }
        }
    }
}

#[test]
fn test_compile_forward_reference() {
    let tokens = tokenize(FORWARD_CALL_PROGRAM).unwrap();
    assert_eq!(tokens.len(), 83);

    let program = parse(tokens).unwrap();
    let entry_point = analyze(&program).unwrap();

    let main = program.function(entry_point).unwrap();
    assert_eq!(main.name, "main");
    assert_eq!(program.top_level_declarations()[0], entry_point);

    let test = program.top_level_declarations()[1];
    let StatementKind::Assign { value, .. } = &program.statement(main.definition.statements[2]).kind
    else {
        panic!("expected an assignment");
    };
    let ExpressionKind::Call { callee, arguments } = &program.expression(*value).kind else {
        panic!("expected a call");
    };
    assert_eq!(arguments.len(), 1);
    assert_eq!(
        program.expression(*callee).declaration(),
        Some(&DeclarationRef::Resolved(test))
    );

    every_expression_is_typed(&program);
}

#[test]
fn test_compile_returns_checked_program() {
    let checked = compile(FORWARD_CALL_PROGRAM).unwrap();

    assert_eq!(checked.program.top_level_declarations().len(), 2);
    assert_eq!(
        checked.program.function(checked.entry_point).unwrap().symbol_name,
        "__basalt_main"
    );
}

#[test]
fn test_compile_control_flow() {
    let source = "func count(limit Int) Int {
\tvar total Int;
\tvar i Int;
\tfor i = 0; i < limit; i++ {
\t\tif i == 3 {
\t\t\ttotal += 10;
\t\t} else {
\t\t\ttotal += 1;
\t\t}
\t}
\twhile total > 100 && !(total == 0) {
\t\ttotal -= 1;
\t}
\treturn total;
}

func main() {
\tvar result Int;
\tresult = count(5);
\tcount(result);
}";

    let checked = compile(source).unwrap();
    every_expression_is_typed(&checked.program);
}

#[test]
fn test_compile_type_mismatch() {
    let source = "func main() {\n\tvar a Int;\n\ta = \"abc\";\n}";
    let error = compile(source).unwrap_err();

    assert_eq!(error.get_category(), ErrorCategory::Type);
    assert_eq!(
        error.get_error_impl(),
        &ErrorImpl::TypeMismatch {
            expected: "Int".to_string(),
            received: "String".to_string(),
        }
    );
    assert_eq!(error.get_position().unwrap().uf_line(), 3);
    assert_eq!(error.get_position().unwrap().uf_column(), 2);
}

#[test]
fn test_compile_missing_return() {
    let source = "func value() Int {\n\tvar a Int;\n\ta = 1;\n}\nfunc main() {\n}";
    let error = compile(source).unwrap_err();

    assert_eq!(error.get_error_impl(), &ErrorImpl::MissingReturn);
}

#[test]
fn test_compile_missing_main() {
    let error = compile("").unwrap_err();
    assert_eq!(error.to_string(), "must have a 'main' function");

    let error = compile("func start() {\n}").unwrap_err();
    assert_eq!(error.to_string(), "must have a 'main' function");
}

#[test]
fn test_compile_stops_at_first_stage_error() {
    let error = compile("func main() {\n\tvar a Int;\n\ta = 1 # 2;\n}").unwrap_err();
    assert_eq!(error.get_category(), ErrorCategory::Lex);

    let error = compile("func main() {\n\tvar a Int;\n\ta = ;\n}").unwrap_err();
    assert_eq!(error.get_category(), ErrorCategory::Parse);

    let error = compile("func main() {\n\tmissing();\n}").unwrap_err();
    assert_eq!(error.get_category(), ErrorCategory::Resolution);
}

#[test]
fn test_render_type_error() {
    let source = "func main() {\n\tvar a Int;\n\ta = 'x';\n}";
    let error = compile(source).unwrap_err();

    let rendered = render_error(&error, source);
    let lines: Vec<&str> = rendered.lines().collect();

    assert_eq!(
        lines[0],
        "Error: TypeMismatch (Expected type `Int`, received `Byte`)"
    );
    assert_eq!(
        lines[1],
        "type mismatch: expected 'Int' but was given 'Byte' on line 3 column 2"
    );
    assert_eq!(lines[2], "-> line 3 column 2");
    assert_eq!(lines[4], "3 | a = 'x';");
    assert_eq!(lines[5], "  | ^");
}
