/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the resolved program tree
///
/// Submodules:
/// - ast: The program arena, declarations and the typed ids addressing them
/// - expressions: Expression nodes and their memoized result types
/// - statements: Statement nodes and blocks
/// - types: Primitive types and function signatures
pub mod ast;
pub mod expressions;
pub mod statements;
pub mod types;
