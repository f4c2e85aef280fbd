//! Lexical scopes used for name resolution while parsing.
//!
//! Scopes form a tree rooted at the built-in scope (primitive types), with
//! one file scope below it, a function scope per function and block scopes
//! for `if`, `while` and `for` bodies. Lookups never see the locals of a
//! different enclosing function.

pub mod scope;
