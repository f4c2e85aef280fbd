//! Type checking and semantic analysis module.
//!
//! This module checks the resolved program:
//!
//! - Assignments must match the declared type of their target
//! - `+=`, `-=`, `++` and `--` only apply to `Int` variables
//! - Conditions of `if`, `while` and `for` must be `Bool`
//! - Returns must match the function's return types, and a function with
//!   return types must end with a `return`
//! - The program must have a `main` function
//!
//! Expression types are computed (and cached on each node) on demand.

pub mod type_checker;

#[cfg(test)]
mod tests;
