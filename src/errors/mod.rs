//! Error types and error handling for the compiler.
//!
//! This module defines the error types used throughout the compilation
//! process. It includes:
//!
//! - Error structures with source position information
//! - Specific error variants for every stage (tokenizing, parsing,
//!   resolution and type checking)
//! - Error formatting and display functionality
//! - Helpful error messages and suggestions
//!
//! Every stage fails fast: the first error aborts the pipeline.

pub mod errors;
