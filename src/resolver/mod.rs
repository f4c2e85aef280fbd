//! Deferred name resolution.
//!
//! The parser resolves names as it reads them. Functions may be used before
//! they are declared, so every reference the parser could not resolve is
//! queued and resolved here once the whole file has been parsed.

pub mod resolver;
