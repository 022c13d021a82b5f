//! Functional core for the TARA-Mock identity provider.
//!
//! Pure types and functions with no I/O:
//! - `flow`: authorization codes, pending claims, request validation
//! - `identity`: the catalog of simulated users

pub mod flow;
pub mod identity;
