//! Claims storage implementations.
//!
//! Provides the in-memory `ClaimsRepository`. Pending codes live only in
//! process memory and are lost on restart.

mod inmemory;

pub use inmemory::ClaimsStore;
