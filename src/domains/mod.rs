//! Domains module containing business logic organized by bounded contexts.
//!
//! The server currently has a single domain: tools, the named and
//! schema-described operations clients can list and call.

pub mod tools;
