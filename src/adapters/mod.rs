//! Infrastructure adapters. Implement ports.
//!
//! Model inference, SQLite, HTTP and terminal front-ends. Map errors to DomainError.

pub mod ai;
pub mod http;
pub mod persistence;
pub mod ui;
