//! session-insight: therapy-session summaries, concern tags and breakthrough passages,
//! built with Hexagonal Architecture.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod shared;
pub mod usecases;
