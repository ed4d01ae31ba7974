//! Cross-cutting helpers shared by adapters and wiring.

pub mod config;
pub mod display;
