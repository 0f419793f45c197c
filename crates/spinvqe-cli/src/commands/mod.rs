//! CLI command implementations.

pub mod common;
pub mod draw;
pub mod exact;
pub mod output;
pub mod run;
pub mod sweep;
