//! Blockfall (workspace facade crate).
//!
//! Re-exports the workspace crates under short names so the binary, the integration tests
//! and the benchmarks share one import path: `blockfall::{core, hooks, input, term, types}`.

pub mod config;

pub use blockfall_core as core;
pub use blockfall_hooks as hooks;
pub use blockfall_input as input;
pub use blockfall_term as term;
pub use blockfall_types as types;
