//! Terminal input module.
//!
//! Maps `crossterm` key events onto the device-agnostic [`Command`](crate::types::Command)
//! surface and provides a hold tracker for terminals that never report key releases:
//! horizontal keys repeat with DAS/ARR and soft drop is released after a quiet period.

pub mod handler;
pub mod map;

pub use blockfall_types as types;

pub use handler::InputHandler;
pub use map::{handle_key_event, handle_key_release, should_quit};
