//! Terminal game renderer.
//!
//! A small rendering layer for terminal gameplay. It avoids widget/layout libraries
//! and draws into a plain framebuffer that is then diffed and flushed to the terminal.
//!
//! - [`GameView`] turns a [`GameSnapshot`](crate::core::GameSnapshot) into a framebuffer
//!   without any I/O, so it can be unit-tested.
//! - [`TerminalRenderer`] owns the terminal session and repaints only dirty spans.
//! - Board cells are two columns wide to compensate for the glyph aspect ratio.

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use blockfall_core as core;
pub use blockfall_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{AnchorY, GameView, HudStatus, Viewport};
pub use renderer::TerminalRenderer;
