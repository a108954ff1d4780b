//! Hooks module - collaborators that observe the game without feeding back into it
//!
//! The simulation core is synchronous and never awaits. Everything here runs on a tokio
//! runtime owned by the host and is reached through fire-and-forget channels:
//!
//! - [`audio`]: turns [`GameEvent`](crate::types::GameEvent)s into scheduled tone
//!   sequences played by a [`ToneSink`]
//! - [`commentary`]: asks a [`Commentator`] for a short announcer line after a clear,
//!   with a timeout and fixed fallbacks
//! - [`journal`]: appends one JSON line per event to a file
//!
//! Failures inside a collaborator are logged with `tracing` and replaced by fallbacks;
//! they never reach the game loop.

pub mod audio;
pub mod commentary;
pub mod journal;

pub use blockfall_types as types;

pub use audio::{tones_for, AudioController, LogSink, NullSink, Tone, ToneSink, Waveform};
pub use commentary::{
    encouragement_prompt, resolve, CommentFuture, Commentary, CommentaryService, Commentator,
    PhraseBook, Prompted, ShellGenerator, TextGenerator, EMPTY_REPLY_LINE, FAILURE_LINE,
    NO_PROVIDER_LINE,
};
pub use journal::{EventJournal, JournalRecord, Tally};
