//! Sound effects
//!
//! Each game event maps to a short sequence of tones. [`AudioController`] owns a tokio
//! task that receives events over an unbounded channel and schedules every tone of the
//! sequence at its start offset onto a [`ToneSink`]. Synthesis is the sink's business.

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, info};

use crate::types::GameEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Waveform {
    Square,
    Sawtooth,
    Sine,
    Triangle,
}

impl Waveform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Waveform::Square => "square",
            Waveform::Sawtooth => "sawtooth",
            Waveform::Sine => "sine",
            Waveform::Triangle => "triangle",
        }
    }
}

/// One oscillator note
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub frequency_hz: f32,
    pub waveform: Waveform,
    pub duration_ms: u32,
    /// Peak gain in 0.0..=1.0
    pub volume: f32,
    /// Start time relative to the event.
    pub offset_ms: u32,
}

impl Tone {
    const fn new(
        frequency_hz: f32,
        waveform: Waveform,
        duration_ms: u32,
        volume: f32,
        offset_ms: u32,
    ) -> Self {
        Self {
            frequency_hz,
            waveform,
            duration_ms,
            volume,
            offset_ms,
        }
    }
}

const MOVE: [Tone; 1] = [Tone::new(220.0, Waveform::Square, 50, 0.05, 0)];
const ROTATE: [Tone; 1] = [Tone::new(440.0, Waveform::Square, 50, 0.05, 0)];
const DROP: [Tone; 1] = [Tone::new(110.0, Waveform::Sawtooth, 100, 0.1, 0)];

// C5 E5 G5 C6 arpeggio
const LINE_CLEAR: [Tone; 4] = [
    Tone::new(523.25, Waveform::Square, 100, 0.1, 0),
    Tone::new(659.25, Waveform::Square, 100, 0.1, 100),
    Tone::new(783.99, Waveform::Square, 200, 0.1, 200),
    Tone::new(1046.50, Waveform::Square, 400, 0.1, 300),
];

const GAME_OVER: [Tone; 4] = [
    Tone::new(392.00, Waveform::Sawtooth, 300, 0.2, 0),
    Tone::new(369.99, Waveform::Sawtooth, 300, 0.2, 250),
    Tone::new(349.23, Waveform::Sawtooth, 300, 0.2, 500),
    Tone::new(329.63, Waveform::Sawtooth, 800, 0.2, 750),
];

const GAME_START: [Tone; 3] = [
    Tone::new(440.0, Waveform::Square, 100, 0.1, 0),
    Tone::new(554.0, Waveform::Square, 100, 0.1, 100),
    Tone::new(659.0, Waveform::Square, 300, 0.1, 200),
];

/// Tone sequence for an event, ordered by start offset.
pub fn tones_for(event: &GameEvent) -> &'static [Tone] {
    match event {
        GameEvent::Move => &MOVE,
        GameEvent::Rotate => &ROTATE,
        GameEvent::Drop => &DROP,
        GameEvent::LineClear(_) => &LINE_CLEAR,
        GameEvent::GameOver => &GAME_OVER,
        GameEvent::GameStart => &GAME_START,
    }
}

/// Output device for scheduled tones.
///
/// `play` is called at the tone's start time and must not block.
pub trait ToneSink: Send + Sync + 'static {
    fn play(&self, tone: &Tone);
}

/// Discards every tone.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ToneSink for NullSink {
    fn play(&self, _tone: &Tone) {}
}

/// Emits each tone as a `tracing` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl ToneSink for LogSink {
    fn play(&self, tone: &Tone) {
        debug!(
            hz = tone.frequency_hz,
            wave = tone.waveform.as_str(),
            duration_ms = tone.duration_ms,
            volume = tone.volume,
            "tone"
        );
    }
}

/// Sound-effect collaborator.
///
/// Stopped controllers and muted controllers drop events.
pub struct AudioController {
    sink: Arc<dyn ToneSink>,
    tx: Option<mpsc::UnboundedSender<GameEvent>>,
    task: Option<JoinHandle<()>>,
    muted: bool,
}

impl AudioController {
    pub fn new(sink: Arc<dyn ToneSink>) -> Self {
        Self {
            sink,
            tx: None,
            task: None,
            muted: false,
        }
    }

    /// Spawn the scheduling task on `handle`. Does nothing if already running.
    pub fn start(&mut self, handle: &Handle) {
        if self.is_running() {
            return;
        }
        let (tx, rx) = mpsc::unbounded_channel();
        self.task = Some(handle.spawn(schedule_loop(rx, Arc::clone(&self.sink))));
        self.tx = Some(tx);
        info!(muted = self.muted, "audio started");
    }

    /// Close the channel and cancel the scheduling task. Pending tones are dropped.
    pub fn stop(&mut self) {
        self.tx = None;
        if let Some(task) = self.task.take() {
            task.abort();
            info!("audio stopped");
        }
    }

    pub fn set_muted(&mut self, muted: bool) {
        if self.muted != muted {
            info!(muted, "audio mute toggled");
        }
        self.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn is_running(&self) -> bool {
        self.tx.as_ref().is_some_and(|tx| !tx.is_closed())
    }

    /// Queue the tones for `event`. Returns whether the event was accepted.
    pub fn event(&self, event: &GameEvent) -> bool {
        if self.muted {
            return false;
        }
        match &self.tx {
            Some(tx) => tx.send(*event).is_ok(),
            None => false,
        }
    }
}

impl Drop for AudioController {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn schedule_loop(mut rx: mpsc::UnboundedReceiver<GameEvent>, sink: Arc<dyn ToneSink>) {
    // Sequences overlap freely, but they all live in this set: when the loop ends or is
    // aborted the set is dropped and every sequence still playing is aborted with it.
    let mut sequences = JoinSet::new();
    loop {
        tokio::select! {
            event = rx.recv() => {
                let Some(event) = event else { break };
                sequences.spawn(play_sequence(tones_for(&event), Arc::clone(&sink)));
            }
            Some(_) = sequences.join_next(), if !sequences.is_empty() => {}
        }
    }
}

async fn play_sequence(tones: &'static [Tone], sink: Arc<dyn ToneSink>) {
    let start = tokio::time::Instant::now();
    for tone in tones {
        tokio::time::sleep_until(start + Duration::from_millis(tone.offset_ms as u64)).await;
        sink.play(tone);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_event_has_a_sorted_sequence() {
        let events = [
            GameEvent::Move,
            GameEvent::Rotate,
            GameEvent::Drop,
            GameEvent::LineClear(2),
            GameEvent::GameOver,
            GameEvent::GameStart,
        ];
        for event in events {
            let tones = tones_for(&event);
            assert!(!tones.is_empty(), "{}", event.name());
            assert!(tones.windows(2).all(|w| w[0].offset_ms <= w[1].offset_ms));
            assert!(tones.iter().all(|t| t.volume > 0.0 && t.volume <= 1.0));
        }
    }

    #[test]
    fn test_line_clear_is_the_c_major_arpeggio() {
        let tones = tones_for(&GameEvent::LineClear(4));
        let hz: Vec<f32> = tones.iter().map(|t| t.frequency_hz).collect();
        assert_eq!(hz, vec![523.25, 659.25, 783.99, 1046.50]);
        assert_eq!(tones[3].duration_ms, 400);
        assert_eq!(tones[3].offset_ms, 300);
    }

    #[test]
    fn test_stopped_controller_drops_events() {
        let audio = AudioController::new(Arc::new(NullSink));
        assert!(!audio.is_running());
        assert!(!audio.event(&GameEvent::Move));
    }
}
