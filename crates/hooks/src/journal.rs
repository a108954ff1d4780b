//! Event journal
//!
//! Appends one JSON object per game event to a file, one per line. Writing happens on a
//! tokio task so the game loop only pays for a channel send.

use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Serialize;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::types::GameEvent;

/// Score counters at the time of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Tally {
    pub score: u32,
    pub level: u32,
    pub rows: u32,
}

/// One journal line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JournalRecord {
    pub seq: u64,
    pub elapsed_ms: u64,
    pub event: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lines: Option<u32>,
    #[serde(flatten)]
    pub tally: Tally,
}

impl JournalRecord {
    pub fn new(seq: u64, elapsed_ms: u64, event: &GameEvent, tally: Tally) -> Self {
        let lines = match event {
            GameEvent::LineClear(n) => Some(*n),
            _ => None,
        };
        Self {
            seq,
            elapsed_ms,
            event: event.name(),
            lines,
            tally,
        }
    }
}

pub struct EventJournal {
    path: PathBuf,
    opened: Instant,
    seq: u64,
    tx: Option<mpsc::UnboundedSender<JournalRecord>>,
    task: Option<JoinHandle<()>>,
}

impl EventJournal {
    /// Start a writer task appending to `path`. The file is created if missing.
    pub fn open(handle: &Handle, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let (tx, rx) = mpsc::unbounded_channel();
        let task = handle.spawn(write_loop(path.clone(), rx));
        info!(path = %path.display(), "event journal opened");
        Self {
            path,
            opened: Instant::now(),
            seq: 0,
            tx: Some(tx),
            task: Some(task),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Queue a record for `event`. Returns false once the writer has stopped.
    pub fn record(&mut self, event: &GameEvent, tally: Tally) -> bool {
        let Some(tx) = &self.tx else {
            return false;
        };
        self.seq += 1;
        let elapsed_ms = self.opened.elapsed().as_millis() as u64;
        tx.send(JournalRecord::new(self.seq, elapsed_ms, event, tally))
            .is_ok()
    }

    /// Stop accepting records and wait until everything queued is on disk.
    pub async fn close(mut self) {
        self.tx = None;
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                warn!(error = %err, "event journal writer panicked");
            }
        }
    }
}

async fn write_loop(path: PathBuf, mut rx: mpsc::UnboundedReceiver<JournalRecord>) {
    let mut file = match OpenOptions::new().create(true).append(true).open(&path).await {
        Ok(file) => file,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "cannot open event journal");
            return;
        }
    };

    let mut buf: Vec<u8> = Vec::with_capacity(256);
    while let Some(record) = rx.recv().await {
        buf.clear();
        if let Err(err) = serde_json::to_writer(&mut buf, &record) {
            warn!(error = %err, "cannot encode journal record");
            continue;
        }
        buf.push(b'\n');
        if let Err(err) = file.write_all(&buf).await {
            warn!(path = %path.display(), error = %err, "event journal write failed");
            return;
        }
    }

    if let Err(err) = file.flush().await {
        warn!(path = %path.display(), error = %err, "event journal flush failed");
    }
}
