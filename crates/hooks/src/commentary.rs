//! Announcer commentary
//!
//! After a line clear the host may ask a [`Commentator`] for a very short exclamation.
//! Requests run on the tokio runtime, are bounded by a timeout, and always produce a
//! line: a provider failure is replaced by a fixed fallback. Results come back through
//! [`CommentaryService::try_recv`] so the game loop never waits for them.

use std::future::Future;
use std::pin::Pin;
use std::process::Stdio;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use tokio::io::AsyncWriteExt;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Line shown when no provider is configured.
pub const NO_PROVIDER_LINE: &str = "Sweet!";
/// Line shown when the provider answers with nothing.
pub const EMPTY_REPLY_LINE: &str = "Delicious!";
/// Line shown when the provider fails or times out.
pub const FAILURE_LINE: &str = "Tasty!";

pub type CommentFuture = Pin<Box<dyn Future<Output = anyhow::Result<String>> + Send>>;

/// Source of announcer lines.
pub trait Commentator: Send + Sync + 'static {
    /// Produce an exclamation for a clear of `lines` rows, `combo` clears in a row.
    fn encourage(&self, lines: u32, combo: u32) -> CommentFuture;
}

/// Build the announcer prompt for text-generation providers.
///
/// # Examples
///
/// ```
/// use blockfall_hooks::encouragement_prompt;
///
/// assert!(encouragement_prompt(2, 1).contains("cleared 2 lines at once!"));
/// assert!(encouragement_prompt(4, 3).contains("with a 3x combo"));
/// ```
pub fn encouragement_prompt(lines: u32, combo: u32) -> String {
    let combo = if combo > 1 {
        format!(" with a {combo}x combo")
    } else {
        String::new()
    };
    format!(
        "You are a game announcer for a candy-themed puzzle game.\n\
         The player just cleared {lines} lines at once{combo}!\n\
         Generate a single, very short (max 3 words), enthusiastic, candy-themed exclamation.\n\
         Examples: \"Sugar Crush!\", \"Tasty!\", \"Delicious!\", \"Sweet Victory!\", \"Divine!\", \"Berry Blast!\".\n\
         Do not use quotes."
    )
}

/// Free-form text generation backend.
pub trait TextGenerator: Send + Sync + 'static {
    fn generate(&self, prompt: String) -> CommentFuture;
}

/// Commentator that turns each clear into an [`encouragement_prompt`] for a generator.
pub struct Prompted<G>(pub G);

impl<G: TextGenerator> Commentator for Prompted<G> {
    fn encourage(&self, lines: u32, combo: u32) -> CommentFuture {
        self.0.generate(encouragement_prompt(lines, combo))
    }
}

/// Runs an external program per prompt: the prompt goes to its stdin and the first
/// line of its stdout is the reply.
///
/// The child is killed if the request is dropped, e.g. on timeout.
#[derive(Debug, Clone)]
pub struct ShellGenerator {
    program: String,
    args: Vec<String>,
}

impl ShellGenerator {
    /// Split `command_line` on whitespace; `None` when it is blank.
    pub fn new(command_line: &str) -> Option<Self> {
        let mut words = command_line.split_whitespace().map(str::to_string);
        let program = words.next()?;
        Some(Self {
            program,
            args: words.collect(),
        })
    }
}

impl TextGenerator for ShellGenerator {
    fn generate(&self, prompt: String) -> CommentFuture {
        let mut command = tokio::process::Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true);
        let program = self.program.clone();

        Box::pin(async move {
            let mut child = command
                .spawn()
                .with_context(|| format!("cannot run {program}"))?;
            if let Some(mut stdin) = child.stdin.take() {
                stdin.write_all(prompt.as_bytes()).await?;
            }
            let output = child.wait_with_output().await?;
            if !output.status.success() {
                bail!("{program} exited with {}", output.status);
            }
            let reply = String::from_utf8_lossy(&output.stdout);
            Ok(reply.lines().next().unwrap_or_default().to_string())
        })
    }
}

const PHRASES: [&str; 8] = [
    "Sugar Crush!",
    "Tasty!",
    "Delicious!",
    "Sweet Victory!",
    "Divine!",
    "Berry Blast!",
    "Candy Storm!",
    "Sweet Combo!",
];

/// Offline commentator cycling through canned phrases.
///
/// Bigger clears start further into the list, so a four-row clear and a single rarely
/// share a line.
#[derive(Debug, Default)]
pub struct PhraseBook {
    cursor: AtomicUsize,
}

impl PhraseBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pick(&self, lines: u32, combo: u32) -> &'static str {
        let turn = self.cursor.fetch_add(1, Ordering::Relaxed);
        let index = turn + (lines as usize) * 2 + combo.saturating_sub(1) as usize;
        PHRASES[index % PHRASES.len()]
    }
}

impl Commentator for PhraseBook {
    fn encourage(&self, lines: u32, combo: u32) -> CommentFuture {
        let line = self.pick(lines, combo);
        Box::pin(async move { Ok(line.to_string()) })
    }
}

/// A finished announcer line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commentary {
    pub lines: u32,
    pub text: String,
}

/// Ask `provider` for a line, applying the timeout and the fallbacks.
pub async fn resolve(
    provider: Option<Arc<dyn Commentator>>,
    lines: u32,
    combo: u32,
    timeout: Duration,
) -> String {
    let Some(provider) = provider else {
        return NO_PROVIDER_LINE.to_string();
    };

    match tokio::time::timeout(timeout, provider.encourage(lines, combo)).await {
        Ok(Ok(text)) => {
            let text = text.trim();
            if text.is_empty() {
                EMPTY_REPLY_LINE.to_string()
            } else {
                text.to_string()
            }
        }
        Ok(Err(err)) => {
            warn!(error = %err, "commentary provider failed");
            FAILURE_LINE.to_string()
        }
        Err(_) => {
            warn!(timeout_ms = timeout.as_millis() as u64, "commentary provider timed out");
            FAILURE_LINE.to_string()
        }
    }
}

/// Runs commentary requests in the background and hands back finished lines.
pub struct CommentaryService {
    handle: Handle,
    provider: Option<Arc<dyn Commentator>>,
    timeout: Duration,
    tx: mpsc::UnboundedSender<Commentary>,
    rx: mpsc::UnboundedReceiver<Commentary>,
}

impl CommentaryService {
    pub fn new(handle: Handle, provider: Option<Arc<dyn Commentator>>, timeout: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            handle,
            provider,
            timeout,
            tx,
            rx,
        }
    }

    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    /// Start a request for a clear of `lines` rows. Returns immediately.
    pub fn request(&self, lines: u32, combo: u32) {
        let provider = self.provider.clone();
        let timeout = self.timeout;
        let tx = self.tx.clone();
        debug!(lines, combo, "commentary requested");
        self.handle.spawn(async move {
            let text = resolve(provider, lines, combo, timeout).await;
            // The receiver is gone once the host shuts down.
            let _ = tx.send(Commentary { lines, text });
        });
    }

    /// Next finished line, if any.
    pub fn try_recv(&mut self) -> Option<Commentary> {
        self.rx.try_recv().ok()
    }

    /// Wait for the next finished line.
    pub async fn recv(&mut self) -> Option<Commentary> {
        self.rx.recv().await
    }
}
