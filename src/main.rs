//! Terminal runner (default binary).
//!
//! Owns the terminal, the tokio runtime used by the hooks, and the fixed-step game loop:
//! poll input until the next tick, feed commands and elapsed time to the core, forward
//! drained events to the hooks, render.

use std::fs::File;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use tokio::runtime::Runtime;
use tracing::{debug, info};
use tracing_subscriber::prelude::*;

use blockfall::config::Config;
use blockfall::core::{Game, GameSnapshot};
use blockfall::hooks::{
    AudioController, Commentator, CommentaryService, EventJournal, LogSink, PhraseBook, Prompted,
    ShellGenerator, Tally,
};
use blockfall::input::{handle_key_event, should_quit, InputHandler};
use blockfall::term::{FrameBuffer, GameView, HudStatus, TerminalRenderer, Viewport};
use blockfall::types::{Command, GameEvent, GamePhase, TICK_MS};

/// How long an announcer line stays on screen.
const COMMENTARY_VISIBLE: Duration = Duration::from_secs(2);

fn main() -> Result<()> {
    let config = Config::parse();
    init_logging(&config)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("blockfall-hooks")
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?;

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &config, &runtime);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn init_logging(config: &Config) -> Result<()> {
    let Some(path) = &config.log_file else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("cannot create log file {}", path.display()))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(Mutex::new(file)),
        )
        .with(config.log_level())
        .try_init()
        .context("failed to install log subscriber")?;
    Ok(())
}

/// Host-side bookkeeping for the hooks.
struct Session {
    audio: AudioController,
    commentary: Option<CommentaryService>,
    journal: Option<EventJournal>,
    /// Latest announcer line and when it arrived.
    banner: Option<(String, Instant)>,
    /// Consecutive locks that cleared rows.
    combo: u32,
    last_clear_lock: Option<u32>,
}

impl Session {
    fn new(config: &Config, runtime: &Runtime) -> Self {
        let mut audio = AudioController::new(Arc::new(LogSink));
        audio.set_muted(config.muted);
        audio.start(runtime.handle());

        let commentary = (!config.no_commentary).then(|| {
            let provider: Arc<dyn Commentator> = match config
                .commentary_command
                .as_deref()
                .and_then(ShellGenerator::new)
            {
                Some(generator) => {
                    info!(?generator, "announcer lines from external command");
                    Arc::new(Prompted(generator))
                }
                None => Arc::new(PhraseBook::new()),
            };
            CommentaryService::new(
                runtime.handle().clone(),
                Some(provider),
                config.commentary_timeout(),
            )
        });

        let journal = config
            .event_log
            .as_ref()
            .map(|path| EventJournal::open(runtime.handle(), path));

        Self {
            audio,
            commentary,
            journal,
            banner: None,
            combo: 0,
            last_clear_lock: None,
        }
    }

    fn forward_events(&mut self, game: &mut Game) {
        let locks = game.locks();
        let tally = Tally {
            score: game.score(),
            level: game.level(),
            rows: game.rows(),
        };

        for event in game.take_events() {
            self.audio.event(&event);
            if let Some(journal) = self.journal.as_mut() {
                journal.record(&event, tally);
            }

            match event {
                GameEvent::GameStart => {
                    self.combo = 0;
                    self.last_clear_lock = None;
                    self.banner = None;
                }
                GameEvent::LineClear(lines) => {
                    self.combo = match self.last_clear_lock {
                        Some(prev) if prev + 1 == locks => self.combo + 1,
                        _ => 1,
                    };
                    self.last_clear_lock = Some(locks);
                    if let Some(commentary) = &self.commentary {
                        commentary.request(lines, self.combo);
                    }
                }
                _ => {}
            }
        }
    }

    fn poll_commentary(&mut self) {
        if let Some(commentary) = self.commentary.as_mut() {
            while let Some(line) = commentary.try_recv() {
                debug!(lines = line.lines, text = %line.text, "commentary");
                self.banner = Some((line.text, Instant::now()));
            }
        }
        if self
            .banner
            .as_ref()
            .is_some_and(|(_, at)| at.elapsed() > COMMENTARY_VISIBLE)
        {
            self.banner = None;
        }
    }

    fn hud(&self) -> HudStatus<'_> {
        HudStatus {
            commentary: self.banner.as_ref().map(|(text, _)| text.as_str()),
            muted: self.audio.is_muted(),
        }
    }
}

fn run(term: &mut TerminalRenderer, config: &Config, runtime: &Runtime) -> Result<()> {
    let seed = config.resolve_seed();
    info!(seed, "blockfall starting");

    let mut game = Game::new(seed);
    let mut session = Session::new(config, runtime);

    let view = GameView::default();
    let mut input_handler = InputHandler::with_config(config.das_ms, config.arr_ms);
    let mut snap = GameSnapshot::default();
    let mut fb = FrameBuffer::new(0, 0);

    let mut last_tick = Instant::now();
    let tick_duration = Duration::from_millis(TICK_MS as u64);

    'frame: loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        game.snapshot_into(&mut snap);
        view.render_into(&snap, session.hud(), Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;

        // Input with timeout until next tick.
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind == KeyEventKind::Press && should_quit(key) {
                        break 'frame;
                    }
                    handle_key(&mut game, &mut input_handler, &mut session, key);
                }
                Event::Resize(..) => term.invalidate(),
                _ => {}
            }
        }

        // Tick.
        if last_tick.elapsed() >= tick_duration {
            last_tick = Instant::now();

            for command in input_handler.update(TICK_MS) {
                game.apply(command);
            }
            game.advance(TICK_MS);
        }

        session.forward_events(&mut game);
        session.poll_commentary();
    }

    info!(
        score = game.score(),
        rows = game.rows(),
        level = game.level(),
        "blockfall exiting"
    );
    session.audio.stop();
    if let Some(journal) = session.journal.take() {
        runtime.block_on(journal.close());
    }
    Ok(())
}

fn handle_key(game: &mut Game, input: &mut InputHandler, session: &mut Session, key: KeyEvent) {
    match key.kind {
        KeyEventKind::Press => {
            if matches!(key.code, KeyCode::Char('m' | 'M')) {
                let muted = !session.audio.is_muted();
                session.audio.set_muted(muted);
                return;
            }

            // Held keys (movement, soft drop) go through the hold tracker.
            if let Some(command) = input.handle_key_press(key.code) {
                game.apply(command);
                return;
            }

            if let Some(command) = handle_key_event(key) {
                match command {
                    Command::MoveLeft
                    | Command::MoveRight
                    | Command::SoftDropStart
                    | Command::SoftDropStop => {
                        // Already handled by the hold tracker.
                    }
                    _ => {
                        let before = game.phase();
                        game.apply(command);
                        if game.phase() != before && game.phase() != GamePhase::Playing {
                            input.reset();
                        }
                    }
                }
            }
        }
        KeyEventKind::Repeat => {
            // Keeps the hold alive; DAS/ARR produces the repeats itself.
            input.handle_key_press(key.code);
        }
        KeyEventKind::Release => {
            if let Some(command) = input.handle_key_release(key.code) {
                game.apply(command);
            }
        }
    }
}
