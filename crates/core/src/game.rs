//! Game module - the simulation driver
//!
//! [`Game`] owns the board, the active piece, the next-piece preview, the random
//! source, the score counters and the gravity timer. It advances only through two
//! entry points:
//!
//! - [`Game::apply`] for discrete commands (moves, rotations, drops, pause, start)
//! - [`Game::advance`] for elapsed time, which drives gravity
//!
//! Everything observable by a host is either read through accessors or a
//! [`GameSnapshot`], or drained from the event queue with [`Game::take_events`].
//! The driver never blocks and never performs I/O, so the same seed and the same
//! command/time script always produce the same game.
//!
//! # Lifecycle
//!
//! ```text
//! Menu --start--> Playing <--pause/resume--> Paused
//!                    |
//!                block-out
//!                    v
//!                 GameOver --start--> Playing
//! ```

use tracing::{debug, info};

use crate::board::{Board, Position};
use crate::piece::ActivePiece;
use crate::rng::PieceSource;
use crate::scoring::{gravity_interval_ms, Progress};
use crate::snapshot::{ActiveSnapshot, GameSnapshot};
use crate::types::{
    Command, GameEvent, GamePhase, PieceKind, RotationDirection, SOFT_DROP_INTERVAL_MS,
    START_DROP_MS,
};

/// Complete state of one game session
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    active: Option<ActivePiece>,
    next: PieceKind,
    pieces: PieceSource,
    phase: GamePhase,
    progress: Progress,

    /// Gravity period in effect while soft drop is not held.
    gravity_ms: u32,
    /// Time accumulated towards the next gravity step.
    drop_timer_ms: u32,
    soft_dropping: bool,
    /// Pieces locked since the game started.
    locks: u32,

    events: Vec<GameEvent>,
}

impl Game {
    /// Create a game in the menu phase. The first preview piece is drawn immediately.
    pub fn new(seed: u32) -> Self {
        let mut pieces = PieceSource::new(seed);
        let next = pieces.draw();
        Self {
            board: Board::new(),
            active: None,
            next,
            pieces,
            phase: GamePhase::Menu,
            progress: Progress::new(),
            gravity_ms: START_DROP_MS,
            drop_timer_ms: 0,
            soft_dropping: false,
            locks: 0,
            events: Vec::with_capacity(16),
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.progress.score()
    }

    pub fn level(&self) -> u32 {
        self.progress.level()
    }

    pub fn rows(&self) -> u32 {
        self.progress.rows()
    }

    pub fn next(&self) -> PieceKind {
        self.next
    }

    pub fn active(&self) -> Option<&ActivePiece> {
        self.active.as_ref()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Mutable board access for scripted setups.
    ///
    /// The ghost projection is refreshed on the next move; call this before
    /// [`Game::start`] or between commands.
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// Override the preview piece, mainly for scripted scenarios.
    pub fn set_next(&mut self, kind: PieceKind) {
        self.next = kind;
    }

    pub fn seed(&self) -> u32 {
        self.pieces.seed()
    }

    /// Pieces locked since the game started
    pub fn locks(&self) -> u32 {
        self.locks
    }

    pub fn is_soft_dropping(&self) -> bool {
        self.soft_dropping
    }

    /// Landing row of the active piece's anchor, if there is one
    pub fn ghost_y(&self) -> Option<i8> {
        self.active.map(|piece| piece.ghost_y(&self.board))
    }

    /// Gravity period currently applied by [`Game::advance`]
    pub fn gravity_interval_ms(&self) -> u32 {
        if self.soft_dropping {
            SOFT_DROP_INTERVAL_MS
        } else {
            self.gravity_ms
        }
    }

    /// Drain the events emitted since the last call, oldest first.
    pub fn take_events(&mut self) -> std::vec::Drain<'_, GameEvent> {
        self.events.drain(..)
    }

    /// Begin a new game
    ///
    /// Valid from [`GamePhase::Menu`] and [`GamePhase::GameOver`] only; from other
    /// phases this does nothing and returns false.
    pub fn start(&mut self) -> bool {
        if !matches!(self.phase, GamePhase::Menu | GamePhase::GameOver) {
            return false;
        }

        self.board.clear();
        self.active = None;
        self.progress = Progress::new();
        self.gravity_ms = START_DROP_MS;
        self.drop_timer_ms = 0;
        self.soft_dropping = false;
        self.locks = 0;
        self.phase = GamePhase::Playing;

        info!(seed = self.pieces.seed(), "game started");
        self.events.push(GameEvent::GameStart);
        self.spawn_next();
        true
    }

    /// Apply one command. Returns whether it changed the game.
    ///
    /// Commands that do not fit the current phase are ignored.
    pub fn apply(&mut self, command: Command) -> bool {
        match (self.phase, command) {
            (GamePhase::Menu | GamePhase::GameOver, Command::Start) => self.start(),
            (GamePhase::Playing, Command::Pause | Command::TogglePause) => {
                self.phase = GamePhase::Paused;
                self.end_soft_drop();
                info!("paused");
                true
            }
            (GamePhase::Paused, Command::Resume | Command::TogglePause) => {
                self.phase = GamePhase::Playing;
                info!("resumed");
                true
            }
            (GamePhase::Playing, Command::MoveLeft) => self.shift(-1),
            (GamePhase::Playing, Command::MoveRight) => self.shift(1),
            (GamePhase::Playing, Command::RotateCw) => self.rotate(RotationDirection::Clockwise),
            (GamePhase::Playing, Command::RotateCcw) => {
                self.rotate(RotationDirection::CounterClockwise)
            }
            (GamePhase::Playing, Command::SoftDropStart) => self.soft_drop_start(),
            (GamePhase::Playing, Command::SoftDropStop) => self.soft_drop_stop(),
            (GamePhase::Playing, Command::HardDrop) => self.hard_drop(),
            _ => {
                debug!(
                    command = command.as_str(),
                    phase = self.phase.as_str(),
                    "command ignored"
                );
                false
            }
        }
    }

    /// Advance the gravity timer by `elapsed_ms`
    ///
    /// Runs one gravity step per elapsed period, so a long frame catches up instead of
    /// skipping rows. Does nothing outside [`GamePhase::Playing`].
    pub fn advance(&mut self, elapsed_ms: u32) {
        if self.phase != GamePhase::Playing {
            return;
        }

        self.drop_timer_ms = self.drop_timer_ms.saturating_add(elapsed_ms);
        loop {
            let interval = self.gravity_interval_ms();
            if self.drop_timer_ms < interval {
                break;
            }
            self.drop_timer_ms -= interval;
            self.gravity_step();

            if self.phase != GamePhase::Playing {
                self.drop_timer_ms = 0;
                break;
            }
        }
    }

    /// Copy the observable state into a fresh snapshot
    pub fn snapshot(&self) -> GameSnapshot {
        let mut out = GameSnapshot::default();
        self.snapshot_into(&mut out);
        out
    }

    /// Copy the observable state into `out` without allocating
    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.board.write_grid(&mut out.board);
        out.active = self.active.map(ActiveSnapshot::from);
        out.ghost_y = self.ghost_y();
        out.next = self.next;
        out.phase = self.phase;
        out.score = self.progress.score();
        out.level = self.progress.level();
        out.rows = self.progress.rows();
        out.gravity_ms = self.gravity_interval_ms();
    }

    fn shift(&mut self, dx: i8) -> bool {
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        if !active.translate(&self.board, dx, 0) {
            return false;
        }
        self.events.push(GameEvent::Move);
        self.refresh_ghost();
        true
    }

    fn rotate(&mut self, direction: RotationDirection) -> bool {
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        let rotated = active.rotate(&self.board, direction);
        // Every handled rotate command is announced, including ones the kick search rejected.
        self.events.push(GameEvent::Rotate);
        if rotated {
            self.refresh_ghost();
        }
        rotated
    }

    fn soft_drop_start(&mut self) -> bool {
        if !self.soft_dropping {
            self.soft_dropping = true;
            self.drop_timer_ms = 0;
        }
        self.gravity_step();
        true
    }

    fn soft_drop_stop(&mut self) -> bool {
        self.end_soft_drop()
    }

    /// Leave soft drop and fall back to the level-derived period.
    fn end_soft_drop(&mut self) -> bool {
        if !self.soft_dropping {
            return false;
        }
        self.soft_dropping = false;
        self.gravity_ms = gravity_interval_ms(self.progress.level());
        self.drop_timer_ms = 0;
        true
    }

    fn hard_drop(&mut self) -> bool {
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        let distance = active.hard_drop(&self.board);
        debug!(kind = active.kind.as_str(), distance, "hard drop");
        self.events.push(GameEvent::Drop);
        self.lock_active();
        true
    }

    /// Move the active piece down one row, locking or blocking out when it cannot.
    fn gravity_step(&mut self) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        if active.translate(&self.board, 0, 1) {
            self.refresh_ghost();
            return;
        }
        // Landed without ever leaving the top row: the stack has reached the ceiling.
        if active.position.y < 1 {
            debug!(kind = active.kind.as_str(), "landed at the top");
            self.block_out();
            return;
        }
        self.lock_active();
    }

    fn lock_active(&mut self) {
        let Some(piece) = self.active.take() else {
            return;
        };

        self.locks = self.locks.saturating_add(1);
        self.board.clear_transient_marks();
        self.board.commit(&piece.shape, piece.position, piece.kind);
        let cleared = self.board.sweep() as u32;
        debug!(
            kind = piece.kind.as_str(),
            x = piece.position.x,
            y = piece.position.y,
            cleared,
            "piece locked"
        );

        if cleared > 0 {
            self.award(cleared);
        }
        self.spawn_next();
    }

    fn award(&mut self, cleared: u32) {
        let outcome = self.progress.record_clear(cleared);
        info!(
            rows = cleared,
            points = outcome.points,
            score = self.progress.score(),
            "rows cleared"
        );
        if outcome.leveled_up() {
            self.gravity_ms = gravity_interval_ms(outcome.level_after);
            info!(
                level = outcome.level_after,
                gravity_ms = self.gravity_ms,
                "level up"
            );
        }
        self.events.push(GameEvent::LineClear(cleared));
    }

    fn spawn_next(&mut self) {
        let kind = self.next;
        self.next = self.pieces.draw();

        let piece = ActivePiece::spawn(kind);
        self.active = Some(piece);
        if piece.collides(&self.board, (0, 0)) {
            // The piece stays visible where it failed to fit.
            self.block_out();
            return;
        }

        debug!(kind = kind.as_str(), next = self.next.as_str(), "piece spawned");
        self.refresh_ghost();
    }

    fn block_out(&mut self) {
        self.phase = GamePhase::GameOver;
        self.soft_dropping = false;
        self.drop_timer_ms = 0;
        self.board.clear_transient_marks();
        info!(
            score = self.progress.score(),
            rows = self.progress.rows(),
            level = self.progress.level(),
            "game over"
        );
        self.events.push(GameEvent::GameOver);
    }

    fn refresh_ghost(&mut self) {
        self.board.clear_transient_marks();
        if let Some(active) = self.active {
            let landing = Position::new(active.position.x, active.ghost_y(&self.board));
            self.board.mark_ghost(&active.shape, landing, active.kind);
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new(1)
    }
}
