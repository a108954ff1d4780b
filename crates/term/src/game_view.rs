//! GameView: maps a [`GameSnapshot`] into a terminal framebuffer.
//!
//! Pure (no I/O), so layouts can be unit-tested.

use crate::core::{get_shape, GameSnapshot};
use crate::fb::{Cell, CellStyle, FrameBuffer, Rgb};
use crate::types::{Cell as BoardCell, GamePhase, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

const PANEL_BG: Rgb = Rgb::new(0, 0, 0);
const WELL_BG: Rgb = Rgb::new(30, 24, 40);

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Host-side status shown next to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HudStatus<'a> {
    /// Latest announcer line, if one is on screen.
    pub commentary: Option<&'a str>,
    pub muted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

/// Lays out the well, the side panel and the phase overlays.
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
    anchor_y: AnchorY,
}

impl Default for GameView {
    fn default() -> Self {
        Self::new(2, 1)
    }
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
            anchor_y: AnchorY::Center,
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    /// Render into an existing framebuffer.
    ///
    /// Callers reuse one framebuffer across frames; it is only resized when the viewport
    /// changes.
    pub fn render_into(
        &self,
        snap: &GameSnapshot,
        hud: HudStatus<'_>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(Cell::new(' ', CellStyle::new(Rgb::new(220, 220, 220), PANEL_BG)));

        let board_px_w = (BOARD_WIDTH as u16) * self.cell_w;
        let board_px_h = (BOARD_HEIGHT as u16) * self.cell_h;
        let frame_w = board_px_w + 2;
        let frame_h = board_px_h + 2;

        let start_x = viewport.width.saturating_sub(frame_w) / 2;
        let start_y = match self.anchor_y {
            AnchorY::Center => viewport.height.saturating_sub(frame_h) / 2,
            AnchorY::Top => 0,
        };

        self.draw_border(
            fb,
            start_x,
            start_y,
            frame_w,
            frame_h,
            CellStyle::new(Rgb::new(236, 120, 180), PANEL_BG),
        );

        for (y, row) in snap.board.iter().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                let (ch, style) = board_glyph(*cell);
                self.fill_cell_rect(fb, start_x, start_y, x as u16, y as u16, ch, style);
            }
        }

        if let Some(active) = snap.active {
            for pos in active.cells_at(active.y) {
                let on_board = (0..BOARD_WIDTH as i8).contains(&pos.x)
                    && (0..BOARD_HEIGHT as i8).contains(&pos.y);
                if on_board {
                    self.fill_cell_rect(
                        fb,
                        start_x,
                        start_y,
                        pos.x as u16,
                        pos.y as u16,
                        '█',
                        CellStyle::new(piece_color(active.kind), WELL_BG).bold(),
                    );
                }
            }
        }

        self.draw_side_panel(fb, snap, hud, viewport, start_x, start_y, frame_w);

        match snap.phase {
            GamePhase::Menu => {
                self.draw_overlay_text(fb, start_x, start_y, frame_w, frame_h, 0, "BLOCKFALL");
                self.draw_overlay_text(fb, start_x, start_y, frame_w, frame_h, 2, "PRESS ENTER");
            }
            GamePhase::Paused => {
                self.draw_overlay_text(fb, start_x, start_y, frame_w, frame_h, 0, "PAUSED");
            }
            GamePhase::GameOver => {
                self.draw_overlay_text(fb, start_x, start_y, frame_w, frame_h, 0, "GAME OVER");
                self.draw_overlay_text(fb, start_x, start_y, frame_w, frame_h, 2, "ENTER TO RETRY");
            }
            GamePhase::Playing => {}
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, hud: HudStatus<'_>, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, hud, viewport, &mut fb);
        fb
    }

    fn draw_border(&self, fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, style: CellStyle) {
        if w < 2 || h < 2 {
            return;
        }

        fb.put_char(x, y, '╭', style);
        fb.put_char(x + w - 1, y, '╮', style);
        fb.put_char(x, y + h - 1, '╰', style);
        fb.put_char(x + w - 1, y + h - 1, '╯', style);

        for dx in 1..w - 1 {
            fb.put_char(x + dx, y, '─', style);
            fb.put_char(x + dx, y + h - 1, '─', style);
        }
        for dy in 1..h - 1 {
            fb.put_char(x, y + dy, '│', style);
            fb.put_char(x + w - 1, y + dy, '│', style);
        }
    }

    fn fill_cell_rect(
        &self,
        fb: &mut FrameBuffer,
        start_x: u16,
        start_y: u16,
        cell_x: u16,
        cell_y: u16,
        ch: char,
        style: CellStyle,
    ) {
        let px = start_x + 1 + cell_x * self.cell_w;
        let py = start_y + 1 + cell_y * self.cell_h;
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        hud: HudStatus<'_>,
        viewport: Viewport,
        start_x: u16,
        start_y: u16,
        frame_w: u16,
    ) {
        let panel_x = start_x.saturating_add(frame_w).saturating_add(2);
        if panel_x >= viewport.width {
            return;
        }
        let panel_w = viewport.width - panel_x;
        if panel_w < 10 {
            return;
        }

        let label = CellStyle::new(Rgb::new(236, 120, 180), PANEL_BG).bold();
        let value = CellStyle::new(Rgb::new(220, 220, 220), PANEL_BG);

        let mut y = start_y;
        for (name, number) in [("SCORE", snap.score), ("LEVEL", snap.level), ("ROWS", snap.rows)] {
            fb.put_str(panel_x, y, name, label);
            fb.put_u32(panel_x, y.saturating_add(1), number, value);
            y = y.saturating_add(3);
        }

        fb.put_str(panel_x, y, "NEXT", label);
        y = y.saturating_add(1);
        let next = get_shape(snap.next);
        for (dx, dy) in next.cells() {
            fb.fill_rect(
                panel_x + (dx as u16) * self.cell_w,
                y + (dy as u16) * self.cell_h,
                self.cell_w,
                self.cell_h,
                '█',
                CellStyle::new(piece_color(snap.next), PANEL_BG),
            );
        }
        y = y.saturating_add(next.size() as u16 * self.cell_h + 1);

        if hud.muted {
            fb.put_str(panel_x, y, "MUTED", value.dim());
        }
        y = y.saturating_add(2);

        if let Some(text) = hud.commentary {
            let style = CellStyle::new(Rgb::new(255, 240, 120), PANEL_BG).bold();
            fb.put_str(panel_x, y, text, style);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_overlay_text(
        &self,
        fb: &mut FrameBuffer,
        start_x: u16,
        start_y: u16,
        frame_w: u16,
        frame_h: u16,
        line: u16,
        text: &str,
    ) {
        let y = start_y.saturating_add(frame_h / 2).saturating_add(line);
        let text_w = text.chars().count() as u16;
        let x = start_x.saturating_add(frame_w.saturating_sub(text_w) / 2);
        let style = CellStyle::new(Rgb::new(255, 255, 255), PANEL_BG).bold();
        fb.put_str(x, y, text, style);
    }
}

fn board_glyph(cell: BoardCell) -> (char, CellStyle) {
    match cell {
        BoardCell::Settled(kind) => ('█', CellStyle::new(piece_color(kind), WELL_BG)),
        BoardCell::Ghost(kind) => ('░', CellStyle::new(piece_color(kind), WELL_BG).dim()),
        BoardCell::Clearing => ('▓', CellStyle::new(Rgb::new(255, 255, 255), WELL_BG).bold()),
        BoardCell::Empty => ('·', CellStyle::new(Rgb::new(90, 80, 100), WELL_BG).dim()),
    }
}

/// Candy palette, one color per piece kind.
fn piece_color(kind: PieceKind) -> Rgb {
    match kind {
        PieceKind::I => Rgb::new(34, 211, 238),
        PieceKind::J => Rgb::new(59, 130, 246),
        PieceKind::L => Rgb::new(251, 146, 60),
        PieceKind::O => Rgb::new(250, 204, 21),
        PieceKind::S => Rgb::new(74, 222, 128),
        PieceKind::T => Rgb::new(168, 85, 247),
        PieceKind::Z => Rgb::new(248, 113, 113),
    }
}
