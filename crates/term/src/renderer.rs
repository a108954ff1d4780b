//! Flushes framebuffers to the terminal.
//!
//! A frame is painted in full the first time, after a resize and after
//! [`TerminalRenderer::invalidate`]. Otherwise only the dirty spans of each row are
//! repainted. The pen (colors plus attributes) and the cursor are tracked across spans,
//! so a style or position is only sent when it actually changes.

use std::io::{self, Write};
use std::ops::Range;

use anyhow::Result;
use crossterm::{
    cursor,
    style::{Attribute, Color, Colors, Print, ResetColor, SetAttribute, SetColors},
    terminal, QueueableCommand,
};

use crate::fb::{CellStyle, FrameBuffer, Rgb};

/// Unchanged cells between two dirty spans that get repainted instead of skipped.
const GAP_BRIDGE: u16 = 3;

pub struct TerminalRenderer<W: Write = io::Stdout> {
    out: W,
    /// Frame currently on screen; `None` forces a full paint.
    shown: Option<FrameBuffer>,
    pending: Vec<u8>,
    spans: Vec<Range<u16>>,
    pen: Option<CellStyle>,
    cursor: Option<(u16, u16)>,
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl<W: Write> TerminalRenderer<W> {
    pub fn with_writer(out: W) -> Self {
        Self {
            out,
            shown: None,
            pending: Vec::with_capacity(16 * 1024),
            spans: Vec::new(),
            pen: None,
            cursor: None,
        }
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    /// Raw mode, alternate screen, hidden cursor.
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.pending.clear();
        self.pending
            .queue(terminal::EnterAlternateScreen)?
            .queue(cursor::Hide)?
            .queue(terminal::DisableLineWrap)?;
        self.invalidate();
        self.flush()
    }

    pub fn exit(&mut self) -> Result<()> {
        self.pending.clear();
        self.pending
            .queue(ResetColor)?
            .queue(SetAttribute(Attribute::Reset))?
            .queue(terminal::EnableLineWrap)?
            .queue(cursor::Show)?
            .queue(terminal::LeaveAlternateScreen)?;
        self.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Force the next frame to be painted in full, e.g. after a resize.
    pub fn invalidate(&mut self) {
        self.shown = None;
        self.pen = None;
        self.cursor = None;
    }

    /// Paint `fb`, then swap it with the frame that was on screen.
    ///
    /// The caller gets the previous allocation back and renders the next frame into
    /// it. Returns how many cells were painted; zero means nothing was written.
    pub fn draw_swap(&mut self, fb: &mut FrameBuffer) -> Result<usize> {
        self.pending.clear();
        let (mut shown, painted) = match self.shown.take() {
            Some(shown) if shown.width() == fb.width() && shown.height() == fb.height() => {
                let painted = self.paint_changes(&shown, fb)?;
                (shown, painted)
            }
            stale => {
                let painted = self.paint_all(fb)?;
                let mut shown = stale.unwrap_or_else(|| FrameBuffer::new(0, 0));
                shown.resize(fb.width(), fb.height());
                (shown, painted)
            }
        };
        if painted > 0 {
            self.pending
                .queue(ResetColor)?
                .queue(SetAttribute(Attribute::Reset))?;
            self.pen = None;
            self.flush()?;
        }

        std::mem::swap(&mut shown, fb);
        self.shown = Some(shown);
        Ok(painted)
    }

    fn paint_all(&mut self, fb: &FrameBuffer) -> Result<usize> {
        self.pending
            .queue(terminal::Clear(terminal::ClearType::All))?;
        self.cursor = None;
        for y in 0..fb.height() {
            self.paint_span(fb, y, 0..fb.width())?;
        }
        Ok(fb.cells().len())
    }

    fn paint_changes(&mut self, shown: &FrameBuffer, next: &FrameBuffer) -> Result<usize> {
        let mut spans = std::mem::take(&mut self.spans);
        let mut painted = 0;
        for y in 0..next.height() {
            dirty_spans(shown, next, y, &mut spans);
            for span in spans.drain(..) {
                painted += usize::from(span.end - span.start);
                self.paint_span(next, y, span)?;
            }
        }
        self.spans = spans;
        Ok(painted)
    }

    fn paint_span(&mut self, fb: &FrameBuffer, y: u16, span: Range<u16>) -> Result<()> {
        if self.cursor != Some((span.start, y)) {
            self.pending.queue(cursor::MoveTo(span.start, y))?;
        }
        let end = span.end;
        for x in span {
            let cell = fb.get(x, y).unwrap_or_default();
            self.set_pen(cell.style)?;
            self.pending.queue(Print(cell.ch))?;
        }
        self.cursor = Some((end, y));
        Ok(())
    }

    fn set_pen(&mut self, style: CellStyle) -> Result<()> {
        let attributes_changed = match self.pen {
            Some(pen) if pen == style => return Ok(()),
            Some(pen) => pen.bold != style.bold || pen.dim != style.dim,
            None => true,
        };
        if attributes_changed {
            // SGR 0 clears the colors too, so they are always sent after it.
            self.pending.queue(SetAttribute(Attribute::Reset))?;
            if style.bold {
                self.pending.queue(SetAttribute(Attribute::Bold))?;
            }
            if style.dim {
                self.pending.queue(SetAttribute(Attribute::Dim))?;
            }
        }
        self.pending
            .queue(SetColors(Colors::new(truecolor(style.fg), truecolor(style.bg))))?;
        self.pen = Some(style);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.out.write_all(&self.pending)?;
        self.out.flush()?;
        Ok(())
    }
}

/// Collect the dirty spans of row `y`; both frames must have the same size.
fn dirty_spans(shown: &FrameBuffer, next: &FrameBuffer, y: u16, spans: &mut Vec<Range<u16>>) {
    spans.clear();
    let width = usize::from(next.width());
    let row = usize::from(y) * width..(usize::from(y) + 1) * width;
    let (old, new) = (&shown.cells()[row.clone()], &next.cells()[row]);

    let mut x = 0;
    while x < width {
        if old[x] == new[x] {
            x += 1;
            continue;
        }
        let start = x as u16;
        while x < width && old[x] != new[x] {
            x += 1;
        }
        let end = x as u16;
        match spans.last_mut() {
            Some(last) if start - last.end <= GAP_BRIDGE => last.end = end,
            _ => spans.push(start..end),
        }
    }
}

fn truecolor(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fb::Cell;

    fn marked(width: u16, xs: &[u16]) -> FrameBuffer {
        let mut fb = FrameBuffer::new(width, 1);
        for &x in xs {
            fb.put_char(x, 0, '#', CellStyle::default());
        }
        fb
    }

    #[test]
    fn adjacent_changes_form_one_span() {
        let mut spans = Vec::new();
        dirty_spans(&marked(8, &[]), &marked(8, &[1, 2, 3]), 0, &mut spans);
        assert_eq!(spans, vec![1..4]);
    }

    #[test]
    fn short_gaps_are_bridged_and_long_ones_split() {
        let mut spans = Vec::new();
        let blank = marked(16, &[]);
        dirty_spans(&blank, &marked(16, &[0, 4, 12]), 0, &mut spans);
        assert_eq!(spans, vec![0..5, 12..13]);
    }

    #[test]
    fn first_frame_paints_every_cell_then_only_changes() {
        let mut term = TerminalRenderer::with_writer(Vec::new());
        let mut fb = marked(6, &[0, 5]);
        assert_eq!(term.draw_swap(&mut fb).unwrap(), 6);
        let text = String::from_utf8_lossy(term.writer()).into_owned();
        assert_eq!(text.matches('#').count(), 2);

        let written = term.writer().len();
        let mut same = marked(6, &[0, 5]);
        assert_eq!(term.draw_swap(&mut same).unwrap(), 0);
        assert_eq!(term.writer().len(), written);

        let mut moved = marked(6, &[0, 4]);
        assert_eq!(term.draw_swap(&mut moved).unwrap(), 2);
    }

    #[test]
    fn pen_is_sent_once_per_style_run() {
        let mut term = TerminalRenderer::with_writer(Vec::new());
        let bold = CellStyle::default().bold();
        let mut fb = FrameBuffer::new(4, 1);
        fb.set(1, 0, Cell::new('a', bold));
        fb.set(2, 0, Cell::new('b', bold));
        term.draw_swap(&mut fb).unwrap();

        let text = String::from_utf8_lossy(term.writer()).into_owned();
        // Plain, bold, plain: three pens over four cells.
        assert_eq!(text.matches("\x1b[38;2;").count(), 3);
    }

    #[test]
    fn invalidate_forces_a_full_paint() {
        let mut term = TerminalRenderer::with_writer(Vec::new());
        let mut fb = marked(5, &[2]);
        term.draw_swap(&mut fb).unwrap();
        let mut fb = marked(5, &[2]);
        term.invalidate();
        assert_eq!(term.draw_swap(&mut fb).unwrap(), 5);
    }
}
