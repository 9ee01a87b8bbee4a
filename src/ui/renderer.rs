/// Presentation layer: double-buffered, diff-based terminal renderer.
///
///   1. Compose the next frame into `front` (a grid of Cells)
///   2. Compare each cell with `back` (the frame currently on screen)
///   3. Queue terminal commands only for cells that changed
///   4. Flush once, then swap front/back
///
/// Rendering is read-only with respect to the game: it takes the state
/// by shared reference and never feeds anything back.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    event::{DisableMouseCapture, EnableMouseCapture},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::grid::Coord;
use crate::domain::heading::{DeathCause, Heading};
use crate::sim::world::{GameState, Phase};

// ── Cell: the unit of the frame buffer ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Every cell gets an explicit background so row gaps match on VTE terminals.
    const BASE_BG: Color = Color::Rgb { r: 18, g: 20, b: 28 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Never equal to a real cell; filling `back` with it forces a full repaint.
    const INVALID: Cell = Cell { ch: '\u{0}', fg: Color::Magenta, bg: Color::Magenta };

    fn new(ch: char, fg: Color, bg: Color) -> Self {
        let bg = if bg == Color::Reset { Cell::BASE_BG } else { bg };
        Cell { ch, fg, bg }
    }
}

// ── FrameBuffer ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    /// One column per char; clipped at the right edge.
    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width {
                break;
            }
            self.set(x + i, y, Cell::new(ch, fg, bg));
        }
    }

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, bg: Color) {
        for yy in y..y + h {
            for xx in x..x + w {
                self.set(xx, yy, Cell::new(' ', Color::White, bg));
            }
        }
    }

    #[cfg(test)]
    fn row_text(&self, y: usize) -> String {
        (0..self.width).map(|x| self.get(x, y).ch).collect()
    }
}

// ── Layout ──

/// Each board cell is two terminal columns so it looks square.
const CELL_W: usize = 2;
const HUD_ROW: usize = 0;
/// Top row of the board border.
const BOARD_ROW: usize = 2;
const BOARD_COL: usize = 1;

// ── Palette ──

const HUD_BG: Color = Color::Rgb { r: 30, g: 34, b: 60 };
const BOARD_BG: Color = Color::Rgb { r: 24, g: 28, b: 38 };
const BORDER: Color = Color::Rgb { r: 90, g: 100, b: 130 };
const SNAKE_HEAD: Color = Color::Rgb { r: 170, g: 255, b: 120 };
const SNAKE_BODY: Color = Color::Rgb { r: 60, g: 190, b: 80 };
const FOOD: Color = Color::Rgb { r: 255, g: 80, b: 80 };
const ACCENT: Color = Color::Rgb { r: 255, g: 210, b: 60 };
const PANEL_BG: Color = Color::Rgb { r: 40, g: 40, b: 52 };

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_phase: Option<Phase>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_phase: None,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.resize(tw as usize, th as usize);
        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            DisableMouseCapture,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    fn resize(&mut self, w: usize, h: usize) {
        self.term_w = w;
        self.term_h = h;
        self.front.resize(w, h);
        self.back.resize(w, h);
        self.back.cells.fill(Cell::INVALID);
    }

    /// Draw one frame. `commentary` is shown on the game-over panel.
    pub fn render(&mut self, world: &GameState, commentary: Option<&str>) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.resize(tw as usize, th as usize);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        if self.last_phase != Some(world.phase) {
            self.back.cells.fill(Cell::INVALID);
            self.last_phase = Some(world.phase);
        }

        self.front.clear();
        compose(&mut self.front, world, commentary);

        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        // Position right after the last printed cell, if we know it.
        let mut cursor_at: Option<(usize, usize)> = None;

        queue!(self.writer, SetForegroundColor(last_fg), SetBackgroundColor(last_bg))?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    continue;
                }
                if cursor_at != Some((x, y)) {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }
                queue!(self.writer, Print(cell.ch))?;
                cursor_at = Some((x + 1, y));
            }
        }

        self.writer.flush()
    }
}

// ══════════════════════════════════════════════════════════════
// Composition
// ══════════════════════════════════════════════════════════════

/// Terminal size needed to show the whole board plus HUD and help line.
fn required_size(board: usize) -> (usize, usize) {
    (BOARD_COL + board * CELL_W + 2, BOARD_ROW + board + 4)
}

fn compose(buf: &mut FrameBuffer, w: &GameState, commentary: Option<&str>) {
    let size = w.grid.size.max(0) as usize;
    let (need_w, need_h) = required_size(size);
    if buf.width < need_w || buf.height < need_h {
        let msg = format!("Terminal too small: need {}x{}, have {}x{}", need_w, need_h, buf.width, buf.height);
        buf.put_str(0, 0, &msg, ACCENT, Color::Reset);
        return;
    }

    compose_hud(buf, w);
    compose_board(buf, w);

    let help_row = BOARD_ROW + size + 3;
    let help = match w.phase {
        Phase::Playing => "←↑↓→/WASD steer   P pause   Q quit",
        Phase::Paused => "P resume   Q quit",
        Phase::Idle | Phase::GameOver => "ENTER start   Q quit",
    };
    buf.put_str(BOARD_COL, help_row, help, Color::DarkGrey, Color::Reset);

    match w.phase {
        Phase::Idle => compose_title(buf, w),
        Phase::Paused => compose_pause(buf, w),
        Phase::GameOver => compose_game_over(buf, w, commentary),
        Phase::Playing => {}
    }
}

fn compose_hud(buf: &mut FrameBuffer, w: &GameState) {
    for x in 0..buf.width {
        buf.set(x, HUD_ROW, Cell::new(' ', Color::White, HUD_BG));
    }
    let hud = format!(
        " Score {:<5} Best {:<5} Length {:<4} {}ms/tick ",
        w.score, w.high_score, w.snake.len(), w.interval_ms,
    );
    buf.put_str(0, HUD_ROW, &hud, Color::White, HUD_BG);
}

/// Top-left terminal position of a board cell.
fn cell_origin(c: Coord) -> (usize, usize) {
    (BOARD_COL + 1 + c.x as usize * CELL_W, BOARD_ROW + 1 + c.y as usize)
}

fn compose_board(buf: &mut FrameBuffer, w: &GameState) {
    let size = w.grid.size as usize;
    let inner_w = size * CELL_W;
    let left = BOARD_COL;
    let right = BOARD_COL + inner_w + 1;
    let top = BOARD_ROW;
    let bottom = BOARD_ROW + size + 1;

    // Border
    buf.set(left, top, Cell::new('┌', BORDER, Color::Reset));
    buf.set(right, top, Cell::new('┐', BORDER, Color::Reset));
    buf.set(left, bottom, Cell::new('└', BORDER, Color::Reset));
    buf.set(right, bottom, Cell::new('┘', BORDER, Color::Reset));
    for x in left + 1..right {
        buf.set(x, top, Cell::new('─', BORDER, Color::Reset));
        buf.set(x, bottom, Cell::new('─', BORDER, Color::Reset));
    }
    for y in top + 1..bottom {
        buf.set(left, y, Cell::new('│', BORDER, Color::Reset));
        buf.set(right, y, Cell::new('│', BORDER, Color::Reset));
    }
    buf.fill_rect(left + 1, top + 1, inner_w, size, BOARD_BG);

    let (fx, fy) = cell_origin(w.food);
    buf.put_str(fx, fy, "()", FOOD, BOARD_BG);

    // Tail first so the head wins if a dead snake overlaps itself.
    for (i, seg) in w.snake.iter().enumerate().rev() {
        if !w.grid.contains(*seg) {
            continue;
        }
        let (sx, sy) = cell_origin(*seg);
        if i == 0 {
            let eyes = match w.heading {
                Heading::Up => "▀▀",
                Heading::Down => "▄▄",
                Heading::Left => "▌█",
                Heading::Right => "█▐",
            };
            let fg = if w.death.is_some() { FOOD } else { SNAKE_HEAD };
            buf.put_str(sx, sy, eyes, fg, SNAKE_BODY);
        } else {
            buf.put_str(sx, sy, "  ", SNAKE_BODY, SNAKE_BODY);
        }
    }
}

/// Centered panel over the board; returns (x, y, width) of its interior.
fn panel(buf: &mut FrameBuffer, w: &GameState, lines: usize) -> (usize, usize, usize) {
    let inner_w = w.grid.size as usize * CELL_W;
    let box_w = inner_w.saturating_sub(4).clamp(8, 44);
    let box_h = lines + 2;
    let x = BOARD_COL + 1 + (inner_w.saturating_sub(box_w)) / 2;
    let y = BOARD_ROW + 1 + (w.grid.size as usize).saturating_sub(box_h) / 2;
    buf.fill_rect(x, y, box_w, box_h, PANEL_BG);
    (x + 1, y + 1, box_w - 2)
}

fn centered(buf: &mut FrameBuffer, x: usize, y: usize, width: usize, s: &str, fg: Color) {
    let len = s.chars().count();
    let off = width.saturating_sub(len) / 2;
    let clipped: String = s.chars().take(width).collect();
    buf.put_str(x + off, y, &clipped, fg, PANEL_BG);
}

fn compose_title(buf: &mut FrameBuffer, w: &GameState) {
    let (x, y, width) = panel(buf, w, 5);
    centered(buf, x, y, width, "G R I D   S N A K E", ACCENT);
    centered(buf, x, y + 2, width, "ENTER / SPACE to start", SNAKE_HEAD);
    let best = format!("Best {}", w.high_score);
    centered(buf, x, y + 4, width, &best, Color::White);
}

fn compose_pause(buf: &mut FrameBuffer, w: &GameState) {
    let (x, y, width) = panel(buf, w, 3);
    centered(buf, x, y, width, "PAUSED", ACCENT);
    centered(buf, x, y + 2, width, "P to resume", Color::Grey);
}

fn compose_game_over(buf: &mut FrameBuffer, w: &GameState, commentary: Option<&str>) {
    let inner_w = (w.grid.size as usize * CELL_W).saturating_sub(4).clamp(8, 44) - 2;
    let quip = commentary.map(|c| wrap(c, inner_w)).unwrap_or_default();
    let quip_rows = quip.len().min(4);

    let (x, y, width) = panel(buf, w, 6 + quip_rows);
    let headline = match w.death {
        Some(DeathCause::Wall) => "GAME OVER: hit the wall",
        Some(DeathCause::SelfHit) => "GAME OVER: bit yourself",
        None => "BOARD FILLED",
    };
    centered(buf, x, y, width, headline, FOOD);
    let score = format!("Score {}   Best {}", w.score, w.high_score);
    centered(buf, x, y + 2, width, &score, Color::White);
    for (i, line) in quip.iter().take(quip_rows).enumerate() {
        centered(buf, x, y + 4 + i, width, line, Color::Grey);
    }
    centered(buf, x, y + 5 + quip_rows, width, "ENTER to play again", SNAKE_HEAD);
}

/// Greedy word wrap. Words longer than `width` are hard-split.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        let mut word: String = word.to_string();
        while word.chars().count() > width {
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            let head: String = word.chars().take(width).collect();
            word = word.chars().skip(width).collect();
            lines.push(head);
        }
        let needed = if line.is_empty() { word.chars().count() } else { line.chars().count() + 1 + word.chars().count() };
        if needed > width && !line.is_empty() {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(&word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SpeedConfig;
    use crate::domain::grid::Grid;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn world() -> GameState {
        GameState::new(Grid::new(20), SpeedConfig::default(), 7, StdRng::seed_from_u64(3))
    }

    fn screen() -> FrameBuffer {
        FrameBuffer::new(80, 30)
    }

    #[test]
    fn hud_shows_score_and_best() {
        let mut w = world();
        w.start();
        w.score = 4;
        let mut buf = screen();
        compose(&mut buf, &w, None);
        let hud = buf.row_text(HUD_ROW);
        assert!(hud.contains("Score 4"));
        assert!(hud.contains("Best 7"));
        assert!(hud.contains("150ms"));
    }

    #[test]
    fn food_and_snake_drawn_at_their_cells() {
        let mut w = world();
        w.start();
        w.food = Coord::new(0, 0);
        let mut buf = screen();
        compose(&mut buf, &w, None);

        let (fx, fy) = cell_origin(w.food);
        assert_eq!(buf.get(fx, fy).ch, '(');
        assert_eq!(buf.get(fx, fy).fg, FOOD);

        let (tx, ty) = cell_origin(w.tail());
        assert_eq!(buf.get(tx, ty).bg, SNAKE_BODY);
        let (hx, hy) = cell_origin(w.head());
        assert_eq!(buf.get(hx, hy).fg, SNAKE_HEAD);
    }

    #[test]
    fn idle_shows_title() {
        let w = world();
        let mut buf = screen();
        compose(&mut buf, &w, None);
        let all: String = (0..buf.height).map(|y| buf.row_text(y)).collect();
        assert!(all.contains("G R I D"));
    }

    #[test]
    fn game_over_shows_cause_and_commentary() {
        let mut w = world();
        w.start();
        w.phase = Phase::GameOver;
        w.death = Some(DeathCause::Wall);
        let mut buf = screen();
        compose(&mut buf, &w, Some("ouch"));
        let all: String = (0..buf.height).map(|y| buf.row_text(y)).collect();
        assert!(all.contains("hit the wall"));
        assert!(all.contains("ouch"));
    }

    #[test]
    fn small_terminal_gets_a_notice() {
        let w = world();
        let mut buf = FrameBuffer::new(12, 5);
        compose(&mut buf, &w, None);
        assert!(buf.row_text(0).starts_with("Terminal too"));
    }

    #[test]
    fn wrap_respects_width() {
        assert_eq!(wrap("the quick brown fox", 9), vec!["the quick", "brown fox"]);
        assert_eq!(wrap("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert!(wrap("   ", 5).is_empty());
    }
}
