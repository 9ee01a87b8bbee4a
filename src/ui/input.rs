/// Terminal input → game commands.
///
/// Every key press and finished mouse drag seen since the last frame is
/// turned into a `Command`, in arrival order. Nothing is held between
/// frames except an in-progress drag.
///
/// Keys:
///   Arrows / WASD   steer
///   Enter / Space   start or restart
///   P / Esc         pause or resume
///   Q / Ctrl+C      quit
///
/// A mouse drag across the board steers in the drag's dominant axis.

use std::time::Duration;

use crossterm::event::{
    self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};

use crate::domain::heading::Heading;

/// Drags shorter than this (in terminal cells, dominant axis) are clicks.
/// Horizontal distance is halved first since board cells are two columns wide.
pub const SWIPE_THRESHOLD: i32 = 2;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    Steer(Heading),
    Confirm,
    Pause,
    Quit,
}

pub struct InputState {
    /// Where the left button went down, while it is held.
    drag_origin: Option<(u16, u16)>,
    commands: Vec<Command>,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            drag_origin: None,
            commands: Vec::with_capacity(8),
        }
    }

    /// Read all pending terminal events without blocking.
    /// Call once per frame; the result is valid until the next call.
    pub fn drain_events(&mut self) -> &[Command] {
        self.commands.clear();
        while poll(Duration::ZERO).unwrap_or(false) {
            match event::read() {
                Ok(Event::Key(key)) => {
                    if let Some(cmd) = map_key(&key) {
                        self.commands.push(cmd);
                    }
                }
                Ok(Event::Mouse(mouse)) => {
                    if let Some(cmd) = self.track_mouse(&mouse) {
                        self.commands.push(cmd);
                    }
                }
                _ => {}
            }
        }
        &self.commands
    }

    fn track_mouse(&mut self, m: &MouseEvent) -> Option<Command> {
        match m.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.drag_origin = Some((m.column, m.row));
                None
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let from = self.drag_origin.take()?;
                swipe_heading(from, (m.column, m.row), SWIPE_THRESHOLD).map(Command::Steer)
            }
            _ => None,
        }
    }
}

/// Key → command. Only presses count; repeats and releases would
/// double-toggle pause on terminals that report them.
pub fn map_key(key: &KeyEvent) -> Option<Command> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') | KeyCode::Char('C') => Some(Command::Quit),
            _ => None,
        };
    }
    match key.code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(Command::Steer(Heading::Up)),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(Command::Steer(Heading::Down)),
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Command::Steer(Heading::Left)),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Command::Steer(Heading::Right)),
        KeyCode::Enter | KeyCode::Char(' ') => Some(Command::Confirm),
        KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Esc => Some(Command::Pause),
        KeyCode::Char('q') | KeyCode::Char('Q') => Some(Command::Quit),
        _ => None,
    }
}

/// Heading of a drag from `from` to `to` (column, row). The dominant axis
/// wins; ties and short drags yield nothing.
pub fn swipe_heading(from: (u16, u16), to: (u16, u16), threshold: i32) -> Option<Heading> {
    let dx = (to.0 as i32 - from.0 as i32) / 2;
    let dy = to.1 as i32 - from.1 as i32;
    if dx.abs().max(dy.abs()) < threshold || dx.abs() == dy.abs() {
        return None;
    }
    if dx.abs() > dy.abs() {
        Some(if dx > 0 { Heading::Right } else { Heading::Left })
    } else {
        Some(if dy > 0 { Heading::Down } else { Heading::Up })
    }
}
