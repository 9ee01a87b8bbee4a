/// GameState: the authoritative snapshot of a running game.
///
/// Only `sim::step` (per tick) and the start/pause transitions below
/// mutate it. Renderers and input handlers read it; the one write path
/// open to input is `steer`, which goes through the direction buffer.
///
/// ## Phases
///
///   Idle ──start──▶ Playing ◀──pause/resume──▶ Paused
///                      │
///                   collision
///                      ▼
///                   GameOver ──start──▶ Playing
///
/// A fresh game starts only from Idle or GameOver. The high score
/// survives every reset.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::{GameConfig, SpeedConfig};
use crate::domain::grid::{Coord, Grid};
use crate::domain::heading::{DeathCause, Heading};
use super::buffer::DirectionBuffer;
use super::food::place_food;

pub const START_LENGTH: usize = 3;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Idle,
    Playing,
    Paused,
    GameOver,
}

pub struct GameState {
    pub grid: Grid,
    pub speed: SpeedConfig,

    // ── Snake ──
    /// Head at the front, tail at the back.
    pub snake: VecDeque<Coord>,
    pub heading: Heading,
    pub pending: DirectionBuffer,

    pub food: Coord,

    // ── Ledger ──
    pub score: u32,
    pub high_score: u32,

    // ── Meta ──
    pub phase: Phase,
    pub interval_ms: u64,
    pub death: Option<DeathCause>,
    /// Committed ticks in the current game.
    pub ticks: u64,

    pub rng: StdRng,
}

impl GameState {
    /// Idle state: a board laid out for the first game, waiting for start.
    pub fn new(grid: Grid, speed: SpeedConfig, high_score: u32, mut rng: StdRng) -> Self {
        let snake: VecDeque<Coord> = grid.spawn_segment(START_LENGTH).into();
        let food = place_food(&mut rng, &grid, &snake).unwrap_or(Coord::new(0, 0));
        GameState {
            grid,
            interval_ms: speed.initial_ms,
            speed,
            snake,
            heading: Heading::Up,
            pending: DirectionBuffer::new(),
            food,
            score: 0,
            high_score,
            phase: Phase::Idle,
            death: None,
            ticks: 0,
            rng,
        }
    }

    pub fn from_config(config: &GameConfig, high_score: u32) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        GameState::new(Grid::new(config.grid_size), config.speed.clone(), high_score, rng)
    }

    pub fn head(&self) -> Coord {
        self.snake[0]
    }

    pub fn tail(&self) -> Coord {
        self.snake[self.snake.len() - 1]
    }

    pub fn can_start(&self) -> bool {
        matches!(self.phase, Phase::Idle | Phase::GameOver)
    }

    /// Full reset into Playing. Only the high score is carried over.
    /// Returns false (and changes nothing) outside Idle / GameOver.
    pub fn start(&mut self) -> bool {
        if !self.can_start() {
            return false;
        }
        self.snake = self.grid.spawn_segment(START_LENGTH).into();
        self.food = place_food(&mut self.rng, &self.grid, &self.snake)
            .unwrap_or(Coord::new(0, 0));
        self.heading = Heading::Up;
        self.pending.clear();
        self.score = 0;
        self.interval_ms = self.speed.initial_ms;
        self.death = None;
        self.ticks = 0;
        self.phase = Phase::Playing;
        true
    }

    /// Playing ⇄ Paused. Any other phase is left alone.
    pub fn toggle_pause(&mut self) -> bool {
        match self.phase {
            Phase::Playing => { self.phase = Phase::Paused; true }
            Phase::Paused  => { self.phase = Phase::Playing; true }
            _ => false,
        }
    }

    /// Offer a heading to the direction buffer. Ignored outside Playing.
    pub fn steer(&self, requested: Heading) -> bool {
        if self.phase != Phase::Playing {
            return false;
        }
        self.pending.offer(requested, self.heading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh(seed: u64) -> GameState {
        GameState::new(Grid::new(20), SpeedConfig::default(), 0, StdRng::seed_from_u64(seed))
    }

    #[test]
    fn new_state_is_idle_and_laid_out() {
        let w = fresh(1);
        assert_eq!(w.phase, Phase::Idle);
        assert_eq!(w.snake.len(), START_LENGTH);
        assert_eq!(w.head(), Coord::new(10, 10));
        assert_eq!(w.tail(), Coord::new(10, 12));
        assert!(!w.snake.contains(&w.food));
    }

    #[test]
    fn start_resets_everything_but_high_score() {
        let mut w = fresh(2);
        assert!(w.start());
        w.snake.push_front(Coord::new(10, 9));
        w.score = 12;
        w.high_score = 12;
        w.interval_ms = 90;
        w.heading = Heading::Left;
        w.death = Some(DeathCause::Wall);
        w.phase = Phase::GameOver;

        assert!(w.start());
        assert_eq!(w.phase, Phase::Playing);
        assert_eq!(w.snake, VecDeque::from(Grid::new(20).spawn_segment(3)));
        assert_eq!(w.score, 0);
        assert_eq!(w.high_score, 12);
        assert_eq!(w.interval_ms, w.speed.initial_ms);
        assert_eq!(w.heading, Heading::Up);
        assert_eq!(w.death, None);
        assert!(!w.snake.contains(&w.food));
    }

    #[test]
    fn start_refused_mid_game() {
        let mut w = fresh(3);
        w.start();
        w.score = 4;
        assert!(!w.start());
        w.toggle_pause();
        assert!(!w.start());
        assert_eq!(w.score, 4);
    }

    #[test]
    fn pause_toggles_only_in_game() {
        let mut w = fresh(4);
        assert!(!w.toggle_pause());
        assert_eq!(w.phase, Phase::Idle);
        w.start();
        assert!(w.toggle_pause());
        assert_eq!(w.phase, Phase::Paused);
        assert!(w.toggle_pause());
        assert_eq!(w.phase, Phase::Playing);
    }

    #[test]
    fn steering_ignored_unless_playing() {
        let mut w = fresh(5);
        assert!(!w.steer(Heading::Left));
        w.start();
        assert!(w.steer(Heading::Left));
        w.toggle_pause();
        assert!(!w.steer(Heading::Right));
        assert_eq!(w.pending.peek(), Some(Heading::Left));
    }

    #[test]
    fn start_drops_stale_pending_heading() {
        let mut w = fresh(6);
        w.start();
        w.steer(Heading::Left);
        w.phase = Phase::GameOver;
        w.start();
        assert_eq!(w.pending.peek(), None);
    }
}
