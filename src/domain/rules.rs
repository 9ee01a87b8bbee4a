/// Collision rules: pure functions over a body and a candidate head.
///
/// These encode "what kills the snake" without mutating anything; the
/// engine in `sim::step` decides when each one is consulted.
///
/// ## Collision Truth Table
///
/// ┌──────────────────────────────┬────────────┬──────────────────────┐
/// │ Condition                    │ Result     │ Checked              │
/// ├──────────────────────────────┼────────────┼──────────────────────┤
/// │ head outside [0, size)       │ WALL       │ before anything else │
/// │ head on body, not the tail   │ SELF       │ before the move      │
/// │ head on tail, no food eaten  │ survive    │ tail vacates         │
/// │ head on tail, food eaten     │ SELF       │ after growth         │
/// │ head on moved body (excl.    │ SELF       │ after tail removal   │
/// │ itself)                      │            │                      │
/// └──────────────────────────────┴────────────┴──────────────────────┘
///
/// The pre-move and post-move checks stay separate: the pre-move check
/// lets the tail cell through provisionally, and only the post-move body
/// decides whether that was safe.

use std::collections::VecDeque;

use super::grid::{Coord, Grid};

/// Would `head` leave the board?
pub fn hits_wall(grid: &Grid, head: Coord) -> bool {
    !grid.contains(head)
}

/// Pre-move self check against the current body.
///
/// A head landing exactly on the current tail is let through: the tail is
/// about to vacate that cell unless food is eaten this tick.
pub fn hits_body_before_move(body: &VecDeque<Coord>, head: Coord) -> bool {
    match body.back() {
        Some(&tail) if tail == head => false,
        _ => body.contains(&head),
    }
}

/// Post-move self check: does the head (index 0) overlap any other
/// segment of the already-moved body?
pub fn hits_body_after_move(moved: &VecDeque<Coord>) -> bool {
    match moved.front() {
        Some(&head) => moved.iter().skip(1).any(|&c| c == head),
        None => false,
    }
}
