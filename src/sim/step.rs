/// The step function: advances the game by one tick.
///
/// Processing order:
///   1. Consume the pending heading (else keep the current one)
///   2. Compute the new head
///   3. Wall check
///   4. Pre-move self check (current tail provisionally free)
///   5. Prepend the head to a candidate body
///   6. Food: grow, or drop the tail and re-check the moved body
///   7. Commit
///
/// A collision ends the game without touching anything else: the body,
/// food, score, heading and interval are only written at commit time.

use std::collections::VecDeque;

use log::{debug, warn};

use crate::domain::grid::Coord;
use crate::domain::heading::{DeathCause, Heading};
use crate::domain::rules;
use super::event::GameEvent;
use super::food::place_food;
use super::save::HighScoreStore;
use super::world::{GameState, Phase};

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn step(world: &mut GameState, store: &mut dyn HighScoreStore) -> Vec<GameEvent> {
    if world.phase != Phase::Playing { return vec![]; }

    let mut events: Vec<GameEvent> = Vec::new();

    let heading = world.pending.take().unwrap_or(world.heading);
    let new_head = world.head().step(heading);

    if rules::hits_wall(&world.grid, new_head) {
        end_game(world, DeathCause::Wall, &mut events);
        return events;
    }

    if rules::hits_body_before_move(&world.snake, new_head) {
        end_game(world, DeathCause::SelfHit, &mut events);
        return events;
    }

    let mut body = world.snake.clone();
    body.push_front(new_head);

    if new_head == world.food {
        // Tail stays: if the head took the tail's cell, the grown body
        // now overlaps itself.
        if rules::hits_body_after_move(&body) {
            end_game(world, DeathCause::SelfHit, &mut events);
            return events;
        }
        commit_move(world, body, heading, &mut events);
        resolve_growth(world, store, new_head, &mut events);
    } else {
        body.pop_back();
        if rules::hits_body_after_move(&body) {
            end_game(world, DeathCause::SelfHit, &mut events);
            return events;
        }
        commit_move(world, body, heading, &mut events);
    }

    events
}

// ══════════════════════════════════════════════════════════════
// Outcomes
// ══════════════════════════════════════════════════════════════

fn end_game(world: &mut GameState, cause: DeathCause, events: &mut Vec<GameEvent>) {
    world.phase = Phase::GameOver;
    world.death = Some(cause);
    events.push(GameEvent::Died { cause });
}

fn commit_move(world: &mut GameState, body: VecDeque<Coord>, heading: Heading, events: &mut Vec<GameEvent>) {
    world.snake = body;
    world.heading = heading;
    world.ticks += 1;
    events.push(GameEvent::Moved { head: world.head() });
}

/// Growth tick bookkeeping: score, speed, high score, next food.
fn resolve_growth(world: &mut GameState, store: &mut dyn HighScoreStore, at: Coord, events: &mut Vec<GameEvent>) {
    world.score += 1;
    events.push(GameEvent::FoodEaten { at, score: world.score });

    let next = world.interval_ms
        .saturating_sub(world.speed.step_ms)
        .max(world.speed.min_ms);
    if next != world.interval_ms {
        world.interval_ms = next;
        debug!("speed up: {} ms per tick at score {}", next, world.score);
        events.push(GameEvent::SpeedUp { interval_ms: next });
    }

    if world.score > world.high_score {
        world.high_score = world.score;
        if let Err(e) = store.save_high_score(world.high_score) {
            warn!("{e}");
        }
        events.push(GameEvent::NewHighScore { score: world.high_score });
    }

    match place_food(&mut world.rng, &world.grid, &world.snake) {
        Some(food) => {
            world.food = food;
            events.push(GameEvent::FoodPlaced { at: food });
        }
        None => {
            // Nowhere left to put food: the board is full.
            world.phase = Phase::GameOver;
            world.death = None;
            events.push(GameEvent::BoardFilled);
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
