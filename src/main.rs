/// Entry point and game loop.
///
/// The loop runs at frame rate: drain input, apply commands, run a tick
/// when the timer fires, render. Ticks are driven by a one-shot timer
/// re-armed after every tick with the current interval, so speed-ups
/// take effect on the very next tick.

mod commentary;
mod config;
mod domain;
mod sim;
mod ui;

use std::fs::File;
use std::time::{Duration, Instant};

use log::{debug, info, trace, warn};
use simplelog::WriteLogger;

use commentary::Commentary;
use config::GameConfig;
use domain::heading::DeathCause;
use sim::clock::TickTimer;
use sim::event::GameEvent;
use sim::save::{FileStore, HighScoreStore, MemoryStore};
use sim::step;
use sim::world::{GameState, Phase};
use ui::gamepad::GamepadState;
use ui::input::{Command, InputState};
use ui::renderer::Renderer;
use ui::sound::SoundEngine;

const FRAME_SLEEP: Duration = Duration::from_millis(5);

fn main() {
    let config = GameConfig::load();
    init_logging(&config);
    for w in &config.warnings {
        warn!("config: {w}");
    }

    let no_save = std::env::args().skip(1).any(|a| a == "--no-save");
    let mut store: Box<dyn HighScoreStore> = if no_save {
        info!("high score kept in memory only (--no-save)");
        Box::new(MemoryStore::default())
    } else {
        let file = FileStore::locate(config.save_file.as_deref());
        info!("high score file: {}", file.path().display());
        Box::new(file)
    };

    let mut world = GameState::from_config(&config, store.load_high_score());
    info!(
        "grid {}x{}, interval {}ms (-{} per food, min {}), best {}",
        config.grid_size, config.grid_size,
        config.speed.initial_ms, config.speed.step_ms, config.speed.min_ms,
        world.high_score,
    );

    let mut renderer = Renderer::new();
    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let sound = SoundEngine::new();

    let result = game_loop(&mut world, store.as_mut(), &mut renderer, sound.as_ref(), &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        warn!("game loop ended with error: {e}");
        eprintln!("Game error: {e}");
    }

    println!();
    println!("Thanks for playing Grid Snake!");
    println!("Best score: {}", world.high_score);
}

/// File logger; the terminal belongs to the renderer. A logger that cannot
/// open its file is reported once and the game runs without one.
fn init_logging(config: &GameConfig) {
    let file = match File::create(&config.log.file) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Log file {} unavailable: {e}", config.log.file.display());
            return;
        }
    };
    if let Err(e) = WriteLogger::init(config.log.level, simplelog::Config::default(), file) {
        eprintln!("Logger init failed: {e}");
    }
}

fn game_loop(
    world: &mut GameState,
    store: &mut dyn HighScoreStore,
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
    config: &GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    let mut gp = GamepadState::new(&config.gamepad);
    let mut timer = TickTimer::new();
    let provider = commentary::provider_from_config(&config.commentary);
    let mut quip: Option<Commentary> = None;
    let mut commands: Vec<Command> = Vec::with_capacity(8);
    if gp.connected {
        info!("gamepad input enabled");
    }

    loop {
        commands.clear();
        commands.extend_from_slice(kb.drain_events());
        gp.update(&mut commands);

        for &cmd in &commands {
            match cmd {
                Command::Quit => {
                    info!("quit at score {}", world.score);
                    return Ok(());
                }
                Command::Confirm => {
                    if world.start() {
                        if quip.as_ref().is_some_and(Commentary::is_pending) {
                            debug!("dropping unanswered commentary");
                        }
                        info!("game started, food at {:?}", world.food);
                        timer.arm(Instant::now(), world.interval_ms);
                        quip = None;
                        if let Some(sfx) = sound {
                            sfx.play_start();
                        }
                    }
                }
                Command::Pause => {
                    if world.toggle_pause() {
                        match world.phase {
                            Phase::Paused => timer.disarm(),
                            _ => timer.arm(Instant::now(), world.interval_ms),
                        }
                        info!("{:?} at tick {}", world.phase, world.ticks);
                    }
                }
                Command::Steer(h) => {
                    world.steer(h);
                }
            }
        }

        let now = Instant::now();
        if timer.fire(now) {
            let events = step::step(world, store);
            if world.phase == Phase::Playing {
                timer.arm(now, world.interval_ms);
            }
            process_events(sound, &events);

            if world.phase == Phase::GameOver {
                info!(
                    "game over ({}) score {} best {} after {} ticks",
                    DeathCause::label(world.death),
                    world.score, world.high_score, world.ticks,
                );
                quip = Some(Commentary::spawn(provider.clone(), world.score, world.death));
            }
        }

        if let Some(q) = &mut quip {
            q.poll();
        }

        renderer.render(world, quip.as_ref().map(|q| q.text()))?;

        let nap = timer
            .remaining(Instant::now())
            .map_or(FRAME_SLEEP, |left| left.min(FRAME_SLEEP));
        std::thread::sleep(nap);
    }
}

fn process_events(sound: Option<&SoundEngine>, events: &[GameEvent]) {
    for ev in events {
        match ev {
            GameEvent::FoodEaten { score, .. } => {
                if let Some(sfx) = sound { sfx.play_eat(); }
                info!("ate food, score {score}");
            }
            GameEvent::NewHighScore { score } => {
                if let Some(sfx) = sound { sfx.play_high_score(); }
                info!("new best {score}");
            }
            GameEvent::Died { cause } => {
                if let Some(sfx) = sound { sfx.play_die(); }
                debug!("collision: {}", DeathCause::label(Some(*cause)));
            }
            GameEvent::BoardFilled => {
                if let Some(sfx) = sound { sfx.play_board_filled(); }
            }
            GameEvent::SpeedUp { interval_ms } => debug!("interval now {interval_ms}ms"),
            GameEvent::FoodPlaced { at } => debug!("food placed at {at:?}"),
            GameEvent::Moved { head } => trace!("head {head:?}"),
        }
    }
}
