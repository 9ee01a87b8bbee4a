/// Game-over commentary: one line of flavour text about how a run ended.
///
/// The line is produced off the game thread by an optional external
/// provider (any program that prints a line to stdout; score and cause are
/// passed in the environment). While the provider is running, when it
/// fails, or when none is configured, the built-in line for the result
/// is shown instead. Nothing here feeds back into the game state.

use std::process::{Command, Stdio};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;

use log::{info, warn};

use crate::config::CommentaryConfig;
use crate::domain::heading::DeathCause;

pub trait Commentator: Send + Sync {
    fn comment(&self, score: u32, cause: Option<DeathCause>) -> Result<String, String>;
}

// ══════════════════════════════════════════════════════════════
// Built-in lines
// ══════════════════════════════════════════════════════════════

const WALL_LINES: &[&str] = &[
    "The wall was there the whole time.",
    "Bold strategy, going straight through the edge of the world.",
    "Turns out the board does end somewhere.",
];

const SELF_LINES: &[&str] = &[
    "Bitten by the one snake you trusted most.",
    "Ouroboros speedrun, any%.",
    "That tail came out of nowhere. Well, out of you.",
];

const NONE_LINES: &[&str] = &[
    "Nothing left to eat. Nothing left to prove.",
    "The board is full and so are you.",
];

/// Deterministic line for a given result.
pub fn fallback_line(score: u32, cause: Option<DeathCause>) -> String {
    let lines = match cause {
        Some(DeathCause::Wall) => WALL_LINES,
        Some(DeathCause::SelfHit) => SELF_LINES,
        None => NONE_LINES,
    };
    let line = lines[score as usize % lines.len()];
    format!("{line} ({score} eaten)")
}

// ══════════════════════════════════════════════════════════════
// External command provider
// ══════════════════════════════════════════════════════════════

pub struct CommandCommentator {
    program: String,
    args: Vec<String>,
}

impl CommandCommentator {
    pub fn new(program: String, args: Vec<String>) -> Self {
        CommandCommentator { program, args }
    }
}

impl Commentator for CommandCommentator {
    fn comment(&self, score: u32, cause: Option<DeathCause>) -> Result<String, String> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .env("GRIDSNAKE_SCORE", score.to_string())
            .env("GRIDSNAKE_CAUSE", DeathCause::label(cause))
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .map_err(|e| format!("commentary command '{}' failed to start: {}", self.program, e))?;

        if !output.status.success() {
            return Err(format!("commentary command '{}' exited with {}", self.program, output.status));
        }

        String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .map(str::to_string)
            .ok_or_else(|| format!("commentary command '{}' printed nothing", self.program))
    }
}

/// Build the configured provider. `None` means built-in lines only: no
/// command configured, or the credential it needs is missing.
pub fn provider_from_config(cfg: &CommentaryConfig) -> Option<Arc<dyn Commentator>> {
    provider_with_env(cfg, |name| std::env::var(name).ok())
}

fn provider_with_env(
    cfg: &CommentaryConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Option<Arc<dyn Commentator>> {
    let program = cfg.command.clone()?;
    if let Some(name) = &cfg.credential_env {
        if lookup(name).map_or(true, |v| v.trim().is_empty()) {
            info!("commentary: {} is not set, using built-in lines", name);
            return None;
        }
    }
    Some(Arc::new(CommandCommentator::new(program, cfg.args.clone())))
}

// ══════════════════════════════════════════════════════════════
// Per-game handle
// ══════════════════════════════════════════════════════════════

/// Commentary for one finished game. Shows the fallback until the
/// provider answers.
pub struct Commentary {
    fallback: String,
    fetched: Option<String>,
    rx: Option<Receiver<Result<String, String>>>,
}

impl Commentary {
    /// Kick off the provider on its own thread and return immediately.
    pub fn spawn(provider: Option<Arc<dyn Commentator>>, score: u32, cause: Option<DeathCause>) -> Self {
        let fallback = fallback_line(score, cause);
        let rx = provider.and_then(|p| {
            let (tx, rx) = mpsc::channel();
            let spawned = thread::Builder::new()
                .name("commentary".into())
                .spawn(move || {
                    // Receiver may be gone if the player already restarted.
                    let _ = tx.send(p.comment(score, cause));
                });
            match spawned {
                Ok(_) => Some(rx),
                Err(e) => {
                    warn!("commentary: could not start worker: {e}");
                    None
                }
            }
        });
        Commentary { fallback, fetched: None, rx }
    }

    /// Pick up the provider's answer if it has arrived. Never blocks.
    pub fn poll(&mut self) {
        let Some(rx) = &self.rx else { return };
        match rx.try_recv() {
            Ok(Ok(line)) => {
                self.fetched = Some(line);
                self.rx = None;
            }
            Ok(Err(e)) => {
                warn!("{e}");
                self.rx = None;
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                self.rx = None;
            }
        }
    }

    pub fn is_pending(&self) -> bool {
        self.rx.is_some()
    }

    pub fn text(&self) -> &str {
        self.fetched.as_deref().unwrap_or(&self.fallback)
    }
}
