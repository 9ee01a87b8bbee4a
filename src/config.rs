/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.
/// Problems found while loading are kept in `warnings` so they can be
/// logged once the logger is up (the terminal is not usable for that).

use serde::Deserialize;
use std::path::PathBuf;

use log::LevelFilter;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub grid_size: i32,
    pub speed: SpeedConfig,
    pub seed: Option<u64>,
    pub save_file: Option<PathBuf>,
    pub log: LogConfig,
    pub gamepad: GamepadConfig,
    pub commentary: CommentaryConfig,
    pub warnings: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpeedConfig {
    pub initial_ms: u64,
    pub step_ms: u64,
    pub min_ms: u64,
}

#[derive(Clone, Debug)]
pub struct LogConfig {
    pub file: PathBuf,
    pub level: LevelFilter,
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub confirm: Vec<String>,
    pub pause: Vec<String>,
    pub quit: Vec<String>,
}

#[derive(Clone, Debug, Default)]
pub struct CommentaryConfig {
    pub command: Option<String>,
    pub args: Vec<String>,
    pub credential_env: Option<String>,
}

pub const MIN_GRID: i32 = 5;
pub const MAX_GRID: i32 = 60;

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    grid: TomlGrid,
    #[serde(default)]
    speed: TomlSpeed,
    #[serde(default)]
    general: TomlGeneral,
    #[serde(default)]
    log: TomlLog,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    commentary: TomlCommentary,
}

#[derive(Deserialize, Debug)]
struct TomlGrid {
    #[serde(default = "default_grid_size")]
    size: i32,
}

#[derive(Deserialize, Debug)]
struct TomlSpeed {
    #[serde(default = "default_initial_ms")]
    initial_ms: u64,
    #[serde(default = "default_step_ms")]
    step_ms: u64,
    #[serde(default = "default_min_ms")]
    min_ms: u64,
}

#[derive(Deserialize, Debug, Default)]
struct TomlGeneral {
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    save_file: Option<String>,
}

#[derive(Deserialize, Debug)]
struct TomlLog {
    #[serde(default = "default_log_file")]
    file: String,
    #[serde(default = "default_log_level")]
    level: String,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_confirm")]
    confirm: Vec<String>,
    #[serde(default = "default_pause")]
    pause: Vec<String>,
    #[serde(default)]
    quit: Vec<String>,
}

#[derive(Deserialize, Debug, Default)]
struct TomlCommentary {
    #[serde(default)]
    command: Option<String>,
    #[serde(default)]
    args: Vec<String>,
    #[serde(default)]
    credential_env: Option<String>,
}

// ── Defaults ──

fn default_grid_size() -> i32 { 20 }
fn default_initial_ms() -> u64 { 150 }
fn default_step_ms() -> u64 { 5 }
fn default_min_ms() -> u64 { 60 }
fn default_log_file() -> String { "gridsnake.log".into() }
fn default_log_level() -> String { "info".into() }
fn default_confirm() -> Vec<String> { vec!["Start".into(), "A".into()] }
fn default_pause() -> Vec<String> { vec!["Select".into()] }

impl Default for TomlGrid {
    fn default() -> Self {
        TomlGrid { size: default_grid_size() }
    }
}

impl Default for TomlSpeed {
    fn default() -> Self {
        TomlSpeed {
            initial_ms: default_initial_ms(),
            step_ms: default_step_ms(),
            min_ms: default_min_ms(),
        }
    }
}

impl Default for TomlLog {
    fn default() -> Self {
        TomlLog { file: default_log_file(), level: default_log_level() }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            confirm: default_confirm(),
            pause: default_pause(),
            quit: vec![],
        }
    }
}

impl Default for SpeedConfig {
    fn default() -> Self {
        SpeedConfig {
            initial_ms: default_initial_ms(),
            step_ms: default_step_ms(),
            min_ms: default_min_ms(),
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig::from_toml(TomlConfig::default(), vec![])
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory,
    /// (3) `~/.local/share/gridsnake`. Missing file or missing keys
    /// gracefully fall back to defaults.
    pub fn load() -> Self {
        let mut warnings = vec![];
        let toml_cfg = load_toml(&candidate_dirs(), &mut warnings);
        GameConfig::from_toml(toml_cfg, warnings)
    }

    /// Parse config text directly, without touching the filesystem.
    pub fn parse(text: &str) -> Self {
        let mut warnings = vec![];
        let cfg = parse_toml(text, "config.toml", &mut warnings);
        GameConfig::from_toml(cfg, warnings)
    }

    fn from_toml(t: TomlConfig, mut warnings: Vec<String>) -> Self {
        let grid_size = t.grid.size.clamp(MIN_GRID, MAX_GRID);
        if grid_size != t.grid.size {
            warnings.push(format!(
                "grid.size {} out of range, using {}", t.grid.size, grid_size,
            ));
        }

        // The floor must sit at or below the starting interval, and a
        // zero interval would spin the loop.
        let min_ms = t.speed.min_ms.max(1);
        let initial_ms = t.speed.initial_ms.max(min_ms);

        let level = parse_level(&t.log.level).unwrap_or_else(|| {
            warnings.push(format!("log.level '{}' not recognised, using info", t.log.level));
            LevelFilter::Info
        });

        GameConfig {
            grid_size,
            speed: SpeedConfig {
                initial_ms,
                step_ms: t.speed.step_ms,
                min_ms,
            },
            seed: t.general.seed,
            save_file: t.general.save_file.map(PathBuf::from),
            log: LogConfig {
                file: PathBuf::from(t.log.file),
                level,
            },
            gamepad: GamepadConfig {
                confirm: t.gamepad.confirm,
                pause: t.gamepad.pause,
                quit: t.gamepad.quit,
            },
            commentary: CommentaryConfig {
                command: t.commentary.command.filter(|c| !c.trim().is_empty()),
                args: t.commentary.args,
                credential_env: t.commentary.credential_env,
            },
            warnings,
        }
    }
}

fn parse_level(s: &str) -> Option<LevelFilter> {
    match s.trim().to_ascii_lowercase().as_str() {
        "off"   => Some(LevelFilter::Off),
        "error" => Some(LevelFilter::Error),
        "warn"  => Some(LevelFilter::Warn),
        "info"  => Some(LevelFilter::Info),
        "debug" => Some(LevelFilter::Debug),
        "trace" => Some(LevelFilter::Trace),
        _ => None,
    }
}

/// Candidate directories to search: exe dir + CWD + XDG data home (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    // 3. XDG data home (~/.local/share/gridsnake)
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/gridsnake");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf], warnings: &mut Vec<String>) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => return parse_toml(&text, &path.display().to_string(), warnings),
                Err(e) => {
                    warnings.push(format!("could not read {}: {e}", path.display()));
                }
            }
        }
    }
    TomlConfig::default()
}

fn parse_toml(text: &str, origin: &str, warnings: &mut Vec<String>) -> TomlConfig {
    match toml::from_str::<TomlConfig>(text) {
        Ok(cfg) => cfg,
        Err(e) => {
            warnings.push(format!("{origin} parse error: {e}; using default settings"));
            TomlConfig::default()
        }
    }
}
