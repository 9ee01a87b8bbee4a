/// High-score persistence.
///
/// The only state that outlives a game is one number. It is loaded once
/// at process start and written by the engine every time it goes up.
///
/// ## File format:
///   Key-value lines, e.g. `high_score=42`. Unknown keys are ignored, so
///   the file can grow without breaking older builds.
///
/// Stored as `highscore.dat` next to the executable when that directory
/// is writable, else under `~/.local/share/gridsnake`, else in the CWD.

use std::path::{Path, PathBuf};

const SAVE_FILE: &str = "highscore.dat";

/// Persistence collaborator for the best score.
pub trait HighScoreStore {
    /// Best score so far, 0 when nothing was saved yet.
    fn load_high_score(&self) -> u32;
    fn save_high_score(&mut self, score: u32) -> Result<(), String>;
}

// ══════════════════════════════════════════════════════════════
// Paths
// ══════════════════════════════════════════════════════════════

fn save_dir() -> PathBuf {
    // 1. Try exe directory (works for local/portable installs)
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            // System installs like /usr/games/ won't be writable
            let test_path = parent.join(".write_test_gridsnake");
            if std::fs::write(&test_path, "").is_ok() {
                let _ = std::fs::remove_file(&test_path);
                return parent.to_path_buf();
            }
        }
    }

    // 2. XDG data home (~/.local/share/gridsnake)
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/gridsnake");
        if std::fs::create_dir_all(&xdg).is_ok() {
            return xdg;
        }
    }

    // 3. Fallback to CWD
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

// ══════════════════════════════════════════════════════════════
// File store
// ══════════════════════════════════════════════════════════════

pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: PathBuf) -> Self {
        FileStore { path }
    }

    /// Store in the default save directory, or at `override_path` when
    /// the config names one.
    pub fn locate(override_path: Option<&Path>) -> Self {
        match override_path {
            Some(p) => FileStore::new(p.to_path_buf()),
            None => FileStore::new(save_dir().join(SAVE_FILE)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HighScoreStore for FileStore {
    fn load_high_score(&self) -> u32 {
        std::fs::read_to_string(&self.path)
            .ok()
            .and_then(|content| parse_save(&content))
            .unwrap_or(0)
    }

    fn save_high_score(&mut self, score: u32) -> Result<(), String> {
        std::fs::write(&self.path, serialize(score))
            .map_err(|e| format!("Save failed ({}): {}", self.path.display(), e))
    }
}

// ══════════════════════════════════════════════════════════════
// In-memory store (tests, --no-save runs)
// ══════════════════════════════════════════════════════════════

/// Keeps the score in memory and records every write.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub value: u32,
    pub writes: Vec<u32>,
}

impl MemoryStore {
    #[cfg(test)]
    pub fn with_value(value: u32) -> Self {
        MemoryStore { value, writes: vec![] }
    }
}

impl HighScoreStore for MemoryStore {
    fn load_high_score(&self) -> u32 {
        self.value
    }

    fn save_high_score(&mut self, score: u32) -> Result<(), String> {
        self.value = score;
        self.writes.push(score);
        Ok(())
    }
}

// ══════════════════════════════════════════════════════════════
// Serialization
// ══════════════════════════════════════════════════════════════

fn serialize(score: u32) -> String {
    format!("high_score={}\n", score)
}

fn parse_save(content: &str) -> Option<u32> {
    content.lines()
        .find_map(|line| line.trim().strip_prefix("high_score="))
        .and_then(|val| val.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("gridsnake_{}_{}.dat", name, std::process::id()))
    }

    #[test]
    fn parse_reads_key() {
        assert_eq!(parse_save("high_score=17\n"), Some(17));
        assert_eq!(parse_save("other=3\nhigh_score= 9 \n"), Some(9));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(parse_save(""), None);
        assert_eq!(parse_save("high_score=lots"), None);
        assert_eq!(parse_save("high_score=-4"), None);
    }

    #[test]
    fn file_round_trip() {
        let path = temp_path("round_trip");
        let mut store = FileStore::new(path.clone());
        store.save_high_score(31).unwrap();
        assert_eq!(FileStore::new(path.clone()).load_high_score(), 31);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn missing_file_loads_zero() {
        let store = FileStore::new(temp_path("missing"));
        assert_eq!(store.load_high_score(), 0);
    }

    #[test]
    fn corrupt_file_loads_zero() {
        let path = temp_path("corrupt");
        std::fs::write(&path, "\u{0}\u{1}not a score").unwrap();
        assert_eq!(FileStore::new(path.clone()).load_high_score(), 0);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn unwritable_path_reports_error() {
        let dir = temp_path("as_dir");
        std::fs::create_dir_all(&dir).unwrap();
        // Writing a file over a directory fails on every platform.
        let mut store = FileStore::new(dir.clone());
        let err = store.save_high_score(1).unwrap_err();
        assert!(err.starts_with("Save failed"));
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn memory_store_records_writes() {
        let mut m = MemoryStore::with_value(5);
        assert_eq!(m.load_high_score(), 5);
        m.save_high_score(6).unwrap();
        assert_eq!(m.writes, vec![6]);
        assert_eq!(m.load_high_score(), 6);
    }
}
