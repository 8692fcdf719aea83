/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD), or from
/// an explicit `--config` path. Falls back to defaults if the file is
/// missing or incomplete. Command-line flags are applied on top in `main`.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::sim::level::{LevelDims, BUILTIN_DIMS};

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub tick_rate_ms: u64,
    /// `None` = built-in level.
    pub level: Option<PathBuf>,
    pub dims: LevelDims,
    pub sound: bool,
    pub gamepad: GamepadConfig,
    pub log: LogConfig,
    /// Problems found while loading, reported once logging is up.
    pub warnings: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct GamepadConfig {
    pub quit: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct LogConfig {
    pub file: Option<PathBuf>,
    pub level: String,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    game: TomlGame,
    #[serde(default)]
    audio: TomlAudio,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    log: TomlLog,
}

#[derive(Deserialize, Debug)]
struct TomlGame {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
    #[serde(default)]
    level: Option<String>,
    #[serde(default = "default_level_width")]
    level_width: usize,
    #[serde(default = "default_level_height")]
    level_height: usize,
}

#[derive(Deserialize, Debug)]
struct TomlAudio {
    #[serde(default = "default_sound")]
    enabled: bool,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_quit")]
    quit: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct TomlLog {
    #[serde(default)]
    file: Option<String>,
    #[serde(default = "default_log_level")]
    level: String,
}

// ── Defaults ──

fn default_tick_rate() -> u64 { 100 }
fn default_level_width() -> usize { BUILTIN_DIMS.width }   // 59 tiles + newline
fn default_level_height() -> usize { BUILTIN_DIMS.height }
fn default_sound() -> bool { true }
fn default_quit() -> Vec<String> { vec!["Select".into()] }
fn default_log_level() -> String { "warn".into() }

impl Default for TomlGame {
    fn default() -> Self {
        TomlGame {
            tick_rate_ms: default_tick_rate(),
            level: None,
            level_width: default_level_width(),
            level_height: default_level_height(),
        }
    }
}

impl Default for TomlAudio {
    fn default() -> Self {
        TomlAudio { enabled: default_sound() }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad { quit: default_quit() }
    }
}

impl Default for TomlLog {
    fn default() -> Self {
        TomlLog { file: None, level: default_log_level() }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `explicit`, or search for `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load(explicit: Option<&Path>) -> Self {
        let search_dirs = candidate_dirs();
        let mut warnings = vec![];

        let toml_cfg = match explicit {
            Some(path) => load_file(path, &mut warnings),
            None => search_toml(&search_dirs, &mut warnings),
        };

        let mut cfg = Self::from_toml(toml_cfg, &search_dirs);
        cfg.warnings = warnings;
        cfg
    }

    /// Parse a config document directly. Relative level paths are kept as is.
    #[cfg(test)]
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        let toml_cfg = toml::from_str::<TomlConfig>(text)?;
        Ok(Self::from_toml(toml_cfg, &[]))
    }

    fn from_toml(toml_cfg: TomlConfig, search_dirs: &[PathBuf]) -> Self {
        let level = toml_cfg.game.level.as_deref().map(|s| resolve_path(s, search_dirs));
        let log_file = toml_cfg.log.file.map(PathBuf::from);

        GameConfig {
            tick_rate_ms: toml_cfg.game.tick_rate_ms.max(1),
            level,
            dims: LevelDims {
                width: toml_cfg.game.level_width,
                height: toml_cfg.game.level_height,
            },
            sound: toml_cfg.audio.enabled,
            gamepad: GamepadConfig { quit: toml_cfg.gamepad.quit },
            log: LogConfig { file: log_file, level: toml_cfg.log.level },
            warnings: vec![],
        }
    }
}

/// Absolute paths are used as is; relative ones are looked up in the
/// candidate dirs and fall back to CWD-relative.
fn resolve_path(s: &str, search_dirs: &[PathBuf]) -> PathBuf {
    let p = PathBuf::from(s);
    if p.is_absolute() {
        return p;
    }
    search_dirs.iter()
        .map(|d| d.join(&p))
        .find(|c| c.is_file())
        .unwrap_or(p)
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
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

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

fn load_file(path: &Path, warnings: &mut Vec<String>) -> TomlConfig {
    match std::fs::read_to_string(path) {
        Ok(text) => match toml::from_str::<TomlConfig>(&text) {
            Ok(cfg) => cfg,
            Err(e) => {
                warnings.push(format!("{} parse error, using defaults: {e}", path.display()));
                TomlConfig::default()
            }
        },
        Err(e) => {
            warnings.push(format!("could not read {}: {e}", path.display()));
            TomlConfig::default()
        }
    }
}

/// Search for config.toml in candidate directories.
fn search_toml(search_dirs: &[PathBuf], warnings: &mut Vec<String>) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            return load_file(&path, warnings);
        }
    }
    TomlConfig::default()
}
