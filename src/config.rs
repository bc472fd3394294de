//! Runtime configuration.
//!
//! Loaded from a TOML file, then overridden from the environment:
//!
//! | key        | env override            | default          |
//! |------------|-------------------------|------------------|
//! | `data_dir` | `GROUP_EDITOR_DATA_DIR` | `data`           |
//! | `bind`     | `GROUP_EDITOR_BIND`     | `127.0.0.1:5000` |
//! | `log_dir`  | —                       | OS data dir      |
//!
//! The file is `$GROUP_EDITOR_CONFIG` when set, else `group-editor.toml` in
//! the working directory when it exists, else none (built-in defaults).

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::error::AppError;

pub const CONFIG_ENV: &str = "GROUP_EDITOR_CONFIG";
pub const DATA_DIR_ENV: &str = "GROUP_EDITOR_DATA_DIR";
pub const BIND_ENV: &str = "GROUP_EDITOR_BIND";
pub const DEFAULT_CONFIG_FILE: &str = "group-editor.toml";

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_bind() -> String {
    "127.0.0.1:5000".to_string()
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct Config {
    /// Directory holding the group `.json` files.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Socket address the HTTP server listens on.
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Directory for `group-editor.log`.
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            bind: default_bind(),
            log_dir: None,
        }
    }
}

impl Config {
    /// Resolve the configuration file, apply environment overrides and
    /// validate the result.
    pub fn load() -> Result<Self, AppError> {
        let explicit = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let mut cfg = match explicit {
            Some(path) => Self::from_file(&path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        cfg.apply_overrides(
            std::env::var_os(DATA_DIR_ENV).map(PathBuf::from),
            std::env::var(BIND_ENV).ok(),
        );
        validate(&cfg)?;
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> Result<Self, AppError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;
        parse(&text)
    }

    fn apply_overrides(&mut self, data_dir: Option<PathBuf>, bind: Option<String>) {
        if let Some(dir) = data_dir.filter(|d| !d.as_os_str().is_empty()) {
            self.data_dir = dir;
        }
        if let Some(bind) = bind.filter(|b| !b.trim().is_empty()) {
            self.bind = bind.trim().to_string();
        }
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, AppError> {
        self.bind
            .parse()
            .map_err(|e| AppError::Config(format!("bind \"{}\" is not a socket address: {e}", self.bind)))
    }

    /// `log_dir`, or `<OS data dir>/group-editor` when unset:
    ///   Linux    ~/.local/share/group-editor
    ///   macOS    ~/Library/Application Support/group-editor
    ///   Windows  %LOCALAPPDATA%\group-editor
    pub fn log_dir(&self) -> PathBuf {
        self.log_dir.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_default()
                .join("group-editor")
        })
    }
}

/// Parse a TOML string into a [`Config`], running validation.
pub fn parse(toml_str: &str) -> Result<Config, AppError> {
    let cfg: Config = toml::from_str(toml_str).map_err(|e| AppError::Config(e.to_string()))?;
    validate(&cfg)?;
    Ok(cfg)
}

fn validate(cfg: &Config) -> Result<(), AppError> {
    if cfg.data_dir.as_os_str().is_empty() {
        return Err(AppError::Config("data_dir must not be empty".to_string()));
    }
    cfg.bind_addr()?;
    Ok(())
}
