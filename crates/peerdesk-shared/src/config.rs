use serde::Deserialize;
use std::io;
use std::path::PathBuf;

use crate::routes::DEFAULT_FALLBACK_PATH;

/// Return XDG_DATA_HOME/peerdesk.
/// Built by hand instead of through the `dirs` crate so macOS also lands in ~/.local/share.
pub fn data_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
        PathBuf::from(xdg).join("peerdesk")
    } else {
        home_dir().join(".local").join("share").join("peerdesk")
    }
}

/// Return the path to the delivery journal.
pub fn db_path() -> PathBuf {
    data_dir().join("journal.db")
}

pub fn log_path() -> PathBuf {
    data_dir().join("peerdesk.log")
}

/// Return XDG_CONFIG_HOME/peerdesk.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        PathBuf::from(xdg).join("peerdesk")
    } else {
        home_dir().join(".config").join("peerdesk")
    }
}

fn home_dir() -> PathBuf {
    match std::env::var("HOME") {
        Ok(home) => PathBuf::from(home),
        Err(_) => {
            log::warn!("HOME not set, using current directory");
            PathBuf::from(".")
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    pub editor: Option<String>,
    #[serde(default)]
    pub routes: RoutesConfig,
    #[serde(default)]
    pub journal: JournalConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoutesConfig {
    /// Destination for screens this build does not know.
    #[serde(default = "default_fallback")]
    pub fallback: String,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            fallback: default_fallback(),
        }
    }
}

fn default_fallback() -> String {
    DEFAULT_FALLBACK_PATH.to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct JournalConfig {
    #[serde(default = "default_journal_enabled")]
    pub enabled: bool,
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            enabled: default_journal_enabled(),
        }
    }
}

fn default_journal_enabled() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl LogConfig {
    pub fn level_filter(&self) -> log::LevelFilter {
        self.level.parse().unwrap_or_else(|_| {
            log::warn!("Unknown log level '{}', using info", self.level);
            log::LevelFilter::Info
        })
    }
}

/// Return the path to config.toml.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Load config.toml. Return defaults if the file is missing or fails to parse.
pub fn load_config() -> AppConfig {
    let path = config_path();
    match std::fs::read_to_string(&path) {
        Ok(content) => toml::from_str(&content).unwrap_or_else(|e| {
            log::warn!("Failed to parse config.toml: {}, using defaults", e);
            AppConfig::default()
        }),
        Err(_) => AppConfig::default(),
    }
}

/// Default config.toml template.
fn default_config_template() -> &'static str {
    r#"# peerdesk configuration

# Editor to open when running `peerdesk config`
# Falls back to $EDITOR environment variable, then vim
# editor = "vim"

# Notification deep links
[routes]
# Where notifications for unknown screens land (default: /home)
# fallback = "/home"

# Delivery journal (SQLite, under $XDG_DATA_HOME/peerdesk)
[journal]
# Record presented/suppressed/navigated/dropped notifications (default: true)
# enabled = true

[log]
# error, warn, info, debug, trace (default: info)
# level = "info"
"#
}

/// Create config.toml with the default template if it does not exist. Return its path.
pub fn ensure_config_file() -> io::Result<PathBuf> {
    let path = config_path();
    if !path.exists() {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, default_config_template())?;
    }
    Ok(path)
}

/// Resolve the editor to use.
/// Priority: config.toml `editor` -> $EDITOR env var -> vim.
pub fn resolve_editor() -> String {
    let config = load_config();
    if let Some(ref editor) = config.editor {
        if !editor.is_empty() {
            return editor.clone();
        }
    }
    if let Ok(editor) = std::env::var("EDITOR") {
        if !editor.is_empty() {
            return editor;
        }
    }
    "vim".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = AppConfig::default();
        assert_eq!(config.routes.fallback, "/home");
        assert!(config.journal.enabled);
        assert_eq!(config.log.level_filter(), log::LevelFilter::Info);
    }

    #[test]
    fn parse_custom_fallback() {
        let toml_str = r#"
[routes]
fallback = "/(tabs)/explore"
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.routes.fallback, "/(tabs)/explore");
        assert!(config.journal.enabled);
    }

    #[test]
    fn parse_journal_and_log() {
        let toml_str = r#"
[journal]
enabled = false

[log]
level = "debug"
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert!(!config.journal.enabled);
        assert_eq!(config.log.level_filter(), log::LevelFilter::Debug);
        assert_eq!(config.routes.fallback, "/home");
    }

    #[test]
    fn unknown_log_level_falls_back_to_info() {
        let config = LogConfig {
            level: "chatty".to_string(),
        };
        assert_eq!(config.level_filter(), log::LevelFilter::Info);
    }

    #[test]
    fn template_parses_to_defaults() {
        let config: AppConfig = toml::from_str(default_config_template()).unwrap();
        assert_eq!(config.routes.fallback, "/home");
        assert!(config.journal.enabled);
        assert_eq!(config.editor, None);
    }
}
