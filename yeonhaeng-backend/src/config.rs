use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::Context;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
pub const CONFIG_PATH_ENV: &str = "YEONHAENG_CONFIG";

/// How completions of superseded requests are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StalePolicy {
    /// Every completion is committed, the last one to resolve wins
    #[default]
    LastWriteWins,
    /// Only the most recently issued request may commit
    LatestOnly,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveConfig {
    #[serde(default = "default_relay_url")]
    pub relay_url: String,

    #[serde(default = "default_search_url")]
    pub search_url: String,

    #[serde(default = "default_corpus_scope")]
    pub corpus_scope: String,

    /// The search API reports no page count, so this is a fixed guess
    #[serde(default = "default_total_pages")]
    pub total_pages: u32,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default)]
    pub stale_policy: StalePolicy,

    #[serde(default = "default_keyword")]
    pub default_keyword: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_export_dir")]
    pub dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Launch the system browser for cross-reference links
    #[serde(default = "default_open_browser")]
    pub open_browser: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,

    #[serde(default)]
    pub archive: ArchiveConfig,

    #[serde(default)]
    pub export: ExportConfig,

    #[serde(default)]
    pub viewer: ViewerConfig,
}

fn default_relay_url() -> String {
    "https://api.allorigins.win/raw?url=".to_string()
}

fn default_search_url() -> String {
    "http://db.itkc.or.kr/openapi/search".to_string()
}

fn default_corpus_scope() -> String {
    "ITKC_GO_1422A".to_string()
}

fn default_total_pages() -> u32 {
    5
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    "Mozilla/5.0 Yeonhaeng/0.1".to_string()
}

fn default_keyword() -> String {
    "馬".to_string()
}

fn default_export_dir() -> PathBuf {
    PathBuf::from("exports")
}

fn default_open_browser() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            relay_url: default_relay_url(),
            search_url: default_search_url(),
            corpus_scope: default_corpus_scope(),
            total_pages: default_total_pages(),
            request_timeout_secs: default_request_timeout_secs(),
            user_agent: default_user_agent(),
            stale_policy: StalePolicy::default(),
            default_keyword: default_keyword(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dir: default_export_dir(),
        }
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            open_browser: default_open_browser(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_dir: default_log_dir(),
            archive: ArchiveConfig::default(),
            export: ExportConfig::default(),
            viewer: ViewerConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(content)?;
        Ok(config)
    }
}

pub static CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// Resolve the config path from `YEONHAENG_CONFIG`, falling back to `config.toml`.
pub fn config_path() -> PathBuf {
    std::env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Load the process-wide configuration.
///
/// A missing file yields the built-in defaults; a file that exists but does
/// not parse is an error. Returns whether a file was actually read.
pub fn read_config() -> anyhow::Result<bool> {
    let path = config_path();
    let (config, from_file) = if path.exists() {
        (AppConfig::from_file(&path)?, true)
    } else {
        (AppConfig::default(), false)
    };

    CONFIG
        .set(config)
        .map_err(|_| anyhow::anyhow!("Configuration already loaded"))?;

    Ok(from_file)
}

/// The loaded configuration, or the defaults if `read_config` was never called.
pub fn config() -> &'static AppConfig {
    CONFIG.get_or_init(AppConfig::default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.archive.corpus_scope, "ITKC_GO_1422A");
        assert_eq!(config.archive.total_pages, 5);
        assert_eq!(config.archive.stale_policy, StalePolicy::LastWriteWins);
        assert_eq!(config.archive.default_keyword, "馬");
        assert!(config.viewer.open_browser);
    }

    #[test]
    fn test_partial_config_overrides() {
        let config = AppConfig::from_toml(
            r#"
            log_level = "debug"

            [archive]
            total_pages = 8
            stale_policy = "latest_only"

            [export]
            dir = "out"
            "#,
        )
        .unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.archive.total_pages, 8);
        assert_eq!(config.archive.stale_policy, StalePolicy::LatestOnly);
        assert_eq!(config.archive.relay_url, "https://api.allorigins.win/raw?url=");
        assert_eq!(config.export.dir, PathBuf::from("out"));
    }

    #[test]
    fn test_invalid_policy_is_error() {
        assert!(AppConfig::from_toml("[archive]\nstale_policy = \"sometimes\"").is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[viewer]\nopen_browser = false\n").unwrap();
        let config = AppConfig::from_file(&path).unwrap();
        assert!(!config.viewer.open_browser);

        assert!(AppConfig::from_file(dir.path().join("missing.toml")).is_err());
    }
}
