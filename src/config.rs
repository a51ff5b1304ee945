use crate::error::{AppError, Result};
use clap::ValueEnum;
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use ::config::builder::{ConfigBuilder, DefaultState};
use ::config::{Config as RawConfig, Environment, File};

/// Hard ceiling on the number of ranked entries a run keeps.
pub const MAX_ENTRIES: usize = 10;

const DEFAULT_ENDPOINT: &str = "https://www.douyin.com/aweme/v1/web/hot/search/list/";
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
const DEFAULT_REFERER: &str = "https://www.douyin.com/discover";
const DEFAULT_DETAIL_BASE_URL: &str = "https://www.douyin.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Write a dated Markdown report and print a short summary.
    #[default]
    Markdown,
    /// Print the ranked list to stdout only.
    Console,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HttpConfig {
    pub endpoint: String,
    pub user_agent: String,
    pub referer: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct FetcherConfig {
    pub limit: usize,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ReportConfig {
    pub mode: OutputMode,
    pub output_dir: PathBuf,
    pub detail_base_url: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct MarkdownConfig {
    pub include_cover: bool,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub http: HttpConfig,
    pub fetcher: FetcherConfig,
    pub report: ReportConfig,
    pub markdown: MarkdownConfig,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from("config")
    }

    /// Loads `<name>.{toml,json,...}` if present, then `DOUYIN_*` env overrides.
    pub fn load_from(name: &str) -> Result<Self> {
        Self::from_builder(
            RawConfig::builder()
                .add_source(File::with_name(name).required(false))
                .add_source(env_source()),
        )
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let config = builder
            .build()
            .map_err(|e| AppError::ConfigError(e.to_string()))?;

        let cfg: Self = config
            .try_deserialize()
            .map_err(|e| AppError::ConfigError(e.to_string()))?;

        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<()> {
        if self.http.timeout_secs == 0 {
            return Err(AppError::ConfigError(
                "http.timeout_secs must be > 0".into(),
            ));
        }
        if self.http.endpoint.trim().is_empty() {
            return Err(AppError::ConfigError("http.endpoint must be set".into()));
        }
        if self.fetcher.limit == 0 || self.fetcher.limit > MAX_ENTRIES {
            return Err(AppError::ConfigError(format!(
                "fetcher.limit must be within 1..={}",
                MAX_ENTRIES
            )));
        }
        Ok(())
    }
}

/// `DOUYIN_<SECTION>__<KEY>`, e.g. `DOUYIN_HTTP__TIMEOUT_SECS=5`.
fn env_source() -> Environment {
    Environment::with_prefix("DOUYIN")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

pub static CONFIG: Lazy<Config> = Lazy::new(|| {
    Config::load().unwrap_or_else(|e| {
        eprintln!("Failed to load config, using defaults: {}", e);
        Config::default()
    })
});

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            referer: DEFAULT_REFERER.to_string(),
            timeout_secs: 10,
        }
    }
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self { limit: MAX_ENTRIES }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            mode: OutputMode::default(),
            output_dir: PathBuf::from("."),
            detail_base_url: DEFAULT_DETAIL_BASE_URL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::config::FileFormat;

    fn from_toml(toml: &str) -> Result<Config> {
        Config::from_builder(
            RawConfig::builder().add_source(File::from_str(toml, FileFormat::Toml)),
        )
    }

    fn env(vars: &[(&str, &str)]) -> Environment {
        let map = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<::config::Map<String, String>>();
        env_source().source(Some(map))
    }

    #[test]
    fn defaults_match_upstream_constants() {
        let cfg = Config::default();
        assert_eq!(cfg.http.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(cfg.http.referer, "https://www.douyin.com/discover");
        assert_eq!(cfg.http.timeout(), Duration::from_secs(10));
        assert_eq!(cfg.fetcher.limit, 10);
        assert_eq!(cfg.report.mode, OutputMode::Markdown);
        assert!(!cfg.markdown.include_cover);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let cfg = from_toml("[http]\ntimeout_secs = 3\n\n[report]\nmode = \"console\"\n")
            .unwrap();
        assert_eq!(cfg.http.timeout_secs, 3);
        assert_eq!(cfg.http.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(cfg.report.mode, OutputMode::Console);
        assert_eq!(cfg.fetcher.limit, MAX_ENTRIES);
    }

    #[test]
    fn environment_overrides_file() {
        let cfg = Config::from_builder(
            RawConfig::builder()
                .add_source(File::from_str("[http]\ntimeout_secs = 3\n", FileFormat::Toml))
                .add_source(env(&[
                    ("DOUYIN_HTTP__TIMEOUT_SECS", "5"),
                    ("DOUYIN_REPORT__MODE", "console"),
                    ("OTHER_HTTP__TIMEOUT_SECS", "9"),
                ])),
        )
        .unwrap();

        assert_eq!(cfg.http.timeout_secs, 5);
        assert_eq!(cfg.report.mode, OutputMode::Console);
        assert_eq!(cfg.http.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn environment_values_are_validated() {
        let err = Config::from_builder(
            RawConfig::builder().add_source(env(&[("DOUYIN_FETCHER__LIMIT", "20")])),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
    }

    #[test]
    fn rejects_zero_timeout() {
        let err = from_toml("[http]\ntimeout_secs = 0\n").unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
    }

    #[test]
    fn rejects_limit_outside_range() {
        assert!(from_toml("[fetcher]\nlimit = 0\n").is_err());
        assert!(from_toml("[fetcher]\nlimit = 11\n").is_err());
        assert_eq!(from_toml("[fetcher]\nlimit = 5\n").unwrap().fetcher.limit, 5);
    }

    #[test]
    fn rejects_unknown_output_mode() {
        assert!(from_toml("[report]\nmode = \"html\"\n").is_err());
    }
}
