use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use timeline_publish::publisher::{DEFAULT_MAX_PAYLOAD_BYTES, DestinationOverride, PublisherSettings};
use timeline_publish::queue::upstash::DEFAULT_LIST_KEY;

/// Main configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub log_level: LogLevel,
    pub queue: QueueConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Off,
}

impl LogLevel {
    pub fn as_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Trace => log::LevelFilter::Trace,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Off => log::LevelFilter::Off,
        }
    }
}

/// Which transport carries events
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QueueKind {
    #[default]
    Sqs,
    Upstash,
}

impl std::str::FromStr for QueueKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sqs" => Ok(QueueKind::Sqs),
            "upstash" => Ok(QueueKind::Upstash),
            other => Err(format!("unknown queue kind '{}' (expected sqs or upstash)", other)),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct QueueConfig {
    pub kind: QueueKind,
    /// SQS queue URL or Upstash REST endpoint
    pub url: Option<String>,
    /// AWS region; SQS falls back to us-east-1
    pub region: Option<String>,
    /// Upstash bearer token; `$VAR` references are expanded
    pub token: Option<String>,
    /// Redis list the consumer drains (Upstash only)
    pub list_key: String,
    /// Reject payloads larger than this before sending
    pub max_payload_bytes: Option<usize>,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            kind: QueueKind::default(),
            url: None,
            region: None,
            token: None,
            list_key: DEFAULT_LIST_KEY.to_string(),
            max_payload_bytes: Some(DEFAULT_MAX_PAYLOAD_BYTES),
        }
    }
}

impl Config {
    /// Load configuration with fallback chain, then apply environment overrides
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        let mut config = Self::load_file(config_path)?;
        config.apply_env(|name| std::env::var(name).ok());
        config.expand_values();
        Ok(config)
    }

    fn load_file(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, it has to load
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        if let Ok(env_path) = std::env::var("TIMELINE_CONFIG") {
            let path = PathBuf::from(env_path);
            if path.exists() {
                match Self::load_from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from TIMELINE_CONFIG: {}", e);
                    }
                }
            }
        }

        let path = Self::config_dir().join("timeline.yaml");
        if path.exists() {
            match Self::load_from_file(&path) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load config from {}: {}", path.display(), e);
                }
            }
        }

        // Try ./timeline.yaml (for development)
        let local_config = PathBuf::from("timeline.yaml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load local config: {}", e);
                }
            }
        }

        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Environment variables override values from the file
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.is_empty());

        if let Some(kind) = var("TIMELINE_QUEUE_KIND") {
            match kind.parse() {
                Ok(kind) => self.queue.kind = kind,
                Err(e) => log::warn!("Ignoring TIMELINE_QUEUE_KIND: {}", e),
            }
        }
        if let Some(url) = var("TIMELINE_QUEUE_URL") {
            self.queue.url = Some(url);
        }
        if let Some(region) = var("TIMELINE_REGION").or_else(|| var("AWS_REGION")) {
            self.queue.region = Some(region);
        }
        if let Some(token) = var("TIMELINE_QUEUE_TOKEN") {
            self.queue.token = Some(token);
        }
    }

    fn expand_values(&mut self) {
        for value in [&mut self.queue.url, &mut self.queue.token].into_iter().flatten() {
            *value = Self::expand_value(value);
        }
    }

    /// Expand `~` and `$VAR` references, leaving the value as-is if a variable is unset
    pub fn expand_value(value: &str) -> String {
        match shellexpand::full(value) {
            Ok(expanded) => expanded.into_owned(),
            Err(e) => {
                log::warn!("Failed to expand config value: {}", e);
                value.to_string()
            }
        }
    }

    /// Directory holding `timeline.yaml`
    pub fn config_dir() -> PathBuf {
        dirs::config_dir().unwrap_or_else(|| PathBuf::from(".")).join("timeline")
    }

    /// Defaults handed to the publisher
    pub fn publisher_settings(&self) -> PublisherSettings {
        PublisherSettings {
            destination: DestinationOverride {
                url: self.queue.url.clone(),
                region: self.queue.region.clone(),
            },
            max_payload_bytes: self.queue.max_payload_bytes,
        }
    }

    /// Copy safe to print
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if config.queue.token.is_some() {
            config.queue.token = Some("********".to_string());
        }
        config
    }
}
