use crate::adapters::bluesky::{Credentials, DEFAULT_SERVICE};
use crate::core::normalizer::{DEFAULT_JPEG_QUALITY, DEFAULT_SIZE_THRESHOLD};
use crate::core::scheduler::Schedule;
use crate::core::selector::DEFAULT_MAX_ATTEMPTS;
use crate::utils::error::{BotError, Result};
use crate::utils::logger::LogFormat;
use crate::utils::validation::{validate_path, validate_range, validate_url, Validate};
use chrono::NaiveTime;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_SOURCE_DIR: &str = "/source_dir";
pub const DEFAULT_DESTINATION_DIR: &str = "/destination_dir";
const DEFAULT_INTERVAL_SECS: u64 = 24 * 60 * 60;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Everything the bot needs, resolved once at startup.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub credentials: Credentials,
    pub service: String,
    pub source_dir: PathBuf,
    pub destination_dir: PathBuf,
    pub schedule: Schedule,
    pub run_on_start: bool,
    pub max_attempts: usize,
    pub size_threshold_bytes: u64,
    pub jpeg_quality: u8,
    pub request_timeout: Duration,
    pub log_format: LogFormat,
}

impl BotConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key/value source, e.g. a map in tests.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        // missing credentials surface later as a non-fatal login failure
        let identifier = get("BLUESKY_USERNAME").unwrap_or_default();
        let password = get("BLUESKY_PASSWORD").unwrap_or_default();

        let schedule = match get("BOT_DAILY_AT") {
            Some(at) => Schedule::Daily(NaiveTime::parse_from_str(at.trim(), "%H:%M").map_err(
                |e| BotError::InvalidConfigValueError {
                    field: "BOT_DAILY_AT".to_string(),
                    value: at.clone(),
                    reason: format!("expected HH:MM ({})", e),
                },
            )?),
            None => Schedule::Interval(Duration::from_secs(parse_or(
                "BOT_INTERVAL_SECS",
                get("BOT_INTERVAL_SECS"),
                DEFAULT_INTERVAL_SECS,
            )?)),
        };

        Ok(Self {
            credentials: Credentials {
                identifier,
                password,
            },
            service: get("BLUESKY_SERVICE").unwrap_or_else(|| DEFAULT_SERVICE.to_string()),
            source_dir: get("DIRECTORY_SOURCE")
                .unwrap_or_else(|| DEFAULT_SOURCE_DIR.to_string())
                .into(),
            destination_dir: get("DIRECTORY_DESTINATION")
                .unwrap_or_else(|| DEFAULT_DESTINATION_DIR.to_string())
                .into(),
            schedule,
            run_on_start: parse_bool("BOT_RUN_ON_START", get("BOT_RUN_ON_START"))?,
            max_attempts: parse_or("BOT_MAX_ATTEMPTS", get("BOT_MAX_ATTEMPTS"), DEFAULT_MAX_ATTEMPTS)?,
            size_threshold_bytes: parse_or(
                "BOT_SIZE_THRESHOLD_BYTES",
                get("BOT_SIZE_THRESHOLD_BYTES"),
                DEFAULT_SIZE_THRESHOLD,
            )?,
            jpeg_quality: parse_or("BOT_JPEG_QUALITY", get("BOT_JPEG_QUALITY"), DEFAULT_JPEG_QUALITY)?,
            request_timeout: Duration::from_secs(parse_or(
                "BOT_REQUEST_TIMEOUT_SECS",
                get("BOT_REQUEST_TIMEOUT_SECS"),
                DEFAULT_REQUEST_TIMEOUT_SECS,
            )?),
            log_format: match get("BOT_LOG_FORMAT") {
                Some(raw) => raw.parse().map_err(|reason| BotError::InvalidConfigValueError {
                    field: "BOT_LOG_FORMAT".to_string(),
                    value: raw.clone(),
                    reason,
                })?,
                None => LogFormat::default(),
            },
        })
    }
}

fn parse_or<T>(field: &str, raw: Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| BotError::InvalidConfigValueError {
                field: field.to_string(),
                value: raw.clone(),
                reason: e.to_string(),
            }),
    }
}

fn parse_bool(field: &str, raw: Option<String>) -> Result<bool> {
    match raw.as_deref().map(|v| v.trim().to_ascii_lowercase()) {
        None => Ok(false),
        Some(v) if matches!(v.as_str(), "1" | "true" | "yes" | "on") => Ok(true),
        Some(v) if matches!(v.as_str(), "0" | "false" | "no" | "off") => Ok(false),
        Some(v) => Err(BotError::InvalidConfigValueError {
            field: field.to_string(),
            value: v,
            reason: "expected true or false".to_string(),
        }),
    }
}

impl Validate for BotConfig {
    fn validate(&self) -> Result<()> {
        if !self.credentials.is_complete() {
            tracing::warn!("BLUESKY_USERNAME or BLUESKY_PASSWORD is not set, posting will fail");
        }
        validate_url("BLUESKY_SERVICE", &self.service)?;
        validate_path("DIRECTORY_SOURCE", &self.source_dir.to_string_lossy())?;
        validate_path("DIRECTORY_DESTINATION", &self.destination_dir.to_string_lossy())?;

        if self.source_dir == self.destination_dir {
            return Err(BotError::InvalidConfigValueError {
                field: "DIRECTORY_DESTINATION".to_string(),
                value: self.destination_dir.display().to_string(),
                reason: "must differ from DIRECTORY_SOURCE".to_string(),
            });
        }

        if let Schedule::Interval(every) = self.schedule {
            validate_range("BOT_INTERVAL_SECS", every.as_secs(), 1, u64::MAX)?;
        }
        validate_range("BOT_MAX_ATTEMPTS", self.max_attempts, 1, DEFAULT_MAX_ATTEMPTS)?;
        validate_range("BOT_SIZE_THRESHOLD_BYTES", self.size_threshold_bytes, 1, u64::MAX)?;
        validate_range("BOT_JPEG_QUALITY", self.jpeg_quality, 1, 100)?;
        validate_range("BOT_REQUEST_TIMEOUT_SECS", self.request_timeout.as_secs(), 1, 3600)?;

        tracing::info!("✅ Configuration validation passed");
        Ok(())
    }
}
