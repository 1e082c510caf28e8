use std::env;
use std::fmt;
use std::str::FromStr;

use crate::error::SettingsError;

/// Analytics endpoint used by the App Store Connect web frontend.
pub const DEFAULT_API_BASE_URL: &str = "https://analytics.itunes.apple.com/analytics/api/v1";

pub const API_URL_ENV: &str = "ASC_ANALYTICS_API_URL";
pub const TIME_AGO_FORMAT_ENV: &str = "ASC_TIME_AGO_FORMAT";

/// How `time_ago` renders the start timestamp.
///
/// `Legacy` reproduces the historical `YYYY-MM-DD%00:00:000Z` start time byte for byte.
/// The `%` separator is a known defect; it is kept as the default because existing
/// consumers replay these payloads verbatim against the live API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeAgoFormat {
    #[default]
    Legacy,
    Corrected,
}

impl TimeAgoFormat {
    pub fn start_separator(&self) -> char {
        match self {
            Self::Legacy => '%',
            Self::Corrected => 'T',
        }
    }
}

impl fmt::Display for TimeAgoFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Legacy => write!(f, "legacy"),
            Self::Corrected => write!(f, "corrected"),
        }
    }
}

impl FromStr for TimeAgoFormat {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "legacy" => Ok(Self::Legacy),
            "corrected" => Ok(Self::Corrected),
            _ => Err(SettingsError::UnknownTimeAgoFormat {
                key: TIME_AGO_FORMAT_ENV,
                value: s.to_string(),
            }),
        }
    }
}

/// Settings shared by every request a builder assembles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySettings {
    pub api_base_url: String,
    pub time_ago_format: TimeAgoFormat,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            time_ago_format: TimeAgoFormat::default(),
        }
    }
}

impl QuerySettings {
    /// Load settings from the process environment, falling back to defaults.
    ///
    /// A `.env` file in the working directory is read first if one exists.
    pub fn from_env() -> Result<Self, SettingsError> {
        // Missing .env is fine
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`QuerySettings::from_env`] but reads values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(url) = lookup(API_URL_ENV) {
            let url = url.trim();
            if url.is_empty() {
                return Err(SettingsError::EmptyValue { key: API_URL_ENV });
            }
            settings.api_base_url = url.trim_end_matches('/').to_string();
        }

        if let Some(format) = lookup(TIME_AGO_FORMAT_ENV) {
            settings.time_ago_format = format.parse()?;
        }

        Ok(settings)
    }

    #[must_use]
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    #[must_use]
    pub const fn with_time_ago_format(mut self, format: TimeAgoFormat) -> Self {
        self.time_ago_format = format;
        self
    }
}
