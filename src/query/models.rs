use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::QueryError;

/// Report granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    #[default]
    Days,
    Weekly,
    Monthly,
}

impl Frequency {
    pub const ALL: [Frequency; 3] = [Self::Days, Self::Weekly, Self::Monthly];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Days => "days",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }

    /// Parse a frequency, reporting failures against `field`.
    pub fn parse_field(field: &'static str, value: &str) -> Result<Self, QueryError> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == value)
            .ok_or_else(|| QueryError::InvalidEnumValue {
                field,
                value: value.to_string(),
            })
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_field("frequency", s)
    }
}

/// Vendor-assigned app identifier (adamId).
///
/// Written back to the wire in the form it was given, number or string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum AppId {
    Number(u64),
    Text(String),
}

impl AppId {
    /// Numeric when `value` is all digits, text otherwise.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        match value.parse::<u64>() {
            Ok(n) if value.bytes().all(|b| b.is_ascii_digit()) => Self::Number(n),
            _ => Self::Text(value.to_string()),
        }
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for AppId {
    fn from(value: u64) -> Self {
        Self::Number(value)
    }
}

impl From<u32> for AppId {
    fn from(value: u32) -> Self {
        Self::Number(u64::from(value))
    }
}

impl From<&str> for AppId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for AppId {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// The report shape a builder is currently configured for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationType {
    Metrics,
    AppList,
    DimValues,
    Sources,
}

impl OperationType {
    /// Path appended to the API base URL.
    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::Metrics => "/data/time-series",
            Self::AppList => "/data/app-list",
            Self::DimValues => "/data/dimension-values",
            Self::Sources => "/data/sources/list",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Metrics => "metrics",
            Self::AppList => "app_list",
            Self::DimValues => "dim_values",
            Self::Sources => "sources",
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Narrows a report to the given option keys of one dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DimensionFilter {
    /// Dimension to filter on, e.g. `storefront`
    pub dimension_key: String,
    /// Accepted values of that dimension
    pub option_keys: Vec<String>,
}

impl DimensionFilter {
    pub fn new<I, S>(dimension_key: impl Into<String>, option_keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            dimension_key: dimension_key.into(),
            option_keys: option_keys.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Rank {
    Ascending,
    Descending,
}

/// Splits a time-series report into one series per dimension value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub metric: String,
    pub dimension: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<Rank>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl Group {
    pub fn new(metric: impl Into<String>, dimension: impl Into<String>) -> Self {
        Self {
            metric: metric.into(),
            dimension: dimension.into(),
            rank: None,
            limit: None,
        }
    }

    #[must_use]
    pub const fn with_rank(mut self, rank: Rank) -> Self {
        self.rank = Some(rank);
        self
    }

    #[must_use]
    pub const fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}
