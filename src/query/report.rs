use serde::Serialize;

use crate::error::QueryError;

use super::models::{AppId, DimensionFilter, Frequency, Group, OperationType};

/// Payload for `/data/time-series`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsConfig {
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub adam_id: Vec<AppId>,
    pub group: Option<Group>,
    pub frequency: Frequency,
    pub dimension_filters: Vec<DimensionFilter>,
    pub measures: Vec<String>,
}

/// Payload for `/data/app-list`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppListConfig {
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub adam_id: Vec<AppId>,
    pub frequency: Frequency,
    pub measures: Vec<String>,
}

/// Payload for `/data/dimension-values`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionValuesConfig {
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub adam_id: Vec<AppId>,
    pub frequency: Frequency,
    pub dimension_filters: Vec<DimensionFilter>,
    pub dimensions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub measure: Option<String>,
}

/// Payload for `/data/sources/list`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourcesConfig {
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub adam_id: Vec<AppId>,
    pub frequency: Frequency,
    pub dimension: String,
    pub limit: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub measures: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dimension_filters: Vec<DimensionFilter>,
}

/// A finalized request body; each variant carries only the keys its report accepts.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReportConfig {
    Metrics(MetricsConfig),
    AppList(AppListConfig),
    DimensionValues(DimensionValuesConfig),
    Sources(SourcesConfig),
}

impl ReportConfig {
    pub fn operation(&self) -> OperationType {
        match self {
            Self::Metrics(_) => OperationType::Metrics,
            Self::AppList(_) => OperationType::AppList,
            Self::DimensionValues(_) => OperationType::DimValues,
            Self::Sources(_) => OperationType::Sources,
        }
    }

    pub fn frequency(&self) -> Frequency {
        match self {
            Self::Metrics(c) => c.frequency,
            Self::AppList(c) => c.frequency,
            Self::DimensionValues(c) => c.frequency,
            Self::Sources(c) => c.frequency,
        }
    }

    pub fn adam_id(&self) -> &[AppId] {
        match self {
            Self::Metrics(c) => &c.adam_id,
            Self::AppList(c) => &c.adam_id,
            Self::DimensionValues(c) => &c.adam_id,
            Self::Sources(c) => &c.adam_id,
        }
    }
}

/// What the transport layer receives: the endpoint URL and the JSON body to post to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsRequest {
    pub operation: OperationType,
    pub url: String,
    #[serde(rename = "payload")]
    pub config: ReportConfig,
}

impl AnalyticsRequest {
    pub fn payload(&self) -> Result<serde_json::Value, QueryError> {
        Ok(serde_json::to_value(&self.config)?)
    }

    pub fn payload_json(&self) -> Result<String, QueryError> {
        Ok(serde_json::to_string(&self.config)?)
    }
}
