//! Per-operation inputs. Field names deserialize from the camelCase keys the
//! analytics API uses, so a JSON object written for the wire can be fed in directly.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::models::{AppId, DimensionFilter, Group};

/// Inputs for a time-series request. `measures` is required.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[schemars(title = "Metrics Options", description = "Options for a /data/time-series request")]
pub struct MetricsOptions {
    /// Measures to fetch, e.g. `units`, `pageViewCount`
    #[serde(default)]
    pub measures: Option<Vec<String>>,
    #[serde(default)]
    pub group: Option<Group>,
    #[serde(default)]
    pub dimension_filters: Option<Vec<DimensionFilter>>,
}

impl MetricsOptions {
    pub fn new<I, S>(measures: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            measures: Some(measures.into_iter().map(Into::into).collect()),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_group(mut self, group: Group) -> Self {
        self.group = Some(group);
        self
    }

    #[must_use]
    pub fn with_dimension_filters(mut self, filters: Vec<DimensionFilter>) -> Self {
        self.dimension_filters = Some(filters);
        self
    }
}

/// Inputs for an app-list request. Both fields are required.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[schemars(title = "App List Options", description = "Options for a /data/app-list request")]
pub struct AppListOptions {
    #[serde(default)]
    pub measures: Option<Vec<String>>,
    /// Apps to list; replaces the app the builder was created for
    #[serde(default)]
    pub adam_id: Option<Vec<AppId>>,
}

impl AppListOptions {
    pub fn new<M, S, A, T>(measures: M, adam_id: A) -> Self
    where
        M: IntoIterator<Item = S>,
        S: Into<String>,
        A: IntoIterator<Item = T>,
        T: Into<AppId>,
    {
        Self {
            measures: Some(measures.into_iter().map(Into::into).collect()),
            adam_id: Some(adam_id.into_iter().map(Into::into).collect()),
        }
    }
}

/// Inputs for a dimension-values request. `dimensions` is required.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[schemars(title = "Dimension Values Options", description = "Options for a /data/dimension-values request")]
pub struct DimensionValuesOptions {
    #[serde(default)]
    pub dimensions: Option<Vec<String>>,
    /// Single measure used to rank the returned values
    #[serde(default)]
    pub measure: Option<String>,
    #[serde(default)]
    pub dimension_filters: Option<Vec<DimensionFilter>>,
}

impl DimensionValuesOptions {
    pub fn new<I, S>(dimensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            dimensions: Some(dimensions.into_iter().map(Into::into).collect()),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_measure(mut self, measure: impl Into<String>) -> Self {
        self.measure = Some(measure.into());
        self
    }

    #[must_use]
    pub fn with_dimension_filters(mut self, filters: Vec<DimensionFilter>) -> Self {
        self.dimension_filters = Some(filters);
        self
    }
}

/// Overrides for a sources-list request. Every present field replaces the held value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[schemars(title = "Sources Options", description = "Options for a /data/sources/list request")]
pub struct SourcesOptions {
    #[serde(default)]
    pub limit: Option<u32>,
    /// Source dimension, `domainReferer` unless overridden
    #[serde(default)]
    pub dimension: Option<String>,
    #[serde(default)]
    pub measures: Option<Vec<String>>,
    #[serde(default)]
    pub dimension_filters: Option<Vec<DimensionFilter>>,
    #[serde(default)]
    pub adam_id: Option<Vec<AppId>>,
}

impl SourcesOptions {
    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn with_dimension(mut self, dimension: impl Into<String>) -> Self {
        self.dimension = Some(dimension.into());
        self
    }

    #[must_use]
    pub fn with_measures<I, S>(mut self, measures: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.measures = Some(measures.into_iter().map(Into::into).collect());
        self
    }
}
