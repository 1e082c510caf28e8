//! Request builder for the App Store Connect Analytics API.
//!
//! [`QueryBuilder`] assembles the JSON body and endpoint URL for the time-series,
//! app-list, dimension-values and sources-list reports. Sending the request is left
//! to the caller.

pub mod config;
pub mod error;
pub mod query;

// Convenient re-exports
pub use config::{QuerySettings, TimeAgoFormat};
pub use error::{QueryError, SettingsError};
pub use query::{
    AnalyticsRequest, AppId, AppListOptions, DimensionFilter, DimensionValuesOptions, Frequency, Group,
    MetricsOptions, OperationType, QueryBuilder, Rank, ReportConfig, SourcesOptions,
};
