//! `QueryBuilder` accumulates request state for one analytics report.
//!
//! The four operation setters share one pool of request state. Switching operation
//! drops a fixed set of fields per operation, and [`QueryBuilder::build`] projects the
//! pool onto the typed config of the active operation.

use chrono::{Local, NaiveDate};
use tracing::{debug, info, instrument, warn};

use crate::config::{QuerySettings, TimeAgoFormat};
use crate::error::QueryError;

use super::dates;
use super::models::{AppId, DimensionFilter, Frequency, Group, OperationType};
use super::options::{AppListOptions, DimensionValuesOptions, MetricsOptions, SourcesOptions};
use super::report::{
    AnalyticsRequest, AppListConfig, DimensionValuesConfig, MetricsConfig, ReportConfig,
    SourcesConfig,
};

pub const DEFAULT_SOURCES_LIMIT: u32 = 200;
pub const DEFAULT_SOURCES_DIMENSION: &str = "domainReferer";

/// Fields an operation switch can drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    AdamId,
    Group,
    DimensionFilters,
    Limit,
    Dimension,
}

#[derive(Debug, Clone, PartialEq)]
struct RequestState {
    start_time: Option<String>,
    end_time: Option<String>,
    adam_id: Option<Vec<AppId>>,
    group: Option<Group>,
    frequency: Frequency,
    dimension_filters: Vec<DimensionFilter>,
    measures: Vec<String>,
    dimensions: Vec<String>,
    dimension: Option<String>,
    measure: Option<String>,
    limit: Option<u32>,
}

impl RequestState {
    fn new(app_id: AppId) -> Self {
        Self {
            start_time: None,
            end_time: None,
            adam_id: Some(vec![app_id]),
            group: None,
            frequency: Frequency::default(),
            dimension_filters: Vec::new(),
            measures: Vec::new(),
            dimensions: Vec::new(),
            dimension: None,
            measure: None,
            limit: None,
        }
    }

    fn clear(&mut self, field: Field) -> bool {
        match field {
            Field::AdamId => self.adam_id.take().is_some(),
            Field::Group => self.group.take().is_some(),
            Field::DimensionFilters => !std::mem::take(&mut self.dimension_filters).is_empty(),
            Field::Limit => self.limit.take().is_some(),
            Field::Dimension => self.dimension.take().is_some(),
        }
    }
}

/// Builds requests against the App Store Connect analytics API for one app.
///
/// ```
/// use asc_analytics_query::{MetricsOptions, QueryBuilder};
///
/// # fn main() -> Result<(), asc_analytics_query::QueryError> {
/// let mut query = QueryBuilder::new("1234567890");
/// query
///     .metrics(MetricsOptions::new(["units"]))?
///     .date_range("2024-01-01", Some("2024-01-31"))?
///     .set_frequency("weekly")?;
///
/// let request = query.build()?;
/// assert!(request.url.ends_with("/data/time-series"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    app_id: AppId,
    settings: QuerySettings,
    operation: Option<OperationType>,
    state: RequestState,
}

impl QueryBuilder {
    pub fn new(app_id: impl Into<AppId>) -> Self {
        Self::with_settings(app_id, QuerySettings::default())
    }

    pub fn with_settings(app_id: impl Into<AppId>, settings: QuerySettings) -> Self {
        let app_id = app_id.into();
        debug!(app_id = %app_id, base_url = %settings.api_base_url, "Creating query builder");
        Self {
            state: RequestState::new(app_id.clone()),
            app_id,
            settings,
            operation: None,
        }
    }

    pub fn app_id(&self) -> &AppId {
        &self.app_id
    }

    pub fn settings(&self) -> &QuerySettings {
        &self.settings
    }

    /// The operation selected by the most recent operation setter.
    pub fn operation(&self) -> Option<OperationType> {
        self.operation
    }

    pub fn frequency_value(&self) -> Frequency {
        self.state.frequency
    }

    pub fn start_time(&self) -> Option<&str> {
        self.state.start_time.as_deref()
    }

    pub fn end_time(&self) -> Option<&str> {
        self.state.end_time.as_deref()
    }

    fn select(&mut self, operation: OperationType, dropped: &[Field]) {
        if self.operation != Some(operation) {
            debug!(from = ?self.operation, to = %operation, "Switching operation");
        }
        self.operation = Some(operation);
        for field in dropped {
            if self.state.clear(*field) {
                debug!(field = ?field, operation = %operation, "Dropped field not used by operation");
            }
        }
    }

    /// Time-series report. Requires `measures`; `group` and `dimensionFilters` are
    /// copied when given.
    pub fn metrics(&mut self, options: MetricsOptions) -> Result<&mut Self, QueryError> {
        let operation = OperationType::Metrics;
        self.select(operation, &[Field::Limit, Field::Dimension]);

        if let Some(group) = options.group {
            self.state.group = Some(group);
        }
        if let Some(filters) = non_empty(options.dimension_filters) {
            self.state.dimension_filters = filters;
        }
        self.state.measures = required(options.measures, "measures", operation)?;
        Ok(self)
    }

    /// App list report. Requires `measures` and `adamId`; the given ids replace the
    /// builder's own app.
    pub fn app_list(&mut self, options: AppListOptions) -> Result<&mut Self, QueryError> {
        let operation = OperationType::AppList;
        self.select(
            operation,
            &[Field::AdamId, Field::Dimension, Field::DimensionFilters, Field::Group],
        );

        self.state.measures = required(options.measures, "measures", operation)?;
        self.state.adam_id = Some(required(options.adam_id, "adamId", operation)?);
        Ok(self)
    }

    /// Dimension values report. Requires `dimensions`; `dimensionFilters` and `measure`
    /// are copied when given.
    pub fn dimension_values(
        &mut self,
        options: DimensionValuesOptions,
    ) -> Result<&mut Self, QueryError> {
        let operation = OperationType::DimValues;
        self.select(operation, &[Field::Limit, Field::Dimension, Field::Group]);

        if let Some(filters) = non_empty(options.dimension_filters) {
            self.state.dimension_filters = filters;
        }
        self.state.dimensions = required(options.dimensions, "dimensions", operation)?;
        if let Some(measure) = options.measure.filter(|m| !m.is_empty()) {
            self.state.measure = Some(measure);
        }
        Ok(self)
    }

    /// Sources list report. Fills in `limit` and `dimension` when they are unset, then
    /// applies `options` on top.
    pub fn sources(&mut self, options: Option<SourcesOptions>) -> &mut Self {
        self.select(OperationType::Sources, &[]);

        if self.state.limit.unwrap_or(0) == 0 {
            self.state.limit = Some(DEFAULT_SOURCES_LIMIT);
        }
        if self.state.dimension.as_deref().unwrap_or_default().is_empty() {
            self.state.dimension = Some(DEFAULT_SOURCES_DIMENSION.to_string());
        }

        if let Some(options) = options {
            if let Some(limit) = options.limit {
                self.state.limit = Some(limit);
            }
            if let Some(dimension) = options.dimension {
                self.state.dimension = Some(dimension);
            }
            if let Some(measures) = options.measures {
                self.state.measures = measures;
            }
            if let Some(filters) = options.dimension_filters {
                self.state.dimension_filters = filters;
            }
            // An empty id list would leave the request without an app
            if let Some(adam_id) = non_empty(options.adam_id) {
                self.state.adam_id = Some(adam_id);
            }
        }
        self
    }

    pub fn frequency(&mut self, value: Frequency) -> &mut Self {
        self.state.frequency = value;
        self
    }

    /// Set the report granularity from its wire name (`days`, `weekly`, `monthly`).
    pub fn set_frequency(&mut self, value: &str) -> Result<&mut Self, QueryError> {
        let frequency = Frequency::parse_field("frequency", value)?;
        Ok(self.frequency(frequency))
    }

    /// Restrict the report to `start..end`, both `YYYY-MM-DD`.
    ///
    /// Without `end` the window is the first minute of `start`, not the whole day.
    pub fn date_range(&mut self, start: &str, end: Option<&str>) -> Result<&mut Self, QueryError> {
        dates::parse_date(start)?;
        if let Some(end) = end {
            dates::parse_date(end)?;
        }

        // Validated text goes out unchanged
        self.state.start_time = Some(dates::midnight(start));
        self.state.end_time = Some(match end {
            Some(end) => dates::midnight(end),
            None => dates::one_minute_past_midnight(start),
        });
        Ok(self)
    }

    /// Report on the last `value` units of `frequency`, ending today (local time).
    pub fn time_ago(&mut self, value: u32, frequency: Frequency) -> Result<&mut Self, QueryError> {
        self.time_ago_at(Local::now().date_naive(), value, frequency)
    }

    /// [`QueryBuilder::time_ago`] with the unit given by its wire name.
    pub fn time_ago_str(&mut self, value: u32, frequency: &str) -> Result<&mut Self, QueryError> {
        let frequency = Frequency::parse_field("freq", frequency)?;
        self.time_ago(value, frequency)
    }

    /// [`QueryBuilder::time_ago`] measured from an explicit `today`.
    pub fn time_ago_at(
        &mut self,
        today: NaiveDate,
        value: u32,
        frequency: Frequency,
    ) -> Result<&mut Self, QueryError> {
        let start = dates::subtract(today, value, frequency)?;
        let format = self.settings.time_ago_format;
        if format == TimeAgoFormat::Legacy {
            warn!(
                start = %start,
                "Emitting legacy '%' separator in time-ago start time; set time_ago_format to Corrected to fix"
            );
        }
        self.state.start_time = Some(dates::time_ago_start(start, format));
        self.state.end_time = Some(dates::midnight(&dates::format_date(today)));
        Ok(self)
    }

    /// Full URL of the selected report endpoint.
    pub fn resolved_url(&self) -> Result<String, QueryError> {
        let operation = self.operation.ok_or(QueryError::NoOperationSelected)?;
        Ok(format!("{}{}", self.settings.api_base_url, operation.endpoint()))
    }

    /// Finalize the request for the selected operation.
    #[instrument(skip(self), fields(app_id = %self.app_id))]
    pub fn build(&self) -> Result<AnalyticsRequest, QueryError> {
        let operation = self.operation.ok_or(QueryError::NoOperationSelected)?;
        let url = self.resolved_url()?;
        let state = &self.state;
        let adam_id = state
            .adam_id
            .clone()
            .unwrap_or_else(|| vec![self.app_id.clone()]);

        let config = match operation {
            OperationType::Metrics => ReportConfig::Metrics(MetricsConfig {
                start_time: state.start_time.clone(),
                end_time: state.end_time.clone(),
                adam_id,
                group: state.group.clone(),
                frequency: state.frequency,
                dimension_filters: state.dimension_filters.clone(),
                measures: state.measures.clone(),
            }),
            OperationType::AppList => ReportConfig::AppList(AppListConfig {
                start_time: state.start_time.clone(),
                end_time: state.end_time.clone(),
                adam_id,
                frequency: state.frequency,
                measures: state.measures.clone(),
            }),
            OperationType::DimValues => ReportConfig::DimensionValues(DimensionValuesConfig {
                start_time: state.start_time.clone(),
                end_time: state.end_time.clone(),
                adam_id,
                frequency: state.frequency,
                dimension_filters: state.dimension_filters.clone(),
                dimensions: state.dimensions.clone(),
                measure: state.measure.clone(),
            }),
            OperationType::Sources => ReportConfig::Sources(SourcesConfig {
                start_time: state.start_time.clone(),
                end_time: state.end_time.clone(),
                adam_id,
                frequency: state.frequency,
                dimension: state
                    .dimension
                    .clone()
                    .unwrap_or_else(|| DEFAULT_SOURCES_DIMENSION.to_string()),
                limit: state.limit.unwrap_or(DEFAULT_SOURCES_LIMIT),
                measures: state.measures.clone(),
                dimension_filters: state.dimension_filters.clone(),
            }),
        };

        info!(operation = %operation, url = %url, "Built analytics request");
        Ok(AnalyticsRequest {
            operation,
            url,
            config,
        })
    }

    /// JSON body for the selected operation.
    pub fn payload(&self) -> Result<serde_json::Value, QueryError> {
        self.build()?.payload()
    }
}

fn non_empty<T>(value: Option<Vec<T>>) -> Option<Vec<T>> {
    value.filter(|v| !v.is_empty())
}

fn required<T>(
    value: Option<Vec<T>>,
    field: &'static str,
    operation: OperationType,
) -> Result<Vec<T>, QueryError> {
    non_empty(value).ok_or(QueryError::MissingRequiredField { field, operation })
}
