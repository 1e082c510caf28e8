use thiserror::Error;

use crate::query::models::{Frequency, OperationType};

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("The '{field}' param is required in the config for {operation} requests")]
    MissingRequiredField {
        field: &'static str,
        operation: OperationType,
    },
    #[error("'{field}' param should be one of the allowed values (days, weekly, monthly), got '{value}'")]
    InvalidEnumValue { field: &'static str, value: String },
    #[error("Incorrect date '{value}', format should be YYYY-MM-DD")]
    InvalidDateFormat { value: String },
    #[error("Going back {value} {frequency} leaves the supported calendar range")]
    DateOutOfRange { value: u32, frequency: Frequency },
    #[error("No operation selected; call metrics, app_list, dimension_values or sources first")]
    NoOperationSelected,
    #[error("Payload serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Unknown value '{value}' for {key} (expected legacy or corrected)")]
    UnknownTimeAgoFormat { key: &'static str, value: String },
    #[error("{key} must not be empty")]
    EmptyValue { key: &'static str },
}
