use std::{collections::BTreeMap, fmt};

use shared::error::ApiError;
use thiserror::Error;

/// Field-scoped validation failures keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<&'static str, String>);

impl ValidationErrors {
    pub fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, (field, message)) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("failed to decode response: {0}")]
    Decode(reqwest::Error),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("server rejected request: {0}")]
    Status(ApiError),
    #[error("invalid api base url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("unknown filter key '{0}'")]
    UnknownKey(String),
    #[error("invalid value '{value}' for filter '{key}'")]
    InvalidValue { key: String, value: String },
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),
    #[error(transparent)]
    Request(#[from] RequestError),
    #[error("{entity} {id} is not on the loaded page")]
    NotFound { entity: &'static str, id: String },
    #[error("a submission is already in flight")]
    SubmitInFlight,
    #[error("unsupported page size {0}")]
    UnsupportedPageSize(u32),
    #[error(transparent)]
    Filter(#[from] FilterError),
    #[error("unknown form field '{0}'")]
    UnknownField(String),
}

impl ClientError {
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}
