//! Error types for state filtering

use thiserror::Error;

use crate::addrs::AddressError;

/// Result type alias for filter operations
pub type Result<T> = std::result::Result<T, FilterError>;

/// Errors returned by the state filter and the listing helpers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// A pattern matched none of the accepted address syntaxes
    #[error("error parsing address '{pattern}'")]
    Parse {
        pattern: String,
        #[source]
        source: AddressError,
    },

    /// A resource instance carries attributes that are not a JSON object
    #[error("failed to load attributes of {address}: {reason}")]
    Attributes { address: String, reason: String },
}

impl FilterError {
    /// Returns the offending pattern for parse errors
    pub fn pattern(&self) -> Option<&str> {
        match self {
            FilterError::Parse { pattern, .. } => Some(pattern),
            FilterError::Attributes { .. } => None,
        }
    }
}
