//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

pub use admin_console_api::ApiError;

/// Message shown when a delete is attempted with nothing to delete.
pub const NO_SELECTION_MESSAGE: &str = "No item selected";

/// Message shown when a submit is attempted without a bearer token.
pub const MISSING_AUTH_MESSAGE: &str = "Authentication data not found";

/// Core layer error type
///
/// Every variant ends up as a single string in the session's global error
/// (see [`CoreError::user_message`]); dialogs never see the structured value.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// The bearer token is missing or expired
    #[error("Your session has expired, please sign in again")]
    AuthExpired,

    /// The token does not grant access to this company or entity
    #[error("You do not have permission to perform this action")]
    Forbidden,

    /// The entity no longer exists
    #[error("The item could not be found, it may have been removed")]
    NotFound,

    /// The backend rejected the submitted data
    #[error("The request was rejected, please check the entered values")]
    MalformedRequest,

    /// Anything else (network, unexpected status, bad response body)
    #[error("Something went wrong: {0}")]
    Unknown(String),

    /// Delete attempted with an empty target set
    #[error("No item selected")]
    NoSelection,

    /// A grid row could not be turned into dialog fields
    #[error("Could not load the selected row: {0}")]
    ConversionFailure(String),
}

impl CoreError {
    /// The single human-readable string shown in the dialog's error banner.
    #[must_use]
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    /// Whether it is expected behavior (user input, missing resource, expired session), used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Update this method when adding variants.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::AuthExpired
            | Self::Forbidden
            | Self::NotFound
            | Self::MalformedRequest
            | Self::NoSelection => true,
            Self::Unknown(_) | Self::ConversionFailure(_) => false,
        }
    }
}

impl From<ApiError> for CoreError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Unauthorized { .. } => Self::AuthExpired,
            ApiError::Forbidden { .. } => Self::Forbidden,
            ApiError::NotFound { .. } => Self::NotFound,
            ApiError::BadRequest { .. } => Self::MalformedRequest,
            other => Self::Unknown(other.to_string()),
        }
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
