use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use std::fmt;

use crate::config::ErrorStatusMode;

/// Failures a geocoding request can end in.
///
/// Every variant renders as a plain-text body; the status code it travels
/// with depends on the configured [`ErrorStatusMode`].
#[derive(Debug, Clone)]
pub enum AppError {
    /// The provider could not be reached (connection, DNS, timeout, bad URL).
    Transport(String),
    /// The provider answered outside the 2xx range.
    Provider(StatusCode),
    /// The provider body was malformed or lacked the expected fields.
    Parse(String),
    /// The caller asked for something other than `json` or `xml`.
    UnsupportedFormat,
    /// The address route was hit with a method other than POST.
    MethodNotAllowed,
    /// The inbound form was missing fields or was not a form at all.
    BadRequest(String),
}

impl fmt::Display for AppError {
    /// Formats the error as the exact response body sent to the caller.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Transport(detail) => {
                write!(f, "Some error occurred while querying google API - {}", detail)
            }
            AppError::Provider(_) => write!(f, "Error occurred while hitting Google API"),
            AppError::Parse(detail) => write!(
                f,
                "Some error occurred while parsing google api response - {}",
                detail
            ),
            AppError::UnsupportedFormat => write!(f, "Un-supported output format provided by user"),
            AppError::MethodNotAllowed => write!(f, "Request method not allowed."),
            AppError::BadRequest(detail) => write!(f, "Bad request: {}", detail),
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    /// HTTP status paired with this error under the given mode.
    pub fn status(&self, mode: ErrorStatusMode) -> StatusCode {
        match (mode, self) {
            (_, AppError::BadRequest(_)) => StatusCode::BAD_REQUEST,
            (ErrorStatusMode::Legacy, _) => StatusCode::OK,
            (ErrorStatusMode::Strict, AppError::Transport(_))
            | (ErrorStatusMode::Strict, AppError::Provider(_))
            | (ErrorStatusMode::Strict, AppError::Parse(_)) => StatusCode::BAD_GATEWAY,
            (ErrorStatusMode::Strict, AppError::UnsupportedFormat) => StatusCode::BAD_REQUEST,
            (ErrorStatusMode::Strict, AppError::MethodNotAllowed) => StatusCode::METHOD_NOT_ALLOWED,
        }
    }

    /// Converts the error into a plain-text HTTP response.
    ///
    /// Logs provider-side failures as errors and caller mistakes as warnings.
    pub fn into_response_with(self, mode: ErrorStatusMode) -> Response {
        match &self {
            AppError::Transport(detail) => tracing::error!("Geocoding transport error: {}", detail),
            AppError::Provider(status) => {
                tracing::error!("Geocoding provider returned status {}", status)
            }
            AppError::Parse(detail) => {
                tracing::error!("Failed to parse geocoding response: {}", detail)
            }
            AppError::UnsupportedFormat | AppError::MethodNotAllowed | AppError::BadRequest(_) => {
                tracing::warn!("Rejected request: {}", self)
            }
        }

        (
            self.status(mode),
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.to_string(),
        )
            .into_response()
    }
}

impl IntoResponse for AppError {
    /// Converts the error into an HTTP response using conventional status codes.
    fn into_response(self) -> Response {
        self.into_response_with(ErrorStatusMode::Strict)
    }
}

impl From<reqwest::Error> for AppError {
    /// Converts a `reqwest::Error` into an `AppError`.
    ///
    /// The URL is stripped first since its query string carries the API key.
    fn from(err: reqwest::Error) -> Self {
        AppError::Transport(err.without_url().to_string())
    }
}
