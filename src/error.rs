//! Defines the app level error type and conversions to rendered HTML pages and alerts.

use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    alert::Alert,
    internal_server_error::{InternalServerError, SessionExpired},
    not_found::NotFoundError,
};

/// Validation messages from the record store keyed by the offending field,
/// e.g. `{"amount": "must be greater than or equal to 0.01"}`.
pub type FieldErrors = BTreeMap<String, String>;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The request to the record store could not be sent or its response could
    /// not be read, e.g. because the record store is down.
    #[error("could not reach the record store: {0}")]
    Transport(String),

    /// The record store rejected the request with HTTP 400.
    ///
    /// The map is empty when the response body was not a map of field
    /// messages.
    #[error("the record store rejected the request: {0:?}")]
    Validation(FieldErrors),

    /// The record store answered 401 or 403, either because the credentials
    /// were wrong or because the session is no longer valid.
    #[error("the record store rejected the session or credentials")]
    Unauthorized,

    /// The requested resource was not found.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The record store answered with a status this client does not handle.
    #[error("the record store responded with unexpected status {0}")]
    UnexpectedStatus(u16),

    /// The response body did not have the expected shape.
    #[error("could not decode the record store response: {0}")]
    InvalidResponse(String),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// The configured record store URL cannot be used as a base URL.
    #[error("invalid record store URL {0}")]
    InvalidRecordStoreUrl(String),

    /// The HTTP client for the record store could not be created.
    #[error("could not create the record store client: {0}")]
    ClientSetup(String),

    /// A month query parameter was not in the form `YYYY-MM`.
    #[error("invalid month \"{0}\", expected YYYY-MM")]
    InvalidMonth(String),

    /// Transactions could not be written as CSV.
    #[error("could not export transactions as CSV: {0}")]
    CsvExport(String),
}

const UNREACHABLE_DESCRIPTION: &str = "Could not reach the record store";
const UNREACHABLE_FIX: &str =
    "The server holding your transactions did not respond. Try again in a moment.";

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => NotFoundError.into_response(),
            Error::Unauthorized => SessionExpired.into_response(),
            Error::Transport(error) => {
                tracing::error!("Record store request failed: {error}");
                InternalServerError {
                    description: UNREACHABLE_DESCRIPTION,
                    fix: UNREACHABLE_FIX,
                }
                .into_response()
            }
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            Error::InvalidMonth(month) => (
                StatusCode::BAD_REQUEST,
                InternalServerError {
                    description: "Invalid month",
                    fix: &format!("\"{month}\" is not a month, use the format YYYY-MM."),
                }
                .into_html(),
            )
                .into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {error}");
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Convert the error into an HTTP response with an HTML alert.
    pub fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::Transport(error) => {
                tracing::error!("Record store request failed: {error}");
                (
                    StatusCode::BAD_GATEWAY,
                    Alert::Error {
                        message: UNREACHABLE_DESCRIPTION.to_owned(),
                        details: UNREACHABLE_FIX.to_owned(),
                    },
                )
            }
            Error::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Alert::Error {
                    message: "Your session has expired".to_owned(),
                    details: "Log out and log in again to continue.".to_owned(),
                },
            ),
            Error::NotFound => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Transaction not found".to_owned(),
                    details: "The transaction could not be found. \
                    Try refreshing the page to see if it has already been deleted."
                        .to_owned(),
                },
            ),
            Error::Validation(field_errors) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "The record store rejected the request".to_owned(),
                    details: field_errors
                        .iter()
                        .map(|(field, message)| format!("{field}: {message}"))
                        .collect::<Vec<_>>()
                        .join(" "),
                },
            ),
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Invalid Timezone Settings".to_owned(),
                    details: format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                    ),
                },
            ),
            error => {
                tracing::error!("An unexpected error occurred: {error}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Alert::Error {
                        message: "Something went wrong".to_owned(),
                        details:
                            "An unexpected error occurred, check the server logs for more details."
                                .to_owned(),
                    },
                )
            }
        };

        (status_code, alert.into_html()).into_response()
    }
}
