//! Defines the pages to display for an internal server error and for a
//! session the record store no longer accepts.
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use maud::html;

use crate::{
    endpoints,
    html::{LINK_STYLE, base, error_view},
};

pub struct InternalServerError<'a> {
    pub description: &'a str,
    pub fix: &'a str,
}

impl Default for InternalServerError<'_> {
    fn default() -> Self {
        Self {
            description: "Sorry, something went wrong.",
            fix: "Try again later or check the server logs",
        }
    }
}

impl InternalServerError<'_> {
    pub fn into_html(self) -> Html<String> {
        Html(error_view("Internal Server Error", "500", self.description, self.fix).into_string())
    }
}

impl IntoResponse for InternalServerError<'_> {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, self.into_html()).into_response()
    }
}

pub async fn get_internal_server_error_page() -> Response {
    InternalServerError::default().into_response()
}

/// Shown when the record store answers 401 to a data request while this
/// server still believes the user is logged in.
///
/// Logging out resets the session flag so the user can log in again.
pub struct SessionExpired;

impl IntoResponse for SessionExpired {
    fn into_response(self) -> Response {
        let content = html! {
            main class="flex flex-col items-center px-6 py-16 mx-auto text-gray-900 dark:text-white"
            {
                h1 class="mb-4 text-3xl font-bold" { "Your session has expired" }

                p class="mb-4"
                {
                    "The record store no longer accepts your session. "
                    a href=(endpoints::LOG_OUT) class=(LINK_STYLE) { "Log out" }
                    " and log in again to continue."
                }
            }
        };

        (StatusCode::UNAUTHORIZED, base("Session Expired", &[], &content)).into_response()
    }
}
