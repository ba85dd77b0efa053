//! The page linked from the password reset email.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    Error,
    auth::log_in::LogInState,
    endpoints,
    html::{FORM_ERROR_STYLE, base, link, log_in_register, password_input, submit_button},
};

pub const INVALID_LINK_MSG: &str = "This password reset link is invalid.";
pub const PASSWORD_CHANGED_MSG: &str = "Your password has been changed.";
const RESET_FAILED_ERROR_MSG: &str =
    "Could not change your password. The link may have expired, request a new one.";

fn reset_password_form(
    token: &str,
    confirm_password_error: Option<&str>,
    form_error: Option<&str>,
) -> Markup {
    html! {
        form
            hx-post=(endpoints::RESET_PASSWORD_API)
            hx-swap="outerHTML"
            hx-indicator="#indicator"
            hx-disabled-elt="#submit-button"
            class="space-y-4 md:space-y-6"
        {
            input type="hidden" name="token" value=(token);

            (password_input("password", "New password", 0, None))
            (password_input("confirm_password", "Confirm new password", 0, confirm_password_error))

            @if let Some(form_error) = form_error {
                p class=(FORM_ERROR_STYLE) { (form_error) }
            }

            (submit_button("Change password"))
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ResetPasswordQuery {
    pub token: Option<String>,
}

/// Renders the new password form, or an error if the link has no token.
pub async fn get_reset_password_page(Query(query): Query<ResetPasswordQuery>) -> Response {
    let token = query.token.filter(|token| !token.is_empty());

    let (status, form) = match token {
        Some(token) => (StatusCode::OK, reset_password_form(&token, None, None)),
        None => (
            StatusCode::BAD_REQUEST,
            html! {
                p class=(FORM_ERROR_STYLE) { (INVALID_LINK_MSG) }
                p { (link(endpoints::FORGOT_PASSWORD_VIEW, "Request a new link")) }
            },
        ),
    };
    let content = log_in_register("Set a new password", &form);

    (status, base("Reset Password", &[], &content)).into_response()
}

#[derive(Clone, Deserialize)]
pub struct ResetPasswordData {
    pub token: Option<String>,
    pub password: String,
    pub confirm_password: String,
}

/// Set the new password in the record store.
pub async fn post_reset_password(
    State(state): State<LogInState>,
    Form(data): Form<ResetPasswordData>,
) -> Response {
    let Some(token) = data.token.filter(|token| !token.is_empty()) else {
        return reset_password_form("", None, Some(INVALID_LINK_MSG)).into_response();
    };

    if data.password != data.confirm_password {
        return reset_password_form(&token, Some(super::register::PASSWORD_MISMATCH_ERROR_MSG), None)
            .into_response();
    }

    match state.session.reset_password(&token, &data.password).await {
        Ok(()) => html! {
            div class="space-y-4"
            {
                p role="status" class="text-green-700 dark:text-green-400" { (PASSWORD_CHANGED_MSG) }
                p { (link(endpoints::LOG_IN_VIEW, "Log in")) }
            }
        }
        .into_response(),
        Err(error) => {
            if !matches!(error, Error::Validation(_)) {
                tracing::error!("Could not reset password: {error}");
            }
            reset_password_form(&token, None, Some(RESET_FAILED_ERROR_MSG)).into_response()
        }
    }
}
