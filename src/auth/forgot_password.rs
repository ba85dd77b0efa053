//! The page for requesting a password reset link by email.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    auth::log_in::LogInState,
    endpoints,
    html::{FORM_ERROR_STYLE, TextInput, base, link, log_in_register, submit_button},
};

pub const RESET_LINK_SENT_MSG: &str = "A link to reset your password has been sent to your email.";
const REQUEST_FAILED_ERROR_MSG: &str = "Could not send the request. Please try again later.";

fn forgot_password_form(email: &str, error_message: Option<&str>) -> Markup {
    html! {
        form
            hx-post=(endpoints::FORGOT_PASSWORD_API)
            hx-swap="outerHTML"
            hx-indicator="#indicator"
            hx-disabled-elt="#submit-button"
            class="space-y-4 md:space-y-6"
        {
            p class="text-sm text-gray-700 dark:text-gray-300"
            {
                "Enter the email address you registered with and we will send you a link to reset your password."
            }

            (TextInput {
                name: "email",
                label: "Email",
                type_: "email",
                value: email,
                required: true,
                autofocus: true,
                error_message: None,
            }.into_html())

            @if let Some(error_message) = error_message {
                p class=(FORM_ERROR_STYLE) { (error_message) }
            }

            (submit_button("Send reset link"))

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                (link(endpoints::LOG_IN_VIEW, "Back to log in"))
            }
        }
    }
}

fn reset_link_sent() -> Markup {
    html! {
        div class="space-y-4"
        {
            p role="status" class="text-green-700 dark:text-green-400" { (RESET_LINK_SENT_MSG) }
            p { (link(endpoints::LOG_IN_VIEW, "Back to log in")) }
        }
    }
}

/// Renders the form for requesting a password reset link.
pub async fn get_forgot_password_page() -> Response {
    let content = log_in_register("Forgot your password?", &forgot_password_form("", None));

    base("Forgot Password", &[], &content).into_response()
}

#[derive(Clone, Deserialize)]
pub struct ForgotPasswordData {
    pub email: String,
}

/// Ask the record store to email a reset link.
pub async fn post_forgot_password(
    State(state): State<LogInState>,
    Form(data): Form<ForgotPasswordData>,
) -> Response {
    let email = data.email.trim();

    match state.session.forgot_password(email).await {
        Ok(()) => reset_link_sent().into_response(),
        Err(error) => {
            tracing::error!("Could not request a password reset link: {error}");
            forgot_password_form(email, Some(REQUEST_FAILED_ERROR_MSG)).into_response()
        }
    }
}
