//! The registration page and the endpoint that creates an account in the record store.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    Error,
    auth::log_in::LogInState,
    endpoints,
    html::{FORM_ERROR_STYLE, TextInput, base, link, log_in_register, password_input, submit_button},
};

pub const PASSWORD_MISMATCH_ERROR_MSG: &str = "Passwords do not match.";
pub const USERNAME_TAKEN_ERROR_MSG: &str = "This username is already taken.";
const REGISTRATION_FAILED_ERROR_MSG: &str = "Registration failed. Please try again later.";

#[derive(Default)]
struct RegistrationForm<'a> {
    username: &'a str,
    email: &'a str,
    username_error: Option<&'a str>,
    confirm_password_error: Option<&'a str>,
    form_error: Option<&'a str>,
}

impl RegistrationForm<'_> {
    fn into_html(self) -> Markup {
        html! {
            form
                hx-post=(endpoints::REGISTER_API)
                hx-swap="outerHTML"
                hx-indicator="#indicator"
                hx-disabled-elt="#submit-button"
                class="space-y-4 md:space-y-6"
            {
                (TextInput {
                    name: "username",
                    label: "Username",
                    type_: "text",
                    value: self.username,
                    required: true,
                    autofocus: true,
                    error_message: self.username_error,
                }.into_html())

                (TextInput {
                    name: "email",
                    label: "Email (optional, used to reset your password)",
                    type_: "email",
                    value: self.email,
                    required: false,
                    autofocus: false,
                    error_message: None,
                }.into_html())

                (password_input("password", "Password", 0, None))
                (password_input("confirm_password", "Confirm password", 0, self.confirm_password_error))

                @if let Some(form_error) = self.form_error {
                    p class=(FORM_ERROR_STYLE) { (form_error) }
                }

                (submit_button("Register"))

                p class="text-sm font-light text-gray-500 dark:text-gray-400"
                {
                    "Already have an account? "
                    (link(endpoints::LOG_IN_VIEW, "Log in here"))
                }
            }
        }
    }
}

/// Display the registration page.
pub async fn get_register_page() -> Response {
    let form = RegistrationForm::default().into_html();
    let content = log_in_register("Create an account", &form);

    base("Register", &[], &content).into_response()
}

/// The data entered by the user in the registration form.
#[derive(Clone, Deserialize)]
pub struct RegisterData {
    pub username: String,
    pub email: Option<String>,
    pub password: String,
    pub confirm_password: String,
}

/// Create an account in the record store.
///
/// On success the client is sent to the log-in page, registering does not
/// log the user in.
pub async fn post_register(
    State(state): State<LogInState>,
    Form(data): Form<RegisterData>,
) -> Response {
    let email = data.email.as_deref().map(str::trim).filter(|email| !email.is_empty());
    let form = RegistrationForm {
        username: &data.username,
        email: email.unwrap_or_default(),
        ..Default::default()
    };

    if data.password != data.confirm_password {
        return RegistrationForm {
            confirm_password_error: Some(PASSWORD_MISMATCH_ERROR_MSG),
            ..form
        }
        .into_html()
        .into_response();
    }

    match state
        .session
        .register(&data.username, &data.password, email)
        .await
    {
        Ok(()) => {
            tracing::info!("Registered new user {}", data.username);
            let log_in_url = format!("{}?registered=true", endpoints::LOG_IN_VIEW);
            (HxRedirect(log_in_url), StatusCode::OK).into_response()
        }
        Err(Error::Validation(field_errors)) => {
            tracing::warn!("Registration rejected: {field_errors:?}");
            RegistrationForm {
                username_error: Some(USERNAME_TAKEN_ERROR_MSG),
                ..form
            }
            .into_html()
            .into_response()
        }
        Err(error) => {
            tracing::error!("Could not register user: {error}");
            RegistrationForm {
                form_error: Some(REGISTRATION_FAILED_ERROR_MSG),
                ..form
            }
            .into_html()
            .into_response()
        }
    }
}
