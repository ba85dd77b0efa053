//! This file defines the routes for displaying the log-in page and handling log-in requests.
//! The session module handles talking to the record store and tracking the session status.

use axum::{
    Form,
    extract::{FromRef, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    AppState, Error,
    auth::{redirect::normalize_redirect_url, session::SessionGate},
    endpoints,
    html::{TextInput, base, link, log_in_register, password_input, submit_button},
};

pub const INVALID_CREDENTIALS_ERROR_MSG: &str = "Incorrect username or password.";
const UNREACHABLE_ERROR_MSG: &str = "Could not reach the server. Please try again later.";
const INTERNAL_ERROR_MSG: &str = "An internal error occurred. Please try again later.";

struct LogInForm<'a> {
    username: &'a str,
    error_message: Option<&'a str>,
    redirect_url: Option<&'a str>,
    registered: bool,
}

impl LogInForm<'_> {
    fn into_html(self) -> Markup {
        html! {
            form
                hx-post=(endpoints::LOG_IN_API)
                hx-swap="outerHTML"
                hx-indicator="#indicator"
                hx-disabled-elt="#submit-button"
                class="space-y-4 md:space-y-6"
            {
                @if self.registered {
                    p class="text-sm text-green-700 dark:text-green-400"
                    {
                        "Your account has been created. Log in to continue."
                    }
                }

                @if let Some(redirect_url) = self.redirect_url {
                    input type="hidden" name="redirect_url" value=(redirect_url);
                }

                (TextInput {
                    name: "username",
                    label: "Username",
                    type_: "text",
                    value: self.username,
                    required: true,
                    autofocus: true,
                    error_message: None,
                }.into_html())

                (password_input("password", "Password", 0, self.error_message))

                (submit_button("Log in"))

                p class="text-sm font-light text-gray-500 dark:text-gray-400"
                {
                    "Forgot your password? "
                    (link(endpoints::FORGOT_PASSWORD_VIEW, "Reset it here"))
                }

                p class="text-sm font-light text-gray-500 dark:text-gray-400"
                {
                    "Don't have an account? "
                    (link(endpoints::REGISTER_VIEW, "Register here"))
                }
            }
        }
    }
}

fn parse_redirect_url(raw_url: Option<&str>, source: &str) -> Option<String> {
    let raw_url = raw_url.filter(|url| !url.is_empty())?;
    let redirect_url = normalize_redirect_url(raw_url);

    if redirect_url.is_none() {
        tracing::warn!("Invalid redirect URL from {source}: {raw_url}");
    }

    redirect_url
}

#[derive(Debug, Default, Deserialize)]
pub struct LogInQuery {
    pub redirect_url: Option<String>,
    /// Set after a successful registration.
    pub registered: Option<bool>,
}

/// Display the log-in page.
pub async fn get_log_in_page(Query(query): Query<LogInQuery>) -> Response {
    let redirect_url = parse_redirect_url(query.redirect_url.as_deref(), "log-in query");
    let form = LogInForm {
        username: "",
        error_message: None,
        redirect_url: redirect_url.as_deref(),
        registered: query.registered.unwrap_or(false),
    };
    let content = log_in_register("Log in to your account", &form.into_html());

    base("Log In", &[], &content).into_response()
}

/// The state needed to perform a login.
#[derive(Debug, Clone)]
pub struct LogInState {
    pub session: SessionGate,
}

impl FromRef<AppState> for LogInState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            session: state.session.clone(),
        }
    }
}

/// The data entered by the user in the log-in form.
#[derive(Clone, Deserialize)]
pub struct LogInData {
    pub username: String,
    pub password: String,
    /// Optional URL to redirect to after logging in.
    pub redirect_url: Option<String>,
}

/// Handler for log-in requests via the POST method.
///
/// On success the client is redirected to the page it came from, or the
/// dashboard. Otherwise the form is returned with an error message explaining
/// the problem.
pub async fn post_log_in(State(state): State<LogInState>, Form(data): Form<LogInData>) -> Response {
    let redirect_url = parse_redirect_url(data.redirect_url.as_deref(), "log-in form");

    let error_message = match state.session.log_in(&data.username, &data.password).await {
        Ok(()) => {
            let redirect_url = redirect_url.unwrap_or_else(|| endpoints::DASHBOARD_VIEW.to_owned());
            tracing::info!("Logged in as {}", data.username);
            return (HxRedirect(redirect_url), StatusCode::OK).into_response();
        }
        Err(Error::Unauthorized) => INVALID_CREDENTIALS_ERROR_MSG,
        Err(error @ Error::Transport(_)) => {
            tracing::error!("Could not log in: {error}");
            UNREACHABLE_ERROR_MSG
        }
        Err(error) => {
            tracing::error!("Unhandled error while logging in: {error}");
            INTERNAL_ERROR_MSG
        }
    };

    LogInForm {
        username: &data.username,
        error_message: Some(error_message),
        redirect_url: redirect_url.as_deref(),
        registered: false,
    }
    .into_html()
    .into_response()
}

#[cfg(test)]
mod log_in_page_tests {
    use axum::{
        Form,
        extract::{Query, State},
        http::StatusCode,
    };
    use scraper::Selector;

    use crate::{
        auth::session::{SessionGate, SessionStatus},
        endpoints,
        record_store::RecordStoreClient,
        test_utils::{
            FAKE_PASSWORD, FAKE_USERNAME, FakeRecordStore, assert_form_error_message,
            assert_form_input, assert_hx_endpoint, assert_hx_redirect, assert_valid_html,
            must_get_form, parse_html_document, parse_html_fragment, unreachable_url,
        },
    };

    use super::{
        INVALID_CREDENTIALS_ERROR_MSG, LogInData, LogInQuery, LogInState, get_log_in_page,
        post_log_in,
    };

    fn state_for(base_url: &str) -> LogInState {
        LogInState {
            session: SessionGate::new(RecordStoreClient::new(base_url).unwrap()),
        }
    }

    fn log_in_data(password: &str, redirect_url: Option<&str>) -> LogInData {
        LogInData {
            username: FAKE_USERNAME.to_owned(),
            password: password.to_owned(),
            redirect_url: redirect_url.map(str::to_owned),
        }
    }

    #[tokio::test]
    async fn log_in_page_displays_form() {
        let response = get_log_in_page(Query(LogInQuery::default())).await;

        assert_eq!(response.status(), StatusCode::OK);
        let document = parse_html_document(response).await;
        assert_valid_html(&document);

        let form = must_get_form(&document);
        assert_hx_endpoint(&form, endpoints::LOG_IN_API, "hx-post");
        assert_form_input(&form, "username", "text");
        assert_form_input(&form, "password", "password");

        let links = form
            .select(&Selector::parse("a[href]").unwrap())
            .filter_map(|link| link.value().attr("href"))
            .collect::<Vec<_>>();
        assert_eq!(
            links,
            vec![endpoints::FORGOT_PASSWORD_VIEW, endpoints::REGISTER_VIEW]
        );
    }

    #[tokio::test]
    async fn log_in_page_keeps_safe_redirect_url() {
        let response = get_log_in_page(Query(LogInQuery {
            redirect_url: Some("/transactions?page=2".to_owned()),
            registered: None,
        }))
        .await;

        let document = parse_html_document(response).await;
        let hidden = document
            .select(&Selector::parse("input[name=redirect_url]").unwrap())
            .next()
            .expect("redirect_url input missing");
        assert_eq!(hidden.value().attr("value"), Some("/transactions?page=2"));
    }

    #[tokio::test]
    async fn log_in_page_drops_external_redirect_url() {
        let response = get_log_in_page(Query(LogInQuery {
            redirect_url: Some("https://example.com".to_owned()),
            registered: None,
        }))
        .await;

        let document = parse_html_document(response).await;
        let hidden = document
            .select(&Selector::parse("input[name=redirect_url]").unwrap())
            .next();
        assert!(hidden.is_none());
    }

    #[tokio::test]
    async fn log_in_page_shows_registration_notice() {
        let response = get_log_in_page(Query(LogInQuery {
            redirect_url: None,
            registered: Some(true),
        }))
        .await;

        let document = parse_html_document(response).await;
        assert!(document.html().contains("Your account has been created"));
    }

    #[tokio::test]
    async fn log_in_redirects_to_dashboard() {
        let store = FakeRecordStore::start().await;
        let state = state_for(store.base_url());

        let response = post_log_in(State(state.clone()), Form(log_in_data(FAKE_PASSWORD, None))).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_hx_redirect(&response, endpoints::DASHBOARD_VIEW);
        assert_eq!(state.session.status(), SessionStatus::Authenticated);
    }

    #[tokio::test]
    async fn log_in_redirects_to_requested_page() {
        let store = FakeRecordStore::start().await;
        let state = state_for(store.base_url());

        let response = post_log_in(
            State(state),
            Form(log_in_data(FAKE_PASSWORD, Some("/transactions?page=2"))),
        )
        .await;

        assert_hx_redirect(&response, "/transactions?page=2");
    }

    #[tokio::test]
    async fn wrong_password_shows_error_message() {
        let store = FakeRecordStore::start().await;
        let state = state_for(store.base_url());
        state.session.check_status().await;

        let response = post_log_in(State(state.clone()), Form(log_in_data("wrong", None))).await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);
        let form = must_get_form(&html);
        assert_form_error_message(&form, INVALID_CREDENTIALS_ERROR_MSG);
        assert_eq!(state.session.status(), SessionStatus::Unauthenticated);
    }

    #[tokio::test]
    async fn unreachable_store_shows_error_message() {
        let state = state_for(&unreachable_url().await);

        let response = post_log_in(State(state), Form(log_in_data(FAKE_PASSWORD, None))).await;

        let html = parse_html_fragment(response).await;
        let form = must_get_form(&html);
        assert_form_error_message(&form, super::UNREACHABLE_ERROR_MSG);
    }
}
