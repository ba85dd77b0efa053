//! Route guards that let requests through based on the session status.

use axum::{
    extract::{FromRef, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_htmx::HxRedirect;
use maud::html;

use crate::{
    AppState,
    alert::Alert,
    auth::{
        redirect::build_log_in_redirect_url,
        session::{SessionGate, SessionStatus},
    },
    endpoints,
    html::{HeadElement, PAGE_CONTAINER_STYLE, base, loading_spinner},
};

/// The state needed by the route guards.
#[derive(Debug, Clone)]
pub struct GuardState {
    pub session: SessionGate,
}

impl FromRef<AppState> for GuardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            session: state.session.clone(),
        }
    }
}

/// Shown while the startup session check is still running. Reloads itself
/// every second until the status is settled.
fn loading_page() -> Response {
    let content = html! {
        main class=(PAGE_CONTAINER_STYLE)
        {
            p class="text-lg"
            {
                span class="text-blue-600" { (loading_spinner()) }
                "Checking your session…"
            }
        }
    };

    (
        StatusCode::SERVICE_UNAVAILABLE,
        base("Loading", &[HeadElement::Refresh(1)], &content),
    )
        .into_response()
}

/// Let authenticated requests through, send everyone else to the log-in page.
///
/// `get_redirect` builds the response that sends the client to the log-in URL.
#[inline]
async fn auth_guard_internal(
    state: GuardState,
    request: Request,
    next: Next,
    on_loading: impl FnOnce() -> Response,
    get_redirect: impl FnOnce(&str) -> Response,
) -> Response {
    match state.session.status() {
        SessionStatus::Authenticated => next.run(request).await,
        SessionStatus::Loading => on_loading(),
        SessionStatus::Unauthenticated => {
            let log_in_redirect_url = build_log_in_redirect_url(&request);
            tracing::debug!(
                "Unauthenticated request for {}, redirecting to {log_in_redirect_url}",
                request.uri()
            );
            get_redirect(&log_in_redirect_url)
        }
    }
}

/// Guard for full pages. Unauthenticated users get a 303 redirect to the
/// log-in page.
pub async fn auth_guard(State(state): State<GuardState>, request: Request, next: Next) -> Response {
    auth_guard_internal(state, request, next, loading_page, |redirect_url| {
        Redirect::to(redirect_url).into_response()
    })
    .await
}

/// Guard for htmx endpoints. Unauthenticated users get an `HX-Redirect` to
/// the log-in page since htmx does not follow 303 redirects for the whole page.
pub async fn auth_guard_hx(
    State(state): State<GuardState>,
    request: Request,
    next: Next,
) -> Response {
    auth_guard_internal(
        state,
        request,
        next,
        || {
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Alert::ErrorSimple {
                    message: "Still checking your session, try again in a moment.".to_owned(),
                }
                .into_html(),
            )
                .into_response()
        },
        |redirect_url| (HxRedirect(redirect_url.to_owned()), StatusCode::OK).into_response(),
    )
    .await
}

/// Guard for the log-in and registration pages. Logged in users are sent to
/// the dashboard.
pub async fn guest_guard(
    State(state): State<GuardState>,
    request: Request,
    next: Next,
) -> Response {
    match state.session.status() {
        SessionStatus::Unauthenticated => next.run(request).await,
        SessionStatus::Loading => loading_page(),
        SessionStatus::Authenticated => Redirect::to(endpoints::DASHBOARD_VIEW).into_response(),
    }
}
