//! Log-out route handler that ends the record store session and redirects users.

use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};

use crate::{auth::log_in::LogInState, endpoints};

/// Log out of the record store and redirect the client to the log-in page.
///
/// The user is treated as logged out even if the record store could not be
/// reached.
pub async fn get_log_out(State(state): State<LogInState>) -> Response {
    if let Err(error) = state.session.log_out().await {
        tracing::warn!("Could not end the record store session: {error}");
    }

    Redirect::to(endpoints::LOG_IN_VIEW).into_response()
}

#[cfg(test)]
mod log_out_tests {
    use axum::{extract::State, http::StatusCode};

    use crate::{
        auth::{
            log_in::LogInState,
            session::{SessionGate, SessionStatus},
        },
        endpoints,
        record_store::RecordStoreClient,
        test_utils::{FAKE_PASSWORD, FAKE_USERNAME, FakeRecordStore, get_header, unreachable_url},
    };

    use super::get_log_out;

    #[tokio::test]
    async fn log_out_ends_session_and_redirects() {
        let store = FakeRecordStore::start().await;
        let session = SessionGate::new(RecordStoreClient::new(store.base_url()).unwrap());
        session.log_in(FAKE_USERNAME, FAKE_PASSWORD).await.unwrap();

        let response = get_log_out(State(LogInState {
            session: session.clone(),
        }))
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(get_header(&response, "location"), endpoints::LOG_IN_VIEW);
        assert_eq!(session.check_status().await, SessionStatus::Unauthenticated);
    }

    #[tokio::test]
    async fn log_out_with_unreachable_store_still_redirects() {
        let session = SessionGate::with_status(
            RecordStoreClient::new(&unreachable_url().await).unwrap(),
            SessionStatus::Authenticated,
        );

        let response = get_log_out(State(LogInState {
            session: session.clone(),
        }))
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(get_header(&response, "location"), endpoints::LOG_IN_VIEW);
        assert_eq!(session.status(), SessionStatus::Unauthenticated);
    }
}
