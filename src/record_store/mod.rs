//! The HTTP client for the remote service that stores transactions and user
//! accounts.

use axum::extract::FromRef;

use crate::AppState;

mod client;

pub use client::RecordStoreClient;

/// The state for handlers that only talk to the record store.
#[derive(Debug, Clone)]
pub struct RecordStoreState {
    pub record_store: RecordStoreClient,
}

impl FromRef<AppState> for RecordStoreState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            record_store: state.record_store.clone(),
        }
    }
}
