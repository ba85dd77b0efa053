//! The endpoint for deleting a transaction from the list.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRefresh;

use crate::{record_store::RecordStoreState, transaction::core::TransactionId};

/// Delete a transaction and have htmx reload the page so the list is fetched
/// again.
pub async fn delete_transaction_endpoint(
    State(state): State<RecordStoreState>,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    match state.record_store.delete_transaction(transaction_id).await {
        Ok(()) => {
            tracing::info!("Deleted transaction {transaction_id}");
            (HxRefresh(true), StatusCode::OK).into_response()
        }
        Err(error) => {
            tracing::error!("Could not delete transaction {transaction_id}: {error}");
            error.into_alert_response()
        }
    }
}
