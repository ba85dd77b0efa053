//! The endpoint for creating a transaction from the new transaction form.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
// axum_extra's Form treats empty inputs as missing rather than failing to parse.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;

use crate::{
    Error, endpoints,
    record_store::RecordStoreState,
    transaction::form::{FormTarget, TransactionFormData, split_field_errors, transaction_form},
};

/// Render the result of a rejected submission of `target`.
///
/// Field errors are shown on the form itself, everything else becomes an
/// alert.
pub(super) fn rejected_submission(
    target: FormTarget,
    values: &TransactionFormData,
    error: Error,
) -> Response {
    match error {
        Error::Validation(errors) => {
            tracing::warn!("Record store rejected transaction: {errors:?}");
            let (field_errors, form_error) = split_field_errors(errors);
            transaction_form(target, values, &field_errors, form_error.as_deref()).into_response()
        }
        error => {
            tracing::error!("Could not save transaction: {error}");
            error.into_alert_response()
        }
    }
}

/// Create a transaction, then send the browser back to the transaction list.
///
/// Invalid input is returned as the form with error messages and is never
/// sent to the record store.
pub async fn create_transaction_endpoint(
    State(state): State<RecordStoreState>,
    Form(values): Form<TransactionFormData>,
) -> Response {
    let payload = match values.validate() {
        Ok(payload) => payload,
        Err(errors) => {
            tracing::debug!("Rejected new transaction form: {errors:?}");
            return transaction_form(FormTarget::Create, &values, &errors, None).into_response();
        }
    };

    match state.record_store.create_transaction(&payload).await {
        Ok(transaction) => {
            tracing::info!("Created transaction {}", transaction.id);
            (
                HxRedirect(endpoints::TRANSACTIONS_VIEW.to_owned()),
                StatusCode::OK,
            )
                .into_response()
        }
        Err(error) => rejected_submission(FormTarget::Create, &values, error),
    }
}
