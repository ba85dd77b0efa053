//! The page for recording a new transaction.

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};

use crate::{
    AppState, Error,
    endpoints,
    error::FieldErrors,
    timezone::local_today,
    transaction::form::{
        FormTarget, TransactionFormData, transaction_form, transaction_form_page,
    },
};

/// The state needed for the new transaction page.
#[derive(Debug, Clone)]
pub struct NewTransactionPageState {
    /// The local timezone as a canonical timezone name, e.g. "Asia/Tokyo".
    pub local_timezone: String,
}

impl FromRef<AppState> for NewTransactionPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Renders the form for a new transaction, an expense dated today by default.
pub async fn get_new_transaction_page(
    State(state): State<NewTransactionPageState>,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone).inspect_err(|error| {
        tracing::error!("Could not get today's date: {error}");
    })?;

    let form = transaction_form(
        FormTarget::Create,
        &TransactionFormData::new_expense(today),
        &FieldErrors::new(),
        None,
    );

    Ok(
        transaction_form_page("New Transaction", endpoints::NEW_TRANSACTION_VIEW, &form)
            .into_response(),
    )
}
