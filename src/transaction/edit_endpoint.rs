//! The endpoint for saving changes to a transaction.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;

use crate::{
    endpoints,
    record_store::RecordStoreState,
    transaction::{
        core::TransactionId,
        create_endpoint::rejected_submission,
        form::{FormTarget, TransactionFormData, transaction_form},
    },
};

/// Replace the stored transaction with the submitted form, then send the
/// browser back to the transaction list.
pub async fn edit_transaction_endpoint(
    State(state): State<RecordStoreState>,
    Path(transaction_id): Path<TransactionId>,
    Form(values): Form<TransactionFormData>,
) -> Response {
    let target = FormTarget::Update(transaction_id);

    let payload = match values.validate() {
        Ok(payload) => payload,
        Err(errors) => {
            tracing::debug!("Rejected edit of transaction {transaction_id}: {errors:?}");
            return transaction_form(target, &values, &errors, None).into_response();
        }
    };

    match state
        .record_store
        .update_transaction(transaction_id, &payload)
        .await
    {
        Ok(_) => (
            HxRedirect(endpoints::TRANSACTIONS_VIEW.to_owned()),
            StatusCode::OK,
        )
            .into_response(),
        Err(error) => rejected_submission(target, &values, error),
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        extract::{Path, State},
        http::StatusCode,
    };
    use axum_extra::extract::Form;
    use time::macros::date;

    use crate::{
        endpoints,
        record_store::RecordStoreState,
        test_utils::{
            FakeRecordStore, assert_field_error, assert_hx_endpoint, assert_hx_redirect,
            must_get_form, parse_html_fragment,
        },
        transaction::{Transaction, TransactionType, form::TransactionFormData},
    };

    use super::edit_transaction_endpoint;

    fn train_fare() -> Transaction {
        Transaction {
            id: 2,
            date: date!(2024 - 07 - 01),
            description: "Train".to_owned(),
            category: "交通費".to_owned(),
            amount: 320.0,
            type_: TransactionType::Expense,
        }
    }

    fn edited_values(amount: &str) -> TransactionFormData {
        TransactionFormData {
            type_: Some("EXPENSE".to_owned()),
            date: Some("2024-07-02".to_owned()),
            description: Some("Train to Kyoto".to_owned()),
            category: Some("交通費".to_owned()),
            amount: Some(amount.to_owned()),
        }
    }

    #[tokio::test]
    async fn saves_changes_and_redirects_to_list() {
        let store = FakeRecordStore::with_transactions(vec![train_fare()]).await;
        let state = RecordStoreState {
            record_store: store.logged_in_client().await,
        };

        let response =
            edit_transaction_endpoint(State(state), Path(2), Form(edited_values("1450"))).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_hx_redirect(&response, endpoints::TRANSACTIONS_VIEW);
        assert_eq!(
            store.transactions(),
            vec![Transaction {
                id: 2,
                date: date!(2024 - 07 - 02),
                description: "Train to Kyoto".to_owned(),
                category: "交通費".to_owned(),
                amount: 1450.0,
                type_: TransactionType::Expense,
            }]
        );
    }

    #[tokio::test]
    async fn empty_amount_keeps_form_targeting_same_transaction() {
        let store = FakeRecordStore::with_transactions(vec![train_fare()]).await;
        let state = RecordStoreState {
            record_store: store.logged_in_client().await,
        };

        let response =
            edit_transaction_endpoint(State(state), Path(2), Form(edited_values(""))).await;

        let html = parse_html_fragment(response).await;
        assert_field_error(&html, "amount", "Amount is required.");
        assert_hx_endpoint(&must_get_form(&html), "/api/transactions/2", "hx-put");
        assert_eq!(store.transactions(), vec![train_fare()]);
    }

    #[tokio::test]
    async fn missing_transaction_shows_alert() {
        let store = FakeRecordStore::start().await;
        let state = RecordStoreState {
            record_store: store.logged_in_client().await,
        };

        let response =
            edit_transaction_endpoint(State(state), Path(2), Form(edited_values("100"))).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
