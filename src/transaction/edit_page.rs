//! The page for editing an existing transaction.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use crate::{
    Error, endpoints,
    error::FieldErrors,
    record_store::RecordStoreState,
    transaction::{
        core::TransactionId,
        form::{FormTarget, TransactionFormData, transaction_form, transaction_form_page},
    },
};

/// Renders the transaction form prefilled with the stored transaction.
pub async fn get_edit_transaction_page(
    State(state): State<RecordStoreState>,
    Path(transaction_id): Path<TransactionId>,
) -> Result<Response, Error> {
    let transaction = state
        .record_store
        .get_transaction(transaction_id)
        .await
        .inspect_err(|error| {
            tracing::error!("Could not get transaction {transaction_id}: {error}");
        })?;

    let form = transaction_form(
        FormTarget::Update(transaction_id),
        &TransactionFormData::from_payload(&transaction.payload()),
        &FieldErrors::new(),
        None,
    );

    Ok(
        transaction_form_page("Edit Transaction", endpoints::EDIT_TRANSACTION_VIEW, &form)
            .into_response(),
    )
}

#[cfg(test)]
mod tests {
    use axum::{
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use scraper::Selector;
    use time::macros::date;

    use crate::{
        Error,
        record_store::RecordStoreState,
        test_utils::{
            FakeRecordStore, assert_hx_endpoint, assert_valid_html, input_value, must_get_form,
            parse_html_document,
        },
        transaction::{Transaction, TransactionType},
    };

    use super::get_edit_transaction_page;

    fn salary() -> Transaction {
        Transaction {
            id: 4,
            date: date!(2024 - 06 - 25),
            description: "Salary".to_owned(),
            category: "給与".to_owned(),
            amount: 300000.0,
            type_: TransactionType::Income,
        }
    }

    #[tokio::test]
    async fn prefills_form_with_stored_transaction() {
        let store = FakeRecordStore::with_transactions(vec![salary()]).await;
        let state = RecordStoreState {
            record_store: store.logged_in_client().await,
        };

        let response = get_edit_transaction_page(State(state), Path(4)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let document = parse_html_document(response).await;
        assert_valid_html(&document);
        assert_hx_endpoint(&must_get_form(&document), "/api/transactions/4", "hx-put");
        assert_eq!(input_value(&document, "transactionDate"), Some("2024-06-25"));
        assert_eq!(input_value(&document, "description"), Some("Salary"));
        assert_eq!(input_value(&document, "amount"), Some("300000"));

        let selected_category = document
            .select(&Selector::parse("select[name=category] option[selected]").unwrap())
            .filter_map(|option| option.value().attr("value"))
            .collect::<Vec<_>>();
        assert_eq!(selected_category, vec!["給与"]);
    }

    #[tokio::test]
    async fn missing_transaction_is_not_found() {
        let store = FakeRecordStore::with_transactions(vec![salary()]).await;
        let state = RecordStoreState {
            record_store: store.logged_in_client().await,
        };

        let error = get_edit_transaction_page(State(state), Path(99))
            .await
            .unwrap_err();

        assert_eq!(error, Error::NotFound);
        assert_eq!(error.into_response().status(), StatusCode::NOT_FOUND);
    }
}
