//! Downloading the transaction list as a CSV file.

use axum::{
    extract::{Query, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};

use crate::{Error, record_store::RecordStoreState};

use super::{core::Transaction, transactions_page::TransactionsQuery, view_model::filter_and_sort};

const EXPORT_FILE_NAME: &str = "transactions.csv";

/// Write `transactions` as CSV with a header row using the record store's
/// field names.
fn write_csv(transactions: &[&Transaction]) -> Result<Vec<u8>, Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    for transaction in transactions {
        writer
            .serialize(transaction)
            .map_err(|error| Error::CsvExport(error.to_string()))?;
    }

    writer
        .into_inner()
        .map_err(|error| Error::CsvExport(error.to_string()))
}

/// Export the transactions that match the list page's filters in the list's
/// sort order. Every row is exported, not just the current page.
pub async fn export_transactions(
    State(state): State<RecordStoreState>,
    Query(query): Query<TransactionsQuery>,
) -> Result<Response, Error> {
    let transactions = state
        .record_store
        .list_transactions()
        .await
        .inspect_err(|error| tracing::error!("Could not list transactions for export: {error}"))?;

    let rows = filter_and_sort(&transactions, &query.filter(), query.sort_order());
    let body = write_csv(&rows).inspect_err(|error| tracing::error!("{error}"))?;

    tracing::info!("Exported {} of {} transactions", rows.len(), transactions.len());

    Ok((
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{EXPORT_FILE_NAME}\""),
            ),
        ],
        body,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use axum::{
        extract::{Query, State},
        http::StatusCode,
    };
    use time::macros::date;

    use crate::{
        record_store::RecordStoreState,
        test_utils::{FakeRecordStore, get_header},
        transaction::{Transaction, TransactionType, transactions_page::TransactionsQuery},
    };

    use super::{export_transactions, write_csv};

    fn transactions() -> Vec<Transaction> {
        vec![
            Transaction {
                id: 1,
                date: date!(2024 - 07 - 01),
                description: "Lunch, with friends".to_owned(),
                category: "食費".to_owned(),
                amount: 1200.0,
                type_: TransactionType::Expense,
            },
            Transaction {
                id: 2,
                date: date!(2024 - 07 - 25),
                description: "Salary".to_owned(),
                category: "給与".to_owned(),
                amount: 300000.0,
                type_: TransactionType::Income,
            },
            Transaction {
                id: 3,
                date: date!(2024 - 07 - 10),
                description: "Bus".to_owned(),
                category: "交通費".to_owned(),
                amount: 220.0,
                type_: TransactionType::Expense,
            },
        ]
    }

    #[test]
    fn writes_header_and_quotes_commas() {
        let transactions = transactions();
        let rows = transactions.iter().take(1).collect::<Vec<_>>();

        let csv = String::from_utf8(write_csv(&rows).unwrap()).unwrap();

        assert_eq!(
            csv,
            "id,transactionDate,description,category,amount,type\n\
            1,2024-07-01,\"Lunch, with friends\",食費,1200.0,EXPENSE\n"
        );
    }

    #[tokio::test]
    async fn exports_filtered_rows_in_list_order() {
        let store = FakeRecordStore::with_transactions(transactions()).await;
        let state = RecordStoreState {
            record_store: store.logged_in_client().await,
        };
        let query: TransactionsQuery =
            serde_urlencoded::from_str("max=5000&sort=amount&order=asc&per_page=10&page=3").unwrap();

        let response = export_transactions(State(state), Query(query)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(get_header(&response, "content-type"), "text/csv; charset=utf-8");
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let ids = String::from_utf8_lossy(&body)
            .lines()
            .skip(1)
            .map(|line| line.split(',').next().unwrap_or_default().to_owned())
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["3", "1"]);
    }
}
