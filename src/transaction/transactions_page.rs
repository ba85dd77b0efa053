//! The page listing transactions with category tabs, filters, sorting and
//! paging.
//!
//! All list settings live in the query string so every link and the filter
//! form produce a fresh request for the full transaction list.

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::{AppState, Error, pagination::PaginationConfig, record_store::RecordStoreClient};

use super::{
    filter::{CategorySelection, TransactionFilter, parse_amount_bound, parse_date_bound},
    sort::{SortDirection, SortKey, SortOrder},
    view::transactions_view,
    view_model::{ListSettings, build_page},
};

/// The state needed for the transactions page.
#[derive(Debug, Clone)]
pub struct TransactionsPageState {
    pub record_store: RecordStoreClient,
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for TransactionsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            record_store: state.record_store.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// The list settings as they appear in the query string.
///
/// Values are kept as text and interpreted leniently, so a malformed value
/// falls back to its default instead of rejecting the request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionsQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_page: Option<String>,
}

fn parse_sort_key(raw: &str) -> Option<SortKey> {
    match raw {
        "date" => Some(SortKey::Date),
        "type" => Some(SortKey::Type),
        "category" => Some(SortKey::Category),
        "description" => Some(SortKey::Description),
        "amount" => Some(SortKey::Amount),
        _ => None,
    }
}

fn parse_sort_direction(raw: &str) -> Option<SortDirection> {
    match raw {
        "asc" => Some(SortDirection::Asc),
        "desc" => Some(SortDirection::Desc),
        _ => None,
    }
}

impl TransactionsQuery {
    pub fn filter(&self) -> TransactionFilter {
        TransactionFilter {
            search_term: self.q.clone().unwrap_or_default(),
            start_date: self.start.as_deref().and_then(parse_date_bound),
            end_date: self.end.as_deref().and_then(parse_date_bound),
            min_amount: self.min.as_deref().and_then(parse_amount_bound),
            max_amount: self.max.as_deref().and_then(parse_amount_bound),
            category: CategorySelection::from_query(self.category.as_deref()),
        }
    }

    pub fn sort_order(&self) -> SortOrder {
        let default = SortOrder::default();

        SortOrder {
            key: self
                .sort
                .as_deref()
                .and_then(parse_sort_key)
                .unwrap_or(default.key),
            direction: self
                .order
                .as_deref()
                .and_then(parse_sort_direction)
                .unwrap_or(default.direction),
        }
    }

    /// Interpret the query, applying defaults for anything missing or
    /// malformed.
    pub fn settings(&self, config: &PaginationConfig) -> ListSettings {
        let page_size = config.page_size_or_default(
            self.per_page
                .as_deref()
                .and_then(|raw| raw.trim().parse().ok()),
        );

        ListSettings {
            filter: self.filter(),
            sort: self.sort_order(),
            page_index: self
                .page
                .as_deref()
                .and_then(|raw| raw.trim().parse().ok())
                .unwrap_or(0),
            page_size,
        }
    }

    /// `path` with this query appended, or just `path` when there is nothing
    /// to append.
    pub fn to_url(&self, path: &str) -> String {
        match serde_urlencoded::to_string(self) {
            Ok(query) if !query.is_empty() => format!("{path}?{query}"),
            Ok(_) => path.to_owned(),
            Err(error) => {
                tracing::error!("Could not encode transactions query {self:?}: {error}");
                path.to_owned()
            }
        }
    }

    /// Keep the page, sort by `order`.
    pub fn with_sort(&self, order: SortOrder) -> Self {
        Self {
            sort: Some(order.key.as_query_value().to_owned()),
            order: Some(order.direction.as_query_value().to_owned()),
            ..self.clone()
        }
    }

    pub fn with_page(&self, page_index: u64) -> Self {
        Self {
            page: Some(page_index.to_string()),
            ..self.clone()
        }
    }

    /// Switch page size and go back to the first page.
    pub fn with_page_size(&self, page_size: u64) -> Self {
        Self {
            per_page: Some(page_size.to_string()),
            page: None,
            ..self.clone()
        }
    }

    /// Switch category tab and go back to the first page.
    pub fn with_category(&self, category: &CategorySelection) -> Self {
        Self {
            category: match category {
                CategorySelection::All => None,
                CategorySelection::Only(label) => Some(label.clone()),
            },
            page: None,
            ..self.clone()
        }
    }

    /// Clear the search term and bounds, keeping the tab, sort and page size.
    pub fn without_filters(&self) -> Self {
        Self {
            category: self.category.clone(),
            sort: self.sort.clone(),
            order: self.order.clone(),
            per_page: self.per_page.clone(),
            ..Default::default()
        }
    }
}

/// Renders the transaction list for the settings in the query string.
pub async fn get_transactions_page(
    State(state): State<TransactionsPageState>,
    Query(query): Query<TransactionsQuery>,
) -> Result<Response, Error> {
    let transactions = state
        .record_store
        .list_transactions()
        .await
        .inspect_err(|error| tracing::error!("Could not list transactions: {error}"))?;

    let settings = query.settings(&state.pagination_config);
    let page = build_page(&transactions, &settings);

    Ok(transactions_view(&query, &settings, &page, state.pagination_config.max_pages).into_response())
}
