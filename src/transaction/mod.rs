//! Transactions: the model exchanged with the record store, the list page
//! with its filter, sort and paging pipeline, and the forms for creating and
//! editing transactions.

mod amount;
mod core;
mod create_endpoint;
mod create_page;
mod delete_endpoint;
mod edit_endpoint;
mod edit_page;
mod export;
mod filter;
mod form;
mod sort;
mod transactions_page;
mod view;
mod view_model;

pub use core::{CATEGORIES, Transaction, TransactionId, TransactionPayload, TransactionType};
pub use create_endpoint::create_transaction_endpoint;
pub use create_page::get_new_transaction_page;
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::edit_transaction_endpoint;
pub use edit_page::get_edit_transaction_page;
pub use export::export_transactions;
pub use sort::{SortDirection, SortKey, SortOrder, sort_transactions};
pub use transactions_page::get_transactions_page;
