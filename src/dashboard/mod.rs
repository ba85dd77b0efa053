//! The dashboard: a summary of one month of transactions.

mod charts;
mod handlers;
mod month;
mod summary;

pub use handlers::get_dashboard_page;
