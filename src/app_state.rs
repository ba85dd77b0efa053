//! Implements a struct that holds the state of the web server.

use crate::{
    Error, auth::SessionGate, pagination::PaginationConfig, record_store::RecordStoreClient,
    timezone::get_local_offset,
};

/// The state of the web server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The client for the record store that holds the user's data.
    pub record_store: RecordStoreClient,

    /// Whether the user is logged in to the record store.
    pub session: SessionGate,

    /// The local timezone as a canonical timezone name, e.g. "Asia/Tokyo".
    pub local_timezone: String,

    /// The config that controls how to display pages of data.
    pub pagination_config: PaginationConfig,
}

impl AppState {
    /// Create a new [AppState] for the record store at `record_store_url`.
    ///
    /// The session starts out loading, call [SessionGate::check_status] to
    /// settle it.
    ///
    /// # Errors
    /// Returns an error if `record_store_url` is not a valid base URL or if
    /// `local_timezone` is not a canonical timezone name.
    pub fn new(
        record_store_url: &str,
        local_timezone: &str,
        pagination_config: PaginationConfig,
    ) -> Result<Self, Error> {
        if get_local_offset(local_timezone).is_none() {
            return Err(Error::InvalidTimezoneError(local_timezone.to_owned()));
        }

        let record_store = RecordStoreClient::new(record_store_url)?;
        let session = SessionGate::new(record_store.clone());

        Ok(Self {
            record_store,
            session,
            local_timezone: local_timezone.to_owned(),
            pagination_config,
        })
    }
}
