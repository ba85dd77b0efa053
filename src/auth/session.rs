//! The process-wide session status and the operations that move it.

use std::sync::{Arc, PoisonError, RwLock};

use crate::{Error, record_store::RecordStoreClient};

/// Whether the record store accepts the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// The startup status check has not finished yet.
    Loading,
    Authenticated,
    Unauthenticated,
}

/// Tracks whether the user is logged in to the record store.
///
/// The status starts as [SessionStatus::Loading] and is settled by
/// [SessionGate::check_status]. After that it only changes through
/// [SessionGate::log_in] and [SessionGate::log_out]. Clones share the same
/// status.
#[derive(Debug, Clone)]
pub struct SessionGate {
    status: Arc<RwLock<SessionStatus>>,
    record_store: RecordStoreClient,
}

impl SessionGate {
    pub fn new(record_store: RecordStoreClient) -> Self {
        Self {
            status: Arc::new(RwLock::new(SessionStatus::Loading)),
            record_store,
        }
    }

    /// Create a gate that starts with `status` instead of loading.
    #[cfg(test)]
    pub(crate) fn with_status(record_store: RecordStoreClient, status: SessionStatus) -> Self {
        Self {
            status: Arc::new(RwLock::new(status)),
            record_store,
        }
    }

    pub fn status(&self) -> SessionStatus {
        *self.status.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_status(&self, status: SessionStatus) {
        *self.status.write().unwrap_or_else(PoisonError::into_inner) = status;
    }

    /// Ask the record store whether the current session is valid.
    ///
    /// Any failure, including a transport error, counts as not logged in.
    pub async fn check_status(&self) -> SessionStatus {
        let status = match self.record_store.auth_status().await {
            Ok(()) => SessionStatus::Authenticated,
            Err(error) => {
                tracing::debug!("Session check failed: {error}");
                SessionStatus::Unauthenticated
            }
        };

        self.set_status(status);
        tracing::info!("Session status is {status:?}");

        status
    }

    /// Log in to the record store, leaving the status unchanged on failure.
    pub async fn log_in(&self, username: &str, password: &str) -> Result<(), Error> {
        self.record_store.log_in(username, password).await?;
        self.set_status(SessionStatus::Authenticated);

        Ok(())
    }

    /// Log out of the record store.
    ///
    /// The status becomes [SessionStatus::Unauthenticated] even if the request
    /// fails. The error is returned so the caller can log it.
    pub async fn log_out(&self) -> Result<(), Error> {
        let result = self.record_store.log_out().await;
        self.set_status(SessionStatus::Unauthenticated);

        result
    }

    /// Create an account. Registering does not log the user in.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        email: Option<&str>,
    ) -> Result<(), Error> {
        self.record_store.register(username, password, email).await
    }

    pub async fn forgot_password(&self, email: &str) -> Result<(), Error> {
        self.record_store.forgot_password(email).await
    }

    /// Set a new password with the token from a reset link. The user still has
    /// to log in afterwards.
    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), Error> {
        self.record_store.reset_password(token, new_password).await
    }
}
