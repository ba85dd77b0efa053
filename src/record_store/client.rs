//! A typed wrapper over the record store's REST API.
//!
//! Every method maps the HTTP outcome onto [Error]: transport failures become
//! [Error::Transport], 400 becomes [Error::Validation] with the field messages
//! from the body, 401 and 403 become [Error::Unauthorized] and 404 becomes
//! [Error::NotFound].

use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{
    Error,
    error::FieldErrors,
    transaction::{Transaction, TransactionId, TransactionPayload},
};

/// Talks to the record store on behalf of the user.
///
/// The session cookie set by the record store on log in is kept in the
/// client's cookie store and sent with every later request. Cloning the client
/// shares the connection pool and the cookie store.
#[derive(Debug, Clone)]
pub struct RecordStoreClient {
    client: Client,
    base_url: String,
}

#[derive(Serialize)]
struct RegisterRequest<'a> {
    username: &'a str,
    password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<&'a str>,
}

#[derive(Serialize)]
struct ForgotPasswordRequest<'a> {
    email: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ResetPasswordRequest<'a> {
    token: &'a str,
    new_password: &'a str,
}

impl RecordStoreClient {
    /// Create a client for the record store at `base_url`, e.g.
    /// "http://localhost:8080/api".
    ///
    /// # Errors
    /// Returns [Error::InvalidRecordStoreUrl] if `base_url` is not an absolute
    /// HTTP(S) URL, or [Error::ClientSetup] if the HTTP client could not be
    /// built.
    pub fn new(base_url: &str) -> Result<Self, Error> {
        let url = Url::parse(base_url)
            .map_err(|error| Error::InvalidRecordStoreUrl(format!("{base_url}: {error}")))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::InvalidRecordStoreUrl(format!(
                "{base_url}: expected an http or https URL"
            )));
        }

        let client = Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|error| Error::ClientSetup(error.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub async fn list_transactions(&self) -> Result<Vec<Transaction>, Error> {
        let response = send(self.client.get(self.url("/transactions"))).await?;

        decode(response).await
    }

    pub async fn get_transaction(&self, id: TransactionId) -> Result<Transaction, Error> {
        let response = send(self.client.get(self.url(&format!("/transactions/{id}")))).await?;

        decode(response).await
    }

    pub async fn create_transaction(
        &self,
        payload: &TransactionPayload,
    ) -> Result<Transaction, Error> {
        let response = send(self.client.post(self.url("/transactions")).json(payload)).await?;

        decode(response).await
    }

    /// Replace every field of the transaction `id` with `payload`.
    pub async fn update_transaction(
        &self,
        id: TransactionId,
        payload: &TransactionPayload,
    ) -> Result<Transaction, Error> {
        let response = send(
            self.client
                .put(self.url(&format!("/transactions/{id}")))
                .json(payload),
        )
        .await?;

        decode(response).await
    }

    pub async fn delete_transaction(&self, id: TransactionId) -> Result<(), Error> {
        send(self.client.delete(self.url(&format!("/transactions/{id}")))).await?;

        Ok(())
    }

    /// Log in with a username and password.
    ///
    /// On success the record store sets a session cookie which the client
    /// keeps for later requests.
    pub async fn log_in(&self, username: &str, password: &str) -> Result<(), Error> {
        send(
            self.client
                .post(self.url("/auth/login"))
                .form(&[("username", username), ("password", password)]),
        )
        .await?;

        Ok(())
    }

    pub async fn log_out(&self) -> Result<(), Error> {
        send(self.client.post(self.url("/auth/logout"))).await?;

        Ok(())
    }

    pub async fn register(
        &self,
        username: &str,
        password: &str,
        email: Option<&str>,
    ) -> Result<(), Error> {
        let body = RegisterRequest {
            username,
            password,
            email,
        };
        send(self.client.post(self.url("/auth/register")).json(&body)).await?;

        Ok(())
    }

    /// Succeeds if the record store accepts the current session cookie.
    pub async fn auth_status(&self) -> Result<(), Error> {
        send(self.client.get(self.url("/auth/status"))).await?;

        Ok(())
    }

    /// Ask the record store to email a password reset link to `email`.
    pub async fn forgot_password(&self, email: &str) -> Result<(), Error> {
        send(
            self.client
                .post(self.url("/auth/forgot-password"))
                .json(&ForgotPasswordRequest { email }),
        )
        .await?;

        Ok(())
    }

    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), Error> {
        send(
            self.client
                .post(self.url("/auth/reset-password"))
                .json(&ResetPasswordRequest {
                    token,
                    new_password,
                }),
        )
        .await?;

        Ok(())
    }
}

async fn send(request: RequestBuilder) -> Result<Response, Error> {
    let response = request
        .send()
        .await
        .map_err(|error| Error::Transport(error.to_string()))?;

    check_status(response).await
}

async fn check_status(response: Response) -> Result<Response, Error> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    tracing::debug!("Record store responded to {} with {status}", response.url());

    match status {
        StatusCode::BAD_REQUEST => {
            let field_errors = response
                .json::<Value>()
                .await
                .map(field_errors_from_json)
                .unwrap_or_default();

            Err(Error::Validation(field_errors))
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(Error::Unauthorized),
        StatusCode::NOT_FOUND => Err(Error::NotFound),
        status => Err(Error::UnexpectedStatus(status.as_u16())),
    }
}

/// Collect the string values of a JSON object, e.g.
/// `{"amount": "must be positive"}`. Values of any other type are skipped.
fn field_errors_from_json(body: Value) -> FieldErrors {
    match body {
        Value::Object(fields) => fields
            .into_iter()
            .filter_map(|(field, message)| match message {
                Value::String(message) => Some((field, message)),
                _ => None,
            })
            .collect(),
        _ => FieldErrors::new(),
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, Error> {
    response
        .json()
        .await
        .map_err(|error| Error::InvalidResponse(error.to_string()))
}
