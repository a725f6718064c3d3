//! Typed HTTP client for the notes REST API.
//!
//! When built [`with_credentials`](HttpApi::with_credentials), every request
//! carries the token from the credential slot as a bearer header, read fresh on
//! each call so a login or logout takes effect immediately.

use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use store::CredentialSlot;

use crate::error::ApiError;
use crate::wire::{Credentials, ErrorBody, LoginResponse};
use crate::{Note, NoteDraft, NotePatch, NotesApi, UserInfo};

#[derive(Clone, Debug)]
pub struct HttpApi {
    base_url: String,
    client: reqwest::Client,
    credentials: Option<CredentialSlot>,
}

impl HttpApi {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            credentials: None,
        }
    }

    /// Attach the stored credential token to every request.
    pub fn with_credentials(mut self, slot: CredentialSlot) -> Self {
        self.credentials = Some(slot);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, format!("{}{}", self.base_url, path));
        match self.credentials.as_ref().and_then(CredentialSlot::read) {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send a request, turning non-success statuses into [`ApiError::Server`].
    async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let resp = builder.send().await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ErrorBody>(&body) {
            Ok(parsed) => parsed.message,
            Err(_) => Some(body.trim().to_string()).filter(|b| !b.is_empty()),
        };
        tracing::debug!("Notes API returned {}: {:?}", status, message);

        Err(ApiError::Server {
            status: status.as_u16(),
            message,
        })
    }

    async fn json<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
        resp.json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Like [`json`](Self::json), but an empty or `null` body is `None`.
    async fn optional_json<T: DeserializeOwned>(resp: Response) -> Result<Option<T>, ApiError> {
        let body = resp.text().await?;
        let body = body.trim();
        if body.is_empty() || body == "null" {
            return Ok(None);
        }
        serde_json::from_str(body)
            .map(Some)
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

impl NotesApi for HttpApi {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        let resp = self
            .send(self.request(Method::POST, "/auth/login").json(credentials))
            .await?;
        // No body means no token; the session store rejects it as a failed login
        Ok(Self::optional_json(resp).await?.unwrap_or_default())
    }

    async fn register(&self, credentials: &Credentials) -> Result<Option<UserInfo>, ApiError> {
        let resp = self
            .send(self.request(Method::POST, "/auth/register").json(credentials))
            .await?;
        Self::optional_json(resp).await
    }

    async fn list_notes(&self) -> Result<Vec<Note>, ApiError> {
        let resp = self.send(self.request(Method::GET, "/notes")).await?;
        Self::json(resp).await
    }

    async fn create_note(&self, draft: &NoteDraft) -> Result<Note, ApiError> {
        let resp = self
            .send(self.request(Method::POST, "/notes").json(draft))
            .await?;
        Self::json(resp).await
    }

    async fn update_note(&self, id: i64, draft: &NoteDraft) -> Result<NotePatch, ApiError> {
        let resp = self
            .send(self.request(Method::PUT, &format!("/notes/{id}")).json(draft))
            .await?;
        Self::json(resp).await
    }

    async fn delete_note(&self, id: i64) -> Result<(), ApiError> {
        self.send(self.request(Method::DELETE, &format!("/notes/{id}")))
            .await?;
        Ok(())
    }
}
