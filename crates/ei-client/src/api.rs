//! REST client for the energyinsight backend.
//!
//! Every request carries the session's bearer token when one is present.
//! Successful login/register responses are written back to the session.

use std::time::Duration;

use ei_core::{
    AuthResponse, DetailedReport, EnergyPage, LoginRequest, RegisterRequest, ReportsPage,
};
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::session::SessionStore;
use crate::{ClientError, ClientResult};

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: SessionStore,
}

impl ApiClient {
    pub fn new(config: &ClientConfig, session: SessionStore) -> ClientResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_s))
            .build()?;
        Ok(Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> ClientResult<T> {
        let url = self.endpoint(path);
        tracing::debug!(%url, ?query, "GET");
        let response = self.authorized(self.http.get(&url).query(query)).send()?;
        decode(response)
    }

    /// `GET /api/energy?page=&limit=&location=`
    pub fn energy_page(
        &self,
        page: u32,
        limit: usize,
        location: Option<&str>,
    ) -> ClientResult<EnergyPage> {
        let mut query = vec![("page", page.to_string()), ("limit", limit.to_string())];
        if let Some(location) = location.filter(|l| !l.is_empty()) {
            query.push(("location", location.to_string()));
        }
        self.get_json("/api/energy", &query)
    }

    /// `GET /api/reports/table?page=&limit=`
    pub fn reports_page(&self, page: u32, limit: usize) -> ClientResult<ReportsPage> {
        self.get_json(
            "/api/reports/table",
            &[("page", page.to_string()), ("limit", limit.to_string())],
        )
    }

    /// `GET /api/reports/:id`
    pub fn report(&self, id: &str) -> ClientResult<DetailedReport> {
        self.get_json(&format!("/api/reports/{}", id), &[])
    }

    pub fn login(&self, request: &LoginRequest) -> ClientResult<AuthResponse> {
        self.authenticate("/api/auth/login", request)
    }

    pub fn register(&self, request: &RegisterRequest) -> ClientResult<AuthResponse> {
        self.authenticate("/api/auth/register", request)
    }

    fn authenticate<B: serde::Serialize>(&self, path: &str, body: &B) -> ClientResult<AuthResponse> {
        let url = self.endpoint(path);
        tracing::debug!(%url, "POST");
        let response = self.authorized(self.http.post(&url).json(body)).send()?;
        let auth: AuthResponse = decode(response)?;
        self.session.store(&auth)?;
        tracing::info!(user = %auth.email, "signed in");
        Ok(auth)
    }
}

/// Decode a JSON body, turning non-2xx statuses into [`ClientError::Status`].
pub(crate) fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        return Err(ClientError::Status {
            status: status.as_u16(),
            message: error_message(&body, status.canonical_reason().unwrap_or("")),
        });
    }
    let bytes = response.bytes()?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Prefer the backend's `{"message": ...}` body over the bare status text.
fn error_message(body: &str, fallback: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| fallback.to_string())
}
