//! Backend API client.
//!
//! # Responsibilities
//! - Compose backend URLs from the configured base and forwarded segments
//! - Attach the bearer token when the caller provides one
//! - Propagate the request ID
//! - Return status and raw body; decoding is the caller's choice
//!
//! # Design Decisions
//! - One shared `reqwest::Client` (pooled, cheap to clone)
//! - No retries and no timeout override: each call is a single forward
//! - Missing base URL fails before any network activity

use std::time::Instant;

use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use reqwest::multipart::Form;
use reqwest::RequestBuilder;
use url::Url;

use crate::config::BackendConfig;
use crate::error::GatewayError;
use crate::http::request::{RequestId, X_REQUEST_ID};
use crate::observability::metrics;
use crate::session::Credential;
use crate::upstream::types::{BackendReply, ForwardedRequest, LoginCredentials};

#[derive(Debug, Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base: Option<Url>,
}

impl BackendClient {
    pub fn new(http: reqwest::Client, base: Option<Url>) -> Self {
        Self { http, base }
    }

    /// Build from configuration. An unparseable base URL counts as unset.
    pub fn from_config(config: &BackendConfig) -> Self {
        let base = config.base_url.as_deref().and_then(|raw| match Url::parse(raw) {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::error!(base_url = %raw, error = %e, "Ignoring invalid backend base URL");
                None
            }
        });
        Self::new(reqwest::Client::new(), base)
    }

    pub fn is_configured(&self) -> bool {
        self.base.is_some()
    }

    pub fn require_configured(&self) -> Result<(), GatewayError> {
        if self.is_configured() {
            Ok(())
        } else {
            Err(GatewayError::NotConfigured)
        }
    }

    /// Join the base URL with path segments and a raw query string.
    pub fn endpoint<'a, I>(&self, segments: I, query: Option<&str>) -> Result<Url, GatewayError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut url = self.base.clone().ok_or(GatewayError::NotConfigured)?;
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| GatewayError::NotConfigured)?;
            path.pop_if_empty();
            for segment in segments.into_iter().filter(|s| !s.is_empty()) {
                path.push(segment);
            }
        }
        url.set_query(query.filter(|q| !q.is_empty()));
        Ok(url)
    }

    fn endpoint_for(&self, path: &str) -> Result<Url, GatewayError> {
        self.endpoint(path.split('/'), None)
    }

    /// Forward a browser call with the session's bearer token.
    pub async fn forward(
        &self,
        request: &ForwardedRequest,
        credential: &Credential,
        request_id: &RequestId,
    ) -> Result<BackendReply, GatewayError> {
        let url = self.endpoint(
            request.segments.iter().map(String::as_str),
            request.query.as_deref(),
        )?;

        tracing::debug!(
            request_id = %request_id,
            method = %request.method,
            url = %url,
            "Forwarding to backend"
        );

        let mut builder = self
            .http
            .request(request.method.clone(), url)
            .bearer_auth(credential.expose())
            .header(CONTENT_TYPE, "application/json");
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        self.send("proxy", builder, request_id).await
    }

    /// Post a credential pair to the login endpoint.
    pub async fn login(
        &self,
        path: &str,
        credentials: &LoginCredentials,
        request_id: &RequestId,
    ) -> Result<BackendReply, GatewayError> {
        let url = self.endpoint_for(path)?;
        let builder = self.http.post(url).json(credentials);
        self.send("login", builder, request_id).await
    }

    /// GET a public endpoint without credentials.
    pub async fn get_public(
        &self,
        path: &str,
        request_id: &RequestId,
    ) -> Result<BackendReply, GatewayError> {
        let url = self.endpoint_for(path)?;
        let builder = self.http.get(url).header(CACHE_CONTROL, "no-store");
        self.send("public", builder, request_id).await
    }

    /// Post a multipart form, with the bearer token when one is present.
    pub async fn upload(
        &self,
        path: &str,
        form: Form,
        credential: Option<&Credential>,
        request_id: &RequestId,
    ) -> Result<BackendReply, GatewayError> {
        let url = self.endpoint_for(path)?;
        let mut builder = self
            .http
            .post(url)
            .header(CACHE_CONTROL, "no-store")
            .multipart(form);
        if let Some(credential) = credential {
            builder = builder.bearer_auth(credential.expose());
        }
        self.send("upload", builder, request_id).await
    }

    async fn send(
        &self,
        operation: &'static str,
        builder: RequestBuilder,
        request_id: &RequestId,
    ) -> Result<BackendReply, GatewayError> {
        let start = Instant::now();
        let response = builder
            .header(X_REQUEST_ID, request_id.as_str())
            .send()
            .await?;
        let status = response.status();
        let body = response.bytes().await?;

        metrics::record_upstream(operation, status.as_u16(), start);
        tracing::debug!(
            request_id = %request_id,
            operation,
            status = %status,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Backend replied"
        );

        Ok(BackendReply { status, body })
    }
}
