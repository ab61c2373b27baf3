//! Strata Cloud API client.
//!
//! [`StrataClient`] wraps an authenticated HTTP session against a Strata
//! deployment. It builds requests, attaches the account token, and hands back
//! the raw response bytes; decoding the payload is left to the caller.

use std::time::Duration;

use bytes::Bytes;
use reqwest::{Client as ReqwestClient, Method, RequestBuilder};
use serde_json::Value;
use tracing::debug;

use crate::error::{Result, StrataError};

/// Request timeout applied unless overridden through the builder.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Framework substituted when an empty string is passed to the compliance
/// operations.
pub const DEFAULT_FRAMEWORK: &str = "soc2";

/// Authenticated client for the Strata Cloud services API.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Clone)]
pub struct StrataClient {
    http: ReqwestClient,
    base_url: String,
    token: String,
}

impl StrataClient {
    /// Create a client with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::Transport`] if the underlying HTTP client
    /// cannot be initialized.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        Self::builder().build(base_url, token)
    }

    /// Start building a client with non-default settings.
    pub fn builder() -> StrataClientBuilder {
        StrataClientBuilder::default()
    }

    /// List provisioned service instances.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::Transport`] if the request cannot be completed,
    /// or [`StrataError::Api`] if the server answers with status >= 400.
    pub async fn list_service_instances(&self) -> Result<Bytes> {
        self.send(self.request(Method::GET, "/api/services/instances/")).await
    }

    /// List managed Kubernetes clusters.
    ///
    /// # Errors
    ///
    /// See [`StrataClient::list_service_instances`].
    pub async fn list_kubernetes_clusters(&self) -> Result<Bytes> {
        self.send(self.request(Method::GET, "/api/services/kubernetes-clusters/")).await
    }

    /// List object storage buckets.
    ///
    /// # Errors
    ///
    /// See [`StrataClient::list_service_instances`].
    pub async fn list_buckets(&self) -> Result<Bytes> {
        self.send(self.request(Method::GET, "/api/services/buckets/")).await
    }

    /// List virtual private clouds.
    ///
    /// # Errors
    ///
    /// See [`StrataClient::list_service_instances`].
    pub async fn list_vpcs(&self) -> Result<Bytes> {
        self.send(self.request(Method::GET, "/api/services/vpcs/")).await
    }

    /// Fetch per-control status for a compliance framework.
    ///
    /// An empty `framework` falls back to [`DEFAULT_FRAMEWORK`]. Any other
    /// value is sent verbatim; the server decides whether it knows it.
    ///
    /// # Errors
    ///
    /// See [`StrataClient::list_service_instances`].
    pub async fn compliance_control_status(&self, framework: &str) -> Result<Bytes> {
        let request = self
            .request(Method::GET, "/api/services/compliance/control_status/")
            .query(&[("framework", default_framework(framework))]);
        self.send(request).await
    }

    /// Trigger an evidence collection run for a compliance framework.
    ///
    /// An empty `framework` falls back to [`DEFAULT_FRAMEWORK`].
    ///
    /// # Errors
    ///
    /// See [`StrataClient::list_service_instances`].
    pub async fn collect_compliance_evidence(&self, framework: &str) -> Result<Bytes> {
        let body = serde_json::json!({ "framework": default_framework(framework) });
        let request =
            self.request(Method::POST, "/api/services/compliance/collect_evidence/").json(&body);
        self.send(request).await
    }

    /// Request an attestation report for a framework over a reporting period.
    ///
    /// All three fields are forwarded as given; the server validates the
    /// framework name and the period bounds.
    ///
    /// # Errors
    ///
    /// See [`StrataClient::list_service_instances`].
    pub async fn compliance_attestation(
        &self,
        framework: &str,
        period_start: &str,
        period_end: &str,
    ) -> Result<Bytes> {
        let body = serde_json::json!({
            "framework": framework,
            "period_start": period_start,
            "period_end": period_end,
        });
        let request =
            self.request(Method::POST, "/api/services/compliance/attestation/").json(&body);
        self.send(request).await
    }

    /// Execute a GraphQL document against the platform endpoint.
    ///
    /// When `variables` is `None` an empty object is sent in its place, which
    /// is what the endpoint expects for queries without inputs.
    ///
    /// # Errors
    ///
    /// See [`StrataClient::list_service_instances`].
    pub async fn graphql(&self, query: &str, variables: Option<Value>) -> Result<Bytes> {
        let body = serde_json::json!({
            "query": query,
            "variables": variables.unwrap_or_else(|| serde_json::json!({})),
        });
        let request = self.request(Method::POST, "/api/graphql/").json(&body);
        self.send(request).await
    }

    /// Create a request builder for `path` with the authentication and
    /// content-type headers already attached.
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.http
            .request(method, url)
            .header("Authorization", format!("Token {}", self.token))
            .header("Content-Type", "application/json")
    }

    /// Execute the request and return the response body as raw bytes.
    ///
    /// The body is read before the status is inspected so that a failed read
    /// surfaces as a transport error even on error statuses.
    async fn send(&self, builder: RequestBuilder) -> Result<Bytes> {
        let request = builder.build()?;
        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, %url, "sending request");

        let response = self.http.execute(request).await?;
        let status = response.status();
        debug!(%method, %url, %status, "received response");

        let body = response.bytes().await?;
        if status.as_u16() >= 400 {
            return Err(StrataError::Api(String::from_utf8_lossy(&body).into_owned()));
        }
        Ok(body)
    }
}

/// Builder for [`StrataClient`].
#[derive(Debug)]
pub struct StrataClientBuilder {
    timeout: Duration,
    user_agent: Option<String>,
}

impl Default for StrataClientBuilder {
    fn default() -> Self {
        Self { timeout: DEFAULT_TIMEOUT, user_agent: None }
    }
}

impl StrataClientBuilder {
    /// Override the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a `User-Agent` header for all requests.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the client against `base_url`, authenticating with `token`.
    ///
    /// Trailing slashes on `base_url` are trimmed so operation paths can be
    /// appended verbatim. Neither argument is otherwise validated; a
    /// malformed base URL surfaces as a transport error on first use.
    ///
    /// # Errors
    ///
    /// Returns [`StrataError::Transport`] if the underlying HTTP client
    /// cannot be initialized.
    pub fn build(
        self,
        base_url: impl Into<String>,
        token: impl Into<String>,
    ) -> Result<StrataClient> {
        let mut builder = ReqwestClient::builder().timeout(self.timeout).no_proxy();

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        let http = builder.build()?;
        let base_url = base_url.into();

        Ok(StrataClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }
}

fn default_framework(framework: &str) -> &str {
    if framework.is_empty() {
        DEFAULT_FRAMEWORK
    } else {
        framework
    }
}
