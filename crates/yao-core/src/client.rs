//! HTTP client configuration and the reqwest-backed [`Transport`].
//!
//! [`ServiceClient`] talks to one OpenStack service endpoint. It sends the
//! `X-Auth-Token` header when a token is configured and maps non-success
//! statuses onto [`Error`] variants.

use crate::error::{Error, Result};
use crate::transport::{ApiRequest, ApiResponse, Transport};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, ClientBuilder};
use secrecy::{ExposeSecret, SecretString};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

const USER_AGENT: &str = concat!("yao/", env!("CARGO_PKG_VERSION"));
const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";

// Service-specific timeout configurations (in seconds)

/// Default timeout for identity requests
pub const IDENTITY_DEFAULT_TIMEOUT: u64 = 15;

/// Default timeout for compute requests
pub const COMPUTE_DEFAULT_TIMEOUT: u64 = 30;

/// Default timeout for network and load balancer requests
pub const NETWORK_DEFAULT_TIMEOUT: u64 = 20;

/// Default timeout for metering requests (statistics queries are slow)
pub const METERING_DEFAULT_TIMEOUT: u64 = 30;

/// Default timeout for image and volume requests
pub const STORAGE_DEFAULT_TIMEOUT: u64 = 60;

// Connection pool settings

/// Default idle timeout for connection pools
pub const DEFAULT_POOL_IDLE_TIMEOUT: u64 = 90;

/// Default maximum idle connections per host
pub const DEFAULT_POOL_MAX_IDLE_PER_HOST: usize = 10;

/// Default TCP connect timeout
pub const DEFAULT_CONNECT_TIMEOUT: u64 = 10;

/// HTTP client configuration.
///
/// Configures timeouts and connection pooling of the underlying client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Request timeout
    pub timeout: Duration,

    /// Connection pool idle timeout
    pub pool_idle_timeout: Duration,

    /// Maximum idle connections per host
    pub pool_max_idle_per_host: usize,

    /// Enable response compression
    pub enable_compression: bool,
}

impl ClientConfig {
    /// Create a new client configuration with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            pool_idle_timeout: Duration::from_secs(DEFAULT_POOL_IDLE_TIMEOUT),
            pool_max_idle_per_host: DEFAULT_POOL_MAX_IDLE_PER_HOST,
            enable_compression: true,
        }
    }

    /// Set request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set connection pool idle timeout.
    #[must_use]
    pub const fn with_pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = timeout;
        self
    }

    /// Set maximum idle connections per host.
    #[must_use]
    pub const fn with_pool_max_idle(mut self, max: usize) -> Self {
        self.pool_max_idle_per_host = max;
        self
    }

    /// Enable or disable compression.
    #[must_use]
    pub const fn with_compression(mut self, enabled: bool) -> Self {
        self.enable_compression = enabled;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`ServiceClient`].
#[derive(Debug, Clone)]
pub struct ServiceClientBuilder {
    base_url: Url,
    http_config: ClientConfig,
    token: Option<Arc<SecretString>>,
    tls_verify: bool,
    tls_ca_cert: Option<PathBuf>,
}

impl ServiceClientBuilder {
    /// Create a new builder from the endpoint base URL.
    ///
    /// The URL is normalised to end with `/` so that resource paths resolve
    /// below it rather than replacing its last segment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the URL cannot be parsed.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        let mut url = Url::parse(base_url.as_ref()).map_err(|err| {
            Error::ConfigError(format!(
                "Invalid service base URL `{}`: {err}",
                base_url.as_ref()
            ))
        })?;
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        Ok(Self {
            base_url: url,
            http_config: ClientConfig::new(),
            token: None,
            tls_verify: true,
            tls_ca_cert: None,
        })
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_http_config(mut self, config: ClientConfig) -> Self {
        self.http_config = config;
        self
    }

    /// Configure the `X-Auth-Token` header.
    #[must_use]
    pub fn with_token(self, token: impl Into<String>) -> Self {
        self.with_secret_token(Arc::new(SecretString::from(token.into())))
    }

    /// Configure the `X-Auth-Token` header from an already wrapped secret.
    #[must_use]
    pub fn with_secret_token(mut self, token: Arc<SecretString>) -> Self {
        self.token = Some(token);
        self
    }

    /// Set whether to verify TLS certificates.
    #[must_use]
    pub const fn with_tls_verify(mut self, verify: bool) -> Self {
        self.tls_verify = verify;
        self
    }

    /// Trust an additional PEM CA certificate.
    #[must_use]
    pub fn with_ca_cert(mut self, path: PathBuf) -> Self {
        self.tls_ca_cert = Some(path);
        self
    }

    /// Build the client instance.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the CA certificate cannot be loaded
    /// or the HTTP client cannot be constructed.
    pub fn build(self) -> Result<ServiceClient> {
        let mut builder = ClientBuilder::new()
            .timeout(self.http_config.timeout)
            .user_agent(USER_AGENT)
            .pool_idle_timeout(self.http_config.pool_idle_timeout)
            .pool_max_idle_per_host(self.http_config.pool_max_idle_per_host)
            .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT));

        if !self.http_config.enable_compression {
            builder = builder.no_gzip();
        }

        if !self.tls_verify {
            warn!(base_url = %self.base_url, "TLS verification disabled");
            builder = builder.danger_accept_invalid_certs(true);
        }

        if let Some(ca_cert) = &self.tls_ca_cert {
            debug!("loading CA certificate from {}", ca_cert.display());
            let bytes = std::fs::read(ca_cert).map_err(|err| {
                Error::ConfigError(format!(
                    "Failed to read CA certificate {}: {err}",
                    ca_cert.display()
                ))
            })?;
            let cert = reqwest::Certificate::from_pem(&bytes)
                .map_err(|err| Error::ConfigError(format!("Invalid CA certificate: {err}")))?;
            builder = builder.add_root_certificate(cert);
        }

        let http = builder
            .build()
            .map_err(|err| Error::ConfigError(format!("Failed to build HTTP client: {err}")))?;

        Ok(ServiceClient {
            http,
            base_url: self.base_url,
            token: self.token,
        })
    }
}

/// Asynchronous client for one service endpoint.
#[derive(Clone)]
pub struct ServiceClient {
    http: Client,
    base_url: Url,
    token: Option<Arc<SecretString>>,
}

impl std::fmt::Debug for ServiceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceClient")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish_non_exhaustive()
    }
}

impl ServiceClient {
    /// Construct directly from a base URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the URL is invalid.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        ServiceClientBuilder::new(base_url)?.build()
    }

    /// Access the base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn build_url(&self, path: &str) -> Result<Url> {
        if path.starts_with("http://") || path.starts_with("https://") {
            return Url::parse(path)
                .map_err(|err| Error::InvalidEndpoint(format!("Invalid URL `{path}`: {err}")));
        }
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|err| Error::InvalidEndpoint(format!("Invalid path `{path}`: {err}")))
    }
}

#[async_trait]
impl Transport for ServiceClient {
    fn url_prefix(&self) -> Url {
        self.base_url.clone()
    }

    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let url = self.build_url(&request.path)?;
        info!(method = %request.method, %url, "OpenStack request");

        let mut builder = self
            .http
            .request(request.method.clone(), url)
            .header(ACCEPT, "application/json");
        if !request.query.is_empty() {
            builder = builder.query(request.query.pairs());
        }
        if let Some(token) = &self.token {
            builder = builder.header(AUTH_TOKEN_HEADER, token.expose_secret());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| Error::HttpError(format!("Failed to read response body: {err}")))?;

        if status.is_success() {
            Ok(ApiResponse::new(status.as_u16(), body))
        } else {
            debug!(status = status.as_u16(), path = %request.path, "OpenStack request failed");
            Err(Error::from_status(status.as_u16(), &body))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Query;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_client_config_builder() {
        let config = ClientConfig::new()
            .with_timeout(Duration::from_secs(60))
            .with_pool_idle_timeout(Duration::from_secs(120))
            .with_pool_max_idle(20)
            .with_compression(false);

        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.pool_idle_timeout, Duration::from_secs(120));
        assert_eq!(config.pool_max_idle_per_host, 20);
        assert!(!config.enable_compression);
    }

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(
            config.pool_idle_timeout,
            Duration::from_secs(DEFAULT_POOL_IDLE_TIMEOUT)
        );
        assert!(config.enable_compression);
    }

    #[test]
    fn base_url_gets_trailing_slash() {
        let client = ServiceClient::new("http://keystone:5000/v2.0").unwrap();
        assert_eq!(client.base_url().as_str(), "http://keystone:5000/v2.0/");
        assert_eq!(
            client.build_url("tenants").unwrap().as_str(),
            "http://keystone:5000/v2.0/tenants"
        );
        assert_eq!(
            client.build_url("/tenants/abc").unwrap().as_str(),
            "http://keystone:5000/v2.0/tenants/abc"
        );
    }

    #[test]
    fn absolute_paths_are_used_verbatim() {
        let client = ServiceClient::new("http://nova:8774/v2.1").unwrap();
        assert_eq!(
            client
                .build_url("https://other:8774/v2.1/servers/1")
                .unwrap()
                .as_str(),
            "https://other:8774/v2.1/servers/1"
        );
    }

    #[test]
    fn invalid_base_url() {
        let err = ServiceClient::new("not a url").unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }

    #[test]
    fn debug_redacts_token() {
        let client = ServiceClientBuilder::new("http://nova:8774")
            .unwrap()
            .with_token("s3cr3t")
            .build()
            .unwrap();
        let rendered = format!("{client:?}");
        assert!(!rendered.contains("s3cr3t"));
        assert!(rendered.contains("REDACTED"));
    }

    #[tokio::test]
    async fn send_get_with_query_and_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2.0/tenants"))
            .and(query_param("name", "acme"))
            .and(header("X-Auth-Token", "tok"))
            .and(header("Accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"tenants": []})))
            .expect(1)
            .mount(&server)
            .await;

        let client = ServiceClientBuilder::new(format!("{}/v2.0", server.uri()))
            .unwrap()
            .with_token("tok")
            .build()
            .unwrap();
        let response = client
            .send(ApiRequest::get("tenants").with_query(Query::from([("name", "acme")])))
            .await
            .unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.json().unwrap(), json!({"tenants": []}));
    }

    #[tokio::test]
    async fn send_post_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2.0/security-groups"))
            .and(header("Content-Type", "application/json"))
            .and(body_json(json!({"security_group": {"name": "sg1"}})))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(json!({"security_group": {"id": "sg", "name": "sg1"}})),
            )
            .mount(&server)
            .await;

        let client = ServiceClient::new(server.uri()).unwrap();
        let response = client
            .send(
                ApiRequest::post("v2.0/security-groups")
                    .with_body(json!({"security_group": {"name": "sg1"}})),
            )
            .await
            .unwrap();
        assert_eq!(response.status, 201);
    }

    #[tokio::test]
    async fn send_maps_item_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/servers/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "itemNotFound": {"message": "Instance missing could not be found.", "code": 404}
            })))
            .mount(&server)
            .await;

        let client = ServiceClient::new(server.uri()).unwrap();
        let err = client
            .send(ApiRequest::get("servers/missing"))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            Error::ItemNotFound("Instance missing could not be found.".into())
        );
    }

    #[tokio::test]
    async fn send_maps_server_errors() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/ports/p1"))
            .respond_with(ResponseTemplate::new(500).set_body_string("kaboom"))
            .mount(&server)
            .await;

        let client = ServiceClient::new(server.uri()).unwrap();
        let err = client.send(ApiRequest::delete("ports/p1")).await.unwrap_err();
        assert_eq!(
            err,
            Error::UnexpectedStatus {
                status: 500,
                message: "kaboom".into()
            }
        );
    }

    #[tokio::test]
    async fn send_delete_no_content() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/ports/p1"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let client = ServiceClient::new(server.uri()).unwrap();
        let response = client.send(ApiRequest::delete("ports/p1")).await.unwrap();
        assert_eq!(response.status, 204);
        assert!(response.body.is_empty());
    }
}
