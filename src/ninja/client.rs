// NinjaRMM API HTTP client.
// Handles the OAuth client-credentials lifecycle and authenticated requests.

use std::time::Duration;

use reqwest::{
    Client, Method, Response,
    header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT},
};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{Error, Result};

use super::auth::{ClientConfig, Credential, TOKEN_SCOPE, TokenResponse};
use super::docs::SortedDocs;

/// Timeout applied when the caller does not supply one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP verb for an API request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl Verb {
    /// Parse a lowercase verb name, as used for OpenAPI path item keys.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "get" => Some(Verb::Get),
            "post" => Some(Verb::Post),
            "put" => Some(Verb::Put),
            "delete" => Some(Verb::Delete),
            "patch" => Some(Verb::Patch),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Get => "get",
            Verb::Post => "post",
            Verb::Put => "put",
            Verb::Delete => "delete",
            Verb::Patch => "patch",
        }
    }

    pub fn method(&self) -> Method {
        match self {
            Verb::Get => Method::GET,
            Verb::Post => Method::POST,
            Verb::Put => Method::PUT,
            Verb::Delete => Method::DELETE,
            Verb::Patch => Method::PATCH,
        }
    }
}

/// Per-request options.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Request timeout; `DEFAULT_TIMEOUT` when unset.
    pub timeout: Option<Duration>,
    /// Query string pairs.
    pub query: Vec<(String, String)>,
    /// JSON request body.
    pub body: Option<Value>,
}

/// NinjaRMM API client holding the current credential and documentation
/// snapshot.
///
/// A client only exists in the authenticated state: construction performs the
/// client-credentials grant and fails if it is rejected. Expired credentials
/// are replaced transparently before the next request. Not designed for
/// concurrent use; `&mut self` on every request enforces sequential access.
#[derive(Debug)]
pub struct NinjaClient {
    http: Client,
    config: ClientConfig,
    credential: Credential,
    documentation: Option<Value>,
}

impl NinjaClient {
    /// Create a client and obtain an initial credential.
    pub async fn connect(config: ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static("ninja-tools"));

        let http = Client::builder().default_headers(headers).build()?;
        let credential = Self::request_credentials(&http, &config).await?;

        Ok(Self {
            http,
            config,
            credential,
            documentation: None,
        })
    }

    /// Connection settings this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Perform the client-credentials grant against the token endpoint.
    async fn request_credentials(http: &Client, config: &ClientConfig) -> Result<Credential> {
        info!(url = config.token_url(), "requesting credentials");

        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", config.client_id.as_str()),
            ("client_secret", config.client_secret.as_str()),
            ("scope", TOKEN_SCOPE),
        ];

        let response = http
            .post(config.token_url())
            .form(&params)
            .timeout(DEFAULT_TIMEOUT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Credentials {
                status: response.status().as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let token: TokenResponse = response.json().await?;
        Ok(Credential::new(token))
    }

    /// Replace the credential if its lifetime has elapsed.
    async fn ensure_authenticated(&mut self) -> Result<()> {
        if self.credential.is_expired() {
            info!("credential expired, requesting a fresh one");
            self.credential = Self::request_credentials(&self.http, &self.config).await?;
        }
        Ok(())
    }

    /// Make an authenticated request and return the JSON response body.
    pub async fn request(
        &mut self,
        verb: Verb,
        path: &str,
        options: RequestOptions,
    ) -> Result<Value> {
        debug!(verb = verb.as_str(), path, "API request");

        self.ensure_authenticated().await?;

        let url = self.config.base_url.join(path)?;
        let mut builder = self
            .http
            .request(verb.method(), url)
            .header(AUTHORIZATION, self.credential.authorization())
            .timeout(options.timeout.unwrap_or(DEFAULT_TIMEOUT));

        if !options.query.is_empty() {
            builder = builder.query(&options.query);
        }
        if let Some(body) = &options.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let response = Self::check_response(response)?;
        Ok(response.json().await?)
    }

    /// Fetch the OpenAPI document and replace the current snapshot.
    pub async fn refresh_documentation(&mut self) -> Result<()> {
        info!(path = %self.config.docs_path, "refreshing API documentation");

        let docs_path = self.config.docs_path.clone();
        let snapshot = self
            .request(Verb::Get, &docs_path, RequestOptions::default())
            .await?;
        self.documentation = Some(snapshot);
        Ok(())
    }

    /// The raw documentation snapshot, if one has been fetched.
    pub fn documentation(&self) -> Option<&Value> {
        self.documentation.as_ref()
    }

    /// Build the tag-sorted documentation index from the current snapshot.
    pub fn sorted_docs(&self) -> Result<SortedDocs> {
        let snapshot = self.documentation.as_ref().ok_or(Error::NoDocumentation)?;
        SortedDocs::from_document(snapshot)
    }

    /// Convert non-2xx responses to errors.
    fn check_response(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(Error::HttpStatus {
                status: status.as_u16(),
                url: response.url().to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ninja::auth::Region;
    use serde_json::json;
    use url::Url;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(server: &MockServer) -> ClientConfig {
        ClientConfig::new(
            Region::App,
            "client-id",
            "client-secret",
            Url::parse(&server.uri()).unwrap(),
            "/v2/api-docs",
        )
        .with_token_url(format!("{}/ws/oauth/token", server.uri()))
    }

    fn token_response(expires_in: u64) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "test-token",
            "token_type": "Bearer",
            "expires_in": expires_in,
            "scope": TOKEN_SCOPE,
        }))
    }

    #[tokio::test]
    async fn test_connect_sends_client_credentials_grant() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/ws/oauth/token"))
            .and(body_string_contains("grant_type=client_credentials"))
            .and(body_string_contains("client_id=client-id"))
            .respond_with(token_response(3600))
            .expect(1)
            .mount(&server)
            .await;

        let client = NinjaClient::connect(test_config(&server)).await.unwrap();
        assert!(client.documentation().is_none());
    }

    #[tokio::test]
    async fn test_connect_fails_on_rejected_grant() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/ws/oauth/token"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad client"))
            .mount(&server)
            .await;

        let err = NinjaClient::connect(test_config(&server)).await.unwrap_err();
        assert!(matches!(err, Error::Credentials { status: 401, .. }));
    }

    #[tokio::test]
    async fn test_valid_credential_is_not_refreshed() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/ws/oauth/token"))
            .respond_with(token_response(3600))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v2/organizations"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(2)
            .mount(&server)
            .await;

        let mut client = NinjaClient::connect(test_config(&server)).await.unwrap();
        client
            .request(Verb::Get, "/v2/organizations", RequestOptions::default())
            .await
            .unwrap();
        client
            .request(Verb::Get, "/v2/organizations", RequestOptions::default())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_expired_credential_refreshed_once_before_request() {
        let server = MockServer::start().await;

        // expires_in of zero: the credential is already stale by the time the
        // next request checks it.
        Mock::given(method("POST"))
            .and(path("/ws/oauth/token"))
            .respond_with(token_response(0))
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v2/organizations"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let mut client = NinjaClient::connect(test_config(&server)).await.unwrap();
        client
            .request(Verb::Get, "/v2/organizations", RequestOptions::default())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_request_surfaces_upstream_status() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/ws/oauth/token"))
            .respond_with(token_response(3600))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v2/devices"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let mut client = NinjaClient::connect(test_config(&server)).await.unwrap();
        let err = client
            .request(Verb::Get, "/v2/devices", RequestOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::HttpStatus { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_request_sends_bearer_authorization() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/ws/oauth/token"))
            .respond_with(token_response(3600))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v2/devices"))
            .and(wiremock::matchers::header(
                "authorization",
                "Bearer test-token",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let mut client = NinjaClient::connect(test_config(&server)).await.unwrap();
        let body = client
            .request(Verb::Get, "/v2/devices", RequestOptions::default())
            .await
            .unwrap();
        assert_eq!(body, json!({"ok": true}));
    }

    #[tokio::test]
    async fn test_refresh_documentation_replaces_snapshot() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/ws/oauth/token"))
            .respond_with(token_response(3600))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v2/api-docs"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"openapi": "3.0.0", "tags": [], "paths": {}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let mut client = NinjaClient::connect(test_config(&server)).await.unwrap();
        assert!(matches!(
            client.sorted_docs().unwrap_err(),
            Error::NoDocumentation
        ));

        client.refresh_documentation().await.unwrap();
        let snapshot = client.documentation().unwrap();
        assert_eq!(snapshot["openapi"], "3.0.0");
    }

    #[test]
    fn test_verb_parse() {
        assert_eq!(Verb::parse("get"), Some(Verb::Get));
        assert_eq!(Verb::parse("patch"), Some(Verb::Patch));
        assert_eq!(Verb::parse("parameters"), None);
    }
}
