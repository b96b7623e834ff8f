// NinjaRMM authentication types.
// Region selection, client configuration, and the OAuth client-credentials token.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use url::Url;

use crate::error::{Error, Result};

/// Scope requested with every client-credentials grant.
pub const TOKEN_SCOPE: &str = "monitoring management control";

/// NinjaRMM instance the client authenticates against.
///
/// The token endpoint lives on the instance subdomain, not on the API host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    App,
    Us2,
    Ca,
    Eu,
    Oc,
}

impl Region {
    /// Parse a region from its lowercase instance name.
    pub fn parse(name: &str) -> Result<Self> {
        match name {
            "app" => Ok(Region::App),
            "us2" => Ok(Region::Us2),
            "ca" => Ok(Region::Ca),
            "eu" => Ok(Region::Eu),
            "oc" => Ok(Region::Oc),
            other => Err(Error::InvalidRegion(other.to_string())),
        }
    }

    pub fn subdomain(&self) -> &'static str {
        match self {
            Region::App => "app",
            Region::Us2 => "us2",
            Region::Ca => "ca",
            Region::Eu => "eu",
            Region::Oc => "oc",
        }
    }

    /// OAuth token endpoint for this instance.
    pub fn token_url(&self) -> String {
        format!("https://{}.ninjarmm.com/ws/oauth/token", self.subdomain())
    }
}

/// Connection settings for a [`NinjaClient`](crate::ninja::NinjaClient).
///
/// Constructed explicitly by the caller; `from_env` covers the conventional
/// NINJA_* environment variables.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub region: Region,
    pub client_id: String,
    pub client_secret: String,
    pub base_url: Url,
    pub docs_path: String,
    token_url: String,
}

impl ClientConfig {
    pub fn new(
        region: Region,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        base_url: Url,
        docs_path: impl Into<String>,
    ) -> Self {
        Self {
            region,
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            base_url,
            docs_path: docs_path.into(),
            token_url: region.token_url(),
        }
    }

    /// Build a config from the NINJA_ENVIRONMENT, NINJA_CLIENT_ID,
    /// NINJA_CLIENT_SECRET, NINJA_BASE_URL, and NINJA_DOCS_PATH variables.
    /// All five are mandatory.
    pub fn from_env() -> Result<Self> {
        let region = Region::parse(&require_env("NINJA_ENVIRONMENT")?)?;
        let client_id = require_env("NINJA_CLIENT_ID")?;
        let client_secret = require_env("NINJA_CLIENT_SECRET")?;
        let base_url = Url::parse(&require_env("NINJA_BASE_URL")?)?;
        let docs_path = require_env("NINJA_DOCS_PATH")?;

        Ok(Self::new(region, client_id, client_secret, base_url, docs_path))
    }

    /// Override the token endpoint, e.g. to point at a local mock server.
    pub fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self
    }

    pub fn token_url(&self) -> &str {
        &self.token_url
    }
}

/// A required environment variable; unset or empty is an error.
fn require_env(name: &'static str) -> Result<String> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.is_empty())
        .ok_or(Error::MissingEnvironment(name))
}

/// Wire shape of a token endpoint response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub scope: String,
}

/// An OAuth credential with its acquisition timestamp.
///
/// Credentials are replaced, never mutated, and never persisted across runs.
#[derive(Debug, Clone)]
pub struct Credential {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub scope: String,
    pub obtained_at: DateTime<Utc>,
}

impl Credential {
    pub fn new(token: TokenResponse) -> Self {
        Self {
            access_token: token.access_token,
            token_type: token.token_type,
            expires_in: token.expires_in,
            scope: token.scope,
            obtained_at: Utc::now(),
        }
    }

    /// Whether the token lifetime has elapsed.
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.obtained_at + Duration::seconds(self.expires_in as i64)
    }

    /// Value for the Authorization header, e.g. "Bearer <token>".
    pub fn authorization(&self) -> String {
        format!("{} {}", self.token_type, self.access_token)
    }
}
