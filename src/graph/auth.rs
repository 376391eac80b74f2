//! Bearer token sources for Microsoft Graph
//!
//! A run authenticates either with a pre-obtained bearer token, used verbatim
//! for every request, or with an app registration's client secret, exchanged
//! through the OAuth2 client credentials flow and renewed before it expires.

use crate::config::Config;
use crate::error::{OrgmapError, Result};
use chrono::{DateTime, Utc};
use oauth2::{
    basic::BasicClient, reqwest::async_http_client, AuthUrl, ClientId, ClientSecret, Scope,
    TokenResponse, TokenUrl,
};
use std::fmt;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;

/// Tokens this close to expiry are renewed before use
const RENEWAL_GRACE_SECS: i64 = 300;

/// Lifetime assumed when the token endpoint omits `expires_in`
const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(3600);

/// Credentials supplied on the command line
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    Token(String),
    ClientSecret {
        tenant_id: String,
        client_id: String,
        client_secret: String,
    },
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Token(_) => f.debug_tuple("Token").field(&"<redacted>").finish(),
            Credentials::ClientSecret {
                tenant_id,
                client_id,
                ..
            } => f
                .debug_struct("ClientSecret")
                .field("tenant_id", tenant_id)
                .field("client_id", client_id)
                .field("client_secret", &"<redacted>")
                .finish(),
        }
    }
}

/// Supplies bearer tokens to the Graph client
pub enum TokenProvider {
    Static(StaticTokenProvider),
    ClientSecret(ClientSecretProvider),
}

impl TokenProvider {
    pub fn from_credentials(credentials: Credentials, config: &Config) -> Result<Self> {
        match credentials {
            Credentials::Token(token) => Ok(Self::Static(StaticTokenProvider::new(token))),
            Credentials::ClientSecret {
                tenant_id,
                client_id,
                client_secret,
            } => Ok(Self::ClientSecret(ClientSecretProvider::new(
                &config.authority_host,
                &tenant_id,
                client_id,
                client_secret,
            )?)),
        }
    }

    /// Get a bearer token valid for `resource` (e.g. `https://graph.microsoft.com`)
    pub async fn token_for(&self, resource: &str) -> Result<String> {
        match self {
            TokenProvider::Static(provider) => Ok(provider.token_for(resource)),
            TokenProvider::ClientSecret(provider) => provider.token_for(resource).await,
        }
    }
}

/// Hands out the same caller-supplied token for every resource, without refresh
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: String) -> Self {
        Self { token }
    }

    pub fn token_for(&self, _resource: &str) -> String {
        self.token.clone()
    }
}

#[derive(Debug, Clone)]
struct CachedToken {
    scope: String,
    access_token: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_usable_for(&self, scope: &str) -> bool {
        self.scope == scope
            && Utc::now() + chrono::Duration::seconds(RENEWAL_GRACE_SECS) < self.expires_at
    }
}

/// Client credentials flow with an in-memory token cache
pub struct ClientSecretProvider {
    client: BasicClient,
    tenant_id: String,
    cached: Mutex<Option<CachedToken>>,
}

impl ClientSecretProvider {
    pub fn new(
        authority_host: &str,
        tenant_id: &str,
        client_id: String,
        client_secret: String,
    ) -> Result<Self> {
        let authority = authority_host.trim_end_matches('/');

        let auth_url = AuthUrl::new(format!(
            "{}/{}/oauth2/v2.0/authorize",
            authority, tenant_id
        ))
        .map_err(|e| OrgmapError::AuthError(format!("Invalid auth URL: {}", e)))?;

        let token_url = TokenUrl::new(format!("{}/{}/oauth2/v2.0/token", authority, tenant_id))
            .map_err(|e| OrgmapError::AuthError(format!("Invalid token URL: {}", e)))?;

        let client = BasicClient::new(
            ClientId::new(client_id),
            Some(ClientSecret::new(client_secret)),
            auth_url,
            Some(token_url),
        );

        Ok(Self {
            client,
            tenant_id: tenant_id.to_string(),
            cached: Mutex::new(None),
        })
    }

    pub async fn token_for(&self, resource: &str) -> Result<String> {
        let scope = format!("{}/.default", resource.trim_end_matches('/'));

        // Held across the exchange so concurrent callers share one acquisition
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref().filter(|t| t.is_usable_for(&scope)) {
            debug!("Using cached token for tenant {}", self.tenant_id);
            return Ok(token.access_token.clone());
        }

        debug!(
            "Acquiring token for tenant {} with scope {}",
            self.tenant_id, scope
        );

        let token = self
            .client
            .exchange_client_credentials()
            .add_scope(Scope::new(scope.clone()))
            .request_async(async_http_client)
            .await
            .map_err(|e| {
                OrgmapError::AuthError(format!("Client credentials exchange failed: {}", e))
            })?;

        let lifetime = token.expires_in().unwrap_or(DEFAULT_TOKEN_LIFETIME);
        let expires_at = Utc::now()
            + chrono::Duration::from_std(lifetime)
                .unwrap_or_else(|_| chrono::Duration::seconds(3600));

        let access_token = token.access_token().secret().clone();
        *cached = Some(CachedToken {
            scope,
            access_token: access_token.clone(),
            expires_at,
        });

        Ok(access_token)
    }
}
