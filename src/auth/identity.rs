// Copyright 2017 Dmitry Tantsur <divius.inside@gmail.com>
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Service principal authentication via the Microsoft identity platform.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use log::{debug, trace};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::Error as DeserError;
use serde::{Deserialize, Deserializer};
use tokio::sync::RwLock;

use super::AuthType;
use crate::http;
use crate::utils::url;
use crate::{Error, ErrorKind, Result};

/// Default authority for public Azure.
pub const DEFAULT_AUTHORITY: &str = "https://login.microsoftonline.com/";

/// Default resource manager endpoint for public Azure.
pub const DEFAULT_RESOURCE_MANAGER: &str = "https://management.azure.com/";

/// Minimum validity of a cached token (in minutes).
const TOKEN_MIN_VALIDITY: i64 = 5;

/// Plain access token.
#[derive(Clone)]
struct Token {
    value: String,
    expires_at: DateTime<Utc>,
}

static_assertions::assert_eq_size!(Option<Token>, Token);

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut hasher = DefaultHasher::new();
        self.value.hash(&mut hasher);
        write!(
            f,
            "Token {{ value: hash({}), expires_at: {} }}",
            hasher.finish(),
            self.expires_at
        )
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(deserialize_with = "deser_seconds")]
    expires_in: i64,
}

/// Deserialize a number of seconds given either as a number or as a string.
fn deser_seconds<'de, D>(des: D) -> ::std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Seconds {
        Number(i64),
        Text(String),
    }

    match Seconds::deserialize(des)? {
        Seconds::Number(value) => Ok(value),
        Seconds::Text(value) => value.parse().map_err(DeserError::custom),
    }
}

/// Authentication as a service principal with a client secret.
///
/// Uses the OAuth2 client credentials flow. The token is cached and
/// refreshed shortly before it expires.
pub struct ServicePrincipal {
    tenant_id: String,
    client_id: String,
    client_secret: String,
    token_endpoint: Url,
    scope: String,
    cached_token: RwLock<Option<Token>>,
}

impl fmt::Debug for ServicePrincipal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServicePrincipal")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("token_endpoint", &self.token_endpoint.as_str())
            .field("scope", &self.scope)
            .finish()
    }
}

impl Clone for ServicePrincipal {
    fn clone(&self) -> ServicePrincipal {
        ServicePrincipal {
            tenant_id: self.tenant_id.clone(),
            client_id: self.client_id.clone(),
            client_secret: self.client_secret.clone(),
            token_endpoint: self.token_endpoint.clone(),
            scope: self.scope.clone(),
            cached_token: RwLock::new(None),
        }
    }
}

impl ServicePrincipal {
    /// Create a service principal authentication against public Azure.
    pub fn new<S1, S2, S3>(tenant_id: S1, client_id: S2, client_secret: S3) -> Result<Self>
    where
        S1: Into<String>,
        S2: Into<String>,
        S3: Into<String>,
    {
        let tenant_id = tenant_id.into();
        let token_endpoint = token_endpoint(DEFAULT_AUTHORITY, &tenant_id)?;
        Ok(ServicePrincipal {
            tenant_id,
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            token_endpoint,
            scope: scope_for(DEFAULT_RESOURCE_MANAGER),
            cached_token: RwLock::new(None),
        })
    }

    /// Use a different authority (e.g. for sovereign clouds).
    pub fn with_authority(mut self, authority: &str) -> Result<Self> {
        self.token_endpoint = token_endpoint(authority, &self.tenant_id)?;
        Ok(self)
    }

    /// Request tokens for a different resource manager endpoint.
    pub fn with_resource_manager(mut self, resource_manager: &str) -> Self {
        self.scope = scope_for(resource_manager);
        self
    }

    /// Tenant (directory) ID.
    #[inline]
    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    /// Application (client) ID.
    #[inline]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Token endpoint in use.
    #[inline]
    pub fn token_endpoint(&self) -> &Url {
        &self.token_endpoint
    }

    /// Scope requested for tokens.
    #[inline]
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Get the authentication token string.
    pub async fn get_token(&self, client: &Client) -> Result<String> {
        self.do_refresh(client, false).await?;
        let guard = self.cached_token.read().await;
        guard.as_ref().map(|token| token.value.clone()).ok_or_else(|| {
            Error::new(
                ErrorKind::AuthenticationFailed,
                "No token was received from the identity platform",
            )
        })
    }

    /// Refresh the token (if needed or forced).
    async fn do_refresh(&self, client: &Client, force: bool) -> Result<()> {
        // This is executed every request at least once, so it's important to start with a read
        // lock. We expect to hit this branch most of the time.
        if !force && token_alive(&self.cached_token.read().await) {
            return Ok(());
        }

        let mut lock = self.cached_token.write().await;
        // Another request may have updated the token while we were waiting for the write lock.
        if !force && token_alive(&lock) {
            return Ok(());
        }

        debug!(
            "Requesting a token for client {} from {}",
            self.client_id, self.token_endpoint
        );
        let resp = client
            .post(self.token_endpoint.clone())
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("scope", self.scope.as_str()),
            ])
            .send()
            .await?;
        let root: TokenResponse = http::check(resp).await?.json().await?;
        let token = Token {
            value: root.access_token,
            expires_at: Utc::now() + Duration::seconds(root.expires_in),
        };
        debug!("Received a token expiring at {}", token.expires_at);
        *lock = Some(token);
        Ok(())
    }
}

#[async_trait]
impl AuthType for ServicePrincipal {
    async fn authenticate(
        &self,
        client: &Client,
        request: RequestBuilder,
    ) -> Result<RequestBuilder> {
        let token = self.get_token(client).await?;
        Ok(request.bearer_auth(token))
    }

    async fn refresh(&self, client: &Client) -> Result<()> {
        self.do_refresh(client, true).await
    }
}

fn token_endpoint(authority: &str, tenant_id: &str) -> Result<Url> {
    if tenant_id.is_empty() {
        return Err(Error::new(
            ErrorKind::InvalidInput,
            "Tenant ID cannot be empty",
        ));
    }

    let base = url::parse_base(authority)?;
    url::extend(base, [tenant_id, "oauth2", "v2.0", "token"])
}

fn scope_for(resource_manager: &str) -> String {
    format!("{}/.default", resource_manager.trim_end_matches('/'))
}

#[inline]
fn token_alive(token: &impl Deref<Target = Option<Token>>) -> bool {
    if let Some(value) = token.deref() {
        let validity_time_left = value.expires_at.signed_duration_since(Utc::now());
        trace!("Token is valid for {:?}", validity_time_left);
        validity_time_left > Duration::minutes(TOKEN_MIN_VALIDITY)
    } else {
        false
    }
}
