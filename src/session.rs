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

//! Session structure definition.
//!
//! The Session object serves as a wrapper around an HTTP(s) client, handling
//! authentication, building resource manager URLs and following long-running
//! operations.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, trace};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::auth::{AuthType, DEFAULT_RESOURCE_MANAGER};
use crate::common::{ResourceId, Waiter};
use crate::http;
use crate::operation::OperationWaiter;
use crate::utils::url;
use crate::{ErrorKind, Result};

/// API version of the `Microsoft.NetApp` resource provider.
pub const DEFAULT_API_VERSION: &str = "2024-07-01";

/// Default delay between two checks of a long-running operation.
pub const DEFAULT_OPERATION_DELAY: Duration = Duration::from_secs(10);

/// Default time to wait for a long-running operation.
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(3600);

/// A resource manager API session.
///
/// Owns an authentication method and an underlying client. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct Session {
    client: Client,
    auth: Arc<dyn AuthType>,
    endpoint: Option<Url>,
    api_version: String,
    operation_delay: Duration,
    operation_timeout: Duration,
}

impl Session {
    /// Create a new session with a given authentication plugin.
    ///
    /// The session talks to the public Azure resource manager.
    pub fn new<Auth: AuthType + 'static>(auth: Auth) -> Session {
        Session {
            client: Client::new(),
            auth: Arc::new(auth),
            endpoint: None,
            api_version: DEFAULT_API_VERSION.to_string(),
            operation_delay: DEFAULT_OPERATION_DELAY,
            operation_timeout: DEFAULT_OPERATION_TIMEOUT,
        }
    }

    /// Use a different resource manager endpoint.
    pub fn with_endpoint(mut self, endpoint: &str) -> Result<Session> {
        self.endpoint = Some(url::parse_base(endpoint)?);
        Ok(self)
    }

    /// Use a different API version.
    pub fn with_api_version<S: Into<String>>(mut self, api_version: S) -> Session {
        self.api_version = api_version.into();
        self
    }

    /// Change how long-running operations are polled.
    pub fn with_operation_polling(mut self, delay: Duration, timeout: Duration) -> Session {
        self.operation_delay = delay;
        self.operation_timeout = timeout;
        self
    }

    /// Resource manager endpoint in use.
    #[inline]
    pub fn endpoint(&self) -> &str {
        self.endpoint
            .as_ref()
            .map(Url::as_str)
            .unwrap_or(DEFAULT_RESOURCE_MANAGER)
    }

    /// API version in use.
    #[inline]
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// Get a reference to the authentication type in use.
    #[inline]
    pub fn auth_type(&self) -> &dyn AuthType {
        self.auth.as_ref()
    }

    /// Refresh the authentication (renew the token, etc).
    pub async fn refresh(&self) -> Result<()> {
        self.auth.refresh(&self.client).await
    }

    /// URL of a resource.
    pub fn resource_url(&self, id: &ResourceId) -> Result<Url> {
        self.build_url(id.segments())
    }

    /// URL of an action on a resource.
    pub fn action_url(&self, id: &ResourceId, action: &str) -> Result<Url> {
        self.build_url(id.segments().chain([action]))
    }

    /// Start an authenticated request.
    pub async fn request(&self, method: Method, url: Url) -> Result<RequestBuilder> {
        trace!("Sending HTTP {} {}", method, url);
        let builder = self.client.request(method, url);
        self.auth.authenticate(&self.client, builder).await
    }

    /// Fetch a resource.
    pub async fn get<T: DeserializeOwned>(&self, id: &ResourceId) -> Result<T> {
        let url = self.resource_url(id)?;
        let resp = self.request(Method::GET, url).await?.send().await?;
        Ok(http::check(resp).await?.json().await?)
    }

    /// Check whether a resource exists.
    pub async fn exists(&self, id: &ResourceId) -> Result<bool> {
        match self.get::<serde_json::Value>(id).await {
            Ok(..) => Ok(true),
            Err(err) if err.kind() == ErrorKind::ResourceNotFound => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Create or update a resource and wait for the operation to finish.
    ///
    /// Returns the final state of the resource.
    pub async fn put<B, T>(&self, id: &ResourceId, body: &B) -> Result<T>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.resource_url(id)?;
        let resp = self.request(Method::PUT, url).await?.json(body).send().await?;
        let resp = http::check(resp).await?;
        if self.wait_for_operation(&resp, || format!("update of {}", id)).await? {
            self.get(id).await
        } else {
            Ok(resp.json().await?)
        }
    }

    /// Run an action on a resource and wait for it to finish.
    pub async fn post_action<B>(&self, id: &ResourceId, action: &str, body: &B) -> Result<()>
    where
        B: Serialize + Sync + ?Sized,
    {
        let url = self.action_url(id, action)?;
        let resp = self.request(Method::POST, url).await?.json(body).send().await?;
        let resp = http::check(resp).await?;
        let _ = self
            .wait_for_operation(&resp, || format!("{} on {}", action, id))
            .await?;
        Ok(())
    }

    /// Delete a resource and wait for the operation to finish.
    ///
    /// Deleting a resource that does not exist is not an error.
    pub async fn delete(&self, id: &ResourceId) -> Result<()> {
        let url = self.resource_url(id)?;
        let resp = self.request(Method::DELETE, url).await?.send().await?;
        if resp.status() == StatusCode::NOT_FOUND || resp.status() == StatusCode::NO_CONTENT {
            debug!("Resource {} does not exist", id);
            return Ok(());
        }

        let resp = http::check(resp).await?;
        let _ = self
            .wait_for_operation(&resp, || format!("deletion of {}", id))
            .await?;
        Ok(())
    }

    /// Wait for an operation if the response says it is asynchronous.
    ///
    /// Returns `true` if there was an operation to wait for.
    async fn wait_for_operation<F>(&self, resp: &Response, description: F) -> Result<bool>
    where
        F: FnOnce() -> String,
    {
        match http::operation_monitor(resp.status(), resp.headers()) {
            Some(monitor) => {
                OperationWaiter::new(self.clone(), monitor, description())
                    .with_delay(self.operation_delay)
                    .with_timeout(self.operation_timeout)
                    .wait()
                    .await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn build_url<'s, I>(&self, segments: I) -> Result<Url>
    where
        I: IntoIterator<Item = &'s str>,
    {
        let base = match self.endpoint {
            Some(ref endpoint) => endpoint.clone(),
            None => url::parse_base(DEFAULT_RESOURCE_MANAGER)?,
        };
        let mut result = url::extend(base, segments)?;
        let _ = result
            .query_pairs_mut()
            .append_pair("api-version", &self.api_version);
        Ok(result)
    }
}
