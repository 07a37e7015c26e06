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

//! Low-level HTTP utilities.

use log::{debug, trace};
use reqwest::header::HeaderMap;
use reqwest::{Response, StatusCode, Url};
use serde::Deserialize;

use crate::{Error, Result};

/// Header pointing at the status monitor of an asynchronous operation.
pub const ASYNC_OPERATION_HEADER: &str = "azure-asyncoperation";

/// Header pointing at the result of an asynchronous operation.
pub const LOCATION_HEADER: &str = "location";

/// Error details reported by the resource manager.
#[derive(Clone, Debug, Deserialize)]
pub struct CloudError {
    /// Machine-readable error code.
    #[serde(default)]
    pub code: Option<String>,
    /// Human-readable message.
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CloudErrorRoot {
    error: CloudError,
}

/// Error returned by the token endpoint.
#[derive(Debug, Deserialize)]
struct OAuthError {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// How to follow an asynchronous operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Monitor {
    /// Poll a status monitor returning `{"status": ...}`.
    AsyncOperation(Url),
    /// Poll a URL returning 202 until the operation is done.
    Location(Url),
}

/// Check the response and convert errors into our format.
pub async fn check(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let url = resp.url().clone();
    let body = resp.text().await.unwrap_or_default();
    debug!("Request to {} failed with {}: {}", url, status, body);
    Err(error_from_body(status, &body))
}

/// Build an error from a failed response body.
pub fn error_from_body(status: StatusCode, body: &str) -> Error {
    if let Ok(root) = serde_json::from_str::<CloudErrorRoot>(body) {
        return Error::from_status(status, root.error.code, root.error.message);
    }

    if let Ok(oauth) = serde_json::from_str::<OAuthError>(body) {
        return Error::from_status(
            status,
            Some(oauth.error),
            oauth.error_description,
        );
    }

    let message = if body.trim().is_empty() {
        None
    } else {
        Some(body.trim().to_string())
    };
    Error::from_status(status, None, message)
}

/// Find the monitor of an asynchronous operation (if any).
pub fn operation_monitor(status: StatusCode, headers: &HeaderMap) -> Option<Monitor> {
    let header_url = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| Url::parse(value).ok())
    };

    if let Some(url) = header_url(ASYNC_OPERATION_HEADER) {
        trace!("Operation is monitored via {}", url);
        Some(Monitor::AsyncOperation(url))
    } else if status == StatusCode::ACCEPTED {
        header_url(LOCATION_HEADER).map(Monitor::Location)
    } else {
        None
    }
}
