// Copyright 2018 Dmitry Tantsur <divius.inside@gmail.com>
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

//! Long-running operations.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, trace};
use reqwest::{Method, StatusCode};
use serde::Deserialize;

use crate::common::Waiter;
use crate::http::{self, CloudError, Monitor};
use crate::session::{Session, DEFAULT_OPERATION_DELAY, DEFAULT_OPERATION_TIMEOUT};
use crate::{Error, ErrorKind, Result};

protocol_enum! {
    #[doc = "Status of an asynchronous operation."]
    enum OperationStatus {
        #[doc = "Operation is still running."]
        InProgress = "InProgress",
        #[doc = "Operation has finished successfully."]
        Succeeded = "Succeeded",
        #[doc = "Operation has failed."]
        Failed = "Failed",
        #[doc = "Operation was canceled."]
        Canceled = "Canceled"
    }
}

impl OperationStatus {
    /// Whether the operation has finished (successfully or not).
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OperationStatus::Succeeded | OperationStatus::Failed | OperationStatus::Canceled
        )
    }
}

/// Body returned by an `Azure-AsyncOperation` monitor.
#[derive(Clone, Debug, Deserialize)]
pub struct AsyncOperation {
    /// Current status.
    pub status: OperationStatus,
    /// Error details on failure.
    #[serde(default)]
    pub error: Option<CloudError>,
}

impl AsyncOperation {
    /// Convert the status into the outcome of a poll.
    fn into_outcome(self, description: &str) -> Result<Option<()>> {
        match self.status {
            OperationStatus::Succeeded => Ok(Some(())),
            OperationStatus::Failed | OperationStatus::Canceled => {
                let (code, message) = match self.error {
                    Some(err) => (err.code, err.message),
                    None => (None, None),
                };
                let message = message
                    .unwrap_or_else(|| format!("Operation {} is {}", description, self.status));
                Err(Error::new_with_details(
                    ErrorKind::OperationFailed,
                    None,
                    code,
                    Some(message),
                ))
            }
            // Providers report intermediate states like "Creating" too.
            _ => Ok(None),
        }
    }
}

/// Waiter for a long-running operation.
#[derive(Debug)]
pub struct OperationWaiter {
    session: Session,
    monitor: Monitor,
    description: String,
    delay: Duration,
    wait_timeout: Duration,
}

impl OperationWaiter {
    /// Follow an operation with the given monitor.
    pub fn new<S: Into<String>>(session: Session, monitor: Monitor, description: S) -> Self {
        OperationWaiter {
            session,
            monitor,
            description: description.into(),
            delay: DEFAULT_OPERATION_DELAY,
            wait_timeout: DEFAULT_OPERATION_TIMEOUT,
        }
    }

    /// Change the delay between two checks.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Change the default timeout.
    pub fn with_timeout(mut self, wait_timeout: Duration) -> Self {
        self.wait_timeout = wait_timeout;
        self
    }
}

#[async_trait]
impl Waiter for OperationWaiter {
    type Output = ();

    fn default_wait_timeout(&self) -> Option<Duration> {
        Some(self.wait_timeout)
    }

    fn default_delay(&self) -> Duration {
        self.delay
    }

    fn timeout_error(&self) -> Error {
        Error::new(
            ErrorKind::OperationTimedOut,
            format!("Timeout waiting for {} to finish", self.description),
        )
    }

    async fn poll(&mut self) -> Result<Option<()>> {
        match self.monitor {
            Monitor::AsyncOperation(ref url) => {
                let resp = self
                    .session
                    .request(Method::GET, url.clone())
                    .await?
                    .send()
                    .await?;
                let op: AsyncOperation = http::check(resp).await?.json().await?;
                trace!("Operation {} is {}", self.description, op.status);
                let result = op.into_outcome(&self.description)?;
                if result.is_some() {
                    debug!("Operation {} has finished", self.description);
                }
                Ok(result)
            }
            Monitor::Location(ref url) => {
                let resp = self
                    .session
                    .request(Method::GET, url.clone())
                    .await?
                    .send()
                    .await?;
                if resp.status() == StatusCode::ACCEPTED {
                    trace!("Operation {} is still running", self.description);
                    return Ok(None);
                }
                let _ = http::check(resp).await?;
                debug!("Operation {} has finished", self.description);
                Ok(Some(()))
            }
        }
    }
}
