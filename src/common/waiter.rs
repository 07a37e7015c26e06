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

//! Waiters.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, trace};
use tokio::time::{sleep, Instant};

use super::ResourceId;
use crate::{Error, ErrorKind, Result};

/// Default delay between two existence checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Default time to wait for a resource to (dis)appear.
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(600);

/// Something that waits for a condition by polling.
#[async_trait]
pub trait Waiter: Send {
    /// Value produced once the condition is met.
    type Output: Send;

    /// Default timeout for this operation (`None` to wait forever).
    fn default_wait_timeout(&self) -> Option<Duration>;

    /// Default delay between two polls.
    fn default_delay(&self) -> Duration {
        Duration::from_secs(1)
    }

    /// Error to return on timeout.
    fn timeout_error(&self) -> Error;

    /// Check the condition once.
    ///
    /// Returns `Ok(None)` if the condition is not met yet.
    async fn poll(&mut self) -> Result<Option<Self::Output>>;

    /// Wait for the default amount of time.
    async fn wait(self) -> Result<Self::Output>
    where
        Self: Sized,
    {
        let timeout = self.default_wait_timeout();
        wait_until(self, timeout).await
    }

    /// Wait for the given amount of time.
    async fn wait_for(self, timeout: Duration) -> Result<Self::Output>
    where
        Self: Sized,
    {
        wait_until(self, Some(timeout)).await
    }
}

async fn wait_until<W: Waiter>(mut waiter: W, timeout: Option<Duration>) -> Result<W::Output> {
    let delay = waiter.default_delay();
    // A deadline past the end of the clock is never reached.
    let deadline = timeout.and_then(|t| Instant::now().checked_add(t));
    loop {
        if let Some(result) = waiter.poll().await? {
            return Ok(result);
        }

        match deadline {
            Some(deadline) => {
                let now = Instant::now();
                if now >= deadline {
                    return Err(waiter.timeout_error());
                }
                // The last check happens exactly at the deadline.
                sleep(delay.min(deadline - now)).await;
            }
            None => sleep(delay).await,
        }
    }
}

/// Something that can tell whether a resource exists.
#[async_trait]
pub trait ResourceLookup: Send + Sync {
    /// Check whether the resource exists.
    ///
    /// Must return `Ok(false)` rather than a `ResourceNotFound` error.
    async fn exists(&self, id: &ResourceId) -> Result<bool>;
}

/// Desired existence state of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Existence {
    /// The resource is visible.
    Present,
    /// The resource is gone.
    Absent,
}

impl Existence {
    #[inline]
    fn matches(self, exists: bool) -> bool {
        exists == (self == Existence::Present)
    }
}

impl fmt::Display for Existence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Existence::Present => "present",
            Existence::Absent => "absent",
        })
    }
}

/// Wait for a resource to appear or disappear.
///
/// Resource manager calls are asynchronous: a finished creation or deletion
/// is not necessarily visible to the next request.
pub struct ExistenceWaiter<'l, L: ?Sized> {
    lookup: &'l L,
    id: ResourceId,
    desired: Existence,
    wait_timeout: Duration,
    delay: Duration,
}

impl<'l, L: ?Sized> fmt::Debug for ExistenceWaiter<'l, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExistenceWaiter")
            .field("id", &self.id)
            .field("desired", &self.desired)
            .field("wait_timeout", &self.wait_timeout)
            .field("delay", &self.delay)
            .finish()
    }
}

impl<'l, L: ResourceLookup + ?Sized> ExistenceWaiter<'l, L> {
    /// Create a waiter with the default interval and timeout.
    pub fn new(lookup: &'l L, id: ResourceId, desired: Existence) -> ExistenceWaiter<'l, L> {
        ExistenceWaiter {
            lookup,
            id,
            desired,
            wait_timeout: DEFAULT_POLL_TIMEOUT,
            delay: DEFAULT_POLL_INTERVAL,
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

    /// Identifier of the resource being watched.
    #[inline]
    pub fn id(&self) -> &ResourceId {
        &self.id
    }
}

#[async_trait]
impl<'l, L: ResourceLookup + ?Sized> Waiter for ExistenceWaiter<'l, L> {
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
            format!(
                "Timeout waiting for resource {} to be {}",
                self.id, self.desired
            ),
        )
    }

    async fn poll(&mut self) -> Result<Option<()>> {
        let exists = self.lookup.exists(&self.id).await?;
        if self.desired.matches(exists) {
            debug!("Resource {} is {}", self.id, self.desired);
            Ok(Some(()))
        } else {
            trace!(
                "Still waiting for resource {} to be {}",
                self.id,
                self.desired
            );
            Ok(None)
        }
    }
}
