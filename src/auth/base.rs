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

//! Base code for authentication.

use std::fmt::Debug;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};

use crate::Result;

/// Trait for any authentication method.
#[async_trait]
pub trait AuthType: Debug + Send + Sync {
    /// Add authentication to the request.
    ///
    /// May fetch and cache a token while it is still valid.
    async fn authenticate(&self, client: &Client, request: RequestBuilder)
        -> Result<RequestBuilder>;

    /// Refresh the cached credentials (if any).
    async fn refresh(&self, client: &Client) -> Result<()>;
}
