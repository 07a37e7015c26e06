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

//! Simple authentication methods.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};

use super::AuthType;
use crate::Result;

/// Authentication method that provides no authentication.
///
/// Useful against local emulators of the management API.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoAuth;

#[async_trait]
impl AuthType for NoAuth {
    async fn authenticate(
        &self,
        _client: &Client,
        request: RequestBuilder,
    ) -> Result<RequestBuilder> {
        Ok(request)
    }

    async fn refresh(&self, _client: &Client) -> Result<()> {
        Ok(())
    }
}

/// Authentication with a pre-acquired bearer token.
///
/// The token is never refreshed, e.g. one returned by
/// `az account get-access-token`.
#[derive(Clone)]
pub struct StaticToken {
    value: String,
}

impl StaticToken {
    /// Create an authentication method using the given token.
    pub fn new<S: Into<String>>(value: S) -> StaticToken {
        StaticToken {
            value: value.into(),
        }
    }
}

impl fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut hasher = DefaultHasher::new();
        self.value.hash(&mut hasher);
        write!(f, "StaticToken {{ value: hash({}) }}", hasher.finish())
    }
}

#[async_trait]
impl AuthType for StaticToken {
    async fn authenticate(
        &self,
        _client: &Client,
        request: RequestBuilder,
    ) -> Result<RequestBuilder> {
        Ok(request.bearer_auth(&self.value))
    }

    async fn refresh(&self, _client: &Client) -> Result<()> {
        Ok(())
    }
}
