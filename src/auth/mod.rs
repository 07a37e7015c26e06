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

//! Authentication modules.
//!
//! Accessing the resource manager requires a bearer token. This module
//! provides a way to obtain one as a service principal, as well as simple
//! authentication implementations for standalone use.
//!
//! The usual workflow is as follows:
//!
//! 1. Load [Credentials](struct.Credentials.html) from the environment or
//!    create a [ServicePrincipal](struct.ServicePrincipal.html) directly.
//! 2. Create a [Session](../struct.Session.html) or a
//!    [Cloud](../struct.Cloud.html) with it.
//!
//! # Examples
//!
//! Creating an authentication method from environment variables:
//!
//! ```rust,no_run
//! let creds = netapp_pool_change::auth::from_env().expect("No credentials");
//! let session = netapp_pool_change::Session::new(creds.auth);
//! ```
//!
//! Using a token acquired elsewhere:
//!
//! ```
//! use netapp_pool_change::auth::StaticToken;
//! use netapp_pool_change::Session;
//!
//! let session = Session::new(StaticToken::new("eyJ0eXAi..."));
//! ```

mod base;
mod config;
mod identity;
mod simple;

pub use self::base::AuthType;
pub use self::config::{from_env, from_file, Credentials, AUTH_LOCATION_VAR};
pub use self::identity::{ServicePrincipal, DEFAULT_AUTHORITY, DEFAULT_RESOURCE_MANAGER};
pub use self::simple::{NoAuth, StaticToken};
