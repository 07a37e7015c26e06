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

//! Azure NetApp Files pool change in Rust.
//!
//! A small client for the `Microsoft.NetApp` resource provider and a sample
//! workflow that moves a volume between two capacity pools.
//!
//! # Features
//!
//! * [Authentication](auth/index.html) as a service principal
//! * Accounts, capacity pools and volumes via [Cloud](struct.Cloud.html)
//! * Long-running operations and [existence polling](common/index.html)
//! * The [pool change workflow](pool_change/index.html)
//!
//! # Example
//!
//! ```rust,no_run
//! use netapp_pool_change::{Cloud, PoolChangeSample, SampleConfig};
//!
//! # async fn run() -> netapp_pool_change::Result<()> {
//! let config = SampleConfig::load()?;
//! config.validate()?;
//! let creds = netapp_pool_change::auth::from_env()?;
//! let cloud = Cloud::from_credentials(creds, &config.resource_group)?;
//! let volume = PoolChangeSample::new(&cloud, &config).run().await?;
//! println!("{}", volume.properties.service_level);
//! # Ok(()) }
//! ```

// NOTE: we do not use generic deny(warnings) to avoid breakages with new
// versions of the compiler. Add more warnings here as you discover them.
// Taken from https://github.com/rust-unofficial/patterns/
#![deny(
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    trivial_casts,
    trivial_numeric_casts,
    unconditional_recursion,
    unsafe_code,
    unused_allocation,
    unused_comparisons,
    unused_extern_crates,
    unused_import_braces,
    unused_parens,
    unused_results,
    while_true
)]
#![warn(missing_debug_implementations, missing_docs)]

#[macro_use]
mod utils;

pub mod auth;
mod cloud;
pub mod common;
pub mod config;
mod error;
mod http;
pub mod netapp;
mod operation;
pub mod pool_change;
mod session;

pub use crate::cloud::Cloud;
pub use crate::config::SampleConfig;
pub use crate::error::{Error, ErrorKind, Result};
pub use crate::http::{CloudError, Monitor};
pub use crate::operation::{AsyncOperation, OperationStatus, OperationWaiter};
pub use crate::pool_change::{PoolChangeSample, Provisioned};
pub use crate::session::{
    Session, DEFAULT_API_VERSION, DEFAULT_OPERATION_DELAY, DEFAULT_OPERATION_TIMEOUT,
};
