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

//! NetApp operations needed by the pool change workflow.

use async_trait::async_trait;

use super::protocol::{
    AccountCreate, CapacityPool, CapacityPoolCreate, NetAppAccount, Volume, VolumeCreate,
};
use crate::common::{ResourceId, ResourceLookup};
use crate::Result;

/// NetApp API bound to a subscription and a resource group.
///
/// Every create and delete call returns once the remote operation has
/// finished, but the result may not be visible to reads yet.
#[async_trait]
pub trait NetAppApi: ResourceLookup {
    /// Identifier of an account with the given name.
    fn account_id(&self, name: &str) -> ResourceId;

    /// Identifier of a subnet in the same resource group.
    fn subnet_id(&self, vnet: &str, subnet: &str) -> String;

    /// Create (or update) an account.
    async fn create_account(&self, id: &ResourceId, body: &AccountCreate)
        -> Result<NetAppAccount>;

    /// Create (or update) a capacity pool.
    async fn create_capacity_pool(
        &self,
        id: &ResourceId,
        body: &CapacityPoolCreate,
    ) -> Result<CapacityPool>;

    /// Create (or update) a volume.
    async fn create_volume(&self, id: &ResourceId, body: &VolumeCreate) -> Result<Volume>;

    /// Get a volume.
    async fn get_volume(&self, id: &ResourceId) -> Result<Volume>;

    /// Move a volume to another capacity pool.
    async fn pool_change(&self, volume_id: &ResourceId, new_pool_id: &ResourceId) -> Result<()>;

    /// Delete a volume.
    async fn delete_volume(&self, id: &ResourceId) -> Result<()>;

    /// Delete a capacity pool.
    async fn delete_capacity_pool(&self, id: &ResourceId) -> Result<()>;

    /// Delete an account.
    async fn delete_account(&self, id: &ResourceId) -> Result<()>;
}
