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

//! Cloud API.

use async_trait::async_trait;

use super::auth::{AuthType, Credentials};
use super::common::{self, ResourceId, ResourceLookup};
use super::netapp::{
    api, AccountCreate, CapacityPool, CapacityPoolCreate, NetAppAccount, NetAppApi, Volume,
    VolumeCreate,
};
use super::session::Session;
use super::Result;

/// Azure NetApp Files API.
///
/// Provides high-level API for working with NetApp resources in one resource
/// group.
#[derive(Debug, Clone)]
pub struct Cloud {
    session: Session,
    subscription_id: String,
    resource_group: String,
}

impl Cloud {
    /// Create a new cloud object with a given authentication plugin.
    ///
    /// See [`auth` module](auth/index.html) for details on how to authenticate
    /// against Azure.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// fn cloud() -> netapp_pool_change::Result<netapp_pool_change::Cloud> {
    ///     let auth = netapp_pool_change::auth::ServicePrincipal::new(
    ///         "tenant1", "client1", "s3cr3t")?;
    ///     Ok(netapp_pool_change::Cloud::new(auth, "subscription1", "rg1"))
    /// }
    ///
    /// # fn main() { cloud().unwrap(); }
    /// ```
    pub fn new<Auth, S1, S2>(auth_type: Auth, subscription_id: S1, resource_group: S2) -> Cloud
    where
        Auth: AuthType + 'static,
        S1: Into<String>,
        S2: Into<String>,
    {
        Cloud::new_with_session(Session::new(auth_type), subscription_id, resource_group)
    }

    /// Create a new cloud object from loaded credentials.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # fn cloud_from_env() -> netapp_pool_change::Result<()> {
    /// let creds = netapp_pool_change::auth::from_env()?;
    /// let cloud = netapp_pool_change::Cloud::from_credentials(creds, "rg1")?;
    /// # Ok(()) }
    /// # fn main() { cloud_from_env().unwrap(); }
    /// ```
    pub fn from_credentials<S: Into<String>>(
        credentials: Credentials,
        resource_group: S,
    ) -> Result<Cloud> {
        let session = Session::new(credentials.auth).with_endpoint(&credentials.resource_manager)?;
        Ok(Cloud::new_with_session(
            session,
            credentials.subscription_id,
            resource_group,
        ))
    }

    /// Create a new cloud object with an existing session.
    pub fn new_with_session<S1, S2>(session: Session, subscription_id: S1, resource_group: S2) -> Cloud
    where
        S1: Into<String>,
        S2: Into<String>,
    {
        Cloud {
            session,
            subscription_id: subscription_id.into(),
            resource_group: resource_group.into(),
        }
    }

    /// Refresh this `Cloud` object (renew token, etc).
    pub async fn refresh(&self) -> Result<()> {
        self.session.refresh().await
    }

    /// Session used for requests.
    #[inline]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Subscription the resources belong to.
    #[inline]
    pub fn subscription_id(&self) -> &str {
        &self.subscription_id
    }

    /// Resource group the resources belong to.
    #[inline]
    pub fn resource_group(&self) -> &str {
        &self.resource_group
    }

    /// Get an account by its name.
    pub async fn get_account<S: AsRef<str>>(&self, name: S) -> Result<NetAppAccount> {
        api::get_account(&self.session, &self.account_id(name.as_ref())).await
    }

    /// Get a capacity pool by its identifier.
    pub async fn get_capacity_pool(&self, id: &ResourceId) -> Result<CapacityPool> {
        api::get_capacity_pool(&self.session, id).await
    }
}

#[async_trait]
impl ResourceLookup for Cloud {
    async fn exists(&self, id: &ResourceId) -> Result<bool> {
        self.session.exists(id).await
    }
}

#[async_trait]
impl NetAppApi for Cloud {
    fn account_id(&self, name: &str) -> ResourceId {
        ResourceId::netapp_account(&self.subscription_id, &self.resource_group, name)
    }

    fn subnet_id(&self, vnet: &str, subnet: &str) -> String {
        common::subnet_id(&self.subscription_id, &self.resource_group, vnet, subnet)
    }

    async fn create_account(
        &self,
        id: &ResourceId,
        body: &AccountCreate,
    ) -> Result<NetAppAccount> {
        api::create_account(&self.session, id, body).await
    }

    async fn create_capacity_pool(
        &self,
        id: &ResourceId,
        body: &CapacityPoolCreate,
    ) -> Result<CapacityPool> {
        api::create_capacity_pool(&self.session, id, body).await
    }

    async fn create_volume(&self, id: &ResourceId, body: &VolumeCreate) -> Result<Volume> {
        api::create_volume(&self.session, id, body).await
    }

    async fn get_volume(&self, id: &ResourceId) -> Result<Volume> {
        api::get_volume(&self.session, id).await
    }

    async fn pool_change(&self, volume_id: &ResourceId, new_pool_id: &ResourceId) -> Result<()> {
        api::pool_change(&self.session, volume_id, new_pool_id).await
    }

    async fn delete_volume(&self, id: &ResourceId) -> Result<()> {
        api::delete_volume(&self.session, id).await
    }

    async fn delete_capacity_pool(&self, id: &ResourceId) -> Result<()> {
        api::delete_capacity_pool(&self.session, id).await
    }

    async fn delete_account(&self, id: &ResourceId) -> Result<()> {
        api::delete_account(&self.session, id).await
    }
}
