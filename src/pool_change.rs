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

//! Pool change workflow.
//!
//! Creates an account with two capacity pools and a volume in the first one,
//! moves the volume to the second pool and optionally deletes everything.

use std::fmt;

use log::{error, info};

use crate::common::{Existence, ExistenceWaiter, ResourceId, Waiter};
use crate::config::SampleConfig;
use crate::netapp::{
    AccountCreate, CapacityPool, CapacityPoolCreate, NetAppAccount, NetAppApi, ServiceLevel,
    Volume, VolumeCreate,
};
use crate::Result;

/// Resources created by the provisioning step.
#[derive(Debug, Clone)]
pub struct Provisioned {
    /// The account.
    pub account: NetAppAccount,
    /// Pool the volume is created in.
    pub source_pool: CapacityPool,
    /// Pool the volume is moved to.
    pub destination_pool: CapacityPool,
    /// The volume as created.
    pub volume: Volume,
}

/// Pool change sample bound to an API and a configuration.
pub struct PoolChangeSample<'a, A: ?Sized> {
    api: &'a A,
    config: &'a SampleConfig,
}

impl<'a, A: ?Sized> fmt::Debug for PoolChangeSample<'a, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolChangeSample")
            .field("config", self.config)
            .finish()
    }
}

impl<'a, A: NetAppApi + ?Sized> PoolChangeSample<'a, A> {
    /// Create the sample.
    ///
    /// The configuration is expected to be validated.
    pub fn new(api: &'a A, config: &'a SampleConfig) -> PoolChangeSample<'a, A> {
        PoolChangeSample { api, config }
    }

    /// Run all steps.
    ///
    /// Returns the volume after the pool change.
    pub async fn run(&self) -> Result<Volume> {
        info!("Creating ANF Resources...");
        let resources = self.provision().await?;
        let volume = self.change_pool(&resources).await?;
        if self.config.cleanup {
            self.cleanup(&resources, &volume).await?;
        }
        info!("ANF Pool Change sample has completed successfully");
        Ok(volume)
    }

    /// Create the account, both pools and the volume.
    ///
    /// Stops at the first failure without undoing previous steps.
    pub async fn provision(&self) -> Result<Provisioned> {
        let config = self.config;

        info!("Creating Account...");
        let account_id = self.api.account_id(&config.account_name);
        let account = reported(
            "creating Account",
            self.api
                .create_account(&account_id, &AccountCreate::new(&config.location))
                .await,
        )?;
        info!("\tAccount successfully created. Resource id: {}", account.id);

        info!("Creating Source Capacity Pool...");
        let source_pool = self
            .create_pool(&account.id, &config.source_pool_name, config.source_service_level)
            .await?;

        info!("Creating Destination Capacity Pool...");
        let destination_pool = self
            .create_pool(
                &account.id,
                &config.destination_pool_name,
                config.destination_service_level,
            )
            .await?;

        info!("Creating Volume...");
        let subnet_id = self.api.subnet_id(&config.vnet, &config.subnet);
        let volume_id = source_pool.id.volume(&config.volume_name);
        let volume = reported("creating Volume", async {
            let body = VolumeCreate::for_pool(
                &source_pool,
                &config.volume_name,
                config.volume_size,
                subnet_id,
            )?
            .with_service_level(config.source_service_level)?;
            self.api.create_volume(&volume_id, &body).await
        }
        .await)?;
        info!("\tVolume successfully created. Resource id: {}", volume.id);
        info!(
            "Current Volume service level: {}",
            volume.properties.service_level
        );

        info!("Waiting for {} to be available...", volume.id.name());
        self.wait_for(&volume.id, Existence::Present).await?;

        Ok(Provisioned {
            account,
            source_pool,
            destination_pool,
            volume,
        })
    }

    /// Move the volume to the destination pool.
    ///
    /// Returns the volume as seen in its new pool.
    pub async fn change_pool(&self, resources: &Provisioned) -> Result<Volume> {
        info!("Performing pool change on Volume...");
        let volume_name = resources.volume.id.name();
        reported(
            "performing pool change",
            self.api
                .pool_change(&resources.volume.id, &resources.destination_pool.id)
                .await,
        )?;
        info!(
            "\tSuccessfully performed pool change on Volume: {}",
            volume_name
        );

        let new_id = resources.destination_pool.id.volume(volume_name);
        self.wait_for(&new_id, Existence::Present).await?;
        let volume = reported("retrieving Volume", self.api.get_volume(&new_id).await)?;
        info!(
            "Current Volume service level: {}",
            volume.properties.service_level
        );
        Ok(volume)
    }

    /// Delete the volume, the pools and the account, in this order.
    ///
    /// Each deletion is confirmed before the next one starts.
    pub async fn cleanup(&self, resources: &Provisioned, volume: &Volume) -> Result<()> {
        info!("Cleaning up resources");

        info!("Deleting Volumes...");
        info!("\tDeleting {}", volume.id.name());
        reported("deleting volumes", self.api.delete_volume(&volume.id).await)?;
        self.wait_for(&volume.id, Existence::Absent).await?;
        info!("\t\tSuccessfully deleted Volume: {}", volume.id);

        info!("Deleting Capacity Pools...");
        for pool in [&resources.source_pool, &resources.destination_pool] {
            info!("\tDeleting {}", pool.id.name());
            reported(
                "deleting capacity pools",
                self.api.delete_capacity_pool(&pool.id).await,
            )?;
            self.wait_for(&pool.id, Existence::Absent).await?;
            info!("\t\tSuccessfully deleted Capacity Pool: {}", pool.id);
        }

        info!("Deleting Accounts...");
        let account = &resources.account;
        info!("\tDeleting {}", account.id.name());
        reported(
            "deleting accounts",
            self.api.delete_account(&account.id).await,
        )?;
        self.wait_for(&account.id, Existence::Absent).await?;
        info!("\t\tSuccessfully deleted Account: {}", account.id);

        Ok(())
    }

    async fn create_pool(
        &self,
        account_id: &ResourceId,
        name: &str,
        service_level: ServiceLevel,
    ) -> Result<CapacityPool> {
        let body =
            CapacityPoolCreate::new(&self.config.location, service_level, self.config.pool_size);
        let pool = reported(
            "creating Capacity Pool",
            self.api
                .create_capacity_pool(&account_id.capacity_pool(name), &body)
                .await,
        )?;
        info!(
            "\tCapacity Pool successfully created. Resource id: {}",
            pool.id
        );
        Ok(pool)
    }

    async fn wait_for(&self, id: &ResourceId, desired: Existence) -> Result<()> {
        ExistenceWaiter::new(self.api, id.clone(), desired)
            .with_delay(self.config.poll_interval())
            .with_timeout(self.config.poll_timeout())
            .wait()
            .await
    }
}

/// Log a failed step before passing the error on.
fn reported<T>(action: &str, result: Result<T>) -> Result<T> {
    result.map_err(|err| {
        error!("An error occurred while {}: {}", action, err.message());
        err
    })
}
