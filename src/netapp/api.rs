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

//! Foundation bits exposing the NetApp API.

use log::{debug, trace};

use super::protocol::*;
use crate::common::{ResourceId, ResourceKind};
use crate::session::Session;
use crate::{Error, ErrorKind, Result};

const POOL_CHANGE: &str = "poolChange";

fn expect_kind(id: &ResourceId, kind: ResourceKind) -> Result<()> {
    if id.kind() == kind {
        Ok(())
    } else {
        Err(Error::new(
            ErrorKind::InvalidInput,
            format!("{} is not a {:?} identifier", id, kind),
        ))
    }
}

/// Create (or update) a NetApp account.
pub async fn create_account(
    session: &Session,
    id: &ResourceId,
    body: &AccountCreate,
) -> Result<NetAppAccount> {
    expect_kind(id, ResourceKind::Account)?;
    trace!("Creating NetApp account {} with {:?}", id, body);
    let account: NetAppAccount = session.put(id, body).await?;
    debug!("Created NetApp account {:?}", account);
    Ok(account)
}

/// Get a NetApp account.
pub async fn get_account(session: &Session, id: &ResourceId) -> Result<NetAppAccount> {
    expect_kind(id, ResourceKind::Account)?;
    trace!("Get NetApp account {}", id);
    let account: NetAppAccount = session.get(id).await?;
    trace!("Received {:?}", account);
    Ok(account)
}

/// Delete a NetApp account.
pub async fn delete_account(session: &Session, id: &ResourceId) -> Result<()> {
    expect_kind(id, ResourceKind::Account)?;
    trace!("Deleting NetApp account {}", id);
    session.delete(id).await?;
    debug!("Successfully deleted NetApp account {}", id);
    Ok(())
}

/// Create (or update) a capacity pool.
pub async fn create_capacity_pool(
    session: &Session,
    id: &ResourceId,
    body: &CapacityPoolCreate,
) -> Result<CapacityPool> {
    expect_kind(id, ResourceKind::CapacityPool)?;
    trace!("Creating capacity pool {} with {:?}", id, body);
    let pool: CapacityPool = session.put(id, body).await?;
    debug!("Created capacity pool {:?}", pool);
    Ok(pool)
}

/// Get a capacity pool.
pub async fn get_capacity_pool(session: &Session, id: &ResourceId) -> Result<CapacityPool> {
    expect_kind(id, ResourceKind::CapacityPool)?;
    trace!("Get capacity pool {}", id);
    let pool: CapacityPool = session.get(id).await?;
    trace!("Received {:?}", pool);
    Ok(pool)
}

/// Delete a capacity pool.
pub async fn delete_capacity_pool(session: &Session, id: &ResourceId) -> Result<()> {
    expect_kind(id, ResourceKind::CapacityPool)?;
    trace!("Deleting capacity pool {}", id);
    session.delete(id).await?;
    debug!("Successfully deleted capacity pool {}", id);
    Ok(())
}

/// Create (or update) a volume.
pub async fn create_volume(
    session: &Session,
    id: &ResourceId,
    body: &VolumeCreate,
) -> Result<Volume> {
    expect_kind(id, ResourceKind::Volume)?;
    trace!("Creating volume {} with {:?}", id, body);
    let volume: Volume = session.put(id, body).await?;
    debug!("Created volume {:?}", volume);
    Ok(volume)
}

/// Get a volume.
pub async fn get_volume(session: &Session, id: &ResourceId) -> Result<Volume> {
    expect_kind(id, ResourceKind::Volume)?;
    trace!("Get volume {}", id);
    let volume: Volume = session.get(id).await?;
    trace!("Received {:?}", volume);
    Ok(volume)
}

/// Delete a volume.
pub async fn delete_volume(session: &Session, id: &ResourceId) -> Result<()> {
    expect_kind(id, ResourceKind::Volume)?;
    trace!("Deleting volume {}", id);
    session.delete(id).await?;
    debug!("Successfully deleted volume {}", id);
    Ok(())
}

/// Move a volume to another capacity pool of the same account.
pub async fn pool_change(
    session: &Session,
    volume_id: &ResourceId,
    new_pool_id: &ResourceId,
) -> Result<()> {
    expect_kind(volume_id, ResourceKind::Volume)?;
    expect_kind(new_pool_id, ResourceKind::CapacityPool)?;
    let account_id = volume_id.parent().and_then(|pool| pool.parent());
    let same_account = match (account_id, new_pool_id.parent()) {
        (Some(ours), Some(theirs)) => ours.to_string().eq_ignore_ascii_case(&theirs.to_string()),
        _ => false,
    };
    if !same_account {
        return Err(Error::new(
            ErrorKind::InvalidInput,
            format!(
                "Capacity pool {} does not belong to the account of volume {}",
                new_pool_id, volume_id
            ),
        ));
    }

    let body = PoolChangeRequest {
        new_pool_resource_id: new_pool_id.clone(),
    };
    trace!("Moving volume {} to {}", volume_id, new_pool_id);
    session.post_action(volume_id, POOL_CHANGE, &body).await?;
    debug!("Moved volume {} to {}", volume_id, new_pool_id);
    Ok(())
}

#[cfg(test)]
mod test {
    use axum::http::StatusCode;

    use super::{delete_account, get_volume, pool_change};
    use crate::common::ResourceId;
    use crate::session::test::{new_session, requests, serve, Reply};
    use crate::ErrorKind;

    fn account_id() -> ResourceId {
        ResourceId::netapp_account("sub1", "rg1", "acc1")
    }

    #[tokio::test]
    async fn test_wrong_kind() {
        let session = new_session();
        let err = get_volume(&session, &account_id().capacity_pool("p1"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        let err = delete_account(&session, &account_id().capacity_pool("p1"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[tokio::test]
    async fn test_pool_change_other_account() {
        let session = new_session();
        let volume = account_id().capacity_pool("p1").volume("v1");
        let other = ResourceId::netapp_account("sub1", "rg1", "acc2").capacity_pool("p2");
        let err = pool_change(&session, &volume, &other).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[tokio::test]
    async fn test_pool_change_other_resource_group() {
        let session = new_session();
        let volume = account_id().capacity_pool("p1").volume("v1");
        let other = ResourceId::netapp_account("sub1", "rg2", "acc1").capacity_pool("p2");
        let err = pool_change(&session, &volume, &other).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        let other = ResourceId::netapp_account("sub2", "rg1", "acc1").capacity_pool("p2");
        let err = pool_change(&session, &volume, &other).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[tokio::test]
    async fn test_pool_change_same_account_any_case() {
        let (session, script) = serve(|_| vec![Reply::new(StatusCode::OK)]).await;
        let volume = account_id().capacity_pool("p1").volume("v1");
        let other = ResourceId::netapp_account("sub1", "RG1", "ACC1").capacity_pool("p2");
        pool_change(&session, &volume, &other).await.unwrap();
        assert_eq!(
            requests(&script),
            vec!["POST /subscriptions/sub1/resourceGroups/rg1/providers/Microsoft.NetApp/\
                  netAppAccounts/acc1/capacityPools/p1/volumes/v1/poolChange"
                .to_string()]
        );
    }
}
