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

//! Types and traits shared between resources.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, ErrorKind, Result};

const SUBSCRIPTIONS: &str = "subscriptions";
const RESOURCE_GROUPS: &str = "resourceGroups";
const PROVIDERS: &str = "providers";
const NETAPP_PROVIDER: &str = "Microsoft.NetApp";
const NETWORK_PROVIDER: &str = "Microsoft.Network";
const ACCOUNTS: &str = "netAppAccounts";
const CAPACITY_POOLS: &str = "capacityPools";
const VOLUMES: &str = "volumes";

/// Kind of a resource, judging by its identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// NetApp account.
    Account,
    /// Capacity pool inside an account.
    CapacityPool,
    /// Volume inside a capacity pool.
    Volume,
    /// Anything else.
    Other,
}

/// Hierarchical resource manager identifier.
///
/// An identifier is a sequence of `/key/value` pairs, e.g.
/// `/subscriptions/<id>/resourceGroups/<rg>/providers/Microsoft.NetApp/netAppAccounts/<name>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResourceId {
    pairs: Vec<(String, String)>,
}

impl ResourceId {
    /// Parse an identifier.
    pub fn parse<S: AsRef<str>>(value: S) -> Result<ResourceId> {
        let value = value.as_ref();
        let trimmed = value.trim_matches('/');
        if trimmed.is_empty() {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "Resource ID cannot be empty",
            ));
        }

        let segments = trimmed.split('/').collect::<Vec<_>>();
        if segments.len() % 2 != 0 || segments.iter().any(|s| s.is_empty()) {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                format!("Malformed resource ID {}", value),
            ));
        }

        let pairs = segments
            .chunks(2)
            .map(|pair| (pair[0].to_string(), pair[1].to_string()))
            .collect();
        Ok(ResourceId { pairs })
    }

    /// Identifier of a NetApp account.
    pub fn netapp_account<S1, S2, S3>(subscription: S1, resource_group: S2, name: S3) -> ResourceId
    where
        S1: Into<String>,
        S2: Into<String>,
        S3: Into<String>,
    {
        ResourceId {
            pairs: vec![
                (SUBSCRIPTIONS.into(), subscription.into()),
                (RESOURCE_GROUPS.into(), resource_group.into()),
                (PROVIDERS.into(), NETAPP_PROVIDER.into()),
                (ACCOUNTS.into(), name.into()),
            ],
        }
    }

    /// Identifier of a capacity pool in this account.
    pub fn capacity_pool<S: Into<String>>(&self, name: S) -> ResourceId {
        self.account_scope().child(CAPACITY_POOLS, name)
    }

    /// Identifier of a volume in this capacity pool.
    pub fn volume<S: Into<String>>(&self, name: S) -> ResourceId {
        self.pool_scope().child(VOLUMES, name)
    }

    /// Identifier of the parent resource (if any).
    pub fn parent(&self) -> Option<ResourceId> {
        if self.pairs.len() <= 1 {
            return None;
        }

        let mut pairs = self.pairs.clone();
        let _ = pairs.pop();
        // Providers are namespaces, not resources.
        if pairs
            .last()
            .map(|(k, _)| k.eq_ignore_ascii_case(PROVIDERS))
            .unwrap_or(false)
        {
            let _ = pairs.pop();
        }
        Some(ResourceId { pairs })
    }

    /// Value following the given key (case-insensitive).
    pub fn value(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Subscription ID.
    #[inline]
    pub fn subscription(&self) -> Option<&str> {
        self.value(SUBSCRIPTIONS)
    }

    /// Resource group name.
    #[inline]
    pub fn resource_group(&self) -> Option<&str> {
        self.value(RESOURCE_GROUPS)
    }

    /// NetApp account name.
    #[inline]
    pub fn account(&self) -> Option<&str> {
        self.value(ACCOUNTS)
    }

    /// Capacity pool name.
    #[inline]
    pub fn capacity_pool_name(&self) -> Option<&str> {
        self.value(CAPACITY_POOLS)
    }

    /// Volume name.
    #[inline]
    pub fn volume_name(&self) -> Option<&str> {
        self.value(VOLUMES)
    }

    /// Name of the resource itself.
    pub fn name(&self) -> &str {
        self.pairs.last().map(|(_, v)| v.as_str()).unwrap_or_default()
    }

    /// Kind of the resource.
    pub fn kind(&self) -> ResourceKind {
        match self.pairs.last() {
            Some((k, _)) if k.eq_ignore_ascii_case(ACCOUNTS) => ResourceKind::Account,
            Some((k, _)) if k.eq_ignore_ascii_case(CAPACITY_POOLS) => ResourceKind::CapacityPool,
            Some((k, _)) if k.eq_ignore_ascii_case(VOLUMES) => ResourceKind::Volume,
            _ => ResourceKind::Other,
        }
    }

    /// Path segments of the identifier.
    pub(crate) fn segments(&self) -> impl Iterator<Item = &str> {
        self.pairs
            .iter()
            .flat_map(|(k, v)| [k.as_str(), v.as_str()])
    }

    fn child<S: Into<String>>(mut self, key: &str, name: S) -> ResourceId {
        self.pairs.push((key.into(), name.into()));
        self
    }

    fn truncated_after(&self, key: &str) -> ResourceId {
        let pairs = match self.pairs.iter().position(|(k, _)| k.eq_ignore_ascii_case(key)) {
            Some(idx) => self.pairs[..=idx].to_vec(),
            None => self.pairs.clone(),
        };
        ResourceId { pairs }
    }

    fn account_scope(&self) -> ResourceId {
        self.truncated_after(ACCOUNTS)
    }

    fn pool_scope(&self) -> ResourceId {
        self.truncated_after(CAPACITY_POOLS)
    }
}

/// Identifier of a subnet delegated to NetApp volumes.
pub fn subnet_id(subscription: &str, resource_group: &str, vnet: &str, subnet: &str) -> String {
    format!(
        "/{}/{}/{}/{}/{}/{}/virtualNetworks/{}/subnets/{}",
        SUBSCRIPTIONS,
        subscription,
        RESOURCE_GROUPS,
        resource_group,
        PROVIDERS,
        NETWORK_PROVIDER,
        vnet,
        subnet
    )
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in self.segments() {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}

impl FromStr for ResourceId {
    type Err = Error;

    fn from_str(s: &str) -> Result<ResourceId> {
        ResourceId::parse(s)
    }
}

impl TryFrom<String> for ResourceId {
    type Error = Error;

    fn try_from(value: String) -> Result<ResourceId> {
        ResourceId::parse(value)
    }
}

impl From<ResourceId> for String {
    fn from(value: ResourceId) -> String {
        value.to_string()
    }
}

#[cfg(test)]
mod test {
    use super::{subnet_id, ResourceId, ResourceKind};
    use crate::ErrorKind;

    const VOLUME: &str = "/subscriptions/sub1/resourceGroups/rg1/providers/Microsoft.NetApp/\
                          netAppAccounts/acc1/capacityPools/pool1/volumes/vol1";

    #[test]
    fn test_parse_volume() {
        let id = ResourceId::parse(VOLUME).unwrap();
        assert_eq!(id.subscription(), Some("sub1"));
        assert_eq!(id.resource_group(), Some("rg1"));
        assert_eq!(id.account(), Some("acc1"));
        assert_eq!(id.capacity_pool_name(), Some("pool1"));
        assert_eq!(id.volume_name(), Some("vol1"));
        assert_eq!(id.name(), "vol1");
        assert_eq!(id.kind(), ResourceKind::Volume);
        assert_eq!(id.to_string(), VOLUME);
    }

    #[test]
    fn test_value_is_case_insensitive() {
        let id = ResourceId::parse(VOLUME.to_lowercase()).unwrap();
        assert_eq!(id.value("capacityPools"), Some("pool1"));
        assert_eq!(id.account(), Some("acc1"));
        assert_eq!(id.kind(), ResourceKind::Volume);
    }

    #[test]
    fn test_parse_invalid() {
        for value in ["", "/", "/subscriptions", "/subscriptions//resourceGroups/rg"] {
            let err = ResourceId::parse(value).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidInput, "{}", value);
        }
    }

    #[test]
    fn test_build_hierarchy() {
        let account = ResourceId::netapp_account("sub1", "rg1", "acc1");
        assert_eq!(account.kind(), ResourceKind::Account);
        let volume = account.capacity_pool("pool1").volume("vol1");
        assert_eq!(volume.to_string(), VOLUME);

        let pool = volume.parent().unwrap();
        assert_eq!(pool.kind(), ResourceKind::CapacityPool);
        assert_eq!(pool.parent().unwrap(), account);
        let group = account.parent().unwrap();
        assert_eq!(
            group.to_string(),
            "/subscriptions/sub1/resourceGroups/rg1"
        );
    }

    #[test]
    fn test_move_volume_between_pools() {
        let volume = ResourceId::parse(VOLUME).unwrap();
        let other_pool = volume.capacity_pool("pool2");
        let moved = other_pool.volume(volume.name());
        assert_eq!(moved.capacity_pool_name(), Some("pool2"));
        assert_eq!(moved.volume_name(), Some("vol1"));
        assert_eq!(moved.account(), Some("acc1"));
    }

    #[test]
    fn test_serde() {
        let quoted = format!("\"{}\"", VOLUME);
        let id: ResourceId = serde_json::from_str(&quoted).unwrap();
        assert_eq!(id.volume_name(), Some("vol1"));
        assert_eq!(serde_json::to_string(&id).unwrap(), quoted);
        assert!(serde_json::from_str::<ResourceId>("\"/a/b/c\"").is_err());
    }

    #[test]
    fn test_subnet_id() {
        assert_eq!(
            subnet_id("sub1", "rg1", "vnet1", "default"),
            "/subscriptions/sub1/resourceGroups/rg1/providers/Microsoft.Network/\
             virtualNetworks/vnet1/subnets/default"
        );
    }
}
