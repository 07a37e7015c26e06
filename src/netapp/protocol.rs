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

//! JSON structures and protocol bits for the NetApp API.

#![allow(missing_docs)]

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::common::ResourceId;
use crate::{Error, ErrorKind, Result};

protocol_enum! {
    #[doc = "Performance tier of a capacity pool and its volumes."]
    enum ServiceLevel {
        Standard = "Standard",
        Premium = "Premium",
        Ultra = "Ultra",
        StandardZrs = "StandardZRS",
        Flexible = "Flexible"
    }
}

protocol_enum! {
    #[doc = "Provisioning state of a resource."]
    enum ProvisioningState {
        Accepted = "Accepted",
        Creating = "Creating",
        Patching = "Patching",
        Updating = "Updating",
        Deleting = "Deleting",
        Moving = "Moving",
        Failed = "Failed",
        Succeeded = "Succeeded"
    }
}

protocol_enum! {
    #[doc = "File protocol served by a volume."]
    enum ProtocolType {
        Nfsv3 = "NFSv3",
        Nfsv41 = "NFSv4.1",
        Cifs = "CIFS"
    }
}

/// An export policy rule.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportPolicyRule {
    pub rule_index: u32,
    pub allowed_clients: String,
    #[serde(default)]
    pub cifs: bool,
    #[serde(default)]
    pub nfsv3: bool,
    #[serde(default)]
    pub nfsv41: bool,
    #[serde(default)]
    pub unix_read_only: bool,
    #[serde(default)]
    pub unix_read_write: bool,
}

impl ExportPolicyRule {
    /// Read-write NFSv4.1 access for the given clients.
    pub fn nfsv41_read_write<S: Into<String>>(rule_index: u32, allowed_clients: S) -> Self {
        ExportPolicyRule {
            rule_index,
            allowed_clients: allowed_clients.into(),
            cifs: false,
            nfsv3: false,
            nfsv41: true,
            unix_read_only: false,
            unix_read_write: true,
        }
    }
}

/// Access rules of a volume.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ExportPolicy {
    #[serde(default)]
    pub rules: Vec<ExportPolicyRule>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountProperties {
    #[serde(default)]
    pub provisioning_state: Option<ProvisioningState>,
}

/// A NetApp account.
#[derive(Debug, Clone, Deserialize)]
pub struct NetAppAccount {
    pub id: ResourceId,
    pub name: String,
    pub location: String,
    #[serde(default)]
    pub tags: HashMap<String, String>,
    #[serde(default)]
    pub properties: AccountProperties,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapacityPoolProperties {
    #[serde(default)]
    pub pool_id: Option<String>,
    pub service_level: ServiceLevel,
    pub size: u64,
    #[serde(default)]
    pub qos_type: Option<String>,
    #[serde(default)]
    pub provisioning_state: Option<ProvisioningState>,
}

/// A capacity pool.
#[derive(Debug, Clone, Deserialize)]
pub struct CapacityPool {
    pub id: ResourceId,
    /// Qualified name (`account/pool`).
    pub name: String,
    pub location: String,
    #[serde(default)]
    pub tags: HashMap<String, String>,
    pub properties: CapacityPoolProperties,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeProperties {
    #[serde(default)]
    pub file_system_id: Option<String>,
    pub creation_token: String,
    pub service_level: ServiceLevel,
    pub usage_threshold: u64,
    pub subnet_id: String,
    #[serde(default)]
    pub protocol_types: Vec<ProtocolType>,
    #[serde(default)]
    pub export_policy: Option<ExportPolicy>,
    #[serde(default)]
    pub provisioning_state: Option<ProvisioningState>,
}

/// A volume.
#[derive(Debug, Clone, Deserialize)]
pub struct Volume {
    pub id: ResourceId,
    /// Qualified name (`account/pool/volume`).
    pub name: String,
    pub location: String,
    #[serde(default)]
    pub tags: HashMap<String, String>,
    pub properties: VolumeProperties,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AccountCreateProperties {}

/// Request body to create an account.
#[derive(Debug, Clone, Serialize)]
pub struct AccountCreate {
    pub location: String,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub tags: HashMap<String, String>,
    pub properties: AccountCreateProperties,
}

impl AccountCreate {
    pub fn new<S: Into<String>>(location: S) -> AccountCreate {
        AccountCreate {
            location: location.into(),
            tags: HashMap::new(),
            properties: AccountCreateProperties::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CapacityPoolCreateProperties {
    pub service_level: ServiceLevel,
    pub size: u64,
}

/// Request body to create a capacity pool.
#[derive(Debug, Clone, Serialize)]
pub struct CapacityPoolCreate {
    pub location: String,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub tags: HashMap<String, String>,
    pub properties: CapacityPoolCreateProperties,
}

impl CapacityPoolCreate {
    pub fn new<S: Into<String>>(location: S, service_level: ServiceLevel, size: u64) -> Self {
        CapacityPoolCreate {
            location: location.into(),
            tags: HashMap::new(),
            properties: CapacityPoolCreateProperties {
                service_level,
                size,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeCreateProperties {
    pub creation_token: String,
    pub service_level: ServiceLevel,
    pub usage_threshold: u64,
    pub subnet_id: String,
    pub protocol_types: Vec<ProtocolType>,
    pub export_policy: ExportPolicy,
}

/// Request body to create a volume.
#[derive(Debug, Clone, Serialize)]
pub struct VolumeCreate {
    pub location: String,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub tags: HashMap<String, String>,
    pub properties: VolumeCreateProperties,
}

impl VolumeCreate {
    /// An NFSv4.1 volume in the given pool, open read-write to everyone.
    ///
    /// Location and service level are taken from the pool.
    pub fn for_pool<S1, S2>(
        pool: &CapacityPool,
        creation_token: S1,
        usage_threshold: u64,
        subnet_id: S2,
    ) -> Result<VolumeCreate>
    where
        S1: Into<String>,
        S2: Into<String>,
    {
        if usage_threshold > pool.properties.size {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                format!(
                    "Volume size {} exceeds the size {} of capacity pool {}",
                    usage_threshold, pool.properties.size, pool.id
                ),
            ));
        }

        Ok(VolumeCreate {
            location: pool.location.clone(),
            tags: HashMap::new(),
            properties: VolumeCreateProperties {
                creation_token: creation_token.into(),
                service_level: pool.properties.service_level,
                usage_threshold,
                subnet_id: subnet_id.into(),
                protocol_types: vec![ProtocolType::Nfsv41],
                export_policy: ExportPolicy {
                    rules: vec![ExportPolicyRule::nfsv41_read_write(1, "0.0.0.0/0")],
                },
            },
        })
    }

    /// Request a specific service level.
    ///
    /// Fails if it differs from the level of the pool.
    pub fn with_service_level(self, service_level: ServiceLevel) -> Result<VolumeCreate> {
        if service_level != self.properties.service_level {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                format!(
                    "Service level {} does not match the capacity pool service level {}",
                    service_level, self.properties.service_level
                ),
            ));
        }
        Ok(self)
    }
}

/// Request body to move a volume to another pool.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolChangeRequest {
    pub new_pool_resource_id: ResourceId,
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::{
        AccountCreate, CapacityPool, CapacityPoolCreate, NetAppAccount, PoolChangeRequest,
        ProtocolType, ProvisioningState, ServiceLevel, Volume, VolumeCreate,
    };
    use crate::common::{ResourceId, ResourceKind};
    use crate::ErrorKind;

    const POOL_ID: &str = "/subscriptions/sub1/resourceGroups/rg1/providers/Microsoft.NetApp/\
                           netAppAccounts/acc1/capacityPools/src";

    fn pool() -> CapacityPool {
        serde_json::from_value(json!({
            "id": POOL_ID,
            "name": "acc1/src",
            "type": "Microsoft.NetApp/netAppAccounts/capacityPools",
            "location": "westus2",
            "properties": {
                "poolId": "9f5f7c9e-0000-0000-0000-000000000000",
                "serviceLevel": "Premium",
                "size": 4398046511104u64,
                "qosType": "Auto",
                "provisioningState": "Succeeded"
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_account_parse() {
        let account: NetAppAccount = serde_json::from_value(json!({
            "id": "/subscriptions/sub1/resourceGroups/rg1/providers/Microsoft.NetApp/netAppAccounts/acc1",
            "name": "acc1",
            "location": "westus2",
            "tags": {"dept": "IT"},
            "properties": {"provisioningState": "Creating", "activeDirectories": []}
        }))
        .unwrap();
        assert_eq!(account.id.kind(), ResourceKind::Account);
        assert_eq!(account.tags["dept"], "IT");
        assert_eq!(
            account.properties.provisioning_state,
            Some(ProvisioningState::Creating)
        );
    }

    #[test]
    fn test_pool_parse() {
        let pool = pool();
        assert_eq!(pool.id.name(), "src");
        assert_eq!(pool.properties.service_level, ServiceLevel::Premium);
        assert_eq!(pool.properties.size, 4_398_046_511_104);
    }

    #[test]
    fn test_volume_parse() {
        let volume: Volume = serde_json::from_value(json!({
            "id": format!("{}/volumes/vol1", POOL_ID),
            "name": "acc1/src/vol1",
            "location": "westus2",
            "properties": {
                "creationToken": "vol1",
                "serviceLevel": "StandardZRS",
                "usageThreshold": 107374182400u64,
                "subnetId": "/subscriptions/sub1/resourceGroups/rg1/providers/Microsoft.Network/virtualNetworks/vnet1/subnets/anf",
                "protocolTypes": ["NFSv4.1"],
                "exportPolicy": {"rules": [{
                    "ruleIndex": 1,
                    "allowedClients": "0.0.0.0/0",
                    "nfsv41": true,
                    "unixReadWrite": true
                }]},
                "provisioningState": "Succeeded",
                "throughputMibps": 6.4
            }
        }))
        .unwrap();
        assert_eq!(volume.id.capacity_pool_name(), Some("src"));
        assert_eq!(volume.properties.service_level, ServiceLevel::StandardZrs);
        assert_eq!(volume.properties.protocol_types, vec![ProtocolType::Nfsv41]);
        let rules = volume.properties.export_policy.unwrap().rules;
        assert_eq!(rules.len(), 1);
        assert!(rules[0].unix_read_write);
        assert!(!rules[0].cifs);
    }

    #[test]
    fn test_unknown_service_level() {
        let level: ServiceLevel = serde_json::from_str("\"Platinum\"").unwrap();
        assert_eq!(level, ServiceLevel::Unknown);
    }

    #[test]
    fn test_account_create() {
        let body = serde_json::to_value(AccountCreate::new("westus2")).unwrap();
        assert_eq!(body, json!({"location": "westus2", "properties": {}}));
    }

    #[test]
    fn test_pool_create() {
        let body =
            serde_json::to_value(CapacityPoolCreate::new("westus2", ServiceLevel::Standard, 4))
                .unwrap();
        assert_eq!(
            body,
            json!({
                "location": "westus2",
                "properties": {"serviceLevel": "Standard", "size": 4}
            })
        );
    }

    #[test]
    fn test_volume_create_for_pool() {
        let body = VolumeCreate::for_pool(&pool(), "vol1", 107_374_182_400, "subnet1").unwrap();
        assert_eq!(
            serde_json::to_value(body).unwrap(),
            json!({
                "location": "westus2",
                "properties": {
                    "creationToken": "vol1",
                    "serviceLevel": "Premium",
                    "usageThreshold": 107374182400u64,
                    "subnetId": "subnet1",
                    "protocolTypes": ["NFSv4.1"],
                    "exportPolicy": {"rules": [{
                        "ruleIndex": 1,
                        "allowedClients": "0.0.0.0/0",
                        "cifs": false,
                        "nfsv3": false,
                        "nfsv41": true,
                        "unixReadOnly": false,
                        "unixReadWrite": true
                    }]}
                }
            })
        );
    }

    #[test]
    fn test_volume_create_too_large() {
        let err = VolumeCreate::for_pool(&pool(), "vol1", 5_000_000_000_000, "subnet1")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_volume_create_service_level_mismatch() {
        let body = VolumeCreate::for_pool(&pool(), "vol1", 107_374_182_400, "subnet1").unwrap();
        assert!(body.clone().with_service_level(ServiceLevel::Premium).is_ok());
        let err = body.with_service_level(ServiceLevel::Ultra).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_pool_change_request() {
        let req = PoolChangeRequest {
            new_pool_resource_id: ResourceId::parse(POOL_ID).unwrap(),
        };
        assert_eq!(
            serde_json::to_value(req).unwrap(),
            json!({ "newPoolResourceId": POOL_ID })
        );
    }
}
