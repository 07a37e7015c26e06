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

//! Loading credentials from the environment.

use std::env;
use std::fs;
use std::path::Path;

use log::{debug, warn};
use serde::Deserialize;

use super::identity::{DEFAULT_AUTHORITY, DEFAULT_RESOURCE_MANAGER};
use super::ServicePrincipal;
use crate::{Error, ErrorKind, Result};

/// Variable pointing at an SDK authentication file.
pub const AUTH_LOCATION_VAR: &str = "AZURE_AUTH_LOCATION";

const CLIENT_ID_VAR: &str = "AZURE_CLIENT_ID";
const CLIENT_SECRET_VAR: &str = "AZURE_CLIENT_SECRET";
const TENANT_ID_VAR: &str = "AZURE_TENANT_ID";
const SUBSCRIPTION_ID_VAR: &str = "AZURE_SUBSCRIPTION_ID";

/// Contents of an SDK authentication file (`az ad sp create-for-rbac --sdk-auth`).
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SdkAuth {
    client_id: String,
    client_secret: String,
    subscription_id: String,
    tenant_id: String,
    #[serde(default)]
    active_directory_endpoint_url: Option<String>,
    #[serde(default)]
    resource_manager_endpoint_url: Option<String>,
}

/// Credentials with the subscription they are meant for.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Authentication to use.
    pub auth: ServicePrincipal,
    /// Subscription to manage resources in.
    pub subscription_id: String,
    /// Resource manager endpoint.
    pub resource_manager: String,
}

/// Load credentials from the environment.
///
/// If `AZURE_AUTH_LOCATION` is set, reads the SDK authentication file it
/// points to. Otherwise uses `AZURE_CLIENT_ID`, `AZURE_CLIENT_SECRET`,
/// `AZURE_TENANT_ID` and `AZURE_SUBSCRIPTION_ID`.
pub fn from_env() -> Result<Credentials> {
    from_vars(|name| env::var(name).ok())
}

/// Load credentials from an SDK authentication file.
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Credentials> {
    let path = path.as_ref();
    debug!("Reading credentials from {}", path.display());
    let contents = fs::read_to_string(path).map_err(|e| {
        Error::new(
            ErrorKind::InvalidConfig,
            format!("Cannot read {}: {}", path.display(), e),
        )
    })?;
    from_sdk_auth_str(&contents)
}

fn from_vars<F>(get: F) -> Result<Credentials>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(location) = get(AUTH_LOCATION_VAR).filter(|v| !v.is_empty()) {
        return from_file(location);
    }

    let require = |name: &str| {
        get(name).filter(|v| !v.is_empty()).ok_or_else(|| {
            Error::new(
                ErrorKind::InvalidConfig,
                format!("Neither {} nor {} is set", AUTH_LOCATION_VAR, name),
            )
        })
    };

    let tenant_id = require(TENANT_ID_VAR)?;
    let client_id = require(CLIENT_ID_VAR)?;
    let client_secret = require(CLIENT_SECRET_VAR)?;
    let subscription_id = require(SUBSCRIPTION_ID_VAR)?;
    Ok(Credentials {
        auth: ServicePrincipal::new(tenant_id, client_id, client_secret)?,
        subscription_id,
        resource_manager: DEFAULT_RESOURCE_MANAGER.to_string(),
    })
}

fn from_sdk_auth_str(contents: &str) -> Result<Credentials> {
    let sdk: SdkAuth = serde_json::from_str(contents).map_err(|e| {
        Error::new(
            ErrorKind::InvalidConfig,
            format!("Cannot parse the authentication file: {}", e),
        )
    })?;

    let authority = sdk
        .active_directory_endpoint_url
        .unwrap_or_else(|| DEFAULT_AUTHORITY.to_string());
    let resource_manager = sdk
        .resource_manager_endpoint_url
        .unwrap_or_else(|| DEFAULT_RESOURCE_MANAGER.to_string());
    if sdk.subscription_id.is_empty() {
        warn!("Subscription ID in the authentication file is empty");
    }

    let auth = ServicePrincipal::new(sdk.tenant_id, sdk.client_id, sdk.client_secret)?
        .with_authority(&authority)?
        .with_resource_manager(&resource_manager);
    Ok(Credentials {
        auth,
        subscription_id: sdk.subscription_id,
        resource_manager,
    })
}

#[cfg(test)]
mod test {
    use std::collections::HashMap;

    use super::{from_sdk_auth_str, from_vars};
    use crate::ErrorKind;

    const SDK_AUTH: &str = r#"{
        "clientId": "client1",
        "clientSecret": "s3cr3t",
        "subscriptionId": "sub1",
        "tenantId": "tenant1",
        "activeDirectoryEndpointUrl": "https://login.microsoftonline.us",
        "resourceManagerEndpointUrl": "https://management.usgovcloudapi.net/",
        "activeDirectoryGraphResourceId": "https://graph.windows.net/",
        "sqlManagementEndpointUrl": "https://management.core.windows.net:8443/",
        "galleryEndpointUrl": "https://gallery.azure.com/",
        "managementEndpointUrl": "https://management.core.windows.net/"
    }"#;

    #[test]
    fn test_from_sdk_auth() {
        let creds = from_sdk_auth_str(SDK_AUTH).unwrap();
        assert_eq!(creds.subscription_id, "sub1");
        assert_eq!(creds.resource_manager, "https://management.usgovcloudapi.net/");
        assert_eq!(creds.auth.client_id(), "client1");
        assert_eq!(creds.auth.tenant_id(), "tenant1");
        assert_eq!(
            creds.auth.token_endpoint().as_str(),
            "https://login.microsoftonline.us/tenant1/oauth2/v2.0/token"
        );
        assert_eq!(
            creds.auth.scope(),
            "https://management.usgovcloudapi.net/.default"
        );
    }

    #[test]
    fn test_from_sdk_auth_defaults() {
        let creds = from_sdk_auth_str(
            r#"{"clientId": "c", "clientSecret": "s", "subscriptionId": "sub", "tenantId": "t"}"#,
        )
        .unwrap();
        assert_eq!(creds.resource_manager, "https://management.azure.com/");
        assert_eq!(
            creds.auth.token_endpoint().as_str(),
            "https://login.microsoftonline.com/t/oauth2/v2.0/token"
        );
    }

    #[test]
    fn test_from_sdk_auth_invalid() {
        let err = from_sdk_auth_str(r#"{"clientId": "c"}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);
    }

    #[test]
    fn test_from_vars() {
        let vars: HashMap<&str, &str> = [
            ("AZURE_CLIENT_ID", "client1"),
            ("AZURE_CLIENT_SECRET", "s3cr3t"),
            ("AZURE_TENANT_ID", "tenant1"),
            ("AZURE_SUBSCRIPTION_ID", "sub1"),
        ]
        .into_iter()
        .collect();
        let creds = from_vars(|name| vars.get(name).map(|v| v.to_string())).unwrap();
        assert_eq!(creds.subscription_id, "sub1");
        assert_eq!(creds.auth.client_id(), "client1");
        assert_eq!(creds.resource_manager, "https://management.azure.com/");
    }

    #[test]
    fn test_from_vars_missing() {
        let err = from_vars(|name| {
            if name == "AZURE_CLIENT_ID" {
                Some("client1".to_string())
            } else {
                None
            }
        })
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);
    }

    #[test]
    fn test_from_missing_file() {
        let err = from_vars(|name| {
            if name == "AZURE_AUTH_LOCATION" {
                Some("/nonexistent/azureauth.json".to_string())
            } else {
                None
            }
        })
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);
    }
}
