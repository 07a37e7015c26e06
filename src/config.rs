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

//! Sample configuration.
//!
//! The defaults are placeholders that must be edited (or overridden by a YAML
//! file named in `ANF_SAMPLE_CONFIG`) before running against a real
//! subscription:
//!
//! ```yaml
//! resource_group: anf-samples
//! location: westus2
//! vnet: anf-vnet
//! subnet: anf-subnet
//! account_name: anf-account
//! source_pool_name: pool-premium
//! destination_pool_name: pool-standard
//! volume_name: vol1
//! cleanup: true
//! ```

use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

use log::debug;
use serde::Deserialize;

use crate::common::{DEFAULT_POLL_INTERVAL, DEFAULT_POLL_TIMEOUT};
use crate::netapp::ServiceLevel;
use crate::{Error, ErrorKind, Result};

/// Variable pointing at a YAML configuration file.
pub const CONFIG_VAR: &str = "ANF_SAMPLE_CONFIG";

const GIB: u64 = 1024 * 1024 * 1024;
const TIB: u64 = 1024 * GIB;

/// Minimum size of a capacity pool.
pub const MIN_POOL_SIZE: u64 = 4 * TIB;
/// Maximum size of a capacity pool.
pub const MAX_POOL_SIZE: u64 = 500 * TIB;
/// Minimum size of a volume.
pub const MIN_VOLUME_SIZE: u64 = 100 * GIB;
/// Maximum size of a volume.
pub const MAX_VOLUME_SIZE: u64 = 100 * TIB;
/// Longest time to wait for a resource to (dis)appear.
pub const MAX_POLL_TIMEOUT_SECS: u64 = 24 * 60 * 60;

/// Settings of the pool change sample.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SampleConfig {
    /// Resource group holding all resources.
    pub resource_group: String,
    /// Region to create resources in.
    pub location: String,
    /// Virtual network with the delegated subnet.
    pub vnet: String,
    /// Subnet delegated to NetApp volumes.
    pub subnet: String,
    /// Name of the account.
    pub account_name: String,
    /// Name of the pool the volume is created in.
    pub source_pool_name: String,
    /// Service level of the source pool.
    pub source_service_level: ServiceLevel,
    /// Name of the pool the volume is moved to.
    pub destination_pool_name: String,
    /// Service level of the destination pool.
    pub destination_service_level: ServiceLevel,
    /// Name (and creation token) of the volume.
    pub volume_name: String,
    /// Size of both pools in bytes.
    pub pool_size: u64,
    /// Size of the volume in bytes.
    pub volume_size: u64,
    /// Whether to delete everything at the end.
    pub cleanup: bool,
    /// Delay between two existence checks.
    pub poll_interval_secs: u64,
    /// Time to wait for a resource to (dis)appear.
    pub poll_timeout_secs: u64,
}

impl Default for SampleConfig {
    fn default() -> SampleConfig {
        SampleConfig {
            resource_group: "<Resource Group Name>".to_string(),
            location: "<Location>".to_string(),
            vnet: "<VNET>".to_string(),
            subnet: "<Subnet Name>".to_string(),
            account_name: "<Account Name>".to_string(),
            source_pool_name: "<Source Capacity Pool>".to_string(),
            source_service_level: ServiceLevel::Premium,
            destination_pool_name: "<Destination Capacity Pool>".to_string(),
            destination_service_level: ServiceLevel::Standard,
            volume_name: "<Volume Name>".to_string(),
            pool_size: MIN_POOL_SIZE,
            volume_size: MIN_VOLUME_SIZE,
            cleanup: false,
            poll_interval_secs: DEFAULT_POLL_INTERVAL.as_secs(),
            poll_timeout_secs: DEFAULT_POLL_TIMEOUT.as_secs(),
        }
    }
}

impl SampleConfig {
    /// Load the configuration.
    ///
    /// Uses the file from `ANF_SAMPLE_CONFIG` if set, the defaults otherwise.
    pub fn load() -> Result<SampleConfig> {
        match env::var(CONFIG_VAR) {
            Ok(path) if !path.is_empty() => SampleConfig::from_file(path),
            _ => {
                debug!("{} is not set, using built-in settings", CONFIG_VAR);
                Ok(SampleConfig::default())
            }
        }
    }

    /// Load the configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<SampleConfig> {
        let path = path.as_ref();
        debug!("Reading sample configuration from {}", path.display());
        let contents = fs::read_to_string(path).map_err(|e| {
            Error::new(
                ErrorKind::InvalidConfig,
                format!("Cannot read {}: {}", path.display(), e),
            )
        })?;
        SampleConfig::from_yaml(&contents)
    }

    /// Parse the configuration from a YAML string.
    pub fn from_yaml(contents: &str) -> Result<SampleConfig> {
        serde_yaml::from_str(contents).map_err(|e| {
            Error::new(
                ErrorKind::InvalidConfig,
                format!("Cannot parse the sample configuration: {}", e),
            )
        })
    }

    /// Delay between two existence checks.
    #[inline]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Time to wait for a resource to (dis)appear.
    #[inline]
    pub fn poll_timeout(&self) -> Duration {
        Duration::from_secs(self.poll_timeout_secs)
    }

    /// Check the configuration before touching any resources.
    pub fn validate(&self) -> Result<()> {
        let names = [
            ("resource_group", &self.resource_group),
            ("location", &self.location),
            ("vnet", &self.vnet),
            ("subnet", &self.subnet),
            ("account_name", &self.account_name),
            ("source_pool_name", &self.source_pool_name),
            ("destination_pool_name", &self.destination_pool_name),
            ("volume_name", &self.volume_name),
        ];
        for (field, value) in names {
            if value.trim().is_empty() {
                return Err(invalid(format!("{} cannot be empty", field)));
            }
            if value.starts_with('<') && value.ends_with('>') {
                return Err(invalid(format!(
                    "{} still has the placeholder value {}",
                    field, value
                )));
            }
        }

        for (field, level) in [
            ("source_service_level", self.source_service_level),
            ("destination_service_level", self.destination_service_level),
        ] {
            if level == ServiceLevel::Unknown {
                return Err(invalid(format!("{} is not a known service level", field)));
            }
        }

        if self.source_pool_name == self.destination_pool_name {
            return Err(invalid(
                "Source and destination capacity pools must be different",
            ));
        }

        if !(MIN_POOL_SIZE..=MAX_POOL_SIZE).contains(&self.pool_size) {
            return Err(invalid(format!(
                "Capacity pool size {} is outside of {}..={}",
                self.pool_size, MIN_POOL_SIZE, MAX_POOL_SIZE
            )));
        }

        if !(MIN_VOLUME_SIZE..=MAX_VOLUME_SIZE).contains(&self.volume_size) {
            return Err(invalid(format!(
                "Volume size {} is outside of {}..={}",
                self.volume_size, MIN_VOLUME_SIZE, MAX_VOLUME_SIZE
            )));
        }

        if self.volume_size > self.pool_size {
            return Err(invalid(format!(
                "Volume size {} does not fit into capacity pool size {}",
                self.volume_size, self.pool_size
            )));
        }

        if self.poll_interval_secs == 0 {
            return Err(invalid("poll_interval_secs must be positive"));
        }

        if self.poll_timeout_secs > MAX_POLL_TIMEOUT_SECS {
            return Err(invalid(format!(
                "poll_timeout_secs {} is larger than {}",
                self.poll_timeout_secs, MAX_POLL_TIMEOUT_SECS
            )));
        }

        if self.poll_interval_secs > self.poll_timeout_secs {
            return Err(invalid(format!(
                "poll_interval_secs {} is larger than poll_timeout_secs {}",
                self.poll_interval_secs, self.poll_timeout_secs
            )));
        }

        Ok(())
    }
}

fn invalid<S: Into<String>>(message: S) -> Error {
    Error::new(ErrorKind::InvalidConfig, message)
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use super::{SampleConfig, MAX_POLL_TIMEOUT_SECS, MIN_POOL_SIZE, MIN_VOLUME_SIZE, TIB};
    use crate::netapp::ServiceLevel;
    use crate::ErrorKind;

    const CONFIG: &str = "
resource_group: anf-samples
location: westus2
vnet: anf-vnet
subnet: anf-subnet
account_name: anf-account
source_pool_name: pool-premium
destination_pool_name: pool-standard
volume_name: vol1
";

    fn valid() -> SampleConfig {
        SampleConfig::from_yaml(CONFIG).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = SampleConfig::default();
        assert_eq!(config.source_service_level, ServiceLevel::Premium);
        assert_eq!(config.destination_service_level, ServiceLevel::Standard);
        assert_eq!(config.pool_size, 4_398_046_511_104);
        assert_eq!(config.volume_size, 107_374_182_400);
        assert!(!config.cleanup);
        assert_eq!(config.poll_interval(), Duration::from_secs(10));
        assert_eq!(config.poll_timeout(), Duration::from_secs(600));
    }

    #[test]
    fn test_defaults_are_placeholders() {
        let err = SampleConfig::default().validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);
        assert!(err.message().contains("placeholder"));
    }

    #[test]
    fn test_from_yaml() {
        let config = valid();
        assert_eq!(config.resource_group, "anf-samples");
        assert_eq!(config.volume_name, "vol1");
        // Missing fields keep their defaults.
        assert_eq!(config.pool_size, MIN_POOL_SIZE);
        assert_eq!(config.volume_size, MIN_VOLUME_SIZE);
        config.validate().unwrap();
    }

    #[test]
    fn test_from_yaml_overrides() {
        let config = SampleConfig::from_yaml(&format!(
            "{}source_service_level: Ultra\ncleanup: true\npoll_interval_secs: 5\n",
            CONFIG
        ))
        .unwrap();
        assert_eq!(config.source_service_level, ServiceLevel::Ultra);
        assert!(config.cleanup);
        assert_eq!(config.poll_interval(), Duration::from_secs(5));
        config.validate().unwrap();
    }

    #[test]
    fn test_from_yaml_unknown_field() {
        let err = SampleConfig::from_yaml("volume_nmae: vol1\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);
    }

    #[test]
    fn test_from_missing_file() {
        let err = SampleConfig::from_file("/nonexistent/anf.yaml").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);
    }

    #[test]
    fn test_validate_sizes() {
        let mut config = valid();
        config.pool_size = 2 * TIB;
        assert_eq!(
            config.validate().unwrap_err().kind(),
            ErrorKind::InvalidConfig
        );

        let mut config = valid();
        config.pool_size = 501 * TIB;
        assert!(config.validate().is_err());

        let mut config = valid();
        config.volume_size = 1024;
        assert!(config.validate().is_err());

        let mut config = valid();
        config.volume_size = 5 * TIB;
        assert!(config.validate().unwrap_err().message().contains("fit"));
    }

    #[test]
    fn test_validate_same_pools() {
        let mut config = valid();
        config.destination_pool_name = config.source_pool_name.clone();
        assert!(config.validate().unwrap_err().message().contains("different"));
    }

    #[test]
    fn test_validate_empty_name() {
        let mut config = valid();
        config.volume_name = " ".to_string();
        assert!(config.validate().unwrap_err().message().contains("volume_name"));
    }

    #[test]
    fn test_validate_polling() {
        let config = SampleConfig::from_yaml(&format!(
            "{}poll_timeout_secs: 18446744073709551615\n",
            CONFIG
        ))
        .unwrap();
        let err = config.validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);
        assert!(err.message().contains("poll_timeout_secs"));

        let mut config = valid();
        config.poll_timeout_secs = MAX_POLL_TIMEOUT_SECS;
        config.validate().unwrap();

        let mut config = valid();
        config.poll_interval_secs = 0;
        assert!(config.validate().is_err());

        let mut config = valid();
        config.poll_interval_secs = 60;
        config.poll_timeout_secs = 30;
        assert!(config.validate().unwrap_err().message().contains("poll_interval_secs"));
    }

    #[test]
    fn test_validate_unknown_level() {
        let config = SampleConfig::from_yaml(&format!(
            "{}destination_service_level: Platinum\n",
            CONFIG
        ))
        .unwrap();
        assert!(config.validate().is_err());
    }
}
