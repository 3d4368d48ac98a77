// Copyright (c) 2025 - Cowboy AI, Inc.
//! Search Domain Settings
//!
//! One settings value covers every domain variant: access control, zone
//! awareness and log publishing are optional sub-configurations instead of
//! separate stack definitions.

use serde::{Deserialize, Serialize};

use crate::domain::NetworkPlacement;
use crate::errors::{StackError, StackResult};

/// Default engine version
pub const DEFAULT_ENGINE_VERSION: &str = "OpenSearch_2.17";

/// Default instance type for master and data nodes
pub const DEFAULT_INSTANCE_TYPE: &str = "c7g.large.search";

/// Retention periods CloudWatch Logs accepts, in days
pub const VALID_RETENTION_DAYS: [u32; 22] = [
    1, 3, 5, 7, 14, 30, 60, 90, 120, 150, 180, 365, 400, 545, 731, 1096, 1827, 2192, 2557, 2922,
    3288, 3653,
];

/// EBS volume type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolumeType {
    Gp2,
    Gp3,
    Io1,
    Standard,
}

impl VolumeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gp2 => "gp2",
            Self::Gp3 => "gp3",
            Self::Io1 => "io1",
            Self::Standard => "standard",
        }
    }
}

/// EBS storage attached to each data node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EbsSettings {
    pub volume_size_gib: u32,
    pub volume_type: VolumeType,
}

impl Default for EbsSettings {
    fn default() -> Self {
        Self {
            volume_size_gib: 10,
            volume_type: VolumeType::Gp3,
        }
    }
}

/// Node counts and instance types
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacitySettings {
    /// Dedicated master nodes; 0 disables dedicated masters
    pub master_nodes: u32,
    pub master_node_instance_type: String,
    /// Data nodes; `None` picks 3, rounded up to a multiple of the zone count
    pub data_nodes: Option<u32>,
    pub data_node_instance_type: String,
    pub multi_az_with_standby: bool,
}

impl Default for CapacitySettings {
    fn default() -> Self {
        Self {
            master_nodes: 3,
            master_node_instance_type: DEFAULT_INSTANCE_TYPE.to_string(),
            data_nodes: None,
            data_node_instance_type: DEFAULT_INSTANCE_TYPE.to_string(),
            multi_az_with_standby: false,
        }
    }
}

/// Zone awareness
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneAwareness {
    /// Explicit zone count; `None` derives it from the number of subnets
    pub availability_zone_count: Option<u8>,
}

/// CloudWatch log publishing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    pub retention_days: u32,
    pub slow_search_logs: bool,
    pub slow_index_logs: bool,
    pub application_logs: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            retention_days: 30,
            slow_search_logs: true,
            slow_index_logs: true,
            application_logs: true,
        }
    }
}

/// Domain settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainSettings {
    pub engine_version: String,
    pub ebs: EbsSettings,
    pub capacity: CapacitySettings,
    pub zone_awareness: Option<ZoneAwareness>,
    /// Fine-grained access control with the configured master user
    pub fine_grained_access_control: bool,
    pub logging: Option<LoggingSettings>,
    pub enforce_https: bool,
    pub node_to_node_encryption: bool,
    pub auto_software_update: bool,
    pub enable_version_upgrade: bool,
}

impl Default for DomainSettings {
    fn default() -> Self {
        Self {
            engine_version: DEFAULT_ENGINE_VERSION.to_string(),
            ebs: EbsSettings::default(),
            capacity: CapacitySettings::default(),
            zone_awareness: Some(ZoneAwareness::default()),
            fine_grained_access_control: true,
            logging: Some(LoggingSettings::default()),
            enforce_https: true,
            node_to_node_encryption: true,
            auto_software_update: true,
            enable_version_upgrade: true,
        }
    }
}

/// Cluster layout after checking the settings against the placement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClusterLayout {
    /// Zone count when zone awareness is on
    pub availability_zone_count: Option<u8>,
    pub data_nodes: u32,
    pub master_nodes: u32,
}

impl DomainSettings {
    /// Check the settings and derive the cluster layout for a placement
    ///
    /// # Invariants
    /// - Engine version and instance types are well formed
    /// - Volume size is positive
    /// - Dedicated master count is 0, 3 or 5
    /// - Every subnet is in a distinct availability zone
    /// - One subnet without zone awareness; otherwise the zone count is 2 or 3
    ///   and equals the number of subnets
    /// - Data node count is a positive multiple of the zone count
    /// - Log retention is a period CloudWatch accepts
    pub fn layout(&self, placement: &NetworkPlacement) -> StackResult<ClusterLayout> {
        if !(self.engine_version.starts_with("OpenSearch_")
            || self.engine_version.starts_with("Elasticsearch_"))
        {
            return Err(invalid(format!(
                "engine version '{}' must start with OpenSearch_ or Elasticsearch_",
                self.engine_version
            )));
        }

        if self.ebs.volume_size_gib == 0 {
            return Err(invalid("EBS volume size must be at least 1 GiB".to_string()));
        }

        check_instance_type(&self.capacity.data_node_instance_type)?;
        if self.capacity.master_nodes > 0 {
            check_instance_type(&self.capacity.master_node_instance_type)?;
        }
        if !matches!(self.capacity.master_nodes, 0 | 3 | 5) {
            return Err(invalid(format!(
                "dedicated master count must be 0, 3 or 5, got {}",
                self.capacity.master_nodes
            )));
        }

        // the service attaches exactly one subnet per zone it uses
        let subnets = placement.subnets.len();
        let zones = placement.availability_zones().len();
        if zones != subnets {
            return Err(invalid(format!(
                "each subnet must be in its own availability zone, got {} subnets across {} zone(s)",
                subnets, zones
            )));
        }

        let availability_zone_count = match &self.zone_awareness {
            None if subnets == 1 => None,
            None => {
                return Err(invalid(format!(
                    "without zone awareness the domain takes exactly one subnet, got {}",
                    subnets
                )))
            }
            Some(ZoneAwareness {
                availability_zone_count: Some(count),
            }) => {
                if !matches!(*count, 2 | 3) {
                    return Err(invalid(format!(
                        "availability zone count must be 2 or 3, got {}",
                        count
                    )));
                }
                if usize::from(*count) != subnets {
                    return Err(invalid(format!(
                        "availability zone count {} does not match the {} subnet(s) supplied",
                        count, subnets
                    )));
                }
                Some(*count)
            }
            // a single subnet cannot be zone aware
            Some(ZoneAwareness {
                availability_zone_count: None,
            }) => match subnets {
                1 => None,
                2 => Some(2),
                3 => Some(3),
                n => {
                    return Err(invalid(format!(
                        "zone awareness spans at most 3 zones, got {} subnets",
                        n
                    )))
                }
            },
        };

        let data_nodes = match (self.capacity.data_nodes, availability_zone_count) {
            (Some(0), _) => return Err(invalid("data node count must be positive".to_string())),
            (Some(n), Some(az)) if n % u32::from(az) != 0 => {
                return Err(invalid(format!(
                    "data node count {} must be a multiple of the zone count {}",
                    n, az
                )))
            }
            (Some(n), _) => n,
            (None, Some(az)) => round_up(3, u32::from(az)),
            (None, None) => 3,
        };

        if self.capacity.multi_az_with_standby && availability_zone_count != Some(3) {
            return Err(invalid(
                "multi-AZ with standby requires zone awareness across 3 zones".to_string(),
            ));
        }

        if let Some(logging) = &self.logging {
            if !VALID_RETENTION_DAYS.contains(&logging.retention_days) {
                return Err(invalid(format!(
                    "log retention of {} days is not supported",
                    logging.retention_days
                )));
            }
        }

        Ok(ClusterLayout {
            availability_zone_count,
            data_nodes,
            master_nodes: self.capacity.master_nodes,
        })
    }
}

fn check_instance_type(instance_type: &str) -> StackResult<()> {
    if !instance_type.to_ascii_lowercase().ends_with(".search") {
        return Err(invalid(format!(
            "instance type '{}' must end with .search",
            instance_type
        )));
    }
    Ok(())
}

fn round_up(value: u32, multiple: u32) -> u32 {
    value.div_ceil(multiple) * multiple
}

fn invalid(message: String) -> StackError {
    StackError::InvalidDomainSettings(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SubnetType;

    fn placement(zones: &[&str]) -> NetworkPlacement {
        let ids: Vec<String> = (0..zones.len()).map(|i| format!("subnet-{}", i)).collect();
        let rtbs: Vec<String> = (0..zones.len()).map(|i| format!("rtb-{}", i)).collect();
        let azs: Vec<String> = zones.iter().map(|z| z.to_string()).collect();
        NetworkPlacement::new("vpc-1", SubnetType::Private, &ids, &azs, &rtbs).unwrap()
    }

    #[test]
    fn test_default_layout_three_zones() {
        let layout = DomainSettings::default()
            .layout(&placement(&["a", "b", "c"]))
            .unwrap();
        assert_eq!(layout.availability_zone_count, Some(3));
        assert_eq!(layout.data_nodes, 3);
        assert_eq!(layout.master_nodes, 3);
    }

    #[test]
    fn test_default_layout_two_zones_rounds_data_nodes() {
        let layout = DomainSettings::default()
            .layout(&placement(&["a", "b"]))
            .unwrap();
        assert_eq!(layout.availability_zone_count, Some(2));
        assert_eq!(layout.data_nodes, 4);
    }

    #[test]
    fn test_single_zone_disables_zone_awareness() {
        let layout = DomainSettings::default().layout(&placement(&["a"])).unwrap();
        assert_eq!(layout.availability_zone_count, None);
        assert_eq!(layout.data_nodes, 3);
    }

    #[test]
    fn test_explicit_zone_count_must_fit_subnets() {
        let settings = DomainSettings {
            zone_awareness: Some(ZoneAwareness {
                availability_zone_count: Some(3),
            }),
            ..Default::default()
        };
        assert!(settings.layout(&placement(&["a", "b"])).is_err());
        assert!(settings.layout(&placement(&["a", "b", "c", "d"])).is_err());
        assert!(settings.layout(&placement(&["a", "b", "c"])).is_ok());
    }

    #[test]
    fn test_more_than_three_subnets_rejected() {
        let result = DomainSettings::default().layout(&placement(&["a", "b", "c", "d"]));
        assert!(matches!(result, Err(StackError::InvalidDomainSettings(_))));
    }

    #[test]
    fn test_subnets_must_be_in_distinct_zones() {
        let result = DomainSettings::default().layout(&placement(&["a", "a"]));
        assert!(matches!(result, Err(StackError::InvalidDomainSettings(_))));

        let settings = DomainSettings {
            zone_awareness: None,
            ..Default::default()
        };
        assert!(settings.layout(&placement(&["a", "a"])).is_err());
    }

    #[test]
    fn test_without_zone_awareness_takes_one_subnet() {
        let settings = DomainSettings {
            zone_awareness: None,
            ..Default::default()
        };
        assert!(settings.layout(&placement(&["a", "b"])).is_err());
        let layout = settings.layout(&placement(&["a"])).unwrap();
        assert_eq!(layout.availability_zone_count, None);
    }

    #[test]
    fn test_data_nodes_must_be_multiple_of_zones() {
        let mut settings = DomainSettings::default();
        settings.capacity.data_nodes = Some(3);
        assert!(settings.layout(&placement(&["a", "b"])).is_err());
        settings.capacity.data_nodes = Some(6);
        assert_eq!(
            settings.layout(&placement(&["a", "b"])).unwrap().data_nodes,
            6
        );
    }

    #[test]
    fn test_rejects_unsupported_retention_and_masters() {
        let mut settings = DomainSettings::default();
        settings.logging = Some(LoggingSettings {
            retention_days: 31,
            ..Default::default()
        });
        assert!(settings.layout(&placement(&["a", "b", "c"])).is_err());

        let mut settings = DomainSettings::default();
        settings.capacity.master_nodes = 2;
        assert!(settings.layout(&placement(&["a", "b", "c"])).is_err());
    }

    #[test]
    fn test_rejects_non_search_instance_type() {
        let mut settings = DomainSettings::default();
        settings.capacity.data_node_instance_type = "c7g.large".to_string();
        assert!(settings.layout(&placement(&["a", "b", "c"])).is_err());
    }
}
