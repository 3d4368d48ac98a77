// Copyright (c) 2025 - Cowboy AI, Inc.
//! Network Placement Value Objects
//!
//! The VPC and subnets the domain is placed into. Subnets are reconstructed
//! from three positional lists (ids, availability zones, route table ids)
//! and tagged with the parsed subnet classification.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use super::SubnetType;
use crate::errors::{StackError, StackResult};

macro_rules! prefixed_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Identifier prefix
            pub const PREFIX: &'static str = $prefix;

            /// Create a new identifier
            ///
            /// # Invariants
            /// - Starts with the resource prefix
            /// - Has a non-empty suffix of ASCII alphanumerics
            pub fn new(value: impl AsRef<str>) -> StackResult<Self> {
                let value = value.as_ref().trim();
                let valid = value
                    .strip_prefix(Self::PREFIX)
                    .map(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_alphanumeric()))
                    .unwrap_or(false);

                if !valid {
                    return Err(StackError::InvalidIdentifier {
                        kind: $kind,
                        value: value.to_string(),
                    });
                }

                Ok(Self(value.to_string()))
            }

            /// Get as string slice
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = StackError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }
    };
}

prefixed_id!(
    /// VPC identifier (`vpc-...`)
    VpcId,
    "vpc-",
    "VPC"
);

prefixed_id!(
    /// Subnet identifier (`subnet-...`)
    SubnetId,
    "subnet-",
    "subnet"
);

prefixed_id!(
    /// Route table identifier (`rtb-...`)
    RouteTableId,
    "rtb-",
    "route table"
);

/// One subnet of the placement, rebuilt from the positional triples
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubnetAttributes {
    pub subnet_id: SubnetId,
    pub availability_zone: String,
    pub route_table_id: RouteTableId,
    #[serde(rename = "type")]
    pub subnet_type: SubnetType,
}

/// VPC plus the ordered set of subnets the domain is attached to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkPlacement {
    pub vpc_id: VpcId,
    pub subnet_type: SubnetType,
    pub subnets: Vec<SubnetAttributes>,
}

impl NetworkPlacement {
    /// Rebuild the placement from positional subnet lists
    ///
    /// # Invariants
    /// - The three lists have equal length
    /// - At least one subnet is supplied
    /// - Every identifier is well formed
    /// - No subnet id appears twice
    pub fn new(
        vpc_id: &str,
        subnet_type: SubnetType,
        subnet_ids: &[String],
        availability_zones: &[String],
        route_table_ids: &[String],
    ) -> StackResult<Self> {
        check_aligned(subnet_ids, availability_zones, route_table_ids)?;

        if subnet_ids.is_empty() {
            return Err(StackError::InvalidConfiguration(
                "at least one subnet is required".to_string(),
            ));
        }

        let subnets = subnet_ids
            .iter()
            .zip(availability_zones)
            .zip(route_table_ids)
            .map(|((subnet_id, az), route_table_id)| {
                let availability_zone = az.trim();
                if availability_zone.is_empty() {
                    return Err(StackError::InvalidConfiguration(format!(
                        "subnet {} has an empty availability zone",
                        subnet_id
                    )));
                }
                Ok(SubnetAttributes {
                    subnet_id: SubnetId::new(subnet_id)?,
                    availability_zone: availability_zone.to_string(),
                    route_table_id: RouteTableId::new(route_table_id)?,
                    subnet_type,
                })
            })
            .collect::<StackResult<Vec<_>>>()?;

        let mut seen = BTreeSet::new();
        if let Some(duplicate) = subnets.iter().find(|s| !seen.insert(&s.subnet_id)) {
            return Err(StackError::InvalidConfiguration(format!(
                "subnet {} is listed more than once",
                duplicate.subnet_id
            )));
        }

        Ok(Self {
            vpc_id: VpcId::new(vpc_id)?,
            subnet_type,
            subnets,
        })
    }

    /// Subnet ids in configuration order
    pub fn subnet_ids(&self) -> Vec<&SubnetId> {
        self.subnets.iter().map(|s| &s.subnet_id).collect()
    }

    /// Distinct availability zones, in first-seen order
    pub fn availability_zones(&self) -> Vec<&str> {
        let mut zones: Vec<&str> = Vec::new();
        for subnet in &self.subnets {
            if !zones.contains(&subnet.availability_zone.as_str()) {
                zones.push(subnet.availability_zone.as_str());
            }
        }
        zones
    }
}

/// Check the positional subnet lists line up
pub fn check_aligned(
    subnet_ids: &[String],
    availability_zones: &[String],
    route_table_ids: &[String],
) -> StackResult<()> {
    if subnet_ids.len() != availability_zones.len() || subnet_ids.len() != route_table_ids.len() {
        return Err(StackError::SubnetListMismatch {
            subnet_ids: subnet_ids.len(),
            availability_zones: availability_zones.len(),
            route_table_ids: route_table_ids.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_identifier_prefixes() {
        assert!(VpcId::new("vpc-0abc123").is_ok());
        assert!(SubnetId::new("subnet-1a2b").is_ok());
        assert!(RouteTableId::new("rtb-99").is_ok());

        assert!(VpcId::new("subnet-0abc").is_err());
        assert!(VpcId::new("vpc-").is_err());
        assert!(SubnetId::new("subnet-a b").is_err());
    }

    #[test]
    fn test_placement_rebuilds_triples_in_order() {
        let placement = NetworkPlacement::new(
            "vpc-1",
            SubnetType::PrivateIsolated,
            &strings(&["subnet-a", "subnet-b"]),
            &strings(&["us-east-1a", "us-east-1b"]),
            &strings(&["rtb-a", "rtb-b"]),
        )
        .unwrap();

        assert_eq!(placement.subnets.len(), 2);
        assert_eq!(placement.subnets[1].subnet_id.as_str(), "subnet-b");
        assert_eq!(placement.subnets[1].availability_zone, "us-east-1b");
        assert_eq!(placement.subnets[1].route_table_id.as_str(), "rtb-b");
        assert_eq!(placement.subnets[0].subnet_type, SubnetType::PrivateIsolated);
    }

    #[test]
    fn test_placement_rejects_misaligned_lists() {
        let result = NetworkPlacement::new(
            "vpc-1",
            SubnetType::Private,
            &strings(&["subnet-a", "subnet-b"]),
            &strings(&["us-east-1a"]),
            &strings(&["rtb-a", "rtb-b"]),
        );
        assert_eq!(
            result.unwrap_err(),
            StackError::SubnetListMismatch {
                subnet_ids: 2,
                availability_zones: 1,
                route_table_ids: 2,
            }
        );
    }

    #[test]
    fn test_placement_rejects_duplicate_subnets() {
        let result = NetworkPlacement::new(
            "vpc-1",
            SubnetType::Private,
            &strings(&["subnet-a", "subnet-a"]),
            &strings(&["us-east-1a", "us-east-1b"]),
            &strings(&["rtb-a", "rtb-b"]),
        );
        assert_eq!(
            result.unwrap_err(),
            StackError::InvalidConfiguration("subnet subnet-a is listed more than once".to_string())
        );
    }

    #[test]
    fn test_distinct_availability_zones() {
        let placement = NetworkPlacement::new(
            "vpc-1",
            SubnetType::Private,
            &strings(&["subnet-a", "subnet-b", "subnet-c"]),
            &strings(&["eu-west-1b", "eu-west-1a", "eu-west-1b"]),
            &strings(&["rtb-a", "rtb-b", "rtb-c"]),
        )
        .unwrap();
        assert_eq!(placement.availability_zones(), vec!["eu-west-1b", "eu-west-1a"]);
    }

    #[test]
    fn test_subnet_attributes_serialize_like_diagnostic_record() {
        let placement = NetworkPlacement::new(
            "vpc-1",
            SubnetType::Private,
            &strings(&["subnet-a"]),
            &strings(&["us-east-1a"]),
            &strings(&["rtb-a"]),
        )
        .unwrap();
        let json = serde_json::to_value(&placement.subnets).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{
                "subnetId": "subnet-a",
                "availabilityZone": "us-east-1a",
                "routeTableId": "rtb-a",
                "type": "PRIVATE"
            }])
        );
    }
}
