// Copyright (c) 2025 - Cowboy AI, Inc.
//! Network Resolution
//!
//! Resolving the configured VPC to a live network is the job of an external
//! lookup service. The builder only sees it through [`NetworkResolver`];
//! whatever that service reports as a failure is surfaced unmodified as
//! [`StackError::ExternalResolution`] and never retried.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

use crate::domain::{NetworkPlacement, VpcId};
use crate::errors::{StackError, StackResult};

/// A VPC as reported by the lookup service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedVpc {
    pub vpc_id: VpcId,
    #[serde(default)]
    pub availability_zones: Vec<String>,
}

/// Network lookup seam
pub trait NetworkResolver {
    /// Resolve the placement's VPC
    fn resolve_vpc(&self, placement: &NetworkPlacement) -> StackResult<ResolvedVpc>;
}

/// Trusts the configured identifiers without any lookup
#[derive(Debug, Clone, Copy, Default)]
pub struct AttributeResolver;

impl NetworkResolver for AttributeResolver {
    fn resolve_vpc(&self, placement: &NetworkPlacement) -> StackResult<ResolvedVpc> {
        Ok(ResolvedVpc {
            vpc_id: placement.vpc_id.clone(),
            availability_zones: placement
                .availability_zones()
                .into_iter()
                .map(str::to_string)
                .collect(),
        })
    }
}

/// Answers from a cached lookup context
///
/// The context document maps VPC ids to what a previous provider lookup
/// returned:
///
/// ```json
/// { "vpcs": { "vpc-0123": { "vpcId": "vpc-0123", "availabilityZones": ["us-east-1a"] } } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextResolver {
    #[serde(default)]
    vpcs: BTreeMap<String, ResolvedVpc>,
}

impl ContextResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_vpc(mut self, vpc: ResolvedVpc) -> Self {
        self.vpcs.insert(vpc.vpc_id.to_string(), vpc);
        self
    }

    pub fn from_json(json: &str) -> StackResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| StackError::ExternalResolution(format!("invalid lookup context: {}", e)))
    }

    pub fn from_file(path: impl AsRef<Path>) -> StackResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            StackError::ExternalResolution(format!(
                "cannot read lookup context {}: {}",
                path.display(),
                e
            ))
        })?;
        debug!("Loaded lookup context from {}", path.display());
        Self::from_json(&contents)
    }
}

impl NetworkResolver for ContextResolver {
    fn resolve_vpc(&self, placement: &NetworkPlacement) -> StackResult<ResolvedVpc> {
        let vpc = self
            .vpcs
            .get(placement.vpc_id.as_str())
            .cloned()
            .ok_or_else(|| {
                StackError::ExternalResolution(format!("VPC {} not found", placement.vpc_id))
            })?;

        if !vpc.availability_zones.is_empty() {
            if let Some(subnet) = placement
                .subnets
                .iter()
                .find(|s| !vpc.availability_zones.contains(&s.availability_zone))
            {
                return Err(StackError::ExternalResolution(format!(
                    "subnet {} is in {}, which is not a zone of VPC {}",
                    subnet.subnet_id, subnet.availability_zone, vpc.vpc_id
                )));
            }
        }

        Ok(vpc)
    }
}
