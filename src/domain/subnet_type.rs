// Copyright (c) 2025 - Cowboy AI, Inc.
//! Subnet Type Classification
//!
//! Maps the free-text `VPC_SUBNET_TYPE` token onto the fixed set of subnet
//! classifications the provider understands. Parsing is case-sensitive.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::StackError;

/// Subnet classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubnetType {
    /// Subnet with a route to an internet gateway
    Public,
    /// Private subnet (legacy token, egress through NAT)
    Private,
    /// Subnet without any route out of the VPC
    PrivateIsolated,
    /// Private subnet with outbound access through NAT
    PrivateWithEgress,
}

impl SubnetType {
    /// Every classification, in token order
    pub const ALL: [SubnetType; 4] = [
        SubnetType::Public,
        SubnetType::Private,
        SubnetType::PrivateIsolated,
        SubnetType::PrivateWithEgress,
    ];

    /// Get the canonical token
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "PUBLIC",
            Self::Private => "PRIVATE",
            Self::PrivateIsolated => "PRIVATE_ISOLATED",
            Self::PrivateWithEgress => "PRIVATE_WITH_EGRESS",
        }
    }

    /// Accepted tokens, used in error reports
    pub fn accepted_tokens() -> Vec<String> {
        Self::ALL.iter().map(|t| t.as_str().to_string()).collect()
    }
}

impl fmt::Display for SubnetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SubnetType {
    type Err = StackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| StackError::InvalidSubnetType {
                value: s.to_string(),
                accepted: Self::accepted_tokens(),
            })
    }
}

/// Parse a subnet classification token
pub fn parse_subnet_type(value: &str) -> Result<SubnetType, StackError> {
    value.parse()
}
