// Copyright (c) 2025 - Cowboy AI, Inc.
//! Error types for stack construction

use thiserror::Error;

/// Errors that can occur while validating configuration or declaring the stack
///
/// Every variant is fatal: a partially declared stack is never returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StackError {
    /// One or more required configuration values are absent or empty
    #[error("Missing required configuration: {}", keys.join(", "))]
    MissingConfiguration {
        /// Every missing key, in declaration order
        keys: Vec<String>,
    },

    /// Subnet classification token is not one of the accepted values
    #[error("Invalid subnet type '{value}' (accepted: {})", accepted.join(", "))]
    InvalidSubnetType { value: String, accepted: Vec<String> },

    /// Subnet id, availability zone and route table lists are not aligned
    #[error(
        "Subnet lists must have equal length: {subnet_ids} subnet ids, \
         {availability_zones} availability zones, {route_table_ids} route table ids"
    )]
    SubnetListMismatch {
        subnet_ids: usize,
        availability_zones: usize,
        route_table_ids: usize,
    },

    /// A configuration value is present but malformed
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A network identifier does not have the expected shape
    #[error("Invalid {kind} identifier: {value}")]
    InvalidIdentifier { kind: &'static str, value: String },

    /// Domain settings violate a cluster invariant
    #[error("Invalid domain settings: {0}")]
    InvalidDomainSettings(String),

    /// Failure reported by a network lookup or provisioning collaborator
    #[error("External resolution failed: {0}")]
    ExternalResolution(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(String),
}

/// Result type for stack operations
pub type StackResult<T> = Result<T, StackError>;

impl From<serde_json::Error> for StackError {
    fn from(err: serde_json::Error) -> Self {
        StackError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for StackError {
    fn from(err: std::io::Error) -> Self {
        StackError::Io(err.to_string())
    }
}
