// Copyright (c) 2025 - Cowboy AI, Inc.
//! Stack Configuration
//!
//! The configuration bundle is read once from a flat mapping of named
//! variables (normally `.env` plus the process environment). Every required
//! key is checked before anything is reported, so one run surfaces every
//! missing value.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

use crate::domain::network::check_aligned;
use crate::errors::{StackError, StackResult};
use crate::stack::settings::{DomainSettings, LoggingSettings};

/// Required configuration keys, in reporting order
pub const REQUIRED_KEYS: [&str; 11] = [
    "APP_NAME",
    "CDK_DEPLOY_REGION",
    "ENVIRONMENT",
    "OWNER",
    "VPC_ID",
    "VPC_SUBNET_TYPE",
    "VPC_PRIVATE_SUBNET_IDS",
    "VPC_PRIVATE_SUBNET_AZS",
    "VPC_PRIVATE_SUBNET_ROUTE_TABLE_IDS",
    "OPENSEARCH_USER_NAME",
    "OPENSEARCH_USER_PASSWORD",
];

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeployEnvironment {
    Development,
    Staging,
    Production,
    Feature,
}

impl DeployEnvironment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Staging => "staging",
            Self::Production => "production",
            Self::Feature => "feature",
        }
    }

    /// Abbreviation used in resource prefixes
    pub fn short_name(&self) -> &'static str {
        match self {
            Self::Development => "dev",
            Self::Staging => "stg",
            Self::Production => "prd",
            Self::Feature => "feat",
        }
    }
}

impl fmt::Display for DeployEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DeployEnvironment {
    type Err = StackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "staging" | "stage" | "stg" => Ok(Self::Staging),
            "production" | "prod" | "prd" => Ok(Self::Production),
            "feature" | "feat" => Ok(Self::Feature),
            other => Err(StackError::InvalidConfiguration(format!(
                "unknown environment '{}' (expected development, staging, production or feature)",
                other
            ))),
        }
    }
}

/// Configuration bundle for one stack
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackConfig {
    /// Prefix for every construct and export name, e.g. `myapp-prd`
    pub resource_prefix: String,
    pub deploy_region: String,
    /// Target account, when known
    pub account: Option<String>,
    pub deploy_environment: String,
    pub short_deploy_environment: String,
    pub app_name: String,
    pub owner: String,
    pub vpc_id: String,
    pub vpc_subnet_type: String,
    pub vpc_private_subnet_ids: Vec<String>,
    pub vpc_private_subnet_azs: Vec<String>,
    pub vpc_private_subnet_route_table_ids: Vec<String>,
    pub opensearch_user_name: String,
    pub opensearch_user_password: String,
    pub domain: DomainSettings,
}

impl StackConfig {
    /// Load `.env` (if present) and build the bundle from the process environment
    pub fn from_env() -> StackResult<Self> {
        match dotenvy::dotenv() {
            Ok(path) => debug!("Loaded environment file {}", path.display()),
            Err(e) if e.not_found() => debug!("No .env file found"),
            Err(e) => return Err(StackError::InvalidConfiguration(e.to_string())),
        }
        Self::from_vars(std::env::vars())
    }

    /// Build the bundle from an explicit env file, with the process
    /// environment taking precedence over the file
    pub fn from_env_file(path: impl AsRef<Path>) -> StackResult<Self> {
        Self::from_file_and_vars(path, std::env::vars())
    }

    /// Build the bundle from an env file overlaid with `vars`
    ///
    /// The process environment is never modified.
    pub fn from_file_and_vars<I, K, V>(path: impl AsRef<Path>, vars: I) -> StackResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let path = path.as_ref();
        let unreadable = |e: dotenvy::Error| {
            StackError::InvalidConfiguration(format!("cannot read {}: {}", path.display(), e))
        };

        let mut merged = HashMap::new();
        for entry in dotenvy::from_path_iter(path).map_err(unreadable)? {
            let (key, value) = entry.map_err(unreadable)?;
            merged.insert(key, value);
        }
        debug!("Loaded {} entries from {}", merged.len(), path.display());

        merged.extend(vars.into_iter().map(|(k, v)| (k.into(), v.into())));
        Self::from_vars(merged)
    }

    /// Build the bundle from a flat mapping of named variables
    ///
    /// Fails with [`StackError::MissingConfiguration`] listing every required
    /// key that is absent or blank.
    pub fn from_vars<I, K, V>(vars: I) -> StackResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars: HashMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        let missing: Vec<String> = REQUIRED_KEYS
            .iter()
            .filter(|key| {
                vars.get(**key)
                    .map(|v| v.trim().is_empty() || split_list(v).is_empty())
                    .unwrap_or(true)
            })
            .map(|key| key.to_string())
            .collect();

        if !missing.is_empty() {
            return Err(StackError::MissingConfiguration { keys: missing });
        }

        let get = |key: &str| vars.get(key).map(|v| v.trim().to_string()).unwrap_or_default();

        // the raw value names the stack and tags; the parsed one only picks the abbreviation
        let deploy_environment = get("ENVIRONMENT");
        let environment: DeployEnvironment = deploy_environment.parse()?;
        let app_name = get("APP_NAME");
        let short = environment.short_name().to_string();

        let config = Self {
            resource_prefix: format!("{}-{}", app_name, short),
            deploy_region: get("CDK_DEPLOY_REGION"),
            account: vars
                .get("CDK_DEFAULT_ACCOUNT")
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            deploy_environment,
            short_deploy_environment: short,
            app_name,
            owner: get("OWNER"),
            vpc_id: get("VPC_ID"),
            vpc_subnet_type: get("VPC_SUBNET_TYPE"),
            vpc_private_subnet_ids: split_list(&get("VPC_PRIVATE_SUBNET_IDS")),
            vpc_private_subnet_azs: split_list(&get("VPC_PRIVATE_SUBNET_AZS")),
            vpc_private_subnet_route_table_ids: split_list(&get(
                "VPC_PRIVATE_SUBNET_ROUTE_TABLE_IDS",
            )),
            opensearch_user_name: get("OPENSEARCH_USER_NAME"),
            opensearch_user_password: vars
                .get("OPENSEARCH_USER_PASSWORD")
                .cloned()
                .unwrap_or_default(),
            domain: domain_settings(&vars)?,
        };

        debug!(
            resource_prefix = %config.resource_prefix,
            region = %config.deploy_region,
            subnets = config.vpc_private_subnet_ids.len(),
            "Configuration loaded"
        );

        Ok(config)
    }

    /// Check the bundle invariants
    ///
    /// # Invariants
    /// - Every attribute is non-empty (all offenders are reported together)
    /// - Subnet ids, zones and route table ids have equal length
    pub fn validate(&self) -> StackResult<()> {
        let fields: [(&str, bool); 12] = [
            ("RESOURCE_PREFIX", self.resource_prefix.trim().is_empty()),
            ("APP_NAME", self.app_name.trim().is_empty()),
            ("CDK_DEPLOY_REGION", self.deploy_region.trim().is_empty()),
            ("ENVIRONMENT", self.deploy_environment.trim().is_empty()),
            ("OWNER", self.owner.trim().is_empty()),
            ("VPC_ID", self.vpc_id.trim().is_empty()),
            ("VPC_SUBNET_TYPE", self.vpc_subnet_type.trim().is_empty()),
            ("VPC_PRIVATE_SUBNET_IDS", self.vpc_private_subnet_ids.is_empty()),
            ("VPC_PRIVATE_SUBNET_AZS", self.vpc_private_subnet_azs.is_empty()),
            (
                "VPC_PRIVATE_SUBNET_ROUTE_TABLE_IDS",
                self.vpc_private_subnet_route_table_ids.is_empty(),
            ),
            ("OPENSEARCH_USER_NAME", self.opensearch_user_name.trim().is_empty()),
            ("OPENSEARCH_USER_PASSWORD", self.opensearch_user_password.is_empty()),
        ];

        let missing: Vec<String> = fields
            .iter()
            .filter(|(_, empty)| *empty)
            .map(|(key, _)| key.to_string())
            .collect();

        if !missing.is_empty() {
            return Err(StackError::MissingConfiguration { keys: missing });
        }

        check_aligned(
            &self.vpc_private_subnet_ids,
            &self.vpc_private_subnet_azs,
            &self.vpc_private_subnet_route_table_ids,
        )
    }

    /// CloudFormation stack name
    pub fn stack_name(&self) -> String {
        format!(
            "{}-{}-AwsOpensearchServerlessStack",
            self.deploy_environment, self.deploy_region
        )
    }

    /// Human readable stack description
    pub fn stack_description(&self) -> String {
        format!(
            "AwsOpensearchServerlessStack for {} in {} {}.",
            self.app_name, self.deploy_region, self.deploy_environment
        )
    }
}

/// Split a comma separated value, trimming entries and dropping blanks
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn domain_settings(vars: &HashMap<String, String>) -> StackResult<DomainSettings> {
    let mut settings = DomainSettings::default();

    if let Some(version) = optional(vars, "OPENSEARCH_ENGINE_VERSION") {
        settings.engine_version = version;
    }
    if let Some(size) = optional_number(vars, "OPENSEARCH_VOLUME_SIZE")? {
        settings.ebs.volume_size_gib = size;
    }
    if let Some(nodes) = optional_number(vars, "OPENSEARCH_DATA_NODES")? {
        settings.capacity.data_nodes = Some(nodes);
    }
    if let Some(nodes) = optional_number(vars, "OPENSEARCH_MASTER_NODES")? {
        settings.capacity.master_nodes = nodes;
    }
    if let Some(instance) = optional(vars, "OPENSEARCH_DATA_NODE_INSTANCE_TYPE") {
        settings.capacity.data_node_instance_type = instance.to_ascii_lowercase();
    }
    if let Some(instance) = optional(vars, "OPENSEARCH_MASTER_NODE_INSTANCE_TYPE") {
        settings.capacity.master_node_instance_type = instance.to_ascii_lowercase();
    }
    if let Some(days) = optional_number(vars, "OPENSEARCH_LOG_RETENTION_DAYS")? {
        settings.logging = Some(LoggingSettings {
            retention_days: days,
            ..settings.logging.unwrap_or_default()
        });
    }

    Ok(settings)
}

fn optional(vars: &HashMap<String, String>, key: &str) -> Option<String> {
    vars.get(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn optional_number(vars: &HashMap<String, String>, key: &str) -> StackResult<Option<u32>> {
    optional(vars, key)
        .map(|v| {
            v.parse::<u32>().map_err(|_| {
                StackError::InvalidConfiguration(format!("{} must be a whole number, got '{}'", key, v))
            })
        })
        .transpose()
}
