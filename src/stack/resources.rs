// Copyright (c) 2025 - Cowboy AI, Inc.
//! Declared Resources
//!
//! Typed CloudFormation resources. Field names serialize to the provider's
//! property names, so a resource serializes directly into the `Properties`
//! block of the template. Cross-resource references are [`Expr`] intrinsics
//! over logical ids.

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::domain::{MasterPassword, TagSet};

/// Property value that may reference another resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Literal(String),
    /// `{"Ref": logical_id}`
    Ref(String),
    /// `{"Fn::GetAtt": [logical_id, attribute]}`
    GetAtt(String, String),
    /// `{"Fn::Join": [separator, parts]}`
    Join(String, Vec<Expr>),
    /// `{"Fn::Sub": template}`
    Sub(String),
}

impl Expr {
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal(value.into())
    }

    pub fn reference(logical_id: impl Into<String>) -> Self {
        Self::Ref(logical_id.into())
    }

    pub fn get_att(logical_id: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::GetAtt(logical_id.into(), attribute.into())
    }
}

impl Serialize for Expr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Literal(value) => serializer.serialize_str(value),
            Self::Ref(id) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Ref", id)?;
                map.end()
            }
            Self::GetAtt(id, attribute) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Fn::GetAtt", &[id, attribute])?;
                map.end()
            }
            Self::Join(separator, parts) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Fn::Join", &JoinArgs(separator, parts))?;
                map.end()
            }
            Self::Sub(template) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("Fn::Sub", template)?;
                map.end()
            }
        }
    }
}

struct JoinArgs<'a>(&'a String, &'a Vec<Expr>);

impl Serialize for JoinArgs<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(2))?;
        seq.serialize_element(self.0)?;
        seq.serialize_element(self.1)?;
        seq.end()
    }
}

fn serialize_tags<S: Serializer>(tags: &TagSet, serializer: S) -> Result<S::Ok, S::Error> {
    tags.to_list().serialize(serializer)
}

/// `AWS::KMS::Key`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct EncryptionKey {
    pub description: String,
    pub enabled: bool,
    pub enable_key_rotation: bool,
    pub key_spec: String,
    pub key_usage: String,
    pub key_policy: Value,
    #[serde(skip_serializing_if = "TagSet::is_empty", serialize_with = "serialize_tags")]
    pub tags: TagSet,
}

/// One egress rule of a security group
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct EgressRule {
    pub cidr_ip: String,
    pub description: String,
    pub from_port: i32,
    pub ip_protocol: String,
    pub to_port: i32,
}

impl EgressRule {
    /// Placeholder rule that matches no traffic, used to deny all egress
    pub fn deny_all() -> Self {
        Self {
            cidr_ip: "255.255.255.255/32".to_string(),
            description: "Disallow all traffic".to_string(),
            from_port: 252,
            ip_protocol: "icmp".to_string(),
            to_port: 86,
        }
    }
}

/// `AWS::EC2::SecurityGroup`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SecurityGroup {
    pub group_description: String,
    pub security_group_egress: Vec<EgressRule>,
    pub vpc_id: String,
    #[serde(skip_serializing_if = "TagSet::is_empty", serialize_with = "serialize_tags")]
    pub tags: TagSet,
}

/// `AWS::Logs::LogGroup`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct LogGroup {
    pub retention_in_days: u32,
    #[serde(skip_serializing_if = "TagSet::is_empty", serialize_with = "serialize_tags")]
    pub tags: TagSet,
}

/// `AWS::Logs::ResourcePolicy` letting the search service write to log groups
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct LogsResourcePolicy {
    pub policy_name: String,
    pub policy_document: Expr,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ZoneAwarenessConfig {
    #[serde(rename = "AvailabilityZoneCount")]
    pub availability_zone_count: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ClusterConfig {
    pub dedicated_master_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dedicated_master_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dedicated_master_type: Option<String>,
    pub instance_count: u32,
    pub instance_type: String,
    #[serde(rename = "MultiAZWithStandbyEnabled")]
    pub multi_az_with_standby_enabled: bool,
    pub zone_awareness_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone_awareness_config: Option<ZoneAwarenessConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EbsOptions {
    #[serde(rename = "EBSEnabled")]
    pub ebs_enabled: bool,
    #[serde(rename = "VolumeSize")]
    pub volume_size: u32,
    #[serde(rename = "VolumeType")]
    pub volume_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct EncryptionAtRestOptions {
    pub enabled: bool,
    pub kms_key_id: Expr,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct EnabledFlag {
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainEndpointOptions {
    #[serde(rename = "EnforceHTTPS")]
    pub enforce_https: bool,
    #[serde(rename = "TLSSecurityPolicy")]
    pub tls_security_policy: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MasterUserOptions {
    pub master_user_name: String,
    pub master_user_password: MasterPassword,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AdvancedSecurityOptions {
    pub enabled: bool,
    pub internal_user_database_enabled: bool,
    pub anonymous_auth_enabled: bool,
    pub master_user_options: MasterUserOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct LogPublishingOption {
    pub cloud_watch_logs_log_group_arn: Expr,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VpcOptions {
    #[serde(rename = "SubnetIds")]
    pub subnet_ids: Vec<String>,
    #[serde(rename = "SecurityGroupIds")]
    pub security_group_ids: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SoftwareUpdateOptions {
    pub auto_software_update_enabled: bool,
}

/// `AWS::OpenSearchService::Domain`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SearchDomain {
    pub engine_version: String,
    pub cluster_config: ClusterConfig,
    #[serde(rename = "EBSOptions")]
    pub ebs_options: EbsOptions,
    pub encryption_at_rest_options: EncryptionAtRestOptions,
    pub node_to_node_encryption_options: EnabledFlag,
    pub domain_endpoint_options: DomainEndpointOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advanced_security_options: Option<AdvancedSecurityOptions>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub log_publishing_options: BTreeMap<String, LogPublishingOption>,
    #[serde(rename = "VPCOptions")]
    pub vpc_options: VpcOptions,
    pub software_update_options: SoftwareUpdateOptions,
    #[serde(skip_serializing_if = "TagSet::is_empty", serialize_with = "serialize_tags")]
    pub tags: TagSet,
    /// Rendered as the resource's `UpdatePolicy`, not a property
    #[serde(skip)]
    pub enable_version_upgrade: bool,
}

impl SearchDomain {
    /// Master user of fine-grained access control, when enabled
    pub fn master_user_name(&self) -> Option<&str> {
        self.advanced_security_options
            .as_ref()
            .map(|o| o.master_user_options.master_user_name.as_str())
    }
}

/// Every resource kind the stack declares
#[derive(Debug, Clone, PartialEq)]
pub enum Resource {
    EncryptionKey(EncryptionKey),
    SecurityGroup(SecurityGroup),
    LogGroup(LogGroup),
    LogsResourcePolicy(LogsResourcePolicy),
    SearchDomain(Box<SearchDomain>),
}

impl Resource {
    /// CloudFormation resource type
    pub fn cfn_type(&self) -> &'static str {
        match self {
            Self::EncryptionKey(_) => "AWS::KMS::Key",
            Self::SecurityGroup(_) => "AWS::EC2::SecurityGroup",
            Self::LogGroup(_) => "AWS::Logs::LogGroup",
            Self::LogsResourcePolicy(_) => "AWS::Logs::ResourcePolicy",
            Self::SearchDomain(_) => "AWS::OpenSearchService::Domain",
        }
    }

    /// Tag set of taggable resources
    pub fn tags_mut(&mut self) -> Option<&mut TagSet> {
        match self {
            Self::EncryptionKey(r) => Some(&mut r.tags),
            Self::SecurityGroup(r) => Some(&mut r.tags),
            Self::LogGroup(r) => Some(&mut r.tags),
            Self::SearchDomain(r) => Some(&mut r.tags),
            Self::LogsResourcePolicy(_) => None,
        }
    }

    pub fn tags(&self) -> Option<&TagSet> {
        match self {
            Self::EncryptionKey(r) => Some(&r.tags),
            Self::SecurityGroup(r) => Some(&r.tags),
            Self::LogGroup(r) => Some(&r.tags),
            Self::SearchDomain(r) => Some(&r.tags),
            Self::LogsResourcePolicy(_) => None,
        }
    }

    /// `Properties` block of the template
    pub fn properties(&self) -> serde_json::Result<Value> {
        match self {
            Self::EncryptionKey(r) => serde_json::to_value(r),
            Self::SecurityGroup(r) => serde_json::to_value(r),
            Self::LogGroup(r) => serde_json::to_value(r),
            Self::LogsResourcePolicy(r) => serde_json::to_value(r),
            Self::SearchDomain(r) => serde_json::to_value(r),
        }
    }
}
