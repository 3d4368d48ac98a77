// Copyright (c) 2025 - Cowboy AI, Inc.
//! Stack Declaration
//!
//! Builds the in-memory declaration of the search stack from a validated
//! configuration bundle:
//!
//! ```text
//! StackConfig ──validate──> NetworkPlacement ──resolve──> ResolvedVpc
//!                                                              │
//!      KMS key, security group, log groups, domain, outputs <──┘
//!                              │
//!                         apply_tags
//!                              ▼
//!                       StackDeclaration ──render──> template JSON
//! ```
//!
//! Construction is all or nothing; the same bundle always yields the same
//! declaration.

pub mod resources;
pub mod settings;
pub mod tagging;

use serde_json::json;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use crate::config::StackConfig;
use crate::domain::{parse_subnet_type, MasterCredentials, NetworkPlacement, TagSet};
use crate::errors::{StackError, StackResult};
use crate::resolver::{AttributeResolver, NetworkResolver, ResolvedVpc};
use resources::{
    AdvancedSecurityOptions, ClusterConfig, DomainEndpointOptions, EbsOptions, EgressRule,
    EnabledFlag, EncryptionAtRestOptions, EncryptionKey, Expr, LogGroup, LogPublishingOption,
    LogsResourcePolicy, MasterUserOptions, Resource, SearchDomain, SecurityGroup,
    SoftwareUpdateOptions, VpcOptions, ZoneAwarenessConfig,
};
use settings::ClusterLayout;
pub use tagging::apply_tags;

/// TLS policy enforced on the domain endpoint
pub const TLS_SECURITY_POLICY: &str = "Policy-Min-TLS-1-2-2019-07";

/// A resource placed in the stack
#[derive(Debug, Clone, PartialEq)]
pub struct DeclaredResource {
    /// Construct id, e.g. `myapp-prd-OpenSearchDomain`
    pub id: String,
    /// Template logical id derived from the construct id
    pub logical_id: String,
    pub resource: Resource,
    /// Logical ids this resource must be created after
    pub depends_on: Vec<String>,
}

/// Named stack output, exported for other stacks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackOutput {
    /// Output name, e.g. `myapp-prd-OpenSearchDomain-Name-Output`
    pub name: String,
    pub logical_id: String,
    pub value: Expr,
    pub export_name: String,
    pub description: String,
}

/// The declared stack
#[derive(Debug, Clone, PartialEq)]
pub struct StackDeclaration {
    pub stack_name: String,
    pub description: String,
    /// Target region, recorded in the template metadata
    pub region: String,
    /// Target account, when known
    pub account: Option<String>,
    pub resources: Vec<DeclaredResource>,
    pub outputs: Vec<StackOutput>,
    /// Tags applied by the tagging pass
    pub tags: TagSet,
}

impl StackDeclaration {
    pub fn new(
        stack_name: impl Into<String>,
        description: impl Into<String>,
        region: impl Into<String>,
        account: Option<String>,
    ) -> Self {
        Self {
            stack_name: stack_name.into(),
            description: description.into(),
            region: region.into(),
            account,
            resources: Vec::new(),
            outputs: Vec::new(),
            tags: TagSet::new(),
        }
    }

    /// Declare a resource and return its logical id
    ///
    /// # Invariants
    /// - Logical ids are unique across resources and outputs
    pub fn add_resource(
        &mut self,
        id: impl Into<String>,
        resource: Resource,
    ) -> StackResult<String> {
        let id = id.into();
        let logical_id = self.claim_logical_id(&id)?;
        debug!(id = %id, kind = resource.cfn_type(), "Declared resource");
        self.resources.push(DeclaredResource {
            id,
            logical_id: logical_id.clone(),
            resource,
            depends_on: Vec::new(),
        });
        Ok(logical_id)
    }

    /// Declare an exported output
    pub fn add_output(
        &mut self,
        name: impl Into<String>,
        value: Expr,
        export_name: impl Into<String>,
        description: impl Into<String>,
    ) -> StackResult<()> {
        let name = name.into();
        let logical_id = self.claim_logical_id(&name)?;
        self.outputs.push(StackOutput {
            name,
            logical_id,
            value,
            export_name: export_name.into(),
            description: description.into(),
        });
        Ok(())
    }

    fn claim_logical_id(&self, id: &str) -> StackResult<String> {
        let logical_id = logical_id(id);
        if logical_id.is_empty() {
            return Err(StackError::InvalidConfiguration(format!(
                "construct id '{}' has no alphanumeric characters",
                id
            )));
        }
        let taken = self.resources.iter().any(|r| r.logical_id == logical_id)
            || self.outputs.iter().any(|o| o.logical_id == logical_id);
        if taken {
            return Err(StackError::InvalidConfiguration(format!(
                "duplicate logical id '{}' for construct '{}'",
                logical_id, id
            )));
        }
        Ok(logical_id)
    }

    pub fn resource(&self, id: &str) -> Option<&DeclaredResource> {
        self.resources.iter().find(|r| r.id == id)
    }

    pub fn output(&self, name: &str) -> Option<&StackOutput> {
        self.outputs.iter().find(|o| o.name == name)
    }

    pub fn encryption_keys(&self) -> Vec<&EncryptionKey> {
        self.resources
            .iter()
            .filter_map(|r| match &r.resource {
                Resource::EncryptionKey(k) => Some(k),
                _ => None,
            })
            .collect()
    }

    pub fn search_domains(&self) -> Vec<&SearchDomain> {
        self.resources
            .iter()
            .filter_map(|r| match &r.resource {
                Resource::SearchDomain(d) => Some(d.as_ref()),
                _ => None,
            })
            .collect()
    }

    pub fn log_groups(&self) -> Vec<&LogGroup> {
        self.resources
            .iter()
            .filter_map(|r| match &r.resource {
                Resource::LogGroup(g) => Some(g),
                _ => None,
            })
            .collect()
    }
}

/// Template logical id for a construct id: its ASCII alphanumerics
pub fn logical_id(id: &str) -> String {
    id.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}

/// Builds a [`StackDeclaration`] from a configuration bundle
pub struct StackBuilder<'a, R = AttributeResolver> {
    config: &'a StackConfig,
    resolver: R,
}

impl<'a> StackBuilder<'a, AttributeResolver> {
    pub fn new(config: &'a StackConfig) -> Self {
        Self {
            config,
            resolver: AttributeResolver,
        }
    }
}

impl<'a, R: NetworkResolver> StackBuilder<'a, R> {
    /// Use a different network lookup
    pub fn with_resolver<R2: NetworkResolver>(self, resolver: R2) -> StackBuilder<'a, R2> {
        StackBuilder {
            config: self.config,
            resolver,
        }
    }

    /// Validate the bundle and declare the whole stack
    pub fn build(&self) -> StackResult<StackDeclaration> {
        let config = self.config;
        config.validate()?;

        let subnet_type = parse_subnet_type(&config.vpc_subnet_type)?;
        let placement = NetworkPlacement::new(
            &config.vpc_id,
            subnet_type,
            &config.vpc_private_subnet_ids,
            &config.vpc_private_subnet_azs,
            &config.vpc_private_subnet_route_table_ids,
        )?;
        let subnet_attributes = serde_json::to_string(&placement.subnets)?;
        info!(subnet_attributes = %subnet_attributes, "Resolved subnet attributes");

        let layout = config.domain.layout(&placement)?;

        let credentials = if config.domain.fine_grained_access_control {
            let credentials = MasterCredentials::new(
                config.opensearch_user_name.clone(),
                config.opensearch_user_password.clone(),
            )?;
            if credentials.password.is_plaintext() {
                warn!("Master user password is embedded in the template as plain text");
            }
            Some(credentials)
        } else {
            None
        };

        let vpc = self.resolver.resolve_vpc(&placement)?;

        let mut declaration = StackDeclaration::new(
            config.stack_name(),
            config.stack_description(),
            config.deploy_region.clone(),
            config.account.clone(),
        );
        declare_resources(
            &mut declaration,
            config,
            &placement,
            &vpc,
            layout,
            credentials,
        )?;

        let tags = TagSet::standard(&config.deploy_environment, &config.app_name, &config.owner);
        apply_tags(&mut declaration, &tags);

        info!(
            stack = %declaration.stack_name,
            resources = declaration.resources.len(),
            outputs = declaration.outputs.len(),
            "Stack declared"
        );
        Ok(declaration)
    }
}

/// Declare the stack with the default attribute resolver
pub fn build_stack(config: &StackConfig) -> StackResult<StackDeclaration> {
    StackBuilder::new(config).build()
}

fn declare_resources(
    declaration: &mut StackDeclaration,
    config: &StackConfig,
    placement: &NetworkPlacement,
    vpc: &ResolvedVpc,
    layout: ClusterLayout,
    credentials: Option<MasterCredentials>,
) -> StackResult<()> {
    let prefix = &config.resource_prefix;
    let settings = &config.domain;

    let key_id = declaration.add_resource(
        format!("{}-OSS-KMS-Key", prefix),
        Resource::EncryptionKey(EncryptionKey {
            description: format!("{} OpenSearch encryption at rest", prefix),
            enabled: true,
            enable_key_rotation: true,
            key_spec: "SYMMETRIC_DEFAULT".to_string(),
            key_usage: "ENCRYPT_DECRYPT".to_string(),
            key_policy: account_root_key_policy(),
            tags: TagSet::new(),
        }),
    )?;

    let security_group_name = format!("{}-OpenSearch-Security-Group", prefix);
    let security_group_id = declaration.add_resource(
        security_group_name.clone(),
        Resource::SecurityGroup(SecurityGroup {
            group_description: security_group_name,
            security_group_egress: vec![EgressRule::deny_all()],
            vpc_id: vpc.vpc_id.to_string(),
            tags: TagSet::new(),
        }),
    )?;

    let mut log_publishing = BTreeMap::new();
    let mut depends_on = Vec::new();
    if let Some(logging) = &settings.logging {
        let streams = [
            ("SEARCH_SLOW_LOGS", "SlowSearchLogs", logging.slow_search_logs),
            ("INDEX_SLOW_LOGS", "SlowIndexLogs", logging.slow_index_logs),
            ("ES_APPLICATION_LOGS", "AppLogs", logging.application_logs),
        ];

        let mut group_ids = Vec::new();
        for (log_type, name, enabled) in streams {
            if !enabled {
                continue;
            }
            let group_id = declaration.add_resource(
                format!("{}-OS-{}", prefix, name),
                Resource::LogGroup(LogGroup {
                    retention_in_days: logging.retention_days,
                    tags: TagSet::new(),
                }),
            )?;
            log_publishing.insert(
                log_type.to_string(),
                LogPublishingOption {
                    cloud_watch_logs_log_group_arn: Expr::get_att(&group_id, "Arn"),
                    enabled: true,
                },
            );
            group_ids.push(group_id);
        }

        if !group_ids.is_empty() {
            let policy_id = declaration.add_resource(
                format!("{}-OS-Logs-Resource-Policy", prefix),
                Resource::LogsResourcePolicy(LogsResourcePolicy {
                    policy_name: format!("{}-OpenSearch-Logs", prefix),
                    policy_document: Expr::Sub(log_delivery_policy(&group_ids)?),
                }),
            )?;
            depends_on.push(policy_id);
        }
    }

    let capacity = &settings.capacity;
    let dedicated_masters = layout.master_nodes > 0;
    let domain = SearchDomain {
        engine_version: settings.engine_version.clone(),
        cluster_config: ClusterConfig {
            dedicated_master_enabled: dedicated_masters,
            dedicated_master_count: dedicated_masters.then_some(layout.master_nodes),
            dedicated_master_type: dedicated_masters
                .then(|| capacity.master_node_instance_type.to_ascii_lowercase()),
            instance_count: layout.data_nodes,
            instance_type: capacity.data_node_instance_type.to_ascii_lowercase(),
            multi_az_with_standby_enabled: capacity.multi_az_with_standby,
            zone_awareness_enabled: layout.availability_zone_count.is_some(),
            zone_awareness_config: layout
                .availability_zone_count
                .map(|availability_zone_count| ZoneAwarenessConfig {
                    availability_zone_count,
                }),
        },
        ebs_options: EbsOptions {
            ebs_enabled: true,
            volume_size: settings.ebs.volume_size_gib,
            volume_type: settings.ebs.volume_type.as_str().to_string(),
        },
        encryption_at_rest_options: EncryptionAtRestOptions {
            enabled: true,
            kms_key_id: Expr::reference(&key_id),
        },
        node_to_node_encryption_options: EnabledFlag {
            enabled: settings.node_to_node_encryption,
        },
        domain_endpoint_options: DomainEndpointOptions {
            enforce_https: settings.enforce_https,
            tls_security_policy: TLS_SECURITY_POLICY.to_string(),
        },
        advanced_security_options: credentials.map(|c| AdvancedSecurityOptions {
            enabled: true,
            internal_user_database_enabled: true,
            anonymous_auth_enabled: false,
            master_user_options: MasterUserOptions {
                master_user_name: c.user_name,
                master_user_password: c.password,
            },
        }),
        log_publishing_options: log_publishing,
        vpc_options: VpcOptions {
            subnet_ids: placement
                .subnet_ids()
                .into_iter()
                .map(|s| s.to_string())
                .collect(),
            security_group_ids: vec![Expr::get_att(&security_group_id, "GroupId")],
        },
        software_update_options: SoftwareUpdateOptions {
            auto_software_update_enabled: settings.auto_software_update,
        },
        tags: TagSet::new(),
        enable_version_upgrade: settings.enable_version_upgrade,
    };

    let domain_id = declaration.add_resource(
        format!("{}-OpenSearchDomain", prefix),
        Resource::SearchDomain(Box::new(domain)),
    )?;
    if let Some(declared) = declaration.resources.last_mut() {
        declared.depends_on = depends_on;
    }

    declaration.add_output(
        format!("{}-OpenSearchDomain-Endpoint-Output", prefix),
        Expr::Join(
            String::new(),
            vec![
                Expr::literal("https://"),
                Expr::get_att(&domain_id, "DomainEndpoint"),
            ],
        ),
        format!("{}-OpenSearchDomain-Endpoint", prefix),
        "OpenSearch Domain Endpoint",
    )?;
    declaration.add_output(
        format!("{}-OpenSearchDomain-Name-Output", prefix),
        Expr::reference(&domain_id),
        format!("{}-OpenSearchDomain-Name", prefix),
        "OpenSearch Domain Name",
    )?;
    declaration.add_output(
        format!("{}-OpenSearch-KMS-Key-Id-Output", prefix),
        Expr::reference(&key_id),
        format!("{}-OpenSearch-KMS-Key-Id", prefix),
        "OpenSearch KMS Key Id",
    )?;
    declaration.add_output(
        format!("{}-OpenSearch-KMS-Key-Arn-Output", prefix),
        Expr::get_att(&key_id, "Arn"),
        format!("{}-OpenSearch-KMS-Key-Arn", prefix),
        "OpenSearch KMS Key Arn",
    )?;

    Ok(())
}

/// Key policy granting the owning account full control
fn account_root_key_policy() -> serde_json::Value {
    json!({
        "Version": "2012-10-17",
        "Statement": [{
            "Action": "kms:*",
            "Effect": "Allow",
            "Principal": {
                "AWS": {
                    "Fn::Join": ["", [
                        "arn:",
                        {"Ref": "AWS::Partition"},
                        ":iam::",
                        {"Ref": "AWS::AccountId"},
                        ":root"
                    ]]
                }
            },
            "Resource": "*"
        }]
    })
}

/// Policy document (a `Fn::Sub` template) letting the service write logs
fn log_delivery_policy(group_ids: &[String]) -> StackResult<String> {
    let arns: Vec<String> = group_ids.iter().map(|id| format!("${{{}.Arn}}", id)).collect();
    let document = json!({
        "Version": "2012-10-17",
        "Statement": [{
            "Effect": "Allow",
            "Principal": {"Service": "es.amazonaws.com"},
            "Action": ["logs:PutLogEvents", "logs:CreateLogStream"],
            "Resource": arns
        }]
    });
    Ok(serde_json::to_string(&document)?)
}
