//! OpenSearch domain stack
//!
//! Validates a deployment configuration bundle and declares a VPC-attached,
//! KMS-encrypted OpenSearch domain with its security group, log groups and
//! exported outputs, rendered as a CloudFormation template.

pub mod config;
pub mod domain;
pub mod errors;
pub mod resolver;
pub mod stack;
pub mod template;

// Re-export commonly used types
pub use config::{DeployEnvironment, StackConfig};
pub use domain::{NetworkPlacement, SubnetType, TagSet};
pub use errors::{StackError, StackResult};
pub use resolver::{AttributeResolver, ContextResolver, NetworkResolver, ResolvedVpc};
pub use stack::settings::DomainSettings;
pub use stack::{apply_tags, build_stack, StackBuilder, StackDeclaration, StackOutput};
pub use template::{render, render_pretty, write_template};
