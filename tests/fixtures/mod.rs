// Copyright (c) 2025 - Cowboy AI, Inc.
//! Test Fixtures for aws-opensearch-stack
//!
//! Deterministic configuration bundles shared by the integration tests.

#![allow(dead_code)]

use aws_opensearch_stack::{DomainSettings, StackConfig};

pub const PREFIX: &str = "app-dev";
pub const USER_NAME: &str = "admin";
pub const PASSWORD: &str = "Secret123";

/// Complete variable set for a two-subnet development deployment
pub fn vars() -> Vec<(String, String)> {
    [
        ("APP_NAME", "app"),
        ("CDK_DEPLOY_REGION", "us-east-1"),
        ("ENVIRONMENT", "development"),
        ("OWNER", "platform-team"),
        ("VPC_ID", "vpc-0a1b2c3d"),
        ("VPC_SUBNET_TYPE", "PRIVATE_ISOLATED"),
        ("VPC_PRIVATE_SUBNET_IDS", "subnet-0aaa,subnet-0bbb"),
        ("VPC_PRIVATE_SUBNET_AZS", "us-east-1a,us-east-1b"),
        ("VPC_PRIVATE_SUBNET_ROUTE_TABLE_IDS", "rtb-0aaa,rtb-0bbb"),
        ("OPENSEARCH_USER_NAME", USER_NAME),
        ("OPENSEARCH_USER_PASSWORD", PASSWORD),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

/// Same variables with `key` removed
pub fn vars_without(keys: &[&str]) -> Vec<(String, String)> {
    vars()
        .into_iter()
        .filter(|(k, _)| !keys.contains(&k.as_str()))
        .collect()
}

/// Same variables with `key` replaced
pub fn vars_with(key: &str, value: &str) -> Vec<(String, String)> {
    vars()
        .into_iter()
        .map(|(k, v)| if k == key { (k, value.to_string()) } else { (k, v) })
        .collect()
}

/// Bundle constructed directly, without going through the validator
pub fn bundle(subnets: usize) -> StackConfig {
    let letters = ['a', 'b', 'c', 'd', 'e', 'f'];
    StackConfig {
        resource_prefix: PREFIX.to_string(),
        deploy_region: "us-east-1".to_string(),
        account: None,
        deploy_environment: "development".to_string(),
        short_deploy_environment: "dev".to_string(),
        app_name: "app".to_string(),
        owner: "platform-team".to_string(),
        vpc_id: "vpc-0a1b2c3d".to_string(),
        vpc_subnet_type: "PRIVATE_ISOLATED".to_string(),
        vpc_private_subnet_ids: (0..subnets)
            .map(|i| format!("subnet-0{}", letters[i % letters.len()]))
            .collect(),
        vpc_private_subnet_azs: (0..subnets)
            .map(|i| format!("us-east-1{}", letters[i % letters.len()]))
            .collect(),
        vpc_private_subnet_route_table_ids: (0..subnets)
            .map(|i| format!("rtb-0{}", letters[i % letters.len()]))
            .collect(),
        opensearch_user_name: USER_NAME.to_string(),
        opensearch_user_password: PASSWORD.to_string(),
        domain: DomainSettings::default(),
    }
}
