// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Configuration and Stack Declaration

use aws_opensearch_stack::config::REQUIRED_KEYS;
use aws_opensearch_stack::domain::parse_subnet_type;
use aws_opensearch_stack::{build_stack, render_pretty, StackConfig, StackError, SubnetType};
use proptest::prelude::*;
use proptest::sample::subsequence;

use crate::fixtures;

// ============================================================================
// Strategies
// ============================================================================

/// Non-empty set of required keys to drop, in declaration order
fn missing_keys() -> impl Strategy<Value = Vec<&'static str>> {
    subsequence(REQUIRED_KEYS.to_vec(), 1..=REQUIRED_KEYS.len())
}

/// Subnet list lengths that do not all agree
fn unequal_lengths() -> impl Strategy<Value = (usize, usize, usize)> {
    (1usize..6, 1usize..6, 1usize..6).prop_filter("lengths must differ", |(a, b, c)| {
        a != b || a != c
    })
}

fn numbered(prefix: &str, n: usize) -> Vec<String> {
    (0..n).map(|i| format!("{}{}", prefix, i)).collect()
}

proptest! {
    /// Every absent key is reported, not just the first
    #[test]
    fn prop_all_missing_keys_reported(dropped in missing_keys(), blank in any::<bool>()) {
        let vars: Vec<(String, String)> = if blank {
            fixtures::vars()
                .into_iter()
                .map(|(k, v)| if dropped.contains(&k.as_str()) { (k, "   ".to_string()) } else { (k, v) })
                .collect()
        } else {
            fixtures::vars_without(&dropped)
        };

        match StackConfig::from_vars(vars) {
            Err(StackError::MissingConfiguration { keys }) => {
                let expected: Vec<String> = dropped.iter().map(|k| k.to_string()).collect();
                prop_assert_eq!(keys, expected);
            }
            other => prop_assert!(false, "unexpected result: {:?}", other),
        }
    }

    /// Tokens outside the accepted set are always rejected
    #[test]
    fn prop_subnet_parser_is_total(token in "\\PC{0,24}") {
        let accepted = SubnetType::ALL.iter().find(|t| t.as_str() == token);
        match (parse_subnet_type(&token), accepted) {
            (Ok(parsed), Some(expected)) => prop_assert_eq!(parsed, *expected),
            (Err(StackError::InvalidSubnetType { value, accepted }), None) => {
                prop_assert_eq!(value, token.clone());
                prop_assert_eq!(accepted.len(), 4);
            }
            (result, expected) => {
                prop_assert!(false, "token {:?}: got {:?}, expected {:?}", token, result, expected)
            }
        }
    }

    /// Misaligned subnet lists always fail the same way
    #[test]
    fn prop_unequal_subnet_lists_fail((ids, azs, rtbs) in unequal_lengths()) {
        let mut config = fixtures::bundle(1);
        config.vpc_private_subnet_ids = numbered("subnet-", ids);
        config.vpc_private_subnet_azs = numbered("us-east-1-az", azs);
        config.vpc_private_subnet_route_table_ids = numbered("rtb-", rtbs);

        let first = build_stack(&config).unwrap_err();
        let second = build_stack(&config).unwrap_err();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(
            first,
            StackError::SubnetListMismatch {
                subnet_ids: ids,
                availability_zones: azs,
                route_table_ids: rtbs,
            }
        );
    }

    /// Identical bundles render byte-identical templates
    #[test]
    fn prop_declaration_is_deterministic(
        subnets in 1usize..=3,
        subnet_type in prop::sample::select(SubnetType::ALL.to_vec()),
        prefix in "[a-z]{1,8}-[a-z]{3}",
    ) {
        let mut config = fixtures::bundle(subnets);
        config.vpc_subnet_type = subnet_type.as_str().to_string();
        config.resource_prefix = prefix.clone();

        let first = render_pretty(&build_stack(&config).unwrap()).unwrap();
        let second = render_pretty(&build_stack(&config.clone()).unwrap()).unwrap();
        prop_assert_eq!(first, second);

        let declaration = build_stack(&config).unwrap();
        prop_assert_eq!(declaration.outputs.len(), 4);
        let output_prefix = format!("{}-", prefix);
        prop_assert!(declaration.outputs.iter().all(|o| o.name.starts_with(&output_prefix)));
    }

    /// The domain never takes more subnets than zones it spreads across
    #[test]
    fn prop_subnets_match_zone_layout(subnets in 1usize..=6) {
        let config = fixtures::bundle(subnets);
        match build_stack(&config) {
            Ok(declaration) => {
                prop_assert!(subnets <= 3);
                let domain = declaration.search_domains()[0];
                prop_assert_eq!(domain.vpc_options.subnet_ids.len(), subnets);
                let zones = domain
                    .cluster_config
                    .zone_awareness_config
                    .as_ref()
                    .map(|z| usize::from(z.availability_zone_count))
                    .unwrap_or(1);
                prop_assert_eq!(zones, subnets);
            }
            Err(StackError::InvalidDomainSettings(_)) => prop_assert!(subnets > 3),
            Err(other) => prop_assert!(false, "unexpected error: {:?}", other),
        }
    }
}
