// Copyright (c) 2025 - Cowboy AI, Inc.
//! Stack Domain Models
//!
//! Value objects with validation invariants that describe where and how the
//! search domain is deployed.
//!
//! # Value Objects with Invariants
//!
//! - [`SubnetType`] - Fixed subnet classification (PUBLIC, PRIVATE, ...)
//! - [`VpcId`], [`SubnetId`], [`RouteTableId`] - Prefixed provider identifiers
//! - [`NetworkPlacement`] - VPC plus positional subnet triples
//! - [`MasterCredentials`] - Fine-grained access control master user
//! - [`TagSet`] - Tags applied to every declared resource

pub mod credentials;
pub mod network;
pub mod subnet_type;
pub mod tags;

pub use credentials::{MasterCredentials, MasterPassword};
pub use network::{NetworkPlacement, RouteTableId, SubnetAttributes, SubnetId, VpcId};
pub use subnet_type::{parse_subnet_type, SubnetType};
pub use tags::{Tag, TagSet};
