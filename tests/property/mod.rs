// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests Module
//!
//! Properties that must hold for every configuration bundle, checked with
//! proptest.

mod stack_properties;
