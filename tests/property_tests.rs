// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests Entry Point
//!
//! This test suite uses proptest to verify properties of configuration
//! validation, subnet type parsing and stack declaration that must hold for
//! all inputs.

mod fixtures;
mod property;
