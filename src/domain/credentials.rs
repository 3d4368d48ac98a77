// Copyright (c) 2025 - Cowboy AI, Inc.
//! Master user credentials for fine-grained access control

use serde::{Serialize, Serializer};
use std::fmt;

use crate::errors::{StackError, StackResult};

/// Master user password
///
/// A value shaped like a CloudFormation dynamic reference (`{{resolve:...}}`)
/// is passed through untouched and resolved by the provisioning engine at
/// apply time. Anything else is embedded in the template as plain text.
#[derive(Clone, PartialEq, Eq)]
pub enum MasterPassword {
    Plaintext(String),
    DynamicReference(String),
}

impl MasterPassword {
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.starts_with("{{resolve:") && value.ends_with("}}") {
            Self::DynamicReference(value)
        } else {
            Self::Plaintext(value)
        }
    }

    /// Value to place in the template
    pub fn expose(&self) -> &str {
        match self {
            Self::Plaintext(v) | Self::DynamicReference(v) => v,
        }
    }

    pub fn is_plaintext(&self) -> bool {
        matches!(self, Self::Plaintext(_))
    }

    pub fn is_empty(&self) -> bool {
        self.expose().is_empty()
    }
}

impl fmt::Debug for MasterPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plaintext(_) => write!(f, "Plaintext(<redacted>)"),
            Self::DynamicReference(v) => write!(f, "DynamicReference({})", v),
        }
    }
}

impl Serialize for MasterPassword {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.expose())
    }
}

/// Master user of the search domain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MasterCredentials {
    pub user_name: String,
    pub password: MasterPassword,
}

impl MasterCredentials {
    /// Create credentials
    ///
    /// # Invariants
    /// - Both user name and password are non-empty
    pub fn new(user_name: impl Into<String>, password: impl Into<String>) -> StackResult<Self> {
        let user_name = user_name.into();
        let password = MasterPassword::new(password);

        if user_name.trim().is_empty() || password.is_empty() {
            return Err(StackError::InvalidDomainSettings(
                "fine-grained access control requires a master user name and password".to_string(),
            ));
        }

        Ok(Self {
            user_name,
            password,
        })
    }
}
