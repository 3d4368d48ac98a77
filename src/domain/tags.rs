// Copyright (c) 2025 - Cowboy AI, Inc.
//! Resource tag set applied to every taggable resource of the stack

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single `Key`/`Value` tag as CloudFormation expects it
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Tag {
    pub key: String,
    pub value: String,
}

/// Ordered set of tags; keys are unique
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagSet(BTreeMap<String, String>);

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Standard stack tags: environment, project and owner
    pub fn standard(environment: &str, project: &str, owner: &str) -> Self {
        Self::new()
            .with("Environment", environment)
            .with("Project", project)
            .with("Owner", owner)
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Merge `other` into this set; `other` wins on key conflicts
    pub fn merge(&mut self, other: &TagSet) {
        for (k, v) in &other.0 {
            self.0.insert(k.clone(), v.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Tags as a sorted `Key`/`Value` list
    pub fn to_list(&self) -> Vec<Tag> {
        self.0
            .iter()
            .map(|(k, v)| Tag {
                key: k.clone(),
                value: v.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_tags() {
        let tags = TagSet::standard("development", "app", "platform-team");
        assert_eq!(tags.get("Environment"), Some("development"));
        assert_eq!(tags.get("Project"), Some("app"));
        assert_eq!(tags.get("Owner"), Some("platform-team"));
    }

    #[test]
    fn test_merge_overwrites_existing_keys() {
        let mut tags = TagSet::new().with("Owner", "someone").with("Extra", "1");
        tags.merge(&TagSet::standard("staging", "app", "team"));
        assert_eq!(tags.get("Owner"), Some("team"));
        assert_eq!(tags.get("Extra"), Some("1"));
        assert_eq!(tags.len(), 4);
    }

    #[test]
    fn test_list_is_sorted_by_key() {
        let list = TagSet::standard("production", "app", "team").to_list();
        let keys: Vec<_> = list.iter().map(|t| t.key.as_str()).collect();
        assert_eq!(keys, vec!["Environment", "Owner", "Project"]);
    }
}
