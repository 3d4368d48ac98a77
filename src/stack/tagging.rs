// Copyright (c) 2025 - Cowboy AI, Inc.
//! Tagging pass over a declared stack

use tracing::debug;

use super::StackDeclaration;
use crate::domain::TagSet;

/// Merge `tags` into every taggable resource of the declaration
///
/// Keys already present on a resource are overwritten. Returns the number of
/// resources that were tagged.
pub fn apply_tags(declaration: &mut StackDeclaration, tags: &TagSet) -> usize {
    let mut tagged = 0;
    for declared in declaration.resources.iter_mut() {
        if let Some(resource_tags) = declared.resource.tags_mut() {
            resource_tags.merge(tags);
            tagged += 1;
        }
    }
    declaration.tags.merge(tags);
    debug!(tagged, tags = tags.len(), "Applied stack tags");
    tagged
}
