//! Persisted form of the active tag selection
//!
//! The selection is stored as a single string with the active tags joined
//! by NUL. Registration rejects tags containing NUL, so every selection
//! made from registered tags survives the round trip.

use super::error::{NavigatorError, NavigatorResult};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Separator between tags in a persisted selection
pub const SELECTION_SEPARATOR: char = '\0';

/// Join the active tags into a persistable token
pub fn encode_selection(tags: &BTreeSet<String>) -> String {
    let mut token = String::new();
    for (i, tag) in tags.iter().enumerate() {
        if i > 0 {
            token.push(SELECTION_SEPARATOR);
        }
        token.push_str(tag);
    }
    token
}

/// Split a persisted token back into tags
pub fn decode_selection(token: &str) -> NavigatorResult<BTreeSet<String>> {
    if token.is_empty() {
        return Ok(BTreeSet::new());
    }

    let mut tags = BTreeSet::new();
    for (i, tag) in token.split(SELECTION_SEPARATOR).enumerate() {
        if tag.is_empty() {
            return Err(NavigatorError::PersistenceLoad(format!(
                "empty tag at position {i}"
            )));
        }
        if !tags.insert(tag.to_string()) {
            return Err(NavigatorError::PersistenceLoad(format!(
                "duplicate tag {tag:?}"
            )));
        }
    }
    Ok(tags)
}

/// Decode a persisted token, falling back to an empty selection
pub fn load_selection_or_default(token: Option<&str>) -> BTreeSet<String> {
    let Some(token) = token else {
        debug!("No persisted selection, starting empty");
        return BTreeSet::new();
    };

    match decode_selection(token) {
        Ok(tags) => {
            debug!(count = tags.len(), "Loaded persisted selection");
            tags
        }
        Err(e) => {
            warn!("{}. Using an empty selection.", e);
            BTreeSet::new()
        }
    }
}
