//! Maps a raw store mutation to a logical [`Intent`], per spec §4.3.
//!
//! The cache is refreshed *before* dispatch, so every downstream handler sees
//! the latest value for the event's key (spec §5's ordering guarantee).

use cns_store::{key::pos, Cache, KvEvent, KvOp};

use crate::intent::Intent;

/// Refresh the cache for `event`, then classify it into an [`Intent`].
///
/// Delete events only update the cache and are logged — spec §4.3 leaves
/// reactive deletion of stale connections as an open problem (see
/// DESIGN.md), so a delete never arms a rebuild or a propagation on its own.
pub fn classify(cache: &mut Cache, event: &KvEvent) -> Intent {
    match event.op {
        KvOp::Put => {
            cache.put(event.key.clone(), event.value.clone());
            classify_put(&event.key, &event.value)
        }
        KvOp::Delete => {
            cache.delete(&event.key);
            tracing::debug!(key = %event.key, "delete observed (no reactive deletion)");
            Intent::Ignore
        }
    }
}

fn classify_put(key: &str, value: &str) -> Intent {
    let parts = cns_store::key::split(key);

    if cns_store::key::segment(&parts, pos::ROOT) != Some(cns_store::key::ROOT_SEGMENT) {
        return Intent::Ignore;
    }
    if cns_store::key::segment(&parts, pos::NETWORK).is_none() {
        return Intent::Ignore;
    }

    match cns_store::key::segment(&parts, pos::CATEGORY) {
        Some("orchestrator") => Intent::Rebuild,
        Some("profiles") => Intent::Rebuild,
        Some("nodes") => classify_node_key(&parts, key, value),
        _ => Intent::Ignore,
    }
}

fn classify_node_key(parts: &[&str], key: &str, value: &str) -> Intent {
    let role_is_capability_role = matches!(
        cns_store::key::segment(parts, pos::ROLE),
        Some("provider") | Some("consumer")
    );
    if !role_is_capability_role {
        return Intent::Ignore;
    }

    match cns_store::key::segment(parts, pos::CAPABILITY_SUB) {
        Some("version") | Some("scope") => Intent::Rebuild,
        Some("properties") => Intent::Propagate {
            key: key.to_string(),
            value: value.to_string(),
        },
        Some("connections") => {
            if cns_store::key::segment(parts, pos::CONNECTION_SUB) == Some("properties") {
                Intent::Update {
                    key: key.to_string(),
                    value: value.to_string(),
                }
            } else {
                Intent::Ignore
            }
        }
        _ => Intent::Ignore,
    }
}
