//! Directional property propagation (spec §4.7): `update` pushes a
//! connection-level write to the opposite endpoint's matching connection;
//! `propagate` pushes a capability-level default write to every connection of
//! that capability.

use cns_common::{opposite_role, Dir, Mode, Role};
use cns_store::{key, key::pos, Cache, StoreClient};

/// `.../connections/{id}/properties/{p}` was written at `key`. Push it to the
/// opposite endpoint's matching connection-level property, if the write came
/// from the owning side and the network's mode is recognised.
pub async fn update(client: &StoreClient, cache: &Cache, key: &str, value: &str) -> anyhow::Result<()> {
    let Some(target) = resolve_update_target(cache, key) else {
        return Ok(());
    };
    client.put(&target, value).await?;
    tracing::info!(source = %key, target = %target, "propagated connection-level property");
    Ok(())
}

/// `.../{role}/{profile}/properties/{p}` was written at `key` (a capability's
/// default). Push it to every connection of that capability.
pub async fn propagate(
    client: &StoreClient,
    cache: &Cache,
    key: &str,
    value: &str,
) -> anyhow::Result<()> {
    for target in resolve_propagate_targets(cache, key) {
        client.put(&target, value).await?;
        tracing::info!(source = %key, target = %target, "propagated capability-level default");
    }
    Ok(())
}

/// Pure resolution of `update`'s target key, steps 1-4 of spec §4.7, plus the
/// §9 mode check. `None` means bail/no-op; no I/O happens here.
fn resolve_update_target(cache: &Cache, key: &str) -> Option<String> {
    let parts = cns_store::key::split(key);

    let network = cns_store::key::segment(&parts, pos::NETWORK)?;
    if !mode_is_recognised(cache, network) {
        return None;
    }

    let role = cns_store::key::segment(&parts, pos::ROLE).and_then(Role::parse)?;
    let profile = cns_store::key::segment(&parts, pos::PROFILE)?;
    let id = cns_store::key::segment(&parts, pos::NAME_OR_ID)?;
    let property = cns_store::key::segment(&parts, pos::CONN_PROPERTY)?;

    let endpoint = endpoint_prefix(&parts);
    let capability = format!("{endpoint}/{role}/{profile}");

    let version = cache.get(&format!("{capability}/version"))?;
    let opposite = resolve_opposite(cache, network, profile, version, property, role)?;

    let opposite_prefix = cache.get(&format!("{capability}/connections/{id}/{opposite}"))?;

    Some(format!(
        "{opposite_prefix}/{opposite}/{profile}/connections/{id}/properties/{property}"
    ))
}

/// Pure resolution of `propagate`'s target keys, spec §4.7, plus the §9 mode
/// check. Empty means bail/no-op; no I/O happens here.
fn resolve_propagate_targets(cache: &Cache, key: &str) -> Vec<String> {
    let parts = cns_store::key::split(key);

    let Some(network) = cns_store::key::segment(&parts, pos::NETWORK) else {
        return Vec::new();
    };
    if !mode_is_recognised(cache, network) {
        return Vec::new();
    }

    let Some(role) = cns_store::key::segment(&parts, pos::ROLE).and_then(Role::parse) else {
        return Vec::new();
    };
    let Some(profile) = cns_store::key::segment(&parts, pos::PROFILE) else {
        return Vec::new();
    };
    let Some(property) = cns_store::key::segment(&parts, pos::NAME_OR_ID) else {
        return Vec::new();
    };

    let endpoint = endpoint_prefix(&parts);
    let capability = format!("{endpoint}/{role}/{profile}");

    let Some(version) = cache.get(&format!("{capability}/version")) else {
        return Vec::new();
    };
    let Some(opposite) = resolve_opposite(cache, network, profile, version, property, role) else {
        return Vec::new();
    };

    let pattern = format!("{capability}/connections/*/{opposite}");
    cache
        .filter(&pattern)
        .into_keys()
        .filter_map(|k| {
            let conn_parts = cns_store::key::split(k);
            let id = cns_store::key::segment(&conn_parts, pos::NAME_OR_ID)?;
            Some(format!("{capability}/connections/{id}/properties/{property}"))
        })
        .collect()
}

fn endpoint_prefix(parts: &[&str]) -> String {
    key::join(&parts[..=pos::CONTEXT])
}

fn mode_is_recognised(cache: &Cache, network: &str) -> bool {
    cache
        .get(&format!("cns/{network}/orchestrator"))
        .and_then(Mode::parse)
        .is_some()
}

/// Look up the profile's per-property `provider` flag and resolve whose
/// write this is. `None` if the profile doesn't declare the property, or the
/// write did not originate from the owning side.
fn resolve_opposite(
    cache: &Cache,
    network: &str,
    profile: &str,
    version: &str,
    property: &str,
    role: Role,
) -> Option<Role> {
    let flag_key =
        format!("cns/{network}/profiles/{profile}/versions/version{version}/properties/{property}/provider");
    let flag = cache.get(&flag_key)?;
    let dir = Dir::from_provider_flag(flag);
    opposite_role(role, dir)
}
