//! Enumerates provider/consumer candidate pairs under the active scope mode
//! (spec §4.5). Pure and synchronous: reads the cache, produces a list of
//! candidates for the connection writer to materialise.

use cns_common::Mode;
use cns_store::{key, Cache};

/// A provider/consumer pair sharing a profile and version, found by the
/// matchmaker. Endpoint prefixes are absolute:
/// `cns/{network}/nodes/{node}/contexts/{ctx}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub provider: String,
    pub consumer: String,
    pub profile: String,
    pub version: String,
}

/// Walk the cache and produce every candidate pair per spec §4.5.
pub fn build_candidates(cache: &Cache) -> Vec<Candidate> {
    let mut candidates = Vec::new();
    let networks = network_names(cache);

    for network in &networks {
        let mode = match cache
            .get(&format!("cns/{network}/orchestrator"))
            .and_then(Mode::parse)
        {
            Some(mode) => mode,
            None => continue, // unrecognised or absent mode: skip this network
        };

        for node in node_names(cache, network) {
            for ctx in context_names(cache, network, &node) {
                let provider_endpoint = format!("cns/{network}/nodes/{node}/contexts/{ctx}");
                for (profile, version) in
                    capability_versions(cache, network, &node, &ctx, "provider")
                {
                    emit_consumers(
                        cache,
                        &networks,
                        mode,
                        network,
                        &provider_endpoint,
                        &ctx,
                        &profile,
                        &version,
                        &mut candidates,
                    );
                }
            }
        }
    }

    candidates
}

#[allow(clippy::too_many_arguments)]
fn emit_consumers(
    cache: &Cache,
    all_networks: &[String],
    mode: Mode,
    home_network: &str,
    provider_endpoint: &str,
    scope: &str,
    profile: &str,
    version: &str,
    out: &mut Vec<Candidate>,
) {
    match mode {
        Mode::AllSystems => {
            for network in all_networks {
                match_within_network(
                    cache,
                    network,
                    provider_endpoint,
                    scope,
                    profile,
                    version,
                    out,
                );
            }
        }
        Mode::BySystem => {
            match_within_network(
                cache,
                home_network,
                provider_endpoint,
                scope,
                profile,
                version,
                out,
            );
        }
    }
}

/// Find every consumer of `profile`/`version` in `network` whose context name
/// equals `scope` (the provider's context name), per the `bysystem` rule.
#[allow(clippy::too_many_arguments)]
fn match_within_network(
    cache: &Cache,
    network: &str,
    provider_endpoint: &str,
    scope: &str,
    profile: &str,
    version: &str,
    out: &mut Vec<Candidate>,
) {
    for node in node_names(cache, network) {
        let consumer_version_key =
            format!("cns/{network}/nodes/{node}/contexts/{scope}/consumer/{profile}/version");
        if cache.get(&consumer_version_key) == Some(version) {
            out.push(Candidate {
                provider: provider_endpoint.to_string(),
                consumer: format!("cns/{network}/nodes/{node}/contexts/{scope}"),
                profile: profile.to_string(),
                version: version.to_string(),
            });
        }
    }
}

fn network_names(cache: &Cache) -> Vec<String> {
    names_at(cache, "cns/*/name", key::pos::NETWORK)
}

fn node_names(cache: &Cache, network: &str) -> Vec<String> {
    names_at(
        cache,
        &format!("cns/{network}/nodes/*/name"),
        key::pos::NODE,
    )
}

fn context_names(cache: &Cache, network: &str, node: &str) -> Vec<String> {
    names_at(
        cache,
        &format!("cns/{network}/nodes/{node}/contexts/*/name"),
        key::pos::CONTEXT,
    )
}

fn names_at(cache: &Cache, pattern: &str, position: usize) -> Vec<String> {
    let mut names: Vec<String> = cache
        .filter(pattern)
        .keys()
        .filter_map(|k| {
            let parts = key::split(k);
            key::segment(&parts, position).map(str::to_string)
        })
        .collect();
    names.sort();
    names.dedup();
    names
}

/// `(profile, version)` pairs for every `{role}/{profile}/version` capability
/// under a context.
fn capability_versions(
    cache: &Cache,
    network: &str,
    node: &str,
    ctx: &str,
    role: &str,
) -> Vec<(String, String)> {
    let pattern = format!("cns/{network}/nodes/{node}/contexts/{ctx}/{role}/*/version");
    cache
        .filter(&pattern)
        .into_iter()
        .filter_map(|(k, v)| {
            let parts = key::split(k);
            key::segment(&parts, key::pos::PROFILE).map(|profile| (profile.to_string(), v.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed(entries: &[(&str, &str)]) -> Cache {
        let mut cache = Cache::new();
        for (k, v) in entries {
            cache.put(k.to_string(), v.to_string());
        }
        cache
    }

    #[test]
    fn new_pair_in_bysystem_matches() {
        // S1 from spec §8
        let cache = seed(&[
            ("cns/N/name", "Net"),
            ("cns/N/orchestrator", "bysystem"),
            ("cns/N/nodes/A/name", "A"),
            ("cns/N/nodes/A/contexts/X/name", "X"),
            ("cns/N/nodes/A/contexts/X/provider/p1/version", "1"),
            ("cns/N/nodes/B/name", "B"),
            ("cns/N/nodes/B/contexts/X/name", "X"),
            ("cns/N/nodes/B/contexts/X/consumer/p1/version", "1"),
        ]);
        let candidates = build_candidates(&cache);
        assert_eq!(
            candidates,
            vec![Candidate {
                provider: "cns/N/nodes/A/contexts/X".to_string(),
                consumer: "cns/N/nodes/B/contexts/X".to_string(),
                profile: "p1".to_string(),
                version: "1".to_string(),
            }]
        );
    }

    #[test]
    fn context_mismatch_produces_no_candidates() {
        // S2 from spec §8
        let cache = seed(&[
            ("cns/N/name", "Net"),
            ("cns/N/orchestrator", "bysystem"),
            ("cns/N/nodes/A/name", "A"),
            ("cns/N/nodes/A/contexts/X/name", "X"),
            ("cns/N/nodes/A/contexts/X/provider/p1/version", "1"),
            ("cns/N/nodes/B/name", "B"),
            ("cns/N/nodes/B/contexts/Y/name", "Y"),
            ("cns/N/nodes/B/contexts/Y/consumer/p1/version", "1"),
        ]);
        assert!(build_candidates(&cache).is_empty());
    }

    #[test]
    fn allsystems_matches_across_networks() {
        // S3 from spec §8
        let cache = seed(&[
            ("cns/N/name", "Net"),
            ("cns/N/orchestrator", "allsystems"),
            ("cns/N/nodes/A/name", "A"),
            ("cns/N/nodes/A/contexts/X/name", "X"),
            ("cns/N/nodes/A/contexts/X/provider/p1/version", "1"),
            ("cns/M/name", "Other"),
            ("cns/M/orchestrator", "bysystem"),
            ("cns/M/nodes/B/name", "B"),
            ("cns/M/nodes/B/contexts/X/name", "X"),
            ("cns/M/nodes/B/contexts/X/consumer/p1/version", "1"),
        ]);
        let candidates = build_candidates(&cache);
        assert_eq!(
            candidates,
            vec![Candidate {
                provider: "cns/N/nodes/A/contexts/X".to_string(),
                consumer: "cns/M/nodes/B/contexts/X".to_string(),
                profile: "p1".to_string(),
                version: "1".to_string(),
            }]
        );
    }

    #[test]
    fn unrecognised_mode_skips_the_network() {
        let cache = seed(&[
            ("cns/N/name", "Net"),
            ("cns/N/orchestrator", "nodes"), // legacy alias, not accepted
            ("cns/N/nodes/A/name", "A"),
            ("cns/N/nodes/A/contexts/X/name", "X"),
            ("cns/N/nodes/A/contexts/X/provider/p1/version", "1"),
            ("cns/N/nodes/B/name", "B"),
            ("cns/N/nodes/B/contexts/X/name", "X"),
            ("cns/N/nodes/B/contexts/X/consumer/p1/version", "1"),
        ]);
        assert!(build_candidates(&cache).is_empty());
    }
}
