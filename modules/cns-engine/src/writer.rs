//! Idempotently materialises both sides of a connection for each matchmaker
//! candidate (spec §4.6).

use std::collections::HashMap;

use cns_store::{key, Cache, StoreClient};
use uuid::Uuid;

use crate::matchmaker::Candidate;

/// Write every candidate's connection, skipping any already fully
/// materialised on both sides.
pub async fn write_connections(
    client: &StoreClient,
    cache: &Cache,
    candidates: &[Candidate],
) -> anyhow::Result<()> {
    for candidate in candidates {
        write_connection(client, cache, candidate).await?;
    }
    Ok(())
}

async fn write_connection(
    client: &StoreClient,
    cache: &Cache,
    c: &Candidate,
) -> anyhow::Result<()> {
    let provider_links = cache.filter(&format!(
        "{}/provider/{}/connections/*/consumer",
        c.provider, c.profile
    ));
    let consumer_links = cache.filter(&format!(
        "{}/consumer/{}/connections/*/provider",
        c.consumer, c.profile
    ));

    let mut id = None;
    let add_provider = match existing_id(&provider_links, &c.consumer) {
        Some(found) => {
            id = Some(found);
            false
        }
        None => true,
    };
    let add_consumer = match existing_id(&consumer_links, &c.provider) {
        Some(found) => {
            id = Some(found); // may override step above; both point at the same connection
            false
        }
        None => true,
    };

    if !add_provider && !add_consumer {
        return Ok(()); // both sides already materialised
    }

    let defaults = merged_defaults(cache, c);
    let id = id.unwrap_or_else(new_connection_id);

    if add_provider {
        let base = format!("{}/provider/{}/connections/{id}", c.provider, c.profile);
        client.put(&format!("{base}/consumer"), &c.consumer).await?;
        for (name, value) in &defaults {
            client
                .put(&format!("{base}/properties/{name}"), value)
                .await?;
        }
        tracing::info!(provider = %c.provider, consumer = %c.consumer, id = %id, "wrote provider-side connection");
    }

    if add_consumer {
        let base = format!("{}/consumer/{}/connections/{id}", c.consumer, c.profile);
        client.put(&format!("{base}/provider"), &c.provider).await?;
        for (name, value) in &defaults {
            client
                .put(&format!("{base}/properties/{name}"), value)
                .await?;
        }
        tracing::info!(provider = %c.provider, consumer = %c.consumer, id = %id, "wrote consumer-side connection");
    }

    Ok(())
}

/// Search a `connections/*/{opposite}` map for an entry pointing at `target`,
/// returning the connection id segment if found.
fn existing_id(links: &HashMap<&str, &str>, target: &str) -> Option<String> {
    links.iter().find_map(|(k, v)| {
        if *v == target {
            let parts = key::split(k);
            key::segment(&parts, key::pos::NAME_OR_ID).map(str::to_string)
        } else {
            None
        }
    })
}

/// Union of provider's and consumer's capability-level default properties;
/// consumer values win on key collision (spec §3 invariant 2).
fn merged_defaults(cache: &Cache, c: &Candidate) -> HashMap<String, String> {
    let mut defaults = HashMap::new();
    for (k, v) in cache.filter(&format!(
        "{}/provider/{}/properties/*",
        c.provider, c.profile
    )) {
        if let Some(name) = property_name(k) {
            defaults.insert(name.to_string(), v.to_string());
        }
    }
    for (k, v) in cache.filter(&format!(
        "{}/consumer/{}/properties/*",
        c.consumer, c.profile
    )) {
        if let Some(name) = property_name(k) {
            defaults.insert(name.to_string(), v.to_string());
        }
    }
    defaults
}

fn property_name(key: &str) -> Option<&str> {
    let parts = key::split(key);
    key::segment(&parts, key::pos::NAME_OR_ID)
}

fn new_connection_id() -> String {
    Uuid::new_v4().simple().to_string()
}
