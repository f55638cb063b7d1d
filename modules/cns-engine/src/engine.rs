//! The reconciler's single-owner dispatch loop (spec §5/§9): one task owns
//! the cache and the store connection outright, so there is never more than
//! one build in flight and no fine-grained locking anywhere in this crate.

use futures::StreamExt;
use tokio::signal;

use cns_store::{key, Cache, KvEvent, StoreClient};

use crate::classifier::classify;
use crate::debounce::Debounce;
use crate::intent::Intent;
use crate::matchmaker::build_candidates;
use crate::propagate;
use crate::writer::write_connections;

/// Owns the cache and drives watch events to their handlers until the
/// process is asked to shut down.
pub struct Engine {
    client: StoreClient,
    cache: Cache,
    debounce: Debounce,
}

impl Engine {
    /// Connect, load the cache, and return a ready-to-run engine.
    pub async fn connect(
        host: &str,
        port: u16,
        username: &str,
        password: &str,
    ) -> anyhow::Result<Self> {
        let client = StoreClient::connect(host, port, username, password).await?;
        let cache = Cache::load(&client).await?;
        Ok(Self {
            client,
            cache,
            debounce: Debounce::new(),
        })
    }

    /// Watch the `cns` prefix and dispatch events until Ctrl-C or the watch
    /// stream ends.
    ///
    /// Every fallible step is caught and logged rather than propagated: one
    /// bad event must never take the whole reconciler down (spec §7). Takes
    /// `self` by value so the shutdown path can cancel the armed debounce
    /// timer, drop the watch stream, and close the store client in order
    /// (spec §5's cancellation contract), rather than leaving `close()`
    /// unreachable.
    pub async fn run(mut self) -> anyhow::Result<()> {
        let mut events = Box::pin(self.client.watch(key::ROOT_SEGMENT).await?);

        let result: anyhow::Result<()> = loop {
            tokio::select! {
                event = events.next() => {
                    match event {
                        Some(event) => self.dispatch(event).await,
                        None => {
                            tracing::warn!("watch stream ended");
                            break Ok(());
                        }
                    }
                }
                _ = self.debounce.fire() => {
                    self.debounce.cancel();
                    if let Err(e) = self.build().await {
                        tracing::error!(error = %e, "build failed");
                    }
                }
                _ = signal::ctrl_c() => {
                    tracing::info!("shutdown requested");
                    break Ok(());
                }
            }
        };

        self.debounce.cancel();
        drop(events);
        self.client.close().await;
        result
    }

    async fn dispatch(&mut self, event: KvEvent) {
        match classify(&mut self.cache, &event) {
            Intent::Rebuild => self.debounce.rebuild(),
            Intent::Propagate { key, value } => {
                if let Err(e) = propagate::propagate(&self.client, &self.cache, &key, &value).await
                {
                    tracing::error!(error = %e, key = %key, "propagate failed");
                }
            }
            Intent::Update { key, value } => {
                if let Err(e) = propagate::update(&self.client, &self.cache, &key, &value).await {
                    tracing::error!(error = %e, key = %key, "update failed");
                }
            }
            Intent::Ignore => {}
        }
    }

    /// Run the matchmaker over the current cache and materialise whatever it
    /// finds. Idempotent: candidates already fully wired are skipped.
    async fn build(&self) -> anyhow::Result<()> {
        let candidates = build_candidates(&self.cache);
        tracing::info!(candidates = candidates.len(), "rebuild");
        write_connections(&self.client, &self.cache, &candidates).await
    }
}
