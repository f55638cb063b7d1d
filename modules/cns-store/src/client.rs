//! Thin wrapper around `etcd-client` providing the contract spec §4.1/§6
//! needs: connect, prefix-get, single-key get/put, prefix-watch, close.

use std::collections::HashMap;

use anyhow::Context as _;
use cns_common::EngineError;
use etcd_client::{Client, ConnectOptions, EventType, GetOptions, WatchOptions};
use futures::{Stream, StreamExt};

/// One mutation observed on the watched prefix.
#[derive(Debug, Clone)]
pub struct KvEvent {
    pub op: KvOp,
    pub key: String,
    pub value: String,
    /// etcd's mod revision; `version == 1` marks key creation, per spec §6
    /// (kept for parity with the historical variant — the primary dispatch
    /// in `cns-engine` does not depend on it).
    pub version: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KvOp {
    Put,
    Delete,
}

/// Connect, get/put/watch/close over an etcd-compatible store.
pub struct StoreClient {
    client: Client,
}

impl StoreClient {
    pub async fn connect(
        host: &str,
        port: u16,
        username: &str,
        password: &str,
    ) -> anyhow::Result<Self> {
        let endpoint = format!("http://{host}:{port}");
        let options = if username.is_empty() {
            None
        } else {
            Some(ConnectOptions::new().with_user(username, password))
        };
        let client = Client::connect([endpoint], options)
            .await
            .context("connecting to store")?;
        Ok(Self { client })
    }

    /// Prefix-get: returns a mapping from key to string value.
    pub async fn all(&self, prefix: &str) -> Result<HashMap<String, String>, EngineError> {
        let mut kv = self.client.kv_client();
        let resp = kv
            .get(prefix, Some(GetOptions::new().with_prefix()))
            .await
            .map_err(|e| EngineError::FailedToGetAll {
                prefix: prefix.to_string(),
                source: e.into(),
            })?;

        let mut out = HashMap::with_capacity(resp.kvs().len());
        for kv in resp.kvs() {
            let key = kv.key_str().unwrap_or_default().to_string();
            let value = kv.value_str().unwrap_or_default().to_string();
            out.insert(key, value);
        }
        Ok(out)
    }

    /// Single-key get, `None` if absent.
    pub async fn get(&self, key: &str) -> Result<Option<String>, EngineError> {
        let mut kv = self.client.kv_client();
        let resp = kv
            .get(key, None)
            .await
            .map_err(|e| EngineError::FailedToGet {
                key: key.to_string(),
                source: e.into(),
            })?;

        Ok(resp
            .kvs()
            .first()
            .and_then(|kv| kv.value_str().ok())
            .map(|s| s.to_string()))
    }

    /// Single-key put.
    pub async fn put(&self, key: &str, value: &str) -> Result<(), EngineError> {
        let mut kv = self.client.kv_client();
        kv.put(key, value, None)
            .await
            .map_err(|e| EngineError::FailedToPut {
                key: key.to_string(),
                source: e.into(),
            })?;
        Ok(())
    }

    /// Prefix-watch: a stream of put/delete events under `prefix`.
    pub async fn watch(
        &self,
        prefix: &str,
    ) -> Result<impl Stream<Item = KvEvent>, EngineError> {
        let mut watch_client = self.client.watch_client();
        let (_watcher, stream) = watch_client
            .watch(prefix, Some(WatchOptions::new().with_prefix()))
            .await
            .map_err(|e| EngineError::FailedToWatch {
                prefix: prefix.to_string(),
                source: e.into(),
            })?;

        Ok(stream.flat_map(|resp| {
            let events = match resp {
                Ok(resp) => resp
                    .events()
                    .iter()
                    .filter_map(|ev| {
                        let kv = ev.kv()?;
                        let key = kv.key_str().ok()?.to_string();
                        let value = kv.value_str().unwrap_or_default().to_string();
                        let op = match ev.event_type() {
                            EventType::Put => KvOp::Put,
                            EventType::Delete => KvOp::Delete,
                        };
                        Some(KvEvent {
                            op,
                            key,
                            value,
                            version: kv.version(),
                        })
                    })
                    .collect::<Vec<_>>(),
                Err(e) => {
                    tracing::error!(error = %e, "watch stream error");
                    Vec::new()
                }
            };
            futures::stream::iter(events)
        }))
    }

    /// Close the underlying connection. In-flight puts issued before this
    /// call are allowed to finish; nothing here cancels them.
    pub async fn close(self) {
        drop(self.client);
    }
}
