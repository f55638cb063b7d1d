pub mod cache;
pub mod client;
pub mod key;

pub use cache::Cache;
pub use client::{KvEvent, KvOp, StoreClient};
