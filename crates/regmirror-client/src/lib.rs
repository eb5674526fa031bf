//! Client for mirroring an open register.
//!
//! [`RegisterClient`] keeps a verified local copy of one register and serves
//! record, history, and metadata queries from it.
//! [`RegisterClientManager`] owns one client per register and environment,
//! building each on first use.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use regmirror_client::{ClientConfig, RegisterClientManager};
//!
//! # async fn run() -> regmirror_client::ClientResult<()> {
//! let manager = RegisterClientManager::new(ClientConfig::default());
//! let country = manager.register("country", "beta").await?;
//! let country = country.read().await;
//!
//! for record in country.current_records().iter() {
//!     println!("{}", record.key());
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod manager;

pub use client::RegisterClient;
pub use config::{register_url, ClientConfig, DEFAULT_CACHE_DURATION_SECS, DEFAULT_USER_AGENT};
pub use error::{ClientError, ClientResult};
pub use manager::{HttpTransportFactory, RegisterClientManager, SharedClient, TransportFactory};

// Re-export key types
pub use regmirror_store::{
    Collection, DataStore, Entry, InMemoryDataStore, Item, PageResult, Record, RecordCollection,
    RecordMapCollection,
};
pub use regmirror_sync::{IntegrityError, RefreshReport, RegisterProof};
pub use regmirror_types::{EntryNumber, ItemHash, Partition};
