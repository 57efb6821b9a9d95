//! Personal record tracker for NPB (Nippon Professional Baseball) games.
//!
//! Scrapes npb.jp schedule and box-score pages through [`NpbClient`], keeps
//! game records and per-player career counters in CSV files via
//! [`store::Stores`], and aggregates them with [`summary::summarize`].

pub use client::NpbClient;
pub use error::{NpbError, Result};
pub use teams::Team;

mod client;
mod error;
pub mod model;
pub(crate) mod scrape;
pub mod store;
pub mod summary;
pub mod teams;
