//! The event store boundary.
//!
//! This module provides:
//! - The `EventStore` trait: the fixed query interface over the upstream
//!   match-event provider
//! - `HttpEventStore`: reqwest client over an open-data JSON layout
//! - `InMemoryEventStore`: fixture store for tests and offline runs
//! - `SessionCache`: per-session memoization of fetch results

pub mod cache;
pub mod http;
pub mod memory;

pub use cache::SessionCache;
pub use http::HttpEventStore;
pub use memory::InMemoryEventStore;

use crate::error::Result;
use crate::models::{Competition, Event, Match, Player};
use async_trait::async_trait;

/// Read-only query interface over the upstream provider.
///
/// Every call returns a possibly-empty ordered sequence; empty is a valid
/// result, not an error (a team with no recorded lineup, a season with no
/// fixtures). Implementations surface provider failures as `StoreError`;
/// recovering those into empty results is the session's job, never the
/// store's.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// All competition editions the provider exposes.
    async fn competitions(&self) -> Result<Vec<Competition>>;

    /// Fixtures of one competition edition.
    async fn matches(&self, competition_id: u64, season_id: u64) -> Result<Vec<Match>>;

    /// The full event sequence of one match, in provider order.
    async fn events(&self, match_id: u64) -> Result<Vec<Event>>;

    /// Lineup of one team in one match.
    async fn lineup(&self, match_id: u64, team_name: &str) -> Result<Vec<Player>>;

    /// Human-readable store name for logs.
    fn store_name(&self) -> &str;
}
