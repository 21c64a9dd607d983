//! Match-event aggregation core for football analytics.
//!
//! This crate provides:
//! - A typed event-store abstraction with HTTP and in-memory backends
//! - A session facade that memoizes fetches and recovers provider outages
//! - League standings built from final scores
//! - Per-entity statistics with per-90 rates and possession shares
//! - Spatial point and movement-vector sampling for pitch rendering
//! - Radar normalization and league-wide metric correlation
//!
//! Aggregation itself never fails: missing data narrows results instead of
//! erroring, and degenerate statistical inputs are flagged on the result.

pub mod compare;
pub mod error;
pub mod models;
pub mod session;
pub mod spatial;
pub mod standings;
pub mod stats;
pub mod store;
pub mod utils;

pub use compare::{Correlation, MetricSeries, RadarAxis, RadarComparison, TeamMetricPoint};
pub use error::{Result, StoreError};
pub use models::{
    Competition, DuelOutcome, Event, EventData, EventKind, Location, Match, Metric, PassOutcome,
    Player, ShotOutcome, StandingsRow, StatBundle, Target,
};
pub use session::AnalyticsSession;
pub use spatial::{EventFilter, MovementVector, Period};
pub use store::{EventStore, HttpEventStore, InMemoryEventStore, SessionCache};
