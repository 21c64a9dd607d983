//! Configuration constants and environment loading for the report service
//!
//! This module manages all runtime configuration:
//! - Event store endpoint and HTTP timeout
//! - Competition edition selection
//! - Focus teams for the radar comparison
//! - Metric pair for the league-wide correlation

use pitch_core::store::http::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use pitch_core::Metric;
use std::env;
use std::time::Duration;
use tracing::warn;

/// Default competition id (the men's World Cup in the open-data layout)
pub const DEFAULT_COMPETITION_ID: u64 = 43;

/// Default season id (the 2022 edition)
pub const DEFAULT_SEASON_ID: u64 = 106;

/// Default x-axis metric for the correlation page
pub const DEFAULT_CORRELATION_X: Metric = Metric::PossessionPct;

/// Default y-axis metric for the correlation page
pub const DEFAULT_CORRELATION_Y: Metric = Metric::Goals;

#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub base_url: String,
    pub http_timeout: Duration,
    pub competition_id: u64,
    pub season_id: u64,
    /// Radar pair; when unset the top two of the table are compared.
    pub focus_teams: Option<(String, String)>,
    pub correlation_x: Metric,
    pub correlation_y: Metric,
}

impl ReportConfig {
    /// Load configuration from environment variables with sensible defaults
    pub fn from_env() -> Self {
        Self {
            base_url: env::var("DATA_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            http_timeout: Duration::from_secs(
                env::var("HTTP_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
            competition_id: env::var("COMPETITION_ID")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_COMPETITION_ID),
            season_id: env::var("SEASON_ID")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SEASON_ID),
            focus_teams: env::var("FOCUS_TEAMS")
                .ok()
                .and_then(|raw| parse_team_pair(&raw)),
            correlation_x: metric_var("CORRELATION_X", DEFAULT_CORRELATION_X),
            correlation_y: metric_var("CORRELATION_Y", DEFAULT_CORRELATION_Y),
        }
    }
}

/// Parse a metric name from the environment, falling back on unknown input.
fn metric_var(name: &str, default: Metric) -> Metric {
    match env::var(name) {
        Ok(raw) => Metric::parse(&raw).unwrap_or_else(|| {
            warn!("{} value '{}' is not a known metric, using {}", name, raw, default);
            default
        }),
        Err(_) => default,
    }
}

/// Split a "Team A,Team B" pair. Both sides must be non-empty.
fn parse_team_pair(raw: &str) -> Option<(String, String)> {
    let (a, b) = raw.split_once(',')?;
    let a = a.trim();
    let b = b.trim();
    (!a.is_empty() && !b.is_empty()).then(|| (a.to_string(), b.to_string()))
}
