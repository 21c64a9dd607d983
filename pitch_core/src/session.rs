//! Analytics session: fetch, memoize, recover, aggregate.
//!
//! The session owns the store handle and the per-session cache. Provider
//! failures are recovered here as empty results with a warning, so callers
//! only ever see data or emptiness, never a fault. Event fetches are
//! memoized per match id for the lifetime of the session, bounding external
//! calls to one per distinct played match.

use crate::compare::{self, MetricSeries, RadarComparison, TeamSeason, TeamSummary};
use crate::models::{
    Competition, Event, Location, Match, Metric, Player, StandingsRow, StatBundle, Target,
};
use crate::spatial::{self, EventFilter, MovementVector};
use crate::standings;
use crate::stats;
use crate::store::{EventStore, SessionCache};
use crate::utils::names::{self, NameMatch};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub struct AnalyticsSession {
    store: Arc<dyn EventStore>,
    cache: SessionCache,
    session_id: Uuid,
}

impl AnalyticsSession {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        let session_id = Uuid::new_v4();
        info!(
            "analytics session {} opened against {} store",
            session_id,
            store.store_name()
        );
        Self {
            store,
            cache: SessionCache::new(),
            session_id,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Drop every memoized result; the next calls re-fetch.
    pub fn invalidate(&self) {
        self.cache.clear();
    }

    // ========================================================================
    // Fetch + memoize + recover
    // ========================================================================

    pub async fn competitions(&self) -> Arc<Vec<Competition>> {
        if let Some(cached) = self.cache.competitions() {
            return cached;
        }
        match self.store.competitions().await {
            Ok(competitions) => self.cache.store_competitions(competitions),
            Err(err) => {
                warn!("session {}: competitions unavailable: {}", self.session_id, err);
                Arc::new(Vec::new())
            }
        }
    }

    pub async fn matches(&self, competition_id: u64, season_id: u64) -> Arc<Vec<Match>> {
        if let Some(cached) = self.cache.matches(competition_id, season_id) {
            return cached;
        }
        match self.store.matches(competition_id, season_id).await {
            Ok(matches) => self.cache.store_matches(competition_id, season_id, matches),
            Err(err) => {
                warn!(
                    "session {}: matches for {}/{} unavailable: {}",
                    self.session_id, competition_id, season_id, err
                );
                Arc::new(Vec::new())
            }
        }
    }

    /// One match's events, memoized per match id.
    pub async fn events(&self, match_id: u64) -> Arc<Vec<Event>> {
        if let Some(cached) = self.cache.events(match_id) {
            debug!("session {}: events cache hit for match {}", self.session_id, match_id);
            return cached;
        }
        match self.store.events(match_id).await {
            Ok(events) => self.cache.store_events(match_id, events),
            Err(err) => {
                warn!(
                    "session {}: events for match {} unavailable: {}",
                    self.session_id, match_id, err
                );
                Arc::new(Vec::new())
            }
        }
    }

    pub async fn lineup(&self, match_id: u64, team_name: &str) -> Arc<Vec<Player>> {
        if let Some(cached) = self.cache.lineup(match_id, team_name) {
            return cached;
        }
        match self.store.lineup(match_id, team_name).await {
            Ok(players) => self.cache.store_lineup(match_id, team_name, players),
            Err(err) => {
                warn!(
                    "session {}: lineup for match {} team {} unavailable: {}",
                    self.session_id, match_id, team_name, err
                );
                Arc::new(Vec::new())
            }
        }
    }

    // ========================================================================
    // Browsing surface
    // ========================================================================

    /// Distinct team names of a competition, in first-appearance order.
    pub async fn teams(&self, competition_id: u64, season_id: u64) -> Vec<String> {
        let matches = self.matches(competition_id, season_id).await;
        let mut teams: Vec<String> = Vec::new();
        for m in matches.iter() {
            for name in [&m.home_team, &m.away_team] {
                if !teams.iter().any(|t| t == name) {
                    teams.push(name.clone());
                }
            }
        }
        teams
    }

    /// Fixtures involving one team.
    pub async fn team_matches(
        &self,
        competition_id: u64,
        season_id: u64,
        team: &str,
    ) -> Vec<Match> {
        self.matches(competition_id, season_id)
            .await
            .iter()
            .filter(|m| m.involves(team))
            .cloned()
            .collect()
    }

    /// Representative squad: the lineup of the team's first match in
    /// provider order. Transfers and rotation are not tracked.
    pub async fn roster(&self, competition_id: u64, season_id: u64, team: &str) -> Vec<Player> {
        let matches = self.team_matches(competition_id, season_id, team).await;
        let Some(first) = matches.first() else {
            return Vec::new();
        };
        self.lineup(first.match_id, team).await.as_ref().clone()
    }

    /// Map a user-supplied team name onto the provider spelling.
    pub async fn resolve_team(
        &self,
        competition_id: u64,
        season_id: u64,
        raw_name: &str,
    ) -> Option<String> {
        let teams = self.teams(competition_id, season_id).await;
        match names::resolve(raw_name, teams.iter().map(String::as_str)) {
            Some(NameMatch::Fuzzy { name, score }) => {
                info!(
                    "session {}: resolved team '{}' to '{}' (similarity {:.2})",
                    self.session_id, raw_name, name, score
                );
                Some(name)
            }
            Some(matched) => Some(matched.into_name()),
            None => {
                warn!("session {}: no team matching '{}'", self.session_id, raw_name);
                None
            }
        }
    }

    /// One match's events narrowed by an optional entity and a filter.
    pub async fn events_filtered(
        &self,
        match_id: u64,
        target: Option<&Target>,
        filter: &EventFilter,
    ) -> Vec<Event> {
        let events = self.events(match_id).await;
        spatial::filter_events(&events, target, filter)
    }

    // ========================================================================
    // Aggregations
    // ========================================================================

    /// Ranked table for one competition edition.
    pub async fn standings(&self, competition_id: u64, season_id: u64) -> Vec<StandingsRow> {
        let matches = self.matches(competition_id, season_id).await;
        let table = standings::standings(&matches);
        debug!(
            "session {}: standings over {} matches -> {} rows",
            self.session_id,
            matches.len(),
            table.len()
        );
        table
    }

    /// Aggregate statistics for one entity over the given fixtures.
    pub async fn stat_bundle(&self, target: &Target, matches: &[Match]) -> StatBundle {
        let event_sets = self.events_for(matches).await;
        stats::entity_stats(target, event_sets.iter().map(|events| events.as_slice()))
    }

    /// Team statistics over the team's whole season.
    pub async fn team_stats(
        &self,
        competition_id: u64,
        season_id: u64,
        team: &str,
    ) -> StatBundle {
        let matches = self.team_matches(competition_id, season_id, team).await;
        self.stat_bundle(&Target::team(team), &matches).await
    }

    /// Player statistics over the player's team's season.
    pub async fn player_stats(
        &self,
        competition_id: u64,
        season_id: u64,
        team: &str,
        player: &str,
    ) -> StatBundle {
        let matches = self.team_matches(competition_id, season_id, team).await;
        self.stat_bundle(&Target::player(player), &matches).await
    }

    /// Action locations for heatmap rendering.
    pub async fn point_sample(
        &self,
        target: &Target,
        matches: &[Match],
        filter: &EventFilter,
    ) -> Vec<Location> {
        let event_sets = self.events_for(matches).await;
        spatial::point_sample(
            target,
            event_sets.iter().map(|events| events.as_slice()),
            filter,
        )
    }

    /// Start/end movement pairs for flow rendering.
    pub async fn vector_sample(
        &self,
        target: &Target,
        matches: &[Match],
        filter: &EventFilter,
    ) -> Vec<MovementVector> {
        let event_sets = self.events_for(matches).await;
        spatial::vector_sample(
            target,
            event_sets.iter().map(|events| events.as_slice()),
            filter,
        )
    }

    /// Radar comparison of two teams over their seasons.
    pub async fn radar_comparison(
        &self,
        competition_id: u64,
        season_id: u64,
        team_a: &str,
        team_b: &str,
        metrics: &[Metric],
    ) -> RadarComparison {
        let summary_a = self.team_summary(competition_id, season_id, team_a).await;
        let summary_b = self.team_summary(competition_id, season_id, team_b).await;
        let comparison = compare::radar_comparison(&summary_a, &summary_b, metrics);
        if comparison.has_degenerate_axes() {
            warn!(
                "session {}: radar {} vs {} has degenerate axes",
                self.session_id, team_a, team_b
            );
        }
        comparison
    }

    /// Per-team (x, y) metric pairs across the whole competition.
    ///
    /// Every played match is fetched at most once (the fetch phase warms
    /// the cache sequentially); the per-team reduction then runs in
    /// parallel over the shared event sets.
    pub async fn metric_series(
        &self,
        competition_id: u64,
        season_id: u64,
        x: Metric,
        y: Metric,
    ) -> MetricSeries {
        let matches = self.matches(competition_id, season_id).await;
        for m in matches.iter().filter(|m| m.is_played()) {
            self.events(m.match_id).await;
        }

        let teams = self.teams(competition_id, season_id).await;
        let mut seasons = Vec::with_capacity(teams.len());
        for team in teams {
            let team_matches: Vec<Match> = matches
                .iter()
                .filter(|m| m.involves(&team))
                .cloned()
                .collect();
            let match_events = self.events_for(&team_matches).await;
            seasons.push(TeamSeason {
                team,
                matches: team_matches,
                match_events,
            });
        }

        let series = compare::metric_series(x, y, &seasons);
        info!(
            "session {}: metric series {} vs {} over {} teams",
            self.session_id,
            x,
            y,
            series.teams.len()
        );
        series
    }

    async fn team_summary(
        &self,
        competition_id: u64,
        season_id: u64,
        team: &str,
    ) -> TeamSummary {
        let matches = self.team_matches(competition_id, season_id, team).await;
        let match_events = self.events_for(&matches).await;
        TeamSeason {
            team: team.to_string(),
            matches,
            match_events,
        }
        .summary()
    }

    /// Event sets for the played fixtures among `matches`, through the
    /// memoization cache. Unplayed fixtures have no events and are skipped.
    async fn events_for(&self, matches: &[Match]) -> Vec<Arc<Vec<Event>>> {
        let mut event_sets = Vec::with_capacity(matches.len());
        for m in matches.iter().filter(|m| m.is_played()) {
            event_sets.push(self.events(m.match_id).await);
        }
        event_sets
    }
}
