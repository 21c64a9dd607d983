//! In-memory event store for tests and offline runs.
//!
//! Holds fixture data keyed exactly like the provider layout and counts
//! event fetches so memoization behavior is observable from tests.

use crate::error::Result;
use crate::models::{Competition, Event, Match, Player};
use crate::store::EventStore;
use async_trait::async_trait;
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Default)]
pub struct InMemoryEventStore {
    competitions: Vec<Competition>,
    matches: FxHashMap<(u64, u64), Vec<Match>>,
    events: FxHashMap<u64, Vec<Event>>,
    lineups: FxHashMap<(u64, String), Vec<Player>>,
    event_fetches: AtomicUsize,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_competition(&mut self, competition: Competition) {
        self.competitions.push(competition);
    }

    pub fn insert_matches(&mut self, competition_id: u64, season_id: u64, matches: Vec<Match>) {
        self.matches.insert((competition_id, season_id), matches);
    }

    pub fn insert_events(&mut self, match_id: u64, events: Vec<Event>) {
        self.events.insert(match_id, events);
    }

    pub fn insert_lineup(&mut self, match_id: u64, team_name: &str, players: Vec<Player>) {
        self.lineups
            .insert((match_id, team_name.to_string()), players);
    }

    /// Number of `events` calls served so far.
    pub fn event_fetch_count(&self) -> usize {
        self.event_fetches.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn competitions(&self) -> Result<Vec<Competition>> {
        Ok(self.competitions.clone())
    }

    async fn matches(&self, competition_id: u64, season_id: u64) -> Result<Vec<Match>> {
        Ok(self
            .matches
            .get(&(competition_id, season_id))
            .cloned()
            .unwrap_or_default())
    }

    async fn events(&self, match_id: u64) -> Result<Vec<Event>> {
        self.event_fetches.fetch_add(1, Ordering::Relaxed);
        Ok(self.events.get(&match_id).cloned().unwrap_or_default())
    }

    async fn lineup(&self, match_id: u64, team_name: &str) -> Result<Vec<Player>> {
        Ok(self
            .lineups
            .get(&(match_id, team_name.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    fn store_name(&self) -> &str {
        "in-memory"
    }
}
