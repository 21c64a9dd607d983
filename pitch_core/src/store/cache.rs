//! Per-session memoization of store results.
//!
//! Keys follow the accessor contract: competitions (unit key), matches by
//! (competition_id, season_id), events by match id, lineups by (match id,
//! team). Values are `Arc`'d so repeated reads share one allocation. Only
//! successful fetches are inserted; a failed fetch is retried on the next
//! call instead of pinning the session to an error.

use crate::models::{Competition, Event, Match, Player};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use std::sync::Arc;

#[derive(Default)]
pub struct SessionCache {
    competitions: Mutex<Option<Arc<Vec<Competition>>>>,
    matches: Mutex<FxHashMap<(u64, u64), Arc<Vec<Match>>>>,
    events: Mutex<FxHashMap<u64, Arc<Vec<Event>>>>,
    lineups: Mutex<FxHashMap<(u64, String), Arc<Vec<Player>>>>,
}

impl SessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn competitions(&self) -> Option<Arc<Vec<Competition>>> {
        self.competitions.lock().clone()
    }

    pub fn store_competitions(&self, competitions: Vec<Competition>) -> Arc<Vec<Competition>> {
        let shared = Arc::new(competitions);
        *self.competitions.lock() = Some(Arc::clone(&shared));
        shared
    }

    pub fn matches(&self, competition_id: u64, season_id: u64) -> Option<Arc<Vec<Match>>> {
        self.matches
            .lock()
            .get(&(competition_id, season_id))
            .cloned()
    }

    pub fn store_matches(
        &self,
        competition_id: u64,
        season_id: u64,
        matches: Vec<Match>,
    ) -> Arc<Vec<Match>> {
        let shared = Arc::new(matches);
        self.matches
            .lock()
            .insert((competition_id, season_id), Arc::clone(&shared));
        shared
    }

    pub fn events(&self, match_id: u64) -> Option<Arc<Vec<Event>>> {
        self.events.lock().get(&match_id).cloned()
    }

    pub fn store_events(&self, match_id: u64, events: Vec<Event>) -> Arc<Vec<Event>> {
        let shared = Arc::new(events);
        self.events.lock().insert(match_id, Arc::clone(&shared));
        shared
    }

    pub fn lineup(&self, match_id: u64, team_name: &str) -> Option<Arc<Vec<Player>>> {
        self.lineups
            .lock()
            .get(&(match_id, team_name.to_string()))
            .cloned()
    }

    pub fn store_lineup(
        &self,
        match_id: u64,
        team_name: &str,
        players: Vec<Player>,
    ) -> Arc<Vec<Player>> {
        let shared = Arc::new(players);
        self.lineups
            .lock()
            .insert((match_id, team_name.to_string()), Arc::clone(&shared));
        shared
    }

    /// Number of distinct match event sets currently held.
    pub fn cached_event_sets(&self) -> usize {
        self.events.lock().len()
    }

    /// Drop everything. Invalidation is explicit and whole-session.
    pub fn clear(&self) {
        *self.competitions.lock() = None;
        self.matches.lock().clear();
        self.events.lock().clear();
        self.lineups.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_roundtrip_shares_allocation() {
        let cache = SessionCache::new();
        assert!(cache.events(7).is_none());

        let stored = cache.store_events(7, Vec::new());
        let fetched = cache.events(7).unwrap();
        assert!(
            Arc::ptr_eq(&stored, &fetched),
            "reads must share the stored allocation"
        );
        assert_eq!(cache.cached_event_sets(), 1);
    }

    #[test]
    fn test_keys_are_scoped() {
        let cache = SessionCache::new();
        cache.store_matches(1, 2, Vec::new());
        assert!(cache.matches(1, 2).is_some());
        assert!(cache.matches(2, 1).is_none(), "key order matters");

        cache.store_lineup(5, "A", Vec::new());
        assert!(cache.lineup(5, "A").is_some());
        assert!(cache.lineup(5, "B").is_none());
    }

    #[test]
    fn test_clear_empties_every_family() {
        let cache = SessionCache::new();
        cache.store_competitions(Vec::new());
        cache.store_matches(1, 2, Vec::new());
        cache.store_events(3, Vec::new());
        cache.store_lineup(3, "A", Vec::new());

        cache.clear();
        assert!(cache.competitions().is_none());
        assert!(cache.matches(1, 2).is_none());
        assert!(cache.events(3).is_none());
        assert!(cache.lineup(3, "A").is_none());
        assert_eq!(cache.cached_event_sets(), 0);
    }
}
