//! HTTP event store over an open-data JSON layout.
//!
//! Endpoint layout:
//! - `{base}/competitions.json`
//! - `{base}/matches/{competition_id}/{season_id}.json`
//! - `{base}/events/{match_id}.json`
//! - `{base}/lineups/{match_id}.json`
//!
//! Parsing is defensive: a malformed individual record is skipped and
//! counted, never fatal. Only transport failures and top-level shape
//! violations become errors.

use crate::error::{Result, StoreError};
use crate::models::{
    Competition, DuelOutcome, Event, EventData, Location, Match, PassOutcome, Player, ShotOutcome,
};
use crate::store::EventStore;
use async_trait::async_trait;
use chrono::NaiveDate;
use log::debug;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// Default open-data root.
pub const DEFAULT_BASE_URL: &str =
    "https://raw.githubusercontent.com/statsbomb/open-data/master/data";
/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Event store backed by the provider's static JSON files.
pub struct HttpEventStore {
    client: Client,
    base_url: String,
}

impl HttpEventStore {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self::with_config(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_config(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { client, base_url }
    }

    async fn fetch_json(&self, url: &str) -> Result<Value> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| StoreError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::UnexpectedStatus {
                url: url.to_string(),
                status,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|source| StoreError::ResponseBody {
                url: url.to_string(),
                source,
            })
    }

    async fn fetch_array(&self, url: &str) -> Result<Vec<Value>> {
        match self.fetch_json(url).await? {
            Value::Array(items) => Ok(items),
            other => Err(StoreError::MalformedPayload {
                url: url.to_string(),
                context: format!("expected a JSON array, got {}", json_type(&other)),
            }),
        }
    }
}

impl Default for HttpEventStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventStore for HttpEventStore {
    async fn competitions(&self) -> Result<Vec<Competition>> {
        let url = format!("{}/competitions.json", self.base_url);
        let items = self.fetch_array(&url).await?;
        let mut competitions = Vec::with_capacity(items.len());
        let mut skipped = 0usize;
        for item in &items {
            match parse_competition(item) {
                Some(competition) => competitions.push(competition),
                None => skipped += 1,
            }
        }
        if skipped > 0 {
            debug!("skipped {} malformed competition records from {}", skipped, url);
        }
        debug!("fetched {} competitions", competitions.len());
        Ok(competitions)
    }

    async fn matches(&self, competition_id: u64, season_id: u64) -> Result<Vec<Match>> {
        let url = format!(
            "{}/matches/{}/{}.json",
            self.base_url, competition_id, season_id
        );
        let items = self.fetch_array(&url).await?;
        let mut matches = Vec::with_capacity(items.len());
        let mut skipped = 0usize;
        for item in &items {
            match parse_match(item) {
                Some(m) => matches.push(m),
                None => skipped += 1,
            }
        }
        if skipped > 0 {
            debug!("skipped {} malformed match records from {}", skipped, url);
        }
        debug!(
            "fetched {} matches for competition {} season {}",
            matches.len(),
            competition_id,
            season_id
        );
        Ok(matches)
    }

    async fn events(&self, match_id: u64) -> Result<Vec<Event>> {
        let url = format!("{}/events/{}.json", self.base_url, match_id);
        let items = self.fetch_array(&url).await?;
        let mut events = Vec::with_capacity(items.len());
        let mut skipped = 0usize;
        for item in &items {
            match parse_event(item) {
                Some(event) => events.push(event),
                None => skipped += 1,
            }
        }
        if skipped > 0 {
            debug!("skipped {} malformed event records from {}", skipped, url);
        }
        debug!("fetched {} events for match {}", events.len(), match_id);
        Ok(events)
    }

    async fn lineup(&self, match_id: u64, team_name: &str) -> Result<Vec<Player>> {
        let url = format!("{}/lineups/{}.json", self.base_url, match_id);
        let items = self.fetch_array(&url).await?;

        for item in &items {
            if item["team_name"].as_str() != Some(team_name) {
                continue;
            }
            let players = item["lineup"]
                .as_array()
                .map(|entries| entries.iter().filter_map(parse_lineup_player).collect())
                .unwrap_or_default();
            return Ok(players);
        }

        // No lineup recorded for this team is a valid empty result.
        debug!("no lineup for {} in match {}", team_name, match_id);
        Ok(Vec::new())
    }

    fn store_name(&self) -> &str {
        "open-data"
    }
}

// ============================================================================
// Record parsing
// ============================================================================

fn parse_competition(item: &Value) -> Option<Competition> {
    Some(Competition {
        competition_id: item["competition_id"].as_u64()?,
        season_id: item["season_id"].as_u64()?,
        competition_name: item["competition_name"].as_str()?.to_string(),
        season_name: item["season_name"].as_str()?.to_string(),
    })
}

fn parse_match(item: &Value) -> Option<Match> {
    Some(Match {
        match_id: item["match_id"].as_u64()?,
        home_team: item["home_team"]["home_team_name"].as_str()?.to_string(),
        away_team: item["away_team"]["away_team_name"].as_str()?.to_string(),
        // Null scores stay None: the fixture has not been played yet.
        home_score: item["home_score"].as_u64().map(|score| score as u32),
        away_score: item["away_score"].as_u64().map(|score| score as u32),
        match_date: item["match_date"]
            .as_str()
            .and_then(|raw| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()),
    })
}

fn parse_event(item: &Value) -> Option<Event> {
    let type_name = item["type"]["name"].as_str()?;
    let team = item["team"]["name"].as_str()?;
    let minute = item["minute"].as_u64()? as u32;

    let data = match type_name {
        "Pass" => {
            let pass = &item["pass"];
            // The provider records an outcome only when the pass failed.
            let outcome = if pass["outcome"]["name"].as_str().is_none() {
                PassOutcome::Complete
            } else {
                PassOutcome::Incomplete
            };
            EventData::Pass {
                outcome,
                end_location: parse_location(&pass["end_location"]),
                cross: pass["cross"].as_bool().unwrap_or(false),
            }
        }
        "Shot" => EventData::Shot {
            outcome: item["shot"]["outcome"]["name"]
                .as_str()
                .and_then(parse_shot_outcome),
            xg: item["shot"]["statsbomb_xg"].as_f64(),
        },
        "Carry" => EventData::Carry {
            end_location: parse_location(&item["carry"]["end_location"]),
        },
        "Duel" => EventData::Duel {
            outcome: item["duel"]["outcome"]["name"]
                .as_str()
                .and_then(parse_duel_outcome),
        },
        "Interception" => EventData::Interception,
        "Ball Recovery" => EventData::BallRecovery,
        "Miscontrol" => EventData::Miscontrol,
        "Assist" => EventData::Assist,
        other => EventData::Other {
            name: other.to_string(),
        },
    };

    Some(Event {
        team: team.to_string(),
        player: item["player"]["name"].as_str().map(str::to_string),
        minute,
        // Possession is always attributed upstream; fall back to the acting
        // team on the rare record that omits it.
        possession_team: item["possession_team"]["name"]
            .as_str()
            .unwrap_or(team)
            .to_string(),
        duration: item["duration"].as_f64(),
        location: parse_location(&item["location"]),
        data,
    })
}

fn parse_lineup_player(item: &Value) -> Option<Player> {
    Some(Player {
        player_id: item["player_id"].as_u64()?,
        player_name: item["player_name"].as_str()?.to_string(),
        jersey_number: item["jersey_number"].as_u64().map(|number| number as u32),
    })
}

/// A coordinate is a two-element numeric array; anything else is treated as
/// an absent field.
fn parse_location(value: &Value) -> Option<Location> {
    let coords = value.as_array()?;
    if coords.len() < 2 {
        return None;
    }
    Some(Location::new(coords[0].as_f64()?, coords[1].as_f64()?))
}

fn parse_shot_outcome(name: &str) -> Option<ShotOutcome> {
    Some(match name {
        "Goal" => ShotOutcome::Goal,
        "Saved" | "Saved To Post" => ShotOutcome::Saved,
        "Blocked" => ShotOutcome::Blocked,
        "Off T" | "Saved Off T" | "Saved Off Target" => ShotOutcome::OffTarget,
        "Post" => ShotOutcome::Post,
        "Wayward" => ShotOutcome::Wayward,
        _ => return None,
    })
}

fn parse_duel_outcome(name: &str) -> Option<DuelOutcome> {
    if name.starts_with("Won") || name.starts_with("Success") {
        Some(DuelOutcome::Won)
    } else if name.starts_with("Lost") {
        Some(DuelOutcome::Lost)
    } else {
        None
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a bool",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventKind;
    use serde_json::json;

    #[test]
    fn test_parse_competition_record() {
        let item = json!({
            "competition_id": 43,
            "season_id": 106,
            "competition_name": "FIFA World Cup",
            "season_name": "2022",
            "country_name": "International"
        });
        let competition = parse_competition(&item).unwrap();
        assert_eq!(competition.competition_id, 43);
        assert_eq!(competition.season_id, 106);
        assert_eq!(competition.to_string(), "FIFA World Cup 2022");

        assert!(parse_competition(&json!({"competition_id": 43})).is_none());
    }

    #[test]
    fn test_parse_match_with_and_without_scores() {
        let played = json!({
            "match_id": 3857256,
            "match_date": "2022-12-18",
            "home_team": {"home_team_name": "Argentina"},
            "away_team": {"away_team_name": "France"},
            "home_score": 3,
            "away_score": 3
        });
        let m = parse_match(&played).unwrap();
        assert_eq!(m.home_score, Some(3));
        assert!(m.is_played());
        assert_eq!(
            m.match_date,
            NaiveDate::from_ymd_opt(2022, 12, 18)
        );

        let scheduled = json!({
            "match_id": 99,
            "home_team": {"home_team_name": "A"},
            "away_team": {"away_team_name": "B"},
            "home_score": null,
            "away_score": null
        });
        let m = parse_match(&scheduled).unwrap();
        assert!(!m.is_played());
        assert_eq!(m.match_date, None);
    }

    #[test]
    fn test_parse_pass_event_outcome_resolution() {
        // No recorded outcome means the pass arrived.
        let complete = json!({
            "type": {"name": "Pass"},
            "team": {"name": "Argentina"},
            "player": {"name": "Lionel Messi"},
            "minute": 23,
            "possession_team": {"name": "Argentina"},
            "duration": 1.2,
            "location": [60.2, 40.1],
            "pass": {"end_location": [80.0, 42.0], "cross": true}
        });
        let event = parse_event(&complete).unwrap();
        assert_eq!(event.kind(), EventKind::Pass);
        assert_eq!(event.player.as_deref(), Some("Lionel Messi"));
        assert_eq!(event.end_location(), Some(Location::new(80.0, 42.0)));
        match event.data {
            EventData::Pass { outcome, cross, .. } => {
                assert_eq!(outcome, PassOutcome::Complete);
                assert!(cross);
            }
            other => panic!("expected a pass, got {:?}", other),
        }

        let incomplete = json!({
            "type": {"name": "Pass"},
            "team": {"name": "France"},
            "minute": 55,
            "possession_team": {"name": "France"},
            "pass": {"outcome": {"name": "Incomplete"}}
        });
        let event = parse_event(&incomplete).unwrap();
        match event.data {
            EventData::Pass { outcome, .. } => assert_eq!(outcome, PassOutcome::Incomplete),
            other => panic!("expected a pass, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_shot_and_duel_outcomes() {
        let shot = json!({
            "type": {"name": "Shot"},
            "team": {"name": "Argentina"},
            "minute": 108,
            "possession_team": {"name": "Argentina"},
            "location": [112.0, 39.0],
            "shot": {"outcome": {"name": "Goal"}, "statsbomb_xg": 0.35}
        });
        let event = parse_event(&shot).unwrap();
        assert_eq!(event.xg(), Some(0.35));
        match event.data {
            EventData::Shot { outcome, .. } => assert_eq!(outcome, Some(ShotOutcome::Goal)),
            other => panic!("expected a shot, got {:?}", other),
        }

        assert_eq!(parse_shot_outcome("Off T"), Some(ShotOutcome::OffTarget));
        assert_eq!(parse_shot_outcome("Saved To Post"), Some(ShotOutcome::Saved));
        assert_eq!(parse_shot_outcome("Penalty Conceded"), None);

        assert_eq!(parse_duel_outcome("Won"), Some(DuelOutcome::Won));
        assert_eq!(parse_duel_outcome("Success In Play"), Some(DuelOutcome::Won));
        assert_eq!(parse_duel_outcome("Lost Out"), Some(DuelOutcome::Lost));
        assert_eq!(parse_duel_outcome("Aerial"), None);
    }

    #[test]
    fn test_parse_event_unknown_type_and_missing_fields() {
        let pressure = json!({
            "type": {"name": "Pressure"},
            "team": {"name": "France"},
            "minute": 30,
            "possession_team": {"name": "Argentina"},
            "location": [45.0, 20.0]
        });
        let event = parse_event(&pressure).unwrap();
        assert_eq!(event.kind(), EventKind::Other);
        assert_eq!(event.end_location(), None);

        // A record without its type or team is skipped entirely.
        assert!(parse_event(&json!({"minute": 3})).is_none());

        // A malformed location skips the field, not the event.
        let one_coord = json!({
            "type": {"name": "Miscontrol"},
            "team": {"name": "France"},
            "minute": 61,
            "possession_team": {"name": "France"},
            "location": [12.0]
        });
        let event = parse_event(&one_coord).unwrap();
        assert_eq!(event.location, None);
        assert_eq!(event.kind(), EventKind::Miscontrol);
    }

    #[test]
    fn test_parse_lineup_player() {
        let item = json!({
            "player_id": 5503,
            "player_name": "Lionel Messi",
            "jersey_number": 10
        });
        let player = parse_lineup_player(&item).unwrap();
        assert_eq!(player.player_id, 5503);
        assert_eq!(player.jersey_number, Some(10));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let store = HttpEventStore::with_base_url("https://example.test/data///");
        assert_eq!(store.base_url, "https://example.test/data");
    }
}
