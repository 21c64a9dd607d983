//! Core data model shared by every aggregation stage.
//!
//! This module provides:
//! - Provider-shaped records: competitions, matches, events, lineup players
//! - Tagged event payloads with capability accessors (kind/location/outcome)
//! - Derived value objects: standings rows and stat bundles
//! - Entity selection (`Target`) and the comparison metric vocabulary

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Nominal pitch length in provider units (x axis).
pub const PITCH_LENGTH: f64 = 120.0;
/// Nominal pitch width in provider units (y axis).
pub const PITCH_WIDTH: f64 = 80.0;

// ============================================================================
// Competitions & Matches
// ============================================================================

/// A competition edition, addressed by (competition_id, season_id).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Competition {
    pub competition_id: u64,
    pub season_id: u64,
    /// Display name, e.g. "Premier League"
    pub competition_name: String,
    /// Season label, e.g. "2015/2016"
    pub season_name: String,
}

impl fmt::Display for Competition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.competition_name, self.season_name)
    }
}

/// A single fixture. Scores are `None` until the match has been played.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub match_id: u64,
    pub home_team: String,
    pub away_team: String,
    pub home_score: Option<u32>,
    pub away_score: Option<u32>,
    pub match_date: Option<NaiveDate>,
}

impl Match {
    /// Both scores recorded. Unplayed fixtures are excluded from standings.
    pub fn is_played(&self) -> bool {
        self.home_score.is_some() && self.away_score.is_some()
    }

    /// Whether the named team appears on either side of this fixture.
    pub fn involves(&self, team: &str) -> bool {
        self.home_team == team || self.away_team == team
    }

    /// (goals for, goals against) from the named team's perspective.
    ///
    /// `None` when the match is unplayed or the team is not in this fixture.
    pub fn score_for(&self, team: &str) -> Option<(u32, u32)> {
        let (home, away) = (self.home_score?, self.away_score?);
        if self.home_team == team {
            Some((home, away))
        } else if self.away_team == team {
            Some((away, home))
        } else {
            None
        }
    }

    /// League points (3/1/0) earned by the named team in this fixture.
    pub fn points_for(&self, team: &str) -> Option<u32> {
        let (gf, ga) = self.score_for(team)?;
        Some(match gf.cmp(&ga) {
            std::cmp::Ordering::Greater => 3,
            std::cmp::Ordering::Equal => 1,
            std::cmp::Ordering::Less => 0,
        })
    }
}

impl fmt::Display for Match {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.home_score, self.away_score) {
            (Some(h), Some(a)) => write!(f, "{} {}-{} {}", self.home_team, h, a, self.away_team)?,
            _ => write!(f, "{} vs {}", self.home_team, self.away_team)?,
        }
        if let Some(date) = self.match_date {
            write!(f, " ({})", date)?;
        }
        Ok(())
    }
}

// ============================================================================
// Events
// ============================================================================

/// A pitch coordinate in provider units (120 x 80, origin at a fixed corner).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub x: f64,
    pub y: f64,
}

impl Location {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Well-formed means finite and inside the nominal pitch bounds
    /// (with a small tolerance for provider rounding at the lines).
    pub fn is_well_formed(&self) -> bool {
        const TOL: f64 = 1.0;
        self.x.is_finite()
            && self.y.is_finite()
            && (-TOL..=PITCH_LENGTH + TOL).contains(&self.x)
            && (-TOL..=PITCH_WIDTH + TOL).contains(&self.y)
    }
}

/// Event type discriminant, used for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Pass,
    Shot,
    Carry,
    Duel,
    Interception,
    BallRecovery,
    Miscontrol,
    Assist,
    Other,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Pass => "Pass",
            EventKind::Shot => "Shot",
            EventKind::Carry => "Carry",
            EventKind::Duel => "Duel",
            EventKind::Interception => "Interception",
            EventKind::BallRecovery => "Ball Recovery",
            EventKind::Miscontrol => "Miscontrol",
            EventKind::Assist => "Assist",
            EventKind::Other => "Other",
        }
    }
}

/// Outcome of a pass. Providers encode completeness implicitly (no outcome
/// record means the pass arrived); the store resolves that at parse time so
/// the model is always explicit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassOutcome {
    Complete,
    Incomplete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShotOutcome {
    Goal,
    Saved,
    Blocked,
    OffTarget,
    Post,
    Wayward,
}

impl ShotOutcome {
    /// Goal-bound shots: the keeper had to deal with it or it went in.
    pub fn is_on_target(&self) -> bool {
        matches!(self, ShotOutcome::Goal | ShotOutcome::Saved)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuelOutcome {
    Won,
    Lost,
}

/// Type-specific event payload. Each variant carries only the fields valid
/// for that event type; anything outside the modeled vocabulary lands in
/// `Other` and still participates in possession and minute accounting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum EventData {
    Pass {
        outcome: PassOutcome,
        #[serde(default)]
        end_location: Option<Location>,
        #[serde(default)]
        cross: bool,
    },
    Shot {
        outcome: Option<ShotOutcome>,
        #[serde(default)]
        xg: Option<f64>,
    },
    Carry {
        #[serde(default)]
        end_location: Option<Location>,
    },
    Duel { outcome: Option<DuelOutcome> },
    Interception,
    BallRecovery,
    Miscontrol,
    Assist,
    Other { name: String },
}

/// One recorded on-pitch action. Immutable after fetch; the atomic unit
/// every aggregation reduces over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Team credited with the action.
    pub team: String,
    /// Acting player, when attributed.
    pub player: Option<String>,
    /// Match minute of the action.
    pub minute: u32,
    /// Team attributed possession of the current chain.
    pub possession_team: String,
    /// Action duration in seconds, when recorded.
    pub duration: Option<f64>,
    /// Where the action started, when recorded.
    pub location: Option<Location>,
    #[serde(flatten)]
    pub data: EventData,
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match &self.data {
            EventData::Pass { .. } => EventKind::Pass,
            EventData::Shot { .. } => EventKind::Shot,
            EventData::Carry { .. } => EventKind::Carry,
            EventData::Duel { .. } => EventKind::Duel,
            EventData::Interception => EventKind::Interception,
            EventData::BallRecovery => EventKind::BallRecovery,
            EventData::Miscontrol => EventKind::Miscontrol,
            EventData::Assist => EventKind::Assist,
            EventData::Other { .. } => EventKind::Other,
        }
    }

    /// Destination coordinate, for event types that have one.
    pub fn end_location(&self) -> Option<Location> {
        match &self.data {
            EventData::Pass { end_location, .. } => *end_location,
            EventData::Carry { end_location } => *end_location,
            _ => None,
        }
    }

    /// Expected-goals scalar, present on shots only.
    pub fn xg(&self) -> Option<f64> {
        match &self.data {
            EventData::Shot { xg, .. } => *xg,
            _ => None,
        }
    }
}

// ============================================================================
// Players & Lineups
// ============================================================================

/// A lineup entry. Aggregations key players by name; the provider id is
/// carried for display and disambiguation only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub player_id: u64,
    pub player_name: String,
    pub jersey_number: Option<u32>,
}

// ============================================================================
// Derived: standings & stat bundles
// ============================================================================

/// One team's row in a ranked competition table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingsRow {
    /// Position in the table, starting at 1.
    pub rank: u32,
    pub team: String,
    pub matches: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_difference: i32,
    pub points: u32,
}

impl StandingsRow {
    /// Zero-valued row for a newly discovered team.
    pub fn zero(team: impl Into<String>) -> Self {
        Self {
            rank: 0,
            team: team.into(),
            matches: 0,
            wins: 0,
            draws: 0,
            losses: 0,
            goals_for: 0,
            goals_against: 0,
            goal_difference: 0,
            points: 0,
        }
    }
}

/// Aggregate metrics for one team or player over a chosen match set.
///
/// Counts are totals; per-90 rates are derived on demand and are `None`
/// (the explicit "undefined" sentinel) when no minutes were recorded.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StatBundle {
    pub goals: u32,
    pub assists: u32,
    pub shots: u32,
    pub shots_on_target: u32,
    pub passes_completed: u32,
    pub crosses: u32,
    pub duels_won: u32,
    pub interceptions: u32,
    /// Sum of event durations attributed to the entity, in minutes.
    pub minutes_played: f64,
    /// Sum of the expected-goals scalar over the entity's shots.
    pub xg_total: f64,
    /// Mean of per-match possession percentages. Teams only; `None` for
    /// players and for teams with no possession-attributed events.
    pub possession_pct: Option<f64>,
}

impl StatBundle {
    /// Normalize a count to a 90-minute-equivalent rate.
    pub fn per90(&self, count: u32) -> Option<f64> {
        if self.minutes_played > 0.0 {
            Some(count as f64 * 90.0 / self.minutes_played)
        } else {
            None
        }
    }

    pub fn goals_per90(&self) -> Option<f64> {
        self.per90(self.goals)
    }

    pub fn passes_completed_per90(&self) -> Option<f64> {
        self.per90(self.passes_completed)
    }

    pub fn duels_won_per90(&self) -> Option<f64> {
        self.per90(self.duels_won)
    }
}

// ============================================================================
// Entity selection & metrics
// ============================================================================

/// The entity an aggregation is scoped to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    Team(String),
    Player(String),
}

impl Target {
    pub fn team(name: impl Into<String>) -> Self {
        Target::Team(name.into())
    }

    pub fn player(name: impl Into<String>) -> Self {
        Target::Player(name.into())
    }

    pub fn name(&self) -> &str {
        match self {
            Target::Team(name) | Target::Player(name) => name,
        }
    }

    /// Whether an event is attributed to this entity.
    pub fn matches_event(&self, event: &Event) -> bool {
        match self {
            Target::Team(name) => event.team == *name,
            Target::Player(name) => event.player.as_deref() == Some(name.as_str()),
        }
    }
}

/// Extractable team scalar used by the comparison engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Goals,
    Assists,
    PossessionPct,
    PassesCompleted,
    Shots,
    ShotsOnTarget,
    Crosses,
    DuelsWon,
    Interceptions,
    XgTotal,
    Points,
}

impl Metric {
    pub fn label(&self) -> &'static str {
        match self {
            Metric::Goals => "Goals",
            Metric::Assists => "Assists",
            Metric::PossessionPct => "Possession (%)",
            Metric::PassesCompleted => "Passes completed",
            Metric::Shots => "Shots",
            Metric::ShotsOnTarget => "Shots on target",
            Metric::Crosses => "Crosses",
            Metric::DuelsWon => "Duels won",
            Metric::Interceptions => "Interceptions",
            Metric::XgTotal => "xG",
            Metric::Points => "Points",
        }
    }

    /// Parse the metric names accepted in configuration.
    pub fn parse(name: &str) -> Option<Metric> {
        let normalized = name.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        Some(match normalized.as_str() {
            "goals" => Metric::Goals,
            "assists" => Metric::Assists,
            "possession" | "possession_pct" => Metric::PossessionPct,
            "passes" | "passes_completed" => Metric::PassesCompleted,
            "shots" => Metric::Shots,
            "shots_on_target" => Metric::ShotsOnTarget,
            "crosses" => Metric::Crosses,
            "duels_won" => Metric::DuelsWon,
            "interceptions" => Metric::Interceptions,
            "xg" | "xg_total" => Metric::XgTotal,
            "points" => Metric::Points,
            _ => return None,
        })
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_match(home: &str, away: &str, score: Option<(u32, u32)>) -> Match {
        Match {
            match_id: 1,
            home_team: home.to_string(),
            away_team: away.to_string(),
            home_score: score.map(|(h, _)| h),
            away_score: score.map(|(_, a)| a),
            match_date: None,
        }
    }

    #[test]
    fn test_points_for_each_perspective() {
        let m = make_match("Arsenal", "Chelsea", Some((2, 1)));
        assert_eq!(m.points_for("Arsenal"), Some(3));
        assert_eq!(m.points_for("Chelsea"), Some(0));
        assert_eq!(m.points_for("Spurs"), None, "team not in fixture");

        let draw = make_match("Arsenal", "Chelsea", Some((1, 1)));
        assert_eq!(draw.points_for("Arsenal"), Some(1));
        assert_eq!(draw.points_for("Chelsea"), Some(1));
    }

    #[test]
    fn test_unplayed_match_has_no_score() {
        let m = make_match("Arsenal", "Chelsea", None);
        assert!(!m.is_played());
        assert_eq!(m.score_for("Arsenal"), None);
        assert_eq!(m.points_for("Chelsea"), None);
    }

    #[test]
    fn test_per90_undefined_without_minutes() {
        let bundle = StatBundle {
            goals: 2,
            ..Default::default()
        };
        assert_eq!(bundle.goals_per90(), None, "no minutes recorded");

        let bundle = StatBundle {
            goals: 2,
            minutes_played: 180.0,
            ..Default::default()
        };
        let rate = bundle.goals_per90().unwrap();
        assert!(
            (rate - 1.0).abs() < 1e-9,
            "2 goals in 180 minutes is 1.0 per 90, got {}",
            rate
        );
    }

    #[test]
    fn test_event_capability_accessors() {
        let pass = Event {
            team: "Arsenal".to_string(),
            player: Some("Saka".to_string()),
            minute: 12,
            possession_team: "Arsenal".to_string(),
            duration: Some(1.2),
            location: Some(Location::new(40.0, 30.0)),
            data: EventData::Pass {
                outcome: PassOutcome::Complete,
                end_location: Some(Location::new(60.0, 35.0)),
                cross: false,
            },
        };
        assert_eq!(pass.kind(), EventKind::Pass);
        assert_eq!(pass.end_location(), Some(Location::new(60.0, 35.0)));
        assert_eq!(pass.xg(), None);

        let duel = Event {
            data: EventData::Duel {
                outcome: Some(DuelOutcome::Won),
            },
            ..pass.clone()
        };
        assert_eq!(duel.kind(), EventKind::Duel);
        assert_eq!(duel.end_location(), None, "duels have no destination");
    }

    #[test]
    fn test_metric_parse_accepts_config_spellings() {
        assert_eq!(Metric::parse("possession"), Some(Metric::PossessionPct));
        assert_eq!(Metric::parse("Shots on target"), Some(Metric::ShotsOnTarget));
        assert_eq!(Metric::parse("xg"), Some(Metric::XgTotal));
        assert_eq!(Metric::parse("dribbles"), None);
    }
}
