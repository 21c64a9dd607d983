//! Per-entity aggregate statistics over filtered event streams.
//!
//! This module provides:
//! - The fixed (type, outcome) lookup table mapping events to count metrics
//! - Team and player stat bundles over a set of matches
//! - Possession share as a mean of per-match percentages
//!
//! Aggregation never fails: an entity with no matching events yields an
//! all-zero bundle, and rates are reported as `None` when no minutes were
//! recorded.

use crate::models::{DuelOutcome, Event, EventData, PassOutcome, ShotOutcome, StatBundle, Target};

/// Aggregate statistics for one team over the given per-match event sets.
pub fn team_stats<'a, I>(team: &str, match_events: I) -> StatBundle
where
    I: IntoIterator<Item = &'a [Event]>,
{
    let mut bundle = StatBundle::default();
    let mut duration_secs = 0.0;
    let mut possession = Vec::new();

    for events in match_events {
        if let Some(pct) = possession_pct(team, events) {
            possession.push(pct);
        }
        for event in events.iter().filter(|e| e.team == team) {
            record(&mut bundle, event);
            duration_secs += event.duration.unwrap_or(0.0);
        }
    }

    bundle.minutes_played = duration_secs / 60.0;
    bundle.possession_pct = mean(&possession);
    bundle
}

/// Aggregate statistics for one player over the given per-match event sets.
///
/// Players are keyed by name; events without player attribution never match.
pub fn player_stats<'a, I>(player: &str, match_events: I) -> StatBundle
where
    I: IntoIterator<Item = &'a [Event]>,
{
    let mut bundle = StatBundle::default();
    let mut duration_secs = 0.0;

    for events in match_events {
        for event in events
            .iter()
            .filter(|e| e.player.as_deref() == Some(player))
        {
            record(&mut bundle, event);
            duration_secs += event.duration.unwrap_or(0.0);
        }
    }

    bundle.minutes_played = duration_secs / 60.0;
    bundle
}

/// Dispatch on the entity kind.
pub fn entity_stats<'a, I>(target: &Target, match_events: I) -> StatBundle
where
    I: IntoIterator<Item = &'a [Event]>,
{
    match target {
        Target::Team(name) => team_stats(name, match_events),
        Target::Player(name) => player_stats(name, match_events),
    }
}

/// Possession share for one team within one match, as a percentage of the
/// possession-attributed events across both teams.
///
/// `None` when the match has no events at all; a team with no attributed
/// possession in a non-empty match reads 0.0.
pub fn possession_pct(team: &str, events: &[Event]) -> Option<f64> {
    if events.is_empty() {
        return None;
    }
    let ours = events.iter().filter(|e| e.possession_team == team).count();
    Some(ours as f64 * 100.0 / events.len() as f64)
}

/// The (type, outcome) lookup table. One event can feed several metrics
/// (a goal is also a shot and a shot on target).
fn record(bundle: &mut StatBundle, event: &Event) {
    match &event.data {
        EventData::Pass { outcome, cross, .. } => {
            if *outcome == PassOutcome::Complete {
                bundle.passes_completed += 1;
            }
            if *cross {
                bundle.crosses += 1;
            }
        }
        EventData::Shot { outcome, xg } => {
            bundle.shots += 1;
            if let Some(xg) = xg {
                bundle.xg_total += xg;
            }
            if let Some(outcome) = outcome {
                if outcome.is_on_target() {
                    bundle.shots_on_target += 1;
                }
                if *outcome == ShotOutcome::Goal {
                    bundle.goals += 1;
                }
            }
        }
        EventData::Duel { outcome } => {
            if *outcome == Some(DuelOutcome::Won) {
                bundle.duels_won += 1;
            }
        }
        EventData::Interception => bundle.interceptions += 1,
        EventData::Assist => bundle.assists += 1,
        EventData::Carry { .. }
        | EventData::BallRecovery
        | EventData::Miscontrol
        | EventData::Other { .. } => {}
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}
