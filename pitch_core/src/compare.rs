//! Two-entity comparison and league-wide metric correlation.
//!
//! This module provides:
//! - Pairwise max-normalization for radar-style comparisons
//! - Pearson correlation with an explicit degenerate-input flag
//! - Per-team metric series over a competition, reduced in parallel
//!
//! Statistical inputs are paired tuples rather than parallel slices, so a
//! length mismatch between the two sides is unrepresentable.

use crate::models::{Event, Match, Metric, StatBundle};
use crate::stats;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// ============================================================================
// Radar normalization
// ============================================================================

/// One axis of a two-entity radar comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadarAxis {
    pub metric: Metric,
    pub raw_a: f64,
    pub raw_b: f64,
    /// max(raw_a, raw_b), with 1.0 substituted when that maximum is zero.
    pub normalizer: f64,
    pub normalized_a: f64,
    pub normalized_b: f64,
    /// Both raw values were zero; the axis carries no signal.
    pub degenerate: bool,
}

/// Radar comparison of two entities over a shared metric list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadarComparison {
    pub entity_a: String,
    pub entity_b: String,
    pub axes: Vec<RadarAxis>,
}

impl RadarComparison {
    pub fn normalized_a(&self) -> Vec<f64> {
        self.axes.iter().map(|axis| axis.normalized_a).collect()
    }

    pub fn normalized_b(&self) -> Vec<f64> {
        self.axes.iter().map(|axis| axis.normalized_b).collect()
    }

    pub fn has_degenerate_axes(&self) -> bool {
        self.axes.iter().any(|axis| axis.degenerate)
    }
}

/// Normalize one paired value. Returns (normalized_a, normalized_b,
/// normalizer, degenerate).
#[inline]
fn normalize(a: f64, b: f64) -> (f64, f64, f64, bool) {
    let max = a.max(b);
    if max == 0.0 {
        (0.0, 0.0, 1.0, true)
    } else {
        (a / max, b / max, max, false)
    }
}

/// Build the radar comparison for two team summaries.
///
/// Every non-degenerate axis has at least one side at exactly 1.0 and both
/// sides in [0, 1].
pub fn radar_comparison(a: &TeamSummary, b: &TeamSummary, metrics: &[Metric]) -> RadarComparison {
    let axes = metrics
        .iter()
        .map(|&metric| {
            let raw_a = metric_value(a, metric);
            let raw_b = metric_value(b, metric);
            let (normalized_a, normalized_b, normalizer, degenerate) = normalize(raw_a, raw_b);
            RadarAxis {
                metric,
                raw_a,
                raw_b,
                normalizer,
                normalized_a,
                normalized_b,
                degenerate,
            }
        })
        .collect();

    RadarComparison {
        entity_a: a.team.clone(),
        entity_b: b.team.clone(),
        axes,
    }
}

// ============================================================================
// Pearson correlation
// ============================================================================

/// A correlation result. When `degenerate` is set the coefficient is the
/// 0.0 sentinel, never NaN.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Correlation {
    pub coefficient: f64,
    pub degenerate: bool,
}

impl Correlation {
    fn degenerate() -> Self {
        Self {
            coefficient: 0.0,
            degenerate: true,
        }
    }
}

/// Pearson correlation coefficient over paired samples.
///
/// Fewer than two samples, or a constant column on either side, is
/// degenerate input: the result is flagged and the coefficient is 0.0.
pub fn correlation(samples: &[(f64, f64)]) -> Correlation {
    if samples.len() < 2 {
        return Correlation::degenerate();
    }

    let n = samples.len() as f64;
    let mean_x = samples.iter().map(|&(x, _)| x).sum::<f64>() / n;
    let mean_y = samples.iter().map(|&(_, y)| y).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for &(x, y) in samples {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return Correlation::degenerate();
    }

    let coefficient = cov / (var_x.sqrt() * var_y.sqrt());
    Correlation {
        // Guard against float drift pushing past the mathematical bounds.
        coefficient: coefficient.clamp(-1.0, 1.0),
        degenerate: false,
    }
}

// ============================================================================
// League metric series
// ============================================================================

/// One team's fixtures and fetched event sets over a competition,
/// assembled by the session layer.
#[derive(Debug, Clone)]
pub struct TeamSeason {
    pub team: String,
    /// Fixtures involving the team.
    pub matches: Vec<Match>,
    /// Event sets for the team's fetched matches.
    pub match_events: Vec<Arc<Vec<Event>>>,
}

impl TeamSeason {
    /// League points over the season (3/1/0 per played fixture).
    pub fn points(&self) -> u32 {
        self.matches
            .iter()
            .filter_map(|m| m.points_for(&self.team))
            .sum()
    }

    /// Reduce the season into a summary usable by the comparison engine.
    pub fn summary(&self) -> TeamSummary {
        let bundle = stats::team_stats(
            &self.team,
            self.match_events.iter().map(|events| events.as_slice()),
        );
        TeamSummary {
            team: self.team.clone(),
            bundle,
            points: self.points(),
        }
    }
}

/// A team's stat bundle plus its league points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamSummary {
    pub team: String,
    pub bundle: StatBundle,
    pub points: u32,
}

/// Extract one comparison metric from a team summary.
pub fn metric_value(summary: &TeamSummary, metric: Metric) -> f64 {
    let bundle = &summary.bundle;
    match metric {
        Metric::Goals => bundle.goals as f64,
        Metric::Assists => bundle.assists as f64,
        Metric::PossessionPct => bundle.possession_pct.unwrap_or(0.0),
        Metric::PassesCompleted => bundle.passes_completed as f64,
        Metric::Shots => bundle.shots as f64,
        Metric::ShotsOnTarget => bundle.shots_on_target as f64,
        Metric::Crosses => bundle.crosses as f64,
        Metric::DuelsWon => bundle.duels_won as f64,
        Metric::Interceptions => bundle.interceptions as f64,
        Metric::XgTotal => bundle.xg_total,
        Metric::Points => summary.points as f64,
    }
}

/// One team's (x, y) metric values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMetricPoint {
    pub team: String,
    pub x: f64,
    pub y: f64,
}

/// Per-team metric value pairs across a competition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSeries {
    pub x_metric: Metric,
    pub y_metric: Metric,
    pub teams: Vec<TeamMetricPoint>,
}

impl MetricSeries {
    pub fn samples(&self) -> Vec<(f64, f64)> {
        self.teams.iter().map(|point| (point.x, point.y)).collect()
    }

    pub fn correlation(&self) -> Correlation {
        correlation(&self.samples())
    }
}

/// Reduce every team's season into an (x, y) pair. The fetch phase has
/// already happened; this is the pure, parallel part.
pub fn metric_series(x: Metric, y: Metric, seasons: &[TeamSeason]) -> MetricSeries {
    let teams = seasons
        .par_iter()
        .map(|season| {
            let summary = season.summary();
            TeamMetricPoint {
                team: summary.team.clone(),
                x: metric_value(&summary, x),
                y: metric_value(&summary, y),
            }
        })
        .collect();

    MetricSeries {
        x_metric: x,
        y_metric: y,
        teams,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EventData, Location, PassOutcome, ShotOutcome};

    fn summary(team: &str, goals: u32, shots: u32, points: u32) -> TeamSummary {
        TeamSummary {
            team: team.to_string(),
            bundle: StatBundle {
                goals,
                shots,
                ..Default::default()
            },
            points,
        }
    }

    #[test]
    fn test_normalization_bounds_and_peak() {
        let a = summary("A", 2, 10, 20);
        let b = summary("B", 4, 5, 15);
        let cmp = radar_comparison(&a, &b, &[Metric::Goals, Metric::Shots, Metric::Points]);

        for axis in &cmp.axes {
            assert!(!axis.degenerate, "no zero axes in this fixture");
            assert!((0.0..=1.0).contains(&axis.normalized_a), "{:?}", axis);
            assert!((0.0..=1.0).contains(&axis.normalized_b), "{:?}", axis);
            let peak = axis.normalized_a.max(axis.normalized_b);
            assert!(
                (peak - 1.0).abs() < 1e-12,
                "one side must reach exactly 1.0 on {:?}, got {}",
                axis.metric,
                peak
            );
        }

        let goals = &cmp.axes[0];
        assert!((goals.normalized_a - 0.5).abs() < 1e-12);
        assert!((goals.normalized_b - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_normalization_zero_axis_flagged() {
        let a = summary("A", 0, 0, 0);
        let b = summary("B", 0, 3, 0);
        let cmp = radar_comparison(&a, &b, &[Metric::Goals, Metric::Shots]);

        let goals = &cmp.axes[0];
        assert!(goals.degenerate, "both-zero axis must be flagged");
        assert_eq!(goals.normalizer, 1.0, "zero normalizer substituted with 1");
        assert_eq!(goals.normalized_a, 0.0);
        assert_eq!(goals.normalized_b, 0.0);

        assert!(!cmp.axes[1].degenerate);
        assert!(cmp.has_degenerate_axes());
    }

    #[test]
    fn test_correlation_perfect_and_inverse() {
        let up: Vec<(f64, f64)> = (0..10).map(|i| (i as f64, 2.0 * i as f64 + 1.0)).collect();
        let r = correlation(&up);
        assert!(!r.degenerate);
        assert!(
            (r.coefficient - 1.0).abs() < 1e-9,
            "linear increasing data correlates at 1.0, got {}",
            r.coefficient
        );

        let down: Vec<(f64, f64)> = (0..10).map(|i| (i as f64, -(i as f64))).collect();
        let r = correlation(&down);
        assert!(
            (r.coefficient + 1.0).abs() < 1e-9,
            "inverse data correlates at -1.0, got {}",
            r.coefficient
        );
    }

    #[test]
    fn test_correlation_symmetry_and_bounds() {
        let samples = vec![(1.0, 4.0), (2.0, 3.5), (3.0, 7.0), (4.0, 5.5), (5.0, 9.0)];
        let swapped: Vec<(f64, f64)> = samples.iter().map(|&(x, y)| (y, x)).collect();

        let r = correlation(&samples);
        let r_swapped = correlation(&swapped);
        assert!(
            (r.coefficient - r_swapped.coefficient).abs() < 1e-12,
            "correlation must be symmetric: {} vs {}",
            r.coefficient,
            r_swapped.coefficient
        );
        assert!(r.coefficient.abs() <= 1.0);
        assert!(!r.coefficient.is_nan());
    }

    #[test]
    fn test_correlation_degenerate_input() {
        let constant_x = vec![(2.0, 1.0), (2.0, 5.0), (2.0, 3.0)];
        let r = correlation(&constant_x);
        assert!(r.degenerate, "constant column is degenerate input");
        assert_eq!(r.coefficient, 0.0, "sentinel, never NaN");

        let too_few = vec![(1.0, 2.0)];
        assert!(correlation(&too_few).degenerate);
        assert!(correlation(&[]).degenerate);
    }

    fn make_event(team: &str, data: EventData) -> Event {
        Event {
            team: team.to_string(),
            player: None,
            minute: 10,
            possession_team: team.to_string(),
            duration: None,
            location: Some(Location::new(60.0, 40.0)),
            data,
        }
    }

    fn make_match(id: u64, home: &str, away: &str, home_score: u32, away_score: u32) -> Match {
        Match {
            match_id: id,
            home_team: home.to_string(),
            away_team: away.to_string(),
            home_score: Some(home_score),
            away_score: Some(away_score),
            match_date: None,
        }
    }

    #[test]
    fn test_team_season_points_and_series() {
        // A wins 2-0 (3 pts) and draws 1-1 (1 pt); B loses and draws.
        let a_events = Arc::new(vec![
            make_event(
                "A",
                EventData::Shot {
                    outcome: Some(ShotOutcome::Goal),
                    xg: Some(0.4),
                },
            ),
            make_event(
                "A",
                EventData::Pass {
                    outcome: PassOutcome::Complete,
                    end_location: None,
                    cross: false,
                },
            ),
        ]);
        let matches = vec![make_match(1, "A", "B", 2, 0), make_match(2, "B", "A", 1, 1)];

        let seasons = vec![
            TeamSeason {
                team: "A".to_string(),
                matches: matches.clone(),
                match_events: vec![Arc::clone(&a_events)],
            },
            TeamSeason {
                team: "B".to_string(),
                matches: matches.clone(),
                match_events: vec![Arc::clone(&a_events)],
            },
        ];

        assert_eq!(seasons[0].points(), 4);
        assert_eq!(seasons[1].points(), 1);

        let series = metric_series(Metric::Goals, Metric::Points, &seasons);
        assert_eq!(series.teams.len(), 2);
        let a = series.teams.iter().find(|p| p.team == "A").unwrap();
        assert_eq!(a.x, 1.0, "one goal event for A");
        assert_eq!(a.y, 4.0);
        let b = series.teams.iter().find(|p| p.team == "B").unwrap();
        assert_eq!(b.x, 0.0, "no goal events attributed to B");
        assert_eq!(b.y, 1.0);
    }

    #[test]
    fn test_metric_value_possession_fallback() {
        let mut s = summary("A", 1, 2, 3);
        assert_eq!(metric_value(&s, Metric::PossessionPct), 0.0);
        s.bundle.possession_pct = Some(55.5);
        assert_eq!(metric_value(&s, Metric::PossessionPct), 55.5);
        assert_eq!(metric_value(&s, Metric::Points), 3.0);
    }
}
