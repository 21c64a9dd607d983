//! Matchday Report Service
//!
//! Responsibilities:
//! - Open an analytics session over the configured event store
//! - Print the league table for the selected competition edition
//! - Compare two focus teams axis by axis on a normalized radar
//! - Correlate a metric pair across every team in the competition
//! - Summarize the leader's shot map, late passing and squad

mod config;

use crate::config::ReportConfig;
use anyhow::Result;
use dotenv::dotenv;
use pitch_core::{
    AnalyticsSession, EventFilter, EventKind, HttpEventStore, Metric, Period, RadarComparison,
    StandingsRow, Target,
};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Radar axes, mirroring the stat categories sides are usually compared on.
const RADAR_METRICS: [Metric; 6] = [
    Metric::Goals,
    Metric::PossessionPct,
    Metric::PassesCompleted,
    Metric::ShotsOnTarget,
    Metric::DuelsWon,
    Metric::Interceptions,
];

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = ReportConfig::from_env();
    info!(
        "matchday report for competition {}/{} via {}",
        config.competition_id, config.season_id, config.base_url
    );

    let store = HttpEventStore::with_config(&config.base_url, config.http_timeout);
    let session = AnalyticsSession::new(Arc::new(store));

    print_header(&session, &config).await;

    let table = session
        .standings(config.competition_id, config.season_id)
        .await;
    if table.is_empty() {
        println!("No completed matches recorded for this edition.");
        return Ok(());
    }
    print_table(&table);

    let (team_a, team_b) = focus_teams(&session, &config, &table).await;
    let radar = session
        .radar_comparison(
            config.competition_id,
            config.season_id,
            &team_a,
            &team_b,
            &RADAR_METRICS,
        )
        .await;
    print_radar(&radar);

    print_correlation(&session, &config).await;
    print_leader_profile(&session, &config, &table[0].team).await;

    Ok(())
}

async fn print_header(session: &AnalyticsSession, config: &ReportConfig) {
    let competitions = session.competitions().await;
    match competitions.iter().find(|c| {
        c.competition_id == config.competition_id && c.season_id == config.season_id
    }) {
        Some(competition) => println!("== {} ==", competition),
        None => println!(
            "== competition {}/{} ==",
            config.competition_id, config.season_id
        ),
    }
}

fn print_table(table: &[StandingsRow]) {
    println!();
    println!(
        "{:>3}  {:<24} {:>3} {:>3} {:>3} {:>3} {:>4} {:>4} {:>4} {:>4}",
        "#", "Team", "MP", "W", "D", "L", "GF", "GA", "GD", "Pts"
    );
    for row in table {
        println!(
            "{:>3}  {:<24} {:>3} {:>3} {:>3} {:>3} {:>4} {:>4} {:>+4} {:>4}",
            row.rank,
            row.team,
            row.matches,
            row.wins,
            row.draws,
            row.losses,
            row.goals_for,
            row.goals_against,
            row.goal_difference,
            row.points
        );
    }
}

/// Pick the radar pair: the configured names resolved against the edition's
/// teams, or the top two of the table.
async fn focus_teams(
    session: &AnalyticsSession,
    config: &ReportConfig,
    table: &[StandingsRow],
) -> (String, String) {
    if let Some((raw_a, raw_b)) = &config.focus_teams {
        let a = session
            .resolve_team(config.competition_id, config.season_id, raw_a)
            .await;
        let b = session
            .resolve_team(config.competition_id, config.season_id, raw_b)
            .await;
        match (a, b) {
            (Some(a), Some(b)) => return (a, b),
            _ => warn!(
                "FOCUS_TEAMS '{},{}' not found in this edition, comparing the top two",
                raw_a, raw_b
            ),
        }
    }

    let second = table
        .get(1)
        .unwrap_or(&table[0])
        .team
        .clone();
    (table[0].team.clone(), second)
}

fn print_radar(radar: &RadarComparison) {
    println!();
    println!("Radar: {} vs {}", radar.entity_a, radar.entity_b);
    for axis in &radar.axes {
        let note = if axis.degenerate { "  (no signal)" } else { "" };
        println!(
            "  {:<18} {:>8.1} ({:>4.2})  |  {:>8.1} ({:>4.2}){}",
            axis.metric.label(),
            axis.raw_a,
            axis.normalized_a,
            axis.raw_b,
            axis.normalized_b,
            note
        );
    }
}

async fn print_correlation(session: &AnalyticsSession, config: &ReportConfig) {
    let series = session
        .metric_series(
            config.competition_id,
            config.season_id,
            config.correlation_x,
            config.correlation_y,
        )
        .await;
    let r = series.correlation();
    println!();
    if r.degenerate {
        println!(
            "Correlation {} vs {}: not enough spread across {} teams (r reported as 0.00)",
            series.x_metric,
            series.y_metric,
            series.teams.len()
        );
    } else {
        println!(
            "Correlation {} vs {} across {} teams: r = {:+.2}",
            series.x_metric,
            series.y_metric,
            series.teams.len(),
            r.coefficient
        );
    }
}

async fn print_leader_profile(session: &AnalyticsSession, config: &ReportConfig, leader: &str) {
    let matches = session
        .team_matches(config.competition_id, config.season_id, leader)
        .await;
    let target = Target::team(leader);

    let shots = session
        .point_sample(&target, &matches, &EventFilter::kind(EventKind::Shot))
        .await;
    let late_passes = session
        .vector_sample(
            &target,
            &matches,
            &EventFilter::kind(EventKind::Pass).with_period(Period::SecondHalf),
        )
        .await;
    let roster = session
        .roster(config.competition_id, config.season_id, leader)
        .await;

    println!();
    println!("Leader profile: {}", leader);
    println!("  {:<25} {}", "shot map samples:", shots.len());
    println!("  {:<25} {}", "second-half pass vectors:", late_passes.len());
    if roster.is_empty() {
        println!("  no lineup recorded");
    } else {
        let names: Vec<&str> = roster
            .iter()
            .take(11)
            .map(|p| p.player_name.as_str())
            .collect();
        println!(
            "  first lineup ({} players): {}",
            roster.len(),
            names.join(", ")
        );
    }
}
