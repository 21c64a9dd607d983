//! Competition standings from match results.
//!
//! The table is recomputed in full on every query. Teams enter the table in
//! the order they are first seen in the match list, and that order is the
//! final tie-breaker: the three-key sort below is stable, so teams level on
//! points, goal difference, and goals scored keep their discovery order.

use crate::models::{Match, StandingsRow};
use rustc_hash::FxHashMap;

/// Reduce a set of match results into a ranked table.
///
/// Matches without a recorded score on either side are treated as not yet
/// played and excluded. An empty match list yields an empty table.
pub fn standings(matches: &[Match]) -> Vec<StandingsRow> {
    let mut index: FxHashMap<String, usize> = FxHashMap::default();
    let mut rows: Vec<StandingsRow> = Vec::new();

    let mut row_for = |rows: &mut Vec<StandingsRow>, team: &str| -> usize {
        if let Some(&i) = index.get(team) {
            return i;
        }
        let i = rows.len();
        rows.push(StandingsRow::zero(team));
        index.insert(team.to_string(), i);
        i
    };

    for m in matches {
        // Register both sides first so unplayed fixtures still surface teams.
        let home = row_for(&mut rows, &m.home_team);
        let away = row_for(&mut rows, &m.away_team);

        let (home_score, away_score) = match (m.home_score, m.away_score) {
            (Some(h), Some(a)) => (h, a),
            _ => continue,
        };

        apply_result(&mut rows[home], home_score, away_score);
        apply_result(&mut rows[away], away_score, home_score);
    }

    for row in &mut rows {
        row.goal_difference = row.goals_for as i32 - row.goals_against as i32;
    }

    // Vec::sort_by is stable; full ties keep discovery order.
    rows.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then(b.goal_difference.cmp(&a.goal_difference))
            .then(b.goals_for.cmp(&a.goals_for))
    });

    for (i, row) in rows.iter_mut().enumerate() {
        row.rank = i as u32 + 1;
    }

    rows
}

/// Credit one played match to one side of the table.
fn apply_result(row: &mut StandingsRow, scored: u32, conceded: u32) {
    row.matches += 1;
    row.goals_for += scored;
    row.goals_against += conceded;
    if scored > conceded {
        row.wins += 1;
        row.points += 3;
    } else if scored == conceded {
        row.draws += 1;
        row.points += 1;
    } else {
        row.losses += 1;
    }
}
