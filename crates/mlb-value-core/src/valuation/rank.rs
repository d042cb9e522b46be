// Ranker: stable descending sort by value, dense 1-based ranks, and
// per-player rank lookup.

use crate::valuation::score::ScoredRow;
use std::cmp::Ordering;

/// A scored row with its position in one leaderboard.
#[derive(Debug, Clone, Copy)]
pub struct RankedRow<'a> {
    /// 1 = highest value.
    pub rank: usize,
    pub scored: ScoredRow<'a>,
}

impl RankedRow<'_> {
    pub fn name(&self) -> &str {
        &self.scored.player.name
    }

    pub fn team(&self) -> &str {
        &self.scored.player.team
    }

    pub fn value(&self) -> f64 {
        self.scored.value
    }
}

/// Result of looking a player up in a ranked set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Lookup {
    Ranked {
        rank: usize,
        stat_value: f64,
        value: f64,
    },
    /// Filtered out by qualification, or never in the data at all.
    NotFound,
}

impl Lookup {
    pub fn rank(&self) -> Option<usize> {
        match self {
            Lookup::Ranked { rank, .. } => Some(*rank),
            Lookup::NotFound => None,
        }
    }
}

/// Sort by value descending and number the rows 1..=N.
///
/// `sort_by` is stable, so exact ties keep the order they were scored in.
/// Undefined (NaN) values rank after every real value. Ranks are always
/// computed fresh for the given set.
pub fn rank(mut scored: Vec<ScoredRow<'_>>) -> Vec<RankedRow<'_>> {
    scored.sort_by(|a, b| value_descending(a.value, b.value));
    scored
        .into_iter()
        .enumerate()
        .map(|(i, scored)| RankedRow {
            rank: i + 1,
            scored,
        })
        .collect()
}

/// Total order: larger values first, NaN last.
fn value_descending(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        (false, true) => Ordering::Less,
        (true, false) => Ordering::Greater,
        (true, true) => Ordering::Equal,
    }
}

/// Rank of the first row named `name`. Names are compared after trimming
/// the query.
pub fn lookup(ranked: &[RankedRow<'_>], name: &str) -> Lookup {
    let name = name.trim();
    find(ranked, |row| row.name() == name)
}

/// Like `lookup`, but only matches the player on `team`. Two players can
/// share a name.
pub fn lookup_on_team(ranked: &[RankedRow<'_>], name: &str, team: &str) -> Lookup {
    let name = name.trim();
    let team = team.trim();
    find(ranked, |row| row.name() == name && row.team().eq_ignore_ascii_case(team))
}

fn find(ranked: &[RankedRow<'_>], pred: impl Fn(&RankedRow<'_>) -> bool) -> Lookup {
    match ranked.iter().find(|row| pred(row)) {
        Some(row) => Lookup::Ranked {
            rank: row.rank,
            stat_value: row.scored.stat_value,
            value: row.scored.value,
        },
        None => Lookup::NotFound,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
