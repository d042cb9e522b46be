// Valuation pipeline: qualification filter, value scorer, ranker and
// leaderboard projector.

pub mod leaderboard;
pub mod qualify;
pub mod rank;
pub mod score;

use crate::catalog::StatSelection;
use crate::player::PlayerRow;
use serde::{Deserialize, Serialize};
use tracing::debug;

use qualify::Thresholds;
use rank::RankedRow;
use score::Formula;

/// Formula and playing-time thresholds for one kind of query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QueryProfile {
    pub formula: Formula,
    pub min_pa: f64,
    pub min_ip: f64,
}

impl QueryProfile {
    /// Single-player rank check: simple formula, PA >= 20 / IP >= 5.
    pub fn lookup() -> Self {
        Self {
            formula: Formula::Simple,
            min_pa: 20.0,
            min_ip: 5.0,
        }
    }

    /// Full leaderboard: log-dampened formula, PA >= 50 / IP >= 10.
    pub fn leaderboard() -> Self {
        Self {
            formula: Formula::LogDampened,
            min_pa: 50.0,
            min_ip: 10.0,
        }
    }

    pub fn thresholds(&self) -> Thresholds {
        Thresholds::new(self.min_pa, self.min_ip)
    }
}

/// Filter, score and rank `rows` for one stat selection.
///
/// Each call is independent: nothing is cached between selections, and the
/// source rows are only borrowed.
pub fn run_query<'a>(
    rows: &'a [PlayerRow],
    selection: &StatSelection,
    profile: &QueryProfile,
) -> Vec<RankedRow<'a>> {
    let qualified = qualify::filter(rows, selection, &profile.thresholds());
    let scored = score::score(&qualified, profile.formula);
    let ranked = rank::rank(scored);
    debug!(
        "{} {} query: {} of {} rows qualified ({} formula)",
        selection.population(),
        selection.code(),
        ranked.len(),
        rows.len(),
        profile.formula
    );
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Population, StatCatalog};
    use crate::valuation::rank::{lookup, Lookup};

    fn batters() -> Vec<PlayerRow> {
        vec![
            PlayerRow::new("A", "NYY", Population::Batter)
                .with_playing_time(30.0)
                .with_games(20.0)
                .with_salary(1_000_000.0)
                .with_stat("HR", 10.0),
            PlayerRow::new("B", "BOS", Population::Batter)
                .with_playing_time(25.0)
                .with_games(18.0)
                .with_salary(2_000_000.0)
                .with_stat("HR", 15.0),
        ]
    }

    #[test]
    fn lookup_profile_ranks_small_samples() {
        let rows = batters();
        let sel = StatCatalog::standard()
            .select(Population::Batter, "HR")
            .unwrap();
        let ranked = run_query(&rows, &sel, &QueryProfile::lookup());
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].name(), "A");
        assert_eq!(lookup(&ranked, "B").rank(), Some(2));
    }

    #[test]
    fn leaderboard_profile_excludes_small_samples() {
        let rows = batters();
        let sel = StatCatalog::standard()
            .select(Population::Batter, "HR")
            .unwrap();
        let ranked = run_query(&rows, &sel, &QueryProfile::leaderboard());
        assert!(ranked.is_empty());
        assert_eq!(lookup(&ranked, "A"), Lookup::NotFound);
    }

    #[test]
    fn profiles_expose_thresholds() {
        let t = QueryProfile::leaderboard().thresholds();
        assert_eq!(t.for_population(Population::Batter), 50.0);
        assert_eq!(t.for_population(Population::Pitcher), 10.0);
    }
}
