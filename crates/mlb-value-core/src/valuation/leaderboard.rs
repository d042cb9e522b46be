// Leaderboard projector: the columns a consumer needs from a ranked set.

use crate::valuation::rank::RankedRow;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub name: String,
    pub team: String,
    pub salary: f64,
    pub stat: &'static str,
    pub stat_value: f64,
}

/// Select display columns; nothing is recomputed. Currency formatting is
/// left to the caller.
pub fn project(ranked: &[RankedRow<'_>]) -> Vec<LeaderboardEntry> {
    ranked
        .iter()
        .map(|row| {
            let player = row.scored.player;
            LeaderboardEntry {
                rank: row.rank,
                name: player.name.clone(),
                team: player.team.clone(),
                // Ranked rows always passed the positive-salary check.
                salary: player.salary_per_season.unwrap_or_default(),
                stat: row.scored.chosen_stat,
                stat_value: row.scored.stat_value,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Population;
    use crate::player::PlayerRow;
    use crate::valuation::score::ScoredRow;

    #[test]
    fn projects_selected_columns_in_rank_order() {
        let a = PlayerRow::new("A", "NYY", Population::Batter)
            .with_salary(1_000_000.0)
            .with_playing_time(30.0)
            .with_stat("HR", 10.0)
            .with_stat("RBI", 22.0);
        let b = PlayerRow::new("B", "BOS", Population::Batter)
            .with_salary(2_000_000.0)
            .with_playing_time(25.0)
            .with_stat("HR", 15.0);
        let ranked = vec![
            RankedRow {
                rank: 1,
                scored: ScoredRow {
                    player: &a,
                    chosen_stat: "HR",
                    stat_value: 10.0,
                    value: 300.0,
                },
            },
            RankedRow {
                rank: 2,
                scored: ScoredRow {
                    player: &b,
                    chosen_stat: "HR",
                    stat_value: 15.0,
                    value: 187.5,
                },
            },
        ];

        let entries = project(&ranked);
        assert_eq!(
            entries,
            vec![
                LeaderboardEntry {
                    rank: 1,
                    name: "A".into(),
                    team: "NYY".into(),
                    salary: 1_000_000.0,
                    stat: "HR",
                    stat_value: 10.0,
                },
                LeaderboardEntry {
                    rank: 2,
                    name: "B".into(),
                    team: "BOS".into(),
                    salary: 2_000_000.0,
                    stat: "HR",
                    stat_value: 15.0,
                },
            ]
        );
    }

    #[test]
    fn missing_games_column_is_tolerated() {
        let a = PlayerRow::new("A", "NYY", Population::Batter).with_salary(5.0e5);
        assert!(a.games.is_none());
        let ranked = vec![RankedRow {
            rank: 1,
            scored: ScoredRow {
                player: &a,
                chosen_stat: "AVG",
                stat_value: 0.301,
                value: 1.0,
            },
        }];
        let entries = project(&ranked);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].stat, "AVG");
    }

    #[test]
    fn serializes_to_json() {
        let entry = LeaderboardEntry {
            rank: 3,
            name: "Cal Raleigh".into(),
            team: "SEA".into(),
            salary: 15_000_000.0,
            stat: "HR",
            stat_value: 38.0,
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["rank"], 3);
        assert_eq!(json["team"], "SEA");
        assert_eq!(json["stat"], "HR");
    }

    #[test]
    fn empty_ranked_set_projects_to_empty() {
        assert!(project(&[]).is_empty());
    }
}
