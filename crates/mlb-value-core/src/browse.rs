// Display-side helpers over the unfiltered rows: team rosters, name search
// and column sorting. None of this touches the value pipeline.

use crate::catalog::{GAMES_COLUMN, NAME_COLUMN, SALARY_COLUMN, TEAM_COLUMN};
use crate::player::PlayerRow;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

/// Distinct team codes present in `rows`, sorted.
pub fn teams_present(rows: &[PlayerRow]) -> Vec<&str> {
    let mut teams: Vec<&str> = rows.iter().map(|r| r.team.as_str()).collect();
    teams.sort_unstable();
    teams.dedup();
    teams
}

/// Rows for one team, in source order.
pub fn players_on_team<'a>(rows: &'a [PlayerRow], team: &str) -> Vec<&'a PlayerRow> {
    let team = team.trim();
    rows.iter()
        .filter(|r| r.team.eq_ignore_ascii_case(team))
        .collect()
}

/// Case-insensitive substring match on the player name. A blank query
/// matches everyone.
pub fn search_by_name<'a>(rows: &'a [PlayerRow], query: &str) -> Vec<&'a PlayerRow> {
    let needle = query.trim().to_lowercase();
    rows.iter()
        .filter(|r| needle.is_empty() || r.name.to_lowercase().contains(&needle))
        .collect()
}

enum SortKey<'c> {
    Name,
    Team,
    Salary,
    Games,
    PlayingTime,
    Stat(&'c str),
}

impl<'c> SortKey<'c> {
    fn parse(column: &'c str) -> Self {
        let column = column.trim();
        if column.eq_ignore_ascii_case(NAME_COLUMN) {
            SortKey::Name
        } else if column.eq_ignore_ascii_case(TEAM_COLUMN) {
            SortKey::Team
        } else if column.eq_ignore_ascii_case("Salary") || column.eq_ignore_ascii_case(SALARY_COLUMN) {
            SortKey::Salary
        } else if column.eq_ignore_ascii_case(GAMES_COLUMN) {
            SortKey::Games
        } else if column.eq_ignore_ascii_case("PA") || column.eq_ignore_ascii_case("IP") {
            SortKey::PlayingTime
        } else {
            SortKey::Stat(column)
        }
    }

    fn number(&self, row: &PlayerRow) -> Option<f64> {
        match self {
            SortKey::Salary => row.salary_per_season,
            SortKey::Games => row.games,
            SortKey::PlayingTime => Some(row.playing_time),
            SortKey::Stat(code) => row
                .stats
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(code))
                .map(|(_, v)| *v),
            SortKey::Name | SortKey::Team => None,
        }
    }
}

/// Sort rows by a display column. Missing values always go last, whichever
/// the direction; the sort is stable.
pub fn sort_by_column<'a>(
    rows: &[&'a PlayerRow],
    column: &str,
    direction: SortDirection,
) -> Vec<&'a PlayerRow> {
    let key = SortKey::parse(column);
    let mut sorted = rows.to_vec();
    sorted.sort_by(|a, b| {
        let ord = match key {
            SortKey::Name => Some(a.name.cmp(&b.name)),
            SortKey::Team => Some(a.team.cmp(&b.team)),
            _ => match (key.number(a), key.number(b)) {
                (Some(x), Some(y)) => Some(x.partial_cmp(&y).unwrap_or(Ordering::Equal)),
                (Some(_), None) => return Ordering::Less,
                (None, Some(_)) => return Ordering::Greater,
                (None, None) => return Ordering::Equal,
            },
        };
        let ord = ord.unwrap_or(Ordering::Equal);
        match direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
    sorted
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
