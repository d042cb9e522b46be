// Player-season rows as loaded from the data files.

use crate::catalog::Population;
use serde::Serialize;
use std::collections::BTreeMap;

/// One row per player-season.
///
/// `stats` only holds stats that were actually recorded: an absent key means
/// missing, never zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerRow {
    pub name: String,
    pub team: String,
    pub population: Population,
    pub salary_per_season: Option<f64>,
    /// PA for batters, IP for pitchers.
    pub playing_time: f64,
    pub games: Option<f64>,
    pub stats: BTreeMap<String, f64>,
}

impl PlayerRow {
    pub fn new(name: impl Into<String>, team: impl Into<String>, population: Population) -> Self {
        Self {
            name: name.into(),
            team: team.into(),
            population,
            salary_per_season: None,
            playing_time: 0.0,
            games: None,
            stats: BTreeMap::new(),
        }
    }

    pub fn with_salary(mut self, salary: f64) -> Self {
        self.salary_per_season = Some(salary);
        self
    }

    pub fn with_playing_time(mut self, playing_time: f64) -> Self {
        self.playing_time = playing_time;
        self
    }

    pub fn with_games(mut self, games: f64) -> Self {
        self.games = Some(games);
        self
    }

    pub fn with_stat(mut self, code: impl Into<String>, value: f64) -> Self {
        self.stats.insert(code.into(), value);
        self
    }

    pub fn stat(&self, code: &str) -> Option<f64> {
        self.stats.get(code).copied()
    }

    /// Salary if present and positive; the only salaries a score may use.
    pub fn positive_salary(&self) -> Option<f64> {
        self.salary_per_season.filter(|s| *s > 0.0)
    }
}
