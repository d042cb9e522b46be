// Stat catalog: which performance stats each player population can be
// ranked by, plus the franchise codes and column names shared by the loader.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

pub const NAME_COLUMN: &str = "Name";
pub const TEAM_COLUMN: &str = "Team";
pub const SALARY_COLUMN: &str = "Salary (Per Season)";
pub const GAMES_COLUMN: &str = "G";

// ---------------------------------------------------------------------------
// Population
// ---------------------------------------------------------------------------

/// Batter/pitcher partition. Determines the stat catalog, the playing-time
/// column and the qualification threshold that apply to a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Population {
    Batter,
    Pitcher,
}

impl Population {
    pub const ALL: [Population; 2] = [Population::Batter, Population::Pitcher];

    /// Plate appearances for batters, innings pitched for pitchers.
    pub fn playing_time_column(self) -> &'static str {
        match self {
            Population::Batter => "PA",
            Population::Pitcher => "IP",
        }
    }

    /// Value written to the `Type` column of the data files.
    pub fn label(self) -> &'static str {
        match self {
            Population::Batter => "Batter",
            Population::Pitcher => "Pitcher",
        }
    }

    pub fn plural(self) -> &'static str {
        match self {
            Population::Batter => "batters",
            Population::Pitcher => "pitchers",
        }
    }
}

impl fmt::Display for Population {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Population {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "b" | "batter" | "batters" => Ok(Population::Batter),
            "p" | "pitcher" | "pitchers" => Ok(Population::Pitcher),
            _ => Err(SelectionError::UnknownPopulation(s.trim().to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Franchises
// ---------------------------------------------------------------------------

/// The 30 franchise codes used by the data files, sorted.
pub const MLB_TEAMS: [&str; 30] = [
    "ARI", "ATL", "BAL", "BOS", "CHC", "CHW", "CIN", "CLE", "COL", "DET", "HOU", "KCR", "LAA",
    "LAD", "MIA", "MIL", "MIN", "NYM", "NYY", "OAK", "PHI", "PIT", "SDP", "SEA", "SFG", "STL",
    "TBR", "TEX", "TOR", "WSN",
];

pub fn is_known_team(code: &str) -> bool {
    MLB_TEAMS.binary_search(&code).is_ok()
}

/// Multi-team season aggregates ("2 Tms", "3 Tms") are not a single franchise.
pub fn is_multi_team_aggregate(team: &str) -> bool {
    team.ends_with(" Tms")
}

// ---------------------------------------------------------------------------
// Stat definitions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatDef {
    pub code: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

const fn stat(code: &'static str, name: &'static str, description: &'static str) -> StatDef {
    StatDef {
        code,
        name,
        description,
    }
}

pub const BATTING_STATS: &[StatDef] = &[
    stat(
        "WAR",
        "Wins Above Replacement",
        "A catch-all stat estimating how many more wins this player provides compared to a replacement-level player",
    ),
    stat(
        "SLG",
        "Slugging Percentage",
        "Measures power by calculating total bases per at-bat",
    ),
    stat(
        "OBP",
        "On-base Percentage",
        "How often the player gets on base, whether by hit, walk, or hit by pitch",
    ),
    stat(
        "HR",
        "Home Runs",
        "Total home runs hit, showing power and run potential",
    ),
    stat(
        "RBI",
        "Runs Batted In",
        "Number of runners the player drove in to score",
    ),
    stat(
        "SB",
        "Stolen Bases",
        "Times the player stole a base, showing speed and baserunning",
    ),
    stat("R", "Runs", "How often the player crossed home plate to score"),
    stat(
        "BB%",
        "Walk Percentage",
        "How often the player earns a walk (base on balls) per plate appearance",
    ),
    stat(
        "K%",
        "Strikeout Percentage",
        "How often the player strikes out, lower is better",
    ),
    stat(
        "AVG",
        "Batting Average",
        "How often the player gets a hit per at-bat",
    ),
];

pub const PITCHING_STATS: &[StatDef] = &[
    stat(
        "W",
        "Wins",
        "Games where the pitcher was in the game when their team took the lead for good",
    ),
    stat(
        "L",
        "Losses",
        "Games where the pitcher allowed the go-ahead run that led to a loss",
    ),
    stat(
        "SV",
        "Saves",
        "When a relief pitcher successfully protects a lead to end the game",
    ),
    stat(
        "K/9",
        "Strikeouts per 9 innings",
        "How many batters the pitcher strikes out every 9 innings",
    ),
    stat(
        "BB/9",
        "Walks per 9 innings",
        "How many batters the pitcher walks every 9 innings",
    ),
    stat(
        "HR/9",
        "Home Runs per 9 innings",
        "How many homers the pitcher allows per 9 innings",
    ),
    stat(
        "ERA",
        "Earned Run Average",
        "How many earned runs the pitcher gives up every 9 innings",
    ),
    stat(
        "FIP",
        "Fielding Independent Pitching",
        "A version of ERA that only looks at things the pitcher controls (strikeouts, walks, home runs)",
    ),
    stat(
        "WAR",
        "Wins Above Replacement",
        "An estimate of the pitcher's total contribution to the team compared to a replacement-level pitcher",
    ),
];

// ---------------------------------------------------------------------------
// Selection errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("cannot evaluate value by `{code}`; choose a performance stat")]
    NotPerformanceStat { code: String },

    #[error("`{code}` is not a {population} stat")]
    UnknownStat {
        population: Population,
        code: String,
    },

    #[error("stat number {number} is out of range (1-{max})")]
    OutOfRange { number: usize, max: usize },

    #[error("unknown player type `{0}`; expected batters or pitchers")]
    UnknownPopulation(String),
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// A validated ranking key. Only `StatCatalog` constructs one, so the
/// qualification filter and scorer never see a stat outside the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatSelection {
    population: Population,
    code: &'static str,
}

impl StatSelection {
    pub fn population(&self) -> Population {
        self.population
    }

    pub fn code(&self) -> &'static str {
        self.code
    }
}

/// Immutable mapping from stat code to description, one list per population.
/// Built once at startup and passed to whatever needs it.
#[derive(Debug, Clone, Copy)]
pub struct StatCatalog {
    batting: &'static [StatDef],
    pitching: &'static [StatDef],
}

impl Default for StatCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl StatCatalog {
    pub fn new(batting: &'static [StatDef], pitching: &'static [StatDef]) -> Self {
        Self { batting, pitching }
    }

    pub fn standard() -> Self {
        Self::new(BATTING_STATS, PITCHING_STATS)
    }

    /// Stats for a population, in display order.
    pub fn stats(&self, population: Population) -> &'static [StatDef] {
        match population {
            Population::Batter => self.batting,
            Population::Pitcher => self.pitching,
        }
    }

    pub fn describe(&self, population: Population, code: &str) -> Option<&'static StatDef> {
        let code = code.trim();
        self.stats(population)
            .iter()
            .find(|def| def.code.eq_ignore_ascii_case(code))
    }

    /// Validate a ranking key by code (case-insensitive).
    pub fn select(&self, population: Population, code: &str) -> Result<StatSelection, SelectionError> {
        let trimmed = code.trim();
        if is_pseudo_stat(population, trimmed) {
            return Err(SelectionError::NotPerformanceStat {
                code: trimmed.to_string(),
            });
        }
        match self.describe(population, trimmed) {
            Some(def) => Ok(StatSelection {
                population,
                code: def.code,
            }),
            None => Err(SelectionError::UnknownStat {
                population,
                code: trimmed.to_string(),
            }),
        }
    }

    /// Validate a ranking key by its 1-based position in the catalog.
    pub fn select_by_number(
        &self,
        population: Population,
        number: usize,
    ) -> Result<StatSelection, SelectionError> {
        let stats = self.stats(population);
        match number.checked_sub(1).and_then(|i| stats.get(i)) {
            Some(def) => Ok(StatSelection {
                population,
                code: def.code,
            }),
            None => Err(SelectionError::OutOfRange {
                number,
                max: stats.len(),
            }),
        }
    }

    /// Accepts either a code or a 1-based catalog number.
    pub fn select_input(
        &self,
        population: Population,
        input: &str,
    ) -> Result<StatSelection, SelectionError> {
        match input.trim().parse::<usize>() {
            Ok(number) => self.select_by_number(population, number),
            Err(_) => self.select(population, input),
        }
    }
}

/// Identity, salary and playing-time columns are never a ranking key.
fn is_pseudo_stat(population: Population, code: &str) -> bool {
    let pseudo = [
        "Salary",
        SALARY_COLUMN,
        NAME_COLUMN,
        TEAM_COLUMN,
        GAMES_COLUMN,
        population.playing_time_column(),
        "Type",
        "#",
    ];
    pseudo.iter().any(|p| p.eq_ignore_ascii_case(code))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
