// Value scorer: relates a chosen performance stat to salary and playing time.

use crate::player::PlayerRow;
use crate::valuation::qualify::QualifiedRow;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Scores are scaled up so that per-dollar figures read as whole numbers.
pub const VALUE_SCALE: f64 = 1_000_000.0;

/// Which value formula to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Formula {
    /// `stat / salary * playing_time * 1e6`
    Simple,
    /// `stat * ln(1 + playing_time) / (sqrt(salary) * ln(1 + games)) * 1e6`
    LogDampened,
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Formula::Simple => f.write_str("simple"),
            Formula::LogDampened => f.write_str("log-dampened"),
        }
    }
}

/// A qualified row with its value for one stat and formula.
#[derive(Debug, Clone, Copy)]
pub struct ScoredRow<'a> {
    pub player: &'a PlayerRow,
    pub chosen_stat: &'static str,
    pub stat_value: f64,
    pub value: f64,
}

// ---------------------------------------------------------------------------
// Formulas
// ---------------------------------------------------------------------------

/// Playing-time weighted stat per dollar. `salary` must be > 0.
pub fn simple_value(stat: f64, salary: f64, playing_time: f64) -> f64 {
    stat / salary * playing_time * VALUE_SCALE
}

/// Log-dampened stat per square-root dollar.
///
/// `ln(1 + x)` keeps zero playing time finite (the numerator is then 0).
/// Without a positive games count the value is undefined and comes back as
/// NaN, which `rank` orders after every real value. `salary` must be > 0.
pub fn log_dampened_value(stat: f64, salary: f64, playing_time: f64, games: Option<f64>) -> f64 {
    let Some(games_factor) = games.map(f64::ln_1p).filter(|g| *g > 0.0) else {
        return f64::NAN;
    };
    (stat * playing_time.ln_1p()) / (salary.sqrt() * games_factor) * VALUE_SCALE
}

impl Formula {
    pub fn apply(self, row: &QualifiedRow<'_>) -> f64 {
        let player = row.player;
        match self {
            Formula::Simple => simple_value(row.stat_value, row.salary, player.playing_time),
            Formula::LogDampened => log_dampened_value(
                row.stat_value,
                row.salary,
                player.playing_time,
                player.games,
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Score every qualified row, preserving order. Inputs are not modified.
pub fn score<'a>(rows: &[QualifiedRow<'a>], formula: Formula) -> Vec<ScoredRow<'a>> {
    rows.iter()
        .map(|q| ScoredRow {
            player: q.player,
            chosen_stat: q.chosen_stat,
            stat_value: q.stat_value,
            value: formula.apply(q),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
