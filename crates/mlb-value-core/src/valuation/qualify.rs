// Qualification filter: minimum playing time and data completeness.

use crate::catalog::{Population, StatSelection};
use crate::player::PlayerRow;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

/// Inclusive minimum playing time per population.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Minimum plate appearances for batters.
    pub min_pa: f64,
    /// Minimum innings pitched for pitchers.
    pub min_ip: f64,
}

impl Thresholds {
    pub fn new(min_pa: f64, min_ip: f64) -> Self {
        Self { min_pa, min_ip }
    }

    pub fn for_population(&self, population: Population) -> f64 {
        match population {
            Population::Batter => self.min_pa,
            Population::Pitcher => self.min_ip,
        }
    }
}

// ---------------------------------------------------------------------------
// Qualified rows
// ---------------------------------------------------------------------------

/// A row that passed qualification for one stat selection, carrying the
/// salary and stat value the scorer needs. Built by `qualify` and `filter`.
#[derive(Debug, Clone, Copy)]
pub struct QualifiedRow<'a> {
    pub player: &'a PlayerRow,
    pub chosen_stat: &'static str,
    pub salary: f64,
    pub stat_value: f64,
}

/// Check a single row. Returns `None` if the row is of another population,
/// has no positive salary, lacks the chosen stat, or is below the
/// playing-time threshold.
pub fn qualify<'a>(
    row: &'a PlayerRow,
    selection: &StatSelection,
    thresholds: &Thresholds,
) -> Option<QualifiedRow<'a>> {
    let population = selection.population();
    if row.population != population {
        return None;
    }
    let salary = row.positive_salary()?;
    let stat_value = row.stat(selection.code())?;
    // Written so that a NaN playing time fails the check.
    if !(row.playing_time >= thresholds.for_population(population)) {
        return None;
    }
    Some(QualifiedRow {
        player: row,
        chosen_stat: selection.code(),
        salary,
        stat_value,
    })
}

/// Keep the qualifying rows, in source order. An empty result is valid.
pub fn filter<'a>(
    rows: &'a [PlayerRow],
    selection: &StatSelection,
    thresholds: &Thresholds,
) -> Vec<QualifiedRow<'a>> {
    rows.iter()
        .filter_map(|row| qualify(row, selection, thresholds))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StatCatalog;

    fn batter(name: &str, pa: f64, salary: Option<f64>, hr: Option<f64>) -> PlayerRow {
        let mut row = PlayerRow::new(name, "NYY", Population::Batter).with_playing_time(pa);
        row.salary_per_season = salary;
        if let Some(hr) = hr {
            row = row.with_stat("HR", hr);
        }
        row
    }

    fn hr() -> StatSelection {
        StatCatalog::standard()
            .select(Population::Batter, "HR")
            .unwrap()
    }

    fn names(rows: &[QualifiedRow<'_>]) -> Vec<String> {
        rows.iter().map(|q| q.player.name.clone()).collect()
    }

    #[test]
    fn threshold_is_inclusive() {
        let rows = vec![
            batter("Exactly", 20.0, Some(1.0e6), Some(3.0)),
            batter("Below", 19.0, Some(1.0e6), Some(3.0)),
        ];
        let out = filter(&rows, &hr(), &Thresholds::new(20.0, 5.0));
        assert_eq!(names(&out), vec!["Exactly"]);
    }

    #[test]
    fn nan_playing_time_never_qualifies() {
        let rows = vec![
            batter("Unknown", f64::NAN, Some(1.0e6), Some(3.0)),
            batter("Known", 60.0, Some(1.0e6), Some(3.0)),
        ];
        let out = filter(&rows, &hr(), &Thresholds::new(50.0, 10.0));
        assert_eq!(names(&out), vec!["Known"]);
    }

    #[test]
    fn salary_must_be_present_and_positive() {
        let rows = vec![
            batter("Missing", 100.0, None, Some(3.0)),
            batter("Zero", 100.0, Some(0.0), Some(3.0)),
            batter("Paid", 100.0, Some(760_000.0), Some(3.0)),
        ];
        let out = filter(&rows, &hr(), &Thresholds::new(20.0, 5.0));
        assert_eq!(names(&out), vec!["Paid"]);
        assert!((out[0].salary - 760_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_stat_excluded_but_zero_stat_kept() {
        let rows = vec![
            batter("NoHR", 100.0, Some(1.0e6), None),
            batter("ZeroHR", 100.0, Some(1.0e6), Some(0.0)),
        ];
        let out = filter(&rows, &hr(), &Thresholds::new(20.0, 5.0));
        assert_eq!(names(&out), vec!["ZeroHR"]);
        assert_eq!(out[0].stat_value, 0.0);
        assert_eq!(out[0].chosen_stat, "HR");
    }

    #[test]
    fn pitchers_use_innings_threshold() {
        let era = StatCatalog::standard()
            .select(Population::Pitcher, "ERA")
            .unwrap();
        let rows = vec![
            PlayerRow::new("Starter", "SEA", Population::Pitcher)
                .with_playing_time(10.0)
                .with_salary(1.0e6)
                .with_stat("ERA", 3.1),
            PlayerRow::new("Opener", "SEA", Population::Pitcher)
                .with_playing_time(4.2)
                .with_salary(1.0e6)
                .with_stat("ERA", 2.0),
        ];
        let out = filter(&rows, &era, &Thresholds::new(500.0, 5.0));
        assert_eq!(names(&out), vec!["Starter"]);
    }

    #[test]
    fn other_population_never_qualifies() {
        let war = StatCatalog::standard()
            .select(Population::Batter, "WAR")
            .unwrap();
        let rows = vec![PlayerRow::new("Arm", "SEA", Population::Pitcher)
            .with_playing_time(200.0)
            .with_salary(1.0e6)
            .with_stat("WAR", 5.0)];
        assert!(filter(&rows, &war, &Thresholds::new(1.0, 1.0)).is_empty());
    }

    #[test]
    fn preserves_source_order() {
        let rows = vec![
            batter("C", 30.0, Some(1.0e6), Some(1.0)),
            batter("A", 30.0, Some(1.0e6), Some(9.0)),
            batter("B", 30.0, Some(1.0e6), Some(5.0)),
        ];
        let out = filter(&rows, &hr(), &Thresholds::new(20.0, 5.0));
        assert_eq!(names(&out), vec!["C", "A", "B"]);
    }

    #[test]
    fn raising_threshold_never_grows_qualifying_set() {
        let rows: Vec<PlayerRow> = (0..40)
            .map(|i| batter(&format!("P{i}"), (i * 7) as f64, Some(1.0e6), Some(1.0)))
            .collect();
        let mut previous = usize::MAX;
        for min_pa in [0.0, 20.0, 50.0, 100.0, 250.0, 1000.0] {
            let n = filter(&rows, &hr(), &Thresholds::new(min_pa, 5.0)).len();
            assert!(n <= previous, "threshold {min_pa} grew the set");
            previous = n;
        }
    }

    #[test]
    fn empty_input_is_empty_output() {
        assert!(filter(&[], &hr(), &Thresholds::new(20.0, 5.0)).is_empty());
    }
}
