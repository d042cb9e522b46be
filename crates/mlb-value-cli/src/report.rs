// Plain-text rendering for terminal output.

use mlb_value_core::catalog::{Population, StatDef};
use mlb_value_core::player::PlayerRow;
use mlb_value_core::valuation::leaderboard::LeaderboardEntry;
use std::fmt::Write;

/// `$1,234,567`, rounded to whole dollars.
pub fn format_salary(salary: f64) -> String {
    let dollars = salary.round();
    let digits = format!("{:.0}", dollars.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if dollars < 0.0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

/// Counting stats print as integers, rates with up to three decimals.
pub fn format_stat(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        let text = format!("{value:.3}");
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

pub fn stat_list(population: Population, stats: &[StatDef]) -> String {
    let mut out = format!("{} stats:\n", population);
    for (i, def) in stats.iter().enumerate() {
        let _ = writeln!(out, "{:>3}. {:<5} {} - {}", i + 1, def.code, def.name, def.description);
    }
    out
}

pub fn leaderboard_table(entries: &[LeaderboardEntry], stat: &str) -> String {
    let mut out = format!(
        "{:>4}  {:<28} {:<4} {:>14} {:>8}\n",
        "Rank", "Name", "Team", "Salary", stat
    );
    for e in entries {
        let _ = writeln!(
            out,
            "{:>4}  {:<28} {:<4} {:>14} {:>8}",
            e.rank,
            e.name,
            e.team,
            format_salary(e.salary),
            format_stat(e.stat_value)
        );
    }
    out
}

/// One line per row: identity, playing time, games, salary, then `extra`
/// (usually the sort column) when given.
pub fn player_table(rows: &[&PlayerRow], population: Population, extra: Option<&str>) -> String {
    let pt = population.playing_time_column();
    let mut out = format!(
        "{:<28} {:<4} {:>7} {:>4} {:>14}",
        "Name", "Team", pt, "G", "Salary"
    );
    if let Some(col) = extra {
        let _ = write!(out, " {:>8}", col);
    }
    out.push('\n');

    for row in rows {
        let games = row.games.map(format_stat).unwrap_or_else(|| "-".into());
        let salary = row
            .salary_per_season
            .map(format_salary)
            .unwrap_or_else(|| "-".into());
        let _ = write!(
            out,
            "{:<28} {:<4} {:>7} {:>4} {:>14}",
            row.name,
            row.team,
            format_stat(row.playing_time),
            games,
            salary
        );
        if let Some(col) = extra {
            let cell = row.stat(col).map(format_stat).unwrap_or_else(|| "-".into());
            let _ = write!(out, " {:>8}", cell);
        }
        out.push('\n');
    }
    out
}
