// Season file refresh.
//
// Pulls the FanGraphs season-to-date leaders export, keeps only the columns
// the loader reads, carries salaries over from the previous file by
// (Name, Team), and rewrites the file in its fixed column order.

use crate::catalog::{is_multi_team_aggregate, Population, NAME_COLUMN, SALARY_COLUMN, TEAM_COLUMN};
use crate::config::RefreshConfig;
use crate::loader::decode;
use std::collections::HashMap;
use std::io::{Read, Write};
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

const LEADERS_URL: &str = "https://www.fangraphs.com/leaders/major-league";

const BATTERS_ORDER: &[&str] = &[
    "#", "Name", "Team", "Type", "PA", "G", "WAR", "SLG", "OBP", "HR", "RBI", "SB", "R", "BB%",
    "K%", "AVG", SALARY_COLUMN,
];

const PITCHERS_ORDER: &[&str] = &[
    "#", "Name", "Team", "Type", "W", "L", "SV", "G", "IP", "K/9", "BB/9", "HR/9", "ERA", "FIP",
    "WAR", SALARY_COLUMN,
];

/// Column order of a season file.
pub fn column_order(population: Population) -> &'static [&'static str] {
    match population {
        Population::Batter => BATTERS_ORDER,
        Population::Pitcher => PITCHERS_ORDER,
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum RefreshError {
    #[error("failed to fetch {url} after {attempts} attempts: {source}")]
    Fetch {
        url: String,
        attempts: u32,
        source: reqwest::Error,
    },

    #[error("failed to access {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("export is missing required column `{0}`")]
    Schema(String),
}

// ---------------------------------------------------------------------------
// Export rows
// ---------------------------------------------------------------------------

/// One player from a leaders export, reduced to the season-file columns.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRow {
    pub name: String,
    pub team: String,
    /// Raw cell text keyed by season-file column name.
    pub values: HashMap<String, String>,
    pub salary: Option<String>,
}

// ---------------------------------------------------------------------------
// Fetching
// ---------------------------------------------------------------------------

/// FanGraphs leaders export URL for one population and date range.
pub fn leaders_url(population: Population, season: i32, start_date: &str, end_date: &str) -> String {
    let stats = match population {
        Population::Batter => "bat",
        Population::Pitcher => "pit",
    };
    format!(
        "{LEADERS_URL}?pageitems=2000000000&startdate={start_date}&enddate={end_date}\
         &season={season}&season1={season}&ind=0&team=0&pos=all&type=8&stats={stats}\
         &qual=1&month=1000&csv=1"
    )
}

/// Download an export, retrying with exponential backoff.
pub fn fetch_export(url: &str, settings: &RefreshConfig) -> Result<String, RefreshError> {
    let attempts = settings.retries.max(1);
    let fetch_error = |source: reqwest::Error| RefreshError::Fetch {
        url: url.to_string(),
        attempts,
        source,
    };

    let client = reqwest::blocking::Client::builder()
        .user_agent(settings.user_agent.clone())
        .timeout(Duration::from_secs(settings.timeout_secs))
        .build()
        .map_err(fetch_error)?;

    let mut attempt = 1;
    loop {
        let result = client
            .get(url)
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.text());
        match result {
            Ok(body) => return Ok(body),
            Err(e) if attempt < attempts => {
                let delay = settings.backoff_secs.powi(attempt as i32);
                warn!(
                    "fetch attempt {}/{} for {} failed: {}; retrying in {:.1}s",
                    attempt, attempts, url, e, delay
                );
                std::thread::sleep(Duration::from_secs_f64(delay));
                attempt += 1;
            }
            Err(e) => return Err(fetch_error(e)),
        }
    }
}

// ---------------------------------------------------------------------------
// Normalize / merge / write
// ---------------------------------------------------------------------------

/// Reduce an export to season-file columns and drop multi-team aggregates.
/// Export columns the season file does not use are ignored; season-file
/// columns the export lacks stay empty.
pub fn normalize_export<R: Read>(rdr: R, population: Population) -> Result<Vec<ExportRow>, RefreshError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(rdr);
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();
    let position = |column: &str| headers.iter().position(|h| h == column);
    let name_idx = position(NAME_COLUMN).ok_or_else(|| RefreshError::Schema(NAME_COLUMN.into()))?;
    let team_idx = position(TEAM_COLUMN).ok_or_else(|| RefreshError::Schema(TEAM_COLUMN.into()))?;

    let kept: Vec<(&'static str, usize)> = column_order(population)
        .iter()
        .filter(|c| !matches!(**c, "#" | "Type" | NAME_COLUMN | TEAM_COLUMN | SALARY_COLUMN))
        .filter_map(|c| position(*c).map(|idx| (*c, idx)))
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let cell = |idx: usize| record.get(idx).unwrap_or("").trim().to_string();
        let team = cell(team_idx);
        if is_multi_team_aggregate(&team) {
            continue;
        }
        let values = kept
            .iter()
            .map(|(column, idx)| ((*column).to_string(), cell(*idx)))
            .collect();
        rows.push(ExportRow {
            name: cell(name_idx),
            team,
            values,
            salary: None,
        });
    }
    Ok(rows)
}

/// Salaries from a previous season file, keyed by trimmed (Name, Team).
/// A file without a salary column yields an empty map.
pub fn read_salaries<R: Read>(mut rdr: R) -> Result<HashMap<(String, String), String>, RefreshError> {
    let mut bytes = Vec::new();
    rdr.read_to_end(&mut bytes).map_err(|e| RefreshError::Io {
        path: "previous season file".into(),
        source: e,
    })?;
    let text = decode(&bytes);
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());
    let headers = reader.headers()?.clone();
    let position = |column: &str| headers.iter().position(|h| h.trim() == column);
    let (Some(name_idx), Some(team_idx), Some(salary_idx)) = (
        position(NAME_COLUMN),
        position(TEAM_COLUMN),
        position(SALARY_COLUMN),
    ) else {
        return Ok(HashMap::new());
    };

    let mut salaries = HashMap::new();
    for record in reader.records() {
        let record = record?;
        let salary = record.get(salary_idx).unwrap_or("").trim();
        if salary.is_empty() {
            continue;
        }
        let key = (
            record.get(name_idx).unwrap_or("").trim().to_string(),
            record.get(team_idx).unwrap_or("").trim().to_string(),
        );
        salaries.entry(key).or_insert_with(|| salary.to_string());
    }
    Ok(salaries)
}

/// Attach previously recorded salaries; returns how many rows matched.
pub fn merge_salaries(rows: &mut [ExportRow], salaries: &HashMap<(String, String), String>) -> usize {
    let mut matched = 0;
    for row in rows.iter_mut() {
        let key = (row.name.trim().to_string(), row.team.trim().to_string());
        row.salary = salaries.get(&key).cloned();
        if row.salary.is_some() {
            matched += 1;
        }
    }
    matched
}

/// Write rows in the season file's column order, numbering them from 1.
pub fn write_ordered<W: Write>(
    rows: &[ExportRow],
    population: Population,
    writer: W,
) -> Result<(), RefreshError> {
    let order = column_order(population);
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(order)?;
    for (i, row) in rows.iter().enumerate() {
        let record: Vec<String> = order
            .iter()
            .map(|column| match *column {
                "#" => (i + 1).to_string(),
                "Type" => population.label().to_string(),
                NAME_COLUMN => row.name.clone(),
                TEAM_COLUMN => row.team.clone(),
                SALARY_COLUMN => row.salary.clone().unwrap_or_default(),
                other => row.values.get(other).cloned().unwrap_or_default(),
            })
            .collect();
        wtr.write_record(&record)?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Regenerate one season file from an export, preserving salaries already
/// recorded in `target`. Returns the number of rows written.
pub fn refresh_file(population: Population, export: &str, target: &Path) -> Result<usize, RefreshError> {
    let io_err = |source: std::io::Error| RefreshError::Io {
        path: target.display().to_string(),
        source,
    };

    let mut rows = normalize_export(export.as_bytes(), population)?;
    let salaries = if target.exists() {
        read_salaries(std::fs::File::open(target).map_err(io_err)?)?
    } else {
        HashMap::new()
    };
    let matched = merge_salaries(&mut rows, &salaries);

    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    // Write beside the target and swap in, so readers never see a partial file.
    let tmp = target.with_extension("csv.tmp");
    let file = std::fs::File::create(&tmp).map_err(io_err)?;
    write_ordered(&rows, population, std::io::BufWriter::new(file))?;
    std::fs::rename(&tmp, target).map_err(io_err)?;

    info!(
        "Saved {}: {} rows ({} with salary)",
        target.display(),
        rows.len(),
        matched
    );
    Ok(rows.len())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
