// Season data loading.
//
// Reads the per-season batter/pitcher CSV files. Mandatory columns are
// checked once up front; optional stat columns may be absent entirely, and
// individual cells may be blank.

use crate::catalog::{
    is_known_team, is_multi_team_aggregate, Population, StatCatalog, GAMES_COLUMN, NAME_COLUMN,
    SALARY_COLUMN, TEAM_COLUMN,
};
use crate::player::PlayerRow;
use encoding_rs::{UTF_8, WINDOWS_1252};
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// All rows of one population from one data file.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub population: Population,
    pub rows: Vec<PlayerRow>,
}

impl Dataset {
    pub fn contains_name(&self, name: &str) -> bool {
        let name = name.trim();
        self.rows.iter().any(|r| r.name == name)
    }

    /// Like `contains_name`, restricted to one franchise (case-insensitive).
    pub fn contains_player(&self, name: &str, team: &str) -> bool {
        let name = name.trim();
        let team = team.trim();
        self.rows
            .iter()
            .any(|r| r.name == name && r.team.eq_ignore_ascii_case(team))
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("{path} is missing required column `{column}`")]
    Schema { path: String, column: String },
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Decode file bytes as UTF-8, falling back to Windows-1252 (a superset of
/// the ISO-8859-1 the season files have historically been saved in).
pub(crate) fn decode(bytes: &[u8]) -> String {
    let (text, _, had_errors) = UTF_8.decode(bytes);
    if !had_errors {
        return text.into_owned();
    }
    let (text, _, _) = WINDOWS_1252.decode(bytes);
    text.into_owned()
}

/// Parse a numeric cell. Blank, `NA`, non-numeric and non-finite cells are
/// missing. `$`, `,` and a trailing `%` are ignored.
pub fn parse_number(cell: &str) -> Option<f64> {
    let cleaned: String = cell
        .trim()
        .trim_end_matches('%')
        .chars()
        .filter(|c| *c != '$' && *c != ',' && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Header positions for the columns this population uses.
struct ColumnMap {
    name: usize,
    team: usize,
    salary: usize,
    playing_time: usize,
    games: Option<usize>,
    stats: Vec<(&'static str, usize)>,
}

impl ColumnMap {
    fn resolve(
        headers: &csv::StringRecord,
        population: Population,
        catalog: &StatCatalog,
        source: &str,
    ) -> Result<Self, LoadError> {
        let find = |column: &str| headers.iter().position(|h| h.trim() == column);
        let require = |column: &str| {
            find(column).ok_or_else(|| LoadError::Schema {
                path: source.to_string(),
                column: column.to_string(),
            })
        };

        let name = require(NAME_COLUMN)?;
        let team = require(TEAM_COLUMN)?;
        let salary = require(SALARY_COLUMN)?;
        let playing_time = require(population.playing_time_column())?;
        let games = find(GAMES_COLUMN);

        let stats = catalog
            .stats(population)
            .iter()
            .filter_map(|def| find(def.code).map(|idx| (def.code, idx)))
            .collect();

        Ok(Self {
            name,
            team,
            salary,
            playing_time,
            games,
            stats,
        })
    }
}

// ---------------------------------------------------------------------------
// Reader-based loader (enables testing without temp files)
// ---------------------------------------------------------------------------

/// Load one population from any reader. Only the stat columns `catalog`
/// lists for the population are kept. `source` names the input in errors.
pub fn load_from_reader<R: Read>(
    mut rdr: R,
    population: Population,
    catalog: &StatCatalog,
    source: &str,
) -> Result<Dataset, LoadError> {
    let mut bytes = Vec::new();
    rdr.read_to_end(&mut bytes).map_err(|e| LoadError::Io {
        path: source.to_string(),
        source: e,
    })?;
    let text = decode(&bytes);

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());
    let headers = reader
        .headers()
        .map_err(|e| LoadError::Csv {
            path: source.to_string(),
            source: e,
        })?
        .clone();
    let columns = ColumnMap::resolve(&headers, population, catalog, source)?;

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                warn!("skipping malformed row in {}: {}", source, e);
                continue;
            }
        };
        let cell = |idx: usize| record.get(idx).unwrap_or("").trim();

        let name = cell(columns.name);
        if name.is_empty() {
            warn!("skipping row without a player name in {}", source);
            continue;
        }
        let team = cell(columns.team);
        if is_multi_team_aggregate(team) {
            continue;
        }
        if !is_known_team(team) {
            warn!("skipping {} '{}': unknown team '{}'", population, name, team);
            continue;
        }
        let Some(playing_time) = parse_number(cell(columns.playing_time)) else {
            warn!(
                "skipping {} '{}': missing {}",
                population,
                name,
                population.playing_time_column()
            );
            continue;
        };

        let mut row = PlayerRow::new(name, team, population).with_playing_time(playing_time);
        row.salary_per_season = parse_number(cell(columns.salary));
        row.games = columns.games.and_then(|idx| parse_number(cell(idx)));
        for (code, idx) in &columns.stats {
            if let Some(value) = parse_number(cell(*idx)) {
                row.stats.insert((*code).to_string(), value);
            }
        }
        rows.push(row);
    }

    Ok(Dataset { population, rows })
}

// ---------------------------------------------------------------------------
// Public path-based loaders
// ---------------------------------------------------------------------------

/// Load one population's season file.
pub fn load_dataset(
    path: &Path,
    population: Population,
    catalog: &StatCatalog,
) -> Result<Dataset, LoadError> {
    let source = path.display().to_string();
    let file = std::fs::File::open(path).map_err(|e| LoadError::Io {
        path: source.clone(),
        source: e,
    })?;
    let dataset = load_from_reader(file, population, catalog, &source)?;
    info!(
        "Loaded {} {} from {}",
        dataset.rows.len(),
        population.plural(),
        source
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
