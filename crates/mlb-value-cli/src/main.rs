// mlb-value entry point.
//
// Startup sequence:
// 1. Parse arguments
// 2. Initialize tracing (log to file; stdout carries only the report)
// 3. Load config (bootstrapping config/ from defaults/ on first run)
// 4. Run the requested command

mod cli;
mod report;

use anyhow::{bail, Context};
use clap::Parser;
use cli::{Cli, Command};
use mlb_value_core::browse::{self, SortDirection};
use mlb_value_core::cache::DatasetCache;
use mlb_value_core::catalog::{Population, StatCatalog, StatSelection, MLB_TEAMS};
use mlb_value_core::config::{self, Config};
use mlb_value_core::loader::Dataset;
use mlb_value_core::player::PlayerRow;
use mlb_value_core::refresh;
use mlb_value_core::valuation::{self, leaderboard, rank, rank::Lookup};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let base_dir = match cli.base_dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("failed to read current directory")?,
    };

    init_tracing(&base_dir)?;
    info!("mlb-value starting in {}", base_dir.display());

    let config = config::load_config_in(&base_dir).context("failed to load configuration")?;
    let catalog = StatCatalog::standard();
    let app = App {
        base_dir,
        config,
        catalog,
        cache: DatasetCache::new(catalog),
    };

    match cli.command {
        Command::Stats { population } => {
            print!(
                "{}",
                report::stat_list(population, app.catalog.stats(population))
            );
        }
        Command::Teams => {
            println!("{}", MLB_TEAMS.join(" "));
        }
        Command::Players { population, team } => app.players(population, &team)?,
        Command::Leaderboard {
            population,
            stat,
            limit,
            json,
        } => app.leaderboard(population, &stat, limit, json)?,
        Command::Lookup {
            population,
            stat,
            name,
            team,
        } => app.lookup(population, &stat, &name, team.as_deref())?,
        Command::Browse {
            population,
            search,
            team,
            sort,
            ascending,
        } => app.browse(population, search.as_deref(), team.as_deref(), sort.as_deref(), ascending)?,
        Command::Refresh {
            export_batters,
            export_pitchers,
            end_date,
        } => app.refresh(export_batters, export_pitchers, end_date)?,
    }

    Ok(())
}

struct App {
    base_dir: PathBuf,
    config: Config,
    catalog: StatCatalog,
    cache: DatasetCache,
}

impl App {
    fn data_path(&self, population: Population) -> PathBuf {
        self.base_dir.join(self.config.data.path_for(population))
    }

    fn dataset(&self, population: Population) -> anyhow::Result<Arc<Dataset>> {
        let path = self.data_path(population);
        self.cache
            .get_or_load(&path, population)
            .with_context(|| format!("failed to load {} data", population.plural()))
    }

    fn select(&self, population: Population, stat: &str) -> anyhow::Result<StatSelection> {
        Ok(self.catalog.select_input(population, stat)?)
    }

    fn players(&self, population: Population, team: &str) -> anyhow::Result<()> {
        let dataset = self.dataset(population)?;
        let rows = browse::players_on_team(&dataset.rows, team);
        if rows.is_empty() {
            println!("No {} found for {}", population.plural(), team.trim().to_uppercase());
            return Ok(());
        }
        print!("{}", report::player_table(&rows, population, None));
        Ok(())
    }

    fn leaderboard(
        &self,
        population: Population,
        stat: &str,
        limit: Option<usize>,
        json: bool,
    ) -> anyhow::Result<()> {
        let selection = self.select(population, stat)?;
        let dataset = self.dataset(population)?;
        let ranked = valuation::run_query(&dataset.rows, &selection, &self.config.leaderboard);
        let mut entries = leaderboard::project(&ranked);
        if let Some(n) = limit {
            entries.truncate(n);
        }

        if json {
            let text = serde_json::to_string_pretty(&entries).context("failed to encode leaderboard")?;
            println!("{text}");
        } else if entries.is_empty() {
            println!(
                "No {} meet the {} threshold for {}",
                population.plural(),
                population.playing_time_column(),
                selection.code()
            );
        } else {
            print!("{}", report::leaderboard_table(&entries, selection.code()));
        }
        Ok(())
    }

    fn lookup(
        &self,
        population: Population,
        stat: &str,
        name: &str,
        team: Option<&str>,
    ) -> anyhow::Result<()> {
        let selection = self.select(population, stat)?;
        let dataset = self.dataset(population)?;
        let ranked = valuation::run_query(&dataset.rows, &selection, &self.config.lookup);
        let result = match team {
            Some(team) => rank::lookup_on_team(&ranked, name, team),
            None => rank::lookup(&ranked, name),
        };

        let name = name.trim();
        match result {
            Lookup::Ranked {
                rank,
                stat_value,
                value,
            } => {
                let value = if value.is_nan() {
                    "n/a".to_string()
                } else {
                    format!("{value:.3}")
                };
                println!(
                    "{} ranks #{} of {} qualified {} by {} value ({} {}, value {})",
                    name,
                    rank,
                    ranked.len(),
                    population.plural(),
                    selection.code(),
                    report::format_stat(stat_value),
                    selection.code(),
                    value
                );
            }
            Lookup::NotFound if in_dataset(&dataset, name, team) => {
                println!(
                    "{} does not meet the qualification threshold for {} ({} >= {}, positive salary, {} recorded)",
                    name,
                    selection.code(),
                    population.playing_time_column(),
                    self.config.lookup.thresholds().for_population(population),
                    selection.code()
                );
            }
            Lookup::NotFound => match team {
                Some(team) => println!(
                    "{} is not in the {} dataset for {}",
                    name,
                    population.plural(),
                    team.trim().to_uppercase()
                ),
                None => println!("{} is not in the {} dataset", name, population.plural()),
            },
        }
        Ok(())
    }

    fn browse(
        &self,
        population: Population,
        search: Option<&str>,
        team: Option<&str>,
        sort: Option<&str>,
        ascending: bool,
    ) -> anyhow::Result<()> {
        let dataset = self.dataset(population)?;
        let mut rows: Vec<&PlayerRow> = browse::search_by_name(&dataset.rows, search.unwrap_or(""));
        if let Some(team) = team {
            rows.retain(|r| r.team.eq_ignore_ascii_case(team.trim()));
        }

        let mut extra = None;
        if let Some(column) = sort {
            let direction = if ascending {
                SortDirection::Ascending
            } else {
                SortDirection::Descending
            };
            rows = browse::sort_by_column(&rows, column, direction);
            extra = self.catalog.describe(population, column).map(|def| def.code);
        }

        if rows.is_empty() {
            println!("No matching {}", population.plural());
            return Ok(());
        }
        print!("{}", report::player_table(&rows, population, extra));
        Ok(())
    }

    fn refresh(
        &self,
        export_batters: Option<PathBuf>,
        export_pitchers: Option<PathBuf>,
        end_date: Option<String>,
    ) -> anyhow::Result<()> {
        let exports = [
            (Population::Batter, export_batters),
            (Population::Pitcher, export_pitchers),
        ];
        let local = exports.iter().any(|(_, file)| file.is_some());

        let settings = &self.config.refresh;
        let end_date = match end_date {
            Some(d) => d,
            None => chrono::Local::now().date_naive().format("%Y-%m-%d").to_string(),
        };
        if chrono::NaiveDate::parse_from_str(&end_date, "%Y-%m-%d").is_err() {
            bail!("end date must be YYYY-MM-DD, got `{end_date}`");
        }

        for (population, file) in exports {
            let text = match (file, local) {
                (Some(file), _) => read_export(&file)?,
                // Only the populations given on the command line are refreshed.
                (None, true) => continue,
                (None, false) => {
                    let url = refresh::leaders_url(
                        population,
                        settings.season,
                        &settings.start_date,
                        &end_date,
                    );
                    info!("Fetching {} export: {}", population.plural(), url);
                    refresh::fetch_export(&url, settings)
                        .with_context(|| format!("failed to download {} export", population.plural()))?
                }
            };

            let target = self.data_path(population);
            let rows = refresh::refresh_file(population, &text, &target)
                .with_context(|| format!("failed to refresh {}", target.display()))?;
            self.cache.invalidate(&target);
            println!("Saved {}: {} {}", target.display(), rows, population.plural());
        }
        Ok(())
    }
}

/// Whether the unfiltered rows hold the player, on `team` when one is given.
fn in_dataset(dataset: &Dataset, name: &str, team: Option<&str>) -> bool {
    match team {
        Some(team) => dataset.contains_player(name, team),
        None => dataset.contains_name(name),
    }
}

fn read_export(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read export {}", path.display()))
}

/// Initialize tracing to log to a file so stdout carries only the report.
fn init_tracing(base_dir: &Path) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = base_dir.join("logs");
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create {}", log_dir.display()))?;

    let log_file = std::fs::File::create(log_dir.join("mlb-value.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("mlb_value_cli=info,mlb_value_core=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
