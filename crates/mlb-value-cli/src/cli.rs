// Command-line surface.

use clap::{Parser, Subcommand};
use mlb_value_core::catalog::Population;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "mlb-value")]
#[command(version)]
#[command(about = "Rank MLB batters and pitchers by performance per salary dollar", long_about = None)]
pub struct Cli {
    /// Directory holding defaults/, config/, data/ and logs/ (defaults to the current directory)
    #[arg(long, global = true, env = "MLB_VALUE_HOME")]
    pub base_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the stats a population can be ranked by
    Stats {
        /// batters or pitchers
        population: Population,
    },
    /// List franchise codes
    Teams,
    /// List the players on one team
    Players {
        population: Population,
        /// Franchise code, e.g. NYY
        team: String,
    },
    /// Top players by value for a stat
    Leaderboard {
        population: Population,
        /// Stat code or catalog number
        stat: String,
        /// Show only the first N rows
        #[arg(short = 'n', long)]
        limit: Option<usize>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Where one player ranks by value for a stat
    Lookup {
        population: Population,
        /// Stat code or catalog number
        stat: String,
        /// Full player name as it appears in the data file
        name: String,
        /// Restrict the match to one franchise
        #[arg(long)]
        team: Option<String>,
    },
    /// Show raw season rows, optionally searched and sorted
    Browse {
        population: Population,
        /// Case-insensitive name substring
        #[arg(short, long)]
        search: Option<String>,
        /// Only rows for this franchise
        #[arg(short, long)]
        team: Option<String>,
        /// Column to sort by (Name, Team, Salary, G, PA/IP or a stat code)
        #[arg(long)]
        sort: Option<String>,
        /// Sort ascending instead of descending
        #[arg(long)]
        ascending: bool,
    },
    /// Regenerate the season files from FanGraphs leaders exports
    Refresh {
        /// Use a downloaded batter export instead of fetching
        #[arg(long)]
        export_batters: Option<PathBuf>,
        /// Use a downloaded pitcher export instead of fetching
        #[arg(long)]
        export_pitchers: Option<PathBuf>,
        /// Last day included in the export (YYYY-MM-DD, defaults to today)
        #[arg(long, env = "END_DATE")]
        end_date: Option<String>,
    },
}
