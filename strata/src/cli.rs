// strata/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "strata")]
#[command(about = "Incremental review fact loader with post-load data checks", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Overrides for the loader's date window (`reviews` section of the config).
#[derive(Args, Debug, Clone, Default)]
pub struct WindowArgs {
    /// Inclusive lower bound (YYYY-MM-DD). Needs --end-date too.
    #[arg(long, env = "STRATA_START_DATE")]
    pub start_date: Option<String>,

    /// Inclusive upper bound (YYYY-MM-DD). Needs --start-date too.
    #[arg(long, env = "STRATA_END_DATE")]
    pub end_date: Option<String>,

    /// Window used when no explicit bounds are given: high_water_mark | full_history
    #[arg(long)]
    pub default_window: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 🌱 Registers the configured CSV sources as warehouse views
    Seed {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },

    /// 🚀 Appends new reviews to the fact table
    Run {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        #[command(flatten)]
        window: WindowArgs,
    },

    /// 🧪 Runs the data checks against the fact table
    Test {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },

    /// 🏗️  Run then test
    Build {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        #[command(flatten)]
        window: WindowArgs,
    },

    /// 📈 Shows loader state, high-water mark and row count
    Status {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },

    /// 🔍 Inspects a table (schema + sample rows)
    Inspect {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        /// Table name to inspect
        #[arg(long, short)]
        table: String,

        /// Number of sample rows to display
        #[arg(long, default_value = "5")]
        limit: usize,
    },

    /// ⚡ Executes a raw SQL statement (Ad-hoc)
    Query {
        query: String,

        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },

    /// 🧹 Cleans build artifacts (target/ folder)
    Clean {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },
}
