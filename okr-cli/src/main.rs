use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use okr_core::{
    filter_by_category, filter_groups, group_objectives, progress_by_category, recompute_all,
    status_distribution, Objective, ProgressWarning, TimeFilter, TimePeriod,
};
use okr_ingest::{load_objectives_json, parse_sheet_tsv, write_objectives_json, ImportOptions};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod clock;
mod config;
mod render;
mod state;

#[derive(Parser, Debug)]
#[command(name = "okr", version, about = "Objectives & key results tracker")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args, Debug)]
struct Source {
    /// Objectives JSON file (default: from config, else ~/.okr/objectives.json)
    #[arg(long)]
    file: Option<PathBuf>,

    /// Evaluate as of this local time (YYYY-MM-DDTHH:MM) instead of the clock
    #[arg(long)]
    now: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Group objectives by the quarter they start in
    Groups {
        #[command(flatten)]
        source: Source,

        /// all | current-quarter | next-quarter
        #[arg(long, default_value = "all")]
        period: TimePeriod,

        /// all | current | past | future
        #[arg(long, default_value = "all")]
        filter: TimeFilter,

        /// Only objectives in this category
        #[arg(long)]
        category: Option<String>,

        /// Print the groups as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show objective and key result statuses
    Status {
        #[command(flatten)]
        source: Source,
    },

    /// Progress per category and status distribution
    Summary {
        #[command(flatten)]
        source: Source,
    },

    /// Import objectives pasted from a spreadsheet (tab-separated)
    Import {
        /// Path to the TSV export
        #[arg(long)]
        tsv: PathBuf,

        /// Output objectives JSON (default: from config)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Config file management
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write ~/.okr/config.toml with defaults
    Init,
    /// Print the effective configuration
    Show,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let cfg = config::load_config()?;

    match cli.command {
        Command::Groups {
            source,
            period,
            filter,
            category,
            json,
        } => {
            let (objectives, warnings, now) = load(&source, &cfg)?;
            let objectives = filter_by_category(&objectives, category.as_deref());
            let groups = filter_groups(group_objectives(&objectives, period, now), filter);

            if json {
                println!("{}", serde_json::to_string_pretty(&groups)?);
            } else {
                let heading = format!("# Objectives by quarter ({period}, {filter}) as of {}", now.format("%Y-%m-%d %H:%M"));
                print!("{}", render::groups_report(&heading, &groups, &warnings));
            }
        }

        Command::Status { source } => {
            let (objectives, warnings, now) = load(&source, &cfg)?;
            render::print_statuses(&objectives, now);
            render::print_warnings(&warnings);
        }

        Command::Summary { source } => {
            let (objectives, warnings, _now) = load(&source, &cfg)?;
            render::print_summary(&progress_by_category(&objectives), &status_distribution(&objectives));
            render::print_warnings(&warnings);
        }

        Command::Import { tsv, out } => {
            if !tsv.exists() {
                bail!("TSV not found: {} (pass --tsv <path>)", tsv.display());
            }
            let text = std::fs::read_to_string(&tsv).with_context(|| format!("read {}", tsv.display()))?;
            let today = clock::resolve_now(None, &cfg.timezone)?.date();
            let opts = ImportOptions {
                default_category: cfg.default_category(),
                today,
            };

            let objectives = parse_sheet_tsv(&text, &opts).with_context(|| format!("parsing {}", tsv.display()))?;

            let out = match out {
                Some(p) => p,
                None => {
                    state::ensure_okr_home()?;
                    cfg.objectives_path()?
                }
            };
            write_objectives_json(&out, &objectives)?;

            let krs: usize = objectives.iter().map(|o| o.key_results.len()).sum();
            println!("Imported {} objectives ({} key results) from {}", objectives.len(), krs, tsv.display());
            println!("Wrote {}", out.display());
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                println!("# {}\n", config::config_path()?.display());
                println!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
    }

    Ok(())
}

/// Load objectives, resolve `now`, and refresh every derived field.
fn load(source: &Source, cfg: &config::Config) -> Result<(Vec<Objective>, Vec<ProgressWarning>, chrono::NaiveDateTime)> {
    let path = match &source.file {
        Some(p) => p.clone(),
        None => cfg.objectives_path()?,
    };
    if !path.exists() {
        bail!(
            "No objectives found at {}. Run: okr import --tsv <file> (or pass --file)",
            path.display()
        );
    }

    let now = clock::resolve_now(source.now.as_deref(), &cfg.timezone)?;
    let mut objectives = load_objectives_json(&path)?;
    let warnings = recompute_all(&mut objectives, now);
    tracing::debug!(count = objectives.len(), warnings = warnings.len(), "objectives loaded");

    Ok((objectives, warnings, now))
}
