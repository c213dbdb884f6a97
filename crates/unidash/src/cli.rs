use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};
use unidash_core::{export_frame, Dashboard, DatasetSnapshot, ExportFormat, Selection, View};

use crate::api::{self, AppState};
use crate::config::{AppConfig, LogFormat, Overrides};
use crate::render;

#[derive(Parser, Debug)]
#[command(author, version, about = "University admissions and enrollment dashboard data", long_about = None)]
pub struct Cli {
    /// TOML config file (defaults to ./unidash.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Source CSV file
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    /// Log output format
    #[arg(long, global = true, value_enum)]
    pub log_format: Option<LogFormat>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the dashboard views for a selection
    Summary(SummaryArgs),
    /// Write one view to a CSV or Parquet file
    Export(ExportArgs),
    /// Serve the views as a read-only JSON API
    Serve(ServeArgs),
}

/// Comma-separated filters. Leave a flag out to keep every value; pass it
/// empty (`--years ""`) to select nothing.
#[derive(Args, Debug, Default, Clone)]
pub struct SelectionArgs {
    #[arg(long)]
    pub years: Option<String>,
    #[arg(long)]
    pub terms: Option<String>,
    #[arg(long)]
    pub departments: Option<String>,
}

#[derive(Args, Debug)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,
    /// Print the dashboard as JSON instead of tables
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// One of: records, totals, retention, satisfaction, departments, terms
    pub view: View,
    #[arg(short, long)]
    pub output: PathBuf,
    /// csv or parquet; guessed from the output extension when omitted
    #[arg(long)]
    pub format: Option<ExportFormat>,
    #[command(flatten)]
    pub selection: SelectionArgs,
}

#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Address to listen on
    #[arg(long)]
    pub bind: Option<SocketAddr>,
}

impl Cli {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            config_path: self.config.clone(),
            data_path: self.data.clone(),
            bind: match &self.command {
                Command::Serve(args) => args.bind,
                _ => None,
            },
            log_format: self.log_format,
        }
    }
}

impl SelectionArgs {
    pub fn to_selection(&self, config: &AppConfig) -> Result<Selection> {
        let selection = Selection::parse_lists(
            self.years.as_deref(),
            self.terms.as_deref(),
            self.departments.as_deref(),
        )
        .context("invalid selection")?;

        Ok(match (&self.departments, &config.departments) {
            (None, Some(defaults)) => selection.with_departments(defaults.iter().copied()),
            _ => selection,
        })
    }
}

fn load_snapshot(config: &AppConfig) -> Result<DatasetSnapshot> {
    DatasetSnapshot::load(&config.data_path)
        .with_context(|| format!("failed to load dataset from '{}'", config.data_path.display()))
}

pub async fn run(command: Command, config: AppConfig) -> Result<()> {
    match command {
        Command::Summary(args) => handle_summary(args, &config),
        Command::Export(args) => handle_export(args, &config),
        Command::Serve(_) => handle_serve(&config).await,
    }
}

fn handle_summary(args: SummaryArgs, config: &AppConfig) -> Result<()> {
    let snapshot = load_snapshot(config)?;
    let selection = args.selection.to_selection(config)?;
    let dashboard = Dashboard::build(&snapshot, &selection);

    if dashboard.record_count == 0 {
        warn!("Selection matched no records");
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&dashboard)?);
    } else {
        print!("{}", render::render_dashboard(&dashboard));
    }
    Ok(())
}

fn handle_export(args: ExportArgs, config: &AppConfig) -> Result<()> {
    let snapshot = load_snapshot(config)?;
    let selection = args.selection.to_selection(config)?;
    let format = args
        .format
        .unwrap_or_else(|| ExportFormat::from_path(&args.output));

    let mut df = args
        .view
        .frame(&snapshot, &selection)
        .with_context(|| format!("failed to build {} view", args.view))?;
    export_frame(&mut df, &args.output, format)
        .with_context(|| format!("failed to export {} view", args.view))?;

    println!(
        "Wrote {} rows of {} to {}",
        df.height(),
        args.view,
        args.output.display()
    );
    Ok(())
}

async fn handle_serve(config: &AppConfig) -> Result<()> {
    let snapshot = load_snapshot(config)?;
    info!(records = snapshot.len(), "Serving dataset snapshot");

    let state = AppState::new(snapshot).with_default_departments(config.departments.clone());
    api::serve(state, config.bind).await
}
