//! buildboard - build and release status board
//!
//! The `buildboard` command renders the status panels of one project:
//!
//! - `releases`: which releases shipped a build, one badge per environment
//! - `builds`: grid of recent build runs
//! - `status`: badge of a single build
//! - `definitions`: the project's build definitions
//! - `snapshot`: save the project's data for offline rendering with `--snapshot`

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use buildboard_core::{
    load_build_grid, load_build_status, load_definitions, load_release_panel,
    render_definitions_text, render_grid_text, render_release_markdown, render_release_text,
    render_status_text, write_report, AggregateOptions, AzureDevOpsClient, BoardSnapshot, BuildId,
    DevOpsConfig, DevOpsSource, LatestRule, LogFormat, MemoryDevOpsSource,
};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::{debug, Level};

#[derive(Parser)]
#[command(name = "buildboard")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Build and release status board", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    /// Organization name
    #[arg(long, global = true, env = "AZURE_DEVOPS_ORG")]
    org: Option<String>,

    /// Project name
    #[arg(long, global = true, env = "AZURE_DEVOPS_PROJECT")]
    project: Option<String>,

    /// Personal access token
    #[arg(long, global = true, env = "AZURE_DEVOPS_PAT", hide_env_values = true)]
    token: Option<String>,

    /// Override the API base URL (on-premises servers)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, default_value = "30")]
    timeout: u64,

    /// Render from a JSON snapshot file instead of calling the REST API
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Write output to this file instead of stdout
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the releases that deployed a build
    Releases {
        /// Build id
        build_id: u32,

        /// Stop after the first release that shipped the build
        #[arg(long)]
        first_release_only: bool,

        /// How to pick the latest deployment of an environment
        #[arg(long, value_enum, default_value = "lowest-id")]
        latest: LatestArg,
    },

    /// Show the grid of recent builds
    Builds {
        /// Maximum number of builds
        #[arg(short, long, default_value = "25")]
        top: u32,
    },

    /// Show the status badge of one build
    Status {
        /// Build id
        build_id: u32,
    },

    /// List build definitions
    Definitions,

    /// Save definitions, builds and deployments to a JSON snapshot file
    Snapshot {
        /// Destination file
        path: PathBuf,

        /// Maximum number of builds to keep
        #[arg(short, long, default_value = "100")]
        top: u32,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Markdown,
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LatestArg {
    /// Lowest deployment id wins
    LowestId,
    /// Most recently queued deployment wins
    Newest,
}

impl From<LatestArg> for LatestRule {
    fn from(arg: LatestArg) -> Self {
        match arg {
            LatestArg::LowestId => LatestRule::LowestId,
            LatestArg::Newest => LatestRule::Newest,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    let log_format = if cli.json {
        LogFormat::Json
    } else {
        LogFormat::Text
    };
    buildboard_core::init_tracing(log_format, level);

    let source = open_source(&cli)?;

    let rendered = match cli.command {
        Commands::Releases {
            build_id,
            first_release_only,
            latest,
        } => {
            let options = AggregateOptions {
                all_releases: !first_release_only,
                latest: latest.into(),
            };
            cmd_releases(source.as_ref(), BuildId(build_id), &options, cli.format).await?
        }
        Commands::Builds { top } => cmd_builds(source.as_ref(), top, cli.format).await?,
        Commands::Status { build_id } => {
            cmd_status(source.as_ref(), BuildId(build_id), cli.format).await?
        }
        Commands::Definitions => cmd_definitions(source.as_ref(), cli.format).await?,
        Commands::Snapshot { path, top } => cmd_snapshot(source.as_ref(), &path, top).await?,
    };

    emit(&rendered, cli.output.as_deref())
}

/// Build the data source: an offline snapshot or the REST client.
fn open_source(cli: &Cli) -> Result<Box<dyn DevOpsSource>> {
    if let Some(path) = &cli.snapshot {
        debug!("Rendering from snapshot {:?}", path);
        let snapshot = BoardSnapshot::load(path)
            .with_context(|| format!("Failed to load snapshot {:?}", path))?;
        return Ok(Box::new(MemoryDevOpsSource::from(snapshot)));
    }

    let mut config = DevOpsConfig::new(
        cli.org.as_deref().unwrap_or_default(),
        cli.project.as_deref().unwrap_or_default(),
    )
    .with_timeout(cli.timeout);
    if let Some(token) = &cli.token {
        config = config.with_token(token);
    }
    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url);
    }

    let client = AzureDevOpsClient::new(config).context("Failed to configure DevOps client")?;
    Ok(Box::new(client))
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    let mut json = serde_json::to_string_pretty(value).context("Failed to serialize panel")?;
    json.push('\n');
    Ok(json)
}

async fn cmd_releases(
    source: &dyn DevOpsSource,
    build_id: BuildId,
    options: &AggregateOptions,
    format: OutputFormat,
) -> Result<String> {
    let panel = load_release_panel(source, build_id, options).await;
    match format {
        OutputFormat::Text => Ok(render_release_text(&panel)),
        OutputFormat::Markdown => Ok(render_release_markdown(&panel)),
        OutputFormat::Json => to_json(&panel),
    }
}

async fn cmd_builds(source: &dyn DevOpsSource, top: u32, format: OutputFormat) -> Result<String> {
    let panel = load_build_grid(source, Some(top)).await;
    match format {
        OutputFormat::Json => to_json(&panel),
        OutputFormat::Text | OutputFormat::Markdown => Ok(render_grid_text(&panel)),
    }
}

async fn cmd_status(
    source: &dyn DevOpsSource,
    build_id: BuildId,
    format: OutputFormat,
) -> Result<String> {
    let state = load_build_status(source, build_id).await;
    match format {
        OutputFormat::Json => to_json(&state),
        OutputFormat::Text | OutputFormat::Markdown => Ok(render_status_text(build_id, &state)),
    }
}

async fn cmd_definitions(source: &dyn DevOpsSource, format: OutputFormat) -> Result<String> {
    let state = load_definitions(source).await;
    match format {
        OutputFormat::Json => to_json(&state),
        OutputFormat::Text | OutputFormat::Markdown => Ok(render_definitions_text(&state)),
    }
}

async fn cmd_snapshot(source: &dyn DevOpsSource, path: &Path, top: u32) -> Result<String> {
    let snapshot = BoardSnapshot::capture(source, Some(top))
        .await
        .context("Failed to fetch project data")?;
    snapshot
        .save(path)
        .with_context(|| format!("Failed to write snapshot {:?}", path))?;
    Ok(format!(
        "Saved {} definition(s), {} build(s), {} deployment(s) to {:?}\n",
        snapshot.definitions.len(),
        snapshot.builds.len(),
        snapshot.deployments.len(),
        path
    ))
}

/// Print to stdout, or write to `output` when given.
fn emit(rendered: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            write_report(path, rendered)
                .with_context(|| format!("Failed to write output {:?}", path))?;
            println!("Wrote {:?}", path);
        }
        None => print!("{}", rendered),
    }
    Ok(())
}
