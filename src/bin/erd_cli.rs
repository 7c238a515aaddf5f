//! ERD Command Line Interface
//!
//! Lays out a schema ERD from a payload file or the migration backend.
//!
//! # Usage
//!
//! ```bash
//! # Positions as JSON from a saved payload
//! erd_cli layout --input target_erd.json --format json
//!
//! # SVG straight from the backend, filtered to referral tables and neighbours
//! erd_cli layout --domain target --filter "ref, rtt" -F svg -o erd.svg
//!
//! # Let the backend narrow the payload to PMI tables first
//! erd_cli tables --domain source --table-filter pmi
//!
//! # Relationship list for the current selection
//! cat source_erd.json | erd_cli relationships --input - --density compact
//!
//! # Table names for a filter picker
//! erd_cli tables --input target_erd.json
//! ```

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;

use erd_layout::{ApiClient, Density, ErdConfig, ErdExplorer, ErdGraph, ErdView, SchemaDomain};

#[derive(Parser)]
#[command(name = "erd_cli")]
#[command(version = "0.1.0")]
#[command(about = "Select and lay out schema ERDs from the migration control plane")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// ERD payload file ({nodes, edges}); "-" reads stdin. Fetched from the API when omitted
    #[arg(long, short, global = true)]
    input: Option<PathBuf>,

    /// Backend base URL (overrides ERD_API_URL / config)
    #[arg(long, global = true)]
    url: Option<String>,

    /// Schema domain to fetch: source or target
    #[arg(long, global = true, value_parser = parse_domain)]
    domain: Option<SchemaDomain>,

    /// Table filter tokens (comma, space, / or | separated)
    #[arg(long, short, global = true, default_value = "")]
    filter: String,

    /// Table-name substring applied by the backend before selection (API input only)
    #[arg(long, global = true)]
    table_filter: Option<String>,

    /// Layout density: compact, normal or sparse
    #[arg(long, short, global = true, value_parser = parse_density)]
    density: Option<Density>,

    /// Maximum nodes to lay out
    #[arg(long, global = true)]
    max_nodes: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Svg,
    Text,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute positions for the selected subgraph
    Layout {
        #[arg(long, short = 'F', default_value = "text", value_enum)]
        format: OutputFormat,

        /// Write to a file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// List relationships between the selected tables
    Relationships {
        /// Maximum rows (defaults to config max_relationship_rows)
        #[arg(long)]
        limit: Option<usize>,

        /// Output rows as JSON
        #[arg(long)]
        json: bool,
    },

    /// List all table names, sorted
    Tables,
}

fn parse_domain(s: &str) -> Result<SchemaDomain, String> {
    s.parse().map_err(|e: erd_layout::ErdError| e.to_string())
}

fn parse_density(s: &str) -> Result<Density, String> {
    s.parse().map_err(|e: erd_layout::ErdError| e.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout carries only JSON/SVG
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = ErdConfig::from_env().context("Failed to load ERD configuration")?;
    if let Some(url) = &cli.url {
        config.api_base_url = url.clone();
    }
    if let Some(domain) = cli.domain {
        config.domain = domain;
    }
    if let Some(density) = cli.density {
        config.density = density;
    }
    if let Some(max_nodes) = cli.max_nodes {
        config.max_nodes = max_nodes;
    }

    let graph = load_graph(cli.input.as_deref(), cli.table_filter.as_deref(), &config).await?;
    let mut explorer = ErdExplorer::from_config(graph, &config);
    explorer.set_filter(cli.filter.as_str());

    match cli.command {
        Commands::Layout { format, output } => {
            let view = explorer.view();
            let rendered = render_layout(&view, format)?;
            match output {
                Some(path) => std::fs::write(&path, rendered)
                    .with_context(|| format!("Failed to write {}", path.display()))?,
                None => io::stdout().write_all(rendered.as_bytes())?,
            }
        }
        Commands::Relationships { limit, json } => {
            let view = explorer.view();
            let rows = view.relationship_rows(limit.unwrap_or(config.max_relationship_rows));
            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                println!("{}", view.summary().dimmed());
                for row in rows {
                    println!(
                        "{:>4}  {} {} {}  {}  {}  {}",
                        row.index,
                        row.source.cyan(),
                        "->".dimmed(),
                        row.target.cyan(),
                        row.field.bold(),
                        row.cardinality.yellow(),
                        row.confidence,
                    );
                }
            }
        }
        Commands::Tables => {
            for table in explorer.table_options() {
                println!("{table}");
            }
        }
    }

    Ok(())
}

async fn load_graph(
    input: Option<&Path>,
    table_filter: Option<&str>,
    config: &ErdConfig,
) -> Result<ErdGraph> {
    match input {
        Some(path) if path == Path::new("-") => {
            ErdGraph::from_reader(io::stdin().lock()).context("Failed to parse ERD payload from stdin")
        }
        Some(path) => {
            let file = File::open(path).with_context(|| format!("Failed to read {}", path.display()))?;
            ErdGraph::from_reader(BufReader::new(file))
                .with_context(|| format!("Failed to parse {}", path.display()))
        }
        None => {
            let client = ApiClient::new(&config.api_base_url);
            client.get_erd(config.domain, table_filter).await.with_context(|| {
                format!(
                    "Failed to fetch {} ERD from {}",
                    config.domain,
                    client.base_url()
                )
            })
        }
    }
}

fn render_layout(view: &ErdView, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(view)? + "\n",
        OutputFormat::Svg => view.to_svg()?,
        OutputFormat::Text => {
            let mut out = format!("{}\n", view.summary().bold());
            out.push_str(&format!(
                "canvas {:.0} x {:.0}, density {}\n",
                view.width, view.height, view.density
            ));
            for node in &view.nodes {
                if let Some(p) = view.positions.get(&node.id) {
                    out.push_str(&format!(
                        "{:<32} {:>8.1} {:>8.1}  cols: {}\n",
                        node.id.green(),
                        p.x,
                        p.y,
                        node.column_count
                    ));
                }
            }
            out
        }
    })
}
