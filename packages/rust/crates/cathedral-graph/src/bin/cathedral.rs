#![allow(missing_docs)]

use anyhow::{Context, Result, bail};
use cathedral_graph::link_graph::{
    DEFAULT_MOST_CONNECTED_LIMIT, GardenRuntimeConfig, resolve_garden_runtime,
    set_garden_config_override,
};
use cathedral_graph::{KnowledgeGarden, NodeStage, highlight_query};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::json;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "cathedral",
    about = "Cathedral link-graph CLI for a markdown digital garden",
    arg_required_else_help = true
)]
struct Cli {
    /// Content root directory (overrides `garden.content_root`).
    #[arg(long, short = 'r', value_name = "DIR", global = true)]
    root: Option<PathBuf>,

    /// Explicit garden config file path (for example: `.config/cathedral/cathedral.yaml`).
    ///
    /// This overrides the default user settings path resolution.
    #[arg(long = "conf", short = 'c', value_name = "FILE", global = true)]
    config_file: Option<PathBuf>,

    /// Exclude these directory names globally (repeatable).
    #[arg(long = "exclude-dir", value_name = "DIR", global = true)]
    exclude_dirs: Vec<String>,

    /// Debug logging (unless `RUST_LOG` is set).
    #[arg(long, short = 'v', default_value_t = false, global = true)]
    verbose: bool,

    /// Output format.
    #[arg(long, short = 'o', value_enum, default_value_t = OutputFormat::Json, global = true)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every note slug.
    Slugs,
    /// Print one parsed note.
    Node { slug: String },
    /// Most recently modified public notes.
    Recent {
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Public notes carrying a tag.
    Tag { tag: String },
    /// Public notes at a growth stage.
    Stage {
        #[arg(value_enum)]
        stage: StageArg,
    },
    /// Search notes (`stage:<s>`, `tag:<t>`, or free text).
    Search {
        query: String,
        /// Add `<mark>`-highlighted title and excerpt to each hit.
        #[arg(long, default_value_t = false)]
        highlight: bool,
    },
    /// Full backlink map (target -> sources).
    Backlinks,
    /// Backlinks, forward links, and mutual links of a note.
    Connections { slug: String },
    /// Notes sharing the most neighbours with a note.
    Related {
        slug: String,
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Counts and averages over public notes.
    Stats,
    /// Graph projection for visualization.
    Graph {
        /// Size of the most-connected ranking.
        #[arg(long = "top", default_value_t = DEFAULT_MOST_CONNECTED_LIMIT)]
        top: usize,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Pretty,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StageArg {
    Seed,
    Sapling,
    Tree,
    Forest,
}

impl From<StageArg> for NodeStage {
    fn from(value: StageArg) -> Self {
        match value {
            StageArg::Seed => Self::Seed,
            StageArg::Sapling => Self::Sapling,
            StageArg::Tree => Self::Tree,
            StageArg::Forest => Self::Forest,
        }
    }
}

fn emit<T: Serialize>(value: &T, output: OutputFormat) -> Result<()> {
    let rendered = match output {
        OutputFormat::Json => serde_json::to_string(value),
        OutputFormat::Pretty => serde_json::to_string_pretty(value),
    }
    .context("failed to serialize CLI output as JSON")?;
    println!("{rendered}");
    Ok(())
}

fn resolve_config(cli: &Cli) -> Result<GardenRuntimeConfig> {
    let mut config = resolve_garden_runtime().context("failed to resolve garden settings")?;
    if let Some(root) = &cli.root {
        config.content_root.clone_from(root);
    }
    config.exclude_dirs.extend(cli.exclude_dirs.iter().cloned());
    // One query per process: a snapshot would only cost an extra fingerprint walk.
    config.cache_enabled = false;
    Ok(config)
}

fn execute(cli: &Cli, garden: &KnowledgeGarden) -> Result<()> {
    match &cli.command {
        Command::Slugs => emit(&garden.all_node_slugs(), cli.output),
        Command::Node { slug } => {
            let Some(node) = garden.node_content(slug) else {
                bail!("note not found: {slug}");
            };
            emit(&node, cli.output)
        }
        Command::Recent { limit } => emit(
            &garden.recent_nodes(limit.unwrap_or_else(|| garden.recent_limit())),
            cli.output,
        ),
        Command::Tag { tag } => emit(&garden.nodes_by_tag(tag), cli.output),
        Command::Stage { stage } => emit(&garden.nodes_by_stage((*stage).into()), cli.output),
        Command::Search { query, highlight } => {
            let hits = garden.search(query);
            if *highlight {
                let rows: Vec<serde_json::Value> = hits
                    .iter()
                    .map(|node| {
                        json!({
                            "slug": node.slug,
                            "title": highlight_query(&node.metadata.title, query),
                            "excerpt": highlight_query(&node.excerpt, query),
                            "stage": node.metadata.stage,
                            "importance": node.metadata.importance,
                        })
                    })
                    .collect();
                emit(&json!({ "query": query, "total": rows.len(), "hits": rows }), cli.output)
            } else {
                emit(&hits, cli.output)
            }
        }
        Command::Backlinks => emit(&garden.backlink_map(), cli.output),
        Command::Connections { slug } => emit(&garden.node_connections(slug), cli.output),
        Command::Related { slug, limit } => emit(
            &garden.related_nodes(slug, limit.unwrap_or_else(|| garden.related_limit())),
            cli.output,
        ),
        Command::Stats => emit(&garden.node_stats(), cli.output),
        Command::Graph { top } => {
            let graph = garden.graph();
            let most_connected = graph.most_connected(*top);
            emit(
                &json!({
                    "nodes": graph.nodes,
                    "links": graph.links,
                    "stats": graph.stats,
                    "most_connected": most_connected,
                }),
                cli.output,
            )
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if cli.verbose {
            "cathedral_graph=debug"
        } else {
            "cathedral_graph=info"
        })
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    if let Some(conf) = &cli.config_file {
        set_garden_config_override(conf.clone())?;
    }

    let config = resolve_config(&cli)?;
    let garden = KnowledgeGarden::from_config(&config);
    execute(&cli, &garden)
}
