//! kgraph CLI - build and cluster knowledge graphs from language model output

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use kgraph_core::config::Config;
use kgraph_core::domain::graph::{GraphAlgorithms, KnowledgeGraph};
use kgraph_core::domain::parsing::IncompleteRecordPolicy;
use kgraph_core::extraction::{KnowledgeExtractor, RecordedResponse};
use kgraph_core::text::TextNormalizer;
use tracing::debug;

#[derive(Parser)]
#[command(name = "kgraph")]
#[command(author, version, about = "Knowledge graph builder", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a clustered graph from a recorded model response
    Build {
        /// Response file, or - for stdin
        #[arg(short, long)]
        response: String,
        /// Owner of the graph
        #[arg(short, long, default_value = "local")]
        owner: String,
        /// Source text the response was generated from
        #[arg(short, long)]
        text: Option<PathBuf>,
        /// Maximum number of clusters
        #[arg(long)]
        max_clusters: Option<usize>,
        /// Maximum merge distance
        #[arg(long)]
        max_distance: Option<f64>,
        /// Fail on the first unusable record instead of skipping it
        #[arg(long)]
        abort_on_error: bool,
    },

    /// Remove stop words and punctuation from text
    Normalize {
        /// Text to normalize
        text: String,
    },

    /// Print the prompt that would be sent for a text
    Prompt {
        /// Text file, or - for stdin
        input: String,
    },

    /// Shortest directed distance between two concepts
    Distance {
        /// Response file, or - for stdin
        #[arg(short, long)]
        response: String,
        /// Starting concept label
        from: String,
        /// Target concept label
        to: String,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Get a config value
    Get { key: String },
    /// Set a config value
    Set { key: String, value: String },
    /// List all config values
    List,
    /// Reset to defaults
    Reset,
    /// Show config file path
    Path,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let level = if cli.quiet { "warn" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("kgraph={}", level).parse()?)
                .add_directive(format!("kgraph_core={}", level).parse()?),
        )
        .init();

    match cli.command {
        Commands::Build {
            response,
            owner,
            text,
            max_clusters,
            max_distance,
            abort_on_error,
        } => {
            let options = BuildOptions {
                response,
                owner,
                text,
                max_clusters,
                max_distance,
                abort_on_error,
            };
            cmd_build(options, cli.format, cli.quiet).await
        }
        Commands::Normalize { text } => cmd_normalize(&text, cli.format),
        Commands::Prompt { input } => cmd_prompt(&input),
        Commands::Distance { response, from, to } => {
            cmd_distance(&response, &from, &to, cli.format)
        }
        Commands::Config { action } => cmd_config(action, cli.format, cli.quiet),
    }
}

struct BuildOptions {
    response: String,
    owner: String,
    text: Option<PathBuf>,
    max_clusters: Option<usize>,
    max_distance: Option<f64>,
    abort_on_error: bool,
}

async fn cmd_build(options: BuildOptions, format: OutputFormat, quiet: bool) -> anyhow::Result<()> {
    let mut config = Config::load()?;
    if let Some(max) = options.max_clusters {
        config.clustering.max_clusters = Some(max);
    }
    if let Some(max) = options.max_distance {
        config.clustering.max_distance = Some(max);
    }
    if options.abort_on_error {
        config.parser.incomplete_records = IncompleteRecordPolicy::Abort;
    }

    let response = read_input(&options.response)?;
    let text = match &options.text {
        Some(path) => read_file(path)?,
        None => String::new(),
    };

    let extractor =
        KnowledgeExtractor::from_config(Arc::new(RecordedResponse::new(response)), &config)
            .map_err(with_suggestion)?;
    let report = extractor
        .extract_detailed(&options.owner, &text)
        .await
        .map_err(with_suggestion)?;

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&report.graph)?);
        return Ok(());
    }

    let graph = &report.graph;
    let stats = graph.stats();
    println!("Graph {} (owner: {})", graph.id, graph.owner_id);
    println!(
        "  {} nodes, {} edges, {} clusters",
        stats.node_count, stats.edge_count, stats.cluster_count
    );

    if !quiet {
        println!(
            "  {} records applied, {} skipped",
            report.records_applied,
            report.skipped.len()
        );
        for skipped in &report.skipped {
            println!(
                "  skipped record at line {}: [{}] {}",
                skipped.start_line,
                skipped.error.code(),
                skipped.error
            );
        }
        println!(
            "  clustering stopped after {} merges ({})",
            report.merges, report.stop_reason
        );
        println!("  built in {:?}", graph.build_duration);
        println!();
        for (i, cluster) in graph.clusters.iter().enumerate() {
            println!("Cluster {}: {}", i + 1, cluster.labels(graph).join(", "));
        }
    }

    Ok(())
}

fn cmd_normalize(text: &str, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => println!("{}", TextNormalizer::process(text)),
        OutputFormat::Json => {
            let tokens = TextNormalizer::tokens(text);
            println!("{}", serde_json::to_string(&tokens)?);
        }
    }
    Ok(())
}

fn cmd_prompt(input: &str) -> anyhow::Result<()> {
    let config = Config::load()?;
    let text = read_input(input)?;

    let extractor = KnowledgeExtractor::from_config(Arc::new(RecordedResponse::new("")), &config)
        .map_err(with_suggestion)?;
    print!("{}", extractor.prompt_for(&text));
    Ok(())
}

fn cmd_distance(response: &str, from: &str, to: &str, format: OutputFormat) -> anyhow::Result<()> {
    let config = Config::load()?;
    let raw = read_input(response)?;

    let graph = config
        .parser
        .parser()
        .parse("local", &raw)
        .map_err(with_suggestion)?;
    let from_id = node_id(&graph, from)?;
    let to_id = node_id(&graph, to)?;

    let distance = GraphAlgorithms::distance(&graph, from_id, to_id);
    debug!(from, to, ?distance, "Computed distance");

    match format {
        OutputFormat::Text => match distance {
            Some(hops) => println!("{}", hops),
            None => println!("unreachable"),
        },
        OutputFormat::Json => {
            let value = serde_json::json!({
                "from": from,
                "to": to,
                "distance": distance,
            });
            println!("{}", value);
        }
    }
    Ok(())
}

fn cmd_config(action: ConfigAction, format: OutputFormat, quiet: bool) -> anyhow::Result<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            println!("{}", config.get(&key)?);
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            config.save()?;
            if !quiet {
                println!("Set {} = {}", key, config.get(&key)?);
            }
        }
        ConfigAction::List => {
            let config = Config::load()?;
            let items = config.list()?;
            match format {
                OutputFormat::Json => {
                    let entries: serde_json::Map<String, serde_json::Value> = items
                        .into_iter()
                        .map(|(key, value)| (key, serde_json::Value::String(value)))
                        .collect();
                    println!("{}", serde_json::Value::Object(entries));
                }
                OutputFormat::Text => {
                    let width = items.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
                    for (key, value) in items {
                        // Mark keys the user has overridden
                        let marker = if config.is_default(&key)? { " " } else { "*" };
                        println!("{} {:<width$} = {}", marker, key, value, width = width);
                    }
                }
            }
        }
        ConfigAction::Reset => {
            let removed = Config::reset()?;
            if !quiet {
                match removed {
                    Some(path) => println!("Removed {}; using built-in defaults.", path.display()),
                    None => println!("No config file found; already using built-in defaults."),
                }
            }
        }
        ConfigAction::Path => {
            let path = Config::config_path()?;
            println!("{}", path.display());
        }
    }
    Ok(())
}

fn node_id<'a>(graph: &'a KnowledgeGraph, label: &str) -> anyhow::Result<&'a str> {
    graph
        .node_by_label(label)
        .map(|node| node.id.as_str())
        .ok_or_else(|| anyhow!("No concept labelled '{}' in the response", label))
}

/// Read a file, or stdin when `source` is `-`
fn read_input(source: &str) -> anyhow::Result<String> {
    if source == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read stdin")?;
        Ok(buffer)
    } else {
        read_file(Path::new(source))
    }
}

fn read_file(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Attach the error code and any suggested fix
fn with_suggestion(error: kgraph_core::Error) -> anyhow::Error {
    match error.suggestion() {
        Some(hint) => anyhow!("[{}] {}\n  Try: {}", error.code(), error, hint),
        None => anyhow!("[{}] {}", error.code(), error),
    }
}
