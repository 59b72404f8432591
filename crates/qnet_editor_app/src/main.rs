// SPDX-License-Identifier: MIT OR Apache-2.0
//! `qnet-topology` - command-line front end for topology documents.
//!
//! Thin wrapper over the document crate: validate a saved topology,
//! normalize it through an import/export round trip, or summarize what
//! it contains. Everything heavier (canvas gestures, simulation runs)
//! lives behind the library crates.

use anyhow::Context;
use clap::{Parser, Subcommand};
use qnet_editor_document::{export, import, WorldDocument};
use qnet_editor_graph::Graph;
use std::path::{Path, PathBuf};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "qnet-topology", version, about = "Inspect and validate QNet topology documents")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check that a topology document parses and builds a valid graph
    Validate {
        /// Topology document (JSON)
        file: PathBuf,
    },
    /// Rewrite a document in canonical form (import then re-export)
    Normalize {
        /// Topology document (JSON)
        file: PathBuf,
        /// Destination; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Summarize a document's contents
    Info {
        /// Topology document (JSON)
        file: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Validate { file } => validate(&file),
        Command::Normalize { file, output } => normalize(&file, output.as_deref()),
        Command::Info { file } => info(&file),
    }
}

fn load_document(path: &Path) -> anyhow::Result<WorldDocument> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn build_graph(path: &Path) -> anyhow::Result<(WorldDocument, Graph)> {
    let world = load_document(path)?;
    let graph = import(&world).with_context(|| format!("validating {}", path.display()))?;
    Ok((world, graph))
}

fn validate(file: &Path) -> anyhow::Result<()> {
    let (_, graph) = build_graph(file)?;
    println!(
        "ok: {} nodes, {} connections",
        graph.node_count(),
        graph.connection_count()
    );
    Ok(())
}

fn normalize(file: &Path, output: Option<&Path>) -> anyhow::Result<()> {
    let (world, graph) = build_graph(file)?;
    let canonical = export(&graph, world.size);
    let text = serde_json::to_string_pretty(&canonical)?;
    match output {
        Some(path) => std::fs::write(path, text)
            .with_context(|| format!("writing {}", path.display()))?,
        None => println!("{text}"),
    }
    Ok(())
}

fn info(file: &Path) -> anyhow::Result<()> {
    let (world, graph) = build_graph(file)?;
    println!("world: {} ({} x {})", world.name, world.size[0], world.size[1]);
    println!("zones: {}", world.zones.len());
    for kind in qnet_editor_graph::NodeKind::all().iter().copied() {
        let count = graph.nodes().filter(|n| n.kind == kind).count();
        if count > 0 {
            println!("  {}: {}", kind.label(), count);
        }
    }
    println!("connections: {}", graph.connection_count());
    Ok(())
}
