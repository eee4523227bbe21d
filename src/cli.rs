use crate::config::load_config;
use crate::ir::{Graph, parse_direction};
use crate::layout::compute_layout;
use crate::layout_dump::{write_layout_dump, write_layout_json};
use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "schema-layout",
    version,
    about = "Lay out a schema graph and print node positions as JSON"
)]
pub struct Args {
    /// Graph file (.json/.json5) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Layout config JSON file
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Flow direction override (TB or LR)
    #[arg(short = 'd', long = "direction")]
    pub direction: Option<String>,

    /// Property rows every anchor node reserves, overriding the input
    #[arg(short = 'r', long = "anchorRows")]
    pub anchor_rows: Option<usize>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = load_config(args.config.as_deref())
        .with_context(|| format!("loading config {:?}", args.config))?;
    let mut graph = read_graph(args.input.as_deref())?;
    if let Some(token) = args.direction.as_deref() {
        graph.direction = parse_direction(token)?;
    }
    if let Some(rows) = args.anchor_rows {
        graph.anchor_rows = rows;
    }

    let layout = compute_layout(&graph, &config);
    tracing::info!(
        nodes = layout.nodes.len(),
        edges = layout.edges.len(),
        dropped = layout.dropped_edges.len(),
        width = layout.width,
        height = layout.height,
        "layout computed"
    );

    match args.output.as_deref() {
        Some(path) => write_layout_dump(path, &layout, &graph)?,
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            write_layout_json(&mut handle, &layout, &graph)?;
            println!();
        }
    }
    Ok(())
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("schema_layout={default_level}")));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn read_graph(path: Option<&Path>) -> Result<Graph> {
    if let Some(path) = path {
        if path != Path::new("-") {
            return Graph::from_path(path).with_context(|| format!("reading graph {}", path.display()));
        }
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(Graph::from_json(&buf)?)
}
