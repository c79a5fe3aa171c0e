//! Binary entrypoint for the hookbind CLI driver.
//!
//! Loads a fixture document (RON [`NodeSpec`]), initializes the engine over
//! it, fires an optional scripted sequence of events, and prints the
//! resulting tree.

use std::{fs, path::PathBuf, process};

use clap::Parser;
use dom::{Document, NodeSpec};
use hookbind_engine::Engine;
use tracing::debug;

/// Logging flags and tracing setup.
mod logs;
/// Tree dump rendering.
mod render;
/// Event script loading and firing.
mod scenario;

#[derive(Parser, Debug)]
#[command(
    name = "hookbind",
    about = "Run hook action definitions against a fixture document",
    version
)]
/// Command-line interface for the `hookbind` binary.
struct Cli {
    /// Document description file (RON node spec)
    page: PathBuf,

    /// Event script file: ordered (selector, event) pairs (RON)
    #[arg(long)]
    events: Option<PathBuf>,

    /// Logging controls.
    #[command(flatten)]
    logs: logs::LogArgs,
}

fn main() {
    let cli = Cli::parse();
    logs::init(&cli.logs);

    if let Err(msg) = run(&cli) {
        eprintln!("{}", msg);
        process::exit(1);
    }
}

/// Load, initialize, fire, and print.
fn run(cli: &Cli) -> Result<(), String> {
    let text = fs::read_to_string(&cli.page)
        .map_err(|e| format!("cannot read {}: {}", cli.page.display(), e))?;
    let spec: NodeSpec = ron::from_str(&text)
        .map_err(|e| format!("cannot parse {}: {}", cli.page.display(), e))?;
    let mut doc = Document::from_spec(&spec);

    let mut engine = Engine::new();
    let bound = engine.init(&doc, None, Some("cli"), false);
    debug!("bound {} element(s)", bound);

    if let Some(path) = &cli.events {
        for step in scenario::load(path)? {
            let line = scenario::fire(&mut engine, &mut doc, &step)?;
            println!("{}", line);
        }
    }

    print!("{}", render::tree(&doc));
    Ok(())
}
