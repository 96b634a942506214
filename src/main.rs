//! Zero-config inspection CLI.
//!
//! Resolves a configuration exactly the way an embedding application would
//! (defaults, environment overrides, env files, project-root detection) and
//! prints the result.

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::Value;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;
use zero_config::cli::{Cli, Command, InspectArgs};
use zero_config::root::{find_project_root, marker_in};
use zero_config::Setup;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Command::Inspect(args) => inspect(args),
        Command::Root { dir } => {
            let root = find_project_root(dir.as_deref());
            match marker_in(&root) {
                Some(marker) => println!("{} (marker: {})", root.display(), marker),
                None => println!("{} (fallback: current directory)", root.display()),
            }
            Ok(())
        }
    }
}

fn inspect(args: InspectArgs) -> Result<()> {
    let mut setup = Setup::new();

    if let Some(path) = &args.defaults {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed reading defaults file: {}", path.display()))?;
        let defaults: Value = serde_json::from_str(&content)
            .with_context(|| format!("defaults file is not valid JSON: {}", path.display()))?;
        setup = setup.with_defaults(defaults);
    }
    for path in args.env_files {
        setup = setup.with_env_file(path);
    }
    if let Some(dir) = args.start_dir {
        setup = setup.with_start_dir(dir);
    }

    let config = setup.apply();

    let output = if args.flat {
        serde_json::to_string_pretty(&config.to_flat_map())?
    } else {
        serde_json::to_string_pretty(config.as_tree())?
    };
    println!("{output}");

    Ok(())
}
