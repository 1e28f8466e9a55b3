#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::struct_excessive_bools)]

mod commands;
mod logging;

use bootconf_core::{Config, ResolveOptions};
use clap::Parser;
use miette::Result;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "bootconf")]
#[command(author, version, about = "Resolve app paths and load layered configuration", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v for DEBUG, -vv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit JSON formatted output (stable, machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Override the working directory
    #[arg(long, global = true, value_name = "PATH")]
    cwd: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Print version information
    Version,

    /// Resolve a path expression against an application root
    Resolve {
        /// Absolute path, `./relative` path, or bare specifier (e.g. "loopback/common/models")
        expression: String,

        /// Application root (defaults to cwd)
        #[arg(long, value_name = "DIR")]
        root: Option<PathBuf>,

        /// Try bare specifiers relative to the root before searching node_modules
        #[arg(long)]
        lenient: bool,

        /// Return the matched package path instead of its entry file
        #[arg(long)]
        no_full_resolve: bool,

        /// Succeed with no result when nothing matches
        #[arg(long)]
        optional: bool,

        /// Prefer a script sibling over a matched .json file
        #[arg(long)]
        script: bool,
    },

    /// Load a named configuration (`<name>.json`, `<name>.local.*`, `<name>.<env>.*`)
    Load {
        /// Configuration name
        #[arg(default_value = "config")]
        name: String,

        /// Directory holding the configuration files (defaults to cwd)
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,

        /// Environment name (falls back to BOOTCONF_ENV, NODE_ENV, then "development")
        #[arg(long, short = 'e')]
        env: Option<String>,
    },

    /// Merge configuration files in order, each over the previous result
    Merge {
        /// Base configuration file
        base: PathBuf,

        /// Override files, applied in order
        #[arg(required = true)]
        overrides: Vec<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Determine working directory
    let cwd = cli
        .cwd
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));

    let env = match &cli.command {
        Some(Commands::Load { env, .. }) => env.clone(),
        _ => None,
    };

    // Build config
    let config = Config::new(cwd.clone())
        .with_env(env)
        .with_verbosity(cli.verbose)
        .with_json_logs(cli.json);

    logging::init(config.verbosity, config.json_logs);

    match cli.command {
        Some(Commands::Version) | None => commands::version::run(),
        Some(Commands::Resolve {
            expression,
            root,
            lenient,
            no_full_resolve,
            optional,
            script,
        }) => {
            let action = commands::resolve::ResolveAction {
                root: absolutize(&cwd, root),
                expression,
                options: ResolveOptions::default()
                    .with_strict(!lenient)
                    .with_full_resolve(!no_full_resolve)
                    .with_optional(optional),
                script,
            };
            let span = tracing::info_span!("resolve", cmd = "resolve", cwd = %cwd.display());
            let _guard = span.enter();
            commands::resolve::run(action, cli.json)
        }
        Some(Commands::Load { name, dir, .. }) => {
            let action = commands::load::LoadAction {
                dir: absolutize(&cwd, dir),
                env: config.env.clone(),
                name,
            };
            let span = tracing::info_span!("load", cmd = "load", cwd = %cwd.display());
            let _guard = span.enter();
            commands::load::run(action, cli.json)
        }
        Some(Commands::Merge { base, overrides }) => {
            let files = std::iter::once(base)
                .chain(overrides)
                .map(|p| absolutize(&cwd, Some(p)))
                .collect();
            commands::merge::run(files, cli.json)
        }
    }
}

/// Resolve an optional CLI path against the working directory.
fn absolutize(cwd: &std::path::Path, path: Option<PathBuf>) -> PathBuf {
    match path {
        Some(p) if p.is_absolute() => p,
        Some(p) => cwd.join(p),
        None => cwd.to_path_buf(),
    }
}
