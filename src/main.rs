use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use envy::{
    commands::{self, ScriptKind},
    config::Config,
    pathvar::EnvSnapshot,
    paths::Paths,
    ui::{ColorMode, Ui},
};

#[derive(Parser)]
#[command(name = "envy")]
#[command(about = "Envy - load and unload shell environment profiles")]
#[command(
    long_about = "Envy generates shell scripts that apply or revert an environment profile.\n\n\
    load and unload print the path of a temp file; source it in your shell:\n\n    \
    source \"$(envy load work)\""
)]
#[command(version)]
struct Cli {
    /// Config file (default is $HOME/.envy/config.yaml)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbose output (written to stderr)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// When to use colors: always, auto, never
    #[arg(long, global = true, value_name = "WHEN", value_enum, default_value_t = ColorMode::Auto)]
    color: ColorMode,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load an environment profile
    Load {
        /// Name of the profile to load
        name: String,
    },

    /// Unload an environment profile
    Unload {
        /// Name of the profile to unload
        name: String,
    },

    /// List available profiles
    List,

    /// Show the contents of a profile
    Inspect {
        /// Name of the profile to inspect
        name: String,

        /// Print the profile as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the generated script instead of writing a temp file
    Print {
        /// Name of the profile
        name: String,

        /// Print the unload script instead of the load script
        #[arg(long)]
        unload: bool,
    },

    /// Run diagnostics on the envy setup
    Doctor,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Completions { shell } = &cli.command {
        clap_complete::generate(*shell, &mut Cli::command(), "envy", &mut std::io::stdout());
        return Ok(());
    }

    let env = EnvSnapshot::from_process();
    let ui = Ui::new(cli.color, cli.no_color, cli.verbose, &env);
    let paths = Paths::new()?;
    let config = Config::load(&paths, cli.config.as_deref(), &env)?;
    if let Some(source) = &config.source {
        ui.verbose(format!("Using config file: {}", source.display()));
    }

    match cli.command {
        Commands::Load { name } => commands::load(&config, &name, &env, &ui),
        Commands::Unload { name } => commands::unload(&config, &name, &env, &ui),
        Commands::List => commands::list(&config, &ui),
        Commands::Inspect { name, json } => commands::inspect(&config, &name, json, &ui),
        Commands::Print { name, unload } => {
            let kind = if unload {
                ScriptKind::Unload
            } else {
                ScriptKind::Load
            };
            commands::print(&config, &name, kind, &env, &ui)
        }
        Commands::Doctor => commands::doctor(&paths, &config, &env, &ui),
        Commands::Completions { .. } => Ok(()),
    }
}
