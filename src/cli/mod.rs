pub mod args;
pub mod commands;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use colored::*;

use crate::error::Result;

/// Japanese Tax Law Downloader
#[derive(Parser, Debug)]
#[command(
    name = "taxlaw",
    about = "Japanese Tax Law Downloader - Fetch national tax laws from the e-Gov API and save them as JSON",
    version,
    author,
    long_about = None,
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only print warnings and errors; no progress bar
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Download options used when no subcommand is given
    #[command(flatten)]
    pub download: args::DownloadArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download every law of a category (default)
    #[command(alias = "d")]
    Download(args::DownloadArgs),

    /// Manage configuration
    #[command(alias = "c")]
    Config(args::ConfigArgs),

    /// Generate shell completion scripts
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Cli {
    /// Generate shell completion scripts
    fn generate_completions(shell: Shell) {
        use clap::CommandFactory;
        use clap_complete::generate;
        use std::io;

        let mut cmd = Self::command();
        let name = cmd.get_name().to_string();
        generate(shell, &mut cmd, name, &mut io::stdout());
    }

    /// Default log filter for the chosen verbosity; `RUST_LOG` overrides it
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "warn"
        } else {
            "info"
        }
    }

    /// Run the CLI application
    pub async fn run() -> Result<()> {
        let cli = Self::parse();

        // Set up logging
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_filter()))
            .format_timestamp(None)
            .init();

        let result = match cli.command {
            Some(Commands::Download(args)) => commands::download::execute(args, cli.quiet).await,
            None => commands::download::execute(cli.download, cli.quiet).await,
            Some(Commands::Config(args)) => commands::config::execute(args),
            Some(Commands::Completions { shell }) => {
                Self::generate_completions(shell);
                Ok(())
            }
        };

        // Handle errors with better messaging
        if let Err(ref e) = result {
            eprintln!("{} {}", "Error:".red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("\n{} {}", "Hint:".yellow(), hint);
            }
        }
        result
    }
}
