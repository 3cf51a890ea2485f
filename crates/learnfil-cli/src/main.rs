//! learnfil CLI: the learner-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "learnfil", version, about = "Interactive Filecoin curriculum")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a starter config and seed the curriculum
    Init {
        /// Seed from this curriculum TOML instead of the built-in one
        #[arg(long)]
        curriculum: Option<PathBuf>,
    },

    /// List modules with completion counts
    Modules,

    /// List the lessons of a module
    Lessons {
        /// Module id
        #[arg(long)]
        module: String,
    },

    /// Show a lesson's content, starter code, and tests
    Show {
        /// Lesson id
        #[arg(long)]
        lesson: String,
    },

    /// Run a solution file against a lesson's tests
    Run {
        /// Lesson id
        #[arg(long)]
        lesson: String,

        /// File containing your code
        #[arg(long)]
        file: PathBuf,
    },

    /// Mark a lesson complete without running tests
    Complete {
        /// Lesson id
        #[arg(long)]
        lesson: String,

        /// Code to store with the completion
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Toggle the bookmark on a lesson
    Bookmark {
        /// Lesson id
        #[arg(long)]
        lesson: String,
    },

    /// List bookmarked lessons
    Bookmarks,

    /// Show progress across all modules
    Progress {
        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Validate a curriculum TOML file
    Validate {
        /// Path to the curriculum file
        #[arg(long)]
        curriculum: PathBuf,
    },

    /// Print the completion certificate once every module is done
    Certificate {
        /// Name to print instead of the configured display name
        #[arg(long)]
        name: Option<String>,

        /// Wallet to print instead of the configured wallet address
        #[arg(long)]
        wallet: Option<String>,

        /// Also write an HTML certificate into this directory
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("learnfil=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config;

    let result = match cli.command {
        Commands::Init { curriculum } => commands::init::execute(curriculum, config).await,
        Commands::Modules => commands::modules::execute(config).await,
        Commands::Lessons { module } => commands::lessons::execute(module, config).await,
        Commands::Show { lesson } => commands::show::execute(lesson, config).await,
        Commands::Run { lesson, file } => commands::run::execute(lesson, file, config).await,
        Commands::Complete { lesson, file } => {
            commands::complete::execute(lesson, file, config).await
        }
        Commands::Bookmark { lesson } => commands::bookmarks::toggle(lesson, config).await,
        Commands::Bookmarks => commands::bookmarks::list(config).await,
        Commands::Progress { format } => commands::progress::execute(format, config).await,
        Commands::Validate { curriculum } => commands::validate::execute(curriculum),
        Commands::Certificate {
            name,
            wallet,
            output,
        } => commands::certificate::execute(name, wallet, output, config).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
