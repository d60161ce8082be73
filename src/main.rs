use anyhow::Result;
use clap::{Parser, Subcommand};

use dittseek::cli::{chat, list, new, read};
use dittseek::config::Config;
use dittseek::ollama::OllamaClient;
use dittseek::store::ThreadStore;

#[derive(Parser)]
#[command(name = "dittseek")]
#[command(about = "Local chat client for reasoning models")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "dittseek.yaml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new thread
    New {
        /// Thread title
        title: String,
    },

    /// List threads
    List,

    /// Print a thread's transcript
    Read {
        /// Thread ID
        thread_id: String,

        /// Show thought segments
        #[arg(long)]
        thoughts: bool,
    },

    /// Chat on a thread, streaming from the configured model
    Chat {
        /// Thread ID
        thread_id: String,

        /// Override the configured model
        #[arg(short, long)]
        model: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config
    let config = Config::load(&cli.config).unwrap_or_default();

    // Initialize store
    let store = ThreadStore::open(&config.database_path())?;

    match cli.command {
        Commands::New { title } => {
            new::run(&store, title)?;
        }
        Commands::List => {
            list::run(&store)?;
        }
        Commands::Read { thread_id, thoughts } => {
            read::run(&store, &thread_id, thoughts)?;
        }
        Commands::Chat { thread_id, model } => {
            let client = OllamaClient::new(config.ollama.host.clone());
            let model = model.unwrap_or_else(|| config.ollama.model.clone());
            chat::run(&store, &client, &model, &thread_id).await?;
        }
    }

    Ok(())
}
