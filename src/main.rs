//! CLI entry point for folio

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "folio")]
#[command(version)]
#[command(about = "Content ingestion and RSS feed for a markdown blog", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the feed, articles and static assets
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,
    },

    /// Generate the RSS feed once
    Feed {
        /// Output file (defaults to the feed path inside the public directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the feed instead of writing it
        #[arg(long, conflicts_with = "output")]
        stdout: bool,
    },

    /// List content records, newest first
    List {
        /// Type of content to list (all, blog, weekly)
        #[arg(default_value = "all")]
        r#type: String,

        /// Print records as JSON
        #[arg(long)]
        json: bool,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "folio=debug,tower_http=debug,info"
    } else {
        "folio=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("cannot determine current directory")?,
    };

    match cli.command {
        Commands::Serve { port, ip } => {
            let site = folio::Folio::new(&base_dir)?;
            tracing::info!("Starting server at http://{}:{}", ip, port);
            folio::server::start(site, &ip, port).await?;
        }

        Commands::Feed { output, stdout } => {
            let site = folio::Folio::new(&base_dir)?;
            if stdout {
                println!("{}", site.feed_xml()?);
            } else {
                let path = folio::commands::feed::run(&site, output.as_deref())?;
                println!("Generated {}", path.display());
            }
        }

        Commands::List { r#type, json } => {
            let site = folio::Folio::new(&base_dir)?;
            folio::commands::list::run(&site, &r#type, json)?;
        }

        Commands::Version => {
            println!("folio version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
