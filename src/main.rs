//! CLI entry point for devlog-rs

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "devlog")]
#[command(version)]
#[command(about = "A static site generator for personal developer blogs", long_about = None)]
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
    /// Initialize a new blog site
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Create a new post
    New {
        /// Layout to use (post, draft)
        #[arg(short, long, default_value = "post")]
        layout: String,

        /// Title of the new post
        title: String,

        /// Path for the new post
        #[arg(short, long)]
        path: Option<String>,
    },

    /// Generate static files
    #[command(alias = "g")]
    Generate {
        /// Watch for file changes
        #[arg(short, long)]
        watch: bool,

        /// Regenerate even when nothing changed
        #[arg(short, long)]
        force: bool,
    },

    /// Start a local server
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Open browser automatically
        #[arg(short, long)]
        open: bool,

        /// Enable static mode (no file watching)
        #[arg(long)]
        r#static: bool,
    },

    /// Clean the public folder and cache
    Clean,

    /// List site information
    List {
        /// Type of content to list (post, category)
        #[arg(default_value = "post")]
        r#type: String,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "devlog_rs=debug,info"
    } else {
        "devlog_rs=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing blog site in {:?}", target_dir);
            devlog_rs::commands::init::init_site(&target_dir)?;
            println!("Initialized empty blog site in {:?}", target_dir);
        }

        Commands::New {
            layout,
            title,
            path,
        } => {
            let devlog = devlog_rs::Devlog::new(&base_dir)?;
            tracing::info!("Creating new {} with title: {}", layout, title);
            devlog_rs::commands::new::create_post(&devlog, &title, &layout, path.as_deref())?;
        }

        Commands::Generate { watch, force } => {
            let devlog = devlog_rs::Devlog::new(&base_dir)?;
            tracing::info!("Generating static files...");

            devlog_rs::commands::generate::run_with_options(&devlog, force)?;
            println!("Generated successfully!");

            if watch {
                tracing::info!("Watching for file changes...");
                devlog_rs::commands::generate::watch(&devlog).await?;
            }
        }

        Commands::Server {
            port,
            ip,
            open,
            r#static,
        } => {
            let devlog = devlog_rs::Devlog::new(&base_dir)?;

            // Generate first
            tracing::info!("Generating static files...");
            devlog.generate()?;

            tracing::info!("Starting server at http://{}:{}", ip, port);
            devlog_rs::server::start(&devlog, &ip, port, !r#static, open).await?;
        }

        Commands::Clean => {
            let devlog = devlog_rs::Devlog::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            devlog.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::List { r#type } => {
            let devlog = devlog_rs::Devlog::new(&base_dir)?;
            devlog_rs::commands::list::run(&devlog, &r#type)?;
        }

        Commands::Version => {
            println!("devlog-rs version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
