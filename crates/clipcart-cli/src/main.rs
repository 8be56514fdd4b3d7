mod collect;
mod passes;
mod report;
mod seed;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "clipcart-cli")]
#[command(about = "Product-to-short-video pipeline command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Collect product listing URLs into the store
    Collect {
        /// Single listing URL
        origin_url: Option<String>,

        /// Multiple listing URLs passed directly
        #[arg(long, num_args = 1..)]
        urls: Vec<String>,

        /// Text file with one URL per line (# comments allowed)
        #[arg(long)]
        file: Option<PathBuf>,

        /// Optional product title applied to every collected URL
        #[arg(long)]
        title: Option<String>,

        /// Collection track: AUTO or MANUAL
        #[arg(long, default_value = "AUTO")]
        track: String,

        /// Affiliate URL recorded for every collected product
        #[arg(long)]
        affiliate_url: Option<String>,

        /// Refresh existing rows in place instead of skipping them
        #[arg(long)]
        update: bool,
    },
    /// Run one acquisition pass over products awaiting download
    Download {
        /// Cap the number of products processed
        #[arg(long)]
        limit: Option<i64>,

        /// Restrict the pass to one track
        #[arg(long)]
        track: Option<String>,
    },
    /// Run one render pass over downloaded products
    Render {
        /// Cap the number of products processed
        #[arg(long)]
        limit: Option<i64>,

        /// Restrict the pass to one track
        #[arg(long)]
        track: Option<String>,
    },
    /// Run one upload-scheduler pass over active channels
    Upload {
        /// Restrict the pass to one channel id
        #[arg(long)]
        channel: Option<Uuid>,
    },
    /// Upsert channels from the YAML seed file
    SeedChannels {
        /// Override the configured channels file path
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Print per-status counts for products, assets, and upload logs
    Report,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    let config = clipcart_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = clipcart_db::PoolConfig::from_app_config(&config);
    let pool = clipcart_db::connect_pool(&config.database_url, pool_config).await?;
    clipcart_db::run_migrations(&pool).await?;

    match cli.command {
        Commands::Collect {
            origin_url,
            urls,
            file,
            title,
            track,
            affiliate_url,
            update,
        } => {
            collect::run_collect(
                &pool,
                origin_url,
                urls,
                file,
                title.as_deref(),
                &track,
                affiliate_url.as_deref(),
                update,
            )
            .await
        }
        Commands::Download { limit, track } => {
            passes::run_download(&pool, &config, limit, track.as_deref()).await
        }
        Commands::Render { limit, track } => {
            passes::run_render(&pool, &config, limit, track.as_deref()).await
        }
        Commands::Upload { channel } => passes::run_upload(&pool, &config, channel).await,
        Commands::SeedChannels { path } => {
            seed::run_seed_channels(&pool, path.as_deref().unwrap_or(&config.channels_path)).await
        }
        Commands::Report => report::run_report(&pool).await,
    }
}
