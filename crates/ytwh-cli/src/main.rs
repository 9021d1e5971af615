mod etl;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::etl::{Job, JobSettings};

#[derive(Debug, Parser)]
#[command(name = "ytwh-cli")]
#[command(about = "Video platform warehouse ETL jobs")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database utilities
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Run an extract-transform-load job
    Etl {
        #[arg(value_enum)]
        job: Job,

        /// Extract, transform and filter, but write nothing
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Check database connectivity
    Ping,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("ytwh-cli: nothing to do (try --help)");
        return Ok(());
    };

    let config = ytwh_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_ansi(config.env.ansi_logs())
        .init();

    tracing::debug!(?config, "configuration loaded");

    let pool_config = ytwh_db::PoolConfig::from_app_config(&config);
    let pool = ytwh_db::connect_pool(&config.database_url, pool_config)
        .await
        .context("failed to connect to the warehouse database")?;

    let result = match command {
        Commands::Db {
            command: DbCommands::Ping,
        } => ytwh_db::ping(&pool)
            .await
            .map(|()| println!("database ok"))
            .context("database ping failed"),
        Commands::Etl { job, dry_run } => run_etl_command(&pool, &config, job, dry_run).await,
    };

    pool.close().await;
    result
}

async fn run_etl_command(
    pool: &sqlx::PgPool,
    config: &ytwh_core::AppConfig,
    job: Job,
    dry_run: bool,
) -> anyhow::Result<()> {
    let api_key = config
        .youtube_api_key
        .as_deref()
        .context("YOUTUBE_API_KEY must be set for etl commands")?;
    let client = ytwh_api::YoutubeClient::with_base_url(
        api_key,
        config.api_timeout_secs,
        &config.api_user_agent,
        &config.api_base_url,
    )?;
    let settings = JobSettings::from_app_config(config, dry_run);

    let outcomes = etl::run_jobs(job, &client, pool, &settings).await;
    let failed: Vec<&str> = outcomes
        .iter()
        .filter(|o| o.result.is_err())
        .map(|o| o.job.name())
        .collect();
    if !failed.is_empty() {
        tracing::warn!(
            failed = %failed.join(", "),
            total = outcomes.len(),
            "some jobs did not complete"
        );
    }
    Ok(())
}
