use bookscrap::config::Config;
use bookscrap::fetch::HttpFetcher;
use bookscrap::pipeline;
use bookscrap::store::PgBookStore;
use bookscrap::Result;
use chrono::Local;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let start_time = Local::now();
    let cfg = Config::from_env()?;

    let fetcher = HttpFetcher::new(&cfg)?;
    let store = PgBookStore::connect(&cfg.database_url).await?;
    pipeline::run(&fetcher, &store, &cfg).await?;

    let run_secs = (Local::now() - start_time)
        .num_milliseconds() as f64
        / 1000.0;
    info!(run_secs, "pipeline run finished");

    Ok(())
}
