use tracing_subscriber::EnvFilter;

use continental::config::AppConfig;
use continental::db;

fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();
    let conn = db::init_db(&config.database_url)?;

    let report = db::seed::seed_demo_data(&conn, &config.admin_email, &config.admin_password)?;
    tracing::info!(
        "seeded {} rooms ({} already present) into {}",
        report.rooms_created,
        report.rooms_skipped,
        config.database_url
    );

    Ok(())
}
