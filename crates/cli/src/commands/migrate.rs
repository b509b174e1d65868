//! Database migration command.
//!
//! Applies the migrations embedded from `crates/storefront/migrations/` at
//! compile time. Safe to re-run; already-applied migrations are skipped.

use secrecy::ExposeSecret;
use sqlx::PgPool;
use tracing::info;

/// Run pending storefront migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let database_url = super::database_url()?;

    info!("Connecting to storefront database...");
    let pool = PgPool::connect(database_url.expose_secret()).await?;

    info!("Running storefront migrations...");
    sqlx::migrate!("../storefront/migrations").run(&pool).await?;

    info!("Storefront migrations complete!");
    Ok(())
}
