use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{info, warn};

const MAX_ATTEMPTS: u32 = 5;

/// Connect with exponential backoff so a cold-started database container
/// does not kill the API on boot.
pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    let mut wait = Duration::from_secs(2);

    for attempt in 1..=MAX_ATTEMPTS {
        match PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await
        {
            Ok(pool) => {
                info!("Database connection established.");
                return Ok(pool);
            }
            Err(e) if attempt < MAX_ATTEMPTS => {
                warn!(
                    "Database connection failed (attempt {}/{}): {}. Retrying in {}s...",
                    attempt,
                    MAX_ATTEMPTS,
                    e,
                    wait.as_secs()
                );
                tokio::time::sleep(wait).await;
                wait *= 2;
            }
            Err(e) => return Err(e),
        }
    }

    unreachable!("retry loop either returns a pool or the final error")
}
