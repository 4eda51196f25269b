use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use tracing::{info, instrument, warn};

use crate::application::ports::MetadataStoreError;

const CONNECT_ATTEMPTS: u32 = 6;
const INITIAL_BACKOFF: Duration = Duration::from_millis(500);
const MAX_BACKOFF: Duration = Duration::from_secs(8);
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Connects the metadata store pool, retrying while the database comes up.
/// Credentials never reach the logs; only host, port and database do.
#[instrument(skip(url))]
pub async fn create_pool(url: &str, max_connections: u32) -> Result<PgPool, MetadataStoreError> {
    let options: PgConnectOptions = url
        .parse()
        .map_err(|e| MetadataStoreError::ConnectionFailed(format!("invalid database url: {e}")))?;
    let target = format!(
        "{}:{}/{}",
        options.get_host(),
        options.get_port(),
        options.get_database().unwrap_or_default()
    );

    let mut attempt = 1;
    loop {
        let result = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect_with(options.clone())
            .await;

        match result {
            Ok(pool) => {
                info!(%target, attempt, max_connections, "Metadata store connected");
                return Ok(pool);
            }
            Err(e) if attempt < CONNECT_ATTEMPTS => {
                let delay = backoff_delay(attempt);
                warn!(
                    %target,
                    error = %e,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "Metadata store unreachable, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => {
                return Err(MetadataStoreError::ConnectionFailed(format!(
                    "{target} unreachable after {attempt} attempts: {e}"
                )));
            }
        }
    }
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), MetadataStoreError> {
    sqlx::migrate!()
        .run(pool)
        .await
        .map_err(|e| MetadataStoreError::MigrationFailed(e.to_string()))?;
    info!("Metadata store migrations applied");
    Ok(())
}

fn backoff_delay(attempt: u32) -> Duration {
    INITIAL_BACKOFF
        .saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
        .min(MAX_BACKOFF)
}
