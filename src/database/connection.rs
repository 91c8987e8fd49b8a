//! Postgres pool setup, schema migrations and liveness

use std::str::FromStr;
use std::time::{Duration, Instant};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{Pool, Postgres};
use tracing::{debug, info};

use crate::config::settings::DatabaseConfig as DatabaseSettings;
use crate::utils::errors::Result;

pub type DatabasePool = Pool<Postgres>;

const APPLICATION_NAME: &str = "churchhub";

/// Pool limits. Sizes come from configuration; timeouts are fixed.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

impl From<&DatabaseSettings> for DatabaseConfig {
    fn from(settings: &DatabaseSettings) -> Self {
        Self {
            url: settings.url.clone(),
            max_connections: settings.max_connections,
            min_connections: settings.min_connections.min(settings.max_connections),
            acquire_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(10 * 60),
            max_lifetime: Duration::from_secs(30 * 60),
        }
    }
}

impl DatabaseConfig {
    fn connect_options(&self) -> Result<PgConnectOptions> {
        Ok(PgConnectOptions::from_str(&self.url)?.application_name(APPLICATION_NAME))
    }

    fn pool_options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(self.acquire_timeout)
            .idle_timeout(Some(self.idle_timeout))
            .max_lifetime(Some(self.max_lifetime))
    }
}

/// Open the pool and make sure the server answers before handing it out
pub async fn create_pool(config: &DatabaseConfig) -> Result<DatabasePool> {
    let pool = config
        .pool_options()
        .connect_with(config.connect_options()?)
        .await?;
    let latency = health_check(&pool).await?;

    info!(
        url = %redact_url(&config.url),
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        latency_ms = latency.as_millis() as u64,
        "Database pool ready"
    );
    Ok(pool)
}

pub async fn run_migrations(pool: &DatabasePool) -> Result<()> {
    let migrator = sqlx::migrate!("./migrations");
    info!(known = migrator.iter().count(), "Applying database migrations");

    migrator.run(pool).await?;

    info!("Database schema is up to date");
    Ok(())
}

/// Round-trip time of a trivial query
pub async fn health_check(pool: &DatabasePool) -> Result<Duration> {
    let started = Instant::now();
    let _: i32 = sqlx::query_scalar("SELECT 1").fetch_one(pool).await?;
    let elapsed = started.elapsed();

    debug!(latency_ms = elapsed.as_millis() as u64, idle = pool.num_idle(), "Database answered");
    Ok(elapsed)
}

/// Connection string with the password masked
pub fn redact_url(url: &str) -> String {
    let Some(scheme_end) = url.find("://").map(|i| i + 3) else {
        return url.to_string();
    };
    let rest = &url[scheme_end..];
    let Some(at) = rest.rfind('@') else {
        return url.to_string();
    };
    match rest[..at].find(':') {
        Some(colon) => format!("{}{}:***{}", &url[..scheme_end], &rest[..colon], &rest[at..]),
        None => url.to_string(),
    }
}
