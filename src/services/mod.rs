//! Services module
//!
//! This module contains business logic services

pub mod auth;
pub mod dashboard;
pub mod events;
pub mod redis;

// Re-export commonly used services
pub use auth::{AuthService, build_actor};
pub use dashboard::{DashboardService, DashboardSelection};
pub use events::EventService;
pub use redis::{RedisService, KeyValueStore};

use std::sync::Arc;
use crate::config::settings::Settings;
use crate::database::{self, DatabasePool, DatabaseService};
use crate::utils::errors::Result;

/// Service factory for creating and managing all services
#[derive(Clone)]
pub struct ServiceFactory {
    pub database: Arc<DatabaseService>,
    pub auth_service: AuthService<DatabaseService>,
    pub dashboard_service: DashboardService,
    pub event_service: EventService<DatabaseService>,
    pub redis_service: RedisService,
    pub settings: Settings,
    pool: DatabasePool,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(settings: Settings, pool: DatabasePool) -> Result<Self> {
        let database = Arc::new(DatabaseService::new(pool.clone()));
        let redis_service = RedisService::new(settings.redis.clone())?;
        let dashboard_service = DashboardService::new(
            Arc::new(redis_service.clone()),
            settings.redis.ttl_seconds,
        );
        let auth_service = AuthService::new(database.clone(), dashboard_service.clone(), settings.clone());
        let event_service = EventService::new(database.clone(), settings.events.clone());

        Ok(Self {
            database,
            auth_service,
            dashboard_service,
            event_service,
            redis_service,
            settings,
            pool,
        })
    }

    /// Health check for all services
    pub async fn health_check(&self) -> ServiceHealthStatus {
        let (redis, db) = futures::join!(
            self.redis_service.health_check(),
            database::health_check(&self.pool),
        );
        let redis_healthy = redis.unwrap_or(false);
        let database_healthy = db.is_ok();

        ServiceHealthStatus {
            redis_healthy,
            database_healthy,
        }
    }
}

/// Health status for all services
#[derive(Debug, Clone)]
pub struct ServiceHealthStatus {
    pub redis_healthy: bool,
    pub database_healthy: bool,
}

impl ServiceHealthStatus {
    /// Events cannot be served without the database; redis only holds dashboard context
    pub fn is_healthy(&self) -> bool {
        self.database_healthy
    }

    /// Get list of unhealthy services
    pub fn get_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if !self.database_healthy {
            issues.push("Database connection failed".to_string());
        }
        if !self.redis_healthy {
            issues.push("Redis connection failed".to_string());
        }

        issues
    }
}
