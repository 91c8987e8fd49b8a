//! User repository implementation

use sqlx::PgPool;
use chrono::Utc;
use tracing::warn;
use uuid::Uuid;
use crate::models::role::Role;
use crate::models::user::{User, CreateUserRequest};
use crate::utils::errors::ChurchHubError;

const USER_COLUMNS: &str = "id, telegram_id, username, first_name, last_name, branch_id, created_at, updated_at";

#[derive(Clone, Debug)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a user, or refresh the names of an existing one
    pub async fn upsert(&self, request: CreateUserRequest) -> Result<User, ChurchHubError> {
        let sql = format!(
            r#"
            INSERT INTO users (telegram_id, username, first_name, last_name, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            ON CONFLICT (telegram_id) DO UPDATE SET
                username = EXCLUDED.username,
                first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                updated_at = EXCLUDED.updated_at
            RETURNING {}
            "#,
            USER_COLUMNS
        );

        let user = sqlx::query_as::<_, User>(&sql)
            .bind(request.telegram_id)
            .bind(request.username)
            .bind(request.first_name)
            .bind(request.last_name)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await?;

        Ok(user)
    }

    /// Find user by Telegram ID
    pub async fn find_by_telegram_id(&self, telegram_id: i64) -> Result<Option<User>, ChurchHubError> {
        let sql = format!("SELECT {} FROM users WHERE telegram_id = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(telegram_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Roles assigned to a user. Unknown role names are skipped.
    pub async fn roles(&self, user_id: Uuid) -> Result<Vec<Role>, ChurchHubError> {
        let names: Vec<(String,)> = sqlx::query_as("SELECT role FROM user_roles WHERE user_id = $1")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        let roles = names
            .into_iter()
            .filter_map(|(name,)| match name.parse::<Role>() {
                Ok(role) => Some(role),
                Err(e) => {
                    warn!(user_id = %user_id, role = %name, error = %e, "Skipping unrecognised role");
                    None
                }
            })
            .collect();

        Ok(roles)
    }

    /// Grant a role to a user
    pub async fn assign_role(&self, user_id: Uuid, role: Role) -> Result<(), ChurchHubError> {
        sqlx::query("INSERT INTO user_roles (user_id, role) VALUES ($1, $2) ON CONFLICT DO NOTHING")
            .bind(user_id)
            .bind(role)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Set the default branch of a user
    pub async fn set_branch(&self, user_id: Uuid, branch_id: Option<Uuid>) -> Result<User, ChurchHubError> {
        let sql = format!(
            "UPDATE users SET branch_id = $2, updated_at = $3 WHERE id = $1 RETURNING {}",
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(user_id)
            .bind(branch_id)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await?;

        Ok(user)
    }
}
