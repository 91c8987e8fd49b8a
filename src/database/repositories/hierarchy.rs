//! District and branch repository implementation

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;
use crate::models::hierarchy::{Branch, District};
use crate::policy::DistrictLookup;
use crate::utils::errors::Result;

#[derive(Clone, Debug)]
pub struct HierarchyRepository {
    pool: PgPool,
}

impl HierarchyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List all districts
    pub async fn list_districts(&self) -> Result<Vec<District>> {
        let districts = sqlx::query_as::<_, District>(
            "SELECT id, name, head_admin_id, created_at FROM districts ORDER BY name ASC"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(districts)
    }

    /// Find district by ID
    pub async fn find_district(&self, id: Uuid) -> Result<Option<District>> {
        let district = sqlx::query_as::<_, District>(
            "SELECT id, name, head_admin_id, created_at FROM districts WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(district)
    }

    /// District whose head admin is the given user
    pub async fn find_by_head_admin(&self, user_id: Uuid) -> Result<Option<District>> {
        let district = sqlx::query_as::<_, District>(
            "SELECT id, name, head_admin_id, created_at FROM districts WHERE head_admin_id = $1 ORDER BY created_at ASC LIMIT 1"
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(district)
    }

    /// Find branch by ID
    pub async fn find_branch(&self, id: Uuid) -> Result<Option<Branch>> {
        let branch = sqlx::query_as::<_, Branch>(
            "SELECT id, district_id, name, is_district_hq, created_at FROM branches WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(branch)
    }

    /// Branches of a district, headquarters first
    pub async fn list_branches(&self, district_id: Uuid) -> Result<Vec<Branch>> {
        let branches = sqlx::query_as::<_, Branch>(
            "SELECT id, district_id, name, is_district_hq, created_at FROM branches WHERE district_id = $1 ORDER BY is_district_hq DESC, name ASC"
        )
        .bind(district_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(branches)
    }

    /// Whether a branch belongs to the given district
    pub async fn branch_in_district(&self, branch_id: Uuid, district_id: Uuid) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM branches WHERE id = $1 AND district_id = $2)"
        )
        .bind(branch_id)
        .bind(district_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}

#[async_trait]
impl DistrictLookup for HierarchyRepository {
    async fn administered_district(&self, user_id: Uuid) -> Result<Option<Uuid>> {
        Ok(self.find_by_head_admin(user_id).await?.map(|district| district.id))
    }
}
