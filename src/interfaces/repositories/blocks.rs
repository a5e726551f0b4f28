use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    entities::block::{Block, NewBlock, UpdateBlockRequest},
    errors::AppError,
    repositories::sqlx_repo::SqlxBlockRepo,
};

#[async_trait]
pub trait BlockRepository: Send + Sync {
    async fn list_blocks(&self, active_only: bool) -> Result<Vec<Block>, AppError>;
    async fn create_block(&self, block: &NewBlock) -> Result<Block, AppError>;
    async fn update_block(
        &self,
        id: i64,
        block: &UpdateBlockRequest,
    ) -> Result<Option<Block>, AppError>;
    async fn delete_block(&self, id: i64) -> Result<bool, AppError>;
    async fn reorder_blocks(&self, ordered_ids: &[i64]) -> Result<(), AppError>;
}

impl SqlxBlockRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxBlockRepo { pool }
    }
}

#[async_trait]
impl BlockRepository for SqlxBlockRepo {
    async fn list_blocks(&self, active_only: bool) -> Result<Vec<Block>, AppError> {
        let blocks = sqlx::query_as::<_, Block>(
            r#"
            SELECT * FROM blocks
            WHERE ($1::boolean IS FALSE OR is_active = TRUE)
            ORDER BY position ASC, id ASC
            "#,
        )
        .bind(active_only)
        .fetch_all(&self.pool)
        .await?;

        Ok(blocks)
    }

    async fn create_block(&self, block: &NewBlock) -> Result<Block, AppError> {
        let created = sqlx::query_as::<_, Block>(
            r#"
            INSERT INTO blocks (title, description, icon, link_url, position, is_active)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&block.title)
        .bind(&block.description)
        .bind(&block.icon)
        .bind(&block.link_url)
        .bind(block.position)
        .bind(block.is_active)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn update_block(
        &self,
        id: i64,
        block: &UpdateBlockRequest,
    ) -> Result<Option<Block>, AppError> {
        // COALESCE preserves stored values for omitted fields
        let updated = sqlx::query_as::<_, Block>(
            r#"
            UPDATE blocks SET
                title = COALESCE($1, title),
                description = COALESCE($2, description),
                icon = COALESCE($3, icon),
                link_url = COALESCE($4, link_url),
                position = COALESCE($5, position),
                is_active = COALESCE($6, is_active),
                updated_at = NOW()
            WHERE id = $7
            RETURNING *
            "#,
        )
        .bind(&block.title)
        .bind(&block.description)
        .bind(&block.icon)
        .bind(&block.link_url)
        .bind(block.position)
        .bind(block.is_active)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }

    async fn delete_block(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM blocks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn reorder_blocks(&self, ordered_ids: &[i64]) -> Result<(), AppError> {
        // One transaction so a half-applied drag-and-drop order never lands
        let mut tx = self.pool.begin().await?;

        for (position, id) in ordered_ids.iter().enumerate() {
            sqlx::query("UPDATE blocks SET position = $1, updated_at = NOW() WHERE id = $2")
                .bind(position as i32)
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}
