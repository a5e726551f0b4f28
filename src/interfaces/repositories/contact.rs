use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    entities::contact::{ContactListQuery, ContactMessage, ContactStats, NewContact, StatusChange},
    errors::AppError,
    repositories::sqlx_repo::SqlxContactRepo,
};

#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// Insert a validated, sanitized submission. Initial status is always
    /// `new` and the row is written atomically or not at all.
    async fn create_contact(&self, contact: &NewContact) -> Result<ContactMessage, AppError>;

    /// Page of messages newest-first plus the total count for the same
    /// filter predicate.
    async fn list_contacts(
        &self,
        query: &ContactListQuery,
    ) -> Result<(Vec<ContactMessage>, i64), AppError>;

    /// Apply a status change; `None` means the id does not exist.
    async fn update_status(
        &self,
        id: i64,
        change: &StatusChange,
    ) -> Result<Option<ContactMessage>, AppError>;

    async fn contact_stats(&self) -> Result<ContactStats, AppError>;
}

impl SqlxContactRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxContactRepo { pool }
    }
}

// replied_at is reset on every transition into `replied`, including
// repeated ones; it is never cleared by any other transition.
const UPDATE_STATUS_SQL: &str = r#"
    UPDATE contact_messages SET
        status = $1,
        admin_notes = COALESCE($2, admin_notes),
        replied_at = CASE WHEN $1 = 'replied' THEN NOW() ELSE replied_at END,
        replied_by = CASE WHEN $1 = 'replied' THEN $3 ELSE replied_by END,
        updated_at = NOW()
    WHERE id = $4
    RETURNING *
"#;

fn push_filters<'a>(builder: &mut QueryBuilder<'a, Postgres>, query: &'a ContactListQuery) {
    if let Some(status) = query.status {
        builder.push(" AND status = ").push_bind(status.as_str());
    }

    if let Some(search) = query.search.as_deref() {
        let pattern = format!("%{}%", search);
        builder.push(" AND (name ILIKE ").push_bind(pattern.clone());
        builder.push(" OR email ILIKE ").push_bind(pattern.clone());
        builder.push(" OR company ILIKE ").push_bind(pattern.clone());
        builder.push(" OR subject ILIKE ").push_bind(pattern);
        builder.push(")");
    }
}

#[async_trait]
impl ContactRepository for SqlxContactRepo {
    async fn create_contact(&self, contact: &NewContact) -> Result<ContactMessage, AppError> {
        let created = sqlx::query_as::<_, ContactMessage>(
            r#"
            INSERT INTO contact_messages (
                name, email, phone, country_code, company, subject,
                service_interest, budget_range, message,
                is_verified, captcha_score, ip_address, user_agent, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, FALSE, $10, $11, $12, 'new')
            RETURNING *
            "#,
        )
        .bind(&contact.name)
        .bind(&contact.email)
        .bind(&contact.phone)
        .bind(&contact.country_code)
        .bind(&contact.company)
        .bind(&contact.subject)
        .bind(&contact.service_interest)
        .bind(&contact.budget_range)
        .bind(&contact.message)
        .bind(contact.captcha_score)
        .bind(&contact.ip_address)
        .bind(&contact.user_agent)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn list_contacts(
        &self,
        query: &ContactListQuery,
    ) -> Result<(Vec<ContactMessage>, i64), AppError> {
        let limit = query.limit as i64;
        let offset = (query.page.saturating_sub(1) as i64) * limit;

        let mut builder =
            QueryBuilder::new("SELECT * FROM contact_messages WHERE 1 = 1");
        push_filters(&mut builder, query);
        builder.push(" ORDER BY created_at DESC");
        builder.push(" LIMIT ").push_bind(limit);
        builder.push(" OFFSET ").push_bind(offset);

        let contacts: Vec<ContactMessage> = builder
            .build_query_as::<ContactMessage>()
            .fetch_all(&self.pool)
            .await?;

        let mut count_builder =
            QueryBuilder::new("SELECT COUNT(*) FROM contact_messages WHERE 1 = 1");
        push_filters(&mut count_builder, query);

        let total: i64 = count_builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        Ok((contacts, total))
    }

    async fn update_status(
        &self,
        id: i64,
        change: &StatusChange,
    ) -> Result<Option<ContactMessage>, AppError> {
        let updated = sqlx::query_as::<_, ContactMessage>(UPDATE_STATUS_SQL)
        .bind(change.status.as_str())
        .bind(&change.admin_notes)
        .bind(&change.acting_admin)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }

    async fn contact_stats(&self) -> Result<ContactStats, AppError> {
        let stats = sqlx::query_as::<_, ContactStats>(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE status = 'new') AS "new",
                COUNT(*) FILTER (WHERE status = 'in_progress') AS in_progress,
                COUNT(*) FILTER (WHERE status = 'replied') AS replied,
                COUNT(*) FILTER (WHERE status = 'closed') AS closed,
                COUNT(*) FILTER (WHERE status = 'spam') AS spam
            FROM contact_messages
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(stats)
    }
}
