use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Homepage content tile. Presentation glue: no workflow semantics.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub link_url: Option<String>,
    pub position: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewBlock {
    #[validate(length(min = 2, max = 100, message = "Title must be between 2 and 100 characters"))]
    pub title: String,

    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,

    #[validate(length(max = 100, message = "Icon must be at most 100 characters"))]
    pub icon: Option<String>,

    #[validate(length(max = 500, message = "Link URL must be at most 500 characters"))]
    pub link_url: Option<String>,

    #[serde(default)]
    pub position: i32,

    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBlockRequest {
    #[validate(length(min = 2, max = 100, message = "Title must be between 2 and 100 characters"))]
    pub title: Option<String>,

    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,

    #[validate(length(max = 100, message = "Icon must be at most 100 characters"))]
    pub icon: Option<String>,

    #[validate(length(max = 500, message = "Link URL must be at most 500 characters"))]
    pub link_url: Option<String>,

    pub position: Option<i32>,
    pub is_active: Option<bool>,
}

/// New tile order for the homepage, first id lands at position 0.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderBlocksRequest {
    pub ordered_ids: Vec<i64>,
}
