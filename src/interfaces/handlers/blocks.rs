use actix_web::{delete, get, patch, post, put, web, HttpResponse, Responder};

use crate::{
    entities::block::{NewBlock, ReorderBlocksRequest, UpdateBlockRequest},
    use_cases::extractors::AdminSession,
    AppState,
};

/// Public homepage feed: active tiles in display order.
#[get("/blocks")]
pub async fn list_blocks(state: web::Data<AppState>) -> impl Responder {
    match state.block_handler.list(true).await {
        Ok(blocks) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "blocks": blocks
        })),
        Err(e) => e.to_http_response(),
    }
}

#[post("/blocks")]
pub async fn create_block(
    state: web::Data<AppState>,
    _session: AdminSession,
    body: web::Json<NewBlock>,
) -> impl Responder {
    match state.block_handler.create(body.into_inner()).await {
        Ok(block) => HttpResponse::Created().json(serde_json::json!({
            "success": true,
            "block": block
        })),
        Err(e) => e.to_http_response(),
    }
}

#[patch("/blocks/reorder")]
pub async fn reorder_blocks(
    state: web::Data<AppState>,
    _session: AdminSession,
    body: web::Json<ReorderBlocksRequest>,
) -> impl Responder {
    match state.block_handler.reorder(body.into_inner()).await {
        Ok(blocks) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "blocks": blocks
        })),
        Err(e) => e.to_http_response(),
    }
}

#[put("/blocks/{id}")]
pub async fn update_block(
    state: web::Data<AppState>,
    _session: AdminSession,
    path: web::Path<i64>,
    body: web::Json<UpdateBlockRequest>,
) -> impl Responder {
    match state
        .block_handler
        .update(path.into_inner(), body.into_inner())
        .await
    {
        Ok(block) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "block": block
        })),
        Err(e) => e.to_http_response(),
    }
}

#[delete("/blocks/{id}")]
pub async fn delete_block(
    state: web::Data<AppState>,
    _session: AdminSession,
    path: web::Path<i64>,
) -> impl Responder {
    match state.block_handler.delete(path.into_inner()).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": "Block deleted"
        })),
        Err(e) => e.to_http_response(),
    }
}
