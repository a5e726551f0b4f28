use actix_web::{get, patch, web, HttpResponse, Responder};

use crate::{
    entities::contact::{ListContactsParams, UpdateStatusRequest},
    use_cases::extractors::AdminSession,
    AppState,
};

#[get("/contacts")]
pub async fn list_contacts(
    state: web::Data<AppState>,
    _session: AdminSession,
    params: web::Query<ListContactsParams>,
) -> impl Responder {
    match state.contact_handler.list(params.into_inner()).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => e.to_http_response(),
    }
}

#[get("/contacts/stats")]
pub async fn contact_stats(state: web::Data<AppState>, _session: AdminSession) -> impl Responder {
    match state.contact_handler.stats().await {
        Ok(stats) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "stats": stats
        })),
        Err(e) => e.to_http_response(),
    }
}

#[patch("/contacts/{id}")]
pub async fn update_contact_status(
    state: web::Data<AppState>,
    session: AdminSession,
    path: web::Path<i64>,
    body: web::Json<UpdateStatusRequest>,
) -> impl Responder {
    let id = path.into_inner();

    match state
        .contact_handler
        .update_status(id, body.into_inner(), &session.admin)
        .await
    {
        Ok(contact) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "contact": contact
        })),
        Err(e) => e.to_http_response(),
    }
}
