use actix_web::{post, web, HttpRequest, HttpResponse, Responder};

use crate::{
    entities::contact::{ContactForm, ContactSubmittedResponse, SubmissionMeta},
    errors::AppError,
    utils::get_client_ip::get_client_ip,
    AppState,
};

/// Contact-form intake. Steps run in a fixed order and any failure before
/// the insert leaves no side effects: throttle, parse, CAPTCHA, validate,
/// persist, then detached notifications.
#[post("/contacts")]
pub async fn submit_contact(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Bytes,
) -> impl Responder {
    let ip = get_client_ip(&req);
    let rate_key = format!("contact_form:{}", ip);

    if !state.limiter.allow(&rate_key) {
        tracing::info!(%ip, "contact form rate limited");
        return AppError::RateLimited(
            "You've sent a few messages already. Please wait a minute and try again.".into(),
        )
        .to_http_response();
    }

    // Body is read as bytes so the throttle check runs before any parsing
    let form: ContactForm = match serde_json::from_slice(&body) {
        Ok(form) => form,
        Err(e) => {
            tracing::debug!("malformed contact payload: {}", e);
            return AppError::BadRequest("Request body must be valid JSON".into())
                .to_http_response();
        }
    };

    let outcome = state.captcha.verify(form.captcha_token.as_deref()).await;
    if !outcome.success {
        return AppError::BadRequest("CAPTCHA verification failed".into()).to_http_response();
    }

    let user_agent = req
        .headers()
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let meta = SubmissionMeta {
        captcha_score: outcome.score,
        ip_address: (ip != "unknown").then(|| ip.clone()),
        user_agent,
    };

    match state.contact_handler.submit(form, meta).await {
        Ok(contact) => {
            // Fire-and-forget: the response never waits on email delivery
            state.dispatcher.notify_submission(&contact);

            tracing::info!(contact_id = contact.id, "contact message received");

            HttpResponse::Created().json(ContactSubmittedResponse {
                success: true,
                message: "Your message has been received. We'll get back to you within one business day.".into(),
                contact_id: contact.id,
            })
        }
        Err(e) => e.to_http_response(),
    }
}
