use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};

use crate::errors::AppError;

/// Shared secret the `admin_session` cookie is checked against. This is a
/// minimal gate, not an auth system: there are no users, roles or expiry.
#[derive(Clone)]
pub struct AdminGate {
    pub session_token: String,
}

/// Extractor for admin-gated endpoints. Returns 401 when the cookie is
/// missing or wrong. Usage: add `session: AdminSession` as a handler
/// parameter.
#[derive(Debug)]
pub struct AdminSession {
    /// Identity recorded on triage actions. The cookie gate carries no
    /// username, so every acting admin is "admin".
    pub admin: String,
}

impl FromRequest for AdminSession {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let gate = match req.app_data::<web::Data<AdminGate>>() {
            Some(gate) => gate,
            None => {
                tracing::error!("AdminGate missing from app data");
                return ready(Err(
                    AppError::InternalError("admin gate not configured".into()).into()
                ));
            }
        };

        match req.cookie("admin_session") {
            Some(cookie) if cookie.value() == gate.session_token => ready(Ok(AdminSession {
                admin: "admin".to_string(),
            })),
            _ => ready(Err(AppError::UnauthorizedAccess.into())),
        }
    }
}
