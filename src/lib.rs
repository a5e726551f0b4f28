mod domain;
mod infrastructure;
mod interfaces;
pub mod background_task;
pub mod constants;
pub mod errors;
pub mod graceful_shutdown;
pub mod settings;

pub use domain::{entities, phone_rules, use_cases};
pub use infrastructure::{captcha, db, email, limiter, utils};
pub use interfaces::{handlers, repositories, routes};

use std::sync::Arc;

use sqlx::PgPool;

use captcha::verifier::CaptchaVerifier;
use email::{
    dispatcher::NotificationDispatcher,
    mailer::{LogMailer, MailTransport, SmtpMailer},
};
use limiter::rate_limiter::FixedWindowLimiter;
use repositories::sqlx_repo::{SqlxBlockRepo, SqlxContactRepo};
use use_cases::{blocks::BlockHandler, contact::ContactHandler};

pub type AppContactHandler = ContactHandler<SqlxContactRepo>;
pub type AppBlockHandler = BlockHandler<SqlxBlockRepo>;

pub struct AppState {
    pub contact_handler: AppContactHandler,
    pub block_handler: AppBlockHandler,
    pub limiter: Arc<FixedWindowLimiter>,
    pub captcha: CaptchaVerifier,
    pub dispatcher: NotificationDispatcher,
    pub db_pool: PgPool,
}

impl AppState {
    pub fn new(config: &settings::AppConfig, pool: PgPool) -> Self {
        let contact_handler = ContactHandler::new(SqlxContactRepo::new(pool.clone()));
        let block_handler = BlockHandler::new(SqlxBlockRepo::new(pool.clone()));

        // Unconfigured or broken SMTP falls back to log-only delivery so
        // submissions keep working
        let transport: Arc<dyn MailTransport> = if config.smtp_configured() {
            match SmtpMailer::new(config) {
                Ok(mailer) => Arc::new(mailer),
                Err(e) => {
                    tracing::error!("SMTP transport setup failed, logging emails instead: {:#}", e);
                    Arc::new(LogMailer)
                }
            }
        } else {
            Arc::new(LogMailer)
        };

        let dispatcher = NotificationDispatcher::new(
            transport,
            config.admin_email.clone(),
            config.site_url.clone(),
        );

        AppState {
            contact_handler,
            block_handler,
            limiter: Arc::new(FixedWindowLimiter::default()),
            captcha: CaptchaVerifier::new(config.recaptcha_secret_key.clone()),
            dispatcher,
            db_pool: pool,
        }
    }
}
