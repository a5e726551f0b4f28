pub mod dispatcher;
pub mod mailer;
pub mod templates;
