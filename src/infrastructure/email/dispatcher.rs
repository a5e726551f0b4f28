use std::sync::Arc;

use crate::domain::entities::contact::ContactMessage;

use super::{
    mailer::{MailTransport, OutgoingEmail},
    templates,
};

/// Composes and sends the two notification emails for a persisted
/// submission. Delivery is detached from the request: `notify_submission`
/// returns immediately and each send logs its own failure, so a transient
/// SMTP outage never fails the HTTP response.
#[derive(Clone)]
pub struct NotificationDispatcher {
    transport: Arc<dyn MailTransport>,
    admin_email: String,
    site_url: String,
}

impl NotificationDispatcher {
    pub fn new(transport: Arc<dyn MailTransport>, admin_email: String, site_url: String) -> Self {
        NotificationDispatcher {
            transport,
            admin_email,
            site_url,
        }
    }

    pub fn compose(&self, contact: &ContactMessage) -> [OutgoingEmail; 2] {
        [
            templates::admin_alert(contact, &self.admin_email, &self.site_url),
            templates::user_confirmation(contact, &self.site_url),
        ]
    }

    pub fn notify_submission(&self, contact: &ContactMessage) {
        for mail in self.compose(contact) {
            let transport = self.transport.clone();
            let contact_id = contact.id;
            tokio::spawn(async move {
                if let Err(e) = transport.deliver(&mail).await {
                    tracing::error!(
                        contact_id,
                        to = %mail.to,
                        "notification delivery failed: {:#}",
                        e
                    );
                }
            });
        }
    }
}
