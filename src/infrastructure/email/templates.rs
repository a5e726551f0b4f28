use crate::domain::entities::contact::ContactMessage;

use super::mailer::OutgoingEmail;

fn format_timestamp(contact: &ContactMessage) -> String {
    contact.created_at.format("%d %b %Y, %H:%M UTC").to_string()
}

fn optional(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("Not provided")
}

/// Full submission details for the admin inbox.
pub fn admin_alert(contact: &ContactMessage, admin_email: &str, site_url: &str) -> OutgoingEmail {
    let body = format!(
        "New contact message #{id}\n\
         \n\
         Received: {timestamp}\n\
         Status: {status}\n\
         \n\
         Name: {name}\n\
         Email: {email}\n\
         Phone: {country_code} {phone}\n\
         Company: {company}\n\
         Service interest: {service_interest}\n\
         Budget range: {budget_range}\n\
         \n\
         Subject: {subject}\n\
         \n\
         Message:\n\
         {message}\n\
         \n\
         ---\n\
         Review and reply: {site_url}/admin/contacts\n",
        id = contact.id,
        timestamp = format_timestamp(contact),
        status = contact.status,
        name = contact.name,
        email = contact.email,
        country_code = contact.country_code,
        phone = contact.phone,
        company = optional(&contact.company),
        service_interest = optional(&contact.service_interest),
        budget_range = optional(&contact.budget_range),
        subject = contact.subject,
        message = contact.message,
        site_url = site_url,
    );

    OutgoingEmail {
        to: admin_email.to_string(),
        subject: format!("New contact enquiry: {}", contact.subject),
        body,
    }
}

/// Confirmation for the submitter. Never includes internal fields
/// (admin notes, IP address, CAPTCHA score).
pub fn user_confirmation(contact: &ContactMessage, site_url: &str) -> OutgoingEmail {
    let body = format!(
        "Hi {name},\n\
         \n\
         Thanks for getting in touch with CreatorIT. We've received your\n\
         message about \"{subject}\" and logged it under reference #{id}\n\
         on {timestamp}.\n\
         \n\
         What happens next:\n\
         - Our team reviews every enquiry within one business day.\n\
         - We'll reply to this address with the next steps or any\n\
           questions about your project.\n\
         \n\
         In the meantime you can browse our work at {site_url}.\n\
         \n\
         The CreatorIT team\n",
        name = contact.name,
        subject = contact.subject,
        id = contact.id,
        timestamp = format_timestamp(contact),
        site_url = site_url,
    );

    OutgoingEmail {
        to: contact.email.clone(),
        subject: "We've received your message".to_string(),
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::contact::ContactStatus;
    use chrono::Utc;

    fn contact() -> ContactMessage {
        ContactMessage {
            id: 42,
            name: "Jo Lee".into(),
            email: "jo@x.com".into(),
            phone: "9876543210".into(),
            country_code: "+91".into(),
            company: None,
            subject: "Need a website".into(),
            service_interest: Some("Web development".into()),
            budget_range: None,
            message: "I would like a quote for a 10-page business site please.".into(),
            is_verified: false,
            captcha_score: Some(0.9),
            ip_address: Some("203.0.113.9".into()),
            user_agent: Some("test-agent".into()),
            status: ContactStatus::New,
            admin_notes: Some("internal triage note".into()),
            replied_at: None,
            replied_by: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn admin_alert_contains_submission_fields() {
        let mail = admin_alert(&contact(), "hello@creatorit.in", "https://creatorit.in");
        assert_eq!(mail.to, "hello@creatorit.in");
        assert!(mail.body.contains("Jo Lee"));
        assert!(mail.body.contains("jo@x.com"));
        assert!(mail.body.contains("+91 9876543210"));
        assert!(mail.body.contains("#42"));
        assert!(mail.body.contains("Status: new"));
    }

    #[test]
    fn user_confirmation_never_leaks_internal_fields() {
        let mail = user_confirmation(&contact(), "https://creatorit.in");
        assert_eq!(mail.to, "jo@x.com");
        assert!(mail.body.contains("Need a website"));
        assert!(mail.body.contains("#42"));
        assert!(!mail.body.contains("203.0.113.9"));
        assert!(!mail.body.contains("internal triage note"));
        assert!(!mail.body.contains("0.9"));
    }
}
