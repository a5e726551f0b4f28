use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    domain::phone_rules,
    errors::{field_error_map, AppError, FieldErrors},
};

/// Triage workflow state. Transitions are deliberately unrestricted:
/// any status may follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactStatus {
    New,
    InProgress,
    Replied,
    Closed,
    Spam,
}

impl ContactStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactStatus::New => "new",
            ContactStatus::InProgress => "in_progress",
            ContactStatus::Replied => "replied",
            ContactStatus::Closed => "closed",
            ContactStatus::Spam => "spam",
        }
    }
}

impl TryFrom<String> for ContactStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "new" => Ok(ContactStatus::New),
            "in_progress" => Ok(ContactStatus::InProgress),
            "replied" => Ok(ContactStatus::Replied),
            "closed" => Ok(ContactStatus::Closed),
            "spam" => Ok(ContactStatus::Spam),
            other => Err(format!("unknown contact status: {}", other)),
        }
    }
}

impl std::fmt::Display for ContactStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw contact-form submission as received on the wire.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ContactForm {
    #[validate(length(min = 2, max = 100, message = "Name must be between 2 and 100 characters"))]
    pub name: String,

    #[validate(email(message = "Must be a valid email address"))]
    pub email: String,

    #[validate(length(min = 8, max = 15, message = "Phone number must be between 8 and 15 characters"))]
    pub phone: String,

    pub country_code: String,

    #[validate(length(max = 200, message = "Company name must be at most 200 characters"))]
    pub company: Option<String>,

    #[validate(length(min = 3, max = 200, message = "Subject must be between 3 and 200 characters"))]
    pub subject: String,

    #[validate(length(max = 100, message = "Service interest must be at most 100 characters"))]
    pub service_interest: Option<String>,

    #[validate(length(max = 50, message = "Budget range must be at most 50 characters"))]
    pub budget_range: Option<String>,

    #[validate(length(min = 20, max = 2000, message = "Message must be between 20 and 2000 characters"))]
    pub message: String,

    pub captcha_token: Option<String>,
}

/// Field-bound checks from the derive plus the country-specific phone rule.
/// Returns every violated field at once, first rule per field, and never
/// panics on expected bad input.
pub fn validate_contact_form(form: &ContactForm) -> Result<(), AppError> {
    let mut errors: FieldErrors = match form.validate() {
        Ok(()) => FieldErrors::new(),
        Err(e) => field_error_map(e),
    };

    let country_code = form.country_code.trim();
    if !phone_rules::supported_country(country_code) {
        errors
            .entry("countryCode".to_string())
            .or_insert_with(|| "Unsupported country code".to_string());
    } else if !errors.contains_key("phone") {
        if let Err(msg) = phone_rules::validate_phone(country_code, &form.phone) {
            errors.insert("phone".to_string(), msg.to_string());
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::ValidationError(errors))
    }
}

/// Request-scoped trust context captured by the intake endpoint.
#[derive(Debug, Default, Clone)]
pub struct SubmissionMeta {
    pub captcha_score: Option<f64>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// Sanitized, validated record ready for insertion.
#[derive(Debug, Clone)]
pub struct NewContact {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub country_code: String,
    pub company: Option<String>,
    pub subject: String,
    pub service_interest: Option<String>,
    pub budget_range: Option<String>,
    pub message: String,
    pub captcha_score: Option<f64>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

impl ContactForm {
    /// Applied only after validation passes: trims, lowercases the email,
    /// keeps the phone digits-only and nullifies empty optional fields.
    pub fn sanitize(self, meta: SubmissionMeta) -> NewContact {
        let phone_digits: String = phone_rules::strip_formatting(self.phone.trim())
            .chars()
            .filter(|c| c.is_ascii_digit())
            .collect();

        NewContact {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            phone: phone_digits,
            country_code: self.country_code.trim().to_string(),
            company: non_empty(self.company),
            subject: self.subject.trim().to_string(),
            service_interest: non_empty(self.service_interest),
            budget_range: non_empty(self.budget_range),
            message: self.message.trim().to_string(),
            captcha_score: meta.captcha_score,
            ip_address: meta.ip_address,
            user_agent: meta.user_agent,
        }
    }
}

/// Persisted contact message plus its triage state.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub country_code: String,
    pub company: Option<String>,
    pub subject: String,
    pub service_interest: Option<String>,
    pub budget_range: Option<String>,
    pub message: String,
    pub is_verified: bool,
    pub captcha_score: Option<f64>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: ContactStatus,
    pub admin_notes: Option<String>,
    pub replied_at: Option<DateTime<Utc>>,
    pub replied_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Query parameters accepted by the admin listing endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ListContactsParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub status: Option<String>,
    pub search: Option<String>,
}

/// Normalized listing query handed to the repository.
#[derive(Debug, Clone)]
pub struct ContactListQuery {
    pub page: u32,
    pub limit: u32,
    pub status: Option<ContactStatus>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    pub status: String,
    pub admin_notes: Option<String>,
}

/// Repository-level status mutation. Omitted notes preserve stored notes.
#[derive(Debug, Clone)]
pub struct StatusChange {
    pub status: ContactStatus,
    pub admin_notes: Option<String>,
    pub acting_admin: String,
}

#[derive(Debug, Default, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ContactStats {
    pub total: i64,
    pub new: i64,
    pub in_progress: i64,
    pub replied: i64,
    pub closed: i64,
    pub spam: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmittedResponse {
    pub success: bool,
    pub message: String,
    pub contact_id: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactListResponse {
    pub success: bool,
    pub contacts: Vec<ContactMessage>,
    pub total: i64,
    pub total_pages: i64,
    pub current_page: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> ContactForm {
        ContactForm {
            name: "Jo Lee".into(),
            email: "Jo@X.com".into(),
            phone: "98765 43210".into(),
            country_code: "+91".into(),
            company: Some("  ".into()),
            subject: "Need a website".into(),
            service_interest: None,
            budget_range: Some("$1k-$5k".into()),
            message: "I would like a quote for a 10-page business site please.".into(),
            captcha_token: None,
        }
    }

    #[test]
    fn valid_form_passes() {
        assert!(validate_contact_form(&valid_form()).is_ok());
    }

    #[test]
    fn short_name_is_keyed_by_field() {
        let mut form = valid_form();
        form.name = "J".into();
        match validate_contact_form(&form) {
            Err(AppError::ValidationError(errors)) => {
                assert!(errors.contains_key("name"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn bad_email_is_rejected() {
        let mut form = valid_form();
        form.email = "not-an-email".into();
        match validate_contact_form(&form) {
            Err(AppError::ValidationError(errors)) => assert!(errors.contains_key("email")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn short_message_is_rejected() {
        let mut form = valid_form();
        form.message = "too short".into();
        match validate_contact_form(&form) {
            Err(AppError::ValidationError(errors)) => assert!(errors.contains_key("message")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn unknown_country_code_fails_closed() {
        let mut form = valid_form();
        form.country_code = "+999".into();
        match validate_contact_form(&form) {
            Err(AppError::ValidationError(errors)) => {
                assert!(errors.contains_key("countryCode"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn wrong_country_phone_is_keyed_on_phone() {
        let mut form = valid_form();
        form.phone = "1234567890".into();
        match validate_contact_form(&form) {
            Err(AppError::ValidationError(errors)) => assert!(errors.contains_key("phone")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn sanitize_normalizes_fields() {
        let contact = valid_form().sanitize(SubmissionMeta {
            captcha_score: Some(0.9),
            ip_address: Some("203.0.113.9".into()),
            user_agent: Some("test-agent".into()),
        });

        assert_eq!(contact.email, "jo@x.com");
        assert_eq!(contact.phone, "9876543210");
        assert_eq!(contact.company, None, "blank optionals become None");
        assert_eq!(contact.budget_range.as_deref(), Some("$1k-$5k"));
        assert_eq!(contact.captcha_score, Some(0.9));
    }

    #[test]
    fn status_round_trips_through_strings() {
        for status in [
            ContactStatus::New,
            ContactStatus::InProgress,
            ContactStatus::Replied,
            ContactStatus::Closed,
            ContactStatus::Spam,
        ] {
            let parsed = ContactStatus::try_from(status.as_str().to_string()).unwrap();
            assert_eq!(parsed, status);
        }
        assert!(ContactStatus::try_from("archived".to_string()).is_err());
    }
}
