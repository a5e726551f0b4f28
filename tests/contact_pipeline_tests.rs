use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use chrono::Utc;
use mockall::mock;
use parking_lot::Mutex;

use creatorit_backend::{
    email::{
        dispatcher::NotificationDispatcher,
        mailer::{MailTransport, OutgoingEmail},
    },
    entities::contact::{
        ContactForm, ContactListQuery, ContactMessage, ContactStats, ContactStatus,
        ListContactsParams, NewContact, StatusChange, SubmissionMeta, UpdateStatusRequest,
    },
    errors::AppError,
    repositories::contact::ContactRepository,
    use_cases::contact::ContactHandler,
};

mock! {
    ContactRepo {}

    #[async_trait]
    impl ContactRepository for ContactRepo {
        async fn create_contact(&self, contact: &NewContact) -> Result<ContactMessage, AppError>;
        async fn list_contacts(
            &self,
            query: &ContactListQuery,
        ) -> Result<(Vec<ContactMessage>, i64), AppError>;
        async fn update_status(
            &self,
            id: i64,
            change: &StatusChange,
        ) -> Result<Option<ContactMessage>, AppError>;
        async fn contact_stats(&self) -> Result<ContactStats, AppError>;
    }
}

fn valid_form() -> ContactForm {
    serde_json::from_value(serde_json::json!({
        "name": "Jo Lee",
        "email": "Jo@X.com",
        "phone": "9876543210",
        "countryCode": "+91",
        "subject": "Need a website",
        "message": "I would like a quote for a 10-page business site please."
    }))
    .expect("valid form json")
}

fn persisted(contact: &NewContact, id: i64) -> ContactMessage {
    ContactMessage {
        id,
        name: contact.name.clone(),
        email: contact.email.clone(),
        phone: contact.phone.clone(),
        country_code: contact.country_code.clone(),
        company: contact.company.clone(),
        subject: contact.subject.clone(),
        service_interest: contact.service_interest.clone(),
        budget_range: contact.budget_range.clone(),
        message: contact.message.clone(),
        is_verified: false,
        captcha_score: contact.captcha_score,
        ip_address: contact.ip_address.clone(),
        user_agent: contact.user_agent.clone(),
        status: ContactStatus::New,
        admin_notes: None,
        replied_at: None,
        replied_by: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

struct RecordingTransport {
    sent: Arc<Mutex<Vec<OutgoingEmail>>>,
}

#[async_trait]
impl MailTransport for RecordingTransport {
    async fn deliver(&self, mail: &OutgoingEmail) -> anyhow::Result<()> {
        self.sent.lock().push(mail.clone());
        Ok(())
    }
}

#[tokio::test]
async fn valid_submission_persists_once_with_status_new() {
    let mut repo = MockContactRepo::new();
    repo.expect_create_contact()
        .times(1)
        .withf(|contact| {
            contact.email == "jo@x.com"
                && contact.phone == "9876543210"
                && contact.country_code == "+91"
        })
        .returning(|contact| Ok(persisted(contact, 7)));

    let handler = ContactHandler::new(repo);
    let contact = handler
        .submit(valid_form(), SubmissionMeta::default())
        .await
        .expect("valid submission should persist");

    assert_eq!(contact.id, 7);
    assert_eq!(contact.status, ContactStatus::New);
    assert!(!contact.is_verified);
}

#[tokio::test]
async fn invalid_submission_never_reaches_the_repository() {
    let mut repo = MockContactRepo::new();
    repo.expect_create_contact().times(0);

    let handler = ContactHandler::new(repo);

    let mut form = valid_form();
    form.message = "too short".into();

    match handler.submit(form, SubmissionMeta::default()).await {
        Err(AppError::ValidationError(errors)) => {
            assert!(errors.contains_key("message"));
        }
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[tokio::test]
async fn submission_captures_request_metadata() {
    let mut repo = MockContactRepo::new();
    repo.expect_create_contact()
        .times(1)
        .withf(|contact| {
            contact.captcha_score == Some(0.9)
                && contact.ip_address.as_deref() == Some("203.0.113.9")
                && contact.user_agent.as_deref() == Some("test-agent")
        })
        .returning(|contact| Ok(persisted(contact, 1)));

    let handler = ContactHandler::new(repo);
    let meta = SubmissionMeta {
        captcha_score: Some(0.9),
        ip_address: Some("203.0.113.9".into()),
        user_agent: Some("test-agent".into()),
    };

    handler
        .submit(valid_form(), meta)
        .await
        .expect("submission should persist");
}

#[tokio::test]
async fn unknown_status_string_is_rejected_before_the_repository() {
    let mut repo = MockContactRepo::new();
    repo.expect_update_status().times(0);

    let handler = ContactHandler::new(repo);
    let request = UpdateStatusRequest {
        status: "archived".into(),
        admin_notes: None,
    };

    match handler.update_status(1, request, "admin").await {
        Err(AppError::ValidationError(errors)) => assert!(errors.contains_key("status")),
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[tokio::test]
async fn omitted_notes_pass_through_as_none() {
    let mut repo = MockContactRepo::new();
    repo.expect_update_status()
        .times(1)
        .withf(|id, change| {
            *id == 7
                && change.status == ContactStatus::InProgress
                && change.admin_notes.is_none()
                && change.acting_admin == "admin"
        })
        .returning(|_, change| {
            let base = NewContact {
                name: "Jo Lee".into(),
                email: "jo@x.com".into(),
                phone: "9876543210".into(),
                country_code: "+91".into(),
                company: None,
                subject: "Need a website".into(),
                service_interest: None,
                budget_range: None,
                message: "I would like a quote for a 10-page business site please.".into(),
                captcha_score: None,
                ip_address: None,
                user_agent: None,
            };
            let mut contact = persisted(&base, 7);
            contact.status = change.status;
            // stored notes survive an omitted adminNotes field
            contact.admin_notes = Some("earlier note".into());
            Ok(Some(contact))
        });

    let handler = ContactHandler::new(repo);
    let request = UpdateStatusRequest {
        status: "in_progress".into(),
        admin_notes: None,
    };

    let contact = handler
        .update_status(7, request, "admin")
        .await
        .expect("update should succeed");

    assert_eq!(contact.status, ContactStatus::InProgress);
    assert_eq!(contact.admin_notes.as_deref(), Some("earlier note"));
}

#[tokio::test]
async fn unknown_id_maps_to_not_found() {
    let mut repo = MockContactRepo::new();
    repo.expect_update_status().times(1).returning(|_, _| Ok(None));

    let handler = ContactHandler::new(repo);
    let request = UpdateStatusRequest {
        status: "closed".into(),
        admin_notes: None,
    };

    match handler.update_status(9999, request, "admin").await {
        Err(AppError::NotFound(_)) => {}
        other => panic!("expected not found, got {:?}", other),
    }
}

#[tokio::test]
async fn listing_computes_pagination_and_normalizes_filters() {
    let mut repo = MockContactRepo::new();
    repo.expect_list_contacts()
        .times(1)
        .withf(|query| {
            query.page == 2
                && query.limit == 20
                && query.status == Some(ContactStatus::New)
                && query.search.as_deref() == Some("acme")
        })
        .returning(|_| Ok((Vec::new(), 45)));

    let handler = ContactHandler::new(repo);
    let params = ListContactsParams {
        page: Some(2),
        limit: None,
        status: Some("new".into()),
        search: Some("  acme  ".into()),
    };

    let response = handler.list(params).await.expect("listing should succeed");

    assert_eq!(response.total, 45);
    assert_eq!(response.total_pages, 3);
    assert_eq!(response.current_page, 2);
}

#[tokio::test]
async fn bad_status_filter_is_rejected() {
    let mut repo = MockContactRepo::new();
    repo.expect_list_contacts().times(0);

    let handler = ContactHandler::new(repo);
    let params = ListContactsParams {
        page: None,
        limit: None,
        status: Some("bogus".into()),
        search: None,
    };

    assert!(matches!(
        handler.list(params).await,
        Err(AppError::ValidationError(_))
    ));
}

#[tokio::test]
async fn dispatcher_attempts_exactly_two_sends() {
    let sent = Arc::new(Mutex::new(Vec::new()));
    let transport = Arc::new(RecordingTransport { sent: sent.clone() });

    let dispatcher = NotificationDispatcher::new(
        transport,
        "hello@creatorit.in".into(),
        "https://creatorit.in".into(),
    );

    let base = NewContact {
        name: "Jo Lee".into(),
        email: "jo@x.com".into(),
        phone: "9876543210".into(),
        country_code: "+91".into(),
        company: None,
        subject: "Need a website".into(),
        service_interest: None,
        budget_range: None,
        message: "I would like a quote for a 10-page business site please.".into(),
        captcha_score: None,
        ip_address: Some("203.0.113.9".into()),
        user_agent: None,
    };
    let contact = persisted(&base, 42);

    dispatcher.notify_submission(&contact);

    for _ in 0..100 {
        if sent.lock().len() == 2 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    let sent = sent.lock();
    assert_eq!(sent.len(), 2, "admin alert and user confirmation");

    let admin = sent
        .iter()
        .find(|m| m.to == "hello@creatorit.in")
        .expect("admin alert");
    assert!(admin.body.contains("Jo Lee"));

    let user = sent.iter().find(|m| m.to == "jo@x.com").expect("user confirmation");
    assert!(user.body.contains("#42"));
    assert!(!user.body.contains("203.0.113.9"));
}
