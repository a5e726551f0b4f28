use crate::{
    entities::contact::{
        validate_contact_form, ContactForm, ContactListQuery, ContactListResponse, ContactMessage,
        ContactStats, ContactStatus, ListContactsParams, StatusChange, SubmissionMeta,
        UpdateStatusRequest,
    },
    errors::AppError,
    repositories::contact::ContactRepository,
};

const DEFAULT_PAGE_SIZE: u32 = 20;
const MAX_PAGE_SIZE: u32 = 100;

pub struct ContactHandler<R>
where
    R: ContactRepository,
{
    pub contact_repo: R,
}

impl<R> ContactHandler<R>
where
    R: ContactRepository,
{
    pub fn new(contact_repo: R) -> Self {
        ContactHandler { contact_repo }
    }

    /// Validate, sanitize and persist one submission. Nothing is written
    /// unless every field rule passes.
    pub async fn submit(
        &self,
        form: ContactForm,
        meta: SubmissionMeta,
    ) -> Result<ContactMessage, AppError> {
        validate_contact_form(&form)?;

        let new_contact = form.sanitize(meta);

        self.contact_repo.create_contact(&new_contact).await
    }

    /// Paginated triage listing, newest first, with optional exact-status
    /// and case-insensitive substring filters.
    pub async fn list(&self, params: ListContactsParams) -> Result<ContactListResponse, AppError> {
        let page = params.page.unwrap_or(1).max(1);
        let limit = params
            .limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);

        let status = match params.status.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => Some(
                ContactStatus::try_from(raw.to_string())
                    .map_err(|_| AppError::field_error("status", "Unknown status filter"))?,
            ),
            _ => None,
        };

        let search = params
            .search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let query = ContactListQuery {
            page,
            limit,
            status,
            search,
        };

        let (contacts, total) = self.contact_repo.list_contacts(&query).await?;

        let total_pages = if total == 0 {
            0
        } else {
            (total + limit as i64 - 1) / limit as i64
        };

        Ok(ContactListResponse {
            success: true,
            contacts,
            total,
            total_pages,
            current_page: page,
        })
    }

    /// Flat status transition: any status may follow any other. Omitted
    /// notes preserve whatever is stored.
    pub async fn update_status(
        &self,
        id: i64,
        request: UpdateStatusRequest,
        acting_admin: &str,
    ) -> Result<ContactMessage, AppError> {
        let status = ContactStatus::try_from(request.status.trim().to_string()).map_err(|_| {
            AppError::field_error(
                "status",
                "Status must be one of: new, in_progress, replied, closed, spam",
            )
        })?;

        let admin_notes = request
            .admin_notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        let change = StatusChange {
            status,
            admin_notes,
            acting_admin: acting_admin.to_string(),
        };

        match self.contact_repo.update_status(id, &change).await? {
            Some(contact) => Ok(contact),
            None => Err(AppError::NotFound("Contact message not found".into())),
        }
    }

    pub async fn stats(&self) -> Result<ContactStats, AppError> {
        self.contact_repo.contact_stats().await
    }
}
