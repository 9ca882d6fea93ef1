//! Listing submission
//!
//! identity check → form validation → sequential uploads (images, then
//! menu) → one document create → form reset.
//!
//! Uploads are not rolled back when the create fails; the keys written so
//! far are logged at `warn` as orphaned.

use std::sync::Arc;

use shared::error::{AppError, ErrorCode};
use shared::models::{Listing, ListingDetails};
use thiserror::Error;

use super::form::{FileUpload, ListingForm};
use super::opening_hours;
use crate::auth::{Identity, IdentityError};
use crate::db::repository::{ListingStore, RepoError};
use crate::storage::{FileKind, ObjectStore, StorageError, storage_key};
use crate::utils::validation::FieldErrors;

/// Where the client goes after a successful submission
pub const LISTINGS_PATH: &str = "/restaurants";

const SIGN_IN_MESSAGE: &str = "Sign in before listing a restaurant";

#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("Sign in before listing a restaurant")]
    Unauthenticated(IdentityError),

    #[error("{0}")]
    Validation(FieldErrors),

    #[error("Failed to create restaurant. Please try again.")]
    Upload {
        key: String,
        #[source]
        source: StorageError,
    },

    #[error("Failed to create restaurant. Please try again.")]
    Write {
        #[source]
        source: RepoError,
        orphaned: Vec<String>,
    },
}

impl From<SubmissionError> for AppError {
    fn from(err: SubmissionError) -> Self {
        match err {
            SubmissionError::Unauthenticated(IdentityError::Pending) => {
                AppError::new(ErrorCode::IdentityPending)
            }
            SubmissionError::Unauthenticated(IdentityError::SignedOut) => {
                AppError::with_message(ErrorCode::NotAuthenticated, SIGN_IN_MESSAGE)
            }
            SubmissionError::Validation(errors) => errors.into(),
            SubmissionError::Upload { .. } | SubmissionError::Write { .. } => {
                AppError::new(ErrorCode::ListingCreateFailed)
            }
        }
    }
}

/// Result of a successful submission
#[derive(Debug, Clone)]
pub struct SubmissionOutcome {
    pub listing: Listing,
    pub navigate_to: &'static str,
}

/// Listing submission workflow
#[derive(Clone)]
pub struct SubmissionFlow {
    listings: Arc<dyn ListingStore>,
    objects: Arc<dyn ObjectStore>,
}

impl SubmissionFlow {
    pub fn new(listings: Arc<dyn ListingStore>, objects: Arc<dyn ObjectStore>) -> Self {
        Self { listings, objects }
    }

    /// Submit `form` on behalf of `identity`.
    ///
    /// On success the form is reset to its default. On any error the form
    /// is left untouched so the caller can retry.
    pub async fn submit(
        &self,
        identity: &Identity,
        form: &mut ListingForm,
    ) -> Result<SubmissionOutcome, SubmissionError> {
        let user = identity
            .require()
            .map_err(SubmissionError::Unauthenticated)?;
        let menu = form.validate().map_err(SubmissionError::Validation)?;

        let millis = shared::util::now_millis();
        let name = form.draft.name.trim();
        let mut uploaded: Vec<String> = Vec::with_capacity(form.images.len() + 1);

        let mut image_urls = Vec::with_capacity(form.images.len());
        for image in &form.images {
            let url = self
                .upload(FileKind::Image, name, image, millis, &mut uploaded)
                .await?;
            image_urls.push(url);
        }
        let menu_url = self
            .upload(FileKind::Menu, name, menu, millis, &mut uploaded)
            .await?;

        let details = ListingDetails::assemble(
            form.draft.clone(),
            opening_hours::render_week(&form.draft.opening_times),
            image_urls,
            menu_url,
            user.id.clone(),
            millis,
        );

        match self.listings.create(details).await {
            Ok(listing) => {
                tracing::info!(
                    listing_id = %listing.id,
                    owner_id = %user.id,
                    images = listing.details.image_urls.len(),
                    "Restaurant listed"
                );
                *form = ListingForm::default();
                Ok(SubmissionOutcome {
                    listing,
                    navigate_to: LISTINGS_PATH,
                })
            }
            Err(source) => {
                tracing::warn!(
                    error = %source,
                    orphaned = ?uploaded,
                    "Listing write failed after uploads"
                );
                Err(SubmissionError::Write {
                    source,
                    orphaned: uploaded,
                })
            }
        }
    }

    async fn upload(
        &self,
        kind: FileKind,
        listing_name: &str,
        file: &FileUpload,
        millis: i64,
        uploaded: &mut Vec<String>,
    ) -> Result<String, SubmissionError> {
        let key = storage_key(kind, listing_name, &file.file_name, millis);
        match self
            .objects
            .put(&key, &file.mime_type(), file.bytes.clone())
            .await
        {
            Ok(object) => {
                uploaded.push(key);
                Ok(self.objects.public_url(&object))
            }
            Err(source) => {
                tracing::warn!(
                    key = %key,
                    error = %source,
                    orphaned = ?uploaded,
                    "Upload failed, aborting submission"
                );
                Err(SubmissionError::Upload { key, source })
            }
        }
    }
}
