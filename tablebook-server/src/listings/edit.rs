//! Owner edit
//!
//! Full-document overwrite by the owning user. Owner id, file URLs and
//! creation time always come from the stored record.

use serde_json::Value;
use shared::error::{AppError, ErrorCode};
use shared::models::{Listing, ListingDetails, ListingDraft};
use thiserror::Error;

use super::form::validate_draft;
use super::opening_hours;
use crate::auth::{Identity, IdentityError};
use crate::db::repository::{ListingStore, RepoError};
use crate::security_log;
use crate::utils::validation::FieldErrors;

/// Edit payload
#[derive(Debug, Clone, PartialEq)]
pub struct ListingEdit {
    pub draft: ListingDraft,
    /// False when the payload had no `openingTime`; stored hours are kept
    pub replace_opening_times: bool,
}

impl ListingEdit {
    pub fn from_json(value: Value) -> Result<Self, serde_json::Error> {
        let replace_opening_times = value.get("openingTime").is_some();
        let draft = serde_json::from_value(value)?;
        Ok(Self {
            draft,
            replace_opening_times,
        })
    }
}

#[derive(Debug, Error)]
pub enum EditError {
    #[error("{0}")]
    Unauthenticated(IdentityError),

    #[error("Restaurant {0} not found")]
    NotFound(String),

    #[error("Only the owner can change this restaurant")]
    NotOwner,

    #[error("{0}")]
    Validation(FieldErrors),

    #[error("Failed to load restaurant: {0}")]
    Read(#[source] RepoError),

    #[error("Failed to save restaurant. Please try again.")]
    Write(#[source] RepoError),
}

impl From<EditError> for AppError {
    fn from(err: EditError) -> Self {
        match err {
            EditError::Unauthenticated(IdentityError::Pending) => {
                AppError::new(ErrorCode::IdentityPending)
            }
            EditError::Unauthenticated(IdentityError::SignedOut) => AppError::not_authenticated(),
            EditError::NotFound(id) => {
                AppError::new(ErrorCode::ListingNotFound).with_detail("id", id)
            }
            EditError::NotOwner => AppError::new(ErrorCode::NotListingOwner),
            EditError::Validation(errors) => errors.into(),
            EditError::Read(e) => e.into(),
            EditError::Write(_) => AppError::new(ErrorCode::ListingSaveFailed),
        }
    }
}

pub async fn overwrite_listing(
    store: &dyn ListingStore,
    identity: &Identity,
    id: &str,
    edit: ListingEdit,
) -> Result<Listing, EditError> {
    let user = identity.require().map_err(EditError::Unauthenticated)?;

    let mut errors = FieldErrors::new();
    validate_draft(&edit.draft, &mut errors);
    errors.into_result().map_err(EditError::Validation)?;

    let existing = store
        .get(id)
        .await
        .map_err(EditError::Read)?
        .ok_or_else(|| EditError::NotFound(id.to_string()))?;

    if existing.details.owner_id != user.id {
        security_log!(
            "WARN",
            "listing_edit_denied",
            listing_id = id.to_string(),
            user_id = user.id.clone()
        );
        return Err(EditError::NotOwner);
    }

    let stored = existing.details;
    let opening_times = if edit.replace_opening_times {
        opening_hours::render_week(&edit.draft.opening_times)
    } else {
        stored.opening_times
    };
    let details = ListingDetails::assemble(
        edit.draft,
        opening_times,
        stored.image_urls,
        stored.menu_url,
        stored.owner_id,
        stored.created_at,
    );

    let listing = store.overwrite(id, details).await.map_err(|e| {
        tracing::warn!(listing_id = %id, error = %e, "Listing overwrite failed");
        EditError::Write(e)
    })?;
    tracing::info!(listing_id = %id, owner_id = %user.id, "Restaurant updated");
    Ok(listing)
}
