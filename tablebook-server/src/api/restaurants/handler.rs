//! Restaurant API Handlers

use axum::Json;
use axum::extract::{Multipart, Path, State};
use axum::extract::multipart::Field;
use http::StatusCode;
use serde::Serialize;
use serde_json::Value;
use shared::error::ErrorCode;
use shared::models::{Listing, ListingDetailView, ListingDraft};

use crate::auth::{CurrentUser, Identity};
use crate::core::ServerState;
use crate::listings::{FileUpload, ListingEdit, ListingForm, overwrite_listing};
use crate::utils::{AppError, AppResult};

/// Multipart part names
const LISTING_PART: &str = "listing";
const IMAGES_PART: &str = "images";
const MENU_PART: &str = "menu";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub restaurant: Listing,
    /// Where the browser goes next
    pub navigate_to: &'static str,
}

async fn read_file(field: Field<'_>) -> AppResult<FileUpload> {
    let file_name = field.file_name().unwrap_or_default().to_string();
    let content_type = field.content_type().unwrap_or_default().to_string();
    let bytes = field
        .bytes()
        .await
        .map_err(|e| AppError::validation(format!("Multipart error: {}", e)))?;
    Ok(FileUpload::new(file_name, content_type, bytes))
}

/// Collect the multipart body into a form
async fn read_form(mut multipart: Multipart) -> AppResult<ListingForm> {
    let mut draft: Option<ListingDraft> = None;
    let mut form = ListingForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Invalid multipart request: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            LISTING_PART => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::validation(format!("Multipart error: {}", e)))?;
                let parsed = serde_json::from_str(&text).map_err(|e| {
                    AppError::validation(format!("Invalid listing data: {}", e))
                })?;
                draft = Some(parsed);
            }
            IMAGES_PART => form.images.push(read_file(field).await?),
            MENU_PART => form.menu = Some(read_file(field).await?),
            other => {
                tracing::debug!(part = %other, "Ignoring unknown multipart part");
            }
        }
    }

    form.draft = draft.ok_or_else(|| {
        AppError::with_message(ErrorCode::RequiredField, "Missing 'listing' part")
    })?;
    Ok(form)
}

/// POST /api/restaurants - 新建餐厅
pub async fn submit(
    State(state): State<ServerState>,
    identity: Identity,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<SubmitResponse>)> {
    let mut form = read_form(multipart).await?;
    let outcome = state.submission.submit(&identity, &mut form).await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            restaurant: outcome.listing,
            navigate_to: outcome.navigate_to,
        }),
    ))
}

/// GET /api/restaurants - 当前用户的餐厅
pub async fn list_mine(
    State(state): State<ServerState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<Listing>>> {
    let listings = state.listings.find_by_owner(&current_user.id).await?;
    Ok(Json(listings))
}

/// GET /api/restaurants/all - 全部餐厅, newest first
pub async fn list_all(State(state): State<ServerState>) -> AppResult<Json<Vec<ListingDetailView>>> {
    let listings = state.listings.list().await?;
    Ok(Json(listings.into_iter().map(ListingDetailView::from).collect()))
}

/// GET /api/restaurants/{id} - 餐厅详情
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<ListingDetailView>> {
    let listing = state.listings.get(&id).await?.ok_or_else(|| {
        AppError::new(ErrorCode::ListingNotFound).with_detail("id", id.clone())
    })?;
    Ok(Json(ListingDetailView::from(listing)))
}

/// PUT /api/restaurants/{id} - 店主覆盖编辑
pub async fn overwrite(
    State(state): State<ServerState>,
    identity: Identity,
    Path(id): Path<String>,
    Json(payload): Json<Value>,
) -> AppResult<Json<Listing>> {
    let edit = ListingEdit::from_json(payload)
        .map_err(|e| AppError::validation(format!("Invalid listing data: {}", e)))?;
    let listing = overwrite_listing(state.listings.as_ref(), &identity, &id, edit).await?;
    Ok(Json(listing))
}
