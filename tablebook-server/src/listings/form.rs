//! Listing form
//!
//! The whole submission (editable fields plus selected files) is one
//! [`ListingForm`] value and is validated as a unit before anything is
//! uploaded.

use axum::body::Bytes;
use rust_decimal::Decimal;
use shared::models::ListingDraft;

use super::opening_hours;
use crate::utils::ErrorCode;
use crate::utils::validation::{
    FieldErrors, MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, MAX_TEXT_LEN,
};

/// Maximum image size (5MB)
pub const MAX_IMAGE_SIZE: usize = 5 * 1024 * 1024;

/// Maximum menu document size (10MB)
pub const MAX_MENU_SIZE: usize = 10 * 1024 * 1024;

/// Images per listing
pub const MAX_IMAGES: usize = 10;

/// The only accepted menu document type
pub const MENU_CONTENT_TYPE: &str = "application/pdf";

const OCTET_STREAM: &str = "application/octet-stream";

/// A file selected in the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    /// Original file name, used for the extension of the storage key
    pub file_name: String,
    /// Content type declared by the client, possibly empty
    pub content_type: String,
    pub bytes: Bytes,
}

impl FileUpload {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Effective MIME type: the declared one, or a guess from the file
    /// extension when the declaration is empty or `application/octet-stream`.
    /// Parameters (`; charset=...`) are dropped.
    pub fn mime_type(&self) -> String {
        let declared = self
            .content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        if !declared.is_empty() && declared != OCTET_STREAM {
            return declared;
        }
        mime_guess::from_path(&self.file_name)
            .first_raw()
            .map(str::to_string)
            .unwrap_or_else(|| OCTET_STREAM.to_string())
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// Everything the owner filled in
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingForm {
    pub draft: ListingDraft,
    pub images: Vec<FileUpload>,
    pub menu: Option<FileUpload>,
}

impl ListingForm {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Validate fields and files together. Returns the menu document,
    /// which a valid form always has.
    pub fn validate(&self) -> Result<&FileUpload, FieldErrors> {
        let mut errors = FieldErrors::new();
        validate_draft(&self.draft, &mut errors);
        validate_files(&self.images, self.menu.as_ref(), &mut errors);
        match self.menu.as_ref() {
            Some(menu) if errors.is_empty() => Ok(menu),
            _ => Err(errors),
        }
    }
}

/// Field checks shared by submission and owner edit
pub fn validate_draft(draft: &ListingDraft, errors: &mut FieldErrors) {
    errors.required_text("name", &draft.name, MAX_NAME_LEN);
    errors.required_text("address", &draft.address, MAX_ADDRESS_LEN);
    errors.optional_text("description", &draft.description, MAX_TEXT_LEN);
    errors.optional_text("saftyInstruction", &draft.safety_instructions, MAX_TEXT_LEN);
    errors.optional_text("additionalInfo", &draft.additional_info, MAX_TEXT_LEN);
    errors.optional_text("phoneNumber", &draft.phone_number, MAX_SHORT_TEXT_LEN);

    coordinate(errors, "latitude", &draft.latitude, 90);
    coordinate(errors, "longitude", &draft.longitude, 180);

    if draft.starting_price.is_sign_negative() {
        errors.push("startingPrice", ErrorCode::ValueOutOfRange, "startingPrice must not be negative");
    }
    if draft.minimum_deposit.is_some_and(|d| d.is_sign_negative()) {
        errors.push("minimumDeposit", ErrorCode::ValueOutOfRange, "minimumDeposit must not be negative");
    }

    if draft.discount.offered {
        match draft.discount.percentage {
            Some(p) if p > Decimal::ZERO && p <= Decimal::ONE_HUNDRED => {}
            Some(_) => errors.push(
                "discount.percentage",
                ErrorCode::ValueOutOfRange,
                "Discount percentage must be greater than 0 and at most 100",
            ),
            None => errors.push(
                "discount.percentage",
                ErrorCode::RequiredField,
                "Discount percentage is required when a discount is offered",
            ),
        }
    }

    errors.tags("paymentMethods", &draft.payment_methods);
    errors.tags("productService", &draft.products_services);
    errors.tags("specialize", &draft.specializations);
    errors.tags("atmosphere", &draft.atmosphere);
    errors.tags("cuisines", &draft.cuisines);

    opening_hours::validate_week(&draft.opening_times, errors);
}

/// Empty is allowed; otherwise a decimal within `[-limit, limit]`
fn coordinate(errors: &mut FieldErrors, field: &str, value: &str, limit: i64) {
    let value = value.trim();
    if value.is_empty() {
        return;
    }
    match value.parse::<Decimal>() {
        Ok(v) if v.abs() <= Decimal::from(limit) => {}
        Ok(_) => errors.push(
            field,
            ErrorCode::ValueOutOfRange,
            format!("{field} must be between -{limit} and {limit}"),
        ),
        Err(_) => errors.push(
            field,
            ErrorCode::ValidationFailed,
            format!("{field} must be a decimal number"),
        ),
    }
}

fn validate_files(images: &[FileUpload], menu: Option<&FileUpload>, errors: &mut FieldErrors) {
    match menu {
        None => errors.push("menu", ErrorCode::NoFileProvided, "A menu document (PDF) is required"),
        Some(menu) => {
            if menu.mime_type() != MENU_CONTENT_TYPE {
                errors.push(
                    "menu",
                    ErrorCode::UnsupportedFileFormat,
                    format!("Menu must be a PDF document, got '{}'", menu.mime_type()),
                );
            }
            file_basics(errors, "menu", menu, MAX_MENU_SIZE);
        }
    }

    if images.len() > MAX_IMAGES {
        errors.push(
            "images",
            ErrorCode::ValueOutOfRange,
            format!("At most {MAX_IMAGES} images can be uploaded"),
        );
    }
    for (index, image) in images.iter().enumerate() {
        let field = format!("images[{index}]");
        let mime = image.mime_type();
        if !mime.starts_with("image/") {
            errors.push(
                &field,
                ErrorCode::UnsupportedFileFormat,
                format!("'{}' is not an image ({mime})", image.file_name),
            );
        }
        file_basics(errors, &field, image, MAX_IMAGE_SIZE);
    }
}

fn file_basics(errors: &mut FieldErrors, field: &str, file: &FileUpload, max_size: usize) {
    if file.file_name.trim().is_empty() {
        errors.push(field, ErrorCode::NoFilename, "No filename provided");
    }
    if file.bytes.is_empty() {
        errors.push(field, ErrorCode::EmptyFile, "Empty file provided");
    } else if file.size() > max_size {
        errors.push(
            field,
            ErrorCode::FileTooLarge,
            format!(
                "File too large. Maximum size is {} bytes ({}MB)",
                max_size,
                max_size / 1024 / 1024
            ),
        );
    }
}
