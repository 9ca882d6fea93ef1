//! Unified error codes for Tablebook
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Listing errors
//! - 4xxx: Reservation errors
//! - 5xxx: File upload errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so the browser client can
/// switch on them without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Identity is still being resolved
    IdentityPending = 1008,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Only the owner of the listing may change it
    NotListingOwner = 2006,

    // ==================== 3xxx: Listing ====================
    /// Listing not found
    ListingNotFound = 3001,
    /// Listing could not be created
    ListingCreateFailed = 3002,
    /// Listing could not be saved
    ListingSaveFailed = 3003,

    // ==================== 4xxx: Reservation ====================
    /// Reservation not found
    ReservationNotFound = 4001,
    /// Reservation is no longer pending
    ReservationNotPending = 4002,
    /// A transition for this reservation is already in flight
    ReservationBusy = 4003,
    /// Reservation status could not be updated
    ReservationUpdateFailed = 4004,

    // ==================== 5xxx: File Upload ====================
    /// File exceeds the size limit
    FileTooLarge = 5001,
    /// File type is not accepted for this field
    UnsupportedFileFormat = 5002,
    /// No file was provided
    NoFileProvided = 5003,
    /// Empty file
    EmptyFile = 5004,
    /// Filename missing
    NoFilename = 5005,
    /// Upload to object storage failed
    UploadFailed = 5006,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Storage error
    StorageError = 9003,
    /// Configuration error
    ConfigError = 9004,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::IdentityPending => "Identity is still being resolved",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::NotListingOwner => "Only the owner can change this restaurant",

            // Listing
            ErrorCode::ListingNotFound => "Restaurant not found",
            ErrorCode::ListingCreateFailed => "Failed to create restaurant. Please try again.",
            ErrorCode::ListingSaveFailed => "Failed to save restaurant. Please try again.",

            // Reservation
            ErrorCode::ReservationNotFound => "Reservation not found",
            ErrorCode::ReservationNotPending => "Reservation is no longer pending",
            ErrorCode::ReservationBusy => "Reservation is already being updated",
            ErrorCode::ReservationUpdateFailed => {
                "Failed to update reservation. Please try again."
            }

            // File Upload
            ErrorCode::FileTooLarge => "File is too large",
            ErrorCode::UnsupportedFileFormat => "Unsupported file format",
            ErrorCode::NoFileProvided => "No file provided",
            ErrorCode::EmptyFile => "Empty file provided",
            ErrorCode::NoFilename => "No filename provided",
            ErrorCode::UploadFailed => "File upload failed",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::StorageError => "Storage error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1008 => Ok(ErrorCode::IdentityPending),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2006 => Ok(ErrorCode::NotListingOwner),

            // Listing
            3001 => Ok(ErrorCode::ListingNotFound),
            3002 => Ok(ErrorCode::ListingCreateFailed),
            3003 => Ok(ErrorCode::ListingSaveFailed),

            // Reservation
            4001 => Ok(ErrorCode::ReservationNotFound),
            4002 => Ok(ErrorCode::ReservationNotPending),
            4003 => Ok(ErrorCode::ReservationBusy),
            4004 => Ok(ErrorCode::ReservationUpdateFailed),

            // File Upload
            5001 => Ok(ErrorCode::FileTooLarge),
            5002 => Ok(ErrorCode::UnsupportedFileFormat),
            5003 => Ok(ErrorCode::NoFileProvided),
            5004 => Ok(ErrorCode::EmptyFile),
            5005 => Ok(ErrorCode::NoFilename),
            5006 => Ok(ErrorCode::UploadFailed),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::StorageError),
            9004 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}
