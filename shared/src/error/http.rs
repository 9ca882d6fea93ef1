//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound | Self::ListingNotFound | Self::ReservationNotFound => {
                StatusCode::NOT_FOUND
            }

            // 409 Conflict
            Self::AlreadyExists | Self::ReservationNotPending | Self::ReservationBusy => {
                StatusCode::CONFLICT
            }

            // 401 Unauthorized
            Self::NotAuthenticated
            | Self::TokenExpired
            | Self::TokenInvalid
            | Self::IdentityPending => StatusCode::UNAUTHORIZED,

            // 403 Forbidden
            Self::PermissionDenied | Self::NotListingOwner => StatusCode::FORBIDDEN,

            // 413 Payload Too Large
            Self::FileTooLarge => StatusCode::PAYLOAD_TOO_LARGE,

            // 415 Unsupported Media Type
            Self::UnsupportedFileFormat => StatusCode::UNSUPPORTED_MEDIA_TYPE,

            // 502 Bad Gateway (a collaborator store failed)
            Self::ListingCreateFailed
            | Self::ListingSaveFailed
            | Self::ReservationUpdateFailed
            | Self::UploadFailed => StatusCode::BAD_GATEWAY,

            // 500 Internal Server Error
            Self::Unknown
            | Self::InternalError
            | Self::DatabaseError
            | Self::StorageError
            | Self::ConfigError => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request (default for validation errors)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}
