//! Error taxonomy. All failures here are input-validation rejections,
//! reported synchronously to the constructing or mutating caller.

/// Status code outside the valid `100..=599` range.
///
/// Returned by the `set_status` family on [`Response`](crate::Response);
/// out-of-range codes are rejected, never clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid status code {0}: expected 100..=599")]
pub struct InvalidStatusCode(pub u16);

/// Rejected cookie construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CookieError {
    #[error("cookie name is empty")]
    EmptyName,

    #[error("cookie name contains invalid character {0:?}")]
    InvalidName(char),

    #[error("invalid cookie expiration: {0}")]
    InvalidExpires(String),
}

/// Body serialization failure.
#[derive(Debug, thiserror::Error)]
pub enum BodyError {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("MessagePack serialization failed: {0}")]
    Msgpack(#[from] rmp_serde::encode::Error),
}
