//! HTTP request/response model: [`Request`], [`Response`] and the status
//! registry.

mod request;
mod response;
mod status;

pub use request::Params;
pub use request::Request;

pub use response::Body;
pub use response::MapKey;
pub use response::Response;

pub use status::reason_phrase;
