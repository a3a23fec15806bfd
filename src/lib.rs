//! Value objects of an HTTP request/response cycle.
//!
//! This crate models the three objects an application layer exchanges with
//! its transport: an incoming [`Request`], an outgoing [`Response`] (plain
//! text, JSON or MessagePack body), and a [`Cookie`] rendered as a
//! `Set-Cookie` header value. The transport itself (sockets, routing,
//! header parsing) is out of scope; these types are composed by it.

pub mod cookies;
pub mod errors;
pub mod http;

pub use cookies::{Cookie, CookieBuilder, Expires};
pub use errors::{BodyError, CookieError, InvalidStatusCode};
pub use http::{Body, MapKey, Params, Request, Response};
