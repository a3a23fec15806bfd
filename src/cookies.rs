//! Cookie construction and `Set-Cookie` rendering.

mod cookie;
mod date;

pub use cookie::Cookie;
pub use cookie::CookieBuilder;
pub use cookie::Expires;
