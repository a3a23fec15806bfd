use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use crate::cookies::date;
use crate::errors::CookieError;

/// Separators and whitespace that may never appear in a cookie name, on
/// top of the general control-character exclusion.
const FORBIDDEN_NAME_CHARS: &[char] = &[',', ';', ' ', '\t', '\r', '\n', '\x0b', '\x0c'];

/// Expiration of a cookie, in whole Unix seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Expires {
    /// No `expires` attribute; the client drops the cookie when the
    /// session ends.
    Session,
    /// Absolute expiry, seconds since the Unix epoch.
    At(i64),
}

impl Expires {
    /// Builds an expiration from a second count.
    ///
    /// `0` is the session sentinel. Negative counts and counts the date
    /// formatter cannot render are rejected.
    pub fn from_unix(secs: i64) -> Result<Self, CookieError> {
        if secs < 0 {
            return Err(CookieError::InvalidExpires(secs.to_string()));
        }
        if secs == 0 {
            return Ok(Expires::Session);
        }
        if date::format_cookie_date(secs).is_none() {
            return Err(CookieError::InvalidExpires(secs.to_string()));
        }
        Ok(Expires::At(secs))
    }

    /// Seconds since the epoch, `0` for a session cookie.
    pub fn unix(self) -> i64 {
        match self {
            Expires::Session => 0,
            Expires::At(secs) => secs,
        }
    }
}

impl FromStr for Expires {
    type Err = CookieError;

    /// Parses raw transport/config input: a base-10 whole second count,
    /// with no surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let secs: i64 = s
            .parse()
            .map_err(|_| CookieError::InvalidExpires(s.to_string()))?;
        Expires::from_unix(secs)
    }
}

/// One application-issued cookie.
///
/// Validated at construction (see [`CookieBuilder::build`]), immutable
/// after. `Display` renders the exact `Set-Cookie` header value; one
/// header per cookie instance.
#[derive(Debug, Clone, Serialize)]
pub struct Cookie {
    name: String,
    value: String,
    expires: Expires,
    path: String,
    domain: Option<String>,
    secure: bool,
    http_only: bool,
}

impl Cookie {
    /// Starts building a cookie.
    ///
    /// Defaults: session-scoped, path `/`, no domain, not secure,
    /// `httponly` set.
    pub fn builder(name: impl Into<String>, value: impl Into<String>) -> CookieBuilder {
        CookieBuilder {
            name: name.into(),
            value: value.into(),
            expires_secs: 0,
            path: "/".to_string(),
            domain: String::new(),
            secure: false,
            http_only: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    pub fn is_secure(&self) -> bool {
        self.secure
    }

    pub fn is_http_only(&self) -> bool {
        self.http_only
    }

    pub fn expires(&self) -> Expires {
        self.expires
    }

    /// Expiry in Unix seconds, `0` for a session cookie.
    pub fn expires_time(&self) -> i64 {
        self.expires.unix()
    }

    /// Whether the cookie has an expiry at or before `now` (Unix seconds).
    /// Session cookies are never cleared.
    pub fn is_cleared_at(&self, now: i64) -> bool {
        match self.expires {
            Expires::Session => false,
            Expires::At(at) => at <= now,
        }
    }

    /// [`is_cleared_at`](Self::is_cleared_at) against the system clock,
    /// read at call time.
    pub fn is_cleared(&self) -> bool {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs() as i64)
            .unwrap_or(0);
        self.is_cleared_at(now)
    }
}

impl fmt::Display for Cookie {
    /// Renders the `Set-Cookie` header value.
    ///
    /// Attribute order is a wire-compatibility contract:
    /// `name=value; expires=..; path=..; domain=..; secure; httponly`,
    /// with each attribute present only when it applies. An empty value
    /// renders as the literal `deleted`, with the expiry stamp backed off
    /// one second.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let deleted = self.value.is_empty();
        if deleted {
            write!(f, "{}=deleted", self.name)?;
        } else {
            write!(f, "{}={}", self.name, self.value)?;
        }

        if let Expires::At(secs) = self.expires {
            let stamp = if deleted { secs - 1 } else { secs };
            match date::format_cookie_date(stamp) {
                Some(rendered) => write!(f, "; expires={}", rendered)?,
                None => return Err(fmt::Error),
            }
        }

        write!(f, "; path={}", self.path)?;

        if let Some(domain) = &self.domain {
            write!(f, "; domain={}", domain)?;
        }
        if self.secure {
            write!(f, "; secure")?;
        }
        if self.http_only {
            write!(f, "; httponly")?;
        }

        Ok(())
    }
}

/// Builder for [`Cookie`].
///
/// Attribute setters are infallible; all validation happens in
/// [`build`](Self::build), so an invalid name or expiration never yields a
/// partially-valid cookie.
#[derive(Debug, Clone)]
pub struct CookieBuilder {
    name: String,
    value: String,
    expires_secs: i64,
    path: String,
    domain: String,
    secure: bool,
    http_only: bool,
}

impl CookieBuilder {
    /// Absolute expiry in Unix seconds; `0` keeps the cookie
    /// session-scoped.
    pub fn expires_at(mut self, unix_secs: i64) -> Self {
        self.expires_secs = unix_secs;
        self
    }

    pub fn expires(mut self, expires: Expires) -> Self {
        self.expires_secs = expires.unix();
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Domain scoping; an empty domain means host-only and renders no
    /// `domain` attribute.
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    pub fn http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    /// Validates and builds the cookie.
    pub fn build(self) -> Result<Cookie, CookieError> {
        validate_name(&self.name)?;
        let expires = Expires::from_unix(self.expires_secs)?;

        let domain = if self.domain.is_empty() {
            None
        } else {
            Some(self.domain)
        };

        log::trace!("issuing cookie {:?} ({:?})", self.name, expires);

        Ok(Cookie {
            name: self.name,
            value: self.value,
            expires,
            path: self.path,
            domain,
            secure: self.secure,
            http_only: self.http_only,
        })
    }
}

fn validate_name(name: &str) -> Result<(), CookieError> {
    if name.is_empty() {
        return Err(CookieError::EmptyName);
    }
    if let Some(bad) = name
        .chars()
        .find(|c| c.is_control() || FORBIDDEN_NAME_CHARS.contains(c))
    {
        return Err(CookieError::InvalidName(bad));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn now_unix() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock after epoch")
            .as_secs() as i64
    }

    #[test]
    fn invalid_names_are_rejected() {
        init_logging();

        let invalid = [
            "",
            ",MyName",
            ";MyName",
            " MyName",
            "\tMyName",
            "\rMyName",
            "\nMyName",
            "\x0bMyName",
            "\x0cMyName",
        ];
        for name in invalid {
            let result = Cookie::builder(name, "bar").build();
            assert!(result.is_err(), "name {:?} should be rejected", name);
        }

        assert_eq!(
            Cookie::builder("", "bar").build().unwrap_err(),
            CookieError::EmptyName
        );
        assert_eq!(
            Cookie::builder(";MyName", "bar").build().unwrap_err(),
            CookieError::InvalidName(';')
        );
    }

    #[test]
    fn embedded_separator_is_rejected_too() {
        let result = Cookie::builder("My;Name", "bar").build();
        assert_eq!(result.unwrap_err(), CookieError::InvalidName(';'));
    }

    #[test]
    fn malformed_raw_expiration_is_rejected() {
        assert_eq!(
            "bar".parse::<Expires>().unwrap_err(),
            CookieError::InvalidExpires("bar".to_string())
        );
        assert!("1.5".parse::<Expires>().is_err());
        assert!("-10".parse::<Expires>().is_err());
        assert!(" 3600 ".parse::<Expires>().is_err());
        assert!("3600\n".parse::<Expires>().is_err());
    }

    #[test]
    fn raw_expiration_parses_whole_seconds() {
        assert_eq!("3600".parse::<Expires>().unwrap(), Expires::At(3600));
        assert_eq!("0".parse::<Expires>().unwrap(), Expires::Session);
    }

    #[test]
    fn negative_expiration_is_rejected_at_build() {
        let result = Cookie::builder("foo", "bar").expires_at(-1).build();
        assert_eq!(
            result.unwrap_err(),
            CookieError::InvalidExpires("-1".to_string())
        );
    }

    #[test]
    fn unformattable_expiration_is_rejected() {
        assert!(Expires::from_unix(i64::MAX).is_err());
    }

    #[test]
    fn accessors_return_stored_attributes() {
        let cookie = Cookie::builder("MyCookie", "MyValue")
            .expires_at(3600)
            .domain("example.com")
            .secure(true)
            .build()
            .unwrap();

        assert_eq!(cookie.name(), "MyCookie");
        assert_eq!(cookie.value(), "MyValue");
        assert_eq!(cookie.path(), "/");
        assert_eq!(cookie.domain(), Some("example.com"));
        assert_eq!(cookie.expires_time(), 3600);
        assert!(cookie.is_secure());
        assert!(cookie.is_http_only());
    }

    #[test]
    fn builder_defaults() {
        let cookie = Cookie::builder("foo", "bar").build().unwrap();

        assert_eq!(cookie.path(), "/");
        assert_eq!(cookie.domain(), None);
        assert_eq!(cookie.expires(), Expires::Session);
        assert_eq!(cookie.expires_time(), 0);
        assert!(!cookie.is_secure());
        assert!(cookie.is_http_only());
    }

    #[test]
    fn http_only_can_be_disabled() {
        let cookie = Cookie::builder("foo", "bar")
            .http_only(false)
            .build()
            .unwrap();
        assert!(!cookie.is_http_only());
    }

    #[test]
    fn is_cleared_at_fixed_times() {
        let cookie = Cookie::builder("foo", "bar").expires_at(100).build().unwrap();
        assert!(!cookie.is_cleared_at(99));
        assert!(cookie.is_cleared_at(100));
        assert!(cookie.is_cleared_at(101));

        let session = Cookie::builder("foo", "bar").build().unwrap();
        assert!(!session.is_cleared_at(i64::MAX));
    }

    #[test]
    fn future_cookie_is_not_cleared() {
        let cookie = Cookie::builder("foo", "bar")
            .expires_at(now_unix() + 3600 * 24)
            .build()
            .unwrap();
        assert!(!cookie.is_cleared());
    }

    #[test]
    fn past_cookie_is_cleared() {
        let cookie = Cookie::builder("foo", "bar")
            .expires_at(now_unix() - 20)
            .build()
            .unwrap();
        assert!(cookie.is_cleared());
    }

    #[test]
    fn renders_all_attributes_in_fixed_order() {
        let cookie = Cookie::builder("foo", "bar")
            .expires_at(1)
            .domain("example.com")
            .secure(true)
            .build()
            .unwrap();

        assert_eq!(
            cookie.to_string(),
            "foo=bar; expires=Thu, 01-Jan-1970 00:00:01 GMT; path=/; \
             domain=example.com; secure; httponly"
        );
    }

    #[test]
    fn renders_a_deletion_cookie() {
        let cookie = Cookie::builder("foo", "")
            .expires_at(1)
            .path("/admin/")
            .domain("example.com")
            .build()
            .unwrap();

        assert_eq!(
            cookie.to_string(),
            "foo=deleted; expires=Thu, 01-Jan-1970 00:00:00 GMT; \
             path=/admin/; domain=example.com; httponly"
        );
    }

    #[test]
    fn renders_a_session_cookie() {
        let cookie = Cookie::builder("foo", "bar").build().unwrap();
        assert_eq!(cookie.to_string(), "foo=bar; path=/; httponly");
    }
}
