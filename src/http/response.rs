//! Outgoing response model.
//!
//! A [`Response`] owns a status code/text pair and a [`Body`], the
//! content-serialization strategy. The transport pairs the serialized
//! content with the matching `Content-Type` (`text/plain`,
//! `application/json`, `application/msgpack`); picking it is the
//! transport's job, not this module's.

use std::collections::BTreeMap;
use std::io;

use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::errors::{BodyError, InvalidStatusCode};
use crate::http::status;

/// JSON formatter writing `", "` between entries and `": "` after keys.
/// The rendered document is a wire contract shared with the reference
/// implementation, which emits these separators.
struct SpacedFormatter;

impl serde_json::ser::Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

/// Key of a binary-map body entry.
///
/// Integer keys order before string keys, integers ascending. Map entry
/// order is part of the wire contract, so keys live in a `BTreeMap` and
/// the encoded byte sequence is stable for a given payload.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum MapKey {
    Int(i64),
    Str(String),
}

impl Serialize for MapKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MapKey::Int(i) => serializer.serialize_i64(*i),
            MapKey::Str(s) => serializer.serialize_str(s),
        }
    }
}

impl From<i64> for MapKey {
    fn from(i: i64) -> Self {
        MapKey::Int(i)
    }
}

impl From<&str> for MapKey {
    fn from(s: &str) -> Self {
        MapKey::Str(s.to_string())
    }
}

/// Content-serialization strategy of a [`Response`].
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// Payload passed through unchanged.
    Text(String),
    /// Payload rendered as a JSON document.
    Json(Value),
    /// Payload rendered as a MessagePack map.
    Msgpack(BTreeMap<MapKey, Value>),
}

/// An outgoing response.
///
/// Construction never fails; only the `set_status` family can, and only
/// on out-of-range codes. Serialization via [`get_content`](Self::get_content)
/// is pure and may be called repeatedly.
#[derive(Debug, Clone)]
pub struct Response {
    status_code: u16,
    status_text: Option<String>,
    body: Body,
}

impl Default for Response {
    fn default() -> Self {
        Response::new()
    }
}

impl Response {
    /// A `200` response with an empty text body.
    ///
    /// The status text starts out unset (`None`, not `"OK"`); it is only
    /// filled in by the `set_status` family.
    pub fn new() -> Self {
        Response {
            status_code: 200,
            status_text: None,
            body: Body::Text(String::new()),
        }
    }

    /// A `200` response carrying a plain text payload.
    pub fn text(body: impl Into<String>) -> Self {
        Response {
            body: Body::Text(body.into()),
            ..Response::new()
        }
    }

    /// A `200` response carrying a JSON payload.
    pub fn json(data: Value) -> Self {
        Response {
            body: Body::Json(data),
            ..Response::new()
        }
    }

    /// A `200` response carrying a MessagePack map payload.
    pub fn msgpack(data: BTreeMap<MapKey, Value>) -> Self {
        Response {
            body: Body::Msgpack(data),
            ..Response::new()
        }
    }

    fn check(code: u16) -> Result<(), InvalidStatusCode> {
        if (100..=599).contains(&code) {
            Ok(())
        } else {
            Err(InvalidStatusCode(code))
        }
    }

    /// Sets the status code and resets the text to the registry's
    /// canonical phrase for it, which is `""` for unregistered codes.
    pub fn set_status(&mut self, code: u16) -> Result<(), InvalidStatusCode> {
        Self::check(code)?;
        self.status_code = code;
        self.status_text = Some(status::reason_phrase(code).to_string());
        Ok(())
    }

    /// Sets the status code together with an explicit text.
    pub fn set_status_with_text(
        &mut self,
        code: u16,
        text: impl Into<String>,
    ) -> Result<(), InvalidStatusCode> {
        Self::check(code)?;
        self.status_code = code;
        self.status_text = Some(text.into());
        Ok(())
    }

    /// Replaces the status text without touching the code.
    pub fn set_status_text(&mut self, text: impl Into<String>) {
        self.status_text = Some(text.into());
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn status_text(&self) -> Option<&str> {
        self.status_text.as_deref()
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    /// Replaces the payload, switching the serialization strategy with it.
    pub fn set_body(&mut self, body: Body) {
        self.body = body;
    }

    /// Serializes the payload per the response kind.
    ///
    /// - `Text` bytes are returned unchanged.
    /// - `Json` renders a JSON document; `Value::Null` renders `null`,
    ///   an empty string renders `""`.
    /// - `Msgpack` renders the map encoding: entry-count header byte,
    ///   then each key and value with minimal integer/boolean encodings.
    pub fn get_content(&self) -> Result<Vec<u8>, BodyError> {
        match &self.body {
            Body::Text(text) => Ok(text.clone().into_bytes()),
            Body::Json(data) => {
                log::trace!("serializing json body");
                let mut buf = Vec::new();
                let mut ser = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);
                data.serialize(&mut ser)?;
                Ok(buf)
            }
            Body::Msgpack(data) => {
                log::trace!("serializing msgpack body ({} entries)", data.len());
                Ok(rmp_serde::to_vec(data)?)
            }
        }
    }
}
