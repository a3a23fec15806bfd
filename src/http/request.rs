use serde::Serialize;
use serde_json::{Map, Value};

/// Read-only ordered key→value store backing a request's query string and
/// body fields. Values are the JSON scalar types (string, number, boolean).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Params(Map<String, Value>);

impl Params {
    pub fn new() -> Self {
        Params(Map::new())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Full view over the parameters, in insertion order.
    pub fn all(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Params(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// An incoming request, normalized at construction and immutable after.
///
/// The transport hands over the raw method/path/query/body fields; this
/// type upper-cases the method and strips leading/trailing `/` from the
/// path. Both normalizations are idempotent.
#[derive(Debug, Clone, Serialize)]
pub struct Request {
    method: String,
    path: String,
    query: Params,
    data: Params,
}

impl Request {
    pub fn new(method: &str, path: &str, query: Params, data: Params) -> Self {
        log::trace!("request {} {}", method, path);

        Request {
            method: method.to_uppercase(),
            path: path.trim_matches('/').to_string(),
            query,
            data,
        }
    }

    /// Request method, always upper-case.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Request path, never starting or ending with `/`.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Query-string parameters.
    pub fn query(&self) -> &Params {
        &self.query
    }

    /// Body/form fields.
    pub fn data(&self) -> &Params {
        &self.data
    }
}
