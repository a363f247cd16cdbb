//! Incoming HTTP request type.

use std::collections::HashMap;

use bytes::Bytes;
use http::HeaderMap;
use serde::de::DeserializeOwned;

use crate::error::Error;
use crate::method::Method;

/// An incoming HTTP request with its body fully collected.
pub struct Request {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Bytes,
    pub(crate) params: HashMap<String, String>,
}

impl Request {
    pub(crate) fn new(method: Method, path: impl Into<String>, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            method,
            path: path.into(),
            headers,
            body,
            params: HashMap::new(),
        }
    }

    pub fn method(&self) -> Method { self.method }
    pub fn path(&self) -> &str { &self.path }
    pub fn headers(&self) -> &HeaderMap { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Case-insensitive header lookup. Values that are not visible ASCII are
    /// treated as absent.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// The `content-type` mimetype, lowercased and stripped of parameters.
    ///
    /// `application/json; charset=utf-8` → `application/json`.
    pub fn mimetype(&self) -> Option<String> {
        let raw = self.header("content-type")?;
        let essence = raw.split(';').next().unwrap_or_default().trim();
        (!essence.is_empty()).then(|| essence.to_ascii_lowercase())
    }

    /// Whether the body declares itself as JSON: `application/json` or any
    /// `application/*+json` subtype.
    pub fn is_json(&self) -> bool {
        match self.mimetype() {
            Some(mt) => mt == "application/json" || (mt.starts_with("application/") && mt.ends_with("+json")),
            None => false,
        }
    }

    /// Decodes the body as JSON into `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Decodes an `application/x-www-form-urlencoded` body.
    ///
    /// When a key repeats, the first value wins.
    pub fn form(&self) -> HashMap<String, String> {
        let mut fields = HashMap::new();
        for (key, value) in url::form_urlencoded::parse(&self.body) {
            fields.entry(key.into_owned()).or_insert_with(|| value.into_owned());
        }
        fields
    }

    /// Returns the value of the named cookie, searching every `cookie` header.
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.headers
            .get_all("cookie")
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|line| line.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.trim_matches('"'))
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/posts/{slug}`, `req.param("slug")` on `/posts/hello` returns `Some("hello")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}
