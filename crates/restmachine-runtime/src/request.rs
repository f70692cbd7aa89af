//! Abstract HTTP request handed to the engine.

use bytes::Bytes;
use http::header::{AsHeaderName, IntoHeaderName, ACCEPT};
use http::{HeaderMap, HeaderValue, Method, Uri};
use restmachine_core::negotiate::{self, AcceptRanges};
use std::fmt;

/// Method, URI, headers and body of one request.
///
/// The engine never touches a socket; adapters convert their framework's
/// request into this type (see the `From<http::Request<Bytes>>` impl).
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
}

impl Request {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            uri: Uri::from_static("/"),
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    pub fn head() -> Self {
        Self::new(Method::HEAD)
    }

    pub fn options() -> Self {
        Self::new(Method::OPTIONS)
    }

    pub fn delete() -> Self {
        Self::new(Method::DELETE)
    }

    pub fn post(body: impl Into<Bytes>) -> Self {
        Self::new(Method::POST).with_body(body)
    }

    pub fn put(body: impl Into<Bytes>) -> Self {
        Self::new(Method::PUT).with_body(body)
    }

    pub fn patch(body: impl Into<Bytes>) -> Self {
        Self::new(Method::PATCH).with_body(body)
    }

    pub fn with_uri(mut self, uri: Uri) -> Self {
        self.uri = uri;
        self
    }

    /// Append a header. Values that are not valid header values are
    /// logged and dropped.
    pub fn with_header<K, V>(mut self, name: K, value: V) -> Self
    where
        K: IntoHeaderName,
        V: TryInto<HeaderValue>,
        <V as TryInto<HeaderValue>>::Error: fmt::Display,
    {
        match value.try_into() {
            Ok(value) => {
                self.headers.append(name, value);
            }
            Err(err) => tracing::warn!(error = %err, "dropping invalid request header value"),
        }
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn has_header<K: AsHeaderName>(&self, name: K) -> bool {
        self.headers.contains_key(name)
    }

    /// First value of a header, if present and visible ASCII
    pub fn header_str<K: AsHeaderName>(&self, name: K) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Media ranges from every `Accept` header, best quality first
    pub fn acceptable_content_types(&self) -> Vec<String> {
        self.accept_ranges().preferred
    }

    /// Preferred and refused media ranges from every `Accept` header
    pub fn accept_ranges(&self) -> AcceptRanges {
        let joined = self
            .headers
            .get_all(ACCEPT)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect::<Vec<_>>()
            .join(",");
        negotiate::parse_accept(&joined)
    }
}

impl From<http::Request<Bytes>> for Request {
    fn from(request: http::Request<Bytes>) -> Self {
        let (parts, body) = request.into_parts();
        Self {
            method: parts.method,
            uri: parts.uri,
            headers: parts.headers,
            body,
        }
    }
}
