//! Per-request evaluation context
//!
//! One [`Context`] is created per dispatch and handed to every callback in
//! turn. It carries the request, a private copy of the resource, the
//! negotiated representation, parsed conditional headers and any values the
//! callbacks share with each other.

mod extensions;

pub use extensions::Extensions;

use crate::error::{BoxError, ConfigError, MachineError};
use crate::request::Request;
use crate::resource::ResourceConfig;
use crate::trace::TraceEntry;
use crate::value::EntryValue;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// The representation chosen by content negotiation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Representation {
    pub media_type: Option<String>,
}

#[derive(Debug)]
pub struct Context {
    request: Arc<Request>,
    resource: ResourceConfig,
    representation: Representation,
    if_modified_since: Option<DateTime<Utc>>,
    if_unmodified_since: Option<DateTime<Utc>>,
    etag: Option<String>,
    location: Option<String>,
    vary: Vec<String>,
    extensions: Extensions,
    failure: Option<BoxError>,
    trace: Option<Vec<TraceEntry>>,
}

impl Context {
    pub fn new(request: impl Into<Arc<Request>>, resource: ResourceConfig) -> Self {
        Self {
            request: request.into(),
            resource,
            representation: Representation::default(),
            if_modified_since: None,
            if_unmodified_since: None,
            etag: None,
            location: None,
            vary: Vec::new(),
            extensions: Extensions::new(),
            failure: None,
            trace: None,
        }
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn resource(&self) -> &ResourceConfig {
        &self.resource
    }

    /// Resolve a configuration key against this context.
    ///
    /// A missing key yields `default`; a key holding another kind of entry
    /// is an error. Computed values may call back into `resolve`.
    pub fn resolve<T: EntryValue>(&mut self, key: &str, default: T) -> Result<T, MachineError> {
        let value = match self.resource.get(key) {
            None => return Ok(default),
            Some(entry) => T::from_entry(entry).ok_or_else(|| ConfigError::EntryMismatch {
                key: key.to_string(),
                expected: T::KIND,
                found: entry.kind(),
            })?,
        };
        value
            .resolve(self)
            .map_err(|err| MachineError::callback(key, err))
    }

    // ========== Negotiated representation ==========

    pub fn representation(&self) -> &Representation {
        &self.representation
    }

    pub fn media_type(&self) -> Option<&str> {
        self.representation.media_type.as_deref()
    }

    pub fn set_media_type(&mut self, media_type: Option<String>) {
        self.representation.media_type = media_type;
    }

    /// Record a request header the response varies on. Duplicates are ignored.
    pub fn add_vary(&mut self, header: &str) {
        if !self.vary.iter().any(|h| h.eq_ignore_ascii_case(header)) {
            self.vary.push(header.to_string());
        }
    }

    pub fn vary(&self) -> &[String] {
        &self.vary
    }

    // ========== Conditional request state ==========

    pub fn if_modified_since(&self) -> Option<DateTime<Utc>> {
        self.if_modified_since
    }

    pub fn set_if_modified_since(&mut self, date: DateTime<Utc>) {
        self.if_modified_since = Some(date);
    }

    pub fn if_unmodified_since(&self) -> Option<DateTime<Utc>> {
        self.if_unmodified_since
    }

    pub fn set_if_unmodified_since(&mut self, date: DateTime<Utc>) {
        self.if_unmodified_since = Some(date);
    }

    /// Entity tag computed while evaluating the conditional headers
    pub fn etag(&self) -> Option<&str> {
        self.etag.as_deref()
    }

    pub fn set_etag(&mut self, etag: Option<String>) {
        self.etag = etag;
    }

    /// `Location` set by an action; takes precedence over the `location` key
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn set_location(&mut self, location: impl Into<String>) {
        self.location = Some(location.into());
    }

    // ========== Shared values ==========

    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    pub fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.extensions
    }

    pub fn insert<T: Send + Sync + 'static>(&mut self, value: T) -> Option<T> {
        self.extensions.insert(value)
    }

    pub fn get<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.extensions.get()
    }

    pub fn get_mut<T: Send + Sync + 'static>(&mut self) -> Option<&mut T> {
        self.extensions.get_mut()
    }

    /// The callback failure that routed this request to `handle-exception`
    pub fn failure(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.failure.as_deref()
    }

    pub(crate) fn set_failure(&mut self, err: BoxError) {
        self.failure = Some(err);
    }

    // ========== Trace ==========

    pub fn enable_trace(&mut self) {
        self.trace.get_or_insert_with(Vec::new);
    }

    pub fn is_tracing(&self) -> bool {
        self.trace.is_some()
    }

    /// Entries recorded so far; empty when tracing is off
    pub fn trace(&self) -> &[TraceEntry] {
        self.trace.as_deref().unwrap_or_default()
    }

    pub(crate) fn record(&mut self, node: &str, outcome: Option<bool>) {
        if let Some(trace) = self.trace.as_mut() {
            trace.push(TraceEntry::new(node, outcome));
        }
    }
}
