//! Response assembly once a handler node is reached.

use super::Engine;
use crate::context::Context;
use crate::error::{ConfigError, MachineError, Result};
use crate::headers;
use crate::resource::keys;
use crate::response::Response;
use crate::value::Outcome;
use chrono::{DateTime, Utc};
use http::header::{HeaderName, CONTENT_TYPE, ETAG, LAST_MODIFIED, LOCATION, VARY};
use http::{HeaderValue, Method, StatusCode};
use serde_json::Value;

impl Engine {
    pub(super) fn respond(&self, ctx: &mut Context, handler: &str, status: u16) -> Result<Response> {
        let status = StatusCode::from_u16(status).map_err(|_| ConfigError::InvalidStatus {
            node: handler.to_string(),
            status,
        })?;

        let outcome = match ctx.resource().handler(handler)? {
            Some(produce) => produce(ctx).map_err(|err| MachineError::callback(handler, err))?,
            None => Outcome::Empty,
        };

        let mut response = match outcome {
            Outcome::Response(response) => return Ok(response),
            Outcome::Empty => Response::new(status),
            Outcome::Value(value) => self.render(ctx, handler, status, &value)?,
        };
        self.decorate(ctx, &mut response)?;
        Ok(response)
    }

    /// Serialize a handler value with the negotiated media type, or the
    /// first offered one when negotiation never ran.
    fn render(&self, ctx: &mut Context, handler: &str, status: StatusCode, value: &Value) -> Result<Response> {
        let media_type = match ctx.media_type() {
            Some(media_type) => media_type.to_string(),
            None => ctx
                .resolve::<Vec<String>>(keys::AVAILABLE_MEDIA_TYPES, Vec::new())?
                .into_iter()
                .next()
                .ok_or_else(|| ConfigError::NoMediaType(handler.to_string()))?,
        };
        let body = self.serializers.serialize(value, &media_type)?;

        let mut response = Response::new(status);
        insert_header(&mut response, CONTENT_TYPE, &media_type)?;
        if *ctx.request().method() != Method::HEAD {
            response.set_body(body);
        }
        Ok(response)
    }

    fn decorate(&self, ctx: &mut Context, response: &mut Response) -> Result<()> {
        let location = match ctx.location() {
            Some(location) => Some(location.to_string()),
            None => ctx.resolve::<Option<String>>(keys::LOCATION, None)?,
        };
        if let Some(location) = location.filter(|l| !l.is_empty()) {
            insert_header(response, LOCATION, &location)?;
        }

        let last_modified = ctx.resolve::<Option<DateTime<Utc>>>(keys::LAST_MODIFIED, None)?;
        if let Some(last_modified) = last_modified {
            insert_header(response, LAST_MODIFIED, &headers::format_http_date(&last_modified))?;
        }

        let etag = match ctx.etag() {
            Some(etag) => Some(etag.to_string()),
            None => ctx.resolve::<Option<String>>(keys::ETAG, None)?,
        };
        if let Some(etag) = etag.filter(|e| !e.is_empty()) {
            insert_header(response, ETAG, &headers::quote_etag(&etag))?;
        }

        if !ctx.vary().is_empty() {
            insert_header(response, VARY, &ctx.vary().join(", "))?;
        }

        if ctx.is_tracing() {
            let header = &self.settings.trace.response_header;
            let name = HeaderName::from_bytes(header.as_bytes()).map_err(|_| ConfigError::InvalidHeader {
                header: header.clone(),
                value: String::new(),
            })?;
            for entry in ctx.trace() {
                let value = entry.to_string();
                let value = HeaderValue::from_str(&value).map_err(|_| ConfigError::InvalidHeader {
                    header: header.clone(),
                    value: value.clone(),
                })?;
                response.headers_mut().append(name.clone(), value);
            }
        }
        Ok(())
    }
}

fn insert_header(response: &mut Response, name: HeaderName, value: &str) -> Result<()> {
    let header_value = HeaderValue::from_str(value).map_err(|_| ConfigError::InvalidHeader {
        header: name.to_string(),
        value: value.to_string(),
    })?;
    response.headers_mut().insert(name, header_value);
    Ok(())
}
