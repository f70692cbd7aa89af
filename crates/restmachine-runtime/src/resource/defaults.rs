//! Built-in answers every resource starts from.
//!
//! Decisions absent from this table resolve to `false` at traversal time.
//! Only media types are negotiated. The language, charset and encoding lists
//! are seeded but their `accept-*-exists?` decisions stay absent, so those
//! branches are skipped unless a resource answers them itself.

use super::keys;
use crate::context::Context;
use crate::headers;
use crate::value::{ConfigEntry, ConfigValue};
use chrono::{DateTime, SubsecRound, Utc};
use http::header::{
    HeaderName, ACCEPT, IF_MATCH, IF_MODIFIED_SINCE, IF_NONE_MATCH, IF_UNMODIFIED_SINCE,
};
use http::Method;
use restmachine_core::negotiate;
use std::collections::HashMap;

/// Methods the engine recognises at `known-method?`
pub const KNOWN_METHODS: &[&str] = &[
    "GET", "PUT", "POST", "DELETE", "HEAD", "OPTIONS", "TRACE", "PATCH",
];

/// Decisions that pass unless the resource says otherwise
const OPTIMISTIC: &[&str] = &[
    "new?",
    "service-available?",
    "authorized?",
    "allowed?",
    "valid-content-header?",
    "valid-entity-length?",
    "processable?",
    "exists?",
    "can-post-to-missing?",
    "can-put-to-missing?",
    "delete-enacted?",
    "known-content-type?",
];

pub(crate) fn builtin() -> HashMap<String, ConfigEntry> {
    let mut entries: Vec<(&str, ConfigEntry)> = vec![
        (keys::ALLOWED_METHODS, ConfigEntry::list(["GET", "HEAD"])),
        (keys::AVAILABLE_MEDIA_TYPES, ConfigEntry::list(["text/html"])),
        (keys::AVAILABLE_LANGUAGES, ConfigEntry::list(["*"])),
        (keys::AVAILABLE_CHARSETS, ConfigEntry::list(["UTF-8"])),
        (keys::AVAILABLE_ENCODINGS, ConfigEntry::list(["identity"])),
        ("known-method?", computed(known_method)),
        ("method-allowed?", computed(method_allowed)),
        ("is-options?", method_is(Method::OPTIONS)),
        ("accept-exists?", computed(accept_exists)),
        ("media-type-available?", computed(media_type_available)),
        // Conditional requests
        ("if-match-exists?", has_header(IF_MATCH)),
        ("if-match-star?", header_is(IF_MATCH, "*")),
        ("if-match-star-exists-for-missing?", header_is(IF_MATCH, "*")),
        ("etag-matches-for-if-match?", etag_matches(IF_MATCH)),
        ("if-unmodified-since-exists?", has_header(IF_UNMODIFIED_SINCE)),
        (
            "if-unmodified-since-valid-date?",
            valid_date(IF_UNMODIFIED_SINCE, Context::set_if_unmodified_since),
        ),
        ("unmodified-since?", later_than(Context::if_unmodified_since)),
        ("if-none-match-exists?", has_header(IF_NONE_MATCH)),
        ("if-none-match-star?", header_is(IF_NONE_MATCH, "*")),
        ("etag-matches-for-if-none?", etag_matches(IF_NONE_MATCH)),
        ("if-none-match?", computed(|ctx| Ok(safe_method(ctx.request().method())))),
        ("if-modified-since-exists?", has_header(IF_MODIFIED_SINCE)),
        (
            "if-modified-since-valid-date?",
            valid_date(IF_MODIFIED_SINCE, Context::set_if_modified_since),
        ),
        ("modified-since?", later_than(Context::if_modified_since)),
        // Method dispatch
        ("method-delete?", method_is(Method::DELETE)),
        ("method-patch?", method_is(Method::PATCH)),
        ("method-put?", method_is(Method::PUT)),
        ("post-to-existing?", method_is(Method::POST)),
        ("post-to-missing?", method_is(Method::POST)),
        ("post-to-gone?", method_is(Method::POST)),
        ("put-to-existing?", method_is(Method::PUT)),
    ];
    entries.extend(OPTIMISTIC.iter().map(|key| (*key, ConfigEntry::flag(true))));

    entries
        .into_iter()
        .map(|(key, entry)| (key.to_string(), entry))
        .collect()
}

fn computed<F>(f: F) -> ConfigEntry
where
    F: Fn(&mut Context) -> anyhow::Result<bool> + Send + Sync + 'static,
{
    ConfigEntry::Flag(ConfigValue::computed(f))
}

fn safe_method(method: &Method) -> bool {
    *method == Method::GET || *method == Method::HEAD
}

fn method_is(method: Method) -> ConfigEntry {
    computed(move |ctx| Ok(*ctx.request().method() == method))
}

fn has_header(name: HeaderName) -> ConfigEntry {
    computed(move |ctx| Ok(ctx.request().has_header(&name)))
}

fn header_is(name: HeaderName, expected: &'static str) -> ConfigEntry {
    computed(move |ctx| Ok(ctx.request().header_str(&name).map(str::trim) == Some(expected)))
}

fn known_method(ctx: &mut Context) -> anyhow::Result<bool> {
    Ok(KNOWN_METHODS.contains(&ctx.request().method().as_str()))
}

fn method_allowed(ctx: &mut Context) -> anyhow::Result<bool> {
    let allowed = ctx.resolve::<Vec<String>>(keys::ALLOWED_METHODS, Vec::new())?;
    let method = ctx.request().method().as_str();
    Ok(allowed.iter().any(|m| m.eq_ignore_ascii_case(method)))
}

/// Without an `Accept` header the first offered type is chosen up front.
/// The choice still depends on `Accept` whenever there is more than one offer.
fn accept_exists(ctx: &mut Context) -> anyhow::Result<bool> {
    if ctx.request().has_header(ACCEPT) {
        return Ok(true);
    }
    let offered = ctx.resolve::<Vec<String>>(keys::AVAILABLE_MEDIA_TYPES, Vec::new())?;
    let media_type = negotiate::best_allowed_content_type(&["*/*"], &offered);
    if offered.len() > 1 {
        ctx.add_vary("Accept");
    }
    ctx.set_media_type(media_type);
    Ok(false)
}

fn media_type_available(ctx: &mut Context) -> anyhow::Result<bool> {
    let offered = ctx.resolve::<Vec<String>>(keys::AVAILABLE_MEDIA_TYPES, Vec::new())?;
    let ranges = ctx.request().accept_ranges();
    let media_type = negotiate::negotiate_content_type(&ranges, &offered);
    ctx.add_vary("Accept");

    let available = media_type.is_some();
    ctx.set_media_type(media_type);
    Ok(available)
}

fn etag_matches(name: HeaderName) -> ConfigEntry {
    computed(move |ctx| {
        let etag = ctx.resolve::<Option<String>>(keys::ETAG, None)?;
        ctx.set_etag(etag.clone());
        Ok(match (etag, ctx.request().header_str(&name)) {
            (Some(etag), Some(header)) => headers::etag_matches(&etag, header),
            _ => false,
        })
    })
}

/// Parse a date header and keep it on the context for the comparison node.
fn valid_date(name: HeaderName, store: fn(&mut Context, DateTime<Utc>)) -> ConfigEntry {
    computed(move |ctx| {
        let parsed = ctx
            .request()
            .header_str(&name)
            .and_then(headers::parse_http_date);
        if let Some(date) = parsed {
            store(ctx, date);
        }
        Ok(parsed.is_some())
    })
}

/// `last-modified` is strictly later than the stored header date, compared
/// at whole-second precision.
fn later_than(conditional: fn(&Context) -> Option<DateTime<Utc>>) -> ConfigEntry {
    computed(move |ctx| {
        let last_modified = ctx.resolve::<Option<DateTime<Utc>>>(keys::LAST_MODIFIED, None)?;
        Ok(match (last_modified, conditional(ctx)) {
            (Some(last_modified), Some(since)) => last_modified.trunc_subsecs(0) > since,
            _ => false,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Request;
    use crate::resource::ResourceConfig;
    use chrono::TimeZone;

    fn resolve(resource: &ResourceConfig, request: Request, key: &str) -> bool {
        let mut ctx = Context::new(request, resource.clone());
        ctx.resolve(key, false).unwrap()
    }

    #[test]
    fn test_optimistic_defaults() {
        let resource = ResourceConfig::new();
        for key in OPTIMISTIC {
            assert!(resolve(&resource, Request::get(), key), "{}", key);
        }
        assert!(!resolve(&resource, Request::get(), "malformed?"));
        assert!(!resolve(&resource, Request::get(), "respond-with-entity?"));
        assert!(!resolve(&resource, Request::get(), "accept-language-exists?"));
    }

    #[test]
    fn test_known_method() {
        let resource = ResourceConfig::new();
        assert!(resolve(&resource, Request::new(Method::TRACE), "known-method?"));
        let brew = Method::from_bytes(b"BREW").unwrap();
        assert!(!resolve(&resource, Request::new(brew), "known-method?"));
    }

    #[test]
    fn test_method_allowed_uses_allowed_methods() {
        let resource = ResourceConfig::new();
        assert!(resolve(&resource, Request::head(), "method-allowed?"));
        assert!(!resolve(&resource, Request::delete(), "method-allowed?"));

        let resource = resource.allowed_methods(["delete"]);
        assert!(resolve(&resource, Request::delete(), "method-allowed?"));
    }

    #[test]
    fn test_accept_exists_preselects_first_type() {
        let resource = ResourceConfig::new().available_media_types(["application/json", "text/plain"]);
        let mut ctx = Context::new(Request::get(), resource);
        assert!(!ctx.resolve("accept-exists?", true).unwrap());
        assert_eq!(ctx.media_type(), Some("application/json"));
        assert_eq!(ctx.vary(), ["Accept".to_string()]);
    }

    #[test]
    fn test_accept_exists_single_offer_does_not_vary() {
        let resource = ResourceConfig::new().available_media_types(["application/json"]);
        let mut ctx = Context::new(Request::get(), resource);
        assert!(!ctx.resolve("accept-exists?", true).unwrap());
        assert!(ctx.vary().is_empty());
    }

    #[test]
    fn test_media_type_available() {
        let resource = ResourceConfig::new().available_media_types(["text/html", "text/plain"]);
        let request = Request::get().with_header(ACCEPT, "text/plain, text/*;q=0.5");
        let mut ctx = Context::new(request, resource);

        assert!(ctx.resolve("media-type-available?", false).unwrap());
        assert_eq!(ctx.media_type(), Some("text/plain"));
        assert_eq!(ctx.vary(), ["Accept".to_string()]);
    }

    #[test]
    fn test_media_type_available_honours_refused_types() {
        let resource = ResourceConfig::new().available_media_types(["application/json", "text/plain"]);
        let request = Request::get().with_header(ACCEPT, "application/json;q=0, */*");
        let mut ctx = Context::new(request, resource.clone());
        assert!(ctx.resolve("media-type-available?", false).unwrap());
        assert_eq!(ctx.media_type(), Some("text/plain"));

        let only_json = resource.available_media_types(["application/json"]);
        let request = Request::get().with_header(ACCEPT, "application/json;q=0, */*");
        let mut ctx = Context::new(request, only_json);
        assert!(!ctx.resolve("media-type-available?", true).unwrap());
    }

    #[test]
    fn test_if_match_headers() {
        let resource = ResourceConfig::new().etag("v1");
        let star = Request::put("").with_header(IF_MATCH, "*");
        let tagged = Request::put("").with_header(IF_MATCH, "\"v1\"");

        assert!(resolve(&resource, star.clone(), "if-match-exists?"));
        assert!(resolve(&resource, star.clone(), "if-match-star?"));
        assert!(resolve(&resource, star, "if-match-star-exists-for-missing?"));
        assert!(!resolve(&resource, tagged.clone(), "if-match-star?"));
        assert!(resolve(&resource, tagged, "etag-matches-for-if-match?"));
        assert!(!resolve(&resource, Request::put(""), "if-match-exists?"));
    }

    #[test]
    fn test_etag_match_stores_etag() {
        let resource = ResourceConfig::new().etag("v2");
        let request = Request::get().with_header(IF_NONE_MATCH, "\"v1\"");
        let mut ctx = Context::new(request, resource);

        assert!(!ctx.resolve("etag-matches-for-if-none?", true).unwrap());
        assert_eq!(ctx.etag(), Some("v2"));
    }

    #[test]
    fn test_if_none_match_is_safe_method() {
        let resource = ResourceConfig::new();
        assert!(resolve(&resource, Request::get(), "if-none-match?"));
        assert!(resolve(&resource, Request::head(), "if-none-match?"));
        assert!(!resolve(&resource, Request::put(""), "if-none-match?"));
    }

    #[test]
    fn test_modified_since() {
        let last_modified = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let resource = ResourceConfig::new().last_modified(last_modified);

        let request = Request::get().with_header(IF_MODIFIED_SINCE, "Mon, 01 Jan 2024 12:00:00 GMT");
        let mut ctx = Context::new(request, resource.clone());
        assert!(ctx.resolve("if-modified-since-valid-date?", false).unwrap());
        assert_eq!(ctx.if_modified_since(), Some(last_modified));
        assert!(!ctx.resolve("modified-since?", true).unwrap());

        let request = Request::get().with_header(IF_MODIFIED_SINCE, "Mon, 01 Jan 2024 11:59:59 GMT");
        let mut ctx = Context::new(request, resource);
        assert!(ctx.resolve("if-modified-since-valid-date?", false).unwrap());
        assert!(ctx.resolve("modified-since?", false).unwrap());
    }

    #[test]
    fn test_modified_since_ignores_subseconds() {
        let last_modified = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
            + chrono::Duration::milliseconds(700);
        let resource = ResourceConfig::new().last_modified(last_modified);
        let request = Request::get().with_header(IF_MODIFIED_SINCE, "Mon, 01 Jan 2024 12:00:00 GMT");
        let mut ctx = Context::new(request, resource);

        assert!(ctx.resolve("if-modified-since-valid-date?", false).unwrap());
        assert!(!ctx.resolve("modified-since?", true).unwrap());
    }

    #[test]
    fn test_invalid_date_is_not_valid() {
        let resource = ResourceConfig::new();
        let request = Request::get().with_header(IF_UNMODIFIED_SINCE, "yesterday");
        let mut ctx = Context::new(request, resource);
        assert!(!ctx.resolve("if-unmodified-since-valid-date?", true).unwrap());
        assert!(ctx.if_unmodified_since().is_none());
    }

    #[test]
    fn test_unmodified_since_without_last_modified() {
        let resource = ResourceConfig::new();
        let request = Request::put("").with_header(IF_UNMODIFIED_SINCE, "Mon, 01 Jan 2024 12:00:00 GMT");
        let mut ctx = Context::new(request, resource);
        assert!(ctx.resolve("if-unmodified-since-valid-date?", false).unwrap());
        assert!(!ctx.resolve("unmodified-since?", true).unwrap());
    }

    #[test]
    fn test_method_dispatch_defaults() {
        let resource = ResourceConfig::new();
        assert!(resolve(&resource, Request::delete(), "method-delete?"));
        assert!(resolve(&resource, Request::patch(""), "method-patch?"));
        assert!(resolve(&resource, Request::put(""), "method-put?"));
        assert!(resolve(&resource, Request::put(""), "put-to-existing?"));
        assert!(resolve(&resource, Request::post(""), "post-to-existing?"));
        assert!(resolve(&resource, Request::post(""), "post-to-missing?"));
        assert!(!resolve(&resource, Request::get(), "post-to-gone?"));
        assert!(resolve(&resource, Request::options(), "is-options?"));
    }
}
