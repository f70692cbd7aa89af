//! Header value helpers: HTTP dates and entity tags.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

/// RFC 1123 date format used by `Last-Modified` and the conditional headers
pub const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Parse an RFC 1123 date. Anything else is `None`.
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value.trim(), HTTP_DATE_FORMAT)
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

pub fn format_http_date(date: &DateTime<Utc>) -> String {
    date.format(HTTP_DATE_FORMAT).to_string()
}

/// Strip the weak prefix and surrounding quotes from an entity tag.
pub fn normalize_etag(tag: &str) -> &str {
    let tag = tag.trim();
    let tag = tag.strip_prefix("W/").unwrap_or(tag);
    tag.strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(tag)
}

/// Quote a bare entity tag for the `ETag` response header.
pub fn quote_etag(tag: &str) -> String {
    if tag.starts_with('"') || tag.starts_with("W/\"") {
        tag.to_string()
    } else {
        format!("\"{}\"", tag)
    }
}

/// Whether `etag` appears in a comma separated `If-Match`/`If-None-Match` list.
pub fn etag_matches(etag: &str, header: &str) -> bool {
    let wanted = normalize_etag(etag);
    header.split(',').any(|candidate| {
        let candidate = candidate.trim();
        candidate == "*" || normalize_etag(candidate) == wanted
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_parse_http_date() {
        let date = parse_http_date("Sun, 06 Nov 1994 08:49:37 GMT").unwrap();
        assert_eq!(date, Utc.with_ymd_and_hms(1994, 11, 6, 8, 49, 37).unwrap());
        assert_eq!(date.second(), 37);
    }

    #[test]
    fn test_parse_http_date_rejects_other_formats() {
        assert!(parse_http_date("tomorrow").is_none());
        assert!(parse_http_date("1994-11-06T08:49:37Z").is_none());
        assert!(parse_http_date("").is_none());
    }

    #[test]
    fn test_format_http_date() {
        let date = Utc.with_ymd_and_hms(2015, 10, 21, 7, 28, 0).unwrap();
        assert_eq!(format_http_date(&date), "Wed, 21 Oct 2015 07:28:00 GMT");
        assert_eq!(parse_http_date(&format_http_date(&date)), Some(date));
    }

    #[test]
    fn test_normalize_etag() {
        assert_eq!(normalize_etag("abc"), "abc");
        assert_eq!(normalize_etag("\"abc\""), "abc");
        assert_eq!(normalize_etag("W/\"abc\""), "abc");
        assert_eq!(normalize_etag("  \"abc\" "), "abc");
    }

    #[test]
    fn test_quote_etag() {
        assert_eq!(quote_etag("v1"), "\"v1\"");
        assert_eq!(quote_etag("\"v1\""), "\"v1\"");
        assert_eq!(quote_etag("W/\"v1\""), "W/\"v1\"");
    }

    #[test]
    fn test_etag_matches() {
        assert!(etag_matches("v1", "\"v1\""));
        assert!(etag_matches("v1", "v1"));
        assert!(etag_matches("\"v1\"", "\"v0\", W/\"v1\""));
        assert!(!etag_matches("v1", "\"v2\""));
        assert!(!etag_matches("v1", ""));
    }
}
