//! Media type negotiation
//!
//! Resolves the best mutually acceptable media type between a client's
//! preference list and the ordered list of types a resource offers.

/// Match a single offered type against a single acceptable pattern.
///
/// `*/*` matches anything and `type/*` matches the same major type. On a match
/// the more specific of the two strings is returned.
pub fn acceptable_type<'a>(offered: &'a str, acceptable: &'a str) -> Option<&'a str> {
    if offered.eq_ignore_ascii_case(acceptable) || acceptable == "*/*" {
        return Some(offered);
    }
    if offered == "*/*" {
        return Some(acceptable);
    }

    let (offered_major, offered_minor) = offered.split_once('/')?;
    let (acceptable_major, acceptable_minor) = acceptable.split_once('/')?;
    if offered_major.eq_ignore_ascii_case(acceptable_major) {
        if offered_minor == "*" {
            return Some(acceptable);
        } else if acceptable_minor == "*" {
            return Some(offered);
        }
    }
    None
}

/// Pick the first `(preference, offered)` pair that matches.
///
/// `acceptable` must already be in client preference order (see
/// [`parse_accept`]). Preference order dominates the resource's order.
pub fn best_allowed_content_type<A, B>(acceptable: &[A], allowed: &[B]) -> Option<String>
where
    A: AsRef<str>,
    B: AsRef<str>,
{
    acceptable.iter().find_map(|accept| {
        allowed
            .iter()
            .find_map(|offered| acceptable_type(offered.as_ref(), accept.as_ref()))
            .map(str::to_string)
    })
}

/// Media ranges of an `Accept` header
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AcceptRanges {
    /// Acceptable ranges, best quality first
    pub preferred: Vec<String>,
    /// Ranges refused with `q=0`
    pub excluded: Vec<String>,
}

/// Parse an `Accept` header value into media ranges ordered by quality.
///
/// Entries with equal quality keep their header order and media type
/// parameters other than `q` are ignored. `q=0` entries go to
/// [`AcceptRanges::excluded`].
pub fn parse_accept(header: &str) -> AcceptRanges {
    let mut ranges: Vec<(String, f32)> = Vec::new();
    let mut excluded = Vec::new();
    for item in header.split(',') {
        let mut parts = item.split(';');
        let media_type = parts.next().unwrap_or_default().trim();
        if media_type.is_empty() {
            continue;
        }
        let media_type = if media_type == "*" { "*/*" } else { media_type };

        let mut quality = 1.0_f32;
        for param in parts {
            if let Some((name, value)) = param.split_once('=') {
                if name.trim().eq_ignore_ascii_case("q") {
                    quality = value.trim().parse().unwrap_or(0.0);
                }
            }
        }
        if quality > 0.0 {
            ranges.push((media_type.to_ascii_lowercase(), quality));
        } else {
            excluded.push(media_type.to_ascii_lowercase());
        }
    }
    // sort_by is stable, so equal qualities keep header order
    ranges.sort_by(|a, b| b.1.total_cmp(&a.1));
    AcceptRanges {
        preferred: ranges.into_iter().map(|(media_type, _)| media_type).collect(),
        excluded,
    }
}

/// Like [`best_allowed_content_type`], but an offered type is skipped when a
/// refused range covers it at least as specifically as the range that
/// selected it. `text/*;q=0, text/html` still accepts `text/html`.
pub fn negotiate_content_type<B: AsRef<str>>(ranges: &AcceptRanges, allowed: &[B]) -> Option<String> {
    ranges.preferred.iter().find_map(|accept| {
        allowed.iter().find_map(|offered| {
            let matched = acceptable_type(offered.as_ref(), accept.as_str())?;
            let refused = ranges.excluded.iter().any(|excluded| {
                specificity(excluded) >= specificity(accept)
                    && acceptable_type(matched, excluded.as_str()).is_some()
            });
            (!refused).then(|| matched.to_string())
        })
    })
}

fn specificity(range: &str) -> u8 {
    match range.split_once('/') {
        Some(("*", "*")) => 0,
        Some((_, "*")) => 1,
        _ => 2,
    }
}
