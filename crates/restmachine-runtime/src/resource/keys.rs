//! Data keys of a resource configuration that are not graph nodes.

pub const ALLOWED_METHODS: &str = "allowed-methods";
pub const AVAILABLE_MEDIA_TYPES: &str = "available-media-types";
pub const AVAILABLE_LANGUAGES: &str = "available-languages";
pub const AVAILABLE_CHARSETS: &str = "available-charsets";
pub const AVAILABLE_ENCODINGS: &str = "available-encodings";
pub const LAST_MODIFIED: &str = "last-modified";
pub const ETAG: &str = "etag";
pub const LOCATION: &str = "location";

/// Every data key the engine reads
pub const ALL: &[&str] = &[
    ALLOWED_METHODS,
    AVAILABLE_MEDIA_TYPES,
    AVAILABLE_LANGUAGES,
    AVAILABLE_CHARSETS,
    AVAILABLE_ENCODINGS,
    LAST_MODIFIED,
    ETAG,
    LOCATION,
];
