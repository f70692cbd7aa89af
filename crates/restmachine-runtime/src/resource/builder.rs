//! Typed builder surface of [`ResourceConfig`].
//!
//! Each setter writes one fixed key. The key tables exported here are checked
//! against the decision graph in the tests, so a setter can never target a
//! node that does not exist or has another role.

use super::{keys, ResourceConfig};
use crate::context::Context;
use crate::value::{ConfigEntry, ConfigValue, Outcome};
use chrono::{DateTime, Utc};
use std::sync::Arc;

macro_rules! decision_setters {
    ($($key:literal => $method:ident, $computed:ident;)*) => {
        impl ResourceConfig {
            $(
                #[doc = concat!("Answer `", $key, "` with a constant.")]
                pub fn $method(self, value: bool) -> Self {
                    self.set($key, ConfigEntry::flag(value))
                }

                #[doc = concat!("Answer `", $key, "` per request.")]
                pub fn $computed<F>(self, f: F) -> Self
                where
                    F: Fn(&mut Context) -> anyhow::Result<bool> + Send + Sync + 'static,
                {
                    self.set($key, ConfigEntry::Flag(ConfigValue::computed(f)))
                }
            )*
        }

        /// Decision setters and the node each one answers
        pub const DECISION_SETTERS: &[(&str, &str)] = &[$((stringify!($method), $key)),*];
    };
}

macro_rules! callback_setters {
    ($table:ident, $variant:ident, $($key:literal => $method:ident;)*) => {
        impl ResourceConfig {
            $(
                #[doc = concat!("Set the callback run at `", $key, "`.")]
                pub fn $method<F, R>(self, f: F) -> Self
                where
                    F: Fn(&mut Context) -> anyhow::Result<R> + Send + Sync + 'static,
                    R: Into<Outcome>,
                {
                    let callback = move |ctx: &mut Context| -> anyhow::Result<Outcome> {
                        f(ctx).map(Into::into)
                    };
                    self.set($key, ConfigEntry::$variant(Arc::new(callback)))
                }
            )*
        }

        pub const $table: &[(&str, &str)] = &[$((stringify!($method), $key)),*];
    };
}

decision_setters! {
    "service-available?" => service_available, service_available_with;
    "known-method?" => known_method, known_method_with;
    "uri-too-long?" => uri_too_long, uri_too_long_with;
    "method-allowed?" => method_allowed, method_allowed_with;
    "malformed?" => malformed, malformed_with;
    "authorized?" => authorized, authorized_with;
    "allowed?" => allowed, allowed_with;
    "valid-content-header?" => valid_content_header, valid_content_header_with;
    "known-content-type?" => known_content_type, known_content_type_with;
    "valid-entity-length?" => valid_entity_length, valid_entity_length_with;
    "is-options?" => is_options, is_options_with;
    "accept-exists?" => accept_exists, accept_exists_with;
    "media-type-available?" => media_type_available, media_type_available_with;
    "accept-language-exists?" => accept_language_exists, accept_language_exists_with;
    "language-available?" => language_available, language_available_with;
    "accept-charset-exists?" => accept_charset_exists, accept_charset_exists_with;
    "charset-available?" => charset_available, charset_available_with;
    "accept-encoding-exists?" => accept_encoding_exists, accept_encoding_exists_with;
    "encoding-available?" => encoding_available, encoding_available_with;
    "processable?" => processable, processable_with;
    "exists?" => exists, exists_with;
    "if-match-exists?" => if_match_exists, if_match_exists_with;
    "if-match-star?" => if_match_star, if_match_star_with;
    "etag-matches-for-if-match?" => etag_matches_for_if_match, etag_matches_for_if_match_with;
    "if-unmodified-since-exists?" => if_unmodified_since_exists, if_unmodified_since_exists_with;
    "if-unmodified-since-valid-date?" => if_unmodified_since_valid_date, if_unmodified_since_valid_date_with;
    "unmodified-since?" => unmodified_since, unmodified_since_with;
    "if-none-match-exists?" => if_none_match_exists, if_none_match_exists_with;
    "if-none-match-star?" => if_none_match_star, if_none_match_star_with;
    "etag-matches-for-if-none?" => etag_matches_for_if_none, etag_matches_for_if_none_with;
    "if-none-match?" => if_none_match, if_none_match_with;
    "if-modified-since-exists?" => if_modified_since_exists, if_modified_since_exists_with;
    "if-modified-since-valid-date?" => if_modified_since_valid_date, if_modified_since_valid_date_with;
    "modified-since?" => modified_since, modified_since_with;
    "method-delete?" => method_delete, method_delete_with;
    "delete-enacted?" => delete_enacted, delete_enacted_with;
    "method-patch?" => method_patch, method_patch_with;
    "post-to-existing?" => post_to_existing, post_to_existing_with;
    "post-redirect?" => post_redirect, post_redirect_with;
    "put-to-existing?" => put_to_existing, put_to_existing_with;
    "conflict?" => conflict, conflict_with;
    "new?" => is_new, is_new_with;
    "respond-with-entity?" => respond_with_entity, respond_with_entity_with;
    "multiple-representations?" => multiple_representations, multiple_representations_with;
    "if-match-star-exists-for-missing?" => if_match_star_exists_for_missing, if_match_star_exists_for_missing_with;
    "method-put?" => method_put, method_put_with;
    "put-to-different-url?" => put_to_different_url, put_to_different_url_with;
    "can-put-to-missing?" => can_put_to_missing, can_put_to_missing_with;
    "existed?" => existed, existed_with;
    "moved-permanently?" => moved_permanently, moved_permanently_with;
    "moved-temporarily?" => moved_temporarily, moved_temporarily_with;
    "post-to-gone?" => post_to_gone, post_to_gone_with;
    "can-post-to-gone?" => can_post_to_gone, can_post_to_gone_with;
    "post-to-missing?" => post_to_missing, post_to_missing_with;
    "can-post-to-missing?" => can_post_to_missing, can_post_to_missing_with;
}

callback_setters! {
    ACTION_SETTERS, Action,
    "post!" => post;
    "put!" => put;
    "delete!" => delete;
    "patch!" => patch;
}

callback_setters! {
    HANDLER_SETTERS, Handler,
    "handle-ok" => handle_ok;
    "handle-options" => handle_options;
    "handle-created" => handle_created;
    "handle-accepted" => handle_accepted;
    "handle-no-content" => handle_no_content;
    "handle-multiple-representations" => handle_multiple_representations;
    "handle-moved-permanently" => handle_moved_permanently;
    "handle-see-other" => handle_see_other;
    "handle-not-modified" => handle_not_modified;
    "handle-moved-temporarily" => handle_moved_temporarily;
    "handle-malformed" => handle_malformed;
    "handle-unauthorized" => handle_unauthorized;
    "handle-forbidden" => handle_forbidden;
    "handle-not-found" => handle_not_found;
    "handle-method-not-allowed" => handle_method_not_allowed;
    "handle-not-acceptable" => handle_not_acceptable;
    "handle-conflict" => handle_conflict;
    "handle-gone" => handle_gone;
    "handle-precondition-failed" => handle_precondition_failed;
    "handle-request-entity-too-large" => handle_request_entity_too_large;
    "handle-uri-too-long" => handle_uri_too_long;
    "handle-unsupported-media-type" => handle_unsupported_media_type;
    "handle-unprocessable-entity" => handle_unprocessable_entity;
    "handle-exception" => handle_exception;
    "handle-not-implemented" => handle_not_implemented;
    "handle-unknown-method" => handle_unknown_method;
    "handle-service-not-available" => handle_service_not_available;
}

fn method_list<I, S>(methods: I) -> ConfigEntry
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    ConfigEntry::list(methods.into_iter().map(|m| m.into().to_ascii_uppercase()))
}

impl ResourceConfig {
    pub fn allowed_methods<I, S>(self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set(keys::ALLOWED_METHODS, method_list(methods))
    }

    /// Media types offered, in server preference order
    pub fn available_media_types<I, S>(self, media_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set(keys::AVAILABLE_MEDIA_TYPES, ConfigEntry::list(media_types))
    }

    pub fn available_languages<I, S>(self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set(keys::AVAILABLE_LANGUAGES, ConfigEntry::list(languages))
    }

    pub fn available_charsets<I, S>(self, charsets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set(keys::AVAILABLE_CHARSETS, ConfigEntry::list(charsets))
    }

    pub fn available_encodings<I, S>(self, encodings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set(keys::AVAILABLE_ENCODINGS, ConfigEntry::list(encodings))
    }

    pub fn last_modified(self, date: DateTime<Utc>) -> Self {
        self.set(keys::LAST_MODIFIED, ConfigEntry::timestamp(date))
    }

    pub fn last_modified_with<F>(self, f: F) -> Self
    where
        F: Fn(&mut Context) -> anyhow::Result<Option<DateTime<Utc>>> + Send + Sync + 'static,
    {
        self.set(keys::LAST_MODIFIED, ConfigEntry::Timestamp(ConfigValue::computed(f)))
    }

    /// Entity tag of the current representation, without quotes
    pub fn etag(self, etag: impl Into<String>) -> Self {
        self.set(keys::ETAG, ConfigEntry::text(etag))
    }

    pub fn etag_with<F>(self, f: F) -> Self
    where
        F: Fn(&mut Context) -> anyhow::Result<Option<String>> + Send + Sync + 'static,
    {
        self.set(keys::ETAG, ConfigEntry::Text(ConfigValue::computed(f)))
    }

    pub fn location(self, location: impl Into<String>) -> Self {
        self.set(keys::LOCATION, ConfigEntry::text(location))
    }

    pub fn location_with<F>(self, f: F) -> Self
    where
        F: Fn(&mut Context) -> anyhow::Result<Option<String>> + Send + Sync + 'static,
    {
        self.set(keys::LOCATION, ConfigEntry::Text(ConfigValue::computed(f)))
    }
}
