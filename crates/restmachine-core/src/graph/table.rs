//! The built-in HTTP resource flowchart as literal data.
//!
//! Every row is reproduced exactly; a single wrong edge silently changes the
//! semantics of every resource served by the engine.

/// Row of the literal table.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Row {
    /// `(pass, fail)`
    Decision(&'static str, &'static str),
    /// `next`
    Action(&'static str),
    /// HTTP status code
    Handler(u16),
}

use Row::{Action, Decision, Handler};

pub(crate) const START: &str = "service-available?";

pub(crate) const ROWS: &[(&str, Row)] = &[
    // ========== Request validation ==========
    ("service-available?", Decision("known-method?", "handle-service-not-available")),
    ("known-method?", Decision("uri-too-long?", "handle-unknown-method")),
    ("uri-too-long?", Decision("handle-uri-too-long", "method-allowed?")),
    ("method-allowed?", Decision("malformed?", "handle-method-not-allowed")),
    ("malformed?", Decision("handle-malformed", "authorized?")),
    ("authorized?", Decision("allowed?", "handle-unauthorized")),
    ("allowed?", Decision("valid-content-header?", "handle-forbidden")),
    ("valid-content-header?", Decision("known-content-type?", "handle-not-implemented")),
    ("known-content-type?", Decision("valid-entity-length?", "handle-unsupported-media-type")),
    ("valid-entity-length?", Decision("is-options?", "handle-request-entity-too-large")),
    ("is-options?", Decision("handle-options", "accept-exists?")),
    // ========== Content negotiation ==========
    ("accept-exists?", Decision("media-type-available?", "accept-language-exists?")),
    ("media-type-available?", Decision("accept-language-exists?", "handle-not-acceptable")),
    ("accept-language-exists?", Decision("language-available?", "accept-charset-exists?")),
    ("language-available?", Decision("accept-charset-exists?", "handle-not-acceptable")),
    ("accept-charset-exists?", Decision("charset-available?", "accept-encoding-exists?")),
    ("charset-available?", Decision("accept-encoding-exists?", "handle-not-acceptable")),
    ("accept-encoding-exists?", Decision("encoding-available?", "processable?")),
    ("encoding-available?", Decision("processable?", "handle-not-acceptable")),
    ("processable?", Decision("exists?", "handle-unprocessable-entity")),
    // ========== Conditional requests ==========
    ("exists?", Decision("if-match-exists?", "if-match-star-exists-for-missing?")),
    ("if-match-exists?", Decision("if-match-star?", "if-unmodified-since-exists?")),
    ("if-match-star?", Decision("if-unmodified-since-exists?", "etag-matches-for-if-match?")),
    ("etag-matches-for-if-match?", Decision("if-unmodified-since-exists?", "handle-precondition-failed")),
    ("if-unmodified-since-exists?", Decision("if-unmodified-since-valid-date?", "if-none-match-exists?")),
    ("if-unmodified-since-valid-date?", Decision("unmodified-since?", "if-none-match-exists?")),
    ("unmodified-since?", Decision("handle-precondition-failed", "if-none-match-exists?")),
    ("if-none-match-exists?", Decision("if-none-match-star?", "if-modified-since-exists?")),
    ("if-none-match-star?", Decision("if-none-match?", "etag-matches-for-if-none?")),
    ("etag-matches-for-if-none?", Decision("if-none-match?", "if-modified-since-exists?")),
    ("if-none-match?", Decision("handle-not-modified", "handle-precondition-failed")),
    ("if-modified-since-exists?", Decision("if-modified-since-valid-date?", "method-delete?")),
    ("if-modified-since-valid-date?", Decision("modified-since?", "method-delete?")),
    ("modified-since?", Decision("method-delete?", "handle-not-modified")),
    // ========== Existing resource ==========
    ("method-delete?", Decision("delete!", "method-patch?")),
    ("delete!", Action("delete-enacted?")),
    ("delete-enacted?", Decision("respond-with-entity?", "handle-accepted")),
    ("method-patch?", Decision("patch!", "post-to-existing?")),
    ("patch!", Action("respond-with-entity?")),
    ("post-to-existing?", Decision("post!", "put-to-existing?")),
    ("post!", Action("post-redirect?")),
    ("post-redirect?", Decision("handle-see-other", "new?")),
    ("put-to-existing?", Decision("conflict?", "multiple-representations?")),
    ("conflict?", Decision("handle-conflict", "put!")),
    ("put!", Action("new?")),
    ("new?", Decision("handle-created", "respond-with-entity?")),
    ("respond-with-entity?", Decision("multiple-representations?", "handle-no-content")),
    ("multiple-representations?", Decision("handle-multiple-representations", "handle-ok")),
    // ========== Missing resource ==========
    ("if-match-star-exists-for-missing?", Decision("handle-precondition-failed", "method-put?")),
    ("method-put?", Decision("put-to-different-url?", "existed?")),
    ("put-to-different-url?", Decision("handle-moved-permanently", "can-put-to-missing?")),
    ("can-put-to-missing?", Decision("conflict?", "handle-not-implemented")),
    ("existed?", Decision("moved-permanently?", "post-to-missing?")),
    ("moved-permanently?", Decision("handle-moved-permanently", "moved-temporarily?")),
    ("moved-temporarily?", Decision("handle-moved-temporarily", "post-to-gone?")),
    ("post-to-gone?", Decision("can-post-to-gone?", "handle-gone")),
    ("can-post-to-gone?", Decision("post!", "handle-gone")),
    ("post-to-missing?", Decision("can-post-to-missing?", "handle-not-found")),
    ("can-post-to-missing?", Decision("post!", "handle-not-found")),
    // ========== Handlers ==========
    ("handle-ok", Handler(200)),
    ("handle-options", Handler(200)),
    ("handle-created", Handler(201)),
    ("handle-accepted", Handler(202)),
    ("handle-no-content", Handler(204)),
    ("handle-multiple-representations", Handler(300)),
    ("handle-moved-permanently", Handler(301)),
    ("handle-see-other", Handler(303)),
    ("handle-not-modified", Handler(304)),
    ("handle-moved-temporarily", Handler(307)),
    ("handle-malformed", Handler(400)),
    ("handle-unauthorized", Handler(401)),
    ("handle-forbidden", Handler(403)),
    ("handle-not-found", Handler(404)),
    ("handle-method-not-allowed", Handler(405)),
    ("handle-not-acceptable", Handler(406)),
    ("handle-conflict", Handler(409)),
    ("handle-gone", Handler(410)),
    ("handle-precondition-failed", Handler(412)),
    ("handle-request-entity-too-large", Handler(413)),
    ("handle-uri-too-long", Handler(414)),
    ("handle-unsupported-media-type", Handler(415)),
    ("handle-unprocessable-entity", Handler(422)),
    ("handle-exception", Handler(500)),
    ("handle-not-implemented", Handler(501)),
    ("handle-unknown-method", Handler(501)),
    ("handle-service-not-available", Handler(503)),
];
