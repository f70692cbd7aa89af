//! Conformance tests for the HTTP resource semantics
//!
//! Each section drives a resource through the machine the way a client
//! would and checks status codes, headers and bodies.

mod common;

use chrono::{TimeZone, Utc};
use common::{ResponseAssertions, TestClient};
use restmachine_sdk::header::{ETAG, LAST_MODIFIED, LOCATION};
use restmachine_sdk::{php, Method, ResourceConfig, StatusCode, WebMachine};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

// ============================================================================
// Minimal resource
// ============================================================================

#[test]
fn test_minimal_resource() {
    let client = TestClient::new();
    client
        .get(&ResourceConfig::new(), &[])
        .assert_status(StatusCode::OK);
}

#[test]
fn test_allowed_methods() {
    let client = TestClient::new();
    let resource = ResourceConfig::new().allowed_methods(["POST"]);
    client
        .get(&resource, &[])
        .assert_status(StatusCode::METHOD_NOT_ALLOWED);
}

// ============================================================================
// Request validation
// ============================================================================

fn json_body_resource() -> ResourceConfig {
    ResourceConfig::new()
        .allowed_methods(["GET", "POST"])
        .malformed_with(|ctx| {
            let body = ctx.request().body();
            Ok(!body.is_empty() && serde_json::from_slice::<Value>(body).is_err())
        })
}

#[test]
fn test_malformed() {
    let client = TestClient::new();
    let resource = json_body_resource();

    client.get(&resource, &[]).assert_status(StatusCode::OK);
    client
        .post(&resource, "invalid json", &[])
        .assert_status(StatusCode::BAD_REQUEST);
    client
        .post(&resource, r#"{"foo":"bar"}"#, &[])
        .assert_status(StatusCode::CREATED);
}

#[test]
fn test_processable() {
    let client = TestClient::new();
    let resource = json_body_resource().processable_with(|ctx| {
        let body: Value = serde_json::from_slice(ctx.request().body()).unwrap_or_default();
        Ok(*ctx.request().method() != Method::POST || body.get("title").is_some())
    });

    client
        .post(&resource, r#"{"foo":"bar"}"#, &[])
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    client
        .post(&resource, r#"{"title":"milk"}"#, &[])
        .assert_status(StatusCode::CREATED);
}

// ============================================================================
// Content negotiation
// ============================================================================

fn negotiated_resource() -> ResourceConfig {
    ResourceConfig::new()
        .available_media_types(["application/json", "application/php"])
        .handle_ok(|_| Ok(json!({"name": "todo", "tags": ["a", "b"], "done": false})))
}

#[test]
fn test_not_acceptable() {
    let client = TestClient::new();
    client
        .get(&negotiated_resource(), &[("accept", "text/html")])
        .assert_status(StatusCode::NOT_ACCEPTABLE);
}

#[test]
fn test_json_encoding() {
    let client = TestClient::new();
    let response = client.get(&negotiated_resource(), &[("accept", "application/json")]);

    response.assert_status(StatusCode::OK);
    response.assert_header(restmachine_sdk::header::CONTENT_TYPE, "application/json");
    assert_eq!(
        response.json(),
        json!({"name": "todo", "tags": ["a", "b"], "done": false})
    );
}

#[test]
fn test_php_encoding() {
    let client = TestClient::new();
    let response = client.get(&negotiated_resource(), &[("accept", "application/php")]);
    let expected = json!({"name": "todo", "tags": ["a", "b"], "done": false});

    response.assert_status(StatusCode::OK);
    response.assert_header(restmachine_sdk::header::CONTENT_TYPE, "application/php");
    assert_eq!(response.body().as_ref(), php::to_vec(&expected).as_slice());
    assert_eq!(php::from_slice(response.body()).unwrap(), expected);
}

#[test]
fn test_no_accept_uses_first_offered_type() {
    let client = TestClient::new();
    let response = client.get(&negotiated_resource(), &[]);
    response.assert_header(restmachine_sdk::header::CONTENT_TYPE, "application/json");
}

#[test]
fn test_quality_values() {
    let mut machine = WebMachine::new();
    machine.install_serializer("text/html", |value| Ok(value.to_string().into_bytes()));
    let client = TestClient::with_machine(machine);
    let resource = ResourceConfig::new()
        .available_media_types(["text/plain", "text/html"])
        .handle_ok(|_| Ok("hello"));

    let response = client.get(&resource, &[("accept", "text/html;q=0.9, text/plain")]);
    response.assert_header(restmachine_sdk::header::CONTENT_TYPE, "text/plain");

    let response = client.get(&resource, &[("accept", "text/plain;q=0.8, text/html")]);
    response.assert_header(restmachine_sdk::header::CONTENT_TYPE, "text/html");
}

// ============================================================================
// Conditional requests
// ============================================================================

#[test]
fn test_if_modified_since() {
    let client = TestClient::new();
    let last_modified = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
    let resource = ResourceConfig::new().last_modified(last_modified);

    let response = client.get(&resource, &[("if-modified-since", "Wed, 01 May 2024 10:00:00 GMT")]);
    response.assert_status(StatusCode::NOT_MODIFIED);
    response.assert_header(LAST_MODIFIED, "Wed, 01 May 2024 10:00:00 GMT");

    let response = client.get(&resource, &[("if-modified-since", "Wed, 01 May 2024 09:00:00 GMT")]);
    response.assert_status(StatusCode::OK);
    response.assert_header(LAST_MODIFIED, "Wed, 01 May 2024 10:00:00 GMT");
}

#[test]
fn test_if_modified_since_invalid_date_is_ignored() {
    let client = TestClient::new();
    let last_modified = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
    let resource = ResourceConfig::new().last_modified(last_modified);

    client
        .get(&resource, &[("if-modified-since", "last tuesday")])
        .assert_status(StatusCode::OK);
}

#[test]
fn test_if_unmodified_since() {
    let client = TestClient::new();
    let last_modified = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
    let resource = ResourceConfig::new()
        .allowed_methods(["PUT"])
        .last_modified(last_modified)
        .put(|_| Ok(()));

    client
        .put(&resource, "{}", &[("if-unmodified-since", "Wed, 01 May 2024 09:00:00 GMT")])
        .assert_status(StatusCode::PRECONDITION_FAILED);
    client
        .put(&resource, "{}", &[("if-unmodified-since", "Wed, 01 May 2024 10:00:00 GMT")])
        .assert_status(StatusCode::CREATED);
}

fn etag_resource(puts: Arc<AtomicUsize>) -> ResourceConfig {
    ResourceConfig::new()
        .allowed_methods(["GET", "PUT"])
        .available_media_types(["application/json"])
        .etag("foo42")
        .put(move |_| {
            puts.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
        .handle_created(|_| Ok(json!({"stored": true})))
}

#[test]
fn test_if_match() {
    let client = TestClient::new();
    let puts = Arc::new(AtomicUsize::new(0));
    let resource = etag_resource(puts.clone());

    let response = client.put(&resource, "{}", &[("if-match", "\"foo42\"")]);
    response.assert_status(StatusCode::CREATED);
    assert_eq!(response.json(), json!({"stored": true}));
    assert_eq!(puts.load(Ordering::SeqCst), 1);

    client
        .put(&resource, "{}", &[("if-match", "\"blub\"")])
        .assert_status(StatusCode::PRECONDITION_FAILED);
    assert_eq!(puts.load(Ordering::SeqCst), 1);
}

#[test]
fn test_if_match_star_on_missing_resource() {
    let client = TestClient::new();
    let puts = Arc::new(AtomicUsize::new(0));
    let resource = etag_resource(puts.clone()).exists(false);

    client
        .put(&resource, "{}", &[("if-match", "*")])
        .assert_status(StatusCode::PRECONDITION_FAILED);
    assert_eq!(puts.load(Ordering::SeqCst), 0);
}

#[test]
fn test_if_none_match() {
    let client = TestClient::new();
    let resource = etag_resource(Arc::new(AtomicUsize::new(0)));

    let response = client.get(&resource, &[("if-none-match", "\"foo42\"")]);
    response.assert_status(StatusCode::NOT_MODIFIED);
    response.assert_header(ETAG, "\"foo42\"");

    client
        .get(&resource, &[("if-none-match", "\"other\"")])
        .assert_status(StatusCode::OK);
    client
        .put(&resource, "{}", &[("if-none-match", "*")])
        .assert_status(StatusCode::PRECONDITION_FAILED);
}

// ============================================================================
// Collection scenario
// ============================================================================

struct NewTodo(Value);
struct Created(Value);

fn todo_collection(store: Arc<Mutex<Vec<Value>>>) -> ResourceConfig {
    let listed = store.clone();
    ResourceConfig::new()
        .allowed_methods(["GET", "HEAD", "POST"])
        .available_media_types(["application/json"])
        .malformed_with(|ctx| {
            if *ctx.request().method() != Method::POST {
                return Ok(false);
            }
            match serde_json::from_slice::<Value>(ctx.request().body()) {
                Ok(body) => {
                    ctx.insert(NewTodo(body));
                    Ok(false)
                }
                Err(_) => Ok(true),
            }
        })
        .processable_with(|ctx| {
            Ok(match ctx.get::<NewTodo>() {
                Some(todo) => todo.0.get("title").map_or(false, Value::is_string),
                None => true,
            })
        })
        .post(move |ctx| {
            let title = ctx
                .get::<NewTodo>()
                .and_then(|todo| todo.0.get("title"))
                .cloned()
                .unwrap_or_default();
            let mut todos = store.lock().unwrap();
            let todo = json!({"id": todos.len() + 1, "title": title});
            todos.push(todo.clone());
            ctx.set_location(format!("/todos/{}", todos.len()));
            ctx.insert(Created(todo));
            Ok(())
        })
        .handle_created(|ctx| Ok(ctx.get::<Created>().map(|c| c.0.clone()).unwrap_or_default()))
        .handle_ok(move |_| Ok(Value::Array(listed.lock().unwrap().clone())))
}

#[test]
fn test_todo_collection() {
    let client = TestClient::new();
    let resource = todo_collection(Arc::new(Mutex::new(Vec::new())));

    let response = client.get(&resource, &[]);
    response.assert_status(StatusCode::OK);
    assert_eq!(response.json(), json!([]));

    client
        .post(&resource, r#"{"done":true}"#, &[])
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    client
        .post(&resource, "not json", &[])
        .assert_status(StatusCode::BAD_REQUEST);

    let response = client.post(&resource, r#"{"title":"milk"}"#, &[]);
    response.assert_status(StatusCode::CREATED);
    response.assert_header(LOCATION, "/todos/1");
    assert_eq!(response.json(), json!({"id": 1, "title": "milk"}));

    let response = client.post(&resource, r#"{"title":"eggs"}"#, &[]);
    response.assert_status(StatusCode::CREATED);
    assert_eq!(response.json()["id"], json!(2));

    let response = client.get(&resource, &[]);
    response.assert_status(StatusCode::OK);
    assert_eq!(
        response.json(),
        json!([{"id": 1, "title": "milk"}, {"id": 2, "title": "eggs"}])
    );
}

#[test]
fn test_todo_collection_head() {
    let client = TestClient::new();
    let resource = todo_collection(Arc::new(Mutex::new(vec![json!({"id": 1, "title": "milk"})])));

    let response = client.dispatch(&resource, common::request(Method::HEAD, "", &[]));
    response.assert_status(StatusCode::OK);
    response.assert_header(restmachine_sdk::header::CONTENT_TYPE, "application/json");
    assert!(response.body().is_empty());
}
