//! Common test utilities for SDK integration tests

#![allow(dead_code)]

use restmachine_sdk::{header, Method, Request, ResourceConfig, Response, StatusCode, WebMachine};

/// Dispatches requests through a fresh machine, like a client would
pub struct TestClient {
    machine: WebMachine,
}

impl TestClient {
    pub fn new() -> Self {
        Self {
            machine: WebMachine::new(),
        }
    }

    pub fn with_machine(machine: WebMachine) -> Self {
        Self { machine }
    }

    pub fn dispatch(&self, resource: &ResourceConfig, request: Request) -> Response {
        self.machine
            .run(resource, request)
            .unwrap_or_else(|e| panic!("Dispatch failed: {}", e))
    }

    pub fn get(&self, resource: &ResourceConfig, headers: &[(&'static str, &str)]) -> Response {
        self.dispatch(resource, request(Method::GET, "", headers))
    }

    pub fn post(&self, resource: &ResourceConfig, body: &str, headers: &[(&'static str, &str)]) -> Response {
        self.dispatch(resource, request(Method::POST, body, headers))
    }

    pub fn put(&self, resource: &ResourceConfig, body: &str, headers: &[(&'static str, &str)]) -> Response {
        self.dispatch(resource, request(Method::PUT, body, headers))
    }
}

/// Build a request with a body and headers
pub fn request(method: Method, body: &str, headers: &[(&'static str, &str)]) -> Request {
    headers.iter().fold(
        Request::new(method).with_body(body.to_string()),
        |request, (name, value)| request.with_header(*name, *value),
    )
}

/// Assertion helpers for responses
pub trait ResponseAssertions {
    fn assert_status(&self, expected: StatusCode);
    fn assert_header(&self, name: header::HeaderName, expected: &str);
    fn assert_body(&self, expected: &str);
    fn json(&self) -> serde_json::Value;
}

impl ResponseAssertions for Response {
    fn assert_status(&self, expected: StatusCode) {
        assert_eq!(
            self.status(),
            expected,
            "Expected status {}, got {} (body: {:?})",
            expected,
            self.status(),
            self.body_str()
        );
    }

    fn assert_header(&self, name: header::HeaderName, expected: &str) {
        assert_eq!(
            self.header_str(&name),
            Some(expected),
            "Unexpected value for header {}",
            name
        );
    }

    fn assert_body(&self, expected: &str) {
        assert_eq!(self.body_str(), Some(expected));
    }

    fn json(&self) -> serde_json::Value {
        serde_json::from_slice(self.body()).expect("Response body is not JSON")
    }
}
