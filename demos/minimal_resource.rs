//! Minimal resource example
//!
//! This example demonstrates:
//! - Declaring a resource with a single JSON representation
//! - Dispatching a few requests through the default machine
//! - Reading the decision trace from the response

use restmachine_runtime::trace::DEFAULT_TRACE_HEADER;
use restmachine_sdk::{header, Request, ResourceConfig, WebMachine};
use serde_json::json;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("=== Minimal Resource Example ===\n");

    let machine = WebMachine::new();
    let resource = ResourceConfig::new()
        .available_media_types(["application/json", "text/plain"])
        .etag("hello-v1")
        .handle_ok(|ctx| {
            let greeting = match ctx.media_type() {
                Some("text/plain") => json!("Hello, world!"),
                _ => json!({"message": "Hello, world!"}),
            };
            Ok(greeting)
        });

    let requests = [
        ("GET", Request::get()),
        ("GET text/plain", Request::get().with_header(header::ACCEPT, "text/plain")),
        ("GET text/html", Request::get().with_header(header::ACCEPT, "text/html")),
        ("DELETE", Request::delete()),
        (
            "GET If-None-Match",
            Request::get().with_header(header::IF_NONE_MATCH, "\"hello-v1\""),
        ),
    ];

    for (label, request) in requests {
        let response = machine.run(&resource, request)?;
        println!("{:<18} -> {}", label, response.status());
        if let Some(content_type) = response.header_str(header::CONTENT_TYPE) {
            println!("  Content-Type: {}", content_type);
        }
        if !response.body().is_empty() {
            println!("  Body: {}", String::from_utf8_lossy(response.body()));
        }
    }

    println!("\nDecision trace of a plain GET:");
    let traced = Request::get().with_header(DEFAULT_TRACE_HEADER, "1");
    let response = machine.run(&resource, traced)?;
    for entry in response.header_values(DEFAULT_TRACE_HEADER) {
        println!("  {}", entry);
    }

    Ok(())
}
