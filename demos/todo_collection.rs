//! In-memory todo collection example
//!
//! This example demonstrates:
//! - A collection resource accepting JSON via POST
//! - Request validation through `malformed?` and `processable?`
//! - Passing decoded values between callbacks through the context
//! - Serving the same resource concurrently from tokio tasks

use anyhow::anyhow;
use restmachine_sdk::{header, Method, Request, ResourceConfig, WebMachine};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::{Arc, RwLock};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Serialize)]
struct Todo {
    id: usize,
    title: String,
    done: bool,
}

#[derive(Debug, Deserialize)]
struct NewTodo {
    title: String,
    #[serde(default)]
    done: bool,
}

/// The decoded request body, or why it could not be decoded
enum Submission {
    Valid(NewTodo),
    Incomplete,
}

type Store = Arc<RwLock<Vec<Todo>>>;

fn collection(store: Store) -> ResourceConfig {
    let writer = store.clone();
    let reader = store;

    ResourceConfig::new()
        .allowed_methods(["GET", "HEAD", "POST"])
        .available_media_types(["application/json", "application/php"])
        .malformed_with(|ctx| {
            if *ctx.request().method() != Method::POST {
                return Ok(false);
            }
            match serde_json::from_slice::<Value>(ctx.request().body()) {
                Ok(body) => {
                    let submission = match serde_json::from_value::<NewTodo>(body) {
                        Ok(todo) => Submission::Valid(todo),
                        Err(_) => Submission::Incomplete,
                    };
                    ctx.insert(submission);
                    Ok(false)
                }
                Err(err) => {
                    tracing::debug!(error = %err, "rejecting malformed body");
                    Ok(true)
                }
            }
        })
        .processable_with(|ctx| Ok(!matches!(ctx.get::<Submission>(), Some(Submission::Incomplete))))
        .post(move |ctx| {
            let Some(Submission::Valid(new)) = ctx.get::<Submission>() else {
                return Err(anyhow!("post! reached without a valid submission"));
            };
            let mut todos = writer.write().map_err(|_| anyhow!("todo store poisoned"))?;
            let todo = Todo {
                id: todos.len() + 1,
                title: new.title.clone(),
                done: new.done,
            };
            todos.push(todo.clone());
            ctx.set_location(format!("/todos/{}", todo.id));
            ctx.insert(todo);
            Ok(())
        })
        .handle_created(|ctx| {
            let todo = ctx.get::<Todo>().ok_or_else(|| anyhow!("no todo was created"))?;
            Ok(serde_json::to_value(todo)?)
        })
        .handle_ok(move |_| {
            let todos = reader.read().map_err(|_| anyhow!("todo store poisoned"))?;
            Ok(serde_json::to_value(&*todos)?)
        })
        .handle_unprocessable_entity(|_| Ok("a todo needs a string title"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("=== Todo Collection Example ===\n");

    let machine = Arc::new(WebMachine::new());
    let resource = Arc::new(collection(Arc::new(RwLock::new(Vec::new()))));

    // Create todos concurrently
    let titles = ["buy milk", "walk the dog", "write report"];
    let mut handles = Vec::new();
    for title in titles {
        let machine = machine.clone();
        let resource = resource.clone();
        let body = serde_json::json!({ "title": title }).to_string();
        handles.push(tokio::task::spawn_blocking(move || {
            machine.run(&resource, Request::post(body))
        }));
    }
    for handle in handles {
        let response = handle.await??;
        println!(
            "POST -> {} Location: {}",
            response.status(),
            response.header_str(header::LOCATION).unwrap_or("-")
        );
    }

    for (label, body) in [("missing title", r#"{"done":true}"#), ("not json", "{")] {
        let response = machine.run(&resource, Request::post(body))?;
        println!(
            "POST ({}) -> {} {}",
            label,
            response.status(),
            String::from_utf8_lossy(response.body())
        );
    }

    let response = machine.run(&resource, Request::get())?;
    println!("\nGET -> {}", response.status());
    println!("{}", String::from_utf8_lossy(response.body()));

    let response = machine.run(
        &resource,
        Request::get().with_header(header::ACCEPT, "application/php"),
    )?;
    println!("\nGET (application/php) -> {}", response.status());
    println!("{}", String::from_utf8_lossy(response.body()));

    Ok(())
}
