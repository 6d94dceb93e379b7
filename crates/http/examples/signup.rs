//! Minimal signup service.
//!
//! ```text
//! cargo run -p verity-http --example signup
//! curl -s localhost:3000/signup -H 'content-type: application/json' \
//!      -d '{"username":"ada","email":"ada@example.com","password":"Secret123"}'
//! ```

use std::sync::Arc;

use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use sqlx::sqlite::SqlitePoolOptions;
use tracing_subscriber::EnvFilter;
use verity_http::ValidatedJson;
use verity_validator::{Config, SchemaSpec, Validatable, Validator};

#[derive(Deserialize, Serialize)]
struct Signup {
    username: String,
    email: String,
    password: String,
}

impl Validatable for Signup {
    fn schema() -> SchemaSpec {
        SchemaSpec::new()
            .field("username", "required|username|unique:users,username")
            .field("email", "required|email|unique:users,email")
            .field("password", "required|password")
    }
}

async fn signup(ValidatedJson(form, _): ValidatedJson<Signup>) -> Json<Value> {
    Json(json!({"username": form.username}))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "debug".into()))
        .init();

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    sqlx::query("CREATE TABLE users (username TEXT NOT NULL, email TEXT NOT NULL)")
        .execute(&pool)
        .await?;
    sqlx::query("INSERT INTO users VALUES ('taken', 'taken@example.com')")
        .execute(&pool)
        .await?;

    let validator = Validator::builder()
        .config(Config::from_env()?)
        .database(Arc::new(pool))
        .build();

    let app = Router::new()
        .route("/signup", post(signup))
        .with_state(Arc::new(validator));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}
