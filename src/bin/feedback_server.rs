//! Student Feedback REST API Server
//!
//! ## Usage
//!
//! ```bash
//! # Start the server against Postgres
//! DATABASE_URL=postgresql://localhost/student_feedback GEMINI_API_KEY=... \
//!   cargo run --bin feedback_server
//!
//! # Local run without a database
//! FEEDBACK_STORE=memory cargo run --bin feedback_server
//!
//! curl -X POST http://localhost:3000/api/saveFeedback \
//!   -H "Content-Type: application/json" \
//!   -d '{"studentEmail":"a@uni.edu","course":"CS101","teacher":"Dr. Lee","feedback":"Great lectures"}'
//!
//! curl http://localhost:3000/api/getFeedback
//! curl http://localhost:3000/api/health
//! ```

use anyhow::Context;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use sentiment_classifier::{create_pipeline, ClassifierConfig};
use student_feedback::{
    create_router, AppState, DatabaseManager, FeedbackStore, MemoryFeedbackStore, ServerConfig,
    StoreKind,
};

const DEFAULT_LOG_FILTER: &str = "student_feedback=info,sentiment_classifier=info,tower_http=debug";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let server_config = ServerConfig::from_env();
    let classifier_config = ClassifierConfig::from_env();

    if !classifier_config.gemini.has_credential() {
        error!("GEMINI_API_KEY is not set; feedback without keyword matches will be stored as 'unknown'");
    }

    let pipeline =
        create_pipeline(&classifier_config).context("Failed to build sentiment pipeline")?;

    let mut database = None;
    let store: Arc<dyn FeedbackStore> = match server_config.store {
        StoreKind::Memory => {
            warn!("Using in-memory feedback store; submissions are lost on restart");
            Arc::new(MemoryFeedbackStore::new())
        }
        StoreKind::Postgres => {
            let db = DatabaseManager::with_default_config()
                .await
                .context("Failed to connect to database")?;
            db.test_connection()
                .await
                .context("Database connectivity check failed")?;
            db.verify_schema()
                .await
                .context("Database schema check failed")?;
            let repository = db.feedback_repository();
            database = Some(db);
            Arc::new(repository)
        }
    };

    let state = AppState::new(pipeline, store);
    let app = create_router(state, server_config.frontend_origin.as_deref());

    match &server_config.frontend_origin {
        Some(origin) => info!("CORS restricted to {}", origin),
        None => warn!("FRONTEND_ORIGIN not set; allowing any origin"),
    }

    let addr = server_config.bind_address();
    info!("Starting feedback server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(db) = database {
        db.close().await;
    }
    info!("Feedback server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
