//! Service configuration
//!
//! Read once at startup after `.env` has been loaded. Classifier settings
//! live in [`sentiment_classifier::ClassifierConfig`].

use std::str::FromStr;

pub const DEFAULT_PORT: u16 = 3000;

/// Where submissions are persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreKind {
    #[default]
    Postgres,
    Memory,
}

impl FromStr for StoreKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" | "database" => Ok(StoreKind::Postgres),
            "memory" | "in-memory" => Ok(StoreKind::Memory),
            other => Err(format!("unknown feedback store '{}'", other)),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
    pub port: u16,
    /// Browser origin allowed to call the API with credentials. Any origin
    /// is allowed (without credentials) when unset.
    pub frontend_origin: Option<String>,
    pub store: StoreKind,
}

impl ServerConfig {
    /// Read `PORT`, `FRONTEND_ORIGIN` and `FEEDBACK_STORE`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = lookup("PORT")
            .and_then(|p| p.trim().parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let frontend_origin = lookup("FRONTEND_ORIGIN")
            .map(|o| o.trim().trim_end_matches('/').to_string())
            .filter(|o| !o.is_empty());

        let store = match lookup("FEEDBACK_STORE") {
            Some(value) => value.parse::<StoreKind>().unwrap_or_else(|e| {
                tracing::warn!("{}; falling back to postgres", e);
                StoreKind::Postgres
            }),
            None => StoreKind::default(),
        };

        Self {
            port,
            frontend_origin,
            store,
        }
    }

    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}
