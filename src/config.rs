use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// When unset the service runs on the in-memory demo catalogue.
    pub database_url: Option<String>,
    pub host: String,
    pub port: u16,
    /// Sessions untouched for this long are dropped.
    pub session_idle_minutes: i64,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL").ok().filter(|url| !url.trim().is_empty());
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let session_idle_minutes = env::var("SESSION_IDLE_MINUTES")
            .ok()
            .and_then(|m| m.parse::<i64>().ok())
            .filter(|m| (1..=10_080).contains(m))
            .unwrap_or(240);
        Ok(Self {
            port,
            session_idle_minutes,
            database_url,
            host,
        })
    }

    pub fn require_database_url(&self) -> anyhow::Result<&str> {
        self.database_url
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set"))
    }
}
