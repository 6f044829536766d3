use std::{env, path::PathBuf};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_ttl_hours: i64,
    /// Directory served under `/static`; uploads land in its `uploads/` child.
    pub static_dir: PathBuf,
    pub session_idle_minutes: i64,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET is not set"))?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let jwt_ttl_hours = env::var("JWT_TTL_HOURS")
            .ok()
            .and_then(|h| h.parse::<i64>().ok())
            .unwrap_or(12);
        let static_dir = env::var("STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("static"));
        let session_idle_minutes = env::var("SESSION_IDLE_MINUTES")
            .ok()
            .and_then(|m| m.parse::<i64>().ok())
            .unwrap_or(120);
        Ok(Self {
            port,
            database_url,
            host,
            jwt_secret,
            jwt_ttl_hours,
            static_dir,
            session_idle_minutes,
        })
    }

    pub fn upload_dir(&self) -> PathBuf {
        self.static_dir.join("uploads")
    }
}
