use std::sync::Arc;

use crate::{config::AppConfig, db::OrmConn, session::SessionStore};

#[derive(Clone)]
pub struct AppState {
    pub orm: OrmConn,
    pub sessions: SessionStore,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(orm: OrmConn, config: AppConfig) -> Self {
        let sessions = SessionStore::new(chrono::Duration::minutes(config.session_idle_minutes));
        Self {
            orm,
            sessions,
            config: Arc::new(config),
        }
    }
}
