use std::sync::Arc;
use std::time::{Instant, SystemTime};

use crate::config::Config;
use crate::services::phrasal_verbs::Catalog;
use crate::services::session_store::SessionStore;
use crate::services::usage_validator::UsageValidator;

#[derive(Clone)]
pub struct AppState {
    started_at: Instant,
    started_at_system: SystemTime,
    config: Arc<Config>,
    catalog: Arc<Catalog>,
    validator: Arc<UsageValidator>,
    sessions: Arc<SessionStore>,
}

impl AppState {
    pub fn new(config: Config, catalog: Catalog, validator: UsageValidator) -> Self {
        Self {
            started_at: Instant::now(),
            started_at_system: SystemTime::now(),
            config: Arc::new(config),
            catalog: Arc::new(catalog),
            validator: Arc::new(validator),
            sessions: Arc::new(SessionStore::new()),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    pub fn started_at_system(&self) -> SystemTime {
        self.started_at_system
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn catalog(&self) -> Arc<Catalog> {
        Arc::clone(&self.catalog)
    }

    pub fn validator(&self) -> Arc<UsageValidator> {
        Arc::clone(&self.validator)
    }

    pub fn sessions(&self) -> Arc<SessionStore> {
        Arc::clone(&self.sessions)
    }
}
