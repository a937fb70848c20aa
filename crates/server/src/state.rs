use readnook_core::{Config, DetailOrchestrator, SanitizedConfig, SearchOrchestrator};

/// Shared application state
pub struct AppState {
    config: Config,
    search: SearchOrchestrator,
    details: DetailOrchestrator,
}

impl AppState {
    pub fn new(config: Config, search: SearchOrchestrator, details: DetailOrchestrator) -> Self {
        Self {
            config,
            search,
            details,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn search(&self) -> &SearchOrchestrator {
        &self.search
    }

    pub fn details(&self) -> &DetailOrchestrator {
        &self.details
    }
}
