use config::Config;

pub mod config;
pub mod logging;

// Service-level state containing only infrastructure concerns
// Needs to implement Clone to be able to be passed into Router as State
#[derive(Clone, Debug)]
pub struct AppState {
    pub config: Config,
}

impl AppState {
    pub fn new(app_config: Config) -> Self {
        Self { config: app_config }
    }

    pub fn agent_token(&self) -> Option<&str> {
        self.config.agent_token()
    }
}
