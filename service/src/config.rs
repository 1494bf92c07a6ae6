use clap::builder::TypedValueParser as _;
use clap::Parser;
use dotenvy::dotenv;
use log::LevelFilter;

/// Origin entry that allows any origin to make cross-origin requests.
pub const ANY_ORIGIN: &str = "*";

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Comma separated list of origins allowed to make cross-origin requests.
    /// Leaving this unset or blank allows any origin.
    #[arg(long, env = "CORS_ORIGINS", value_delimiter = ',')]
    cors_origins: Vec<String>,

    /// Shared secret that requests must present in the X-Agent-Token header.
    /// When unset, every request is let through.
    #[arg(long, env = "AGENT_TOKEN", hide_env_values = true)]
    agent_token: Option<String>,

    /// The host interface to listen for incoming connections
    #[arg(short, long, env, default_value = "0.0.0.0")]
    pub interface: Option<String>,

    /// The host TCP port to listen for incoming connections
    #[arg(short, long, env, default_value_t = 3000)]
    pub port: u16,

    /// Set the log level verbosity threshold (level) to control what gets displayed on console output
    #[arg(
        short,
        long,
        env,
        default_value_t = LevelFilter::Info,
        value_parser = clap::builder::PossibleValuesParser::new(["OFF", "ERROR", "WARN", "INFO", "DEBUG", "TRACE"])
            .map(|s| s.parse::<LevelFilter>().unwrap()),
        )]
    pub log_level_filter: LevelFilter,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        // Load .env file first
        dotenv().ok();
        // Then parse the command line parameters and flags
        Config::parse()
    }

    /// The ordered CORS allow-list, derived from the raw `CORS_ORIGINS` value.
    pub fn allowed_origins(&self) -> Vec<String> {
        parse_origins(&self.cors_origins)
    }

    pub fn set_cors_origins(mut self, cors_origins: Vec<String>) -> Self {
        self.cors_origins = cors_origins;
        self
    }

    /// The shared secret the token gate compares against. An empty value counts as unset.
    pub fn agent_token(&self) -> Option<&str> {
        self.agent_token.as_deref().filter(|token| !token.is_empty())
    }

    pub fn set_agent_token(mut self, agent_token: Option<String>) -> Self {
        self.agent_token = agent_token;
        self
    }

    pub fn interface(&self) -> &str {
        self.interface.as_deref().unwrap_or("0.0.0.0")
    }

    pub fn set_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// The `interface:port` pair the server binds to.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.interface(), self.port)
    }
}

/// Normalizes the comma-split origin entries, trimming each one and dropping empty ones.
/// An unset or blank value yields the single wildcard entry.
pub fn parse_origins<S: AsRef<str>>(entries: &[S]) -> Vec<String> {
    let origins: Vec<String> = entries
        .iter()
        .map(|origin| origin.as_ref().trim())
        .filter(|origin| !origin.is_empty())
        .map(String::from)
        .collect();

    if origins.is_empty() {
        vec![ANY_ORIGIN.to_string()]
    } else {
        origins
    }
}
