use clap::builder::TypedValueParser as _;
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use log::LevelFilter;
use number_verification::api::DEFAULT_API_BASE_URL;
use number_verification::http::Transport;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Default redirect target for the frontend authorization flow.
pub const DEFAULT_REDIRECT_URL: &str = "http://localhost:3000/callback";

#[derive(Clone, Debug, PartialEq)]
pub enum RustEnv {
    Development,
    Production,
    Staging,
}

#[derive(Debug, PartialEq, Eq)]
pub struct RustEnvParseError;

impl FromStr for RustEnv {
    type Err = RustEnvParseError;
    fn from_str(level: &str) -> Result<RustEnv, Self::Err> {
        match level.to_lowercase().as_str() {
            "development" => Ok(RustEnv::Development),
            "production" => Ok(RustEnv::Production),
            "staging" => Ok(RustEnv::Staging),
            _ => Err(RustEnvParseError),
        }
    }
}

impl fmt::Display for RustEnv {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RustEnv::Development => write!(f, "development"),
            RustEnv::Production => write!(f, "production"),
            RustEnv::Staging => write!(f, "staging"),
        }
    }
}

/// Reasons a configuration cannot be used for the requested command.
#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A required setting was not provided by flag, environment or `.env`.
    Missing(&'static str),
    /// Production deployments must only talk to `https://` endpoints.
    InsecureUrl(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::Missing(name) => write!(f, "missing required setting: {name}"),
            ConfigError::InsecureUrl(name) => {
                write!(f, "{name} must use https:// in production")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone, Debug, Subcommand)]
pub enum Command {
    /// Print the frontend authorization URL that starts a verification.
    AuthUrl {
        /// Phone number sent as the OIDC login hint.
        #[arg(long)]
        phone_number: String,
        /// Opaque state echoed back on the redirect.
        #[arg(long)]
        state: Option<String>,
    },
    /// Verify a phone number using the code delivered to the redirect URL.
    Verify {
        /// Phone number, or its SHA-256 hex digest.
        #[arg(long)]
        phone_number: String,
        /// Authorization code from the redirect.
        #[arg(long)]
        code: Option<String>,
        /// State from the redirect.
        #[arg(long)]
        state: Option<String>,
        /// Hash the phone number before sending it.
        #[arg(long, default_value_t = false)]
        hash: bool,
    },
    /// Report whether an input would be sent as a hashed phone number.
    IsHashed {
        #[arg(long)]
        phone_number: String,
    },
}

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// The Vonage application ID, sent as the OIDC client_id.
    #[arg(long, env)]
    application_id: Option<String>,

    /// Pre-issued CAMARA access token used to authenticate verification calls.
    #[arg(long, env, hide_env_values = true)]
    access_token: Option<String>,

    /// The URL the network provider redirects to with `code` and `state`.
    #[arg(long, env, default_value = DEFAULT_REDIRECT_URL)]
    redirect_url: String,

    /// The number verification endpoint.
    /// Override in tests to point at a mock server.
    #[arg(long, env, default_value = DEFAULT_API_BASE_URL)]
    api_base_url: String,

    /// Timeout in seconds for a single verification request
    #[arg(long, env, default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// Maximum number of retries for transient transport failures
    #[arg(long, env, default_value_t = 3)]
    pub max_retries: u32,

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

    /// Set the Rust runtime environment to use.
    #[arg(
    short,
    long,
    env,
    default_value_t = RustEnv::Development,
    value_parser = clap::builder::PossibleValuesParser::new([
        "DEVELOPMENT", "PRODUCTION", "STAGING",
        "development", "production", "staging"
    ])
        .map(|s| s.parse::<RustEnv>().unwrap()),
    )]
    pub runtime_env: RustEnv,

    #[command(subcommand)]
    pub command: Option<Command>,
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

    pub fn application_id(&self) -> Option<&str> {
        self.application_id.as_deref()
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn redirect_url(&self) -> &str {
        &self.redirect_url
    }

    /// Returns the number verification endpoint.
    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    /// Timeout and retry settings for the verification API client.
    pub fn transport(&self) -> Transport {
        Transport {
            timeout: Duration::from_secs(self.request_timeout_secs),
            max_retries: self.max_retries,
        }
    }

    pub fn runtime_env(&self) -> RustEnv {
        self.runtime_env.clone()
    }

    pub fn is_production(&self) -> bool {
        self.runtime_env() == RustEnv::Production
    }

    /// Checks settings that every command depends on.
    ///
    /// In production, both the redirect URL and the API endpoint must be `https://`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.application_id.as_deref().unwrap_or_default().is_empty() {
            return Err(ConfigError::Missing("APPLICATION_ID"));
        }

        if self.is_production() {
            if !self.redirect_url.starts_with("https://") {
                return Err(ConfigError::InsecureUrl("REDIRECT_URL"));
            }
            if !self.api_base_url.starts_with("https://") {
                return Err(ConfigError::InsecureUrl("API_BASE_URL"));
            }
        }

        Ok(())
    }
}
