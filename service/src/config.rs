use clap::builder::TypedValueParser as _;
use clap::Parser;
use dotenvy::dotenv;
use log::LevelFilter;
use std::fmt;
use std::str::FromStr;

/// GitHub's OAuth authorization endpoint.
pub const DEFAULT_GITHUB_AUTHORIZE_URL: &str = "https://github.com/login/oauth/authorize";
/// GitHub's OAuth token endpoint.
pub const DEFAULT_GITHUB_TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
/// GitHub's authenticated user endpoint.
pub const DEFAULT_GITHUB_USER_URL: &str = "https://api.github.com/user";

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

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// A list of full CORS origin URLs that allowed to receive server responses.
    #[arg(
        long,
        env,
        value_delimiter = ',',
        use_value_delimiter = true,
        default_value = "http://localhost:3000,https://localhost:3000"
    )]
    pub allowed_origins: Vec<String>,

    /// The OAuth client ID registered with GitHub.
    #[arg(long, env)]
    github_client_id: Option<String>,

    /// The OAuth client secret registered with GitHub.
    #[arg(long, env, hide_env_values = true)]
    github_client_secret: Option<String>,

    /// The callback URL GitHub redirects the browser back to after consent.
    #[arg(long, env, default_value = "http://localhost:4000/callback/github")]
    github_redirect_uri: String,

    /// GitHub's authorization endpoint. Override in tests to point at a mock server.
    #[arg(long, env, default_value = DEFAULT_GITHUB_AUTHORIZE_URL)]
    github_authorize_url: String,

    /// GitHub's token endpoint. Override in tests to point at a mock server.
    #[arg(long, env, default_value = DEFAULT_GITHUB_TOKEN_URL)]
    github_token_url: String,

    /// GitHub's user-info endpoint. Override in tests to point at a mock server.
    #[arg(long, env, default_value = DEFAULT_GITHUB_USER_URL)]
    github_user_url: String,

    /// The frontend page the browser lands on after a successful login. Identity
    /// claims are appended to it as query parameters.
    #[arg(long, env, default_value = "http://localhost:3000/islogin")]
    login_landing_url: String,

    /// Timeout in seconds applied to each outbound call to the provider
    #[arg(long, env, default_value_t = 10)]
    pub provider_timeout_secs: u64,

    /// The host interface to listen for incoming connections
    #[arg(short, long, env, default_value = "127.0.0.1")]
    pub interface: Option<String>,

    /// The host TCP port to listen for incoming connections
    #[arg(short, long, env, default_value_t = 4000)]
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

    /// Session expiry duration in seconds (default: 24 hours = 86400 seconds)
    #[arg(long, env, default_value_t = 86400)]
    pub backend_session_expiry_seconds: u64,
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

    pub fn set_github_client(mut self, client_id: &str, client_secret: &str) -> Self {
        self.github_client_id = Some(client_id.to_string());
        self.github_client_secret = Some(client_secret.to_string());
        self
    }

    /// Forgets any GitHub client credentials picked up from flags or the environment.
    pub fn clear_github_client(mut self) -> Self {
        self.github_client_id = None;
        self.github_client_secret = None;
        self
    }

    /// Points every GitHub endpoint at `base_url`, keeping GitHub's paths.
    pub fn set_github_base_url(mut self, base_url: &str) -> Self {
        self.github_authorize_url = format!("{base_url}/login/oauth/authorize");
        self.github_token_url = format!("{base_url}/login/oauth/access_token");
        self.github_user_url = format!("{base_url}/user");
        self
    }

    pub fn set_login_landing_url(mut self, login_landing_url: &str) -> Self {
        self.login_landing_url = login_landing_url.to_string();
        self
    }

    pub fn github_client_id(&self) -> Option<String> {
        self.github_client_id.clone()
    }

    pub fn github_client_secret(&self) -> Option<String> {
        self.github_client_secret.clone()
    }

    pub fn github_redirect_uri(&self) -> &str {
        &self.github_redirect_uri
    }

    pub fn github_authorize_url(&self) -> &str {
        &self.github_authorize_url
    }

    pub fn github_token_url(&self) -> &str {
        &self.github_token_url
    }

    pub fn github_user_url(&self) -> &str {
        &self.github_user_url
    }

    /// Returns the post-login landing page URL as configured, unparsed.
    pub fn login_landing_url(&self) -> &str {
        &self.login_landing_url
    }

    pub fn runtime_env(&self) -> RustEnv {
        self.runtime_env.clone()
    }

    pub fn is_production(&self) -> bool {
        self.runtime_env() == RustEnv::Production
    }
}
