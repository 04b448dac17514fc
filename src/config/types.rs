use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Default page budget when none is configured
pub const DEFAULT_MAX_PAGES: u32 = 100;

/// Default pause between requests (milliseconds)
pub const DEFAULT_DELAY_MS: u64 = 1000;

/// Default whole-request timeout (seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default connect timeout (seconds)
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Main configuration structure for Domain-Harvester
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Seed URL; its host (and explicit port) bounds the crawl
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Maximum number of pages to visit
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: u32,

    /// Pause between consecutive requests (milliseconds)
    #[serde(rename = "delay-ms", default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Whole-request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connection establishment timeout (seconds)
    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

impl CrawlerConfig {
    /// Creates a crawler configuration for `base_url` with every other value defaulted
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            max_pages: DEFAULT_MAX_PAGES,
            delay_ms: DEFAULT_DELAY_MS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            user_agent: default_user_agent(),
        }
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// Authentication scheme for the crawl session
///
/// Selected once when the crawler is built and never changed afterwards.
/// In TOML the variant is chosen with `method`:
///
/// ```toml
/// [auth]
/// method = "session-login"
/// login-url = "https://example.com/login"
/// login-payload = { user = "alice", pass = "secret" }
/// ```
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(tag = "method", rename_all = "kebab-case")]
pub enum AuthConfig {
    /// Unauthenticated requests
    #[default]
    None,

    /// HTTP Basic credentials attached to every request
    Basic { username: String, password: String },

    /// Bearer token attached to every request
    Token { token: String },

    /// One form POST to `login_url` primes the cookie jar before crawling
    SessionLogin {
        #[serde(rename = "login-url")]
        login_url: String,
        #[serde(rename = "login-payload", default)]
        login_payload: BTreeMap<String, String>,
    },
}

impl AuthConfig {
    /// Builds Basic auth when both credentials are present and non-empty
    ///
    /// Anything else yields [`AuthConfig::None`].
    pub fn from_credentials(username: Option<&str>, password: Option<&str>) -> Self {
        match (username, password) {
            (Some(u), Some(p)) if !u.is_empty() && !p.is_empty() => Self::Basic {
                username: u.to_string(),
                password: p.to_string(),
            },
            _ => Self::None,
        }
    }

    /// Short name of the scheme, matching the TOML `method` tag
    pub fn method(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Basic { .. } => "basic",
            Self::Token { .. } => "token",
            Self::SessionLogin { .. } => "session-login",
        }
    }
}

// Secrets stay out of logs.
impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            Self::Token { .. } => f
                .debug_struct("Token")
                .field("token", &"<redacted>")
                .finish(),
            Self::SessionLogin {
                login_url,
                login_payload,
            } => f
                .debug_struct("SessionLogin")
                .field("login_url", login_url)
                .field("login_payload_keys", &login_payload.keys().collect::<Vec<_>>())
                .finish(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// JSON Lines file for harvested documents; stdout when absent
    pub path: Option<String>,

    /// JSON file receiving the end-of-run statistics
    #[serde(rename = "summary-path")]
    pub summary_path: Option<String>,
}

fn default_max_pages() -> u32 {
    DEFAULT_MAX_PAGES
}

fn default_delay_ms() -> u64 {
    DEFAULT_DELAY_MS
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_connect_timeout_secs() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

fn default_user_agent() -> String {
    format!("domain-harvester/{}", env!("CARGO_PKG_VERSION"))
}
