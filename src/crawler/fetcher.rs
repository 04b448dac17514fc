//! HTTP fetcher implementation
//!
//! This module owns the crawl session:
//! - Building one HTTP client per crawl with a cookie store
//! - Attaching Basic or Bearer credentials to every request
//! - Priming the session with a login POST when configured
//! - Keeping redirects inside the crawl domain
//! - Single-shot GET requests with error classification (no retries)

use crate::config::{AuthConfig, CrawlerConfig};
use crate::url::{extract_domain, normalize_seed};
use crate::{ConfigError, UrlError};
use reqwest::{redirect::Policy, Client, RequestBuilder};
use thiserror::Error;
use url::Url;

/// Maximum redirect hops followed for a single request
const MAX_REDIRECTS: usize = 10;

/// Classified failure of a single fetch
///
/// A `FetchError` is local to one page; the controller logs it and moves on.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Connection failed for {url}: {message}")]
    Connect { url: String, message: String },

    #[error("Redirect from {url} leaves the crawl domain: {location}")]
    OffDomainRedirect { url: String, location: String },

    #[error("Expected HTML from {url}, got {content_type}")]
    ContentMismatch { url: String, content_type: String },

    #[error("HTTP error for {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    /// Short machine-readable label used for statistics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Status { .. } => "http_status",
            Self::Timeout { .. } => "timeout",
            Self::Connect { .. } => "connect",
            Self::OffDomainRedirect { .. } => "off_domain_redirect",
            Self::ContentMismatch { .. } => "content_mismatch",
            Self::Transport { .. } => "transport",
        }
    }

    /// Classifies a transport-level reqwest error
    fn from_reqwest(url: &str, error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
            }
        } else if error.is_connect() {
            Self::Connect {
                url: url.to_string(),
                message: error.to_string(),
            }
        } else {
            Self::Transport {
                url: url.to_string(),
                source: error,
            }
        }
    }
}

/// A fetched page and the URL it was finally served from
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL after in-domain redirects; relative links resolve against it
    pub url: Url,

    pub body: String,
}

/// Builds an HTTP client with proper configuration
///
/// The cookie store keeps whatever session state the site hands out, which is
/// what makes the session-login scheme work. Redirects are followed only
/// while they stay on `base_domain`; the first hop elsewhere hands the 3xx
/// response back to the caller.
///
/// # Example
///
/// ```no_run
/// use domain_harvester::config::CrawlerConfig;
/// use domain_harvester::crawler::build_http_client;
///
/// let config = CrawlerConfig::new("https://example.com/");
/// let client = build_http_client(&config, "example.com").unwrap();
/// ```
pub fn build_http_client(
    config: &CrawlerConfig,
    base_domain: &str,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(config.timeout())
        .connect_timeout(config.connect_timeout())
        .redirect(same_domain_policy(base_domain.to_string()))
        .cookie_store(true)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Redirect policy that refuses to leave `base_domain`
fn same_domain_policy(base_domain: String) -> Policy {
    Policy::custom(move |attempt| {
        if attempt.previous().len() >= MAX_REDIRECTS {
            return attempt.error("too many redirects");
        }

        let in_domain = extract_domain(attempt.url())
            .is_some_and(|domain| domain.eq_ignore_ascii_case(&base_domain));
        if in_domain {
            attempt.follow()
        } else {
            tracing::debug!("Not following off-domain redirect to {}", attempt.url());
            attempt.stop()
        }
    })
}

/// Performs authenticated page retrievals for one crawl
pub struct Fetcher {
    client: Client,
    auth: AuthConfig,
}

impl Fetcher {
    /// Creates a fetcher with a fresh session
    ///
    /// The crawl domain is taken from `config.base_url`. No network traffic
    /// happens here; a session login is deferred to
    /// [`Fetcher::establish_session`].
    pub fn new(config: &CrawlerConfig, auth: AuthConfig) -> Result<Self, ConfigError> {
        let seed = normalize_seed(&config.base_url)?;
        let base_domain = extract_domain(&seed).ok_or(UrlError::MissingDomain)?;
        let client = build_http_client(config, &base_domain)
            .map_err(|e| ConfigError::Client(e.to_string()))?;
        Ok(Self { client, auth })
    }

    pub fn auth(&self) -> &AuthConfig {
        &self.auth
    }

    /// Logs in when the scheme is `SessionLogin`; a no-op otherwise
    ///
    /// The login response only matters for the cookies it sets, so a
    /// redirect the policy declined to follow still counts as accepted.
    pub async fn establish_session(&self) -> Result<(), FetchError> {
        let AuthConfig::SessionLogin {
            login_url,
            login_payload,
        } = &self.auth
        else {
            return Ok(());
        };

        tracing::info!("Logging in at {}", login_url);
        let response = self
            .client
            .post(login_url.as_str())
            .form(login_payload)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(login_url, e))?;

        let status = response.status();
        if !status.is_success() && !status.is_redirection() {
            return Err(FetchError::Status {
                url: login_url.clone(),
                status: status.as_u16(),
            });
        }

        tracing::debug!("Session login accepted with HTTP {}", status.as_u16());
        Ok(())
    }

    /// Fetches a page and returns its markup with the URL that served it
    ///
    /// # Error Classification
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | 2xx with HTML/text body | `Ok(page)` |
    /// | Redirect off the crawl domain | `OffDomainRedirect` |
    /// | Any other status | `Status` |
    /// | Timeout | `Timeout` |
    /// | Connection refused, DNS, TLS | `Connect` |
    /// | Non-textual Content-Type | `ContentMismatch` |
    /// | Body read failure, other | `Transport` |
    pub async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        let url_str = url.as_str();
        let request = self.authorize(self.client.get(url.clone()));

        let response = request
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url_str, e))?;

        let status = response.status();
        if status.is_redirection() {
            let location = response
                .headers()
                .get(reqwest::header::LOCATION)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("")
                .to_string();
            return Err(FetchError::OffDomainRedirect {
                url: url_str.to_string(),
                location,
            });
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url_str.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if !is_markup_content_type(&content_type) {
            return Err(FetchError::ContentMismatch {
                url: url_str.to_string(),
                content_type,
            });
        }

        let final_url = response.url().clone();
        if final_url != *url {
            tracing::debug!("{} redirected to {}", url, final_url);
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(url_str, e))?;

        Ok(FetchedPage {
            url: final_url,
            body,
        })
    }

    /// Attaches per-request credentials
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.auth {
            AuthConfig::Basic { username, password } => {
                request.basic_auth(username, Some(password))
            }
            AuthConfig::Token { token } => request.bearer_auth(token),
            AuthConfig::None | AuthConfig::SessionLogin { .. } => request,
        }
    }
}

/// Returns true if a Content-Type can hold page markup
///
/// A missing header is given the benefit of the doubt.
fn is_markup_content_type(content_type: &str) -> bool {
    let content_type = content_type.trim().to_ascii_lowercase();
    content_type.is_empty() || content_type.contains("html") || content_type.starts_with("text/")
}
