use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "https://api.linkedin.com/v2";
pub const DEFAULT_AUTH_BASE_URL: &str = "https://www.linkedin.com/uas/oauth2";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Settings shared by the API client and the authorization code flow.
#[derive(Clone, Debug)]
pub struct Config {
    /// The LinkedIn API prefix, [`DEFAULT_API_BASE_URL`] by default.
    pub api_base_url: String,

    /// The prefix of the OAuth 2.0 `authorization` and `accessToken` endpoints,
    /// [`DEFAULT_AUTH_BASE_URL`] by default.
    pub auth_base_url: String,

    /// The timeout applied to each individual HTTP request, [`DEFAULT_TIMEOUT`] by default.
    pub timeout: Duration,

    /// Whether to refuse plain-HTTP URLs. Only worth disabling to talk to a local test server.
    pub https_only: bool,
}

impl Config {
    pub(crate) fn http_client(&self) -> Result<reqwest::Client, reqwest::Error> {
        reqwest::Client::builder()
            .min_tls_version(reqwest::tls::Version::TLS_1_2)
            .https_only(self.https_only)
            .build()
    }

    pub(crate) fn auth_url(&self, path: &str) -> String {
        format!("{}/{}", self.auth_base_url.trim_end_matches('/'), path)
    }

    pub(crate) fn api_url(&self, path: &str) -> String {
        format!("{}/{}", self.api_base_url.trim_end_matches('/'), path)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: String::from(DEFAULT_API_BASE_URL),
            auth_base_url: String::from(DEFAULT_AUTH_BASE_URL),
            timeout: DEFAULT_TIMEOUT,
            https_only: true,
        }
    }
}
