use std::{borrow::Cow, time::Duration};

use rand::Rng;
use sha2::{Digest, Sha256};

use crate::{
    auth::token::{AccessToken, TokenResponse},
    config::Config,
    encoding::quote,
    error::{Error, ErrorKind},
    permission::{collect_permissions, join_scopes},
    request_data::{FormData, RequestData},
    response::{decode_json, raise_for_error, ApiError},
};

const AUTHORIZATION_PATH: &str = "authorization";
const ACCESS_TOKEN_PATH: &str = "accessToken";

/// The standard [OAuth 2.0 authorization code flow](https://learn.microsoft.com/en-us/linkedin/shared/authentication/authorization-code-flow),
/// in which the member is redirected to LinkedIn to approve the application.
///
/// The flow has three steps:
///
/// 1. Send the member to [`authorization_url`](Self::authorization_url).
/// 2. Once LinkedIn redirects back with a `code` query parameter, pass it to
///    [`set_authorization_code`](Self::set_authorization_code).
/// 3. Call [`get_access_token`](Self::get_access_token) to exchange the code for a token.
///    Codes are single-use.
#[derive(Clone, Debug)]
pub struct AuthorizationCodeAuthentication {
    key: Box<str>,
    secret: Box<str>,
    redirect_uri: Box<str>,
    permissions: Vec<Box<str>>,
    state: Option<Box<str>>,
    authorization_code: Option<Box<str>>,
    token: Option<AccessToken>,
    last_error: Option<ApiError>,
    config: Config,
    http_client: Option<reqwest::Client>,
}

impl AuthorizationCodeAuthentication {
    pub fn new(key: &str, secret: &str, redirect_uri: &str) -> Self {
        Self {
            key: key.into(),
            secret: secret.into(),
            redirect_uri: redirect_uri.into(),
            permissions: Vec::new(),
            state: None,
            authorization_code: None,
            token: None,
            last_error: None,
            config: Config::default(),
            http_client: None,
        }
    }

    /// An authentication with no application credentials, holding a token obtained elsewhere.
    pub fn from_token(token: AccessToken) -> Self {
        Self {
            token: Some(token),
            ..Self::new("", "", "")
        }
    }

    #[must_use]
    pub fn with_permissions<I, S>(self, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            permissions: collect_permissions(permissions),
            ..self
        }
    }

    #[must_use]
    pub fn with_config(self, config: Config) -> Self {
        Self {
            config,
            http_client: None,
            ..self
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    pub fn permissions(&self) -> &[Box<str>] {
        &self.permissions
    }

    /// The anti-CSRF `state` sent with the authorization URL. It is generated on first use and
    /// stays the same for the lifetime of this object, so it can be compared against the
    /// `state` LinkedIn sends back with the redirect.
    pub fn state(&mut self) -> &str {
        let secret = &self.secret;
        self.state
            .get_or_insert_with(|| make_new_state(&mut rand::thread_rng(), secret))
    }

    /// Returns the URL of LinkedIn's authorization page for this application.
    ///
    /// The query string is percent-encoded by hand rather than form-encoded: LinkedIn wants
    /// spaces in `scope` as `%20`, not `+`.
    pub fn authorization_url(&mut self) -> String {
        log::info!("Building authorization URL");

        let scope = join_scopes(&self.permissions);
        let state: Box<str> = self.state().into();

        let query = [
            ("response_type", "code"),
            ("client_id", &*self.key),
            ("scope", &*scope),
            ("state", &*state),
            ("redirect_uri", &*self.redirect_uri),
        ];

        let mut url = self.config.auth_url(AUTHORIZATION_PATH);
        url.push('?');
        for (i, (key, val)) in query.iter().enumerate() {
            if i > 0 {
                url.push('&');
            }
            url.push_str(&quote(key));
            url.push('=');
            url.push_str(&quote(val));
        }
        url
    }

    pub fn authorization_code(&self) -> Option<&str> {
        self.authorization_code.as_deref()
    }

    pub fn set_authorization_code(&mut self, code: &str) {
        self.authorization_code = Some(code.into());
    }

    pub fn token(&self) -> Option<&AccessToken> {
        self.token.as_ref()
    }

    /// The error LinkedIn returned from the last failed token exchange, if any.
    pub fn last_error(&self) -> Option<&ApiError> {
        self.last_error.as_ref()
    }

    /// Exchanges the authorization code for an access token, stores the token in this object
    /// and returns it. Any error recorded by a previous exchange is cleared first.
    ///
    /// Returns [`ErrorKind::MissingAuthorizationCode`] without making a request if
    /// [`set_authorization_code`](Self::set_authorization_code) has not been called.
    pub async fn get_access_token(&mut self, timeout: Duration) -> Result<&AccessToken, Error> {
        let code = self
            .authorization_code
            .as_deref()
            .ok_or_else(|| ErrorKind::MissingAuthorizationCode.boxed())?;

        log::info!("Requesting access token for authorization code");
        self.last_error = None;

        let data = [
            (Cow::Borrowed("grant_type"), Cow::Borrowed("authorization_code")),
            (Cow::Borrowed("code"), Cow::Borrowed(code)),
            (Cow::Borrowed("redirect_uri"), Cow::Borrowed(&*self.redirect_uri)),
            (Cow::Borrowed("client_id"), Cow::Borrowed(&*self.key)),
            (Cow::Borrowed("client_secret"), Cow::Borrowed(&*self.secret)),
        ];

        let http_client = match &self.http_client {
            Some(http_client) => http_client.clone(),
            None => {
                let http_client = self
                    .config
                    .http_client()
                    .map_err(|err| ErrorKind::Transfer(err).boxed())?;
                self.http_client.insert(http_client).clone()
            }
        };

        let request = FormData::new(&data)
            .build_http_request(
                http_client
                    .post(self.config.auth_url(ACCESS_TOKEN_PATH))
                    .timeout(timeout),
            )
            .map_err(|err| ErrorKind::Transfer(err).boxed())?;

        let response = http_client
            .execute(request)
            .await
            .map_err(|err| ErrorKind::Transfer(err).boxed())?;

        let response = match raise_for_error(response).await {
            Ok(response) => response,
            Err(err) => {
                if let Some(api_error) = err.api_error() {
                    log::warn!("Access token request was rejected: {}", api_error);
                    self.last_error = Some(api_error.clone());
                }
                return Err(err);
            }
        };

        let token_response = decode_json::<TokenResponse>(response).await?;
        Ok(self.token.insert(token_response.into()))
    }
}

/// A random integer below 2^63 joined with the client secret, hashed and rendered as hex.
fn make_new_state<R: Rng + ?Sized>(rng: &mut R, secret: &str) -> Box<str> {
    let seed = rng.gen_range(0..(1u64 << 63));
    let digest = Sha256::digest(format!("{}{}", seed, secret).as_bytes());
    hex::encode(digest).into_boxed_str()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use reqwest::StatusCode;
    use wiremock::{
        matchers::{body_string_contains, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    use super::AuthorizationCodeAuthentication;
    use crate::{config::Config, error::ErrorKind, permission::Permission};

    fn test_config(mock_server: &MockServer) -> Config {
        Config {
            auth_base_url: mock_server.uri(),
            https_only: false,
            ..Default::default()
        }
    }

    #[test]
    fn test_authorization_url_scope_encoding() {
        let mut auth = AuthorizationCodeAuthentication::new(
            "client-id",
            "client-secret",
            "http://localhost:8000/callback",
        )
        .with_permissions([Permission::BasicProfile, Permission::EmailAddress]);

        let url = auth.authorization_url();
        let state = auth.state().to_owned();

        assert!(url.starts_with("https://www.linkedin.com/uas/oauth2/authorization?response_type=code&client_id=client-id&"));
        assert!(url.contains("scope=r_basicprofile%20r_emailaddress"));
        assert!(url.contains(&format!("state={}", state)));
        assert!(url.ends_with("redirect_uri=http%3A//localhost%3A8000/callback"));
        assert!(!url.contains('+'));
    }

    #[test]
    fn test_state_is_memoized() {
        let mut auth = AuthorizationCodeAuthentication::new("id", "secret", "uri");
        let first = auth.state().to_owned();
        assert_eq!(first.len(), 64);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(auth.state(), first);

        let url = auth.authorization_url();
        assert!(url.contains(&format!("state={}", first)));
        assert_eq!(auth.state(), first);
    }

    #[test]
    fn test_state_differs_between_objects() {
        let mut a = AuthorizationCodeAuthentication::new("id", "secret", "uri");
        let mut b = AuthorizationCodeAuthentication::new("id", "secret", "uri");
        assert_ne!(a.state().to_owned(), b.state().to_owned());
    }

    #[tokio::test]
    async fn test_get_access_token_requires_code() {
        let mut auth = AuthorizationCodeAuthentication::new("id", "secret", "uri");

        for _ in 0..2 {
            let err = auth.get_access_token(Duration::from_secs(1)).await.unwrap_err();
            assert!(matches!(err.kind(), ErrorKind::MissingAuthorizationCode));
        }
        assert!(auth.token().is_none());
    }

    #[tokio::test]
    async fn test_get_access_token_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/accessToken"))
            .and(body_string_contains("grant_type=authorization_code"))
            .and(body_string_contains("code=the-code"))
            .and(body_string_contains("client_id=id"))
            .and(body_string_contains("client_secret=secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "AQUvlL",
                "expires_in": 5184000
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let mut auth = AuthorizationCodeAuthentication::new("id", "secret", "http://localhost/cb")
            .with_config(test_config(&mock_server));
        auth.set_authorization_code("the-code");

        let token = auth.get_access_token(Duration::from_secs(5)).await.unwrap();
        assert_eq!(token.access_token(), "AQUvlL");
        assert_eq!(token.expires_in(), Some(5184000));
        assert_eq!(auth.token().unwrap().access_token(), "AQUvlL");
        assert!(auth.last_error().is_none());
    }

    #[tokio::test]
    async fn test_get_access_token_error_is_recorded() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/accessToken"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": "invalid_request",
                "message": "Unable to retrieve access token: authorization code not found",
                "status": 400
            })))
            .mount(&mock_server)
            .await;

        let mut auth = AuthorizationCodeAuthentication::new("id", "secret", "uri")
            .with_config(test_config(&mock_server));
        auth.set_authorization_code("stale");

        let err = auth.get_access_token(Duration::from_secs(5)).await.unwrap_err();
        let api_error = err.api_error().unwrap();
        assert_eq!(api_error.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            api_error.message(),
            "Unable to retrieve access token: authorization code not found"
        );
        assert_eq!(auth.last_error().unwrap().status(), StatusCode::BAD_REQUEST);
        assert!(auth.token().is_none());
    }

    #[tokio::test]
    async fn test_transport_failure_clears_last_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/accessToken"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "message": "Client authentication failed"
            })))
            .mount(&mock_server)
            .await;

        let mut auth = AuthorizationCodeAuthentication::new("id", "secret", "uri")
            .with_config(test_config(&mock_server));
        auth.set_authorization_code("the-code");

        auth.get_access_token(Duration::from_secs(5)).await.unwrap_err();
        assert_eq!(auth.last_error().unwrap().status(), StatusCode::UNAUTHORIZED);

        // Nothing listens on port 1, so the exchange fails before any response arrives.
        let mut auth = auth.with_config(Config {
            auth_base_url: "http://127.0.0.1:1".to_owned(),
            https_only: false,
            ..Default::default()
        });

        let err = auth.get_access_token(Duration::from_secs(5)).await.unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Transfer(_)));
        assert!(auth.last_error().is_none());
    }

    #[tokio::test]
    async fn test_http_client_is_reused_between_exchanges() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/accessToken"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "AQUvlL"
            })))
            .expect(2)
            .mount(&mock_server)
            .await;

        let mut auth = AuthorizationCodeAuthentication::new("id", "secret", "uri")
            .with_config(test_config(&mock_server));
        assert!(auth.http_client.is_none());

        auth.set_authorization_code("first");
        auth.get_access_token(Duration::from_secs(5)).await.unwrap();
        assert!(auth.http_client.is_some());

        auth.set_authorization_code("second");
        let token = auth.get_access_token(Duration::from_secs(5)).await.unwrap();
        assert_eq!(token.access_token(), "AQUvlL");
        assert_eq!(token.expires_in(), None);
        assert!(auth.http_client.is_some());
    }
}
