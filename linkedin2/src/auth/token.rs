use reqwest::header::HeaderValue;
use serde::Deserialize;

use crate::error::{Error, ErrorKind};

/// An OAuth 2.0 access token, either obtained by exchanging an authorization code or supplied
/// directly.
///
/// For more information about LinkedIn access tokens, see the
/// [LinkedIn documentation](https://learn.microsoft.com/en-us/linkedin/shared/authentication/authorization-code-flow).
#[derive(Clone, Debug)]
pub struct AccessToken {
    access_token: Box<str>,
    expires_in: Option<u64>,
    auth_header: Box<str>,
}

impl AccessToken {
    /// Returns a new `AccessToken`. `expires_in` is the lifetime of the token in seconds, if
    /// known.
    pub fn new<S>(token: S, expires_in: Option<u64>) -> Self
    where
        S: AsRef<str>,
    {
        let access_token = token.as_ref();

        // Create the Authorization header ahead-of-time, since it will be the same for every
        // request using this `AccessToken`.
        let auth_header = {
            const PREFIX: &str = "Bearer ";
            let mut buf = String::with_capacity(PREFIX.len() + access_token.len());
            buf.push_str(PREFIX);
            buf.push_str(access_token);
            buf.into_boxed_str()
        };

        Self {
            access_token: access_token.into(),
            expires_in,
            auth_header,
        }
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// The number of seconds the token was valid for when it was issued.
    pub fn expires_in(&self) -> Option<u64> {
        self.expires_in
    }

    pub(crate) fn bearer_header(&self) -> Result<HeaderValue, Error> {
        let mut header = HeaderValue::from_str(&self.auth_header)
            .map_err(|_| ErrorKind::BadHeader.boxed())?;
        header.set_sensitive(true);
        Ok(header)
    }
}

/// The body of a successful response from the `accessToken` endpoint.
#[derive(Deserialize, Debug)]
pub(crate) struct TokenResponse {
    pub access_token: Box<str>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

impl From<TokenResponse> for AccessToken {
    fn from(response: TokenResponse) -> Self {
        AccessToken::new(response.access_token, response.expires_in)
    }
}
