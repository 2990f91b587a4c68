pub mod authorization_code;
pub mod oauth10a;
pub mod token;

pub use authorization_code::AuthorizationCodeAuthentication;
pub use oauth10a::DeveloperAuthentication;
pub use token::AccessToken;

use crate::error::{Error, ErrorKind};

/// The credentials a client authenticates its requests with. Exactly one strategy is active
/// per client, and it decides how requests are authorized:
///
/// - [`Developer`](Self::Developer) requests carry an OAuth 1.0a signed `Authorization` header.
/// - [`AuthorizationCode`](Self::AuthorizationCode) requests carry the OAuth 2.0 access token
///   in the `oauth2_access_token` query parameter.
///
/// A bare access token converts into an `AuthorizationCode` authentication with empty
/// application credentials.
#[derive(Clone, Debug)]
pub enum Authentication {
    Developer(DeveloperAuthentication),
    AuthorizationCode(AuthorizationCodeAuthentication),
}

impl Authentication {
    /// Returns the OAuth 2.0 access token, which the share endpoints send as a bearer token.
    pub fn access_token(&self) -> Result<&AccessToken, Error> {
        match self {
            Authentication::AuthorizationCode(auth) => auth
                .token()
                .ok_or_else(|| ErrorKind::MissingAccessToken.boxed()),
            Authentication::Developer(_) => Err(ErrorKind::MissingAccessToken.boxed()),
        }
    }

    pub fn as_authorization_code_mut(&mut self) -> Option<&mut AuthorizationCodeAuthentication> {
        match self {
            Authentication::AuthorizationCode(auth) => Some(auth),
            Authentication::Developer(_) => None,
        }
    }
}

impl From<DeveloperAuthentication> for Authentication {
    fn from(auth: DeveloperAuthentication) -> Self {
        Authentication::Developer(auth)
    }
}

impl From<AuthorizationCodeAuthentication> for Authentication {
    fn from(auth: AuthorizationCodeAuthentication) -> Self {
        Authentication::AuthorizationCode(auth)
    }
}

impl From<AccessToken> for Authentication {
    fn from(token: AccessToken) -> Self {
        Authentication::AuthorizationCode(AuthorizationCodeAuthentication::from_token(token))
    }
}

impl From<&str> for Authentication {
    fn from(token: &str) -> Self {
        AccessToken::new(token, None).into()
    }
}

impl From<String> for Authentication {
    fn from(token: String) -> Self {
        AccessToken::new(token, None).into()
    }
}
