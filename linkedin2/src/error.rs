use std::{error, fmt};

use crate::response::ApiError;

#[derive(Debug)]
pub struct Error {
    repr: Box<ErrorKind>,
}

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        &self.repr
    }

    /// Returns the error reported by LinkedIn, if the request reached the API and was answered
    /// with a non-success status.
    pub fn api_error(&self) -> Option<&ApiError> {
        match &*self.repr {
            ErrorKind::ErrorResponse(api_error) => Some(api_error),
            _ => None,
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        kind.boxed()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.repr, f)
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match &*self.repr {
            ErrorKind::Transfer(err) => Some(err),
            ErrorKind::InvalidResponse(err) => Some(err),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub enum ErrorKind {
    /// The authorization code exchange was attempted before an authorization code was set.
    MissingAuthorizationCode,
    /// The request needs an OAuth 2.0 access token, but the client does not have one.
    MissingAccessToken,
    /// A token or credential could not be used as an HTTP header value.
    BadHeader,
    Transfer(reqwest::Error),
    InvalidResponse(serde_json::Error),
    ErrorResponse(ApiError),
    UnexpectedResponse(&'static str),
}

impl ErrorKind {
    pub(crate) fn boxed(self) -> Error {
        Error { repr: Box::new(self) }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::MissingAuthorizationCode => {
                f.write_str("you must first get the authorization code")
            }
            ErrorKind::MissingAccessToken => f.write_str("no access token available"),
            ErrorKind::BadHeader => f.write_str("invalid characters in authorization header"),
            ErrorKind::Transfer(err) => write!(f, "http transfer failed: {}", err),
            ErrorKind::InvalidResponse(err) => write!(f, "invalid json in response: {}", err),
            ErrorKind::ErrorResponse(api_error) => fmt::Display::fmt(api_error, f),
            ErrorKind::UnexpectedResponse(what) => write!(f, "unexpected response: {}", what),
        }
    }
}
