use std::fmt;

use reqwest::StatusCode;
use serde::Deserialize;

use crate::error::{Error, ErrorKind};

/// An error reported by the LinkedIn API in response to a request.
#[derive(Clone, Debug)]
pub struct ApiError {
    status: StatusCode,
    message: Box<str>,
    service_error_code: Option<u64>,
}

impl ApiError {
    pub(crate) fn from_body(status: StatusCode, body: &[u8]) -> Self {
        match serde_json::from_slice::<ErrorBody>(body) {
            Ok(ErrorBody { message: Some(message), service_error_code }) => Self {
                status,
                message,
                service_error_code,
            },
            _ => Self {
                status,
                message: String::from_utf8_lossy(body).into(),
                service_error_code: None,
            },
        }
    }

    /// The HTTP status code of the response.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The message LinkedIn gave for the error. If the response body was not a LinkedIn error
    /// object, this is the raw body.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn service_error_code(&self) -> Option<u64> {
        self.service_error_code
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.status.as_u16(), self.message)
    }
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    message: Option<Box<str>>,
    service_error_code: Option<u64>,
}

/// Passes successful responses through unchanged, and turns any non-2XX response into an
/// [`ErrorKind::ErrorResponse`] carrying the status and the provider's message.
pub async fn raise_for_error(response: reqwest::Response) -> Result<reqwest::Response, Error> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .bytes()
        .await
        .map_err(|err| ErrorKind::Transfer(err).boxed())?;

    let api_error = ApiError::from_body(status, &body);
    log::debug!("LinkedIn returned an error: {}", api_error);
    Err(ErrorKind::ErrorResponse(api_error).boxed())
}

pub(crate) async fn decode_json<T>(response: reqwest::Response) -> Result<T, Error>
where
    T: for<'de> Deserialize<'de>,
{
    let body = response
        .bytes()
        .await
        .map_err(|err| ErrorKind::Transfer(err).boxed())?;

    serde_json::from_slice::<T>(&body).map_err(|err| ErrorKind::InvalidResponse(err).boxed())
}

/// The `paging` block of a LinkedIn collection response.
#[derive(Deserialize, Default, Clone, Copy, Debug)]
pub struct Paging {
    #[serde(default)]
    pub start: u64,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub total: u64,
}
