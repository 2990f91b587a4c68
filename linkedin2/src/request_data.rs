use std::{borrow::Cow, collections::BTreeMap};

use reqwest::{RequestBuilder, header::{CONTENT_TYPE, HeaderValue}};
use serde::Serialize;

use crate::encoding::percent_encode;

/// Query parameters for a request. The client adds its own entries to this map (for example
/// the OAuth 2.0 access token), so a map passed to a request is not left unchanged.
pub type Params = BTreeMap<String, String>;

/// The body of a request.
pub trait RequestData {
    fn build_http_request(self, builder: RequestBuilder) -> reqwest::Result<reqwest::Request>;
}

impl RequestData for () {
    fn build_http_request(self, builder: RequestBuilder) -> reqwest::Result<reqwest::Request> {
        builder.build()
    }
}

pub struct FormData<'a> {
    params: &'a [(Cow<'a, str>, Cow<'a, str>)],
}

impl<'a> FormData<'a> {
    pub fn new(params: &'a [(Cow<'a, str>, Cow<'a, str>)]) -> Self {
        Self { params }
    }

    fn encode(&self) -> String {
        let mut buf = String::new();
        for (key, val) in self.params {
            if !buf.is_empty() {
                buf.push('&');
            }
            buf.push_str(&percent_encode(key.as_ref()));
            buf.push('=');
            buf.push_str(&percent_encode(val.as_ref()));
        }
        buf
    }
}

impl<'a> RequestData for FormData<'a> {
    fn build_http_request(self, builder: RequestBuilder) -> reqwest::Result<reqwest::Request> {
        builder
            .header(
                CONTENT_TYPE,
                HeaderValue::from_static("application/x-www-form-urlencoded"),
            )
            .body(self.encode())
            .build()
    }
}

pub struct JsonData<'a, B: ?Sized> {
    json_body: &'a B,
}

impl<'a, B: ?Sized> JsonData<'a, B> {
    pub fn new(json_body: &'a B) -> Self {
        Self { json_body }
    }
}

impl<'a, B> RequestData for JsonData<'a, B>
where
    B: Serialize + ?Sized,
{
    fn build_http_request(self, builder: RequestBuilder) -> reqwest::Result<reqwest::Request> {
        builder.json(self.json_body).build()
    }
}
