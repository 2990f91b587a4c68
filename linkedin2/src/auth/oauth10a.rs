use std::{borrow::Cow, collections::BTreeSet};

use base64::{engine::GeneralPurpose, Engine};
use chrono::Utc;
use hmac::{Hmac, Mac};
use rand::{distributions::Alphanumeric, CryptoRng, Rng};
use reqwest::Url;
use sha1::Sha1;

use crate::{encoding::percent_encode, permission::collect_permissions};

const NONCE_LEN: usize = 64;

/// Uses all four credentials LinkedIn issues to a developer application as part of an
/// [OAuth 1.0a](https://oauth.net/core/1.0a/) flow. This gives instant API access with no
/// redirects or approvals, which is useful for accessing your own data or during development.
///
/// Every request made with this authentication is signed with HMAC-SHA1.
#[derive(Clone, Debug)]
pub struct DeveloperAuthentication {
    consumer_key: Box<str>,
    user_token: Box<str>,
    redirect_uri: Box<str>,
    permissions: Vec<Box<str>>,
    signer: OAuth10a,
}

impl DeveloperAuthentication {
    pub fn new(
        consumer_key: &str,
        consumer_secret: &str,
        user_token: &str,
        user_secret: &str,
        redirect_uri: &str,
    ) -> Self
    {
        Self {
            consumer_key: consumer_key.into(),
            user_token: user_token.into(),
            redirect_uri: redirect_uri.into(),
            permissions: Vec::new(),
            signer: OAuth10a::new(consumer_key, consumer_secret, user_token, user_secret),
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

    pub fn consumer_key(&self) -> &str {
        &self.consumer_key
    }

    pub fn user_token(&self) -> &str {
        &self.user_token
    }

    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    pub fn permissions(&self) -> &[Box<str>] {
        &self.permissions
    }

    pub(crate) fn signer(&self) -> &OAuth10a {
        &self.signer
    }
}

/// The signing half of a set of OAuth 1.0a credentials. The secrets are only kept in the
/// form of the precomputed signing key.
#[derive(Clone)]
pub(crate) struct OAuth10a {
    consumer_key_encoded: Box<str>,
    user_token_encoded: Box<str>,
    signing_key: Box<str>,
}

impl std::fmt::Debug for OAuth10a {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuth10a")
            .field("consumer_key_encoded", &self.consumer_key_encoded)
            .field("user_token_encoded", &self.user_token_encoded)
            .finish_non_exhaustive()
    }
}

impl OAuth10a {
    pub(crate) fn new(
        consumer_key: &str,
        consumer_secret: &str,
        user_token: &str,
        user_secret: &str,
    ) -> Self
    {
        let signing_key = {
            // Percent encode both components of the signing key.
            let consumer_secret_encoded = percent_encode(consumer_secret);
            let user_secret_encoded = percent_encode(user_secret);

            // Join the two components into a single string, separated by an ampersand.
            let cap = consumer_secret_encoded.len() + user_secret_encoded.len() + 1;
            let mut buf = String::with_capacity(cap);
            buf.push_str(&consumer_secret_encoded);
            buf.push('&');
            buf.push_str(&user_secret_encoded);
            buf.into_boxed_str()
        };

        Self {
            consumer_key_encoded: percent_encode(consumer_key).into(),
            user_token_encoded: percent_encode(user_token).into(),
            signing_key,
        }
    }

    /// Builds the value of the `Authorization` header for a request. The signature covers the
    /// query parameters of `url`. Request bodies are sent as JSON rather than
    /// `application/x-www-form-urlencoded`, so their contents are never signed.
    pub(crate) fn auth_header(&self, method: &str, url: &Url) -> String {
        // The nonce is generated using only the characters 0..=9, A..=Z and a..=z, so it is
        // already percent-encoded.
        let nonce = gen_alphanumeric_nonce(&mut rand::thread_rng());
        let timestamp = Utc::now().timestamp();
        let signature = self.signature(method, url, &[], &nonce, timestamp);

        format!(
            r#"OAuth oauth_consumer_key="{}", oauth_nonce="{}", oauth_signature="{}", oauth_signature_method="HMAC-SHA1", oauth_timestamp="{}", oauth_token="{}", oauth_version="1.0""#,
            self.consumer_key_encoded,
            nonce,
            percent_encode(&signature),
            timestamp,
            self.user_token_encoded
        )
    }

    fn parameter_string(
        &self,
        url: &Url,
        body_params: &[(String, String)],
        nonce_encoded: &str,
        timestamp: i64,
    ) -> String
    {
        let mut params = BTreeSet::<(Cow<str>, Cow<str>)>::new();

        params.insert((
            Cow::Borrowed("oauth_consumer_key"),
            Cow::Borrowed(&self.consumer_key_encoded),
        ));
        params.insert((Cow::Borrowed("oauth_nonce"), Cow::Borrowed(nonce_encoded)));
        params.insert((
            Cow::Borrowed("oauth_signature_method"),
            Cow::Borrowed("HMAC-SHA1"),
        ));
        params.insert((
            Cow::Borrowed("oauth_timestamp"),
            Cow::Owned(timestamp.to_string()),
        ));
        params.insert((
            Cow::Borrowed("oauth_token"),
            Cow::Borrowed(&self.user_token_encoded),
        ));
        params.insert((Cow::Borrowed("oauth_version"), Cow::Borrowed("1.0")));

        for (key, val) in url.query_pairs() {
            params.insert((
                Cow::Owned(percent_encode(&key).into_owned()),
                Cow::Owned(percent_encode(&val).into_owned()),
            ));
        }

        for (key, val) in body_params {
            params.insert((percent_encode(key), percent_encode(val)));
        }

        let mut buf = String::new();
        for (key, val) in params {
            if !buf.is_empty() {
                buf.push('&');
            }
            buf.push_str(&key);
            buf.push('=');
            buf.push_str(&val);
        }

        buf
    }

    fn signature_base(
        &self,
        method: &str,
        url: &Url,
        body_params: &[(String, String)],
        nonce_encoded: &str,
        timestamp: i64,
    ) -> String
    {
        let base_url = {
            let mut base_url = url.clone();
            base_url.set_query(None);
            base_url.set_fragment(None);
            base_url
        };
        let base_url_encoded = percent_encode(base_url.as_str());
        let parameter_string = self.parameter_string(url, body_params, nonce_encoded, timestamp);
        let parameter_string_encoded = percent_encode(&parameter_string);

        let cap = method.len() + base_url_encoded.len() + parameter_string_encoded.len() + 2;
        let mut buf = String::with_capacity(cap);
        buf.push_str(method);
        buf.push('&');
        buf.push_str(&base_url_encoded);
        buf.push('&');
        buf.push_str(&parameter_string_encoded);
        buf
    }

    fn signature(
        &self,
        method: &str,
        url: &Url,
        body_params: &[(String, String)],
        nonce_encoded: &str,
        timestamp: i64,
    ) -> String
    {
        const BASE64_ENGINE: GeneralPurpose = base64::engine::general_purpose::STANDARD;

        let base = self.signature_base(method, url, body_params, nonce_encoded, timestamp);

        // Compute `hmac_sha1(signing_key, base)`.
        let signature_bytes = {
            let mut mac = Hmac::<Sha1>::new_from_slice(self.signing_key.as_bytes())
                .expect("HMAC accepts keys of any length");
            mac.update(base.as_bytes());
            mac.finalize().into_bytes()
        };

        BASE64_ENGINE.encode(signature_bytes)
    }
}

fn gen_alphanumeric_nonce<R>(rng: &mut R) -> String
where
    R: Rng + CryptoRng + ?Sized,
{
    rng.sample_iter(Alphanumeric)
        .take(NONCE_LEN)
        .map(char::from)
        .collect()
}
