use std::time::Duration;

use enumscribe::ScribeStaticStr;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::Value;

use crate::{
    auth::Authentication,
    config::Config,
    endpoint::Endpoint,
    error::{Error, ErrorKind},
    request_data::{Params, RequestData},
    response::{decode_json, raise_for_error, Paging},
    selector::Selector,
};

const X_LI_FORMAT: HeaderName = HeaderName::from_static("x-li-format");
const OAUTH2_ACCESS_TOKEN: &str = "oauth2_access_token";
const NUM_CONNECTIONS: &str = "num-connections";

#[derive(Clone, Debug)]
pub struct AsyncClient {
    http_client: reqwest::Client,
    authentication: Authentication,
    config: Config,
}

impl AsyncClient {
    /// Creates a client. `auth` may be a full authentication strategy, an [`AccessToken`] or a
    /// bare access token string.
    ///
    /// [`AccessToken`]: crate::auth::AccessToken
    pub fn new<A>(auth: A, config: Config) -> Result<Self, reqwest::Error>
    where
        A: Into<Authentication>,
    {
        let http_client = config.http_client()?;

        Ok(Self {
            http_client,
            authentication: auth.into(),
            config,
        })
    }

    pub fn authentication(&self) -> &Authentication {
        &self.authentication
    }

    pub fn authentication_mut(&mut self) -> &mut Authentication {
        &mut self.authentication
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub(crate) fn http_client(&self) -> &reqwest::Client {
        &self.http_client
    }

    /// Sends a request authorized with the client's authentication and returns the raw
    /// response, without checking its status.
    ///
    /// The `x-li-format: json` and `Content-Type: application/json` headers are always sent,
    /// replacing any values given for them in `headers`. With OAuth 2.0 authentication the
    /// access token is inserted into `params` as `oauth2_access_token`, so the caller's map
    /// is modified.
    pub async fn make_request<D>(
        &self,
        method: Method,
        url: &str,
        data: D,
        params: Option<&mut Params>,
        headers: Option<HeaderMap>,
        timeout: Duration,
    ) -> Result<reqwest::Response, Error>
    where
        D: RequestData,
    {
        let mut headers = headers.unwrap_or_default();
        headers.insert(X_LI_FORMAT, HeaderValue::from_static("json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut own_params = Params::new();
        let params = params.unwrap_or(&mut own_params);

        if let Authentication::AuthorizationCode(auth) = &self.authentication {
            let token = auth
                .token()
                .ok_or_else(|| ErrorKind::MissingAccessToken.boxed())?;
            params.insert(OAUTH2_ACCESS_TOKEN.to_owned(), token.access_token().to_owned());
        }

        let mut request = {
            let builder = self
                .http_client
                .request(method.to_reqwest_method(), url)
                .query(&*params)
                .timeout(timeout);

            data.build_http_request(builder)
                .map_err(|err| ErrorKind::Transfer(err).boxed())?
        };

        // Replaces any header of the same name set by the request body.
        request.headers_mut().extend(headers);

        if let Authentication::Developer(auth) = &self.authentication {
            let auth_string = auth.signer().auth_header(method.as_str(), request.url());
            let mut auth_header = HeaderValue::from_str(&auth_string)
                .map_err(|_| ErrorKind::BadHeader.boxed())?;
            auth_header.set_sensitive(true);
            request.headers_mut().insert(AUTHORIZATION, auth_header);
        }

        log::debug!("{} {}", method.as_str(), url);

        self.http_client
            .execute(request)
            .await
            .map_err(|err| ErrorKind::Transfer(err).boxed())
    }

    pub(crate) async fn json_request<D, T>(
        &self,
        method: Method,
        url: &str,
        data: D,
        params: Option<&mut Params>,
        headers: Option<HeaderMap>,
    ) -> Result<T, Error>
    where
        D: RequestData,
        T: for<'de> Deserialize<'de>,
    {
        let response = self
            .make_request(method, url, data, params, headers, self.config.timeout)
            .await?;
        let response = raise_for_error(response).await?;
        decode_json(response).await
    }

    /// Returns the first page of the authenticated member's connections. With `totals_only`,
    /// no connections are returned and only `paging.total` is useful.
    pub async fn get_connections(
        &self,
        totals_only: bool,
        params: Option<&mut Params>,
        headers: Option<HeaderMap>,
    ) -> Result<Value, Error>
    {
        let count = if totals_only { "0" } else { "50" };
        let url = format!(
            "{}?q=viewer&start=0&count={}",
            Endpoint::Connections.url(&self.config.api_base_url),
            count
        );

        self.json_request(Method::Get, &url, (), params, headers).await
    }

    /// Returns the authenticated member's profile, with a `numConnections` field added to it.
    ///
    /// If `selectors` contains `num-connections`, the connection count is fetched first with
    /// [`get_connections`](Self::get_connections). Otherwise `numConnections` is 0.
    ///
    /// The v2 profile endpoint only serves the authenticated member, so `member_id` and
    /// `member_url` are not supported and are ignored. Selectors other than
    /// `num-connections` are not applied either.
    pub async fn get_profile(
        &self,
        member_id: Option<&str>,
        member_url: Option<&str>,
        selectors: Option<&Selector>,
        params: Option<&mut Params>,
        headers: Option<HeaderMap>,
    ) -> Result<Value, Error>
    {
        if member_id.is_some() || member_url.is_some() {
            log::warn!(
                "member_id and member_url are not supported by the v2 profile endpoint; \
                 returning the authenticated member's profile"
            );
        }

        let mut connections = 0;
        if selectors.map_or(false, |selectors| selectors.contains(NUM_CONNECTIONS)) {
            let response = self.get_connections(true, None, None).await?;
            if let Some(paging) = response.get("paging") {
                connections = Paging::deserialize(paging)
                    .map_err(|err| ErrorKind::InvalidResponse(err).boxed())?
                    .total;
            }
        }

        let url = self.config.api_url("me");
        let mut profile: Value = self
            .json_request(Method::Get, &url, (), params, headers)
            .await?;

        profile
            .as_object_mut()
            .ok_or_else(|| ErrorKind::UnexpectedResponse("profile is not a JSON object").boxed())?
            .insert("numConnections".to_owned(), Value::from(connections));

        Ok(profile)
    }
}

#[derive(ScribeStaticStr, Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Method {
    #[enumscribe(str = "GET")]
    Get,
    #[enumscribe(str = "POST")]
    Post,
    #[enumscribe(str = "PUT")]
    Put,
    #[enumscribe(str = "DELETE")]
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        self.scribe()
    }

    fn to_reqwest_method(self) -> reqwest::Method {
        match self {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use reqwest::{
        header::{HeaderMap, HeaderValue, CONTENT_TYPE},
        StatusCode,
    };
    use serde_json::json;
    use wiremock::{
        matchers::{body_json, header, header_exists, method, path, query_param},
        Mock, MockServer, Request, ResponseTemplate,
    };

    use super::{AsyncClient, Method};
    use crate::{
        auth::DeveloperAuthentication,
        config::Config,
        error::ErrorKind,
        request_data::{JsonData, Params},
        selector::Selector,
    };

    fn test_config(mock_server: &MockServer) -> Config {
        Config {
            api_base_url: mock_server.uri(),
            auth_base_url: mock_server.uri(),
            https_only: false,
            ..Default::default()
        }
    }

    fn test_client(mock_server: &MockServer) -> AsyncClient {
        AsyncClient::new("test_token", test_config(mock_server)).unwrap()
    }

    fn has_no_access_token_param(request: &Request) -> bool {
        !request
            .url
            .query_pairs()
            .any(|(key, _)| key == "oauth2_access_token")
    }

    #[tokio::test]
    async fn test_get_connections_totals_only() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/connections"))
            .and(query_param("q", "viewer"))
            .and(query_param("start", "0"))
            .and(query_param("count", "0"))
            .and(query_param("oauth2_access_token", "test_token"))
            .and(header("x-li-format", "json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "paging": {"start": 0, "count": 0, "total": 17},
                "elements": []
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server);
        let connections = client.get_connections(true, None, None).await.unwrap();
        assert_eq!(connections["paging"]["total"], 17);
    }

    #[tokio::test]
    async fn test_get_connections_default_count() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/connections"))
            .and(query_param("start", "0"))
            .and(query_param("count", "50"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"elements": []})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server);
        client.get_connections(false, None, None).await.unwrap();
    }

    #[tokio::test]
    async fn test_error_response_is_normalized() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/connections"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "serviceErrorCode": 65600,
                "message": "Invalid access token",
                "status": 401
            })))
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server);
        let err = client.get_connections(false, None, None).await.unwrap_err();

        let api_error = err.api_error().unwrap();
        assert_eq!(api_error.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(api_error.message(), "Invalid access token");
        assert_eq!(api_error.service_error_code(), Some(65600));
    }

    #[tokio::test]
    async fn test_get_profile_injects_connection_count() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/connections"))
            .and(query_param("count", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "paging": {"start": 0, "count": 0, "total": 42}
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/me"))
            .and(query_param("oauth2_access_token", "test_token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "yrZCpj2Z12",
                "localizedFirstName": "Ada"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server);
        let selectors = Selector::fields(["id", "num-connections"]);
        let profile = client
            .get_profile(None, None, Some(&selectors), None, None)
            .await
            .unwrap();

        assert_eq!(profile["id"], "yrZCpj2Z12");
        assert_eq!(profile["numConnections"], 42);

        let paths: Vec<String> = mock_server
            .received_requests()
            .await
            .unwrap()
            .iter()
            .map(|request| request.url.path().to_owned())
            .collect();
        assert_eq!(paths, ["/connections", "/me"]);
    }

    #[tokio::test]
    async fn test_get_profile_without_paging_defaults_to_zero() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/connections"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"elements": []})))
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/me"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "abc"})))
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server);
        let selectors = Selector::nested([("num-connections", Selector::field("total"))]);
        let profile = client
            .get_profile(None, None, Some(&selectors), None, None)
            .await
            .unwrap();

        assert_eq!(profile["numConnections"], 0);
    }

    #[tokio::test]
    async fn test_get_profile_skips_connections_without_selector() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/connections"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(0)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/me"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "abc"})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server);
        let profile = client
            .get_profile(Some("someone-else"), None, None, None, None)
            .await
            .unwrap();

        assert_eq!(profile["id"], "abc");
        assert_eq!(profile["numConnections"], 0);
    }

    #[tokio::test]
    async fn test_make_request_adds_token_to_caller_params() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/me"))
            .and(query_param("projection", "(id)"))
            .and(query_param("oauth2_access_token", "test_token"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server);
        let mut params = Params::new();
        params.insert("projection".to_owned(), "(id)".to_owned());

        let response = client
            .make_request(
                Method::Get,
                &format!("{}/me", mock_server.uri()),
                (),
                Some(&mut params),
                None,
                Duration::from_secs(5),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            params.get("oauth2_access_token").map(String::as_str),
            Some("test_token")
        );
    }

    #[tokio::test]
    async fn test_make_request_mandatory_headers_win() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/me"))
            .and(header("content-type", "application/json"))
            .and(header("x-li-format", "json"))
            .and(header("x-custom", "kept"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server);
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        headers.insert("x-custom", HeaderValue::from_static("kept"));

        let response = client
            .make_request(
                Method::Get,
                &format!("{}/me", mock_server.uri()),
                (),
                None,
                Some(headers),
                Duration::from_secs(5),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_make_request_json_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/shares"))
            .and(query_param("oauth2_access_token", "test_token"))
            .and(body_json(json!({"comment": "hello"})))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server);
        let body = json!({"comment": "hello"});
        let response = client
            .make_request(
                Method::Post,
                &format!("{}/shares", mock_server.uri()),
                JsonData::new(&body),
                None,
                None,
                Duration::from_secs(5),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_make_request_returns_raw_error_response() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/me"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&mock_server)
            .await;

        let client = test_client(&mock_server);
        let response = client
            .make_request(
                Method::Get,
                &format!("{}/me", mock_server.uri()),
                (),
                None,
                None,
                Duration::from_secs(5),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_developer_authentication_signs_requests() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/connections"))
            .and(header_exists("authorization"))
            .and(has_no_access_token_param)
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"elements": []})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let auth = DeveloperAuthentication::new(
            "consumer_key",
            "consumer_secret",
            "user_token",
            "user_secret",
            "http://localhost/cb",
        );
        let client = AsyncClient::new(auth, test_config(&mock_server)).unwrap();
        client.get_connections(false, None, None).await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_token_fails_before_sending() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let auth = crate::auth::AuthorizationCodeAuthentication::new("id", "secret", "uri");
        let client = AsyncClient::new(auth, test_config(&mock_server)).unwrap();
        let err = client.get_connections(false, None, None).await.unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::MissingAccessToken));
    }
}
