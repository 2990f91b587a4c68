use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    StatusCode,
};
use serde_json::Value;

use crate::{
    auth::AccessToken,
    client::{AsyncClient, Method},
    encoding::quote,
    endpoint::Endpoint,
    error::{Error, ErrorKind},
    model::{
        ShareContent, ShareMedia, SpecificContent, Text, Thumbnail, UgcPost, Visibility,
        LIFECYCLE_PUBLISHED, MEDIA_CATEGORY_ARTICLE, MEDIA_CATEGORY_NONE, MEDIA_STATUS_READY,
    },
    request_data::Params,
    response::raise_for_error,
    urn::{person_urn, ugc_post_urn},
};

const X_RESTLI_PROTOCOL_VERSION: HeaderName = HeaderName::from_static("x-restli-protocol-version");

/// A post to publish on behalf of a member with [`AsyncClient::submit_share`].
///
/// When a `submitted_url` is given the post is an article share, with `comment` as its
/// commentary and `title` as the article title. Otherwise it is a text-only post whose text is
/// `title`.
#[derive(Clone, Debug)]
pub struct Share {
    urn: Box<str>,
    comment: Option<Box<str>>,
    title: Option<Box<str>>,
    description: Option<Box<str>>,
    submitted_url: Option<Box<str>>,
    submitted_image_url: Option<Box<str>>,
    visibility_code: Box<str>,
}

impl Share {
    /// `urn` is the id of the authoring member, without the `urn:li:person:` prefix.
    #[inline]
    #[must_use]
    pub fn new(urn: &str) -> Self {
        Self {
            urn: urn.into(),
            comment: None,
            title: None,
            description: None,
            submitted_url: None,
            submitted_image_url: None,
            visibility_code: "anyone".into(),
        }
    }

    #[inline]
    #[must_use]
    pub fn comment(self, comment: &str) -> Self {
        Self {
            comment: Some(comment.into()),
            ..self
        }
    }

    #[inline]
    #[must_use]
    pub fn title(self, title: &str) -> Self {
        Self {
            title: Some(title.into()),
            ..self
        }
    }

    /// Only sent for article shares.
    #[inline]
    #[must_use]
    pub fn description(self, description: &str) -> Self {
        Self {
            description: Some(description.into()),
            ..self
        }
    }

    #[inline]
    #[must_use]
    pub fn submitted_url(self, submitted_url: &str) -> Self {
        Self {
            submitted_url: Some(submitted_url.into()),
            ..self
        }
    }

    /// Only sent for article shares, as the article thumbnail.
    #[inline]
    #[must_use]
    pub fn submitted_image_url(self, submitted_image_url: &str) -> Self {
        Self {
            submitted_image_url: Some(submitted_image_url.into()),
            ..self
        }
    }

    #[inline]
    #[must_use]
    pub fn visibility_code(self, visibility_code: &str) -> Self {
        Self {
            visibility_code: visibility_code.into(),
            ..self
        }
    }

    pub(crate) fn to_post(&self) -> UgcPost<'_> {
        let share_content = match self.submitted_url.as_deref() {
            Some(submitted_url) => ShareContent {
                share_commentary: Text {
                    text: Some(self.comment.as_deref().unwrap_or("")),
                },
                share_media_category: MEDIA_CATEGORY_ARTICLE,
                media: vec![ShareMedia {
                    status: MEDIA_STATUS_READY,
                    original_url: submitted_url,
                    title: Text {
                        text: self.title.as_deref(),
                    },
                    description: self
                        .description
                        .as_deref()
                        .map(|description| Text { text: Some(description) }),
                    thumbnails: self
                        .submitted_image_url
                        .as_deref()
                        .map(|url| Thumbnail { url })
                        .into_iter()
                        .collect(),
                }],
            },
            None => ShareContent {
                share_commentary: Text {
                    text: self.title.as_deref(),
                },
                share_media_category: MEDIA_CATEGORY_NONE,
                media: Vec::new(),
            },
        };

        UgcPost {
            author: person_urn(&self.urn),
            lifecycle_state: LIFECYCLE_PUBLISHED,
            specific_content: SpecificContent { share_content },
            visibility: Visibility {
                member_network_visibility: &self.visibility_code,
            },
        }
    }
}

/// The result of [`AsyncClient::submit_share`].
#[derive(Debug)]
pub enum ShareOutcome {
    /// LinkedIn answered `201 Created`. The id of the new post is in the `x-restli-id` header.
    Created(reqwest::Response),
    /// LinkedIn answered with any other status. The body is returned as it was received.
    Rejected { status: StatusCode, body: Box<[u8]> },
}

impl ShareOutcome {
    pub fn is_created(&self) -> bool {
        matches!(self, ShareOutcome::Created(_))
    }
}

fn restli_headers(token: &AccessToken) -> Result<HeaderMap, Error> {
    let mut headers = HeaderMap::new();
    headers.insert(X_RESTLI_PROTOCOL_VERSION, HeaderValue::from_static("2.0.0"));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(AUTHORIZATION, token.bearer_header()?);
    Ok(headers)
}

impl AsyncClient {
    /// Publishes a post. This authenticates with the OAuth 2.0 access token as a bearer token,
    /// so it needs authorization code authentication.
    ///
    /// A non-201 answer from LinkedIn is not an error: it is returned as
    /// [`ShareOutcome::Rejected`] with the raw body. Errors are only returned when the request
    /// could not be made at all.
    pub async fn submit_share(&self, share: &Share) -> Result<ShareOutcome, Error> {
        let headers = restli_headers(self.authentication().access_token()?)?;
        let url = Endpoint::Posts.url(&self.config().api_base_url);

        log::debug!("POST {}", url);

        let response = self
            .http_client()
            .post(url)
            .headers(headers)
            .json(&share.to_post())
            .timeout(self.config().timeout)
            .send()
            .await
            .map_err(|err| ErrorKind::Transfer(err).boxed())?;

        let status = response.status();
        if status == StatusCode::CREATED {
            return Ok(ShareOutcome::Created(response));
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| ErrorKind::Transfer(err).boxed())?;

        log::warn!("LinkedIn did not create the post: {}", status);

        Ok(ShareOutcome::Rejected {
            status,
            body: body.to_vec().into_boxed_slice(),
        })
    }

    /// Deletes a UGC post, given the numeric part of its `urn:li:ugcPost:` URN.
    pub async fn delete_post(&self, post_id: &str) -> Result<(), Error> {
        let headers = restli_headers(self.authentication().access_token()?)?;
        let url = format!(
            "{}/{}",
            Endpoint::Posts.url(&self.config().api_base_url),
            quote(&ugc_post_urn(post_id))
        );

        let response = self
            .make_request(
                Method::Delete,
                &url,
                (),
                None,
                Some(headers),
                self.config().timeout,
            )
            .await?;

        raise_for_error(response).await?;
        Ok(())
    }

    /// Lists the posts authored by a member, most recently modified first. `urn` is the member
    /// id, without the `urn:li:person:` prefix.
    pub async fn get_posts(&self, urn: &str) -> Result<Value, Error> {
        let headers = restli_headers(self.authentication().access_token()?)?;
        let url = Endpoint::Posts.url(&self.config().api_base_url);

        let mut params = Params::new();
        params.insert("q".to_owned(), "author".to_owned());
        params.insert("authors".to_owned(), format!("List({})", person_urn(urn)));
        params.insert("sortBy".to_owned(), "LAST_MODIFIED".to_owned());

        self.json_request(Method::Get, &url, (), Some(&mut params), Some(headers))
            .await
    }
}
