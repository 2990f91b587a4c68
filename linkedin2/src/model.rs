//! Request payloads for LinkedIn's user generated content (`ugcPosts`) API.

use serde::Serialize;

pub(crate) const LIFECYCLE_PUBLISHED: &str = "PUBLISHED";
pub(crate) const MEDIA_CATEGORY_ARTICLE: &str = "ARTICLE";
pub(crate) const MEDIA_CATEGORY_NONE: &str = "NONE";
pub(crate) const MEDIA_STATUS_READY: &str = "READY";

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UgcPost<'a> {
    pub author: String,
    pub lifecycle_state: &'static str,
    pub specific_content: SpecificContent<'a>,
    pub visibility: Visibility<'a>,
}

#[derive(Serialize, Debug)]
pub(crate) struct SpecificContent<'a> {
    #[serde(rename = "com.linkedin.ugc.ShareContent")]
    pub share_content: ShareContent<'a>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ShareContent<'a> {
    pub share_commentary: Text<'a>,
    pub share_media_category: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub media: Vec<ShareMedia<'a>>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ShareMedia<'a> {
    pub status: &'static str,
    pub original_url: &'a str,
    pub title: Text<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Text<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub thumbnails: Vec<Thumbnail<'a>>,
}

#[derive(Serialize, Debug)]
pub(crate) struct Thumbnail<'a> {
    pub url: &'a str,
}

/// A text field. LinkedIn accepts `null` for an absent title.
#[derive(Serialize, Debug)]
pub(crate) struct Text<'a> {
    pub text: Option<&'a str>,
}

#[derive(Serialize, Debug)]
pub(crate) struct Visibility<'a> {
    #[serde(rename = "com.linkedin.ugc.MemberNetworkVisibility")]
    pub member_network_visibility: &'a str,
}
