//! Builders for the URNs LinkedIn uses to refer to members and posts.

pub fn person_urn(id: &str) -> String {
    format!("urn:li:person:{}", id)
}

pub fn ugc_post_urn(id: &str) -> String {
    format!("urn:li:ugcPost:{}", id)
}
