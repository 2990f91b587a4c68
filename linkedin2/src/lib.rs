pub mod auth;
pub mod client;
pub mod config;
mod encoding;
pub mod endpoint;
pub mod error;
mod model;
pub mod permission;
pub mod request_data;
pub mod response;
pub mod selector;
pub mod share;
pub mod urn;

pub use auth::{AccessToken, Authentication, AuthorizationCodeAuthentication, DeveloperAuthentication};
pub use client::{AsyncClient, Method};
pub use config::Config;
pub use endpoint::{Endpoint, NetworkUpdate};
pub use error::{Error, ErrorKind};
pub use permission::Permission;
pub use selector::Selector;
pub use share::{Share, ShareOutcome};
