//! Site access: authenticated HTTP session and document extraction.
//!
//! # Modules
//!
//! - `client` - HTTP client performing the login handshake and feed requests
//! - `extract` - extraction of team links and activity items from documents

mod client;
mod extract;

pub use crate::scrape::client::{Credentials, Requester, SiteClient};
pub use crate::scrape::extract::{DocumentExtractor, HtmlExtractor};

#[cfg(test)]
pub use crate::scrape::client::MockRequester;
#[cfg(test)]
pub use crate::scrape::extract::MockDocumentExtractor;
