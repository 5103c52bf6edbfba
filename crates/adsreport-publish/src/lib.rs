//! Create-or-update publishing of rendered documents to a GitHub repository
//! served as a static site.

pub mod client;
pub mod error;

pub use client::{GithubPublisher, PublishReceipt, DEFAULT_BASE_URL};
pub use error::PublishError;

/// Path of the landing page at the site root.
pub const INDEX_PATH: &str = "index.html";

pub const INDEX_COMMIT_MESSAGE: &str = "Update index with new reports";

/// `acme-jan4-10` → `acme-jan4-10/index.html`.
#[must_use]
pub fn report_path(folder: &str) -> String {
    format!("{folder}/{INDEX_PATH}")
}

#[must_use]
pub fn report_commit_message(folder: &str) -> String {
    format!("Update {folder} report")
}
