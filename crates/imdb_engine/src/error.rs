use imdb_core::ExtractError;

use crate::{FetchError, PageError};

/// Everything that can stop a search or detail request.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("Request failed: {0}")]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Page(#[from] PageError),
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error("cannot build upstream url from {base}: {message}")]
    InvalidUrl { base: String, message: String },
}
