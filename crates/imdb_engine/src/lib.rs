//! IMDb engine: outbound fetches, embedded page data, and the scraping service.
mod client;
mod error;
mod fetch;
mod page;
mod types;

pub use client::{ClientSettings, ImdbClient};
pub use error::ScrapeError;
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher};
pub use page::{decode_body, next_data, PageError, NEXT_DATA_SELECTOR};
pub use types::{FailureKind, FetchError, FetchOutput};
