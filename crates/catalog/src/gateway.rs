//! The catalog gateway abstraction.
//!
//! The recommendation core never talks to a metadata API directly; it goes
//! through this trait so the remote client, caching and retries can live
//! outside of it.

use crate::error::Result;
use crate::types::{ItemDetails, MediaId, MediaType, SearchPage};

/// Read-only access to a movie/series catalog
///
/// Implementations may retry or cache internally. From the caller's point of
/// view every call resolves to a page (possibly empty) or an error.
#[async_trait::async_trait]
pub trait CatalogGateway: Send + Sync {
    /// Search titles of one media type by free-text query
    ///
    /// `page` is 1-based. Asking past `total_pages` yields an empty page.
    async fn search_titles(&self, query: &str, media_type: MediaType, page: u32)
    -> Result<SearchPage>;

    /// Fetch detail information for a single item
    async fn get_details(&self, id: MediaId, media_type: MediaType) -> Result<ItemDetails>;

    /// Gateway name for logging and debugging
    fn name(&self) -> &str;
}
