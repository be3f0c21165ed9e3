//! List trait for fetching collections of entities.

use async_trait::async_trait;

use crate::client::FossologyClient;
use crate::error::Result;
use crate::pagination::Page;

/// Default page size for list operations.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Maximum pages to fetch (safety limit).
const MAX_PAGES: u32 = 1000;

/// List/filter entities with pagination support.
///
/// # Example
///
/// ```ignore
/// use fossology::{FossologyClient, Upload, List};
///
/// let client = FossologyClient::from_env()?;
///
/// // Fetch a single page
/// let page = Upload::list_page(&client, &Default::default(), 1, 50).await?;
///
/// // Fetch all pages
/// let all_uploads = Upload::list_all(&client, &Default::default()).await?;
/// ```
#[async_trait]
pub trait List: Sized + Send {
    /// Query parameters for filtering.
    type Query: Default + Send + Sync;

    /// List entities matching the query (single page).
    ///
    /// # Arguments
    ///
    /// * `client` - The FOSSology API client
    /// * `query` - Query parameters for filtering
    /// * `page` - Page number (1-indexed)
    /// * `count` - Number of items per page
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    async fn list_page(
        client: &FossologyClient,
        query: &Self::Query,
        page: u32,
        count: u32,
    ) -> Result<Page<Self>>;

    /// List all entities matching the query (fetches all pages).
    ///
    /// # Errors
    ///
    /// Returns an error if any page request fails.
    async fn list_all(client: &FossologyClient, query: &Self::Query) -> Result<Vec<Self>> {
        let mut all_items = Vec::new();
        let mut page = 1;

        loop {
            let result = Self::list_page(client, query, page, DEFAULT_PAGE_SIZE).await?;
            let items_count = result.items.len();
            all_items.extend(result.items);

            if !result.has_more || items_count == 0 {
                break;
            }
            page += 1;

            // Safety limit to prevent infinite loops
            if page > MAX_PAGES {
                tracing::warn!(
                    "Reached pagination limit of {} pages, stopping",
                    MAX_PAGES
                );
                break;
            }
        }

        Ok(all_items)
    }
}
