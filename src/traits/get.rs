//! Get trait for fetching single entities.

use async_trait::async_trait;

use crate::client::FossologyClient;
use crate::error::Result;

/// Fetch a single entity by ID.
///
/// Implement this trait for entity types that can be fetched individually
/// by a numeric identifier. The request is scoped to the client's group.
///
/// # Example
///
/// ```ignore
/// use fossology::{FossologyClient, Upload, Get};
///
/// let client = FossologyClient::from_env()?;
/// let upload = Upload::get(&client, 42).await?;
/// ```
#[async_trait]
pub trait Get: Sized {
    /// The ID type for this entity.
    type Id;

    /// Fetch the entity by ID.
    ///
    /// # Arguments
    ///
    /// * `client` - The FOSSology API client
    /// * `id` - The entity identifier
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not accessible or the request fails.
    async fn get(client: &FossologyClient, id: Self::Id) -> Result<Self>;
}
