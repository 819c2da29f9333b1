//! Home screen catalog feed.
//!
//! Loads the featured listing, the popular listing, and the category titles
//! concurrently. The three calls are independent: a failure in one leaves
//! that section empty and does not cancel the others.

use tracing::info;

use crate::client::StoreClient;
use crate::transport::Transport;
use crate::types::Product;

pub const FEATURED_CATEGORY: u32 = 1;
pub const POPULAR_CATEGORY: u32 = 2;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HomeFeed {
    pub featured: Vec<Product>,
    pub popular: Vec<Product>,
    pub categories: Vec<String>,
}

impl HomeFeed {
    pub async fn load<T: Transport>(client: &StoreClient<T>) -> Self {
        let (featured, popular, categories) = tokio::join!(
            client.get_products(Some(FEATURED_CATEGORY)),
            client.get_products(Some(POPULAR_CATEGORY)),
            client.get_categories(),
        );
        let feed = Self {
            featured: featured.success_or_default().products,
            popular: popular.success_or_default().products,
            categories: categories.success_or_default().titles(),
        };
        info!(
            featured = feed.featured.len(),
            popular = feed.popular.len(),
            categories = feed.categories.len(),
            "home feed loaded"
        );
        feed
    }

    /// True when every section has at least one entry.
    pub fn is_complete(&self) -> bool {
        !self.featured.is_empty() && !self.popular.is_empty() && !self.categories.is_empty()
    }
}
