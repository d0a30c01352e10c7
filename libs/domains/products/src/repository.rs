use async_trait::async_trait;

use crate::error::ProductResult;
use crate::models::Product;
use crate::query::{ProductFilter, QueryPlan};

/// Repository trait for Product persistence
///
/// Implementations translate a [`QueryPlan`] into their backend's query
/// language. `find` and `count` may be called concurrently for one listing and
/// are not required to observe the same snapshot.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// One page of products matching `plan.filter`, ordered by `plan.order`
    async fn find(&self, plan: &QueryPlan) -> ProductResult<Vec<Product>>;

    /// Number of products matching a filter
    async fn count(&self, filter: &ProductFilter) -> ProductResult<u64>;
}
