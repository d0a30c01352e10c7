//! In-memory implementation of ProductRepository, for tests and local runs

use async_trait::async_trait;
use std::cmp::Ordering;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::instrument;

use crate::error::ProductResult;
use crate::models::Product;
use crate::query::{ProductFilter, QueryPlan, SortOrder};
use crate::repository::ProductRepository;

/// Vector-backed repository with the same filter, order and window semantics
/// as the MongoDB one
#[derive(Clone, Default)]
pub struct InMemoryProductRepository {
    products: Arc<RwLock<Vec<Product>>>,
}

impl InMemoryProductRepository {
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products: Arc::new(RwLock::new(products)),
        }
    }

    pub async fn insert(&self, product: Product) {
        self.products.write().await.push(product);
    }

    pub async fn len(&self) -> usize {
        self.products.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.products.read().await.is_empty()
    }
}

fn compare(order: SortOrder, a: &Product, b: &Product) -> Ordering {
    let newest_first = b.created_at.cmp(&a.created_at);
    match order {
        SortOrder::PriceAscending => a.price.total_cmp(&b.price).then(newest_first),
        SortOrder::PriceDescending => b.price.total_cmp(&a.price).then(newest_first),
        SortOrder::NewestFirst => newest_first,
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    #[instrument(skip(self))]
    async fn find(&self, plan: &QueryPlan) -> ProductResult<Vec<Product>> {
        let products = self.products.read().await;

        let mut matching: Vec<Product> = products
            .iter()
            .filter(|p| plan.filter.matches(p))
            .cloned()
            .collect();
        matching.sort_by(|a, b| compare(plan.order, a, b));

        let skip = usize::try_from(plan.skip).unwrap_or(usize::MAX);
        let limit = usize::try_from(plan.limit).unwrap_or(usize::MAX);

        Ok(matching.into_iter().skip(skip).take(limit).collect())
    }

    #[instrument(skip(self))]
    async fn count(&self, filter: &ProductFilter) -> ProductResult<u64> {
        let products = self.products.read().await;
        Ok(products.iter().filter(|p| filter.matches(p)).count() as u64)
    }
}
