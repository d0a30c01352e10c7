//! Product Service - Business logic layer

use std::collections::HashMap;
use std::sync::Arc;
use tracing::instrument;

use crate::error::ProductResult;
use crate::models::ProductPage;
use crate::query::{self, QueryPlan};
use crate::repository::ProductRepository;

/// Product service providing the listing operation
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> Clone for ProductService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: ProductRepository> ProductService<R> {
    /// Create a new ProductService with the given repository
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// List one page of products from raw query-string parameters.
    ///
    /// The page and the total are fetched concurrently and may come from
    /// different snapshots under concurrent writes.
    #[instrument(skip(self))]
    pub async fn list_products(
        &self,
        params: &HashMap<String, String>,
    ) -> ProductResult<ProductPage> {
        self.list_with_plan(query::plan(params)).await
    }

    /// List one page for an already planned query
    #[instrument(skip(self, plan), fields(page = plan.page, order = %plan.order))]
    pub async fn list_with_plan(&self, plan: QueryPlan) -> ProductResult<ProductPage> {
        let (data, total_products) = tokio::try_join!(
            self.repository.find(&plan),
            self.repository.count(&plan.filter)
        )?;

        tracing::debug!(returned = data.len(), total_products, "Listing assembled");

        Ok(ProductPage {
            data,
            current_page: plan.page,
            total_pages: query::total_pages(total_products),
            total_products,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProductError;
    use crate::models::Product;
    use crate::query::{PAGE_SIZE, SortOrder};
    use crate::repository::MockProductRepository;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn test_list_products_assembles_page() {
        let mut repo = MockProductRepository::new();
        repo.expect_find()
            .withf(|plan| plan.page == 3 && plan.skip == 2 * PAGE_SIZE && plan.limit == PAGE_SIZE)
            .times(1)
            .returning(|_| {
                Ok((0..5)
                    .map(|i| Product::new(format!("Chair {i}"), "Ikea", "Furniture", 10.0))
                    .collect())
            });
        repo.expect_count().times(1).returning(|_| Ok(25));

        let service = ProductService::new(repo);
        let page = service.list_products(&params(&[("page", "3")])).await.unwrap();

        assert_eq!(page.data.len(), 5);
        assert_eq!(page.current_page, 3);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total_products, 25);
    }

    #[tokio::test]
    async fn test_find_and_count_share_the_filter() {
        let mut repo = MockProductRepository::new();
        repo.expect_find()
            .withf(|plan| {
                plan.order == SortOrder::PriceAscending
                    && plan.filter.brand.as_deref() == Some("Ikea")
            })
            .returning(|_| Ok(vec![]));
        repo.expect_count()
            .withf(|filter| filter.brand.as_deref() == Some("Ikea"))
            .returning(|_| Ok(0));

        let service = ProductService::new(repo);
        let page = service
            .list_products(&params(&[("brand", "Ikea"), ("sort", "Low to High")]))
            .await
            .unwrap();

        assert!(page.data.is_empty());
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.current_page, 1);
    }

    #[tokio::test]
    async fn test_storage_error_propagates() {
        let mut repo = MockProductRepository::new();
        repo.expect_find()
            .returning(|_| Err(ProductError::Database("connection refused".to_string())));
        repo.expect_count().returning(|_| Ok(3));

        let service = ProductService::new(repo);
        let err = service.list_products(&HashMap::new()).await.unwrap_err();

        assert!(matches!(err, ProductError::Database(_)));
    }

    #[tokio::test]
    async fn test_count_error_propagates() {
        let mut repo = MockProductRepository::new();
        repo.expect_find().returning(|_| Ok(vec![]));
        repo.expect_count()
            .returning(|_| Err(ProductError::Database("timeout".to_string())));

        let service = ProductService::new(repo);
        assert!(service.list_products(&HashMap::new()).await.is_err());
    }
}
