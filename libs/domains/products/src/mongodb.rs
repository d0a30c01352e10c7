//! MongoDB implementation of ProductRepository

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{Document, doc},
    options::{FindOptions, IndexOptions},
};
use tracing::instrument;

use crate::error::ProductResult;
use crate::models::Product;
use crate::query::{ProductFilter, QueryPlan, SortOrder};
use crate::repository::ProductRepository;

/// Collection used when none is configured
pub const DEFAULT_COLLECTION: &str = "product";

/// MongoDB implementation of the ProductRepository
#[derive(Clone)]
pub struct MongoProductRepository {
    collection: Collection<Product>,
}

impl MongoProductRepository {
    /// Repository over the default `product` collection
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, DEFAULT_COLLECTION)
    }

    /// Create a new MongoProductRepository with a custom collection name
    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        let collection = db.collection::<Product>(collection_name);
        Self { collection }
    }

    /// Create the indexes backing the listing sorts and filters
    pub async fn init_indexes(&self) -> ProductResult<()> {
        let indexes = vec![
            // Newest-first listing
            IndexModel::builder()
                .keys(doc! { "createdAt": -1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_created_at".to_string())
                        .build(),
                )
                .build(),
            // Price sorts and range queries
            IndexModel::builder()
                .keys(doc! { "price": 1, "createdAt": -1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_price_created_at".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "brand": 1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_brand".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "category": 1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_category".to_string())
                        .build(),
                )
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!(
            collection = self.collection.name(),
            "Product indexes created successfully"
        );
        Ok(())
    }

    /// Get the underlying collection for advanced operations
    pub fn collection(&self) -> &Collection<Product> {
        &self.collection
    }

    /// Build a MongoDB filter document from a ProductFilter.
    ///
    /// Text clauses are escaped so user input is matched literally.
    pub fn build_filter(filter: &ProductFilter) -> Document {
        let mut doc = doc! {};

        if let Some(ref name) = filter.product_name {
            doc.insert("productName", contains_ignore_case(name));
        }

        if let Some(ref brand) = filter.brand {
            doc.insert("brand", contains_ignore_case(brand));
        }

        if let Some(ref category) = filter.category {
            doc.insert("category", contains_ignore_case(category));
        }

        doc.insert(
            "price",
            doc! { "$gte": filter.price.min, "$lte": filter.price.max },
        );

        doc
    }

    /// Sort document for a SortOrder. Price orders break ties newest first.
    pub fn build_sort(order: SortOrder) -> Document {
        match order {
            SortOrder::PriceAscending => doc! { "price": 1, "createdAt": -1 },
            SortOrder::PriceDescending => doc! { "price": -1, "createdAt": -1 },
            SortOrder::NewestFirst => doc! { "createdAt": -1 },
        }
    }

    /// Sort, skip and limit for a plan. `None` when the skip does not fit the
    /// server's signed 64-bit range; no collection is that large, so the page
    /// is empty.
    pub fn find_options(plan: &QueryPlan) -> Option<FindOptions> {
        i64::try_from(plan.skip).ok()?;
        let limit = i64::try_from(plan.limit).ok()?;

        Some(
            FindOptions::builder()
                .limit(limit)
                .skip(plan.skip)
                .sort(Self::build_sort(plan.order))
                .build(),
        )
    }
}

fn contains_ignore_case(text: &str) -> Document {
    doc! { "$regex": regex::escape(text), "$options": "i" }
}

#[async_trait]
impl ProductRepository for MongoProductRepository {
    #[instrument(skip(self), fields(collection = self.collection.name()))]
    async fn find(&self, plan: &QueryPlan) -> ProductResult<Vec<Product>> {
        let Some(options) = Self::find_options(plan) else {
            tracing::debug!(skip = plan.skip, "Skip beyond any collection size");
            return Ok(Vec::new());
        };
        let mongo_filter = Self::build_filter(&plan.filter);

        let cursor = self
            .collection
            .find(mongo_filter)
            .with_options(options)
            .await?;
        let products: Vec<Product> = cursor.try_collect().await?;

        tracing::debug!(returned = products.len(), "Products fetched");
        Ok(products)
    }

    #[instrument(skip(self), fields(collection = self.collection.name()))]
    async fn count(&self, filter: &ProductFilter) -> ProductResult<u64> {
        let mongo_filter = Self::build_filter(filter);
        let count = self.collection.count_documents(mongo_filter).await?;
        Ok(count)
    }
}
