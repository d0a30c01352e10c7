use chrono::{DateTime, Utc};
use mongodb::bson::{Bson, oid::ObjectId, serde_helpers::serialize_object_id_as_hex_string};
use serde::{Deserialize, Deserializer, Serialize, de::Error as _};
use utoipa::ToSchema;

/// Product entity, as stored in the `product` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Document id, rendered as a 24-character hex string
    #[serde(rename = "_id", serialize_with = "serialize_object_id_as_hex_string")]
    #[schema(value_type = String, example = "65f1c0ffee0000000000abcd")]
    pub id: ObjectId,

    #[schema(example = "Oak Dining Chair")]
    pub product_name: String,

    #[serde(default)]
    #[schema(example = "Ikea")]
    pub brand: String,

    #[serde(default)]
    #[schema(example = "Furniture")]
    pub category: String,

    #[schema(example = 49.99)]
    pub price: f64,

    #[serde(deserialize_with = "deserialize_created_at")]
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// New product with a fresh id, created now
    pub fn new(
        product_name: impl Into<String>,
        brand: impl Into<String>,
        category: impl Into<String>,
        price: f64,
    ) -> Self {
        Self {
            id: ObjectId::new(),
            product_name: product_name.into(),
            brand: brand.into(),
            category: category.into(),
            price,
            created_at: Utc::now(),
        }
    }

    /// Override the creation time
    pub fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }
}

/// Accepts a BSON date or an RFC 3339 string.
fn deserialize_created_at<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    match Bson::deserialize(deserializer)? {
        Bson::DateTime(dt) => DateTime::from_timestamp_millis(dt.timestamp_millis())
            .ok_or_else(|| D::Error::custom("createdAt is out of range")),
        Bson::String(s) => DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(D::Error::custom),
        other => Err(D::Error::custom(format!(
            "expected a date for createdAt, found {:?}",
            other.element_type()
        ))),
    }
}

/// One page of a product listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    pub data: Vec<Product>,
    /// Page number after coercion (1-based)
    pub current_page: u64,
    /// `ceil(totalProducts / PAGE_SIZE)`
    pub total_pages: u64,
    /// Number of products matching the filter, across all pages
    pub total_products: u64,
}
