//! Catalog endpoints backed by the REST API

use async_trait::async_trait;

use shared::{PriceTier, Product, ProductId, Suggestion, Variant};
use crate::error::IntakeResult;
use crate::services::api_client::RealApiClient;
use crate::traits::CatalogService;

pub struct RealCatalogService {
    api: RealApiClient,
}

impl RealCatalogService {
    pub fn new(api: RealApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl CatalogService for RealCatalogService {
    async fn suggest(&self, query: &str) -> IntakeResult<Vec<Suggestion>> {
        let found: Option<Vec<Suggestion>> = self
            .api
            .get_with_query("/products/suggest", &[("q", query.to_string())])
            .await?;
        Ok(found.unwrap_or_default())
    }

    async fn list_products(&self) -> IntakeResult<Vec<Product>> {
        let products: Option<Vec<Product>> = self.api.get("/products").await?;
        Ok(products.unwrap_or_default())
    }

    async fn list_variants(&self, product_id: ProductId) -> IntakeResult<Vec<Variant>> {
        let variants: Option<Vec<Variant>> = self
            .api
            .get_with_query("/variants", &[("product_id", product_id.to_string())])
            .await?;
        Ok(variants.unwrap_or_default())
    }

    async fn list_tiers(&self, product_id: ProductId) -> IntakeResult<Vec<PriceTier>> {
        let tiers: Option<Vec<PriceTier>> = self
            .api
            .get_with_query("/variants/tiers", &[("product_id", product_id.to_string())])
            .await?;
        Ok(tiers.unwrap_or_default())
    }
}
