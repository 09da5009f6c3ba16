//! Order endpoints backed by the REST API

use async_trait::async_trait;

use shared::{DraftDetail, DraftItem, DraftItemsRequest, ParseRequest, ParseResponse, ParsedLine};
use crate::error::IntakeResult;
use crate::services::api_client::RealApiClient;
use crate::traits::OrderService;

pub struct RealOrderService {
    api: RealApiClient,
}

impl RealOrderService {
    pub fn new(api: RealApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl OrderService for RealOrderService {
    async fn parse(&self, text: &str) -> IntakeResult<Vec<ParsedLine>> {
        let request = ParseRequest { text: text.to_string() };
        let response: Option<ParseResponse> = self.api.post("/orders/parse", &request).await?;
        Ok(response.unwrap_or_default().items)
    }

    async fn add_draft_items(&self, items: Vec<DraftItem>) -> IntakeResult<()> {
        let request = DraftItemsRequest { items };
        let _: serde_json::Value = self.api.post("/orders/draft/items", &request).await?;
        Ok(())
    }

    async fn confirm_draft(&self) -> IntakeResult<serde_json::Value> {
        self.api.post_empty("/orders/draft/confirm").await
    }

    async fn draft_detail(&self) -> IntakeResult<DraftDetail> {
        let detail: Option<DraftDetail> = self.api.get("/orders/draft/detail").await?;
        Ok(detail.unwrap_or_default())
    }
}
