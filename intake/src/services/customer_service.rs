//! Customer endpoints backed by the REST API

use async_trait::async_trait;

use shared::{Customer, NewCustomer};
use crate::error::{IntakeError, IntakeResult};
use crate::services::api_client::RealApiClient;
use crate::traits::CustomerService;

pub struct RealCustomerService {
    api: RealApiClient,
}

impl RealCustomerService {
    pub fn new(api: RealApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl CustomerService for RealCustomerService {
    async fn list_customers(&self) -> IntakeResult<Vec<Customer>> {
        let customers: Option<Vec<Customer>> = self.api.get("/customers").await?;
        Ok(customers.unwrap_or_default())
    }

    async fn create_customer(&self, customer: NewCustomer) -> IntakeResult<Customer> {
        if customer.name.trim().is_empty() {
            return Err(IntakeError::validation("Customer name is required"));
        }
        self.api.post("/customers", &customer).await
    }
}
