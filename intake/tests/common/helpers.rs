//! Test helpers and builder patterns for intake tests
//!
//! Mocks start without expectations: a test states every backend call it
//! allows, so an unexpected call fails the test.

use std::time::Duration;

use intake::*;
use shared::{DraftDetail, LineIndex, ParsedLine};

/// Builder for reconcilers wired to mockall mocks
pub struct ReconcilerBuilder {
    config: ReconcilerConfig,
    orders: MockOrderService,
    catalog: MockCatalogService,
    customers: MockCustomerService,
}

impl ReconcilerBuilder {
    pub fn new() -> Self {
        Self {
            config: ReconcilerConfig {
                suggest_debounce: Duration::from_millis(250),
                suggest_min_chars: 2,
                house_variant: "kivi".to_string(),
            },
            orders: MockOrderService::new(),
            catalog: MockCatalogService::new(),
            customers: MockCustomerService::new(),
        }
    }

    pub fn with_debounce(mut self, delay: Duration) -> Self {
        self.config.suggest_debounce = delay;
        self
    }

    /// Expect exactly one parse call answering `lines`
    pub fn with_parsed(mut self, lines: Vec<ParsedLine>) -> Self {
        self.orders
            .expect_parse()
            .times(1)
            .returning(move |_| Ok(lines.clone()));
        self
    }

    /// Answer every draft refresh with `draft`
    pub fn with_draft(mut self, draft: DraftDetail) -> Self {
        self.orders
            .expect_draft_detail()
            .returning(move || Ok(draft.clone()));
        self
    }

    pub fn with_orders<F>(mut self, setup: F) -> Self
    where
        F: FnOnce(&mut MockOrderService),
    {
        setup(&mut self.orders);
        self
    }

    pub fn with_catalog<F>(mut self, setup: F) -> Self
    where
        F: FnOnce(&mut MockCatalogService),
    {
        setup(&mut self.catalog);
        self
    }

    pub fn with_customers<F>(mut self, setup: F) -> Self
    where
        F: FnOnce(&mut MockCustomerService),
    {
        setup(&mut self.customers);
        self
    }

    pub fn build(self) -> TestReconciler {
        Reconciler::new(self.config, self.orders, self.catalog, self.customers)
    }
}

impl Default for ReconcilerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Reconciler with every service mocked
pub type TestReconciler = Reconciler<MockOrderService, MockCatalogService, MockCustomerService>;

/// Helper functions for common test operations
pub struct TestHelpers;

impl TestHelpers {
    /// Parse `lines` into a fresh reconciler built from `builder`
    pub async fn parsed(builder: ReconcilerBuilder, lines: Vec<ParsedLine>) -> TestReconciler {
        let reconciler = builder.with_parsed(lines).build();
        reconciler
            .parse_text("pedido")
            .await
            .expect("parse should succeed");
        reconciler
    }

    pub fn indices(values: &[u32]) -> Vec<LineIndex> {
        values.iter().copied().map(LineIndex).collect()
    }

    pub fn network_error(status: u16) -> IntakeError {
        IntakeError::NetworkError {
            status: Some(status),
            method: "POST".to_string(),
            url: "http://localhost:5000/api/test".to_string(),
            message: "backend unavailable".to_string(),
            details: None,
        }
    }
}
