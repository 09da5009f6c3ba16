//! Live suggestion tests
//!
//! Run on a paused clock so debounce timers fire deterministically.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;

use intake::*;
use shared::{LineIndex, PriceTier, Product, ProductId, Suggestion, Unit, Variant};

mod common;
use common::{ReconcilerBuilder, TestFixtures, TestHelpers, TestReconciler};

const SETTLE: Duration = Duration::from_millis(400);

/// Catalog mock recording every query it receives
fn recording_catalog(catalog: &mut MockCatalogService) -> Arc<Mutex<Vec<String>>> {
    let queries = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&queries);
    catalog.expect_suggest().returning(move |query| {
        sink.lock().unwrap().push(query.to_string());
        Ok(vec![TestFixtures::suggestion(1, &format!("{query} (catalog)"), 0.9)])
    });
    queries
}

async fn reconciler_with_queries(lines: u32) -> (TestReconciler, Arc<Mutex<Vec<String>>>) {
    let mut queries = None;
    let builder = ReconcilerBuilder::new().with_catalog(|c| queries = Some(recording_catalog(c)));
    let reconciler = TestHelpers::parsed(builder, TestFixtures::exact_lines(lines)).await;
    (reconciler, queries.unwrap())
}

#[tokio::test(start_paused = true)]
async fn test_short_query_never_reaches_catalog() {
    let (reconciler, queries) = reconciler_with_queries(1).await;

    reconciler.request_live_suggestions(LineIndex(0), "p").await.unwrap();
    reconciler.request_live_suggestions(LineIndex(0), " a ").await.unwrap();
    sleep(SETTLE).await;

    assert!(queries.lock().unwrap().is_empty());
    assert!(reconciler.live_suggestions(LineIndex(0)).await.is_empty());
    assert_eq!(reconciler.pending_suggestions().await, 0);
}

#[tokio::test(start_paused = true)]
async fn test_rapid_typing_issues_one_lookup() {
    let (reconciler, queries) = reconciler_with_queries(1).await;
    let line = LineIndex(0);

    reconciler.request_live_suggestions(line, "pa").await.unwrap();
    sleep(Duration::from_millis(100)).await;
    reconciler.request_live_suggestions(line, "pal").await.unwrap();
    sleep(Duration::from_millis(100)).await;
    reconciler.request_live_suggestions(line, "palt").await.unwrap();
    assert_eq!(reconciler.pending_suggestions().await, 1);

    sleep(SETTLE).await;

    assert_eq!(*queries.lock().unwrap(), vec!["palt".to_string()]);
    let live = reconciler.live_suggestions(line).await;
    assert_eq!(live.len(), 1);
    assert_eq!(live[0].name, "palt (catalog)");
}

#[tokio::test(start_paused = true)]
async fn test_lines_debounce_independently() {
    let (reconciler, queries) = reconciler_with_queries(2).await;

    reconciler.request_live_suggestions(LineIndex(0), "palta").await.unwrap();
    reconciler.request_live_suggestions(LineIndex(1), "tomate").await.unwrap();
    sleep(SETTLE).await;

    let mut seen = queries.lock().unwrap().clone();
    seen.sort();
    assert_eq!(seen, vec!["palta".to_string(), "tomate".to_string()]);
    assert_eq!(reconciler.live_suggestions(LineIndex(0)).await[0].name, "palta (catalog)");
    assert_eq!(reconciler.live_suggestions(LineIndex(1)).await[0].name, "tomate (catalog)");
}

#[tokio::test(start_paused = true)]
async fn test_removed_line_cancels_pending_lookup() {
    let (reconciler, queries) = reconciler_with_queries(2).await;

    reconciler.request_live_suggestions(LineIndex(1), "lechuga").await.unwrap();
    sleep(Duration::from_millis(100)).await;
    reconciler.remove_line(LineIndex(1)).await.unwrap();
    sleep(SETTLE).await;

    assert!(queries.lock().unwrap().is_empty());
    assert!(reconciler.live_suggestions(LineIndex(1)).await.is_empty());
    assert_eq!(reconciler.pending_suggestions().await, 0);
}

#[tokio::test(start_paused = true)]
async fn test_short_query_clears_previous_suggestions() {
    let (reconciler, _queries) = reconciler_with_queries(1).await;
    let line = LineIndex(0);

    reconciler.request_live_suggestions(line, "palta").await.unwrap();
    sleep(SETTLE).await;
    assert_eq!(reconciler.live_suggestions(line).await.len(), 1);

    reconciler.request_live_suggestions(line, "p").await.unwrap();
    assert!(reconciler.live_suggestions(line).await.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_lookup_failure_is_ignored() {
    let builder = ReconcilerBuilder::new().with_catalog(|catalog| {
        catalog
            .expect_suggest()
            .times(1)
            .returning(|_| Err(TestHelpers::network_error(503)));
    });
    let reconciler = TestHelpers::parsed(builder, TestFixtures::exact_lines(1)).await;

    reconciler.request_live_suggestions(LineIndex(0), "palta").await.unwrap();
    sleep(SETTLE).await;

    assert!(reconciler.live_suggestions(LineIndex(0)).await.is_empty());
    assert_eq!(reconciler.lines().await.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_unknown_line_is_rejected() {
    let (reconciler, queries) = reconciler_with_queries(1).await;

    let result = reconciler.request_live_suggestions(LineIndex(7), "palta").await;

    assert!(matches!(result, Err(IntakeError::LineNotFound { .. })));
    sleep(SETTLE).await;
    assert!(queries.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_reparse_cancels_pending_lookups() {
    let mut queries = None;
    let mut parses = 0;
    let reconciler = ReconcilerBuilder::new()
        .with_catalog(|c| queries = Some(recording_catalog(c)))
        .with_orders(|orders| {
            orders.expect_parse().times(2).returning(move |_| {
                parses += 1;
                Ok(TestFixtures::exact_lines(parses))
            });
        })
        .build();
    let queries = queries.unwrap();

    reconciler.parse_text("uno").await.unwrap();
    reconciler.request_live_suggestions(LineIndex(0), "palta").await.unwrap();
    reconciler.parse_text("dos").await.unwrap();
    sleep(SETTLE).await;

    assert!(queries.lock().unwrap().is_empty());
    assert!(reconciler.live_suggestions(LineIndex(0)).await.is_empty());
}

/// Catalog whose lookups take longer for shorter queries
#[derive(Default)]
struct SlowCatalog {
    queries: Mutex<Vec<String>>,
}

#[async_trait]
impl CatalogService for SlowCatalog {
    async fn suggest(&self, query: &str) -> IntakeResult<Vec<Suggestion>> {
        self.queries.lock().unwrap().push(query.to_string());
        let latency = if query.len() <= 3 { 500 } else { 10 };
        sleep(Duration::from_millis(latency)).await;
        Ok(vec![Suggestion {
            id: ProductId(query.len() as i64),
            name: query.to_string(),
            score: 1.0,
        }])
    }

    async fn list_products(&self) -> IntakeResult<Vec<Product>> {
        Ok(vec![])
    }

    async fn list_variants(&self, _product_id: ProductId) -> IntakeResult<Vec<Variant>> {
        Ok(vec![])
    }

    async fn list_tiers(&self, _product_id: ProductId) -> IntakeResult<Vec<PriceTier>> {
        Ok(vec![])
    }
}

#[tokio::test(start_paused = true)]
async fn test_stale_in_flight_response_is_discarded() {
    let mut orders = MockOrderService::new();
    orders
        .expect_parse()
        .returning(|_| Ok(vec![TestFixtures::exact_line(0, 1, "Palta", "1", Unit::Kg)]));
    let reconciler = Reconciler::new(
        ReconcilerConfig::default(),
        orders,
        SlowCatalog::default(),
        MockCustomerService::new(),
    );
    reconciler.parse_text("pedido").await.unwrap();
    let line = LineIndex(0);

    // "pal" is in flight when "palta" arrives
    reconciler.request_live_suggestions(line, "pal").await.unwrap();
    sleep(Duration::from_millis(300)).await;
    reconciler.request_live_suggestions(line, "palta").await.unwrap();
    sleep(Duration::from_secs(1)).await;

    let live = reconciler.live_suggestions(line).await;
    assert_eq!(live.len(), 1);
    assert_eq!(live[0].name, "palta");
}
