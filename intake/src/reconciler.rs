//! Order intake reconciler
//!
//! Owns one batch of parsed order lines and drives it from parsing to the
//! draft order: customer assignment, live suggestions, manual resolution and a
//! single batched submission.

use std::collections::HashSet;
use std::sync::Arc;

use rust_decimal::Decimal;

use shared::{
    component_debug, component_info, component_warn, Customer, DraftDetail, LineIndex, NewCustomer,
    ProductId, Suggestion, VariantId,
};
use crate::config::ReconcilerConfig;
use crate::error::{IntakeError, IntakeResult};
use crate::services::pricing::{house_variant, tier_price};
use crate::services::SuggestionDebouncer;
use crate::state::{create_shared_state, SharedBatchState};
use crate::traits::{CatalogService, CustomerService, OrderService};
use crate::types::{BatchState, CustomerAssignment, OrderLine, Resolution, SubmitReceipt};

const COMPONENT: &str = "reconciler";

/// Reconciler with dependency injection
pub struct Reconciler<O, C, U>
where
    O: OrderService,
    C: CatalogService + 'static,
    U: CustomerService,
{
    state: SharedBatchState,
    config: ReconcilerConfig,
    orders: O,
    catalog: Arc<C>,
    customers: U,
    debouncer: SuggestionDebouncer<C>,
}

impl<O, C, U> Reconciler<O, C, U>
where
    O: OrderService,
    C: CatalogService + 'static,
    U: CustomerService,
{
    /// Create a reconciler with an empty batch
    pub fn new(config: ReconcilerConfig, orders: O, catalog: C, customers: U) -> Self {
        let state = create_shared_state(BatchState::new());
        let catalog = Arc::new(catalog);
        let debouncer = SuggestionDebouncer::new(
            Arc::clone(&catalog),
            Arc::clone(&state),
            config.suggest_debounce,
            config.suggest_min_chars,
        );

        Self {
            state,
            config,
            orders,
            catalog,
            customers,
            debouncer,
        }
    }

    pub fn shared_state(&self) -> SharedBatchState {
        Arc::clone(&self.state)
    }

    // ---------------------------------------------------------------------
    // Batch lifecycle
    // ---------------------------------------------------------------------

    /// Replace the batch with the parser's reading of `raw`.
    ///
    /// On failure the previous batch is left untouched.
    pub async fn parse_text(&self, raw: &str) -> IntakeResult<Vec<OrderLine>> {
        let parsed = self
            .orders
            .parse(raw)
            .await
            .map_err(|e| IntakeError::ParseError { source: Box::new(e) })?;

        let mut seen = HashSet::new();
        if let Some(duplicate) = parsed.iter().find(|p| !seen.insert(p.line_index)) {
            return Err(IntakeError::ParseError {
                source: Box::new(IntakeError::validation(format!(
                    "Parser returned line {} twice",
                    duplicate.line_index
                ))),
            });
        }

        self.debouncer.cancel_all().await;
        let lines: Vec<OrderLine> = parsed.into_iter().map(OrderLine::from).collect();
        {
            let mut state = self.state.write().await;
            state.clear_batch();
            state.lines = lines.clone();
        }

        let unresolved = lines.iter().filter(|l| !l.is_resolved()).count();
        component_info!(COMPONENT, "Parsed {} lines ({} need resolution)", lines.len(), unresolved);
        Ok(lines)
    }

    /// Remove a line without renumbering the rest
    pub async fn remove_line(&self, line: LineIndex) -> IntakeResult<OrderLine> {
        self.debouncer.cancel(line).await;
        let mut state = self.state.write().await;
        let position = state
            .lines
            .iter()
            .position(|l| l.line_index == line)
            .ok_or(IntakeError::LineNotFound { line })?;
        state.live_suggestions.remove(&line);
        Ok(state.lines.remove(position))
    }

    /// Send every line to the draft order in one call, then clear the batch.
    ///
    /// Rejected without a network call while any line is unresolved or has no
    /// customer. A failed call leaves the batch intact.
    pub async fn submit_batch(&self) -> IntakeResult<SubmitReceipt> {
        let items = {
            let state = self.state.read().await;
            let missing = state.missing();
            if state.lines.is_empty() || !missing.is_empty() {
                return Err(IntakeError::IncompleteBatchError { missing });
            }
            state
                .lines
                .iter()
                .map(|l| l.to_draft_item(l.charged_unit(&state.catalog)))
                .collect::<Vec<_>>()
        };
        let submitted = items.len();

        self.orders.add_draft_items(items).await?;

        self.debouncer.cancel_all().await;
        self.state.write().await.clear_batch();
        component_info!(COMPONENT, "✅ Saved {} lines to the draft order", submitted);

        let draft = match self.refresh_draft().await {
            Ok(draft) => Some(draft),
            Err(e) => {
                component_warn!(COMPONENT, "Draft refresh after submit failed: {}", e);
                None
            }
        };
        Ok(SubmitReceipt { submitted, draft })
    }

    // ---------------------------------------------------------------------
    // Line edits
    // ---------------------------------------------------------------------

    /// Set the customer on every line. Blank names and empty batches are a no-op.
    pub async fn assign_customer_to_all(&self, name: &str) -> usize {
        let name = name.trim();
        if name.is_empty() {
            return 0;
        }
        let mut state = self.state.write().await;
        for line in state.lines.iter_mut() {
            line.customer = name.to_string();
        }
        state.lines.len()
    }

    pub async fn set_line_customer(&self, line: LineIndex, name: &str) -> IntakeResult<()> {
        let mut state = self.state.write().await;
        state.line_mut(line)?.customer = name.trim().to_string();
        Ok(())
    }

    /// Edit the candidate product name; the match status is kept
    pub async fn set_line_product(&self, line: LineIndex, product: &str) -> IntakeResult<()> {
        let mut state = self.state.write().await;
        state.line_mut(line)?.product = product.to_string();
        Ok(())
    }

    pub async fn set_line_notes(&self, line: LineIndex, notes: Option<String>) -> IntakeResult<()> {
        let mut state = self.state.write().await;
        state.line_mut(line)?.notes = notes.filter(|n| !n.trim().is_empty());
        Ok(())
    }

    pub async fn set_line_quantity(&self, line: LineIndex, qty: Decimal) -> IntakeResult<()> {
        if qty <= Decimal::ZERO {
            return Err(IntakeError::validation("Quantity must be greater than zero"));
        }
        let mut state = self.state.write().await;
        state.line_mut(line)?.qty = qty;
        reprice(&mut state, Some(line), &self.config.house_variant);
        Ok(())
    }

    pub async fn set_line_variant(&self, line: LineIndex, variant: Option<VariantId>) -> IntakeResult<()> {
        let mut state = self.state.write().await;
        state.line_mut(line)?.variant_id = variant;
        reprice(&mut state, Some(line), &self.config.house_variant);
        Ok(())
    }

    /// Fix the sale unit price by hand; tier pricing will not overwrite it
    pub async fn set_line_price(&self, line: LineIndex, price: Decimal) -> IntakeResult<()> {
        if price <= Decimal::ZERO {
            return Err(IntakeError::validation("Sale price must be greater than zero"));
        }
        let mut state = self.state.write().await;
        let line = state.line_mut(line)?;
        line.sale_unit_price = Some(price);
        line.manual_price = true;
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Resolution
    // ---------------------------------------------------------------------

    /// Resolve a line to an existing product or a product to be created.
    ///
    /// Invalid resolutions leave the line untouched.
    pub async fn resolve_line(&self, line: LineIndex, resolution: Resolution) -> IntakeResult<OrderLine> {
        resolution.validate()?;

        let mut state = self.state.write().await;
        let target = state.line_mut(line)?;
        target.apply(resolution);
        let resolved = target.clone();
        reprice(&mut state, Some(line), &self.config.house_variant);

        component_debug!(COMPONENT, "Resolved line {} as '{}'", line, resolved.product);
        Ok(state.line(line).cloned().unwrap_or(resolved))
    }

    /// Resolve a non-exact line to its best parser suggestion, if it has one
    pub async fn accept_top_suggestion(&self, line: LineIndex) -> IntakeResult<bool> {
        let top = {
            let state = self.state.read().await;
            let current = state.line(line).ok_or(IntakeError::LineNotFound { line })?;
            if current.is_resolved() {
                return Ok(false);
            }
            current.suggestions.first().map(Resolution::from)
        };

        match top {
            Some(resolution) => {
                self.resolve_line(line, resolution).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Debounced catalog lookup for the text an operator is typing on a line
    pub async fn request_live_suggestions(&self, line: LineIndex, query: &str) -> IntakeResult<()> {
        self.debouncer.request(line, query).await
    }

    pub async fn live_suggestions(&self, line: LineIndex) -> Vec<Suggestion> {
        self.state
            .read()
            .await
            .live_suggestions
            .get(&line)
            .map(|s| s.items.clone())
            .unwrap_or_default()
    }

    pub async fn pending_suggestions(&self) -> usize {
        self.debouncer.pending_count().await
    }

    // ---------------------------------------------------------------------
    // Catalog, pricing and customers
    // ---------------------------------------------------------------------

    /// Fetch the product catalog used to resolve charged units
    pub async fn load_catalog(&self) -> IntakeResult<usize> {
        let products = self.catalog.list_products().await?;
        let mut state = self.state.write().await;
        state.catalog = products.into_iter().map(|p| (p.id, p)).collect();
        Ok(state.catalog.len())
    }

    /// Prefetch variants and tiers for resolved products, then reprice lines.
    ///
    /// Lookups are fetched once per product; failures are skipped and retried
    /// on the next call.
    pub async fn refresh_pricing(&self) -> usize {
        let wanted: Vec<ProductId> = {
            let state = self.state.read().await;
            let ids: HashSet<ProductId> = state
                .lines
                .iter()
                .filter_map(|l| l.product_id)
                .filter(|id| !state.variants.contains_key(id) || !state.tiers.contains_key(id))
                .collect();
            ids.into_iter().collect()
        };

        for product_id in wanted {
            match self.catalog.list_variants(product_id).await {
                Ok(variants) => {
                    self.state.write().await.variants.insert(product_id, variants);
                }
                Err(e) => {
                    component_debug!(COMPONENT, "Variants for product {} unavailable: {}", product_id, e);
                }
            }
            match self.catalog.list_tiers(product_id).await {
                Ok(tiers) => {
                    self.state.write().await.tiers.insert(product_id, tiers);
                }
                Err(e) => {
                    component_debug!(COMPONENT, "Tiers for product {} unavailable: {}", product_id, e);
                }
            }
        }

        let mut state = self.state.write().await;
        reprice(&mut state, None, &self.config.house_variant)
    }

    pub async fn load_customers(&self) -> IntakeResult<Vec<Customer>> {
        let customers = self.customers.list_customers().await?;
        self.state.write().await.customers = customers.clone();
        Ok(customers)
    }

    pub async fn customers(&self) -> Vec<Customer> {
        self.state.read().await.customers.clone()
    }

    /// Create a customer and optionally assign it to the batch or one line
    pub async fn create_customer(&self, customer: NewCustomer, assignment: CustomerAssignment) -> IntakeResult<Customer> {
        if let CustomerAssignment::Line(line) = assignment {
            if !self.state.read().await.contains(line) {
                return Err(IntakeError::LineNotFound { line });
            }
        }

        let created = self.customers.create_customer(customer).await?;
        self.state.write().await.customers.push(created.clone());

        match assignment {
            CustomerAssignment::None => {}
            CustomerAssignment::AllLines => {
                self.assign_customer_to_all(&created.name).await;
            }
            CustomerAssignment::Line(line) => {
                self.set_line_customer(line, &created.name).await?;
            }
        }
        Ok(created)
    }

    // ---------------------------------------------------------------------
    // Draft order
    // ---------------------------------------------------------------------

    pub async fn refresh_draft(&self) -> IntakeResult<DraftDetail> {
        let draft = self.orders.draft_detail().await?;
        self.state.write().await.draft = Some(draft.clone());
        Ok(draft)
    }

    pub async fn confirm_draft(&self) -> IntakeResult<serde_json::Value> {
        let confirmation = self.orders.confirm_draft().await?;
        component_info!(COMPONENT, "✅ Draft order emitted");
        if let Err(e) = self.refresh_draft().await {
            component_warn!(COMPONENT, "Draft refresh after confirm failed: {}", e);
        }
        Ok(confirmation)
    }

    /// Save any pending lines to the draft, then confirm it
    pub async fn emit_draft(&self) -> IntakeResult<serde_json::Value> {
        if !self.is_empty().await {
            self.submit_batch().await?;
        }
        self.confirm_draft().await
    }

    // ---------------------------------------------------------------------
    // Snapshots
    // ---------------------------------------------------------------------

    pub async fn lines(&self) -> Vec<OrderLine> {
        self.state.read().await.lines.clone()
    }

    pub async fn line(&self, line: LineIndex) -> Option<OrderLine> {
        self.state.read().await.line(line).cloned()
    }

    pub async fn line_indices(&self) -> Vec<LineIndex> {
        self.state.read().await.lines.iter().map(|l| l.line_index).collect()
    }

    /// Lines that still block submission for lack of an exact match
    pub async fn unresolved(&self) -> Vec<OrderLine> {
        self.state
            .read()
            .await
            .lines
            .iter()
            .filter(|l| !l.is_resolved())
            .cloned()
            .collect()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.lines.is_empty()
    }

    pub async fn draft(&self) -> Option<DraftDetail> {
        self.state.read().await.draft.clone()
    }
}

/// Preselect the house variant and fill tier prices from cached lookups.
///
/// Only lines bound to a catalog product are touched, and manual prices are
/// kept. Returns the number of lines whose price changed.
fn reprice(state: &mut BatchState, only: Option<LineIndex>, house_label: &str) -> usize {
    let BatchState { lines, catalog, variants, tiers, .. } = state;
    let mut changed = 0;

    for line in lines.iter_mut() {
        if only.is_some_and(|target| target != line.line_index) {
            continue;
        }
        let Some(product_id) = line.product_id else { continue };

        if line.variant_id.is_none() {
            if let Some(variants) = variants.get(&product_id) {
                line.variant_id = house_variant(variants, house_label);
            }
        }
        if line.manual_price {
            continue;
        }
        let Some(product_tiers) = tiers.get(&product_id) else { continue };

        let unit = line.charged_unit(catalog);
        if let Some(price) = tier_price(product_tiers, unit, line.variant_id, line.qty) {
            if line.sale_unit_price != Some(price) {
                line.sale_unit_price = Some(price);
                changed += 1;
            }
        }
    }
    changed
}
