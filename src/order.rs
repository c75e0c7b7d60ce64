//! Order workflow: the session that owns the cart and the checkout protocol.
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::cart::{Cart, CartLine};
use crate::error::{CartError, CheckoutError, TableSelectionError};
use crate::gateway::OrderGateway;
use crate::model::{FulfillmentMode, MenuItem, Table, Transaction};
use crate::tables::SelectionLost;

/// Materialize `lines` as a backend transaction.
///
/// A positive `table_id` makes a dine-in order, anything else a take-away.
/// Lines are attached one at a time in cart order. If one fails, the
/// transaction is cancelled best-effort and the failure names the item.
/// The final re-read only refreshes totals; if it fails the transaction as
/// created is returned. The caller is responsible for clearing its cart.
///
/// Dropping the future mid-way skips the compensating cancel.
#[instrument(skip_all, fields(table_id = ?table_id, lines = lines.len()))]
pub async fn submit_order(
    gateway: &dyn OrderGateway,
    customer_name: &str,
    table_id: Option<i64>,
    lines: &[CartLine],
) -> Result<Transaction, CheckoutError> {
    let customer_name = customer_name.trim();
    if customer_name.is_empty() {
        return Err(CheckoutError::MissingCustomerName);
    }
    if lines.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let created = match table_id.filter(|id| *id > 0) {
        Some(table_id) => gateway.create_dine_in_transaction(customer_name, table_id).await,
        None => gateway.create_take_away_transaction(customer_name).await,
    }
    .map_err(CheckoutError::Create)?;
    info!(transaction_id = created.id, "transaction created");

    for line in lines {
        let attached = gateway
            .add_line_item(created.id, line.item.id, line.quantity(), line.note())
            .await;
        if let Err(source) = attached {
            warn!(
                transaction_id = created.id,
                item = %line.item.name,
                err = %source,
                "attaching item failed; cancelling transaction"
            );
            if let Err(cancel_err) = gateway.cancel_transaction(created.id).await {
                warn!(transaction_id = created.id, err = %cancel_err, "cancel failed");
            }
            return Err(CheckoutError::AttachItem {
                item: line.item.name.clone(),
                source,
            });
        }
    }

    match gateway.get_transaction(created.id).await {
        Ok(fresh) => Ok(fresh),
        Err(err) => {
            warn!(transaction_id = created.id, %err, "re-reading transaction failed; using creation response");
            Ok(created)
        }
    }
}

/// One customer's ordering session: name, table choice and cart.
#[derive(Debug, Clone)]
pub struct OrderSession {
    id: Uuid,
    customer_name: String,
    mode: FulfillmentMode,
    table: Option<Table>,
    cart: Cart,
}

impl OrderSession {
    pub fn dine_in(customer_name: impl Into<String>) -> Self {
        Self::new(customer_name.into(), FulfillmentMode::DineIn)
    }

    pub fn take_away(customer_name: impl Into<String>) -> Self {
        Self::new(customer_name.into(), FulfillmentMode::TakeAway)
    }

    fn new(customer_name: String, mode: FulfillmentMode) -> Self {
        Self {
            id: Uuid::new_v4(),
            customer_name,
            mode,
            table: None,
            cart: Cart::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    pub fn mode(&self) -> FulfillmentMode {
        self.mode
    }

    pub fn selected_table(&self) -> Option<&Table> {
        self.table.as_ref()
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Choose a table from the latest listing. Only Available tables can be
    /// chosen, and only for dine-in.
    pub fn select_table(&mut self, tables: &[Table], table_id: i64) -> Result<(), TableSelectionError> {
        if self.mode == FulfillmentMode::TakeAway {
            return Err(TableSelectionError::TakeAway);
        }
        let table = tables
            .iter()
            .find(|t| t.id == table_id)
            .ok_or(TableSelectionError::UnknownTable(table_id))?;
        if !table.is_available() {
            return Err(TableSelectionError::NotAvailable(table.label.clone()));
        }
        self.table = Some(table.clone());
        Ok(())
    }

    /// Reconcile the selection with a fresh listing. A selected table that is
    /// listed and no longer Available is dropped and reported.
    pub fn apply_table_refresh(&mut self, tables: &[Table]) -> Option<SelectionLost> {
        let selected = self.table.as_ref()?;
        let current = tables.iter().find(|t| t.id == selected.id)?;
        if current.is_available() {
            self.table = Some(current.clone());
            return None;
        }
        let lost = SelectionLost {
            table_id: current.id,
            label: selected.label.clone(),
        };
        info!(session = %self.id, table_id = lost.table_id, "selected table taken");
        self.table = None;
        Some(lost)
    }

    pub fn add_item(&mut self, item: &MenuItem, quantity: u32, note: &str) -> Result<(), CartError> {
        self.cart.add_or_merge_item(item, quantity, note, self.mode)
    }

    pub fn set_line_quantity(&mut self, menu_item_id: i64, quantity: i64) -> Result<(), CartError> {
        self.cart.set_line_quantity(menu_item_id, quantity)
    }

    pub fn set_line_note(&mut self, menu_item_id: i64, note: &str) -> Result<(), CartError> {
        self.cart.set_line_note(menu_item_id, note)
    }

    pub fn clear_cart(&mut self) {
        self.cart.clear();
    }

    /// Submit the cart. On success the cart is emptied; on failure it is kept
    /// so the customer can retry.
    #[instrument(skip_all, fields(session = %self.id))]
    pub async fn checkout(&mut self, gateway: &dyn OrderGateway) -> Result<Transaction, CheckoutError> {
        let table_id = match self.mode {
            FulfillmentMode::DineIn => {
                Some(self.table.as_ref().ok_or(CheckoutError::NoTableSelected)?.id)
            }
            FulfillmentMode::TakeAway => None,
        };
        let transaction =
            submit_order(gateway, &self.customer_name, table_id, self.cart.lines()).await?;
        self.cart.clear();
        Ok(transaction)
    }
}
