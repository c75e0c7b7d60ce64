//! Remote data gateway: typed operations over the backend's JSON REST API.
use async_trait::async_trait;
use std::collections::HashSet;
use tracing::{debug, warn};

use crate::error::{GatewayError, GatewayResult};
use crate::model::{MenuItem, Table, TableStatus, Transaction, TransactionRef};

pub mod client;
pub mod parse;

pub use client::HttpGateway;

/// Backend operations used by the ordering workflow.
///
/// Implementations hold no per-call state, so one gateway may serve many
/// sessions concurrently.
#[async_trait]
pub trait OrderGateway: Send + Sync {
    async fn list_tables(&self) -> GatewayResult<Vec<Table>>;

    /// Transactions the backend itself considers active.
    async fn list_pending_transactions(&self) -> GatewayResult<Vec<TransactionRef>>;

    /// Every transaction, unfiltered.
    async fn list_transactions(&self) -> GatewayResult<Vec<TransactionRef>>;

    async fn list_menu(&self) -> GatewayResult<Vec<MenuItem>>;

    async fn create_dine_in_transaction(
        &self,
        customer_name: &str,
        table_id: i64,
    ) -> GatewayResult<Transaction>;

    async fn create_take_away_transaction(&self, customer_name: &str)
        -> GatewayResult<Transaction>;

    /// Returns the raw response text.
    async fn add_line_item(
        &self,
        transaction_id: i64,
        menu_item_id: i64,
        quantity: u32,
        note: Option<&str>,
    ) -> GatewayResult<String>;

    async fn get_transaction(&self, transaction_id: i64) -> GatewayResult<Transaction>;

    /// Returns the raw response text.
    async fn cancel_transaction(&self, transaction_id: i64) -> GatewayResult<String>;

    /// Tables with occupancy corrected from active transactions.
    ///
    /// Failing to list tables is an error. Anything that goes wrong while
    /// computing the override only degrades the result to the plain list.
    async fn list_tables_with_occupancy(&self) -> GatewayResult<Vec<Table>> {
        let tables = self.list_tables().await?;
        match self.occupied_table_ids().await {
            Ok(occupied) => Ok(apply_occupancy(tables, &occupied)),
            Err(err @ GatewayError::Parse(_)) => {
                warn!(%err, "active transactions unreadable; table status not corrected");
                Ok(tables)
            }
            Err(err) => {
                warn!(%err, "active transactions unavailable; table status not corrected");
                Ok(tables)
            }
        }
    }

    /// Ids of tables referenced by Pending or Processing transactions.
    ///
    /// Tries the backend's active listing first and falls back to filtering
    /// the full listing. Only the fallback's failure is returned.
    async fn occupied_table_ids(&self) -> GatewayResult<HashSet<i64>> {
        match self.list_pending_transactions().await {
            Ok(active) => Ok(active.iter().filter_map(|t| t.table_id).collect()),
            Err(err) => {
                debug!(%err, "active transaction listing failed; filtering all transactions");
                let all = self.list_transactions().await?;
                Ok(all
                    .iter()
                    .filter(|t| t.status.is_some_and(|s| s.is_active()))
                    .filter_map(|t| t.table_id)
                    .collect())
            }
        }
    }
}

/// Mark Available tables that appear in `occupied` as Occupied.
pub fn apply_occupancy(tables: Vec<Table>, occupied: &HashSet<i64>) -> Vec<Table> {
    if occupied.is_empty() {
        return tables;
    }
    tables
        .into_iter()
        .map(|mut table| {
            if table.status == TableStatus::Available && occupied.contains(&table.id) {
                table.status = TableStatus::Occupied;
            }
            table
        })
        .collect()
}
