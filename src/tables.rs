//! Periodic table availability refresh.
use std::fmt;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::gateway::OrderGateway;
use crate::model::Table;

/// The customer's chosen table was taken by someone else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionLost {
    pub table_id: i64,
    pub label: String,
}

impl fmt::Display for SelectionLost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Table {} is no longer available", self.label)
    }
}

/// Publish an occupancy-corrected table listing every `every`, starting
/// immediately. Failed refreshes are logged and skipped. Returns once every
/// receiver has been dropped.
pub async fn watch_tables<G>(gateway: &G, every: Duration, tx: watch::Sender<Vec<Table>>)
where
    G: OrderGateway + ?Sized,
{
    let mut ticker = tokio::time::interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        if tx.is_closed() {
            break;
        }
        match gateway.list_tables_with_occupancy().await {
            Ok(tables) => {
                debug!(count = tables.len(), "tables refreshed");
                if tx.send(tables).is_err() {
                    break;
                }
            }
            Err(err) => warn!(%err, "table refresh failed"),
        }
    }
    debug!("table watcher stopped");
}
