#![allow(dead_code)]

use async_trait::async_trait;
use reqwest::StatusCode;
use rust_decimal::Decimal;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Mutex;

use resto_order::error::{GatewayError, GatewayResult};
use resto_order::gateway::OrderGateway;
use resto_order::model::{
    FulfillmentMode, LineStatus, MenuItem, PaymentMethod, Table, TableStatus, Transaction,
    TransactionLine, TransactionRef, TransactionStatus,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListTables,
    ListPending,
    ListAll,
    ListMenu,
    CreateDineIn { name: String, table_id: i64 },
    CreateTakeAway { name: String },
    AddLine { transaction_id: i64, menu_item_id: i64, quantity: u32, note: Option<String> },
    Get(i64),
    Cancel(i64),
}

type Queue<T> = Arc<Mutex<VecDeque<GatewayResult<T>>>>;

/// In-memory backend that records every call. Queued responses are used
/// first; once a queue is empty the fake behaves like a healthy backend that
/// prices lines from `menu`.
#[derive(Clone, Default)]
pub struct RecordingGateway {
    pub menu: Vec<MenuItem>,
    calls: Arc<Mutex<Vec<Call>>>,
    tables: Queue<Vec<Table>>,
    pending: Queue<Vec<TransactionRef>>,
    all: Queue<Vec<TransactionRef>>,
    creates: Queue<Transaction>,
    add_lines: Queue<String>,
    gets: Queue<Transaction>,
    cancels: Queue<String>,
    created: Arc<Mutex<Option<Transaction>>>,
    attached: Arc<Mutex<Vec<TransactionLine>>>,
}

impl RecordingGateway {
    pub fn with_menu(menu: Vec<MenuItem>) -> Self {
        Self {
            menu,
            ..Default::default()
        }
    }

    pub async fn calls(&self) -> Vec<Call> {
        self.calls.lock().await.clone()
    }

    pub async fn push_tables(&self, res: GatewayResult<Vec<Table>>) {
        self.tables.lock().await.push_back(res);
    }

    pub async fn push_pending(&self, res: GatewayResult<Vec<TransactionRef>>) {
        self.pending.lock().await.push_back(res);
    }

    pub async fn push_all(&self, res: GatewayResult<Vec<TransactionRef>>) {
        self.all.lock().await.push_back(res);
    }

    pub async fn push_create(&self, res: GatewayResult<Transaction>) {
        self.creates.lock().await.push_back(res);
    }

    pub async fn push_add_line(&self, res: GatewayResult<String>) {
        self.add_lines.lock().await.push_back(res);
    }

    pub async fn push_get(&self, res: GatewayResult<Transaction>) {
        self.gets.lock().await.push_back(res);
    }

    pub async fn push_cancel(&self, res: GatewayResult<String>) {
        self.cancels.lock().await.push_back(res);
    }

    async fn record(&self, call: Call) {
        self.calls.lock().await.push(call);
    }

    fn price_of(&self, menu_item_id: i64) -> (Decimal, String) {
        self.menu
            .iter()
            .find(|m| m.id == menu_item_id)
            .map(|m| (m.price, m.name.clone()))
            .unwrap_or((Decimal::ZERO, String::new()))
    }

    async fn create(&self, name: &str, table_id: Option<i64>) -> GatewayResult<Transaction> {
        if let Some(res) = self.creates.lock().await.pop_front() {
            if let Ok(t) = &res {
                *self.created.lock().await = Some(t.clone());
            }
            return res;
        }
        let t = transaction(
            501,
            name,
            table_id,
            if table_id.is_some() { FulfillmentMode::DineIn } else { FulfillmentMode::TakeAway },
        );
        *self.created.lock().await = Some(t.clone());
        Ok(t)
    }
}

#[async_trait]
impl OrderGateway for RecordingGateway {
    async fn list_tables(&self) -> GatewayResult<Vec<Table>> {
        self.record(Call::ListTables).await;
        self.tables.lock().await.pop_front().unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn list_pending_transactions(&self) -> GatewayResult<Vec<TransactionRef>> {
        self.record(Call::ListPending).await;
        self.pending.lock().await.pop_front().unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn list_transactions(&self) -> GatewayResult<Vec<TransactionRef>> {
        self.record(Call::ListAll).await;
        self.all.lock().await.pop_front().unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn list_menu(&self) -> GatewayResult<Vec<MenuItem>> {
        self.record(Call::ListMenu).await;
        Ok(self.menu.clone())
    }

    async fn create_dine_in_transaction(&self, customer_name: &str, table_id: i64) -> GatewayResult<Transaction> {
        self.record(Call::CreateDineIn { name: customer_name.into(), table_id }).await;
        self.create(customer_name, Some(table_id)).await
    }

    async fn create_take_away_transaction(&self, customer_name: &str) -> GatewayResult<Transaction> {
        self.record(Call::CreateTakeAway { name: customer_name.into() }).await;
        self.create(customer_name, None).await
    }

    async fn add_line_item(
        &self,
        transaction_id: i64,
        menu_item_id: i64,
        quantity: u32,
        note: Option<&str>,
    ) -> GatewayResult<String> {
        self.record(Call::AddLine {
            transaction_id,
            menu_item_id,
            quantity,
            note: note.map(str::to_string),
        })
        .await;
        if let Some(res) = self.add_lines.lock().await.pop_front() {
            return res;
        }
        let (price, name) = self.price_of(menu_item_id);
        let mut attached = self.attached.lock().await;
        let id = attached.len() as i64 + 1;
        attached.push(TransactionLine {
            id,
            transaction_id,
            menu_item_id,
            quantity: i64::from(quantity),
            subtotal: price * Decimal::from(quantity),
            mode: FulfillmentMode::DineIn,
            note: note.unwrap_or_default().to_string(),
            status: LineStatus::Pending,
            item_name: name,
        });
        Ok(format!(r#"{{"id_detailtransaksi":{id}}}"#))
    }

    async fn get_transaction(&self, transaction_id: i64) -> GatewayResult<Transaction> {
        self.record(Call::Get(transaction_id)).await;
        if let Some(res) = self.gets.lock().await.pop_front() {
            return res;
        }
        let created = self.created.lock().await.clone();
        let mut t = created.ok_or_else(|| api_error(404, "not found"))?;
        let lines = self.attached.lock().await.clone();
        t.total = lines.iter().map(|l| l.subtotal).sum();
        t.lines = lines
            .into_iter()
            .map(|mut l| {
                l.mode = t.kind;
                l
            })
            .collect();
        Ok(t)
    }

    async fn cancel_transaction(&self, transaction_id: i64) -> GatewayResult<String> {
        self.record(Call::Cancel(transaction_id)).await;
        self.cancels.lock().await.pop_front().unwrap_or_else(|| Ok("{}".into()))
    }
}

pub fn api_error(status: u16, body: &str) -> GatewayError {
    GatewayError::Api {
        status: StatusCode::from_u16(status).unwrap(),
        body: body.into(),
    }
}

pub fn menu_item(id: i64, name: &str, price: i64) -> MenuItem {
    MenuItem {
        id,
        name: name.into(),
        category: "Makanan".into(),
        price: Decimal::from(price),
        available: true,
        stock: 10,
        description: None,
        image_url: None,
    }
}

pub fn table(id: i64, status: TableStatus) -> Table {
    Table {
        id,
        label: format!("M{id}"),
        capacity: 4,
        status,
    }
}

pub fn transaction(id: i64, name: &str, table_id: Option<i64>, kind: FulfillmentMode) -> Transaction {
    Transaction {
        id,
        customer_name: name.into(),
        kind,
        total: Decimal::ZERO,
        created_at: None,
        status: TransactionStatus::Pending,
        staff_id: None,
        table_id,
        payment: PaymentMethod::Cash,
        note: None,
        lines: Vec::new(),
    }
}

pub fn tx_ref(id: i64, status: Option<TransactionStatus>, table_id: Option<i64>) -> TransactionRef {
    TransactionRef { id, status, table_id }
}
