use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Closed enumeration whose wire form is either an integer code or a
/// display name. See `gateway::parse::enum_field` for the precedence rules.
pub trait WireEnum: Sized + Copy + Default {
    fn from_code(code: i64) -> Option<Self>;
    fn from_name(name: &str) -> Option<Self>;
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TableStatus {
    #[default]
    Available,
    Occupied,
    Reserved,
}

impl TableStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TableStatus::Available => "Available",
            TableStatus::Occupied => "Occupied",
            TableStatus::Reserved => "Reserved",
        }
    }
}

impl WireEnum for TableStatus {
    fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(TableStatus::Available),
            1 => Some(TableStatus::Occupied),
            2 => Some(TableStatus::Reserved),
            _ => None,
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "tersedia" | "available" => Some(TableStatus::Available),
            "terisi" | "occupied" => Some(TableStatus::Occupied),
            "dipesan" | "reserved" => Some(TableStatus::Reserved),
            _ => None,
        }
    }
}

/// Dine-in or take-away; used both for transactions and for cart lines.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum FulfillmentMode {
    #[default]
    DineIn,
    TakeAway,
}

impl FulfillmentMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FulfillmentMode::DineIn => "Dine In",
            FulfillmentMode::TakeAway => "Take Away",
        }
    }
}

impl WireEnum for FulfillmentMode {
    fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(FulfillmentMode::DineIn),
            1 => Some(FulfillmentMode::TakeAway),
            _ => None,
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().replace(['-', '_', ' '], "").as_str() {
            "dinein" => Some(FulfillmentMode::DineIn),
            "takeaway" => Some(FulfillmentMode::TakeAway),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TransactionStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Cancelled,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "Pending",
            TransactionStatus::Processing => "Processing",
            TransactionStatus::Completed => "Completed",
            TransactionStatus::Cancelled => "Cancelled",
        }
    }

    /// Pending and Processing transactions hold their table.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            TransactionStatus::Pending | TransactionStatus::Processing
        )
    }
}

impl WireEnum for TransactionStatus {
    fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(TransactionStatus::Pending),
            1 => Some(TransactionStatus::Processing),
            2 => Some(TransactionStatus::Completed),
            3 => Some(TransactionStatus::Cancelled),
            _ => None,
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "menunggu" | "pending" => Some(TransactionStatus::Pending),
            "diproses" | "processing" => Some(TransactionStatus::Processing),
            "selesai" | "completed" => Some(TransactionStatus::Completed),
            "dibatalkan" | "cancelled" | "canceled" => Some(TransactionStatus::Cancelled),
            _ => None,
        }
    }
}

/// Kitchen progress of one transaction line.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum LineStatus {
    #[default]
    Pending,
    Cooking,
    Ready,
    Served,
}

impl WireEnum for LineStatus {
    fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(LineStatus::Pending),
            1 => Some(LineStatus::Cooking),
            2 => Some(LineStatus::Ready),
            3 => Some(LineStatus::Served),
            _ => None,
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "menunggu" | "pending" => Some(LineStatus::Pending),
            "dimasak" | "cooking" => Some(LineStatus::Cooking),
            "siap" | "ready" => Some(LineStatus::Ready),
            "disajikan" | "served" => Some(LineStatus::Served),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PaymentMethod {
    #[default]
    Cash,
    Transfer,
    Qris,
}

impl WireEnum for PaymentMethod {
    fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(PaymentMethod::Cash),
            1 => Some(PaymentMethod::Transfer),
            2 => Some(PaymentMethod::Qris),
            _ => None,
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "cash" | "tunai" => Some(PaymentMethod::Cash),
            "transfer" => Some(PaymentMethod::Transfer),
            "qris" => Some(PaymentMethod::Qris),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Table {
    pub id: i64,
    pub label: String,
    pub capacity: u32,
    pub status: TableStatus,
}

impl Table {
    pub fn is_available(&self) -> bool {
        self.status == TableStatus::Available
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MenuItem {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub price: Decimal,
    pub available: bool,
    pub stock: i64,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Transaction {
    pub id: i64,
    pub customer_name: String,
    pub kind: FulfillmentMode,
    pub total: Decimal,
    pub created_at: Option<NaiveDateTime>,
    pub status: TransactionStatus,
    pub staff_id: Option<i64>,
    pub table_id: Option<i64>,
    pub payment: PaymentMethod,
    pub note: Option<String>,
    pub lines: Vec<TransactionLine>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransactionLine {
    pub id: i64,
    pub transaction_id: i64,
    pub menu_item_id: i64,
    pub quantity: i64,
    pub subtotal: Decimal,
    pub mode: FulfillmentMode,
    pub note: String,
    pub status: LineStatus,
    pub item_name: String,
}

/// The slice of a transaction listing needed for table occupancy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRef {
    pub id: i64,
    /// `None` when the backend sent no recognizable status.
    pub status: Option<TransactionStatus>,
    pub table_id: Option<i64>,
}
