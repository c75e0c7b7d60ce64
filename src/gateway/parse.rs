//! Tolerant decoding of backend payloads.
//!
//! The backend is not consistent about naming: the same attribute may come as
//! `id_meja` or `mejaId`, a status may be an integer code or a display string,
//! and any payload may or may not be wrapped in `{"data": ...}`. Every logical
//! attribute is therefore read from an ordered list of candidate field names,
//! first convertible value wins, and missing or malformed values fall back to
//! a default instead of failing the whole record.

use chrono::{DateTime, NaiveDateTime};
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use std::str::FromStr;

use crate::error::{GatewayError, GatewayResult};
use crate::model::{
    FulfillmentMode, LineStatus, MenuItem, PaymentMethod, Table, TableStatus, Transaction,
    TransactionLine, TransactionRef, TransactionStatus, WireEnum,
};
use crate::session::Staff;

pub type Object = Map<String, Value>;

const DEFAULT_CATEGORY: &str = "Lainnya";
const DEFAULT_CAPACITY: u32 = 4;

/// Decode a body that carries one object, enveloped or not.
pub fn unwrap_object(body: &str) -> GatewayResult<Object> {
    let value: Value = serde_json::from_str(body)
        .map_err(|err| GatewayError::Parse(format!("invalid JSON: {err}")))?;
    match value {
        Value::Object(mut obj) => match obj.remove("data") {
            Some(Value::Object(inner)) => Ok(inner),
            Some(other) => {
                // `data` is something else; treat the whole body as the payload.
                obj.insert("data".into(), other);
                Ok(obj)
            }
            None => Ok(obj),
        },
        other => Err(GatewayError::Parse(format!(
            "expected a JSON object, got {}",
            kind_of(&other)
        ))),
    }
}

/// Decode a body that carries a list, enveloped or not.
pub fn unwrap_array(body: &str) -> GatewayResult<Vec<Value>> {
    let value: Value = serde_json::from_str(body)
        .map_err(|err| GatewayError::Parse(format!("invalid JSON: {err}")))?;
    match value {
        Value::Array(items) => Ok(items),
        Value::Object(mut obj) => match obj.remove("data") {
            Some(Value::Array(items)) => Ok(items),
            _ => Err(GatewayError::Parse(
                "expected a JSON array or an object with a `data` array".into(),
            )),
        },
        other => Err(GatewayError::Parse(format!(
            "expected a JSON array, got {}",
            kind_of(&other)
        ))),
    }
}

/// Decode every object element of a list body; non-object elements are skipped.
pub fn parse_list<T>(body: &str, parse: impl Fn(&Object) -> T) -> GatewayResult<Vec<T>> {
    Ok(unwrap_array(body)?
        .iter()
        .filter_map(Value::as_object)
        .map(parse)
        .collect())
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn as_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn as_decimal(value: &Value) -> Option<Decimal> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return None,
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

pub fn int_field(obj: &Object, names: &[&str]) -> Option<i64> {
    names.iter().find_map(|name| obj.get(*name).and_then(as_int))
}

pub fn text_field(obj: &Object, names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| obj.get(*name).and_then(as_text))
}

pub fn decimal_field(obj: &Object, names: &[&str]) -> Option<Decimal> {
    names.iter().find_map(|name| obj.get(*name).and_then(as_decimal))
}

fn object_field<'a>(obj: &'a Object, names: &[&str]) -> Option<&'a Object> {
    names.iter().find_map(|name| obj.get(*name).and_then(Value::as_object))
}

/// Positive id or nothing; `null`, `0` and negatives all mean "absent".
fn id_field(obj: &Object, names: &[&str]) -> Option<i64> {
    int_field(obj, names).filter(|id| *id > 0)
}

/// Strict enum decoding. Integer codes on any candidate take precedence over
/// names; numeric strings count as codes. `None` if nothing is recognized.
pub fn enum_field<T: WireEnum>(obj: &Object, names: &[&str]) -> Option<T> {
    let by_code = names.iter().find_map(|name| match obj.get(*name) {
        Some(Value::Number(n)) => n.as_i64().and_then(T::from_code),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok().and_then(T::from_code),
        _ => None,
    });
    by_code.or_else(|| {
        names.iter().find_map(|name| match obj.get(*name) {
            Some(Value::String(s)) => T::from_name(s),
            _ => None,
        })
    })
}

/// Lenient enum decoding: the type's default when nothing is recognized.
pub fn enum_or_default<T: WireEnum>(obj: &Object, names: &[&str]) -> T {
    enum_field(obj, names).unwrap_or_default()
}

fn timestamp_field(obj: &Object, names: &[&str]) -> Option<NaiveDateTime> {
    let raw = text_field(obj, names)?;
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

pub fn parse_table(obj: &Object) -> Table {
    Table {
        id: int_field(obj, &["id_meja", "mejaId"]).unwrap_or(0),
        label: text_field(obj, &["no_meja", "nomorMeja"]).unwrap_or_default(),
        capacity: int_field(obj, &["kapasitas"])
            .and_then(|c| u32::try_from(c).ok())
            .unwrap_or(DEFAULT_CAPACITY),
        status: enum_or_default::<TableStatus>(obj, &["status"]),
    }
}

pub fn parse_menu_item(obj: &Object) -> MenuItem {
    let category = object_field(obj, &["kategori"])
        .and_then(|k| text_field(k, &["nama_kategori", "namaKategori"]))
        .or_else(|| text_field(obj, &["kategori"]))
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());

    // 0 = available, any other code = sold out; otherwise compare the name.
    let available = match int_field(obj, &["status"]) {
        Some(code) if code >= 0 => code == 0,
        _ => text_field(obj, &["status"])
            .map(|s| {
                let s = s.trim();
                s.eq_ignore_ascii_case("tersedia") || s.eq_ignore_ascii_case("available")
            })
            .unwrap_or(true),
    };

    MenuItem {
        id: int_field(obj, &["id_menu", "menuId"]).unwrap_or(0),
        name: text_field(obj, &["nama_menu", "namaMenu"]).unwrap_or_default(),
        category,
        price: decimal_field(obj, &["harga", "price"]).unwrap_or(Decimal::ZERO),
        available,
        stock: int_field(obj, &["stok"]).unwrap_or(0),
        description: text_field(obj, &["deskripsi"]).filter(|d| !d.is_empty()),
        image_url: text_field(obj, &["foto_menu", "gambarUrl"]).filter(|u| !u.is_empty()),
    }
}

pub fn parse_transaction(obj: &Object) -> Transaction {
    let lines = ["detailTransaksi", "detail_transaksi"]
        .iter()
        .find_map(|name| obj.get(*name).and_then(Value::as_array))
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_object)
                .map(parse_transaction_line)
                .collect()
        })
        .unwrap_or_default();

    Transaction {
        id: int_field(obj, &["id_transaksi", "idTransaksi"]).unwrap_or(0),
        customer_name: text_field(obj, &["nama_konsumen", "namaKonsumen"]).unwrap_or_default(),
        kind: enum_or_default::<FulfillmentMode>(obj, &["tipe"]),
        total: decimal_field(obj, &["total_bayar", "totalBayar"]).unwrap_or(Decimal::ZERO),
        created_at: timestamp_field(obj, &["tanggal_transaksi", "tanggalTransaksi"]),
        status: enum_or_default::<TransactionStatus>(obj, &["status"]),
        staff_id: id_field(obj, &["id_user", "idUser"]),
        table_id: table_ref(obj),
        payment: enum_or_default::<PaymentMethod>(obj, &["pembayaran"]),
        note: text_field(obj, &["catatan"]),
        lines,
    }
}

pub fn parse_transaction_line(obj: &Object) -> TransactionLine {
    let item_name = object_field(obj, &["menu"])
        .and_then(|menu| text_field(menu, &["nama_menu", "namaMenu"]))
        .or_else(|| text_field(obj, &["namaMenu", "nama_menu"]))
        .unwrap_or_default();

    TransactionLine {
        id: int_field(obj, &["id_detailtransaksi", "idDetailTransaksi"]).unwrap_or(0),
        transaction_id: int_field(obj, &["id_transaksi", "idTransaksi"]).unwrap_or(0),
        menu_item_id: int_field(obj, &["id_menu", "idMenu"]).unwrap_or(0),
        quantity: int_field(obj, &["jumlah"]).unwrap_or(0),
        subtotal: decimal_field(obj, &["subtotal"]).unwrap_or(Decimal::ZERO),
        mode: enum_or_default::<FulfillmentMode>(obj, &["metode"]),
        note: text_field(obj, &["catatan"]).unwrap_or_default(),
        status: enum_or_default::<LineStatus>(obj, &["status"]),
        item_name,
    }
}

/// Table referenced by a transaction: nested `meja` object first, flat id second.
fn table_ref(obj: &Object) -> Option<i64> {
    match object_field(obj, &["meja"]) {
        Some(table) => id_field(table, &["id_meja", "mejaId"]),
        None => id_field(obj, &["id_meja", "idMeja", "mejaId"]),
    }
}

pub fn parse_transaction_ref(obj: &Object) -> TransactionRef {
    TransactionRef {
        id: int_field(obj, &["id_transaksi", "idTransaksi"]).unwrap_or(0),
        status: enum_field::<TransactionStatus>(obj, &["status"]),
        table_id: table_ref(obj),
    }
}

/// Login payload. `username` falls back to the submitted one.
pub fn parse_staff(obj: &Object, submitted_username: &str) -> Staff {
    Staff {
        id: int_field(obj, &["userId", "id_user"]).unwrap_or(0),
        username: text_field(obj, &["username"]).unwrap_or_else(|| submitted_username.to_string()),
        name: text_field(obj, &["nama"]).unwrap_or_else(|| submitted_username.to_string()),
        email: text_field(obj, &["email"]).unwrap_or_default(),
        role: text_field(obj, &["role"]).unwrap_or_else(|| "User".to_string()),
        address: text_field(obj, &["alamat"]).filter(|a| !a.is_empty()),
        phone: text_field(obj, &["noTelp", "no_telp"]).filter(|p| !p.is_empty()),
    }
}
