//! Menu browsing helpers: category chips, search, recommendations, prices.
use rust_decimal::Decimal;

use crate::model::MenuItem;

/// Distinct categories, sorted.
pub fn categories(items: &[MenuItem]) -> Vec<String> {
    let mut out: Vec<String> = items.iter().map(|m| m.category.clone()).collect();
    out.sort();
    out.dedup();
    out
}

/// Items in `category` (any when `None`) whose name contains `query`.
/// Both comparisons ignore case; an empty query matches everything.
pub fn filter<'a>(items: &'a [MenuItem], category: Option<&str>, query: &str) -> Vec<&'a MenuItem> {
    let query = query.trim().to_lowercase();
    items
        .iter()
        .filter(|m| category.map_or(true, |c| m.category.eq_ignore_ascii_case(c)))
        .filter(|m| query.is_empty() || m.name.to_lowercase().contains(&query))
        .collect()
}

/// Other available items from the same category, at most `limit`.
pub fn recommendations<'a>(items: &'a [MenuItem], current: &MenuItem, limit: usize) -> Vec<&'a MenuItem> {
    items
        .iter()
        .filter(|m| m.id != current.id && m.available)
        .filter(|m| m.category.eq_ignore_ascii_case(&current.category))
        .take(limit)
        .collect()
}

/// `Rp 45.000`: whole rupiah, dot as thousands separator.
pub fn format_rupiah(amount: Decimal) -> String {
    let whole = amount.trunc().to_string();
    let (sign, digits) = match whole.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", whole.as_str()),
    };
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    format!("Rp {sign}{grouped}")
}
