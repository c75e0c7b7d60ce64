//! In-memory cart for one ordering session.
//!
//! A cart holds at most one line per menu item and never a zero-quantity
//! line. It is not synchronized; one session owns it.

use rust_decimal::Decimal;

use crate::error::CartError;
use crate::model::{FulfillmentMode, MenuItem};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub item: MenuItem,
    quantity: u32,
    pub note: String,
    pub mode: FulfillmentMode,
}

impl CartLine {
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Price times quantity, clamped to the `Decimal` range.
    pub fn subtotal(&self) -> Decimal {
        self.item.price.saturating_mul(Decimal::from(self.quantity))
    }

    /// The note as sent to the backend: absent when empty.
    pub fn note(&self) -> Option<&str> {
        Some(self.note.as_str()).filter(|n| !n.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `quantity` of `item`, merging into an existing line for the same
    /// menu item. A non-empty `note` replaces the line's note; an empty one
    /// keeps it.
    pub fn add_or_merge_item(
        &mut self,
        item: &MenuItem,
        quantity: u32,
        note: &str,
        mode: FulfillmentMode,
    ) -> Result<(), CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }
        if !item.available {
            return Err(CartError::Unavailable(item.name.clone()));
        }
        match self.lines.iter_mut().find(|l| l.item.id == item.id) {
            Some(line) => {
                line.quantity = line.quantity.saturating_add(quantity);
                if !note.is_empty() {
                    line.note = note.to_string();
                }
            }
            None => self.lines.push(CartLine {
                item: item.clone(),
                quantity,
                note: note.to_string(),
                mode,
            }),
        }
        Ok(())
    }

    /// Set a line's quantity; zero or less removes the line.
    pub fn set_line_quantity(&mut self, menu_item_id: i64, quantity: i64) -> Result<(), CartError> {
        let pos = self.position(menu_item_id)?;
        if quantity <= 0 {
            self.lines.remove(pos);
        } else {
            self.lines[pos].quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        }
        Ok(())
    }

    pub fn set_line_note(&mut self, menu_item_id: i64, note: &str) -> Result<(), CartError> {
        let pos = self.position(menu_item_id)?;
        self.lines[pos].note = note.to_string();
        Ok(())
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    fn position(&self, menu_item_id: i64) -> Result<usize, CartError> {
        self.lines
            .iter()
            .position(|l| l.item.id == menu_item_id)
            .ok_or(CartError::NotInCart(menu_item_id))
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line(&self, menu_item_id: i64) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.item.id == menu_item_id)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct lines.
    pub fn item_count(&self) -> usize {
        self.lines.len()
    }

    pub fn total_quantity(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    /// Sum of subtotals, clamped like [`CartLine::subtotal`].
    pub fn total(&self) -> Decimal {
        self.lines
            .iter()
            .map(CartLine::subtotal)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }
}
