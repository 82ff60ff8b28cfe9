//! In-memory shopping cart keyed by product identity.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::model::{CartLine, ItemId, Product};

/// Cart state for a single session.
///
/// Lines are kept in insertion order so renderers get a stable listing.
/// A line never holds a zero quantity, and every [`ItemId`] appears at most once.
#[derive(Debug, Clone, Default)]
pub struct CartStore {
    lines: Vec<CartLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Read model derived from the cart at the time of the call.
pub struct CartSnapshot {
    /// Current lines.
    pub lines: Vec<CartLine>,
    /// Number of distinct products.
    pub line_count: usize,
    /// Sum of all quantities.
    pub total_quantity: u64,
    /// Sum of `unit_price * quantity` over all lines.
    pub total_price: Decimal,
}

impl CartStore {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one unit of `product`, inserting a new line when needed.
    pub fn add_item(&mut self, product: &Product) {
        if let Some(line) = self.line_mut(&product.id) {
            line.quantity = line.quantity.saturating_add(1);
        } else {
            self.lines.push(line_for(product, 1));
        }
    }

    /// Shift the quantity of `product` by `delta`.
    ///
    /// A resulting quantity of zero or less removes the line. A positive result on
    /// an absent line creates it from the supplied product.
    pub fn change_quantity(&mut self, product: &Product, delta: i64) {
        let current = i64::from(self.quantity_of(&product.id));
        let target = current.saturating_add(delta);

        if target <= 0 {
            self.remove_item(&product.id);
            return;
        }

        let quantity = u32::try_from(target).unwrap_or(u32::MAX);
        if let Some(line) = self.line_mut(&product.id) {
            line.quantity = quantity;
        } else {
            self.lines.push(line_for(product, quantity));
        }
    }

    /// Delete the line for `item_id`, if any.
    pub fn remove_item(&mut self, item_id: &ItemId) {
        self.lines.retain(|line| &line.item_id != item_id);
    }

    /// Drop every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Quantity currently held for `item_id`, zero when absent.
    #[must_use]
    pub fn quantity_of(&self, item_id: &ItemId) -> u32 {
        self.lines
            .iter()
            .find(|line| &line.item_id == item_id)
            .map_or(0, |line| line.quantity)
    }

    /// Whether the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Recompute the read model from the current lines.
    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        let total_quantity = self
            .lines
            .iter()
            .map(|line| u64::from(line.quantity))
            .sum();
        let total_price = self.lines.iter().map(CartLine::line_total).sum();

        CartSnapshot {
            lines: self.lines.clone(),
            line_count: self.lines.len(),
            total_quantity,
            total_price,
        }
    }

    fn line_mut(&mut self, item_id: &ItemId) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|line| &line.item_id == item_id)
    }
}

fn line_for(product: &Product, quantity: u32) -> CartLine {
    CartLine {
        item_id: product.id.clone(),
        name: product.name.clone(),
        unit_price: product.unit_price,
        image: product.image.clone(),
        quantity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, cents: i64) -> Product {
        Product {
            id: ItemId::from(id),
            name: format!("Product {id}"),
            unit_price: Decimal::new(cents, 2),
            image: None,
        }
    }

    #[test]
    fn repeated_adds_merge_into_one_line() {
        let mut cart = CartStore::new();
        let bottle = product("bottle", 450);

        for _ in 0..3 {
            cart.add_item(&bottle);
        }

        let snapshot = cart.snapshot();
        assert_eq!(snapshot.line_count, 1);
        assert_eq!(cart.quantity_of(&bottle.id), 3);
        assert_eq!(snapshot.total_price, Decimal::new(1350, 2));
    }

    #[test]
    fn decrement_to_zero_removes_line() {
        let mut cart = CartStore::new();
        let bag = product("bag", 199);
        cart.add_item(&bag);
        cart.add_item(&bag);

        cart.change_quantity(&bag, -1);
        assert_eq!(cart.quantity_of(&bag.id), 1);

        cart.change_quantity(&bag, -5);
        assert!(cart.is_empty());
    }

    #[test]
    fn positive_delta_creates_missing_line() {
        let mut cart = CartStore::new();
        let straw = product("straw", 25);

        cart.change_quantity(&straw, 4);

        let snapshot = cart.snapshot();
        assert_eq!(snapshot.line_count, 1);
        assert_eq!(snapshot.total_quantity, 4);
        assert_eq!(snapshot.total_price, Decimal::new(100, 2));
    }

    #[test]
    fn non_positive_delta_on_absent_line_is_noop() {
        let mut cart = CartStore::new();
        cart.add_item(&product("cup", 300));
        let before = cart.snapshot();

        cart.change_quantity(&product("lid", 50), -1);
        cart.change_quantity(&product("lid", 50), 0);

        assert_eq!(cart.snapshot(), before);
    }

    #[test]
    fn removing_absent_item_leaves_cart_unchanged() {
        let mut cart = CartStore::new();
        cart.add_item(&product("soap", 520));
        let before = cart.snapshot();

        cart.remove_item(&ItemId::from("missing"));

        assert_eq!(cart.snapshot(), before);
    }

    #[test]
    fn snapshot_totals_cover_every_line() {
        let mut cart = CartStore::new();
        let brush = product("brush", 275);
        let jar = product("jar", 1000);
        cart.add_item(&brush);
        cart.change_quantity(&jar, 2);
        cart.add_item(&brush);

        let snapshot = cart.snapshot();
        assert_eq!(snapshot.line_count, 2);
        assert_eq!(snapshot.total_quantity, 4);
        assert_eq!(snapshot.total_price, Decimal::new(2550, 2));
        assert_eq!(
            snapshot
                .lines
                .iter()
                .map(|line| line.item_id.0.as_str())
                .collect::<Vec<_>>(),
            vec!["brush", "jar"]
        );
    }

    #[test]
    fn huge_delta_saturates_quantity() {
        let mut cart = CartStore::new();
        let pebble = product("pebble", 1);

        cart.change_quantity(&pebble, i64::MAX);

        assert_eq!(cart.quantity_of(&pebble.id), u32::MAX);
    }
}
