//! In-memory cart state and its mutations.

use crate::cart::{CartItem, NewCartItem};
use crate::error::CartError;
use crate::ids::ProductId;
use serde::{Deserialize, Deserializer, Serialize};

/// Outcome of a decrement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecrementOutcome {
    /// The item is still in the cart with this quantity.
    Decremented(u32),
    /// The item reached zero and was removed.
    Removed,
}

/// The list of items in a cart.
///
/// Every item has a unique id and a quantity of at least 1. Serializes as a
/// bare JSON array, which is the stored record format.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CartState {
    items: Vec<CartItem>,
}

impl CartState {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from raw items, restoring the invariants.
    ///
    /// Zero-quantity entries are dropped and duplicate ids are merged into
    /// the first occurrence by summing quantities.
    pub fn from_items(items: impl IntoIterator<Item = CartItem>) -> Self {
        let mut state = Self::new();
        for item in items {
            if item.quantity == 0 {
                continue;
            }
            match state.items.iter_mut().find(|i| i.id == item.id) {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(item.quantity);
                }
                None => state.items.push(item),
            }
        }
        state
    }

    /// Items in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Consume the cart and return its items.
    pub fn into_items(self) -> Vec<CartItem> {
        self.items
    }

    /// Number of distinct items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total item count (sum of quantities).
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Get an item by product ID.
    pub fn get(&self, id: &ProductId) -> Option<&CartItem> {
        self.items.iter().find(|i| &i.id == id)
    }

    /// Check whether a product is in the cart.
    pub fn contains(&self, id: &ProductId) -> bool {
        self.get(id).is_some()
    }

    /// Add a product.
    ///
    /// A new id is appended with quantity 1; an id already present gets its
    /// quantity bumped by one. Returns the resulting quantity.
    ///
    /// A NaN or infinite price is rejected, since JSON has no encoding for it.
    pub fn add(&mut self, product: NewCartItem) -> Result<u32, CartError> {
        if !product.price.is_finite() {
            return Err(CartError::InvalidPrice(product.id.to_string()));
        }

        if let Some(existing) = self.items.iter_mut().find(|i| i.id == product.id) {
            existing.quantity = existing
                .quantity
                .checked_add(1)
                .ok_or_else(|| CartError::Overflow(product.id.to_string()))?;
            return Ok(existing.quantity);
        }

        self.items.push(product.with_quantity(1));
        Ok(1)
    }

    /// Increase an item's quantity by one. Returns the new quantity.
    pub fn increment(&mut self, id: &ProductId) -> Result<u32, CartError> {
        let item = self
            .items
            .iter_mut()
            .find(|i| &i.id == id)
            .ok_or_else(|| CartError::ItemNotInCart(id.to_string()))?;

        item.quantity = item
            .quantity
            .checked_add(1)
            .ok_or_else(|| CartError::Overflow(id.to_string()))?;
        Ok(item.quantity)
    }

    /// Decrease an item's quantity by one, removing it at zero.
    pub fn decrement(&mut self, id: &ProductId) -> Result<DecrementOutcome, CartError> {
        let index = self
            .items
            .iter()
            .position(|i| &i.id == id)
            .ok_or_else(|| CartError::ItemNotInCart(id.to_string()))?;

        let remaining = self.items[index].quantity.saturating_sub(1);
        if remaining == 0 {
            self.items.remove(index);
            return Ok(DecrementOutcome::Removed);
        }

        self.items[index].quantity = remaining;
        Ok(DecrementOutcome::Decremented(remaining))
    }

    /// Compare contents ignoring item order.
    pub fn same_items(&self, other: &CartState) -> bool {
        self.len() == other.len()
            && self
                .items
                .iter()
                .all(|item| other.get(&item.id) == Some(item))
    }
}

impl<'de> Deserialize<'de> for CartState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<CartItem>::deserialize(deserializer).map(Self::from_items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, price: f64) -> NewCartItem {
        NewCartItem::new(id, format!("Product {id}"), format!("https://img/{id}.png"), price)
    }

    #[test]
    fn test_cart_creation() {
        let cart = CartState::new();
        assert!(cart.is_empty());
        assert_eq!(cart.item_count(), 0);
    }

    #[test]
    fn test_add_new_item() {
        let mut cart = CartState::new();
        assert_eq!(cart.add(product("p1", 10.0)).unwrap(), 1);

        assert_eq!(cart.len(), 1);
        let item = cart.get(&"p1".into()).unwrap();
        assert_eq!(item.quantity, 1);
        assert_eq!(item.title, "Product p1");
    }

    #[test]
    fn test_add_same_item_increases_quantity() {
        let mut cart = CartState::new();
        cart.add(product("p1", 10.0)).unwrap();
        cart.add(product("p2", 5.0)).unwrap();
        assert_eq!(cart.add(product("p1", 10.0)).unwrap(), 2);

        assert_eq!(cart.len(), 2);
        assert_eq!(cart.get(&"p1".into()).unwrap().quantity, 2);
        assert_eq!(cart.get(&"p2".into()).unwrap().quantity, 1);
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_increment() {
        let mut cart = CartState::new();
        cart.add(product("p1", 10.0)).unwrap();
        assert_eq!(cart.increment(&"p1".into()).unwrap(), 2);
        assert_eq!(cart.increment(&"p1".into()).unwrap(), 3);
    }

    #[test]
    fn test_increment_missing_leaves_cart_unchanged() {
        let mut cart = CartState::new();
        cart.add(product("p1", 10.0)).unwrap();
        let before = cart.clone();

        let result = cart.increment(&"nope".into());
        assert!(matches!(result, Err(CartError::ItemNotInCart(id)) if id == "nope"));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_decrement_keeps_item_above_one() {
        let mut cart = CartState::new();
        cart.add(product("p1", 10.0)).unwrap();
        cart.add(product("p1", 10.0)).unwrap();

        assert_eq!(
            cart.decrement(&"p1".into()).unwrap(),
            DecrementOutcome::Decremented(1)
        );
        assert_eq!(cart.get(&"p1".into()).unwrap().quantity, 1);
    }

    #[test]
    fn test_decrement_removes_at_zero() {
        let mut cart = CartState::new();
        cart.add(product("p1", 10.0)).unwrap();
        cart.add(product("p2", 5.0)).unwrap();

        assert_eq!(cart.decrement(&"p1".into()).unwrap(), DecrementOutcome::Removed);
        assert!(!cart.contains(&"p1".into()));
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_decrement_missing_leaves_cart_unchanged() {
        let mut cart = CartState::new();
        let result = cart.decrement(&"nope".into());
        assert!(matches!(result, Err(CartError::ItemNotInCart(_))));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_quantity_overflow() {
        let mut cart = CartState::from_items([product("p1", 1.0).with_quantity(u32::MAX)]);
        assert!(matches!(
            cart.increment(&"p1".into()),
            Err(CartError::Overflow(_))
        ));
        assert!(matches!(cart.add(product("p1", 1.0)), Err(CartError::Overflow(_))));
        assert_eq!(cart.get(&"p1".into()).unwrap().quantity, u32::MAX);
    }

    #[test]
    fn test_non_finite_price_rejected() {
        let mut cart = CartState::new();
        cart.add(product("good", 10.0)).unwrap();

        for price in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let result = cart.add(product("bad", price));
            assert!(matches!(result, Err(CartError::InvalidPrice(id)) if id == "bad"));
        }
        assert_eq!(cart.len(), 1);

        let text = serde_json::to_string(&cart).unwrap();
        let back: CartState = serde_json::from_str(&text).unwrap();
        assert_eq!(back, cart);
    }

    #[test]
    fn test_from_items_normalizes() {
        let cart = CartState::from_items([
            product("p1", 1.0).with_quantity(2),
            product("p2", 1.0).with_quantity(0),
            product("p1", 1.0).with_quantity(3),
        ]);

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get(&"p1".into()).unwrap().quantity, 5);
    }

    #[test]
    fn test_deserialize_normalizes() {
        let json = r#"[
            {"id":"p1","title":"A","image_url":"","price":1.0,"quantity":0},
            {"id":"p2","title":"B","image_url":"","price":2.0,"quantity":1}
        ]"#;
        let cart: CartState = serde_json::from_str(json).unwrap();
        assert_eq!(cart.len(), 1);
        assert!(cart.contains(&"p2".into()));
    }

    #[test]
    fn test_same_items_ignores_order() {
        let a = CartState::from_items([
            product("p1", 1.0).with_quantity(1),
            product("p2", 2.0).with_quantity(2),
        ]);
        let b = CartState::from_items([
            product("p2", 2.0).with_quantity(2),
            product("p1", 1.0).with_quantity(1),
        ]);
        let c = CartState::from_items([product("p1", 1.0).with_quantity(1)]);

        assert!(a.same_items(&b));
        assert!(!a.same_items(&c));
        assert_ne!(a, b);
    }

    #[test]
    fn test_example_scenario() {
        let mut cart = CartState::new();
        cart.add(product("p1", 10.0)).unwrap();
        assert_eq!(cart.get(&"p1".into()).unwrap().quantity, 1);
        cart.add(product("p1", 10.0)).unwrap();
        assert_eq!(cart.get(&"p1".into()).unwrap().quantity, 2);
        cart.decrement(&"p1".into()).unwrap();
        assert_eq!(cart.get(&"p1".into()).unwrap().quantity, 1);
        cart.decrement(&"p1".into()).unwrap();
        assert!(cart.is_empty());
    }
}
