use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    #[error("quantity must be greater than 0")]
    ZeroQuantity,

    #[error("only {available} in stock, cart would hold {requested}")]
    InsufficientStock { requested: u32, available: u32 },
}

/// Session cart: product id to requested quantity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: BTreeMap<Uuid, u32>,
}

impl Cart {
    /// Adds `quantity` units, refusing anything that would exceed `stock`.
    /// Returns the new quantity held for the product.
    pub fn add(&mut self, product_id: Uuid, quantity: u32, stock: i32) -> Result<u32, CartError> {
        if quantity == 0 {
            return Err(CartError::ZeroQuantity);
        }
        let available = u32::try_from(stock).unwrap_or(0);
        let current = self.quantity(product_id);
        let requested = current.saturating_add(quantity);
        if requested > available {
            return Err(CartError::InsufficientStock {
                requested,
                available,
            });
        }
        self.lines.insert(product_id, requested);
        Ok(requested)
    }

    pub fn remove(&mut self, product_id: Uuid) -> bool {
        self.lines.remove(&product_id).is_some()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn quantity(&self, product_id: Uuid) -> u32 {
        self.lines.get(&product_id).copied().unwrap_or(0)
    }

    /// Total number of units across all lines.
    pub fn count(&self) -> u32 {
        self.lines.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> impl Iterator<Item = (Uuid, u32)> + '_ {
        self.lines.iter().map(|(id, qty)| (*id, *qty))
    }

    pub fn product_ids(&self) -> Vec<Uuid> {
        self.lines.keys().copied().collect()
    }
}

/// Session wishlist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Favorites {
    items: BTreeSet<Uuid>,
}

impl Favorites {
    /// Flips membership and reports whether the product is now a favorite.
    pub fn toggle(&mut self, product_id: Uuid) -> bool {
        if self.items.remove(&product_id) {
            false
        } else {
            self.items.insert(product_id);
            true
        }
    }

    pub fn contains(&self, product_id: Uuid) -> bool {
        self.items.contains(&product_id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn ids(&self) -> Vec<Uuid> {
        self.items.iter().copied().collect()
    }
}
