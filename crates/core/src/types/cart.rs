//! The cart aggregate.
//!
//! A [`Cart`] is an ordered list of [`CartItem`]s, unique by product id, kept
//! in insertion order. Transitions borrow the cart and return a new `Cart`, so
//! the live value is only replaced once the new one has been persisted.

use serde::{Deserialize, Serialize};

use super::{Price, Product, ProductId};

/// A product held in the cart together with its quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(flatten)]
    pub product: Product,
    pub amount: u32,
}

impl CartItem {
    /// Product id of this line.
    #[must_use]
    pub const fn id(&self) -> ProductId {
        self.product.id
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.amount)
    }
}

/// Ordered, id-unique collection of cart lines.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<CartItem>", into = "Vec<CartItem>")]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Look up a line by product id.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.get(id).is_some()
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of all line quantities.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.amount)).sum()
    }

    /// Sum of all line totals.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Append `product` with quantity 1.
    ///
    /// If the product is already present the cart is returned unchanged;
    /// use [`Cart::with_incremented`] for existing lines.
    #[must_use]
    pub fn with_added(&self, product: Product) -> Self {
        if self.contains(product.id) {
            return self.clone();
        }
        let mut items = self.items.clone();
        items.push(CartItem { product, amount: 1 });
        Self { items }
    }

    /// Increase the quantity of `id` by one. Unknown ids are a no-op.
    #[must_use]
    pub fn with_incremented(&self, id: ProductId) -> Self {
        self.map_line(id, |amount| amount.saturating_add(1))
    }

    /// Set the quantity of `id`. Unknown ids are a no-op.
    #[must_use]
    pub fn with_amount(&self, id: ProductId, amount: u32) -> Self {
        self.map_line(id, |_| amount)
    }

    /// Drop the line for `id`.
    #[must_use]
    pub fn without(&self, id: ProductId) -> Self {
        Self {
            items: self
                .items
                .iter()
                .filter(|item| item.id() != id)
                .cloned()
                .collect(),
        }
    }

    fn map_line(&self, id: ProductId, f: impl Fn(u32) -> u32) -> Self {
        Self {
            items: self
                .items
                .iter()
                .map(|item| {
                    if item.id() == id {
                        CartItem {
                            product: item.product.clone(),
                            amount: f(item.amount),
                        }
                    } else {
                        item.clone()
                    }
                })
                .collect(),
        }
    }
}

impl From<Vec<CartItem>> for Cart {
    /// Build a cart from raw lines, keeping the first line for each id.
    fn from(lines: Vec<CartItem>) -> Self {
        let mut items: Vec<CartItem> = Vec::with_capacity(lines.len());
        for line in lines {
            if !items.iter().any(|item| item.id() == line.id()) {
                items.push(line);
            }
        }
        Self { items }
    }
}

impl From<Cart> for Vec<CartItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartItem;
    type IntoIter = std::slice::Iter<'a, CartItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
