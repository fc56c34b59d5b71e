use serde::{Deserialize, Serialize};

use crate::domain::{to_paise, Product};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: String,
    pub title: String,
    pub price: f64,
}

impl From<&Product> for CartLine {
    fn from(product: &Product) -> Self {
        Self {
            product_id: product.id.clone(),
            title: product.display_title().to_string(),
            price: product.effective_price(),
        }
    }
}

/// Shopping cart of digital goods. A product appears at most once.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the product; returns `false` if it was already in the cart.
    pub fn add(&mut self, product: &Product) -> bool {
        if self.contains(&product.id) {
            return false;
        }
        self.lines.push(CartLine::from(product));
        true
    }

    /// Removes the product; returns `false` if it was not in the cart.
    pub fn remove(&mut self, product_id: &str) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.product_id != product_id);
        self.lines.len() != before
    }

    pub fn contains(&self, product_id: &str) -> bool {
        self.lines.iter().any(|line| line.product_id == product_id)
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of line prices, added up in whole paise so the result carries
    /// no float noise.
    pub fn total(&self) -> f64 {
        let paise: i64 = self.lines.iter().map(|line| to_paise(line.price)).sum();
        paise as f64 / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_is_idempotent_per_product() {
        let mut cart = Cart::new();
        let product = Product::new("p1", "Ebook", 100.0);

        assert!(cart.add(&product));
        assert!(!cart.add(&product));
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_total_uses_sale_price() {
        let mut cart = Cart::new();
        let mut discounted = Product::new("p1", "Ebook", 100.0);
        discounted.sale_price = Some(40.0);
        cart.add(&discounted);
        cart.add(&Product::new("p2", "Fonts", 25.5));

        assert_eq!(cart.total(), 65.5);
    }

    #[test]
    fn test_total_has_no_float_noise() {
        let mut cart = Cart::new();
        cart.add(&Product::new("p1", "Brushes", 19.99));
        cart.add(&Product::new("p2", "Fonts", 9.99));

        assert_eq!(cart.total(), 29.98);
    }

    #[test]
    fn test_remove() {
        let mut cart = Cart::new();
        cart.add(&Product::new("p1", "Ebook", 100.0));

        assert!(cart.remove("p1"));
        assert!(!cart.remove("p1"));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_roundtrips_through_json() {
        let mut cart = Cart::new();
        cart.add(&Product::new("p1", "Ebook", 100.0));

        let json = serde_json::to_string(&cart).unwrap();
        let restored: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, cart);
    }
}
