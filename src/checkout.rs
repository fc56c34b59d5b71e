//! Manual UPI checkout: the buyer pays out of band and submits the UTR
//! (Unique Transaction Reference) for an admin to verify.

use crate::app::{Result, StorefrontError};
use crate::domain::{Cart, OrderItem, OrderRequest};

pub const UTR_LENGTH: usize = 12;

/// Trims and validates a UTR: exactly twelve ASCII digits.
pub fn validate_utr(raw: &str) -> Result<String> {
    let utr = raw.trim();
    if utr.len() != UTR_LENGTH || !utr.bytes().all(|b| b.is_ascii_digit()) {
        return Err(StorefrontError::InvalidUtr(format!(
            "expected {} digits, got {:?}",
            UTR_LENGTH, utr
        )));
    }
    Ok(utr.to_string())
}

pub fn validate_email(raw: &str) -> Result<String> {
    let email = raw.trim();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };

    if valid {
        Ok(email.to_string())
    } else {
        Err(StorefrontError::InvalidEmail(email.to_string()))
    }
}

/// Builds the order for `cart`, validating the payment details.
pub fn build_order(cart: &Cart, utr: &str, email: &str) -> Result<OrderRequest> {
    if cart.is_empty() {
        return Err(StorefrontError::EmptyCart);
    }
    let utr = validate_utr(utr)?;
    let email = validate_email(email)?;

    let items = cart
        .lines()
        .iter()
        .map(|line| OrderItem {
            product_id: line.product_id.clone(),
            title: line.title.clone(),
            price: line.price,
        })
        .collect();

    Ok(OrderRequest {
        items,
        total: cart.total(),
        utr,
        email,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Product;

    #[test]
    fn test_valid_utr_is_trimmed() {
        assert_eq!(validate_utr(" 412345678901 ").unwrap(), "412345678901");
    }

    #[test]
    fn test_utr_wrong_length() {
        assert!(matches!(
            validate_utr("12345"),
            Err(StorefrontError::InvalidUtr(_))
        ));
        assert!(validate_utr("1234567890123").is_err());
    }

    #[test]
    fn test_utr_non_digits() {
        assert!(validate_utr("41234567890a").is_err());
        assert!(validate_utr("४१२३४५६७८९०१").is_err());
    }

    #[test]
    fn test_email_validation() {
        assert_eq!(validate_email(" buyer@example.com ").unwrap(), "buyer@example.com");
        assert!(validate_email("buyer").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("buyer@").is_err());
        assert!(validate_email("a@b@c").is_err());
        assert!(validate_email("bu yer@example.com").is_err());
    }

    #[test]
    fn test_empty_cart_is_refused() {
        let result = build_order(&Cart::new(), "412345678901", "a@b.c");
        assert!(matches!(result, Err(StorefrontError::EmptyCart)));
    }

    #[test]
    fn test_build_order() {
        let mut cart = Cart::new();
        let mut discounted = Product::new("p1", "Ebook", 100.0);
        discounted.sale_price = Some(80.0);
        cart.add(&discounted);
        cart.add(&Product::new("p2", "Fonts", 20.0));

        let order = build_order(&cart, "412345678901", "a@b.c").unwrap();
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.items[0].price, 80.0);
        assert_eq!(order.total, 100.0);
        assert_eq!(order.utr, "412345678901");
    }

    #[test]
    fn test_order_total_is_rounded_to_paise() {
        let mut cart = Cart::new();
        cart.add(&Product::new("p1", "Brushes", 19.99));
        cart.add(&Product::new("p2", "Fonts", 9.99));

        let order = build_order(&cart, "412345678901", "a@b.c").unwrap();
        assert_eq!(order.total, 29.98);

        let json = serde_json::to_string(&order).unwrap();
        assert!(json.contains("\"total\":29.98"), "{}", json);
    }
}
