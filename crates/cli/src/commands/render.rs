//! Plain-text rendering of carts and notifications.

use std::fmt::Write as _;

use rocketshoes_cart::{CartState, CurrencyCode, Notification, Price, Severity};

/// Render the cart as a fixed-width table with subtotals and total.
pub fn cart_table(cart: &CartState, currency: CurrencyCode) -> String {
    if cart.is_empty() {
        return "Cart is empty".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>6}  {:<32}  {:>12}  {:>6}  {:>12}",
        "ID", "PRODUCT", "PRICE", "QTY", "SUBTOTAL"
    );

    for item in cart.items() {
        let _ = writeln!(
            out,
            "{:>6}  {:<32}  {:>12}  {:>6}  {:>12}",
            item.product_id(),
            truncate(&item.product.title, 32),
            Price::new(item.product.price, currency).display(),
            item.amount,
            Price::new(item.subtotal(), currency).display(),
        );
    }

    let _ = write!(
        out,
        "{} products, {} units, total {}",
        cart.len(),
        cart.total_quantity(),
        Price::new(cart.total(), currency).display()
    );
    out
}

/// Render a notification as a single prefixed line.
pub fn notification_line(notification: &Notification) -> String {
    let prefix = match notification.severity {
        Severity::Error => "error",
    };
    format!("[{prefix}] {}", notification.message)
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut cut: String = s.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use rocketshoes_cart::{CartLineItem, ProductId, ProductMetadata};
    use rust_decimal::Decimal;

    use super::*;

    fn cart() -> CartState {
        CartState::new()
            .with_item(CartLineItem::new(
                ProductMetadata::new(ProductId::new(1), "Tênis de Caminhada", Decimal::new(1399, 1), "a.jpg"),
                2,
            ))
            .with_item(CartLineItem::new(
                ProductMetadata::new(ProductId::new(2), "Bota", Decimal::new(10, 0), "b.jpg"),
                1,
            ))
    }

    #[test]
    fn test_empty_cart() {
        assert_eq!(cart_table(&CartState::new(), CurrencyCode::BRL), "Cart is empty");
    }

    #[test]
    fn test_table_has_header_rows_and_summary() {
        let table = cart_table(&cart(), CurrencyCode::BRL);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines.first().is_some_and(|l| l.contains("SUBTOTAL")));
        assert!(table.contains("Tênis de Caminhada"));
        assert!(table.contains("R$ 279.80"));
        assert_eq!(
            lines.last().copied(),
            Some("2 products, 3 units, total R$ 289.80")
        );
    }

    #[test]
    fn test_notification_line() {
        let line = notification_line(&Notification {
            message: "Requested quantity is out of stock".to_string(),
            severity: Severity::Error,
        });
        assert_eq!(line, "[error] Requested quantity is out of stock");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
    }
}
