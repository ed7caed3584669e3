//! Output formatting for the CLI.

use console::style;
use market_cart::CartItem;

const CART_COLUMNS: [&str; 4] = ["ID", "TITLE", "PRICE", "QTY"];
const CART_WIDTHS: [usize; 4] = [16, 32, 10, 5];

/// Output handler for CLI messages.
#[derive(Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
}

impl Output {
    /// Create a new output handler.
    pub fn new(verbose: bool, json: bool) -> Self {
        Self { verbose, json }
    }

    /// Print an info message.
    pub fn info(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("ℹ").blue(), msg);
    }

    /// Print a success message.
    pub fn success(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("✓").green(), msg);
    }

    /// Print an error message.
    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!("{}", serde_json::json!({ "error": msg }));
            return;
        }
        eprintln!("{} {}", style("✗").red(), style(msg).red());
    }

    /// Print a debug message (only in verbose mode).
    pub fn debug(&self, msg: &str) {
        if !self.verbose || self.json {
            return;
        }
        eprintln!("{} {}", style("→").dim(), style(msg).dim());
    }

    /// Print a header/title.
    pub fn header(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print JSON output.
    pub fn json<T: serde::Serialize>(&self, value: &T) {
        if let Ok(json) = serde_json::to_string_pretty(value) {
            println!("{}", json);
        }
    }

    /// Print a key-value pair.
    pub fn kv(&self, key: &str, value: &str) {
        if self.json {
            return;
        }
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print the cart contents: a table in text mode, the item list in
    /// JSON mode.
    pub fn cart(&self, items: &[CartItem]) {
        if self.json {
            self.json(&items);
            return;
        }

        if items.is_empty() {
            self.info("Cart is empty.");
            self.info("Run `cart add` to put something in it.");
            return;
        }

        self.header("Cart");
        println!("  {}", pad(&CART_COLUMNS.map(String::from)));
        for item in items {
            println!("  {}", pad(&cart_row(item)));
        }

        let units: u64 = items.iter().map(|i| u64::from(i.quantity)).sum();
        println!();
        self.info(&format!(
            "Total: {} item(s), {} unit(s)",
            items.len(),
            units
        ));
    }

    /// Report the new quantity of `id` after a change, or its removal.
    pub fn item_changed(&self, id: &str, items: &[CartItem]) {
        if self.json {
            self.json(&items);
            return;
        }

        match items.iter().find(|i| i.id.as_str() == id) {
            Some(item) => self.success(&format!("{} now x{}", item.title, item.quantity)),
            None => self.success(&format!("Removed {}", id)),
        }
    }

    /// Check if JSON mode is enabled.
    pub fn is_json(&self) -> bool {
        self.json
    }
}

fn cart_row(item: &CartItem) -> [String; 4] {
    [
        item.id.to_string(),
        item.title.clone(),
        format!("{:.2}", item.price),
        item.quantity.to_string(),
    ]
}

fn pad(cols: &[String; 4]) -> String {
    cols.iter()
        .zip(CART_WIDTHS)
        .map(|(col, width)| format!("{:width$}", col))
        .collect::<Vec<_>>()
        .join("  ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use market_cart::NewCartItem;

    #[test]
    fn test_cart_row_formatting() {
        let item = NewCartItem::new("p1", "Mug", "", 10.5).with_quantity(3);
        assert_eq!(cart_row(&item), ["p1", "Mug", "10.50", "3"].map(String::from));
    }

    #[test]
    fn test_pad_aligns_columns() {
        let line = pad(&CART_COLUMNS.map(String::from));
        assert!(line.starts_with(&format!("{:16}  TITLE", "ID")));
    }
}
