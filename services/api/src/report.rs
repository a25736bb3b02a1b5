//! Shopping-list report rendering

use crate::models::recipe::ShoppingListItem;

/// File name the shopping-list download is served under
pub const SHOPPING_LIST_FILENAME: &str = "shopping_cart_info.txt";

/// Render aggregated shopping-list items as a flat text report
///
/// One newline-terminated line per (ingredient, unit) group; an empty cart
/// yields an empty body.
pub fn render_shopping_list(items: &[ShoppingListItem]) -> String {
    let mut content = String::new();
    for item in items {
        content.push_str(&format!(
            "{}: {} {}\n",
            item.name, item.total_amount, item.measurement_unit
        ));
    }
    content
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, unit: &str, total: i64) -> ShoppingListItem {
        ShoppingListItem {
            name: name.to_string(),
            measurement_unit: unit.to_string(),
            total_amount: total,
        }
    }

    #[test]
    fn test_render_empty_cart() {
        assert_eq!(render_shopping_list(&[]), "");
    }

    #[test]
    fn test_render_sums_one_line_per_group() {
        let items = vec![item("eggs", "pcs", 2), item("flour", "g", 300)];
        let report = render_shopping_list(&items);

        assert_eq!(report, "eggs: 2 pcs\nflour: 300 g\n");
    }

    #[test]
    fn test_render_lines_are_newline_terminated() {
        let report = render_shopping_list(&[item("salt", "g", 5)]);
        assert!(report.ends_with('\n'));
        assert_eq!(report.lines().count(), 1);
    }
}
