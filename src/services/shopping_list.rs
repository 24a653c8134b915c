// ABOUTME: Cart aggregation: sums ingredient amounts across every recipe in a user's cart
// ABOUTME: Produces the deduplicated shopping list and its plain-text export
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

//! # Shopping List
//!
//! Lines are keyed by ingredient **name** only. Two ingredients sharing a
//! name but not a unit collapse into one line carrying the unit of the
//! first row encountered. Output order is the order of first encounter:
//! cart entries in the order they were added, then each recipe's
//! ingredient lines in the order they were written.

use crate::database::{CartIngredientRow, Database};
use crate::errors::AppResult;
use crate::models::ShoppingListItem;
use std::collections::HashMap;
use std::fmt::Write as _;
use tracing::debug;

/// Fold cart ingredient rows into one line per ingredient name
#[must_use]
pub fn aggregate(rows: impl IntoIterator<Item = CartIngredientRow>) -> Vec<ShoppingListItem> {
    let mut items: Vec<ShoppingListItem> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for row in rows {
        if let Some(&position) = index.get(&row.name) {
            let item = &mut items[position];
            item.total_amount = item.total_amount.saturating_add(row.amount);
        } else {
            index.insert(row.name.clone(), items.len());
            items.push(ShoppingListItem {
                name: row.name,
                total_amount: row.amount,
                unit: row.measurement_unit,
            });
        }
    }

    items
}

/// Render the list as `"<name> - <amount> <unit>\n"` lines
#[must_use]
pub fn render(items: &[ShoppingListItem]) -> String {
    items.iter().fold(String::new(), |mut text, item| {
        let _ = writeln!(text, "{} - {} {}", item.name, item.total_amount, item.unit);
        text
    })
}

/// Cart aggregation service
#[derive(Clone)]
pub struct ShoppingListService {
    database: Database,
}

impl ShoppingListService {
    /// Create a shopping list service
    #[must_use]
    pub const fn new(database: Database) -> Self {
        Self { database }
    }

    /// Aggregated ingredient lines for everything in the user's cart
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn build_shopping_list(&self, user_id: i64) -> AppResult<Vec<ShoppingListItem>> {
        let rows = self
            .database
            .collections()
            .cart_ingredient_rows(user_id)
            .await?;
        let row_count = rows.len();
        let items = aggregate(rows);
        debug!(user_id, rows = row_count, lines = items.len(), "Built shopping list");
        Ok(items)
    }

    /// Plain-text export of the user's shopping list
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn export_shopping_list(&self, user_id: i64) -> AppResult<String> {
        Ok(render(&self.build_shopping_list(user_id).await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, amount: i64, unit: &str) -> CartIngredientRow {
        CartIngredientRow {
            name: name.to_owned(),
            amount,
            measurement_unit: unit.to_owned(),
        }
    }

    #[test]
    fn test_amounts_summed_by_name() {
        let items = aggregate([row("Sugar", 100, "g"), row("Sugar", 50, "g")]);
        assert_eq!(items.len(), 1);
        assert_eq!(render(&items), "Sugar - 150 g\n");
    }

    #[test]
    fn test_first_encounter_order_kept() {
        let items = aggregate([
            row("Flour", 200, "g"),
            row("Egg", 2, "pcs"),
            row("Milk", 300, "ml"),
            row("Flour", 100, "g"),
        ]);
        let names: Vec<_> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["Flour", "Egg", "Milk"]);
        assert_eq!(items[0].total_amount, 300);
    }

    #[test]
    fn test_first_unit_wins_on_name_collision() {
        let items = aggregate([row("Salt", 5, "g"), row("Salt", 1, "pinch")]);
        assert_eq!(
            items,
            vec![ShoppingListItem {
                name: "Salt".to_owned(),
                total_amount: 6,
                unit: "g".to_owned(),
            }]
        );
    }

    #[test]
    fn test_sum_saturates_instead_of_wrapping() {
        let items = aggregate([row("Sugar", i64::MAX, "g"), row("Sugar", 1, "g")]);
        assert_eq!(items[0].total_amount, i64::MAX);
    }

    #[test]
    fn test_empty_cart_renders_nothing() {
        let items = aggregate(Vec::new());
        assert!(items.is_empty());
        assert_eq!(render(&items), "");
    }
}
