//! Quote assembly and line-level editing.
//!
//! [`build_quote`] turns a catalog snapshot into a priced quote for one system
//! type and stop count. Every line total is rounded to a whole currency unit
//! once, with `f64::round` (half away from zero); the grand total is the integer
//! sum of those line totals and is never rounded again.
//!
//! A [`Quote`] keeps its grand total in step with its lines: every edit goes
//! through a method that recomputes it.
use serde::{Deserialize, Serialize};

use crate::catalog::CatalogItem;
use crate::error::QuoteError;
use crate::quantity::calculate_quantity;
use crate::system::Category;

/// Priced line of a quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteLineItem {
    /// Catalog item id, or a caller-chosen id for custom lines.
    pub item_id: u32,
    /// Display name.
    pub name: String,
    /// Unit label.
    pub unit: String,
    /// Number of units.
    pub quantity: f64,
    /// Price of one unit.
    pub unit_price: f64,
    /// `round(unit_price * quantity)`.
    pub total_price: i64,
}

impl QuoteLineItem {
    /// Build a line and compute its total.
    pub fn new(item_id: u32, name: &str, unit: &str, quantity: f64, unit_price: f64) -> Self {
        Self {
            item_id,
            name: name.to_string(),
            unit: unit.to_string(),
            quantity,
            unit_price,
            total_price: line_total(unit_price, quantity),
        }
    }

    fn recompute(&mut self) {
        self.total_price = line_total(self.unit_price, self.quantity);
    }
}

/// Rounded total of one line. Non-finite inputs count as zero.
pub fn line_total(unit_price: f64, quantity: f64) -> i64 {
    let price = if unit_price.is_finite() { unit_price } else { 0.0 };
    let quantity = if quantity.is_finite() { quantity } else { 0.0 };
    (price * quantity).round() as i64
}

/// Changes to one quote line. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinePatch {
    /// New display name.
    #[serde(default)]
    pub name: Option<String>,
    /// New unit label.
    #[serde(default)]
    pub unit: Option<String>,
    /// New quantity.
    #[serde(default)]
    pub quantity: Option<f64>,
    /// New unit price.
    #[serde(default)]
    pub unit_price: Option<f64>,
}

/// One line-level change to a stored quote, applied in a single step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum LineEdit {
    /// Patch the first line with `item_id`.
    Update {
        /// Line to change.
        item_id: u32,
        /// Fields to change.
        patch: LinePatch,
    },
    /// Append a custom line with an id above every id already in the quote.
    Add {
        /// Display name.
        name: String,
        /// Unit label.
        unit: String,
        /// Number of units.
        quantity: f64,
        /// Price of one unit.
        unit_price: f64,
    },
    /// Remove every line with `item_id`.
    Remove {
        /// Line to remove.
        item_id: u32,
    },
}

/// Ordered priced lines with their grand total.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "QuoteParts")]
pub struct Quote {
    items: Vec<QuoteLineItem>,
    grand_total: i64,
}

/// Wire form of a quote. Totals are recomputed on the way in.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuoteParts {
    items: Vec<QuoteLineItem>,
}

impl From<QuoteParts> for Quote {
    fn from(parts: QuoteParts) -> Self {
        Quote::from_lines(parts.items)
    }
}

impl Quote {
    /// Build a quote from lines, recomputing each line total and the grand total.
    pub fn from_lines(mut items: Vec<QuoteLineItem>) -> Self {
        items.iter_mut().for_each(QuoteLineItem::recompute);
        let mut quote = Self {
            items,
            grand_total: 0,
        };
        quote.refresh_total();
        quote
    }

    /// Lines in order.
    pub fn items(&self) -> &[QuoteLineItem] {
        &self.items
    }

    /// Sum of all line totals.
    pub fn grand_total(&self) -> i64 {
        self.grand_total
    }

    /// Whether the quote has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Consume the quote, returning its lines.
    pub fn into_items(self) -> Vec<QuoteLineItem> {
        self.items
    }

    /// Patch the first line with `item_id`.
    pub fn update_line(&mut self, item_id: u32, patch: &LinePatch) -> Result<&QuoteLineItem, QuoteError> {
        let index = self
            .items
            .iter()
            .position(|line| line.item_id == item_id)
            .ok_or(QuoteError::LineNotFound(item_id))?;

        let line = &mut self.items[index];
        if let Some(name) = &patch.name {
            line.name = name.clone();
        }
        if let Some(unit) = &patch.unit {
            line.unit = unit.clone();
        }
        if let Some(quantity) = patch.quantity {
            line.quantity = quantity;
        }
        if let Some(price) = patch.unit_price {
            line.unit_price = price;
        }
        line.recompute();
        self.refresh_total();
        Ok(&self.items[index])
    }

    /// Append a custom line. Its total is recomputed from quantity and unit price.
    pub fn add_line(&mut self, mut line: QuoteLineItem) {
        line.recompute();
        self.items.push(line);
        self.refresh_total();
    }

    /// Remove every line with `item_id`. Returns `true` if any line was removed.
    pub fn remove_line(&mut self, item_id: u32) -> bool {
        let before = self.items.len();
        self.items.retain(|line| line.item_id != item_id);
        self.refresh_total();
        self.items.len() != before
    }

    /// Id for a new custom line: one above the highest id present, 1 when empty.
    pub fn next_item_id(&self) -> u32 {
        self.items
            .iter()
            .map(|line| line.item_id)
            .max()
            .map_or(1, |max| max.saturating_add(1))
    }

    /// Apply one edit. Fails with `LineNotFound` if an update or removal
    /// matches no line; the quote is then left as it was.
    pub fn apply(&mut self, edit: &LineEdit) -> Result<(), QuoteError> {
        match edit {
            LineEdit::Update { item_id, patch } => {
                self.update_line(*item_id, patch)?;
            }
            LineEdit::Add {
                name,
                unit,
                quantity,
                unit_price,
            } => {
                let item_id = self.next_item_id();
                self.add_line(QuoteLineItem::new(item_id, name, unit, *quantity, *unit_price));
            }
            LineEdit::Remove { item_id } => {
                if !self.remove_line(*item_id) {
                    return Err(QuoteError::LineNotFound(*item_id));
                }
            }
        }
        Ok(())
    }

    fn refresh_total(&mut self) {
        self.grand_total = self.items.iter().map(|line| line.total_price).sum();
    }
}

/// Price every active item of `category` for `target_stops` stops.
///
/// Items are quoted in item id order (stable for equal ids). The function is
/// pure: it reads the supplied snapshot and touches nothing else.
pub fn build_quote(catalog_items: &[CatalogItem], category: Category, target_stops: u32) -> Quote {
    let mut selected: Vec<&CatalogItem> = catalog_items
        .iter()
        .filter(|item| item.is_active && item.category == category)
        .collect();
    selected.sort_by_key(|item| item.item_id);

    let items = selected
        .into_iter()
        .map(|item| {
            let quantity = calculate_quantity(item, target_stops);
            QuoteLineItem::new(item.item_id, &item.name, &item.unit, quantity, item.unit_price)
        })
        .collect();

    Quote::from_lines(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CalcRule;

    fn item(item_id: u32, category: Category, unit_price: f64, rule: CalcRule) -> CatalogItem {
        CatalogItem {
            item_id,
            name: format!("item {item_id}"),
            unit: "عدد".to_string(),
            category,
            unit_price,
            rule,
            is_active: true,
        }
    }

    #[test]
    fn gearless_seven_stops() {
        let catalog = vec![
            item(1, Category::Gearless, 8_500_000.0, CalcRule::Fixed { quantity: 4.0 }),
            item(2, Category::Gearless, 480_000.0, CalcRule::PerStop),
        ];
        let quote = build_quote(&catalog, Category::Gearless, 7);

        let totals: Vec<i64> = quote.items().iter().map(|l| l.total_price).collect();
        assert_eq!(totals, vec![34_000_000, 3_360_000]);
        assert_eq!(quote.grand_total(), 37_360_000);
    }

    #[test]
    fn selects_active_items_of_category_in_id_order() {
        let mut inactive = item(2, Category::Gearless, 10.0, CalcRule::PerStop);
        inactive.is_active = false;
        let catalog = vec![
            item(5, Category::Gearless, 10.0, CalcRule::PerStop),
            inactive,
            item(3, Category::Hydraulic, 10.0, CalcRule::PerStop),
            item(1, Category::Gearless, 10.0, CalcRule::PerStop),
        ];
        let quote = build_quote(&catalog, Category::Gearless, 4);
        let ids: Vec<u32> = quote.items().iter().map(|l| l.item_id).collect();
        assert_eq!(ids, vec![1, 5]);
    }

    #[test]
    fn line_total_rounds_half_away_from_zero() {
        assert_eq!(line_total(2.5, 1.0), 3);
        assert_eq!(line_total(0.5, 3.0), 2);
        assert_eq!(line_total(-2.5, 1.0), -3);
        assert_eq!(line_total(f64::NAN, 3.0), 0);
        assert_eq!(line_total(100.0, f64::INFINITY), 0);
    }

    #[test]
    fn grand_total_is_sum_of_rounded_lines() {
        let catalog = vec![
            item(1, Category::Hydraulic, 0.5, CalcRule::Fixed { quantity: 1.0 }),
            item(2, Category::Hydraulic, 0.5, CalcRule::Fixed { quantity: 1.0 }),
        ];
        let quote = build_quote(&catalog, Category::Hydraulic, 2);
        // Each line rounds 0.5 up to 1; the unrounded sum would be 1.
        assert_eq!(quote.grand_total(), 2);
    }

    #[test]
    fn edits_keep_grand_total_in_step() {
        let catalog = vec![
            item(1, Category::Gearless, 1000.0, CalcRule::Fixed { quantity: 2.0 }),
            item(2, Category::Gearless, 500.0, CalcRule::PerStop),
        ];
        let mut quote = build_quote(&catalog, Category::Gearless, 3);
        assert_eq!(quote.grand_total(), 3500);

        let patch = LinePatch {
            quantity: Some(5.0),
            ..Default::default()
        };
        let line = quote.update_line(1, &patch).unwrap();
        assert_eq!(line.total_price, 5000);
        assert_eq!(quote.grand_total(), 6500);

        quote.add_line(QuoteLineItem {
            item_id: 900,
            name: "custom".to_string(),
            unit: "عدد".to_string(),
            quantity: 2.0,
            unit_price: 250.0,
            total_price: 0,
        });
        assert_eq!(quote.grand_total(), 7000);

        assert!(quote.remove_line(2));
        assert!(!quote.remove_line(2));
        assert_eq!(quote.grand_total(), 5500);

        assert!(matches!(
            quote.update_line(42, &patch),
            Err(QuoteError::LineNotFound(42))
        ));
    }

    #[test]
    fn line_edits_apply_in_one_step() {
        let mut quote = Quote::from_lines(vec![
            QuoteLineItem::new(4, "pulley", "حلقه", 1.0, 100.0),
            QuoteLineItem::new(59, "installation", "توقف", 3.0, 10.0),
        ]);
        quote
            .apply(&LineEdit::Add {
                name: "paint".to_string(),
                unit: "عدد".to_string(),
                quantity: 2.0,
                unit_price: 5.0,
            })
            .unwrap();
        assert_eq!(quote.items()[2].item_id, 60);
        assert_eq!(quote.grand_total(), 140);

        let missing = LineEdit::Remove { item_id: 7 };
        assert!(matches!(quote.apply(&missing), Err(QuoteError::LineNotFound(7))));
        assert_eq!(quote.items().len(), 3);

        quote.apply(&LineEdit::Remove { item_id: 4 }).unwrap();
        assert_eq!(quote.grand_total(), 40);
        assert_eq!(Quote::default().next_item_id(), 1);
    }

    #[test]
    fn deserialized_quote_recomputes_totals() {
        let json = r#"{"items":[{"itemId":1,"name":"a","unit":"عدد","quantity":3,
            "unitPrice":100,"totalPrice":1}],"grandTotal":999}"#;
        let quote: Quote = serde_json::from_str(json).unwrap();
        assert_eq!(quote.items()[0].total_price, 300);
        assert_eq!(quote.grand_total(), 300);
    }
}
